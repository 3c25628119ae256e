//! HTTP feature bridge.
//!
//! Exposes a legacy host's request/response pair to a modern processing
//! pipeline as a registry of capabilities.
//!
//! # Architecture Overview
//!
//! ```text
//!   legacy host                       bridge                          pipeline
//!  ┌─────────────┐   snapshot   ┌──────────────┐
//!  │LegacyRequest│─────────────▶│ RequestView  │──┐
//!  └─────────────┘              └──────────────┘  │   ┌────────────┐   ┌──────────────┐
//!                                                 ├──▶│ FeatureSet │──▶│HttpApplication│
//!  ┌──────────────┐  live view  ┌──────────────┐  │   └────────────┘   └──────────────┘
//!  │LegacyResponse│◀───────────▶│ ResponseView │──┘
//!  └──────────────┘             │  + headers   │
//!         ▲                     │  + cookies   │
//!         │                     └──────────────┘
//!         └── RequestDispatcher: process → start → complete → dispose
//! ```

pub mod config;
pub mod cookies;
pub mod dispatch;
pub mod error;
pub mod features;
pub mod headers;
pub mod legacy;
pub mod observability;

pub(crate) mod sync;

pub use config::BridgeConfig;
pub use dispatch::{BridgeServer, HttpApplication, RequestDispatcher};
pub use error::{BoxError, BridgeError, BridgeResult};
pub use features::{
    Feature, FeatureKind, FeatureSet, FeatureType, HttpRequestFeature,
    HttpRequestIdentifierFeature, HttpResponseFeature, RequestFeatures,
};
pub use headers::{HeaderDictionary, HeaderValues};
