//! Request dispatch into the processing pipeline.
//!
//! # Responsibilities
//! - Build the per-request feature set from the legacy pair
//! - Run the application with the ordered lifecycle around it
//! - Guarantee the completion phase runs, including on abort
//! - Decide which paths the bridge serves

pub mod application;
pub mod guard;
pub mod handler;
pub mod server;

pub use application::HttpApplication;
pub use guard::CompletionGuard;
pub use handler::RequestDispatcher;
pub use server::{BridgeServer, RoutePrefix};
