//! Server-level bridge setup.
//!
//! # Responsibilities
//! - Decide which request paths are handed to the bridge
//! - Own the server-wide default features shared by every request
//! - Build dispatchers that carry the server settings
//!
//! # Design Decisions
//! - Path matching is case-sensitive, on segment boundaries
//! - "/" matches every path
//! - No routes configured = nothing is routed

use std::sync::Arc;

use crate::config::BridgeConfig;
use crate::dispatch::application::HttpApplication;
use crate::dispatch::handler::RequestDispatcher;
use crate::features::FeatureSet;

/// Matches a request path against one configured prefix.
#[derive(Debug, Clone)]
pub struct RoutePrefix {
    prefix: String,
}

impl RoutePrefix {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        if self.prefix == "/" {
            return true;
        }
        match path.strip_prefix(self.prefix.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

/// The bridge as mounted in a legacy server.
#[derive(Debug)]
pub struct BridgeServer {
    config: BridgeConfig,
    routes: Vec<RoutePrefix>,
    defaults: Arc<FeatureSet>,
}

impl BridgeServer {
    pub fn new(config: BridgeConfig) -> Self {
        let routes = config.routes.iter().map(RoutePrefix::new).collect();
        Self {
            config,
            routes,
            defaults: Arc::new(FeatureSet::new()),
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Server-wide features every request set falls back to.
    pub fn defaults(&self) -> &Arc<FeatureSet> {
        &self.defaults
    }

    /// Whether `path` is handed to the bridge.
    pub fn matches(&self, path: &str) -> bool {
        let matched = self.routes.iter().any(|route| route.matches(path));
        tracing::trace!(path = %path, matched, "Route lookup");
        matched
    }

    /// Dispatcher for `application` using this server's settings.
    pub fn dispatcher<A: HttpApplication>(&self, application: A) -> RequestDispatcher<A> {
        RequestDispatcher::new(Arc::new(application))
            .with_defaults(self.defaults.clone())
            .with_read_only(self.config.features.read_only)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server(routes: &[&str]) -> BridgeServer {
        let mut config = BridgeConfig::default();
        config.routes = routes.iter().map(|r| r.to_string()).collect();
        BridgeServer::new(config)
    }

    #[test]
    fn test_prefix_matches_on_segment_boundary() {
        let server = server(&["/api"]);
        assert!(server.matches("/api"));
        assert!(server.matches("/api/values"));
        assert!(!server.matches("/apix"));
        assert!(!server.matches("/API/values"));
        assert!(!server.matches("/other"));
    }

    #[test]
    fn test_root_matches_everything() {
        let server = server(&["/"]);
        assert!(server.matches("/"));
        assert!(server.matches("/anything/at/all"));
    }

    #[test]
    fn test_no_routes_matches_nothing() {
        let server = server(&[]);
        assert!(!server.matches("/"));
    }
}
