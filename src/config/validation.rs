//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Route prefixes are absolute, unique, and have no trailing slash
//! - Log level is one the tracing filter understands
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BridgeConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::BridgeConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("route '{0}' must start with '/'")]
    RouteNotAbsolute(String),

    #[error("route '{0}' must not end with '/'")]
    RouteTrailingSlash(String),

    #[error("route '{0}' is declared more than once")]
    DuplicateRoute(String),

    #[error("unknown log level '{0}'")]
    UnknownLogLevel(String),
}

/// Check `config`, collecting every problem found.
pub fn validate_config(config: &BridgeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for route in &config.routes {
        if !route.starts_with('/') {
            errors.push(ValidationError::RouteNotAbsolute(route.clone()));
        } else if route.len() > 1 && route.ends_with('/') {
            errors.push(ValidationError::RouteTrailingSlash(route.clone()));
        }
        if !seen.insert(route.as_str()) {
            errors.push(ValidationError::DuplicateRoute(route.clone()));
        }
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
