//! Configuration validation.
//!
//! # Responsibilities
//! - Check every required field is set after parsing and defaulting
//! - Report field paths (`Endpoints[1].URL`) so users can fix them in one pass
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - One explicit check per required field, no schema reflection
//! - Validation is pure function: &Config → Result<(), Vec<ValidationError>>

use std::fmt;

use crate::config::schema::Config;

/// Rule a field failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// String or sequence is empty.
    Empty,
    /// Integer is zero.
    Zero,
}

/// A single required-field violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Document path of the field, e.g. `Port` or `Endpoints[0].Name`.
    pub field: String,
    pub violation: Violation,
}

impl ValidationError {
    fn new(field: impl Into<String>, violation: Violation) -> Self {
        Self {
            field: field.into(),
            violation,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.violation {
            Violation::Empty => write!(f, "{} is required", self.field),
            Violation::Zero => write!(f, "{} must be non-zero", self.field),
        }
    }
}

/// Validate a defaulted configuration.
pub fn validate_config(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    require_str(&mut errors, "Port", &config.port);
    require_str(&mut errors, "LogLevel", &config.log_level);
    require_nonzero(&mut errors, "Timeout", config.timeout);
    require_nonzero(&mut errors, "MaxIdleConnsPerHost", config.max_idle_conns_per_host);
    require_nonzero(&mut errors, "IdleConnTimeout", config.idle_conn_timeout);
    require_nonzero(&mut errors, "ProxyReadTimeout", config.proxy_read_timeout);
    require_nonzero(&mut errors, "ShutdownTimeout", config.shutdown_timeout);

    if config.endpoints.is_empty() {
        errors.push(ValidationError::new("Endpoints", Violation::Empty));
    }
    for (i, endpoint) in config.endpoints.iter().enumerate() {
        require_str(&mut errors, format!("Endpoints[{}].Name", i), &endpoint.name);
        require_str(&mut errors, format!("Endpoints[{}].URL", i), &endpoint.url);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn require_str(errors: &mut Vec<ValidationError>, field: impl Into<String>, value: &str) {
    if value.is_empty() {
        errors.push(ValidationError::new(field, Violation::Empty));
    }
}

fn require_nonzero(errors: &mut Vec<ValidationError>, field: &str, value: u64) {
    if value == 0 {
        errors.push(ValidationError::new(field, Violation::Zero));
    }
}
