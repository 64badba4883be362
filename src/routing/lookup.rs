//! Endpoint lookup by name.

use thiserror::Error;

use crate::config::schema::{Config, EndPoint};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("endpoint {name:?} is not found")]
    NotFound { name: String },
}

/// Find the first endpoint whose name equals `name` (case-sensitive).
pub fn find_endpoint<'a>(config: &'a Config, name: &str) -> Result<&'a EndPoint, LookupError> {
    config
        .endpoints
        .iter()
        .find(|ep| ep.name == name)
        .ok_or_else(|| LookupError::NotFound {
            name: name.to_string(),
        })
}

impl Config {
    /// See [`find_endpoint`].
    pub fn endpoint(&self, name: &str) -> Result<&EndPoint, LookupError> {
        find_endpoint(self, name)
    }
}
