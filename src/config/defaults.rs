//! Post-parse defaulting.
//!
//! Scalar defaults come from `Config::default()` before the document is
//! overlaid. This pass only covers what serde cannot express: the status
//! policy of an endpoint depends on two fields at once.

use crate::config::schema::Config;

/// Statuses accepted by an endpoint that declares neither list: the 2xx
/// success codes.
pub const DEFAULT_ACCEPTABLE_HTTP_STATUSES: [u16; 10] =
    [200, 201, 202, 203, 204, 205, 206, 207, 208, 226];

/// Fill in the acceptable statuses of every endpoint that left both
/// status lists empty. Idempotent.
pub fn apply_defaults(config: &mut Config) {
    for endpoint in &mut config.endpoints {
        if endpoint.acceptable_http_statuses.is_empty()
            && endpoint.exceptable_http_statuses.is_empty()
        {
            tracing::debug!(
                endpoint = %endpoint.name,
                "No status policy declared, accepting 2xx"
            );
            endpoint.acceptable_http_statuses = DEFAULT_ACCEPTABLE_HTTP_STATUSES.into_iter().collect();
        }
    }
}
