//! Configuration schema definitions.
//!
//! This module defines the configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.
//! Keys keep the document casing (`Port`, `Endpoints`, `URL`, ...).

use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use url::Url;

pub const DEFAULT_PORT: &str = "29300";
pub const DEFAULT_LOG_LEVEL: &str = "error";
pub const DEFAULT_TIMEOUT: u64 = 5;
pub const DEFAULT_MAX_IDLE_CONNS_PER_HOST: u64 = 100;
pub const DEFAULT_IDLE_CONN_TIMEOUT: u64 = 30;
pub const DEFAULT_PROXY_READ_TIMEOUT: u64 = 60;
pub const DEFAULT_SHUTDOWN_TIMEOUT: u64 = 10;

/// Document keys of [`Config`]. Must match the serde field names.
pub const CONFIG_KEYS: [&str; 9] = [
    "Port",
    "LogLevel",
    "Timeout",
    "MaxIdleConnsPerHost",
    "DisableCompression",
    "IdleConnTimeout",
    "ProxyReadTimeout",
    "ShutdownTimeout",
    "Endpoints",
];

/// Document keys of [`EndPoint`].
pub const ENDPOINT_KEYS: [&str; 6] = [
    "Name",
    "URL",
    "ProxySetHeaders",
    "ProxyPassHeaders",
    "AcceptableHTTPStatuses",
    "ExceptableHTTPStatuses",
];

/// Root configuration for the relay.
///
/// `Default` is the baseline every document is overlaid onto; any key the
/// document omits keeps the value set here.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Config {
    /// Listen port.
    pub port: String,

    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Upstream request timeout in seconds.
    pub timeout: u64,

    /// Maximum idle keep-alive connections per upstream host.
    pub max_idle_conns_per_host: u64,

    /// Disable transparent response compression.
    pub disable_compression: bool,

    /// Idle connection expiry in seconds.
    pub idle_conn_timeout: u64,

    /// Proxy read timeout in seconds.
    pub proxy_read_timeout: u64,

    /// Graceful shutdown deadline in seconds.
    pub shutdown_timeout: u64,

    /// Upstream targets, in declaration order.
    pub endpoints: Vec<EndPoint>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_idle_conns_per_host: DEFAULT_MAX_IDLE_CONNS_PER_HOST,
            disable_compression: false,
            idle_conn_timeout: DEFAULT_IDLE_CONN_TIMEOUT,
            proxy_read_timeout: DEFAULT_PROXY_READ_TIMEOUT,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
            endpoints: Vec::new(),
        }
    }
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn idle_conn_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_conn_timeout)
    }

    pub fn proxy_read_timeout(&self) -> Duration {
        Duration::from_secs(self.proxy_read_timeout)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout)
    }
}

/// A named upstream target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct EndPoint {
    /// Lookup key.
    pub name: String,

    /// Upstream URL.
    #[serde(rename = "URL")]
    pub url: String,

    /// Headers set on the upstream request.
    pub proxy_set_headers: Vec<HeaderPair>,

    /// Headers copied through from the client request.
    pub proxy_pass_headers: Vec<HeaderPair>,

    /// Statuses treated as success.
    #[serde(rename = "AcceptableHTTPStatuses")]
    pub acceptable_http_statuses: BTreeSet<u16>,

    /// Statuses treated as failure.
    #[serde(rename = "ExceptableHTTPStatuses")]
    pub exceptable_http_statuses: BTreeSet<u16>,
}

/// How an endpoint decides whether an upstream status is a success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusPolicy {
    /// Only listed statuses succeed.
    AllowList,
    /// Everything except listed statuses succeeds.
    DenyList,
    /// Deny-list is checked first, then the allow-list.
    Mixed,
}

impl EndPoint {
    /// Create an endpoint with no header rules and no status policy.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            ..Self::default()
        }
    }

    /// Parse `URL`. Validation only requires it to be non-empty.
    pub fn parsed_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.url)
    }

    pub fn set_headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.proxy_set_headers.iter().map(HeaderPair::as_tuple)
    }

    pub fn pass_headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.proxy_pass_headers.iter().map(HeaderPair::as_tuple)
    }

    /// Which policy the status sets describe.
    ///
    /// Returns `None` when both sets are empty, which only happens before
    /// defaulting.
    pub fn status_policy(&self) -> Option<StatusPolicy> {
        match (
            self.acceptable_http_statuses.is_empty(),
            self.exceptable_http_statuses.is_empty(),
        ) {
            (true, true) => None,
            (false, true) => Some(StatusPolicy::AllowList),
            (true, false) => Some(StatusPolicy::DenyList),
            (false, false) => Some(StatusPolicy::Mixed),
        }
    }

    /// Returns true if an upstream response with `status` counts as success.
    ///
    /// The deny-list always wins. A non-empty allow-list must then contain
    /// the status; with an empty allow-list anything not denied succeeds.
    pub fn accepts_status(&self, status: u16) -> bool {
        if self.exceptable_http_statuses.contains(&status) {
            return false;
        }
        if self.acceptable_http_statuses.is_empty() {
            return !self.exceptable_http_statuses.is_empty();
        }
        self.acceptable_http_statuses.contains(&status)
    }
}

/// A `[name, value]` header pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderPair {
    pub name: String,
    pub value: String,
}

impl HeaderPair {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    fn as_tuple(&self) -> (&str, &str) {
        (&self.name, &self.value)
    }
}

impl Serialize for HeaderPair {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [&self.name, &self.value].serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for HeaderPair {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PairVisitor;

        impl<'de> Visitor<'de> for PairVisitor {
            type Value = HeaderPair;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a [name, value] array of two strings")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<HeaderPair, A::Error> {
                let name: String = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let value: String = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(1, &self))?;
                if seq.next_element::<de::IgnoredAny>()?.is_some() {
                    return Err(de::Error::invalid_length(3, &self));
                }
                Ok(HeaderPair { name, value })
            }
        }

        deserializer.deserialize_seq(PairVisitor)
    }
}
