//! Printing toggles.

use http::HeaderName;
use serde::Deserialize;

/// Default size limit for printed bodies, in bytes.
pub const DEFAULT_MAX_BODY: u64 = 4096;

/// What a [`Logger`](crate::Logger) prints.
///
/// Every toggle is independent. The default prints nothing but still reports
/// absent requests and responses; use [`Config::verbose`] to turn every part
/// on. The struct deserializes from any serde format, missing fields keep
/// their default.
///
/// ```
/// use micro_pretty::Config;
///
/// let config: Config = serde_json::from_str(r#"{"request_header": true, "colors": true}"#).unwrap();
/// assert!(config.request_header);
/// assert!(!config.response_body);
/// assert_eq!(config.max_response_body, 4096);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Print the TLS connection details attached to a message
    pub tls: bool,
    /// Announce requests sent through a [`LoggingTransport`](crate::transport::LoggingTransport)
    pub request_info: bool,
    pub request_header: bool,
    pub request_body: bool,
    pub response_header: bool,
    pub response_body: bool,
    /// Style start and header lines with ANSI escape sequences
    pub colors: bool,
    /// Decode `Content-Encoding` before printing bodies
    pub decode_body: bool,
    pub max_request_body: u64,
    pub max_response_body: u64,
    /// Header names never printed, case insensitive
    pub skip_headers: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tls: false,
            request_info: false,
            request_header: false,
            request_body: false,
            response_header: false,
            response_body: false,
            colors: false,
            decode_body: true,
            max_request_body: DEFAULT_MAX_BODY,
            max_response_body: DEFAULT_MAX_BODY,
            skip_headers: vec![],
        }
    }
}

impl Config {
    /// Every part of both directions, without colors.
    pub fn verbose() -> Self {
        Self {
            tls: true,
            request_info: true,
            request_header: true,
            request_body: true,
            response_header: true,
            response_body: true,
            ..Self::default()
        }
    }

    pub(crate) fn skips_header(&self, name: &HeaderName) -> bool {
        self.skip_headers.iter().any(|skipped| skipped.eq_ignore_ascii_case(name.as_str()))
    }
}
