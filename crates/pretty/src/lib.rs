//! A pretty printer for HTTP requests and responses
//!
//! This crate prints HTTP traffic the way `curl -v` shows it: request and
//! status lines, headers and bodies, optionally colored, to any sink. It is
//! meant for debugging clients and servers during development.
//!
//! # Features
//!
//! - Independent toggles for headers and bodies of each direction
//! - ANSI colors for start lines and headers
//! - Pluggable body formatters, with a JSON pretty printer built in
//! - Request filters and body filters
//! - Decoding of gzip, deflate, brotli and zstd bodies before printing
//! - Optional redaction of credentials
//! - A client transport wrapper printing every exchange
//!
//! # Example
//!
//! ```
//! use http::{header, Request, Response};
//! use micro_pretty::format::JsonFormatter;
//! use micro_pretty::{BufferSink, Config, Logger};
//!
//! let sink = BufferSink::new();
//! let logger = Logger::builder()
//!     .config(Config::verbose())
//!     .formatter(JsonFormatter::default())
//!     .sink(sink.clone())
//!     .build();
//!
//! let req = Request::get("http://example.com/users/1").body(()).unwrap();
//! logger.print_request(Some(&req)).unwrap();
//!
//! let resp = Response::builder()
//!     .header(header::CONTENT_TYPE, "application/json")
//!     .body(r#"{"id":1}"#)
//!     .unwrap();
//! logger.print_response(Some(&resp)).unwrap();
//!
//! let want = "> GET /users/1 HTTP/1.1\n\
//!             > Host: example.com\n\
//!             \n\
//!             < HTTP/1.1 200 OK\n\
//!             < Content-Type: application/json\n\
//!             {\n    \"id\": 1\n}\n\
//!             \n";
//! assert_eq!(sink.to_string_lossy(), want);
//! ```
//!
//! # Architecture
//!
//! - [`config`]: what gets printed
//! - [`event`]: read only view over a request or response
//! - [`filter`]: skipping whole events or only their bodies
//! - [`format`]: body formatters
//! - [`render`]: line rendering and colors
//! - [`redact`]: header value redaction
//! - [`sink`]: output destinations
//! - [`transport`]: printing client exchanges
//!
//! Every event is rendered into memory first and handed to the [`Sink`] in
//! one call, so events printed concurrently never interleave.

pub mod config;
pub mod event;
pub mod filter;
pub mod format;
pub mod redact;
pub mod render;
pub mod sink;
pub mod transport;

mod decode;
mod logger;

pub use config::Config;
pub use event::{Direction, Head, PrintBody, TlsInfo, TraceEvent};
pub use logger::{Logger, LoggerBuilder};
pub use sink::{BufferSink, Sink};
pub use transport::{LoggingTransport, Transport};
