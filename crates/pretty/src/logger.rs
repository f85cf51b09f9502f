//! The request/response printer.
//!
//! [`Logger`] drives one event through the printing pipeline:
//!
//! ```text
//! Start ── None ─────────────────────────────▶ Errored ("null request")
//!   │
//!   ▼
//! FilterCheck ── skip ──▶ Skipped (nothing written)
//!   │    └────── error ─▶ Errored (one error line)
//!   ▼
//! Emitting: tls info, start line + headers, body, blank line
//! ```
//!
//! The event is rendered into a buffer first and written to the sink with a
//! single call once complete.

use std::borrow::Cow;
use std::fmt;
use std::io;

use bytes::{BufMut, BytesMut};
use http::{header, HeaderName, Request, Response};
use tracing::{debug, warn};

use crate::config::Config;
use crate::decode::{decode_body, Decoded};
use crate::event::{canonical_name, is_binary, Direction, PrintBody, TraceEvent};
use crate::filter::{BodyFilter, Filter};
use crate::format::{FormatTarget, Formatter, Formatters};
use crate::redact::Redactor;
use crate::render::{Line, Renderer};
use crate::sink::Sink;

const NULL_REQUEST: &str = "null request";
const NULL_RESPONSE: &str = "null response";

pub struct LoggerBuilder {
    config: Config,
    sink: Box<dyn Sink>,
    filter: Option<Box<dyn Filter>>,
    body_filter: Option<Box<dyn BodyFilter>>,
    redactor: Option<Box<dyn Redactor>>,
    formatters: Formatters,
}

impl LoggerBuilder {
    fn new() -> Self {
        Self {
            config: Config::default(),
            sink: Box::new(io::stderr()),
            filter: None,
            body_filter: None,
            redactor: None,
            formatters: Formatters::new(),
        }
    }

    /// Sets what gets printed.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Replaces the default sink, standard error.
    pub fn sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Sets the filter deciding whether an event is printed at all.
    pub fn filter<F: Filter + 'static>(mut self, filter: F) -> Self {
        self.filter = Some(Box::new(filter));
        self
    }

    /// Sets the filter deciding whether a body is printed.
    pub fn body_filter<F: BodyFilter + 'static>(mut self, body_filter: F) -> Self {
        self.body_filter = Some(Box::new(body_filter));
        self
    }

    /// Sets the redactor rewriting header values before they are printed.
    pub fn redactor<R: Redactor + 'static>(mut self, redactor: R) -> Self {
        self.redactor = Some(Box::new(redactor));
        self
    }

    /// Registers a formatter after the ones already registered.
    pub fn formatter<F: Formatter + 'static>(mut self, formatter: F) -> Self {
        self.formatters = self.formatters.add_last(formatter);
        self
    }

    /// Replaces every registered formatter.
    pub fn formatters(mut self, formatters: Formatters) -> Self {
        self.formatters = formatters;
        self
    }

    /// Builds the logger, which can no longer be reconfigured.
    pub fn build(self) -> Logger {
        Logger {
            renderer: Renderer::new(self.config.colors),
            config: self.config,
            sink: self.sink,
            filter: self.filter,
            body_filter: self.body_filter,
            redactor: self.redactor,
            formatters: self.formatters,
        }
    }
}

impl fmt::Debug for LoggerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerBuilder").field("config", &self.config).finish_non_exhaustive()
    }
}

/// Prints requests and responses to a sink.
///
/// A logger is immutable once built and can be shared between threads, for
/// instance through an `Arc`.
///
/// # Example
///
/// ```
/// use http::Request;
/// use micro_pretty::{BufferSink, Config, Logger};
///
/// let sink = BufferSink::new();
/// let logger = Logger::builder().config(Config::verbose()).sink(sink.clone()).build();
///
/// let req = Request::post("http://wxww.example.com/").body(()).unwrap();
/// logger.print_request(Some(&req)).unwrap();
///
/// assert_eq!(sink.to_string_lossy(), "> POST / HTTP/1.1\n> Host: wxww.example.com\n\n");
/// ```
pub struct Logger {
    config: Config,
    renderer: Renderer,
    sink: Box<dyn Sink>,
    filter: Option<Box<dyn Filter>>,
    body_filter: Option<Box<dyn BodyFilter>>,
    redactor: Option<Box<dyn Redactor>>,
    formatters: Formatters,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("config", &self.config)
            .field("filter", &self.filter.is_some())
            .field("body_filter", &self.body_filter.is_some())
            .field("redactor", &self.redactor.is_some())
            .field("formatters", &self.formatters)
            .finish_non_exhaustive()
    }
}

impl Logger {
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Prints a request.
    ///
    /// `None` prints `> error: null request`. The only error returned is the
    /// sink's own write error.
    pub fn print_request<B: PrintBody>(&self, req: Option<&Request<B>>) -> io::Result<()> {
        let block = self.render_request(req);
        self.write_block(&block)
    }

    /// Prints a response.
    ///
    /// `None` prints `< error: null response`. The only error returned is the
    /// sink's own write error.
    pub fn print_response<B: PrintBody>(&self, resp: Option<&Response<B>>) -> io::Result<()> {
        let block = self.render_response(resp);
        self.write_block(&block)
    }

    /// Renders a request without writing it.
    pub fn render_request<B: PrintBody>(&self, req: Option<&Request<B>>) -> BytesMut {
        let mut dst = BytesMut::new();
        match req {
            Some(req) => {
                self.render_event(&mut dst, &TraceEvent::from_request(req), false);
            }
            None => self.renderer.render(&mut dst, Direction::Request, &Line::Error(NULL_REQUEST)),
        }
        dst
    }

    /// Renders a response without writing it.
    pub fn render_response<B: PrintBody>(&self, resp: Option<&Response<B>>) -> BytesMut {
        let mut dst = BytesMut::new();
        match resp {
            Some(resp) => {
                self.render_event(&mut dst, &TraceEvent::from_response(resp), false);
            }
            None => self.renderer.render(&mut dst, Direction::Response, &Line::Error(NULL_RESPONSE)),
        }
        dst
    }

    /// Renders a request about to be sent, announcing it when `request_info` is on.
    ///
    /// Returns `None` when the filter skips the request, and with it the whole exchange.
    pub(crate) fn render_outgoing<B: PrintBody>(&self, req: &Request<B>) -> Option<BytesMut> {
        let mut dst = BytesMut::new();
        self.render_event(&mut dst, &TraceEvent::from_request(req), true).then_some(dst)
    }

    /// Renders a single error line for `direction`.
    pub(crate) fn render_error(&self, direction: Direction, msg: &str) -> BytesMut {
        let mut dst = BytesMut::new();
        self.renderer.render(&mut dst, direction, &Line::Error(msg));
        dst
    }

    /// Writes a rendered block, logging instead of returning a sink failure.
    pub(crate) fn emit(&self, block: &[u8]) {
        // already reported by write_block
        let _ignored = self.write_block(block);
    }

    fn write_block(&self, block: &[u8]) -> io::Result<()> {
        if block.is_empty() {
            return Ok(());
        }

        self.sink.write_block(block).inspect_err(|e| warn!(cause = %e, "failed to write http trace"))
    }

    /// Renders one event, returning `false` when the filter skipped it.
    fn render_event(&self, dst: &mut BytesMut, event: &TraceEvent<'_>, announce: bool) -> bool {
        let direction = event.direction();

        if let Some(filter) = &self.filter {
            match filter.filter(event) {
                Ok(true) => return false,
                Ok(false) => {}
                Err(e) => {
                    self.renderer.render(dst, direction, &Line::Error(&e.to_string()));
                    return true;
                }
            }
        }

        let start = dst.len();

        if announce && self.config.request_info {
            if let Some(uri) = event.uri() {
                self.info(dst, &format!("Request to {uri}"));
            }
        }

        if self.config.tls {
            self.render_tls(dst, event);
        }

        let (print_header, print_body, max_body) = match direction {
            Direction::Request => {
                (self.config.request_header, self.config.request_body, self.config.max_request_body)
            }
            Direction::Response => {
                (self.config.response_header, self.config.response_body, self.config.max_response_body)
            }
        };

        if print_header {
            self.render_start_line(dst, event);
            self.render_headers(dst, event);
        }

        if print_body {
            self.render_body(dst, event, max_body);
        }

        if dst.len() > start {
            dst.put_u8(b'\n');
        }
        true
    }

    fn render_tls(&self, dst: &mut BytesMut, event: &TraceEvent<'_>) {
        let Some(tls) = event.tls() else {
            return;
        };

        self.info(dst, &format!("TLS connection using {} / {}", tls.version(), tls.cipher_suite()));
        if let Some(alpn) = tls.alpn() {
            self.info(dst, &format!("ALPN: {alpn}"));
        }
        if let Some(server_name) = tls.server_name() {
            self.info(dst, &format!("Server name: {server_name}"));
        }
    }

    fn render_start_line(&self, dst: &mut BytesMut, event: &TraceEvent<'_>) {
        let protocol = format!("{:?}", event.version());

        let line = match (event.method(), event.target(), event.status()) {
            (Some(method), Some(target), _) => Line::RequestStart { method: method.as_str(), target, protocol: &protocol },
            (_, _, Some(status)) => Line::StatusStart { protocol: &protocol, status },
            _ => return,
        };

        self.renderer.render(dst, event.direction(), &line);
    }

    fn render_headers(&self, dst: &mut BytesMut, event: &TraceEvent<'_>) {
        let is_request = event.direction() == Direction::Request;

        if is_request && !self.config.skips_header(&header::HOST) {
            if let Some(host) = event.host() {
                self.render_header(dst, event.direction(), &header::HOST, &host);
            }
        }

        let mut names: Vec<&HeaderName> = event
            .headers()
            .keys()
            .filter(|name| !(is_request && **name == header::HOST))
            .filter(|name| !self.config.skips_header(name))
            .collect();
        names.sort_unstable_by(|a, b| a.as_str().cmp(b.as_str()));

        for name in names {
            for value in event.headers().get_all(name) {
                self.render_header(dst, event.direction(), name, &String::from_utf8_lossy(value.as_bytes()));
            }
        }
    }

    fn render_header(&self, dst: &mut BytesMut, direction: Direction, name: &HeaderName, value: &str) {
        let key = canonical_name(name);
        let value = match self.redactor.as_ref().and_then(|redactor| redactor.redact(name, value)) {
            Some(redacted) => Cow::Owned(redacted),
            None => Cow::Borrowed(value),
        };

        self.renderer.render(dst, direction, &Line::Header { key: &key, value: &value });
    }

    fn render_body(&self, dst: &mut BytesMut, event: &TraceEvent<'_>, max_body: u64) {
        let Some(body) = event.body().filter(|body| !body.is_empty()) else {
            return;
        };

        if let Some(body_filter) = &self.body_filter {
            match body_filter.skip_body(event) {
                Ok(true) => return,
                Ok(false) => {}
                Err(e) => {
                    self.info(dst, &format!("failed to filter {} body: {e}", event.direction().noun()));
                    return;
                }
            }
        }

        if body.len() as u64 > max_body {
            self.info(
                dst,
                &format!("body is too long ({} bytes) to print, skipping (longer than {max_body} bytes)", body.len()),
            );
            return;
        }

        let decoded = if self.config.decode_body { decode_body(event.content_encoding(), body, max_body) } else { None };
        let body: &[u8] = match &decoded {
            Some(Decoded::Body(decoded)) => decoded,
            Some(Decoded::TooLong) => {
                self.info(dst, &format!("decoded body is too long to print, skipping (longer than {max_body} bytes)"));
                return;
            }
            None => body,
        };

        let media_type = match &decoded {
            // the declared content type says nothing about undecoded bytes being readable
            None if event.content_encoding().is_some_and(|coding| !coding.eq_ignore_ascii_case("identity")) => {
                mime::APPLICATION_OCTET_STREAM
            }
            _ => event.media_type(),
        };

        if is_binary(&media_type) {
            self.info(dst, "body contains binary data");
            return;
        }

        let mut formatted = BytesMut::with_capacity(body.len());
        let printed: &[u8] = match self.formatters.find(&media_type) {
            Some(formatter) => match formatter.format(FormatTarget::Buffer(&mut formatted), body) {
                Ok(()) => &formatted,
                Err(e) => {
                    debug!(media_type = %media_type, cause = %e, "failed to format body, printing it raw");
                    body
                }
            },
            None => body,
        };

        self.renderer.render(dst, event.direction(), &Line::Body(printed));
    }

    #[inline]
    fn info(&self, dst: &mut BytesMut, text: &str) {
        self.renderer.render(dst, Direction::Request, &Line::Info(text));
    }
}
