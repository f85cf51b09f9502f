//! The borrowed view of a single request or response being printed.
//!
//! A [`TraceEvent`] is built per print call from an `http::Request` or
//! `http::Response` and dropped right after. Filters, body filters and the
//! printer itself only ever look at the event, never at the host's request
//! type, so the same pipeline serves both directions.

use std::borrow::Cow;

use bytes::{Bytes, BytesMut};
use http::{header, HeaderMap, HeaderName, Method, Request, Response, StatusCode, Uri, Version};
use mime::Mime;

/// Which side of the exchange an event belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    /// An outgoing request, printed with the `>` prefix
    Request,
    /// An incoming response, printed with the `<` prefix
    Response,
}

impl Direction {
    /// Returns the symbol starting every line of this direction.
    #[inline]
    pub fn prefix(self) -> char {
        match self {
            Direction::Request => '>',
            Direction::Response => '<',
        }
    }

    #[inline]
    pub(crate) fn noun(self) -> &'static str {
        match self {
            Direction::Request => "request",
            Direction::Response => "response",
        }
    }
}

/// TLS connection metadata.
///
/// The host client attaches it to a request or response through
/// [`http::Extensions`]; when it is present and TLS printing is enabled the
/// connection details are printed before the start line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsInfo {
    version: String,
    cipher_suite: String,
    server_name: Option<String>,
    alpn: Option<String>,
}

impl TlsInfo {
    pub fn new<V: Into<String>, C: Into<String>>(version: V, cipher_suite: C) -> Self {
        Self { version: version.into(), cipher_suite: cipher_suite.into(), server_name: None, alpn: None }
    }

    pub fn with_server_name<S: Into<String>>(mut self, server_name: S) -> Self {
        self.server_name = Some(server_name.into());
        self
    }

    pub fn with_alpn<S: Into<String>>(mut self, alpn: S) -> Self {
        self.alpn = Some(alpn.into());
        self
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn cipher_suite(&self) -> &str {
        &self.cipher_suite
    }

    pub fn server_name(&self) -> Option<&str> {
        self.server_name.as_deref()
    }

    pub fn alpn(&self) -> Option<&str> {
        self.alpn.as_deref()
    }
}

/// Body types the printer knows how to read without consuming them.
///
/// `None` means the message carries no body at all, which is different from
/// an empty one only for custom implementations; the printer skips both.
pub trait PrintBody {
    fn body_bytes(&self) -> Option<&[u8]>;
}

impl PrintBody for () {
    #[inline]
    fn body_bytes(&self) -> Option<&[u8]> {
        None
    }
}

impl<B: PrintBody> PrintBody for Option<B> {
    #[inline]
    fn body_bytes(&self) -> Option<&[u8]> {
        self.as_ref().and_then(PrintBody::body_bytes)
    }
}

macro_rules! bytes_body {
    ($($ty:ty),* $(,)?) => {
        $(
            impl PrintBody for $ty {
                #[inline]
                fn body_bytes(&self) -> Option<&[u8]> {
                    Some(AsRef::<[u8]>::as_ref(self))
                }
            }
        )*
    };
}

bytes_body!(Bytes, BytesMut, Vec<u8>, String, &'static str, &[u8]);

/// The part of an event that differs between requests and responses.
#[derive(Debug, Clone, Copy)]
pub enum Head<'a> {
    Request { method: &'a Method, uri: &'a Uri },
    Response { status: StatusCode },
}

/// One request or response as seen by the printing pipeline.
#[derive(Debug, Clone, Copy)]
pub struct TraceEvent<'a> {
    head: Head<'a>,
    version: Version,
    headers: &'a HeaderMap,
    body: Option<&'a [u8]>,
    tls: Option<&'a TlsInfo>,
}

impl<'a> TraceEvent<'a> {
    pub fn from_request<B: PrintBody>(req: &'a Request<B>) -> Self {
        Self {
            head: Head::Request { method: req.method(), uri: req.uri() },
            version: req.version(),
            headers: req.headers(),
            body: req.body().body_bytes(),
            tls: req.extensions().get::<TlsInfo>(),
        }
    }

    pub fn from_response<B: PrintBody>(resp: &'a Response<B>) -> Self {
        Self {
            head: Head::Response { status: resp.status() },
            version: resp.version(),
            headers: resp.headers(),
            body: resp.body().body_bytes(),
            tls: resp.extensions().get::<TlsInfo>(),
        }
    }

    pub fn direction(&self) -> Direction {
        match self.head {
            Head::Request { .. } => Direction::Request,
            Head::Response { .. } => Direction::Response,
        }
    }

    pub fn head(&self) -> Head<'a> {
        self.head
    }

    /// Returns the request method, `None` for responses.
    pub fn method(&self) -> Option<&'a Method> {
        match self.head {
            Head::Request { method, .. } => Some(method),
            Head::Response { .. } => None,
        }
    }

    /// Returns the request URI, `None` for responses.
    pub fn uri(&self) -> Option<&'a Uri> {
        match self.head {
            Head::Request { uri, .. } => Some(uri),
            Head::Response { .. } => None,
        }
    }

    /// Returns the response status, `None` for requests.
    pub fn status(&self) -> Option<StatusCode> {
        match self.head {
            Head::Request { .. } => None,
            Head::Response { status } => Some(status),
        }
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn headers(&self) -> &'a HeaderMap {
        self.headers
    }

    pub fn body(&self) -> Option<&'a [u8]> {
        self.body
    }

    pub fn tls(&self) -> Option<&'a TlsInfo> {
        self.tls
    }

    /// Returns the request target as it appears in the start line.
    pub fn target(&self) -> Option<&'a str> {
        let (method, uri) = match self.head {
            Head::Request { method, uri } => (method, uri),
            Head::Response { .. } => return None,
        };

        if *method == Method::CONNECT {
            if let Some(authority) = uri.authority() {
                return Some(authority.as_str());
            }
        }

        Some(uri.path_and_query().map_or("/", |path_and_query| path_and_query.as_str()))
    }

    /// Returns the host a request is addressed to.
    ///
    /// An explicit `Host` header wins, otherwise the URI authority (without
    /// user info) is used. Responses have no host.
    pub fn host(&self) -> Option<Cow<'a, str>> {
        let uri = self.uri()?;

        if let Some(value) = self.headers.get(header::HOST) {
            return Some(String::from_utf8_lossy(value.as_bytes()));
        }

        let host = uri.host()?;
        match uri.port_u16() {
            Some(port) => Some(Cow::Owned(format!("{host}:{port}"))),
            None => Some(Cow::Borrowed(host)),
        }
    }

    /// Returns the declared content encoding, if any.
    pub fn content_encoding(&self) -> Option<&'a str> {
        self.headers.get(header::CONTENT_ENCODING).and_then(|value| value.to_str().ok()).map(str::trim)
    }

    /// Returns the declared media type, falling back to sniffing the body
    /// when `Content-Type` is missing or cannot be parsed.
    pub fn media_type(&self) -> Mime {
        self.declared_media_type().unwrap_or_else(|| sniff(self.body.unwrap_or_default()))
    }

    fn declared_media_type(&self) -> Option<Mime> {
        self.headers.get(header::CONTENT_TYPE)?.to_str().ok()?.parse().ok()
    }
}

/// Guesses the media type of an undeclared body.
pub(crate) fn sniff(body: &[u8]) -> Mime {
    match std::str::from_utf8(body) {
        Ok(text) if !text.chars().any(|c| c.is_control() && !matches!(c, '\t' | '\n' | '\r')) => {
            mime::TEXT_PLAIN_UTF_8
        }
        _ => mime::APPLICATION_OCTET_STREAM,
    }
}

/// Whether a media type should be reported instead of printed.
pub(crate) fn is_binary(media_type: &Mime) -> bool {
    if media_type.type_() == mime::TEXT {
        return false;
    }

    if matches!(media_type.suffix(), Some(suffix) if suffix == mime::JSON || suffix == mime::XML) {
        return false;
    }

    if media_type.type_() == mime::APPLICATION {
        return !matches!(
            media_type.subtype().as_str(),
            "json"
                | "xml"
                | "javascript"
                | "ecmascript"
                | "x-www-form-urlencoded"
                | "graphql"
                | "x-ndjson"
                | "yaml"
                | "x-yaml"
                | "toml"
        );
    }

    true
}

/// Canonical form of a header name: `content-type` becomes `Content-Type`.
pub(crate) fn canonical_name(name: &HeaderName) -> String {
    let mut upper = true;
    name.as_str()
        .chars()
        .map(|c| {
            let out = if upper { c.to_ascii_uppercase() } else { c };
            upper = c == '-';
            out
        })
        .collect()
}
