//! Body formatters and the registry selecting them by media type.
//!
//! A [`Formatter`] turns the raw bytes of a body into a human-readable form.
//! The [`Formatters`] registry is an ordered list: the first formatter whose
//! [`Formatter::matches`] accepts the media type of the body is used.
//!
//! Formatting is best effort. The printer always hands formatters a
//! [`FormatTarget::Buffer`] and prints the raw body whenever no formatter
//! matches or the chosen one fails, so a formatter can never break the
//! trace.
//!
//! # Examples
//!
//! ```
//! use micro_pretty::format::{fn_formatter, Formatters, JsonFormatter, MediaMatch};
//!
//! let formatters = Formatters::new()
//!     .add_last(JsonFormatter::default())
//!     .add_last(fn_formatter(MediaMatch::prefix("text/"), |mut dst, src| {
//!         dst.write_all(&src.to_ascii_uppercase())?;
//!         Ok(())
//!     }));
//!
//! assert_eq!(formatters.len(), 2);
//! ```

mod error;
mod json;

use std::fmt;
use std::io;
use std::io::Write;

use bytes::BytesMut;
use mime::Mime;

pub use error::FormatError;
pub use json::JsonFormatter;

/// Destination of a formatter.
pub enum FormatTarget<'a> {
    /// An in-memory buffer; formatters may inspect and roll back what they wrote
    Buffer(&'a mut BytesMut),
    /// Any byte stream; written bytes cannot be taken back
    Stream(&'a mut dyn Write),
}

impl FormatTarget<'_> {
    pub fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        match self {
            FormatTarget::Buffer(buf) => {
                buf.extend_from_slice(bytes);
                Ok(())
            }
            FormatTarget::Stream(writer) => writer.write_all(bytes),
        }
    }

    #[inline]
    pub fn is_buffer(&self) -> bool {
        matches!(self, FormatTarget::Buffer(_))
    }
}

impl fmt::Debug for FormatTarget<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatTarget::Buffer(buf) => f.debug_tuple("Buffer").field(&buf.len()).finish(),
            FormatTarget::Stream(_) => f.write_str("Stream"),
        }
    }
}

/// Strategy rendering a body of some media types in a readable way.
pub trait Formatter: Send + Sync {
    /// Whether this formatter handles bodies of `media_type`.
    ///
    /// Parameters such as `charset` are already part of the parsed [`Mime`];
    /// implementations usually only look at the essence.
    fn matches(&self, media_type: &Mime) -> bool;

    /// Writes the formatted form of `src` into `dst`.
    fn format(&self, dst: FormatTarget<'_>, src: &[u8]) -> Result<(), FormatError>;
}

/// Media type matching on the essence (`type/subtype`), case insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaMatch {
    Exact(String),
    Prefix(String),
}

impl MediaMatch {
    pub fn exact<S: Into<String>>(essence: S) -> Self {
        Self::Exact(essence.into())
    }

    pub fn prefix<S: Into<String>>(prefix: S) -> Self {
        Self::Prefix(prefix.into())
    }

    pub fn matches(&self, media_type: &Mime) -> bool {
        let essence = media_type.essence_str().as_bytes();
        match self {
            MediaMatch::Exact(expected) => essence.eq_ignore_ascii_case(expected.as_bytes()),
            MediaMatch::Prefix(prefix) => {
                essence.len() >= prefix.len() && essence[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
            }
        }
    }
}

struct FnFormatter<F> {
    media: MediaMatch,
    f: F,
}

impl<F> Formatter for FnFormatter<F>
where
    F: Fn(FormatTarget<'_>, &[u8]) -> Result<(), FormatError> + Send + Sync,
{
    #[inline]
    fn matches(&self, media_type: &Mime) -> bool {
        self.media.matches(media_type)
    }

    #[inline]
    fn format(&self, dst: FormatTarget<'_>, src: &[u8]) -> Result<(), FormatError> {
        (self.f)(dst, src)
    }
}

/// Creates a [`Formatter`] from a media matcher and a closure.
pub fn fn_formatter<F>(media: MediaMatch, f: F) -> impl Formatter
where
    F: Fn(FormatTarget<'_>, &[u8]) -> Result<(), FormatError> + Send + Sync,
{
    FnFormatter { media, f }
}

/// Ordered formatter registry, first match wins.
#[derive(Default)]
pub struct Formatters {
    inner: Vec<Box<dyn Formatter>>,
}

impl Formatters {
    pub fn new() -> Self {
        Self { inner: vec![] }
    }

    pub fn add_last<F: Formatter + 'static>(mut self, formatter: F) -> Self {
        self.inner.push(Box::new(formatter));
        self
    }

    pub fn add_first<F: Formatter + 'static>(mut self, formatter: F) -> Self {
        self.inner.insert(0, Box::new(formatter));
        self
    }

    /// Returns the first registered formatter accepting `media_type`.
    pub fn find(&self, media_type: &Mime) -> Option<&dyn Formatter> {
        self.inner.iter().find(|formatter| formatter.matches(media_type)).map(Box::as_ref)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl fmt::Debug for Formatters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Formatters").field("len", &self.inner.len()).finish()
    }
}
