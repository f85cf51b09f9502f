//! Decoding of content-encoded bodies before they are printed.

use std::io;
use std::io::Read;

use tracing::debug;

/// Size of the internal buffer of the brotli decompressor.
const BROTLI_BUFFER_SIZE: usize = 4096;

/// Supported content codings.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Decoder {
    /// Gzip decoding.
    Gzip,
    /// Deflate decoding, zlib framed as HTTP requires.
    Deflate,
    /// Brotli decoding.
    Br,
    /// Zstd decoding.
    Zstd,
}

/// Result of decoding a body within a size limit.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Decoded {
    /// The complete decoded body
    Body(Vec<u8>),
    /// The decoded body is larger than the limit
    TooLong,
}

impl Decoder {
    /// Selects a decoder from a `Content-Encoding` value.
    ///
    /// Returns `None` for `identity` and for unknown or stacked codings.
    pub(crate) fn select(content_encoding: &str) -> Option<Self> {
        let coding = content_encoding.trim();
        if coding.eq_ignore_ascii_case("gzip") || coding.eq_ignore_ascii_case("x-gzip") {
            Some(Self::Gzip)
        } else if coding.eq_ignore_ascii_case("deflate") {
            Some(Self::Deflate)
        } else if coding.eq_ignore_ascii_case("br") {
            Some(Self::Br)
        } else if coding.eq_ignore_ascii_case("zstd") {
            Some(Self::Zstd)
        } else {
            None
        }
    }

    /// Returns the name of the encoding.
    pub(crate) fn name(self) -> &'static str {
        match self {
            Decoder::Gzip => "gzip",
            Decoder::Deflate => "deflate",
            Decoder::Br => "br",
            Decoder::Zstd => "zstd",
        }
    }

    /// Decodes `src`, reading at most `limit + 1` decoded bytes.
    pub(crate) fn decode(self, src: &[u8], limit: u64) -> io::Result<Decoded> {
        let reader: Box<dyn Read + '_> = match self {
            Decoder::Gzip => Box::new(flate2::read::GzDecoder::new(src)),
            Decoder::Deflate => Box::new(flate2::read::ZlibDecoder::new(src)),
            Decoder::Br => Box::new(brotli::Decompressor::new(src, BROTLI_BUFFER_SIZE)),
            Decoder::Zstd => Box::new(zstd::stream::read::Decoder::new(src)?),
        };

        let mut decoded = Vec::new();
        reader.take(limit.saturating_add(1)).read_to_end(&mut decoded)?;

        if decoded.len() as u64 > limit {
            return Ok(Decoded::TooLong);
        }
        Ok(Decoded::Body(decoded))
    }
}

/// Decodes a body with the coding named in `content_encoding`.
///
/// Returns `None` when the body must be printed as is: no or unknown coding,
/// or a corrupt body.
pub(crate) fn decode_body(content_encoding: Option<&str>, body: &[u8], limit: u64) -> Option<Decoded> {
    let decoder = Decoder::select(content_encoding?)?;
    match decoder.decode(body, limit) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            debug!(encoding = decoder.name(), cause = %e, "failed to decode body, printing it undecoded");
            None
        }
    }
}
