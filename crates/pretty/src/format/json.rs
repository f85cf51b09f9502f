//! Pretty printing for JSON bodies.

use bytes::{BufMut, BytesMut};
use mime::Mime;
use serde::de::IgnoredAny;

use super::{FormatError, FormatTarget, Formatter};

const DEFAULT_INDENT: &str = "    ";

/// Re-indents `application/json` and `*/*+json` bodies.
///
/// The formatter only writes into [`FormatTarget::Buffer`]. The whole input
/// is validated first, then re-indented token by token: numbers, strings and
/// duplicate keys are written exactly as received, only whitespace changes.
/// Should re-indenting still fail half way, the buffer is truncated back to
/// its previous length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFormatter {
    indent: String,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::with_indent(DEFAULT_INDENT)
    }

    pub fn with_indent<S: Into<String>>(indent: S) -> Self {
        Self { indent: indent.into() }
    }

    fn reindent(&self, dst: &mut BytesMut, src: &[u8]) -> Result<(), &'static str> {
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;
        let mut i = 0;

        while i < src.len() {
            let b = src[i];
            i += 1;

            if in_string {
                dst.put_u8(b);
                if escaped {
                    escaped = false;
                } else if b == b'\\' {
                    escaped = true;
                } else if b == b'"' {
                    in_string = false;
                }
                continue;
            }

            match b {
                b' ' | b'\t' | b'\n' | b'\r' => {}
                b'"' => {
                    in_string = true;
                    dst.put_u8(b);
                }
                b'{' | b'[' => {
                    let close = if b == b'{' { b'}' } else { b']' };
                    let next = src[i..].iter().position(|c| !c.is_ascii_whitespace()).map(|n| i + n);
                    match next {
                        // empty containers stay on one line
                        Some(n) if src[n] == close => {
                            dst.put_u8(b);
                            dst.put_u8(close);
                            i = n + 1;
                        }
                        _ => {
                            depth += 1;
                            dst.put_u8(b);
                            self.newline(dst, depth);
                        }
                    }
                }
                b'}' | b']' => {
                    depth = depth.checked_sub(1).ok_or("unbalanced brackets")?;
                    self.newline(dst, depth);
                    dst.put_u8(b);
                }
                b',' => {
                    dst.put_u8(b);
                    self.newline(dst, depth);
                }
                b':' => dst.put_slice(b": "),
                _ => dst.put_u8(b),
            }
        }

        if in_string || depth != 0 {
            return Err("unterminated document");
        }
        Ok(())
    }

    #[inline]
    fn newline(&self, dst: &mut BytesMut, depth: usize) {
        dst.put_u8(b'\n');
        for _ in 0..depth {
            dst.put_slice(self.indent.as_bytes());
        }
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter for JsonFormatter {
    fn matches(&self, media_type: &Mime) -> bool {
        if media_type.type_() == mime::APPLICATION && media_type.subtype() == mime::JSON {
            return true;
        }
        matches!(media_type.suffix(), Some(suffix) if suffix == mime::JSON)
    }

    fn format(&self, dst: FormatTarget<'_>, src: &[u8]) -> Result<(), FormatError> {
        let FormatTarget::Buffer(buf) = dst else {
            return Err(FormatError::unbuffered_writer("JsonFormatter"));
        };

        serde_json::from_slice::<IgnoredAny>(src).map_err(FormatError::invalid_body)?;

        let start = buf.len();
        if let Err(reason) = self.reindent(buf, src) {
            buf.truncate(start);
            return Err(FormatError::invalid_body(reason));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn format(src: &str) -> Result<String, FormatError> {
        let mut buf = BytesMut::new();
        JsonFormatter::default().format(FormatTarget::Buffer(&mut buf), src.as_bytes())?;
        Ok(String::from_utf8(buf.to_vec()).unwrap())
    }

    #[test]
    fn matches_json_media_types() {
        let formatter = JsonFormatter::default();
        let matches = |s: &str| formatter.matches(&s.parse::<Mime>().unwrap());

        assert!(matches("application/json"));
        assert!(matches("application/json; charset=utf-8"));
        assert!(matches("application/problem+json"));
        assert!(matches("application/vnd.api+json"));
        assert!(!matches("text/plain"));
        assert!(!matches("application/xml"));
    }

    #[test]
    fn pretty_prints_in_key_order() {
        let got = format(r#"{"zeta":1,"alpha":[true,null,"x"],"nested":{"b":2.5,"a":"é"}}"#).unwrap();

        let want = indoc! {r#"
        {
            "zeta": 1,
            "alpha": [
                true,
                null,
                "x"
            ],
            "nested": {
                "b": 2.5,
                "a": "é"
            }
        }"#};

        assert_eq!(got, want);
    }

    #[test]
    fn custom_indent() {
        let mut buf = BytesMut::new();
        JsonFormatter::with_indent("\t").format(FormatTarget::Buffer(&mut buf), br#"{"a":[1]}"#).unwrap();
        assert_eq!(&buf[..], b"{\n\t\"a\": [\n\t\t1\n\t]\n}");
    }

    #[test]
    fn formatting_is_idempotent() {
        let src = r#"{"id": 7, "tags": ["a", "b"], "owner": {"name": "micro"}}"#;

        let first = format(src).unwrap();
        let second = format(src).unwrap();
        assert_eq!(first, second);

        let reformatted = format(&first).unwrap();
        assert_eq!(first, reformatted);
    }

    #[test]
    fn tokens_are_kept_verbatim() {
        let got = format(r#"{"id":12345678901234567890123,"a":1,"a":2,"x":1e3,"y":1.50,"s":"\u00e9 [x, y]: {z}"}"#).unwrap();

        let want = indoc! {r#"
        {
            "id": 12345678901234567890123,
            "a": 1,
            "a": 2,
            "x": 1e3,
            "y": 1.50,
            "s": "\u00e9 [x, y]: {z}"
        }"#};

        assert_eq!(got, want);
    }

    #[test]
    fn empty_containers_and_scalars() {
        assert_eq!(format(r#"{"a": { }, "b": [ ]}"#).unwrap(), "{\n    \"a\": {},\n    \"b\": []\n}");
        assert_eq!(format(" 42 ").unwrap(), "42");
        assert_eq!(format(r#""a\"b""#).unwrap(), r#""a\"b""#);
    }

    #[test]
    fn invalid_json_leaves_buffer_untouched() {
        let mut buf = BytesMut::from(&b"prefix"[..]);
        let result = JsonFormatter::default().format(FormatTarget::Buffer(&mut buf), br#"{"unterminated": "#);

        assert!(matches!(result, Err(FormatError::InvalidBody { .. })));
        assert_eq!(&buf[..], b"prefix");
    }

    #[test]
    fn appends_after_existing_content() {
        let mut buf = BytesMut::from(&b"> "[..]);
        JsonFormatter::default().format(FormatTarget::Buffer(&mut buf), b"[]").unwrap();
        assert_eq!(&buf[..], b"> []");
    }

    #[test]
    fn stream_target_is_rejected() {
        let mut stdout = std::io::stdout();
        let err = JsonFormatter::default().format(FormatTarget::Stream(&mut stdout), b"{}").unwrap_err();

        assert_eq!(err.to_string(), "underlying writer for JsonFormatter must be a buffer");
    }
}
