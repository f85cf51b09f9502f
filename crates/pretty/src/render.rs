//! Line rendering with optional ANSI styling.
//!
//! The [`Renderer`] turns [`Line`] instructions into bytes. Lines are written
//! in the order they are given; the renderer adds no timestamps or anything
//! else that would make two renderings of the same lines differ.
//!
//! With colors enabled every part of a start or header line is wrapped in its
//! own escape sequence (`ESC[<codes>m ... ESC[0m`). Removing those sequences
//! gives exactly the plain rendering.

use bytes::{BufMut, BytesMut};
use http::StatusCode;

use crate::event::Direction;

/// ANSI SGR codes used by the palette.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Ansi {
    Reset,
    Bold,
    FgRed,
    FgGreen,
    FgYellow,
    FgBlue,
}

impl Ansi {
    #[inline]
    pub fn code(self) -> &'static str {
        match self {
            Ansi::Reset => "0",
            Ansi::Bold => "1",
            Ansi::FgRed => "31",
            Ansi::FgGreen => "32",
            Ansi::FgYellow => "33",
            Ansi::FgBlue => "34",
        }
    }
}

/// An ordered set of SGR codes, written joined by `;`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Style(&'static [Ansi]);

impl Style {
    pub const fn new(codes: &'static [Ansi]) -> Self {
        Self(codes)
    }

    pub fn codes(&self) -> &'static [Ansi] {
        self.0
    }
}

/// Semantic role of a rendered fragment.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Role {
    Method,
    Path,
    Protocol,
    Status(StatusCode),
    HeaderKey,
    Separator,
    HeaderValue,
}

impl Role {
    pub fn style(self) -> Style {
        const BOLD_BLUE: Style = Style::new(&[Ansi::FgBlue, Ansi::Bold]);
        const BLUE: Style = Style::new(&[Ansi::FgBlue]);
        const YELLOW: Style = Style::new(&[Ansi::FgYellow]);
        const RED: Style = Style::new(&[Ansi::FgRed]);
        const GREEN: Style = Style::new(&[Ansi::FgGreen]);

        match self {
            Role::Method | Role::HeaderKey => BOLD_BLUE,
            Role::Path | Role::HeaderValue => YELLOW,
            Role::Protocol => BLUE,
            Role::Separator => RED,
            Role::Status(status) if status.as_u16() < 400 => GREEN,
            Role::Status(_) => RED,
        }
    }
}

/// One rendering instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// `METHOD target PROTOCOL`
    RequestStart { method: &'a str, target: &'a str, protocol: &'a str },
    /// `PROTOCOL status reason`
    StatusStart { protocol: &'a str, status: StatusCode },
    /// `Key: value`
    Header { key: &'a str, value: &'a str },
    /// `* text`, never prefixed by the direction
    Info(&'a str),
    /// `error: msg`, never styled
    Error(&'a str),
    /// Body bytes written as they are, newline terminated
    Body(&'a [u8]),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Renderer {
    colors: bool,
}

impl Renderer {
    pub fn new(colors: bool) -> Self {
        Self { colors }
    }

    #[inline]
    pub fn colors(&self) -> bool {
        self.colors
    }

    /// Appends `line` to `dst`.
    pub fn render(&self, dst: &mut BytesMut, direction: Direction, line: &Line<'_>) {
        match *line {
            Line::RequestStart { method, target, protocol } => {
                self.prefix(dst, direction);
                self.paint(dst, Role::Method, method);
                dst.put_u8(b' ');
                self.paint(dst, Role::Path, target);
                dst.put_u8(b' ');
                self.paint(dst, Role::Protocol, protocol);
                dst.put_u8(b'\n');
            }
            Line::StatusStart { protocol, status } => {
                self.prefix(dst, direction);
                self.paint(dst, Role::Protocol, protocol);
                dst.put_u8(b' ');
                match status.canonical_reason() {
                    Some(reason) => self.paint(dst, Role::Status(status), &format!("{} {reason}", status.as_str())),
                    None => self.paint(dst, Role::Status(status), status.as_str()),
                }
                dst.put_u8(b'\n');
            }
            Line::Header { key, value } => {
                self.prefix(dst, direction);
                self.paint(dst, Role::HeaderKey, key);
                self.paint(dst, Role::Separator, ":");
                dst.put_u8(b' ');
                self.paint(dst, Role::HeaderValue, value);
                dst.put_u8(b'\n');
            }
            Line::Info(text) => {
                dst.put_slice(b"* ");
                dst.put_slice(text.as_bytes());
                dst.put_u8(b'\n');
            }
            Line::Error(msg) => {
                self.prefix(dst, direction);
                dst.put_slice(b"error: ");
                dst.put_slice(msg.as_bytes());
                dst.put_u8(b'\n');
            }
            Line::Body(body) => {
                if body.is_empty() {
                    return;
                }
                dst.put_slice(body);
                if !body.ends_with(b"\n") {
                    dst.put_u8(b'\n');
                }
            }
        }
    }

    #[inline]
    fn prefix(&self, dst: &mut BytesMut, direction: Direction) {
        let mut utf8 = [0u8; 4];
        dst.put_slice(direction.prefix().encode_utf8(&mut utf8).as_bytes());
        dst.put_u8(b' ');
    }

    fn paint(&self, dst: &mut BytesMut, role: Role, text: &str) {
        if !self.colors {
            dst.put_slice(text.as_bytes());
            return;
        }

        dst.put_slice(b"\x1b[");
        for (i, code) in role.style().codes().iter().enumerate() {
            if i > 0 {
                dst.put_u8(b';');
            }
            dst.put_slice(code.code().as_bytes());
        }
        dst.put_u8(b'm');
        dst.put_slice(text.as_bytes());
        dst.put_slice(b"\x1b[");
        dst.put_slice(Ansi::Reset.code().as_bytes());
        dst.put_u8(b'm');
    }
}

/// Removes every `ESC[...m` sequence from `src`.
pub fn strip_ansi(src: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(src.len());
    let mut i = 0;
    while i < src.len() {
        if src[i] == 0x1b && src.get(i + 1) == Some(&b'[') {
            match src[i + 2..].iter().position(|&b| b == b'm') {
                Some(end) => {
                    i += end + 3;
                    continue;
                }
                None => break,
            }
        }
        out.push(src[i]);
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(colors: bool, direction: Direction, lines: &[Line<'_>]) -> String {
        let renderer = Renderer::new(colors);
        let mut dst = BytesMut::new();
        for line in lines {
            renderer.render(&mut dst, direction, line);
        }
        String::from_utf8(dst.to_vec()).unwrap()
    }

    const REQUEST: [Line<'static>; 2] = [
        Line::RequestStart { method: "POST", target: "/", protocol: "HTTP/1.1" },
        Line::Header { key: "Host", value: "wxww.example.com" },
    ];

    #[test]
    fn plain_request_lines() {
        assert_eq!(render(false, Direction::Request, &REQUEST), "> POST / HTTP/1.1\n> Host: wxww.example.com\n");
    }

    #[test]
    fn colored_request_lines() {
        let want = "> \x1b[34;1mPOST\x1b[0m \x1b[33m/\x1b[0m \x1b[34mHTTP/1.1\x1b[0m\n\
                    > \x1b[34;1mHost\x1b[0m\x1b[31m:\x1b[0m \x1b[33mwxww.example.com\x1b[0m\n";
        assert_eq!(render(true, Direction::Request, &REQUEST), want);
    }

    #[test]
    fn status_lines() {
        let lines = [Line::StatusStart { protocol: "HTTP/1.1", status: StatusCode::OK }];
        assert_eq!(render(false, Direction::Response, &lines), "< HTTP/1.1 200 OK\n");
        assert_eq!(render(true, Direction::Response, &lines), "< \x1b[34mHTTP/1.1\x1b[0m \x1b[32m200 OK\x1b[0m\n");

        let lines = [Line::StatusStart { protocol: "HTTP/1.1", status: StatusCode::NOT_FOUND }];
        assert_eq!(render(true, Direction::Response, &lines), "< \x1b[34mHTTP/1.1\x1b[0m \x1b[31m404 Not Found\x1b[0m\n");

        let lines = [Line::StatusStart { protocol: "HTTP/1.1", status: StatusCode::from_u16(599).unwrap() }];
        assert_eq!(render(false, Direction::Response, &lines), "< HTTP/1.1 599\n");
    }

    #[test]
    fn info_error_and_body_lines_are_never_styled() {
        let lines = [Line::Info("body contains binary data"), Line::Error("null response"), Line::Body(b"ok")];
        let want = "* body contains binary data\n< error: null response\nok\n";

        assert_eq!(render(false, Direction::Response, &lines), want);
        assert_eq!(render(true, Direction::Response, &lines), want);
    }

    #[test]
    fn body_newline_is_not_doubled() {
        assert_eq!(render(false, Direction::Request, &[Line::Body(b"line\n")]), "line\n");
        assert_eq!(render(false, Direction::Request, &[Line::Body(b"")]), "");
    }

    #[test]
    fn stripping_colors_gives_plain_output() {
        let colored = render(true, Direction::Request, &REQUEST);
        let plain = render(false, Direction::Request, &REQUEST);
        assert_eq!(strip_ansi(colored.as_bytes()), plain.as_bytes());
    }

    #[test]
    fn rendering_is_deterministic() {
        assert_eq!(render(true, Direction::Request, &REQUEST), render(true, Direction::Request, &REQUEST));
    }
}
