use std::sync::Arc;
use std::thread;

use bytes::{Bytes, BytesMut};
use http::{header, Request, Response, StatusCode};
use indoc::indoc;
use micro_pretty::filter::{any_filter, fn_filter, path_prefix_filter};
use micro_pretty::format::{FormatError, FormatTarget, Formatter, JsonFormatter};
use micro_pretty::render::strip_ansi;
use micro_pretty::transport::{make_transport, BoxError};
use micro_pretty::{BufferSink, Config, Logger, LoggingTransport, Transport};

fn logger_with(config: Config) -> (Logger, BufferSink) {
    let sink = BufferSink::new();
    let logger = Logger::builder().config(config).formatter(JsonFormatter::default()).sink(sink.clone()).build();
    (logger, sink)
}

fn exchange() -> (Request<Bytes>, Response<Bytes>) {
    let req = Request::post("http://api.example.com/v1/items?limit=2")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ACCEPT, "application/json")
        .body(Bytes::from_static(br#"{"name":"widget","tags":["a","b"]}"#))
        .unwrap();
    let resp = Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header(header::CONTENT_TYPE, "application/problem+json")
        .body(Bytes::from_static(br#"{"title":"not found"}"#))
        .unwrap();
    (req, resp)
}

#[test]
fn absent_messages() {
    let (logger, sink) = logger_with(Config::default());

    logger.print_request::<()>(None).unwrap();
    logger.print_response::<()>(None).unwrap();

    assert_eq!(sink.to_string_lossy(), "> error: null request\n< error: null response\n");
}

#[test]
fn full_exchange() {
    let (logger, sink) = logger_with(Config::verbose());
    let (req, resp) = exchange();

    logger.print_request(Some(&req)).unwrap();
    logger.print_response(Some(&resp)).unwrap();

    let want = indoc! {r#"
        > POST /v1/items?limit=2 HTTP/1.1
        > Host: api.example.com
        > Accept: application/json
        > Content-Type: application/json
        {
            "name": "widget",
            "tags": [
                "a",
                "b"
            ]
        }

        < HTTP/1.1 404 Not Found
        < Content-Type: application/problem+json
        {
            "title": "not found"
        }

    "#};
    assert_eq!(sink.to_string_lossy(), want);
}

#[test]
fn colors_only_add_escape_sequences() {
    let (req, resp) = exchange();

    let (plain, plain_sink) = logger_with(Config::verbose());
    let (colored, colored_sink) = logger_with(Config { colors: true, ..Config::verbose() });

    for logger in [&plain, &colored] {
        logger.print_request(Some(&req)).unwrap();
        logger.print_response(Some(&resp)).unwrap();
    }

    let colored_out = colored_sink.contents();
    assert_ne!(colored_out, plain_sink.contents());
    assert_eq!(strip_ansi(&colored_out), plain_sink.contents().to_vec());
}

#[test]
fn error_status_is_red() {
    let (logger, _sink) = logger_with(Config { colors: true, ..Config::verbose() });
    let (_, resp) = exchange();

    let block = logger.render_response(Some(&resp));
    let text = String::from_utf8_lossy(&block);

    assert!(text.starts_with("< \x1b[34mHTTP/1.1\x1b[0m \x1b[31m404 Not Found\x1b[0m\n"), "{text}");
}

#[test]
fn printing_twice_gives_the_same_output() {
    let (logger, sink) = logger_with(Config::verbose());
    let (req, resp) = exchange();

    logger.print_request(Some(&req)).unwrap();
    logger.print_response(Some(&resp)).unwrap();
    let first = sink.contents();

    sink.clear();
    logger.print_request(Some(&req)).unwrap();
    logger.print_response(Some(&resp)).unwrap();

    assert_eq!(sink.contents(), first);
}

#[test]
fn composed_filters() {
    let sink = BufferSink::new();
    let mut filter = any_filter();
    filter
        .or(path_prefix_filter("/health"))
        .or(fn_filter(|event| Ok(event.headers().contains_key("x-no-log"))));
    let logger = Logger::builder().config(Config::verbose()).filter(filter).sink(sink.clone()).build();

    logger.print_request(Some(&Request::get("http://example.com/healthz").body(()).unwrap())).unwrap();
    logger.print_request(Some(&Request::get("http://example.com/a").header("x-no-log", "1").body(()).unwrap())).unwrap();
    logger.print_request(Some(&Request::get("http://example.com/b").body(()).unwrap())).unwrap();

    assert_eq!(sink.to_string_lossy(), "> GET /b HTTP/1.1\n> Host: example.com\n\n");
}

#[test]
fn json_formatter_needs_a_buffer() {
    let formatter = JsonFormatter::default();
    let mut out = Vec::new();

    let err = formatter.format(FormatTarget::Stream(&mut out), b"{}").unwrap_err();

    assert!(matches!(err, FormatError::UnbufferedWriter { .. }));
    assert_eq!(err.to_string(), "underlying writer for JsonFormatter must be a buffer");
    assert!(out.is_empty());

    let mut buf = BytesMut::new();
    formatter.format(FormatTarget::Buffer(&mut buf), b"[1,2]").unwrap();
    assert_eq!(&buf[..], b"[\n    1,\n    2\n]");
}

#[test]
fn concurrent_prints_do_not_interleave() {
    let (logger, sink) = logger_with(Config::verbose());
    let logger = Arc::new(logger);
    let (req, _) = exchange();
    let block = logger.render_request(Some(&req));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let logger = Arc::clone(&logger);
            let req = req.clone();
            thread::spawn(move || {
                for _ in 0..25 {
                    logger.print_request(Some(&req)).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let out = sink.contents();
    assert_eq!(out.len(), block.len() * 100);
    assert!(out.chunks(block.len()).all(|chunk| chunk == &block[..]));
}

#[test]
fn config_from_json() {
    let config: Config = serde_json::from_str(indoc! {r#"
        {
            "request_header": true,
            "response_header": true,
            "skip_headers": ["Date"],
            "max_response_body": 16
        }
    "#})
    .unwrap();

    assert!(config.request_header && config.response_header);
    assert!(!config.request_body && !config.colors);
    assert!(config.decode_body);
    assert_eq!(config.max_request_body, 4096);
    assert_eq!(config.max_response_body, 16);
    assert_eq!(config.skip_headers, vec!["Date".to_string()]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn logging_transport_round_trip() {
    let (logger, sink) = logger_with(Config { request_body: false, response_header: false, ..Config::verbose() });
    let upstream = make_transport(|_req: Request<Bytes>| async {
        Ok::<_, BoxError>(
            Response::builder()
                .header(header::CONTENT_TYPE, "application/json")
                .body(Bytes::from_static(br#"{"ok":true}"#))
                .unwrap(),
        )
    });
    let transport = LoggingTransport::new(upstream, Arc::new(logger));
    let (req, _) = exchange();

    let resp = transport.send(req).await.unwrap();
    assert_eq!(resp.body(), &Bytes::from_static(br#"{"ok":true}"#));

    let want = indoc! {r#"
        * Request to http://api.example.com/v1/items?limit=2
        > POST /v1/items?limit=2 HTTP/1.1
        > Host: api.example.com
        > Accept: application/json
        > Content-Type: application/json

        {
            "ok": true
        }

    "#};
    assert_eq!(sink.to_string_lossy(), want);
}
