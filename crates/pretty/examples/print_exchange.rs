//! Prints a fake client exchange to stderr.
//!
//! ```sh
//! cargo run -p micro-pretty --example print_exchange
//! ```

use std::sync::Arc;

use bytes::Bytes;
use http::{header, Request, Response, StatusCode};
use micro_pretty::format::JsonFormatter;
use micro_pretty::redact::CredentialRedactor;
use micro_pretty::transport::{make_transport, BoxError};
use micro_pretty::{Config, Logger, LoggingTransport, TlsInfo, Transport};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

async fn fake_upstream(req: Request<Bytes>) -> Result<Response<Bytes>, BoxError> {
    info!(uri = %req.uri(), "upstream received request");

    let body = format!(r#"{{"path":"{}","items":[{{"id":1,"name":"widget"}},{{"id":2,"name":"gadget"}}]}}"#, req.uri().path());
    let mut resp = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::SET_COOKIE, "session=6f1c2a; Path=/; HttpOnly")
        .body(Bytes::from(body))?;
    resp.extensions_mut().insert(TlsInfo::new("TLSv1.3", "TLS_AES_128_GCM_SHA256").with_alpn("http/1.1"));
    Ok(resp)
}

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let logger = Logger::builder()
        .config(Config { colors: true, ..Config::verbose() })
        .formatter(JsonFormatter::default())
        .redactor(CredentialRedactor)
        .build();

    let transport = LoggingTransport::new(make_transport(fake_upstream), Arc::new(logger));

    let req = Request::get("https://api.example.com/items?page=1")
        .header(header::AUTHORIZATION, "Bearer not-a-real-token")
        .header(header::ACCEPT, "application/json")
        .body(Bytes::new())
        .expect("request should be valid");

    match transport.send(req).await {
        Ok(resp) => info!(status = %resp.status(), "exchange finished"),
        Err(e) => error!(cause = %e, "exchange failed"),
    }
}
