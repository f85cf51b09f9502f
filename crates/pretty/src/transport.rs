//! A client transport printing every exchange passing through it.
//!
//! [`LoggingTransport`] wraps any [`Transport`] the way a logging
//! round-tripper wraps an HTTP client: the request is printed before it is
//! forwarded, the response (or the transport error) once it is back. The
//! inner result is returned untouched.
//!
//! Bodies are printed from memory, so streaming bodies have to be buffered
//! first with [`collect_request`] / [`collect_response`].

use std::error::Error;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use http::{Request, Response};
use http_body::Body;
use http_body_util::BodyExt;

use crate::event::Direction;
use crate::logger::Logger;

pub type BoxError = Box<dyn Error + Send + Sync>;

/// Something able to send a request and wait for its response.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, req: Request<Bytes>) -> Result<Response<Bytes>, BoxError>;
}

#[derive(Debug)]
pub struct TransportFn<F> {
    f: F,
}

#[async_trait]
impl<F, Fut> Transport for TransportFn<F>
where
    F: Fn(Request<Bytes>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Response<Bytes>, BoxError>> + Send,
{
    async fn send(&self, req: Request<Bytes>) -> Result<Response<Bytes>, BoxError> {
        (self.f)(req).await
    }
}

/// Creates a [`Transport`] from an async function.
pub fn make_transport<F, Fut>(f: F) -> TransportFn<F>
where
    F: Fn(Request<Bytes>) -> Fut,
    Fut: Future<Output = Result<Response<Bytes>, BoxError>>,
{
    TransportFn { f }
}

/// Prints requests and responses going through the inner transport.
#[derive(Debug)]
pub struct LoggingTransport<T> {
    inner: T,
    logger: Arc<Logger>,
}

impl<T> LoggingTransport<T> {
    pub fn new(inner: T, logger: Arc<Logger>) -> Self {
        Self { inner, logger }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[async_trait]
impl<T: Transport> Transport for LoggingTransport<T> {
    async fn send(&self, req: Request<Bytes>) -> Result<Response<Bytes>, BoxError> {
        let Some(block) = self.logger.render_outgoing(&req) else {
            return self.inner.send(req).await;
        };
        self.logger.emit(&block);

        let result = self.inner.send(req).await;

        match &result {
            Ok(resp) => self.logger.emit(&self.logger.render_response(Some(resp))),
            Err(e) => self.logger.emit(&self.logger.render_error(Direction::Response, &e.to_string())),
        }

        result
    }
}

/// Buffers the body of a request so it can be printed.
pub async fn collect_request<B: Body>(req: Request<B>) -> Result<Request<Bytes>, B::Error> {
    let (parts, body) = req.into_parts();
    let bytes = body.collect().await?.to_bytes();
    Ok(Request::from_parts(parts, bytes))
}

/// Buffers the body of a response so it can be printed.
pub async fn collect_response<B: Body>(resp: Response<B>) -> Result<Response<Bytes>, B::Error> {
    let (parts, body) = resp.into_parts();
    let bytes = body.collect().await?.to_bytes();
    Ok(Response::from_parts(parts, bytes))
}
