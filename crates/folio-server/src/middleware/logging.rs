//! Un span por request; status y latencia se registran al terminar.

use axum::{
    body::Body,
    http::{Request, Response, StatusCode},
};
use std::task::{Context, Poll};
use std::time::Instant;
use tower::{Layer, Service};
use tracing::{Instrument, Span, field};

use super::BoxFuture;
use super::request_id::REQUEST_ID_HEADER;

#[derive(Clone, Default)]
pub struct LoggingLayer;

impl<S> Layer<S> for LoggingLayer {
    type Service = LoggingMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        LoggingMiddleware { inner }
    }
}

/// Wraps each request in an `http_request` span.
///
/// Catalog and cache spans opened by handlers nest under it, so every log
/// line of a request carries its request id.
#[derive(Clone)]
pub struct LoggingMiddleware<S> {
    inner: S,
}

fn request_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "http_request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
        status = field::Empty,
        latency_ms = field::Empty,
    )
}

fn log_outcome(status: StatusCode, started: Instant) {
    let span = Span::current();
    span.record("status", status.as_u16());
    span.record("latency_ms", started.elapsed().as_millis() as u64);

    if status.is_server_error() {
        tracing::error!("request failed");
    } else if status.is_client_error() {
        tracing::info!("request rejected");
    } else {
        tracing::info!("request served");
    }
}

impl<S> Service<Request<Body>> for LoggingMiddleware<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response<Body>;
    type Error = S::Error;
    type Future = BoxFuture<Self::Response, Self::Error>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let span = request_span(&request);
        let started = Instant::now();

        let clone = self.inner.clone();
        let mut ready = std::mem::replace(&mut self.inner, clone);

        Box::pin(
            async move {
                tracing::debug!("request received");
                let response = ready.call(request).await?;
                log_outcome(response.status(), started);
                Ok(response)
            }
            .instrument(span),
        )
    }
}
