//! X-Request-Id: se respeta el id entrante o se genera un UUID v4.

use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Request, Response},
};
use std::task::{Context, Poll};
use tower::{Layer, Service};
use uuid::Uuid;

use super::BoxFuture;

pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Ids entrantes mas largos se descartan.
const MAX_REQUEST_ID_LEN: usize = 128;

#[derive(Clone, Default)]
pub struct RequestIdLayer;

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdMiddleware { inner }
    }
}

/// Stamps the id on the request before the inner service runs and
/// copies it onto the response afterwards.
#[derive(Clone)]
pub struct RequestIdMiddleware<S> {
    inner: S,
}

fn is_usable(value: &HeaderValue) -> bool {
    !value.is_empty() && value.len() <= MAX_REQUEST_ID_LEN && value.to_str().is_ok()
}

fn fresh_request_id() -> HeaderValue {
    let id = Uuid::new_v4().hyphenated().to_string();
    HeaderValue::from_str(&id).unwrap_or_else(|_| HeaderValue::from_static("unknown"))
}

impl<S> Service<Request<Body>> for RequestIdMiddleware<S>
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

    fn call(&mut self, mut request: Request<Body>) -> Self::Future {
        let id = match request.headers().get(&REQUEST_ID_HEADER) {
            Some(incoming) if is_usable(incoming) => incoming.clone(),
            _ => fresh_request_id(),
        };
        request
            .headers_mut()
            .insert(REQUEST_ID_HEADER.clone(), id.clone());

        // Take the service that was driven to readiness
        let clone = self.inner.clone();
        let mut ready = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let mut response = ready.call(request).await?;
            response.headers_mut().insert(REQUEST_ID_HEADER.clone(), id);
            Ok(response)
        })
    }
}
