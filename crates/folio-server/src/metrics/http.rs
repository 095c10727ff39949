//! HTTP metrics middleware.

use std::time::Instant;

use axum::{extract::MatchedPath, extract::Request, middleware::Next, response::Response};
use metrics::{counter, gauge, histogram};

/// Label used for requests that matched no route. Raw paths carry
/// titles and authors, so they are never used as label values.
const UNMATCHED_ROUTE: &str = "unmatched";

/// Cuenta y cronometra cada request, etiquetado por la ruta registrada.
pub async fn http_metrics_middleware(
    route: Option<MatchedPath>,
    request: Request,
    next: Next,
) -> Response {
    let started = Instant::now();
    let method = request.method().as_str().to_owned();
    let route = route.map_or_else(|| UNMATCHED_ROUTE.to_owned(), |r| r.as_str().to_owned());

    let in_flight = gauge!("folio_http_requests_in_flight");
    in_flight.increment(1.0);
    let response = next.run(request).await;
    in_flight.decrement(1.0);

    histogram!(
        "folio_http_request_duration_seconds",
        "method" => method.clone(),
        "route" => route.clone()
    )
    .record(started.elapsed().as_secs_f64());

    counter!(
        "folio_http_requests_total",
        "method" => method,
        "route" => route,
        "status" => response.status().as_u16().to_string()
    )
    .increment(1);

    response
}

/// Describe las series `folio_http_*`.
pub fn register_http_metrics() {
    metrics::describe_counter!(
        "folio_http_requests_total",
        "Requests answered, by method, route and status"
    );
    metrics::describe_histogram!(
        "folio_http_request_duration_seconds",
        "Wall time from request arrival to response, in seconds"
    );
    metrics::describe_gauge!(
        "folio_http_requests_in_flight",
        "Number of HTTP requests currently being served"
    );
}
