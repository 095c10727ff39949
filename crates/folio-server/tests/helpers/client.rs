//! In-process HTTP client over the router (no sockets).

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tower::ServiceExt;

#[derive(Clone)]
pub struct TestClient {
    app: Router,
}

impl TestClient {
    pub fn new(app: Router) -> Self {
        Self { app }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, &[], Body::empty()).await
    }

    pub async fn get_with_headers(&self, uri: &str, headers: Vec<(&str, &str)>) -> TestResponse {
        self.send(Method::GET, uri, &headers, Body::empty()).await
    }

    pub async fn post_json<T: Serialize>(&self, uri: &str, body: &T) -> TestResponse {
        self.send_json(Method::POST, uri, body).await
    }

    pub async fn put_json<T: Serialize>(&self, uri: &str, body: &T) -> TestResponse {
        self.send_json(Method::PUT, uri, body).await
    }

    /// POST de un body arbitrario, p. ej. JSON malformado.
    pub async fn post_raw(&self, uri: &str, body: &str) -> TestResponse {
        let json = [(header::CONTENT_TYPE.as_str(), "application/json")];
        self.send(Method::POST, uri, &json, Body::from(body.to_owned()))
            .await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, &[], Body::empty()).await
    }

    async fn send_json<T: Serialize>(&self, method: Method, uri: &str, body: &T) -> TestResponse {
        let bytes = serde_json::to_vec(body).expect("serializable body");
        let json = [(header::CONTENT_TYPE.as_str(), "application/json")];
        self.send(method, uri, &json, Body::from(bytes)).await
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        headers: &[(&str, &str)],
        body: Body,
    ) -> TestResponse {
        let request = headers
            .iter()
            .fold(Request::builder().method(method).uri(uri), |b, (k, v)| {
                b.header(*k, *v)
            })
            .body(body)
            .expect("valid request");

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let (parts, body) = response.into_parts();
        let body = body
            .collect()
            .await
            .expect("readable body")
            .to_bytes()
            .to_vec();

        TestResponse {
            status: parts.status,
            headers: parts.headers,
            body,
        }
    }
}

/// Respuesta ya recolectada, con assertions encadenables.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body)
            .unwrap_or_else(|e| panic!("body is not the expected JSON ({e}): {}", self.text()))
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(self.status, expected, "unexpected status, body: {}", self.text());
        self
    }

    pub fn assert_header_exists(&self, name: &str) -> &Self {
        assert!(self.headers.contains_key(name), "missing header '{name}'");
        self
    }

    pub fn assert_header(&self, name: &str, expected: &str) -> &Self {
        assert_eq!(self.header(name), Some(expected), "header '{name}'");
        self
    }

    /// Checks the `{"error", "message"}` body of a failed request.
    pub fn assert_error_message_contains(&self, fragment: &str) -> &Self {
        let body: serde_json::Value = self.json();
        assert!(body["error"].is_string(), "no 'error' field in {body}");

        let message = body["message"].as_str().unwrap_or_default();
        assert!(
            message.contains(fragment),
            "message '{message}' does not mention '{fragment}'"
        );
        self
    }
}
