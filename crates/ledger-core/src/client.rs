//! Credentialed JSON HTTP client for the ledger API.
//!
//! Every request carries the session cookie and a JSON content type.
//! Non-2xx responses become [`LedgerError::Api`] with the raw body, and a
//! 204 decodes as JSON `null` so `()` targets succeed. Calls are single-shot:
//! there is no retry or backoff here.

use reqwest::header::{CONTENT_TYPE, COOKIE};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{LedgerError, LedgerResult};

/// Name of the cookie the API reads the session token from.
pub const SESSION_COOKIE: &str = "session";

/// HTTP client bound to one API base URL.
#[derive(Clone)]
pub struct HttpClient {
    base_url: String,
    session: Option<String>,
    client: reqwest::Client,
}

impl HttpClient {
    /// Create a client from resolved configuration.
    pub fn new(config: &Config) -> LedgerResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        debug!(base_url = %config.base_url(), has_session = config.session.is_some(), "HttpClient initialized");

        Ok(Self {
            base_url: config.base_url().to_string(),
            session: config.session.clone(),
            client,
        })
    }

    /// Create a client for a base URL with no session.
    pub fn with_url(base_url: &str) -> LedgerResult<Self> {
        let config = Config {
            api_url: base_url.to_string(),
            ..Config::default()
        };
        Self::new(&config)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET path`.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> LedgerResult<T> {
        self.send(Method::GET, path, None).await
    }

    /// `POST path`, with a JSON body when one is given.
    pub async fn post<T, B>(&self, path: &str, body: Option<&B>) -> LedgerResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = body.map(serde_json::to_vec).transpose()?;
        self.send(Method::POST, path, body).await
    }

    /// `PATCH path` with a JSON body.
    pub async fn patch<T, B>(&self, path: &str, body: &B) -> LedgerResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_vec(body)?;
        self.send(Method::PATCH, path, Some(body)).await
    }

    /// `DELETE path`.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> LedgerResult<T> {
        self.send(Method::DELETE, path, None).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path))
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = &self.session {
            builder = builder.header(COOKIE, format!("{}={}", SESSION_COOKIE, token));
        }
        builder
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> LedgerResult<T> {
        let mut builder = self.request(method.clone(), path);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        debug!(method = %method, path = %path, status = status.as_u16(), "API response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(method = %method, path = %path, status = status.as_u16(), "API request failed");
            return Err(LedgerError::Api {
                status: status.as_u16(),
                body,
            });
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(serde_json::from_value(serde_json::Value::Null)?);
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::{HeaderMap, StatusCode as AxumStatus},
        routing::{delete, get, post},
        Json, Router,
    };
    use serde_json::{json, Value};

    async fn echo_headers(headers: HeaderMap) -> Json<Value> {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        Json(json!({
            "cookie": header("cookie"),
            "content_type": header("content-type"),
        }))
    }

    async fn echo_body(body: String) -> Json<Value> {
        Json(json!({ "body": body }))
    }

    async fn spawn_server() -> String {
        let router = Router::new()
            .route("/api/headers", get(echo_headers))
            .route("/api/echo", post(echo_body))
            .route("/api/gone", delete(|| async { AxumStatus::NO_CONTENT }))
            .route(
                "/api/missing",
                get(|| async { (AxumStatus::NOT_FOUND, r#"{"detail":"Decision not found"}"#) }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client(base_url: &str, session: Option<&str>) -> HttpClient {
        let config = Config {
            api_url: base_url.to_string(),
            session: session.map(str::to_string),
            ..Config::default()
        };
        HttpClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_sends_session_cookie_and_json_content_type() {
        let base = spawn_server().await;
        let value: Value = client(&base, Some("tok-1")).get("/api/headers").await.unwrap();
        assert_eq!(value["cookie"], "session=tok-1");
        assert_eq!(value["content_type"], "application/json");
    }

    #[tokio::test]
    async fn test_no_cookie_without_session() {
        let base = spawn_server().await;
        let value: Value = client(&base, None).get("/api/headers").await.unwrap();
        assert!(value["cookie"].is_null());
    }

    #[tokio::test]
    async fn test_post_encodes_json_body() {
        let base = spawn_server().await;
        let value: Value = client(&base, None)
            .post("/api/echo", Some(&json!({"query": "why", "limit": 5})))
            .await
            .unwrap();
        let sent: Value = serde_json::from_str(value["body"].as_str().unwrap()).unwrap();
        assert_eq!(sent, json!({"query": "why", "limit": 5}));
    }

    #[tokio::test]
    async fn test_post_without_body_sends_nothing() {
        let base = spawn_server().await;
        let value: Value = client(&base, None)
            .post::<_, ()>("/api/echo", None)
            .await
            .unwrap();
        assert_eq!(value["body"], "");
    }

    #[tokio::test]
    async fn test_no_content_yields_unit() {
        let base = spawn_server().await;
        let c = client(&base, None);
        let () = c.delete("/api/gone").await.unwrap();
        let maybe: Option<Value> = c.delete("/api/gone").await.unwrap();
        assert!(maybe.is_none());
    }

    #[tokio::test]
    async fn test_non_success_carries_status_and_raw_body() {
        let base = spawn_server().await;
        let err = client(&base, None)
            .get::<Value>("/api/missing")
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), r#"404: {"detail":"Decision not found"}"#);
    }

    #[tokio::test]
    async fn test_connection_failure_is_http_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(&format!("http://{}", addr), None)
            .get::<Value>("/api/headers")
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Http(_)));
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let c = HttpClient::with_url("http://localhost:8000/").unwrap();
        assert_eq!(c.base_url(), "http://localhost:8000");
    }
}
