//! The request-issuing transport.
//!
//! Every backend call goes through [`ApiClient::request`]: it joins the endpoint
//! onto the base URL, merges headers, attaches the bearer token from the
//! session store and classifies failures into [`ApiError`]. It has no side
//! effects on the session.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, instrument, warn};

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::session::SessionStore;

/// Timeout of the admin dashboard client.
pub const ADMIN_TIMEOUT: Duration = Duration::from_secs(90);

/// Timeout used by the storefront unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Method, extra headers and JSON body of one call.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<serde_json::Value>,
}

impl RequestOptions {
    #[must_use]
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` if `body` cannot be represented as JSON.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, serde_json::Error> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    #[must_use]
    pub fn header(mut self, name: reqwest::header::HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Configured backend client.
///
/// Cheap to clone; clones share the connection pool and the session store.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: String,
    session: Arc<dyn SessionStore>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Build a client with its own connection pool.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Build` if the HTTP client fails to build.
    pub fn new(
        config: &ApiConfig,
        session: Arc<dyn SessionStore>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Build)?;
        Ok(Self::with_http(http, &config.base_url, session))
    }

    /// Client for the admin dashboard, with the 90 s timeout.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Build` if the HTTP client fails to build.
    pub fn admin(config: &ApiConfig, session: Arc<dyn SessionStore>) -> Result<Self, ApiError> {
        Self::new(config, session, ADMIN_TIMEOUT)
    }

    /// Reuse an existing `reqwest::Client` (and its timeout) with a different session.
    #[must_use]
    pub fn with_http(
        http: reqwest::Client,
        base_url: impl Into<String>,
        session: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: base_url.into(),
                session,
            }),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    #[must_use]
    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.inner.session
    }

    /// Absolute URL for an endpoint path.
    #[must_use]
    pub fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{endpoint}", self.inner.base_url)
        } else {
            format!("{}/{endpoint}", self.inner.base_url)
        }
    }

    fn headers(&self, extra: HeaderMap) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in &extra {
            headers.insert(name, value.clone());
        }

        if let Some(token) = self.inner.session.token() {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|e| ApiError::InvalidHeader(format!("authorization: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        Ok(headers)
    }

    /// Issue one request and decode the JSON response.
    ///
    /// # Errors
    ///
    /// - `ApiError::Unauthorized` on `401`
    /// - `ApiError::Status` on any other non-2xx status
    /// - `ApiError::Timeout` / `ApiError::Network` when no response arrives
    /// - `ApiError::Decode` when a 2xx body does not match `T`
    #[instrument(skip(self, options), fields(method = %options.method))]
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let headers = self.headers(options.headers)?;
        let mut builder = self
            .inner
            .http
            .request(options.method, self.url(endpoint))
            .headers(headers);

        if let Some(body) = &options.body {
            let bytes = serde_json::to_vec(body).map_err(|source| ApiError::Encode {
                endpoint: endpoint.to_string(),
                source,
            })?;
            builder = builder.body(bytes);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| transport_error(endpoint, e))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| transport_error(endpoint, e))?;

        if status.is_success() {
            debug!(status = status.as_u16(), "Request succeeded");
            let body: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
                b"null"
            } else {
                &bytes
            };
            return serde_json::from_slice(body).map_err(|source| ApiError::Decode {
                endpoint: endpoint.to_string(),
                source,
            });
        }

        let message = serde_json::from_slice::<ErrorBody>(&bytes)
            .ok()
            .and_then(|body| body.message);

        if status == StatusCode::UNAUTHORIZED {
            warn!(message = ?message, "Request rejected as unauthorized");
            return Err(ApiError::Unauthorized {
                endpoint: endpoint.to_string(),
                message,
            });
        }

        warn!(status = status.as_u16(), message = ?message, "Request failed");
        Err(ApiError::Status {
            status,
            endpoint: endpoint.to_string(),
            message,
        })
    }

    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.request(endpoint, RequestOptions::new(Method::GET)).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn post<T, B>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(endpoint, with_body(Method::POST, endpoint, body)?)
            .await
    }

    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn put<T, B>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(endpoint, with_body(Method::PUT, endpoint, body)?)
            .await
    }

    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.request(endpoint, RequestOptions::new(Method::DELETE))
            .await
    }

    /// `DELETE` carrying a JSON body, as `/wishlist/remove` expects.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn delete_with_body<T, B>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(endpoint, with_body(Method::DELETE, endpoint, body)?)
            .await
    }
}

fn with_body<B: Serialize + ?Sized>(
    method: Method,
    endpoint: &str,
    body: &B,
) -> Result<RequestOptions, ApiError> {
    RequestOptions::new(method)
        .json(body)
        .map_err(|source| ApiError::Encode {
            endpoint: endpoint.to_string(),
            source,
        })
}

fn transport_error(endpoint: &str, e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        warn!(endpoint, "Request timed out");
        return ApiError::Timeout {
            endpoint: endpoint.to_string(),
        };
    }

    error!(
        endpoint,
        error = %e,
        is_connect = e.is_connect(),
        "Network error: no response from server"
    );
    ApiError::Network {
        endpoint: endpoint.to_string(),
        source: e,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::session::MemorySessionStore;
    use serde_json::{Value, json};
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer, store: MemorySessionStore) -> ApiClient {
        let config = ApiConfig {
            base_url: format!("{}/api", server.uri()),
            is_production: false,
        };
        ApiClient::new(&config, Arc::new(store), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_url_joining() {
        let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
        let client = ApiClient::with_http(reqwest::Client::new(), "http://api/api", store);
        assert_eq!(client.url("/products"), "http://api/api/products");
        assert_eq!(client.url("products"), "http://api/api/products");
    }

    #[tokio::test]
    async fn test_no_token_sends_no_authorization() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "products": [], "total": 0 })))
            .mount(&server)
            .await;

        let client = client(&server, MemorySessionStore::new());
        let _: Value = client.get("/products").await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].headers.get("authorization").is_none());
        assert_eq!(
            requests[0].headers.get("content-type").unwrap(),
            "application/json"
        );
    }

    #[tokio::test]
    async fn test_token_sent_as_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/cart"))
            .and(header("authorization", "Bearer abc.def"))
            .and(body_json(json!({ "productId": "p1", "quantity": 2 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server, MemorySessionStore::from_token("abc.def"));
        let body: Value = client
            .post("/cart", &json!({ "productId": "p1", "quantity": 2 }))
            .await
            .unwrap();
        assert_eq!(body["success"], json!(true));
    }

    #[tokio::test]
    async fn test_caller_headers_merge() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let client = client(&server, MemorySessionStore::from_token("t"));
        let options = RequestOptions::new(Method::GET)
            .header(CONTENT_TYPE, HeaderValue::from_static("text/plain"))
            .header(AUTHORIZATION, HeaderValue::from_static("Bearer caller"));
        let _: Value = client.request("stats", options).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests[0].headers.get("content-type").unwrap(), "text/plain");
        assert_eq!(requests[0].headers.get("authorization").unwrap(), "Bearer t");
    }

    #[tokio::test]
    async fn test_unauthorized_is_typed_and_leaves_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/auth/profile"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Not authorized, token failed" })))
            .mount(&server)
            .await;

        let store = Arc::new(MemorySessionStore::from_token("expired"));
        let config = ApiConfig {
            base_url: format!("{}/api", server.uri()),
            is_production: false,
        };
        let client = ApiClient::new(&config, store.clone(), Duration::from_secs(5)).unwrap();
        let err = client.get::<Value>("/auth/profile").await.unwrap_err();

        assert!(err.is_unauthorized());
        assert_eq!(err.user_message(), "Not authorized, token failed");
        assert!(store.token().is_some());
    }

    #[tokio::test]
    async fn test_error_status_carries_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products/p9"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Product not found" })))
            .mount(&server)
            .await;

        let err = client(&server, MemorySessionStore::new())
            .get::<Value>("/products/p9")
            .await
            .unwrap_err();
        match err {
            ApiError::Status { status, message, .. } => {
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert_eq!(message.as_deref(), Some("Product not found"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_success_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/cart"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let body: Option<Value> = client(&server, MemorySessionStore::new())
            .delete("/cart")
            .await
            .unwrap();
        assert!(body.is_none());
    }

    #[tokio::test]
    async fn test_timeout_is_transient() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/slow"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let config = ApiConfig {
            base_url: format!("{}/api", server.uri()),
            is_production: false,
        };
        let client = ApiClient::new(
            &config,
            Arc::new(MemorySessionStore::new()),
            Duration::from_millis(50),
        )
        .unwrap();

        let err = client.get::<Value>("/slow").await.unwrap_err();
        assert!(matches!(err, ApiError::Timeout { .. }));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_connection_refused_is_network() {
        let config = ApiConfig {
            base_url: "http://127.0.0.1:1/api".to_string(),
            is_production: false,
        };
        let client = ApiClient::new(
            &config,
            Arc::new(MemorySessionStore::new()),
            Duration::from_secs(2),
        )
        .unwrap();

        let err = client.get::<Value>("/products").await.unwrap_err();
        assert!(matches!(err, ApiError::Network { .. }));
        assert!(err.is_transient());
    }
}
