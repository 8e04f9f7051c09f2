//! HTTP client for the Kruize REST API.
//!
//! One method per endpoint. Every method performs exactly one request and
//! hands back the raw [`ApiResponse`] whatever its status code, so callers
//! can assert on failures as well as successes. Only local problems (an
//! unreadable payload file, a transport failure) surface as [`ClientError`].

mod bulk;
mod datasources;
mod experiments;
pub mod logging;
mod metric_profiles;
mod query;
mod recommendations;

pub use datasources::MetadataQuery;
pub use experiments::ExperimentQuery;
pub use logging::BodyFormat;
pub use query::QueryString;
pub use recommendations::RecommendationQuery;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::discovery::BaseUrl;
use crate::payload::PayloadError;

pub const JSON_CONTENT_TYPE: &str = "application/json";
/// Deliberately wrong content type used to exercise input validation.
pub const INVALID_CONTENT_TYPE: &str = "application/xml";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Payload(#[from] PayloadError),

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Raw response of one endpoint call, body already read.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl ApiResponse {
    async fn read(url: &str, response: reqwest::Response) -> Result<Self, ClientError> {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await.map_err(|source| ClientError::Transport {
            url: url.to_string(),
            source,
        })?;
        Ok(Self {
            status,
            headers,
            body,
        })
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Parse the body as JSON.
    pub fn json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// Client bound to one resolved Kruize base address.
#[derive(Clone)]
pub struct KruizeClient {
    base_url: BaseUrl,
    http: reqwest::Client,
    log_bodies: bool,
}

impl KruizeClient {
    pub fn new(base_url: BaseUrl) -> Self {
        Self::with_http_client(base_url, reqwest::Client::new())
    }

    pub fn with_http_client(base_url: BaseUrl, http: reqwest::Client) -> Self {
        Self {
            base_url,
            http,
            log_bodies: true,
        }
    }

    /// Enable or disable response body logging for all endpoints.
    pub fn with_body_logging(mut self, enabled: bool) -> Self {
        self.log_bodies = enabled;
        self
    }

    pub fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    fn url(&self, path: &str, query: &QueryString) -> String {
        query.apply(self.base_url.join(path))
    }

    /// Send one request and log its outcome.
    ///
    /// With a body, the content type is JSON unless `invalid_header` asks for
    /// the wrong one. Without a body a content type is only sent when
    /// `invalid_header` is set.
    async fn send(
        &self,
        endpoint: &str,
        method: Method,
        url: String,
        body: Option<&Value>,
        invalid_header: bool,
        log_body: bool,
    ) -> Result<ApiResponse, ClientError> {
        info!("{} URL = {}", method, url);

        let mut request = self.http.request(method, &url);
        if invalid_header {
            info!("Invalid header");
            request = request.header(CONTENT_TYPE, HeaderValue::from_static(INVALID_CONTENT_TYPE));
        } else if body.is_some() {
            request = request.header(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        }
        if let Some(body) = body {
            request = request.body(serde_json::to_vec(body)?);
        }

        let response = request
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.clone(),
                source,
            })?;
        let response = ApiResponse::read(&url, response).await?;

        logging::log_response(endpoint, &response, log_body && self.log_bodies);
        Ok(response)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! In-process echo server for exercising the client end to end.

    use std::sync::{Arc, Mutex};

    use axum::body::Bytes;
    use axum::extract::State;
    use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
    use axum::response::{IntoResponse, Response};
    use axum::Router;

    use super::{KruizeClient, INVALID_CONTENT_TYPE};
    use crate::discovery::BaseUrl;

    #[derive(Debug, Clone)]
    pub struct RecordedRequest {
        pub method: String,
        pub path: String,
        pub query: Option<String>,
        pub content_type: Option<String>,
        pub body: String,
    }

    #[derive(Clone, Default)]
    struct MockState {
        requests: Arc<Mutex<Vec<RecordedRequest>>>,
    }

    pub struct MockServer {
        base_url: BaseUrl,
        state: MockState,
    }

    /// Echo the request body. Requests sent as XML are rejected with 415
    /// the way the real service rejects them.
    async fn record(
        State(state): State<MockState>,
        method: Method,
        uri: Uri,
        headers: HeaderMap,
        body: Bytes,
    ) -> Response {
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        state.requests.lock().unwrap().push(RecordedRequest {
            method: method.to_string(),
            path: uri.path().to_string(),
            query: uri.query().map(str::to_string),
            content_type: content_type.clone(),
            body: String::from_utf8_lossy(&body).into_owned(),
        });

        if content_type.as_deref() == Some(INVALID_CONTENT_TYPE) {
            let error = r#"{"message":"Unsupported media type","httpcode":415,"status":"ERROR"}"#;
            return (StatusCode::UNSUPPORTED_MEDIA_TYPE, error).into_response();
        }
        (StatusCode::OK, body).into_response()
    }

    impl MockServer {
        pub async fn start() -> Self {
            let state = MockState::default();
            let app = Router::new().fallback(record).with_state(state.clone());

            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });

            Self {
                base_url: BaseUrl::from_address(&addr.to_string()).unwrap(),
                state,
            }
        }

        pub fn client(&self) -> KruizeClient {
            let http = reqwest::Client::builder().no_proxy().build().unwrap();
            KruizeClient::with_http_client(self.base_url.clone(), http)
        }

        pub fn requests(&self) -> Vec<RecordedRequest> {
            self.state.requests.lock().unwrap().clone()
        }

        /// The single request received so far.
        pub fn only_request(&self) -> RecordedRequest {
            let requests = self.requests();
            assert_eq!(requests.len(), 1, "expected exactly one request: {requests:?}");
            requests.into_iter().next().unwrap()
        }
    }

    /// Write `contents` to a temporary JSON file.
    pub fn json_file(contents: &serde_json::Value) -> tempfile::NamedTempFile {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", contents).unwrap();
        file
    }
}
