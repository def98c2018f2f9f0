use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Client as ReqwestClient, Response, StatusCode, header};
use serde::Deserialize;
use tokio::time::sleep;
use url::Url;

use crate::client_logger::ClientLogger;
use crate::error::{Error, Result};
use crate::observability::{
    CLIENT_REQUEST_ERRORS, CLIENT_REQUEST_RETRIES, CLIENT_REQUESTS, CLIENT_RETRY_BACKOFF,
    HISTORY_DELETES, HISTORY_REQUESTS,
};
use crate::types::{ChatReply, ChatRequest, ChatResponseBody, SessionDetail, SessionSummary};

const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000/";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Retries permitted after the initial attempt when the backend throttles.
const THROTTLE_RETRIES: u32 = 3;

/// Backoff before the first throttled retry; doubles each cycle.
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

/// Transport operations the chat controller and session store depend on.
///
/// [`Galen`] is the production implementation; tests substitute doubles.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Send one chat message and decode the reply.
    ///
    /// A safety-blocked reply resolves as `Ok` with
    /// [`ChatReply::safety_blocked`] set.
    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply>;

    /// Fetch the session listing, most recent first.
    async fn list_sessions(&self) -> Result<Vec<SessionSummary>>;

    /// Fetch the full message history of one session.
    async fn fetch_session(&self, id: &str) -> Result<SessionDetail>;

    /// Delete one session. An id the backend no longer knows reports
    /// `Error::NotFound`; the session store treats that as success.
    async fn delete_session(&self, id: &str) -> Result<()>;
}

/// Client for the medical assistant chat backend.
#[derive(Clone)]
pub struct Galen {
    client: ReqwestClient,
    base_url: String,
    timeout: Duration,
    logger: Option<Arc<dyn ClientLogger>>,
}

impl Galen {
    /// Create a new client.
    ///
    /// The base URL defaults to the development proxy's address when not
    /// provided.
    pub fn new(base_url: Option<String>) -> Result<Self> {
        Self::with_options(base_url, None)
    }

    /// Create a new client with custom settings.
    pub fn with_options(base_url: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        let base_url =
            normalize_base_url(base_url.unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string()))?;
        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("failed to build HTTP client: {e}"),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            client,
            base_url,
            timeout,
            logger: None,
        })
    }

    /// Install a logger that observes replies and session listings.
    pub fn with_logger(mut self, logger: Arc<dyn ClientLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// The backend base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create and return default headers for backend requests.
    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    /// Map a reqwest-level failure to our error type.
    fn map_request_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::timeout(
                format!("request timed out: {e}"),
                Some(self.timeout.as_secs_f64()),
            )
        } else if e.is_connect() {
            Error::connection(format!("connection error: {e}"), Some(Box::new(e)))
        } else {
            Error::http_client(format!("request failed: {e}"), Some(Box::new(e)))
        }
    }

    /// Process a non-2xx response and convert it to our error type.
    async fn process_error_response(response: Response) -> Error {
        let status_code = response.status().as_u16();

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|val| val.to_str().ok())
            .and_then(|val| val.parse::<u64>().ok());

        #[derive(Deserialize)]
        struct ErrorResponse {
            error: Option<ErrorField>,
        }

        // The proxy reports `{"error": "msg"}`; a pass-through deployment
        // forwards the provider's `{"error": {"message", "status"}}`.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum ErrorField {
            Message(String),
            Detail {
                message: Option<String>,
                status: Option<String>,
            },
        }

        let error_body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::http_client(
                    format!("failed to read error response: {e}"),
                    Some(Box::new(e)),
                );
            }
        };

        let error_message = serde_json::from_str::<ErrorResponse>(&error_body)
            .ok()
            .and_then(|parsed| parsed.error)
            .map(|field| match field {
                ErrorField::Message(message) => message,
                ErrorField::Detail { message, status } => message
                    .or(status)
                    .unwrap_or_else(|| format!("backend returned status {status_code}")),
            })
            .unwrap_or_else(|| {
                if error_body.is_empty() {
                    format!("backend returned status {status_code}")
                } else {
                    error_body.clone()
                }
            });

        match status_code {
            400 => Error::bad_request(error_message),
            404 => Error::not_found(error_message, None, None),
            408 => Error::timeout(error_message, None),
            429 => Error::rate_limit(format!("status 429: {error_message}"), retry_after),
            500 => Error::internal_server(error_message),
            502..=504 => Error::service_unavailable(error_message, retry_after),
            _ => Error::api(status_code, error_message),
        }
    }

    /// One chat attempt: encode, send, decode. The throttle retry loop
    /// calls this once per cycle; multipart bodies are rebuilt per attempt.
    async fn attempt_chat(&self, request: &ChatRequest) -> Result<ChatReply> {
        let url = format!("{}chat", self.base_url);
        CLIENT_REQUESTS.click();

        let builder = self.client.post(&url).headers(self.default_headers());
        let builder = if request.has_attachment() {
            builder.multipart(multipart_form(request)?)
        } else {
            builder.json(request)
        };

        let response = builder
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        if !response.status().is_success() {
            return Err(Self::process_error_response(response).await);
        }

        let body = response.json::<ChatResponseBody>().await.map_err(|e| {
            Error::serialization(
                format!("failed to parse chat response: {e}"),
                Some(Box::new(e)),
            )
        })?;
        body.into_reply()
    }
}

impl fmt::Debug for Galen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Galen")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Backend for Galen {
    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply> {
        let reply = match retry_throttled(|| self.attempt_chat(request)).await {
            Ok(reply) => reply,
            Err(err) => {
                CLIENT_REQUEST_ERRORS.click();
                return Err(err);
            }
        };
        if let Some(logger) = &self.logger {
            logger.log_reply(&reply);
        }
        Ok(reply)
    }

    async fn list_sessions(&self) -> Result<Vec<SessionSummary>> {
        let url = format!("{}history", self.base_url);
        HISTORY_REQUESTS.click();

        let response = self
            .client
            .get(&url)
            .headers(self.default_headers())
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        if !response.status().is_success() {
            return Err(Self::process_error_response(response).await);
        }

        let sessions = response.json::<Vec<SessionSummary>>().await.map_err(|e| {
            Error::serialization(
                format!("failed to parse session listing: {e}"),
                Some(Box::new(e)),
            )
        })?;
        if let Some(logger) = &self.logger {
            logger.log_sessions(&sessions);
        }
        Ok(sessions)
    }

    async fn fetch_session(&self, id: &str) -> Result<SessionDetail> {
        let url = format!("{}history/{}", self.base_url, id);
        HISTORY_REQUESTS.click();

        let response = self
            .client
            .get(&url)
            .headers(self.default_headers())
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::not_found(
                format!("no session with id {id}"),
                Some("session".to_string()),
                Some(id.to_string()),
            ));
        }
        if !response.status().is_success() {
            return Err(Self::process_error_response(response).await);
        }

        response.json::<SessionDetail>().await.map_err(|e| {
            Error::serialization(
                format!("failed to parse session history: {e}"),
                Some(Box::new(e)),
            )
        })
    }

    async fn delete_session(&self, id: &str) -> Result<()> {
        let url = format!("{}history/{}", self.base_url, id);
        HISTORY_DELETES.click();

        let response = self
            .client
            .delete(&url)
            .headers(self.default_headers())
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::not_found(
                format!("no session with id {id}"),
                Some("session".to_string()),
                Some(id.to_string()),
            ));
        }
        if !response.status().is_success() {
            return Err(Self::process_error_response(response).await);
        }
        Ok(())
    }
}

/// Runs one logical send through the throttle retry loop.
///
/// A rate-limited attempt earns a doubling non-blocking sleep and another
/// cycle, up to [`THROTTLE_RETRIES`] retries after the initial attempt
/// (sleeps of 1s, 2s, 4s). Every other outcome, success or failure, resolves
/// immediately; the rate-limit error from the final attempt is returned
/// as-is when the bound is exhausted.
async fn retry_throttled<T, F, Fut>(mut attempt: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut retries = 0;
    loop {
        match attempt().await {
            Err(err) if err.is_rate_limit() && retries < THROTTLE_RETRIES => {
                let backoff = INITIAL_BACKOFF * 2u32.pow(retries);
                CLIENT_REQUEST_RETRIES.click();
                CLIENT_RETRY_BACKOFF.add(backoff.as_secs_f64());
                sleep(backoff).await;
                retries += 1;
            }
            outcome => return outcome,
        }
    }
}

/// Validates the base URL and guarantees a trailing slash so endpoint paths
/// can be appended directly.
fn normalize_base_url(raw: String) -> Result<String> {
    Url::parse(&raw)?;
    if raw.ends_with('/') {
        Ok(raw)
    } else {
        Ok(format!("{raw}/"))
    }
}

/// Builds the multipart form for a send with an attachment.
fn multipart_form(request: &ChatRequest) -> Result<Form> {
    let mut form = Form::new().text("message", request.message.clone());
    if let Some(session_id) = &request.session_id {
        form = form.text("session_id", session_id.clone());
    }
    if let Some(attachment) = &request.attachment {
        let part = Part::bytes(attachment.bytes.clone())
            .file_name(attachment.file_name.clone())
            .mime_str(&attachment.mime_type)
            .map_err(|e| {
                Error::validation(
                    format!("invalid attachment MIME type: {e}"),
                    Some("image".to_string()),
                )
            })?;
        form = form.part("image", part);
    }
    Ok(form)
}
