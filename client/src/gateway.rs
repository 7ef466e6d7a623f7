//! Request gateway: the one path every API call takes.
//!
//! # Design
//! The gateway owns the cross-cutting request rules so no call site ever
//! repeats them: the stored bearer token is attached when present, JSON
//! bodies get a content type unless the caller set their own, and raw
//! responses are normalized into `Result` before anything typed looks at
//! them. Error classification is deliberately lenient: the service's
//! `detail` string is used when it is a string, anything else falls back
//! to a generic message rather than failing the failure path itself.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, RequestBody};
use crate::store::TokenStore;

/// Fallback when a non-2xx response carries no usable `detail` field.
const GENERIC_ERROR: &str = "An error occurred";

/// Caller-side description of a request: method plus optional body and
/// extra headers.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    method: HttpMethod,
    body: Option<RequestBody>,
    headers: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn new(method: HttpMethod) -> Self {
        Self {
            method,
            body: None,
            headers: Vec::new(),
        }
    }

    pub fn get() -> Self {
        Self::new(HttpMethod::Get)
    }

    pub fn post() -> Self {
        Self::new(HttpMethod::Post)
    }

    pub fn put() -> Self {
        Self::new(HttpMethod::Put)
    }

    pub fn delete() -> Self {
        Self::new(HttpMethod::Delete)
    }

    /// Attach a JSON body; the gateway infers the content type.
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(RequestBody::Json(body.to_string()));
        self
    }

    /// Attach a form-encoded body (the password grant uses this).
    pub fn form(mut self, pairs: Vec<(String, String)>) -> Self {
        self.body = Some(RequestBody::Form(pairs));
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

/// Builds, authorizes, executes, and normalizes every request.
#[derive(Clone)]
pub struct ApiGateway {
    config: ApiConfig,
    store: Arc<dyn TokenStore>,
    transport: Arc<dyn HttpTransport>,
}

impl ApiGateway {
    pub fn new(
        config: ApiConfig,
        store: Arc<dyn TokenStore>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            config,
            store,
            transport,
        }
    }

    /// Shared handle to the credential store. The session manager writes
    /// through the same slot the gateway reads.
    pub fn token_store(&self) -> Arc<dyn TokenStore> {
        Arc::clone(&self.store)
    }

    /// Execute one API call. `path` is relative to the versioned prefix.
    ///
    /// 204 maps to `Ok(None)`, any other 2xx to the parsed JSON body, and
    /// non-2xx to [`ApiError::Api`] carrying the server's `detail` message
    /// when it has one.
    pub async fn request(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<Option<Value>, ApiError> {
        let request = self.build(path, options);
        let url = request.url.clone();
        debug!(method = ?request.method, %url, "api request");
        let response = self.transport.execute(request).await?;
        debug!(%url, status = response.status, "api response");
        normalize(response)
    }

    /// Headers the caller set win: the bearer token and the inferred
    /// content type are only added when the caller did not claim the name.
    fn build(&self, path: &str, options: RequestOptions) -> HttpRequest {
        let mut headers = options.headers;
        if !has_header(&headers, "authorization") {
            if let Some(token) = self.store.get() {
                headers.insert(0, ("Authorization".to_string(), format!("Bearer {token}")));
            }
        }
        if matches!(options.body, Some(RequestBody::Json(_))) && !has_header(&headers, "content-type")
        {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }
        HttpRequest {
            method: options.method,
            url: self.config.endpoint(path),
            headers,
            body: options.body,
        }
    }
}

fn has_header(headers: &[(String, String)], name: &str) -> bool {
    headers.iter().any(|(n, _)| n.eq_ignore_ascii_case(name))
}

/// Collapse a raw response into the gateway result contract.
fn normalize(response: HttpResponse) -> Result<Option<Value>, ApiError> {
    if response.status == 204 {
        return Ok(None);
    }
    if response.is_success() {
        let value = serde_json::from_str(&response.body).map_err(|e| ApiError::Decode(e.to_string()))?;
        return Ok(Some(value));
    }
    Err(ApiError::Api {
        status: response.status,
        message: error_message(&response.body),
    })
}

/// Best-effort extraction of the service's `detail` string. Anything else,
/// a non-JSON body or the structured detail of a validation failure, falls
/// back to the generic message.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            let detail = value.get("detail")?;
            detail.as_str().map(str::to_string)
        })
        .unwrap_or_else(|| GENERIC_ERROR.to_string())
}

/// Decode a gateway success into a typed value. A `None` payload (204)
/// cannot satisfy a typed read.
pub(crate) fn decode<T: DeserializeOwned>(payload: Option<Value>) -> Result<T, ApiError> {
    let value = payload.ok_or_else(|| ApiError::Decode("response had no body".to_string()))?;
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}
