//! # Fetch-style Units of Work
//!
//! Convenience wrapper for the common case: one HTTP request per attempt, a
//! non-2xx response counts as a failed attempt, and the JSON body becomes the
//! typed payload.

use super::types::{ExecutionOptions, ExecutionResult};
use super::ApiExecutor;
use crate::error::CallError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde::de::DeserializeOwned;

/// Request description replayed on every attempt
#[derive(Debug, Clone, Default)]
pub struct FetchRequest {
    pub method: Method,
    pub headers: HeaderMap,
    pub bearer_token: Option<String>,
    pub json_body: Option<serde_json::Value>,
}

impl FetchRequest {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post(body: serde_json::Value) -> Self {
        Self {
            method: Method::POST,
            json_body: Some(body),
            ..Self::default()
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }
}

impl ApiExecutor {
    /// Perform an HTTP request under the full retry/timeout orchestration
    pub async fn execute_fetch<T>(
        &self,
        integration_id: &str,
        url: &str,
        request: FetchRequest,
        options: ExecutionOptions,
    ) -> ExecutionResult<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let method = request.method.to_string();
        let client = self.http.clone();
        let target = url.to_string();

        self.execute(
            integration_id,
            url,
            &method,
            move || send_json::<T>(client.clone(), target.clone(), request.clone()),
            options,
        )
        .await
    }
}

async fn send_json<T>(
    client: reqwest::Client,
    url: String,
    request: FetchRequest,
) -> Result<T, CallError>
where
    T: DeserializeOwned,
{
    let mut builder = client.request(request.method, &url).headers(request.headers);
    if let Some(token) = request.bearer_token {
        builder = builder.bearer_auth(token);
    }
    if let Some(body) = request.json_body {
        builder = builder.json(&body);
    }

    let response = builder.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CallError::HttpStatus {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("Unknown Status").to_string(),
        });
    }

    let body = response.bytes().await?;
    // empty bodies (204) decode like JSON null
    let body: &[u8] = if body.is_empty() { b"null" } else { &body };
    Ok(serde_json::from_slice(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::ACCEPT;

    #[test]
    fn test_request_builders() {
        let request = FetchRequest::post(serde_json::json!({"amount": 5000}))
            .with_header(ACCEPT, HeaderValue::from_static("application/json"))
            .with_bearer_token("sk_test");

        assert_eq!(request.method, Method::POST);
        assert_eq!(request.headers[ACCEPT], "application/json");
        assert_eq!(request.bearer_token.as_deref(), Some("sk_test"));
        assert_eq!(request.json_body.unwrap()["amount"], 5000);

        assert_eq!(FetchRequest::get().method, Method::GET);
    }
}
