use anyhow::Context;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Client for the real REST backend behind the config and order-submission
/// modules. Everything else in the daemon works off the in-memory store.
pub struct BackendClient {
    base_url: String,
    token: String,
    http: Client,
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Cannot reach the server, check your network connection")]
    Unreachable(#[source] reqwest::Error),
    #[error("{message}")]
    Status { status: u16, message: String },
}

impl BackendError {
    pub fn code(&self) -> &'static str {
        match self {
            BackendError::Unreachable(_) => "backend_unreachable",
            BackendError::Status { .. } => "backend_http",
        }
    }
}

/// Human-readable text per status class, mirroring what the storefront
/// shows in its toasts.
pub fn status_message(status: u16) -> String {
    match status {
        400 => "The request was invalid".to_string(),
        401 => "Your session has expired, please sign in again".to_string(),
        403 => "You do not have permission to perform this action".to_string(),
        404 => "The requested resource was not found".to_string(),
        500..=599 => "The server encountered an error, please try again later".to_string(),
        other => format!("Request failed with status {other}"),
    }
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> anyhow::Result<Self> {
        let base_url = base_url.into();
        if base_url.trim().is_empty() {
            anyhow::bail!("backend base url must not be empty");
        }
        let http = Client::builder()
            .build()
            .context("build backend http client")?;
        Ok(BackendClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
            http,
        })
    }

    /// Reads `BISTROD_BACKEND_URL` / `BISTROD_BACKEND_TOKEN`; absent url
    /// means the backend modules stay unconfigured.
    pub fn from_env() -> anyhow::Result<Option<Self>> {
        let Ok(url) = std::env::var("BISTROD_BACKEND_URL") else {
            return Ok(None);
        };
        let token = std::env::var("BISTROD_BACKEND_TOKEN").unwrap_or_default();
        BackendClient::new(url, token).map(Some)
    }

    fn send(
        &self,
        req: reqwest::blocking::RequestBuilder,
    ) -> Result<Value, BackendError> {
        let resp = req
            .bearer_auth(&self.token)
            .send()
            .map_err(BackendError::Unreachable)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                message: status_message(status.as_u16()),
            });
        }
        if status == StatusCode::NO_CONTENT {
            return Ok(Value::Null);
        }
        // Some endpoints answer with an empty body on success.
        let text = resp.text().map_err(BackendError::Unreachable)?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }

    pub fn get_configs(&self) -> Result<Value, BackendError> {
        self.send(self.http.get(format!("{}/configs", self.base_url)))
    }

    pub fn get_config(&self, key: &str) -> Result<Value, BackendError> {
        self.send(self.http.get(format!("{}/configs/{key}", self.base_url)))
    }

    pub fn put_config(&self, key: &str, body: &Value) -> Result<Value, BackendError> {
        self.send(
            self.http
                .put(format!("{}/configs/{key}", self.base_url))
                .json(body),
        )
    }

    pub fn submit_order(&self, body: &Value) -> Result<Value, BackendError> {
        self.send(self.http.post(format!("{}/orders", self.base_url)).json(body))
    }
}
