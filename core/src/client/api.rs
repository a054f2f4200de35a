use crate::client::config::ClientConfig;
use crate::model::PlotRequest;
use crate::prelude::{ApiError, ApiResult};
use serde_json::Value;

/// HTTP client for the plot service.
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// `GET /health`; any 2xx counts as healthy and the body is ignored.
    pub async fn check_health(&self) -> ApiResult<()> {
        let response = self.http.get(self.config.endpoint("health")).send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(status_error(response).await)
        }
    }

    /// `POST /generate_plot`, returning the parsed body untouched.
    pub async fn generate_plot(&self, request: &PlotRequest) -> ApiResult<Value> {
        let response = self
            .http
            .post(self.config.endpoint("generate_plot"))
            .json(request)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

async fn status_error(response: reqwest::Response) -> ApiError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    ApiError::Status {
        status,
        detail: extract_detail(&body),
    }
}

/// Pulls a human-readable message out of an error body.
///
/// Understands `{"detail": "..."}`, `{"detail": [{"msg": "..."}]}` and
/// `error`/`message` keys; a non-JSON body is used verbatim.
pub fn extract_detail(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    let value: Value = match serde_json::from_str(trimmed) {
        Ok(value) => value,
        Err(_) => return Some(trimmed.to_string()),
    };
    ["detail", "error", "message"]
        .iter()
        .filter_map(|key| value.get(*key))
        .find_map(detail_text)
}

fn detail_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        Value::Array(items) => {
            let messages: Vec<String> = items
                .iter()
                .filter_map(|item| match item {
                    Value::String(text) => Some(text.clone()),
                    other => other.get("msg").and_then(Value::as_str).map(str::to_string),
                })
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}
