//! HTTP utilities for vRA REST API calls

use crate::error::ApiError;
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and drops control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.chars().count() > MAX_LOG_BODY_LENGTH {
        let head: String = body.chars().take(MAX_LOG_BODY_LENGTH).collect();
        format!("{}... [truncated, {} bytes total]", head, body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// HTTP client wrapper for vRA API calls
#[derive(Clone)]
pub struct VraHttpClient {
    client: Client,
}

impl VraHttpClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(concat!("vra-state/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }

    /// Make a GET request and decode the JSON body
    pub async fn get<T: DeserializeOwned>(
        &self,
        url: &Url,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        tracing::debug!("GET {}", url);

        let mut request = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(ApiError::Status {
                status: status.as_u16(),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Format a vRA API error for display
pub fn format_api_error(error: &ApiError) -> String {
    match error {
        ApiError::Status { status: 401 } => {
            "Authentication failed. Check the configured vRA token.".to_string()
        }
        ApiError::Status { status: 403 } => {
            "Permission denied. Check your vRA entitlements.".to_string()
        }
        ApiError::Status { status: 404 } => "Resource not found.".to_string(),
        ApiError::Status { status: 429 } => {
            "Rate limit exceeded. Please try again later.".to_string()
        }
        ApiError::Status { status: 400 } => "Invalid request. Check your parameters.".to_string(),
        ApiError::Status { status } if *status >= 500 => {
            "vRA service temporarily unavailable. Please try again.".to_string()
        }
        ApiError::Status { .. } => "Request failed.".to_string(),
        ApiError::Transport(_) => {
            "Request failed. Check your network connection and try again.".to_string()
        }
        ApiError::Decode(_) => "Unexpected response from vRA.".to_string(),
        ApiError::InvalidUrl(e) => format!("Invalid URL: {}", e),
        ApiError::MissingField(field) => format!("Response is missing `{}`.", field),
    }
}
