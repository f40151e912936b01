use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Client-related errors
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("[{status}] {}", join_reasons(.reasons))]
    Api {
        status: u16,
        reasons: Vec<ApiErrorReason>,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Decode error: {0}")]
    Decode(String),
}

/// One entry of the `errors` array Linode returns on failure.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ApiErrorReason {
    pub reason: String,
    #[serde(default)]
    pub field: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    errors: Vec<ApiErrorReason>,
}

fn join_reasons(reasons: &[ApiErrorReason]) -> String {
    reasons
        .iter()
        .map(|r| match &r.field {
            Some(field) => format!("[{field}] {}", r.reason),
            None => r.reason.clone(),
        })
        .collect::<Vec<_>>()
        .join("; ")
}

impl ClientError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build an API error from a non-success response body. Bodies that are
    /// not in the Linode error format are kept verbatim as a single reason.
    pub fn api_error(status: StatusCode, body: &str) -> Self {
        let reasons = match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(parsed) if !parsed.errors.is_empty() => parsed.errors,
            _ => {
                let reason = if body.trim().is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("Unknown error")
                        .to_string()
                } else {
                    body.trim().to_string()
                };
                vec![ApiErrorReason {
                    reason,
                    field: None,
                }]
            }
        };
        Self::Api {
            status: status.as_u16(),
            reasons,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Transport failures and throttling/unavailable responses are worth
    /// another attempt; everything else is final.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request(e) => {
                e.is_timeout() || e.is_connect() || e.is_request()
            }
            Self::Api { status, .. } => {
                matches!(status, 429 | 502 | 503 | 504)
            }
            _ => false,
        }
    }
}
