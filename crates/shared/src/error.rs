use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Unauthorized,
    Forbidden,
    NotFound,
    Validation,
    Conflict,
    Internal,
}

impl ErrorCode {
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => ErrorCode::Unauthorized,
            403 => ErrorCode::Forbidden,
            404 => ErrorCode::NotFound,
            409 => ErrorCode::Conflict,
            400..=499 => ErrorCode::Validation,
            _ => ErrorCode::Internal,
        }
    }

    /// Credential missing, expired or rejected.
    pub fn is_auth(self) -> bool {
        matches!(self, ErrorCode::Unauthorized | ErrorCode::Forbidden)
    }
}

/// Error reported by the backend for a non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{code:?} ({status}): {message}")]
pub struct ApiError {
    pub code: ErrorCode,
    pub status: u16,
    pub message: String,
}

impl ApiError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::from_status(status),
            status,
            message: message.into(),
        }
    }

    /// Builds the error from a raw response body, keeping the server's own
    /// wording when it can be found.
    pub fn from_body(status: u16, body: &str) -> Self {
        let message = extract_message(body).unwrap_or_else(|| format!("HTTP {status}"));
        Self::new(status, message)
    }
}

#[derive(Debug, Deserialize)]
struct BackendMessage {
    #[serde(rename = "mensagemUsuario", default)]
    user_message: Option<String>,
    #[serde(rename = "mensagemDesenvolvedor", default)]
    developer_message: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl BackendMessage {
    fn into_text(self) -> Option<String> {
        self.user_message
            .or(self.message)
            .or(self.error)
            .or(self.developer_message)
            .filter(|text| !text.trim().is_empty())
    }
}

/// Pulls a human-readable message out of an error body.
///
/// Accepts the backend's `[{"mensagemUsuario": ..}]` list, a single object
/// with `mensagemUsuario`, `message` or `error`, or plain text.
pub fn extract_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(list) = serde_json::from_str::<Vec<BackendMessage>>(trimmed) {
        return list.into_iter().find_map(BackendMessage::into_text);
    }
    if let Ok(single) = serde_json::from_str::<BackendMessage>(trimmed) {
        return single.into_text();
    }
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return None;
    }
    Some(trimmed.to_string())
}
