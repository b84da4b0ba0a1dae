//! Error taxonomy for gateway calls and controller operations.

use shared::{domain::RecordKind, error::ApiError};
use thiserror::Error;

use crate::validation::ValidationReport;

pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please sign in again.";
pub const INVALID_FORM_MESSAGE: &str = "Please fill in the fields correctly.";

/// Failure reported by a Remote Gateway call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("authentication failed: {0}")]
    Authentication(String),
    #[error("server rejected request ({}): {}", .0.status, .0.message)]
    Server(ApiError),
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl GatewayError {
    pub fn is_auth(&self) -> bool {
        matches!(self, GatewayError::Authentication(_))
    }

    /// Server-supplied message, when the backend sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            GatewayError::Server(api) => Some(api.message.as_str()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GatewayError::Decode(err.to_string())
        } else {
            GatewayError::Transport(err.to_string())
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum ClientError {
    #[error("validation failed: {0}")]
    Validation(ValidationReport),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error("record has no identity")]
    MissingIdentity,
}

impl ClientError {
    pub fn is_auth(&self) -> bool {
        matches!(self, ClientError::Gateway(err) if err.is_auth())
    }
}

/// The user-triggered operation a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Search,
    Load,
    Create,
    Update,
    Delete,
    ToggleStatus,
}

/// Text shown to the user when `op` fails with `err`.
///
/// Authentication failures always read the same so the shell can route to
/// sign-in. Deletes pass the server's wording through untouched; creates and
/// updates use fixed texts that still tell the two apart.
pub fn failure_message(kind: RecordKind, op: Operation, err: &GatewayError) -> String {
    if err.is_auth() {
        return SESSION_EXPIRED_MESSAGE.to_string();
    }
    let noun = kind.noun();
    match op {
        Operation::Search => format!("Could not load {noun} list."),
        Operation::Load => format!("Could not load {noun}."),
        Operation::Create => format!("Could not create {noun}."),
        Operation::Update => format!("Could not update {noun}."),
        Operation::Delete => err
            .server_message()
            .map(str::to_string)
            .unwrap_or_else(|| format!("Could not delete {noun}.")),
        Operation::ToggleStatus => format!("Could not change {noun} status."),
    }
}
