use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::error::FieldError;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP {status}: {message}")]
    Http {
        status: StatusCode,
        message: String,
        errors: Vec<FieldError>,
    },
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Session storage error: {0}")]
    Storage(#[from] std::io::Error),
    #[error("Not logged in")]
    NotAuthenticated,
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            ClientError::Network(e) => e.status(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    /// Builds an `Http` error from a non-success response, keeping the
    /// server's message and field errors when the body carries them.
    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        #[derive(Deserialize)]
        struct ErrorBody {
            message: Option<String>,
            #[serde(default)]
            errors: Vec<FieldError>,
        }

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let (message, errors) = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => (body.message.unwrap_or_else(|| fallback_message(status)), body.errors),
            Err(_) => (fallback_message(status), Vec::new()),
        };

        ClientError::Http { status, message, errors }
    }
}

fn fallback_message(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or("Request failed").to_string()
}
