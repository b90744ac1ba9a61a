use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error as ThisError;

/// All failure modes of the relay. Every variant renders as the JSON envelope
/// `{"success": false, "error": "<message>"}` with the status from [`Error::status_code`];
/// nothing propagates to the transport layer as an unhandled fault.
#[derive(ThisError, Debug)]
pub enum Error {
    /// Required request field absent or empty
    #[error("Missing required fields")]
    MissingFields,

    /// Payload is not valid base64
    #[error("Invalid base64 image data: {0}")]
    Decode(#[from] base64::DecodeError),

    /// Unable to write the scratch image file
    #[error("Failed to store image: {0}")]
    Storage(#[from] std::io::Error),

    /// Telegram accepted the connection but rejected the delivery
    #[error("Failed to send image: {detail}")]
    Delivery { detail: String },

    /// Network-level failure talking to Telegram
    #[error("Failed to send image: {0}")]
    Transport(#[from] reqwest::Error),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingFields => StatusCode::BAD_REQUEST,
            Error::Decode(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            // Provider-side rejections are upstream failures, not ours
            Error::Delivery { .. } => StatusCode::BAD_GATEWAY,
            Error::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::Storage(_) => "Failed to store image".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details for debugging - different log levels based on severity
        match &self {
            Error::Storage(_) | Error::Transport(_) => {
                tracing::error!("Internal relay error: {:#}", self);
            }
            Error::Delivery { .. } => {
                tracing::error!("Telegram rejected delivery: {}", self);
            }
            Error::MissingFields | Error::Decode(_) => {
                tracing::debug!("Client error: {}", self);
            }
        }

        let status = self.status_code();
        let body = Json(json!({
            "success": false,
            "error": self.user_message(),
        }));

        (status, body).into_response()
    }
}

/// Type alias for relay operation results
pub type Result<T> = std::result::Result<T, Error>;
