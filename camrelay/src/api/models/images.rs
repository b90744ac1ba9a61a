//! Request/response models for the image relay endpoint.

use serde::{Deserialize, Serialize};

/// Inbound submission: a base64-encoded image and the destination chat.
///
/// Both fields are optional at the serde layer so that an absent field produces the
/// relay's own `Missing required fields` envelope rather than a deserializer rejection.
/// The payload may carry a `data:` URI metadata prefix, which is discarded before decoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageSubmission {
    #[serde(default)]
    pub image_data: Option<String>,
    #[serde(default)]
    pub chat_id: Option<String>,
}

/// Success envelope returned to the caller.
///
/// Failure envelopes (`success: false` with an `error` string) are rendered by
/// [`crate::errors::Error`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Opaque provider response body, passed through verbatim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telegram_response: Option<serde_json::Value>,
}

impl DeliveryResponse {
    /// Envelope for a confirmed delivery, carrying the provider's response body.
    pub fn sent(telegram_response: serde_json::Value) -> Self {
        Self {
            success: true,
            message: Some("Image sent successfully".to_string()),
            telegram_response: Some(telegram_response),
        }
    }
}
