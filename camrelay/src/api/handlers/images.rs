//! HTTP handler for the image relay endpoint.

use axum::{Json, extract::State};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Local;

use crate::AppState;
use crate::api::models::images::{DeliveryResponse, ImageSubmission};
use crate::errors::{Error, Result};
use crate::scratch::ScratchImage;

/// Relay a base64-encoded image to a Telegram chat.
///
/// The image is written to a uniquely named scratch file, posted to the Bot API
/// `sendPhoto` method with a timestamped caption, and the scratch file is removed
/// when the guard drops - on success and on every failure path alike.
#[tracing::instrument(skip_all)]
pub async fn send_image(State(state): State<AppState>, Json(submission): Json<ImageSubmission>) -> Result<Json<DeliveryResponse>> {
    let (image_data, chat_id) = match (submission.image_data, submission.chat_id) {
        (Some(image_data), Some(chat_id)) if !image_data.is_empty() && !chat_id.is_empty() => (image_data, chat_id),
        _ => return Err(Error::MissingFields),
    };

    // Discard any data-URI metadata prefix (e.g. "data:image/jpeg;base64,")
    let payload = image_data.split_once(',').map_or(image_data.as_str(), |(_, rest)| rest);
    let bytes = BASE64.decode(payload)?;

    let scratch = ScratchImage::write(&state.config.storage.temp_dir, &bytes).await?;

    let caption = format!("Surveillance image captured at {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    let telegram_response = state.telegram.send_photo(scratch.path(), &chat_id, &caption).await?;

    Ok(Json(DeliveryResponse::sent(telegram_response)))
}
