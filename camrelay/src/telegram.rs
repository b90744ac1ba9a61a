//! Telegram Bot API client for photo delivery.
//!
//! The client is constructed once at startup from [`TelegramConfig`] and injected into
//! handlers via application state; there is no process-wide provider configuration.
//! Every outbound request is bounded by the configured `request_timeout`.

use std::fmt;
use std::path::Path;

use reqwest::multipart::{Form, Part};
use tracing::info;
use url::Url;

use crate::config::TelegramConfig;
use crate::errors::{Error, Result};

/// Thin client over the Bot API `sendPhoto` method.
#[derive(Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    api_base: Url,
    bot_token: String,
}

impl TelegramClient {
    pub fn new(config: &TelegramConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(config.request_timeout).build()?;

        Ok(Self {
            http,
            api_base: config.api_base.clone(),
            bot_token: config.bot_token.clone(),
        })
    }

    /// Build the URL for a Bot API method, e.g. `https://api.telegram.org/bot<token>/sendPhoto`.
    /// Handles base URLs with or without a trailing slash, including proxy bases with a path.
    fn method_url(&self, method: &str) -> String {
        let base = self.api_base.as_str().trim_end_matches('/');
        format!("{}/bot{}/{}", base, self.bot_token, method)
    }

    /// Send the image file at `path` to `chat_id` as a photo with the given caption.
    ///
    /// Returns the provider's parsed JSON response body on success. A non-success
    /// provider status becomes [`Error::Delivery`] carrying the raw response text;
    /// network-level failures become [`Error::Transport`].
    pub async fn send_photo(&self, path: &Path, chat_id: &str, caption: &str) -> Result<serde_json::Value> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("photo.jpg")
            .to_string();

        let file_bytes = tokio::fs::read(path).await?;
        let part = Part::bytes(file_bytes).file_name(file_name);

        let form = Form::new()
            .text("chat_id", chat_id.to_string())
            .text("caption", caption.to_string())
            .part("photo", part);

        let response = self
            .http
            .post(self.method_url("sendPhoto"))
            .multipart(form)
            .send()
            .await
            // Strip the URL from transport errors so the bot token never reaches logs
            .map_err(|e| Error::Transport(e.without_url()))?;

        if response.status().is_success() {
            let body = response.json().await.map_err(|e| Error::Transport(e.without_url()))?;
            info!(%chat_id, "Image sent to Telegram chat");
            Ok(body)
        } else {
            let detail = response.text().await.unwrap_or_default();
            Err(Error::Delivery { detail })
        }
    }
}

impl fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramClient")
            .field("api_base", &self.api_base.as_str())
            .field("bot_token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(api_base: &str) -> TelegramClient {
        let config = TelegramConfig {
            bot_token: "123456:ABC-DEF".to_string(),
            api_base: Url::parse(api_base).unwrap(),
            request_timeout: std::time::Duration::from_secs(5),
        };
        TelegramClient::new(&config).unwrap()
    }

    fn contains_subslice(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    async fn write_test_image(dir: &Path, bytes: &[u8]) -> std::path::PathBuf {
        let path = dir.join("photo.jpg");
        tokio::fs::write(&path, bytes).await.unwrap();
        path
    }

    #[tokio::test]
    async fn test_send_photo_success_returns_provider_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/bot123456:ABC-DEF/sendPhoto"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "result": {"message_id": 42}
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let image = write_test_image(dir.path(), b"raw jpeg frame").await;

        let client = test_client(&mock_server.uri());
        let body = client.send_photo(&image, "777", "caption text").await.unwrap();

        assert_eq!(body["ok"], true);
        assert_eq!(body["result"]["message_id"], 42);

        // The multipart body must carry the photo bytes and both form fields
        let requests = mock_server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(contains_subslice(&requests[0].body, b"raw jpeg frame"));
        assert!(contains_subslice(&requests[0].body, b"name=\"chat_id\""));
        assert!(contains_subslice(&requests[0].body, b"777"));
        assert!(contains_subslice(&requests[0].body, b"name=\"caption\""));
        assert!(contains_subslice(&requests[0].body, b"caption text"));
        assert!(contains_subslice(&requests[0].body, b"name=\"photo\""));
    }

    #[tokio::test]
    async fn test_send_photo_provider_rejection_carries_body_text() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/bot123456:ABC-DEF/sendPhoto"))
            .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let image = write_test_image(dir.path(), b"frame").await;

        let client = test_client(&mock_server.uri());
        let err = client.send_photo(&image, "777", "caption").await.unwrap_err();

        match err {
            Error::Delivery { detail } => assert_eq!(detail, "Forbidden"),
            other => panic!("expected Delivery error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_api_base_with_path_prefix_is_respected() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/relay/bot123456:ABC-DEF/sendPhoto"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let image = write_test_image(dir.path(), b"frame").await;

        // A proxy-style base URL with a path segment and no trailing slash
        let client = test_client(&format!("{}/relay", mock_server.uri()));
        let body = client.send_photo(&image, "777", "caption").await.unwrap();

        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn test_send_photo_missing_file_is_storage_error() {
        let mock_server = MockServer::start().await;

        let client = test_client(&mock_server.uri());
        let err = client
            .send_photo(Path::new("/nonexistent/image.jpg"), "777", "caption")
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Storage(_)));
        assert!(mock_server.received_requests().await.unwrap().is_empty());
    }

    #[test]
    fn test_debug_redacts_bot_token() {
        let client = test_client("https://api.telegram.org");
        let debug = format!("{client:?}");
        assert!(!debug.contains("ABC-DEF"));
        assert!(debug.contains("<redacted>"));
    }
}
