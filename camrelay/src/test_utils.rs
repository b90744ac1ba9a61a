//! Shared helpers for integration-style tests.

use std::path::Path;
use std::time::Duration;

use url::Url;

use crate::config::{Config, StorageConfig, TelegramConfig};

/// A config pointing at a mock Telegram server, with scratch storage under `temp_dir`.
pub fn create_test_config(api_base: &str, temp_dir: &Path) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        telegram: TelegramConfig {
            bot_token: "123456:ABC-DEF".to_string(),
            api_base: Url::parse(api_base).expect("test api base must parse"),
            request_timeout: Duration::from_secs(5),
        },
        storage: StorageConfig {
            temp_dir: temp_dir.to_path_buf(),
        },
        ..Config::default()
    }
}

/// Spin up the full application (router, CORS, state) behind an in-process test server.
pub async fn create_test_app(config: Config) -> axum_test::TestServer {
    crate::Application::new(config)
        .await
        .expect("Failed to create application")
        .into_test_server()
}
