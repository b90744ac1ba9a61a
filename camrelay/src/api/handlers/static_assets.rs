//! HTTP handlers for static asset serving.

use axum::{
    body::Body,
    http::{Response, StatusCode, Uri},
    response::IntoResponse,
};
use tracing::instrument;

use crate::static_assets;

/// Serve embedded static assets; `/` and directory paths serve the capture page.
#[instrument]
pub async fn serve_embedded_asset(uri: Uri) -> impl IntoResponse {
    let mut path = uri.path().trim_start_matches('/');

    // If path is empty or ends with /, serve index.html
    if path.is_empty() || path.ends_with('/') {
        path = "index.html";
    }

    if let Some(content) = static_assets::Assets::get(path) {
        let mime = mime_guess::from_path(path).first_or_octet_stream();

        return Response::builder()
            .header(axum::http::header::CONTENT_TYPE, mime.as_ref())
            .header(axum::http::header::CACHE_CONTROL, "no-cache")
            .body(Body::from(content.data.into_owned()))
            .unwrap();
    }

    Response::builder().status(StatusCode::NOT_FOUND).body(Body::empty()).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, http::StatusCode};
    use axum_test::TestServer;

    fn create_test_router() -> Router {
        Router::new().fallback(serve_embedded_asset)
    }

    #[tokio::test]
    async fn test_serve_root_returns_index_html() {
        let app = create_test_router();
        let server = TestServer::new(app).unwrap();

        let response = server.get("/").await;

        response.assert_status(StatusCode::OK);
        assert_eq!(
            response.headers().get("content-type").map(|v| v.to_str().unwrap()),
            Some("text/html")
        );
        assert_eq!(
            response.headers().get("cache-control").map(|v| v.to_str().unwrap()),
            Some("no-cache")
        );

        let text = response.text();
        assert!(text.contains("<!doctype html>") || text.contains("<!DOCTYPE html>"));
    }

    #[tokio::test]
    async fn test_serve_index_html_explicitly() {
        let app = create_test_router();
        let server = TestServer::new(app).unwrap();

        let response = server.get("/index.html").await;

        response.assert_status(StatusCode::OK);
        let text = response.text();
        assert!(text.contains("<!doctype html>") || text.contains("<!DOCTYPE html>"));
    }

    #[tokio::test]
    async fn test_unknown_asset_returns_404() {
        let app = create_test_router();
        let server = TestServer::new(app).unwrap();

        let response = server.get("/does-not-exist.js").await;

        response.assert_status(StatusCode::NOT_FOUND);
    }
}
