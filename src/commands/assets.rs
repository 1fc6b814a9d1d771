//! Embedded static files and the web-app manifest

use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use rust_embed::RustEmbed;
use serde_json::json;

pub const THEME_COLOR: &str = "#0f172a";

#[derive(RustEmbed)]
#[folder = "assets/"]
pub struct Assets;

fn cache_control_for(path: &str) -> &'static str {
  if path == "sw.js" {
    return "no-cache";
  }
  match path.rsplit('.').next() {
    Some("png" | "svg" | "ico") => "public, max-age=86400",
    Some("css" | "js") => "public, max-age=3600",
    _ => "public, max-age=3600",
  }
}

pub async fn manifest_action() -> impl IntoResponse {
  (
    [(header::CONTENT_TYPE, "application/manifest+json")],
    Json(json!({
      "name": "Training Tracker",
      "short_name": "Tracker",
      "start_url": "/",
      "scope": "/",
      "display": "standalone",
      "orientation": "portrait",
      "background_color": THEME_COLOR,
      "theme_color": THEME_COLOR,
      "icons": [
        { "src": "/icon.svg", "sizes": "any", "type": "image/svg+xml", "purpose": "any maskable" }
      ]
    })),
  )
}

pub async fn service_worker_action() -> Response {
  serve_asset("sw.js")
}

/// Serves static files from the embedded assets
pub async fn default_handler(uri: Uri) -> Response {
  serve_asset(uri.path().trim_start_matches('/'))
}

fn serve_asset(path: &str) -> Response {
  let Some(content) = Assets::get(path) else {
    return (
      StatusCode::NOT_FOUND,
      [(header::CONTENT_TYPE, "text/plain".to_string())],
      "404 Not Found",
    )
      .into_response();
  };

  let mime = mime_guess::from_path(path).first_or_octet_stream();
  let mut response = (
    StatusCode::OK,
    [
      (header::CONTENT_TYPE, mime.to_string()),
      (header::CACHE_CONTROL, cache_control_for(path).to_string()),
    ],
    content.data,
  )
    .into_response();

  if path == "sw.js" {
    response.headers_mut().insert(
      header::HeaderName::from_static("service-worker-allowed"),
      header::HeaderValue::from_static("/"),
    );
  }
  response
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_cache_control() {
    assert_eq!(cache_control_for("sw.js"), "no-cache");
    assert_eq!(cache_control_for("styles.css"), "public, max-age=3600");
    assert_eq!(cache_control_for("icon.svg"), "public, max-age=86400");
  }

  #[test]
  fn test_assets_are_embedded() {
    assert!(Assets::get("sw.js").is_some());
    assert!(Assets::get("styles.css").is_some());
    assert!(Assets::get("icon.svg").is_some());
  }

  #[tokio::test]
  async fn test_unknown_path_is_not_found() {
    let response = default_handler(Uri::from_static("/nope.txt")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn test_service_worker_headers() {
    let response = service_worker_action().await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-cache");
    assert_eq!(response.headers()["service-worker-allowed"], "/");
  }
}
