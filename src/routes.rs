use crate::commands::assets::{default_handler, manifest_action, service_worker_action};
use crate::commands::dashboard::dashboard_action;
use crate::commands::entries::{add_entry_action, delete_entry_action};
use crate::commands::sports::{
  add_sport_action, delete_sport_action, sports_page_action, update_sport_action,
};
use crate::state::AppState;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;

pub struct ServerRoutes;

impl ServerRoutes {
  pub fn create() -> Router<Arc<AppState>> {
    Router::<Arc<AppState>>::new()
      .merge(dashboard_routes())
      .merge(entry_routes())
      .merge(sport_routes())
      .merge(asset_routes())
      .fallback(default_handler)
  }
}

fn dashboard_routes() -> Router<Arc<AppState>> {
  Router::new().route("/", get(dashboard_action))
}

fn entry_routes() -> Router<Arc<AppState>> {
  Router::new()
    .route("/entries", post(add_entry_action))
    .route("/entries/delete", post(delete_entry_action))
}

fn sport_routes() -> Router<Arc<AppState>> {
  Router::new()
    .route("/add", get(sports_page_action))
    .route("/add/sports", post(add_sport_action))
    .route("/add/sports/update", post(update_sport_action))
    .route("/add/sports/delete", post(delete_sport_action))
}

fn asset_routes() -> Router<Arc<AppState>> {
  Router::new()
    .route("/manifest.webmanifest", get(manifest_action))
    .route("/sw.js", get(service_worker_action))
}

/// Full application with state and the panic guard applied
pub fn app(state: Arc<AppState>) -> Router {
  ServerRoutes::create()
    .layer(
      ServiceBuilder::new().layer(CatchPanicLayer::custom(|_err| {
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          "Internal server error - handler panicked".to_string(),
        )
          .into_response()
      })),
    )
    .with_state(state)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::*;
  use axum::body::{to_bytes, Body};
  use axum::http::{header, Request, Response};
  use mockito::{Matcher, Mock, ServerGuard};
  use serde_json::json;
  use tower::ServiceExt;

  fn test_app(server: &ServerGuard) -> Router {
    app(Arc::new(AppState::new(test_store(server))))
  }

  async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
  }

  fn form_post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
      .method("POST")
      .uri(uri)
      .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
      .body(Body::from(body.to_string()))
      .unwrap()
  }

  fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
  }

  async fn mock_reads(server: &mut ServerGuard, entries: &str, sports: &str) -> Vec<Mock> {
    vec![
      server
        .mock("GET", Matcher::Regex(r"^/rest/v1/SZ_activity".into()))
        .match_query(Matcher::UrlEncoded(
          "select".into(),
          "id,activity,day,length,comment".into(),
        ))
        .with_status(200)
        .with_body(entries)
        .create_async()
        .await,
      server
        .mock("GET", Matcher::Regex(r"^/rest/v1/SZ_activity".into()))
        .match_query(Matcher::UrlEncoded("distinct".into(), "day".into()))
        .with_status(200)
        .with_body(r#"[{"day":"2024-03-05"}]"#)
        .create_async()
        .await,
      server
        .mock("GET", Matcher::Regex(r"^/rest/v1/SZ_list_activity".into()))
        .with_status(200)
        .with_body(sports)
        .create_async()
        .await,
    ]
  }

  #[tokio::test]
  async fn test_dashboard_renders_selected_month() {
    let mut server = mockito::Server::new_async().await;
    let _mocks = mock_reads(
      &mut server,
      r#"[{"id":1,"activity":"Trail","day":"2024-03-05","length":90,"comment":"Hill repeats"}]"#,
      r##"[{"id":1,"activity":"Trail","color":"#FF0000"}]"##,
    )
    .await;

    let response = test_app(&server)
      .oneshot(get("/?monthKey=2024-2"))
      .await
      .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("mars 2024"));
    assert!(html.contains("Hill repeats"));
    assert!(html.contains("1h30"));
    assert!(html.contains("#ff0000"));
  }

  #[tokio::test]
  async fn test_dashboard_survives_store_outage() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
      .mock("GET", Matcher::Any)
      .with_status(500)
      .with_body("boom")
      .create_async()
      .await;

    let response = test_app(&server).oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Temps total"));
  }

  #[tokio::test]
  async fn test_add_entry_persists_and_redirects() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
      .mock("POST", "/rest/v1/SZ_activity")
      .match_body(Matcher::Json(json!({
        "activity": "Trail",
        "day": "2024-03-05",
        "length": 90
      })))
      .with_status(201)
      .with_body("[]")
      .create_async()
      .await;

    let response = test_app(&server)
      .oneshot(form_post(
        "/entries",
        "sport=Trail&day=2024-03-05&hours=1&minutes=30&comment=&return_to=activity%3DTrail",
      ))
      .await
      .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/?activity=Trail");
    mock.assert_async().await;
  }

  #[tokio::test]
  async fn test_incomplete_entry_is_ignored() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
      .mock("POST", Matcher::Any)
      .expect(0)
      .create_async()
      .await;

    let response = test_app(&server)
      .oneshot(form_post("/entries", "sport=&day=2024-03-05&hours=1"))
      .await
      .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/");
    mock.assert_async().await;
  }

  #[tokio::test]
  async fn test_oversized_duration_is_not_persisted() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
      .mock("POST", Matcher::Any)
      .expect(0)
      .create_async()
      .await;

    let app = test_app(&server);
    for hours in ["1e300", "200000000000000000"] {
      let response = app
        .clone()
        .oneshot(form_post(
          "/entries",
          &format!("sport=Trail&day=2024-03-05&hours={}&minutes=0", hours),
        ))
        .await
        .unwrap();
      assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    mock.assert_async().await;
  }

  #[tokio::test]
  async fn test_sport_writes_without_positive_id_are_ignored() {
    let mut server = mockito::Server::new_async().await;
    let mut mocks = Vec::new();
    for method in ["PATCH", "DELETE"] {
      mocks.push(
        server
          .mock(method, Matcher::Any)
          .expect(0)
          .create_async()
          .await,
      );
    }

    let app = test_app(&server);
    for (uri, body) in [
      ("/add/sports/update", "sportId=0&sportName=Trail&sportColor=%23aabbcc"),
      ("/add/sports/update", "sportId=-4&sportName=Trail"),
      ("/add/sports/update", "sportName=Trail"),
      ("/add/sports/delete", "sportId=0"),
      ("/add/sports/delete", "sportId=-1"),
    ] {
      let response = app.clone().oneshot(form_post(uri, body)).await.unwrap();
      assert_eq!(response.status(), StatusCode::SEE_OTHER);
      assert_eq!(response.headers()[header::LOCATION], "/add");
    }

    for mock in mocks {
      mock.assert_async().await;
    }
  }

  #[tokio::test]
  async fn test_rejected_entry_surfaces_store_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
      .mock("POST", "/rest/v1/SZ_activity")
      .with_status(409)
      .with_body("duplicate key")
      .create_async()
      .await;

    let response = test_app(&server)
      .oneshot(form_post("/entries", "sport=Trail&day=2024-03-05&minutes=45"))
      .await
      .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(body_text(response).await.contains("duplicate key"));
  }

  #[tokio::test]
  async fn test_delete_entry_by_id() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
      .mock("DELETE", Matcher::Regex(r"^/rest/v1/SZ_activity".into()))
      .match_query(Matcher::UrlEncoded("id".into(), "eq.12".into()))
      .with_status(204)
      .create_async()
      .await;
    let noop = server
      .mock("DELETE", Matcher::Any)
      .expect(0)
      .create_async()
      .await;

    let app = test_app(&server);
    let response = app
      .clone()
      .oneshot(form_post("/entries/delete", "id=12&return_to=monthKey%3D2024-2"))
      .await
      .unwrap();
    assert_eq!(response.headers()[header::LOCATION], "/?monthKey=2024-2");

    let response = app
      .oneshot(form_post("/entries/delete", "id=0"))
      .await
      .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    mock.assert_async().await;
    noop.assert_async().await;
  }

  #[tokio::test]
  async fn test_sport_management_routes() {
    let mut server = mockito::Server::new_async().await;
    let add = server
      .mock("POST", "/rest/v1/SZ_list_activity")
      .match_body(Matcher::Json(json!({ "activity": "Yoga", "color": "#ffffff" })))
      .with_status(201)
      .with_body("[]")
      .create_async()
      .await;
    let update = server
      .mock("PATCH", Matcher::Regex(r"^/rest/v1/SZ_list_activity".into()))
      .match_query(Matcher::UrlEncoded("id".into(), "eq.3".into()))
      .match_body(Matcher::Json(json!({ "activity": "Trail", "color": "#aabbcc" })))
      .with_status(200)
      .with_body("[]")
      .create_async()
      .await;
    let delete = server
      .mock("DELETE", Matcher::Regex(r"^/rest/v1/SZ_list_activity".into()))
      .match_query(Matcher::UrlEncoded("id".into(), "eq.3".into()))
      .with_status(204)
      .create_async()
      .await;

    let app = test_app(&server);
    for (uri, body) in [
      ("/add/sports", "sportName=Yoga&sportColor="),
      ("/add/sports/update", "sportId=3&sportName=Trail&sportColor=%23AABBCC"),
      ("/add/sports/delete", "sportId=3"),
    ] {
      let response = app.clone().oneshot(form_post(uri, body)).await.unwrap();
      assert_eq!(response.status(), StatusCode::SEE_OTHER);
      assert_eq!(response.headers()[header::LOCATION], "/add");
    }

    add.assert_async().await;
    update.assert_async().await;
    delete.assert_async().await;
  }

  #[tokio::test]
  async fn test_sports_page_lists_catalog() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
      .mock("GET", Matcher::Regex(r"^/rest/v1/SZ_list_activity".into()))
      .with_status(200)
      .with_body(r##"[{"id":4,"activity":"Natation","color":"#0EA5E9"}]"##)
      .create_async()
      .await;

    let response = test_app(&server).oneshot(get("/add")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("Natation"));
    assert!(html.contains("#0ea5e9"));
  }

  #[tokio::test]
  async fn test_manifest_and_static_assets() {
    let server = mockito::Server::new_async().await;
    let app = test_app(&server);

    let response = app.clone().oneshot(get("/manifest.webmanifest")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let manifest: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(manifest["name"], "Training Tracker");
    assert_eq!(manifest["short_name"], "Tracker");
    assert_eq!(manifest["display"], "standalone");

    let response = app.clone().oneshot(get("/styles.css")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css");

    let response = app.oneshot(get("/missing.png")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
  }
}
