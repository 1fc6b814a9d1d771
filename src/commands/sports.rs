//! Sport catalog management view and its form posts

use crate::error::ApiResult;
use crate::models::{Sport, DEFAULT_SPORT_COLOR};
use crate::state::AppState;
use askama::Template;
use axum::extract::State;
use axum::response::{IntoResponse, Redirect};
use axum::Form;
use log::debug;
use serde::Deserialize;
use std::sync::Arc;

const MANAGE_PATH: &str = "/add";
const NEW_SPORT_COLOR: &str = "#10b981";

#[derive(Template, askama_web::WebTemplate)]
#[template(path = "sports.html")]
pub struct SportsTemplate {
  pub sports: Vec<SportRowView>,
  pub new_sport_color: &'static str,
}

pub struct SportRowView {
  pub id: i64,
  pub name: String,
  pub color: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SportForm {
  #[serde(rename = "sportId")]
  pub sport_id: String,
  #[serde(rename = "sportName")]
  pub sport_name: String,
  #[serde(rename = "sportColor")]
  pub sport_color: String,
}

impl SportForm {
  /// Positive row id; zero, negative or unparsable ids count as missing
  fn id(&self) -> Option<i64> {
    self.sport_id.trim().parse().ok().filter(|id: &i64| *id > 0)
  }

  fn color(&self) -> &str {
    match self.sport_color.trim() {
      "" => DEFAULT_SPORT_COLOR,
      c => c,
    }
  }
}

pub async fn sports_page_action(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let sports = state.store.fetch_sports().await;
  SportsTemplate {
    sports: sports
      .into_iter()
      .filter_map(|s| {
        Some(SportRowView {
          id: s.id?,
          name: s.name,
          color: s.color,
        })
      })
      .collect(),
    new_sport_color: NEW_SPORT_COLOR,
  }
}

pub async fn add_sport_action(
  State(state): State<Arc<AppState>>,
  Form(form): Form<SportForm>,
) -> ApiResult<Redirect> {
  match Sport::from_form(None, &form.sport_name, form.color()) {
    Some(sport) => state.store.append_sport(&sport).await?,
    None => debug!("Ignoring sport without a name"),
  }
  Ok(Redirect::to(MANAGE_PATH))
}

pub async fn update_sport_action(
  State(state): State<Arc<AppState>>,
  Form(form): Form<SportForm>,
) -> ApiResult<Redirect> {
  let id = form.id();
  match (id, Sport::from_form(id, &form.sport_name, form.color())) {
    (Some(_), Some(sport)) => state.store.update_sport(&sport).await?,
    _ => debug!("Ignoring sport update without id or name"),
  }
  Ok(Redirect::to(MANAGE_PATH))
}

/// Entries logged under the sport keep their name
pub async fn delete_sport_action(
  State(state): State<Arc<AppState>>,
  Form(form): Form<SportForm>,
) -> ApiResult<Redirect> {
  match form.id() {
    Some(id) => state.store.delete_sport(id).await?,
    _ => debug!("Ignoring sport delete without a valid id"),
  }
  Ok(Redirect::to(MANAGE_PATH))
}
