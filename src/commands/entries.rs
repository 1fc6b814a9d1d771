//! Form posts that add or remove training entries

use crate::commands::dashboard_url;
use crate::error::ApiResult;
use crate::models::NewTrainingEntry;
use crate::state::AppState;
use axum::extract::State;
use axum::response::Redirect;
use axum::Form;
use log::debug;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AddEntryForm {
  pub sport: String,
  pub day: String,
  pub hours: String,
  pub minutes: String,
  pub comment: String,
  pub return_to: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeleteEntryForm {
  pub id: String,
  pub return_to: String,
}

/// Log a session; incomplete submissions are ignored
pub async fn add_entry_action(
  State(state): State<Arc<AppState>>,
  Form(form): Form<AddEntryForm>,
) -> ApiResult<Redirect> {
  match NewTrainingEntry::from_form(
    &form.sport,
    &form.day,
    &form.hours,
    &form.minutes,
    &form.comment,
  ) {
    Some(entry) => state.store.append_training_entry(&entry).await?,
    None => debug!("Ignoring incomplete entry submission"),
  }

  Ok(Redirect::to(&dashboard_url(&form.return_to)))
}

pub async fn delete_entry_action(
  State(state): State<Arc<AppState>>,
  Form(form): Form<DeleteEntryForm>,
) -> ApiResult<Redirect> {
  match form.id.trim().parse::<i64>() {
    Ok(id) if id > 0 => state.store.delete_training_entry(id).await?,
    _ => debug!("Ignoring delete without a valid id"),
  }

  Ok(Redirect::to(&dashboard_url(&form.return_to)))
}
