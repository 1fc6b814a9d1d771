//! Data-access layer for the hosted training store
//!
//! Rows come back from a PostgREST-style API. Reads are paginated with a
//! `Range` header and validated row by row; writes go through plain
//! POST / PATCH / DELETE calls.

use crate::config::StoreConfig;
use crate::models::{
  date_key, normalize_color, NewTrainingEntry, Sport, TrainingEntry,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use log::{debug, info, warn};
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

/// Maximum rows the store returns per request
pub const PAGE_SIZE: usize = 1000;

const ENTRY_TABLE: &str = "SZ_activity";
const SPORT_TABLE: &str = "SZ_list_activity";

const ENTRY_QUERY: &str = "select=id,activity,day,length,comment&order=day.asc";
const SPORT_QUERY: &str = "select=id,activity,color&order=id.asc";
const DAY_CATALOG_QUERY: &str = "select=day&order=day.asc&distinct=day";

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  #[error("HTTP request failed: {0}")]
  Request(#[from] reqwest::Error),

  #[error("Store request failed ({status}): {body}")]
  Status { status: u16, body: String },

  #[error("Failed to parse store response: {0}")]
  Parse(String),
}

/// ---------------------------------------------------------------------------
/// Raw Rows
/// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct EntryRow {
  id: Option<i64>,
  activity: Option<String>,
  day: Option<String>,
  length: Option<f64>,
  comment: Option<String>,
}

impl EntryRow {
  fn into_entry(self) -> Option<TrainingEntry> {
    let id = self.id?;
    let sport = self.activity.filter(|a| !a.is_empty())?;
    let day = normalize_day(self.day.as_deref()?)?;
    let length_minutes = self
      .length
      .filter(|l| l.is_finite() && *l >= 0.0)
      .map(|l| l.trunc() as i64);

    Some(TrainingEntry {
      id: Some(id),
      sport,
      day,
      length_minutes,
      comment: self.comment,
    })
  }
}

#[derive(Debug, Deserialize)]
struct SportRow {
  id: Option<i64>,
  activity: Option<String>,
  color: Option<String>,
}

impl SportRow {
  fn into_sport(self) -> Option<Sport> {
    let id = self.id?;
    let name = self.activity.filter(|a| !a.is_empty())?;
    Some(Sport {
      id: Some(id),
      name,
      color: normalize_color(self.color.as_deref()),
    })
  }
}

#[derive(Debug, Deserialize)]
struct DayRow {
  day: Option<String>,
}

#[derive(Debug, Serialize)]
struct EntryPayload<'a> {
  activity: &'a str,
  day: String,
  length: i64,
  #[serde(skip_serializing_if = "Option::is_none")]
  comment: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct SportPayload<'a> {
  activity: &'a str,
  color: &'a str,
}

/// Normalize a stored day value into a calendar date.
///
/// Accepts plain dates as well as timestamps (with or without offset);
/// timestamps are converted to their UTC date.
pub fn normalize_day(value: &str) -> Option<NaiveDate> {
  let value = value.trim();

  if let Ok(day) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
    return Some(day);
  }
  if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
    return Some(ts.with_timezone(&Utc).date_naive());
  }
  if let Ok(ts) = DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f%#z") {
    return Some(ts.with_timezone(&Utc).date_naive());
  }
  ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
    .iter()
    .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
    .map(|ts| ts.date())
}

/// Deserialize each raw row on its own, dropping the ones that don't fit
fn decode_rows<T: DeserializeOwned>(rows: Vec<serde_json::Value>) -> Vec<T> {
  rows
    .into_iter()
    .filter_map(|row| serde_json::from_value(row).ok())
    .collect()
}

/// ---------------------------------------------------------------------------
/// Store Client
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct StoreClient {
  client: Client,
  config: StoreConfig,
}

impl StoreClient {
  pub fn new(config: StoreConfig) -> Self {
    Self {
      client: Client::new(),
      config,
    }
  }

  fn request(&self, method: Method, path: &str) -> RequestBuilder {
    self
      .client
      .request(method, format!("{}{}", self.config.base_url, path))
      .header("apikey", &self.config.anon_key)
      .bearer_auth(&self.config.anon_key)
      .header(CONTENT_TYPE, "application/json")
      .header("Prefer", "return=representation")
      .header(CACHE_CONTROL, "no-store")
  }

  async fn send(&self, request: RequestBuilder) -> Result<Response, StoreError> {
    let response = request.send().await?;

    if !response.status().is_success() {
      let status = response.status().as_u16();
      let body = response.text().await.unwrap_or_default();
      return Err(StoreError::Status { status, body });
    }

    Ok(response)
  }

  /// Fetch every row behind `path`, one page at a time.
  ///
  /// Stops at the first page shorter than [`PAGE_SIZE`].
  pub async fn fetch_all_rows(&self, path: &str) -> Result<Vec<serde_json::Value>, StoreError> {
    let mut rows = Vec::new();
    let mut start = 0;

    loop {
      let range = format!("{}-{}", start, start + PAGE_SIZE - 1);
      let response = self
        .send(self.request(Method::GET, path).header("Range", range))
        .await?;
      let text = response.text().await?;

      let page: Vec<serde_json::Value> =
        serde_json::from_str(&text).map_err(|e| StoreError::Parse(e.to_string()))?;
      let page_len = page.len();
      rows.extend(page);

      if page_len < PAGE_SIZE {
        break;
      }
      start += PAGE_SIZE;
    }

    Ok(rows)
  }

  /// -------------------------------------------------------------------------
  /// Reads
  /// -------------------------------------------------------------------------

  pub async fn try_fetch_training_entries(&self) -> Result<Vec<TrainingEntry>, StoreError> {
    let raw = self
      .fetch_all_rows(&format!("/rest/v1/{}?{}", ENTRY_TABLE, ENTRY_QUERY))
      .await?;
    let raw_count = raw.len();

    let entries: Vec<TrainingEntry> = decode_rows::<EntryRow>(raw)
      .into_iter()
      .filter_map(EntryRow::into_entry)
      .collect();

    if entries.len() < raw_count {
      debug!("Dropped {} malformed entry rows", raw_count - entries.len());
    }
    Ok(entries)
  }

  /// All training entries ordered by day; empty on any failure
  pub async fn fetch_training_entries(&self) -> Vec<TrainingEntry> {
    self
      .try_fetch_training_entries()
      .await
      .unwrap_or_else(|e| {
        warn!("Failed to fetch training entries: {}", e);
        vec![]
      })
  }

  pub async fn try_fetch_sports(&self) -> Result<Vec<Sport>, StoreError> {
    let raw = self
      .fetch_all_rows(&format!("/rest/v1/{}?{}", SPORT_TABLE, SPORT_QUERY))
      .await?;
    Ok(
      decode_rows::<SportRow>(raw)
        .into_iter()
        .filter_map(SportRow::into_sport)
        .collect(),
    )
  }

  /// Sport catalog ordered by id; empty on any failure
  pub async fn fetch_sports(&self) -> Vec<Sport> {
    self.try_fetch_sports().await.unwrap_or_else(|e| {
      warn!("Failed to fetch sports: {}", e);
      vec![]
    })
  }

  pub async fn try_fetch_date_catalog(&self) -> Result<Vec<NaiveDate>, StoreError> {
    let raw = self
      .fetch_all_rows(&format!("/rest/v1/{}?{}", ENTRY_TABLE, DAY_CATALOG_QUERY))
      .await?;
    Ok(
      decode_rows::<DayRow>(raw)
        .into_iter()
        .filter_map(|row| row.day.as_deref().and_then(normalize_day))
        .collect(),
    )
  }

  /// Distinct days that have at least one entry; empty on any failure
  pub async fn fetch_date_catalog(&self) -> Vec<NaiveDate> {
    self.try_fetch_date_catalog().await.unwrap_or_else(|e| {
      warn!("Failed to fetch date catalog: {}", e);
      vec![]
    })
  }

  /// -------------------------------------------------------------------------
  /// Mutations
  /// -------------------------------------------------------------------------

  pub async fn append_training_entry(&self, entry: &NewTrainingEntry) -> Result<(), StoreError> {
    let payload = EntryPayload {
      activity: &entry.sport,
      day: date_key(entry.day),
      length: entry.length_minutes,
      comment: entry.comment.as_deref(),
    };

    self
      .send(
        self
          .request(Method::POST, &format!("/rest/v1/{}", ENTRY_TABLE))
          .json(&payload),
      )
      .await?;

    info!(
      "Logged {} on {} ({} min)",
      entry.sport, payload.day, entry.length_minutes
    );
    Ok(())
  }

  pub async fn delete_training_entry(&self, id: i64) -> Result<(), StoreError> {
    self
      .send(self.request(
        Method::DELETE,
        &format!("/rest/v1/{}?id=eq.{}", ENTRY_TABLE, id),
      ))
      .await?;

    info!("Deleted training entry {}", id);
    Ok(())
  }

  pub async fn append_sport(&self, sport: &Sport) -> Result<(), StoreError> {
    let payload = SportPayload {
      activity: &sport.name,
      color: &sport.color,
    };

    self
      .send(
        self
          .request(Method::POST, &format!("/rest/v1/{}", SPORT_TABLE))
          .json(&payload),
      )
      .await?;

    info!("Added sport {}", sport.name);
    Ok(())
  }

  /// Update name and color; does nothing for a sport without id
  pub async fn update_sport(&self, sport: &Sport) -> Result<(), StoreError> {
    let Some(id) = sport.id else {
      return Ok(());
    };
    let payload = SportPayload {
      activity: &sport.name,
      color: &sport.color,
    };

    self
      .send(
        self
          .request(
            Method::PATCH,
            &format!("/rest/v1/{}?id=eq.{}", SPORT_TABLE, id),
          )
          .json(&payload),
      )
      .await?;

    info!("Updated sport {} ({})", id, sport.name);
    Ok(())
  }

  /// Entries that reference the sport by name are left untouched
  pub async fn delete_sport(&self, id: i64) -> Result<(), StoreError> {
    self
      .send(self.request(
        Method::DELETE,
        &format!("/rest/v1/{}?id=eq.{}", SPORT_TABLE, id),
      ))
      .await?;

    info!("Deleted sport {}", id);
    Ok(())
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
