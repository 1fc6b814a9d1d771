//! Test utilities and helpers for unit and route testing
//!
//! This module provides common test infrastructure including:
//! - Fake store setup on top of mockito
//! - Mock data factories
//! - Row payload builders

use crate::config::StoreConfig;
use crate::models::{parse_date_key, Sport, TrainingEntry};
use crate::store::StoreClient;
use chrono::NaiveDate;
use serde_json::json;

pub const TEST_API_KEY: &str = "test-anon-key";

/// ---------------------------------------------------------------------------
/// Store Test Utilities
/// ---------------------------------------------------------------------------

/// Store client pointed at a mockito server
pub fn test_store(server: &mockito::ServerGuard) -> StoreClient {
  StoreClient::new(StoreConfig::new(server.url(), TEST_API_KEY))
}

/// JSON array of `count` valid entry rows with ids `start..start + count`
pub fn entry_rows_json(start: usize, count: usize) -> String {
  let rows: Vec<serde_json::Value> = (start..start + count)
    .map(|i| {
      json!({
        "id": i,
        "activity": if i % 2 == 0 { "Run" } else { "Ride" },
        "day": format!("2024-01-{:02}", i % 28 + 1),
        "length": 30,
        "comment": null
      })
    })
    .collect();
  serde_json::Value::Array(rows).to_string()
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

pub fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// Create a persisted training entry for testing
pub fn mock_entry(id: i64, sport: &str, day: &str, minutes: i64) -> TrainingEntry {
  TrainingEntry {
    id: Some(id),
    sport: sport.to_string(),
    day: parse_date_key(day).expect("valid test day"),
    length_minutes: Some(minutes),
    comment: None,
  }
}

pub fn mock_sport(id: i64, name: &str, color: &str) -> Sport {
  Sport {
    id: Some(id),
    name: name.to_string(),
    color: color.to_string(),
  }
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_entry_rows_json_shape() {
    let rows: Vec<serde_json::Value> = serde_json::from_str(&entry_rows_json(10, 3)).unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["id"], 10);
    assert_eq!(rows[2]["id"], 12);
  }

  #[test]
  fn test_mock_factories_create_valid_data() {
    let entry = mock_entry(1, "Trail", "2024-03-05", 90);
    assert_eq!(entry.date_key(), "2024-03-05");
    assert_eq!(entry.length_minutes, Some(90));

    let sport = mock_sport(2, "Yoga", "#10b981");
    assert_eq!(sport.id, Some(2));
  }
}
