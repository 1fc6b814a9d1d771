use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Canonical `YYYY-MM-DD` text for a calendar date
pub fn date_key(day: NaiveDate) -> String {
  day.format("%Y-%m-%d").to_string()
}

/// Parse a date key back into a date
pub fn parse_date_key(value: &str) -> Option<NaiveDate> {
  NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// One logged workout session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingEntry {
  pub id: Option<i64>,
  pub sport: String,
  pub day: NaiveDate,
  pub length_minutes: Option<i64>,
  pub comment: Option<String>,
}

impl TrainingEntry {
  pub fn date_key(&self) -> String {
    date_key(self.day)
  }
}

/// For submitting new entries (without id)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTrainingEntry {
  pub sport: String,
  pub day: NaiveDate,
  pub length_minutes: i64,
  pub comment: Option<String>,
}

impl NewTrainingEntry {
  /// Build a submission from raw form fields.
  ///
  /// Sport and day are required. Hours and minutes that are missing,
  /// non-numeric or negative count as zero. A total that does not fit in
  /// minutes rejects the submission.
  pub fn from_form(
    sport: &str,
    day: &str,
    hours: &str,
    minutes: &str,
    comment: &str,
  ) -> Option<Self> {
    let sport = sport.trim();
    if sport.is_empty() {
      return None;
    }
    let day = parse_date_key(day)?;

    let length_minutes = lenient_count(hours)
      .checked_mul(60)?
      .checked_add(lenient_count(minutes))?;
    let comment = comment.trim();

    Some(Self {
      sport: sport.to_string(),
      day,
      length_minutes,
      comment: (!comment.is_empty()).then(|| comment.to_string()),
    })
  }
}

fn lenient_count(value: &str) -> i64 {
  value
    .trim()
    .parse::<f64>()
    .ok()
    .filter(|v| v.is_finite() && *v > 0.0)
    .map(|v| v.trunc() as i64)
    .unwrap_or(0)
}
