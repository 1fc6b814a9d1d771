//! Duration formatting for minute counts
//!
//! Durations are stored as whole minutes. The dashboard shows them as
//! "45 mins", "2h" or "1h30".

use crate::models::TrainingEntry;

/// Shown wherever a duration is missing or zero
pub const NO_VALUE: &str = "—";

/// ---------------------------------------------------------------------------
/// Duration Parts
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationParts {
  pub hours: i64,
  pub minutes: i64,
}

impl DurationParts {
  pub fn from_minutes(total: i64) -> Self {
    Self {
      hours: total / 60,
      minutes: total % 60,
    }
  }

  pub fn total_minutes(&self) -> i64 {
    self.hours * 60 + self.minutes
  }
}

/// ---------------------------------------------------------------------------
/// Formatting
/// ---------------------------------------------------------------------------

pub fn format_duration(minutes: Option<i64>) -> String {
  match minutes {
    None | Some(0) => NO_VALUE.to_string(),
    Some(total) => format_parts(DurationParts::from_minutes(total)),
  }
}

/// Same as [`format_duration`] for values coming from float arithmetic.
/// NaN and infinities are treated as missing.
pub fn format_duration_f64(minutes: f64) -> String {
  if !minutes.is_finite() {
    return NO_VALUE.to_string();
  }
  format_duration(Some(minutes.trunc() as i64))
}

fn format_parts(parts: DurationParts) -> String {
  match (parts.hours, parts.minutes) {
    (0, mins) => format!("{} mins", mins),
    (hrs, 0) => format!("{}h", hrs),
    (hrs, mins) => format!("{}h{:02}", hrs, mins),
  }
}

/// Sum of all entry durations (missing counts as zero), formatted
pub fn format_total(entries: &[TrainingEntry]) -> String {
  let total: i64 = entries.iter().filter_map(|e| e.length_minutes).sum();
  format_duration(Some(total))
}

/// ---------------------------------------------------------------------------
/// Parsing
/// ---------------------------------------------------------------------------

/// Read a formatted duration back into its parts.
/// Returns None for the placeholder and for anything not produced by
/// [`format_duration`].
pub fn parse_duration(text: &str) -> Option<DurationParts> {
  let text = text.trim();

  if let Some(mins) = text.strip_suffix(" mins") {
    let minutes = mins.parse().ok()?;
    return Some(DurationParts { hours: 0, minutes });
  }

  let (hours, rest) = text.split_once('h')?;
  let hours = hours.parse().ok()?;
  let minutes = if rest.is_empty() {
    0
  } else if rest.len() == 2 {
    rest.parse().ok()?
  } else {
    return None;
  };

  Some(DurationParts { hours, minutes })
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
