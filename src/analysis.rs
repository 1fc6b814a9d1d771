//! Month buckets and aggregates for the dashboard
//!
//! Everything here is recomputed from the flat entry list on each render.
//! Months are zero-based (January = 0) and keyed as `"{year}-{month}"`.

use crate::calendar::{build_calendar, CalendarDay};
use crate::models::{normalize_sport, Sport, TrainingEntry, DEFAULT_SPORT_COLOR};
use crate::time::{format_duration, format_total};
use chrono::{Datelike, NaiveDate};
use std::collections::{HashMap, HashSet};

/// Color for entries whose sport is no longer in the catalog
pub const ORPHAN_SPORT_COLOR: &str = "#94a3b8";

const MONTH_NAMES: [&str; 12] = [
  "janvier",
  "février",
  "mars",
  "avril",
  "mai",
  "juin",
  "juillet",
  "août",
  "septembre",
  "octobre",
  "novembre",
  "décembre",
];

pub fn month_key(year: i32, month0: u32) -> String {
  format!("{}-{}", year, month0)
}

pub fn month_label(year: i32, month0: u32) -> String {
  let name = MONTH_NAMES.get(month0 as usize).copied().unwrap_or("?");
  format!("{} {}", name, year)
}

/// Share of real days with at least one entry, rounded to a whole percent
pub fn completion_percentage(active_days: usize, real_days: usize) -> u32 {
  if real_days == 0 {
    return 0;
  }
  (active_days as f64 / real_days as f64 * 100.0).round() as u32
}

/// ---------------------------------------------------------------------------
/// Per-Sport Summary
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SportSummary {
  pub name: String,
  pub minutes: i64,
  pub count: usize,
}

impl SportSummary {
  pub fn duration(&self) -> String {
    format_duration(Some(self.minutes))
  }
}

/// Totals per exact sport name, in first-seen order
pub fn summarize_sports(entries: &[TrainingEntry]) -> Vec<SportSummary> {
  let mut summary: Vec<SportSummary> = Vec::new();
  let mut index: HashMap<&str, usize> = HashMap::new();

  for entry in entries {
    let minutes = entry.length_minutes.unwrap_or(0);
    match index.get(entry.sport.as_str()) {
      Some(&i) => {
        summary[i].minutes += minutes;
        summary[i].count += 1;
      }
      None => {
        index.insert(&entry.sport, summary.len());
        summary.push(SportSummary {
          name: entry.sport.clone(),
          minutes,
          count: 1,
        });
      }
    }
  }

  summary
}

/// ---------------------------------------------------------------------------
/// Activity Filter and Colors
/// ---------------------------------------------------------------------------

/// Keep entries whose sport matches one of the filters (case and surrounding
/// whitespace ignored). No filters keeps everything.
pub fn filter_by_activity(entries: &[TrainingEntry], filters: &[String]) -> Vec<TrainingEntry> {
  let wanted: HashSet<String> = filters
    .iter()
    .map(|f| normalize_sport(f))
    .filter(|f| !f.is_empty())
    .collect();

  entries
    .iter()
    .filter(|e| wanted.is_empty() || wanted.contains(&normalize_sport(&e.sport)))
    .cloned()
    .collect()
}

/// Sport colors keyed by normalized name
#[derive(Debug, Clone, Default)]
pub struct SportColors {
  colors: HashMap<String, String>,
}

impl SportColors {
  pub fn from_sports(sports: &[Sport]) -> Self {
    Self {
      colors: sports
        .iter()
        .map(|s| (normalize_sport(&s.name), s.color.clone()))
        .collect(),
    }
  }

  pub fn get(&self, sport: &str) -> Option<&str> {
    self.colors.get(&normalize_sport(sport)).map(String::as_str)
  }

  /// Color for detail lists; unknown sports get a neutral grey
  pub fn entry_color(&self, sport: &str) -> String {
    self.get(sport).unwrap_or(ORPHAN_SPORT_COLOR).to_string()
  }

  /// Color for summary chips; unknown sports get white
  pub fn chip_color(&self, sport: &str) -> String {
    self.get(sport).unwrap_or(DEFAULT_SPORT_COLOR).to_string()
  }
}

/// ---------------------------------------------------------------------------
/// Dashboard Totals
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardTotals {
  pub total_time: String,
  pub sessions: usize,
  pub active_days: usize,
}

impl DashboardTotals {
  pub fn compute(entries: &[TrainingEntry]) -> Self {
    let days: HashSet<NaiveDate> = entries.iter().map(|e| e.day).collect();
    Self {
      total_time: format_total(entries),
      sessions: entries.len(),
      active_days: days.len(),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Month Buckets
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthBucket {
  pub year: i32,
  pub month0: u32,
  pub key: String,
  pub label: String,
  pub days: Vec<CalendarDay>,
  pub entries: Vec<TrainingEntry>,
  pub active_days: usize,
  pub completion: u32,
  pub sport_summary: Vec<SportSummary>,
  pub is_current: bool,
}

impl MonthBucket {
  pub fn build(
    year: i32,
    month0: u32,
    entries: Vec<TrainingEntry>,
    today: NaiveDate,
    allowed: Option<&HashSet<NaiveDate>>,
  ) -> Self {
    let days = build_calendar(year, month0, &entries, allowed);
    let active_days = entries.iter().map(|e| e.day).collect::<HashSet<_>>().len();
    let real_days = days.iter().filter(|d| !d.is_padding()).count();

    Self {
      year,
      month0,
      key: month_key(year, month0),
      label: month_label(year, month0),
      active_days,
      completion: completion_percentage(active_days, real_days),
      sport_summary: summarize_sports(&entries),
      is_current: today.year() == year && today.month0() == month0,
      days,
      entries,
    }
  }

  pub fn total_duration(&self) -> String {
    format_total(&self.entries)
  }

  pub fn session_count(&self) -> usize {
    self.days.iter().map(|d| d.entries.len()).sum()
  }
}

/// Every selectable month plus the month shown by default
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthRange {
  pub buckets: Vec<MonthBucket>,
  pub default_key: Option<String>,
}

/// Month order within a year: the current year starts at the current month
/// and wraps, other years run January to December.
fn month_order(year: i32, today: NaiveDate) -> Vec<u32> {
  if year == today.year() {
    let start = today.month0();
    (start..12).chain(0..start).collect()
  } else {
    (0..12).collect()
  }
}

/// Derive all month buckets from an entry list.
///
/// `catalog` is the set of days known to have entries. Months with no
/// (filtered) entries but some catalog days only show those days.
pub fn derive_months(
  entries: &[TrainingEntry],
  today: NaiveDate,
  catalog: Option<&HashSet<NaiveDate>>,
) -> MonthRange {
  let current_year = today.year();

  let mut by_month: HashMap<(i32, u32), Vec<TrainingEntry>> = HashMap::new();
  for entry in entries {
    by_month
      .entry((entry.day.year(), entry.day.month0()))
      .or_default()
      .push(entry.clone());
  }

  let catalog_for = |year: i32, month0: u32| -> Option<HashSet<NaiveDate>> {
    let days: HashSet<NaiveDate> = catalog?
      .iter()
      .filter(|d| d.year() == year && d.month0() == month0)
      .copied()
      .collect();
    (!days.is_empty()).then_some(days)
  };

  let mut build = |year: i32, month0: u32| -> MonthBucket {
    let month_entries = by_month.remove(&(year, month0)).unwrap_or_default();
    let allowed = if month_entries.is_empty() {
      catalog_for(year, month0)
    } else {
      None
    };
    MonthBucket::build(year, month0, month_entries, today, allowed.as_ref())
  };

  let buckets: Vec<MonthBucket> = if entries.is_empty() {
    [current_year, current_year + 1]
      .into_iter()
      .flat_map(|year| (0..12).map(move |m| (year, m)))
      .map(|(year, m)| build(year, m))
      .collect()
  } else {
    let min_year = entries
      .iter()
      .map(|e| e.day.year())
      .min()
      .unwrap_or(current_year)
      .min(current_year);
    let max_year = entries
      .iter()
      .map(|e| e.day.year())
      .max()
      .unwrap_or(current_year)
      .max(current_year + 1);

    let mut years: Vec<i32> = (min_year..=max_year).collect();
    years.sort_by_key(|&y| (y != current_year, y));

    years
      .into_iter()
      .flat_map(|year| month_order(year, today).into_iter().map(move |m| (year, m)))
      .map(|(year, m)| build(year, m))
      .collect()
  };

  let now_key = month_key(current_year, today.month0());
  let default_key = buckets
    .iter()
    .find(|b| b.key == now_key)
    .or_else(|| buckets.first())
    .map(|b| b.key.clone());

  MonthRange {
    buckets,
    default_key,
  }
}

/// ---------------------------------------------------------------------------
/// Month Selection
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonthSelection {
  /// Nothing requested: show the default month
  Default,
  /// Explicitly asked for every month
  All,
  Keys(Vec<String>),
}

impl MonthSelection {
  /// Interpret raw `monthKey` query values. Present-but-blank values select
  /// every month.
  pub fn from_params(values: &[String]) -> Self {
    if values.is_empty() {
      return Self::Default;
    }
    let keys: Vec<String> = values
      .iter()
      .map(|v| v.trim().to_string())
      .filter(|v| !v.is_empty())
      .collect();
    if keys.is_empty() {
      Self::All
    } else {
      Self::Keys(keys)
    }
  }
}

impl MonthRange {
  /// Keys that end up selected for `selection`; empty means all months
  pub fn selected_keys(&self, selection: &MonthSelection) -> Vec<String> {
    match selection {
      MonthSelection::Default => self.default_key.iter().cloned().collect(),
      MonthSelection::All => vec![],
      MonthSelection::Keys(keys) => keys.clone(),
    }
  }

  pub fn select(&self, selection: &MonthSelection) -> Vec<&MonthBucket> {
    let keys = self.selected_keys(selection);
    self
      .buckets
      .iter()
      .filter(|b| keys.is_empty() || keys.contains(&b.key))
      .collect()
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
