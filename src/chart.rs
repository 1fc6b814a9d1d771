//! Per-day chart projection for a month card

use crate::analysis::SportSummary;
use crate::calendar::CalendarDay;
use crate::models::normalize_sport;
use crate::time::format_duration;
use std::collections::HashMap;

const X_STEP: f64 = 28.0;
const X_OFFSET: f64 = 16.0;
const BASELINE_Y: f64 = 120.0;
const PLOT_HEIGHT: f64 = 100.0;
const MIN_WIDTH: f64 = 120.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartMetric {
  #[default]
  Minutes,
  Sessions,
}

impl ChartMetric {
  pub fn from_param(value: Option<&str>) -> Self {
    match value.map(str::trim) {
      Some("seances") => Self::Sessions,
      _ => Self::Minutes,
    }
  }

  pub fn as_param(&self) -> &'static str {
    match self {
      Self::Minutes => "temps",
      Self::Sessions => "seances",
    }
  }

  fn label(&self, value: i64) -> String {
    match self {
      Self::Minutes => format_duration(Some(value)),
      Self::Sessions => value.to_string(),
    }
  }
}

/// Aggregates for one real day of a month
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayMetric {
  pub day: u32,
  pub minutes: i64,
  pub sessions: usize,
  /// Minutes per normalized sport name
  pub by_sport: HashMap<String, i64>,
  /// Sessions per normalized sport name
  pub sessions_by_sport: HashMap<String, usize>,
}

pub fn day_metrics(days: &[CalendarDay]) -> Vec<DayMetric> {
  days
    .iter()
    .filter_map(|cell| {
      let day = cell.day?;
      let mut by_sport = HashMap::new();
      let mut sessions_by_sport = HashMap::new();
      for entry in &cell.entries {
        let key = normalize_sport(&entry.sport);
        *by_sport.entry(key.clone()).or_insert(0) += entry.length_minutes.unwrap_or(0);
        *sessions_by_sport.entry(key).or_insert(0) += 1;
      }
      Some(DayMetric {
        day,
        minutes: cell.total_minutes(),
        sessions: cell.entries.len(),
        by_sport,
        sessions_by_sport,
      })
    })
    .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
  pub day: u32,
  pub value: i64,
  pub x: f64,
  pub y: f64,
  pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartProjection {
  pub metric: ChartMetric,
  pub sport: Option<String>,
  pub points: Vec<ChartPoint>,
  /// Largest plotted value, never below 1
  pub max_value: i64,
  pub width: f64,
}

impl ChartProjection {
  /// `points` attribute for an SVG polyline
  pub fn polyline(&self) -> String {
    self
      .points
      .iter()
      .map(|p| format!("{},{}", p.x, p.y))
      .collect::<Vec<_>>()
      .join(" ")
  }

  pub fn max_label(&self) -> String {
    self.metric.label(self.max_value)
  }
}

/// Project day metrics into plotted points, optionally for a single sport
pub fn project(metrics: &[DayMetric], metric: ChartMetric, sport: Option<&str>) -> ChartProjection {
  let sport_key = sport.map(normalize_sport).filter(|s| !s.is_empty());

  let values: Vec<(u32, i64)> = metrics
    .iter()
    .map(|m| {
      let value = match (metric, &sport_key) {
        (ChartMetric::Minutes, Some(key)) => m.by_sport.get(key).copied().unwrap_or(0),
        (ChartMetric::Minutes, None) => m.minutes,
        (ChartMetric::Sessions, Some(key)) => {
          m.sessions_by_sport.get(key).copied().unwrap_or(0) as i64
        }
        (ChartMetric::Sessions, None) => m.sessions as i64,
      };
      (m.day, value)
    })
    .collect();

  let max_value = values.iter().map(|(_, v)| *v).max().unwrap_or(1).max(1);

  let points = values
    .into_iter()
    .enumerate()
    .map(|(idx, (day, value))| ChartPoint {
      day,
      value,
      x: idx as f64 * X_STEP + X_OFFSET,
      y: BASELINE_Y - (value as f64 / max_value as f64) * PLOT_HEIGHT,
      label: metric.label(value),
    })
    .collect::<Vec<_>>();

  let width = (points.len() as f64 * X_STEP + X_OFFSET * 2.0).max(MIN_WIDTH);

  ChartProjection {
    metric,
    sport: sport.map(str::to_string),
    points,
    max_value,
    width,
  }
}

/// Sport plotted when the user hasn't picked one: the first month sport that
/// matches an active filter, else the month's first sport
pub fn default_chart_sport(summary: &[SportSummary], filters: &[String]) -> Option<String> {
  let wanted: Vec<String> = filters.iter().map(|f| normalize_sport(f)).collect();
  summary
    .iter()
    .find(|s| wanted.contains(&normalize_sport(&s.name)))
    .or_else(|| summary.first())
    .map(|s| s.name.clone())
}

/// Resolve the requested chart sport against the month's sports
pub fn chart_sport(
  summary: &[SportSummary],
  requested: Option<&str>,
  filters: &[String],
) -> Option<String> {
  let requested = requested.map(normalize_sport).filter(|r| !r.is_empty());
  requested
    .and_then(|r| summary.iter().find(|s| normalize_sport(&s.name) == r))
    .map(|s| s.name.clone())
    .or_else(|| default_chart_sport(summary, filters))
}
