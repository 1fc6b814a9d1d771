//! Dashboard view: stat tiles, filters and one card per selected month

use crate::analysis::{
  derive_months, filter_by_activity, DashboardTotals, MonthBucket, MonthSelection, SportColors,
};
use crate::calendar::{CalendarDay, WEEKDAY_LABELS};
use crate::chart::{chart_sport, day_metrics, project, ChartMetric, ChartProjection};
use crate::commands::QueryParams;
use crate::models::{date_key, normalize_sport, Sport, TrainingEntry};
use crate::state::AppState;
use crate::time::format_duration;
use askama::Template;
use axum::extract::{RawQuery, State};
use axum::response::IntoResponse;
use chrono::{NaiveDate, Utc};
use log::debug;
use std::collections::HashSet;
use std::sync::Arc;
use url::form_urlencoded;

const MAX_DOTS: usize = 3;
const MIN_GAUGE_HEIGHT: u32 = 6;

/// ---------------------------------------------------------------------------
/// View Models
/// ---------------------------------------------------------------------------

pub struct SportOption {
  pub name: String,
  pub color: String,
  pub checked: bool,
}

pub struct MonthOption {
  pub key: String,
  pub label: String,
  pub checked: bool,
}

pub struct SportChip {
  pub name: String,
  pub color: String,
  pub duration: String,
  pub count: usize,
}

pub struct EntryView {
  pub id: i64,
  pub sport: String,
  pub color: String,
  pub comment: String,
  pub duration: String,
}

pub struct CellView {
  pub padding: bool,
  pub day: u32,
  pub date_key: String,
  pub is_today: bool,
  pub dots: Vec<String>,
  pub extra: usize,
  pub duration: String,
  pub entries: Vec<EntryView>,
}

pub struct ChartSportOption {
  pub name: String,
  pub selected: bool,
}

pub struct MonthCardView {
  pub key: String,
  pub label: String,
  pub is_current: bool,
  pub completion: u32,
  pub gauge_height: u32,
  pub active_days: usize,
  pub active_days_label: String,
  pub duration: String,
  pub sessions: usize,
  pub chips: Vec<SportChip>,
  pub cells: Vec<CellView>,
  pub chart: ChartProjection,
  pub chart_sports: Vec<ChartSportOption>,
  pub metric_is_sessions: bool,
  /// Day preselected in the add-entry form
  pub default_day: String,
  pub first_day: String,
  pub last_day: String,
}

#[derive(Template, askama_web::WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
  pub total_time: String,
  pub sessions: usize,
  pub active_days: usize,
  pub weekdays: Vec<&'static str>,
  pub sports: Vec<SportOption>,
  pub no_activity_filter: bool,
  pub activity_filters: Vec<String>,
  pub month_options: Vec<MonthOption>,
  pub month_filter_label: String,
  pub show_month_reset: bool,
  /// Every month, keeping the activity filters
  pub all_months_href: String,
  pub months: Vec<MonthCardView>,
  pub return_to: String,
  pub chart_hidden_query: Vec<(String, String)>,
}

/// ---------------------------------------------------------------------------
/// Handler
/// ---------------------------------------------------------------------------

pub async fn dashboard_action(
  State(state): State<Arc<AppState>>,
  RawQuery(query): RawQuery,
) -> impl IntoResponse {
  let params = QueryParams::parse(query.as_deref());

  let (mut entries, sports, catalog) = tokio::join!(
    state.store.fetch_training_entries(),
    state.store.fetch_sports(),
    state.store.fetch_date_catalog(),
  );
  entries.sort_by_key(|e| e.day);

  debug!(
    "Dashboard render: {} entries, {} sports, {} catalog days",
    entries.len(),
    sports.len(),
    catalog.len()
  );

  render_dashboard(&params, &entries, &sports, catalog, Utc::now().date_naive())
}

/// Build the dashboard page for already fetched data
pub fn render_dashboard(
  params: &QueryParams,
  entries: &[TrainingEntry],
  sports: &[Sport],
  catalog: Vec<NaiveDate>,
  today: NaiveDate,
) -> DashboardTemplate {
  let activity_filters = params.all("activity");
  let filtered = filter_by_activity(entries, &activity_filters);

  let catalog: HashSet<NaiveDate> = catalog.into_iter().collect();
  let range = derive_months(&filtered, today, Some(&catalog));

  let selection = MonthSelection::from_params(&params.all("monthKey"));
  let selected_keys = range.selected_keys(&selection);

  let metric = ChartMetric::from_param(params.first("metric"));
  let requested_chart = params.first("chart");
  let colors = SportColors::from_sports(sports);
  let totals = DashboardTotals::compute(&filtered);

  let checked: HashSet<String> = activity_filters.iter().map(|a| normalize_sport(a)).collect();
  let sport_options = sports
    .iter()
    .map(|s| SportOption {
      name: s.name.clone(),
      color: s.color.clone(),
      checked: checked.contains(&normalize_sport(&s.name)),
    })
    .collect();

  let month_options = range
    .buckets
    .iter()
    .map(|b| MonthOption {
      key: b.key.clone(),
      label: b.label.clone(),
      checked: selected_keys.contains(&b.key),
    })
    .collect();

  let month_filter_label = if selected_keys.is_empty() {
    "Tous les mois".to_string()
  } else {
    format!("{} mois sélectionnés", selected_keys.len())
  };
  let all_months_href = all_months_link(&activity_filters);
  let show_month_reset = selected_keys
    .first()
    .is_some_and(|k| Some(k) != range.default_key.as_ref());

  let months = range
    .select(&selection)
    .into_iter()
    .map(|bucket| {
      month_card(
        bucket,
        &colors,
        &activity_filters,
        metric,
        requested_chart,
        today,
      )
    })
    .collect();

  DashboardTemplate {
    total_time: totals.total_time,
    sessions: totals.sessions,
    active_days: totals.active_days,
    weekdays: WEEKDAY_LABELS.to_vec(),
    sports: sport_options,
    no_activity_filter: checked.iter().all(|c| c.is_empty()),
    activity_filters,
    month_options,
    month_filter_label,
    show_month_reset,
    all_months_href,
    months,
    return_to: params.to_query_string(),
    chart_hidden_query: hidden_pairs(&params.without(&["metric", "chart"])),
  }
}

fn all_months_link(activity_filters: &[String]) -> String {
  let mut query = form_urlencoded::Serializer::new(String::new());
  for activity in activity_filters {
    query.append_pair("activity", activity);
  }
  query.append_pair("monthKey", "");
  format!("/?{}", query.finish())
}

fn hidden_pairs(params: &QueryParams) -> Vec<(String, String)> {
  let mut pairs = Vec::new();
  for name in ["activity", "monthKey"] {
    for value in params.all(name) {
      pairs.push((name.to_string(), value));
    }
  }
  pairs
}

fn month_card(
  bucket: &MonthBucket,
  colors: &SportColors,
  activity_filters: &[String],
  metric: ChartMetric,
  requested_chart: Option<&str>,
  today: NaiveDate,
) -> MonthCardView {
  let chips = bucket
    .sport_summary
    .iter()
    .map(|s| SportChip {
      name: s.name.clone(),
      color: colors.chip_color(&s.name),
      duration: s.duration(),
      count: s.count,
    })
    .collect();

  let plotted = chart_sport(&bucket.sport_summary, requested_chart, activity_filters);
  let chart = project(&day_metrics(&bucket.days), metric, plotted.as_deref());
  let chart_sports = bucket
    .sport_summary
    .iter()
    .map(|s| ChartSportOption {
      name: s.name.clone(),
      selected: plotted.as_deref() == Some(s.name.as_str()),
    })
    .collect();

  let today_key = date_key(today);
  let cells = bucket
    .days
    .iter()
    .map(|cell| cell_view(cell, colors, &today_key))
    .collect();

  let first_day = crate::calendar::first_of_month(bucket.year, bucket.month0).unwrap_or(today);
  let last_day = first_day
    .checked_add_months(chrono::Months::new(1))
    .and_then(|d| d.pred_opt())
    .unwrap_or(first_day);
  let default_day = if bucket.is_current { today } else { first_day };

  MonthCardView {
    key: bucket.key.clone(),
    label: bucket.label.clone(),
    is_current: bucket.is_current,
    completion: bucket.completion,
    gauge_height: bucket.completion.max(MIN_GAUGE_HEIGHT),
    active_days: bucket.active_days,
    active_days_label: active_days_label(bucket.active_days),
    duration: bucket.total_duration(),
    sessions: bucket.session_count(),
    chips,
    cells,
    chart,
    chart_sports,
    metric_is_sessions: metric == ChartMetric::Sessions,
    default_day: date_key(default_day),
    first_day: date_key(first_day),
    last_day: date_key(last_day),
  }
}

fn active_days_label(count: usize) -> String {
  if count == 1 {
    "1 jour actif".to_string()
  } else {
    format!("{} jours actifs", count)
  }
}

fn cell_view(cell: &CalendarDay, colors: &SportColors, today_key: &str) -> CellView {
  let Some(day) = cell.day else {
    return CellView {
      padding: true,
      day: 0,
      date_key: String::new(),
      is_today: false,
      dots: vec![],
      extra: 0,
      duration: String::new(),
      entries: vec![],
    };
  };

  let key = cell.date_key().unwrap_or_default();
  let entries: Vec<EntryView> = cell
    .entries
    .iter()
    .map(|e| EntryView {
      id: e.id.unwrap_or(0),
      sport: e.sport.clone(),
      color: colors.entry_color(&e.sport),
      comment: e.comment.clone().unwrap_or_default(),
      duration: format_duration(e.length_minutes),
    })
    .collect();

  CellView {
    padding: false,
    day,
    is_today: key == today_key,
    date_key: key,
    dots: cell
      .entries
      .iter()
      .take(MAX_DOTS)
      .map(|e| colors.entry_color(&e.sport))
      .collect(),
    extra: cell.entries.len().saturating_sub(MAX_DOTS),
    duration: if cell.entries.is_empty() {
      String::new()
    } else {
      format_duration(Some(cell.total_minutes()))
    },
    entries,
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
