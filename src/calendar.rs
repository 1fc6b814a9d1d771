//! Monday-first month grids

use crate::models::{date_key, TrainingEntry};
use chrono::{Datelike, NaiveDate};
use std::collections::{HashMap, HashSet};

pub const WEEKDAY_LABELS: [&str; 7] = ["M", "T", "W", "T", "F", "S", "S"];

/// One cell of a month grid. Padding cells have no day and no date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDay {
  pub day: Option<u32>,
  pub date: Option<NaiveDate>,
  pub entries: Vec<TrainingEntry>,
}

impl CalendarDay {
  fn padding() -> Self {
    Self {
      day: None,
      date: None,
      entries: vec![],
    }
  }

  pub fn is_padding(&self) -> bool {
    self.day.is_none()
  }

  pub fn date_key(&self) -> Option<String> {
    self.date.map(date_key)
  }

  pub fn total_minutes(&self) -> i64 {
    self.entries.iter().filter_map(|e| e.length_minutes).sum()
  }
}

/// First day of a zero-based month, None when out of chrono's range
pub fn first_of_month(year: i32, month0: u32) -> Option<NaiveDate> {
  NaiveDate::from_ymd_opt(year, month0 + 1, 1)
}

pub fn days_in_month(year: i32, month0: u32) -> u32 {
  let next = if month0 >= 11 {
    NaiveDate::from_ymd_opt(year + 1, 1, 1)
  } else {
    NaiveDate::from_ymd_opt(year, month0 + 2, 1)
  };
  next
    .and_then(|d| d.pred_opt())
    .map(|d| d.day())
    .unwrap_or(0)
}

/// Empty cells before day 1 so that weeks start on Monday
pub fn leading_padding(year: i32, month0: u32) -> usize {
  first_of_month(year, month0)
    .map(|d| d.weekday().num_days_from_monday() as usize)
    .unwrap_or(0)
}

/// Build the grid for one month.
///
/// `entries` are grouped by exact date. When `allowed` is given, only days
/// whose date is in the set get a cell; otherwise every day of the month does.
pub fn build_calendar(
  year: i32,
  month0: u32,
  entries: &[TrainingEntry],
  allowed: Option<&HashSet<NaiveDate>>,
) -> Vec<CalendarDay> {
  let mut grouped: HashMap<NaiveDate, Vec<TrainingEntry>> = HashMap::new();
  for entry in entries {
    grouped.entry(entry.day).or_default().push(entry.clone());
  }

  let offset = leading_padding(year, month0);
  let total = days_in_month(year, month0);

  let mut cells: Vec<CalendarDay> = (0..offset).map(|_| CalendarDay::padding()).collect();

  for day in 1..=total {
    let Some(date) = NaiveDate::from_ymd_opt(year, month0 + 1, day) else {
      continue;
    };
    if allowed.is_some_and(|set| !set.contains(&date)) {
      continue;
    }
    cells.push(CalendarDay {
      day: Some(day),
      date: Some(date),
      entries: grouped.remove(&date).unwrap_or_default(),
    });
  }

  cells
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::*;
  use chrono::Weekday;

  #[test]
  fn test_days_in_month() {
    assert_eq!(days_in_month(2024, 1), 29);
    assert_eq!(days_in_month(2023, 1), 28);
    assert_eq!(days_in_month(2024, 11), 31);
    assert_eq!(days_in_month(2024, 3), 30);
  }

  #[test]
  fn test_cell_count_and_alignment_for_many_months() {
    for year in 1999..=2031 {
      for month0 in 0..12 {
        let cells = build_calendar(year, month0, &[], None);
        let padding = leading_padding(year, month0);
        assert!(padding <= 6);
        assert_eq!(cells.len(), padding + days_in_month(year, month0) as usize);
        assert!(cells[..padding].iter().all(CalendarDay::is_padding));

        // Column of day 1 matches its weekday, Monday = column 0
        let first = &cells[padding];
        assert_eq!(first.day, Some(1));
        let weekday = first.date.unwrap().weekday();
        assert_eq!(weekday.num_days_from_monday() as usize, padding % 7);
      }
    }
  }

  #[test]
  fn test_known_month_layout() {
    // 1 March 2024 is a Friday
    let cells = build_calendar(2024, 2, &[], None);
    assert_eq!(leading_padding(2024, 2), 4);
    assert_eq!(cells[4].date.unwrap().weekday(), Weekday::Fri);
    assert_eq!(cells.len(), 35);

    // 1 September 2024 is a Sunday
    assert_eq!(leading_padding(2024, 8), 6);
    // 1 April 2024 is a Monday
    assert_eq!(leading_padding(2024, 3), 0);
  }

  #[test]
  fn test_entries_grouped_per_day() {
    let entries = vec![
      mock_entry(1, "Trail", "2024-03-05", 60),
      mock_entry(2, "Yoga", "2024-03-05", 30),
      mock_entry(3, "Trail", "2024-03-07", 45),
    ];
    let cells = build_calendar(2024, 2, &entries, None);

    let fifth = cells.iter().find(|c| c.day == Some(5)).unwrap();
    assert_eq!(fifth.entries.len(), 2);
    assert_eq!(fifth.total_minutes(), 90);
    assert_eq!(fifth.date_key().as_deref(), Some("2024-03-05"));

    let sixth = cells.iter().find(|c| c.day == Some(6)).unwrap();
    assert!(sixth.entries.is_empty());
  }

  #[test]
  fn test_allowed_dates_restrict_cells() {
    let allowed: HashSet<NaiveDate> = [ymd(2024, 3, 5), ymd(2024, 3, 20), ymd(2024, 4, 1)]
      .into_iter()
      .collect();
    let cells = build_calendar(2024, 2, &[], Some(&allowed));

    let real: Vec<u32> = cells.iter().filter_map(|c| c.day).collect();
    assert_eq!(real, vec![5, 20]);
    assert_eq!(cells.len(), 4 + 2);
  }
}
