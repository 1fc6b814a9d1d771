use serde::{Deserialize, Serialize};

pub const DEFAULT_SPORT_COLOR: &str = "#ffffff";

/// Matching key for sport names: trimmed and lower-cased
pub fn normalize_sport(name: &str) -> String {
  name.trim().to_lowercase()
}

/// Lower-case a stored color, defaulting to white
pub fn normalize_color(color: Option<&str>) -> String {
  match color.map(str::trim) {
    Some(c) if !c.is_empty() => c.to_lowercase(),
    _ => DEFAULT_SPORT_COLOR.to_string(),
  }
}

/// A named activity category with its display color
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sport {
  pub id: Option<i64>,
  pub name: String,
  pub color: String,
}

impl Sport {
  /// Build a sport from form fields; None when the name is blank
  pub fn from_form(id: Option<i64>, name: &str, color: &str) -> Option<Self> {
    let name = name.trim();
    if name.is_empty() {
      return None;
    }
    Some(Self {
      id,
      name: name.to_string(),
      color: normalize_color(Some(color)),
    })
  }
}
