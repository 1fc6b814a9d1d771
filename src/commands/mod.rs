pub mod assets;
pub mod dashboard;
pub mod entries;
pub mod sports;

use url::form_urlencoded;

/// Decoded query string that keeps repeated keys in order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
  pairs: Vec<(String, String)>,
}

impl QueryParams {
  pub fn parse(raw: Option<&str>) -> Self {
    let pairs = raw
      .map(|q| {
        form_urlencoded::parse(q.trim_start_matches('?').as_bytes())
          .map(|(k, v)| (k.into_owned(), v.into_owned()))
          .collect()
      })
      .unwrap_or_default();
    Self { pairs }
  }

  /// Every value given for `name`, blanks included
  pub fn all(&self, name: &str) -> Vec<String> {
    self
      .pairs
      .iter()
      .filter(|(k, _)| k == name)
      .map(|(_, v)| v.clone())
      .collect()
  }

  pub fn first(&self, name: &str) -> Option<&str> {
    self
      .pairs
      .iter()
      .find(|(k, _)| k == name)
      .map(|(_, v)| v.as_str())
  }

  pub fn without(&self, names: &[&str]) -> Self {
    Self {
      pairs: self
        .pairs
        .iter()
        .filter(|(k, _)| !names.contains(&k.as_str()))
        .cloned()
        .collect(),
    }
  }

  /// Re-encoded query string, without the leading `?`
  pub fn to_query_string(&self) -> String {
    form_urlencoded::Serializer::new(String::new())
      .extend_pairs(self.pairs.iter())
      .finish()
  }
}

/// Dashboard URL to come back to after a form post
pub fn dashboard_url(return_to: &str) -> String {
  let query = QueryParams::parse(Some(return_to)).to_query_string();
  if query.is_empty() {
    "/".to_string()
  } else {
    format!("/?{}", query)
  }
}
