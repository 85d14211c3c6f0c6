//! Serde types matching the icanhazdadjoke search API.
//!
//! Every field of [`PageResult`] defaults when absent, so an error payload such
//! as `{"status": 404, "message": "..."}` still parses into an (empty) page.

use serde::{Deserialize, Serialize};

/// A single joke as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Joke {
  pub id: String,
  pub joke: String,
}

/// One page of search results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageResult {
  pub current_page: u32,
  pub limit: u32,
  pub next_page: u32,
  pub previous_page: u32,
  pub results: Vec<Joke>,
  pub search_term: String,
  /// Fixed status echoed by the API (200 on success)
  pub status: Option<u16>,
  pub total_jokes: u32,
  pub total_pages: u32,
}

impl PageResult {
  /// Whether the payload's own status field reports success.
  ///
  /// A missing status is treated as success.
  pub fn reports_success(&self) -> bool {
    self.status.map_or(true, |s| s == 200)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_search_page() {
    let body = r#"{
      "current_page": 1,
      "limit": 20,
      "next_page": 2,
      "previous_page": 1,
      "results": [{"id": "a", "joke": "Why..."}],
      "search_term": "",
      "status": 200,
      "total_jokes": 200,
      "total_pages": 10
    }"#;

    let page: PageResult = serde_json::from_str(body).unwrap();
    assert_eq!(page.current_page, 1);
    assert_eq!(page.total_pages, 10);
    assert_eq!(page.results.len(), 1);
    assert_eq!(page.results[0].id, "a");
    assert!(page.reports_success());
  }

  #[test]
  fn test_error_payload_parses_as_empty_page() {
    let page: PageResult =
      serde_json::from_str(r#"{"status": 404, "message": "Not found"}"#).unwrap();
    assert!(page.results.is_empty());
    assert_eq!(page.total_pages, 0);
    assert!(!page.reports_success());
  }
}
