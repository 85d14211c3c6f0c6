use crate::jokes::PageResult;
use crate::query::QueryResult;

/// What the body of the jokes view shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState<'a> {
  Loading,
  Error(&'a str),
  NoData,
  Results(&'a PageResult),
}

impl<'a> RenderState<'a> {
  /// Loading wins unless earlier data is being kept on screen, then errors,
  /// then a missing payload.
  pub fn from_result(result: QueryResult<'a, PageResult>) -> Self {
    match result {
      QueryResult {
        is_previous_data: false,
        is_loading: true,
        ..
      }
      | QueryResult {
        is_previous_data: false,
        is_fetching: true,
        ..
      } => RenderState::Loading,
      QueryResult {
        error: Some(message),
        ..
      } => RenderState::Error(message),
      QueryResult { data: None, .. } => RenderState::NoData,
      QueryResult {
        data: Some(page), ..
      } => RenderState::Results(page),
    }
  }
}
