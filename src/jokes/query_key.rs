use std::fmt;

/// Cache key for one page of jokes: `(resource-name, page-number)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JokesQueryKey {
  pub page: u32,
}

impl JokesQueryKey {
  pub const RESOURCE: &'static str = "jokes";

  pub fn page(page: u32) -> Self {
    Self { page }
  }
}

impl fmt::Display for JokesQueryKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}", Self::RESOURCE, self.page)
  }
}
