//! Footer page-selector computation.

use crate::jokes::PageResult;

/// How many page numbers are offered either side of the current page
const PAGE_RADIUS: i64 = 2;

/// One selectable control in the footer navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavControl {
  Prev(u32),
  Page(u32),
  Next(u32),
}

impl NavControl {
  /// Page this control navigates to
  pub fn target(&self) -> u32 {
    match self {
      NavControl::Prev(p) | NavControl::Page(p) | NavControl::Next(p) => *p,
    }
  }

  pub fn label(&self) -> String {
    match self {
      NavControl::Prev(_) => "< Prev".to_string(),
      NavControl::Page(p) => p.to_string(),
      NavControl::Next(_) => "Next >".to_string(),
    }
  }
}

/// Up to five page numbers centred on `current_page`, clipped to
/// `1..=total_pages`, ascending.
pub fn page_numbers(page: &PageResult) -> Vec<u32> {
  let center = i64::from(page.current_page);
  let total = i64::from(page.total_pages);

  (center - PAGE_RADIUS..=center + PAGE_RADIUS)
    .filter(|p| *p >= 1 && *p <= total)
    .filter_map(|p| u32::try_from(p).ok())
    .collect()
}

/// The ordered footer controls for a page, empty when there is no data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSelector {
  current: Option<u32>,
  controls: Vec<NavControl>,
}

impl PageSelector {
  pub fn new(data: Option<&PageResult>) -> Self {
    let Some(page) = data else {
      return Self::default();
    };

    let mut controls = Vec::with_capacity(7);
    if page.previous_page > 1 {
      controls.push(NavControl::Prev(page.previous_page));
    }
    controls.extend(page_numbers(page).into_iter().map(NavControl::Page));
    if page.next_page < page.total_pages {
      controls.push(NavControl::Next(page.next_page));
    }

    Self {
      current: Some(page.current_page),
      controls,
    }
  }

  /// The resolved page the selector was built from
  pub fn current(&self) -> Option<u32> {
    self.current
  }

  pub fn controls(&self) -> &[NavControl] {
    &self.controls
  }

  pub fn is_empty(&self) -> bool {
    self.controls.is_empty()
  }

  #[cfg(test)]
  pub fn pages(&self) -> Vec<u32> {
    self
      .controls
      .iter()
      .filter_map(|c| match c {
        NavControl::Page(p) => Some(*p),
        _ => None,
      })
      .collect()
  }

  pub fn prev(&self) -> Option<u32> {
    self.controls.iter().find_map(|c| match c {
      NavControl::Prev(p) => Some(*p),
      _ => None,
    })
  }

  pub fn next(&self) -> Option<u32> {
    self.controls.iter().find_map(|c| match c {
      NavControl::Next(p) => Some(*p),
      _ => None,
    })
  }

  /// Index of the control for the current page, if shown
  pub fn current_index(&self) -> Option<usize> {
    let current = self.current?;
    self
      .controls
      .iter()
      .position(|c| *c == NavControl::Page(current))
  }

  /// Whether activating a control for `target` would change the page.
  ///
  /// Compares against the resolved page, not a page that may still be loading.
  pub fn would_change(&self, target: u32) -> bool {
    self.current != Some(target)
  }
}
