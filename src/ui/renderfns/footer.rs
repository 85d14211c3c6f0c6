use crate::pagination::{NavControl, PageSelector};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

const SEPARATOR: &str = "  ";

/// Build the navigation line: prev, page numbers, next.
///
/// The current page is bold and underlined; the focused control is reversed.
pub fn nav_line(selector: &PageSelector, focused: Option<usize>) -> Line<'static> {
  let mut spans = Vec::new();

  for (i, control) in selector.controls().iter().enumerate() {
    if i > 0 {
      spans.push(Span::raw(SEPARATOR));
    }

    let mut style = match control {
      NavControl::Page(p) if Some(*p) == selector.current() => {
        Style::default().fg(Color::White).bold().underlined()
      }
      NavControl::Page(_) => Style::default().fg(Color::White),
      NavControl::Prev(_) | NavControl::Next(_) => Style::default().fg(Color::Cyan),
    };
    if focused == Some(i) {
      style = style.reversed();
    }

    spans.push(Span::styled(control.label(), style));
  }

  Line::from(spans)
}

/// Draw the footer navigation bar
pub fn draw_footer(frame: &mut Frame, area: Rect, selector: &PageSelector, focused: Option<usize>) {
  let block = Block::default()
    .borders(Borders::TOP)
    .border_style(Style::default().fg(Color::White));

  let paragraph = Paragraph::new(nav_line(selector, focused))
    .alignment(Alignment::Center)
    .block(block);

  frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::jokes::PageResult;

  fn plain(line: &Line) -> String {
    line.spans.iter().map(|s| s.content.as_ref()).collect()
  }

  #[test]
  fn test_nav_line_middle_page() {
    let data = PageResult {
      current_page: 5,
      total_pages: 10,
      previous_page: 4,
      next_page: 6,
      ..PageResult::default()
    };
    let selector = PageSelector::new(Some(&data));
    let line = nav_line(&selector, None);
    assert_eq!(plain(&line), "< Prev  3  4  5  6  7  Next >");

    let current = line.spans.iter().find(|s| s.content == "5").unwrap();
    assert!(current.style.add_modifier.contains(Modifier::BOLD));
    assert!(current.style.add_modifier.contains(Modifier::UNDERLINED));
  }

  #[test]
  fn test_nav_line_focus() {
    let data = PageResult {
      current_page: 1,
      total_pages: 3,
      next_page: 2,
      ..PageResult::default()
    };
    let selector = PageSelector::new(Some(&data));
    let line = nav_line(&selector, Some(1));
    let focused = line.spans.iter().find(|s| s.content == "2").unwrap();
    assert!(focused.style.add_modifier.contains(Modifier::REVERSED));
  }

  #[test]
  fn test_nav_line_empty_without_data() {
    let line = nav_line(&PageSelector::new(None), None);
    assert!(line.spans.is_empty());
  }
}
