use crate::ui::view::ShortcutInfo;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the status bar: shortcut hints on the left, view status on the right
pub fn draw_status_bar(frame: &mut Frame, area: Rect, shortcuts: &[ShortcutInfo], status: &str) {
  let status_width = u16::try_from(status.chars().count() + 1).unwrap_or(u16::MAX);
  let chunks = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Min(0), Constraint::Length(status_width)])
    .split(area);

  let hints = Paragraph::new(shortcut_line(shortcuts)).style(Style::default().bg(Color::Black));
  frame.render_widget(hints, chunks[0]);

  let status = Paragraph::new(format!("{} ", status))
    .alignment(Alignment::Right)
    .style(Style::default().fg(Color::Yellow).bg(Color::Black));
  frame.render_widget(status, chunks[1]);
}

fn shortcut_line(shortcuts: &[ShortcutInfo]) -> Line<'static> {
  let mut shortcuts = shortcuts.to_vec();
  shortcuts.sort_by_key(|s| s.priority);

  let mut spans = vec![Span::raw(" ")];
  for (i, shortcut) in shortcuts.iter().enumerate() {
    if i > 0 {
      spans.push(Span::raw("   "));
    }
    // Keys and brackets highlighted, descriptions dimmed
    spans.push(Span::styled(
      format!("<{}>", shortcut.key),
      Style::default().fg(Color::Cyan),
    ));
    spans.push(Span::styled(
      format!(" {}", shortcut.label),
      Style::default().fg(Color::DarkGray),
    ));
  }
  Line::from(spans)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_shortcuts_sorted_by_priority() {
    let shortcuts = [
      ShortcutInfo::new("q", "quit").with_priority(90),
      ShortcutInfo::new("r", "refresh").with_priority(10),
    ];
    let line = shortcut_line(&shortcuts);
    let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
    assert_eq!(text, " <r> refresh   <q> quit");
  }
}
