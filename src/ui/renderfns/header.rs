use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

/// Draw the header banner with app name, API host and title
pub fn draw_header(frame: &mut Frame, area: Rect, api_url: &str, title: &str) {
  let host = extract_host(api_url);

  let header = Line::from(vec![
    Span::styled(" dadjokes ", Style::default().fg(Color::Cyan).bold()),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(format!(" {} ", host), Style::default().fg(Color::DarkGray)),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(format!(" {} ", title), Style::default().fg(Color::White).bold()),
  ]);

  let block = Block::default()
    .borders(Borders::BOTTOM)
    .border_style(Style::default().fg(Color::White));

  let paragraph = Paragraph::new(header)
    .alignment(Alignment::Center)
    .block(block);

  frame.render_widget(paragraph, area);
}

/// Extract host from API base URL
fn extract_host(url: &str) -> &str {
  url
    .strip_prefix("https://")
    .or_else(|| url.strip_prefix("http://"))
    .unwrap_or(url)
    .split('/')
    .next()
    .unwrap_or(url)
}
