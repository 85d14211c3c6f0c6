mod render_state;
mod renderfns;
pub mod view;
pub mod views;

use crate::app::App;
use ratatui::prelude::*;
use renderfns::{draw_header, draw_status_bar};

/// Main draw function
pub fn draw(frame: &mut Frame, app: &mut App) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(2), // Header banner
      Constraint::Min(3),    // Jokes and navigation
      Constraint::Length(1), // Status bar
    ])
    .split(frame.area());

  draw_header(frame, chunks[0], app.api_url(), app.title());

  let shortcuts = app.view().shortcuts();
  let status = app.view().status();

  app.view_mut().render(frame, chunks[1]);

  draw_status_bar(frame, chunks[2], &shortcuts, &status);
}
