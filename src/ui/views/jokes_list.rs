use crate::jokes::{Joke, JokesQueryKey, PageResult};
use crate::pagination::PageSelector;
use crate::query::{Query, QueryClient};
use crate::ui::render_state::RenderState;
use crate::ui::renderfns::draw_footer;
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Wrap};
use tracing::{debug, info};

const ERROR_PREFIX: &str = "Something went wrong 😱 -> ";
const LOADING_MESSAGE: &str = "Is loading...";
const NO_DATA_MESSAGE: &str = "No data was received!";
const PAGE_SCROLL: u16 = 10;

/// Paged list of jokes with footer navigation
pub struct JokesListView {
  query: Query<JokesQueryKey, PageResult>,
  /// Index of the focused footer control
  focus: usize,
  /// Resolved page the focus was last aligned to
  focus_page: Option<u32>,
  scroll: u16,
  /// Body area from the last render, used to bound scrolling
  viewport: Rect,
}

impl JokesListView {
  pub fn new(client: QueryClient<JokesQueryKey, PageResult>, page: u32) -> Self {
    let mut view = Self {
      query: Query::new(client, JokesQueryKey::page(page.max(1))),
      focus: 0,
      focus_page: None,
      scroll: 0,
      viewport: Rect::default(),
    };
    view.sync_focus();
    view
  }

  /// Page currently requested (may still be loading)
  pub fn requested_page(&self) -> u32 {
    self.query.key().page
  }

  fn selector(&self) -> PageSelector {
    PageSelector::new(self.query.result().data)
  }

  /// Request a page change.
  ///
  /// Returns `false` without touching the query when `page` is the page
  /// already on screen.
  pub fn select_page(&mut self, page: u32) -> bool {
    if !self.selector().would_change(page) {
      debug!(page, "already on page");
      return false;
    }
    info!(page, "page change requested");
    self.query.set_key(JokesQueryKey::page(page));
    self.scroll = 0;
    true
  }

  /// Re-align footer focus with the current page once a new page resolves
  fn sync_focus(&mut self) {
    let selector = self.selector();
    if selector.current() != self.focus_page {
      self.focus = selector.current_index().unwrap_or(0);
      self.focus_page = selector.current();
    }
    self.focus = self.focus.min(selector.controls().len().saturating_sub(1));
  }

  fn activate_focused(&mut self) {
    let target = self.selector().controls().get(self.focus).map(|c| c.target());
    if let Some(page) = target {
      self.select_page(page);
    }
  }

  fn move_focus(&mut self, delta: isize) {
    let len = self.selector().controls().len();
    if len > 0 {
      self.focus = self.focus.saturating_add_signed(delta).min(len - 1);
    }
  }

  fn scroll_by(&mut self, delta: i32) {
    let max = self.max_scroll();
    let next = (i32::from(self.scroll) + delta).clamp(0, i32::from(max));
    self.scroll = next as u16;
  }

  /// Furthest scroll offset that still fills the viewport, in wrapped rows
  fn max_scroll(&self) -> u16 {
    let rows = self.body_paragraph().line_count(self.viewport.width);
    let max = rows.saturating_sub(usize::from(self.viewport.height));
    u16::try_from(max).unwrap_or(u16::MAX)
  }

  fn body_paragraph(&self) -> Paragraph<'static> {
    let text = match RenderState::from_result(self.query.result()) {
      RenderState::Loading => Text::from(LOADING_MESSAGE),
      RenderState::Error(message) => error_text(message),
      RenderState::NoData => error_text(NO_DATA_MESSAGE),
      RenderState::Results(page) => Text::from(joke_lines(page)),
    };
    Paragraph::new(text).wrap(Wrap { trim: false })
  }

  fn render_body(&mut self, frame: &mut Frame, area: Rect) {
    self.viewport = area;
    // Content or terminal size may have changed since the last scroll
    self.scroll = self.scroll.min(self.max_scroll());

    let paragraph = self.body_paragraph().scroll((self.scroll, 0));
    frame.render_widget(paragraph, area);
  }
}

fn error_text(message: &str) -> Text<'static> {
  Text::from(Line::from(vec![
    Span::raw(ERROR_PREFIX),
    Span::styled(message.to_string(), Style::default().fg(Color::Red)),
  ]))
}

/// One block per joke, in server order, separated by blank lines
fn joke_lines(page: &PageResult) -> Vec<Line<'static>> {
  let mut lines = Vec::new();
  for (i, joke) in page.results.iter().enumerate() {
    if i > 0 {
      lines.push(Line::default());
    }
    lines.extend(joke_block(joke));
  }
  lines
}

/// Lines of a single joke; an empty joke still takes one line
fn joke_block(joke: &Joke) -> Vec<Line<'static>> {
  let lines: Vec<_> = joke.joke.lines().map(|l| Line::raw(l.to_string())).collect();
  if lines.is_empty() {
    vec![Line::default()]
  } else {
    lines
  }
}

impl View for JokesListView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
        return ViewAction::Quit;
      }
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Quit,

      // Footer navigation
      KeyCode::Left | KeyCode::Char('h') => self.move_focus(-1),
      KeyCode::Right | KeyCode::Char('l') => self.move_focus(1),
      KeyCode::Enter | KeyCode::Char(' ') => self.activate_focused(),
      KeyCode::Char('n') => {
        if let Some(next) = self.selector().next() {
          self.select_page(next);
        }
      }
      KeyCode::Char('p') => {
        if let Some(prev) = self.selector().prev() {
          self.select_page(prev);
        }
      }

      // Body scrolling
      KeyCode::Char('j') | KeyCode::Down => self.scroll_by(1),
      KeyCode::Char('k') | KeyCode::Up => self.scroll_by(-1),
      KeyCode::PageDown => self.scroll_by(i32::from(PAGE_SCROLL)),
      KeyCode::PageUp => self.scroll_by(-i32::from(PAGE_SCROLL)),
      KeyCode::Char('g') | KeyCode::Home => self.scroll = 0,
      KeyCode::Char('G') | KeyCode::End => self.scroll_by(i32::from(u16::MAX)),

      KeyCode::Char('r') => {
        info!(page = self.requested_page(), "refresh requested");
        self.query.refresh();
      }
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    self.sync_focus();

    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Min(1),    // Jokes
        Constraint::Length(2), // Navigation
      ])
      .split(area);

    let body = chunks[0].inner(Margin::new(2, 1));
    self.render_body(frame, body);

    let selector = self.selector();
    let focused = (!selector.is_empty()).then_some(self.focus);
    draw_footer(frame, chunks[1], &selector, focused);
  }

  fn tick(&mut self) {
    if self.query.poll() {
      self.sync_focus();
    }
  }

  fn status(&self) -> String {
    let result = self.query.result();
    let mut parts = vec![match result.data {
      Some(data) => format!("page {} of {}", self.requested_page(), data.total_pages),
      None => format!("page {}", self.requested_page()),
    }];
    if let Some(data) = result.data {
      parts.push(format!("{} jokes", data.total_jokes));
    }
    if result.is_fetching {
      parts.push("fetching...".to_string());
    }
    if let Some(updated) = self.query.updated_at() {
      parts.push(format!("updated {}", updated.format("%H:%M:%S")));
    }
    parts.join(" · ")
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new("←/→", "select").with_priority(10),
      ShortcutInfo::new("enter", "go").with_priority(20),
      ShortcutInfo::new("n/p", "next/prev").with_priority(30),
      ShortcutInfo::new("j/k", "scroll").with_priority(40),
      ShortcutInfo::new("r", "refresh").with_priority(50),
      ShortcutInfo::new("q", "quit").with_priority(90),
    ]
  }
}
