use crate::config::Config;
use crate::event::{Event, EventHandler};
use crate::jokes::{JokesClient, JokesQueryKey};
use crate::query::QueryClient;
use crate::ui;
use crate::ui::view::{View, ViewAction};
use crate::ui::views::JokesListView;
use color_eyre::Result;
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::{stdout, Stdout};
use std::time::Duration;
use tracing::info;

/// Main application state
pub struct App {
  /// Application configuration
  config: Config,

  /// Root view
  view: Box<dyn View>,

  /// Whether to quit
  should_quit: bool,
}

impl App {
  /// Build the app around the jokes view, fetching `initial_page` first.
  ///
  /// Must be called inside a tokio runtime: the first fetch starts here.
  pub fn new(config: Config, initial_page: u32) -> Result<Self> {
    let jokes = JokesClient::new(&config.api)?;

    let client = QueryClient::new(config.cache.query_options(), move |key: JokesQueryKey| {
      let jokes = jokes.clone();
      async move {
        jokes
          .fetch_page(key.page)
          .await
          .map_err(|e| e.to_string())
      }
    });

    let view = JokesListView::new(client, initial_page);
    Ok(Self::with_view(config, Box::new(view)))
  }

  pub fn with_view(config: Config, view: Box<dyn View>) -> Self {
    Self {
      config,
      view,
      should_quit: false,
    }
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout()));

    let result = match terminal {
      Ok(mut terminal) => self.event_loop(&mut terminal).await,
      Err(e) => Err(e.into()),
    };

    // Cleanup terminal, even when the loop failed
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    let mut events = EventHandler::new(Duration::from_millis(100));
    info!("event loop started");

    while !self.should_quit {
      terminal.draw(|frame| ui::draw(frame, self))?;

      match events.next().await {
        Some(event) => self.handle_event(event),
        None => break,
      }
    }

    info!("event loop finished");
    Ok(())
  }

  fn handle_event(&mut self, event: Event) {
    match event {
      Event::Key(key) => {
        if self.view.handle_key(key) == ViewAction::Quit {
          self.should_quit = true;
        }
      }
      Event::Tick => self.view.tick(),
      Event::Resize => {} // Redrawn on the next loop iteration
    }
  }

  // Accessors for UI rendering
  pub fn view(&self) -> &dyn View {
    self.view.as_ref()
  }

  pub fn view_mut(&mut self) -> &mut dyn View {
    self.view.as_mut()
  }

  pub fn title(&self) -> &str {
    self.config.title()
  }

  pub fn api_url(&self) -> &str {
    &self.config.api.base_url
  }
}
