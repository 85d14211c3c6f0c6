//! Keyed async query cache for data fetching.
//!
//! Inspired by TanStack Query. A [`QueryClient`] owns one cache entry per key
//! and at most one in-flight fetch per key. A [`Query`] observes a single
//! current key on a client and derives the loading / fetching / previous-data
//! flags the view renders from.
//!
//! # Example
//!
//! ```ignore
//! let client = QueryClient::new(QueryOptions::default(), move |key: JokesQueryKey| {
//!     let jokes = jokes.clone();
//!     async move { jokes.fetch_page(key.page).await.map_err(|e| e.to_string()) }
//! });
//! let mut query = Query::new(client, JokesQueryKey::page(1));
//!
//! // In event loop tick
//! if query.poll() {
//!     // State changed, trigger re-render
//! }
//!
//! // In render
//! let result = query.result();
//! ```

use chrono::{DateTime, Local};
use futures::future::{BoxFuture, FutureExt};
use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::hash::Hash;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Cache policy shared by every key of a [`QueryClient`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
  /// Data younger than this is reused instead of refetched
  pub stale_time: Duration,
  /// Keep exposing the previous key's data while a new key has none yet
  pub keep_previous_data: bool,
}

impl Default for QueryOptions {
  fn default() -> Self {
    Self {
      stale_time: Duration::from_secs(60 * 60),
      keep_previous_data: true,
    }
  }
}

/// A factory function that creates the fetch future for a key
type FetcherFn<K, T> = Box<dyn Fn(&K) -> BoxFuture<'static, Result<T, String>> + Send + Sync>;

/// Everything the cache knows about one key
#[derive(Debug)]
pub struct CacheEntry<T> {
  data: Option<T>,
  error: Option<String>,
  resolved_at: Option<Instant>,
  updated_at: Option<DateTime<Local>>,
  invalidated: bool,
  receiver: Option<mpsc::UnboundedReceiver<Result<T, String>>>,
}

impl<T> Default for CacheEntry<T> {
  fn default() -> Self {
    Self {
      data: None,
      error: None,
      resolved_at: None,
      updated_at: None,
      invalidated: false,
      receiver: None,
    }
  }
}

impl<T> CacheEntry<T> {
  /// Last successfully fetched data for this key
  pub fn data(&self) -> Option<&T> {
    self.data.as_ref()
  }

  /// Error from the most recent fetch, cleared by the next success
  pub fn error(&self) -> Option<&str> {
    self.error.as_deref()
  }

  pub fn is_fetching(&self) -> bool {
    self.receiver.is_some()
  }

  /// Wall-clock time of the last successful fetch
  pub fn updated_at(&self) -> Option<DateTime<Local>> {
    self.updated_at
  }

  fn is_fresh(&self, stale_time: Duration) -> bool {
    if self.data.is_none() || self.invalidated {
      return false;
    }
    self
      .resolved_at
      .map(|t| t.elapsed() <= stale_time)
      .unwrap_or(false)
  }
}

/// Process-wide keyed cache of async fetch results.
///
/// Constructed once at startup and handed to the view that reads from it.
pub struct QueryClient<K, T> {
  entries: HashMap<K, CacheEntry<T>>,
  fetcher: FetcherFn<K, T>,
  options: QueryOptions,
}

impl<K, T> QueryClient<K, T>
where
  K: Clone + Eq + Hash + Display,
  T: Send + 'static,
{
  /// Create a client whose fetcher produces the future for a given key.
  pub fn new<F, Fut>(options: QueryOptions, fetcher: F) -> Self
  where
    F: Fn(K) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, String>> + Send + 'static,
  {
    Self {
      entries: HashMap::new(),
      fetcher: Box::new(move |key: &K| fetcher(key.clone()).boxed()),
      options,
    }
  }

  pub fn options(&self) -> QueryOptions {
    self.options
  }

  pub fn entry(&self, key: &K) -> Option<&CacheEntry<T>> {
    self.entries.get(key)
  }

  /// Whether `key` holds data younger than the stale time.
  pub fn is_fresh(&self, key: &K) -> bool {
    self
      .entries
      .get(key)
      .map(|e| e.is_fresh(self.options.stale_time))
      .unwrap_or(false)
  }

  pub fn is_fetching(&self, key: &K) -> bool {
    self
      .entries
      .get(key)
      .map(CacheEntry::is_fetching)
      .unwrap_or(false)
  }

  /// Make sure `key` has fresh data or a fetch on the way.
  ///
  /// Returns `true` if a new fetch was started.
  pub fn ensure(&mut self, key: &K) -> bool {
    if self.is_fetching(key) {
      return false;
    }
    if self.is_fresh(key) {
      debug!(%key, "cache hit");
      return false;
    }
    self.start_fetch(key);
    true
  }

  /// Fetch `key` even if its data is fresh.
  ///
  /// Still a no-op while a fetch for the same key is in flight.
  pub fn refetch(&mut self, key: &K) -> bool {
    if self.is_fetching(key) {
      return false;
    }
    self.start_fetch(key);
    true
  }

  /// Mark every cached key stale so the next `ensure` refetches it.
  pub fn invalidate_all(&mut self) {
    for entry in self.entries.values_mut() {
      entry.invalidated = true;
    }
  }

  /// Collect results from finished fetches without blocking.
  ///
  /// Each result lands in the entry of the key it was fetched for.
  /// Returns `true` if any entry changed.
  pub fn poll(&mut self) -> bool {
    let mut changed = false;

    for (key, entry) in self.entries.iter_mut() {
      let receiver = match &mut entry.receiver {
        Some(rx) => rx,
        None => continue,
      };

      match receiver.try_recv() {
        Ok(Ok(data)) => {
          info!(%key, "fetch succeeded");
          entry.data = Some(data);
          entry.error = None;
          entry.resolved_at = Some(Instant::now());
          entry.updated_at = Some(Local::now());
          entry.invalidated = false;
          entry.receiver = None;
          changed = true;
        }
        Ok(Err(error)) => {
          warn!(%key, %error, "fetch failed");
          entry.error = Some(error);
          entry.receiver = None;
          changed = true;
        }
        Err(mpsc::error::TryRecvError::Empty) => {}
        Err(mpsc::error::TryRecvError::Disconnected) => {
          // Sender dropped without sending
          warn!(%key, "fetch task ended without a result");
          entry.error = Some("Query was cancelled".to_string());
          entry.receiver = None;
          changed = true;
        }
      }
    }

    changed
  }

  fn start_fetch(&mut self, key: &K) {
    debug!(%key, "starting fetch");
    let (tx, rx) = mpsc::unbounded_channel();
    let future = (self.fetcher)(key);

    let entry = self.entries.entry(key.clone()).or_default();
    // A key without data goes back to loading rather than showing its old error
    if entry.data.is_none() {
      entry.error = None;
    }
    entry.receiver = Some(rx);

    tokio::spawn(async move {
      let result = future.await;
      // Ignore send errors - the client may have been dropped
      let _ = tx.send(result);
    });
  }
}

/// Snapshot of a query for rendering
#[derive(Debug)]
pub struct QueryResult<'a, T> {
  /// No data has ever resolved for the current key
  pub is_loading: bool,
  /// A request for the current key is in flight
  pub is_fetching: bool,
  /// `data` belongs to an earlier key while the current one is pending
  pub is_previous_data: bool,
  pub error: Option<&'a str>,
  pub data: Option<&'a T>,
}

/// Observer of one current key on a [`QueryClient`]
pub struct Query<K, T> {
  client: QueryClient<K, T>,
  key: K,
  previous_key: Option<K>,
}

impl<K, T> Query<K, T>
where
  K: Clone + Eq + Hash + Display,
  T: Send + 'static,
{
  /// Start observing `key`, fetching it unless the cache already has it.
  pub fn new(client: QueryClient<K, T>, key: K) -> Self {
    let mut query = Self {
      client,
      key,
      previous_key: None,
    };
    query.client.ensure(&query.key);
    query
  }

  pub fn key(&self) -> &K {
    &self.key
  }

  #[cfg(test)]
  pub fn client(&self) -> &QueryClient<K, T> {
    &self.client
  }

  /// Switch to a new key.
  ///
  /// The outgoing key is remembered as the previous-data source only if it
  /// had data; otherwise the older source stays in place.
  pub fn set_key(&mut self, key: K) {
    if key != self.key {
      let had_data = self
        .client
        .entry(&self.key)
        .and_then(CacheEntry::data)
        .is_some();
      let outgoing = std::mem::replace(&mut self.key, key);
      if had_data {
        self.previous_key = Some(outgoing);
      }
      info!(key = %self.key, "query key changed");
    }
    self.client.ensure(&self.key);
  }

  /// Invalidate everything and refetch the current key.
  pub fn refresh(&mut self) {
    self.client.invalidate_all();
    self.client.refetch(&self.key);
  }

  /// Forward to [`QueryClient::poll`].
  pub fn poll(&mut self) -> bool {
    self.client.poll()
  }

  pub fn result(&self) -> QueryResult<'_, T> {
    let entry = self.client.entry(&self.key);
    let own_data = entry.and_then(CacheEntry::data);
    let error = entry.and_then(CacheEntry::error);
    let is_fetching = entry.map(CacheEntry::is_fetching).unwrap_or(false);

    let previous_data = if own_data.is_none() && error.is_none() && self.keep_previous_data() {
      self
        .previous_key
        .as_ref()
        .and_then(|k| self.client.entry(k))
        .and_then(CacheEntry::data)
    } else {
      None
    };

    QueryResult {
      is_loading: own_data.is_none() && error.is_none(),
      is_fetching,
      is_previous_data: previous_data.is_some(),
      error,
      data: own_data.or(previous_data),
    }
  }

  /// Wall-clock time the displayed data was fetched
  pub fn updated_at(&self) -> Option<DateTime<Local>> {
    let own = self.client.entry(&self.key).and_then(CacheEntry::updated_at);
    own.or_else(|| {
      self
        .previous_key
        .as_ref()
        .and_then(|k| self.client.entry(k))
        .and_then(CacheEntry::updated_at)
    })
  }

  fn keep_previous_data(&self) -> bool {
    self.client.options().keep_previous_data
  }
}

// Query is not Clone because the fetcher is boxed and receivers are owned.

impl<K: std::fmt::Debug, T: std::fmt::Debug> std::fmt::Debug for QueryClient<K, T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("QueryClient")
      .field("entries", &self.entries)
      .field("options", &self.options)
      .finish_non_exhaustive()
  }
}
