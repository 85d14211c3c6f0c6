//! Upstream icanhazdadjoke API: wire types, HTTP client and cache keys.

mod client;
mod query_key;
mod types;

pub use client::JokesClient;
pub use query_key::JokesQueryKey;
pub use types::{Joke, PageResult};
