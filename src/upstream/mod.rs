//! Client for the upstream record store that holds the like counter.

mod client;
mod config;
mod token;

pub use client::UpstreamClient;
pub use config::{UpstreamConfig, DEFAULT_BASE_URL, DEFAULT_COUNT_FIELD};
pub use token::{CachedToken, TokenCache};
