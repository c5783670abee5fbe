//! The best-effort like counter: the proxy side that talks to the upstream
//! record store, and the client side with its local fallback cache.

mod client;
mod fallback;
mod http;
mod local;
mod proxy;

pub use client::{CounterView, LikeClient, LikeOutcome};
pub use fallback::{FallbackChain, FallbackExhausted, Resolved, Source, StepResult};
pub use http::HttpCounterStore;
pub use local::{Identity, LocalCounterCache};
pub use proxy::{extract_count, CounterProxy};
