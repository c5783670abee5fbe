use std::time::{Duration, Instant};

/// A bearer token together with the instant it stops being used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedToken {
    pub value: String,
    pub expires_at: Instant,
}

impl CachedToken {
    /// Builds a token that expires `margin` before the lifetime the
    /// upstream granted, measured from `now`.
    pub fn from_grant(value: String, lifetime: Duration, margin: Duration, now: Instant) -> Self {
        Self {
            value,
            expires_at: now + lifetime.saturating_sub(margin),
        }
    }
}

/// Cache for the upstream access token.
#[derive(Debug, Clone, Default)]
pub struct TokenCache {
    current: Option<CachedToken>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when there is no token or `now >= expires_at`.
    pub fn needs_refresh(&self, now: Instant) -> bool {
        match &self.current {
            Some(token) => now >= token.expires_at,
            None => true,
        }
    }

    /// Returns the cached token if it is still usable at `now`.
    pub fn get(&self, now: Instant) -> Option<&str> {
        if self.needs_refresh(now) {
            None
        } else {
            self.current.as_ref().map(|t| t.value.as_str())
        }
    }

    pub fn store(&mut self, token: CachedToken) {
        self.current = Some(token);
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}
