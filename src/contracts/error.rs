use thiserror::Error;

#[derive(Error, Debug)]
pub enum BlanktableError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Allocation error: {0}")]
    Allocation(#[from] AllocationError),

    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("Document host error: {0}")]
    Host(#[from] HostError),

    #[error("Like error: {0}")]
    Like(#[from] LikeError),
}

/// Rejected user input. Never reaches the network layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Table count must be greater than 0")]
    NotPositive,

    #[error("At most {max} tables per batch (requested {requested})")]
    TooMany { requested: i64, max: usize },

    #[error("Table count must be a whole number: {0:?}")]
    NotAnInteger(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocationError {
    /// The probe bound was reached before `count` names were found. Only
    /// possible when the naming scheme maps distinct indices to the same name.
    #[error("Naming scheme exhausted after {probed} candidates ({found} of {requested} names)")]
    SchemeExhausted {
        requested: usize,
        found: usize,
        probed: u64,
    },
}

/// Failure talking to a remote counter or record store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Parse error: {0}")]
    Parse(String),

    /// The credentials could not be exchanged for an access token.
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Upstream returned code {code}: {msg}")]
    Upstream { code: i64, msg: String },

    #[error("No counter record found")]
    RecordNotFound,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("Failed to list tables: {0}")]
    ListFailed(String),

    #[error("Failed to create table {name:?}: {reason}")]
    CreateFailed { name: String, reason: String },
}

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

#[derive(Error, Debug)]
pub enum LikeError {
    /// Another like is still in flight on this client.
    #[error("A like is already in progress")]
    InFlight,

    /// Every step of the fallback chain failed.
    #[error("Like fallback exhausted: {0}")]
    Exhausted(String),

    #[error("Local cache error: {0}")]
    Cache(#[from] CacheError),
}
