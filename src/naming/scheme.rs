/// Prefix used for blank tables created by the batch flow.
pub const DEFAULT_PREFIX: &str = "空白表";

/// Maps a 1-based candidate index to a table name.
///
/// Schemes must be injective: distinct indices yield distinct names.
pub trait NamingScheme: Send + Sync {
    fn candidate(&self, index: u64) -> String;
}

/// `<prefix><index>`, e.g. `空白表1`, `空白表2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixScheme {
    prefix: String,
}

impl PrefixScheme {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Default for PrefixScheme {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

impl NamingScheme for PrefixScheme {
    fn candidate(&self, index: u64) -> String {
        format!("{}{}", self.prefix, index)
    }
}

impl<F> NamingScheme for F
where
    F: Fn(u64) -> String + Send + Sync,
{
    fn candidate(&self, index: u64) -> String {
        self(index)
    }
}
