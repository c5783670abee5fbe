//! Unique blank-table naming and batch creation.

mod allocator;
mod batch;
mod scheme;
mod validate;

pub use allocator::NameAllocator;
pub use batch::{BatchCreator, BatchReport, BatchSummary, TableOutcome, DEFAULT_FIELD_NAME};
pub use scheme::{NamingScheme, PrefixScheme, DEFAULT_PREFIX};
pub use validate::{parse_count, validate_count, MAX_BATCH};
