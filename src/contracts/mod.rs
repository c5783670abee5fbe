pub mod counter_store;
pub mod document_host;
pub mod error;
pub mod record_store;

pub use counter_store::{CounterSnapshot, CounterStore, DEFAULT_COUNT};
pub use document_host::{DocumentHost, FieldKind, FieldSpec, TableMeta};
pub use error::{
    AllocationError, BlanktableError, CacheError, HostError, LikeError, UpstreamError,
    ValidationError,
};
pub use record_store::{Record, RecordStore};
