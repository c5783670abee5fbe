use std::future::Future;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::contracts::error::UpstreamError;

/// A single row of the upstream table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Record {
    pub record_id: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

/// Tabular record service backing the like counter.
pub trait RecordStore: Send + Sync {
    /// Lists the records of the configured table.
    fn list_records(&self) -> impl Future<Output = Result<Vec<Record>, UpstreamError>> + Send;

    /// Overwrites the given fields of one record.
    fn update_record(
        &self,
        record_id: &str,
        fields: Map<String, Value>,
    ) -> impl Future<Output = Result<(), UpstreamError>> + Send;
}
