use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::contracts::error::HostError;

/// Metadata of a table that already exists in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMeta {
    pub name: String,
}

/// Field type understood by the document host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    Text,
}

/// A field to create together with a new table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn text(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Text,
        }
    }
}

/// The hosted document that tables are created in.
pub trait DocumentHost: Send + Sync {
    /// Lists the tables currently in the document.
    fn list_tables(&self) -> impl Future<Output = Result<Vec<TableMeta>, HostError>> + Send;

    /// Creates one table with the given fields.
    fn create_table(
        &self,
        name: &str,
        fields: &[FieldSpec],
    ) -> impl Future<Output = Result<(), HostError>> + Send;
}
