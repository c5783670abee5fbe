//! Concurrency behaviour of the like counter and batch creation.
//!
//! The counter increment is a plain read-modify-write against the upstream
//! record store. These tests pin down that behaviour, including the lost
//! update it allows, and the in-flight guards on the client triggers.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use serde_json::{json, Map, Value};
use tokio::sync::{Barrier, Notify};

use blanktable::contracts::{
    CounterStore, DocumentHost, FieldSpec, HostError, Record, RecordStore, TableMeta,
    UpstreamError,
};
use blanktable::counter::CounterProxy;
use blanktable::naming::BatchCreator;

/// Record store whose reads all wait at a barrier, so concurrent
/// increments read the same value before either writes.
struct InterleavingRecords {
    value: AtomicI64,
    barrier: Barrier,
}

impl RecordStore for InterleavingRecords {
    async fn list_records(&self) -> Result<Vec<Record>, UpstreamError> {
        let value = self.value.load(Ordering::SeqCst);
        self.barrier.wait().await;
        let fields = match json!({ "likes": value }) {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Ok(vec![Record {
            record_id: "rec1".into(),
            fields,
        }])
    }

    async fn update_record(
        &self,
        _record_id: &str,
        fields: Map<String, Value>,
    ) -> Result<(), UpstreamError> {
        let value = fields["likes"].as_i64().unwrap();
        self.value.store(value, Ordering::SeqCst);
        Ok(())
    }
}

#[tokio::test]
async fn concurrent_increments_can_lose_updates() {
    let proxy = Arc::new(CounterProxy::with_field(
        InterleavingRecords {
            value: AtomicI64::new(104),
            barrier: Barrier::new(2),
        },
        "likes",
    ));

    let (a, b) = tokio::join!(proxy.increment(), proxy.increment());

    // Both callers read 104 and both wrote 105: one like is lost.
    assert_eq!(a.unwrap(), 105);
    assert_eq!(b.unwrap(), 105);
    assert_eq!(proxy.records().value.load(Ordering::SeqCst), 105);
}

#[tokio::test]
async fn sequential_increments_do_not_lose_updates() {
    let proxy = CounterProxy::with_field(
        InterleavingRecords {
            value: AtomicI64::new(104),
            barrier: Barrier::new(1),
        },
        "likes",
    );

    for _ in 0..5 {
        proxy.increment().await.unwrap();
    }

    assert_eq!(proxy.records().value.load(Ordering::SeqCst), 109);
}

/// Host whose first create blocks until released.
struct GatedHost {
    entered: Notify,
    release: Notify,
}

impl DocumentHost for GatedHost {
    async fn list_tables(&self) -> Result<Vec<TableMeta>, HostError> {
        Ok(Vec::new())
    }

    async fn create_table(&self, _name: &str, _fields: &[FieldSpec]) -> Result<(), HostError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(())
    }
}

#[tokio::test]
async fn batch_trigger_disabled_while_in_flight() {
    let creator = Arc::new(BatchCreator::new(GatedHost {
        entered: Notify::new(),
        release: Notify::new(),
    }));

    let running = {
        let creator = Arc::clone(&creator);
        tokio::spawn(async move { creator.create(1).await })
    };
    creator.host().entered.notified().await;

    assert!(creator.is_busy());
    assert!(creator.create(1).await.unwrap().is_none());

    creator.host().release.notify_one();
    let report = running.await.unwrap().unwrap().unwrap();
    assert_eq!(report.created(), 1);
    assert!(!creator.is_busy());
}
