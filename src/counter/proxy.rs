use serde_json::{Map, Value};

use crate::contracts::{
    CounterSnapshot, CounterStore, Record, RecordStore, UpstreamError, DEFAULT_COUNT,
};
use crate::upstream::DEFAULT_COUNT_FIELD;

/// Reads and increments the like counter stored in the first record of an
/// upstream table.
///
/// The increment is a read-then-write with no lock, version check or
/// server-side atomic add. Concurrent likes can overwrite each other and
/// lose a count; the counter is best-effort, not exactly-once.
pub struct CounterProxy<R> {
    records: R,
    field: String,
}

impl<R: RecordStore> CounterProxy<R> {
    pub fn new(records: R) -> Self {
        Self::with_field(records, DEFAULT_COUNT_FIELD)
    }

    pub fn with_field(records: R, field: impl Into<String>) -> Self {
        Self {
            records,
            field: field.into(),
        }
    }

    pub fn records(&self) -> &R {
        &self.records
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    fn count_of(&self, record: &Record) -> i64 {
        record
            .fields
            .get(&self.field)
            .and_then(extract_count)
            .unwrap_or(DEFAULT_COUNT)
    }
}

impl<R: RecordStore> CounterStore for CounterProxy<R> {
    async fn fetch_count(&self) -> Result<CounterSnapshot, UpstreamError> {
        let records = match self.records.list_records().await {
            Ok(records) => records,
            Err(UpstreamError::Upstream { code, msg }) => {
                tracing::warn!(code = code, msg = %msg, "Upstream rejected counter read, using default");
                return Ok(CounterSnapshot::default());
            }
            Err(e) => return Err(e),
        };

        let count = records
            .first()
            .map(|r| self.count_of(r))
            .unwrap_or(DEFAULT_COUNT);
        Ok(CounterSnapshot::new(count, false))
    }

    async fn increment(&self) -> Result<i64, UpstreamError> {
        let records = self.records.list_records().await?;
        let record = records.first().ok_or(UpstreamError::RecordNotFound)?;

        let current = self.count_of(record);
        let next = current.saturating_add(1);

        let mut fields = Map::new();
        fields.insert(self.field.clone(), Value::from(next));
        self.records.update_record(&record.record_id, fields).await?;

        tracing::info!(
            record_id = %record.record_id,
            previous = current,
            count = next,
            "Incremented like counter"
        );
        Ok(next)
    }
}

/// Reads a counter value from a record field.
///
/// Accepts integers, integral floats and numeric strings. Anything else
/// (null, booleans, text, fractional numbers) yields `None`.
pub fn extract_count(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
