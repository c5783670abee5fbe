use std::collections::HashSet;
use std::fmt;

use futures::future::join_all;

use crate::contracts::{BlanktableError, DocumentHost, FieldSpec, HostError};
use crate::guard::InFlightGuard;
use crate::naming::allocator::NameAllocator;
use crate::naming::scheme::{NamingScheme, PrefixScheme};
use crate::naming::validate::validate_count;

/// Name of the single text field every blank table starts with.
pub const DEFAULT_FIELD_NAME: &str = "字段1";

/// Result of creating one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOutcome {
    pub name: String,
    pub error: Option<HostError>,
}

impl TableOutcome {
    pub fn is_created(&self) -> bool {
        self.error.is_none()
    }
}

/// Every outcome of a batch, in allocation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub outcomes: Vec<TableOutcome>,
}

impl BatchReport {
    pub fn requested(&self) -> usize {
        self.outcomes.len()
    }

    pub fn created(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_created()).count()
    }

    pub fn failed(&self) -> usize {
        self.requested() - self.created()
    }

    pub fn created_names(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .filter(|o| o.is_created())
            .map(|o| o.name.as_str())
    }

    pub fn summary(&self) -> BatchSummary {
        let created = self.created();
        let requested = self.requested();
        if created == requested {
            BatchSummary::AllCreated { created }
        } else if created > 0 {
            BatchSummary::Partial { created, requested }
        } else {
            BatchSummary::NoneCreated { requested }
        }
    }
}

/// User-facing verdict for a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchSummary {
    AllCreated { created: usize },
    Partial { created: usize, requested: usize },
    NoneCreated { requested: usize },
}

impl BatchSummary {
    pub fn is_success(&self) -> bool {
        matches!(self, BatchSummary::AllCreated { .. })
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchSummary::AllCreated { created } => write!(f, "Created {} tables", created),
            BatchSummary::Partial { created, requested } => write!(
                f,
                "Created {} of {} tables, {} failed",
                created,
                requested,
                requested - created
            ),
            BatchSummary::NoneCreated { .. } => write!(
                f,
                "All tables failed to create, check permissions or retry"
            ),
        }
    }
}

/// Creates batches of uniquely named blank tables in a document.
pub struct BatchCreator<H, S = PrefixScheme> {
    host: H,
    allocator: NameAllocator<S>,
    fields: Vec<FieldSpec>,
    trigger: InFlightGuard,
}

impl<H: DocumentHost> BatchCreator<H> {
    pub fn new(host: H) -> Self {
        Self::with_scheme(host, PrefixScheme::default())
    }
}

impl<H: DocumentHost, S: NamingScheme> BatchCreator<H, S> {
    pub fn with_scheme(host: H, scheme: S) -> Self {
        Self {
            host,
            allocator: NameAllocator::new(scheme),
            fields: vec![FieldSpec::text(DEFAULT_FIELD_NAME)],
            trigger: InFlightGuard::new(),
        }
    }

    /// Replaces the fields every new table is created with.
    pub fn with_fields(mut self, fields: Vec<FieldSpec>) -> Self {
        self.fields = fields;
        self
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Whether a batch is currently running.
    pub fn is_busy(&self) -> bool {
        self.trigger.is_busy()
    }

    /// Creates `count` blank tables.
    ///
    /// `count` must be in `1..=MAX_BATCH`, otherwise a
    /// [`ValidationError`](crate::contracts::ValidationError) is returned
    /// before the host is contacted. A failure to list existing tables
    /// aborts the batch; individual create failures are recorded in the
    /// report. Returns `Ok(None)` if a batch is already running on this
    /// creator.
    pub async fn create(&self, count: usize) -> Result<Option<BatchReport>, BlanktableError> {
        let count = validate_count(i64::try_from(count).unwrap_or(i64::MAX))?;

        let Some(_permit) = self.trigger.try_acquire() else {
            tracing::debug!("Batch create ignored, another batch is in flight");
            return Ok(None);
        };

        let existing: HashSet<String> = self
            .host
            .list_tables()
            .await?
            .into_iter()
            .map(|t| t.name)
            .collect();

        let names = self.allocator.allocate(count, &existing)?;

        let results = join_all(
            names
                .iter()
                .map(|name| self.host.create_table(name, &self.fields)),
        )
        .await;

        let outcomes: Vec<TableOutcome> = names
            .into_iter()
            .zip(results)
            .map(|(name, result)| {
                if let Err(ref e) = result {
                    tracing::warn!(table = %name, error = %e, "Failed to create table");
                }
                TableOutcome {
                    name,
                    error: result.err(),
                }
            })
            .collect();

        let report = BatchReport { outcomes };
        tracing::info!(
            requested = report.requested(),
            created = report.created(),
            failed = report.failed(),
            "Batch create finished"
        );

        Ok(Some(report))
    }
}
