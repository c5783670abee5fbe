//! Batch table creation against an in-memory document host.

use std::collections::HashSet;
use std::sync::Mutex;

use blanktable::contracts::{
    BlanktableError, DocumentHost, FieldKind, FieldSpec, HostError, TableMeta, ValidationError,
};
use blanktable::naming::{
    parse_count, BatchCreator, BatchSummary, PrefixScheme, DEFAULT_FIELD_NAME,
};

/// Document host that keeps tables in memory and can refuse chosen names.
struct MemoryHost {
    tables: Mutex<Vec<(String, Vec<FieldSpec>)>>,
    refuse: HashSet<String>,
    list_fails: bool,
}

impl MemoryHost {
    fn with_tables(names: &[&str]) -> Self {
        Self {
            tables: Mutex::new(names.iter().map(|n| (n.to_string(), Vec::new())).collect()),
            refuse: HashSet::new(),
            list_fails: false,
        }
    }

    fn refusing(mut self, names: &[&str]) -> Self {
        self.refuse = names.iter().map(|n| n.to_string()).collect();
        self
    }

    fn names(&self) -> Vec<String> {
        self.tables
            .lock()
            .unwrap()
            .iter()
            .map(|(n, _)| n.clone())
            .collect()
    }
}

impl DocumentHost for MemoryHost {
    async fn list_tables(&self) -> Result<Vec<TableMeta>, HostError> {
        if self.list_fails {
            return Err(HostError::ListFailed("permission denied".into()));
        }
        Ok(self
            .tables
            .lock()
            .unwrap()
            .iter()
            .map(|(name, _)| TableMeta { name: name.clone() })
            .collect())
    }

    async fn create_table(&self, name: &str, fields: &[FieldSpec]) -> Result<(), HostError> {
        if self.refuse.contains(name) {
            return Err(HostError::CreateFailed {
                name: name.into(),
                reason: "quota exceeded".into(),
            });
        }
        self.tables
            .lock()
            .unwrap()
            .push((name.to_string(), fields.to_vec()));
        Ok(())
    }
}

#[tokio::test]
async fn creates_tables_in_empty_document() {
    let creator = BatchCreator::with_scheme(MemoryHost::with_tables(&[]), PrefixScheme::new("T"));

    let report = creator.create(3).await.unwrap().unwrap();

    assert_eq!(report.summary(), BatchSummary::AllCreated { created: 3 });
    assert_eq!(creator.host().names(), vec!["T1", "T2", "T3"]);
}

#[tokio::test]
async fn skips_names_already_in_document() {
    let host = MemoryHost::with_tables(&["T1", "T2", "Budget"]);
    let creator = BatchCreator::with_scheme(host, PrefixScheme::new("T"));

    let report = creator.create(2).await.unwrap().unwrap();

    let created: Vec<&str> = report.created_names().collect();
    assert_eq!(created, vec!["T3", "T4"]);
}

#[tokio::test]
async fn default_tables_get_one_text_field() {
    let creator = BatchCreator::new(MemoryHost::with_tables(&["空白表1"]));

    creator.create(1).await.unwrap().unwrap();

    let tables = creator.host().tables.lock().unwrap().clone();
    let (name, fields) = tables.last().unwrap();
    assert_eq!(name, "空白表2");
    assert_eq!(fields, &vec![FieldSpec::text(DEFAULT_FIELD_NAME)]);
    assert_eq!(fields[0].kind, FieldKind::Text);
}

#[tokio::test]
async fn custom_fields_are_used() {
    let fields = vec![FieldSpec::text("Name"), FieldSpec::text("Notes")];
    let creator = BatchCreator::with_scheme(MemoryHost::with_tables(&[]), PrefixScheme::new("T"))
        .with_fields(fields.clone());

    creator.create(1).await.unwrap().unwrap();

    assert_eq!(creator.host().tables.lock().unwrap()[0].1, fields);
}

#[tokio::test]
async fn partial_failure_is_reported_not_raised() {
    let host = MemoryHost::with_tables(&[]).refusing(&["T2", "T5", "T9"]);
    let creator = BatchCreator::with_scheme(host, PrefixScheme::new("T"));

    let report = creator.create(10).await.unwrap().unwrap();

    assert_eq!(report.created(), 7);
    assert_eq!(report.failed(), 3);
    assert_eq!(
        report.summary(),
        BatchSummary::Partial {
            created: 7,
            requested: 10
        }
    );
    assert_eq!(report.summary().to_string(), "Created 7 of 10 tables, 3 failed");

    let failed: Vec<&str> = report
        .outcomes
        .iter()
        .filter(|o| !o.is_created())
        .map(|o| o.name.as_str())
        .collect();
    assert_eq!(failed, vec!["T2", "T5", "T9"]);
}

#[tokio::test]
async fn all_failures_reported() {
    let host = MemoryHost::with_tables(&[]).refusing(&["T1", "T2"]);
    let creator = BatchCreator::with_scheme(host, PrefixScheme::new("T"));

    let report = creator.create(2).await.unwrap().unwrap();

    assert_eq!(report.summary(), BatchSummary::NoneCreated { requested: 2 });
    assert!(!report.summary().is_success());
}

#[tokio::test]
async fn listing_failure_aborts_batch() {
    let mut host = MemoryHost::with_tables(&[]);
    host.list_fails = true;
    let creator = BatchCreator::new(host);

    let err = creator.create(3).await.unwrap_err();

    assert!(matches!(err, BlanktableError::Host(HostError::ListFailed(_))));
    assert!(creator.host().names().is_empty());
    assert!(!creator.is_busy());
}

#[tokio::test]
async fn validated_count_drives_batch() {
    let creator = BatchCreator::with_scheme(MemoryHost::with_tables(&[]), PrefixScheme::new("T"));

    let count = parse_count(" 4 ").unwrap();
    let report = creator.create(count).await.unwrap().unwrap();

    assert_eq!(report.requested(), 4);
    assert!(parse_count("101").is_err());
    assert!(parse_count("0").is_err());
}

#[tokio::test]
async fn out_of_range_count_is_rejected_before_listing() {
    let mut host = MemoryHost::with_tables(&[]);
    host.list_fails = true;
    let creator = BatchCreator::new(host);

    let err = creator.create(0).await.unwrap_err();
    assert!(matches!(
        err,
        BlanktableError::Validation(ValidationError::NotPositive)
    ));

    let err = creator.create(101).await.unwrap_err();
    assert!(matches!(
        err,
        BlanktableError::Validation(ValidationError::TooMany { requested: 101, .. })
    ));
    assert!(!creator.is_busy());
}
