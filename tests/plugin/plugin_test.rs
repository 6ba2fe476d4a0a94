use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use flatgen::config::FlatTableSettings;
use flatgen::error::PluginError;
use flatgen::model::{ColumnRef, FlatTableDesc, Segment, SegmentRange, TableRef};
use flatgen::plugin::{InsertStatementGenerator, PluginRegistry};
use flatgen::sql::col_name;
use flatgen::{FlatTableError, FlatTableGenerator};

/// Inserts into a dynamic partition keyed by the first column.
struct PartitionedInsert {
    calls: AtomicUsize,
}

impl InsertStatementGenerator for PartitionedInsert {
    fn generate_insert_data_statement(&self, desc: &FlatTableDesc) -> Result<String, PluginError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let first = desc
            .columns()
            .first()
            .ok_or("flat table has no columns")?;
        Ok(format!(
            "INSERT OVERWRITE TABLE {} PARTITION ({}) SELECT * FROM staging;\n",
            desc.table_name(),
            col_name(first)
        ))
    }
}

fn desc_with_columns() -> FlatTableDesc {
    let sales = TableRef::new("DEFAULT.KYLIN_SALES", "KYLIN_SALES");
    FlatTableDesc::builder("flat", &sales)
        .column(ColumnRef::new(&sales, "PART_DT", "date"))
        .build()
}

fn settings_using(name: &str) -> Arc<FlatTableSettings> {
    Arc::new(FlatTableSettings {
        advanced_generator: Some(name.to_string()),
        ..FlatTableSettings::default()
    })
}

#[test]
fn configured_plugin_replaces_builtin_insert() {
    let plugin = Arc::new(PartitionedInsert {
        calls: AtomicUsize::new(0),
    });
    let mut registry = PluginRegistry::new();
    registry.register("partitioned", plugin.clone());

    let generator = FlatTableGenerator::new(settings_using("partitioned"), registry).unwrap();
    let sql = generator.insert_statement(&desc_with_columns()).unwrap();

    assert_eq!(
        sql,
        "INSERT OVERWRITE TABLE flat PARTITION (KYLIN_SALES_PART_DT) SELECT * FROM staging;\n"
    );
    assert_eq!(plugin.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn partial_insert_ignores_plugin() {
    let plugin = Arc::new(PartitionedInsert {
        calls: AtomicUsize::new(0),
    });
    let mut registry = PluginRegistry::new();
    registry.register("partitioned", plugin.clone());

    let generator = FlatTableGenerator::new(settings_using("partitioned"), registry).unwrap();
    let sql = generator.insert_partial_statement(&desc_with_columns()).unwrap();

    assert!(sql.starts_with("INSERT OVERWRITE TABLE flat SELECT\n"));
    assert_eq!(plugin.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn unregistered_plugin_fails_at_construction() {
    let err = FlatTableGenerator::new(settings_using("missing"), PluginRegistry::new()).unwrap_err();
    match err {
        FlatTableError::PluginResolution { name, source, .. } => {
            assert_eq!(name, "missing");
            assert!(source.is_none());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn failing_plugin_is_surfaced_not_masked() {
    let sales = TableRef::new("DEFAULT.KYLIN_SALES", "KYLIN_SALES");
    let empty = FlatTableDesc::builder("flat", &sales).build();

    let mut registry = PluginRegistry::new();
    registry.register(
        "partitioned",
        Arc::new(PartitionedInsert {
            calls: AtomicUsize::new(0),
        }),
    );
    let generator = FlatTableGenerator::new(settings_using("partitioned"), registry).unwrap();

    let err = generator.insert_statement(&empty).unwrap_err();
    assert_eq!(err.to_string(), "insert statement generator 'partitioned' failed");
    let cause = std::error::Error::source(&err).unwrap();
    assert_eq!(cause.to_string(), "flat table has no columns");
}

#[test]
fn segment_settings_select_the_plugin() {
    let mut registry = PluginRegistry::new();
    registry.register_fn("marker", |desc: &FlatTableDesc| {
        Ok(format!("-- custom insert for {}\n", desc.table_name()))
    });
    let generator =
        FlatTableGenerator::new(Arc::new(FlatTableSettings::default()), registry).unwrap();

    let sales = TableRef::new("DEFAULT.KYLIN_SALES", "KYLIN_SALES");
    let plain = FlatTableDesc::builder("flat", &sales).build();
    let segmented = FlatTableDesc::builder("flat", &sales)
        .segment(Segment::new(SegmentRange::infinite(), settings_using("marker")))
        .build();

    assert!(generator
        .insert_statement(&plain)
        .unwrap()
        .starts_with("INSERT OVERWRITE TABLE flat SELECT"));
    assert_eq!(
        generator.insert_statement(&segmented).unwrap(),
        "-- custom insert for flat\n"
    );
}
