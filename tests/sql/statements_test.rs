use std::sync::Arc;

use flatgen::config::FlatTableSettings;
use flatgen::model::{
    ColumnRef, FlatTableDesc, JoinDesc, JoinTableDesc, PartitionDesc, Segment, SegmentRange,
    TableRef,
};
use flatgen::sql::{
    col_name, count_statement, create_table_statement, drop_table_statement, insert_statement,
    redistribute_statement, select_statement, select_statement_default,
};
use flatgen::FlatTableError;
use insta::assert_snapshot;

// 2012-01-01T00:00:00Z .. 2013-01-01T00:00:00Z
const START: i64 = 1_325_376_000_000;
const END: i64 = 1_356_998_400_000;

/// Sample star schema: sales joined to calendar, buyer and seller accounts.
///
/// The seller account lookup is listed twice with the same reference.
struct Star {
    sales: Arc<TableRef>,
    cal: Arc<TableRef>,
    buyer: Arc<TableRef>,
    seller: Arc<TableRef>,
}

impl Star {
    fn new() -> Self {
        Self {
            sales: TableRef::new("DEFAULT.KYLIN_SALES", "KYLIN_SALES"),
            cal: TableRef::new("DEFAULT.KYLIN_CAL_DT", "KYLIN_CAL_DT"),
            buyer: TableRef::new("DEFAULT.KYLIN_ACCOUNT", "BUYER_ACCOUNT"),
            seller: TableRef::new("DEFAULT.KYLIN_ACCOUNT", "SELLER_ACCOUNT"),
        }
    }

    fn columns(&self) -> Vec<ColumnRef> {
        vec![
            ColumnRef::new(&self.sales, "TRANS_ID", "bigint"),
            ColumnRef::new(&self.sales, "PART_DT", "date"),
            ColumnRef::new(&self.cal, "WEEK_BEG_DT", "date"),
            ColumnRef::new(&self.buyer, "ACCOUNT_COUNTRY", "varchar(100)"),
            ColumnRef::new(&self.seller, "ACCOUNT_COUNTRY", "varchar(100)"),
            ColumnRef::new(&self.sales, "PRICE", "decimal(19,4)")
                .with_expression("KYLIN_SALES.PRICE * KYLIN_SALES.ITEM_COUNT"),
        ]
    }

    fn join(&self, lookup: &Arc<TableRef>, pk: &str, fk: &str, join_type: &str) -> JoinTableDesc {
        JoinTableDesc::new(
            lookup,
            JoinDesc::new(
                join_type,
                vec![ColumnRef::new(lookup, pk, "bigint")],
                vec![ColumnRef::new(&self.sales, fk, "bigint")],
            ),
        )
    }

    fn builder(&self) -> flatgen::model::FlatTableDescBuilder {
        FlatTableDesc::builder("kylin_intermediate_sales", &self.sales)
            .columns(self.columns())
            .join_table(self.join(&self.cal, "CAL_DT", "PART_DT", "inner"))
            .join_table(self.join(&self.buyer, "ACCOUNT_ID", "BUYER_ID", "left"))
            .join_table(self.join(&self.seller, "ACCOUNT_ID", "SELLER_ID", "left"))
            .join_table(self.join(&self.seller, "ACCOUNT_ID", "SELLER_ID", "left"))
    }

    fn segmented(&self) -> FlatTableDesc {
        self.builder()
            .filter_condition("KYLIN_SALES.PRICE > 0")
            .partition(PartitionDesc::new(ColumnRef::new(&self.sales, "PART_DT", "date")))
            .segment(Segment::new(
                SegmentRange::new(Some(START), Some(END)),
                Arc::new(FlatTableSettings::default()),
            ))
            .build()
    }
}

#[test]
fn select_statement_full_text() {
    let sql = select_statement_default(&Star::new().segmented()).unwrap();
    assert_eq!(
        sql,
        "SELECT\n\
         KYLIN_SALES.TRANS_ID as KYLIN_SALES_TRANS_ID\n\
         ,KYLIN_SALES.PART_DT as KYLIN_SALES_PART_DT\n\
         ,KYLIN_CAL_DT.WEEK_BEG_DT as KYLIN_CAL_DT_WEEK_BEG_DT\n\
         ,BUYER_ACCOUNT.ACCOUNT_COUNTRY as BUYER_ACCOUNT_ACCOUNT_COUNTRY\n\
         ,SELLER_ACCOUNT.ACCOUNT_COUNTRY as SELLER_ACCOUNT_ACCOUNT_COUNTRY\n\
         ,KYLIN_SALES.PRICE * KYLIN_SALES.ITEM_COUNT as KYLIN_SALES_PRICE\n\
         FROM DEFAULT.KYLIN_SALES as KYLIN_SALES \n\
         INNER JOIN DEFAULT.KYLIN_CAL_DT as KYLIN_CAL_DT\n\
         ON KYLIN_SALES.PART_DT = KYLIN_CAL_DT.CAL_DT\n\
         LEFT JOIN DEFAULT.KYLIN_ACCOUNT as BUYER_ACCOUNT\n\
         ON KYLIN_SALES.BUYER_ID = BUYER_ACCOUNT.ACCOUNT_ID\n\
         LEFT JOIN DEFAULT.KYLIN_ACCOUNT as SELLER_ACCOUNT\n\
         ON KYLIN_SALES.SELLER_ID = SELLER_ACCOUNT.ACCOUNT_ID\n\
         WHERE 1=1 AND (KYLIN_SALES.PRICE > 0)  AND (KYLIN_SALES.PART_DT >= '2012-01-01' AND KYLIN_SALES.PART_DT < '2013-01-01')\n"
    );
}

#[test]
fn projection_follows_descriptor_order() {
    let star = Star::new();
    let desc = star.segmented();
    let sql = select_statement(&desc, true, &[]).unwrap();

    let mut last = 0;
    for col in desc.columns() {
        let item = format!("{} as {}", col.expression, col_name(col));
        let pos = sql[last..]
            .find(&item)
            .unwrap_or_else(|| panic!("{item} missing or out of order"));
        last += pos + item.len();
    }
}

#[test]
fn repeated_lookup_joined_once() {
    let sql = select_statement(&Star::new().segmented(), true, &[]).unwrap();
    assert_eq!(sql.matches("JOIN DEFAULT.KYLIN_ACCOUNT as SELLER_ACCOUNT").count(), 1);
    // same physical table under a different alias is a different reference
    assert_eq!(sql.matches("JOIN DEFAULT.KYLIN_ACCOUNT as").count(), 2);
}

#[test]
fn empty_join_type_contributes_no_join() {
    let star = Star::new();
    let desc = FlatTableDesc::builder("flat", &star.sales)
        .columns(star.columns())
        .join_table(star.join(&star.cal, "CAL_DT", "PART_DT", ""))
        .build();
    let sql = select_statement(&desc, true, &[]).unwrap();
    assert!(!sql.contains("JOIN"));
}

#[test]
fn where_clause_always_has_tautology() {
    let star = Star::new();
    let plain = star.builder().build();
    let segmented = star.segmented();
    for desc in [&plain, &segmented] {
        for single_line in [true, false] {
            let sql = select_statement(desc, single_line, &[]).unwrap();
            assert!(sql.contains("WHERE 1=1"));
        }
    }
}

#[test]
fn join_arity_mismatch_is_an_error() {
    let star = Star::new();
    let join = JoinDesc::new(
        "inner",
        vec![
            ColumnRef::new(&star.cal, "CAL_DT", "date"),
            ColumnRef::new(&star.cal, "SITE_ID", "integer"),
        ],
        vec![ColumnRef::new(&star.sales, "PART_DT", "date")],
    );
    let desc = FlatTableDesc::builder("flat", &star.sales)
        .columns(star.columns())
        .join_table(JoinTableDesc::new(&star.cal, join))
        .build();

    let err = select_statement(&desc, false, &[]).unwrap_err();
    assert!(matches!(
        err,
        FlatTableError::JoinArity { primary_keys: 2, foreign_keys: 1, .. }
    ));
    assert!(err.to_string().contains("DEFAULT.KYLIN_CAL_DT"));
    assert!(insert_statement(&desc).is_err());
}

#[test]
fn skip_as_uses_table_name_not_alias() {
    let star = Star::new();
    let desc = star.builder().build();
    let sql = select_statement(&desc, true, &["KYLIN_ACCOUNT.ACCOUNT_COUNTRY".to_string()]).unwrap();
    assert!(sql.contains(",BUYER_ACCOUNT.ACCOUNT_COUNTRY ,SELLER_ACCOUNT.ACCOUNT_COUNTRY ,"));
    assert!(sql.contains("KYLIN_SALES.TRANS_ID as KYLIN_SALES_TRANS_ID"));
}

#[test]
fn single_and_multi_line_share_tokens() {
    let desc = Star::new().segmented();
    let single = select_statement(&desc, true, &[]).unwrap();
    let multi = select_statement(&desc, false, &[]).unwrap();
    let tokens = |s: &str| s.split_whitespace().map(str::to_string).collect::<Vec<_>>();
    assert_eq!(tokens(&single), tokens(&multi));
}

#[test]
fn create_table_textfile_and_parquet() {
    let desc = Star::new().segmented();

    let text = create_table_statement(&desc, "/kylin/job_1", "TEXTFILE", ",");
    assert!(text.contains("ROW FORMAT DELIMITED FIELDS TERMINATED BY '\\,'\n"));
    assert!(text.contains(",BUYER_ACCOUNT_ACCOUNT_COUNTRY string\n"));
    assert!(text.contains(",KYLIN_SALES_PRICE decimal(19,4)\n"));
    assert!(text.contains("LOCATION '/kylin/job_1/kylin_intermediate_sales';\n"));

    let parquet = create_table_statement(&desc, "/kylin/job_1", "PARQUET", ",");
    assert!(!parquet.contains("ROW FORMAT"));
    assert!(parquet.contains("STORED AS PARQUET\n"));
}

#[test]
fn create_then_drop_target_same_table() {
    let desc = Star::new().segmented();
    let create = create_table_statement(&desc, "/tmp", "ORC", ",");
    assert!(create.starts_with("CREATE EXTERNAL TABLE IF NOT EXISTS kylin_intermediate_sales\n"));
    assert!(create.ends_with(
        "ALTER TABLE kylin_intermediate_sales SET TBLPROPERTIES('auto.purge'='true');\n"
    ));
    assert_snapshot!(drop_table_statement(&desc).trim_end(), @"DROP TABLE IF EXISTS kylin_intermediate_sales;");
}

#[test]
fn count_probe_is_unjoined_and_filtered() {
    let sql = count_statement(&Star::new().segmented(), "/kylin/job_1/row_count").unwrap();
    assert!(sql.starts_with("dfs -mkdir -p /kylin/job_1/row_count;\n"));
    assert!(sql.contains(
        "INSERT OVERWRITE DIRECTORY '/kylin/job_1/row_count' SELECT count(*) FROM DEFAULT.KYLIN_SALES KYLIN_SALES\n"
    ));
    assert!(!sql.contains("JOIN"));
    assert!(sql.contains("WHERE 1=1 AND (KYLIN_SALES.PRICE > 0)"));
    assert!(sql.contains("KYLIN_SALES.PART_DT >= '2012-01-01'"));
}

#[test]
fn insert_statement_shape() {
    let desc = Star::new().segmented();
    let sql = insert_statement(&desc).unwrap();
    assert!(sql.starts_with("INSERT OVERWRITE TABLE kylin_intermediate_sales SELECT\n"));
    assert!(sql.ends_with(";\n"));
}

#[test]
fn redistribute_cluster_by_precedence() {
    let star = Star::new();
    let desc = star
        .builder()
        .cluster_by(ColumnRef::new(&star.sales, "C", "bigint"))
        .distribute_by(ColumnRef::new(&star.sales, "SELLER_ID", "bigint"))
        .build();
    let sql = redistribute_statement(&desc);
    assert!(!sql.contains("DISTRIBUTE BY"));
    assert_snapshot!(
        sql.trim_end(),
        @"INSERT OVERWRITE TABLE kylin_intermediate_sales SELECT * FROM kylin_intermediate_sales CLUSTER BY KYLIN_SALES_C;"
    );
}

#[test]
fn redistribute_random_without_columns() {
    let desc = Star::new().builder().build();
    assert_snapshot!(
        redistribute_statement(&desc).trim_end(),
        @"INSERT OVERWRITE TABLE kylin_intermediate_sales SELECT * FROM kylin_intermediate_sales DISTRIBUTE BY RAND();"
    );
}

#[test]
fn generation_is_deterministic() {
    let desc = Star::new().segmented();
    let a = insert_statement(&desc).unwrap();
    let b = insert_statement(&desc).unwrap();
    assert_eq!(a, b);
}

#[test]
fn descriptor_shared_across_threads() {
    let desc = Arc::new(Star::new().segmented());
    let expected = insert_statement(&desc).unwrap();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let desc = Arc::clone(&desc);
            std::thread::spawn(move || insert_statement(&desc).unwrap())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
