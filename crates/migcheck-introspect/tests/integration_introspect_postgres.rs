use anyhow::{Context, Result, anyhow};
use migcheck_core::ConstraintKind;
use migcheck_introspect::{
    Catalog, PostgresCatalog, SampleOptions, SampleOrder, checksum, checksum_with_order, plan,
    snapshot,
};
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::env;

const FIXTURE: &str = r#"
drop schema if exists mc_left cascade;
drop schema if exists mc_right cascade;
create schema mc_left;
create schema mc_right;

create table mc_left.customers (
  id integer primary key,
  email varchar(255) not null unique,
  full_name text
);
create table mc_left.order_items (
  order_id integer not null,
  line_no integer not null,
  sku text not null,
  primary key (order_id, line_no)
);
create table mc_left.audit_log (
  note text
);
create index idx_customers_name on mc_left.customers (full_name);

insert into mc_left.customers values (1, 'a@example.com', 'Ann'), (2, 'b@example.com', null), (3, 'c@example.com', 'Cy');
insert into mc_left.order_items values (1, 1, 'A'), (1, 2, 'B');
insert into mc_left.audit_log values ('first'), ('second');

create table mc_right.customers (
  id integer primary key,
  email varchar(255) not null unique,
  full_name text
);
create table mc_right.events (
  payload json,
  note text
);
insert into mc_right.events values ('{"kind": "b"}', 'second'), ('{"kind": "a"}', 'first');

insert into mc_right.customers values (3, 'c@example.com', 'Cy'), (1, 'a@example.com', 'Ann'), (2, 'b@example.com', null);
"#;

/// Returns `None` when no database is configured so the suite stays green offline.
fn database_url() -> Option<String> {
    env::var("TEST_DATABASE_URL")
        .or_else(|_| env::var("DATABASE_URL"))
        .ok()
}

async fn reset_fixtures(pool: &PgPool) -> Result<()> {
    sqlx::raw_sql(FIXTURE)
        .execute(pool)
        .await
        .context("executing fixture")?;
    Ok(())
}

#[tokio::test]
async fn introspects_and_checksums_postgres_tables() -> Result<()> {
    let Some(db_url) = database_url() else {
        eprintln!("skipping: set TEST_DATABASE_URL or DATABASE_URL for integration tests");
        return Ok(());
    };

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .acquire_timeout(std::time::Duration::from_secs(10))
        .connect(&db_url)
        .await
        .context("connecting to Postgres")?;

    reset_fixtures(&pool).await?;

    let left = PostgresCatalog::new(pool.clone(), "source").with_schema("mc_left");
    let right = PostgresCatalog::new(pool.clone(), "target").with_schema("mc_right");

    assert_eq!(
        left.list_tables().await?,
        vec!["audit_log", "customers", "order_items"]
    );

    let columns = left.get_schema("customers").await?;
    let names: Vec<&str> = columns.iter().map(|col| col.name.as_str()).collect();
    assert_eq!(names, vec!["id", "email", "full_name"]);
    let email = columns
        .iter()
        .find(|col| col.name == "email")
        .ok_or_else(|| anyhow!("email column missing"))?;
    assert_eq!(email.data_type, "character varying");
    assert_eq!(email.max_length, Some(255));
    assert!(!email.nullable);

    let constraints = left.get_constraints("order_items").await?;
    let pk: Vec<&str> = constraints
        .iter()
        .filter(|con| con.kind == ConstraintKind::PrimaryKey)
        .map(|con| con.column.as_str())
        .collect();
    assert_eq!(pk, vec!["order_id", "line_no"]);

    let indexes = left.get_indexes("customers").await?;
    let index_names: Vec<&str> = indexes.iter().map(|idx| idx.name.as_str()).collect();
    assert!(index_names.contains(&"customers_pkey"));
    assert!(index_names.contains(&"idx_customers_name"));

    assert_eq!(left.row_count("customers").await?, 3);

    let options = SampleOptions::default();
    assert_eq!(
        checksum(&left, "customers", &options).await?,
        checksum(&right, "customers", &options).await?,
        "primary key ordering should hide physical insertion order"
    );

    let missing = checksum(&right, "audit_log", &options).await;
    assert!(missing.is_err(), "sampling a missing table must fail");

    let strict = SampleOptions {
        strict_ordering: true,
        ..SampleOptions::default()
    };
    let order = plan(&right, "events", &strict).await?;
    assert_eq!(order, SampleOrder::RowText);
    let events = checksum_with_order(&right, "events", &order, strict.sample_size)
        .await
        .context("row-text ordering must work on json columns")?;
    assert_eq!(events, checksum(&right, "events", &strict).await?);

    let snap = snapshot(&left).await?;
    assert_eq!(snap.tables.len(), 3);
    assert_eq!(snap.label, "source");

    Ok(())
}
