use sqlx::PgPool;

use migcheck_core::{Error, Result, SampleOrder};

use super::utils::{order_clause, qualified_name};

pub async fn list_tables(pool: &PgPool, schema: &str) -> Result<Vec<String>> {
    let names = sqlx::query_scalar::<_, String>(
        r#"
        select table_name::text
        from information_schema.tables
        where table_schema = $1
          and table_type = 'BASE TABLE'
        order by table_name
        "#,
    )
    .bind(schema)
    .fetch_all(pool)
    .await
    .map_err(|err| Error::catalog("list_tables", schema, err))?;

    Ok(names)
}

#[derive(sqlx::FromRow)]
pub struct RawColumn {
    pub name: String,
    pub data_type: String,
    pub max_length: Option<i32>,
    pub nullable: bool,
    pub default: Option<String>,
}

pub async fn list_columns(pool: &PgPool, schema: &str, table: &str) -> Result<Vec<RawColumn>> {
    let rows = sqlx::query_as::<_, RawColumn>(
        r#"
        select
          column_name::text as name,
          data_type::text as data_type,
          character_maximum_length::int4 as max_length,
          (is_nullable = 'YES') as nullable,
          column_default::text as "default"
        from information_schema.columns
        where table_schema = $1
          and table_name = $2
        order by ordinal_position
        "#,
    )
    .bind(schema)
    .bind(table)
    .fetch_all(pool)
    .await
    .map_err(|err| Error::catalog("get_schema", table, err))?;

    Ok(rows)
}

#[derive(sqlx::FromRow)]
pub struct RawConstraint {
    pub name: String,
    pub kind: String,
    pub column_name: String,
}

pub async fn list_constraints(
    pool: &PgPool,
    schema: &str,
    table: &str,
) -> Result<Vec<RawConstraint>> {
    let rows = sqlx::query_as::<_, RawConstraint>(
        r#"
        select
          tc.constraint_name::text as name,
          tc.constraint_type::text as kind,
          kcu.column_name::text as column_name
        from information_schema.table_constraints tc
        join information_schema.key_column_usage kcu
          on tc.constraint_name = kcu.constraint_name
          and tc.table_schema = kcu.table_schema
          and tc.table_name = kcu.table_name
        where tc.table_schema = $1
          and tc.table_name = $2
        order by tc.constraint_name, kcu.ordinal_position
        "#,
    )
    .bind(schema)
    .bind(table)
    .fetch_all(pool)
    .await
    .map_err(|err| Error::catalog("get_constraints", table, err))?;

    Ok(rows)
}

#[derive(sqlx::FromRow)]
pub struct RawIndex {
    pub name: String,
    pub definition: String,
}

pub async fn list_indexes(pool: &PgPool, schema: &str, table: &str) -> Result<Vec<RawIndex>> {
    let rows = sqlx::query_as::<_, RawIndex>(
        r#"
        select
          indexname::text as name,
          indexdef as definition
        from pg_indexes
        where schemaname = $1
          and tablename = $2
        order by indexname
        "#,
    )
    .bind(schema)
    .bind(table)
    .fetch_all(pool)
    .await
    .map_err(|err| Error::catalog("get_indexes", table, err))?;

    Ok(rows)
}

pub async fn count_rows(pool: &PgPool, schema: &str, table: &str) -> Result<i64> {
    let sql = format!("select count(*) from {}", qualified_name(schema, table));
    sqlx::query_scalar::<_, i64>(&sql)
        .fetch_one(pool)
        .await
        .map_err(|err| Error::catalog("row_count", table, err))
}

/// Fetch rows as text arrays, one element per column in ordinal order.
pub async fn fetch_rows(
    pool: &PgPool,
    schema: &str,
    table: &str,
    order: &SampleOrder,
    limit: u32,
) -> Result<Vec<Vec<Option<String>>>> {
    let sql = format!(
        "select array(\
           select e.value \
           from json_each_text(row_to_json(t)) with ordinality as e(key, value, ord) \
           order by e.ord\
         ) as vals \
         from {} as t{} \
         limit $1",
        qualified_name(schema, table),
        order_clause(order)
    );

    sqlx::query_scalar::<_, Vec<Option<String>>>(&sql)
        .bind(i64::from(limit))
        .fetch_all(pool)
        .await
        .map_err(|err| Error::catalog("sample_rows", table, err))
}
