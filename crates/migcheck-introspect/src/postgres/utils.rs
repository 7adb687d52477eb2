use migcheck_core::SampleOrder;

/// Quote an identifier for Postgres, doubling embedded quotes.
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Schema-qualified, quoted relation name.
pub fn qualified_name(schema: &str, table: &str) -> String {
    format!("{}.{}", quote_ident(schema), quote_ident(table))
}

/// Render the `ORDER BY` clause for a sample, relative to the alias `t`.
pub fn order_clause(order: &SampleOrder) -> String {
    if *order == SampleOrder::RowText {
        return " order by t::text asc".to_string();
    }

    let columns = order.columns();
    if columns.is_empty() {
        return String::new();
    }

    let keys: Vec<String> = columns
        .iter()
        .map(|column| format!("t.{} asc", quote_ident(column)))
        .collect();
    format!(" order by {}", keys.join(", "))
}
