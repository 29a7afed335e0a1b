//! Identifier quoting

/// Quotes a table or column name with backticks, doubling embedded backticks.
///
/// ```
/// # use relsql_mysql::escape::escape_id;
/// assert_eq!(escape_id("time_sheet"), "`time_sheet`");
/// assert_eq!(escape_id("we`ird"), "`we``ird`");
/// ```
pub fn escape_id(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len() + 2);
    escaped.push('`');
    for c in name.chars() {
        if c == '`' {
            escaped.push('`');
        }
        escaped.push(c);
    }
    escaped.push('`');
    escaped
}

/// `<qualifier>.<escaped column>`, or the bare escaped column.
///
/// Qualifiers are generated aliases or already-escaped table names and are
/// emitted as given.
pub fn qualify(qualifier: Option<&str>, column: &str) -> String {
    match qualifier {
        Some(q) => format!("{q}.{}", escape_id(column)),
        None => escape_id(column),
    }
}
