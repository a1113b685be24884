// INSERT statements

use crate::domain::StorageRecord;

/// `INSERT INTO <table> (<keys>) VALUES (<?, ...>);`, keys in record order
///
/// A record without keys inserts a row made only of column defaults.
pub fn insert(table_name: &str, record: &StorageRecord) -> String {
    if record.is_empty() {
        return format!("INSERT INTO {} DEFAULT VALUES;", table_name);
    }

    let columns = record
        .keys()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    let values = vec!["?"; record.len()].join(", ");

    format!("INSERT INTO {} ({}) VALUES ({});", table_name, columns, values)
}

/// Same shape as [`insert`], overwriting on a conflicting key
pub fn insert_or_replace(table_name: &str, record: &StorageRecord) -> String {
    insert(table_name, record).replacen("INSERT INTO", "INSERT OR REPLACE INTO", 1)
}
