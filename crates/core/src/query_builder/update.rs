// UPDATE statements

use crate::domain::{SqlValue, StorageRecord};

/// SET assignments of an update: every property except the primary key
pub fn assignments<'a>(
    record: &'a StorageRecord,
    primary_key: &'a str,
) -> impl Iterator<Item = (&'a str, &'a SqlValue)> + 'a {
    record
        .iter()
        .map(|(name, value)| (name.as_str(), value))
        .filter(move |(name, _)| *name != primary_key)
}

/// `UPDATE <table> SET <col> = ?, ... WHERE <primary_key> = ?;`
///
/// Parameters are the [`assignments`] values followed by the key value.
pub fn update(table_name: &str, record: &StorageRecord, primary_key: &str) -> String {
    let values = assignments(record, primary_key)
        .map(|(name, _)| format!("{} = ?", name))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "UPDATE {} SET {} WHERE {} = ?;",
        table_name, values, primary_key
    )
}
