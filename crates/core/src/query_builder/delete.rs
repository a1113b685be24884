// DELETE statements

use crate::domain::DEFAULT_PRIMARY_KEY;

pub fn destroy(table_name: &str) -> String {
    destroy_by_key(table_name, DEFAULT_PRIMARY_KEY)
}

/// `DELETE FROM <table> WHERE <key_column> = ?;`
pub fn destroy_by_key(table_name: &str, key_column: &str) -> String {
    format!("DELETE FROM {} WHERE {} = ?;", table_name, key_column)
}

pub fn destroy_all(table_name: &str) -> String {
    format!("DELETE FROM {};", table_name)
}
