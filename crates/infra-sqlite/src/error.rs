// sqlx::Error -> AppError

use sqlx::error::ErrorKind;
use tablemap_core::error::AppError;

// Converts to AppError::Database with structured information
// (orphan rules: no From<sqlx::Error> for AppError here)
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => {
            // SQLite result codes: https://www.sqlite.org/rescode.html
            let code = db_err
                .code()
                .map(|code| code.into_owned())
                .unwrap_or_default();

            let message = match db_err.kind() {
                ErrorKind::UniqueViolation => {
                    format!("Unique constraint violation: {} ({})", db_err.message(), code)
                }
                ErrorKind::ForeignKeyViolation => {
                    format!("Foreign key constraint violation: {} ({})", db_err.message(), code)
                }
                ErrorKind::NotNullViolation => {
                    format!("Not null constraint violation: {} ({})", db_err.message(), code)
                }
                ErrorKind::CheckViolation => {
                    format!("Check constraint violation: {} ({})", db_err.message(), code)
                }
                _ => match code.as_str() {
                    "5" => format!("Database locked (SQLITE_BUSY): {}", db_err.message()),
                    "13" => format!("Database full: {}", db_err.message()),
                    "" => db_err.message().to_string(),
                    other => format!("SQLite error [{}]: {}", other, db_err.message()),
                },
            };
            AppError::Database(message)
        }
        sqlx::Error::ColumnDecode { index, source } => {
            AppError::Database(format!("Cannot decode column {}: {}", index, source))
        }
        sqlx::Error::Configuration(source) => {
            AppError::Config(format!("Invalid database configuration: {}", source))
        }
        // Connection, pool, protocol errors
        _ => AppError::Database(err.to_string()),
    }
}
