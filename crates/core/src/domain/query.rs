// Filter Predicates & Query Options

use super::error::PredicateError;
use super::value::SqlValue;
use indexmap::IndexMap;
use std::fmt;

/// Filter predicate map: `"<column>_<operator>"` -> scalar, in insertion order
pub type Where = IndexMap<String, SqlValue>;

/// Comparison operator of the filter DSL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Neq,
    Lt,
    Lteq,
    Gt,
    Gteq,
    Cont,
}

impl Operator {
    pub const ALL: [Operator; 7] = [
        Operator::Eq,
        Operator::Neq,
        Operator::Lt,
        Operator::Lteq,
        Operator::Gt,
        Operator::Gteq,
        Operator::Cont,
    ];

    /// Key suffix naming this operator
    pub fn suffix(&self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Neq => "neq",
            Operator::Lt => "lt",
            Operator::Lteq => "lteq",
            Operator::Gt => "gt",
            Operator::Gteq => "gteq",
            Operator::Cont => "cont",
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Neq => "<>",
            Operator::Lt => "<",
            Operator::Lteq => "<=",
            Operator::Gt => ">",
            Operator::Gteq => ">=",
            Operator::Cont => "LIKE",
        }
    }

    pub fn from_suffix(suffix: &str) -> Option<Self> {
        Operator::ALL.into_iter().find(|op| op.suffix() == suffix)
    }
}

/// A parsed filter key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub column: String,
    pub operator: Operator,
}

impl Predicate {
    /// Split `key` on its last `_`; the column part may itself contain underscores
    pub fn parse(key: &str) -> Result<Self, PredicateError> {
        let Some((column, suffix)) = key.rsplit_once('_') else {
            return Err(PredicateError::MissingOperator {
                key: key.to_string(),
            });
        };

        if suffix.is_empty() {
            return Err(PredicateError::MissingOperator {
                key: key.to_string(),
            });
        }

        if column.is_empty() {
            return Err(PredicateError::MissingColumn {
                key: key.to_string(),
            });
        }

        let operator =
            Operator::from_suffix(suffix).ok_or_else(|| PredicateError::UnsupportedOperator {
                key: key.to_string(),
                operator: suffix.to_string(),
            })?;

        Ok(Self {
            column: column.to_string(),
            operator,
        })
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.column, self.operator.as_sql())
    }
}

pub const DEFAULT_COLUMNS: &str = "*";
pub const DEFAULT_LIMIT: u32 = 30;
pub const DEFAULT_ORDER: &str = "id DESC";

/// Options of a SELECT over one table
///
/// Every field defaults independently; pagination applies only when `page`
/// is set (1-indexed).
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOptions {
    pub columns: String,
    pub page: Option<u32>,
    pub limit: u32,
    pub filter: Where,
    pub order: String,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS.to_string(),
            page: None,
            limit: DEFAULT_LIMIT,
            filter: Where::new(),
            order: DEFAULT_ORDER.to_string(),
        }
    }
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns(mut self, columns: impl Into<String>) -> Self {
        self.columns = columns.into();
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn filter(mut self, filter: Where) -> Self {
        self.filter = filter;
        self
    }

    /// Add one `<column>_<operator>` predicate
    pub fn filter_by(mut self, key: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.filter.insert(key.into(), value.into());
        self
    }

    pub fn order(mut self, order: impl Into<String>) -> Self {
        self.order = order.into();
        self
    }

    /// OFFSET for the current page; `page = 1` starts at 0
    pub fn offset(&self) -> Option<u64> {
        self.page
            .map(|page| u64::from(self.limit) * u64::from(page.saturating_sub(1)))
    }
}
