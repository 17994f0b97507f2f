//! Database-backed rules. The engine never talks to a database itself;
//! callers hand in a [`Database`] implementation through the options.

use super::Rule;
use crate::engine::context::{Context, RuleError};
use crate::value::Value;

/// Minimal lookup surface consumed by `unique` and `exists`.
pub trait Database: Send + Sync {
    /// Number of rows in `table` whose `column` equals `value`.
    fn count(&self, table: &str, column: &str, value: &Value) -> Result<u64, String>;
}

/// No row of `table.column` may already hold the value.
pub fn unique(table: &str, column: &str) -> Box<dyn Rule> {
    Box::new(DbLookup {
        name: "unique",
        table: table.to_string(),
        column: column.to_string(),
        want_present: false,
    })
}

/// At least one row of `table.column` must hold the value.
pub fn exists(table: &str, column: &str) -> Box<dyn Rule> {
    Box::new(DbLookup {
        name: "exists",
        table: table.to_string(),
        column: column.to_string(),
        want_present: true,
    })
}

struct DbLookup {
    name: &'static str,
    table: String,
    column: String,
    want_present: bool,
}

impl Rule for DbLookup {
    fn name(&self) -> &'static str {
        self.name
    }

    fn validate(&self, ctx: &mut Context) -> bool {
        let Some(db) = ctx.database else {
            ctx.add_error(RuleError::new(self.name, "no database handle configured"));
            return false;
        };
        let value = ctx.value.clone();
        match db.count(&self.table, &self.column, &value) {
            Ok(count) => {
                if self.want_present {
                    count > 0
                } else {
                    count == 0
                }
            }
            Err(message) => {
                ctx.add_error(RuleError::new(self.name, message));
                false
            }
        }
    }
}
