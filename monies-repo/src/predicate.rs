//! Parameterised SQL conditions over money columns.

use std::fmt;

use crate::column::ColumnValue;

/// A conjunction of SQL clauses with `?` placeholders and their bind values
/// in placeholder order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    clauses: Vec<String>,
    binds: Vec<ColumnValue>,
}

impl Predicate {
    pub fn new(clause: impl Into<String>, bind: ColumnValue) -> Self {
        Self {
            clauses: vec![clause.into()],
            binds: vec![bind],
        }
    }

    /// Appends `AND clause`.
    pub fn and(mut self, clause: impl Into<String>, bind: ColumnValue) -> Self {
        self.clauses.push(clause.into());
        self.binds.push(bind);
        self
    }

    /// The parenthesised SQL fragment.
    pub fn sql(&self) -> String {
        format!("({})", self.clauses.join(" AND "))
    }

    pub fn binds(&self) -> &[ColumnValue] {
        &self.binds
    }
}

/// Renders the fragment with bind values inlined, for logs and tests.
impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut binds = self.binds.iter();
        for c in self.sql().chars() {
            if c == '?' {
                if let Some(bind) = binds.next() {
                    write!(f, "{bind}")?;
                    continue;
                }
            }
            write!(f, "{c}")?;
        }
        Ok(())
    }
}
