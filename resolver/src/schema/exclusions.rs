use std::collections::HashSet;

use crate::errors::{msg, Error, Result};

use super::primitive_schema::PrimitiveSchema;

const WILDCARD: &str = "*";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Pattern {
    Any,
    Name(String),
}

impl Pattern {
    fn parse(part: &str) -> Option<Self> {
        if part == WILDCARD {
            return Some(Pattern::Any);
        }
        let valid = !part.is_empty()
            && part
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        valid.then(|| Pattern::Name(part.to_string()))
    }

    fn matches(&self, name: &str) -> bool {
        match self {
            Pattern::Any => true,
            Pattern::Name(n) => n == name,
        }
    }
}

/// Tables and columns to hide from the resolver, written as `table.column` where either part
/// may be `*`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Exclusions {
    patterns: Vec<(Pattern, Pattern)>,
}

impl Exclusions {
    pub fn parse<S: AsRef<str>>(ids: &[S]) -> Result<Self> {
        let mut patterns = Vec::with_capacity(ids.len());
        for id in ids {
            let id = id.as_ref();
            let malformed = || Error::InvalidSchema(msg::malformed_exclusion(id));
            let (table, column) = id.split_once('.').ok_or_else(malformed)?;
            let table = Pattern::parse(table).ok_or_else(malformed)?;
            let column = Pattern::parse(column).ok_or_else(malformed)?;
            if table == Pattern::Any && column == Pattern::Any {
                return Err(Error::InvalidSchema(msg::exclusion_excludes_everything()));
            }
            patterns.push((table, column));
        }
        Ok(Self { patterns })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn excludes(&self, table: &str, column: &str) -> bool {
        self.patterns
            .iter()
            .any(|(t, c)| t.matches(table) && c.matches(column))
    }

    /// Remove excluded entities from the schema. A table disappears when all of its columns are
    /// excluded, taking its foreign keys with it. Otherwise excluded columns are removed unless
    /// they are primary keys or take part in a foreign key.
    pub fn apply(&self, schema: PrimitiveSchema) -> PrimitiveSchema {
        if self.is_empty() {
            return schema;
        }
        let dropped_tables: HashSet<String> = schema
            .tables
            .iter()
            .filter(|table| {
                !table.columns.is_empty()
                    && table
                        .columns
                        .iter()
                        .all(|column| self.excludes(&table.name, &column.name))
            })
            .map(|table| table.name.clone())
            .collect();
        for table in &dropped_tables {
            log::info!("Excluding table {}", table);
        }

        let foreign_keys: Vec<_> = schema
            .foreign_keys
            .into_iter()
            .filter(|fk| {
                !dropped_tables.contains(&fk.from.table) && !dropped_tables.contains(&fk.to.table)
            })
            .collect();
        let key_columns: HashSet<(&str, &str)> = foreign_keys
            .iter()
            .flat_map(|fk| [&fk.from, &fk.to])
            .map(|r| (r.table.as_str(), r.column.as_str()))
            .collect();

        let tables = schema
            .tables
            .into_iter()
            .filter(|table| !dropped_tables.contains(&table.name))
            .map(|mut table| {
                let table_name = table.name.clone();
                table.columns.retain(|column| {
                    let keep = column.primary_key
                        || key_columns.contains(&(table_name.as_str(), column.name.as_str()))
                        || !self.excludes(&table_name, &column.name);
                    if !keep {
                        log::info!("Excluding column {}.{}", table_name, column.name);
                    }
                    keep
                });
                table
            })
            .collect();

        PrimitiveSchema {
            tables,
            foreign_keys,
        }
    }
}
