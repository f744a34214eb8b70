use std::fmt;

use serde::{Deserialize, Serialize};

/// Schema metadata as supplied by the outside world, before validation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PrimitiveSchema {
    pub tables: Vec<PrimitiveTable>,
    #[serde(default)]
    pub foreign_keys: Vec<PrimitiveForeignKey>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PrimitiveTable {
    pub name: String,
    pub columns: Vec<PrimitiveColumn>,
    /// Opaque `CREATE TABLE` text, kept for display.
    #[serde(default)]
    pub creation_statement: String,
    #[serde(default)]
    pub sample_rows: Vec<Vec<serde_json::Value>>,
}

impl PrimitiveTable {
    /// A table with plain columns and no descriptive metadata.
    pub fn new(name: &str, column_names: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            columns: column_names.iter().map(|c| PrimitiveColumn::new(c)).collect(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PrimitiveColumn {
    pub name: String,
    #[serde(default, rename = "type")]
    pub data_type: String,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default)]
    pub default: Option<serde_json::Value>,
    #[serde(default)]
    pub enum_values: Option<Vec<String>>,
    #[serde(default)]
    pub description: Option<String>,
}

fn default_nullable() -> bool {
    true
}

impl PrimitiveColumn {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            data_type: String::new(),
            nullable: default_nullable(),
            primary_key: false,
            default: None,
            enum_values: None,
            description: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PrimitiveReference {
    pub table: String,
    pub column: String,
}

impl fmt::Display for PrimitiveReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

/// `from` references `to`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PrimitiveForeignKey {
    pub from: PrimitiveReference,
    pub to: PrimitiveReference,
}

impl PrimitiveForeignKey {
    pub fn new(from: (&str, &str), to: (&str, &str)) -> Self {
        Self {
            from: PrimitiveReference {
                table: from.0.to_string(),
                column: from.1.to_string(),
            },
            to: PrimitiveReference {
                table: to.0.to_string(),
                column: to.1.to_string(),
            },
        }
    }
}

impl fmt::Display for PrimitiveForeignKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.from, self.to)
    }
}
