use std::collections::BTreeSet;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::resolver::JoinPath;
use crate::schema::{ForeignKey, Reference, SchemaGraph};

/// A `table.column` pair in canonical spelling: both names lowercased, so that schemas and join
/// text differing only in case produce the same predicates.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QualifiedColumn {
    pub table: String,
    pub column: String,
}

impl QualifiedColumn {
    pub fn new(table: &str, column: &str) -> Self {
        Self {
            table: table.to_lowercase(),
            column: column.to_lowercase(),
        }
    }

    pub(crate) fn from_reference(graph: &SchemaGraph, reference: Reference) -> Self {
        Self::new(
            graph.table_name(reference.table_id),
            graph.column_name(reference),
        )
    }
}

impl fmt::Display for QualifiedColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

/// An equality join condition in canonical form: the side with the smaller table name (then
/// column name) always comes first, so `a.x=b.y` and `b.y=a.x` are the same predicate.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JoinPredicate {
    left: QualifiedColumn,
    right: QualifiedColumn,
}

impl JoinPredicate {
    pub fn new(a: QualifiedColumn, b: QualifiedColumn) -> Self {
        if a <= b {
            Self { left: a, right: b }
        } else {
            Self { left: b, right: a }
        }
    }

    pub fn from_foreign_key(graph: &SchemaGraph, foreign_key: &ForeignKey) -> Self {
        Self::new(
            QualifiedColumn::from_reference(graph, foreign_key.base),
            QualifiedColumn::from_reference(graph, foreign_key.target),
        )
    }

    pub fn left(&self) -> &QualifiedColumn {
        &self.left
    }

    pub fn right(&self) -> &QualifiedColumn {
        &self.right
    }
}

impl fmt::Display for JoinPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.left, self.right)
    }
}

impl Serialize for JoinPredicate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One predicate per link of the path.
pub fn canonicalize(graph: &SchemaGraph, path: &JoinPath) -> BTreeSet<JoinPredicate> {
    path.links()
        .iter()
        .map(|link| JoinPredicate::from_foreign_key(graph, link.get_foreign_key()))
        .collect()
}

impl SchemaGraph {
    /// Every join the schema's foreign keys allow, canonicalized.
    pub fn allowed_joins(&self) -> BTreeSet<JoinPredicate> {
        self.foreign_keys()
            .iter()
            .map(|foreign_key| JoinPredicate::from_foreign_key(self, foreign_key))
            .collect()
    }
}
