use std::collections::BTreeSet;

use serde::Serialize;

use crate::ambiguity::{report, AmbiguityReport};
use crate::resolver::{JoinPath, ResolutionResult};
use crate::schema::{SchemaGraph, TableId};

use super::predicate::canonicalize;

/// Values handed to prompt templates for one resolved question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinContext {
    pub tables: Vec<String>,
    pub intermediaries: Vec<String>,
    pub join_predicates: Vec<String>,
    pub alternatives: Vec<Vec<String>>,
    pub ambiguity: Option<AmbiguityReport>,
    pub truncated: bool,
}

impl JoinContext {
    pub fn new(graph: &SchemaGraph, result: &ResolutionResult) -> Self {
        let predicate_strings = |path: &JoinPath| -> Vec<String> {
            canonicalize(graph, path)
                .iter()
                .map(ToString::to_string)
                .collect()
        };
        JoinContext {
            tables: table_names(graph, &result.primary.table_ids()),
            intermediaries: table_names(graph, result.primary.intermediary_table_ids()),
            join_predicates: predicate_strings(&result.primary),
            alternatives: result.alternatives.iter().map(predicate_strings).collect(),
            ambiguity: report(graph, result),
            truncated: result.truncated,
        }
    }
}

/// Ids follow name order, so this is sorted.
fn table_names(graph: &SchemaGraph, table_ids: &BTreeSet<TableId>) -> Vec<String> {
    table_ids
        .iter()
        .map(|&id| graph.table_name(id).to_string())
        .collect()
}
