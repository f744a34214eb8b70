use std::collections::BTreeSet;

use joinpath_parser::ast::ColumnRef;
use serde::Serialize;

use crate::errors::{msg, Error, Result};
use crate::schema::SchemaGraph;
use crate::Options;

use super::predicate::{JoinPredicate, QualifiedColumn};

/// Join conditions proposed from outside (typically by an LLM), checked against the schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JoinSelection {
    /// Conditions backed by a foreign key, in canonical form with schema spelling.
    pub selected: BTreeSet<JoinPredicate>,
    pub rejected: Vec<RejectedJoin>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedJoin {
    /// The condition as it was written.
    pub text: String,
    pub reason: String,
}

/// Parse comma-separated join conditions and keep the ones the schema's foreign keys allow.
pub fn select_joins(graph: &SchemaGraph, text: &str, options: &Options) -> Result<JoinSelection> {
    let conditions = joinpath_parser::parse_joins(text).map_err(Error::InvalidJoinText)?;
    let allowed = graph.allowed_joins();
    let mut selection = JoinSelection::default();
    for condition in conditions {
        let predicate = resolve_column(graph, &condition.left, options).and_then(|left| {
            Ok(JoinPredicate::new(
                left,
                resolve_column(graph, &condition.right, options)?,
            ))
        });
        match predicate {
            Ok(predicate) if allowed.contains(&predicate) => {
                selection.selected.insert(predicate);
            }
            Ok(predicate) => selection.rejected.push(RejectedJoin {
                text: condition.to_string(),
                reason: msg::no_foreign_key_for_join(&predicate.to_string()),
            }),
            Err(reason) => selection.rejected.push(RejectedJoin {
                text: condition.to_string(),
                reason,
            }),
        }
    }
    if selection.selected.is_empty() {
        log::warn!("No join selected from {:?}", text);
    }
    Ok(selection)
}

fn resolve_column(
    graph: &SchemaGraph,
    column: &ColumnRef,
    options: &Options,
) -> std::result::Result<QualifiedColumn, String> {
    let table_id = graph
        .table_id(&column.table, options)
        .ok_or_else(|| msg::unknown_table(&column.table))?;
    let table = graph.table(table_id);
    let column_id = options
        .resolve_identifier(&table.column_lookup, &column.column)
        .ok_or_else(|| msg::col_not_in_table(&column.column, &table.name))?;
    Ok(QualifiedColumn::new(
        &table.name,
        &table.column(*column_id).name,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::get_test_resource;
    use crate::IdentifierResolution;

    fn bank() -> SchemaGraph {
        SchemaGraph::from_json(&get_test_resource("bank_schema.json")).unwrap()
    }

    #[test]
    fn test_selects_allowed_joins() {
        let selection = select_joins(
            &bank(),
            "SAVINGS.CUSTID = ACCOUNTS.custid, accounts.custid=checking.custid",
            &Options::default(),
        )
        .unwrap();
        let selected: Vec<String> = selection.selected.iter().map(|p| p.to_string()).collect();
        assert_eq!(
            selected,
            vec![
                "accounts.custid=checking.custid",
                "accounts.custid=savings.custid"
            ]
        );
        assert!(selection.rejected.is_empty());
    }

    #[test]
    fn test_rejects_unknown_and_unbacked_joins() {
        let selection = select_joins(
            &bank(),
            "savings.custid=checking.custid, loans.custid=accounts.custid, accounts.id=savings.custid",
            &Options::default(),
        )
        .unwrap();
        assert!(selection.selected.is_empty());
        assert_eq!(
            selection.rejected,
            vec![
                RejectedJoin {
                    text: "savings.custid=checking.custid".to_string(),
                    reason: msg::no_foreign_key_for_join("checking.custid=savings.custid"),
                },
                RejectedJoin {
                    text: "loans.custid=accounts.custid".to_string(),
                    reason: msg::unknown_table("loans"),
                },
                RejectedJoin {
                    text: "accounts.id=savings.custid".to_string(),
                    reason: msg::col_not_in_table("id", "accounts"),
                },
            ]
        );
    }

    #[test]
    fn test_strict_resolution() {
        let options = Options {
            identifier_resolution: IdentifierResolution::Strict,
            ..Options::default()
        };
        let selection = select_joins(&bank(), "SAVINGS.custid=accounts.custid", &options).unwrap();
        assert!(selection.selected.is_empty());
        assert_eq!(selection.rejected.len(), 1);
    }

    #[test]
    fn test_no_joins() {
        let selection = select_joins(&bank(), "null", &Options::default()).unwrap();
        assert_eq!(selection, JoinSelection::default());
        assert!(matches!(
            select_joins(&bank(), "accounts.custid", &Options::default()),
            Err(Error::InvalidJoinText(_))
        ));
    }
}
