use std::collections::BTreeSet;

use itertools::Itertools;

use crate::errors::{msg, Error, Result};
use crate::schema::{SchemaGraph, TableId};
use crate::Options;

use super::path::JoinPath;
use super::search::direct_components;
use super::steiner::{induced_foreign_keys, intermediary_sets, spanning_trees};

/// The outcome of one resolution: the chosen path plus every other path that ties with it on
/// edge count and intermediary count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionResult {
    pub primary: JoinPath,
    /// Ordered from most to least preferred.
    pub alternatives: Vec<JoinPath>,
    /// Set when candidate enumeration stopped at `Options::max_candidates`.
    pub truncated: bool,
}

impl ResolutionResult {
    pub fn is_ambiguous(&self) -> bool {
        !self.alternatives.is_empty()
    }
}

/// Look up required tables by name. Repeated names collapse into one table.
pub(crate) fn required_table_ids<S: AsRef<str>>(
    graph: &SchemaGraph,
    tables: &[S],
    options: &Options,
) -> Result<BTreeSet<TableId>> {
    tables
        .iter()
        .map(|name| {
            let name = name.as_ref();
            graph
                .table_id(name, options)
                .ok_or_else(|| Error::InvalidArgument(msg::unknown_table(name)))
        })
        .collect()
}

/// Find the join path connecting the named tables.
pub fn resolve<S: AsRef<str>>(
    graph: &SchemaGraph,
    tables: &[S],
    options: &Options,
) -> Result<ResolutionResult> {
    let required = required_table_ids(graph, tables, options)?;
    resolve_ids(graph, &required, options)
}

/// Find the join path connecting the given tables.
///
/// When the required tables are already connected by foreign keys among themselves, only
/// those foreign keys are used. Otherwise the fewest intermediary tables that connect them are
/// added, each bridge between two required tables passing through at most
/// `options.max_intermediaries` of them.
pub fn resolve_ids(
    graph: &SchemaGraph,
    required: &BTreeSet<TableId>,
    options: &Options,
) -> Result<ResolutionResult> {
    if required.is_empty() {
        return Err(Error::InvalidArgument(msg::no_required_tables()));
    }
    if let Some(&unknown) = required.iter().find(|&&id| id >= graph.tables().len()) {
        return Err(Error::InvalidArgument(msg::unknown_table_id(unknown)));
    }
    if required.len() == 1 {
        return Ok(ResolutionResult {
            primary: JoinPath::empty(required.clone()),
            alternatives: Vec::new(),
            truncated: false,
        });
    }

    let components = direct_components(graph, required);
    log::debug!(
        "Resolving {} required tables in {} directly connected group(s)",
        required.len(),
        components.len()
    );
    let found = intermediary_sets(graph, required, &components, options)?;
    let limit = options.max_candidates.max(1);
    let mut truncated = found.truncated;

    let mut candidates = Vec::<JoinPath>::new();
    for intermediaries in found.sets {
        let nodes: BTreeSet<TableId> = required.union(&intermediaries).copied().collect();
        let positions: Vec<TableId> = nodes.iter().copied().collect();
        let position = |table_id: TableId| {
            positions
                .binary_search(&table_id)
                .expect("induced foreign keys stay within the node set")
        };
        let foreign_key_ids = induced_foreign_keys(graph, &nodes);
        let edges: Vec<(usize, usize)> = foreign_key_ids
            .iter()
            .map(|&id| {
                let foreign_key = graph.foreign_key(id);
                (
                    position(foreign_key.base.table_id),
                    position(foreign_key.target.table_id),
                )
            })
            .collect();
        let remaining = limit.saturating_sub(candidates.len());
        if remaining == 0 {
            truncated = true;
            break;
        }
        let (trees, trees_truncated) = spanning_trees(nodes.len(), &edges, remaining);
        truncated |= trees_truncated;
        for tree in trees {
            let tree_foreign_keys: Vec<_> = tree.into_iter().map(|e| foreign_key_ids[e]).collect();
            candidates.push(JoinPath::from_tree(
                graph,
                required,
                intermediaries.clone(),
                &tree_foreign_keys,
            ));
        }
    }
    if truncated {
        log::warn!(
            "Stopped enumerating join paths after {} candidates; alternatives are incomplete",
            limit
        );
    }

    candidates.sort_by_cached_key(JoinPath::rank);
    candidates.dedup();
    let mut ranked = candidates.into_iter();
    let primary = ranked.next().ok_or_else(|| {
        let (left, right) = required
            .iter()
            .take(2)
            .map(|&id| graph.table_name(id).to_string())
            .collect_tuple()
            .unwrap_or_default();
        Error::UnresolvableJoin {
            left,
            right,
            max_intermediaries: options.max_intermediaries,
        }
    })?;
    let primary_rank = primary.rank();
    let alternatives: Vec<JoinPath> = ranked
        .take_while(|path| path.rank().ties_with(&primary_rank))
        .collect();
    log::debug!(
        "Primary path has {} links through {} intermediaries; {} alternative(s)",
        primary.len(),
        primary.intermediary_table_ids().len(),
        alternatives.len()
    );
    Ok(ResolutionResult {
        primary,
        alternatives,
        truncated,
    })
}
