//! Combining per-pair bridges into connected subgraphs, and enumerating the spanning trees of
//! those subgraphs.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use itertools::Itertools;

use crate::errors::{Error, Result};
use crate::schema::{chain::Chain, ForeignKeyId, SchemaGraph, TableId};
use crate::utils::UnionFind;
use crate::Options;

use super::search::find_bridges;

/// Candidate intermediary sets, all of the smallest size found.
pub(crate) struct IntermediarySets {
    pub sets: Vec<BTreeSet<TableId>>,
    pub truncated: bool,
}

/// Find the smallest sets of intermediary tables that join every component together.
///
/// Each pair of components is bridged by its shortest chains; one bridge per edge of a
/// spanning tree over the components is combined, so a junction table shared by several
/// bridges is only counted once.
pub(crate) fn intermediary_sets(
    graph: &SchemaGraph,
    required: &BTreeSet<TableId>,
    components: &[BTreeSet<TableId>],
    options: &Options,
) -> Result<IntermediarySets> {
    if components.len() <= 1 {
        return Ok(IntermediarySets {
            sets: vec![BTreeSet::new()],
            truncated: false,
        });
    }
    let limit = options.max_candidates.max(1);
    let mut truncated = false;

    let mut bridges = BTreeMap::<(usize, usize), Vec<BTreeSet<TableId>>>::new();
    for (i, j) in (0..components.len()).tuple_combinations() {
        let found = find_bridges(
            graph,
            required,
            &components[i],
            &components[j],
            options.max_intermediaries,
            limit,
        );
        truncated |= found.truncated;
        let interiors: Vec<BTreeSet<TableId>> = found
            .chains
            .iter()
            .map(Chain::get_interior_table_ids)
            .unique()
            .collect();
        log::debug!(
            "Components {} and {}: {} bridge(s) of {} links",
            i,
            j,
            interiors.len(),
            found.chains.first().map_or(0, Chain::len)
        );
        if !interiors.is_empty() {
            bridges.insert((i, j), interiors);
        }
    }

    let pairs: Vec<(usize, usize)> = bridges.keys().copied().collect();
    let mut connected = UnionFind::new(components.len());
    for &(i, j) in &pairs {
        connected.union(i, j);
    }
    if connected.set_count() > 1 {
        let stranded = (1..components.len())
            .find(|&k| connected.find(k) != connected.find(0))
            .unwrap_or(1);
        return Err(unresolvable(graph, &components[0], &components[stranded], options));
    }

    let (component_trees, trees_truncated) = spanning_trees(components.len(), &pairs, limit);
    truncated |= trees_truncated;

    // Many combinations prune down to the same set, so the work is bounded separately from
    // the number of distinct sets
    let budget = limit.saturating_mul(limit);
    let mut examined = 0;
    let mut unions = BTreeSet::<BTreeSet<TableId>>::new();
    'trees: for tree in &component_trees {
        let choices = tree.iter().map(|&edge| bridges[&pairs[edge]].iter());
        for combination in choices.multi_cartesian_product() {
            if unions.len() == limit || examined == budget {
                truncated = true;
                break 'trees;
            }
            examined += 1;
            let union: BTreeSet<TableId> = combination.into_iter().flatten().copied().collect();
            unions.insert(prune(graph, required, union));
        }
    }

    let smallest = unions.iter().map(BTreeSet::len).min().unwrap_or(0);
    let sets: Vec<BTreeSet<TableId>> = unions
        .into_iter()
        .filter(|set| set.len() == smallest)
        .collect();
    log::debug!(
        "{} intermediary set(s) of size {} connect the required tables",
        sets.len(),
        smallest
    );
    Ok(IntermediarySets { sets, truncated })
}

fn unresolvable(
    graph: &SchemaGraph,
    a: &BTreeSet<TableId>,
    b: &BTreeSet<TableId>,
    options: &Options,
) -> Error {
    let name = |set: &BTreeSet<TableId>| {
        set.first()
            .map(|&id| graph.table_name(id).to_string())
            .unwrap_or_default()
    };
    let (left, right) = (name(a), name(b));
    let (left, right) = if left <= right {
        (left, right)
    } else {
        (right, left)
    };
    Error::UnresolvableJoin {
        left,
        right,
        max_intermediaries: options.max_intermediaries,
    }
}

/// Drop intermediaries the required tables can do without, trying the largest names first.
fn prune(
    graph: &SchemaGraph,
    required: &BTreeSet<TableId>,
    mut intermediaries: BTreeSet<TableId>,
) -> BTreeSet<TableId> {
    let snapshot: Vec<TableId> = intermediaries.iter().rev().copied().collect();
    for table_id in snapshot {
        intermediaries.remove(&table_id);
        let nodes: BTreeSet<TableId> = required.union(&intermediaries).copied().collect();
        if !is_connected(graph, &nodes) {
            intermediaries.insert(table_id);
        }
    }
    intermediaries
}

pub(crate) fn is_connected(graph: &SchemaGraph, nodes: &BTreeSet<TableId>) -> bool {
    let Some(&start) = nodes.first() else {
        return true;
    };
    let mut seen = BTreeSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(table_id) = queue.pop_front() {
        for adjacent in graph.adjacent(table_id) {
            if nodes.contains(&adjacent.neighbor) && seen.insert(adjacent.neighbor) {
                queue.push_back(adjacent.neighbor);
            }
        }
    }
    seen.len() == nodes.len()
}

/// The foreign keys running between two distinct tables of `nodes`, by id.
pub(crate) fn induced_foreign_keys(
    graph: &SchemaGraph,
    nodes: &BTreeSet<TableId>,
) -> Vec<ForeignKeyId> {
    nodes
        .iter()
        .flat_map(|&table_id| {
            graph
                .adjacent(table_id)
                .iter()
                .filter(move |a| a.neighbor > table_id && nodes.contains(&a.neighbor))
                .map(|a| a.foreign_key)
        })
        .sorted()
        .collect()
}

/// Every spanning tree of a graph with nodes `0..node_count`, as lists of indices into
/// `edges`. Trees come out in lexicographic order of their edge indices. Stops after `limit`
/// trees and reports whether more existed.
pub(crate) fn spanning_trees(
    node_count: usize,
    edges: &[(usize, usize)],
    limit: usize,
) -> (Vec<Vec<usize>>, bool) {
    let mut search = TreeSearch {
        edges,
        needed: node_count.saturating_sub(1),
        limit,
        trees: Vec::new(),
        truncated: false,
    };
    search.extend(0, &mut Vec::new(), UnionFind::new(node_count));
    (search.trees, search.truncated)
}

struct TreeSearch<'a> {
    edges: &'a [(usize, usize)],
    needed: usize,
    limit: usize,
    trees: Vec<Vec<usize>>,
    truncated: bool,
}

impl<'a> TreeSearch<'a> {
    fn extend(&mut self, next: usize, chosen: &mut Vec<usize>, sets: UnionFind) {
        if self.truncated {
            return;
        }
        if chosen.len() == self.needed {
            if self.trees.len() == self.limit {
                self.truncated = true;
            } else {
                self.trees.push(chosen.clone());
            }
            return;
        }
        if chosen.len() + (self.edges.len() - next) < self.needed {
            return;
        }
        let (a, b) = self.edges[next];
        let mut joined = sets.clone();
        if joined.union(a, b) {
            chosen.push(next);
            self.extend(next + 1, chosen, joined);
            chosen.pop();
        }
        self.extend(next + 1, chosen, sets);
    }
}
