use std::collections::{BTreeMap, BTreeSet};

use crate::schema::{chain::Chain, ForeignKeyId, Link, SchemaGraph, TableId};
use crate::utils::UnionFind;

/// Split the required tables into groups that are already connected by foreign keys running
/// directly between required tables. Groups are ordered by their smallest table id.
pub(crate) fn direct_components(
    graph: &SchemaGraph,
    required: &BTreeSet<TableId>,
) -> Vec<BTreeSet<TableId>> {
    let positions: BTreeMap<TableId, usize> = required
        .iter()
        .enumerate()
        .map(|(position, &table_id)| (table_id, position))
        .collect();
    let mut sets = UnionFind::new(required.len());
    for (&table_id, &position) in &positions {
        for adjacent in graph.adjacent(table_id) {
            if let Some(&other) = positions.get(&adjacent.neighbor) {
                sets.union(position, other);
            }
        }
    }
    // Roots are always the smallest position in their set, so this keeps the ordering
    let mut components = BTreeMap::<usize, BTreeSet<TableId>>::new();
    for (&table_id, &position) in &positions {
        components
            .entry(sets.find(position))
            .or_default()
            .insert(table_id);
    }
    components.into_values().collect()
}

pub(crate) struct Bridges {
    /// Every shortest chain found, each running from a `from` table to a `to` table
    pub chains: Vec<Chain>,
    pub truncated: bool,
}

/// The arrivals recorded for one table during the search: which table it was reached from and
/// over which foreign key.
type Arrivals = BTreeMap<TableId, Vec<(TableId, ForeignKeyId)>>;

/// Breadth-first search for the shortest chains between two groups of required tables.
///
/// Only tables outside `required` may be passed through, and at most `max_intermediaries` of
/// them per chain. All chains of the shortest length are kept, up to `limit`.
pub(crate) fn find_bridges(
    graph: &SchemaGraph,
    required: &BTreeSet<TableId>,
    from: &BTreeSet<TableId>,
    to: &BTreeSet<TableId>,
    max_intermediaries: usize,
    limit: usize,
) -> Bridges {
    let mut depths = BTreeMap::<TableId, usize>::new();
    let mut arrivals = Arrivals::new();
    let mut target_arrivals = Arrivals::new();
    let mut frontier: BTreeSet<TableId> = from.clone();
    for &table_id in from {
        depths.insert(table_id, 0);
    }

    for depth in 1..=max_intermediaries.saturating_add(1) {
        let mut next = BTreeSet::new();
        for &table_id in &frontier {
            for adjacent in graph.adjacent(table_id) {
                let neighbor = adjacent.neighbor;
                if neighbor == table_id {
                    continue;
                }
                let arrival = (table_id, adjacent.foreign_key);
                if to.contains(&neighbor) {
                    target_arrivals.entry(neighbor).or_default().push(arrival);
                    continue;
                }
                if required.contains(&neighbor) || depth > max_intermediaries {
                    continue;
                }
                match depths.get(&neighbor) {
                    None => {
                        depths.insert(neighbor, depth);
                        arrivals.insert(neighbor, vec![arrival]);
                        next.insert(neighbor);
                    }
                    Some(&d) if d == depth => {
                        arrivals.entry(neighbor).or_default().push(arrival);
                    }
                    Some(_) => {}
                }
            }
        }
        if !target_arrivals.is_empty() {
            log::trace!("Shortest bridge found with {} links", depth);
            break;
        }
        if next.is_empty() {
            break;
        }
        frontier = next;
    }

    let mut walk = BackWalk {
        graph,
        from,
        arrivals: &arrivals,
        limit,
        chains: Vec::new(),
        truncated: false,
    };
    for (&target, target_arrivals) in &target_arrivals {
        for &(previous, foreign_key_id) in target_arrivals {
            let mut reversed = Vec::new();
            reversed.extend(graph.foreign_key(foreign_key_id).link_from(previous));
            walk.extend_back(previous, &mut reversed);
        }
        log::trace!("Bridges into table {}: {}", target, walk.chains.len());
    }
    Bridges {
        chains: walk.chains,
        truncated: walk.truncated,
    }
}

/// Rebuilds chains from the recorded arrivals by walking backwards from a target table.
struct BackWalk<'a> {
    graph: &'a SchemaGraph,
    from: &'a BTreeSet<TableId>,
    arrivals: &'a Arrivals,
    limit: usize,
    chains: Vec<Chain>,
    truncated: bool,
}

impl<'a> BackWalk<'a> {
    /// `reversed` holds the links found so far, last link first.
    fn extend_back(&mut self, table_id: TableId, reversed: &mut Vec<Link>) {
        if self.truncated {
            return;
        }
        if self.from.contains(&table_id) {
            if self.chains.len() == self.limit {
                self.truncated = true;
                return;
            }
            match Chain::try_from_links(reversed.iter().rev().copied()) {
                Ok(chain) => self.chains.push(chain),
                Err(e) => log::debug!("Discarding bridge: {}", e),
            }
            return;
        }
        let Some(table_arrivals) = self.arrivals.get(&table_id) else {
            return;
        };
        for &(previous, foreign_key_id) in table_arrivals {
            let Some(link) = self.graph.foreign_key(foreign_key_id).link_from(previous) else {
                continue;
            };
            reversed.push(link);
            self.extend_back(previous, reversed);
            reversed.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{PrimitiveForeignKey, PrimitiveTable};
    use crate::Options;

    fn school() -> SchemaGraph {
        let tables = vec![
            PrimitiveTable::new("students", &["id", "mentor_id"]),
            PrimitiveTable::new("courses", &["id", "teacher_id"]),
            PrimitiveTable::new("teachers", &["id"]),
            PrimitiveTable::new("enrollments", &["student_id", "course_id"]),
            PrimitiveTable::new("waitlist", &["student_id", "course_id"]),
            PrimitiveTable::new("clubs", &["id"]),
        ];
        let foreign_keys = vec![
            PrimitiveForeignKey::new(("students", "mentor_id"), ("students", "id")),
            PrimitiveForeignKey::new(("enrollments", "student_id"), ("students", "id")),
            PrimitiveForeignKey::new(("enrollments", "course_id"), ("courses", "id")),
            PrimitiveForeignKey::new(("waitlist", "student_id"), ("students", "id")),
            PrimitiveForeignKey::new(("waitlist", "course_id"), ("courses", "id")),
            PrimitiveForeignKey::new(("courses", "teacher_id"), ("teachers", "id")),
        ];
        SchemaGraph::build(tables, foreign_keys).unwrap()
    }

    fn ids(graph: &SchemaGraph, names: &[&str]) -> BTreeSet<TableId> {
        names
            .iter()
            .map(|n| graph.table_id(n, &Options::default()).unwrap())
            .collect()
    }

    #[test]
    fn test_direct_components() {
        let graph = school();
        let required = ids(&graph, &["students", "courses", "teachers"]);
        let components = direct_components(&graph, &required);
        assert_eq!(
            components,
            vec![
                ids(&graph, &["courses", "teachers"]),
                ids(&graph, &["students"])
            ]
        );
    }

    #[test]
    fn test_find_bridges_keeps_every_shortest_chain() {
        let graph = school();
        let required = ids(&graph, &["students", "teachers"]);
        let bridges = find_bridges(
            &graph,
            &required,
            &ids(&graph, &["students"]),
            &ids(&graph, &["teachers"]),
            2,
            64,
        );
        assert!(!bridges.truncated);
        let interiors: Vec<BTreeSet<TableId>> = bridges
            .chains
            .iter()
            .map(Chain::get_interior_table_ids)
            .collect();
        assert_eq!(
            interiors,
            vec![
                ids(&graph, &["courses", "enrollments"]),
                ids(&graph, &["courses", "waitlist"]),
            ]
        );
        assert!(bridges.chains.iter().all(|c| c.len() == 3));
    }

    #[test]
    fn test_find_bridges_respects_the_hop_bound() {
        let graph = school();
        let required = ids(&graph, &["students", "teachers"]);
        let bridges = find_bridges(
            &graph,
            &required,
            &ids(&graph, &["students"]),
            &ids(&graph, &["teachers"]),
            1,
            64,
        );
        assert!(bridges.chains.is_empty());

        let required = ids(&graph, &["students", "clubs"]);
        let bridges = find_bridges(
            &graph,
            &required,
            &ids(&graph, &["students"]),
            &ids(&graph, &["clubs"]),
            5,
            64,
        );
        assert!(bridges.chains.is_empty());
    }

    #[test]
    fn test_find_bridges_unbounded() {
        let graph = school();
        let required = ids(&graph, &["students", "teachers"]);
        let bridges = find_bridges(
            &graph,
            &required,
            &ids(&graph, &["students"]),
            &ids(&graph, &["teachers"]),
            usize::MAX,
            64,
        );
        assert_eq!(bridges.chains.len(), 2);
        assert!(bridges.chains.iter().all(|c| c.len() == 3));
    }

    #[test]
    fn test_find_bridges_limit() {
        let graph = school();
        let required = ids(&graph, &["students", "courses"]);
        let bridges = find_bridges(
            &graph,
            &required,
            &ids(&graph, &["students"]),
            &ids(&graph, &["courses"]),
            2,
            1,
        );
        assert_eq!(bridges.chains.len(), 1);
        assert!(bridges.truncated);
    }
}
