use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::schema::{ForeignKeyId, Link, SchemaGraph, TableId};

/// A tree of foreign key links that connects a set of required tables, possibly through
/// intermediary tables. Links are ordered by a breadth-first walk from the first required
/// table, and each link points away from that table, so the order can be used directly as a
/// `FROM ... JOIN ...` sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinPath {
    links: Vec<Link>,
    required: BTreeSet<TableId>,
    intermediaries: BTreeSet<TableId>,
}

/// Ordering used to choose between candidate paths. Paths are tied when they agree on the
/// edge count and intermediary count; the remaining fields only break the tie.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct PathRank {
    edges: usize,
    intermediary_count: usize,
    intermediaries: Vec<TableId>,
    foreign_keys: Vec<ForeignKeyId>,
}

impl PathRank {
    pub fn ties_with(&self, other: &PathRank) -> bool {
        self.edges == other.edges && self.intermediary_count == other.intermediary_count
    }
}

impl JoinPath {
    pub(crate) fn empty(required: BTreeSet<TableId>) -> Self {
        Self {
            links: Vec::new(),
            required,
            intermediaries: BTreeSet::new(),
        }
    }

    /// `foreign_key_ids` must form a tree spanning `required` and `intermediaries`.
    pub(crate) fn from_tree(
        graph: &SchemaGraph,
        required: &BTreeSet<TableId>,
        intermediaries: BTreeSet<TableId>,
        foreign_key_ids: &[ForeignKeyId],
    ) -> Self {
        let mut remaining: BTreeSet<ForeignKeyId> = foreign_key_ids.iter().copied().collect();
        let mut links = Vec::with_capacity(foreign_key_ids.len());
        let mut visited = BTreeSet::new();
        let mut queue = VecDeque::new();
        if let Some(&start) = required.first() {
            visited.insert(start);
            queue.push_back(start);
        }
        while let Some(table_id) = queue.pop_front() {
            for adjacent in graph.adjacent(table_id) {
                if !remaining.contains(&adjacent.foreign_key) || visited.contains(&adjacent.neighbor)
                {
                    continue;
                }
                remaining.remove(&adjacent.foreign_key);
                visited.insert(adjacent.neighbor);
                queue.push_back(adjacent.neighbor);
                links.extend(graph.foreign_key(adjacent.foreign_key).link_from(table_id));
            }
        }
        debug_assert!(remaining.is_empty(), "foreign keys do not form a tree");
        Self {
            links,
            required: required.clone(),
            intermediaries,
        }
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// The number of edges.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn required_table_ids(&self) -> &BTreeSet<TableId> {
        &self.required
    }

    pub fn intermediary_table_ids(&self) -> &BTreeSet<TableId> {
        &self.intermediaries
    }

    pub fn table_ids(&self) -> BTreeSet<TableId> {
        self.required.union(&self.intermediaries).copied().collect()
    }

    pub fn foreign_key_ids(&self) -> BTreeSet<ForeignKeyId> {
        self.links.iter().map(Link::get_foreign_key_id).collect()
    }

    /// The links leading from one table of this path to another, in travel order.
    pub fn route(&self, from: TableId, to: TableId) -> Option<Vec<Link>> {
        let mut neighbors = BTreeMap::<TableId, Vec<Link>>::new();
        for link in &self.links {
            let foreign_key = link.get_foreign_key();
            for table_id in [link.get_start().table_id, link.get_end().table_id] {
                neighbors
                    .entry(table_id)
                    .or_default()
                    .extend(foreign_key.link_from(table_id));
            }
        }
        let mut arrived_by = BTreeMap::<TableId, Option<Link>>::from([(from, None)]);
        let mut queue = VecDeque::from([from]);
        while let Some(table_id) = queue.pop_front() {
            if table_id == to {
                break;
            }
            for link in neighbors.get(&table_id).into_iter().flatten() {
                let next = link.get_end().table_id;
                if !arrived_by.contains_key(&next) {
                    arrived_by.insert(next, Some(*link));
                    queue.push_back(next);
                }
            }
        }
        let mut route = Vec::new();
        let mut current = to;
        while let Some(link) = arrived_by.get(&current)?.as_ref() {
            route.push(*link);
            current = link.get_start().table_id;
        }
        route.reverse();
        Some(route)
    }

    pub(crate) fn rank(&self) -> PathRank {
        PathRank {
            edges: self.links.len(),
            intermediary_count: self.intermediaries.len(),
            intermediaries: self.intermediaries.iter().copied().collect(),
            foreign_keys: self.foreign_key_ids().into_iter().collect(),
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
            PrimitiveTable::new("students", &["id"]),
            PrimitiveTable::new("courses", &["id", "teacher_id"]),
            PrimitiveTable::new("teachers", &["id"]),
            PrimitiveTable::new("enrollments", &["student_id", "course_id"]),
        ];
        let foreign_keys = vec![
            PrimitiveForeignKey::new(("enrollments", "student_id"), ("students", "id")),
            PrimitiveForeignKey::new(("enrollments", "course_id"), ("courses", "id")),
            PrimitiveForeignKey::new(("courses", "teacher_id"), ("teachers", "id")),
        ];
        SchemaGraph::build(tables, foreign_keys).unwrap()
    }

    #[test]
    fn test_from_tree_orders_links_outward() {
        let graph = school();
        let id = |name: &str| graph.table_id(name, &Options::default()).unwrap();
        let required = BTreeSet::from([id("students"), id("teachers")]);
        let intermediaries = BTreeSet::from([id("courses"), id("enrollments")]);
        let all: Vec<ForeignKeyId> = (0..graph.edge_count()).collect();
        let path = JoinPath::from_tree(&graph, &required, intermediaries, &all);

        assert_eq!(path.len(), 3);
        // Walk starts at `students`, the first required table by name
        let walk: Vec<(&str, &str)> = path
            .links()
            .iter()
            .map(|l| {
                (
                    graph.table_name(l.get_start().table_id),
                    graph.table_name(l.get_end().table_id),
                )
            })
            .collect();
        assert_eq!(
            walk,
            vec![
                ("students", "enrollments"),
                ("enrollments", "courses"),
                ("courses", "teachers"),
            ]
        );
    }

    #[test]
    fn test_route() {
        let graph = school();
        let id = |name: &str| graph.table_id(name, &Options::default()).unwrap();
        let required = BTreeSet::from([id("students"), id("teachers")]);
        let intermediaries = BTreeSet::from([id("courses"), id("enrollments")]);
        let all: Vec<ForeignKeyId> = (0..graph.edge_count()).collect();
        let path = JoinPath::from_tree(&graph, &required, intermediaries, &all);

        let route = path.route(id("teachers"), id("enrollments")).unwrap();
        let ends: Vec<&str> = route
            .iter()
            .map(|l| graph.table_name(l.get_end().table_id))
            .collect();
        assert_eq!(ends, vec!["courses", "enrollments"]);
        assert_eq!(path.route(id("students"), id("students")), Some(vec![]));

        let empty = JoinPath::empty(BTreeSet::from([id("students")]));
        assert!(empty.is_empty());
        assert_eq!(empty.route(id("students"), id("teachers")), None);
    }
}
