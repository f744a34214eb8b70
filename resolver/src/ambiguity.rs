use std::collections::BTreeSet;

use itertools::Itertools;
use serde::Serialize;

use crate::errors::msg;
use crate::predicates::{canonicalize, JoinPredicate};
use crate::resolver::{JoinPath, ResolutionResult};
use crate::schema::{Link, SchemaGraph};

/// Every tied alternative to a primary join path, with how each one differs from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AmbiguityReport {
    pub primary: BTreeSet<JoinPredicate>,
    pub candidates: Vec<AmbiguousCandidate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AmbiguousCandidate {
    pub predicates: BTreeSet<JoinPredicate>,
    /// Required table pairs that this candidate connects through a different route than the
    /// primary path does. Each pair is sorted by name.
    pub differing_pairs: Vec<(String, String)>,
    pub rationale: String,
}

/// `None` when the resolution had no tied alternatives.
pub fn report(graph: &SchemaGraph, result: &ResolutionResult) -> Option<AmbiguityReport> {
    if !result.is_ambiguous() {
        return None;
    }
    let candidates = result
        .alternatives
        .iter()
        .map(|alternative| describe_candidate(graph, &result.primary, alternative))
        .collect();
    Some(AmbiguityReport {
        primary: canonicalize(graph, &result.primary),
        candidates,
    })
}

fn describe_candidate(
    graph: &SchemaGraph,
    primary: &JoinPath,
    alternative: &JoinPath,
) -> AmbiguousCandidate {
    let mut differing_pairs = Vec::new();
    let mut reasons = Vec::new();
    for (&left, &right) in alternative.required_table_ids().iter().tuple_combinations() {
        let route = alternative.route(left, right).unwrap_or_default();
        let primary_route = primary.route(left, right).unwrap_or_default();
        if same_foreign_keys(&route, &primary_route) {
            continue;
        }
        let (left_name, right_name) = (graph.table_name(left), graph.table_name(right));
        reasons.push(msg::ambiguous_route(
            left_name,
            right_name,
            &describe_route(graph, &route),
            &describe_route(graph, &primary_route),
        ));
        differing_pairs.push((left_name.to_string(), right_name.to_string()));
    }
    let rationale = if reasons.is_empty() {
        msg::different_foreign_keys()
    } else {
        reasons.join(" ")
    };
    AmbiguousCandidate {
        predicates: canonicalize(graph, alternative),
        differing_pairs,
        rationale,
    }
}

fn same_foreign_keys(a: &[Link], b: &[Link]) -> bool {
    a.iter()
        .map(Link::get_foreign_key_id)
        .eq(b.iter().map(Link::get_foreign_key_id))
}

fn describe_route(graph: &SchemaGraph, route: &[Link]) -> String {
    route
        .iter()
        .map(|link| {
            format!(
                "`{}`",
                JoinPredicate::from_foreign_key(graph, link.get_foreign_key())
            )
        })
        .join(" then ")
}
