use std::collections::HashMap;

use crate::utils::FlexMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdentifierResolution {
    /// Table and column names must match exactly.
    Strict,
    /// Names match ignoring case and non-alphanumeric characters, as long as the match is
    /// unambiguous. LLM output and question-derived table lists rarely match schema casing.
    #[default]
    Flexible,
}

#[derive(Debug, Clone)]
pub struct Options {
    /// The most intermediary tables a single bridge between two required tables may pass
    /// through.
    pub max_intermediaries: usize,
    pub identifier_resolution: IdentifierResolution,
    /// Upper bound on the tied candidate subgraphs enumerated per resolution.
    pub max_candidates: usize,
    /// Entity exclusion ids in the form `table.column`, where either part may be `*`.
    pub exclusions: Vec<String>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            max_intermediaries: 2,
            identifier_resolution: IdentifierResolution::default(),
            max_candidates: 64,
            exclusions: Vec::new(),
        }
    }
}

impl Options {
    pub fn resolve_identifier<'b, T>(
        &self,
        map: &'b HashMap<String, T>,
        identifier: &str,
    ) -> Option<&'b T> {
        match self.identifier_resolution {
            IdentifierResolution::Strict => map.get(identifier),
            IdentifierResolution::Flexible => map.flex_get(identifier),
        }
    }
}
