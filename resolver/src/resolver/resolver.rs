use std::collections::BTreeSet;

use crate::ambiguity::{report, AmbiguityReport};
use crate::errors::{msg, Error, Result};
use crate::predicates::{canonicalize, select_joins, JoinContext, JoinPredicate, JoinSelection};
use crate::schema::{Exclusions, PrimitiveSchema, SchemaGraph};
use crate::Options;

use super::path::JoinPath;
use super::resolution::{resolve, ResolutionResult};

/// A schema graph built once and queried many times. Holds no mutable state, so one instance can
/// be shared across threads.
pub struct Resolver {
    options: Options,
    graph: SchemaGraph,
}

impl Resolver {
    pub fn new(schema_json: &str, options: Options) -> Result<Self> {
        let primitive_schema = serde_json::from_str::<PrimitiveSchema>(schema_json)
            .map_err(|e| Error::InvalidSchema(msg::schema_not_json(&e.to_string())))?;
        let exclusions = Exclusions::parse(options.exclusions.as_slice())?;
        let graph = SchemaGraph::try_from(exclusions.apply(primitive_schema))?;
        Ok(Self { options, graph })
    }

    /// Exclusions in `options` are not applied to an already built graph.
    pub fn with_graph(graph: SchemaGraph, options: Options) -> Self {
        Self { options, graph }
    }

    pub fn graph(&self) -> &SchemaGraph {
        &self.graph
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn resolve<S: AsRef<str>>(&self, tables: &[S]) -> Result<ResolutionResult> {
        resolve(&self.graph, tables, &self.options)
    }

    pub fn canonicalize(&self, path: &JoinPath) -> BTreeSet<JoinPredicate> {
        canonicalize(&self.graph, path)
    }

    pub fn report(&self, result: &ResolutionResult) -> Option<AmbiguityReport> {
        report(&self.graph, result)
    }

    /// Resolve the tables and gather everything a prompt needs about their joins.
    pub fn context<S: AsRef<str>>(&self, tables: &[S]) -> Result<JoinContext> {
        let result = self.resolve(tables)?;
        Ok(JoinContext::new(&self.graph, &result))
    }

    pub fn select_joins(&self, text: &str) -> Result<JoinSelection> {
        select_joins(&self.graph, text, &self.options)
    }

    pub fn allowed_joins(&self) -> BTreeSet<JoinPredicate> {
        self.graph.allowed_joins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::get_test_resource;

    #[test]
    fn test_resolver() {
        let resolver =
            Resolver::new(&get_test_resource("bank_schema.json"), Options::default()).unwrap();
        let context = resolver.context(&["ACCOUNTS", "SAVINGS", "CHECKING"]).unwrap();
        assert_eq!(
            context.join_predicates,
            vec![
                "accounts.custid=checking.custid",
                "accounts.custid=savings.custid"
            ]
        );
        assert!(context.intermediaries.is_empty());
        assert_eq!(resolver.allowed_joins().len(), 2);
    }

    #[test]
    fn test_exclusions_drop_tables() {
        let options = Options {
            exclusions: vec!["checking.*".to_string()],
            ..Options::default()
        };
        let resolver = Resolver::new(&get_test_resource("bank_schema.json"), options).unwrap();
        assert_eq!(resolver.graph().tables().len(), 2);
        assert!(matches!(
            resolver.resolve(&["accounts", "checking"]),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_bad_input() {
        assert!(matches!(
            Resolver::new("{", Options::default()),
            Err(Error::InvalidSchema(_))
        ));
        let options = Options {
            exclusions: vec!["*.*".to_string()],
            ..Options::default()
        };
        assert!(matches!(
            Resolver::new(&get_test_resource("bank_schema.json"), options),
            Err(Error::InvalidSchema(_))
        ));
    }
}
