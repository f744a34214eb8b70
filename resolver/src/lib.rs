mod ambiguity;
pub mod errors;
mod options;
mod predicates;
mod resolver;
pub mod schema;
mod utils;

pub use ambiguity::{report, AmbiguityReport, AmbiguousCandidate};
pub use errors::{Error, Result};
pub use options::{IdentifierResolution, Options};
pub use predicates::{
    canonicalize, select_joins, JoinContext, JoinPredicate, JoinSelection, QualifiedColumn,
    RejectedJoin,
};
pub use resolver::{resolve, resolve_ids, JoinPath, ResolutionResult, Resolver};
pub use schema::{PrimitiveForeignKey, PrimitiveSchema, PrimitiveTable, SchemaGraph};

/// Build a schema graph from table and foreign key records.
pub fn build(
    tables: Vec<PrimitiveTable>,
    foreign_keys: Vec<PrimitiveForeignKey>,
) -> Result<SchemaGraph> {
    SchemaGraph::build(tables, foreign_keys)
}

/// Split a comma-separated table list such as `ACCOUNTS, SAVINGS`. Quoted names may contain
/// commas.
pub fn parse_tables(text: &str) -> Result<Vec<String>> {
    joinpath_parser::parse_table_list(text).map_err(Error::InvalidArgument)
}
