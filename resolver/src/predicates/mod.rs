mod context;
mod predicate;
mod selection;

pub use context::JoinContext;
pub use predicate::{canonicalize, JoinPredicate, QualifiedColumn};
pub use selection::{select_joins, JoinSelection, RejectedJoin};
