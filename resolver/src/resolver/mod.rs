mod path;
mod resolution;
mod resolver;
mod search;
mod steiner;

pub use path::JoinPath;
pub use resolution::{resolve, resolve_ids, ResolutionResult};
pub use resolver::Resolver;
