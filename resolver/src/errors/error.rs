use thiserror::Error as ThisError;

use super::msg;

/// Every recoverable failure the resolver reports across its boundary.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[non_exhaustive]
pub enum Error {
    /// A foreign key names a table or column that does not exist. Detected while building the
    /// schema graph; the caller has to fix the schema metadata.
    #[error("{}", msg::schema_integrity(.foreign_key, .reason))]
    SchemaIntegrity { foreign_key: String, reason: String },

    /// No path with at most `max_intermediaries` intermediary tables connects `left` and
    /// `right`. The caller may retry with a larger bound or give up on the question.
    #[error("{}", msg::unresolvable_join(.left, .right, *.max_intermediaries))]
    UnresolvableJoin {
        left: String,
        right: String,
        max_intermediaries: usize,
    },

    /// The required table set is empty or names a table the schema does not have.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The schema metadata is malformed in a way unrelated to foreign keys.
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// Join text (usually produced by an LLM) could not be parsed.
    #[error("Invalid join text: {0}")]
    InvalidJoinText(String),
}

pub type Result<T> = std::result::Result<T, Error>;
