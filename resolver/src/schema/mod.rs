pub(crate) mod chain;
mod exclusions;
pub mod links;
pub mod primitive_schema;
mod schema;

pub use exclusions::Exclusions;
pub use links::{Adjacent, ForeignKey, ForeignKeyId, Link, LinkDirection, Reference};
pub use primitive_schema::{
    PrimitiveColumn, PrimitiveForeignKey, PrimitiveReference, PrimitiveSchema, PrimitiveTable,
};
pub use schema::{Column, ColumnId, ColumnName, SchemaGraph, Table, TableId, TableName};
