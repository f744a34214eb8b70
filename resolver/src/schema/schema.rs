use std::collections::{
    btree_map::Entry::{Occupied, Vacant},
    BTreeMap, HashMap,
};

use crate::errors::{msg, Error, Result};
use crate::Options;

use super::{
    links::{Adjacent, ForeignKey, ForeignKeyId, Reference},
    primitive_schema::{
        PrimitiveColumn, PrimitiveForeignKey, PrimitiveReference, PrimitiveSchema, PrimitiveTable,
    },
};

pub type TableName = String;
pub type ColumnName = String;
pub type TableId = usize;
pub type ColumnId = usize;

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub id: ColumnId,
    pub name: ColumnName,
    pub data_type: String,
    pub nullable: bool,
    pub primary_key: bool,
    pub default: Option<serde_json::Value>,
    pub enum_values: Option<Vec<String>>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub id: TableId,
    pub name: TableName,
    /// In declaration order; a column's id is its position.
    pub columns: Vec<Column>,
    pub column_lookup: HashMap<ColumnName, ColumnId>,
    pub creation_statement: String,
    pub sample_rows: Vec<Vec<serde_json::Value>>,
}

impl Table {
    pub fn column(&self, column_id: ColumnId) -> &Column {
        &self.columns[column_id]
    }
}

/// An immutable, undirected multigraph of tables joined by foreign keys.
///
/// Table ids follow the lexicographic order of lowercased table names and foreign key ids follow
/// the order of their canonical join predicates, so iterating by id is iterating by name. Nothing mutates a
/// graph once built; a schema change means building a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaGraph {
    tables: Vec<Table>,
    table_lookup: HashMap<TableName, TableId>,
    foreign_keys: Vec<ForeignKey>,
    /// Indexed by table id, sorted by neighbor then foreign key
    adjacency: Vec<Vec<Adjacent>>,
}

fn make_column(id: ColumnId, primitive_column: PrimitiveColumn) -> Column {
    Column {
        id,
        name: primitive_column.name,
        data_type: primitive_column.data_type,
        nullable: primitive_column.nullable,
        primary_key: primitive_column.primary_key,
        default: primitive_column.default,
        enum_values: primitive_column.enum_values,
        description: primitive_column.description,
    }
}

fn make_table(id: TableId, primitive_table: PrimitiveTable) -> Result<Table> {
    let mut column_lookup = HashMap::<ColumnName, ColumnId>::new();
    let mut columns = Vec::with_capacity(primitive_table.columns.len());
    for (column_id, primitive_column) in primitive_table.columns.into_iter().enumerate() {
        if column_lookup
            .insert(primitive_column.name.clone(), column_id)
            .is_some()
        {
            return Err(Error::InvalidSchema(msg::duplicate_column(
                &primitive_column.name,
                &primitive_table.name,
            )));
        }
        columns.push(make_column(column_id, primitive_column));
    }
    Ok(Table {
        id,
        name: primitive_table.name,
        columns,
        column_lookup,
        creation_statement: primitive_table.creation_statement,
        sample_rows: primitive_table.sample_rows,
    })
}

fn resolve_reference(
    tables: &[Table],
    table_lookup: &HashMap<TableName, TableId>,
    reference: &PrimitiveReference,
) -> std::result::Result<Reference, String> {
    let table_id = *table_lookup
        .get(&reference.table)
        .ok_or_else(|| msg::unknown_table(&reference.table))?;
    let column_id = *tables[table_id]
        .column_lookup
        .get(&reference.column)
        .ok_or_else(|| msg::col_not_in_table(&reference.column, &reference.table))?;
    Ok(Reference::new(table_id, column_id))
}

impl SchemaGraph {
    /// Validate the metadata and build the graph. Fails without building anything when a
    /// foreign key names a missing table or column. Foreign keys that repeat another one, in
    /// either direction, are dropped.
    pub fn build(
        tables: Vec<PrimitiveTable>,
        foreign_keys: Vec<PrimitiveForeignKey>,
    ) -> Result<Self> {
        let mut primitive_tables = tables;
        primitive_tables
            .sort_by_cached_key(|table| (table.name.to_lowercase(), table.name.clone()));
        if let Some(pair) = primitive_tables.windows(2).find(|w| w[0].name == w[1].name) {
            return Err(Error::InvalidSchema(msg::duplicate_table(&pair[0].name)));
        }

        let tables = primitive_tables
            .into_iter()
            .enumerate()
            .map(|(id, primitive_table)| make_table(id, primitive_table))
            .collect::<Result<Vec<Table>>>()?;
        let table_lookup: HashMap<TableName, TableId> = tables
            .iter()
            .map(|table| (table.name.clone(), table.id))
            .collect();

        // Keyed by the unordered pair of ends so that a foreign key and its mirror image collapse
        let mut unique = BTreeMap::<(Reference, Reference), (Reference, Reference)>::new();
        for primitive_foreign_key in &foreign_keys {
            let integrity_error = |reason: String| Error::SchemaIntegrity {
                foreign_key: primitive_foreign_key.to_string(),
                reason,
            };
            let base = resolve_reference(&tables, &table_lookup, &primitive_foreign_key.from)
                .map_err(integrity_error)?;
            let target = resolve_reference(&tables, &table_lookup, &primitive_foreign_key.to)
                .map_err(integrity_error)?;
            let key = if base <= target {
                (base, target)
            } else {
                (target, base)
            };
            match unique.entry(key) {
                Occupied(_) => {
                    log::debug!("Dropping duplicate foreign key {}", primitive_foreign_key);
                }
                Vacant(e) => {
                    e.insert((base, target));
                }
            }
        }

        let side = |reference: &Reference| {
            (
                reference.table_id,
                tables[reference.table_id]
                    .column(reference.column_id)
                    .name
                    .to_lowercase(),
            )
        };
        let mut ends: Vec<(Reference, Reference)> = unique.into_values().collect();
        ends.sort_by_cached_key(|(base, target)| {
            let (a, b) = (side(base), side(target));
            if a <= b {
                (a, b)
            } else {
                (b, a)
            }
        });
        let foreign_keys: Vec<ForeignKey> = ends
            .into_iter()
            .enumerate()
            .map(|(id, (base, target))| ForeignKey { id, base, target })
            .collect();

        let mut adjacency = vec![Vec::<Adjacent>::new(); tables.len()];
        for foreign_key in &foreign_keys {
            let base_table_id = foreign_key.base.table_id;
            let target_table_id = foreign_key.target.table_id;
            adjacency[base_table_id].push(Adjacent {
                neighbor: target_table_id,
                foreign_key: foreign_key.id,
            });
            if !foreign_key.is_self_referential() {
                adjacency[target_table_id].push(Adjacent {
                    neighbor: base_table_id,
                    foreign_key: foreign_key.id,
                });
            }
        }
        for entries in &mut adjacency {
            entries.sort();
        }

        log::debug!(
            "Built schema graph with {} tables and {} foreign keys",
            tables.len(),
            foreign_keys.len()
        );
        Ok(SchemaGraph {
            tables,
            table_lookup,
            foreign_keys,
            adjacency,
        })
    }

    pub fn from_json(schema_json: &str) -> Result<Self> {
        let primitive_schema = serde_json::from_str::<PrimitiveSchema>(schema_json)
            .map_err(|e| Error::InvalidSchema(msg::schema_not_json(&e.to_string())))?;
        Self::try_from(primitive_schema)
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Panics when `table_id` did not come from this graph.
    pub fn table(&self, table_id: TableId) -> &Table {
        &self.tables[table_id]
    }

    pub fn table_name(&self, table_id: TableId) -> &str {
        &self.tables[table_id].name
    }

    pub fn table_id(&self, name: &str, options: &Options) -> Option<TableId> {
        options.resolve_identifier(&self.table_lookup, name).copied()
    }

    pub fn column_name(&self, reference: Reference) -> &str {
        &self.tables[reference.table_id]
            .column(reference.column_id)
            .name
    }

    pub fn foreign_keys(&self) -> &[ForeignKey] {
        &self.foreign_keys
    }

    pub fn foreign_key(&self, foreign_key_id: ForeignKeyId) -> &ForeignKey {
        &self.foreign_keys[foreign_key_id]
    }

    /// The number of distinct foreign keys, i.e. edges.
    pub fn edge_count(&self) -> usize {
        self.foreign_keys.len()
    }

    /// Neighbors of a table, sorted by neighbor id and then foreign key id.
    pub fn adjacent(&self, table_id: TableId) -> &[Adjacent] {
        &self.adjacency[table_id]
    }
}

impl TryFrom<PrimitiveSchema> for SchemaGraph {
    type Error = Error;

    fn try_from(primitive_schema: PrimitiveSchema) -> Result<SchemaGraph> {
        SchemaGraph::build(primitive_schema.tables, primitive_schema.foreign_keys)
    }
}

#[cfg(test)]
mod tests {
    use crate::utils::get_test_resource;

    use super::*;

    fn bank_tables() -> Vec<PrimitiveTable> {
        vec![
            PrimitiveTable::new("savings", &["custid", "balance"]),
            PrimitiveTable::new("accounts", &["custid", "name"]),
            PrimitiveTable::new("checking", &["custid", "balance"]),
        ]
    }

    #[test]
    fn test_schema_from_json() {
        let graph = SchemaGraph::from_json(&get_test_resource("hospital_schema.json"));
        assert!(graph.is_ok())
    }

    #[test]
    fn test_tables_are_ordered_by_name() {
        let graph = SchemaGraph::build(bank_tables(), vec![]).unwrap();
        let names: Vec<&str> = graph.tables().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["accounts", "checking", "savings"]);
        assert_eq!(graph.table_id("SAVINGS", &Options::default()), Some(2));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_unknown_table_is_an_integrity_error() {
        let foreign_keys = vec![PrimitiveForeignKey::new(
            ("savings", "custid"),
            ("account", "custid"),
        )];
        let error = SchemaGraph::build(bank_tables(), foreign_keys).unwrap_err();
        assert_eq!(
            error,
            Error::SchemaIntegrity {
                foreign_key: "savings.custid->account.custid".to_string(),
                reason: msg::unknown_table("account"),
            }
        );
    }

    #[test]
    fn test_unknown_column_is_an_integrity_error() {
        let foreign_keys = vec![
            PrimitiveForeignKey::new(("savings", "custid"), ("accounts", "custid")),
            PrimitiveForeignKey::new(("checking", "customer"), ("accounts", "custid")),
        ];
        let error = SchemaGraph::build(bank_tables(), foreign_keys).unwrap_err();
        assert!(matches!(
            error,
            Error::SchemaIntegrity { foreign_key, .. } if foreign_key == "checking.customer->accounts.custid"
        ));
    }

    #[test]
    fn test_duplicate_foreign_keys_are_dropped() {
        let foreign_keys = vec![
            PrimitiveForeignKey::new(("savings", "custid"), ("accounts", "custid")),
            PrimitiveForeignKey::new(("checking", "custid"), ("accounts", "custid")),
            PrimitiveForeignKey::new(("accounts", "custid"), ("savings", "custid")),
            PrimitiveForeignKey::new(("savings", "custid"), ("accounts", "custid")),
        ];
        let graph = SchemaGraph::build(bank_tables(), foreign_keys).unwrap();
        assert_eq!(graph.edge_count(), 2);

        // The first occurrence keeps its direction
        let savings = graph.foreign_key(1);
        assert_eq!(graph.table_name(savings.base.table_id), "savings");
        assert_eq!(graph.table_name(savings.target.table_id), "accounts");
    }

    #[test]
    fn test_adjacency() {
        let tables = vec![
            PrimitiveTable::new("employees", &["id", "manager_id", "department_id"]),
            PrimitiveTable::new("departments", &["id", "head_id"]),
        ];
        let foreign_keys = vec![
            PrimitiveForeignKey::new(("employees", "manager_id"), ("employees", "id")),
            PrimitiveForeignKey::new(("employees", "department_id"), ("departments", "id")),
            PrimitiveForeignKey::new(("departments", "head_id"), ("employees", "id")),
        ];
        let graph = SchemaGraph::build(tables, foreign_keys).unwrap();
        assert_eq!(graph.edge_count(), 3);

        let departments = graph.table_id("departments", &Options::default()).unwrap();
        let employees = graph.table_id("employees", &Options::default()).unwrap();
        // departments.head_id=employees.id, departments.id=employees.department_id,
        // employees.id=employees.manager_id
        assert_eq!(
            graph.adjacent(departments),
            &[
                Adjacent {
                    neighbor: employees,
                    foreign_key: 0
                },
                Adjacent {
                    neighbor: employees,
                    foreign_key: 1
                },
            ]
        );
        // The self-referential foreign key shows up exactly once
        assert_eq!(
            graph.adjacent(employees),
            &[
                Adjacent {
                    neighbor: departments,
                    foreign_key: 0
                },
                Adjacent {
                    neighbor: departments,
                    foreign_key: 1
                },
                Adjacent {
                    neighbor: employees,
                    foreign_key: 2
                },
            ]
        );
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let tables = vec![
            PrimitiveTable::new("accounts", &["custid"]),
            PrimitiveTable::new("accounts", &["name"]),
        ];
        assert_eq!(
            SchemaGraph::build(tables, vec![]),
            Err(Error::InvalidSchema(msg::duplicate_table("accounts")))
        );

        let tables = vec![PrimitiveTable::new("accounts", &["custid", "custid"])];
        assert_eq!(
            SchemaGraph::build(tables, vec![]),
            Err(Error::InvalidSchema(msg::duplicate_column(
                "custid", "accounts"
            )))
        );
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            SchemaGraph::from_json("{\"tables\": 3}"),
            Err(Error::InvalidSchema(_))
        ));
    }
}
