use joinpath::{parse_tables, Options, Resolver};
use wasm_bindgen::prelude::*;

/// Resolve a comma-separated list of tables and return the join context as JSON.
#[wasm_bindgen]
pub fn resolve(schema_json: &str, tables: &str, max_intermediaries: usize) -> Result<String, String> {
    let options = Options {
        max_intermediaries,
        ..Options::default()
    };
    let resolver = Resolver::new(schema_json, options).map_err(|e| e.to_string())?;
    let tables = parse_tables(tables).map_err(|e| e.to_string())?;
    let context = resolver
        .context(tables.as_slice())
        .map_err(|e| e.to_string())?;
    serde_json::to_string(&context).map_err(|e| e.to_string())
}

/// Every join the schema allows, as a JSON array of `table_a.col_a=table_b.col_b` strings.
#[wasm_bindgen]
pub fn allowed_joins(schema_json: &str) -> Result<String, String> {
    let resolver = Resolver::new(schema_json, Options::default()).map_err(|e| e.to_string())?;
    serde_json::to_string(&resolver.allowed_joins()).map_err(|e| e.to_string())
}
