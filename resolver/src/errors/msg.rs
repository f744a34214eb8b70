pub fn schema_integrity(foreign_key: &str, reason: &str) -> String {
    format!("Foreign key `{foreign_key}` is invalid: {reason}")
}

pub fn unresolvable_join(left: &str, right: &str, max_intermediaries: usize) -> String {
    let noun = if max_intermediaries == 1 {
        "intermediary table"
    } else {
        "intermediary tables"
    };
    format!("No join path connects `{left}` and `{right}` within {max_intermediaries} {noun}.")
}

pub fn unknown_table(table_name: &str) -> String {
    format!("Unknown table `{table_name}`.")
}

pub fn col_not_in_table(column_name: &str, table_name: &str) -> String {
    format!("Column `{column_name}` not found within table `{table_name}`.")
}

pub fn duplicate_table(table_name: &str) -> String {
    format!("Table `{table_name}` is defined more than once.")
}

pub fn duplicate_column(column_name: &str, table_name: &str) -> String {
    format!("Column `{column_name}` is defined more than once in table `{table_name}`.")
}

pub fn no_required_tables() -> String {
    "At least one required table must be given.".to_string()
}

pub fn schema_not_json(detail: &str) -> String {
    format!("Schema input is not valid JSON ({detail}).")
}

pub fn malformed_exclusion(id: &str) -> String {
    format!("Malformed exclusion `{id}`; expected `table.column` where each part is `*` or [A-Za-z0-9_-]+.")
}

pub fn exclusion_excludes_everything() -> String {
    "The exclusion `*.*` is not allowed.".to_string()
}

pub fn no_foreign_key_for_join(join: &str) -> String {
    format!("No foreign key backs the join `{join}`.")
}

pub fn unknown_table_id(table_id: usize) -> String {
    format!("Table id {table_id} does not belong to this schema.")
}

pub fn ambiguous_route(left: &str, right: &str, route: &str, primary_route: &str) -> String {
    format!("`{left}` and `{right}` are joined through {route} instead of {primary_route}.")
}

pub fn different_foreign_keys() -> String {
    "Uses a different set of foreign keys.".to_string()
}
