mod parser;

pub mod ast;
pub mod tokens;

use chumsky::Parser;

/// Parse a comma-separated list of join conditions such as
/// `accounts.custid=savings.custid, accounts.custid = checking.custid`.
///
/// Empty input and the literals `null` / `none` both produce an empty list.
pub fn parse_joins(input: &str) -> Result<Vec<ast::JoinCondition>, String> {
    parser::join_list()
        .parse(input)
        .map_err(|errors| describe_errors("join conditions", &errors))
}

/// Parse a comma-separated list of table names, e.g. `ACCOUNTS, SAVINGS`.
pub fn parse_table_list(input: &str) -> Result<Vec<String>, String> {
    parser::table_list()
        .parse(input)
        .map_err(|errors| describe_errors("table list", &errors))
}

fn describe_errors(subject: &str, errors: &[chumsky::error::Simple<char>]) -> String {
    match errors.first() {
        Some(error) => format!("Invalid {subject} at position {}", error.span().start),
        None => format!("Invalid {subject}"),
    }
}
