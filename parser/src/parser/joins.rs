use chumsky::{prelude::*, text::*};

use crate::ast::*;
use crate::tokens::*;

use super::utils::*;

fn column_ref() -> impl Psr<ColumnRef> {
    db_identifier()
        .then_ignore(just(COLUMN_SEPARATOR))
        .then(db_identifier())
        .map(|(table, column)| ColumnRef { table, column })
}

fn join_condition() -> impl Psr<JoinCondition> {
    column_ref()
        .then_ignore(just(EQUALS).padded())
        .then(column_ref())
        .map(|(left, right)| JoinCondition { left, right })
}

fn no_joins() -> impl Psr<Vec<JoinCondition>> {
    let [a, b, c, d] = NO_JOINS_LITERALS;
    choice((exactly(a), exactly(b), exactly(c), exactly(d))).to(Vec::new())
}

fn delimiter() -> impl Psr<char> {
    just(LIST_DELIMITER).padded()
}

pub fn join_list() -> impl Psr<Vec<JoinCondition>> {
    let conditions = join_condition()
        .separated_by(delimiter())
        .allow_trailing();
    whitespace().ignore_then(
        no_joins()
            .then_ignore(whitespace().then(end()))
            .or(conditions.then_ignore(whitespace().then(end()))),
    )
}

pub fn table_list() -> impl Psr<Vec<String>> {
    whitespace().ignore_then(
        db_identifier()
            .separated_by(delimiter())
            .allow_trailing()
            .then_ignore(whitespace().then(end())),
    )
}
