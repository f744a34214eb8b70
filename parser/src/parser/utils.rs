use chumsky::{prelude::*, text::*};

use crate::tokens::*;

/// `Psr` is an abbreviation for "Parser". This is abbreviated because it is used in many places,
/// and we don't want it to conflict with Chumsky's `Parser` trait.
///
/// It stands in for a trait alias, which stable Rust does not have yet.
pub trait Psr<T>: Parser<char, T, Error = Simple<char>> + Clone + 'static {}
impl<S, T> Psr<T> for S where S: Parser<char, T, Error = Simple<char>> + Clone + 'static {}

pub fn exactly(s: &str) -> impl Psr<String> {
    just(s.chars().collect::<Vec<char>>()).collect::<String>()
}

/// A table or column name, either bare or quoted with `"` or a backtick.
pub fn db_identifier() -> impl Psr<String> {
    ident()
        .or(quoted(DB_IDENTIFIER_QUOTE))
        .or(quoted(ALT_DB_IDENTIFIER_QUOTE))
}

pub fn quoted(quote: char) -> impl Psr<String> {
    just(quote)
        .ignore_then(
            filter(move |c| *c != STRING_ESCAPE_PREFIX && *c != quote)
                .or(escape(quote))
                .repeated()
                .at_least(1),
        )
        .then_ignore(just(quote))
        .collect::<String>()
}

fn escape(quote: char) -> impl Psr<char> {
    just(STRING_ESCAPE_PREFIX).ignore_then(just(STRING_ESCAPE_PREFIX).or(just(quote)))
}
