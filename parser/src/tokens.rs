pub const COLUMN_SEPARATOR: char = '.';
pub const EQUALS: char = '=';
pub const LIST_DELIMITER: char = ',';
pub const DB_IDENTIFIER_QUOTE: char = '"';
pub const ALT_DB_IDENTIFIER_QUOTE: char = '`';
pub const STRING_ESCAPE_PREFIX: char = '\\';
pub const NO_JOINS_LITERALS: [&str; 4] = ["null", "NULL", "none", "None"];
