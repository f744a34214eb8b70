mod joins;
mod utils;

pub use joins::{join_list, table_list};
