mod context;
mod sql_query;
mod sql_writer;

pub use context::*;
pub use sql_query::*;
pub use sql_writer::*;
