pub use fluent_core::*;
pub use fluent_postgres::*;
