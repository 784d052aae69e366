mod as_value;
mod database;
mod driver;
mod enumeration;
mod error;
mod expression;
mod query;
mod schema;
mod util;
mod value;
mod writer;

pub use as_value::*;
pub use database::*;
pub use driver::*;
pub use enumeration::*;
pub use error::*;
pub use expression::*;
pub use query::*;
pub use schema::*;
pub use util::*;
pub use value::*;
pub use writer::*;
pub mod stream {
    pub use ::futures::stream::*;
}
pub use ::futures::future;
