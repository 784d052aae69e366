mod codec;
mod configuration;
mod connection;
mod converter;
mod database;
mod driver;
mod error;
mod row;
mod sql_writer;

pub use codec::*;
pub use configuration::*;
pub use connection::*;
pub use converter::*;
pub use database::*;
pub use driver::*;
pub use error::*;
pub use row::*;
pub use sql_writer::*;
