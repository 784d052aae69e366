mod data;
mod decoder;
mod encoder;
mod json;
mod wire_convertible;

pub use data::*;
pub use decoder::*;
pub use encoder::*;
pub use json::*;
pub use wire_convertible::*;
