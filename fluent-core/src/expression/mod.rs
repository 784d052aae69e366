mod binary_op;
mod ddl;
mod expression;
mod statement;

pub use binary_op::*;
pub use ddl::*;
pub use expression::*;
pub use statement::*;
