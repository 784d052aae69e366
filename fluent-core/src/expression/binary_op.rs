use crate::{SqlExpression, writer::SqlWriter};
use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinaryOpType {
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    In,
    NotIn,
    Is,
    IsNot,
    Like,
    NotLike,
    Concatenate,
    And,
    Or,
    /// Operator written verbatim.
    Custom(String),
}

impl BinaryOpType {
    pub fn precedence(&self, writer: &dyn SqlWriter) -> i32 {
        writer.expression_binary_op_precedence(self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOp {
    pub op: BinaryOpType,
    pub lhs: SqlExpression,
    pub rhs: SqlExpression,
}

impl Display for BinaryOpType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BinaryOpType::Equal => "=",
            BinaryOpType::NotEqual => "<>",
            BinaryOpType::Less => "<",
            BinaryOpType::Greater => ">",
            BinaryOpType::LessEqual => "<=",
            BinaryOpType::GreaterEqual => ">=",
            BinaryOpType::In => "IN",
            BinaryOpType::NotIn => "NOT IN",
            BinaryOpType::Is => "IS",
            BinaryOpType::IsNot => "IS NOT",
            BinaryOpType::Like => "LIKE",
            BinaryOpType::NotLike => "NOT LIKE",
            BinaryOpType::Concatenate => "||",
            BinaryOpType::And => "AND",
            BinaryOpType::Or => "OR",
            BinaryOpType::Custom(v) => v,
        })
    }
}
