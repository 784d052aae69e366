use crate::{
    BinaryOp, BinaryOpType, SqlAlterEnum, SqlAlterTable, SqlCreateEnum, SqlCreateTable, SqlDelete,
    SqlDropEnum, SqlDropTable, SqlInsert, SqlSelect, SqlUpdate, Value, writer::SqlWriter,
};

/// Node of the SQL tree produced by converters and printed by a [`SqlWriter`].
///
/// Serialization is deterministic: writing the same tree twice yields the same
/// text and the same ordered list of binds.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlExpression {
    /// Text copied verbatim.
    Raw(String),
    /// Quoted identifier.
    Identifier(String),
    Column {
        table: Option<String>,
        name: String,
    },
    Table(SqlTable),
    Literal(SqlLiteral),
    /// Value sent out of band, printed as a placeholder.
    Bind(Value),
    Binary(Box<BinaryOp>),
    Group(Box<SqlExpression>),
    /// Comma separated expressions.
    List(Vec<SqlExpression>),
    Function {
        name: String,
        args: Vec<SqlExpression>,
    },
    Alias {
        expression: Box<SqlExpression>,
        alias: String,
    },
    /// Value extracted from a JSON column following `path`.
    NestedSubpath {
        column: Box<SqlExpression>,
        path: Vec<String>,
    },
    DataType(SqlDataType),
    Select(Box<SqlSelect>),
    Insert(Box<SqlInsert>),
    Update(Box<SqlUpdate>),
    Delete(Box<SqlDelete>),
    /// Statement followed by `RETURNING <columns>`.
    Returning {
        statement: Box<SqlExpression>,
        columns: Vec<SqlExpression>,
    },
    CreateTable(Box<SqlCreateTable>),
    AlterTable(Box<SqlAlterTable>),
    DropTable(Box<SqlDropTable>),
    CreateEnum(Box<SqlCreateEnum>),
    AlterEnum(Box<SqlAlterEnum>),
    DropEnum(Box<SqlDropEnum>),
}

impl SqlExpression {
    pub fn raw(value: impl Into<String>) -> Self {
        SqlExpression::Raw(value.into())
    }

    pub fn identifier(value: impl Into<String>) -> Self {
        SqlExpression::Identifier(value.into())
    }

    pub fn column(table: impl Into<String>, name: impl Into<String>) -> Self {
        SqlExpression::Column {
            table: Some(table.into()),
            name: name.into(),
        }
    }

    pub fn bind(value: impl Into<Value>) -> Self {
        SqlExpression::Bind(value.into())
    }

    pub fn string(value: impl Into<String>) -> Self {
        SqlExpression::Literal(SqlLiteral::String(value.into()))
    }

    pub fn binary(lhs: SqlExpression, op: BinaryOpType, rhs: SqlExpression) -> Self {
        SqlExpression::Binary(Box::new(BinaryOp { op, lhs, rhs }))
    }

    pub fn group(self) -> Self {
        SqlExpression::Group(Box::new(self))
    }

    pub fn alias(self, alias: impl Into<String>) -> Self {
        SqlExpression::Alias {
            expression: Box::new(self),
            alias: alias.into(),
        }
    }

    /// Joins the expressions with `op`, `None` when there are none.
    pub fn fold(
        expressions: impl IntoIterator<Item = SqlExpression>,
        op: BinaryOpType,
    ) -> Option<SqlExpression> {
        expressions
            .into_iter()
            .reduce(|lhs, rhs| SqlExpression::binary(lhs, op.clone(), rhs))
    }

    pub fn precedence(&self, writer: &dyn SqlWriter) -> i32 {
        match self {
            SqlExpression::Binary(v) => v.op.precedence(writer),
            _ => i32::MAX,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlLiteral {
    Null,
    Default,
    /// `*`
    All,
    Boolean(bool),
    Numeric(String),
    String(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SqlTable {
    pub space: Option<String>,
    pub name: String,
    pub alias: Option<String>,
}

impl SqlTable {
    pub fn new(space: Option<String>, name: impl Into<String>) -> Self {
        Self {
            space,
            name: name.into(),
            alias: None,
        }
    }

    pub fn with_alias(mut self, alias: Option<String>) -> Self {
        self.alias = alias;
        self
    }
}

/// Types every dialect spells through the writer's generic type mapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlDataType {
    SmallInt,
    Int,
    BigInt,
    Text,
    Real,
    Double,
    Numeric,
    Boolean,
    Blob,
    Date,
    Time,
    Timestamp,
    Custom(String),
}
