use crate::{SqlExpression, SqlTable};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
    Custom(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SqlJoin {
    pub join: JoinType,
    pub table: SqlExpression,
    pub on: Option<SqlExpression>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Order {
    ASC,
    DESC,
    Custom(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ordered {
    pub expression: SqlExpression,
    pub order: Order,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlSelect {
    pub distinct: bool,
    pub columns: Vec<SqlExpression>,
    pub from: Vec<SqlExpression>,
    pub joins: Vec<SqlJoin>,
    pub predicate: Option<SqlExpression>,
    pub order_by: Vec<Ordered>,
    pub limit: Option<SqlExpression>,
    pub offset: Option<SqlExpression>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlInsert {
    pub table: SqlTable,
    pub columns: Vec<String>,
    pub values: Vec<Vec<SqlExpression>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlUpdate {
    pub table: SqlTable,
    pub values: Vec<(String, SqlExpression)>,
    pub predicate: Option<SqlExpression>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlDelete {
    pub table: SqlTable,
    pub predicate: Option<SqlExpression>,
}
