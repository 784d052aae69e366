use crate::{ForeignKeyAction, SqlExpression, SqlTable};

#[derive(Debug, Clone, PartialEq)]
pub struct SqlCreateTable {
    pub table: SqlTable,
    pub if_not_exists: bool,
    pub columns: Vec<SqlColumnDefinition>,
    pub constraints: Vec<SqlTableConstraint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SqlColumnDefinition {
    pub name: String,
    pub data_type: SqlExpression,
    pub constraints: Vec<SqlColumnConstraint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SqlReferences {
    pub table: SqlTable,
    pub columns: Vec<String>,
    pub on_delete: ForeignKeyAction,
    pub on_update: ForeignKeyAction,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SqlColumnConstraint {
    NotNull,
    PrimaryKey { auto_increment: bool },
    References(SqlReferences),
    Default(SqlExpression),
    Custom(SqlExpression),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SqlTableConstraintAlgorithm {
    PrimaryKey(Vec<String>),
    Unique(Vec<String>),
    ForeignKey {
        columns: Vec<String>,
        references: SqlReferences,
    },
    Custom(SqlExpression),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SqlTableConstraint {
    pub name: Option<String>,
    pub algorithm: SqlTableConstraintAlgorithm,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlAlterTable {
    pub table: SqlTable,
    pub add_columns: Vec<SqlColumnDefinition>,
    pub modify_columns: Vec<(String, SqlExpression)>,
    pub drop_columns: Vec<String>,
    pub add_constraints: Vec<SqlTableConstraint>,
    pub drop_constraints: Vec<String>,
}

impl SqlAlterTable {
    pub fn is_empty(&self) -> bool {
        self.add_columns.is_empty()
            && self.modify_columns.is_empty()
            && self.drop_columns.is_empty()
            && self.add_constraints.is_empty()
            && self.drop_constraints.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlDropTable {
    pub table: SqlTable,
    pub if_exists: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlCreateEnum {
    pub name: String,
    pub cases: Vec<String>,
}

/// `ALTER TYPE <name> ADD VALUE <case>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlAlterEnum {
    pub name: String,
    pub add_value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlDropEnum {
    pub name: String,
    pub if_exists: bool,
}
