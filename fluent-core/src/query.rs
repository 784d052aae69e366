use crate::{SqlExpression, Value};
use std::collections::BTreeMap;

/// Abstract description of a single data operation.
///
/// Built once by the caller and consumed by a driver converter. Writes carry
/// their values in `input`, one map per row keyed by column name.
#[derive(Debug, Clone)]
pub struct DatabaseQuery {
    pub schema: String,
    pub space: Option<String>,
    pub action: QueryAction,
    pub fields: Vec<QueryField>,
    pub is_unique: bool,
    pub filters: Vec<QueryFilter>,
    pub input: Vec<BTreeMap<String, QueryValue>>,
    pub joins: Vec<QueryJoin>,
    pub sorts: Vec<QuerySort>,
    pub limits: Vec<QueryLimit>,
    pub offsets: Vec<QueryLimit>,
    /// Column returned by `Create`. `None` or an empty key disables `RETURNING`.
    pub id_key: Option<String>,
}

impl DatabaseQuery {
    pub fn new(schema: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            space: None,
            action: QueryAction::Read,
            fields: Vec::new(),
            is_unique: false,
            filters: Vec::new(),
            input: Vec::new(),
            joins: Vec::new(),
            sorts: Vec::new(),
            limits: Vec::new(),
            offsets: Vec::new(),
            id_key: Some("id".into()),
        }
    }

    pub fn space(mut self, space: impl Into<String>) -> Self {
        self.space = Some(space.into());
        self
    }

    pub fn action(mut self, action: QueryAction) -> Self {
        self.action = action;
        self
    }

    pub fn field(mut self, field: QueryField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn unique(mut self) -> Self {
        self.is_unique = true;
        self
    }

    pub fn filter(mut self, filter: QueryFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Appends one row of values to write.
    pub fn input<K, V>(mut self, row: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<QueryValue>,
    {
        self.input
            .push(row.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
        self
    }

    pub fn join(mut self, join: QueryJoin) -> Self {
        self.joins.push(join);
        self
    }

    pub fn sort(mut self, sort: QuerySort) -> Self {
        self.sorts.push(sort);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limits.push(QueryLimit::Count(limit));
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offsets.push(QueryLimit::Count(offset));
        self
    }

    pub fn id_key(mut self, key: impl Into<String>) -> Self {
        self.id_key = Some(key.into());
        self
    }

    /// Disables the `RETURNING` clause on create.
    pub fn without_id_key(mut self) -> Self {
        self.id_key = None;
        self
    }
}

#[derive(Debug, Clone)]
pub enum QueryAction {
    Create,
    Read,
    Update,
    Delete,
    Aggregate {
        method: AggregateMethod,
        field: QueryField,
    },
    Custom(SqlExpression),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateMethod {
    Count,
    Sum,
    Average,
    Minimum,
    Maximum,
}

/// Reference to a column.
///
/// A path with more than one segment addresses a value nested inside a JSON
/// column: `["metadata", "createdAt"]` is the `createdAt` key of `metadata`.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryField {
    Path {
        schema: String,
        path: Vec<String>,
    },
    Custom(SqlExpression),
}

impl QueryField {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        QueryField::Path {
            schema: schema.into(),
            path: vec![name.into()],
        }
    }

    pub fn path<S: Into<String>>(schema: impl Into<String>, path: impl IntoIterator<Item = S>) -> Self {
        QueryField::Path {
            schema: schema.into(),
            path: path.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Bind(Value),
    /// Case of a database enum, written as a literal.
    EnumCase(String),
    Null,
    Default,
    Array(Vec<QueryValue>),
    Custom(SqlExpression),
}

impl QueryValue {
    pub fn bind(value: impl Into<Value>) -> Self {
        QueryValue::Bind(value.into())
    }
}

impl From<Value> for QueryValue {
    fn from(value: Value) -> Self {
        QueryValue::Bind(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryFilter {
    Value {
        field: QueryField,
        method: FilterMethod,
        value: QueryValue,
    },
    Field {
        lhs: QueryField,
        method: FilterMethod,
        rhs: QueryField,
    },
    Group {
        filters: Vec<QueryFilter>,
        relation: FilterRelation,
    },
    Custom(SqlExpression),
}

impl QueryFilter {
    pub fn value(field: QueryField, method: FilterMethod, value: impl Into<QueryValue>) -> Self {
        QueryFilter::Value {
            field,
            method,
            value: value.into(),
        }
    }

    pub fn field(lhs: QueryField, method: FilterMethod, rhs: QueryField) -> Self {
        QueryFilter::Field { lhs, method, rhs }
    }

    pub fn group(relation: FilterRelation, filters: impl IntoIterator<Item = QueryFilter>) -> Self {
        QueryFilter::Group {
            filters: filters.into_iter().collect(),
            relation,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterMethod {
    /// `=` or `!=`, `IS` or `IS NOT` against NULL.
    Equality { inverse: bool },
    /// `>` or `>=`, `<` or `<=` when inverse.
    Order { inverse: bool, equality: bool },
    /// `IN` or `NOT IN`.
    Subset { inverse: bool },
    /// `LIKE` or `NOT LIKE` with a wildcard pattern.
    Contains {
        inverse: bool,
        method: ContainsMethod,
    },
    Custom(String),
}

impl FilterMethod {
    pub const EQUAL: FilterMethod = FilterMethod::Equality { inverse: false };
    pub const NOT_EQUAL: FilterMethod = FilterMethod::Equality { inverse: true };
    pub const GREATER: FilterMethod = FilterMethod::Order {
        inverse: false,
        equality: false,
    };
    pub const GREATER_OR_EQUAL: FilterMethod = FilterMethod::Order {
        inverse: false,
        equality: true,
    };
    pub const LESS: FilterMethod = FilterMethod::Order {
        inverse: true,
        equality: false,
    };
    pub const LESS_OR_EQUAL: FilterMethod = FilterMethod::Order {
        inverse: true,
        equality: true,
    };
    pub const IN: FilterMethod = FilterMethod::Subset { inverse: false };
    pub const NOT_IN: FilterMethod = FilterMethod::Subset { inverse: true };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainsMethod {
    Prefix,
    Suffix,
    Anywhere,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterRelation {
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq)]
pub enum JoinMethod {
    Inner,
    Left,
    Right,
    Full,
    Custom(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryJoin {
    /// `<method> JOIN <schema> [AS alias] ON <foreign> = <local>`
    Join {
        schema: String,
        space: Option<String>,
        alias: Option<String>,
        method: JoinMethod,
        foreign: QueryField,
        local: QueryField,
    },
    /// Join whose condition is a conjunction of filters.
    Extended {
        schema: String,
        space: Option<String>,
        alias: Option<String>,
        method: JoinMethod,
        filters: Vec<QueryFilter>,
    },
    Custom(SqlExpression),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SortDirection {
    Ascending,
    Descending,
    Custom(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum QuerySort {
    Sort {
        field: QueryField,
        direction: SortDirection,
    },
    Custom(SqlExpression),
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryLimit {
    Count(u64),
    Custom(SqlExpression),
}
