mod filter;
mod join;
mod schema;
mod sort;

pub use filter::*;
pub use join::*;
pub use schema::*;
pub use sort::*;

use fluent_core::{
    AggregateMethod, BinaryOpType, DatabaseEnum, DatabaseQuery, DatabaseSchema, EnumAction,
    Error, QueryAction, QueryField, QueryFilter, QueryLimit, QueryValue, Result, SqlAlterEnum,
    SqlCreateEnum, SqlDelete, SqlDropEnum, SqlExpression, SqlInsert, SqlJoin, SqlLiteral,
    SqlSelect, SqlTable, SqlUpdate,
};
use std::{collections::BTreeSet, fmt, sync::Arc};

/// Translates the abstract operations of the ORM into [`SqlExpression`] trees.
///
/// Each capability is delegated to a strategy so that a single one can be
/// replaced without touching the others. Conversion is pure: the same input
/// always produces the same tree.
#[derive(Clone)]
pub struct PostgresConverter {
    filter: Arc<dyn FilterStrategy>,
    sort: Arc<dyn SortStrategy>,
    join: Arc<dyn JoinStrategy>,
    schema: Arc<dyn SchemaStrategy>,
}

impl Default for PostgresConverter {
    fn default() -> Self {
        Self {
            filter: Arc::new(PostgresFilterStrategy),
            sort: Arc::new(PostgresSortStrategy),
            join: Arc::new(PostgresJoinStrategy),
            schema: Arc::new(PostgresSchemaStrategy),
        }
    }
}

impl fmt::Debug for PostgresConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresConverter").finish_non_exhaustive()
    }
}

impl PostgresConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter_strategy(mut self, strategy: impl FilterStrategy + 'static) -> Self {
        self.filter = Arc::new(strategy);
        self
    }

    pub fn with_sort_strategy(mut self, strategy: impl SortStrategy + 'static) -> Self {
        self.sort = Arc::new(strategy);
        self
    }

    pub fn with_join_strategy(mut self, strategy: impl JoinStrategy + 'static) -> Self {
        self.join = Arc::new(strategy);
        self
    }

    pub fn with_schema_strategy(mut self, strategy: impl SchemaStrategy + 'static) -> Self {
        self.schema = Arc::new(strategy);
        self
    }

    pub fn convert_query(&self, query: &DatabaseQuery) -> Result<SqlExpression> {
        let table = SqlTable::new(query.space.clone(), &query.schema);
        let predicate = self.convert_filters(&query.filters)?;
        Ok(match &query.action {
            QueryAction::Create => {
                if query.input.is_empty() {
                    return Err(Error::Conversion(format!(
                        "Nothing to insert into `{}`",
                        query.schema
                    )));
                }
                let columns: Vec<String> = query
                    .input
                    .iter()
                    .flat_map(|row| row.keys())
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .cloned()
                    .collect();
                let values = query
                    .input
                    .iter()
                    .map(|row| {
                        columns
                            .iter()
                            .map(|column| match row.get(column) {
                                Some(value) => self.convert_value(value),
                                None => Ok(SqlExpression::Literal(SqlLiteral::Default)),
                            })
                            .collect::<Result<Vec<_>>>()
                    })
                    .collect::<Result<Vec<_>>>()?;
                let insert = SqlExpression::Insert(Box::new(SqlInsert {
                    table,
                    columns,
                    values,
                }));
                match query.id_key.as_deref().filter(|v| !v.is_empty()) {
                    Some(id_key) => SqlExpression::Returning {
                        statement: Box::new(insert),
                        columns: vec![SqlExpression::identifier(id_key)],
                    },
                    None => insert,
                }
            }
            QueryAction::Read => SqlExpression::Select(Box::new(SqlSelect {
                distinct: query.is_unique,
                columns: query
                    .fields
                    .iter()
                    .map(|v| self.convert_selected_field(v))
                    .collect::<Result<_>>()?,
                from: vec![SqlExpression::Table(table)],
                joins: self.convert_joins(query)?,
                predicate,
                order_by: query
                    .sorts
                    .iter()
                    .map(|v| self.sort.convert_sort(self, v))
                    .collect::<Result<_>>()?,
                limit: query.limits.first().map(|v| self.convert_limit(v)),
                offset: query.offsets.first().map(|v| self.convert_limit(v)),
            })),
            QueryAction::Update => {
                let Some(row) = query.input.first() else {
                    return Err(Error::Conversion(format!(
                        "Nothing to update in `{}`",
                        query.schema
                    )));
                };
                SqlExpression::Update(Box::new(SqlUpdate {
                    table,
                    values: row
                        .iter()
                        .map(|(k, v)| Ok((k.clone(), self.convert_value(v)?)))
                        .collect::<Result<_>>()?,
                    predicate,
                }))
            }
            QueryAction::Delete => {
                SqlExpression::Delete(Box::new(SqlDelete { table, predicate }))
            }
            QueryAction::Aggregate { method, field } => {
                let name = match method {
                    AggregateMethod::Count => "COUNT",
                    AggregateMethod::Sum => "SUM",
                    AggregateMethod::Average => "AVG",
                    AggregateMethod::Minimum => "MIN",
                    AggregateMethod::Maximum => "MAX",
                };
                SqlExpression::Select(Box::new(SqlSelect {
                    columns: vec![
                        SqlExpression::Function {
                            name: name.into(),
                            args: vec![self.convert_field(field)?],
                        }
                        .alias("aggregate"),
                    ],
                    from: vec![SqlExpression::Table(table)],
                    joins: self.convert_joins(query)?,
                    predicate,
                    ..Default::default()
                }))
            }
            QueryAction::Custom(expression) => expression.clone(),
        })
    }

    /// The single DDL statement implementing the schema change.
    pub fn convert_schema(&self, schema: &DatabaseSchema) -> Result<SqlExpression> {
        self.schema.convert_schema(self, schema)
    }

    /// Statements implementing the enum change, to be issued in order.
    ///
    /// Case deletions are not expressible and are ignored here.
    pub fn convert_enum(&self, value: &DatabaseEnum) -> Vec<SqlExpression> {
        match value.action {
            EnumAction::Create => vec![SqlExpression::CreateEnum(Box::new(SqlCreateEnum {
                name: value.name.clone(),
                cases: value.create_cases.clone(),
            }))],
            EnumAction::Update => value
                .create_cases
                .iter()
                .map(|case| {
                    SqlExpression::AlterEnum(Box::new(SqlAlterEnum {
                        name: value.name.clone(),
                        add_value: case.clone(),
                    }))
                })
                .collect(),
            EnumAction::Delete => vec![SqlExpression::DropEnum(Box::new(SqlDropEnum {
                name: value.name.clone(),
                if_exists: false,
            }))],
        }
    }

    /// Column reference, or JSON extraction when the path goes inside the column.
    pub fn convert_field(&self, field: &QueryField) -> Result<SqlExpression> {
        match field {
            QueryField::Path { schema, path } => match path.as_slice() {
                [] => Err(Error::Conversion(format!(
                    "Empty field path on `{}`",
                    schema
                ))),
                [name] => Ok(SqlExpression::column(schema, name)),
                [name, rest @ ..] => Ok(SqlExpression::NestedSubpath {
                    column: Box::new(SqlExpression::column(schema, name)),
                    path: rest.to_vec(),
                }),
            },
            QueryField::Custom(expression) => Ok(expression.clone()),
        }
    }

    /// Selected field aliased `<schema>_<path>` so rows of joined schemas can be told apart.
    pub fn convert_selected_field(&self, field: &QueryField) -> Result<SqlExpression> {
        let expression = self.convert_field(field)?;
        Ok(match field {
            QueryField::Path { schema, path } => {
                expression.alias(format!("{}_{}", schema, path.join("_")))
            }
            QueryField::Custom(..) => expression,
        })
    }

    pub fn convert_value(&self, value: &QueryValue) -> Result<SqlExpression> {
        Ok(match value {
            QueryValue::Bind(v) => SqlExpression::Bind(v.clone()),
            QueryValue::EnumCase(v) => SqlExpression::string(v),
            QueryValue::Null => SqlExpression::Literal(SqlLiteral::Null),
            QueryValue::Default => SqlExpression::Literal(SqlLiteral::Default),
            QueryValue::Array(values) => SqlExpression::List(
                values
                    .iter()
                    .map(|v| self.convert_value(v))
                    .collect::<Result<_>>()?,
            )
            .group(),
            QueryValue::Custom(expression) => expression.clone(),
        })
    }

    /// Filters joined with AND, `None` when there are none.
    pub fn convert_filters<'a>(
        &self,
        filters: impl IntoIterator<Item = &'a QueryFilter>,
    ) -> Result<Option<SqlExpression>> {
        let filters = filters
            .into_iter()
            .map(|v| self.filter.convert_filter(self, v))
            .collect::<Result<Vec<_>>>()?;
        Ok(SqlExpression::fold(filters, BinaryOpType::And))
    }

    pub fn filter_strategy(&self) -> &dyn FilterStrategy {
        self.filter.as_ref()
    }

    pub fn schema_strategy(&self) -> &dyn SchemaStrategy {
        self.schema.as_ref()
    }

    fn convert_joins(&self, query: &DatabaseQuery) -> Result<Vec<SqlJoin>> {
        query
            .joins
            .iter()
            .map(|v| self.join.convert_join(self, v))
            .collect()
    }

    fn convert_limit(&self, limit: &QueryLimit) -> SqlExpression {
        match limit {
            QueryLimit::Count(v) => SqlExpression::Literal(SqlLiteral::Numeric(v.to_string())),
            QueryLimit::Custom(expression) => expression.clone(),
        }
    }
}
