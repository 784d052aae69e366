use crate::PostgresConverter;
use fluent_core::{
    BinaryOpType, ContainsMethod, Error, FilterMethod, FilterRelation, QueryFilter, QueryValue,
    Result, SqlExpression, SqlLiteral, Value,
};

/// Conversion of query filters into boolean expressions.
pub trait FilterStrategy: Send + Sync {
    fn convert_filter(
        &self,
        converter: &PostgresConverter,
        filter: &QueryFilter,
    ) -> Result<SqlExpression>;
}

#[derive(Default, Debug, Clone, Copy)]
pub struct PostgresFilterStrategy;

fn is_null(value: &QueryValue) -> bool {
    match value {
        QueryValue::Null => true,
        QueryValue::Bind(v) => v.is_null(),
        _ => false,
    }
}

fn order_op(inverse: bool, equality: bool) -> BinaryOpType {
    match (inverse, equality) {
        (false, false) => BinaryOpType::Greater,
        (false, true) => BinaryOpType::GreaterEqual,
        (true, false) => BinaryOpType::Less,
        (true, true) => BinaryOpType::LessEqual,
    }
}

impl PostgresFilterStrategy {
    fn convert_value_filter(
        &self,
        converter: &PostgresConverter,
        lhs: SqlExpression,
        method: &FilterMethod,
        value: &QueryValue,
    ) -> Result<SqlExpression> {
        Ok(match method {
            FilterMethod::Equality { inverse } => {
                if is_null(value) {
                    SqlExpression::binary(
                        lhs,
                        if *inverse {
                            BinaryOpType::IsNot
                        } else {
                            BinaryOpType::Is
                        },
                        SqlExpression::Literal(SqlLiteral::Null),
                    )
                } else {
                    SqlExpression::binary(
                        lhs,
                        if *inverse {
                            BinaryOpType::NotEqual
                        } else {
                            BinaryOpType::Equal
                        },
                        converter.convert_value(value)?,
                    )
                }
            }
            FilterMethod::Order { inverse, equality } => {
                if is_null(value) {
                    return Err(Error::Conversion(
                        "NULL cannot be compared with an ordering operator".into(),
                    ));
                }
                SqlExpression::binary(
                    lhs,
                    order_op(*inverse, *equality),
                    converter.convert_value(value)?,
                )
            }
            FilterMethod::Subset { inverse } => {
                let values = match value {
                    QueryValue::Array(values) => values
                        .iter()
                        .map(|v| converter.convert_value(v))
                        .collect::<Result<Vec<_>>>()?,
                    QueryValue::Bind(Value::List(Some(values), ..)) => values
                        .iter()
                        .map(|v| SqlExpression::Bind(v.clone()))
                        .collect(),
                    _ => {
                        return Err(Error::Conversion(format!(
                            "A subset filter needs a list of values, found {:?}",
                            value
                        )));
                    }
                };
                if values.is_empty() {
                    // `IN ()` is not valid SQL
                    return Ok(SqlExpression::Literal(SqlLiteral::Boolean(*inverse)));
                }
                SqlExpression::binary(
                    lhs,
                    if *inverse {
                        BinaryOpType::NotIn
                    } else {
                        BinaryOpType::In
                    },
                    SqlExpression::List(values).group(),
                )
            }
            FilterMethod::Contains { inverse, method } => {
                let QueryValue::Bind(Value::Varchar(Some(v))) = value else {
                    return Err(Error::Conversion(format!(
                        "A contains filter needs a string, found {:?}",
                        value
                    )));
                };
                let pattern = match method {
                    ContainsMethod::Prefix => format!("{v}%"),
                    ContainsMethod::Suffix => format!("%{v}"),
                    ContainsMethod::Anywhere => format!("%{v}%"),
                };
                SqlExpression::binary(
                    lhs,
                    if *inverse {
                        BinaryOpType::NotLike
                    } else {
                        BinaryOpType::Like
                    },
                    SqlExpression::bind(pattern),
                )
            }
            FilterMethod::Custom(op) => SqlExpression::binary(
                lhs,
                BinaryOpType::Custom(op.clone()),
                converter.convert_value(value)?,
            ),
        })
    }

    fn convert_field_filter(
        &self,
        lhs: SqlExpression,
        method: &FilterMethod,
        rhs: SqlExpression,
    ) -> Result<SqlExpression> {
        Ok(match method {
            FilterMethod::Equality { inverse } => SqlExpression::binary(
                lhs,
                if *inverse {
                    BinaryOpType::NotEqual
                } else {
                    BinaryOpType::Equal
                },
                rhs,
            ),
            FilterMethod::Order { inverse, equality } => {
                SqlExpression::binary(lhs, order_op(*inverse, *equality), rhs)
            }
            FilterMethod::Subset { .. } => {
                return Err(Error::Conversion(
                    "A subset filter cannot compare two fields".into(),
                ));
            }
            FilterMethod::Contains { inverse, method } => {
                let any = || SqlExpression::string("%");
                let pattern = match method {
                    ContainsMethod::Prefix => {
                        SqlExpression::binary(rhs, BinaryOpType::Concatenate, any())
                    }
                    ContainsMethod::Suffix => {
                        SqlExpression::binary(any(), BinaryOpType::Concatenate, rhs)
                    }
                    ContainsMethod::Anywhere => SqlExpression::binary(
                        SqlExpression::binary(any(), BinaryOpType::Concatenate, rhs),
                        BinaryOpType::Concatenate,
                        any(),
                    ),
                };
                SqlExpression::binary(
                    lhs,
                    if *inverse {
                        BinaryOpType::NotLike
                    } else {
                        BinaryOpType::Like
                    },
                    pattern,
                )
            }
            FilterMethod::Custom(op) => {
                SqlExpression::binary(lhs, BinaryOpType::Custom(op.clone()), rhs)
            }
        })
    }
}

impl FilterStrategy for PostgresFilterStrategy {
    fn convert_filter(
        &self,
        converter: &PostgresConverter,
        filter: &QueryFilter,
    ) -> Result<SqlExpression> {
        match filter {
            QueryFilter::Value {
                field,
                method,
                value,
            } => self.convert_value_filter(converter, converter.convert_field(field)?, method, value),
            QueryFilter::Field { lhs, method, rhs } => self.convert_field_filter(
                converter.convert_field(lhs)?,
                method,
                converter.convert_field(rhs)?,
            ),
            QueryFilter::Group { filters, relation } => {
                let op = match relation {
                    FilterRelation::And => BinaryOpType::And,
                    FilterRelation::Or => BinaryOpType::Or,
                };
                let filters = filters
                    .iter()
                    .map(|v| converter.filter_strategy().convert_filter(converter, v))
                    .collect::<Result<Vec<_>>>()?;
                Ok(match SqlExpression::fold(filters, op) {
                    Some(v) => v.group(),
                    None => SqlExpression::Literal(SqlLiteral::Boolean(
                        *relation == FilterRelation::And,
                    )),
                })
            }
            QueryFilter::Custom(expression) => Ok(expression.clone()),
        }
    }
}
