use crate::PostgresConverter;
use fluent_core::{
    BinaryOpType, JoinMethod, JoinType, QueryJoin, Result, SqlExpression, SqlJoin, SqlLiteral,
    SqlTable,
};

pub trait JoinStrategy: Send + Sync {
    fn convert_join(&self, converter: &PostgresConverter, join: &QueryJoin) -> Result<SqlJoin>;
}

#[derive(Default, Debug, Clone, Copy)]
pub struct PostgresJoinStrategy;

fn join_type(method: &JoinMethod) -> JoinType {
    match method {
        JoinMethod::Inner => JoinType::Inner,
        JoinMethod::Left => JoinType::Left,
        JoinMethod::Right => JoinType::Right,
        JoinMethod::Full => JoinType::Full,
        JoinMethod::Custom(v) => JoinType::Custom(v.clone()),
    }
}

impl JoinStrategy for PostgresJoinStrategy {
    fn convert_join(&self, converter: &PostgresConverter, join: &QueryJoin) -> Result<SqlJoin> {
        Ok(match join {
            QueryJoin::Join {
                schema,
                space,
                alias,
                method,
                foreign,
                local,
            } => SqlJoin {
                join: join_type(method),
                table: SqlExpression::Table(
                    SqlTable::new(space.clone(), schema).with_alias(alias.clone()),
                ),
                on: Some(SqlExpression::binary(
                    converter.convert_field(foreign)?,
                    BinaryOpType::Equal,
                    converter.convert_field(local)?,
                )),
            },
            QueryJoin::Extended {
                schema,
                space,
                alias,
                method,
                filters,
            } => SqlJoin {
                join: join_type(method),
                table: SqlExpression::Table(
                    SqlTable::new(space.clone(), schema).with_alias(alias.clone()),
                ),
                on: Some(
                    converter
                        .convert_filters(filters)?
                        .unwrap_or(SqlExpression::Literal(SqlLiteral::Boolean(true))),
                ),
            },
            QueryJoin::Custom(expression) => SqlJoin {
                join: JoinType::Custom(String::new()),
                table: expression.clone(),
                on: None,
            },
        })
    }
}
