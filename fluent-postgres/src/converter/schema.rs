use crate::{PostgresConverter, PostgresSqlWriter};
use fluent_core::{
    ConstraintAlgorithm, ConstraintDefinition, ConstraintDelete, DataType, DatabaseSchema, Error,
    FieldConstraint, FieldDefinition, ForeignKey, Result, SchemaAction, SqlAlterTable,
    SqlColumnConstraint, SqlColumnDefinition, SqlCreateTable, SqlDataType, SqlDropTable,
    SqlExpression, SqlReferences, SqlTable, SqlTableConstraint, SqlTableConstraintAlgorithm,
    SqlWriter,
};

/// Conversion of schema changes into DDL.
pub trait SchemaStrategy: Send + Sync {
    fn convert_schema(
        &self,
        converter: &PostgresConverter,
        schema: &DatabaseSchema,
    ) -> Result<SqlExpression>;

    fn convert_data_type(
        &self,
        converter: &PostgresConverter,
        data_type: &DataType,
    ) -> Result<SqlExpression>;
}

#[derive(Default, Debug, Clone, Copy)]
pub struct PostgresSchemaStrategy;

impl PostgresSchemaStrategy {
    pub fn convert_field_definition(
        &self,
        converter: &PostgresConverter,
        field: &FieldDefinition,
    ) -> Result<SqlColumnDefinition> {
        Ok(SqlColumnDefinition {
            name: field.name.clone(),
            data_type: converter
                .schema_strategy()
                .convert_data_type(converter, &field.data_type)?,
            constraints: field
                .constraints
                .iter()
                .map(|v| self.convert_field_constraint(&field.data_type, v))
                .collect(),
        })
    }

    pub fn convert_field_constraint(
        &self,
        data_type: &DataType,
        constraint: &FieldConstraint,
    ) -> SqlColumnConstraint {
        match constraint {
            FieldConstraint::Required => SqlColumnConstraint::NotNull,
            FieldConstraint::Identifier { auto } => SqlColumnConstraint::PrimaryKey {
                auto_increment: *auto && data_type.is_integer(),
            },
            FieldConstraint::ForeignKey(foreign) => {
                SqlColumnConstraint::References(self.convert_references(foreign))
            }
            FieldConstraint::Default(value) => {
                SqlColumnConstraint::Default(SqlExpression::Bind(value.clone()))
            }
            FieldConstraint::Custom(expression) => SqlColumnConstraint::Custom(expression.clone()),
        }
    }

    pub fn convert_constraint(
        &self,
        table: &str,
        constraint: &ConstraintDefinition,
    ) -> SqlTableConstraint {
        SqlTableConstraint {
            name: constraint
                .name
                .clone()
                .or_else(|| constraint.default_name(table)),
            algorithm: match &constraint.algorithm {
                ConstraintAlgorithm::Unique(fields) => {
                    SqlTableConstraintAlgorithm::Unique(fields.clone())
                }
                ConstraintAlgorithm::CompositeIdentifier(fields) => {
                    SqlTableConstraintAlgorithm::PrimaryKey(fields.clone())
                }
                ConstraintAlgorithm::ForeignKey { fields, foreign } => {
                    SqlTableConstraintAlgorithm::ForeignKey {
                        columns: fields.clone(),
                        references: self.convert_references(foreign),
                    }
                }
                ConstraintAlgorithm::Custom(expression) => {
                    SqlTableConstraintAlgorithm::Custom(expression.clone())
                }
            },
        }
    }

    fn convert_references(&self, foreign: &ForeignKey) -> SqlReferences {
        SqlReferences {
            table: SqlTable::new(foreign.space.clone(), &foreign.schema),
            columns: foreign.fields.clone(),
            on_delete: foreign.on_delete,
            on_update: foreign.on_update,
        }
    }

    fn constraint_name(&self, table: &str, constraint: &ConstraintDelete) -> Result<String> {
        match constraint {
            ConstraintDelete::Name(name) => Ok(name.clone()),
            ConstraintDelete::Algorithm(algorithm) => {
                algorithm.default_name(table).ok_or_else(|| {
                    Error::Conversion(format!(
                        "Constraint {:?} on `{}` has no name to drop it by",
                        algorithm, table
                    ))
                })
            }
        }
    }
}

impl SchemaStrategy for PostgresSchemaStrategy {
    fn convert_schema(
        &self,
        converter: &PostgresConverter,
        schema: &DatabaseSchema,
    ) -> Result<SqlExpression> {
        let table = SqlTable::new(schema.space.clone(), &schema.schema);
        let columns = schema
            .create_fields
            .iter()
            .map(|v| self.convert_field_definition(converter, v))
            .collect::<Result<Vec<_>>>()?;
        let constraints = schema
            .create_constraints
            .iter()
            .map(|v| self.convert_constraint(&schema.schema, v))
            .collect::<Vec<_>>();
        Ok(match schema.action {
            SchemaAction::Create => SqlExpression::CreateTable(Box::new(SqlCreateTable {
                table,
                if_not_exists: !schema.exclusive_create,
                columns,
                constraints,
            })),
            SchemaAction::Update => {
                let alter = SqlAlterTable {
                    table,
                    add_columns: columns,
                    modify_columns: schema
                        .update_fields
                        .iter()
                        .map(|v| {
                            Ok((
                                v.name.clone(),
                                converter
                                    .schema_strategy()
                                    .convert_data_type(converter, &v.data_type)?,
                            ))
                        })
                        .collect::<Result<_>>()?,
                    drop_columns: schema.delete_fields.clone(),
                    add_constraints: constraints,
                    drop_constraints: schema
                        .delete_constraints
                        .iter()
                        .map(|v| self.constraint_name(&schema.schema, v))
                        .collect::<Result<_>>()?,
                };
                if alter.is_empty() {
                    return Err(Error::Conversion(format!(
                        "Nothing to update in `{}`",
                        schema.schema
                    )));
                }
                SqlExpression::AlterTable(Box::new(alter))
            }
            SchemaAction::Delete => SqlExpression::DropTable(Box::new(SqlDropTable {
                table,
                if_exists: schema.if_exists,
            })),
        })
    }

    fn convert_data_type(
        &self,
        converter: &PostgresConverter,
        data_type: &DataType,
    ) -> Result<SqlExpression> {
        Ok(match data_type {
            DataType::Bool => SqlExpression::raw("BOOL"),
            DataType::Int8 | DataType::UInt8 => SqlExpression::raw(r#""char""#),
            DataType::Int16 => SqlExpression::DataType(SqlDataType::SmallInt),
            DataType::Int32 | DataType::UInt16 => SqlExpression::DataType(SqlDataType::Int),
            DataType::Int64 | DataType::UInt32 => SqlExpression::DataType(SqlDataType::BigInt),
            DataType::UInt64 => SqlExpression::DataType(SqlDataType::Numeric),
            DataType::String => SqlExpression::DataType(SqlDataType::Text),
            DataType::Time => SqlExpression::raw("TIME"),
            DataType::Date => SqlExpression::raw("DATE"),
            DataType::Datetime => SqlExpression::raw("TIMESTAMPTZ"),
            DataType::Float => SqlExpression::DataType(SqlDataType::Real),
            DataType::Double => SqlExpression::raw("DOUBLE PRECISION"),
            DataType::Decimal => SqlExpression::DataType(SqlDataType::Numeric),
            DataType::Data => SqlExpression::raw("BYTEA"),
            DataType::Uuid => SqlExpression::raw("UUID"),
            DataType::Enum { name, .. } => SqlExpression::identifier(name),
            DataType::Array(inner) => {
                let inner = converter
                    .schema_strategy()
                    .convert_data_type(converter, inner)?;
                let mut array = PostgresSqlWriter::new().serialize(&inner).sql;
                array.push_str("[]");
                SqlExpression::Raw(array)
            }
            DataType::Dictionary => SqlExpression::raw("JSONB"),
            DataType::Custom(expression) => expression.clone(),
        })
    }
}
