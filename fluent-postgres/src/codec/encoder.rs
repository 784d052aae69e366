use crate::{JsonEncoder, PostgresData, SerdeJsonEncoder};
use bytes::BytesMut;
use fluent_core::{Error, Result, Value};
use postgres_types::{ToSql, Type};
use std::sync::Arc;

/// Wire type a value is sent as.
///
/// The untyped [`Value::Null`] goes out as `unknown`, leaving the server free
/// to infer the type from the statement.
pub fn postgres_type(value: &Value) -> Result<Type> {
    Ok(match value {
        Value::Null => Type::UNKNOWN,
        Value::Boolean(..) => Type::BOOL,
        Value::Int8(..) => Type::CHAR,
        Value::Int16(..) => Type::INT2,
        Value::Int32(..) => Type::INT4,
        Value::Int64(..) => Type::INT8,
        Value::UInt32(..) => Type::OID,
        Value::Float32(..) => Type::FLOAT4,
        Value::Float64(..) => Type::FLOAT8,
        Value::Decimal(..) => Type::NUMERIC,
        Value::Varchar(..) => Type::TEXT,
        Value::Blob(..) => Type::BYTEA,
        Value::Date(..) => Type::DATE,
        Value::Time(..) => Type::TIME,
        Value::Timestamp(..) => Type::TIMESTAMP,
        Value::TimestampWithTimezone(..) => Type::TIMESTAMPTZ,
        Value::Uuid(..) => Type::UUID,
        Value::Json(..) => Type::JSONB,
        Value::List(.., inner) => match postgres_type(inner)? {
            Type::BOOL => Type::BOOL_ARRAY,
            Type::CHAR => Type::CHAR_ARRAY,
            Type::INT2 => Type::INT2_ARRAY,
            Type::INT4 => Type::INT4_ARRAY,
            Type::INT8 => Type::INT8_ARRAY,
            Type::OID => Type::OID_ARRAY,
            Type::FLOAT4 => Type::FLOAT4_ARRAY,
            Type::FLOAT8 => Type::FLOAT8_ARRAY,
            Type::NUMERIC => Type::NUMERIC_ARRAY,
            Type::TEXT => Type::TEXT_ARRAY,
            Type::BYTEA => Type::BYTEA_ARRAY,
            Type::DATE => Type::DATE_ARRAY,
            Type::TIME => Type::TIME_ARRAY,
            Type::TIMESTAMP => Type::TIMESTAMP_ARRAY,
            Type::TIMESTAMPTZ => Type::TIMESTAMPTZ_ARRAY,
            Type::UUID => Type::UUID_ARRAY,
            Type::JSONB => Type::JSONB_ARRAY,
            ty => {
                return Err(Error::encode(
                    "List",
                    format!("lists of `{}` are not supported", ty),
                ));
            }
        },
    })
}

/// Encodes values in the binary format of the wire protocol.
#[derive(Debug, Clone)]
pub struct PostgresDataEncoder {
    json: Arc<dyn JsonEncoder>,
}

impl Default for PostgresDataEncoder {
    fn default() -> Self {
        Self::new(SerdeJsonEncoder)
    }
}

impl PostgresDataEncoder {
    pub fn new(json: impl JsonEncoder + 'static) -> Self {
        Self {
            json: Arc::new(json),
        }
    }

    pub fn encode(&self, value: &Value) -> Result<PostgresData> {
        let ty = postgres_type(value)?;
        if value.is_null() {
            return Ok(PostgresData::null(ty));
        }
        let mut out = BytesMut::new();
        let result = match value {
            Value::Boolean(Some(v)) => v.to_sql(&ty, &mut out),
            Value::Int8(Some(v)) => v.to_sql(&ty, &mut out),
            Value::Int16(Some(v)) => v.to_sql(&ty, &mut out),
            Value::Int32(Some(v)) => v.to_sql(&ty, &mut out),
            Value::Int64(Some(v)) => v.to_sql(&ty, &mut out),
            Value::UInt32(Some(v)) => v.to_sql(&ty, &mut out),
            Value::Float32(Some(v)) => v.to_sql(&ty, &mut out),
            Value::Float64(Some(v)) => v.to_sql(&ty, &mut out),
            Value::Decimal(Some(v)) => v.to_sql(&ty, &mut out),
            Value::Varchar(Some(v)) => v.as_str().to_sql(&ty, &mut out),
            Value::Blob(Some(v)) => v.as_ref().to_sql(&ty, &mut out),
            Value::Date(Some(v)) => v.to_sql(&ty, &mut out),
            Value::Time(Some(v)) => v.to_sql(&ty, &mut out),
            Value::Timestamp(Some(v)) => v.to_sql(&ty, &mut out),
            Value::TimestampWithTimezone(Some(v)) => v.to_sql(&ty, &mut out),
            Value::Uuid(Some(v)) => v.to_sql(&ty, &mut out),
            Value::Json(Some(v)) => {
                let json = self
                    .json
                    .encode(v)
                    .map_err(|e| Error::encode(value.type_name(), e))?;
                // JSONB version
                out.extend_from_slice(&[1]);
                out.extend_from_slice(&json);
                return Ok(PostgresData::new(ty, Some(out.freeze())));
            }
            Value::List(Some(values), inner) => {
                let member = postgres_type(inner)?;
                let values = values
                    .iter()
                    .map(|v| {
                        let data = self.encode(v)?;
                        if !data.is_null() && data.ty != member {
                            return Err(Error::encode(
                                value.type_name(),
                                format!("element `{}` in a list of `{}`", data.ty, member),
                            ));
                        }
                        Ok(data)
                    })
                    .collect::<Result<Vec<_>>>()?;
                values.to_sql(&ty, &mut out)
            }
            _ => {
                return Err(Error::encode(
                    value.type_name(),
                    format!("cannot encode {:?}", value),
                ));
            }
        };
        result.map_err(|e| Error::encode(value.type_name(), e))?;
        Ok(PostgresData::new(ty, Some(out.freeze())))
    }
}
