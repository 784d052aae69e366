use crate::{JsonDecoder, PostgresData, SerdeJsonDecoder};
use fluent_core::{Error, Result, Value};
use postgres_types::{FromSql, Kind, Type};
use rust_decimal::Decimal;
use std::sync::Arc;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};
use uuid::Uuid;

/// The NULL value a column of type `ty` decodes to.
pub fn postgres_type_to_value(ty: &Type) -> Value {
    match *ty {
        Type::BOOL => Value::Boolean(None),
        Type::CHAR => Value::Int8(None),
        Type::INT2 => Value::Int16(None),
        Type::INT4 => Value::Int32(None),
        Type::INT8 => Value::Int64(None),
        Type::OID => Value::UInt32(None),
        Type::FLOAT4 => Value::Float32(None),
        Type::FLOAT8 => Value::Float64(None),
        Type::NUMERIC => Value::Decimal(None),
        Type::VARCHAR | Type::TEXT | Type::BPCHAR | Type::NAME => Value::Varchar(None),
        Type::BYTEA => Value::Blob(None),
        Type::DATE => Value::Date(None),
        Type::TIME => Value::Time(None),
        Type::TIMESTAMP => Value::Timestamp(None),
        Type::TIMESTAMPTZ => Value::TimestampWithTimezone(None),
        Type::UUID => Value::Uuid(None),
        Type::JSON | Type::JSONB => Value::Json(None),
        _ => match ty.kind() {
            Kind::Enum(..) => Value::Varchar(None),
            Kind::Array(member) => Value::List(None, Box::new(postgres_type_to_value(member))),
            Kind::Domain(inner) => postgres_type_to_value(inner),
            _ => Value::Null,
        },
    }
}

/// Decodes the binary wire format into values.
#[derive(Debug, Clone)]
pub struct PostgresDataDecoder {
    json: Arc<dyn JsonDecoder>,
}

impl Default for PostgresDataDecoder {
    fn default() -> Self {
        Self::new(SerdeJsonDecoder)
    }
}

impl PostgresDataDecoder {
    pub fn new(json: impl JsonDecoder + 'static) -> Self {
        Self {
            json: Arc::new(json),
        }
    }

    pub fn decode_value(&self, data: &PostgresData) -> Result<Value> {
        let ty = &data.ty;
        let raw = data.value.as_deref();
        let error = |e| Error::decode(ty.name().to_string(), e);
        macro_rules! decode {
            ($variant:path, $source:ty) => {
                $variant(match raw {
                    Some(raw) => Some(<$source as FromSql>::from_sql(ty, raw).map_err(error)?.into()),
                    None => None,
                })
            };
        }
        Ok(match *ty {
            Type::BOOL => decode!(Value::Boolean, bool),
            Type::CHAR => decode!(Value::Int8, i8),
            Type::INT2 => decode!(Value::Int16, i16),
            Type::INT4 => decode!(Value::Int32, i32),
            Type::INT8 => decode!(Value::Int64, i64),
            Type::OID => decode!(Value::UInt32, u32),
            Type::FLOAT4 => decode!(Value::Float32, f32),
            Type::FLOAT8 => decode!(Value::Float64, f64),
            Type::NUMERIC => decode!(Value::Decimal, Decimal),
            Type::VARCHAR | Type::TEXT | Type::BPCHAR | Type::NAME | Type::UNKNOWN => {
                decode!(Value::Varchar, String)
            }
            Type::BYTEA => decode!(Value::Blob, Vec<u8>),
            Type::DATE => decode!(Value::Date, Date),
            Type::TIME => decode!(Value::Time, Time),
            Type::TIMESTAMP => decode!(Value::Timestamp, PrimitiveDateTime),
            Type::TIMESTAMPTZ => decode!(Value::TimestampWithTimezone, OffsetDateTime),
            Type::UUID => decode!(Value::Uuid, Uuid),
            Type::JSON | Type::JSONB => Value::Json(match raw {
                Some(raw) => Some(self.decode_json(ty, raw)?),
                None => None,
            }),
            _ => match ty.kind() {
                Kind::Enum(..) => Value::Varchar(match raw {
                    Some(raw) => Some(<&str as FromSql>::from_sql(ty, raw).map_err(error)?.into()),
                    None => None,
                }),
                Kind::Array(member) => Value::List(
                    match raw {
                        Some(raw) => Some(
                            Vec::<PostgresData>::from_sql(ty, raw)
                                .map_err(error)?
                                .iter()
                                .map(|v| self.decode_value(v))
                                .collect::<Result<_>>()?,
                        ),
                        None => None,
                    },
                    Box::new(postgres_type_to_value(member)),
                ),
                Kind::Domain(inner) => self.decode_value(&PostgresData {
                    ty: inner.clone(),
                    value: data.value.clone(),
                })?,
                _ => {
                    return Err(Error::decode(
                        ty.name().to_string(),
                        format!("type `{}` is not supported", ty),
                    ));
                }
            },
        })
    }

    fn decode_json(&self, ty: &Type, raw: &[u8]) -> Result<serde_json::Value> {
        let raw = if *ty == Type::JSONB {
            match raw.split_first() {
                Some((1, rest)) => rest,
                _ => {
                    return Err(Error::decode(
                        ty.name().to_string(),
                        "unsupported JSONB version",
                    ));
                }
            }
        } else {
            raw
        };
        self.json
            .decode(raw)
            .map_err(|e| Error::decode(ty.name().to_string(), e))
    }
}
