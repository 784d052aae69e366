use crate::{Error, Result, Value};
use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use serde::{Serialize, de::DeserializeOwned};
use std::{any, borrow::Cow};
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};
use uuid::Uuid;

/// Conversion between native Rust types and the dynamically typed [`Value`].
///
/// Numeric conversions accept every integer width and check the range before
/// narrowing, so an `INT8` column can be read as `i32` as long as the value fits.
///
/// ```rust
/// use fluent_core::{AsValue, Value};
/// let v = 42i32.as_value();
/// assert!(matches!(v, Value::Int32(Some(42))));
/// let n: i64 = AsValue::try_from_value(v).unwrap();
/// assert_eq!(n, 42);
/// ```
pub trait AsValue {
    /// The typed NULL of this type.
    fn as_empty_value() -> Value;
    fn as_value(self) -> Value;
    /// Like [`AsValue::as_value`] but fails instead of degrading to NULL.
    fn try_as_value(self) -> Result<Value>
    where
        Self: Sized,
    {
        Ok(self.as_value())
    }
    fn try_from_value(value: Value) -> Result<Self>
    where
        Self: Sized;
}

impl<T: AsValue> From<T> for Value {
    fn from(value: T) -> Self {
        value.as_value()
    }
}

impl From<&'static str> for Value {
    fn from(value: &'static str) -> Self {
        Value::Varchar(Some(value.into()))
    }
}

fn mismatch<T>(value: &Value) -> Error {
    Error::Conversion(format!(
        "Cannot convert {} `{}` to {}",
        value.type_name(),
        value,
        any::type_name::<T>()
    ))
}

macro_rules! integer_from {
    ($target:ty, $value:expr) => {{
        let v = $value;
        <$target>::try_from(v).map_err(|_| {
            Error::Conversion(format!(
                "Value {} is out of range for {}",
                v,
                any::type_name::<$target>()
            ))
        })
    }};
}

macro_rules! impl_as_value_integer {
    ($source:ty, $destination:path) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $destination(None)
            }
            fn as_value(self) -> Value {
                $destination(Some(self as _))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                match value {
                    Value::Int8(Some(v)) => integer_from!($source, v),
                    Value::Int16(Some(v)) => integer_from!($source, v),
                    Value::Int32(Some(v)) => integer_from!($source, v),
                    Value::Int64(Some(v)) => integer_from!($source, v),
                    Value::UInt32(Some(v)) => integer_from!($source, v),
                    Value::Decimal(Some(v)) if v.fract().is_zero() => v
                        .to_i64()
                        .ok_or_else(|| mismatch::<Self>(&value))
                        .and_then(|v| integer_from!($source, v)),
                    Value::Varchar(Some(ref v)) => v.trim().parse::<$source>().map_err(|e| {
                        Error::Conversion(format!(
                            "Cannot parse `{}` as {}: {}",
                            v,
                            any::type_name::<Self>(),
                            e
                        ))
                    }),
                    _ => Err(mismatch::<Self>(&value)),
                }
            }
        }
    };
}

impl_as_value_integer!(i8, Value::Int8);
impl_as_value_integer!(i16, Value::Int16);
impl_as_value_integer!(i32, Value::Int32);
impl_as_value_integer!(i64, Value::Int64);
impl_as_value_integer!(u32, Value::UInt32);

// Unsigned types without a native Postgres counterpart widen to the next signed type.
impl AsValue for u8 {
    fn as_empty_value() -> Value {
        Value::Int16(None)
    }
    fn as_value(self) -> Value {
        Value::Int16(Some(self as _))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        let v = i64::try_from_value(value)?;
        integer_from!(u8, v)
    }
}

impl AsValue for u16 {
    fn as_empty_value() -> Value {
        Value::Int32(None)
    }
    fn as_value(self) -> Value {
        Value::Int32(Some(self as _))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        let v = i64::try_from_value(value)?;
        integer_from!(u16, v)
    }
}

impl AsValue for u64 {
    fn as_empty_value() -> Value {
        Value::Int64(None)
    }
    fn as_value(self) -> Value {
        match i64::try_from(self) {
            Ok(v) => Value::Int64(Some(v)),
            Err(..) => Value::Decimal(Some(Decimal::from(self))),
        }
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Decimal(Some(v)) if v.fract().is_zero() => {
                v.to_u64().ok_or_else(|| mismatch::<Self>(&value))
            }
            _ => {
                let v = i64::try_from_value(value)?;
                integer_from!(u64, v)
            }
        }
    }
}

impl AsValue for bool {
    fn as_empty_value() -> Value {
        Value::Boolean(None)
    }
    fn as_value(self) -> Value {
        Value::Boolean(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Boolean(Some(v)) => Ok(v),
            Value::Int8(Some(v)) => Ok(v != 0),
            Value::Int16(Some(v)) => Ok(v != 0),
            Value::Int32(Some(v)) => Ok(v != 0),
            Value::Int64(Some(v)) => Ok(v != 0),
            Value::Varchar(Some(ref v)) => match v.as_str() {
                "t" | "true" | "TRUE" => Ok(true),
                "f" | "false" | "FALSE" => Ok(false),
                _ => Err(mismatch::<Self>(&value)),
            },
            _ => Err(mismatch::<Self>(&value)),
        }
    }
}

impl AsValue for f32 {
    fn as_empty_value() -> Value {
        Value::Float32(None)
    }
    fn as_value(self) -> Value {
        Value::Float32(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Float32(Some(v)) => Ok(v),
            Value::Float64(Some(v)) if v.is_nan() || v.is_infinite() => Ok(v as _),
            Value::Float64(Some(v)) if v.abs() <= f32::MAX as f64 => Ok(v as _),
            Value::Int8(Some(v)) => Ok(v as _),
            Value::Int16(Some(v)) => Ok(v as _),
            Value::Decimal(Some(v)) => v.to_f32().ok_or_else(|| mismatch::<Self>(&value)),
            _ => Err(mismatch::<Self>(&value)),
        }
    }
}

impl AsValue for f64 {
    fn as_empty_value() -> Value {
        Value::Float64(None)
    }
    fn as_value(self) -> Value {
        Value::Float64(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Float64(Some(v)) => Ok(v),
            Value::Float32(Some(v)) => Ok(v as _),
            Value::Int8(Some(v)) => Ok(v as _),
            Value::Int16(Some(v)) => Ok(v as _),
            Value::Int32(Some(v)) => Ok(v as _),
            Value::UInt32(Some(v)) => Ok(v as _),
            Value::Decimal(Some(v)) => v.to_f64().ok_or_else(|| mismatch::<Self>(&value)),
            _ => Err(mismatch::<Self>(&value)),
        }
    }
}

impl AsValue for Decimal {
    fn as_empty_value() -> Value {
        Value::Decimal(None)
    }
    fn as_value(self) -> Value {
        Value::Decimal(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Decimal(Some(v)) => Ok(v),
            Value::Int8(Some(v)) => Ok(Decimal::from(v)),
            Value::Int16(Some(v)) => Ok(Decimal::from(v)),
            Value::Int32(Some(v)) => Ok(Decimal::from(v)),
            Value::Int64(Some(v)) => Ok(Decimal::from(v)),
            Value::UInt32(Some(v)) => Ok(Decimal::from(v)),
            Value::Float32(Some(v)) => {
                Decimal::from_f32(v).ok_or_else(|| mismatch::<Self>(&value))
            }
            Value::Float64(Some(v)) => {
                Decimal::from_f64(v).ok_or_else(|| mismatch::<Self>(&value))
            }
            Value::Varchar(Some(ref v)) => v.trim().parse().map_err(|_| mismatch::<Self>(&value)),
            _ => Err(mismatch::<Self>(&value)),
        }
    }
}

impl AsValue for String {
    fn as_empty_value() -> Value {
        Value::Varchar(None)
    }
    fn as_value(self) -> Value {
        Value::Varchar(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Varchar(Some(v)) => Ok(v),
            Value::Json(Some(serde_json::Value::String(v))) => Ok(v),
            Value::Uuid(Some(v)) => Ok(v.to_string()),
            _ => Err(mismatch::<Self>(&value)),
        }
    }
}

impl<'a> AsValue for Cow<'a, str> {
    fn as_empty_value() -> Value {
        Value::Varchar(None)
    }
    fn as_value(self) -> Value {
        Value::Varchar(Some(self.into_owned()))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        String::try_from_value(value).map(Cow::Owned)
    }
}

impl AsValue for Box<[u8]> {
    fn as_empty_value() -> Value {
        Value::Blob(None)
    }
    fn as_value(self) -> Value {
        Value::Blob(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Blob(Some(v)) => Ok(v),
            Value::Varchar(Some(v)) => Ok(v.into_bytes().into_boxed_slice()),
            _ => Err(mismatch::<Self>(&value)),
        }
    }
}

macro_rules! impl_as_value_simple {
    ($source:ty, $destination:path $(, $pat_rest:pat => $expr_rest:expr)* $(,)?) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $destination(None)
            }
            fn as_value(self) -> Value {
                $destination(Some(self))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                match value {
                    $destination(Some(v)) => Ok(v),
                    $($pat_rest => $expr_rest,)*
                    #[allow(unreachable_patterns)]
                    _ => Err(mismatch::<Self>(&value)),
                }
            }
        }
    };
}

impl_as_value_simple!(Date, Value::Date,
    Value::Timestamp(Some(v)) => Ok(v.date()),
);
impl_as_value_simple!(Time, Value::Time);
impl_as_value_simple!(PrimitiveDateTime, Value::Timestamp,
    Value::TimestampWithTimezone(Some(v)) => {
        let v = v.to_utc();
        Ok(PrimitiveDateTime::new(v.date(), v.time()))
    },
);
impl_as_value_simple!(OffsetDateTime, Value::TimestampWithTimezone,
    Value::Timestamp(Some(v)) => Ok(v.assume_utc()),
);
impl_as_value_simple!(Uuid, Value::Uuid,
    Value::Varchar(Some(ref v)) => Uuid::parse_str(v).map_err(|e| Error::decode("uuid::Uuid", e)),
);
impl_as_value_simple!(serde_json::Value, Value::Json,
    Value::Varchar(Some(ref v)) => serde_json::from_str(v).map_err(|e| Error::decode("serde_json::Value", e)),
);

impl<T: AsValue> AsValue for Option<T> {
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Value {
        match self {
            Some(v) => v.as_value(),
            None => T::as_empty_value(),
        }
    }
    fn try_as_value(self) -> Result<Value> {
        match self {
            Some(v) => v.try_as_value(),
            None => Ok(T::as_empty_value()),
        }
    }
    fn try_from_value(value: Value) -> Result<Self> {
        Ok(if value.is_null() {
            None
        } else {
            Some(<T as AsValue>::try_from_value(value)?)
        })
    }
}

impl<T: AsValue> AsValue for Vec<T> {
    fn as_empty_value() -> Value {
        Value::List(None, Box::new(T::as_empty_value()))
    }
    fn as_value(self) -> Value {
        Value::List(
            Some(self.into_iter().map(AsValue::as_value).collect()),
            Box::new(T::as_empty_value()),
        )
    }
    fn try_as_value(self) -> Result<Value> {
        Ok(Value::List(
            Some(
                self.into_iter()
                    .map(AsValue::try_as_value)
                    .collect::<Result<_>>()?,
            ),
            Box::new(T::as_empty_value()),
        ))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::List(Some(v), ..) => v.into_iter().map(T::try_from_value).collect(),
            Value::Json(Some(serde_json::Value::Array(v))) => v
                .into_iter()
                .map(|v| T::try_from_value(Value::Json(Some(v))))
                .collect(),
            _ => Err(mismatch::<Self>(&value)),
        }
    }
}

/// Wrapper storing any serde type as a JSON document.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Json<T>(pub T);

impl<T: Serialize + DeserializeOwned> AsValue for Json<T> {
    fn as_empty_value() -> Value {
        Value::Json(None)
    }
    fn as_value(self) -> Value {
        match serde_json::to_value(&self.0) {
            Ok(v) => Value::Json(Some(v)),
            Err(e) => {
                log::error!(
                    "Could not serialize {} as JSON: {e}",
                    any::type_name::<T>()
                );
                Value::Json(None)
            }
        }
    }
    fn try_as_value(self) -> Result<Value> {
        serde_json::to_value(&self.0)
            .map(|v| Value::Json(Some(v)))
            .map_err(|e| Error::encode(any::type_name::<T>(), e))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        let json = match value {
            Value::Json(Some(v)) => v,
            Value::Varchar(Some(ref v)) => serde_json::from_str(v)
                .map_err(|e| Error::decode(any::type_name::<T>(), e))?,
            _ => return Err(mismatch::<Self>(&value)),
        };
        serde_json::from_value(json)
            .map(Json)
            .map_err(|e| Error::decode(any::type_name::<T>(), e))
    }
}
