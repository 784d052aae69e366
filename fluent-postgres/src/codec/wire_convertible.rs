use crate::{PostgresData, PostgresDataDecoder, PostgresDataEncoder};
use fluent_core::{AsValue, Json, Result};
use rust_decimal::Decimal;
use serde::{Serialize, de::DeserializeOwned};
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};
use uuid::Uuid;

/// Type that can be written to and read from a PostgreSQL column.
///
/// Implemented for every supported primitive, for `Option` and `Vec` of them and,
/// through [`Json`], for anything serde can handle.
pub trait WireConvertible: Sized {
    fn encode(self, encoder: &PostgresDataEncoder) -> Result<PostgresData>;
    fn decode(data: &PostgresData, decoder: &PostgresDataDecoder) -> Result<Self>;
}

macro_rules! impl_wire_convertible {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl WireConvertible for $ty {
                fn encode(self, encoder: &PostgresDataEncoder) -> Result<PostgresData> {
                    encoder.encode(&self.as_value())
                }
                fn decode(data: &PostgresData, decoder: &PostgresDataDecoder) -> Result<Self> {
                    <$ty as AsValue>::try_from_value(decoder.decode_value(data)?)
                }
            }
        )+
    };
}

impl_wire_convertible!(
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    u64,
    f32,
    f64,
    Decimal,
    String,
    Box<[u8]>,
    Date,
    Time,
    PrimitiveDateTime,
    OffsetDateTime,
    Uuid,
    serde_json::Value,
);

impl<T: WireConvertible + AsValue> WireConvertible for Option<T> {
    fn encode(self, encoder: &PostgresDataEncoder) -> Result<PostgresData> {
        match self {
            Some(v) => v.encode(encoder),
            None => encoder.encode(&T::as_empty_value()),
        }
    }

    fn decode(data: &PostgresData, decoder: &PostgresDataDecoder) -> Result<Self> {
        if data.is_null() {
            return Ok(None);
        }
        T::decode(data, decoder).map(Some)
    }
}

impl<T: WireConvertible + AsValue> WireConvertible for Vec<T> {
    fn encode(self, encoder: &PostgresDataEncoder) -> Result<PostgresData> {
        encoder.encode(&self.try_as_value()?)
    }

    fn decode(data: &PostgresData, decoder: &PostgresDataDecoder) -> Result<Self> {
        <Self as AsValue>::try_from_value(decoder.decode_value(data)?)
    }
}

impl<T: Serialize + DeserializeOwned> WireConvertible for Json<T> {
    fn encode(self, encoder: &PostgresDataEncoder) -> Result<PostgresData> {
        encoder.encode(&self.try_as_value()?)
    }

    fn decode(data: &PostgresData, decoder: &PostgresDataDecoder) -> Result<Self> {
        <Self as AsValue>::try_from_value(decoder.decode_value(data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fluent_core::Error;
    use postgres_types::Type;
    use std::collections::HashMap;

    #[test]
    fn primitives() {
        let encoder = PostgresDataEncoder::default();
        let decoder = PostgresDataDecoder::default();
        let data = 42i32.encode(&encoder).unwrap();
        assert_eq!(data.ty, Type::INT4);
        assert_eq!(i32::decode(&data, &decoder).unwrap(), 42);
        assert_eq!(i64::decode(&data, &decoder).unwrap(), 42);

        let data = "earth".to_string().encode(&encoder).unwrap();
        assert_eq!(data.ty, Type::TEXT);
        assert_eq!(String::decode(&data, &decoder).unwrap(), "earth");
    }

    #[test]
    fn optional() {
        let encoder = PostgresDataEncoder::default();
        let decoder = PostgresDataDecoder::default();
        let data = None::<i16>.encode(&encoder).unwrap();
        assert_eq!(data.ty, Type::INT2);
        assert!(data.is_null());
        assert_eq!(Option::<i16>::decode(&data, &decoder).unwrap(), None);
        assert!(i16::decode(&data, &decoder).is_err());
    }

    #[test]
    fn json_fallback() {
        #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
        struct Orbit {
            period: f64,
            moons: Vec<String>,
        }
        let encoder = PostgresDataEncoder::default();
        let decoder = PostgresDataDecoder::default();
        let orbit = Orbit {
            period: 365.25,
            moons: vec!["Moon".into()],
        };
        let data = Json(orbit).encode(&encoder).unwrap();
        assert_eq!(data.ty, Type::JSONB);
        let Json(decoded) = Json::<Orbit>::decode(&data, &decoder).unwrap();
        assert_eq!(decoded.moons, ["Moon"]);
        assert_eq!(decoded.period, 365.25);
    }

    #[test]
    fn json_unserializable() {
        let encoder = PostgresDataEncoder::default();
        let distances = HashMap::from([((3, 4), 5)]);
        let error = Json(distances).encode(&encoder).unwrap_err();
        assert!(matches!(error, Error::Encode { .. }), "{error}");
        let error = vec![Json(HashMap::from([((1, 2), 3)]))]
            .encode(&encoder)
            .unwrap_err();
        assert!(error.to_string().contains("HashMap"), "{error}");
    }
}
