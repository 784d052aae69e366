use std::fmt::Debug;

/// Turns JSON documents into the bytes sent for `JSON`/`JSONB` values.
pub trait JsonEncoder: Debug + Send + Sync {
    fn encode(&self, value: &serde_json::Value) -> anyhow::Result<Vec<u8>>;
}

/// Parses the bytes of `JSON`/`JSONB` columns.
pub trait JsonDecoder: Debug + Send + Sync {
    fn decode(&self, value: &[u8]) -> anyhow::Result<serde_json::Value>;
}

#[derive(Default, Debug, Clone, Copy)]
pub struct SerdeJsonEncoder;

impl JsonEncoder for SerdeJsonEncoder {
    fn encode(&self, value: &serde_json::Value) -> anyhow::Result<Vec<u8>> {
        Ok(serde_json::to_vec(value)?)
    }
}

#[derive(Default, Debug, Clone, Copy)]
pub struct SerdeJsonDecoder;

impl JsonDecoder for SerdeJsonDecoder {
    fn decode(&self, value: &[u8]) -> anyhow::Result<serde_json::Value> {
        Ok(serde_json::from_slice(value)?)
    }
}
