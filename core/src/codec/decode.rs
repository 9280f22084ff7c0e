//! codec/decode.rs
//!
//! Protobuf decoding and conversion back to record descriptions.

use prost::Message;
use serde_json::{Map, Value};

use crate::codec::types::{CodecError, DeviceApps};

/// Decode one payload. Malformed or truncated bytes fail with `CodecError::Decode`.
pub fn decode_record(payload: &[u8]) -> Result<DeviceApps, CodecError> {
    Ok(DeviceApps::decode(payload)?)
}

impl DeviceApps {
    /// Build the loosely-typed description of this record.
    ///
    /// Absent `device`, `lat`, `lon` and device fields are omitted, while `apps`
    /// is always emitted, possibly empty. Non-finite coordinates become `null`.
    pub fn to_description(&self) -> Value {
        let mut out = Map::new();

        if let Some(device) = &self.device {
            let mut fields = Map::new();
            if let Some(id) = &device.id {
                fields.insert("id".into(), Value::from(id.as_str()));
            }
            if let Some(kind) = &device.r#type {
                fields.insert("type".into(), Value::from(kind.as_str()));
            }
            out.insert("device".into(), Value::Object(fields));
        }

        out.insert("apps".into(), self.apps.iter().copied().map(Value::from).collect());

        if let Some(lat) = self.lat {
            out.insert("lat".into(), Value::from(lat));
        }
        if let Some(lon) = self.lon {
            out.insert("lon".into(), Value::from(lon));
        }

        Value::Object(out)
    }
}
