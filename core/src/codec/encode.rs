//! codec/encode.rs
//!
//! Validation of loosely-typed record descriptions and protobuf encoding.
//!
//! Field rules:
//! - `device` must be an object; `device.id` / `device.type` must be strings.
//! - `lat` / `lon` accept any number and are stored as f64.
//! - `apps` must be an array of integers, each truncated to u32.
//! - Unknown keys are ignored. Checks run in field order: device, lat, lon, apps.
//!
//! `from_fields` is the same validation for callers that pick the fields out
//! themselves and carry coordinates as raw `f64`.

use prost::Message;
use serde_json::{Map, Number, Value};

use crate::codec::types::{CodecError, Device, DeviceApps};

/// A coordinate as found in a dynamic record source.
///
/// `Number` carries any f64, NaN and infinities included.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coordinate {
    Absent,
    Number(f64),
    Invalid,
}

impl Coordinate {
    fn from_description(raw: Option<&Value>) -> Self {
        match raw {
            None => Coordinate::Absent,
            Some(Value::Number(n)) => n.as_f64().map_or(Coordinate::Invalid, Coordinate::Number),
            Some(_) => Coordinate::Invalid,
        }
    }

    fn resolve(self, mismatch: &'static str) -> Result<Option<f64>, CodecError> {
        match self {
            Coordinate::Absent => Ok(None),
            Coordinate::Number(v) => Ok(Some(v)),
            Coordinate::Invalid => Err(CodecError::TypeMismatch(mismatch)),
        }
    }
}

impl DeviceApps {
    /// Validate a record description and build the typed message.
    pub fn from_description(value: &Value) -> Result<Self, CodecError> {
        let item = value.as_object().ok_or(CodecError::NotARecord)?;

        Self::from_fields(
            item.get("device"),
            Coordinate::from_description(item.get("lat")),
            Coordinate::from_description(item.get("lon")),
            item.get("apps"),
        )
    }

    /// Validate the known fields of a record, already picked out of their container.
    ///
    /// Used by sources that cannot express every f64 as a `Value` (NaN, inf).
    pub fn from_fields(
        device: Option<&Value>,
        lat: Coordinate,
        lon: Coordinate,
        apps: Option<&Value>,
    ) -> Result<Self, CodecError> {
        let device = device.map(device_from_description).transpose()?;
        let lat = lat.resolve("lat must be a number")?;
        let lon = lon.resolve("lon must be a number")?;
        let apps = match apps {
            Some(raw) => apps_from_description(raw)?,
            None => Vec::new(),
        };

        Ok(Self { device, apps, lat, lon })
    }
}

fn device_from_description(raw: &Value) -> Result<Device, CodecError> {
    let fields = raw
        .as_object()
        .ok_or(CodecError::TypeMismatch("device should be a dictionary"))?;

    Ok(Device {
        id: string_field(fields, "id", "device.id must be a string")?,
        r#type: string_field(fields, "type", "device.type must be a string")?,
    })
}

fn string_field(
    fields: &Map<String, Value>,
    key: &str,
    mismatch: &'static str,
) -> Result<Option<String>, CodecError> {
    match fields.get(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(CodecError::TypeMismatch(mismatch)),
    }
}

fn apps_from_description(raw: &Value) -> Result<Vec<u32>, CodecError> {
    let items = raw
        .as_array()
        .ok_or(CodecError::TypeMismatch("apps should be a list"))?;

    items
        .iter()
        .map(|item| {
            item.as_number()
                .and_then(truncate_to_u32)
                .ok_or(CodecError::TypeMismatch("apps item should be an integer"))
        })
        .collect()
}

/// Integers wrap into u32 like a C cast; floats are rejected.
fn truncate_to_u32(n: &Number) -> Option<u32> {
    n.as_i64()
        .map(|v| v as u32)
        .or_else(|| n.as_u64().map(|v| v as u32))
}

/// Minimal protobuf encoding of the fields that are present.
pub fn encode_record(record: &DeviceApps) -> Vec<u8> {
    record.encode_to_vec()
}

/// Validate + encode in one step.
pub fn encode_description(value: &Value) -> Result<Vec<u8>, CodecError> {
    let record = DeviceApps::from_description(value)?;
    Ok(encode_record(&record))
}
