//! Python objects <-> core record types.
//!
//! Inbound, only the keys a record can carry are looked at: `device` (and its
//! `id` / `type`), `lat`, `lon`, `apps`. Anything else in the dict is never
//! touched. Coordinates travel as plain `f64` so NaN and infinities survive.
//! Outbound, decoded records are built straight into dicts.

use deviceapps_core::codec::{CodecError, Coordinate, DeviceApps};
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList, PyLong, PyString, PyTuple};
use serde_json::{Map, Value};

use crate::ffi::to_py_err;

/// Validate one Python item and build the typed record.
///
/// Shape and type problems surface as the same exceptions the core maps them
/// to; errors raised by the item's own methods propagate unchanged.
pub fn record_from_py(obj: &Bound<'_, PyAny>) -> PyResult<DeviceApps> {
    let Ok(item) = obj.downcast::<PyDict>() else {
        return Err(to_py_err(CodecError::NotARecord.into()));
    };

    let device = item.get_item("device")?.map(|raw| device_value(&raw)).transpose()?;
    let lat = coordinate(item.get_item("lat")?.as_ref());
    let lon = coordinate(item.get_item("lon")?.as_ref());
    let apps = item.get_item("apps")?.map(|raw| apps_value(&raw));

    DeviceApps::from_fields(device.as_ref(), lat, lon, apps.as_ref()).map_err(|e| to_py_err(e.into()))
}

// Anything that is not a dict becomes `null`, which the core rejects.
fn device_value(raw: &Bound<'_, PyAny>) -> PyResult<Value> {
    let Ok(fields) = raw.downcast::<PyDict>() else {
        return Ok(Value::Null);
    };

    let mut out = Map::new();
    for key in ["id", "type"] {
        if let Some(value) = fields.get_item(key)? {
            out.insert(key.to_owned(), text_value(&value)?);
        }
    }
    Ok(Value::Object(out))
}

fn text_value(raw: &Bound<'_, PyAny>) -> PyResult<Value> {
    if raw.is_instance_of::<PyString>() {
        return Ok(Value::String(raw.extract::<String>()?));
    }
    Ok(Value::Null)
}

fn coordinate(raw: Option<&Bound<'_, PyAny>>) -> Coordinate {
    let Some(raw) = raw else {
        return Coordinate::Absent;
    };
    if raw.is_instance_of::<PyString>() {
        return Coordinate::Invalid;
    }
    // int, bool, float and anything with __float__
    raw.extract::<f64>().map_or(Coordinate::Invalid, Coordinate::Number)
}

fn apps_value(raw: &Bound<'_, PyAny>) -> Value {
    if let Ok(list) = raw.downcast::<PyList>() {
        return Value::Array(list.iter().map(|item| app_id(&item)).collect());
    }
    if let Ok(tuple) = raw.downcast::<PyTuple>() {
        return Value::Array(tuple.iter().map(|item| app_id(&item)).collect());
    }
    Value::Null
}

// bool is an int subclass, so True/False become 1/0. Ints wider than 64 bits
// and non-ints become `null` and fail the item check.
fn app_id(item: &Bound<'_, PyAny>) -> Value {
    if !item.is_instance_of::<PyLong>() {
        return Value::Null;
    }
    if let Ok(v) = item.extract::<i64>() {
        return Value::from(v);
    }
    item.extract::<u64>().map_or(Value::Null, Value::from)
}

/// Build the Python dict for a decoded record.
///
/// Mirrors `DeviceApps::to_description`: `apps` is always present, the rest
/// only when set.
pub fn record_to_py(py: Python<'_>, record: &DeviceApps) -> PyResult<PyObject> {
    let dict = PyDict::new_bound(py);

    if let Some(device) = &record.device {
        let fields = PyDict::new_bound(py);
        if let Some(id) = &device.id {
            fields.set_item("id", id)?;
        }
        if let Some(kind) = &device.r#type {
            fields.set_item("type", kind)?;
        }
        dict.set_item("device", fields)?;
    }

    dict.set_item("apps", PyList::new_bound(py, &record.apps))?;

    if let Some(lat) = record.lat {
        dict.set_item("lat", lat)?;
    }
    if let Some(lon) = record.lon {
        dict.set_item("lon", lon)?;
    }

    Ok(dict.into_any().unbind())
}
