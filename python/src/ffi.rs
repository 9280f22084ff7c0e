//! `pb` module functions.
//!
//! `deviceapps_xwrite_pb(iterable, path) -> int`
//! `deviceapps_xread_pb(path) -> iterator of dicts`

use std::fs::File;
use std::path::PathBuf;

use deviceapps_core::api::ApiConfig;
use deviceapps_core::container::{ContainerReader, ContainerWriter, Records};
use deviceapps_core::headers::HeaderError;
use deviceapps_core::types::StreamError;
use pyo3::create_exception;
use pyo3::exceptions::{PyOSError, PyTypeError, PyValueError};
use pyo3::prelude::*;

use crate::marshal::{record_from_py, record_to_py};

create_exception!(pb, TruncatedStreamError, PyOSError, "Container ended inside a frame.");
create_exception!(pb, DecodingError, PyOSError, "Frame payload is not a valid record.");

/// Map core errors onto the Python exception hierarchy.
pub(crate) fn to_py_err(err: StreamError) -> PyErr {
    let msg = err.to_string();
    match err {
        StreamError::Schema(_) => PyTypeError::new_err(msg),
        StreamError::Header(HeaderError::PayloadTooLarge { .. }) => PyValueError::new_err(msg),
        StreamError::Compression(_) => PyValueError::new_err(msg),
        StreamError::Truncated { .. } | StreamError::Header(HeaderError::BufferTooShort { .. }) => {
            TruncatedStreamError::new_err(msg)
        }
        StreamError::Decoding(_) | StreamError::Header(HeaderError::InvalidMagic { .. }) => {
            DecodingError::new_err(msg)
        }
        StreamError::Io(e) => PyOSError::new_err(e.to_string()),
    }
}

/// Write serialized protobuf to file from iterator
#[pyfunction]
fn deviceapps_xwrite_pb(records: &Bound<'_, PyAny>, path: PathBuf) -> PyResult<u64> {
    let iterator = records
        .iter()
        .map_err(|_| PyTypeError::new_err("First parameter should be Iterable"))?;

    let config = ApiConfig::default();
    // Dropped on every early return below, which closes the gzip stream.
    let mut writer = ContainerWriter::create(&path, &config).map_err(to_py_err)?;

    for item in iterator {
        let record = record_from_py(&item?)?;
        writer.write_record(&record).map_err(to_py_err)?;
    }

    let (_, counters) = writer.finish().map_err(to_py_err)?;
    Ok(counters.bytes_logical())
}

/// Lazy iterator returned by `deviceapps_xread_pb`.
#[pyclass(module = "pb")]
struct RecordIterator {
    records: Records<File>,
}

#[pymethods]
impl RecordIterator {
    fn __iter__(slf: PyRef<'_, Self>) -> PyRef<'_, Self> {
        slf
    }

    fn __next__(mut slf: PyRefMut<'_, Self>, py: Python<'_>) -> PyResult<Option<PyObject>> {
        match slf.records.next() {
            None => Ok(None),
            Some(Ok(record)) => record_to_py(py, &record).map(Some),
            Some(Err(e)) => Err(to_py_err(e)),
        }
    }
}

/// Deserialize protobuf from file, return iterator
#[pyfunction]
fn deviceapps_xread_pb(path: PathBuf) -> PyResult<RecordIterator> {
    let reader = ContainerReader::open(&path, &ApiConfig::default()).map_err(to_py_err)?;
    Ok(RecordIterator { records: reader.records() })
}

pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    let py = m.py();
    m.add_function(wrap_pyfunction!(deviceapps_xwrite_pb, m)?)?;
    m.add_function(wrap_pyfunction!(deviceapps_xread_pb, m)?)?;
    m.add_class::<RecordIterator>()?;
    m.add("TruncatedStreamError", py.get_type_bound::<TruncatedStreamError>())?;
    m.add("DecodingError", py.get_type_bound::<DecodingError>())?;
    Ok(())
}
