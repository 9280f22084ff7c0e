//! deviceapps-python
//!
//! Python bindings for deviceapps-core (PyO3). Builds the `pb` extension module.

use pyo3::prelude::*;

mod ffi;
mod marshal;

/// Python module entry point
#[pymodule]
fn pb(m: &Bound<'_, PyModule>) -> PyResult<()> {
    ffi::register(m)?;
    Ok(())
}
