//! PyO3 bindings for Python integration

use pyo3::prelude::*;

mod tuner_bindings;

/// Python module definition
#[pymodule]
fn fir_tuner(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<tuner_bindings::PyFirTuner>()?;

    Ok(())
}
