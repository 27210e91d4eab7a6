//! Python bindings for the tuner state

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use numpy::PyArray1;
use crate::error::TunerError;
use crate::tuner::{DesignParameters, TunerState};

impl From<TunerError> for PyErr {
    fn from(err: TunerError) -> Self {
        PyValueError::new_err(err.to_string())
    }
}

/// FIR tuner exposed to Python
#[pyclass(name = "FirTuner")]
pub struct PyFirTuner {
    state: TunerState,
}

#[pymethods]
impl PyFirTuner {
    /// Create a tuner and compute the initial design
    ///
    /// Args:
    ///     mode: "lowpass", "highpass" or "bandpass"
    ///     window: "blackman", "hamming" or "rectangular"
    ///     n: Tap count exponent (2^n taps)
    ///     fs: Sample rate in Hz
    ///     fp: Cutoff / half-bandwidth in Hz
    ///     fc: Bandpass centre frequency in Hz
    #[new]
    #[pyo3(signature = (mode="lowpass", window="blackman", n=7, fs=44100.0, fp=4000.0, fc=10000.0))]
    fn new(mode: &str, window: &str, n: u32, fs: f64, fp: f64, fc: f64) -> PyResult<Self> {
        let parameters = DesignParameters::new(
            mode.parse()?,
            window.parse()?,
            n,
            fs,
            fp,
            fc,
        )?;

        Ok(Self {
            state: TunerState::new(parameters)?,
        })
    }

    fn set_mode(&mut self, mode: &str) -> PyResult<()> {
        Ok(self.state.set_parameter("mode", mode)?)
    }

    fn set_window(&mut self, window: &str) -> PyResult<()> {
        Ok(self.state.set_parameter("window", window)?)
    }

    fn set_n(&mut self, n: u32) -> PyResult<()> {
        Ok(self.state.set_tap_count_exponent(n)?)
    }

    fn set_fs(&mut self, fs: f64) -> PyResult<()> {
        Ok(self.state.set_sample_rate(fs)?)
    }

    fn set_fp(&mut self, fp: f64) -> PyResult<()> {
        Ok(self.state.set_passband_freq(fp)?)
    }

    fn set_fc(&mut self, fc: f64) -> PyResult<()> {
        Ok(self.state.set_center_freq(fc)?)
    }

    /// Spectrum zero-padding factor (default 4)
    fn set_oversampling(&mut self, factor: usize) -> PyResult<()> {
        Ok(self.state.set_oversampling(factor)?)
    }

    /// Recompute coefficients and spectrum from current parameters
    fn calculate(&mut self) -> PyResult<()> {
        Ok(self.state.recompute()?)
    }

    /// Whether parameters changed since the last calculate()
    fn is_stale(&self) -> bool {
        self.state.is_stale()
    }

    /// Get filter coefficients
    fn coefficients<'py>(&self, py: Python<'py>) -> PyResult<&'py PyArray1<f64>> {
        let coeffs = self.state.coefficients().as_slice().to_vec();
        Ok(PyArray1::from_vec(py, coeffs))
    }

    /// Get tap index axis
    fn indices<'py>(&self, py: Python<'py>) -> PyResult<&'py PyArray1<i64>> {
        let indices: Vec<i64> = self.state.coefficients().indices().into_iter().map(|k| k as i64).collect();
        Ok(PyArray1::from_vec(py, indices))
    }

    /// Get frequency axis in kHz (0 to fs)
    fn frequencies<'py>(&self, py: Python<'py>) -> PyResult<&'py PyArray1<f64>> {
        let freqs = self.state.spectrum().frequencies_khz.clone();
        Ok(PyArray1::from_vec(py, freqs))
    }

    /// Get magnitude response in dB
    ///
    /// Args:
    ///     floor_db: Optional lower bound replacing -inf bins
    #[pyo3(signature = (floor_db=None))]
    fn magnitude<'py>(&self, py: Python<'py>, floor_db: Option<f64>) -> PyResult<&'py PyArray1<f64>> {
        let spectrum = self.state.spectrum();
        let mag = match floor_db {
            Some(floor) => spectrum.clamped_magnitude_db(floor),
            None => spectrum.magnitude_db.clone(),
        };
        Ok(PyArray1::from_vec(py, mag))
    }

    /// Print the coefficient listing to stdout
    fn print_coef(&self) {
        print!("{}", self.state.coefficient_listing());
    }

    /// Get group delay in samples
    fn group_delay(&self) -> f64 {
        self.state.coefficients().group_delay_samples()
    }
}
