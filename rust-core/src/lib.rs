//! FIR Tuner - Windowed-Sinc Filter Design Core
//!
//! Designs lowpass, highpass and bandpass FIR filters from a handful of
//! parameters and evaluates their magnitude response. UI-free; any front end
//! reads the coefficient and spectrum series after a recompute.

// Suppress PyO3 non-local impl warnings (harmless macro-generated code)
#![cfg_attr(feature = "python", allow(non_local_definitions))]

pub mod error;
pub mod filters;
pub mod spectrum;
pub mod tuner;

#[cfg(feature = "python")]
pub mod python_bindings;

pub use error::{Result, TunerError};
pub use filters::{CoefficientSeries, FilterType, WindowType};
pub use spectrum::{SpectrumAnalyzer, SpectrumSeries};
pub use tuner::{design, Design, DesignParameters, TunerState};
