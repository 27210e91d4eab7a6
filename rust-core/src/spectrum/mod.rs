//! Frequency response evaluation with FFT

pub mod fft;
pub mod analysis;

pub use fft::FftEngine;
pub use analysis::{
    AnalyzerConfig, SpectrumAnalyzer, SpectrumSeries, DEFAULT_OVERSAMPLING, MAX_FFT_SIZE,
    MAX_OVERSAMPLING,
};
