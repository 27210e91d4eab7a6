//! Windowed-sinc FIR filter design

pub mod windows;
pub mod design;
pub mod coefficients;

pub use windows::{WindowType, generate_window, apply_window};
pub use design::{FilterType, lpf, hpf, bpf, synthesize};
pub use coefficients::CoefficientSeries;
