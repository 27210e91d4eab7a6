//! Parameter holder that drives synthesis and spectrum evaluation

pub mod params;
pub mod state;

pub use params::{DesignParameters, MAX_TAP_COUNT_EXPONENT};
pub use state::{design, synthesize_coefficients, Design, TunerState};
