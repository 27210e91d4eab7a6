//! Owned coefficient series produced by a design pass

use serde::Serialize;
use std::fmt;

/// Filter taps h[0..N-1], centred on tap N/2
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CoefficientSeries {
    taps: Vec<f64>,
}

impl CoefficientSeries {
    pub fn new(taps: Vec<f64>) -> Self {
        Self { taps }
    }

    /// Get filter coefficients
    pub fn as_slice(&self) -> &[f64] {
        &self.taps
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.taps
    }

    /// Get filter length
    pub fn len(&self) -> usize {
        self.taps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }

    /// Sample index axis 0..N-1 for plotting against
    pub fn indices(&self) -> Vec<usize> {
        (0..self.taps.len()).collect()
    }

    pub fn center_index(&self) -> usize {
        self.taps.len() / 2
    }

    /// Get group delay in samples
    pub fn group_delay_samples(&self) -> f64 {
        (self.taps.len() / 2) as f64
    }
}

impl std::ops::Index<usize> for CoefficientSeries {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.taps[index]
    }
}

/// One line per tap: `[  12]: +0.0001234567`
impl fmt::Display for CoefficientSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (k, h) in self.taps.iter().enumerate() {
            writeln!(f, "[{:4}]: {:+.10}", k, h)?;
        }
        Ok(())
    }
}
