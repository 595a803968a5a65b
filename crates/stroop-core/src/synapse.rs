use serde::{Deserialize, Serialize};

use crate::vector::SemanticPointer;

/// First-order low-pass synapse, `tau · dy/dt = x − y`.
///
/// Discretised with the exact zero-order-hold coefficient `exp(−dt/tau)`, so
/// the response does not depend on `dt` for piecewise-constant input.
/// `tau <= 0` passes input straight through.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Lowpass {
    pub tau: f64,
    output: SemanticPointer,
}

impl Lowpass {
    pub fn new(tau: f64, dimensions: usize) -> Self {
        Self {
            tau,
            output: SemanticPointer::zeros(dimensions),
        }
    }

    /// Fraction of the previous output retained after one step of `dt`.
    pub fn retention(&self, dt: f64) -> f64 {
        if self.tau <= 0.0 {
            0.0
        } else {
            (-dt / self.tau).exp()
        }
    }

    pub fn step(&mut self, input: &SemanticPointer, dt: f64) -> &SemanticPointer {
        let a = self.retention(dt);
        self.output = &(&self.output * a) + &(input * (1.0 - a));
        &self.output
    }

    pub fn output(&self) -> &SemanticPointer {
        &self.output
    }

    /// Overwrite the output, for channels that add their own dynamics on top.
    pub fn set(&mut self, value: SemanticPointer) {
        self.output = value;
    }

    pub fn reset(&mut self) {
        let d = self.output.dimensions();
        self.output = SemanticPointer::zeros(d);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(d: usize) -> SemanticPointer {
        SemanticPointer::identity(d)
    }

    #[test]
    fn test_step_response_time_constant() {
        let mut syn = Lowpass::new(0.3, 4);
        let dt = 0.001;
        for _ in 0..300 {
            syn.step(&unit(4), dt);
        }
        // After one tau the output reaches 1 - 1/e.
        let y = syn.output().as_slice()[0];
        assert!((y - (1.0 - (-1.0f64).exp())).abs() < 1e-9, "y = {y}");
    }

    #[test]
    fn test_response_independent_of_dt() {
        let mut fine = Lowpass::new(0.05, 2);
        let mut coarse = Lowpass::new(0.05, 2);
        for _ in 0..100 {
            fine.step(&unit(2), 0.001);
        }
        for _ in 0..10 {
            coarse.step(&unit(2), 0.01);
        }
        let a = fine.output().as_slice()[0];
        let b = coarse.output().as_slice()[0];
        assert!((a - b).abs() < 1e-9, "{a} vs {b}");
    }

    #[test]
    fn test_zero_tau_passthrough() {
        let mut syn = Lowpass::new(0.0, 3);
        let x = SemanticPointer::new(vec![0.2, -0.4, 0.9]);
        assert_eq!(syn.step(&x, 0.001), &x);
    }

    #[test]
    fn test_reset() {
        let mut syn = Lowpass::new(0.01, 2);
        syn.step(&unit(2), 0.001);
        syn.reset();
        assert_eq!(syn.output(), &SemanticPointer::zeros(2));
    }
}
