use serde::{Deserialize, Serialize};

use crate::constants::{FAST_SYNAPSE, FEEDBACK_SYNAPSE, RADIUS};
use crate::synapse::Lowpass;
use crate::vector::SemanticPointer;

/// A vector-valued channel: low-pass dynamics, optional self-feedback, and a
/// norm clamp standing in for the limited range a neural population can
/// represent.
///
/// Each step drives the synapse toward `feedback · x + input_weight · u`.
/// With feedback the channel integrates: it keeps part of its past, rises
/// gradually under constant input, and decays slowly once input stops.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChannelState {
    pub feedback: f64,
    pub input_weight: f64,
    pub radius: f64,
    synapse: Lowpass,
}

impl ChannelState {
    pub fn new(dimensions: usize, tau: f64, feedback: f64, input_weight: f64) -> Self {
        Self {
            feedback,
            input_weight,
            radius: RADIUS,
            synapse: Lowpass::new(tau, dimensions),
        }
    }

    /// Memoryless channel: output follows input after a short synaptic lag.
    pub fn feed_forward(dimensions: usize) -> Self {
        Self::new(dimensions, FAST_SYNAPSE, 0.0, 1.0)
    }

    /// Leaky integrator with the given feedback and input weights.
    pub fn recurrent(dimensions: usize, feedback: f64, input_weight: f64) -> Self {
        Self::new(dimensions, FEEDBACK_SYNAPSE, feedback, input_weight)
    }

    pub fn with_tau(mut self, tau: f64) -> Self {
        self.synapse.tau = tau;
        self
    }

    pub fn step(&mut self, input: &SemanticPointer, dt: f64) -> &SemanticPointer {
        let drive = &(self.synapse.output() * self.feedback) + &(input * self.input_weight);
        let a = self.synapse.retention(dt);
        let next = (&(self.synapse.output() * a) + &(&drive * (1.0 - a))).clamp_norm(self.radius);
        self.synapse.set(next);
        self.synapse.output()
    }

    pub fn output(&self) -> &SemanticPointer {
        self.synapse.output()
    }

    pub fn reset(&mut self) {
        self.synapse.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn e0(d: usize) -> SemanticPointer {
        SemanticPointer::identity(d)
    }

    #[test]
    fn test_feed_forward_tracks_input() {
        let mut ch = ChannelState::feed_forward(4);
        for _ in 0..100 {
            ch.step(&(&e0(4) * 0.6), 0.001);
        }
        assert_abs_diff_eq!(ch.output().as_slice()[0], 0.6, epsilon = 1e-6);

        // No memory: removing input lets it fall back quickly.
        for _ in 0..100 {
            ch.step(&SemanticPointer::zeros(4), 0.001);
        }
        assert!(ch.output().norm() < 1e-6);
    }

    #[test]
    fn test_recurrent_accumulates_monotonically_to_radius() {
        let mut ch = ChannelState::recurrent(8, 0.5, 1.0);
        let target = e0(8);
        let mut prev = 0.0;
        for _ in 0..1000 {
            ch.step(&(&target * 0.8), 0.001);
            let sim = ch.output().dot(&target);
            assert!(sim >= prev - 1e-12, "similarity dropped: {prev} -> {sim}");
            assert!(sim <= 1.0 + 1e-12, "similarity exceeded 1: {sim}");
            prev = sim;
        }
        assert!(prev > 0.99, "did not approach 1: {prev}");
    }

    #[test]
    fn test_recurrent_rises_slower_than_feed_forward() {
        let mut ff = ChannelState::feed_forward(4);
        let mut rec = ChannelState::recurrent(4, 0.5, 1.0);
        for _ in 0..20 {
            ff.step(&e0(4), 0.001);
            rec.step(&e0(4), 0.001);
        }
        assert!(ff.output().dot(&e0(4)) > rec.output().dot(&e0(4)));
    }

    #[test]
    fn test_recurrent_holds_through_blank() {
        let mut ff = ChannelState::feed_forward(4);
        let mut rec = ChannelState::recurrent(4, 0.5, 1.0);
        for _ in 0..300 {
            ff.step(&e0(4), 0.001);
            rec.step(&e0(4), 0.001);
        }
        for _ in 0..50 {
            ff.step(&SemanticPointer::zeros(4), 0.001);
            rec.step(&SemanticPointer::zeros(4), 0.001);
        }
        assert!(ff.output().norm() < 0.01);
        assert!(rec.output().norm() > 0.7);
    }

    #[test]
    fn test_steady_state_without_clamp() {
        // Below the radius, the fixed point is w·u / (1 − f).
        let mut ch = ChannelState::recurrent(2, 0.5, 1.0);
        let u = &e0(2) * 0.2;
        for _ in 0..5000 {
            ch.step(&u, 0.001);
        }
        assert_abs_diff_eq!(ch.output().as_slice()[0], 0.4, epsilon = 1e-6);
    }
}
