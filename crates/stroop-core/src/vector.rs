use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::EPSILON;

/// Fixed-length real vector representing a symbol or a channel state.
///
/// Symbol vectors are unit length; channel states may have any norm up to the
/// channel's radius. `a * b` between two pointers is circular convolution,
/// the binding product used throughout the model.
///
/// Binary operations (`dot`, `convolve`, `+`, `-`, `+=`) require both operands
/// to have the same dimensionality and panic otherwise.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SemanticPointer {
    values: Vec<f64>,
}

impl PartialEq for SemanticPointer {
    fn eq(&self, other: &Self) -> bool {
        self.values.len() == other.values.len()
            && self
                .values
                .iter()
                .zip(&other.values)
                .all(|(a, b)| (a - b).abs() < EPSILON)
    }
}

impl SemanticPointer {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Zero vector of dimension `d`.
    pub fn zeros(d: usize) -> Self {
        Self {
            values: vec![0.0; d],
        }
    }

    /// Identity for circular convolution: [1, 0, 0, ...].
    pub fn identity(d: usize) -> Self {
        let mut values = vec![0.0; d];
        if d > 0 {
            values[0] = 1.0;
        }
        Self { values }
    }

    /// Random unit vector: i.i.d. Gaussian components, normalized.
    pub fn random(d: usize, rng: &mut impl Rng) -> Self {
        let values = (0..d).map(|_| gauss_random(rng)).collect();
        Self { values }.normalize()
    }

    pub fn dimensions(&self) -> usize {
        self.values.len()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.values.clone()
    }

    /// # Panics
    ///
    /// If the dimensions differ.
    pub fn dot(&self, other: &Self) -> f64 {
        self.check_dimensions(other);
        self.values
            .iter()
            .zip(&other.values)
            .map(|(a, b)| a * b)
            .sum()
    }

    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Normalize to unit length. Returns the vector unchanged if near-zero.
    pub fn normalize(self) -> Self {
        let norm = self.norm();
        if norm < EPSILON {
            return self;
        }
        self.scale(1.0 / norm)
    }

    pub fn scale(mut self, factor: f64) -> Self {
        for v in &mut self.values {
            *v *= factor;
        }
        self
    }

    /// Rescale so the norm does not exceed `radius`. Direction is preserved.
    pub fn clamp_norm(self, radius: f64) -> Self {
        let norm = self.norm();
        if norm > radius && norm > EPSILON {
            self.scale(radius / norm)
        } else {
            self
        }
    }

    /// Approximate inverse under circular convolution (the involution):
    /// element 0 stays, the rest are reversed.
    pub fn inverse(&self) -> Self {
        let d = self.dimensions();
        let values = (0..d).map(|i| self.values[(d - i) % d]).collect();
        Self { values }
    }

    /// Cosine similarity. Zero if either vector is near-zero.
    pub fn cosine(&self, other: &Self) -> f64 {
        let denom = self.norm() * other.norm();
        if denom < EPSILON {
            return 0.0;
        }
        self.dot(other) / denom
    }

    /// Circular convolution: c[k] = Σ_j a[j] · b[(k − j) mod d].
    pub fn convolve(&self, other: &Self) -> Self {
        self.check_dimensions(other);
        let d = self.dimensions();
        let mut values = vec![0.0; d];
        for (j, a) in self.values.iter().enumerate() {
            if a.abs() < EPSILON {
                continue;
            }
            for (k, out) in values.iter_mut().enumerate() {
                *out += a * other.values[(k + d - j) % d];
            }
        }
        Self { values }
    }
}

impl SemanticPointer {
    fn check_dimensions(&self, other: &Self) {
        assert_eq!(
            self.dimensions(),
            other.dimensions(),
            "semantic pointer dimensions differ"
        );
    }
}

impl Add for &SemanticPointer {
    type Output = SemanticPointer;

    fn add(self, rhs: Self) -> SemanticPointer {
        self.check_dimensions(rhs);
        let values = self
            .values
            .iter()
            .zip(&rhs.values)
            .map(|(a, b)| a + b)
            .collect();
        SemanticPointer { values }
    }
}

impl Add for SemanticPointer {
    type Output = SemanticPointer;

    fn add(self, rhs: Self) -> SemanticPointer {
        &self + &rhs
    }
}

impl AddAssign<&SemanticPointer> for SemanticPointer {
    fn add_assign(&mut self, rhs: &SemanticPointer) {
        self.check_dimensions(rhs);
        for (a, b) in self.values.iter_mut().zip(&rhs.values) {
            *a += b;
        }
    }
}

impl Sub for &SemanticPointer {
    type Output = SemanticPointer;

    fn sub(self, rhs: Self) -> SemanticPointer {
        self + &(-rhs)
    }
}

impl Neg for &SemanticPointer {
    type Output = SemanticPointer;

    fn neg(self) -> SemanticPointer {
        self.clone().scale(-1.0)
    }
}

/// Scalar multiplication.
impl Mul<f64> for &SemanticPointer {
    type Output = SemanticPointer;

    fn mul(self, rhs: f64) -> SemanticPointer {
        self.clone().scale(rhs)
    }
}

/// Binding product (circular convolution).
impl Mul for &SemanticPointer {
    type Output = SemanticPointer;

    fn mul(self, rhs: Self) -> SemanticPointer {
        self.convolve(rhs)
    }
}

/// Box-Muller transform for generating Gaussian-distributed random numbers.
fn gauss_random(rng: &mut impl Rng) -> f64 {
    // Clamp u1 away from 0 to avoid ln(0) = -inf
    let u1: f64 = rng.random::<f64>().max(f64::MIN_POSITIVE);
    let u2: f64 = rng.random();
    (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
}
