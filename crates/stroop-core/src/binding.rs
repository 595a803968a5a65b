//! Role/value binding.
//!
//! Binding tags a value with a role so several role-tagged values can be
//! summed into one vector and later separated again. Unbinding is approximate:
//! `unbind(role, bind(role, value))` is close to `value` plus noise that
//! shrinks as the dimensionality grows.

use crate::vector::SemanticPointer;

pub trait Binding {
    fn bind(&self, role: &SemanticPointer, value: &SemanticPointer) -> SemanticPointer;

    fn unbind(&self, role: &SemanticPointer, combined: &SemanticPointer) -> SemanticPointer;
}

/// Holographic reduced representations: circular convolution to bind,
/// convolution with the involution to unbind.
#[derive(Clone, Copy, Debug, Default)]
pub struct CircularConvolution;

impl Binding for CircularConvolution {
    fn bind(&self, role: &SemanticPointer, value: &SemanticPointer) -> SemanticPointer {
        role * value
    }

    fn unbind(&self, role: &SemanticPointer, combined: &SemanticPointer) -> SemanticPointer {
        combined * &role.inverse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    const D: usize = 512;

    #[test]
    fn test_unbind_recovers_value() {
        let mut rng = SmallRng::seed_from_u64(42);
        let role = SemanticPointer::random(D, &mut rng);
        let value = SemanticPointer::random(D, &mut rng);
        let b = CircularConvolution;

        let recovered = b.unbind(&role, &b.bind(&role, &value));
        let sim = recovered.cosine(&value);
        assert!(sim > 0.6, "recovered similarity too low: {sim}");
    }

    #[test]
    fn test_bound_is_dissimilar_to_parts() {
        let mut rng = SmallRng::seed_from_u64(42);
        let role = SemanticPointer::random(D, &mut rng);
        let value = SemanticPointer::random(D, &mut rng);
        let bound = CircularConvolution.bind(&role, &value);
        assert!(bound.cosine(&role).abs() < 0.2);
        assert!(bound.cosine(&value).abs() < 0.2);
    }

    #[test]
    fn test_bind_distributes_over_addition() {
        let mut rng = SmallRng::seed_from_u64(7);
        let role = SemanticPointer::random(D, &mut rng);
        let x = SemanticPointer::random(D, &mut rng);
        let y = SemanticPointer::random(D, &mut rng);
        let b = CircularConvolution;

        let lhs = b.bind(&role, &(&x + &y));
        let rhs = &b.bind(&role, &x) + &b.bind(&role, &y);
        assert!((&lhs - &rhs).norm() < 1e-9);
    }

    #[test]
    fn test_unbind_separates_two_roles() {
        let mut rng = SmallRng::seed_from_u64(3);
        let color = SemanticPointer::random(D, &mut rng);
        let word = SemanticPointer::random(D, &mut rng);
        let red = SemanticPointer::random(D, &mut rng);
        let blue = SemanticPointer::random(D, &mut rng);
        let b = CircularConvolution;

        let combined = &b.bind(&color, &red) + &b.bind(&word, &blue);
        let as_color = b.unbind(&color, &combined);
        assert!(as_color.dot(&red) > as_color.dot(&blue));
        let as_word = b.unbind(&word, &combined);
        assert!(as_word.dot(&blue) > as_word.dot(&red));
    }
}
