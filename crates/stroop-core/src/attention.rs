use crate::error::Result;
use crate::vector::SemanticPointer;
use crate::vocabulary::{Vocabulary, parse_weighted_sum};

/// Constant control vector weighting the WORD and COLOR roles.
///
/// Only ever used through the inverse binding: unbinding the combined evidence
/// with this vector pulls out each role's content in proportion to its weight.
#[derive(Clone, Debug)]
pub struct AttentionMixer {
    expression: String,
    vector: SemanticPointer,
}

impl AttentionMixer {
    /// `word * WORD + color * COLOR`.
    pub fn from_weights(vocab: &Vocabulary, word: f64, color: f64) -> Result<Self> {
        Self::from_expression(vocab, &format!("{word}*WORD + {color}*COLOR"))
    }

    pub fn from_expression(vocab: &Vocabulary, expression: &str) -> Result<Self> {
        let total: f64 = parse_weighted_sum(expression)?
            .iter()
            .filter(|(_, sym)| sym.is_some())
            .map(|(w, _)| w)
            .sum();
        if (total - 1.0).abs() > 0.1 {
            tracing::warn!("attention weights sum to {total:.2}, expected about 1");
        }
        Ok(Self {
            expression: expression.to_string(),
            vector: vocab.parse(expression)?,
        })
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn vector(&self) -> &SemanticPointer {
        &self.vector
    }
}
