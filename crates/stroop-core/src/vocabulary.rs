//! Symbol vocabulary and weighted-sum expressions over it.

use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_POPULATE_ATTEMPTS, MAX_SIMILARITY};
use crate::error::{ModelError, Result};
use crate::vector::SemanticPointer;

static SYMBOL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z][A-Za-z0-9_]*$").unwrap());
static TERM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?P<coef>\d+(?:\.\d*)?|\.\d+)\s*\*\s*)?(?P<sym>[A-Z][A-Za-z0-9_]*)(?:\s*\*\s*(?P<post>\d+(?:\.\d*)?|\.\d+))?$",
    )
    .unwrap()
});
static ZERO: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^0+(?:\.0*)?$").unwrap());

/// Symbols of the word/color/finger experiment, in population order.
pub const WORDS: [&str; 3] = ["CAT", "BLUE", "RED"];
pub const COLORS: [&str; 2] = ["RED", "BLUE"];
pub const ROLES: [&str; 2] = ["COLOR", "WORD"];
pub const FINGERS: [&str; 2] = ["INDEX", "MIDDLE"];

/// Ordered mapping from symbol names to unit vectors of a fixed dimension.
///
/// New vectors are drawn at random and rejected while their similarity to an
/// existing key exceeds `max_similarity`. When no candidate passes within
/// `MAX_POPULATE_ATTEMPTS` the least similar one is kept.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Vocabulary {
    dimensions: usize,
    max_similarity: f64,
    keys: Vec<String>,
    vectors: Vec<SemanticPointer>,
}

impl Vocabulary {
    pub fn new(dimensions: usize) -> Result<Self> {
        Self::with_max_similarity(dimensions, MAX_SIMILARITY)
    }

    pub fn with_max_similarity(dimensions: usize, max_similarity: f64) -> Result<Self> {
        if dimensions == 0 {
            return Err(ModelError::InvalidParameter(
                "vocabulary dimensions must be positive".into(),
            ));
        }
        Ok(Self {
            dimensions,
            max_similarity,
            keys: Vec::new(),
            vectors: Vec::new(),
        })
    }

    /// Vocabulary with every symbol the Stroop models refer to.
    pub fn stroop(dimensions: usize, max_similarity: f64, rng: &mut impl Rng) -> Result<Self> {
        let mut vocab = Self::with_max_similarity(dimensions, max_similarity)?;
        vocab.populate(&WORDS.join(";"), rng)?;
        vocab.populate(&ROLES.join(";"), rng)?;
        vocab.populate(&FINGERS.join(";"), rng)?;
        Ok(vocab)
    }

    /// Add every `;`-separated symbol that is not already present.
    pub fn populate(&mut self, symbols: &str, rng: &mut impl Rng) -> Result<()> {
        for name in symbols.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            if self.contains(name) {
                continue;
            }
            let vector = self.create_vector(rng);
            self.add(name, vector)?;
        }
        Ok(())
    }

    /// Add a symbol with an explicit vector.
    pub fn add(&mut self, name: &str, vector: SemanticPointer) -> Result<()> {
        if !SYMBOL.is_match(name) {
            return Err(ModelError::InvalidSymbol(name.to_string()));
        }
        if self.contains(name) {
            return Err(ModelError::DuplicateSymbol(name.to_string()));
        }
        if vector.dimensions() != self.dimensions {
            return Err(ModelError::InvalidParameter(format!(
                "vector for {name} has {} dimensions, vocabulary has {}",
                vector.dimensions(),
                self.dimensions
            )));
        }
        self.keys.push(name.to_string());
        self.vectors.push(vector);
        Ok(())
    }

    fn create_vector(&self, rng: &mut impl Rng) -> SemanticPointer {
        let mut best = SemanticPointer::random(self.dimensions, rng);
        let mut best_sim = self.max_similarity_to_keys(&best);

        for _ in 1..MAX_POPULATE_ATTEMPTS {
            if best_sim < self.max_similarity {
                return best;
            }
            let candidate = SemanticPointer::random(self.dimensions, rng);
            let sim = self.max_similarity_to_keys(&candidate);
            if sim < best_sim {
                best = candidate;
                best_sim = sim;
            }
        }

        if best_sim >= self.max_similarity {
            tracing::warn!(
                "could not create a vector with similarity < {} after {} attempts (best {best_sim:.3})",
                self.max_similarity,
                MAX_POPULATE_ATTEMPTS
            );
        }
        best
    }

    fn max_similarity_to_keys(&self, v: &SemanticPointer) -> f64 {
        self.vectors
            .iter()
            .map(|k| k.dot(v))
            .fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn contains(&self, name: &str) -> bool {
        self.keys.iter().any(|k| k == name)
    }

    pub fn get(&self, name: &str) -> Result<&SemanticPointer> {
        self.keys
            .iter()
            .position(|k| k == name)
            .map(|i| &self.vectors[i])
            .ok_or_else(|| ModelError::UnknownSymbol(name.to_string()))
    }

    pub fn zero(&self) -> SemanticPointer {
        SemanticPointer::zeros(self.dimensions)
    }

    /// Dot product of `v` against every key, in key order.
    pub fn similarity(&self, v: &SemanticPointer) -> Vec<f64> {
        self.vectors.iter().map(|k| k.dot(v)).collect()
    }

    /// Key with the highest similarity to `v`, if any.
    pub fn closest(&self, v: &SemanticPointer) -> Option<(&str, f64)> {
        self.keys
            .iter()
            .zip(self.similarity(v))
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(k, s)| (k.as_str(), s))
    }

    /// Parse a weighted sum such as `0.45*WORD + 0.55*COLOR` or `RED - BLUE`.
    /// A lone `0` is the zero vector.
    pub fn parse(&self, expr: &str) -> Result<SemanticPointer> {
        let mut acc = self.zero();
        for (weight, symbol) in parse_weighted_sum(expr)? {
            if let Some(symbol) = symbol {
                acc += &(self.get(&symbol)? * weight);
            }
        }
        Ok(acc)
    }
}

/// Split a weighted-sum expression into `(weight, symbol)` terms.
/// Zero terms come back with `None` as the symbol.
pub fn parse_weighted_sum(expr: &str) -> Result<Vec<(f64, Option<String>)>> {
    let mut terms = Vec::new();
    for (sign, raw) in split_signed(expr)? {
        let raw = raw.trim();
        if ZERO.is_match(raw) {
            terms.push((0.0, None));
            continue;
        }
        let caps = TERM
            .captures(raw)
            .ok_or_else(|| ModelError::InvalidExpression(format!("cannot parse term '{raw}'")))?;
        let mut weight = sign;
        for name in ["coef", "post"] {
            if let Some(m) = caps.name(name) {
                let c: f64 = m.as_str().parse().map_err(|_| {
                    ModelError::InvalidExpression(format!("bad coefficient '{}'", m.as_str()))
                })?;
                weight *= c;
            }
        }
        terms.push((weight, Some(caps["sym"].to_string())));
    }
    Ok(terms)
}

fn split_signed(expr: &str) -> Result<Vec<(f64, &str)>> {
    let mut out = Vec::new();
    let mut sign = 1.0;
    let mut start = 0;
    let mut expect_term = true;

    for (i, ch) in expr.char_indices() {
        match ch {
            '+' | '-' => {
                if expect_term {
                    if !expr[start..i].trim().is_empty() {
                        return Err(ModelError::InvalidExpression(format!(
                            "unexpected '{ch}' in '{expr}'"
                        )));
                    }
                    if ch == '-' {
                        sign = -sign;
                    }
                } else {
                    out.push((sign, &expr[start..i]));
                    sign = if ch == '-' { -1.0 } else { 1.0 };
                    expect_term = true;
                }
                start = i + 1;
            }
            c if c.is_whitespace() => {}
            _ => expect_term = false,
        }
    }
    if expect_term {
        return Err(ModelError::InvalidExpression(format!(
            "expression '{expr}' is empty or ends with an operator"
        )));
    }
    out.push((sign, &expr[start..]));
    Ok(out)
}
