use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// One Stroop stimulus: a color word printed in an ink color.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trial {
    pub word: String,
    pub color: String,
}

impl Trial {
    pub fn new(word: &str, color: &str) -> Self {
        Self {
            word: word.to_string(),
            color: color.to_string(),
        }
    }

    pub fn is_congruent(&self) -> bool {
        self.word == self.color
    }

    /// Finger that names the ink color: BLUE → INDEX, RED → MIDDLE.
    pub fn correct_finger(&self) -> Option<&'static str> {
        finger_for_color(&self.color)
    }
}

pub fn finger_for_color(color: &str) -> Option<&'static str> {
    match color {
        "BLUE" => Some("INDEX"),
        "RED" => Some("MIDDLE"),
        _ => None,
    }
}

/// Ordered, non-empty list of trials. Indexing wraps modulo the length.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrialSequence {
    trials: Vec<Trial>,
}

impl TrialSequence {
    pub fn new(trials: Vec<Trial>) -> Result<Self> {
        if trials.is_empty() {
            return Err(ModelError::EmptyTrials);
        }
        Ok(Self { trials })
    }

    /// The same trial repeated `n` times.
    pub fn repeated(trial: Trial, n: usize) -> Result<Self> {
        Self::new(vec![trial; n])
    }

    /// Draw `n` trials, word and color independently and uniformly from their pools.
    pub fn random(
        n: usize,
        word_pool: &[String],
        color_pool: &[String],
        rng: &mut impl Rng,
    ) -> Result<Self> {
        if word_pool.is_empty() || color_pool.is_empty() {
            return Err(ModelError::InvalidParameter(
                "word and color pools must not be empty".into(),
            ));
        }
        let trials = (0..n)
            .map(|_| {
                let w = &word_pool[rng.random_range(0..word_pool.len())];
                let c = &color_pool[rng.random_range(0..color_pool.len())];
                Trial::new(w, c)
            })
            .collect();
        Self::new(trials)
    }

    pub fn len(&self) -> usize {
        self.trials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }

    /// Trial at `index`, wrapping in both directions.
    pub fn get(&self, index: i64) -> &Trial {
        let i = index.rem_euclid(self.trials.len() as i64) as usize;
        &self.trials[i]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Trial> {
        self.trials.iter()
    }

    pub fn congruent_count(&self) -> usize {
        self.trials.iter().filter(|t| t.is_congruent()).count()
    }
}
