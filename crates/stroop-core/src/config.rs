//! Model configuration.
//!
//! Each model kind has its own defaults (one per Stroop experiment). A
//! TOML document only needs the keys it changes: it is layered over the
//! defaults of the `model` it names.

use serde::{Deserialize, Serialize};

use crate::constants::{
    BASELINE_UTILITY, DEFAULT_DIMENSIONS, DEFAULT_DT, DEFAULT_TRIALS, EVIDENCE_GAIN,
    FAST_SYNAPSE, FEEDBACK_SYNAPSE, MAX_SIMILARITY, RESPONSE_THRESHOLD,
};
use crate::error::{ModelError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// Memoryless working memory; color delayed by a slow synapse.
    FeedForward,
    /// Leaky-integrator working memory; color delayed by a schedule offset.
    #[default]
    Recurrent,
}

impl ModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FeedForward => "feed_forward",
            Self::Recurrent => "recurrent",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeedForwardParams {
    /// Low-pass time constant on the color input (perceptual delay)
    pub color_synapse: f64,
    /// Synapse on the memoryless channels
    pub state_synapse: f64,
}

impl Default for FeedForwardParams {
    fn default() -> Self {
        Self {
            color_synapse: 0.3,
            state_synapse: FAST_SYNAPSE,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecurrentParams {
    /// Color is presented this many seconds after the word
    pub color_offset: f64,
    pub feedback: f64,
    pub input_weight: f64,
    pub feedback_synapse: f64,
}

impl Default for RecurrentParams {
    fn default() -> Self {
        Self {
            color_offset: 0.1,
            feedback: 0.5,
            input_weight: 1.0,
            feedback_synapse: FEEDBACK_SYNAPSE,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub model: ModelKind,
    pub dimensions: usize,
    pub seed: u64,
    pub dt: f64,
    pub duration: f64,
    pub trials: usize,
    pub word_pool: Vec<String>,
    pub color_pool: Vec<String>,
    pub t_stim: f64,
    pub t_isi: f64,
    /// Weighted sum over the vocabulary, e.g. `0.45*WORD + 0.55*COLOR`
    pub attention: String,
    pub gain: f64,
    pub baseline: f64,
    pub max_similarity: f64,
    pub response_threshold: f64,
    pub feed_forward: FeedForwardParams,
    pub recurrent: RecurrentParams,
}

impl ModelConfig {
    pub fn defaults(model: ModelKind) -> Self {
        let colors = vec!["RED".to_string(), "BLUE".to_string()];
        let base = Self {
            model,
            dimensions: DEFAULT_DIMENSIONS,
            seed: 0,
            dt: DEFAULT_DT,
            duration: 5.0,
            trials: DEFAULT_TRIALS,
            word_pool: colors.clone(),
            color_pool: colors,
            t_stim: 0.5,
            t_isi: 0.5,
            attention: "0.45*WORD + 0.55*COLOR".to_string(),
            gain: EVIDENCE_GAIN,
            baseline: BASELINE_UTILITY,
            max_similarity: MAX_SIMILARITY,
            response_threshold: RESPONSE_THRESHOLD,
            feed_forward: FeedForwardParams::default(),
            recurrent: RecurrentParams::default(),
        };
        match model {
            ModelKind::FeedForward => base,
            // Shorter stimulus avoids working-memory overlap between trials;
            // the smaller attention gap gives the word a chance to interfere.
            ModelKind::Recurrent => Self {
                duration: 10.0,
                t_stim: 0.3,
                t_isi: 0.7,
                attention: "0.48*WORD + 0.52*COLOR".to_string(),
                ..base
            },
        }
    }

    /// Parse TOML, filling unspecified keys from the defaults of its `model`.
    pub fn from_toml(content: &str) -> Result<Self> {
        let overrides: toml::Table = content.parse()?;
        let kind = match overrides.get("model") {
            Some(v) => v.clone().try_into::<ModelKind>()?,
            None => ModelKind::default(),
        };
        let mut merged = toml::Value::try_from(Self::defaults(kind))?;
        merge(&mut merged, toml::Value::Table(overrides));
        let config: Self = merged.try_into()?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        let fail = |msg: String| Err(ModelError::InvalidParameter(msg));
        if self.dimensions == 0 {
            return fail("dimensions must be positive".into());
        }
        if !(self.dt > 0.0) {
            return fail(format!("dt must be positive (got {})", self.dt));
        }
        if !(self.duration > 0.0) {
            return fail(format!("duration must be positive (got {})", self.duration));
        }
        if self.trials == 0 {
            return fail("trials must be positive".into());
        }
        let r = &self.recurrent;
        for (name, v) in [("feedback", r.feedback), ("input_weight", r.input_weight)] {
            if !(0.0..=1.0).contains(&v) {
                return fail(format!("{name} must be in [0, 1] (got {v})"));
            }
        }
        Ok(())
    }
}

/// Recursively overlay `overlay` onto `base`; tables merge, everything else replaces.
fn merge(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(b), toml::Value::Table(o)) => {
            for (k, v) in o {
                match b.get_mut(&k) {
                    Some(existing) => merge(existing, v),
                    None => {
                        b.insert(k, v);
                    }
                }
            }
        }
        (b, o) => *b = o,
    }
}
