//! Semantic-pointer model of the Stroop effect.
//!
//! Word and color stimuli are encoded as symbol vectors, tagged with their
//! role by circular-convolution binding, weighted by attention in working
//! memory, and turned into a finger press by winner-take-all action
//! selection. Two circuits are provided: a feed-forward one and one whose
//! working memory integrates evidence through recurrent feedback.
//!
//! Dynamics are rate-level: every channel is a low-pass state advanced with a
//! fixed step, without spiking neurons.

pub mod action;
pub mod analysis;
pub mod attention;
pub mod binding;
pub mod combiner;
pub mod config;
pub mod constants;
pub mod encoder;
pub mod error;
pub mod experiment;
pub mod export;
pub mod model;
pub mod schedule;
pub mod simulator;
pub mod state;
pub mod synapse;
pub mod trial;
pub mod vector;
pub mod vocabulary;

pub use action::{ActionSelection, Selection, Utility};
pub use analysis::{
    ConditionSummary, Outcome, StroopSummary, TrialOutcome, selection_changes,
    similarity_series, summarize, trial_outcomes,
};
pub use attention::AttentionMixer;
pub use binding::{Binding, CircularConvolution};
pub use combiner::WorkingMemory;
pub use config::{FeedForwardParams, ModelConfig, ModelKind, RecurrentParams};
pub use constants::{BASELINE_UTILITY, DEFAULT_DIMENSIONS, DEFAULT_DT, RESPONSE_THRESHOLD};
pub use encoder::{Delay, InputEncoder};
pub use error::{ModelError, Result};
pub use experiment::{RunResult, prepare, run, run_with};
pub use export::{CURRENT_VERSION, RunExport, export_json, import_json};
pub use model::{FeedForwardModel, Network, RecurrentModel, build};
pub use schedule::{Field, Schedule, Stimulus};
pub use simulator::{ProbeData, Simulator};
pub use state::ChannelState;
pub use synapse::Lowpass;
pub use trial::{Trial, TrialSequence};
pub use vector::SemanticPointer;
pub use vocabulary::Vocabulary;
