//! The two Stroop circuits.
//!
//! Both read a word and a color channel, weight them by attention in working
//! memory and pick a finger by winner-take-all. They differ in how the color
//! lag is produced and in whether working memory integrates over time.
//!
//! The feed-forward circuit answers whichever stimulus reaches working memory
//! first. Since the word arrives before the (delayed) color, it mostly answers
//! the word on incongruent trials. The recurrent circuit accumulates evidence
//! across the trial, which lets the attended color catch up.

use crate::action::{ActionSelection, Selection};
use crate::attention::AttentionMixer;
use crate::combiner::WorkingMemory;
use crate::config::{ModelConfig, ModelKind};
use crate::constants::FAST_SYNAPSE;
use crate::encoder::{Delay, InputEncoder};
use crate::error::Result;
use crate::schedule::{Field, Schedule};
use crate::state::ChannelState;
use crate::trial::TrialSequence;
use crate::vector::SemanticPointer;
use crate::vocabulary::Vocabulary;

pub const PROBE_INPUT_WORD: &str = "input_word";
pub const PROBE_INPUT_COLOR: &str = "input_color";
pub const PROBE_COLOR: &str = "color";
pub const PROBE_WM_WORD: &str = "wm_word";
pub const PROBE_WM_COLOR: &str = "wm_color";
pub const PROBE_ATTENTION: &str = "attention";
pub const PROBE_WM: &str = "wm";
pub const PROBE_FINGER: &str = "finger";

/// A circuit the simulator can advance and probe.
pub trait Network {
    fn kind(&self) -> ModelKind;

    fn vocabulary(&self) -> &Vocabulary;

    fn trials(&self) -> &TrialSequence;

    fn schedule(&self) -> &Schedule;

    /// Names accepted by [`Network::probe`], in display order.
    fn probe_names(&self) -> &'static [&'static str];

    fn probe(&self, name: &str) -> Option<&SemanticPointer>;

    /// Action chosen on the most recent step.
    fn selection(&self) -> Option<&Selection>;

    fn action_names(&self) -> Vec<String>;

    /// Advance every channel from `t - dt` to `t`.
    fn step(&mut self, t: f64, dt: f64) -> Result<()>;

    fn reset(&mut self);
}

impl<N: Network + ?Sized> Network for Box<N> {
    fn kind(&self) -> ModelKind {
        (**self).kind()
    }
    fn vocabulary(&self) -> &Vocabulary {
        (**self).vocabulary()
    }
    fn trials(&self) -> &TrialSequence {
        (**self).trials()
    }
    fn schedule(&self) -> &Schedule {
        (**self).schedule()
    }
    fn probe_names(&self) -> &'static [&'static str] {
        (**self).probe_names()
    }
    fn probe(&self, name: &str) -> Option<&SemanticPointer> {
        (**self).probe(name)
    }
    fn selection(&self) -> Option<&Selection> {
        (**self).selection()
    }
    fn action_names(&self) -> Vec<String> {
        (**self).action_names()
    }
    fn step(&mut self, t: f64, dt: f64) -> Result<()> {
        (**self).step(t, dt)
    }
    fn reset(&mut self) {
        (**self).reset()
    }
}

/// Build the circuit named by `config.model`.
pub fn build(
    config: &ModelConfig,
    vocab: Vocabulary,
    trials: TrialSequence,
) -> Result<Box<dyn Network>> {
    Ok(match config.model {
        ModelKind::FeedForward => Box::new(FeedForwardModel::new(config, vocab, trials)?),
        ModelKind::Recurrent => Box::new(RecurrentModel::new(config, vocab, trials)?),
    })
}

/// Action selection feeding the finger channel.
#[derive(Clone, Debug)]
struct Motor {
    selector: ActionSelection,
    finger: ChannelState,
    selection: Option<Selection>,
}

impl Motor {
    fn new(vocab: &Vocabulary, baseline: f64, synapse: f64) -> Result<Self> {
        Ok(Self {
            selector: ActionSelection::stroop(vocab, baseline)?,
            finger: ChannelState::feed_forward(vocab.dimensions()).with_tau(synapse),
            selection: None,
        })
    }

    fn step(&mut self, evidence: &SemanticPointer, dt: f64) {
        self.selection = self.selector.evaluate(evidence);
        match &self.selection {
            Some(s) => self.finger.step(self.selector.effect(s.index), dt),
            None => self.finger.step(&SemanticPointer::zeros(evidence.dimensions()), dt),
        };
    }

    fn names(&self) -> Vec<String> {
        self.selector.options().iter().map(|o| o.name.clone()).collect()
    }

    fn reset(&mut self) {
        self.finger.reset();
        self.selection = None;
    }
}

// ---------------------------------------------------------------------------
// Feed-forward
// ---------------------------------------------------------------------------

/// Color is delayed by a slow synapse; working memory has no feedback.
#[derive(Clone, Debug)]
pub struct FeedForwardModel {
    vocab: Vocabulary,
    trials: TrialSequence,
    schedule: Schedule,
    word: InputEncoder,
    color: InputEncoder,
    color_state: ChannelState,
    mixer: AttentionMixer,
    attention: ChannelState,
    wm: WorkingMemory,
    motor: Motor,
}

impl FeedForwardModel {
    pub fn new(config: &ModelConfig, vocab: Vocabulary, trials: TrialSequence) -> Result<Self> {
        let d = vocab.dimensions();
        let schedule = Schedule::new(config.t_stim, config.t_isi)?;
        let tau = config.feed_forward.state_synapse;
        let fast = || ChannelState::feed_forward(d).with_tau(tau);

        Ok(Self {
            word: InputEncoder::new(Field::Word, schedule, Delay::None, d),
            color: InputEncoder::new(
                Field::Color,
                schedule,
                Delay::Lowpass(config.feed_forward.color_synapse),
                d,
            ),
            color_state: fast(),
            mixer: AttentionMixer::from_expression(&vocab, &config.attention)?,
            attention: fast(),
            wm: WorkingMemory::new(&vocab, config.gain, fast())?,
            motor: Motor::new(&vocab, config.baseline, tau)?,
            schedule,
            vocab,
            trials,
        })
    }
}

impl Network for FeedForwardModel {
    fn kind(&self) -> ModelKind {
        ModelKind::FeedForward
    }

    fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    fn trials(&self) -> &TrialSequence {
        &self.trials
    }

    fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    fn probe_names(&self) -> &'static [&'static str] {
        &[
            PROBE_INPUT_WORD,
            PROBE_INPUT_COLOR,
            PROBE_COLOR,
            PROBE_ATTENTION,
            PROBE_WM,
            PROBE_FINGER,
        ]
    }

    fn probe(&self, name: &str) -> Option<&SemanticPointer> {
        match name {
            PROBE_INPUT_WORD => Some(self.word.raw()),
            PROBE_INPUT_COLOR => Some(self.color.raw()),
            PROBE_COLOR => Some(self.color_state.output()),
            PROBE_ATTENTION => Some(self.attention.output()),
            PROBE_WM => Some(self.wm.output()),
            PROBE_FINGER => Some(self.motor.finger.output()),
            _ => None,
        }
    }

    fn selection(&self) -> Option<&Selection> {
        self.motor.selection.as_ref()
    }

    fn action_names(&self) -> Vec<String> {
        self.motor.names()
    }

    fn step(&mut self, t: f64, dt: f64) -> Result<()> {
        let word = self.word.step(t, dt, &self.trials, &self.vocab)?.clone();
        let color_in = self.color.step(t, dt, &self.trials, &self.vocab)?.clone();
        let color = self.color_state.step(&color_in, dt).clone();
        let attention = self.attention.step(self.mixer.vector(), dt).clone();
        let evidence = self.wm.step(&color, &word, &attention, dt);
        self.motor.step(evidence, dt);
        Ok(())
    }

    fn reset(&mut self) {
        self.word.reset();
        self.color.reset();
        self.color_state.reset();
        self.attention.reset();
        self.wm.reset();
        self.motor.reset();
    }
}

// ---------------------------------------------------------------------------
// Recurrent
// ---------------------------------------------------------------------------

/// Color is presented late by a schedule offset; word, color and working
/// memory are leaky integrators.
#[derive(Clone, Debug)]
pub struct RecurrentModel {
    vocab: Vocabulary,
    trials: TrialSequence,
    schedule: Schedule,
    word: InputEncoder,
    color: InputEncoder,
    wm_word: ChannelState,
    wm_color: ChannelState,
    mixer: AttentionMixer,
    attention: ChannelState,
    wm: WorkingMemory,
    motor: Motor,
}

impl RecurrentModel {
    pub fn new(config: &ModelConfig, vocab: Vocabulary, trials: TrialSequence) -> Result<Self> {
        let d = vocab.dimensions();
        let schedule = Schedule::new(config.t_stim, config.t_isi)?;
        let r = &config.recurrent;
        let integrator = || {
            ChannelState::recurrent(d, r.feedback, r.input_weight).with_tau(r.feedback_synapse)
        };

        Ok(Self {
            word: InputEncoder::new(Field::Word, schedule, Delay::None, d),
            color: InputEncoder::new(Field::Color, schedule, Delay::Shift(r.color_offset), d),
            wm_word: integrator(),
            wm_color: integrator(),
            mixer: AttentionMixer::from_expression(&vocab, &config.attention)?,
            attention: ChannelState::feed_forward(d),
            wm: WorkingMemory::new(&vocab, config.gain, integrator())?,
            motor: Motor::new(&vocab, config.baseline, FAST_SYNAPSE)?,
            schedule,
            vocab,
            trials,
        })
    }
}

impl Network for RecurrentModel {
    fn kind(&self) -> ModelKind {
        ModelKind::Recurrent
    }

    fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    fn trials(&self) -> &TrialSequence {
        &self.trials
    }

    fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    fn probe_names(&self) -> &'static [&'static str] {
        &[
            PROBE_INPUT_WORD,
            PROBE_INPUT_COLOR,
            PROBE_WM_WORD,
            PROBE_WM_COLOR,
            PROBE_ATTENTION,
            PROBE_WM,
            PROBE_FINGER,
        ]
    }

    fn probe(&self, name: &str) -> Option<&SemanticPointer> {
        match name {
            PROBE_INPUT_WORD => Some(self.word.raw()),
            PROBE_INPUT_COLOR => Some(self.color.raw()),
            PROBE_WM_WORD => Some(self.wm_word.output()),
            PROBE_WM_COLOR => Some(self.wm_color.output()),
            PROBE_ATTENTION => Some(self.attention.output()),
            PROBE_WM => Some(self.wm.output()),
            PROBE_FINGER => Some(self.motor.finger.output()),
            _ => None,
        }
    }

    fn selection(&self) -> Option<&Selection> {
        self.motor.selection.as_ref()
    }

    fn action_names(&self) -> Vec<String> {
        self.motor.names()
    }

    fn step(&mut self, t: f64, dt: f64) -> Result<()> {
        let word_in = self.word.step(t, dt, &self.trials, &self.vocab)?;
        let word = self.wm_word.step(word_in, dt).clone();
        let color_in = self.color.step(t, dt, &self.trials, &self.vocab)?;
        let color = self.wm_color.step(color_in, dt).clone();
        let attention = self.attention.step(self.mixer.vector(), dt).clone();
        let evidence = self.wm.step(&color, &word, &attention, dt);
        self.motor.step(evidence, dt);
        Ok(())
    }

    fn reset(&mut self) {
        self.word.reset();
        self.color.reset();
        self.wm_word.reset();
        self.wm_color.reset();
        self.attention.reset();
        self.wm.reset();
        self.motor.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trial::Trial;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn setup(kind: ModelKind) -> (ModelConfig, Vocabulary, TrialSequence) {
        let mut config = ModelConfig::defaults(kind);
        config.dimensions = 64;
        let vocab = Vocabulary::stroop(64, 0.1, &mut SmallRng::seed_from_u64(42)).unwrap();
        let trials = TrialSequence::repeated(Trial::new("RED", "RED"), 1).unwrap();
        (config, vocab, trials)
    }

    #[test]
    fn test_probe_names_resolve() {
        for kind in [ModelKind::FeedForward, ModelKind::Recurrent] {
            let (config, vocab, trials) = setup(kind);
            let model = build(&config, vocab, trials).unwrap();
            assert_eq!(model.kind(), kind);
            for name in model.probe_names() {
                let v = model.probe(name).unwrap();
                assert_eq!(v.dimensions(), 64);
            }
            assert!(model.probe("nonexistent").is_none());
            assert_eq!(model.action_names(), vec!["INDEX", "MIDDLE", "NONE"]);
        }
    }

    #[test]
    fn test_no_response_during_first_blank() {
        let (config, vocab, trials) = setup(ModelKind::FeedForward);
        let mut model = build(&config, vocab, trials).unwrap();
        for i in 1..=300 {
            model.step(i as f64 * 0.001, 0.001).unwrap();
        }
        let sel = model.selection().unwrap();
        assert_eq!(sel.index, 2, "responded during the ISI");
    }

    #[test]
    fn test_recurrent_color_shows_first_trial_before_offset() {
        let (config, vocab, _) = setup(ModelKind::Recurrent);
        let trials =
            TrialSequence::new(vec![Trial::new("RED", "BLUE"), Trial::new("BLUE", "RED")]).unwrap();
        let blue = vocab.get("BLUE").unwrap().clone();
        let mut model = build(&config, vocab, trials).unwrap();
        model.step(0.05, 0.001).unwrap();
        assert_eq!(model.probe(PROBE_INPUT_COLOR).unwrap(), &blue);
        assert!(model.probe(PROBE_INPUT_WORD).unwrap().norm() < 1e-12);
    }

    #[test]
    fn test_unknown_trial_symbol_aborts_step() {
        let (config, vocab, _) = setup(ModelKind::FeedForward);
        let trials = TrialSequence::repeated(Trial::new("GREEN", "RED"), 1).unwrap();
        let mut model = build(&config, vocab, trials).unwrap();
        assert!(model.step(0.9, 0.001).is_err());
    }

    #[test]
    fn test_reset_clears_state() {
        let (config, vocab, trials) = setup(ModelKind::Recurrent);
        let mut model = build(&config, vocab, trials).unwrap();
        for i in 1..=900 {
            model.step(i as f64 * 0.001, 0.001).unwrap();
        }
        assert!(model.probe(PROBE_WM).unwrap().norm() > 0.1);
        model.reset();
        assert!(model.probe(PROBE_WM).unwrap().norm() < 1e-12);
        assert!(model.selection().is_none());
    }
}
