use crate::error::Result;
use crate::schedule::{Field, Schedule, Stimulus};
use crate::synapse::Lowpass;
use crate::trial::TrialSequence;
use crate::vector::SemanticPointer;
use crate::vocabulary::Vocabulary;

/// How an input channel is made to lag behind the nominal schedule.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Delay {
    None,
    /// Present the stimulus `offset` seconds late.
    Shift(f64),
    /// Smooth the stimulus through a low-pass synapse with this time constant.
    Lowpass(f64),
}

/// Turns the scheduled symbol for one field into a vector signal.
/// Blank periods encode as the zero vector.
#[derive(Clone, Debug)]
pub struct InputEncoder {
    pub field: Field,
    schedule: Schedule,
    offset: f64,
    synapse: Option<Lowpass>,
    raw: SemanticPointer,
}

impl InputEncoder {
    pub fn new(field: Field, schedule: Schedule, delay: Delay, dimensions: usize) -> Self {
        let (offset, synapse) = match delay {
            Delay::None => (0.0, None),
            Delay::Shift(offset) => (offset, None),
            Delay::Lowpass(tau) => (0.0, Some(Lowpass::new(tau, dimensions))),
        };
        Self {
            field,
            schedule,
            offset,
            synapse,
            raw: SemanticPointer::zeros(dimensions),
        }
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Scheduled vector at `t`, before any synaptic smoothing.
    pub fn encode(
        &self,
        t: f64,
        trials: &TrialSequence,
        vocab: &Vocabulary,
    ) -> Result<SemanticPointer> {
        match self.schedule.stimulus(t, self.offset, trials, self.field) {
            Stimulus::Blank => Ok(vocab.zero()),
            Stimulus::Symbol(name) => Ok(vocab.get(name)?.clone()),
        }
    }

    /// Advance to `t` and return the delayed signal.
    pub fn step(
        &mut self,
        t: f64,
        dt: f64,
        trials: &TrialSequence,
        vocab: &Vocabulary,
    ) -> Result<&SemanticPointer> {
        self.raw = self.encode(t, trials, vocab)?;
        Ok(match &mut self.synapse {
            Some(syn) => syn.step(&self.raw, dt),
            None => &self.raw,
        })
    }

    /// Undelayed signal from the last step.
    pub fn raw(&self) -> &SemanticPointer {
        &self.raw
    }

    /// Delayed signal from the last step.
    pub fn output(&self) -> &SemanticPointer {
        match &self.synapse {
            Some(syn) => syn.output(),
            None => &self.raw,
        }
    }

    pub fn reset(&mut self) {
        self.raw = SemanticPointer::zeros(self.raw.dimensions());
        if let Some(syn) = &mut self.synapse {
            syn.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trial::Trial;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn setup() -> (Vocabulary, TrialSequence, Schedule) {
        let vocab = Vocabulary::stroop(16, 0.1, &mut SmallRng::seed_from_u64(42)).unwrap();
        let trials = TrialSequence::new(vec![Trial::new("BLUE", "RED")]).unwrap();
        (vocab, trials, Schedule::new(0.3, 0.7).unwrap())
    }

    #[test]
    fn test_blank_is_zero() {
        let (vocab, trials, schedule) = setup();
        let mut enc = InputEncoder::new(Field::Word, schedule, Delay::None, 16);
        let out = enc.step(0.2, 0.001, &trials, &vocab).unwrap();
        assert_eq!(out, &vocab.zero());
    }

    #[test]
    fn test_symbol_lookup() {
        let (vocab, trials, schedule) = setup();
        let mut word = InputEncoder::new(Field::Word, schedule, Delay::None, 16);
        let mut color = InputEncoder::new(Field::Color, schedule, Delay::None, 16);
        assert_eq!(
            word.step(0.8, 0.001, &trials, &vocab).unwrap(),
            vocab.get("BLUE").unwrap()
        );
        assert_eq!(
            color.step(0.8, 0.001, &trials, &vocab).unwrap(),
            vocab.get("RED").unwrap()
        );
    }

    #[test]
    fn test_shift_delays_onset() {
        let (vocab, trials, schedule) = setup();
        let enc = InputEncoder::new(Field::Color, schedule, Delay::Shift(0.1), 16);
        assert_eq!(enc.encode(0.75, &trials, &vocab).unwrap(), vocab.zero());
        assert_eq!(
            &enc.encode(0.85, &trials, &vocab).unwrap(),
            vocab.get("RED").unwrap()
        );
    }

    #[test]
    fn test_lowpass_lags_raw_signal() {
        let (vocab, trials, schedule) = setup();
        let mut enc = InputEncoder::new(Field::Color, schedule, Delay::Lowpass(0.3), 16);
        let red = vocab.get("RED").unwrap();
        let mut t = 0.0;
        while t < 0.8 {
            t += 0.001;
            enc.step(t, 0.001, &trials, &vocab).unwrap();
        }
        assert_eq!(enc.raw(), red);
        let sim = enc.output().dot(red);
        assert!(sim > 0.1 && sim < 0.5, "filtered similarity {sim}");
    }

    #[test]
    fn test_unknown_symbol_propagates() {
        let (vocab, _, schedule) = setup();
        let trials = TrialSequence::new(vec![Trial::new("GREEN", "RED")]).unwrap();
        let enc = InputEncoder::new(Field::Word, schedule, Delay::None, 16);
        assert!(enc.encode(0.9, &trials, &vocab).is_err());
    }
}
