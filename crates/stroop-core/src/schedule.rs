//! Stimulus timing: maps elapsed time onto blank or trial-presentation periods.
//!
//! Each trial occupies one period of `t_isi + t_stim` seconds. The blank
//! inter-stimulus interval comes first, then the stimulus. An offset shifts a
//! channel later in time. Before its offset has elapsed a channel stays on the
//! first trial, with the phase wrapped from the negative shifted time.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::trial::{Trial, TrialSequence};

/// Which half of a trial a channel presents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Word,
    Color,
}

impl Field {
    pub fn of<'a>(&self, trial: &'a Trial) -> &'a str {
        match self {
            Field::Word => &trial.word,
            Field::Color => &trial.color,
        }
    }
}

/// Output of the scheduler at one instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stimulus<'a> {
    Blank,
    Symbol(&'a str),
}

impl Stimulus<'_> {
    pub fn is_blank(&self) -> bool {
        matches!(self, Stimulus::Blank)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub t_stim: f64,
    pub t_isi: f64,
}

impl Schedule {
    pub fn new(t_stim: f64, t_isi: f64) -> Result<Self> {
        if !(t_stim >= 0.0 && t_isi >= 0.0) || t_stim + t_isi <= 0.0 {
            return Err(ModelError::InvalidParameter(format!(
                "t_stim and t_isi must be non-negative with a positive sum (got {t_stim}, {t_isi})"
            )));
        }
        Ok(Self { t_stim, t_isi })
    }

    pub fn period(&self) -> f64 {
        self.t_stim + self.t_isi
    }

    /// Unwrapped trial number active at `t` (may be negative before the offset).
    pub fn trial_number(&self, t: f64, offset: f64) -> i64 {
        (t - offset).div_euclid(self.period()) as i64
    }

    /// Position within the current period, always in `[0, period)`.
    pub fn phase(&self, t: f64, offset: f64) -> f64 {
        (t - offset).rem_euclid(self.period())
    }

    pub fn is_presenting(&self, t: f64, offset: f64) -> bool {
        self.phase(t, offset) >= self.t_isi
    }

    /// Symbol of `field` for the trial active at `t`, or `Blank` during the ISI.
    /// Times before `offset` map to the first trial.
    pub fn stimulus<'a>(
        &self,
        t: f64,
        offset: f64,
        trials: &'a TrialSequence,
        field: Field,
    ) -> Stimulus<'a> {
        if !self.is_presenting(t, offset) {
            return Stimulus::Blank;
        }
        let n = self.trial_number(t, offset).max(0);
        Stimulus::Symbol(field.of(trials.get(n)))
    }

    /// Presentation window `[onset, end)` of trial number `n`, with the offset applied.
    pub fn window(&self, n: usize, offset: f64) -> (f64, f64) {
        let start = n as f64 * self.period() + offset;
        (start + self.t_isi, start + self.period())
    }

    /// Number of full periods that fit in `duration`.
    pub fn trials_in(&self, duration: f64) -> usize {
        (duration / self.period()).floor().max(0.0) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn trials() -> TrialSequence {
        TrialSequence::new(vec![
            Trial::new("RED", "BLUE"),
            Trial::new("BLUE", "BLUE"),
            Trial::new("BLUE", "RED"),
        ])
        .unwrap()
    }

    #[test]
    fn test_blank_then_stimulus() {
        let s = Schedule::new(0.5, 0.5).unwrap();
        let seq = trials();
        assert_eq!(s.stimulus(0.1, 0.0, &seq, Field::Word), Stimulus::Blank);
        assert_eq!(s.stimulus(0.6, 0.0, &seq, Field::Word), Stimulus::Symbol("RED"));
        assert_eq!(s.stimulus(0.6, 0.0, &seq, Field::Color), Stimulus::Symbol("BLUE"));
        assert_eq!(s.stimulus(1.2, 0.0, &seq, Field::Word), Stimulus::Blank);
        assert_eq!(s.stimulus(2.7, 0.0, &seq, Field::Color), Stimulus::Symbol("RED"));
        // wraps to the first trial
        assert_eq!(s.stimulus(3.9, 0.0, &seq, Field::Word), Stimulus::Symbol("RED"));
    }

    #[test]
    fn test_offset_delays_channel() {
        let s = Schedule::new(0.3, 0.7).unwrap();
        let seq = trials();
        // Word is already on at 0.75; color with 0.1 offset is not.
        assert_eq!(s.stimulus(0.75, 0.0, &seq, Field::Word), Stimulus::Symbol("RED"));
        assert_eq!(s.stimulus(0.75, 0.1, &seq, Field::Color), Stimulus::Blank);
        assert_eq!(s.stimulus(0.85, 0.1, &seq, Field::Color), Stimulus::Symbol("BLUE"));
        // Color stays on 0.1 s past the word's window.
        assert_eq!(s.stimulus(1.05, 0.0, &seq, Field::Word), Stimulus::Blank);
        assert_eq!(s.stimulus(1.05, 0.1, &seq, Field::Color), Stimulus::Symbol("BLUE"));
    }

    #[test]
    fn test_first_trial_before_offset() {
        let s = Schedule::new(0.3, 0.7).unwrap();
        let seq = TrialSequence::new(vec![Trial::new("RED", "BLUE"), Trial::new("BLUE", "RED")])
            .unwrap();
        // Shifted time is negative: the phase wraps into the stimulus part...
        assert_eq!(s.trial_number(0.05, 0.1), -1);
        let phase = s.phase(0.05, 0.1);
        assert!((phase - 0.95).abs() < 1e-12, "phase = {phase}");
        // ...and shows the first trial, not the last one.
        assert_eq!(s.stimulus(0.05, 0.1, &seq, Field::Color), Stimulus::Symbol("BLUE"));
        assert_eq!(s.stimulus(0.0, 0.1, &seq, Field::Color), Stimulus::Symbol("BLUE"));
        // Once the offset has passed, the first period starts with its blank.
        assert_eq!(s.stimulus(0.15, 0.1, &seq, Field::Color), Stimulus::Blank);
        // A negative shifted phase inside the blank part stays blank.
        assert_eq!(s.stimulus(-0.5, 0.0, &seq, Field::Word), Stimulus::Blank);
    }

    #[test]
    fn test_zero_stimulus_is_always_blank() {
        let s = Schedule::new(0.0, 1.0).unwrap();
        let seq = trials();
        for i in 0..100 {
            let t = i as f64 * 0.037;
            assert!(s.stimulus(t, 0.0, &seq, Field::Word).is_blank());
        }
    }

    #[test]
    fn test_invalid_timing() {
        assert!(Schedule::new(0.0, 0.0).is_err());
        assert!(Schedule::new(-0.1, 0.5).is_err());
        assert!(Schedule::new(f64::NAN, 0.5).is_err());
    }

    #[test]
    fn test_window() {
        let s = Schedule::new(0.3, 0.7).unwrap();
        let (on, off) = s.window(2, 0.1);
        assert!((on - 2.8).abs() < 1e-12);
        assert!((off - 3.1).abs() < 1e-12);
        assert_eq!(s.trials_in(10.0), 10);
        assert_eq!(s.trials_in(2.5), 2);
    }

    proptest! {
        #[test]
        fn prop_periodic(t in 0.5f64..20.0, k in 0i64..20, offset in 0.0f64..0.5) {
            let s = Schedule::new(0.3, 0.7).unwrap();
            let seq = trials();
            let phase = s.phase(t, offset);
            prop_assume!(phase > 1e-6 && (phase - s.t_isi).abs() > 1e-6 && s.period() - phase > 1e-6);

            let shifted = t + (k * seq.len() as i64) as f64 * s.period();
            prop_assert_eq!(
                s.stimulus(t, offset, &seq, Field::Word),
                s.stimulus(shifted, offset, &seq, Field::Word)
            );
            prop_assert_eq!(
                s.is_presenting(t, offset),
                s.is_presenting(t + k as f64 * s.period(), offset)
            );
        }

        #[test]
        fn prop_blank_exactly_during_isi(t in 0.0f64..20.0) {
            let s = Schedule::new(0.5, 0.5).unwrap();
            let seq = trials();
            let blank = s.stimulus(t, 0.0, &seq, Field::Color).is_blank();
            prop_assert_eq!(blank, s.phase(t, 0.0) < s.t_isi);
        }
    }
}
