//! Post-run analysis: similarity curves, per-trial responses, Stroop summary.

use serde::{Deserialize, Serialize};

use crate::model::PROBE_FINGER;
use crate::schedule::Schedule;
use crate::simulator::ProbeData;
use crate::trial::{Trial, TrialSequence};
use crate::vector::SemanticPointer;
use crate::vocabulary::Vocabulary;

/// Per-step similarity of `series` against every vocabulary key.
pub fn similarity_series(series: &[SemanticPointer], vocab: &Vocabulary) -> Vec<Vec<f64>> {
    series.iter().map(|v| vocab.similarity(v)).collect()
}

/// Steps at which the selected action changed, as `(time, action index)`.
pub fn selection_changes(data: &ProbeData) -> Vec<(f64, Option<usize>)> {
    let mut changes = Vec::new();
    let mut last = None;
    for (i, sel) in data.selections.iter().enumerate() {
        if i == 0 || *sel != last {
            changes.push((data.trange[i], *sel));
            last = *sel;
        }
    }
    changes
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Correct,
    Error,
    /// Wrong finger first, then the right one.
    Corrected,
    NoResponse,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Correct => "correct",
            Self::Error => "error",
            Self::Corrected => "corrected",
            Self::NoResponse => "no response",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrialOutcome {
    pub index: usize,
    pub trial: Trial,
    pub onset: f64,
    pub expected: Option<String>,
    /// Fingers that crossed the response threshold, in order of first crossing
    pub responses: Vec<String>,
    pub outcome: Outcome,
    /// Seconds from stimulus onset to the first response
    pub reaction_time: Option<f64>,
}

/// Score every trial presented during the run.
///
/// A trial's response window runs from its word onset to the next trial's
/// onset. A finger counts as pressed once the finger channel's similarity to
/// it reaches `threshold`.
pub fn trial_outcomes(
    data: &ProbeData,
    trials: &TrialSequence,
    schedule: &Schedule,
    vocab: &Vocabulary,
    threshold: f64,
) -> Vec<TrialOutcome> {
    let Some(finger) = data.series(PROBE_FINGER) else {
        return Vec::new();
    };
    let fingers: Vec<(&str, &SemanticPointer)> = ["INDEX", "MIDDLE"]
        .into_iter()
        .filter_map(|name| vocab.get(name).ok().map(|v| (name, v)))
        .collect();
    let duration = data.trange.last().copied().unwrap_or(0.0);

    (0..schedule.trials_in(duration))
        .map(|n| {
            let trial = trials.get(n as i64).clone();
            let (onset, _) = schedule.window(n, 0.0);
            let start = data.index_at(onset);
            let end = data.index_at(onset + schedule.period()).min(finger.len());

            let mut responses: Vec<String> = Vec::new();
            let mut reaction_time = None;
            for i in start..end {
                for (name, target) in &fingers {
                    if finger[i].dot(target) >= threshold && !responses.iter().any(|r| r == name) {
                        if responses.is_empty() {
                            reaction_time = Some(data.trange[i] - onset);
                        }
                        responses.push(name.to_string());
                    }
                }
            }

            let expected = trial.correct_finger().map(str::to_string);
            let outcome = classify(expected.as_deref(), &responses);
            TrialOutcome {
                index: n,
                trial,
                onset,
                expected,
                responses,
                outcome,
                reaction_time,
            }
        })
        .collect()
}

fn classify(expected: Option<&str>, responses: &[String]) -> Outcome {
    match (responses.first(), expected) {
        (None, _) => Outcome::NoResponse,
        (Some(first), Some(e)) if first == e => Outcome::Correct,
        (Some(_), Some(e)) if responses.iter().any(|r| r == e) => Outcome::Corrected,
        _ => Outcome::Error,
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionSummary {
    pub trials: usize,
    pub correct: usize,
    pub errors: usize,
    pub corrected: usize,
    pub no_response: usize,
    pub mean_reaction_time: Option<f64>,
}

impl ConditionSummary {
    fn from_outcomes<'a>(outcomes: impl Iterator<Item = &'a TrialOutcome>) -> Self {
        let mut s = Self::default();
        let mut rts = Vec::new();
        for o in outcomes {
            s.trials += 1;
            match o.outcome {
                Outcome::Correct => s.correct += 1,
                Outcome::Error => s.errors += 1,
                Outcome::Corrected => s.corrected += 1,
                Outcome::NoResponse => s.no_response += 1,
            }
            if let Some(rt) = o.reaction_time {
                rts.push(rt);
            }
        }
        if !rts.is_empty() {
            s.mean_reaction_time = Some(rts.iter().sum::<f64>() / rts.len() as f64);
        }
        s
    }

    /// Fraction of trials answered correctly on the first response.
    pub fn accuracy(&self) -> Option<f64> {
        (self.trials > 0).then(|| self.correct as f64 / self.trials as f64)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StroopSummary {
    pub congruent: ConditionSummary,
    pub incongruent: ConditionSummary,
}

impl StroopSummary {
    /// Incongruent minus congruent mean reaction time.
    pub fn interference(&self) -> Option<f64> {
        Some(self.incongruent.mean_reaction_time? - self.congruent.mean_reaction_time?)
    }
}

pub fn summarize(outcomes: &[TrialOutcome]) -> StroopSummary {
    StroopSummary {
        congruent: ConditionSummary::from_outcomes(
            outcomes.iter().filter(|o| o.trial.is_congruent()),
        ),
        incongruent: ConditionSummary::from_outcomes(
            outcomes.iter().filter(|o| !o.trial.is_congruent()),
        ),
    }
}
