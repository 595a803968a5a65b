use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::analysis::{StroopSummary, TrialOutcome, summarize, trial_outcomes};
use crate::config::ModelConfig;
use crate::error::Result;
use crate::model::{self, Network};
use crate::simulator::{ProbeData, Simulator};
use crate::trial::TrialSequence;
use crate::vocabulary::Vocabulary;

/// A finished simulation with everything needed to analyse or export it.
pub struct RunResult {
    pub config: ModelConfig,
    pub vocab: Vocabulary,
    pub trials: TrialSequence,
    pub actions: Vec<String>,
    pub data: ProbeData,
    pub outcomes: Vec<TrialOutcome>,
    pub summary: StroopSummary,
}

/// Vocabulary and trial sequence drawn from `config.seed`.
/// The same seed always yields the same pair.
pub fn prepare(config: &ModelConfig) -> Result<(Vocabulary, TrialSequence)> {
    let mut rng = SmallRng::seed_from_u64(config.seed);
    let vocab = Vocabulary::stroop(config.dimensions, config.max_similarity, &mut rng)?;
    let trials =
        TrialSequence::random(config.trials, &config.word_pool, &config.color_pool, &mut rng)?;
    Ok((vocab, trials))
}

pub fn run(config: &ModelConfig) -> Result<RunResult> {
    config.validate()?;
    let (vocab, trials) = prepare(config)?;
    run_with(config, vocab, trials)
}

/// Simulate `config.duration` seconds with an explicit vocabulary and trials.
pub fn run_with(
    config: &ModelConfig,
    vocab: Vocabulary,
    trials: TrialSequence,
) -> Result<RunResult> {
    let network = model::build(config, vocab.clone(), trials.clone())?;
    let schedule = *network.schedule();
    let actions = network.action_names();

    let mut sim = Simulator::new(network, config.dt)?;
    sim.run(config.duration)?;
    let data = sim.into_data();

    let outcomes = trial_outcomes(&data, &trials, &schedule, &vocab, config.response_threshold);
    let summary = summarize(&outcomes);
    tracing::info!(
        "{} run: {} steps, {} trials scored",
        config.model.as_str(),
        data.len(),
        outcomes.len()
    );

    Ok(RunResult {
        config: config.clone(),
        vocab,
        trials,
        actions,
        data,
        outcomes,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelKind;

    #[test]
    fn test_prepare_is_reproducible() {
        let config = ModelConfig::defaults(ModelKind::Recurrent);
        let (v1, t1) = prepare(&config).unwrap();
        let (v2, t2) = prepare(&config).unwrap();
        assert_eq!(t1, t2);
        for key in v1.keys() {
            assert_eq!(v1.get(key).unwrap(), v2.get(key).unwrap());
        }
        assert_eq!(t1.len(), config.trials);
    }

    #[test]
    fn test_different_seeds_differ() {
        let mut a = ModelConfig::defaults(ModelKind::Recurrent);
        a.seed = 1;
        let mut b = a.clone();
        b.seed = 2;
        let (va, _) = prepare(&a).unwrap();
        let (vb, _) = prepare(&b).unwrap();
        assert_ne!(va.get("RED").unwrap(), vb.get("RED").unwrap());
    }

    #[test]
    fn test_short_run_scores_trials() {
        let mut config = ModelConfig::defaults(ModelKind::FeedForward);
        config.duration = 2.0;
        let run = run(&config).unwrap();
        assert_eq!(run.data.len(), 2000);
        assert_eq!(run.outcomes.len(), 2);
        assert_eq!(run.actions, vec!["INDEX", "MIDDLE", "NONE"]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = ModelConfig::defaults(ModelKind::FeedForward);
        config.duration = 0.0;
        assert!(run(&config).is_err());
    }
}
