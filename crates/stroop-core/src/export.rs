//! JSON export of a run for external plotting.
//!
//! Probes are written as raw vectors and as similarity against every
//! vocabulary key (in `keys` order), one row per recorded step.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analysis::{TrialOutcome, similarity_series};
use crate::config::ModelKind;
use crate::error::Result;
use crate::experiment::RunResult;
use crate::trial::Trial;

pub const CURRENT_VERSION: &str = "1";

#[derive(Serialize, Deserialize, Debug)]
pub struct RunExport {
    pub version: String,
    pub model: ModelKind,
    pub dimensions: usize,
    pub dt: f64,
    pub keys: Vec<String>,
    pub actions: Vec<String>,
    pub trials: Vec<Trial>,
    pub trange: Vec<f64>,
    pub probes: BTreeMap<String, Vec<Vec<f64>>>,
    pub similarities: BTreeMap<String, Vec<Vec<f64>>>,
    pub selections: Vec<Option<usize>>,
    pub outcomes: Vec<TrialOutcome>,
}

impl RunExport {
    pub fn from_run(run: &RunResult) -> Self {
        let data = &run.data;
        let probes = data
            .probes
            .iter()
            .map(|(name, series)| (name.clone(), series.iter().map(|v| v.to_vec()).collect()))
            .collect();
        let similarities = data
            .probes
            .iter()
            .map(|(name, series)| (name.clone(), similarity_series(series, &run.vocab)))
            .collect();

        Self {
            version: CURRENT_VERSION.to_string(),
            model: run.config.model,
            dimensions: run.vocab.dimensions(),
            dt: data.dt,
            keys: run.vocab.keys().to_vec(),
            actions: run.actions.clone(),
            trials: run.trials.iter().cloned().collect(),
            trange: data.trange.clone(),
            probes,
            similarities,
            selections: data.selections.clone(),
            outcomes: run.outcomes.clone(),
        }
    }
}

pub fn export_json(run: &RunResult) -> Result<String> {
    Ok(serde_json::to_string(&RunExport::from_run(run))?)
}

pub fn import_json(json: &str) -> Result<RunExport> {
    Ok(serde_json::from_str(json)?)
}
