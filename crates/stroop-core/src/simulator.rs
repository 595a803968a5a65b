//! Fixed-step driver that advances a network and records its probes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::model::Network;
use crate::vector::SemanticPointer;

/// Everything recorded during a run. Step `i` happened at `trange[i]`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProbeData {
    pub dt: f64,
    pub trange: Vec<f64>,
    pub probes: BTreeMap<String, Vec<SemanticPointer>>,
    /// Index of the winning action per step
    pub selections: Vec<Option<usize>>,
}

impl ProbeData {
    pub fn len(&self) -> usize {
        self.trange.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trange.is_empty()
    }

    pub fn series(&self, probe: &str) -> Option<&[SemanticPointer]> {
        self.probes.get(probe).map(Vec::as_slice)
    }

    /// Index of the first step at or after `t`.
    pub fn index_at(&self, t: f64) -> usize {
        self.trange.partition_point(|&x| x < t - self.dt * 1e-6)
    }
}

pub struct Simulator<N: Network> {
    network: N,
    dt: f64,
    steps: u64,
    data: ProbeData,
}

impl<N: Network> Simulator<N> {
    pub fn new(network: N, dt: f64) -> Result<Self> {
        if !(dt > 0.0) {
            return Err(ModelError::InvalidParameter(format!(
                "dt must be positive (got {dt})"
            )));
        }
        let probes = network
            .probe_names()
            .iter()
            .map(|name| (name.to_string(), Vec::new()))
            .collect();
        Ok(Self {
            network,
            dt,
            steps: 0,
            data: ProbeData {
                dt,
                probes,
                ..Default::default()
            },
        })
    }

    pub fn time(&self) -> f64 {
        self.steps as f64 * self.dt
    }

    /// Advance by `duration` seconds, recording every probe after each step.
    /// The first recorded sample is at `dt`, not 0.
    pub fn run(&mut self, duration: f64) -> Result<()> {
        let n = (duration / self.dt).round().max(0.0) as u64;
        tracing::debug!(
            "simulating {:?} for {duration}s ({n} steps, dt={})",
            self.network.kind(),
            self.dt
        );
        self.data.trange.reserve(n as usize);
        for _ in 0..n {
            self.step()?;
        }
        tracing::debug!("simulation reached t={:.3}s", self.time());
        Ok(())
    }

    pub fn step(&mut self) -> Result<()> {
        self.steps += 1;
        let t = self.time();
        self.network.step(t, self.dt)?;

        self.data.trange.push(t);
        for (name, series) in self.data.probes.iter_mut() {
            if let Some(v) = self.network.probe(name) {
                series.push(v.clone());
            }
        }
        self.data
            .selections
            .push(self.network.selection().map(|s| s.index));
        Ok(())
    }

    /// Clear recorded data and network state; time restarts at 0.
    pub fn reset(&mut self) {
        self.network.reset();
        self.steps = 0;
        self.data.trange.clear();
        self.data.selections.clear();
        for series in self.data.probes.values_mut() {
            series.clear();
        }
    }

    pub fn network(&self) -> &N {
        &self.network
    }

    pub fn data(&self) -> &ProbeData {
        &self.data
    }

    pub fn into_data(self) -> ProbeData {
        self.data
    }
}
