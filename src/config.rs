//! Run configuration, loadable from JSON. Missing fields take their defaults.

use crate::algos::model_free::exploration::ExplorationSchedule;
use crate::common::defs::Continuous;
use crate::error::{check_discount, check_learning_rate, Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueIterationConfig {
    pub discount: Continuous,
    /// Stop once the largest per-sweep change is below this.
    pub tolerance: Continuous,
    pub max_iterations: usize,
}

impl Default for ValueIterationConfig {
    fn default() -> Self {
        Self {
            discount: 0.9,
            tolerance: 1e-8,
            max_iterations: 1000,
        }
    }
}

impl ValueIterationConfig {
    pub fn validate(&self) -> Result<()> {
        check_discount(self.discount)?;
        if !(self.tolerance.is_finite() && self.tolerance >= 0.) {
            return Err(Error::config(format!(
                "tolerance must be finite and non-negative, got {}",
                self.tolerance
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QLearningConfig {
    pub learning_rate: Continuous,
    pub discount: Continuous,
    pub exploration: ExplorationSchedule,
    pub episodes: usize,
    pub max_steps_per_episode: usize,
    /// Episodes between progress log lines; 0 disables them.
    pub report_every: usize,
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            discount: 0.9,
            exploration: ExplorationSchedule::default(),
            episodes: 2000,
            max_steps_per_episode: 100,
            report_every: 100,
        }
    }
}

impl QLearningConfig {
    pub fn validate(&self) -> Result<()> {
        check_learning_rate(self.learning_rate)?;
        check_discount(self.discount)?;
        self.exploration.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    pub episodes: usize,
    pub max_steps: usize,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            episodes: 100,
            max_steps: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seed for every random number generator of a run.
    pub seed: u64,
    pub value_iteration: ValueIterationConfig,
    pub q_learning: QLearningConfig,
    pub evaluation: EvaluationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: 2718,
            value_iteration: ValueIterationConfig::default(),
            q_learning: QLearningConfig::default(),
            evaluation: EvaluationConfig::default(),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.value_iteration.validate()?;
        self.q_learning.validate()?;
        if self.evaluation.episodes == 0 {
            return Err(Error::config("evaluation needs at least one episode"));
        }

        Ok(())
    }
}
