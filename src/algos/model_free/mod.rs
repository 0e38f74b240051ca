pub mod evaluation;
pub mod exploration;
pub mod monte_carlo;
pub mod q_learning;

use crate::common::defs::*;
use crate::error::{Error, Result};

/// Episodic environment with discrete states and actions.
pub trait Environment {
    fn n_s(&self) -> usize;

    fn n_a(&self) -> usize;

    /// Starts a new episode and returns the initial state.
    fn reset(&mut self) -> Discrete;

    fn step(&mut self, a: Discrete) -> StepInfo;
}

pub(crate) fn check_state(s: Discrete, n_s: usize) -> Result<Discrete> {
    if s < n_s {
        Ok(s)
    } else {
        Err(Error::contract(format!(
            "environment returned state {s} but declares {n_s} states"
        )))
    }
}

pub(crate) fn check_step(info: StepInfo, n_s: usize) -> Result<StepInfo> {
    check_state(info.next_state, n_s)?;
    if !info.reward.is_finite() {
        return Err(Error::contract(format!(
            "environment returned non-finite reward {}",
            info.reward
        )));
    }

    Ok(info)
}
