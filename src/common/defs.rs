use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Index of a discrete state or action.
pub type Discrete = usize;
pub type Continuous = f64;

/// One outcome of taking an action: `(probability, next_state, reward, done)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub probability: Continuous,
    pub next_state: Discrete,
    pub reward: Continuous,
    pub done: bool,
}

impl Transition {
    pub fn new(probability: Continuous, next_state: Discrete, reward: Continuous, done: bool) -> Self {
        Self {
            probability,
            next_state,
            reward,
            done,
        }
    }
}

/// Outcomes keyed by `(state, action)`. A missing key means the action is not
/// admissible in that state.
pub type Transitions = HashMap<(Discrete, Discrete), Vec<Transition>>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepInfo {
    pub next_state: Discrete,
    pub reward: Continuous,
    pub done: bool,
}

/// A single `(s, a, r, s', done)` step of an episode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeEvent {
    pub s: Discrete,
    pub a: Discrete,
    pub r: Continuous,
    pub s_next: Discrete,
    pub done: bool,
}

pub trait Policy {
    /// `None` when the policy has no entry for `s`.
    fn policy(&self, s: Discrete) -> Option<Discrete>;
}

/// Deterministic state -> action lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabularPolicy {
    actions: Vec<Discrete>,
}

impl TabularPolicy {
    pub fn new(actions: Vec<Discrete>) -> Self {
        Self { actions }
    }

    pub fn n_s(&self) -> usize {
        self.actions.len()
    }

    pub fn actions(&self) -> &[Discrete] {
        &self.actions
    }
}

impl Policy for TabularPolicy {
    fn policy(&self, s: Discrete) -> Option<Discrete> {
        self.actions.get(s).copied()
    }
}

impl From<Vec<Discrete>> for TabularPolicy {
    fn from(actions: Vec<Discrete>) -> Self {
        Self::new(actions)
    }
}
