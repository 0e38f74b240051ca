pub mod common;
pub mod pi;
pub mod vi;

pub use vi::{extract_policy, value_iteration};

use crate::common::defs::*;
use crate::error::{check_spaces, Result};
use std::rc::Rc;

/// State-value estimate, one entry per state.
pub type ValueTable = Vec<Continuous>;

/// Markov Decision Process - Sutton & Barto 2018.
pub trait Mdp {
    fn n_s(&self) -> usize;

    fn n_a(&self) -> usize;

    fn transitions(&self) -> Rc<Transitions>;
}

pub trait MdpSolver<T> {
    fn n_s(&self) -> usize;

    fn v_star(&self, s: Discrete) -> Continuous;

    fn q_star(&self, s: Discrete, a: Discrete) -> Option<Continuous>;

    /// `None` for states without admissible actions.
    fn pi_star(&self, s: Discrete) -> Option<Discrete>;

    /// Runs until the largest per-sweep change drops below `theta` or
    /// `max_iterations` (default [`DEFAULT_MAX_ITERATIONS`]) is exhausted.
    fn exec(&mut self, theta: Continuous, max_iterations: Option<usize>) -> (T, usize);

    /// Snapshot of `pi_star` for every state; absorbing states map to action 0.
    fn tabular_policy(&self) -> TabularPolicy {
        TabularPolicy::new(
            (0..self.n_s())
                .map(|s| self.pi_star(s).unwrap_or(0))
                .collect(),
        )
    }
}

pub const DEFAULT_MAX_ITERATIONS: usize = 1000;

pub struct MdpSolverPolicy<T> {
    pub mdp_solver: Rc<dyn MdpSolver<T>>,
}

impl<T> Policy for MdpSolverPolicy<T> {
    fn policy(&self, s: Discrete) -> Option<Discrete> {
        if s < self.mdp_solver.n_s() {
            Some(self.mdp_solver.pi_star(s).unwrap_or(0))
        } else {
            None
        }
    }
}

/// How a fixed-point iteration ended. Not converging is not an error; the
/// accompanying values are the best estimate reached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Convergence {
    pub converged: bool,
    pub iterations: usize,
    pub delta: Continuous,
}

/// A validated, immutable transition table.
#[derive(Debug, Clone)]
pub struct TransitionModel {
    n_s: usize,
    n_a: usize,
    transitions: Rc<Transitions>,
}

impl TransitionModel {
    pub fn new(n_s: usize, n_a: usize, transitions: Transitions) -> Result<Self> {
        check_spaces(n_s, n_a)?;
        common::validate_transitions(&transitions, n_s, n_a)?;

        Ok(Self {
            n_s,
            n_a,
            transitions: Rc::new(transitions),
        })
    }
}

impl Mdp for TransitionModel {
    fn n_s(&self) -> usize {
        self.n_s
    }

    fn n_a(&self) -> usize {
        self.n_a
    }

    fn transitions(&self) -> Rc<Transitions> {
        Rc::clone(&self.transitions)
    }
}
