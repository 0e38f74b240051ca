use super::{common::*, Mdp, MdpSolver, ValueTable, DEFAULT_MAX_ITERATIONS};
use crate::common::defs::*;
use crate::error::{check_discount, check_spaces, Result};
use std::rc::Rc;
use tracing::{debug, info, warn};

/// Minimum gain before improvement switches away from the current action.
const IMPROVEMENT_MARGIN: Continuous = 1e-10;

/// Policy iteration - Sutton & Barto 2018, section 4.3.
#[derive(Clone)]
pub struct PolicyIteration {
    mdp: Rc<dyn Mdp>,
    gamma: Continuous,
    v: ValueTable,
    pi: Vec<Option<Discrete>>,
}

impl PolicyIteration {
    pub fn new(mdp: Rc<dyn Mdp>, gamma: Continuous) -> Result<Self> {
        check_discount(gamma)?;
        check_spaces(mdp.n_s(), mdp.n_a())?;
        let transitions = mdp.transitions();
        validate_transitions(&transitions, mdp.n_s(), mdp.n_a())?;

        let pi = (0..mdp.n_s())
            .map(|s| (0..mdp.n_a()).find(|&a| transitions.contains_key(&(s, a))))
            .collect();
        let v = vec![0.; mdp.n_s()];

        Ok(Self { mdp, gamma, v, pi })
    }

    pub fn values(&self) -> &[Continuous] {
        &self.v
    }

    /// Iterative evaluation of the current policy. Returns the final sweep delta.
    fn evaluate(&mut self, transitions: &Transitions, theta: Continuous, max_sweeps: usize) -> Continuous {
        let mut delta = Continuous::INFINITY;
        for _ in 0..max_sweeps {
            delta = 0.;
            for s in 0..self.v.len() {
                let Some(a) = self.pi[s] else { continue };
                if let Some(q) = q_value(transitions, self.gamma, &self.v, s, a) {
                    delta = delta.max((q - self.v[s]).abs());
                    self.v[s] = q;
                }
            }
            if delta < theta {
                break;
            }
        }

        delta
    }

    /// Greedy improvement. An action only changes when another one is better by
    /// more than [`IMPROVEMENT_MARGIN`].
    fn improve(&mut self, transitions: &Transitions) -> bool {
        let mut stable = true;
        for s in 0..self.v.len() {
            let Some(old) = self.pi[s] else { continue };
            let Some((best, q_best)) = greedy(transitions, self.mdp.n_a(), self.gamma, &self.v, s)
            else {
                continue;
            };
            let q_old = q_value(transitions, self.gamma, &self.v, s, old).unwrap_or(Continuous::MIN);
            if best != old && q_best > q_old + IMPROVEMENT_MARGIN {
                self.pi[s] = Some(best);
                stable = false;
            }
        }

        stable
    }
}

impl MdpSolver<bool> for PolicyIteration {
    fn n_s(&self) -> usize {
        self.v.len()
    }

    fn v_star(&self, s: Discrete) -> Continuous {
        self.v[s]
    }

    fn q_star(&self, s: Discrete, a: Discrete) -> Option<Continuous> {
        q_value(&self.mdp.transitions(), self.gamma, &self.v, s, a)
    }

    fn pi_star(&self, s: Discrete) -> Option<Discrete> {
        self.pi[s]
    }

    fn exec(&mut self, theta: Continuous, max_iterations: Option<usize>) -> (bool, usize) {
        let max_iterations = max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS);
        let transitions = self.mdp.transitions();
        for i in 1..=max_iterations {
            let delta = self.evaluate(&transitions, theta, max_iterations);
            let stable = self.improve(&transitions);
            debug!(iteration = i, delta, stable, "policy iteration round");
            if stable {
                info!("Policy iteration stable after {i} rounds");
                return (true, i);
            }
        }

        warn!("Policy iteration not stable after {max_iterations} rounds");
        (false, max_iterations)
    }
}
