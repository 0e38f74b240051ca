use super::{common::*, Convergence, Mdp, MdpSolver, ValueTable, DEFAULT_MAX_ITERATIONS};
use crate::common::defs::*;
use crate::error::{check_discount, check_spaces, Error, Result};
use std::rc::Rc;

/// Optimal state values by repeated in-place Bellman optimality backups,
/// starting from `V = 0`.
pub fn value_iteration(
    mdp: &dyn Mdp,
    gamma: Continuous,
    theta: Continuous,
    max_iterations: usize,
) -> Result<(ValueTable, Convergence)> {
    check_discount(gamma)?;
    check_theta(theta)?;
    check_spaces(mdp.n_s(), mdp.n_a())?;
    let transitions = mdp.transitions();
    validate_transitions(&transitions, mdp.n_s(), mdp.n_a())?;

    let mut v = vec![0.; mdp.n_s()];
    let convergence = iterate(&transitions, mdp.n_a(), gamma, &mut v, theta, max_iterations);

    Ok((v, convergence))
}

/// Greedy policy with respect to `v`. States without admissible actions map to action 0.
pub fn extract_policy(v: &[Continuous], mdp: &dyn Mdp, gamma: Continuous) -> Result<TabularPolicy> {
    check_discount(gamma)?;
    check_spaces(mdp.n_s(), mdp.n_a())?;
    if v.len() != mdp.n_s() {
        return Err(Error::config(format!(
            "value table has {} entries for {} states",
            v.len(),
            mdp.n_s()
        )));
    }

    let transitions = mdp.transitions();
    let actions = (0..mdp.n_s())
        .map(|s| {
            greedy(&transitions, mdp.n_a(), gamma, v, s)
                .map(|(a, _)| a)
                .unwrap_or(0)
        })
        .collect();

    Ok(TabularPolicy::new(actions))
}

fn check_theta(theta: Continuous) -> Result<()> {
    if theta.is_finite() && theta >= 0. {
        Ok(())
    } else {
        Err(Error::config(format!(
            "convergence tolerance must be finite and non-negative, got {theta}"
        )))
    }
}

#[derive(Clone)]
pub struct ValueIteration {
    mdp: Rc<dyn Mdp>,
    gamma: Continuous,
    v: ValueTable,
}

impl ValueIteration {
    pub fn new(mdp: Rc<dyn Mdp>, gamma: Continuous) -> Result<Self> {
        check_discount(gamma)?;
        check_spaces(mdp.n_s(), mdp.n_a())?;
        validate_transitions(&mdp.transitions(), mdp.n_s(), mdp.n_a())?;
        let v = vec![0.; mdp.n_s()];

        Ok(Self { mdp, gamma, v })
    }

    pub fn values(&self) -> &[Continuous] {
        &self.v
    }
}

impl MdpSolver<bool> for ValueIteration {
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
        greedy(&self.mdp.transitions(), self.mdp.n_a(), self.gamma, &self.v, s).map(|(a, _)| a)
    }

    fn exec(&mut self, theta: Continuous, max_iterations: Option<usize>) -> (bool, usize) {
        let c = iterate(
            &self.mdp.transitions(),
            self.mdp.n_a(),
            self.gamma,
            &mut self.v,
            theta,
            max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS),
        );

        (c.converged, c.iterations)
    }
}
