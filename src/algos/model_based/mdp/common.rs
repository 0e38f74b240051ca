use super::Convergence;
use crate::common::{defs::*, utils::*};
use crate::error::{Error, Result};
use tracing::{debug, info, warn};

pub fn validate_transitions(transitions: &Transitions, n_s: usize, n_a: usize) -> Result<()> {
    for (&(s, a), ts) in transitions {
        if s >= n_s || a >= n_a {
            return Err(Error::contract(format!(
                "transition key ({s}, {a}) outside {n_s} states x {n_a} actions"
            )));
        }
        if let Some(t) = ts.iter().find(|t| t.next_state >= n_s) {
            return Err(Error::contract(format!(
                "({s}, {a}) leads to state {} but there are only {n_s} states",
                t.next_state
            )));
        }
        if let Some(t) = ts
            .iter()
            .find(|t| !t.probability.is_finite() || t.probability < 0. || !t.reward.is_finite())
        {
            return Err(Error::contract(format!(
                "({s}, {a}) has a malformed outcome {t:?}"
            )));
        }
        if !is_unit_mass(ts) {
            return Err(Error::contract(format!(
                "probabilities for ({s}, {a}) sum to {}",
                probability_mass(ts)
            )));
        }
    }

    Ok(())
}

/// Expected one-step backup `Σ p · (r + γ · V(s') · (1 - done))`.
pub fn backup(ts: &[Transition], gamma: Continuous, v: &[Continuous]) -> Continuous {
    ts.iter()
        .map(|t| {
            let future = if t.done { 0. } else { gamma * v[t.next_state] };
            t.probability * (t.reward + future)
        })
        .sum()
}

pub fn q_value(
    transitions: &Transitions,
    gamma: Continuous,
    v: &[Continuous],
    s: Discrete,
    a: Discrete,
) -> Option<Continuous> {
    transitions.get(&(s, a)).map(|ts| backup(ts, gamma, v))
}

/// Best admissible action and its backed-up value; lowest index wins ties.
pub fn greedy(
    transitions: &Transitions,
    n_a: usize,
    gamma: Continuous,
    v: &[Continuous],
    s: Discrete,
) -> Option<(Discrete, Continuous)> {
    (0..n_a)
        .filter_map(|a| q_value(transitions, gamma, v, s, a).map(|q| (a, q)))
        .fold(None, |best, (a, q)| match best {
            Some((_, b)) if q <= b => best,
            _ => Some((a, q)),
        })
}

/// One in-place Bellman optimality sweep. Returns `max_s |V_new(s) - V_old(s)|`.
/// States without admissible actions keep their value.
pub fn sweep(
    transitions: &Transitions,
    n_a: usize,
    gamma: Continuous,
    v: &mut [Continuous],
) -> Continuous {
    let mut delta: Continuous = 0.;
    for s in 0..v.len() {
        if let Some((_, q)) = greedy(transitions, n_a, gamma, v, s) {
            delta = delta.max((q - v[s]).abs());
            v[s] = q;
        }
    }

    delta
}

pub fn iterate(
    transitions: &Transitions,
    n_a: usize,
    gamma: Continuous,
    v: &mut [Continuous],
    theta: Continuous,
    max_iterations: usize,
) -> Convergence {
    let mut delta = Continuous::INFINITY;
    for i in 1..=max_iterations {
        delta = sweep(transitions, n_a, gamma, v);
        debug!(iteration = i, delta, "value sweep");
        if delta < theta {
            info!("Value iteration converged after {i} sweeps (delta {delta:e})");
            return Convergence {
                converged: true,
                iterations: i,
                delta,
            };
        }
    }

    warn!("Value iteration did not converge in {max_iterations} sweeps (delta {delta:e})");
    Convergence {
        converged: false,
        iterations: max_iterations,
        delta,
    }
}
