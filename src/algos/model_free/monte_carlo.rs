use super::{evaluation::rollout, Environment};
use crate::algos::model_based::mdp::ValueTable;
use crate::common::defs::*;
use crate::error::{check_discount, Error, Result};
use std::iter::zip;

pub trait EpisodeGenerator {
    fn generate(&mut self, n: usize) -> Result<Vec<Vec<EpisodeEvent>>>;
}

/// Episodes produced by following a fixed policy in an environment.
pub struct PolicyRollouts<'a, E: ?Sized, P: ?Sized> {
    pub env: &'a mut E,
    pub policy: &'a P,
    pub max_steps: usize,
}

impl<'a, E, P> EpisodeGenerator for PolicyRollouts<'a, E, P>
where
    E: Environment + ?Sized,
    P: Policy + ?Sized,
{
    fn generate(&mut self, n: usize) -> Result<Vec<Vec<EpisodeEvent>>> {
        (0..n)
            .map(|_| rollout(&mut *self.env, self.policy, self.max_steps))
            .collect()
    }
}

/// Ref: https://youtu.be/P0ZvxeQqv0A?si=RLKdOUTNEfKXE63C
pub fn mc_first_visit(
    ep_gen: &mut dyn EpisodeGenerator,
    gamma: Continuous,
    n_s: usize,
    n_ep: usize,
) -> Result<ValueTable> {
    mc_core(ep_gen, gamma, n_s, n_ep, is_first_visit)
}

/// Ref: https://youtu.be/P0ZvxeQqv0A?si=RLKdOUTNEfKXE63C
pub fn mc_every_visit(
    ep_gen: &mut dyn EpisodeGenerator,
    gamma: Continuous,
    n_s: usize,
    n_ep: usize,
) -> Result<ValueTable> {
    mc_core(ep_gen, gamma, n_s, n_ep, |_, _| true)
}

fn mc_core(
    ep_gen: &mut dyn EpisodeGenerator,
    gamma: Continuous,
    n_s: usize,
    n_ep: usize,
    counts: fn(&[EpisodeEvent], usize) -> bool,
) -> Result<ValueTable> {
    check_discount(gamma)?;
    let returns = &mut vec![0 as Continuous; n_s];
    let visits = &mut vec![0usize; n_s];

    for ep in ep_gen.generate(n_ep)? {
        if let Some(e) = ep.iter().find(|e| e.s >= n_s) {
            return Err(Error::contract(format!(
                "episode visits state {} but there are only {n_s} states",
                e.s
            )));
        }

        let mut g = 0.;
        for t in (0..ep.len()).rev() {
            g = gamma * g + ep[t].r;
            if counts(&ep, t) {
                returns[ep[t].s] += g;
                visits[ep[t].s] += 1;
            }
        }
    }

    Ok(zip(returns.iter(), visits.iter())
        .map(|(&r, &v)| if v == 0 { 0. } else { r / v as Continuous })
        .collect())
}

fn is_first_visit(ep: &[EpisodeEvent], t: usize) -> bool {
    !ep[..t].iter().any(|e| e.s == ep[t].s)
}
