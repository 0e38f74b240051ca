use crate::algos::model_based::mdp::{common::validate_transitions, Mdp};
use crate::algos::model_free::Environment;
use crate::common::defs::*;
use crate::error::{check_spaces, Error, Result};
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use std::rc::Rc;

pub trait Weighted {
    fn p(&self) -> f64;
}

impl Weighted for Transition {
    fn p(&self) -> f64 {
        self.probability
    }
}

/// Index of an item drawn in proportion to its weight. `None` when no weight is positive.
pub fn pick_next<T, R>(rng: &mut R, ts: &[T]) -> Option<usize>
where
    T: Weighted,
    R: Rng + ?Sized,
{
    let dist = WeightedIndex::new(ts.iter().map(|item| item.p())).ok()?;
    Some(dist.sample(rng))
}

/// Samples episodes from a known transition model. All randomness comes from
/// the injected `rng`, so a seeded generator gives reproducible episodes.
pub struct MdpSimulator<R> {
    mdp: Rc<dyn Mdp>,
    transitions: Rc<Transitions>,
    start: Discrete,
    s: Discrete,
    rng: R,
}

impl<R: Rng> MdpSimulator<R> {
    pub fn new(mdp: Rc<dyn Mdp>, start: Discrete, rng: R) -> Result<Self> {
        check_spaces(mdp.n_s(), mdp.n_a())?;
        let transitions = mdp.transitions();
        validate_transitions(&transitions, mdp.n_s(), mdp.n_a())?;
        if start >= mdp.n_s() {
            return Err(Error::config(format!(
                "start state {start} outside {} states",
                mdp.n_s()
            )));
        }

        Ok(Self {
            mdp,
            transitions,
            start,
            s: start,
            rng,
        })
    }

    pub fn state(&self) -> Discrete {
        self.s
    }
}

impl<R: Rng> Environment for MdpSimulator<R> {
    fn n_s(&self) -> usize {
        self.mdp.n_s()
    }

    fn n_a(&self) -> usize {
        self.mdp.n_a()
    }

    fn reset(&mut self) -> Discrete {
        self.s = self.start;
        self.s
    }

    /// Inadmissible actions end the episode in place with no reward.
    fn step(&mut self, a: Discrete) -> StepInfo {
        let next = self
            .transitions
            .get(&(self.s, a))
            .and_then(|ts| pick_next(&mut self.rng, ts).map(|i| &ts[i]));

        let info = match next {
            Some(t) => StepInfo {
                next_state: t.next_state,
                reward: t.reward,
                done: t.done,
            },
            None => StepInfo {
                next_state: self.s,
                reward: 0.,
                done: true,
            },
        };
        self.s = info.next_state;

        info
    }
}
