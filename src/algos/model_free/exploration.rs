use crate::common::{defs::*, utils::argmax};
use crate::error::{check_epsilon, Error, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Epsilon-greedy: a uniformly random action with probability `epsilon`,
/// otherwise the greedy action with the lowest index among ties.
pub fn choose_action<R: Rng + ?Sized>(
    q_row: &[Continuous],
    epsilon: Continuous,
    n_a: usize,
    rng: &mut R,
) -> Result<Discrete> {
    check_epsilon(epsilon)?;
    if n_a == 0 || q_row.len() != n_a {
        return Err(Error::config(format!(
            "q row has {} entries for {n_a} actions",
            q_row.len()
        )));
    }

    if epsilon > 0. && rng.gen::<Continuous>() < epsilon {
        Ok(rng.gen_range(0..n_a))
    } else {
        Ok(argmax(q_row).unwrap_or(0))
    }
}

/// Exploration rate as a function of the episode index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExplorationSchedule {
    Constant {
        epsilon: Continuous,
    },
    /// Straight line from `start` to `end` over `episodes`, then flat.
    Linear {
        start: Continuous,
        end: Continuous,
        episodes: usize,
    },
    /// `end + (start - end) * decay^episode`.
    Exponential {
        start: Continuous,
        end: Continuous,
        decay: Continuous,
    },
}

impl Default for ExplorationSchedule {
    fn default() -> Self {
        ExplorationSchedule::Constant { epsilon: 0.1 }
    }
}

impl ExplorationSchedule {
    pub fn epsilon(&self, episode: usize) -> Continuous {
        match *self {
            ExplorationSchedule::Constant { epsilon } => epsilon,
            ExplorationSchedule::Linear {
                start,
                end,
                episodes,
            } => {
                if episodes == 0 {
                    return end;
                }
                let t = (episode as Continuous / episodes as Continuous).min(1.);
                start + (end - start) * t
            }
            ExplorationSchedule::Exponential { start, end, decay } => {
                let exp = i32::try_from(episode).unwrap_or(i32::MAX);
                end + (start - end) * decay.powi(exp)
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        match *self {
            ExplorationSchedule::Constant { epsilon } => check_epsilon(epsilon),
            ExplorationSchedule::Linear { start, end, .. } => {
                check_epsilon(start)?;
                check_epsilon(end)
            }
            ExplorationSchedule::Exponential { start, end, decay } => {
                check_epsilon(start)?;
                check_epsilon(end)?;
                if decay > 0. && decay <= 1. {
                    Ok(())
                } else {
                    Err(Error::config(format!("decay must be in (0, 1], got {decay}")))
                }
            }
        }
    }
}
