use super::{check_state, check_step, exploration::choose_action, Environment};
use crate::common::{defs::*, utils::argmax};
use crate::config::QLearningConfig;
use crate::error::{check_spaces, Error, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Action-value estimates, row-major by state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawQTable")]
pub struct QTable {
    n_s: usize,
    n_a: usize,
    q: Vec<Continuous>,
}

#[derive(Deserialize)]
struct RawQTable {
    n_s: usize,
    n_a: usize,
    q: Vec<Continuous>,
}

impl TryFrom<RawQTable> for QTable {
    type Error = Error;

    fn try_from(raw: RawQTable) -> Result<Self> {
        let RawQTable { n_s, n_a, q } = raw;
        check_spaces(n_s, n_a)?;
        if n_s.checked_mul(n_a) != Some(q.len()) {
            return Err(Error::Parse(format!(
                "q-table holds {} values, expected {n_s} x {n_a}",
                q.len()
            )));
        }
        Ok(Self { n_s, n_a, q })
    }
}

impl QTable {
    pub fn new(n_s: usize, n_a: usize) -> Self {
        Self {
            n_s,
            n_a,
            q: vec![0.; n_s * n_a],
        }
    }

    pub fn n_s(&self) -> usize {
        self.n_s
    }

    pub fn n_a(&self) -> usize {
        self.n_a
    }

    pub fn row(&self, s: Discrete) -> &[Continuous] {
        &self.q[s * self.n_a..(s + 1) * self.n_a]
    }

    pub fn get(&self, s: Discrete, a: Discrete) -> Continuous {
        self.q[s * self.n_a + a]
    }

    pub fn set(&mut self, s: Discrete, a: Discrete, value: Continuous) {
        self.q[s * self.n_a + a] = value;
    }

    pub fn max_value(&self, s: Discrete) -> Continuous {
        self.row(s)
            .iter()
            .copied()
            .fold(Continuous::NEG_INFINITY, Continuous::max)
    }

    pub fn greedy_action(&self, s: Discrete) -> Discrete {
        argmax(self.row(s)).unwrap_or(0)
    }

    /// `Q(s,a) ← Q(s,a) + α (r + γ max_a' Q(s',a') (1 - done) − Q(s,a))`.
    /// Returns the temporal-difference error.
    pub fn update(
        &mut self,
        event: &EpisodeEvent,
        alpha: Continuous,
        gamma: Continuous,
    ) -> Continuous {
        let future = if event.done {
            0.
        } else {
            gamma * self.max_value(event.s_next)
        };
        let td = event.r + future - self.get(event.s, event.a);
        self.q[event.s * self.n_a + event.a] += alpha * td;

        td
    }

    pub fn policy(&self) -> TabularPolicy {
        TabularPolicy::new((0..self.n_s).map(|s| self.greedy_action(s)).collect())
    }
}

#[derive(Debug, Clone)]
pub struct QLearningOutcome {
    pub policy: TabularPolicy,
    pub q_table: QTable,
    /// Undiscounted reward collected in each training episode.
    pub rewards: Vec<Continuous>,
    /// Steps taken in each training episode.
    pub steps: Vec<usize>,
}

/// Tabular Q-learning with epsilon-greedy exploration. Episodes that do not
/// terminate are cut at `max_steps_per_episode`.
pub fn q_learning<E, R>(env: &mut E, config: &QLearningConfig, rng: &mut R) -> Result<QLearningOutcome>
where
    E: Environment + ?Sized,
    R: Rng + ?Sized,
{
    config.validate()?;
    let (n_s, n_a) = (env.n_s(), env.n_a());
    check_spaces(n_s, n_a)?;

    let mut q = QTable::new(n_s, n_a);
    let mut rewards = Vec::with_capacity(config.episodes);
    let mut steps = Vec::with_capacity(config.episodes);
    let mut truncated = 0;

    for ep in 0..config.episodes {
        let epsilon = config.exploration.epsilon(ep);
        let mut s = check_state(env.reset(), n_s)?;
        let mut total = 0.;
        let mut t = 0;
        let mut done = false;
        while t < config.max_steps_per_episode {
            let a = choose_action(q.row(s), epsilon, n_a, rng)?;
            let info = check_step(env.step(a), n_s)?;
            let event = EpisodeEvent {
                s,
                a,
                r: info.reward,
                s_next: info.next_state,
                done: info.done,
            };
            q.update(&event, config.learning_rate, config.discount);

            total += info.reward;
            t += 1;
            if info.done {
                done = true;
                break;
            }
            s = info.next_state;
        }

        if !done {
            truncated += 1;
        }
        rewards.push(total);
        steps.push(t);

        if config.report_every > 0 && (ep + 1) % config.report_every == 0 {
            let window = &rewards[rewards.len().saturating_sub(config.report_every)..];
            let mean = window.iter().sum::<Continuous>() / window.len() as Continuous;
            debug!(episode = ep + 1, epsilon, mean_reward = mean, "q-learning progress");
        }
    }

    if config.episodes > 0 && truncated == config.episodes {
        warn!("All {truncated} episodes hit the step limit; the environment never terminated");
    }
    info!(
        "Q-learning finished {} episodes ({} truncated)",
        config.episodes, truncated
    );

    Ok(QLearningOutcome {
        policy: q.policy(),
        q_table: q,
        rewards,
        steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algos::model_free::exploration::ExplorationSchedule;
    use crate::error::Error;
    use float_eq::*;
    use rand::prelude::*;

    /// Two-armed bandit in one state: arm 1 pays 1, arm 0 pays 0.
    struct Bandit;

    impl Environment for Bandit {
        fn n_s(&self) -> usize {
            1
        }

        fn n_a(&self) -> usize {
            2
        }

        fn reset(&mut self) -> Discrete {
            0
        }

        fn step(&mut self, a: Discrete) -> StepInfo {
            StepInfo {
                next_state: 0,
                reward: a as Continuous,
                done: true,
            }
        }
    }

    /// Reports a state it does not have.
    struct Liar;

    impl Environment for Liar {
        fn n_s(&self) -> usize {
            2
        }

        fn n_a(&self) -> usize {
            1
        }

        fn reset(&mut self) -> Discrete {
            0
        }

        fn step(&mut self, _a: Discrete) -> StepInfo {
            StepInfo {
                next_state: 5,
                reward: 0.,
                done: false,
            }
        }
    }

    fn config(episodes: usize, epsilon: Continuous) -> QLearningConfig {
        QLearningConfig {
            learning_rate: 0.5,
            discount: 0.9,
            exploration: ExplorationSchedule::Constant { epsilon },
            episodes,
            max_steps_per_episode: 10,
            report_every: 0,
        }
    }

    #[test]
    fn update_follows_the_td_rule() {
        let q = &mut QTable::new(2, 2);
        q.set(1, 0, 2.);
        q.set(1, 1, 4.);
        let event = EpisodeEvent {
            s: 0,
            a: 1,
            r: 1.,
            s_next: 1,
            done: false,
        };
        let td = q.update(&event, 0.5, 0.9);
        assert_float_eq!(td, 1. + 0.9 * 4., abs <= 1e-12);
        assert_float_eq!(q.get(0, 1), 0.5 * 4.6, abs <= 1e-12);
    }

    #[test]
    fn terminal_update_ignores_next_row() {
        let q = &mut QTable::new(2, 1);
        q.set(1, 0, 100.);
        let event = EpisodeEvent {
            s: 0,
            a: 0,
            r: 1.,
            s_next: 1,
            done: true,
        };
        q.update(&event, 1., 0.9);
        assert_float_eq!(q.get(0, 0), 1., abs <= 1e-12);
    }

    #[test]
    fn bandit_learns_the_paying_arm() {
        let rng = &mut StdRng::seed_from_u64(2718);
        let out = q_learning(&mut Bandit, &config(200, 0.3), rng).unwrap();
        assert_eq!(out.policy.actions(), &[1]);
        assert_eq!(out.rewards.len(), 200);
        assert!(out.steps.iter().all(|&n| n == 1));
        assert!(out.q_table.get(0, 1) > 0.99);
    }

    #[test]
    fn fixed_seed_is_reproducible() {
        let a = q_learning(&mut Bandit, &config(50, 0.5), &mut StdRng::seed_from_u64(7)).unwrap();
        let b = q_learning(&mut Bandit, &config(50, 0.5), &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(a.q_table, b.q_table);
        assert_eq!(a.rewards, b.rewards);
    }

    #[test]
    fn out_of_range_state_is_surfaced() {
        let rng = &mut StdRng::seed_from_u64(0);
        let e = q_learning(&mut Liar, &config(1, 0.), rng).unwrap_err();
        assert!(matches!(e, Error::ContractViolation(_)));
    }

    #[test]
    fn rejects_bad_config() {
        let rng = &mut StdRng::seed_from_u64(0);
        let mut c = config(1, 0.);
        c.discount = 0.;
        assert!(matches!(
            q_learning(&mut Bandit, &c, rng),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn qtable_roundtrips_through_json() {
        let q = &mut QTable::new(2, 3);
        q.set(1, 2, 0.25);
        let json = serde_json::to_string(q).unwrap();
        let back: QTable = serde_json::from_str(&json).unwrap();
        assert_eq!(&back, &*q);
    }

    #[test]
    fn rejects_mis_sized_checkpoint() {
        let short = serde_json::from_str::<QTable>(r#"{"n_s":4,"n_a":2,"q":[0.0]}"#);
        assert!(short.is_err());
        let empty = serde_json::from_str::<QTable>(r#"{"n_s":0,"n_a":2,"q":[]}"#);
        assert!(empty.is_err());
        let ok = serde_json::from_str::<QTable>(r#"{"n_s":1,"n_a":2,"q":[0.5,1.0]}"#).unwrap();
        assert_eq!(ok.greedy_action(0), 1);
    }
}
