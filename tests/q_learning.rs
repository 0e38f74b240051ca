extern crate float_eq;
extern crate rand;
extern crate tabular_rl;
mod common;

use assertor::*;
use common::*;
use float_eq::*;
use rand::prelude::*;
use std::rc::Rc;
use tabular_rl::envs::grid_world::GridWorld;
use tabular_rl::log::init_test_logging;
use tabular_rl::*;

#[test]
fn line_world_is_learned_with_decaying_exploration() {
    init_test_logging();
    let config = QLearningConfig {
        learning_rate: 0.5,
        discount: 0.9,
        exploration: ExplorationSchedule::Linear {
            start: 1.,
            end: 0.,
            episodes: 1500,
        },
        episodes: 2000,
        max_steps_per_episode: 100,
        report_every: 500,
    };

    let rng = &mut StdRng::seed_from_u64(2718);
    let env = &mut LineWorld::new();
    let out = q_learning(env, &config, rng).unwrap();

    assert_that!(out.rewards.len()).is_equal_to(2000);
    assert_that!(out.policy.actions()[..3].to_vec()).is_equal_to(vec![1, 1, 1]);

    let mean = evaluate_policy(env, &out.policy, 100, 100).unwrap();
    assert!(mean >= 0.95, "mean reward {mean}");

    let tail = &out.rewards[1900..];
    assert_float_eq!(tail.iter().sum::<f64>() / tail.len() as f64, 1., abs <= 1e-12);
    assert!(out.steps[1900..].iter().all(|&n| n == 3));
}

#[test]
fn non_terminating_environment_is_truncated() {
    let config = QLearningConfig {
        episodes: 3,
        max_steps_per_episode: 7,
        report_every: 0,
        ..Default::default()
    };

    let env = &mut Treadmill::default();
    let out = q_learning(env, &config, &mut StdRng::seed_from_u64(1)).unwrap();
    assert_that!(out.steps.clone()).is_equal_to(vec![7, 7, 7]);
    assert_that!(env.steps).is_equal_to(21);
    assert_that!(env.resets).is_equal_to(3);

    let mean = evaluate_policy(env, &out.policy, 4, 5).unwrap();
    assert_float_eq!(mean, 0., abs <= 0.);
    assert_that!(env.steps).is_equal_to(21 + 20);
    assert_that!(env.resets).is_equal_to(3 + 4);
}

#[test]
fn deterministic_lake_is_learned() {
    let grid = GridWorld::frozen_lake_4x4(false).unwrap();
    let config = QLearningConfig {
        learning_rate: 0.5,
        discount: 0.9,
        exploration: ExplorationSchedule::Exponential {
            start: 1.,
            end: 0.05,
            decay: 0.999,
        },
        episodes: 5000,
        max_steps_per_episode: 100,
        report_every: 0,
    };

    let env = &mut grid.environment(StdRng::seed_from_u64(2718)).unwrap();
    let out = q_learning(env, &config, &mut StdRng::seed_from_u64(3141)).unwrap();

    let mean = evaluate_policy(env, &out.policy, 100, 100).unwrap();
    assert!(mean >= 0.95, "mean reward {mean}\n{}", grid.render_policy(&out.policy));
}

#[test]
fn golf_simulation_learns_to_putt() {
    let golf = TransitionModel::new(
        3,
        3,
        Transitions::from([
            (
                (0, 0),
                vec![
                    Transition::new(0.9, 1, 0., false),
                    Transition::new(0.1, 0, 0., false),
                ],
            ),
            (
                (1, 1),
                vec![
                    Transition::new(0.9, 0, 0., false),
                    Transition::new(0.1, 1, 0., false),
                ],
            ),
            (
                (1, 2),
                vec![
                    Transition::new(0.9, 2, 10., true),
                    Transition::new(0.1, 1, 0., false),
                ],
            ),
        ]),
    )
    .unwrap();

    let config = QLearningConfig {
        learning_rate: 0.1,
        discount: 0.9,
        exploration: ExplorationSchedule::Constant { epsilon: 0.2 },
        episodes: 3000,
        max_steps_per_episode: 50,
        report_every: 0,
    };
    let rng = StdRng::seed_from_u64(5);
    let env = &mut envs::simulator::MdpSimulator::new(Rc::new(golf), 0, rng).unwrap();
    let out = q_learning(env, &config, &mut StdRng::seed_from_u64(6)).unwrap();

    assert_eq!(out.policy.policy(0), Some(0));
    assert_eq!(out.policy.policy(1), Some(2));
    assert!(out.q_table.get(1, 2) > out.q_table.get(1, 1));
}
