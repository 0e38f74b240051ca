extern crate itertools;
extern crate rand;
extern crate serde;
extern crate serde_json;
extern crate tracing;

pub mod algos;
pub mod common;
pub mod config;
pub mod envs;
pub mod error;
pub mod log;

pub use algos::model_based::mdp::{
    extract_policy, pi::PolicyIteration, value_iteration, vi::ValueIteration, Convergence, Mdp,
    MdpSolver, MdpSolverPolicy, TransitionModel, ValueTable,
};
pub use algos::model_free::{
    evaluation::{evaluate_policy, rollout},
    exploration::{choose_action, ExplorationSchedule},
    monte_carlo::{mc_every_visit, mc_first_visit},
    q_learning::{q_learning, QLearningOutcome, QTable},
    Environment,
};
pub use common::defs::*;
pub use config::*;
pub use error::{Error, Result};
