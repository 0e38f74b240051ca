extern crate rand;
extern crate tabular_rl;

use rand::prelude::*;
use tabular_rl::envs::grid_world::GridWorld;
use tabular_rl::log::init_logging;
use tabular_rl::*;

fn main() -> Result<()> {
    init_logging();
    let config = match std::env::args().nth(1) {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };

    let grid = GridWorld::frozen_lake_4x4(true)?;
    let vic = &config.value_iteration;
    let (v, c) = value_iteration(&grid, vic.discount, vic.tolerance, vic.max_iterations)?;
    println!(
        "Theta: {}, Converged: {}, Number of iterations: {}",
        vic.tolerance, c.converged, c.iterations
    );
    println!("{v:?}");

    let pi = extract_policy(&v, &grid, vic.discount)?;
    println!("{}\n", grid.render_policy(&pi));

    let env = &mut grid.environment(StdRng::seed_from_u64(config.seed))?;
    let evc = &config.evaluation;
    let mean = evaluate_policy(env, &pi, evc.episodes, evc.max_steps)?;
    println!("Value iteration policy: mean reward {mean:.3}");

    let rng = &mut StdRng::seed_from_u64(config.seed.wrapping_add(1));
    let out = q_learning(env, &config.q_learning, rng)?;
    println!("{}\n", grid.render_policy(&out.policy));
    let mean = evaluate_policy(env, &out.policy, evc.episodes, evc.max_steps)?;
    println!("Q-learning policy: mean reward {mean:.3}");

    Ok(())
}
