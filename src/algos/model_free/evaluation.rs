use super::{check_state, check_step, Environment};
use crate::common::defs::*;
use crate::error::{Error, Result};

/// Plays one episode under `policy`, handing every step to `on_step`.
/// Returns `true` if the episode terminated before `max_steps`.
fn play<E, P, F>(env: &mut E, policy: &P, max_steps: usize, mut on_step: F) -> Result<bool>
where
    E: Environment + ?Sized,
    P: Policy + ?Sized,
    F: FnMut(EpisodeEvent),
{
    let (n_s, n_a) = (env.n_s(), env.n_a());
    let mut s = check_state(env.reset(), n_s)?;
    for _ in 0..max_steps {
        let a = policy.policy(s).ok_or_else(|| {
            Error::config(format!(
                "policy has no action for state {s} of an environment with {n_s} states"
            ))
        })?;
        if a >= n_a {
            return Err(Error::config(format!(
                "policy chose action {a} in state {s} but there are only {n_a} actions"
            )));
        }
        let info = check_step(env.step(a), n_s)?;
        on_step(EpisodeEvent {
            s,
            a,
            r: info.reward,
            s_next: info.next_state,
            done: info.done,
        });
        if info.done {
            return Ok(true);
        }
        s = info.next_state;
    }

    Ok(false)
}

/// Records the trace of one episode under a fixed policy.
pub fn rollout<E, P>(env: &mut E, policy: &P, max_steps: usize) -> Result<Vec<EpisodeEvent>>
where
    E: Environment + ?Sized,
    P: Policy + ?Sized,
{
    let mut trace = vec![];
    play(env, policy, max_steps, |e| trace.push(e))?;

    Ok(trace)
}

/// Mean undiscounted reward of `policy` over `n_episodes` episodes.
pub fn evaluate_policy<E, P>(env: &mut E, policy: &P, n_episodes: usize, max_steps: usize) -> Result<Continuous>
where
    E: Environment + ?Sized,
    P: Policy + ?Sized,
{
    if n_episodes == 0 {
        return Err(Error::config("evaluation needs at least one episode"));
    }

    let mut total = 0.;
    for _ in 0..n_episodes {
        play(env, policy, max_steps, |e| total += e.r)?;
    }

    Ok(total / n_episodes as Continuous)
}
