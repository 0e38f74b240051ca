use tabular_rl::*;

/// States 0..=3 on a line, start at 0. Action 0 steps left (bouncing off 0),
/// action 1 steps right. Reaching 3 pays 1 and ends the episode.
pub struct LineWorld {
    s: Discrete,
}

impl LineWorld {
    pub const GOAL: Discrete = 3;

    pub fn new() -> Self {
        Self { s: 0 }
    }
}

impl Environment for LineWorld {
    fn n_s(&self) -> usize {
        4
    }

    fn n_a(&self) -> usize {
        2
    }

    fn reset(&mut self) -> Discrete {
        self.s = 0;
        self.s
    }

    fn step(&mut self, a: Discrete) -> StepInfo {
        self.s = if a == 0 {
            self.s.saturating_sub(1)
        } else {
            (self.s + 1).min(Self::GOAL)
        };
        let done = self.s == Self::GOAL;

        StepInfo {
            next_state: self.s,
            reward: if done { 1. } else { 0. },
            done,
        }
    }
}

/// Never terminates; counts every call it receives.
#[derive(Default)]
pub struct Treadmill {
    pub resets: usize,
    pub steps: usize,
}

impl Environment for Treadmill {
    fn n_s(&self) -> usize {
        2
    }

    fn n_a(&self) -> usize {
        2
    }

    fn reset(&mut self) -> Discrete {
        self.resets += 1;
        0
    }

    fn step(&mut self, a: Discrete) -> StepInfo {
        self.steps += 1;
        StepInfo {
            next_state: a,
            reward: 0.,
            done: false,
        }
    }
}
