use super::simulator::MdpSimulator;
use crate::algos::model_based::mdp::{Mdp, TransitionModel};
use crate::common::defs::*;
use crate::error::{Error, Result};
use itertools::Itertools;
use rand::Rng;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Start,
    Frozen,
    Hole,
    Goal,
}

impl Cell {
    fn from_char(c: char) -> Option<Self> {
        match c {
            'S' => Some(Cell::Start),
            'F' => Some(Cell::Frozen),
            'H' => Some(Cell::Hole),
            'G' => Some(Cell::Goal),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Cell::Hole | Cell::Goal)
    }
}

/// Action indices, in FrozenLake order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Left = 0,
    Down = 1,
    Right = 2,
    Up = 3,
}

impl Move {
    pub const ALL: [Move; 4] = [Move::Left, Move::Down, Move::Right, Move::Up];

    pub fn arrow(&self) -> char {
        match self {
            Move::Left => '←',
            Move::Down => '↓',
            Move::Right => '→',
            Move::Up => '↑',
        }
    }
}

/// FrozenLake-style grid: walk from `S` to `G` without falling into an `H`.
/// Reaching `G` pays 1, everything else pays 0; `H` and `G` end the episode.
/// On slippery ice the agent moves in the intended direction or either
/// perpendicular one with probability 1/3 each.
#[derive(Debug, Clone)]
pub struct GridWorld {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
    start: Discrete,
    model: TransitionModel,
}

impl GridWorld {
    pub fn new(map: &[&str], slippery: bool) -> Result<Self> {
        let rows = map.len();
        let cols = map.first().map_or(0, |r| r.chars().count());
        if rows == 0 || cols == 0 {
            return Err(Error::config("grid map is empty"));
        }

        let mut cells = Vec::with_capacity(rows * cols);
        for (i, row) in map.iter().enumerate() {
            if row.chars().count() != cols {
                return Err(Error::config(format!(
                    "grid row {i} has {} cells, expected {cols}",
                    row.chars().count()
                )));
            }
            for c in row.chars() {
                let cell = Cell::from_char(c)
                    .ok_or_else(|| Error::config(format!("unknown grid cell '{c}' in row {i}")))?;
                cells.push(cell);
            }
        }

        let starts = cells.iter().positions(|&c| c == Cell::Start).collect_vec();
        let &[start] = starts.as_slice() else {
            return Err(Error::config(format!(
                "grid needs exactly one start cell, found {}",
                starts.len()
            )));
        };

        let mut transitions = Transitions::new();
        for s in 0..cells.len() {
            for a in Move::ALL {
                let ts = if cells[s].is_terminal() {
                    vec![Transition::new(1., s, 0., true)]
                } else {
                    Self::outcomes(a, slippery)
                        .iter()
                        .map(|&(p, m)| {
                            let next = Self::shift(rows, cols, s, m);
                            let reward = if cells[next] == Cell::Goal { 1. } else { 0. };
                            Transition::new(p, next, reward, cells[next].is_terminal())
                        })
                        .collect()
                };
                transitions.insert((s, a as Discrete), ts);
            }
        }
        let model = TransitionModel::new(rows * cols, Move::ALL.len(), transitions)?;

        Ok(Self {
            rows,
            cols,
            cells,
            start,
            model,
        })
    }

    /// The classic 4x4 FrozenLake map.
    pub fn frozen_lake_4x4(slippery: bool) -> Result<Self> {
        Self::new(&["SFFF", "FHFH", "FFFH", "HFFG"], slippery)
    }

    fn outcomes(a: Move, slippery: bool) -> Vec<(Continuous, Move)> {
        if slippery {
            let i = a as usize;
            [(i + 3) % 4, i, (i + 1) % 4]
                .into_iter()
                .map(|j| (1. / 3., Move::ALL[j]))
                .collect()
        } else {
            vec![(1., a)]
        }
    }

    /// Neighbour in direction `m`; walls keep the agent in place.
    fn shift(rows: usize, cols: usize, s: Discrete, m: Move) -> Discrete {
        let (r, c) = (s / cols, s % cols);
        let (r, c) = match m {
            Move::Left => (r, c.saturating_sub(1)),
            Move::Down => ((r + 1).min(rows - 1), c),
            Move::Right => (r, (c + 1).min(cols - 1)),
            Move::Up => (r.saturating_sub(1), c),
        };
        r * cols + c
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn start(&self) -> Discrete {
        self.start
    }

    pub fn cell(&self, s: Discrete) -> Cell {
        self.cells[s]
    }

    pub fn model(&self) -> &TransitionModel {
        &self.model
    }

    /// Episodic environment over this grid, sampling with `rng`.
    pub fn environment<R: Rng>(&self, rng: R) -> Result<MdpSimulator<R>> {
        MdpSimulator::new(Rc::new(self.model.clone()), self.start, rng)
    }

    /// One line per row: terminal cells keep their letter, others show the
    /// policy's arrow.
    pub fn render_policy(&self, policy: &dyn Policy) -> String {
        (0..self.rows)
            .map(|r| {
                (0..self.cols)
                    .map(|c| {
                        let s = r * self.cols + c;
                        match self.cells[s] {
                            Cell::Hole => 'H',
                            Cell::Goal => 'G',
                            _ => policy
                                .policy(s)
                                .and_then(|a| Move::ALL.get(a))
                                .map_or('?', |m| m.arrow()),
                        }
                    })
                    .collect::<String>()
            })
            .join("\n")
    }
}

impl Mdp for GridWorld {
    fn n_s(&self) -> usize {
        self.model.n_s()
    }

    fn n_a(&self) -> usize {
        self.model.n_a()
    }

    fn transitions(&self) -> Rc<Transitions> {
        self.model.transitions()
    }
}
