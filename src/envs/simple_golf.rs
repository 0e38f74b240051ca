use crate::algos::model_based::mdp::Mdp;
use crate::common::defs::*;
use std::rc::Rc;

/// https://towardsdatascience.com/reinforcement-learning-an-easy-introduction-to-value-iteration-e4cfe0731fd5
///
/// States: 0 fairway, 1 green, 2 in the hole. Action 0 hits from the fairway,
/// 1 chips from the green back to the fairway, 2 putts. State 2 has no actions.
pub struct SimpleGolf {
    n_s: usize,
    n_a: usize,
    transitions: Rc<Transitions>,
}

impl SimpleGolf {
    pub fn new() -> Self {
        let transitions = Transitions::from([
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
        ]);

        Self {
            n_s: 3,
            n_a: 3,
            transitions: Rc::new(transitions),
        }
    }
}

impl Mdp for SimpleGolf {
    fn n_s(&self) -> usize {
        self.n_s
    }

    fn n_a(&self) -> usize {
        self.n_a
    }

    fn transitions(&self) -> Rc<Transitions> {
        Rc::clone(&self.transitions)
    }
}
