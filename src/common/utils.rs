use super::defs::*;

/// Allowed deviation of a probability mass from 1.
pub const PROBABILITY_TOLERANCE: Continuous = 1e-6;

/// Index of the largest value; the lowest index wins ties. `None` when empty.
pub fn argmax(values: &[Continuous]) -> Option<Discrete> {
    let mut best: Option<(Discrete, Continuous)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }

    best.map(|(i, _)| i)
}

pub fn probability_mass(ts: &[Transition]) -> Continuous {
    ts.iter().map(|t| t.probability).sum()
}

pub fn is_unit_mass(ts: &[Transition]) -> bool {
    (probability_mass(ts) - 1.).abs() <= PROBABILITY_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&[0., 0., 0.], Some(0))]
    #[case(&[0., 1., 1.], Some(1))]
    #[case(&[-3., -1., -2.], Some(1))]
    #[case(&[0.5], Some(0))]
    #[case(&[], None)]
    fn argmax_prefers_lowest_index(#[case] values: &[Continuous], #[case] expected: Option<Discrete>) {
        assert_eq!(argmax(values), expected);
    }

    #[test]
    fn unit_mass_within_tolerance() {
        let ts = vec![
            Transition::new(1. / 3., 0, 0., false),
            Transition::new(1. / 3., 1, 0., false),
            Transition::new(1. / 3., 2, 0., false),
        ];
        assert!(is_unit_mass(&ts));
        assert!(!is_unit_mass(&ts[..2]));
        assert!(!is_unit_mass(&[]));
    }
}
