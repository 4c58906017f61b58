use rand::Rng;

use super::{DiceFormula, DiceTerm, Operator, Part, Segment};

fn random_part<R: Rng + ?Sized>(rng: &mut R, value_size: usize) -> Part {
    let n = rng.random_range(1..=value_size);
    if rng.random_bool(0.5) {
        Part::Const(n as isize)
    } else {
        let count = rng.random_range(1..=3);
        // Can't fail, both values are at least 1
        Part::Dice(DiceTerm { count, sides: n })
    }
}

impl DiceFormula {
    /// Create a random formula with `segments` terms, each a constant or a
    /// dice term with at most `value_size` sides.
    ///
    /// Useful for testing, e.g. to check that different ways of evaluating a
    /// formula agree.
    pub fn make_random<R: Rng + ?Sized>(rng: &mut R, segments: usize, value_size: usize) -> Self {
        assert!(value_size >= 1);
        let segments = segments.max(1);
        let parts = (0..segments)
            .map(|_| {
                let op = if rng.random_bool(0.5) { Operator::Add } else { Operator::Sub };
                Segment { op, part: random_part(rng, value_size) }
            })
            .collect();
        DiceFormula::new(parts)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    use super::*;

    #[test]
    fn random_is_valid() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        for _ in 0..100 {
            let f = DiceFormula::make_random(&mut rng, 3, 6);
            assert_eq!(f.segments().len(), 3);
            for d in f.terms() {
                assert!((1..=3).contains(&d.count()));
                assert!((1..=6).contains(&d.sides()));
            }
            assert!(f.bounds().is_ok());
        }
    }
}
