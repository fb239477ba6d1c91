use super::{float, Calculator, Parts, UnsafeOperation};
use std::cmp::Ordering;

/// Exact integer arithmetic which falls back to [`super::SafeCalculator`]'s
/// floating point behaviour whenever an intermediate value would overflow.
#[derive(Debug, Default, Copy, Clone)]
pub struct CheckedSafeCalculator;

impl CheckedSafeCalculator {
    fn compare(lhs: Parts, rhs: Parts) -> Option<Ordering> {
        match super::checked_compare(lhs, rhs) {
            Ok(ordering) => Some(ordering),
            Err(e) => {
                log::trace!("{}, comparing as floats", e);
                None
            },
        }
    }
}

fn fallback<F>(result: Result<Parts, UnsafeOperation>, float_op: F) -> Parts
where
    F: FnOnce(Parts, Parts) -> Parts,
{
    match result {
        Ok(parts) => parts,
        Err(e) => {
            log::trace!("{}, falling back to floating point", e);
            float_op(e.lhs, e.rhs)
        },
    }
}

impl Calculator for CheckedSafeCalculator {
    const NAME: &'static str = "checked";

    const PI: Parts = super::PRECISE_PI;
    const TWO_PI: Parts = super::PRECISE_TWO_PI;
    const HALF_PI: Parts = super::PRECISE_HALF_PI;
    const E: Parts = super::E;

    fn add(lhs: Parts, rhs: Parts) -> Parts {
        fallback(super::checked_add(lhs, rhs), float::add)
    }

    fn mul(lhs: Parts, rhs: Parts) -> Parts {
        fallback(super::checked_mul(lhs, rhs), float::mul)
    }

    fn are_equal(lhs: Parts, rhs: Parts) -> bool {
        match Self::compare(lhs, rhs) {
            Some(ordering) => ordering.is_eq(),
            None => float::are_equal(lhs, rhs),
        }
    }

    fn is_less(lhs: Parts, rhs: Parts) -> bool {
        match Self::compare(lhs, rhs) {
            Some(ordering) => ordering.is_lt(),
            None => float::is_less(lhs, rhs),
        }
    }

    fn is_less_or_equal(lhs: Parts, rhs: Parts) -> bool {
        match Self::compare(lhs, rhs) {
            Some(ordering) => ordering.is_le(),
            None => !float::is_greater(lhs, rhs),
        }
    }

    fn is_greater(lhs: Parts, rhs: Parts) -> bool {
        match Self::compare(lhs, rhs) {
            Some(ordering) => ordering.is_gt(),
            None => float::is_greater(lhs, rhs),
        }
    }

    fn is_greater_or_equal(lhs: Parts, rhs: Parts) -> bool {
        match Self::compare(lhs, rhs) {
            Some(ordering) => ordering.is_ge(),
            None => !float::is_less(lhs, rhs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::{Operation, SafeCalculator};
    use approx::assert_relative_eq;

    fn tiny_thirds() -> Parts { Parts::new(1, 3u64.pow(30), true) }

    fn tiny_halves() -> Parts { Parts::new(1, 1 << 40, true) }

    #[test]
    fn exact_when_it_fits() {
        let got = CheckedSafeCalculator::add(
            Parts::new(1, 2, true),
            Parts::new(1, 3, true),
        );

        assert_eq!(got, Parts::new(5, 6, true));
    }

    #[test]
    fn overflowing_add_matches_the_safe_calculator() {
        let got = CheckedSafeCalculator::add(tiny_thirds(), tiny_halves());
        let should_be = SafeCalculator::add(tiny_thirds(), tiny_halves());

        assert_eq!(got, should_be);
    }

    #[test]
    fn overflowing_multiply_matches_the_safe_calculator() {
        let big = Parts::new(u64::MAX - 1, 3, true);

        let got = CheckedSafeCalculator::mul(big, big);
        let should_be = SafeCalculator::mul(big, big);

        assert_eq!(got, should_be);
        // ~3.8e37 can't be represented, so the result saturates
        assert_eq!(got, Parts::new(u64::MAX, 1, true));
    }

    #[test]
    fn fallback_results_are_close_to_the_float_result() {
        let inputs = vec![
            (tiny_thirds(), tiny_halves(), Operation::Add),
            (
                Parts::new(1 << 40, 3u64.pow(30), true),
                Parts::new(1 << 30, 1, true),
                Operation::Multiply,
            ),
            (
                Parts::new(u64::MAX / 2, 7, false),
                Parts::new(9, u64::MAX / 4, true),
                Operation::Multiply,
            ),
        ];

        for (lhs, rhs, operation) in inputs {
            let (got, should_be) = match operation {
                Operation::Add => (
                    CheckedSafeCalculator::add(lhs, rhs),
                    lhs.to_f64() + rhs.to_f64(),
                ),
                _ => (
                    CheckedSafeCalculator::mul(lhs, rhs),
                    lhs.to_f64() * rhs.to_f64(),
                ),
            };

            assert_relative_eq!(got.to_f64(), should_be, max_relative = 1e-12);
        }
    }

    #[test]
    fn overflowing_add_saturates() {
        let big = Parts::new(u64::MAX - 1, 1, true);

        let got = CheckedSafeCalculator::add(big, big);

        assert_eq!(got, Parts::new(u64::MAX, 1, true));
    }

    #[test]
    fn comparisons_fall_back_to_floats() {
        assert!(CheckedSafeCalculator::is_less(tiny_thirds(), tiny_halves()));
        assert!(CheckedSafeCalculator::is_greater(tiny_halves(), tiny_thirds()));
        assert!(!CheckedSafeCalculator::are_equal(tiny_halves(), tiny_thirds()));
    }
}
