use super::{Calculator, Parts};

/// Exact integer arithmetic with no overflow detection.
///
/// This is the fastest policy, but numerators and denominators wrap silently
/// once they outgrow a `u64`. Its constants are deliberately coarse so
/// chained operations stay small for longer.
#[derive(Debug, Default, Copy, Clone)]
pub struct UnsafeCalculator;

impl Calculator for UnsafeCalculator {
    const NAME: &'static str = "unsafe";

    const PI: Parts = Parts::new(311, 99, true);
    const TWO_PI: Parts = Parts::new(622, 99, true);
    const HALF_PI: Parts = Parts::new(311, 198, true);
    const E: Parts = super::E;

    fn add(lhs: Parts, rhs: Parts) -> Parts {
        let (left, right) = super::equalise_wrapping(lhs, rhs);

        super::signed_sum(left, right, |a, b| Some(a.wrapping_add(b)))
            .unwrap_or(left)
    }

    fn mul(lhs: Parts, rhs: Parts) -> Parts {
        Parts::new(
            lhs.numerator.wrapping_mul(rhs.numerator),
            lhs.denominator.wrapping_mul(rhs.denominator),
            lhs.positive == rhs.positive,
        )
    }

    fn are_equal(lhs: Parts, rhs: Parts) -> bool {
        let (left, right) = super::equalise_wrapping(lhs, rhs);
        super::signed_ordering(left, right).is_eq()
    }

    fn is_less(lhs: Parts, rhs: Parts) -> bool {
        let (left, right) = super::equalise_wrapping(lhs, rhs);
        super::signed_ordering(left, right).is_lt()
    }

    fn is_less_or_equal(lhs: Parts, rhs: Parts) -> bool {
        let (left, right) = super::equalise_wrapping(lhs, rhs);
        super::signed_ordering(left, right).is_le()
    }

    fn is_greater(lhs: Parts, rhs: Parts) -> bool {
        let (left, right) = super::equalise_wrapping(lhs, rhs);
        super::signed_ordering(left, right).is_gt()
    }

    fn is_greater_or_equal(lhs: Parts, rhs: Parts) -> bool {
        let (left, right) = super::equalise_wrapping(lhs, rhs);
        super::signed_ordering(left, right).is_ge()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_subtract() {
        let half = Parts::new(1, 2, true);
        let third = Parts::new(1, 3, true);

        assert_eq!(UnsafeCalculator::add(half, third), Parts::new(5, 6, true));
        assert_eq!(
            UnsafeCalculator::add(third, half.negated()),
            Parts::new(1, 6, false)
        );
    }

    #[test]
    fn overflow_wraps_instead_of_panicking() {
        let huge = Parts::new(u64::MAX, 1, true);

        let got = UnsafeCalculator::mul(huge, Parts::new(2, 1, true));

        assert_eq!(got.numerator, u64::MAX.wrapping_mul(2));
    }

    #[test]
    fn comparisons() {
        let half = Parts::new(1, 2, true);
        let two_quarters = Parts::new(2, 4, true);
        let third = Parts::new(1, 3, false);

        assert!(UnsafeCalculator::are_equal(half, two_quarters));
        assert!(UnsafeCalculator::is_less(third, half));
        assert!(UnsafeCalculator::is_less_or_equal(half, two_quarters));
        assert!(UnsafeCalculator::is_greater(half, third));
        assert!(!UnsafeCalculator::is_greater(half, two_quarters));
        assert!(UnsafeCalculator::is_greater_or_equal(half, two_quarters));
    }
}
