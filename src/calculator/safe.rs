use super::{float, Calculator, Parts};

/// Do all arithmetic in floating point and convert the result back into a
/// fraction.
///
/// This never overflows, but every operation is only as precise as an
/// `f64`.
#[derive(Debug, Default, Copy, Clone)]
pub struct SafeCalculator;

impl Calculator for SafeCalculator {
    const NAME: &'static str = "safe";

    const PI: Parts = super::PRECISE_PI;
    const TWO_PI: Parts = super::PRECISE_TWO_PI;
    const HALF_PI: Parts = super::PRECISE_HALF_PI;
    const E: Parts = super::E;

    fn add(lhs: Parts, rhs: Parts) -> Parts { float::add(lhs, rhs) }

    fn mul(lhs: Parts, rhs: Parts) -> Parts { float::mul(lhs, rhs) }

    fn are_equal(lhs: Parts, rhs: Parts) -> bool { float::are_equal(lhs, rhs) }

    fn is_less(lhs: Parts, rhs: Parts) -> bool { float::is_less(lhs, rhs) }

    fn is_less_or_equal(lhs: Parts, rhs: Parts) -> bool {
        !float::is_greater(lhs, rhs)
    }

    fn is_greater(lhs: Parts, rhs: Parts) -> bool {
        float::is_greater(lhs, rhs)
    }

    fn is_greater_or_equal(lhs: Parts, rhs: Parts) -> bool {
        !float::is_less(lhs, rhs)
    }
}
