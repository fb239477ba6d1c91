//! Arithmetic policies which decide how raw numerator/denominator pairs are
//! combined and what happens when the combination would overflow.

mod checked;
mod safe;
mod unchecked;

pub use checked::CheckedSafeCalculator;
pub use safe::SafeCalculator;
pub use unchecked::UnsafeCalculator;

use euclid::approxeq::ApproxEq;
use std::{
    cmp::Ordering,
    error::Error,
    fmt::{self, Debug, Display, Formatter},
};

/// The raw components of a fraction.
///
/// Unlike [`crate::Fraction`] there are no invariants here, a [`Parts`] may
/// be unreduced or have a zero denominator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Parts {
    pub numerator: u64,
    pub denominator: u64,
    pub positive: bool,
}

impl Parts {
    pub const fn new(numerator: u64, denominator: u64, positive: bool) -> Self {
        Parts {
            numerator,
            denominator,
            positive,
        }
    }

    pub fn negated(self) -> Self {
        Parts {
            positive: !self.positive,
            ..self
        }
    }

    pub fn to_f64(self) -> f64 {
        let magnitude = self.numerator as f64 / self.denominator as f64;

        if self.positive {
            magnitude
        } else {
            -magnitude
        }
    }

    /// Find the best rational approximation of `number` whose numerator and
    /// denominator both fit in a `u64`.
    ///
    /// This walks the continued fraction expansion of `number`, keeping the
    /// last convergent that was still representable. The expansion stops
    /// early once a convergent is within `f64::EPSILON` (relative) of
    /// `number`, and never runs for more terms than there are bits in a
    /// `u64`.
    ///
    /// `NaN` becomes zero, and anything too big for a `u64` (including the
    /// infinities) saturates to `±u64::MAX`.
    pub fn approximate(number: f64) -> Self {
        if number.is_nan() {
            return Parts::new(0, 1, true);
        }

        let max = u64::MAX as f64;
        let magnitude = number.abs();

        if magnitude >= max {
            return Parts::new(u64::MAX, 1, number > 0.0);
        }

        // the two most recent convergents, h/k
        let (mut h, mut k) = (1.0, 0.0);
        let (mut h_prev, mut k_prev) = (0.0, 1.0);
        let mut x = magnitude;

        for _ in 0..64 {
            let a = x.floor();
            let h_next = h * a + h_prev;
            let k_next = k * a + k_prev;

            if h_next >= max || k_next >= max {
                log::trace!(
                    "Truncated the continued fraction for {} at {}/{}",
                    number,
                    h,
                    k
                );
                break;
            }

            h_prev = h;
            k_prev = k;
            h = h_next;
            k = k_next;

            if x == a || (h / k - magnitude).abs() <= f64::EPSILON * magnitude
            {
                break;
            }

            x = 1.0 / (x - a);
        }

        let numerator = h as u64;
        let denominator = k as u64;

        if numerator == 0 {
            Parts::new(0, 1, true)
        } else {
            Parts::new(numerator, denominator.max(1), number >= 0.0)
        }
    }
}

impl Display for Parts {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if !self.positive {
            write!(f, "-")?;
        }
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// A strategy for doing arithmetic on the magnitudes of two fractions.
///
/// Calculators are stateless, every operation is an associated function. The
/// results don't need to be reduced, [`crate::Fraction`] takes care of that.
pub trait Calculator: Debug + Default + Copy + 'static {
    /// A human-friendly name, used when logging.
    const NAME: &'static str;

    const PI: Parts;
    const TWO_PI: Parts;
    const HALF_PI: Parts;
    /// Euler's number.
    const E: Parts;

    fn add(lhs: Parts, rhs: Parts) -> Parts;

    fn mul(lhs: Parts, rhs: Parts) -> Parts;

    fn are_equal(lhs: Parts, rhs: Parts) -> bool;

    fn is_less(lhs: Parts, rhs: Parts) -> bool;

    fn is_less_or_equal(lhs: Parts, rhs: Parts) -> bool;

    fn is_greater(lhs: Parts, rhs: Parts) -> bool;

    fn is_greater_or_equal(lhs: Parts, rhs: Parts) -> bool;
}

/// The kind of operation an [`UnsafeOperation`] was attempting.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Operation {
    Add,
    Multiply,
    Compare,
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Add => write!(f, "adding"),
            Operation::Multiply => write!(f, "multiplying"),
            Operation::Compare => write!(f, "comparing"),
        }
    }
}

/// Doing an operation with exact integer arithmetic would have overflowed.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct UnsafeOperation {
    pub operation: Operation,
    pub lhs: Parts,
    pub rhs: Parts,
}

impl UnsafeOperation {
    fn new(operation: Operation, lhs: Parts, rhs: Parts) -> Self {
        UnsafeOperation {
            operation,
            lhs,
            rhs,
        }
    }
}

impl Display for UnsafeOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unsafe operation detected: {} {} and {} would overflow",
            self.operation, self.lhs, self.rhs
        )
    }
}

impl Error for UnsafeOperation {}

/// The greatest common divisor of two integers.
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    loop {
        if a == 0 {
            return b;
        }

        b %= a;

        if b == 0 {
            return a;
        }

        a %= b;
    }
}

pub(crate) fn addition_is_safe(lhs: u64, rhs: u64) -> bool {
    rhs < u64::MAX - lhs
}

pub(crate) fn multiplication_is_safe(lhs: u64, rhs: u64) -> bool {
    lhs == 0 || rhs < u64::MAX / lhs
}

/// Rewrite both fractions over the least common multiple of their
/// denominators, giving up if any intermediate product might overflow.
pub(crate) fn equalise_checked(
    lhs: Parts,
    rhs: Parts,
) -> Option<(Parts, Parts)> {
    if !multiplication_is_safe(lhs.denominator, rhs.denominator) {
        return None;
    }

    let lcm = lhs.denominator * rhs.denominator
        / gcd(lhs.denominator, rhs.denominator);

    let scale = lcm / lhs.denominator;
    if !multiplication_is_safe(scale, lhs.numerator)
        || !multiplication_is_safe(scale, lhs.denominator)
    {
        return None;
    }
    let denominator = lhs.denominator * scale;
    let left = Parts::new(lhs.numerator * scale, denominator, lhs.positive);

    let scale = lcm / rhs.denominator;
    if !multiplication_is_safe(scale, rhs.numerator) {
        return None;
    }
    let right = Parts::new(rhs.numerator * scale, denominator, rhs.positive);

    Some((left, right))
}

/// The same as [`equalise_checked()`], except overflow silently wraps.
pub(crate) fn equalise_wrapping(lhs: Parts, rhs: Parts) -> (Parts, Parts) {
    let lcm = (lhs.denominator / gcd(lhs.denominator, rhs.denominator))
        .wrapping_mul(rhs.denominator);

    let scale = lcm / lhs.denominator;
    let denominator = lhs.denominator.wrapping_mul(scale);
    let left = Parts::new(
        lhs.numerator.wrapping_mul(scale),
        denominator,
        lhs.positive,
    );

    let scale = lcm / rhs.denominator;
    let right = Parts::new(
        rhs.numerator.wrapping_mul(scale),
        denominator,
        rhs.positive,
    );

    (left, right)
}

/// Add two fractions which already share a denominator, using `add` to
/// combine magnitudes of the same sign.
pub(crate) fn signed_sum<F>(lhs: Parts, rhs: Parts, add: F) -> Option<Parts>
where
    F: FnOnce(u64, u64) -> Option<u64>,
{
    let denominator = lhs.denominator;

    if lhs.positive == rhs.positive {
        add(lhs.numerator, rhs.numerator)
            .map(|numerator| Parts::new(numerator, denominator, lhs.positive))
    } else if lhs.numerator > rhs.numerator {
        Some(Parts::new(
            lhs.numerator - rhs.numerator,
            denominator,
            lhs.positive,
        ))
    } else {
        Some(Parts::new(
            rhs.numerator - lhs.numerator,
            denominator,
            !lhs.positive,
        ))
    }
}

/// Order two fractions which already share a denominator.
pub(crate) fn signed_ordering(lhs: Parts, rhs: Parts) -> Ordering {
    if lhs.numerator == 0 && rhs.numerator == 0 {
        return Ordering::Equal;
    }

    match (lhs.positive, rhs.positive) {
        (true, true) => lhs.numerator.cmp(&rhs.numerator),
        (false, false) => rhs.numerator.cmp(&lhs.numerator),
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
    }
}

pub(crate) fn checked_add(
    lhs: Parts,
    rhs: Parts,
) -> Result<Parts, UnsafeOperation> {
    let overflow = || UnsafeOperation::new(Operation::Add, lhs, rhs);
    let (left, right) = equalise_checked(lhs, rhs).ok_or_else(overflow)?;

    signed_sum(left, right, |a, b| {
        if addition_is_safe(a, b) {
            Some(a + b)
        } else {
            None
        }
    })
    .ok_or_else(overflow)
}

pub(crate) fn checked_mul(
    lhs: Parts,
    rhs: Parts,
) -> Result<Parts, UnsafeOperation> {
    let positive = lhs.positive == rhs.positive;

    if multiplication_is_safe(lhs.numerator, rhs.numerator)
        && multiplication_is_safe(lhs.denominator, rhs.denominator)
    {
        Ok(Parts::new(
            lhs.numerator * rhs.numerator,
            lhs.denominator * rhs.denominator,
            positive,
        ))
    } else {
        Err(UnsafeOperation::new(Operation::Multiply, lhs, rhs))
    }
}

pub(crate) fn checked_compare(
    lhs: Parts,
    rhs: Parts,
) -> Result<Ordering, UnsafeOperation> {
    equalise_checked(lhs, rhs)
        .map(|(left, right)| signed_ordering(left, right))
        .ok_or_else(|| UnsafeOperation::new(Operation::Compare, lhs, rhs))
}

/// Epsilon-tolerant comparisons on the floating point form of two fractions.
pub(crate) mod float {
    use super::{ApproxEq, Parts};

    pub(crate) fn add(lhs: Parts, rhs: Parts) -> Parts {
        Parts::approximate(lhs.to_f64() + rhs.to_f64())
    }

    pub(crate) fn mul(lhs: Parts, rhs: Parts) -> Parts {
        Parts::approximate(lhs.to_f64() * rhs.to_f64())
    }

    pub(crate) fn are_equal(lhs: Parts, rhs: Parts) -> bool {
        lhs.to_f64().approx_eq_eps(&rhs.to_f64(), &f64::EPSILON)
    }

    pub(crate) fn is_less(lhs: Parts, rhs: Parts) -> bool {
        !are_equal(lhs, rhs) && lhs.to_f64() < rhs.to_f64()
    }

    pub(crate) fn is_greater(lhs: Parts, rhs: Parts) -> bool {
        !are_equal(lhs, rhs) && lhs.to_f64() > rhs.to_f64()
    }
}

/// `2646693125139304345/842468587426513207`, accurate to 37 decimal places.
pub(crate) const PRECISE_PI: Parts =
    Parts::new(2646693125139304345, 842468587426513207, true);
pub(crate) const PRECISE_TWO_PI: Parts =
    Parts::new(5293386250278608690, 842468587426513207, true);
pub(crate) const PRECISE_HALF_PI: Parts =
    Parts::new(2646693125139304345, 1684937174853026414, true);
/// `685/252`, the first few terms of `sum(1/n!)`. Accurate to 4 decimal
/// places.
pub(crate) const E: Parts = Parts::new(685, 252, true);
