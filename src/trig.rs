//! Trigonometry and other transcendental-ish functions evaluated with
//! fraction arithmetic.
//!
//! Every step goes through the fraction's calculator, so the precision of
//! the result depends on both the calculator and the fixed number of Taylor
//! series terms.

use crate::{calculator::Calculator, Fraction};

/// How many terms of the Taylor series are summed after the first one.
pub const TAYLOR_TERMS: u64 = 9;

/// Sine, computed by a Taylor series after reducing `x` into `[0, π/2]`.
///
/// The argument's sign and quadrant are discarded by the reduction, so the
/// result is always non-negative.
pub fn sin<C: Calculator>(x: Fraction<C>) -> Fraction<C> {
    let x = reduce(x);
    taylor_series(x, x, 1)
}

/// Cosine, computed the same way as [`sin()`].
pub fn cos<C: Calculator>(x: Fraction<C>) -> Fraction<C> {
    let x = reduce(x);
    taylor_series(x, Fraction::one(), 0)
}

pub fn tan<C: Calculator>(x: Fraction<C>) -> Fraction<C> { sin(x) / cos(x) }

/// The floating point remainder of `x / y`, converted back to a fraction.
pub fn modulo<C: Calculator>(x: Fraction<C>, y: Fraction<C>) -> Fraction<C> {
    Fraction::approximate(x.to_f64() % y.to_f64())
}

/// Raise `x` to an integer power by repeated multiplication.
pub fn pow<C: Calculator>(x: Fraction<C>, exponent: i32) -> Fraction<C> {
    let mut result = Fraction::one();

    for _ in 0..exponent.unsigned_abs() {
        result *= x;
    }

    if exponent < 0 {
        result.reciprocal()
    } else {
        result
    }
}

fn reduce<C: Calculator>(x: Fraction<C>) -> Fraction<C> {
    let x = x.abs();
    let half_pi = Fraction::half_pi();

    if x > half_pi {
        modulo(x, half_pi)
    } else {
        x
    }
}

/// Sum `first + Σ ±x^(k+2i) / (k+2i)!` for `i` in `1..=TAYLOR_TERMS`.
fn taylor_series<C: Calculator>(
    x: Fraction<C>,
    first: Fraction<C>,
    k: u64,
) -> Fraction<C> {
    let x_squared = x * x;
    let mut power = first;
    let mut factorial = Fraction::<C>::one();
    let mut n = k;
    let mut sum = first;

    for i in 0..TAYLOR_TERMS {
        n += 1;
        factorial *= Fraction::<C>::whole(n, true);
        n += 1;
        factorial *= Fraction::<C>::whole(n, true);
        power *= x_squared;

        let term = power / factorial;

        if i % 2 == 0 {
            sum -= term;
        } else {
            sum += term;
        }
    }

    sum.abs()
}

impl<C: Calculator> Fraction<C> {
    pub fn sin(self) -> Self { sin(self) }

    pub fn cos(self) -> Self { cos(self) }

    pub fn tan(self) -> Self { tan(self) }

    pub fn pow(self, exponent: i32) -> Self { pow(self, exponent) }

    pub fn modulo(self, divisor: Self) -> Self { modulo(self, divisor) }
}
