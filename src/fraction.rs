use crate::calculator::{
    self, gcd, Calculator, CheckedSafeCalculator, Parts, UnsafeOperation,
};
use approx::{AbsDiffEq, RelativeEq};
use std::{
    cmp::Ordering,
    convert::TryFrom,
    fmt::{self, Display, Formatter},
    marker::PhantomData,
    ops::{
        Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign,
    },
};

/// An exact rational number, always kept in its reduced form.
///
/// The calculator type parameter decides how arithmetic is done and what
/// happens on overflow (see the [`crate::calculator`] module).
///
/// # Invariants
///
/// - The denominator is never zero (a zero denominator is coerced to `1`)
/// - The numerator and denominator share no common factors
/// - Zero is always `0/1` and positive
#[derive(Debug, Copy, Clone)]
pub struct Fraction<C = CheckedSafeCalculator> {
    parts: Parts,
    calculator: PhantomData<C>,
}

impl<C: Calculator> Fraction<C> {
    pub fn new(numerator: u64, denominator: u64, positive: bool) -> Self {
        Fraction::from_parts(Parts::new(numerator, denominator, positive))
    }

    pub fn whole(whole: u64, positive: bool) -> Self {
        Fraction::new(whole, 1, positive)
    }

    /// Create the mixed number `whole + numerator/denominator`.
    pub fn mixed(
        whole: u64,
        numerator: u64,
        denominator: u64,
        positive: bool,
    ) -> Self {
        let magnitude = Fraction::<C>::whole(whole, true)
            + Fraction::<C>::new(numerator, denominator, true);

        if positive {
            magnitude
        } else {
            magnitude.negation()
        }
    }

    /// The closest fraction to `number` (see [`Parts::approximate()`]).
    pub fn approximate(number: f64) -> Self {
        Fraction::from_parts(Parts::approximate(number))
    }

    /// Reduce an arbitrary [`Parts`].
    pub fn from_parts(parts: Parts) -> Self {
        let Parts {
            mut numerator,
            mut denominator,
            mut positive,
        } = parts;

        if denominator == 0 {
            denominator = 1;
        }

        if numerator == 0 {
            denominator = 1;
            positive = true;
        } else {
            let divisor = gcd(numerator, denominator);
            numerator /= divisor;
            denominator /= divisor;
        }

        Fraction {
            parts: Parts::new(numerator, denominator, positive),
            calculator: PhantomData,
        }
    }

    pub fn zero() -> Self { Fraction::whole(0, true) }

    pub fn one() -> Self { Fraction::whole(1, true) }

    pub fn pi() -> Self { Fraction::from_parts(C::PI) }

    pub fn two_pi() -> Self { Fraction::from_parts(C::TWO_PI) }

    pub fn half_pi() -> Self { Fraction::from_parts(C::HALF_PI) }

    pub fn e() -> Self { Fraction::from_parts(C::E) }

    pub fn parts(self) -> Parts { self.parts }

    pub fn numerator(self) -> u64 { self.parts.numerator }

    pub fn denominator(self) -> u64 { self.parts.denominator }

    pub fn is_positive(self) -> bool { self.parts.positive }

    pub fn is_negative(self) -> bool { !self.parts.positive }

    pub fn is_zero(self) -> bool { self.parts.numerator == 0 }

    pub fn set_numerator(&mut self, numerator: u64) {
        *self = Fraction::new(
            numerator,
            self.parts.denominator,
            self.parts.positive,
        );
    }

    /// Change the denominator, coercing `0` to `1`.
    pub fn set_denominator(&mut self, denominator: u64) {
        *self = Fraction::new(
            self.parts.numerator,
            denominator,
            self.parts.positive,
        );
    }

    pub fn make_positive(&mut self) { self.parts.positive = true; }

    /// Make the fraction negative. Zero stays positive.
    pub fn make_negative(&mut self) {
        self.parts.positive = self.is_zero();
    }

    pub fn negate(&mut self) {
        if self.is_positive() {
            self.make_negative();
        } else {
            self.make_positive();
        }
    }

    pub fn negation(mut self) -> Self {
        self.negate();
        self
    }

    /// Flip the fraction upside down. The reciprocal of zero is zero.
    pub fn reciprocal(self) -> Self {
        if self.is_zero() {
            return self;
        }

        Fraction::new(
            self.parts.denominator,
            self.parts.numerator,
            self.parts.positive,
        )
    }

    pub fn abs(mut self) -> Self {
        self.make_positive();
        self
    }

    /// Truncate towards zero, saturating at the bounds of an `i64`.
    pub fn to_i64(self) -> i64 {
        let magnitude = self.parts.numerator / self.parts.denominator;

        match (i64::try_from(magnitude), self.is_positive()) {
            (Ok(whole), true) => whole,
            (Ok(whole), false) => -whole,
            (Err(_), true) => i64::MAX,
            (Err(_), false) => i64::MIN,
        }
    }

    pub fn to_i32(self) -> i32 {
        let whole = self.to_i64();
        i32::try_from(whole).unwrap_or(if whole > 0 {
            i32::MAX
        } else {
            i32::MIN
        })
    }

    pub fn to_i16(self) -> i16 {
        let whole = self.to_i64();
        i16::try_from(whole).unwrap_or(if whole > 0 {
            i16::MAX
        } else {
            i16::MIN
        })
    }

    pub fn to_f64(self) -> f64 { self.parts.to_f64() }

    pub fn to_f32(self) -> f32 { self.to_f64() as f32 }

    /// Reinterpret this fraction using a different calculator.
    pub fn with_calculator<D: Calculator>(self) -> Fraction<D> {
        Fraction {
            parts: self.parts,
            calculator: PhantomData,
        }
    }

    /// Add using exact integer arithmetic, returning an error instead of
    /// losing precision.
    pub fn checked_add<D: Calculator>(
        self,
        rhs: Fraction<D>,
    ) -> Result<Self, UnsafeOperation> {
        calculator::checked_add(self.parts, rhs.parts).map(Fraction::from_parts)
    }

    pub fn checked_sub<D: Calculator>(
        self,
        rhs: Fraction<D>,
    ) -> Result<Self, UnsafeOperation> {
        self.checked_add(rhs.negation())
    }

    pub fn checked_mul<D: Calculator>(
        self,
        rhs: Fraction<D>,
    ) -> Result<Self, UnsafeOperation> {
        calculator::checked_mul(self.parts, rhs.parts).map(Fraction::from_parts)
    }

    pub fn checked_div<D: Calculator>(
        self,
        rhs: Fraction<D>,
    ) -> Result<Self, UnsafeOperation> {
        self.checked_mul(rhs.reciprocal())
    }
}

impl<C: Calculator> Default for Fraction<C> {
    fn default() -> Self { Fraction::zero() }
}

impl<C: Calculator> From<f64> for Fraction<C> {
    fn from(number: f64) -> Self { Fraction::approximate(number) }
}

impl<C: Calculator> From<u64> for Fraction<C> {
    fn from(whole: u64) -> Self { Fraction::whole(whole, true) }
}

impl<C: Calculator> From<i64> for Fraction<C> {
    fn from(whole: i64) -> Self {
        Fraction::whole(whole.unsigned_abs(), whole >= 0)
    }
}

impl<C: Calculator> From<Fraction<C>> for f64 {
    fn from(fraction: Fraction<C>) -> f64 { fraction.to_f64() }
}

// arithmetic is done by the left operand's calculator

impl<C: Calculator, D: Calculator> Add<Fraction<D>> for Fraction<C> {
    type Output = Fraction<C>;

    fn add(self, rhs: Fraction<D>) -> Fraction<C> {
        Fraction::from_parts(C::add(self.parts, rhs.parts))
    }
}

impl<C: Calculator, D: Calculator> Sub<Fraction<D>> for Fraction<C> {
    type Output = Fraction<C>;

    fn sub(self, rhs: Fraction<D>) -> Fraction<C> { self + rhs.negation() }
}

impl<C: Calculator, D: Calculator> Mul<Fraction<D>> for Fraction<C> {
    type Output = Fraction<C>;

    fn mul(self, rhs: Fraction<D>) -> Fraction<C> {
        Fraction::from_parts(C::mul(self.parts, rhs.parts))
    }
}

impl<C: Calculator, D: Calculator> Div<Fraction<D>> for Fraction<C> {
    type Output = Fraction<C>;

    fn div(self, rhs: Fraction<D>) -> Fraction<C> { self * rhs.reciprocal() }
}

impl<C: Calculator> Neg for Fraction<C> {
    type Output = Fraction<C>;

    fn neg(self) -> Self::Output { self.negation() }
}

macro_rules! assign_op {
    ($trait:ident, $method:ident, $op:tt) => {
        impl<C: Calculator, D: Calculator> $trait<Fraction<D>> for Fraction<C> {
            fn $method(&mut self, rhs: Fraction<D>) { *self = *self $op rhs; }
        }
    };
}

assign_op!(AddAssign, add_assign, +);
assign_op!(SubAssign, sub_assign, -);
assign_op!(MulAssign, mul_assign, *);
assign_op!(DivAssign, div_assign, /);

impl<C: Calculator, D: Calculator> PartialEq<Fraction<D>> for Fraction<C> {
    fn eq(&self, other: &Fraction<D>) -> bool {
        C::are_equal(self.parts, other.parts)
    }
}

impl<C: Calculator, D: Calculator> PartialOrd<Fraction<D>> for Fraction<C> {
    fn partial_cmp(&self, other: &Fraction<D>) -> Option<Ordering> {
        if C::are_equal(self.parts, other.parts) {
            Some(Ordering::Equal)
        } else if C::is_less(self.parts, other.parts) {
            Some(Ordering::Less)
        } else if C::is_greater(self.parts, other.parts) {
            Some(Ordering::Greater)
        } else {
            None
        }
    }

    fn lt(&self, other: &Fraction<D>) -> bool {
        C::is_less(self.parts, other.parts)
    }

    fn le(&self, other: &Fraction<D>) -> bool {
        C::is_less_or_equal(self.parts, other.parts)
    }

    fn gt(&self, other: &Fraction<D>) -> bool {
        C::is_greater(self.parts, other.parts)
    }

    fn ge(&self, other: &Fraction<D>) -> bool {
        C::is_greater_or_equal(self.parts, other.parts)
    }
}

impl<C: Calculator> AbsDiffEq for Fraction<C> {
    type Epsilon = f64;

    fn default_epsilon() -> f64 { f64::EPSILON }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.to_f64().abs_diff_eq(&other.to_f64(), epsilon)
    }
}

impl<C: Calculator> RelativeEq for Fraction<C> {
    fn default_max_relative() -> f64 { f64::default_max_relative() }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: f64,
        max_relative: f64,
    ) -> bool {
        self.to_f64()
            .relative_eq(&other.to_f64(), epsilon, max_relative)
    }
}

/// Formats the fraction as a mixed number (e.g. `2+1/3` or `-(1/2)`).
impl<C: Calculator> Display for Fraction<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }

        let Parts {
            numerator,
            denominator,
            positive,
        } = self.parts;
        let whole = numerator / denominator;
        let remainder = numerator % denominator;

        if !positive {
            write!(f, "-(")?;
        }

        if whole > 0 {
            write!(f, "{}", whole)?;

            if remainder != 0 {
                write!(f, "+{}/{}", remainder, denominator)?;
            }
        } else {
            write!(f, "{}/{}", remainder, denominator)?;
        }

        if !positive {
            write!(f, ")")?;
        }

        Ok(())
    }
}
