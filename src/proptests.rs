//! Property-based tests for fractions and symbolic trees.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use std::f64::consts::FRAC_PI_2;

    use crate::{
        calculator::{
            Calculator, CheckedSafeCalculator, Parts, SafeCalculator,
            UnsafeCalculator,
        },
        node::NodeKind,
        symbolic, Fraction, SymbolicFraction,
    };

    type F = Fraction<CheckedSafeCalculator>;
    type S = SymbolicFraction<CheckedSafeCalculator>;

    // Strategy for generating small fractions, (numerator, denominator, positive)
    fn small_fraction() -> impl Strategy<Value = (u64, u64, bool)> {
        (0u64..10_000, 1u64..10_000, any::<bool>())
    }

    fn additive_inverse<C: Calculator>(
        (numerator, denominator, positive): (u64, u64, bool),
    ) -> Parts {
        let a = Fraction::<C>::new(numerator, denominator, positive);
        (a + -a).parts()
    }

    proptest! {
        #[test]
        fn reduction_is_idempotent(
            numerator in any::<u64>(),
            denominator in any::<u64>(),
            positive in any::<bool>(),
        ) {
            let once = F::new(numerator, denominator, positive);
            let twice = F::from_parts(once.parts());

            prop_assert_eq!(once.parts(), twice.parts());
        }

        #[test]
        fn zero_denominators_become_one(
            numerator in any::<u64>(),
            positive in any::<bool>(),
        ) {
            let got = F::new(numerator, 0, positive);

            prop_assert_eq!(got.denominator(), 1);
            prop_assert_eq!(got.numerator(), numerator);
        }

        #[test]
        fn a_number_minus_itself_is_zero(fraction in small_fraction()) {
            let zero = Parts::new(0, 1, true);

            prop_assert_eq!(additive_inverse::<UnsafeCalculator>(fraction), zero);
            prop_assert_eq!(additive_inverse::<SafeCalculator>(fraction), zero);
            prop_assert_eq!(additive_inverse::<CheckedSafeCalculator>(fraction), zero);
        }

        #[test]
        fn exact_addition_is_commutative(a in small_fraction(), b in small_fraction()) {
            let a = F::new(a.0, a.1, a.2);
            let b = F::new(b.0, b.1, b.2);

            prop_assert_eq!((a + b).parts(), (b + a).parts());
        }

        #[test]
        fn approximations_are_close(x in -1e6f64..1e6) {
            let got = F::approximate(x).to_f64();

            prop_assert!((got - x).abs() <= 1e-12 * x.abs().max(1.0));
        }

        #[test]
        fn sine_matches_the_standard_library(x in 0.0f64..FRAC_PI_2) {
            let x = F::approximate(x);

            let got = x.sin().to_f64();

            prop_assert!((got - x.to_f64().sin()).abs() < 1e-6);
        }

        #[test]
        fn multiplying_by_one_returns_the_leaf(fraction in small_fraction()) {
            let pool = symbolic::pool();
            let (numerator, denominator, positive) = fraction;
            let x = S::new(&pool, F::new(numerator, denominator, positive));

            let got = &x * &S::one(&pool);

            prop_assert_eq!(got.kind(), NodeKind::Value);
            prop_assert_eq!(got.value().parts(), x.value().parts());
        }

        #[test]
        fn clones_survive_evaluating_the_original(a in small_fraction(), b in small_fraction()) {
            let pool = symbolic::pool();
            let a = S::new(&pool, F::new(a.0, a.1, a.2));
            let b = S::new(&pool, F::new(b.0, b.1, b.2));
            let mut original = (&a * &b).cos() - &a;
            let copy = original.clone();
            let nodes = copy.node_count();

            let value = original.evaluate();

            prop_assert!(original.is_value());
            prop_assert_eq!(copy.node_count(), nodes);
            prop_assert_eq!(copy.value().parts(), value.parts());
        }
    }
}
