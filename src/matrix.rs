//! A 3x3 matrix of symbolic fractions, containing just the operations needed
//! for 2D transforms.

use crate::{
    calculator::{Calculator, CheckedSafeCalculator},
    symbolic::SharedPool,
    Fraction, SymbolicFraction,
};
use arrayvec::ArrayVec;
use std::{
    fmt::{self, Display, Formatter},
    ops::{Index, IndexMut, Mul},
};

const SIZE: usize = 3;

/// A 3x3 matrix laid out row by row.
#[derive(Debug, Clone)]
pub struct Matrix3<C: Calculator = CheckedSafeCalculator> {
    cells: ArrayVec<[SymbolicFraction<C>; SIZE * SIZE]>,
}

impl<C: Calculator> Matrix3<C> {
    /// Create a new [`Matrix3`] by invoking some `fn(column, row) -> T`
    /// function for each cell.
    pub fn init<F>(mut get_cell: F) -> Self
    where
        F: FnMut(usize, usize) -> SymbolicFraction<C>,
    {
        let mut cells = ArrayVec::new();

        for row in 0..SIZE {
            for column in 0..SIZE {
                cells.push(get_cell(column, row));
            }
        }

        Matrix3 { cells }
    }

    pub fn from_values(
        pool: &SharedPool<C>,
        rows: [[Fraction<C>; SIZE]; SIZE],
    ) -> Self {
        Matrix3::init(|column, row| SymbolicFraction::new(pool, rows[row][column]))
    }

    pub fn identity(pool: &SharedPool<C>) -> Self {
        Matrix3::init(|column, row| {
            if column == row {
                SymbolicFraction::one(pool)
            } else {
                SymbolicFraction::zero(pool)
            }
        })
    }

    /// A rotation about the z axis.
    ///
    /// The sine and cosine are taken of the angle's magnitude after
    /// reducing it into `[0, π/2]`, so only angles in that range produce a
    /// true rotation.
    pub fn rotation(angle: &SymbolicFraction<C>) -> Self {
        let pool = angle.pool();
        let sin = angle.sin();
        let cos = angle.cos();

        Matrix3::init(|column, row| match (column, row) {
            (0, 0) | (1, 1) => cos.clone(),
            (1, 0) => -&sin,
            (0, 1) => sin.clone(),
            (2, 2) => SymbolicFraction::one(pool),
            _ => SymbolicFraction::zero(pool),
        })
    }

    fn index(column: usize, row: usize) -> usize { row * SIZE + column }

    pub fn get(&self, column: usize, row: usize) -> Option<&SymbolicFraction<C>> {
        if column < SIZE && row < SIZE {
            self.cells.get(Matrix3::<C>::index(column, row))
        } else {
            None
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[SymbolicFraction<C>]> + '_ {
        self.cells.chunks_exact(SIZE)
    }

    /// Replace every cell with its evaluated value.
    pub fn simplify(&mut self) {
        for cell in self.cells.iter_mut() {
            *cell = cell.simplified();
        }
    }

    /// Evaluate the matrix into something which can be used with the rest
    /// of the `nalgebra` ecosystem.
    pub fn to_numeric(&self) -> nalgebra::Matrix3<f64> {
        nalgebra::Matrix3::from_fn(|row, column| {
            self[(column, row)].value().to_f64()
        })
    }
}

impl<C: Calculator> Index<(usize, usize)> for Matrix3<C> {
    type Output = SymbolicFraction<C>;

    fn index(&self, (column, row): (usize, usize)) -> &Self::Output {
        assert!(column < SIZE && row < SIZE, "({}, {}) is out of bounds", column, row);
        &self.cells[Matrix3::<C>::index(column, row)]
    }
}

impl<C: Calculator> IndexMut<(usize, usize)> for Matrix3<C> {
    fn index_mut(&mut self, (column, row): (usize, usize)) -> &mut Self::Output {
        assert!(column < SIZE && row < SIZE, "({}, {}) is out of bounds", column, row);
        &mut self.cells[Matrix3::<C>::index(column, row)]
    }
}

impl<'a, 'b, C: Calculator> Mul<&'b Matrix3<C>> for &'a Matrix3<C> {
    type Output = Matrix3<C>;

    fn mul(self, rhs: &'b Matrix3<C>) -> Matrix3<C> {
        Matrix3::init(|column, row| {
            let mut sum = &self[(0, row)] * &rhs[(column, 0)];

            for k in 1..SIZE {
                sum += &self[(k, row)] * &rhs[(column, k)];
            }

            sum
        })
    }
}

impl<C: Calculator> Mul for Matrix3<C> {
    type Output = Matrix3<C>;

    fn mul(self, rhs: Matrix3<C>) -> Matrix3<C> { &self * &rhs }
}

/// Prints each row's evaluated values, using the formatter's precision if
/// there is one.
impl<C: Calculator> Display for Matrix3<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "+----")?;

        for row in self.rows() {
            write!(f, "|")?;

            for (i, cell) in row.iter().enumerate() {
                let value = cell.value().to_f64();
                let separator = if i == 0 { " " } else { ", " };

                match f.precision() {
                    Some(precision) => {
                        write!(f, "{}{:.*}", separator, precision, value)?
                    },
                    None => write!(f, "{}{}", separator, value)?,
                }
            }

            writeln!(f)?;
        }

        writeln!(f, "+----")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic;
    use approx::assert_relative_eq;
    use nalgebra::{Rotation3, Vector3};
    use std::f64::consts::{FRAC_PI_2, PI};

    type F = Fraction<CheckedSafeCalculator>;
    type M = Matrix3<CheckedSafeCalculator>;

    fn sample(pool: &SharedPool) -> M {
        M::init(|column, row| {
            SymbolicFraction::new(pool, F::new(1, (row * SIZE + column + 2) as u64, true))
        })
    }

    #[test]
    fn cells_are_laid_out_row_by_row() {
        let pool = symbolic::pool();
        let m = sample(&pool);

        assert_eq!(m[(0, 0)].value(), F::new(1, 2, true));
        assert_eq!(m[(2, 0)].value(), F::new(1, 4, true));
        assert_eq!(m[(0, 2)].value(), F::new(1, 8, true));
        assert!(m.get(3, 0).is_none());
    }

    #[test]
    fn rotate_by_a_right_angle() {
        let pool = symbolic::pool();
        let angle = SymbolicFraction::half_pi(&pool);

        let got = M::rotation(&angle).to_numeric();

        let should_be = Rotation3::from_axis_angle(&Vector3::z_axis(), FRAC_PI_2);
        assert_relative_eq!(got, *should_be.matrix(), epsilon = 1e-6);
    }

    #[test]
    fn two_right_angles_make_a_half_turn() {
        let pool = symbolic::pool();
        let quarter_turn = M::rotation(&SymbolicFraction::half_pi(&pool));

        let got = (&quarter_turn * &quarter_turn).to_numeric();

        let should_be = Rotation3::from_axis_angle(&Vector3::z_axis(), PI);
        assert_relative_eq!(got, *should_be.matrix(), epsilon = 1e-6);
    }

    #[test]
    fn multiply_matches_nalgebra() {
        let pool = symbolic::pool();
        let m = sample(&pool);

        let got = &m * &m;

        let numeric = m.to_numeric();
        assert_relative_eq!(got.to_numeric(), numeric * numeric, epsilon = 1e-12);
        assert_eq!(got[(1, 1)].value().parts(), {
            let should_be = F::new(1, 5, true) * F::new(1, 3, true)
                + F::new(1, 6, true) * F::new(1, 6, true)
                + F::new(1, 7, true) * F::new(1, 9, true);
            should_be.parts()
        });
    }

    #[test]
    fn multiplying_by_the_identity_changes_nothing() {
        let pool = symbolic::pool();
        let m = sample(&pool);

        let got = &M::identity(&pool) * &m;

        for row in 0..SIZE {
            for column in 0..SIZE {
                assert_eq!(got[(column, row)].value(), m[(column, row)].value());
                // x*0 and 0 + x short-circuit, leaving just the original leaf
                assert!(got[(column, row)].is_value());
            }
        }
    }

    #[test]
    fn simplify_collapses_every_cell() {
        let pool = symbolic::pool();
        let m = sample(&pool);
        let mut product = &m * &m;
        let before = product.to_numeric();

        product.simplify();

        assert!(product.rows().flatten().all(|cell| cell.is_value()));
        assert_eq!(product.to_numeric(), before);
    }

    #[test]
    fn display_rows() {
        let pool = symbolic::pool();
        let mut m = M::identity(&pool);
        m[(2, 0)] = SymbolicFraction::new(&pool, F::new(1, 2, false));

        let got = format!("{:.1}", m);

        assert_eq!(
            got,
            "+----\n| 1.0, 0.0, -0.5\n| 0.0, 1.0, 0.0\n| 0.0, 0.0, 1.0\n+----\n"
        );
        assert_eq!(
            M::identity(&pool).to_string(),
            "+----\n| 1, 0, 0\n| 0, 1, 0\n| 0, 0, 1\n+----\n"
        );
    }
}
