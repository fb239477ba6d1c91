//! Build a couple of symbolic matrices and print them before and after
//! simplification.
//!
//! Usage: `cargo run --example matrix -- [precision]`

use sfract::{
    symbolic::{self, SharedPool},
    Fraction, Matrix3, SymbolicFraction,
};
use std::{env, error::Error};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let precision: usize = match env::args().nth(1) {
        Some(arg) => arg.parse()?,
        None => 3,
    };

    let pool: SharedPool = symbolic::pool();
    let fraction = |denominator| Fraction::new(1, denominator, true);

    let matrix = Matrix3::from_values(
        &pool,
        [
            [fraction(2), fraction(3), fraction(4)],
            [fraction(5), fraction(6), fraction(7)],
            [fraction(8), fraction(9), fraction(10)],
        ],
    );
    println!("matrix is\n{:.*}", precision, matrix);

    let squared = &matrix * &matrix;
    println!("matrix squared is\n{:.*}", precision, squared);
    println!("where the top left cell is {}\n", squared[(0, 0)].expression());

    let angle = SymbolicFraction::half_pi(&pool);
    let mut rotation = Matrix3::rotation(&angle);
    println!(
        "rotation matrix for 90 degrees (π/2) is\n{:.*}",
        precision, rotation
    );

    rotation.simplify();
    println!(
        "after simplification the rotation matrix for 90 degrees is\n{:.*}",
        precision, rotation
    );
    println!("as an nalgebra matrix:{}", rotation.to_numeric());

    log::info!("{:?}", pool.borrow().stats());

    Ok(())
}
