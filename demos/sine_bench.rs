//! Sum the sine of a table of angles in `(0, π/2]` over and over, comparing
//! plain floats, each calculator and the symbolic layer.
//!
//! Usage: `cargo run --example sine_bench -- [divisions] [loops]`

use sfract::{
    calculator::Calculator,
    symbolic::{self, SharedPool},
    CheckedSafeCalculator, Fraction, SafeCalculator, SymbolicFraction,
    UnsafeCalculator,
};
use std::{
    env, error::Error, f64::consts::FRAC_PI_2, str::FromStr, time::Instant,
};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let divisions: u64 = parse_or(args.next(), 8)?;
    let loops: usize = parse_or(args.next(), 100)?;

    println!(
        "Summing the sine of {} angles, {} times over\n",
        divisions, loops
    );

    run("f64", || {
        let delta = FRAC_PI_2 / divisions as f64;
        let angles: Vec<f64> =
            (1..=divisions).map(|i| delta * i as f64).collect();
        let mut sum = 0.0;

        for _ in 0..loops {
            for angle in &angles {
                sum += angle.sin();
            }
        }

        sum
    });

    run(UnsafeCalculator::NAME, || {
        fraction_sum::<UnsafeCalculator>(divisions, loops)
    });
    run(SafeCalculator::NAME, || {
        fraction_sum::<SafeCalculator>(divisions, loops)
    });
    run(CheckedSafeCalculator::NAME, || {
        fraction_sum::<CheckedSafeCalculator>(divisions, loops)
    });

    run("symbolic (unpooled)", || {
        symbolic_sum(&symbolic::unpooled(), divisions, loops)
    });
    run("symbolic (pooled)", || {
        symbolic_sum(&symbolic::pool(), divisions, loops)
    });

    Ok(())
}

fn parse_or<T>(arg: Option<String>, default: T) -> Result<T, Box<dyn Error>>
where
    T: FromStr,
    T::Err: Error + 'static,
{
    match arg {
        Some(arg) => Ok(arg.parse()?),
        None => Ok(default),
    }
}

fn run<F>(name: &str, sum: F)
where
    F: FnOnce() -> f64,
{
    let start = Instant::now();
    let sum = sum();
    let run_time = start.elapsed();

    println!("{}", name);
    println!("  sum      = {}", sum);
    println!("  run time = {:?}\n", run_time);
}

fn fraction_sum<C: Calculator>(divisions: u64, loops: usize) -> f64 {
    let delta = Fraction::<C>::half_pi() / Fraction::<C>::whole(divisions, true);
    let angles: Vec<Fraction<C>> = (1..=divisions)
        .map(|i| delta * Fraction::<C>::whole(i, true))
        .collect();
    let mut sum = Fraction::<C>::zero();

    for _ in 0..loops {
        for angle in &angles {
            sum += angle.sin();
        }
    }

    sum.to_f64()
}

fn symbolic_sum(pool: &SharedPool, divisions: u64, loops: usize) -> f64 {
    let delta = SymbolicFraction::half_pi(pool)
        / SymbolicFraction::whole(pool, divisions, true);
    let angles: Vec<SymbolicFraction> = (1..=divisions)
        .map(|i| &delta * &SymbolicFraction::whole(pool, i, true))
        .collect();
    let mut sum = SymbolicFraction::zero(pool);

    for _ in 0..loops {
        for angle in &angles {
            sum += angle.sin();
        }
    }

    let value = sum.evaluate().to_f64();
    log::info!("{:?}", pool.borrow().stats());

    value
}
