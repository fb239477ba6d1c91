//! Exact fractions with pluggable overflow handling, and a lazily evaluated
//! symbolic layer built on top of them.
//!
//! - [`Fraction`] is a reduced rational number whose arithmetic is done by a
//!   [`calculator::Calculator`]
//! - [`SymbolicFraction`] records operations as a tree of [`node::Node`]s
//!   and only does the arithmetic when it is evaluated
//! - Nodes are recycled through a [`pool::Pool`] shared by every
//!   [`SymbolicFraction`] created from the same [`symbolic::SharedPool`]

#[cfg(test)]
#[macro_use]
extern crate pretty_assertions;

pub mod calculator;
mod fraction;
pub mod matrix;
pub mod node;
pub mod pool;
mod proptests;
pub mod symbolic;
pub mod trig;

pub use calculator::{
    CheckedSafeCalculator, SafeCalculator, UnsafeCalculator, UnsafeOperation,
};
pub use fraction::Fraction;
pub use matrix::Matrix3;
pub use symbolic::{SharedPool, SymbolicFraction};
