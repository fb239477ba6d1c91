//! Lazily evaluated fractions.

use crate::{
    calculator::{Calculator, CheckedSafeCalculator},
    node::{
        self, BinaryOperation, Evaluation, Node, NodeId, NodeKind, NodePool,
        UnaryOperation,
    },
    pool::Pool,
    Fraction,
};
use std::{
    cell::RefCell,
    fmt::{self, Debug, Display, Formatter},
    mem,
    ops::{
        Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign,
    },
    rc::Rc,
};

/// A [`NodePool`] which can be shared by many [`SymbolicFraction`]s on the
/// same thread.
pub type SharedPool<C = CheckedSafeCalculator> = Rc<RefCell<NodePool<C>>>;

/// Create a new [`SharedPool`] which caches released nodes for reuse.
pub fn pool<C: Calculator>() -> SharedPool<C> {
    Rc::new(RefCell::new(Pool::new()))
}

/// Create a new [`SharedPool`] which doesn't cache anything.
pub fn unpooled<C: Calculator>() -> SharedPool<C> {
    Rc::new(RefCell::new(Pool::unpooled()))
}

/// A tree of deferred fraction operations, only evaluated when asked.
///
/// Arithmetic never modifies its operands. Instead, each operation
/// deep-copies the operand trees into a new tree, so operands can be reused
/// freely. The result always lives in the left operand's pool.
///
/// A handful of algebraic identities (`x + 0`, `x * 1`, `x / -1`, etc.) are
/// applied when one operand is a plain value, but no other simplification
/// happens until the tree is evaluated.
///
/// ```rust
/// use sfract::{symbolic::{self, SharedPool}, Fraction, SymbolicFraction};
///
/// let pool: SharedPool = symbolic::pool();
/// let half = SymbolicFraction::new(&pool, Fraction::new(1, 2, true));
/// let third = SymbolicFraction::new(&pool, Fraction::new(1, 3, true));
///
/// let mut sum = &half + &third;
/// assert_eq!(sum.expression(), "(1/2) + (1/3)");
///
/// assert_eq!(sum.evaluate(), <Fraction>::new(5, 6, true));
/// assert!(sum.is_value());
/// ```
pub struct SymbolicFraction<C: Calculator = CheckedSafeCalculator> {
    pool: SharedPool<C>,
    root: NodeId,
}

impl<C: Calculator> SymbolicFraction<C> {
    pub fn new(pool: &SharedPool<C>, value: Fraction<C>) -> Self {
        let root = node::leaf(&mut pool.borrow_mut(), value);

        SymbolicFraction {
            pool: Rc::clone(pool),
            root,
        }
    }

    pub fn whole(pool: &SharedPool<C>, whole: u64, positive: bool) -> Self {
        SymbolicFraction::new(pool, Fraction::whole(whole, positive))
    }

    pub fn zero(pool: &SharedPool<C>) -> Self {
        SymbolicFraction::new(pool, Fraction::zero())
    }

    pub fn one(pool: &SharedPool<C>) -> Self {
        SymbolicFraction::new(pool, Fraction::one())
    }

    pub fn pi(pool: &SharedPool<C>) -> Self {
        SymbolicFraction::new(pool, Fraction::pi())
    }

    pub fn two_pi(pool: &SharedPool<C>) -> Self {
        SymbolicFraction::new(pool, Fraction::two_pi())
    }

    pub fn half_pi(pool: &SharedPool<C>) -> Self {
        SymbolicFraction::new(pool, Fraction::half_pi())
    }

    pub fn e(pool: &SharedPool<C>) -> Self {
        SymbolicFraction::new(pool, Fraction::e())
    }

    pub fn pool(&self) -> &SharedPool<C> { &self.pool }

    /// Reduce the whole tree to a single value, replacing the tree with that
    /// value so later calls are free.
    pub fn evaluate(&mut self) -> Fraction<C> {
        let mut pool = self.pool.borrow_mut();

        if let Some(value) = node::value(&pool, &self.root) {
            return value;
        }

        let result = node::evaluate(&mut pool, &self.root, Evaluation::Commit);
        let value = node::value(&pool, &result).unwrap_or_default();
        let previous = mem::replace(&mut self.root, result);
        node::release(&mut pool, previous);

        value
    }

    /// Calculate the tree's value without modifying it.
    ///
    /// Unlike [`SymbolicFraction::evaluate()`] the work is repeated every
    /// time this is called.
    pub fn value(&self) -> Fraction<C> {
        node::reduce(&self.pool.borrow(), self.root.block())
    }

    /// A new [`SymbolicFraction`] containing just this tree's value.
    pub fn simplified(&self) -> Self {
        SymbolicFraction::new(&self.pool, self.value())
    }

    pub fn negate(&mut self) { self.wrap_root(UnaryOperation::Negate); }

    pub fn invert(&mut self) { self.wrap_root(UnaryOperation::Reciprocal); }

    pub fn negation(&self) -> Self { self.apply(UnaryOperation::Negate) }

    pub fn reciprocal(&self) -> Self { self.apply(UnaryOperation::Reciprocal) }

    pub fn sin(&self) -> Self { self.apply(UnaryOperation::Sine) }

    pub fn cos(&self) -> Self { self.apply(UnaryOperation::Cosine) }

    pub fn tan(&self) -> Self { self.apply(UnaryOperation::Tangent) }

    /// What kind of node is at the root of the tree?
    pub fn kind(&self) -> NodeKind {
        node::kind(&self.pool.borrow(), &self.root).unwrap_or(NodeKind::Value)
    }

    /// Has this tree been reduced to a single value?
    pub fn is_value(&self) -> bool {
        node::is_value(&self.pool.borrow(), &self.root)
    }

    pub fn node_count(&self) -> usize {
        node::count(&self.pool.borrow(), &self.root)
    }

    /// The tree, written out as an expression.
    pub fn expression(&self) -> String {
        node::display(&self.pool.borrow(), &self.root).to_string()
    }

    fn with_root(&self, root: NodeId) -> Self {
        SymbolicFraction {
            pool: Rc::clone(&self.pool),
            root,
        }
    }

    /// Deep-copy this tree into `pool`.
    fn copy_into(&self, pool: &SharedPool<C>) -> NodeId {
        if Rc::ptr_eq(&self.pool, pool) {
            node::clone(&mut pool.borrow_mut(), &self.root)
        } else {
            node::transplant(
                &self.pool.borrow(),
                &self.root,
                &mut pool.borrow_mut(),
            )
        }
    }

    fn apply(&self, op: UnaryOperation) -> Self {
        let operand = self.copy_into(&self.pool);
        let root =
            node::insert(&mut self.pool.borrow_mut(), Node::Unary { operand, op });

        self.with_root(root)
    }

    fn wrap_root(&mut self, op: UnaryOperation) {
        let mut pool = self.pool.borrow_mut();
        // hold the root's place while the old root moves into the new node
        let placeholder = node::leaf(&mut pool, Fraction::zero());
        let operand = mem::replace(&mut self.root, placeholder);
        let wrapped = node::insert(&mut pool, Node::Unary { operand, op });
        let placeholder = mem::replace(&mut self.root, wrapped);
        node::release(&mut pool, placeholder);
    }

    fn combine<F>(&self, rhs: &SymbolicFraction<C>, combinator: F) -> Self
    where
        F: FnOnce(&mut NodePool<C>, NodeId, NodeId) -> NodeId,
    {
        let left = self.copy_into(&self.pool);
        let right = rhs.copy_into(&self.pool);
        let root = combinator(&mut self.pool.borrow_mut(), left, right);

        self.with_root(root)
    }
}

/// Values which let us use arithmetic's identity laws.
#[derive(Debug, Copy, Clone, PartialEq)]
enum Identity {
    Zero,
    One,
    MinusOne,
    /// Anything else, including operations which haven't been evaluated.
    Other,
}

impl Identity {
    fn of<C: Calculator>(pool: &NodePool<C>, id: &NodeId) -> Identity {
        match node::value(pool, id) {
            Some(value) if value.is_zero() => Identity::Zero,
            Some(value) if value.numerator() == 1 && value.denominator() == 1 => {
                if value.is_positive() {
                    Identity::One
                } else {
                    Identity::MinusOne
                }
            },
            _ => Identity::Other,
        }
    }
}

fn negated<C: Calculator>(pool: &mut NodePool<C>, operand: NodeId) -> NodeId {
    node::insert(
        pool,
        Node::Unary {
            operand,
            op: UnaryOperation::Negate,
        },
    )
}

fn inverted<C: Calculator>(pool: &mut NodePool<C>, operand: NodeId) -> NodeId {
    node::insert(
        pool,
        Node::Unary {
            operand,
            op: UnaryOperation::Reciprocal,
        },
    )
}

fn binary<C: Calculator>(
    pool: &mut NodePool<C>,
    left: NodeId,
    right: NodeId,
    op: BinaryOperation,
) -> NodeId {
    node::insert(pool, Node::Binary { left, right, op })
}

fn sum<C: Calculator>(
    pool: &mut NodePool<C>,
    left: NodeId,
    right: NodeId,
) -> NodeId {
    match (Identity::of(pool, &left), Identity::of(pool, &right)) {
        (_, Identity::Zero) => {
            node::release(pool, right);
            left
        },
        (Identity::Zero, _) => {
            node::release(pool, left);
            right
        },
        _ => binary(pool, left, right, BinaryOperation::Add),
    }
}

fn difference<C: Calculator>(
    pool: &mut NodePool<C>,
    left: NodeId,
    right: NodeId,
) -> NodeId {
    match (Identity::of(pool, &left), Identity::of(pool, &right)) {
        (_, Identity::Zero) => {
            node::release(pool, right);
            left
        },
        (Identity::Zero, _) => {
            node::release(pool, left);
            negated(pool, right)
        },
        _ => {
            let right = negated(pool, right);
            binary(pool, left, right, BinaryOperation::Add)
        },
    }
}

fn product<C: Calculator>(
    pool: &mut NodePool<C>,
    left: NodeId,
    right: NodeId,
) -> NodeId {
    match (Identity::of(pool, &left), Identity::of(pool, &right)) {
        (Identity::Zero, _) | (_, Identity::Zero) => {
            node::release(pool, left);
            node::release(pool, right);
            node::leaf(pool, Fraction::zero())
        },
        (_, Identity::One) => {
            node::release(pool, right);
            left
        },
        (Identity::One, _) => {
            node::release(pool, left);
            right
        },
        (_, Identity::MinusOne) => {
            node::release(pool, right);
            negated(pool, left)
        },
        (Identity::MinusOne, _) => {
            node::release(pool, left);
            negated(pool, right)
        },
        _ => binary(pool, left, right, BinaryOperation::Multiply),
    }
}

fn quotient<C: Calculator>(
    pool: &mut NodePool<C>,
    left: NodeId,
    right: NodeId,
) -> NodeId {
    match (Identity::of(pool, &left), Identity::of(pool, &right)) {
        (_, Identity::One) => {
            node::release(pool, right);
            left
        },
        (_, Identity::MinusOne) => {
            node::release(pool, right);
            negated(pool, left)
        },
        (Identity::One, _) => {
            node::release(pool, left);
            inverted(pool, right)
        },
        (Identity::MinusOne, _) => {
            node::release(pool, left);
            let right = inverted(pool, right);
            negated(pool, right)
        },
        _ => {
            let right = inverted(pool, right);
            binary(pool, left, right, BinaryOperation::Multiply)
        },
    }
}

macro_rules! binary_operator {
    ($trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident, $combinator:ident) => {
        impl<'a, 'b, C: Calculator> $trait<&'b SymbolicFraction<C>>
            for &'a SymbolicFraction<C>
        {
            type Output = SymbolicFraction<C>;

            fn $method(self, rhs: &'b SymbolicFraction<C>) -> SymbolicFraction<C> {
                self.combine(rhs, $combinator)
            }
        }

        impl<'b, C: Calculator> $trait<&'b SymbolicFraction<C>> for SymbolicFraction<C> {
            type Output = SymbolicFraction<C>;

            fn $method(self, rhs: &'b SymbolicFraction<C>) -> SymbolicFraction<C> {
                self.combine(rhs, $combinator)
            }
        }

        impl<'a, C: Calculator> $trait<SymbolicFraction<C>> for &'a SymbolicFraction<C> {
            type Output = SymbolicFraction<C>;

            fn $method(self, rhs: SymbolicFraction<C>) -> SymbolicFraction<C> {
                self.combine(&rhs, $combinator)
            }
        }

        impl<C: Calculator> $trait<SymbolicFraction<C>> for SymbolicFraction<C> {
            type Output = SymbolicFraction<C>;

            fn $method(self, rhs: SymbolicFraction<C>) -> SymbolicFraction<C> {
                self.combine(&rhs, $combinator)
            }
        }

        impl<'b, C: Calculator> $assign_trait<&'b SymbolicFraction<C>> for SymbolicFraction<C> {
            fn $assign_method(&mut self, rhs: &'b SymbolicFraction<C>) {
                *self = self.combine(rhs, $combinator);
            }
        }

        impl<C: Calculator> $assign_trait<SymbolicFraction<C>> for SymbolicFraction<C> {
            fn $assign_method(&mut self, rhs: SymbolicFraction<C>) {
                *self = self.combine(&rhs, $combinator);
            }
        }
    };
}

binary_operator!(Add, add, AddAssign, add_assign, sum);
binary_operator!(Sub, sub, SubAssign, sub_assign, difference);
binary_operator!(Mul, mul, MulAssign, mul_assign, product);
binary_operator!(Div, div, DivAssign, div_assign, quotient);

impl<'a, C: Calculator> Neg for &'a SymbolicFraction<C> {
    type Output = SymbolicFraction<C>;

    fn neg(self) -> Self::Output { self.negation() }
}

impl<C: Calculator> Neg for SymbolicFraction<C> {
    type Output = SymbolicFraction<C>;

    fn neg(self) -> Self::Output { self.negation() }
}

impl<C: Calculator> Clone for SymbolicFraction<C> {
    fn clone(&self) -> Self { self.with_root(self.copy_into(&self.pool)) }
}

impl<C: Calculator> Drop for SymbolicFraction<C> {
    fn drop(&mut self) {
        match self.pool.try_borrow_mut() {
            Ok(mut pool) => node::release_block(&mut pool, self.root.block()),
            Err(_) => log::warn!(
                "Leaking {:?} because its pool is already in use",
                self.root
            ),
        }
    }
}

/// Prints the evaluated value as a mixed number.
impl<C: Calculator> Display for SymbolicFraction<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl<C: Calculator> Debug for SymbolicFraction<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.pool.try_borrow() {
            Ok(pool) => write!(
                f,
                "SymbolicFraction({})",
                node::display(&pool, &self.root)
            ),
            Err(_) => write!(f, "SymbolicFraction({:?})", self.root),
        }
    }
}
