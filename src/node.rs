//! The operation tree behind a [`crate::SymbolicFraction`].
//!
//! Nodes live in a [`NodePool`] and refer to their children by [`NodeId`].
//! Every node exclusively owns its children, so the nodes always form a tree
//! and the only way to get a second copy of a subtree is [`clone()`] (or
//! [`transplant()`] when the copy should live in another pool).

use crate::{
    calculator::{Calculator, CheckedSafeCalculator},
    pool::{BlockId, Pool},
    Fraction,
};
use std::{
    fmt::{self, Display, Formatter},
    mem,
};

pub type NodePool<C = CheckedSafeCalculator> = Pool<Node<C>>;

/// An owning handle to a node in a [`NodePool`].
///
/// This is deliberately neither `Copy` nor `Clone`. Whoever holds the
/// [`NodeId`] is responsible for eventually passing it to [`release()`].
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct NodeId(BlockId);

impl NodeId {
    pub fn block(&self) -> BlockId { self.0 }
}

/// A single node in the operation tree.
#[derive(Debug)]
pub enum Node<C = CheckedSafeCalculator> {
    Value(Fraction<C>),
    /// An operation involving two operands.
    Binary {
        left: NodeId,
        right: NodeId,
        op: BinaryOperation,
    },
    /// An operation involving a single operand.
    Unary {
        operand: NodeId,
        op: UnaryOperation,
    },
}

impl<C: Calculator> Node<C> {
    /// The number of bytes this node's payload takes up, used to pick a
    /// free-list in the [`NodePool`].
    pub fn size(&self) -> usize {
        match self {
            Node::Value(_) => mem::size_of::<Fraction<C>>(),
            Node::Binary { .. } => mem::size_of::<[NodeId; 2]>(),
            Node::Unary { .. } => mem::size_of::<NodeId>(),
        }
    }

    pub fn is_value(&self) -> bool {
        match self {
            Node::Value(_) => true,
            _ => false,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Value(_) => NodeKind::Value,
            Node::Binary { op, .. } => op.kind(),
            Node::Unary { op, .. } => op.kind(),
        }
    }

    fn shape(&self) -> Shape<C> {
        match self {
            Node::Value(value) => Shape::Value(*value),
            Node::Binary { left, right, op } => {
                Shape::Binary(left.block(), right.block(), *op)
            },
            Node::Unary { operand, op } => Shape::Unary(operand.block(), *op),
        }
    }

    fn is_compound(&self) -> bool {
        match self {
            Node::Value(value) => {
                value.is_positive() && value.denominator() != 1
            },
            Node::Binary { .. } => true,
            Node::Unary { op, .. } => *op == UnaryOperation::Reciprocal,
        }
    }
}

/// An operation that can be applied to two arguments.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum BinaryOperation {
    Add,
    Multiply,
}

impl BinaryOperation {
    pub fn apply<C: Calculator>(
        self,
        left: Fraction<C>,
        right: Fraction<C>,
    ) -> Fraction<C> {
        match self {
            BinaryOperation::Add => left + right,
            BinaryOperation::Multiply => left * right,
        }
    }

    pub fn kind(self) -> NodeKind {
        match self {
            BinaryOperation::Add => NodeKind::Add,
            BinaryOperation::Multiply => NodeKind::Multiply,
        }
    }
}

/// An operation that can be applied to a single argument.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UnaryOperation {
    Negate,
    Reciprocal,
    Sine,
    Cosine,
    Tangent,
}

impl UnaryOperation {
    pub fn apply<C: Calculator>(self, operand: Fraction<C>) -> Fraction<C> {
        match self {
            UnaryOperation::Negate => -operand,
            UnaryOperation::Reciprocal => operand.reciprocal(),
            UnaryOperation::Sine => operand.sin(),
            UnaryOperation::Cosine => operand.cos(),
            UnaryOperation::Tangent => operand.tan(),
        }
    }

    pub fn kind(self) -> NodeKind {
        match self {
            UnaryOperation::Negate => NodeKind::Negate,
            UnaryOperation::Reciprocal => NodeKind::Reciprocal,
            UnaryOperation::Sine => NodeKind::Sine,
            UnaryOperation::Cosine => NodeKind::Cosine,
            UnaryOperation::Tangent => NodeKind::Tangent,
        }
    }
}

/// The concrete type of a [`Node`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Value,
    Add,
    Multiply,
    Negate,
    Reciprocal,
    Sine,
    Cosine,
    Tangent,
}

/// What [`evaluate()`] should do with the tree it is reducing.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Evaluation {
    /// Replace the node's immediate children with their values.
    Commit,
    /// Leave the tree untouched.
    Scratch,
}

/// A copy of a node's contents which doesn't borrow from the pool.
#[derive(Copy, Clone)]
enum Shape<C> {
    Value(Fraction<C>),
    Binary(BlockId, BlockId, BinaryOperation),
    Unary(BlockId, UnaryOperation),
}

impl<C: Calculator> Shape<C> {
    fn of(pool: &NodePool<C>, id: BlockId) -> Self {
        match pool.get(id) {
            Some(node) => node.shape(),
            None => {
                log::warn!("Tried to use {:?} after it was released", id);
                Shape::Value(Fraction::zero())
            },
        }
    }

    /// Turn this back into a [`Node`], using `child` to create a copy of
    /// each child.
    fn rebuild<F>(self, mut child: F) -> Node<C>
    where
        F: FnMut(BlockId) -> NodeId,
    {
        match self {
            Shape::Value(value) => Node::Value(value),
            Shape::Binary(left, right, op) => Node::Binary {
                left: child(left),
                right: child(right),
                op,
            },
            Shape::Unary(operand, op) => Node::Unary {
                operand: child(operand),
                op,
            },
        }
    }
}

pub fn insert<C: Calculator>(pool: &mut NodePool<C>, node: Node<C>) -> NodeId {
    let size = node.size();
    NodeId(pool.allocate(size, node))
}

pub fn leaf<C: Calculator>(
    pool: &mut NodePool<C>,
    value: Fraction<C>,
) -> NodeId {
    insert(pool, Node::Value(value))
}

/// Give a node and all of its children back to the pool.
pub fn release<C: Calculator>(pool: &mut NodePool<C>, id: NodeId) {
    release_block(pool, id.block());
}

/// Release the node stored in `id`, for owners which are being destroyed and
/// can't give up their [`NodeId`] by value.
pub(crate) fn release_block<C: Calculator>(pool: &mut NodePool<C>, id: BlockId) {
    match pool.deallocate(id) {
        Some(Node::Binary { left, right, .. }) => {
            release(pool, left);
            release(pool, right);
        },
        Some(Node::Unary { operand, .. }) => release(pool, operand),
        Some(Node::Value(_)) | None => {},
    }
}

/// Reduce a tree to a single value, returning a new [`Node::Value`] leaf
/// which is owned by the caller.
///
/// With [`Evaluation::Commit`], any child of `id` which isn't already a value
/// is replaced by a leaf holding its value and the old subtree is released,
/// so evaluating the same node again only needs to combine two leaves. With
/// [`Evaluation::Scratch`] the tree is left exactly as it was.
pub fn evaluate<C: Calculator>(
    pool: &mut NodePool<C>,
    id: &NodeId,
    mode: Evaluation,
) -> NodeId {
    let value = match mode {
        Evaluation::Commit => commit(pool, id.block()),
        Evaluation::Scratch => reduce(pool, id.block()),
    };

    leaf(pool, value)
}

/// Calculate the value of a node without touching the tree.
pub fn reduce<C: Calculator>(pool: &NodePool<C>, id: BlockId) -> Fraction<C> {
    match Shape::of(pool, id) {
        Shape::Value(value) => value,
        Shape::Binary(left, right, op) => {
            op.apply(reduce(pool, left), reduce(pool, right))
        },
        Shape::Unary(operand, op) => op.apply(reduce(pool, operand)),
    }
}

fn commit<C: Calculator>(pool: &mut NodePool<C>, id: BlockId) -> Fraction<C> {
    match Shape::of(pool, id) {
        Shape::Value(value) => value,
        Shape::Binary(left, right, op) => {
            let left = memoise(pool, id, left);
            let right = memoise(pool, id, right);
            op.apply(left, right)
        },
        Shape::Unary(operand, op) => op.apply(memoise(pool, id, operand)),
    }
}

/// Reduce `child` and, unless it already is one, swap it out of `parent`
/// for a leaf holding its value.
fn memoise<C: Calculator>(
    pool: &mut NodePool<C>,
    parent: BlockId,
    child: BlockId,
) -> Fraction<C> {
    let value = reduce(pool, child);

    if let Shape::Value(_) = Shape::of(pool, child) {
        return value;
    }

    let memoised = leaf(pool, value);
    let previous = match pool.get_mut(parent) {
        Some(Node::Binary { left, .. }) if left.block() == child => {
            mem::replace(left, memoised)
        },
        Some(Node::Binary { right, .. }) if right.block() == child => {
            mem::replace(right, memoised)
        },
        Some(Node::Unary { operand, .. }) if operand.block() == child => {
            mem::replace(operand, memoised)
        },
        _ => memoised,
    };
    release(pool, previous);

    value
}

/// Create a deep copy of a subtree in the same pool.
pub fn clone<C: Calculator>(pool: &mut NodePool<C>, id: &NodeId) -> NodeId {
    clone_block(pool, id.block())
}

fn clone_block<C: Calculator>(pool: &mut NodePool<C>, id: BlockId) -> NodeId {
    let node = Shape::of(pool, id).rebuild(|child| clone_block(pool, child));
    insert(pool, node)
}

/// Create a deep copy of a subtree from one pool in another pool.
pub fn transplant<C: Calculator>(
    source: &NodePool<C>,
    id: &NodeId,
    destination: &mut NodePool<C>,
) -> NodeId {
    transplant_block(source, id.block(), destination)
}

fn transplant_block<C: Calculator>(
    source: &NodePool<C>,
    id: BlockId,
    destination: &mut NodePool<C>,
) -> NodeId {
    let node = Shape::of(source, id)
        .rebuild(|child| transplant_block(source, child, destination));
    insert(destination, node)
}

pub fn size<C: Calculator>(pool: &NodePool<C>, id: &NodeId) -> usize {
    pool.get(id.block()).map_or(0, Node::size)
}

pub fn is_value<C: Calculator>(pool: &NodePool<C>, id: &NodeId) -> bool {
    pool.get(id.block()).map_or(false, Node::is_value)
}

pub fn kind<C: Calculator>(pool: &NodePool<C>, id: &NodeId) -> Option<NodeKind> {
    pool.get(id.block()).map(Node::kind)
}

/// The node's value, if it is a leaf.
pub fn value<C: Calculator>(
    pool: &NodePool<C>,
    id: &NodeId,
) -> Option<Fraction<C>> {
    match pool.get(id.block()) {
        Some(Node::Value(value)) => Some(*value),
        _ => None,
    }
}

/// How many nodes are in a subtree.
pub fn count<C: Calculator>(pool: &NodePool<C>, id: &NodeId) -> usize {
    count_block(pool, id.block())
}

fn count_block<C: Calculator>(pool: &NodePool<C>, id: BlockId) -> usize {
    match pool.get(id) {
        Some(Node::Value(_)) => 1,
        Some(Node::Binary { left, right, .. }) => {
            1 + count_block(pool, left.block())
                + count_block(pool, right.block())
        },
        Some(Node::Unary { operand, .. }) => {
            1 + count_block(pool, operand.block())
        },
        None => 0,
    }
}

/// Render a subtree as a human-readable expression.
pub fn display<'a, C: Calculator>(
    pool: &'a NodePool<C>,
    id: &NodeId,
) -> Expression<'a, C> {
    Expression {
        pool,
        id: id.block(),
    }
}

/// A subtree which can be printed with [`Display`].
pub struct Expression<'a, C: Calculator> {
    pool: &'a NodePool<C>,
    id: BlockId,
}

impl<'a, C: Calculator> Expression<'a, C> {
    fn child(&self, id: &NodeId) -> Self {
        Expression {
            pool: self.pool,
            id: id.block(),
        }
    }
}

impl<'a, C: Calculator> Display for Expression<'a, C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.pool.get(self.id) {
            None => write!(f, "?"),
            Some(Node::Value(value)) => write!(f, "{}", value),
            Some(Node::Binary { left, right, op }) => {
                write_compound(&self.child(left), f)?;

                let op = match op {
                    BinaryOperation::Add => " + ",
                    BinaryOperation::Multiply => "*",
                };
                write!(f, "{}", op)?;

                write_compound(&self.child(right), f)?;

                Ok(())
            },
            Some(Node::Unary { operand, op }) => {
                let operand = self.child(operand);

                match op {
                    UnaryOperation::Negate => {
                        write!(f, "-")?;
                        write_compound(&operand, f)
                    },
                    UnaryOperation::Reciprocal => {
                        write!(f, "1/")?;
                        write_compound(&operand, f)
                    },
                    UnaryOperation::Sine => write!(f, "sin({})", operand),
                    UnaryOperation::Cosine => write!(f, "cos({})", operand),
                    UnaryOperation::Tangent => write!(f, "tan({})", operand),
                }
            },
        }
    }
}

fn write_compound<C: Calculator>(
    expr: &Expression<'_, C>,
    f: &mut Formatter<'_>,
) -> fmt::Result {
    let compound = expr.pool.get(expr.id).map_or(false, Node::is_compound);

    if compound {
        write!(f, "({})", expr)
    } else {
        write!(f, "{}", expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type F = Fraction<CheckedSafeCalculator>;

    fn binary(
        pool: &mut NodePool,
        left: NodeId,
        right: NodeId,
        op: BinaryOperation,
    ) -> NodeId {
        insert(pool, Node::Binary { left, right, op })
    }

    fn unary(pool: &mut NodePool, operand: NodeId, op: UnaryOperation) -> NodeId {
        insert(pool, Node::Unary { operand, op })
    }

    /// `(1/2 * 2) + -(1/3)`
    fn sample_tree(pool: &mut NodePool) -> NodeId {
        let half = leaf(pool, F::new(1, 2, true));
        let two = leaf(pool, F::whole(2, true));
        let product = binary(pool, half, two, BinaryOperation::Multiply);
        let third = leaf(pool, F::new(1, 3, true));
        let negated = unary(pool, third, UnaryOperation::Negate);

        binary(pool, product, negated, BinaryOperation::Add)
    }

    #[test]
    fn scratch_evaluation_leaves_the_tree_alone() {
        let mut pool = NodePool::new();
        let root = sample_tree(&mut pool);

        let result = evaluate(&mut pool, &root, Evaluation::Scratch);

        assert_eq!(value(&pool, &result), Some(F::new(2, 3, true)));
        assert_eq!(count(&pool, &root), 6);
        assert_eq!(display(&pool, &root).to_string(), "((1/2)*2) + -(1/3)");
    }

    #[test]
    fn committed_evaluation_memoises_the_immediate_children() {
        let mut pool = NodePool::new();
        let root = sample_tree(&mut pool);

        let result = evaluate(&mut pool, &root, Evaluation::Commit);

        assert_eq!(value(&pool, &result), Some(F::new(2, 3, true)));
        assert_eq!(kind(&pool, &root), Some(NodeKind::Add));
        assert_eq!(count(&pool, &root), 3);
        assert_eq!(display(&pool, &root).to_string(), "1 + -(1/3)");
        // the root, its two new leaves and the result
        assert_eq!(pool.stats().live, 4);

        // evaluating again doesn't need to touch the children
        let fresh_allocations = pool.stats().fresh_allocations;
        let reuses = pool.stats().reuses;
        let again = evaluate(&mut pool, &root, Evaluation::Commit);
        assert_eq!(value(&pool, &again), Some(F::new(2, 3, true)));
        let stats = pool.stats();
        assert_eq!(
            stats.fresh_allocations + stats.reuses,
            fresh_allocations + reuses + 1
        );
    }

    #[test]
    fn a_leaf_evaluates_to_a_copy_of_itself() {
        let mut pool = NodePool::new();
        let original = leaf(&mut pool, F::new(3, 4, false));

        for &mode in &[Evaluation::Commit, Evaluation::Scratch] {
            let copy = evaluate(&mut pool, &original, mode);

            assert_ne!(copy, original);
            assert_eq!(value(&pool, &copy), value(&pool, &original));
            release(&mut pool, copy);
        }
    }

    #[test]
    fn release_cascades_into_children() {
        let mut pool = NodePool::new();
        let root = sample_tree(&mut pool);
        assert_eq!(pool.stats().live, 6);

        release(&mut pool, root);

        assert_eq!(pool.stats().live, 0);
        assert_eq!(pool.stats().cached, 6);
    }

    #[test]
    fn clones_are_independent() {
        let mut pool = NodePool::new();
        let original = sample_tree(&mut pool);
        let copy = clone(&mut pool, &original);

        let _ = evaluate(&mut pool, &original, Evaluation::Commit);

        assert_eq!(count(&pool, &copy), 6);
        assert_eq!(reduce(&pool, copy.block()), F::new(2, 3, true));
    }

    #[test]
    fn transplant_into_another_pool() {
        let mut source = NodePool::new();
        let mut destination = NodePool::new();
        let original = sample_tree(&mut source);

        let copy = transplant(&source, &original, &mut destination);
        release(&mut source, original);

        assert_eq!(count(&destination, &copy), 6);
        assert_eq!(reduce(&destination, copy.block()), F::new(2, 3, true));
        assert_eq!(source.stats().live, 0);
    }

    #[test]
    fn the_reciprocal_of_zero_is_zero() {
        let mut pool = NodePool::new();
        let zero = leaf(&mut pool, F::zero());
        let root = unary(&mut pool, zero, UnaryOperation::Reciprocal);

        let result = evaluate(&mut pool, &root, Evaluation::Scratch);

        assert_eq!(value(&pool, &result), Some(F::zero()));
    }

    #[test]
    fn node_sizes() {
        let mut pool = NodePool::new();
        let a = leaf(&mut pool, F::one());
        let b = leaf(&mut pool, F::one());
        let value_size = size(&pool, &a);
        let negated = unary(&mut pool, a, UnaryOperation::Negate);
        let sum = binary(&mut pool, negated, b, BinaryOperation::Add);

        assert_eq!(value_size, mem::size_of::<F>());
        assert_eq!(size(&pool, &sum), 2 * mem::size_of::<NodeId>());
        assert!(!is_value(&pool, &sum));
    }

    #[test]
    fn display_expressions() {
        let mut pool = NodePool::new();
        let inputs: Vec<(Box<dyn Fn(&mut NodePool) -> NodeId>, &str)> = vec![
            (Box::new(|p| leaf(p, F::new(5, 2, true))), "2+1/2"),
            (
                Box::new(|p| {
                    let x = leaf(p, F::new(1, 2, true));
                    unary(p, x, UnaryOperation::Sine)
                }),
                "sin(1/2)",
            ),
            (
                Box::new(|p| {
                    let x = leaf(p, F::whole(3, true));
                    unary(p, x, UnaryOperation::Reciprocal)
                }),
                "1/3",
            ),
            (
                Box::new(|p| {
                    let x = leaf(p, F::whole(3, true));
                    let y = leaf(p, F::whole(4, true));
                    let sum = binary(p, x, y, BinaryOperation::Add);
                    unary(p, sum, UnaryOperation::Negate)
                }),
                "-(3 + 4)",
            ),
            (
                Box::new(|p| {
                    let x = leaf(p, F::whole(3, true));
                    let y = leaf(p, F::new(1, 4, false));
                    let product = binary(p, x, y, BinaryOperation::Multiply);
                    unary(p, product, UnaryOperation::Cosine)
                }),
                "cos(3*-(1/4))",
            ),
        ];

        for (build, should_be) in inputs {
            let id = build(&mut pool);

            let got = display(&pool, &id).to_string();

            assert_eq!(got, should_be);
            release(&mut pool, id);
        }
    }
}
