//! Computation graph: immutable nodes linked by lazily differentiated edges.
//!
//! Every arithmetic or elementary operation on a [`Value`] builds exactly one
//! node whose edges point at its operands. An edge carries a [`Partial`]:
//! the local derivative of the result with respect to that operand, evaluated
//! only when the differentiation engine asks for it. Partials are themselves
//! built from [`Value`] operations, so evaluating one may grow the graph; this
//! is what makes higher-order derivatives work.
//!
//! Edges can only point at nodes that already exist and nodes are never
//! mutated, so the graph is acyclic by construction.

use std::fmt;
use std::rc::Rc;

use crate::float::Float;
use crate::value::Value;

/// Opaque identity of a graph node.
///
/// Two handles with the same numeric value may be distinct nodes; identity is
/// what the engine keys gradients on. An id is only meaningful while the node
/// it was taken from is alive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) fn of<F: Float>(node: &Rc<Node<F>>) -> Self {
        NodeId(Rc::as_ptr(node) as *const () as usize)
    }

    /// The raw identifier. Only meaningful while the node is alive.
    pub fn as_usize(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Local partial derivative stored on an edge.
pub enum Partial<F: Float> {
    /// A slope known when the node is built (`1` for addition, the scalar
    /// factor of `x * 3.0`, ...). Evaluates to a fresh constant leaf.
    Constant(F),
    /// An existing handle, e.g. `∂(a·b)/∂a = b`. Evaluates to that very node,
    /// so later passes can still differentiate through it.
    Operand(Value<F>),
    /// A deferred computation that may build new nodes. `eval` receives
    /// `captures`, which are released without recursion when the owning node
    /// is dropped.
    Lazy {
        captures: Vec<Value<F>>,
        eval: Box<dyn Fn(&[Value<F>]) -> Value<F>>,
    },
}

impl<F: Float> Partial<F> {
    /// Wrap a closure as a lazily evaluated partial.
    ///
    /// The closure must not capture the node it will be attached to. Handles
    /// moved into the closure are dropped by ordinary recursion, which is fine
    /// for the node's own operands (the edges keep them alive) but not for a
    /// long chain reachable only through the closure: use
    /// [`lazy_with`](Self::lazy_with) for those.
    pub fn lazy(f: impl Fn() -> Value<F> + 'static) -> Self {
        Partial::Lazy {
            captures: Vec::new(),
            eval: Box::new(move |_| f()),
        }
    }

    /// Lazily evaluated partial over an explicit list of handles.
    ///
    /// `f` is called with `captures` in the order given.
    ///
    /// ```
    /// use lazygrad::{differentiate, Edge, Partial, Value};
    ///
    /// let x = Value::new(2.0_f64);
    /// let scale = Value::new(3.0_f64);
    /// // y = 3x, with the factor held as a capture rather than an operand
    /// let partial = Partial::lazy_with(vec![scale.clone()], |c| c[0].clone());
    /// let y = Value::from_edges(6.0, vec![Edge::new(&x, partial)]);
    /// assert_eq!(differentiate(&y).wrt(&x).value(), 3.0);
    /// ```
    pub fn lazy_with(
        captures: Vec<Value<F>>,
        f: impl Fn(&[Value<F>]) -> Value<F> + 'static,
    ) -> Self {
        Partial::Lazy {
            captures,
            eval: Box::new(f),
        }
    }

    /// Evaluate the local derivative.
    pub fn evaluate(&self) -> Value<F> {
        match self {
            Partial::Constant(c) => Value::constant(*c),
            Partial::Operand(v) => v.clone(),
            Partial::Lazy { captures, eval } => eval(captures.as_slice()),
        }
    }
}

impl<F: Float> fmt::Debug for Partial<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Partial::Constant(c) => f.debug_tuple("Constant").field(c).finish(),
            Partial::Operand(v) => f.debug_tuple("Operand").field(&v.id()).finish(),
            Partial::Lazy { captures, .. } => f
                .debug_struct("Lazy")
                .field("captures", &captures.len())
                .finish_non_exhaustive(),
        }
    }
}

/// Dependency of a result node on one of its operands.
pub struct Edge<F: Float> {
    to: Value<F>,
    partial: Partial<F>,
}

impl<F: Float> Edge<F> {
    /// Link to `operand` with local derivative `partial`.
    pub fn new(operand: &Value<F>, partial: Partial<F>) -> Self {
        Edge {
            to: operand.clone(),
            partial,
        }
    }

    /// The operand this edge depends on.
    #[inline]
    pub fn to(&self) -> &Value<F> {
        &self.to
    }

    /// Local derivative of the result with respect to [`to`](Self::to).
    #[inline]
    pub fn partial(&self) -> &Partial<F> {
        &self.partial
    }
}

impl<F: Float> fmt::Debug for Edge<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Edge")
            .field("to", &self.to.id())
            .field("partial", &self.partial)
            .finish()
    }
}

/// One computed quantity: a scalar and the edges to what it was computed from.
pub(crate) struct Node<F: Float> {
    value: F,
    edges: Vec<Edge<F>>,
}

impl<F: Float> Node<F> {
    pub(crate) fn new(value: F, edges: Vec<Edge<F>>) -> Self {
        Node { value, edges }
    }

    #[inline]
    pub(crate) fn value(&self) -> F {
        self.value
    }

    #[inline]
    pub(crate) fn edges(&self) -> &[Edge<F>] {
        &self.edges
    }
}

// Deep chains (thousands of nodes) would overflow the stack with the default
// recursive drop, so unreferenced ancestors are released with a worklist.
impl<F: Float> Drop for Node<F> {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        release(std::mem::take(&mut self.edges), &mut pending);
        while let Some(node) = pending.pop() {
            if let Ok(mut node) = Rc::try_unwrap(node) {
                release(std::mem::take(&mut node.edges), &mut pending);
            }
        }
    }
}

fn release<F: Float>(edges: Vec<Edge<F>>, pending: &mut Vec<Rc<Node<F>>>) {
    for Edge { to, partial } in edges {
        match partial {
            Partial::Operand(v) => pending.push(v.0),
            Partial::Lazy { captures, .. } => pending.extend(captures.into_iter().map(|v| v.0)),
            Partial::Constant(_) => {}
        }
        pending.push(to.0);
    }
}

/// An argument to a node-building operation: either a graph handle or a
/// plain scalar. Scalars contribute no edge.
#[derive(Clone, Copy)]
pub(crate) enum Operand<'a, F: Float> {
    Tracked(&'a Value<F>),
    Constant(F),
}

impl<F: Float> Operand<'_, F> {
    #[inline]
    pub(crate) fn value(&self) -> F {
        match self {
            Operand::Tracked(v) => v.value(),
            Operand::Constant(c) => *c,
        }
    }

    /// Lift to a handle; scalars become fresh constant leaves.
    pub(crate) fn to_value(self) -> Value<F> {
        match self {
            Operand::Tracked(v) => v.clone(),
            Operand::Constant(c) => Value::constant(c),
        }
    }

    /// This operand as the partial of a product with respect to the other factor.
    pub(crate) fn as_partial(self) -> Partial<F> {
        match self {
            Operand::Tracked(v) => Partial::Operand(v.clone()),
            Operand::Constant(c) => Partial::Constant(c),
        }
    }
}

/// Build a node with a single operand.
pub(crate) fn unary<F: Float>(x: &Value<F>, value: F, partial: Partial<F>) -> Value<F> {
    Value::from_edges(value, vec![Edge::new(x, partial)])
}

/// Build a node from two operands, skipping edges to scalar operands.
pub(crate) fn binary<F: Float>(
    lhs: Operand<'_, F>,
    lhs_partial: Partial<F>,
    rhs: Operand<'_, F>,
    rhs_partial: Partial<F>,
    value: F,
) -> Value<F> {
    let mut edges = Vec::with_capacity(2);
    if let Operand::Tracked(v) = lhs {
        edges.push(Edge::new(v, lhs_partial));
    }
    if let Operand::Tracked(v) = rhs {
        edges.push(Edge::new(v, rhs_partial));
    }
    Value::from_edges(value, edges)
}
