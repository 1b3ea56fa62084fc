use std::cmp::Ordering;
use std::fmt::{self, Display};
use std::rc::Rc;

use crate::float::Float;
use crate::graph::{Edge, Node, NodeId};

/// Reverse-mode AD variable.
///
/// A reference-counted handle to one node of the computation graph. Cloning
/// shares the node; arithmetic builds new nodes that point back at their
/// operands. The graph is owned by the handles themselves, so there is no tape
/// to activate and no global state: independent graphs can be built and
/// differentiated side by side.
///
/// Comparison operators (`==`, `<`, ...) look at the scalar value only. Use
/// [`Value::ptr_eq`] or [`Value::id`] for graph identity.
#[derive(Clone)]
pub struct Value<F: Float>(pub(crate) Rc<Node<F>>);

impl<F: Float> Value<F> {
    /// Create a leaf: an input variable.
    #[inline]
    pub fn new(value: F) -> Self {
        Self::from_edges(value, Vec::new())
    }

    /// Create a leaf for a literal. Identical to [`Value::new`]; a constant is
    /// simply a leaf nobody differentiates with respect to.
    #[inline]
    pub fn constant(value: F) -> Self {
        Self::new(value)
    }

    /// Create an internal node from an operation's result and its edges.
    ///
    /// This is the construction primitive for elementary operations. Each edge
    /// must target an existing handle and carry the partial derivative of
    /// `value` with respect to it; partials are not evaluated here.
    #[inline]
    pub fn from_edges(value: F, edges: Vec<Edge<F>>) -> Self {
        Value(Rc::new(Node::new(value, edges)))
    }

    /// The scalar this node holds.
    #[inline]
    pub fn value(&self) -> F {
        self.0.value()
    }

    /// Outgoing edges, one per tracked operand.
    #[inline]
    pub fn edges(&self) -> &[Edge<F>] {
        self.0.edges()
    }

    /// True for inputs and literals.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.edges().is_empty()
    }

    /// Identity of the underlying node.
    #[inline]
    pub fn id(&self) -> NodeId {
        NodeId::of(&self.0)
    }

    /// True if both handles refer to the same node.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<F: Float> From<F> for Value<F> {
    #[inline]
    fn from(value: F) -> Self {
        Value::new(value)
    }
}

impl<F: Float> Default for Value<F> {
    fn default() -> Self {
        Value::constant(F::zero())
    }
}

impl<F: Float> Display for Value<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl<F: Float> fmt::Debug for Value<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value")
            .field("value", &self.value())
            .field("edges", &self.edges().len())
            .finish()
    }
}

impl<F: Float> PartialEq for Value<F> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.value() == other.value()
    }
}

impl<F: Float> PartialOrd for Value<F> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.value().partial_cmp(&other.value())
    }
}

impl<F: Float> PartialEq<F> for Value<F> {
    #[inline]
    fn eq(&self, other: &F) -> bool {
        self.value() == *other
    }
}

impl<F: Float> PartialOrd<F> for Value<F> {
    #[inline]
    fn partial_cmp(&self, other: &F) -> Option<Ordering> {
        self.value().partial_cmp(other)
    }
}

macro_rules! impl_scalar_cmp {
    ($f:ty) => {
        impl PartialEq<Value<$f>> for $f {
            #[inline]
            fn eq(&self, other: &Value<$f>) -> bool {
                *self == other.value()
            }
        }

        impl PartialOrd<Value<$f>> for $f {
            #[inline]
            fn partial_cmp(&self, other: &Value<$f>) -> Option<Ordering> {
                self.partial_cmp(&other.value())
            }
        }
    };
}

impl_scalar_cmp!(f32);
impl_scalar_cmp!(f64);
