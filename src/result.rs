use std::collections::HashMap;

use crate::float::Float;
use crate::graph::NodeId;
use crate::value::Value;

/// Output of one reverse-mode pass: the derivative of the root with respect
/// to every node the pass reached.
///
/// Entries hold the node they are keyed on, so a [`NodeId`] in the table can
/// never be recycled by a new allocation while the table is alive.
pub struct DerivativeResult<F: Float> {
    entries: HashMap<NodeId, (Value<F>, Value<F>)>,
}

impl<F: Float> DerivativeResult<F> {
    pub(crate) fn new(entries: HashMap<NodeId, (Value<F>, Value<F>)>) -> Self {
        DerivativeResult { entries }
    }

    /// Derivative of the root with respect to `v`.
    ///
    /// A node the pass never reached does not influence the root, so this
    /// returns a zero constant rather than failing. Use
    /// [`has_derivative`](Self::has_derivative) to tell the two cases apart.
    pub fn wrt(&self, v: &Value<F>) -> Value<F> {
        match self.entries.get(&v.id()) {
            Some((_, gradient)) => gradient.clone(),
            None => Value::constant(F::zero()),
        }
    }

    /// True if the pass reached `v`.
    pub fn has_derivative(&self, v: &Value<F>) -> bool {
        self.entries.contains_key(&v.id())
    }

    /// Number of reached nodes, the root included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(node, derivative)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&Value<F>, &Value<F>)> {
        self.entries.values().map(|(node, gradient)| (node, gradient))
    }
}

impl<F: Float> std::fmt::Debug for DerivativeResult<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(id, (_, g))| (id, g.value())))
            .finish()
    }
}
