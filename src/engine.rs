//! Reverse-mode accumulation over the computation graph.
//!
//! A pass first orders the subgraph reachable from the root so that every
//! node comes after all of its parents (reverse topological order), then walks
//! that order once. When a node is visited every contribution it will ever
//! receive has already been deposited, so its gradient is final and it is
//! expanded exactly once. Shared subexpressions are therefore accumulated
//! correctly no matter how many paths reach them.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use log::{debug, trace};

use crate::error::{Error, Result};
use crate::float::Float;
use crate::graph::NodeId;
use crate::result::DerivativeResult;
use crate::value::Value;

/// Compute the derivative of `root` with respect to every node it depends on.
///
/// ```
/// use lazygrad::{differentiate, Value};
///
/// let x = Value::new(3.0_f64);
/// let y = Value::new(4.0_f64);
/// let z = &x * &x + &y;
/// let d = differentiate(&z);
/// assert_eq!(d.wrt(&x).value(), 6.0);
/// assert_eq!(d.wrt(&y).value(), 1.0);
/// ```
pub fn differentiate<F: Float>(root: &Value<F>) -> DerivativeResult<F> {
    let order = reverse_topological_order(root);

    let mut gradients: HashMap<NodeId, (Value<F>, Value<F>)> =
        HashMap::with_capacity(order.len());
    gradients.insert(root.id(), (root.clone(), Value::constant(F::one())));

    let mut num_edges = 0usize;
    for node in &order {
        let gradient = match gradients.get(&node.id()) {
            Some((_, g)) => g.clone(),
            None => panic!(
                "node {} visited before any contribution reached it; \
                 the traversal order is broken",
                node.id()
            ),
        };
        for edge in node.edges() {
            let local = edge.partial().evaluate();
            let contribution = &local * &gradient;
            match gradients.entry(edge.to().id()) {
                Entry::Occupied(mut slot) => {
                    let acc = &mut slot.get_mut().1;
                    *acc = &*acc + &contribution;
                }
                Entry::Vacant(slot) => {
                    slot.insert((edge.to().clone(), contribution));
                }
            }
            num_edges += 1;
        }
    }

    debug!(
        "reverse pass: {} nodes, {} edges expanded",
        order.len(),
        num_edges
    );
    DerivativeResult::new(gradients)
}

/// Differentiate `root` with respect to `x` repeatedly.
///
/// Returns the `order`-th derivative. Fails with [`Error::InvalidArgument`]
/// when `order` is 0.
pub fn differentiate_n<F: Float>(root: &Value<F>, x: &Value<F>, order: usize) -> Result<Value<F>> {
    if order == 0 {
        return Err(Error::InvalidArgument(
            "derivative order must be at least 1".to_string(),
        ));
    }
    let mut derivative = root.clone();
    for k in 1..=order {
        derivative = differentiate(&derivative).wrt(x);
        trace!("order {k} derivative = {}", derivative.value());
    }
    Ok(derivative)
}

/// Mixed partial derivative: differentiate `root` with respect to each
/// variable in turn, strictly left to right.
///
/// Fails with [`Error::InvalidArgument`] when `vars` is empty.
///
/// ```
/// use lazygrad::{differentiate_wrt, Value};
///
/// let x = Value::new(2.0_f64);
/// let y = Value::new(5.0_f64);
/// let f = &x * &x * &y;
/// // ∂²f/∂x∂y = 2x
/// let d = differentiate_wrt(&f, [&x, &y]).unwrap();
/// assert_eq!(d.value(), 4.0);
/// ```
pub fn differentiate_wrt<'a, F, I>(root: &Value<F>, vars: I) -> Result<Value<F>>
where
    F: Float,
    I: IntoIterator<Item = &'a Value<F>>,
{
    let mut derivative = root.clone();
    let mut order = 0usize;
    for var in vars {
        derivative = differentiate(&derivative).wrt(var);
        order += 1;
        trace!("step {order}: partial = {}", derivative.value());
    }
    if order == 0 {
        return Err(Error::InvalidArgument(
            "at least one variable is required".to_string(),
        ));
    }
    Ok(derivative)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    /// On the current depth-first path.
    Open,
    /// All descendants emitted.
    Done,
}

/// Every node reachable from `root`, each once, parents before operands.
///
/// Iterative depth-first post-order, reversed. Meeting an `Open` node again
/// would mean a cycle, which safe construction cannot produce.
fn reverse_topological_order<F: Float>(root: &Value<F>) -> Vec<Value<F>> {
    let mut marks: HashMap<NodeId, Mark> = HashMap::new();
    let mut post_order = Vec::new();
    let mut stack: Vec<(Value<F>, usize)> = vec![(root.clone(), 0)];
    marks.insert(root.id(), Mark::Open);

    while let Some((node, next_edge)) = stack.last_mut() {
        let child = node.edges().get(*next_edge).map(|e| e.to().clone());
        *next_edge += 1;
        match child {
            Some(child) => match marks.get(&child.id()) {
                None => {
                    marks.insert(child.id(), Mark::Open);
                    stack.push((child, 0));
                }
                Some(Mark::Open) => panic!("cycle through node {} in computation graph", child.id()),
                Some(Mark::Done) => {}
            },
            None => {
                if let Some((done, _)) = stack.pop() {
                    marks.insert(done.id(), Mark::Done);
                    post_order.push(done);
                }
            }
        }
    }

    post_order.reverse();
    post_order
}
