//! Diagnostic dump of a computation graph for external visualization.
//!
//! Not used by differentiation. Evaluating the `edge_value` of a record runs
//! the edge's partial, which may build new nodes; those are not enumerated.

use std::collections::{HashSet, VecDeque};
use std::io::{self, Write};

use crate::float::Float;
use crate::graph::NodeId;
use crate::value::Value;

/// One edge of the graph, flattened.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EdgeRecord<F: Float> {
    /// Node the edge leaves (the result of an operation).
    pub from: NodeId,
    /// Operand the result depends on.
    pub to: NodeId,
    pub from_value: F,
    pub to_value: F,
    /// Local partial derivative ∂from/∂to.
    pub edge_value: F,
}

/// Breadth-first enumeration of every edge reachable from `root`.
///
/// Each node is expanded once, so each edge appears exactly once even when
/// the node is shared by several parents.
pub fn edge_records<F: Float>(root: &Value<F>) -> Vec<EdgeRecord<F>> {
    let mut records = Vec::new();
    let mut seen: HashSet<NodeId> = HashSet::new();
    let mut queue: VecDeque<Value<F>> = VecDeque::new();
    seen.insert(root.id());
    queue.push_back(root.clone());

    while let Some(node) = queue.pop_front() {
        for edge in node.edges() {
            let to = edge.to();
            records.push(EdgeRecord {
                from: node.id(),
                to: to.id(),
                from_value: node.value(),
                to_value: to.value(),
                edge_value: edge.partial().evaluate().value(),
            });
            if seen.insert(to.id()) {
                queue.push_back(to.clone());
            }
        }
    }
    records
}

/// Write [`edge_records`] as CSV with a `FromID,ToID,FromVal,ToVal,EdgeVal` header.
pub fn write_csv<F: Float, W: Write>(root: &Value<F>, mut out: W) -> io::Result<()> {
    writeln!(out, "FromID,ToID,FromVal,ToVal,EdgeVal")?;
    for r in edge_records(root) {
        writeln!(
            out,
            "{},{},{},{},{}",
            r.from, r.to, r.from_value, r.to_value, r.edge_value
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_operands_are_listed_once_per_edge() {
        let x = Value::new(3.0_f64);
        let a = &x * &x;
        let b = &a + &a;
        let records = edge_records(&b);
        // b -> a twice, a -> x twice
        assert_eq!(records.len(), 4);
        assert!(records[..2].iter().all(|r| r.from == b.id() && r.to == a.id()));
        assert!(records[2..].iter().all(|r| r.to == x.id() && r.edge_value == 3.0));
    }

    #[test]
    fn leaf_has_no_records() {
        assert!(edge_records(&Value::new(1.0_f64)).is_empty());
    }
}
