//! Shared work-list propagation.
//!
//! Both the export/import binding graph and the member value evaluator are
//! dependency graphs in which every node waits on at most one upstream
//! node. Resolving them is a multi-source BFS that carries a value along
//! each edge: seed the queue with the nodes whose value is known, hand each
//! value to the nodes waiting on it, stop when the queue is empty. Nodes
//! never reached (cycles, dangling chains) stay unresolved.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// A dependency graph that can push resolved values to dependent nodes.
///
/// # Example
/// ```ignore
/// impl Propagation for Chain {
///     type Node = String;
///     type Value = u32;
///     type Error = std::convert::Infallible;
///
///     fn dependents(&self, node: &String) -> Vec<String> {
///         self.followers.get(node).cloned().unwrap_or_default()
///     }
///
///     fn derive(&self, _node: &String, upstream: &u32) -> Result<Option<u32>, Self::Error> {
///         Ok(Some(*upstream))
///     }
/// }
///
/// let resolved = chain.propagate_from([("root".to_string(), 7)])?;
/// ```
pub trait Propagation {
    /// The type used to identify nodes in the graph.
    type Node: Clone + Eq + Hash;

    /// The value resolved for each node.
    type Value: Clone;

    /// Error raised when a value cannot be derived and analysis must stop.
    type Error;

    /// Returns the nodes that wait on `node`, in a deterministic order.
    fn dependents(&self, node: &Self::Node) -> Vec<Self::Node>;

    /// Computes the value of `node` from the value of the node it waits on.
    ///
    /// `Ok(None)` leaves the node unresolved without failing.
    fn derive(
        &self,
        node: &Self::Node,
        upstream: &Self::Value,
    ) -> Result<Option<Self::Value>, Self::Error>;

    /// Resolves every node reachable from the seeds.
    ///
    /// Each node is resolved at most once; the first value to arrive wins.
    /// Complexity is O(|V| + |E|) with no re-scanning of already settled nodes.
    fn propagate_from<I>(&self, seeds: I) -> Result<HashMap<Self::Node, Self::Value>, Self::Error>
    where
        I: IntoIterator<Item = (Self::Node, Self::Value)>,
    {
        let mut resolved: HashMap<Self::Node, Self::Value> = HashMap::new();
        let mut queue = VecDeque::new();

        for (node, value) in seeds {
            if !resolved.contains_key(&node) {
                resolved.insert(node.clone(), value);
                queue.push_back(node);
            }
        }

        while let Some(node) = queue.pop_front() {
            let value = match resolved.get(&node) {
                Some(v) => v.clone(),
                None => continue,
            };
            for dependent in self.dependents(&node) {
                if resolved.contains_key(&dependent) {
                    continue;
                }
                if let Some(derived) = self.derive(&dependent, &value)? {
                    resolved.insert(dependent.clone(), derived);
                    queue.push_back(dependent);
                }
            }
        }

        Ok(resolved)
    }
}
