// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Dependency ordering shared by the constant and message collectors.
//!
//! A depth-first walk with an on-stack set yields a topological order and
//! cycle detection in one pass. The routine is generic over the node key
//! and a neighbours function, so both collectors reuse it.

use std::collections::HashMap;
use std::hash::Hash;

/// Visit state of a node during the walk.
enum State {
    /// Currently on the DFS stack; re-entry means a cycle.
    OnStack,
    /// Fully visited and emitted to the order.
    Done,
}

/// Produces a topological order of `roots` and everything reachable from
/// them: dependencies (neighbours) come before their dependents.
///
/// Roots are visited in the given order, which makes the result
/// deterministic when roots are pre-sorted.
///
/// # Errors
///
/// On a cycle, returns the node whose dependencies led back to itself —
/// the first on-stack node that was re-entered.
pub fn topological_order<K, F>(roots: &[K], neighbours: F) -> Result<Vec<K>, K>
where
    K: Clone + Eq + Hash,
    F: Fn(&K) -> Vec<K>,
{
    let mut walk = Walk {
        neighbours,
        state: HashMap::new(),
        order: Vec::new(),
    };
    for root in roots {
        walk.visit(root)?;
    }
    Ok(walk.order)
}

struct Walk<K, F> {
    neighbours: F,
    state: HashMap<K, State>,
    order: Vec<K>,
}

impl<K, F> Walk<K, F>
where
    K: Clone + Eq + Hash,
    F: Fn(&K) -> Vec<K>,
{
    fn visit(&mut self, node: &K) -> Result<(), K> {
        match self.state.get(node) {
            Some(State::Done) => return Ok(()),
            Some(State::OnStack) => return Err(node.clone()),
            None => {}
        }
        self.state.insert(node.clone(), State::OnStack);
        for next in (self.neighbours)(node) {
            self.visit(&next)?;
        }
        self.state.insert(node.clone(), State::Done);
        self.order.push(node.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edges<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&String) -> Vec<String> + 'a {
        move |node| {
            pairs
                .iter()
                .filter(|(from, _)| from == node)
                .map(|(_, to)| (*to).to_owned())
                .collect()
        }
    }

    fn roots(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn dependencies_come_first() {
        let order = topological_order(&roots(&["A", "B", "C"]), edges(&[("A", "B"), ("B", "C")]))
            .unwrap();
        assert_eq!(order, roots(&["C", "B", "A"]));
    }

    #[test]
    fn diamond_visits_each_node_once() {
        let order = topological_order(
            &roots(&["A", "B", "C", "D"]),
            edges(&[("A", "B"), ("A", "C"), ("B", "D"), ("C", "D")]),
        )
        .unwrap();
        assert_eq!(order, roots(&["D", "B", "C", "A"]));
    }

    #[test]
    fn two_node_cycle_reports_the_entry_node() {
        let err = topological_order(&roots(&["A", "B"]), edges(&[("A", "B"), ("B", "A")]))
            .unwrap_err();
        assert_eq!(err, "A");
    }

    #[test]
    fn self_cycle_is_detected() {
        let err = topological_order(&roots(&["A"]), edges(&[("A", "A")])).unwrap_err();
        assert_eq!(err, "A");
    }

    #[test]
    fn independent_roots_keep_their_order() {
        let order = topological_order(&roots(&["A", "B", "C"]), edges(&[])).unwrap();
        assert_eq!(order, roots(&["A", "B", "C"]));
    }
}
