use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};

use crate::automaton::{AutomatonNode, Letter, dfa::DFA, index_map::IndexSet};

/// The states reachable from the start state of a DFA.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReachableStates {
    set: IndexSet<NodeIndex<u32>>,
}

impl ReachableStates {
    pub fn contains(&self, state: NodeIndex<u32>) -> bool {
        self.set.contains(state)
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Iterates over the reachable states in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = NodeIndex<u32>> + '_ {
        self.set.iter()
    }

    /// Splits the reachable states into accepting and non-accepting ones,
    /// translated to their identifiers.
    pub fn split<N: AutomatonNode, E: Letter>(&self, dfa: &DFA<N, E>) -> ReachableSplit<N> {
        let (accepting, non_accepting): (Vec<_>, Vec<_>) =
            self.iter().partition(|s| dfa.is_accepting(*s));

        ReachableSplit {
            accepting: accepting
                .into_iter()
                .map(|s| dfa.state_data(s).clone())
                .collect(),
            non_accepting: non_accepting
                .into_iter()
                .map(|s| dfa.state_data(s).clone())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReachableSplit<N> {
    pub accepting: Vec<N>,
    pub non_accepting: Vec<N>,
}

impl<N> ReachableSplit<N> {
    pub fn len(&self) -> usize {
        self.accepting.len() + self.non_accepting.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accepting.is_empty() && self.non_accepting.is_empty()
    }
}

/// Computes the set of states reachable from the start state by zero or more
/// defined transitions. The traversal is an iterative depth-first search with
/// a visited set, so cycles and self-loops terminate.
pub fn reachable<N: AutomatonNode, E: Letter>(dfa: &DFA<N, E>) -> ReachableStates {
    let mut visited = IndexSet::new(dfa.state_count());
    let mut stack = vec![dfa.start()];
    visited.insert(dfa.start());

    while let Some(state) = stack.pop() {
        for (_, target) in dfa.transitions_from(state) {
            if visited.insert(target) {
                stack.push(target);
            }
        }
    }

    ReachableStates { set: visited }
}
