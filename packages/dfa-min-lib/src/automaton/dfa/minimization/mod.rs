//! Minimization of DFAs by partition refinement.
//!
//! The pipeline is: compute the reachable states
//! ([`reachable`](crate::automaton::dfa::reachability::reachable)), restrict
//! the transition function to them ([`ReducedTable`]), refine the
//! accepting/non-accepting split until it is stable
//! ([`partition::refine`]) and turn the final partition into a new DFA
//! ([`builder::build`]). [`Minimizer`](crate::minimizer::Minimizer) runs all
//! steps with configuration, logging and statistics.

use petgraph::graph::NodeIndex;

use crate::{
    automaton::{
        AutomatonNode, Letter,
        dfa::{DFA, reachability::ReachableStates},
        index_map::IndexMap,
    },
    error::{InternalInvariantViolation, MinimizationError},
    minimizer::Minimizer,
};

pub mod builder;
pub mod partition;

/// The transition function of a DFA restricted to its reachable states.
///
/// Reachable states are numbered densely in ascending node index order. Row
/// `i` holds, for every letter in alphabet order, the local number of the
/// target state or `None` if the transition is undefined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReducedTable {
    nodes: Vec<NodeIndex<u32>>,
    accepting: Vec<bool>,
    rows: Vec<Vec<Option<usize>>>,
    start: usize,
}

impl ReducedTable {
    /// Builds the table. A defined transition from a reachable state to a
    /// state outside `reachable` means the reachable set is wrong and is
    /// reported as an invariant violation.
    pub fn new<N: AutomatonNode, E: Letter>(
        dfa: &DFA<N, E>,
        reachable: &ReachableStates,
    ) -> Result<Self, InternalInvariantViolation> {
        let nodes: Vec<_> = reachable.iter().collect();

        let mut local = IndexMap::new(dfa.state_count());
        for (i, node) in nodes.iter().enumerate() {
            local.insert(*node, i);
        }

        let start = *local.get(dfa.start()).ok_or_else(|| {
            InternalInvariantViolation::StartNotReachable(format!(
                "{:?}",
                dfa.state_data(dfa.start())
            ))
        })?;

        let mut rows = Vec::with_capacity(nodes.len());
        for node in &nodes {
            let mut row = Vec::with_capacity(dfa.alphabet().len());
            for letter in dfa.alphabet() {
                let target = match dfa.transition(*node, letter) {
                    Some(target) => Some(*local.get(target).ok_or_else(|| {
                        InternalInvariantViolation::UnreachableTarget {
                            from: format!("{:?}", dfa.state_data(*node)),
                            to: format!("{:?}", dfa.state_data(target)),
                        }
                    })?),
                    None => None,
                };
                row.push(target);
            }
            rows.push(row);
        }

        let accepting = nodes.iter().map(|node| dfa.is_accepting(*node)).collect();

        Ok(ReducedTable {
            nodes,
            accepting,
            rows,
            start,
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn letter_count(&self) -> usize {
        self.rows.first().map_or(0, |row| row.len())
    }

    /// The local number of the start state.
    pub fn start(&self) -> usize {
        self.start
    }

    /// The node in the original DFA behind local state `state`.
    pub fn node(&self, state: usize) -> NodeIndex<u32> {
        self.nodes[state]
    }

    pub fn is_accepting(&self, state: usize) -> bool {
        self.accepting[state]
    }

    pub fn target(&self, state: usize, letter: usize) -> Option<usize> {
        self.rows[state][letter]
    }
}

pub trait Minimizable {
    type Output;

    fn minimize(&self) -> Result<Self::Output, MinimizationError>;
}

impl<N: AutomatonNode, E: Letter> Minimizable for DFA<N, E> {
    type Output = DFA<usize, E>;

    /// Minimizes with the default configuration and without logging.
    fn minimize(&self) -> Result<DFA<usize, E>, MinimizationError> {
        Ok(Minimizer::default().minimize(self)?.minimized)
    }
}
