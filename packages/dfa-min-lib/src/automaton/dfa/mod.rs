use std::fmt::Debug;

use hashbrown::HashMap;
use itertools::Itertools;
use node::DfaNode;
use petgraph::{
    Direction,
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};

use crate::automaton::{Alphabet, AutomatonNode, Language, Letter};

pub mod description;
pub mod minimization;
pub mod node;
pub mod random;
pub mod reachability;
pub mod spec;

/// A deterministic finite automaton with a partial transition function.
///
/// A DFA can only be obtained from a validated
/// [`DfaDescription`](description::DfaDescription) or from the minimization
/// pipeline, so the following always holds: the start state is a state, every
/// edge target is a state, the alphabet is non-empty and every state has at
/// most one outgoing edge per letter. A missing edge means the transition is
/// undefined; no sink state is added implicitly.
///
/// The automaton is read-only once built.
#[derive(Clone)]
pub struct DFA<N: AutomatonNode, E: Letter> {
    start: NodeIndex<u32>,
    graph: DiGraph<DfaNode<N>, E>,
    alphabet: Vec<E>,
    state_lookup: HashMap<N, NodeIndex<u32>>,
}

impl<N: AutomatonNode, E: Letter> DFA<N, E> {
    /// Wraps an already validated graph.
    pub(crate) fn from_graph(
        graph: DiGraph<DfaNode<N>, E>,
        alphabet: Vec<E>,
        start: NodeIndex<u32>,
    ) -> Self {
        let state_lookup = graph
            .node_indices()
            .map(|node| (graph[node].data.clone(), node))
            .collect();

        DFA {
            start,
            graph,
            alphabet,
            state_lookup,
        }
    }

    pub fn start(&self) -> NodeIndex<u32> {
        self.start
    }

    pub fn alphabet(&self) -> &[E] {
        &self.alphabet
    }

    /// The position of `letter` in the alphabet.
    pub fn letter_index(&self, letter: &E) -> Option<usize> {
        self.alphabet.iter().position(|l| l == letter)
    }

    pub fn state_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn transition_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Iterates over all states in ascending index order.
    pub fn states(&self) -> impl Iterator<Item = NodeIndex<u32>> + Clone + '_ {
        self.graph.node_indices()
    }

    pub fn state_data(&self, state: NodeIndex<u32>) -> &N {
        &self.graph[state].data
    }

    /// Looks up the state with the given identifier.
    pub fn node_of(&self, data: &N) -> Option<NodeIndex<u32>> {
        self.state_lookup.get(data).copied()
    }

    pub fn is_accepting(&self, state: NodeIndex<u32>) -> bool {
        self.graph[state].accepting
    }

    pub fn accepting_states(&self) -> impl Iterator<Item = NodeIndex<u32>> + '_ {
        self.graph
            .node_indices()
            .filter(move |node| self.graph[*node].accepting)
    }

    /// The target of the transition from `state` on `letter`, or `None` if
    /// the transition is undefined.
    pub fn transition(&self, state: NodeIndex<u32>, letter: &E) -> Option<NodeIndex<u32>> {
        self.graph
            .edges_directed(state, Direction::Outgoing)
            .find(|edge| edge.weight() == letter)
            .map(|edge| edge.target())
    }

    /// The defined transitions leaving `state`, in insertion order.
    pub fn transitions_from(
        &self,
        state: NodeIndex<u32>,
    ) -> impl Iterator<Item = (&E, NodeIndex<u32>)> + '_ {
        self.graph
            .edges_directed(state, Direction::Outgoing)
            .map(|edge| (edge.weight(), edge.target()))
    }

    /// Returns true if every state has a transition for every letter.
    pub fn is_complete(&self) -> bool {
        self.graph.node_indices().all(|state| {
            self.alphabet
                .iter()
                .all(|letter| self.transition(state, letter).is_some())
        })
    }

    /// Follows `input` from `from`. Returns `None` as soon as a transition is
    /// undefined.
    pub fn run_from<'a>(
        &self,
        from: NodeIndex<u32>,
        input: impl IntoIterator<Item = &'a E>,
    ) -> Option<NodeIndex<u32>>
    where
        E: 'a,
    {
        input
            .into_iter()
            .try_fold(from, |state, letter| self.transition(state, letter))
    }

    pub fn to_graphviz(&self) -> String {
        let mut dot = String::new();
        dot.push_str("digraph finite_state_machine {\n");
        dot.push_str("fontname=\"Helvetica,Arial,sans-serif\"\n");
        dot.push_str("node [fontname=\"Helvetica,Arial,sans-serif\"]\n");
        dot.push_str("edge [fontname=\"Helvetica,Arial,sans-serif\"]\n");
        dot.push_str("rankdir=LR;\n");
        dot.push_str("node [shape=point,label=\"\"]START\n");

        dot.push_str(&format!(
            "node [shape = doublecircle]; {};\n",
            self.accepting_states()
                .map(|node| node.index().to_string())
                .join(" ")
        ));
        dot.push_str("node [shape = circle];\n");
        dot.push_str(&format!("START -> {};\n", self.start.index()));

        for node in self.graph.node_indices() {
            dot.push_str(&format!(
                "{} [ label=\"{:?}\" ];\n",
                node.index(),
                self.graph[node].data
            ));
        }

        for edge in self.graph.edge_references() {
            dot.push_str(&format!(
                "{} -> {} [ label=\"{:?}\" ];\n",
                edge.source().index(),
                edge.target().index(),
                edge.weight()
            ));
        }

        dot.push_str("}\n");

        dot
    }
}

impl<N: AutomatonNode, E: Letter> Alphabet for DFA<N, E> {
    type Letter = E;

    fn alphabet(&self) -> &[E] {
        &self.alphabet
    }
}

impl<N: AutomatonNode, E: Letter> Language for DFA<N, E> {
    /// A word is rejected as soon as it hits an undefined transition, which
    /// includes letters outside the alphabet.
    fn accepts<'a>(&self, input: impl IntoIterator<Item = &'a E>) -> bool
    where
        E: 'a,
    {
        self.run_from(self.start, input)
            .is_some_and(|state| self.is_accepting(state))
    }
}

impl<N: AutomatonNode, E: Letter> Debug for DFA<N, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DFA")
            .field("alphabet", &self.alphabet)
            .field("state_count", &self.graph.node_count())
            .field(
                "states",
                &self
                    .graph
                    .node_indices()
                    .map(|node| (&self.graph[node].data, node))
                    .collect_vec(),
            )
            .field("initial_state", &self.start)
            .field("final_states", &self.accepting_states().collect_vec())
            .field("edge_count", &self.graph.edge_count())
            .field(
                "edges",
                &self
                    .graph
                    .edge_references()
                    .map(|edge| {
                        format!(
                            "{:?} --- {:?} --> {:?}",
                            edge.source(),
                            edge.weight(),
                            edge.target()
                        )
                    })
                    .collect_vec(),
            )
            .finish()
    }
}
