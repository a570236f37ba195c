use hashbrown::{HashMap, HashSet, hash_map::Entry};
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};

use crate::{
    automaton::{
        AutomatonNode, Letter,
        dfa::{DFA, node::DfaNode},
    },
    error::MalformedAutomatonError,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transition<N, E> {
    pub from: N,
    pub letter: E,
    pub to: N,
}

impl<N, E> Transition<N, E> {
    pub fn new(from: N, letter: E, to: N) -> Self {
        Transition { from, letter, to }
    }
}

/// The unvalidated description of a DFA as handed over by an input format:
/// state identifiers, the alphabet, a (possibly partial) list of transitions,
/// the start state and the accepting states.
///
/// Use [`DfaDescription::build`] to validate it into a [`DFA`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "N: Serialize, E: Serialize",
    deserialize = "N: Deserialize<'de>, E: Deserialize<'de>"
))]
pub struct DfaDescription<N, E> {
    pub states: Vec<N>,
    pub alphabet: Vec<E>,
    #[serde(default)]
    pub transitions: Vec<Transition<N, E>>,
    pub start: N,
    #[serde(default)]
    pub accepting: Vec<N>,
}

impl<N: AutomatonNode, E: Letter> DfaDescription<N, E> {
    pub fn new(alphabet: Vec<E>, start: N) -> Self {
        DfaDescription {
            states: vec![],
            alphabet,
            transitions: vec![],
            start,
            accepting: vec![],
        }
    }

    pub fn with_states(mut self, states: impl IntoIterator<Item = N>) -> Self {
        self.states.extend(states);
        self
    }

    pub fn with_transition(mut self, from: N, letter: E, to: N) -> Self {
        self.add_transition(from, letter, to);
        self
    }

    pub fn with_transitions(mut self, transitions: impl IntoIterator<Item = (N, E, N)>) -> Self {
        for (from, letter, to) in transitions {
            self.add_transition(from, letter, to);
        }
        self
    }

    pub fn with_accepting(mut self, accepting: impl IntoIterator<Item = N>) -> Self {
        self.accepting.extend(accepting);
        self
    }

    pub fn add_state(&mut self, state: N) {
        self.states.push(state);
    }

    pub fn add_transition(&mut self, from: N, letter: E, to: N) {
        self.transitions.push(Transition::new(from, letter, to));
    }

    pub fn add_accepting(&mut self, state: N) {
        self.accepting.push(state);
    }

    /// Validates the description and builds the DFA. States keep the order in
    /// which they are listed in `states`.
    pub fn build(&self) -> Result<DFA<N, E>, MalformedAutomatonError> {
        if self.alphabet.is_empty() {
            return Err(MalformedAutomatonError::EmptyAlphabet);
        }

        let mut letters = HashSet::with_capacity(self.alphabet.len());
        for letter in &self.alphabet {
            if !letters.insert(letter) {
                return Err(MalformedAutomatonError::DuplicateLetter(format!(
                    "{:?}",
                    letter
                )));
            }
        }

        let mut graph = DiGraph::<DfaNode<N>, E>::with_capacity(
            self.states.len(),
            self.transitions.len(),
        );
        let mut lookup: HashMap<&N, NodeIndex<u32>> = HashMap::with_capacity(self.states.len());

        for state in &self.states {
            match lookup.entry(state) {
                Entry::Occupied(_) => {
                    return Err(MalformedAutomatonError::DuplicateState(format!(
                        "{:?}",
                        state
                    )));
                }
                Entry::Vacant(entry) => {
                    entry.insert(graph.add_node(DfaNode::non_accepting(state.clone())));
                }
            }
        }

        let start = *lookup
            .get(&self.start)
            .ok_or_else(|| MalformedAutomatonError::UnknownStart(format!("{:?}", self.start)))?;

        for state in &self.accepting {
            let node = lookup.get(state).ok_or_else(|| {
                MalformedAutomatonError::UnknownAccepting(format!("{:?}", state))
            })?;
            graph[*node].accepting = true;
        }

        let mut defined: HashMap<(NodeIndex<u32>, &E), (NodeIndex<u32>, &N)> =
            HashMap::with_capacity(self.transitions.len());

        for transition in &self.transitions {
            let describe = || {
                (
                    format!("{:?}", transition.from),
                    format!("{:?}", transition.letter),
                    format!("{:?}", transition.to),
                )
            };

            let Some(&from) = lookup.get(&transition.from) else {
                let (from, letter, to) = describe();
                return Err(MalformedAutomatonError::UnknownTransitionSource { from, letter, to });
            };
            let Some(&to) = lookup.get(&transition.to) else {
                let (from, letter, to) = describe();
                return Err(MalformedAutomatonError::UnknownTransitionTarget { from, letter, to });
            };
            if !letters.contains(&transition.letter) {
                let (from, letter, to) = describe();
                return Err(MalformedAutomatonError::UnknownLetter { from, letter, to });
            }

            match defined.entry((from, &transition.letter)) {
                Entry::Occupied(entry) => {
                    let (existing, existing_data) = *entry.get();
                    if existing != to {
                        return Err(MalformedAutomatonError::ConflictingTransition {
                            from: format!("{:?}", transition.from),
                            letter: format!("{:?}", transition.letter),
                            existing: format!("{:?}", existing_data),
                            conflicting: format!("{:?}", transition.to),
                        });
                    }
                    // exact duplicates are harmless
                }
                Entry::Vacant(entry) => {
                    entry.insert((to, &transition.to));
                    graph.add_edge(from, to, transition.letter.clone());
                }
            }
        }

        Ok(DFA::from_graph(graph, self.alphabet.clone(), start))
    }

    /// Parses a JSON description.
    pub fn from_json(input: &str) -> anyhow::Result<Self>
    where
        N: for<'de> Deserialize<'de>,
        E: for<'de> Deserialize<'de>,
    {
        Ok(serde_json::from_str(input)?)
    }
}

impl<N: AutomatonNode, E: Letter> DFA<N, E> {
    /// Turns the DFA back into a description. Building the result yields an
    /// identical DFA.
    pub fn to_description(&self) -> DfaDescription<N, E> {
        let mut description =
            DfaDescription::new(self.alphabet().to_vec(), self.state_data(self.start()).clone());

        for state in self.states() {
            description.add_state(self.state_data(state).clone());
            if self.is_accepting(state) {
                description.add_accepting(self.state_data(state).clone());
            }
        }

        for state in self.states() {
            for letter in self.alphabet() {
                if let Some(target) = self.transition(state, letter) {
                    description.add_transition(
                        self.state_data(state).clone(),
                        letter.clone(),
                        self.state_data(target).clone(),
                    );
                }
            }
        }

        description
    }
}
