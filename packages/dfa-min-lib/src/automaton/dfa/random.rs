use rand::{RngExt, SeedableRng, rngs::StdRng};

use crate::automaton::{Letter, dfa::description::DfaDescription};

#[derive(Debug, Clone)]
pub struct RandomDfaOptions<E> {
    pub state_count: usize,
    pub alphabet: Vec<E>,
    /// Probability that a transition is defined for a given state and letter.
    pub transition_density: f64,
    /// Probability that a state is accepting.
    pub accepting_probability: f64,
}

impl<E: Letter> RandomDfaOptions<E> {
    pub fn new(state_count: usize, alphabet: Vec<E>) -> Self {
        RandomDfaOptions {
            state_count,
            alphabet,
            transition_density: 0.8,
            accepting_probability: 0.3,
        }
    }

    pub fn with_transition_density(mut self, transition_density: f64) -> Self {
        self.transition_density = transition_density;
        self
    }

    pub fn with_accepting_probability(mut self, accepting_probability: f64) -> Self {
        self.accepting_probability = accepting_probability;
        self
    }
}

/// Generates a random DFA description over the states `0..state_count`. The
/// start state is picked at random, so some states usually end up
/// unreachable.
///
/// The result always passes validation as long as `state_count > 0` and the
/// alphabet is non-empty and free of duplicates. The same seed yields the
/// same description.
pub fn random_dfa<E: Letter>(options: &RandomDfaOptions<E>, seed: u64) -> DfaDescription<usize, E> {
    let mut r = StdRng::seed_from_u64(seed);

    let start = r.random_range(0..options.state_count);
    let mut description =
        DfaDescription::new(options.alphabet.clone(), start).with_states(0..options.state_count);

    for state in 0..options.state_count {
        if r.random_bool(options.accepting_probability) {
            description.add_accepting(state);
        }

        for letter in &options.alphabet {
            if r.random_bool(options.transition_density) {
                let target = r.random_range(0..options.state_count);
                description.add_transition(state, letter.clone(), target);
            }
        }
    }

    description
}

/// Generates `count` random DFA descriptions with consecutive seeds starting
/// at `seed`.
pub fn random_dfas<E: Letter>(
    options: &RandomDfaOptions<E>,
    seed: u64,
    count: usize,
) -> Vec<DfaDescription<usize, E>> {
    (0..count as u64)
        .map(|i| random_dfa(options, seed + i))
        .collect()
}
