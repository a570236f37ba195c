use std::collections::VecDeque;

use hashbrown::{HashMap, HashSet};
use itertools::Itertools;
use petgraph::graph::NodeIndex;

use crate::automaton::{AutomatonNode, Letter, dfa::DFA};

type PairState = (Option<NodeIndex<u32>>, Option<NodeIndex<u32>>);

/// Searches for a shortest word accepted by exactly one of `a` and `b`.
/// Returns `None` if the languages are equal.
pub fn distinguishing_word<N1: AutomatonNode, N2: AutomatonNode, E: Letter>(
    a: &DFA<N1, E>,
    b: &DFA<N2, E>,
) -> Option<Vec<E>> {
    distinguishing_word_between(a, a.start(), b, b.start())
}

/// Searches for a shortest word that leads to acceptance from exactly one of
/// state `p` of `a` and state `q` of `b`.
///
/// Runs a breadth-first search over the product of both automata. An
/// undefined transition leads into an implicit rejecting sink, represented by
/// `None`. Letters that only one automaton knows are undefined in the other.
/// Returns `None` if `p` and `q` are equivalent.
pub fn distinguishing_word_between<N1: AutomatonNode, N2: AutomatonNode, E: Letter>(
    a: &DFA<N1, E>,
    p: NodeIndex<u32>,
    b: &DFA<N2, E>,
    q: NodeIndex<u32>,
) -> Option<Vec<E>> {
    let letters = a
        .alphabet()
        .iter()
        .chain(b.alphabet())
        .sorted()
        .dedup()
        .collect_vec();

    let distinguishes = |(x, y): PairState| {
        x.is_some_and(|x| a.is_accepting(x)) != y.is_some_and(|y| b.is_accepting(y))
    };

    let start: PairState = (Some(p), Some(q));
    let mut parents: HashMap<PairState, (PairState, &E)> = HashMap::new();
    let mut visited: HashSet<PairState> = HashSet::new();
    visited.insert(start);
    let mut queue = VecDeque::from([start]);

    while let Some(pair) = queue.pop_front() {
        if distinguishes(pair) {
            let mut word = vec![];
            let mut current = pair;
            while let Some((parent, letter)) = parents.get(&current) {
                word.push(E::clone(letter));
                current = *parent;
            }
            word.reverse();
            return Some(word);
        }

        for letter in &letters {
            let next = (
                pair.0.and_then(|x| a.transition(x, letter)),
                pair.1.and_then(|y| b.transition(y, letter)),
            );
            // both in the sink, nothing is accepted from here
            if next == (None, None) {
                continue;
            }
            if visited.insert(next) {
                parents.insert(next, (pair, *letter));
                queue.push_back(next);
            }
        }
    }

    None
}

/// Returns true if `a` and `b` accept the same language.
pub fn equivalent<N1: AutomatonNode, N2: AutomatonNode, E: Letter>(
    a: &DFA<N1, E>,
    b: &DFA<N2, E>,
) -> bool {
    distinguishing_word(a, b).is_none()
}

/// Returns true if `a` and `b` are the same automaton up to renaming of
/// states: there is a bijection between their states that maps start to
/// start, preserves acceptance and maps every defined transition to a defined
/// transition with the same letter.
///
/// Both automata must have all their states reachable from the start state,
/// otherwise they are never considered isomorphic.
pub fn is_isomorphic<N1: AutomatonNode, N2: AutomatonNode, E: Letter>(
    a: &DFA<N1, E>,
    b: &DFA<N2, E>,
) -> bool {
    if a.state_count() != b.state_count()
        || a.transition_count() != b.transition_count()
        || a.alphabet().iter().sorted().ne(b.alphabet().iter().sorted())
    {
        return false;
    }

    let mut forward: HashMap<NodeIndex<u32>, NodeIndex<u32>> = HashMap::new();
    let mut backward: HashMap<NodeIndex<u32>, NodeIndex<u32>> = HashMap::new();
    let mut queue = VecDeque::new();

    forward.insert(a.start(), b.start());
    backward.insert(b.start(), a.start());
    queue.push_back((a.start(), b.start()));

    while let Some((x, y)) = queue.pop_front() {
        if a.is_accepting(x) != b.is_accepting(y) {
            return false;
        }

        for letter in a.alphabet() {
            match (a.transition(x, letter), b.transition(y, letter)) {
                (None, None) => {}
                (Some(x_next), Some(y_next)) => {
                    match (forward.get(&x_next), backward.get(&y_next)) {
                        (None, None) => {
                            forward.insert(x_next, y_next);
                            backward.insert(y_next, x_next);
                            queue.push_back((x_next, y_next));
                        }
                        (Some(mapped), Some(_)) if *mapped == y_next => {}
                        _ => return false,
                    }
                }
                _ => return false,
            }
        }
    }

    forward.len() == a.state_count()
}
