use itertools::{Itertools, repeat_n};

use crate::automaton::{Language, Letter};

/// Checks if two automata accept the same language.
/// This is done by checking if the alphabets are the same and then checking if
/// the automata accept the same words up to a certain length.
pub fn same_language<E: Letter>(
    a: &impl Language<Letter = E>,
    b: &impl Language<Letter = E>,
    max_word_length: usize,
) -> bool {
    if a.alphabet() != b.alphabet() {
        return false;
    }

    for i in 0..max_word_length {
        let combinations = repeat_n(a.alphabet(), i).multi_cartesian_product();

        for word in combinations {
            let word: Vec<E> = word.into_iter().cloned().collect_vec();
            if a.accepts(&word) != b.accepts(&word) {
                tracing::debug!("languages differ on {:?}", word);
                return false;
            }
        }
    }

    true
}

pub fn assert_same_language<E: Letter>(
    a: &impl Language<Letter = E>,
    b: &impl Language<Letter = E>,
    max_word_length: usize,
) {
    if a.alphabet() != b.alphabet() {
        panic!("Alphabets are not the same");
    }

    for i in 0..max_word_length {
        let combinations = repeat_n(a.alphabet(), i).multi_cartesian_product();

        for word in combinations {
            let word: Vec<E> = word.into_iter().cloned().collect_vec();
            match (a.accepts(&word), b.accepts(&word)) {
                (true, false) => {
                    panic!(
                        "{:?} is accepted by automaton `a` but not by automaton `b`. Thus their languages are not equal.",
                        word
                    );
                }
                (false, true) => {
                    panic!(
                        "{:?} is accepted by automaton `b` but not by automaton `a`. Thus their languages are not equal.",
                        word
                    );
                }
                _ => {}
            }
        }
    }
}

/// Counts the words of length below `max_word_length` that `automaton`
/// accepts.
pub fn accepted_word_count<E: Letter>(
    automaton: &impl Language<Letter = E>,
    max_word_length: usize,
) -> usize {
    (0..max_word_length)
        .map(|i| {
            repeat_n(automaton.alphabet(), i)
                .multi_cartesian_product()
                .filter(|word| automaton.accepts(word.iter().copied()))
                .count()
        })
        .sum()
}
