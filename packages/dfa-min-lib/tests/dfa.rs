use dfa_min_lib::{
    automaton::{
        Language,
        dfa::{DFA, description::DfaDescription},
    },
    error::MalformedAutomatonError,
};
use itertools::Itertools;

fn ab_dfa() -> DfaDescription<u32, char> {
    DfaDescription::new(vec!['a', 'b'], 0)
        .with_states([0, 1, 2])
        .with_transitions([(0, 'a', 1), (1, 'b', 2), (2, 'a', 1)])
        .with_accepting([2])
}

#[test]
fn test_dfa() {
    let dfa = ab_dfa().build().unwrap();

    let input = "ababab";
    let chars = input.chars().collect_vec();
    assert!(dfa.accepts(&chars));

    let input = "ababa";
    let chars = input.chars().collect_vec();
    assert!(!dfa.accepts(&chars));

    // undefined transition
    let input = "abb";
    let chars = input.chars().collect_vec();
    assert!(!dfa.accepts(&chars));

    // letter outside the alphabet
    let input = "abc";
    let chars = input.chars().collect_vec();
    assert!(!dfa.accepts(&chars));
}

#[test]
fn test_dfa_accessors() {
    let dfa = ab_dfa().build().unwrap();

    assert_eq!(dfa.state_count(), 3);
    assert_eq!(dfa.transition_count(), 3);
    assert_eq!(dfa.alphabet(), &['a', 'b']);
    assert!(!dfa.is_complete());

    let q1 = dfa.node_of(&1).unwrap();
    let q2 = dfa.node_of(&2).unwrap();
    assert_eq!(dfa.transition(dfa.start(), &'a'), Some(q1));
    assert_eq!(dfa.transition(dfa.start(), &'b'), None);
    assert_eq!(dfa.accepting_states().collect_vec(), vec![q2]);
    assert_eq!(dfa.run_from(q1, &['b', 'a']), Some(q1));
}

#[test]
fn test_description_round_trip() {
    let dfa = ab_dfa().build().unwrap();
    let rebuilt: DFA<u32, char> = dfa.to_description().build().unwrap();

    assert_eq!(rebuilt.state_count(), dfa.state_count());
    assert_eq!(rebuilt.transition_count(), dfa.transition_count());
    assert_eq!(rebuilt.to_description(), dfa.to_description());
}

#[test]
fn test_description_from_json() {
    let json = r#"{
        "states": [1, 2],
        "alphabet": ["x"],
        "transitions": [{ "from": 1, "letter": "x", "to": 2 }],
        "start": 1,
        "accepting": [2]
    }"#;

    let dfa = DfaDescription::<u32, char>::from_json(json)
        .unwrap()
        .build()
        .unwrap();
    assert!(dfa.accepts(&['x']));
    assert!(!dfa.accepts(&[]));
}

#[test]
fn test_description_from_json_defaults() {
    // transitions and accepting states may be left out
    let json = r#"{ "states": ["p", "q"], "alphabet": [0, 1], "start": "q" }"#;

    let description = DfaDescription::<String, u8>::from_json(json).unwrap();
    assert!(description.transitions.is_empty());
    assert!(description.accepting.is_empty());

    let dfa = description.build().unwrap();
    assert_eq!(dfa.state_count(), 2);
    assert_eq!(dfa.accepting_states().count(), 0);
}

#[test]
fn test_empty_alphabet() {
    let res = DfaDescription::<u32, char>::new(vec![], 0)
        .with_states([0])
        .build();
    assert_eq!(res.unwrap_err(), MalformedAutomatonError::EmptyAlphabet);
}

#[test]
fn test_duplicate_letter() {
    let res = DfaDescription::<u32, char>::new(vec!['a', 'a'], 0)
        .with_states([0])
        .build();
    assert!(matches!(res, Err(MalformedAutomatonError::DuplicateLetter(_))));
}

#[test]
fn test_duplicate_state() {
    let res = DfaDescription::<u32, char>::new(vec!['a'], 0)
        .with_states([0, 1, 0])
        .build();
    assert_eq!(
        res.unwrap_err(),
        MalformedAutomatonError::DuplicateState("0".into())
    );
}

#[test]
fn test_unknown_start() {
    let res = DfaDescription::<u32, char>::new(vec!['a'], 7)
        .with_states([0, 1])
        .build();
    assert_eq!(
        res.unwrap_err(),
        MalformedAutomatonError::UnknownStart("7".into())
    );
}

#[test]
fn test_unknown_accepting() {
    let res = ab_dfa().with_accepting([9]).build();
    assert_eq!(
        res.unwrap_err(),
        MalformedAutomatonError::UnknownAccepting("9".into())
    );
}

#[test]
fn test_unknown_transition_states() {
    let res = ab_dfa().with_transition(5, 'a', 0).build();
    assert!(matches!(
        res,
        Err(MalformedAutomatonError::UnknownTransitionSource { .. })
    ));

    let res = ab_dfa().with_transition(0, 'b', 5).build();
    assert!(matches!(
        res,
        Err(MalformedAutomatonError::UnknownTransitionTarget { .. })
    ));
}

#[test]
fn test_unknown_letter() {
    let res = ab_dfa().with_transition(0, 'c', 1).build();
    assert_eq!(
        res.unwrap_err(),
        MalformedAutomatonError::UnknownLetter {
            from: "0".into(),
            letter: "'c'".into(),
            to: "1".into(),
        }
    );
}

#[test]
fn test_conflicting_transition() {
    let res = ab_dfa().with_transition(0, 'a', 2).build();
    assert_eq!(
        res.unwrap_err(),
        MalformedAutomatonError::ConflictingTransition {
            from: "0".into(),
            letter: "'a'".into(),
            existing: "1".into(),
            conflicting: "2".into(),
        }
    );
}

#[test]
fn test_duplicate_transition_is_accepted() {
    let dfa = ab_dfa().with_transition(0, 'a', 1).build().unwrap();
    assert_eq!(dfa.transition_count(), 3);
}

#[test]
fn test_graphviz() {
    let dfa = ab_dfa().build().unwrap();
    let dot = dfa.to_graphviz();

    assert!(dot.starts_with("digraph"));
    assert!(dot.contains("START -> 0;"));
    assert!(dot.contains("0 -> 1 [ label=\"'a'\" ];"));
}
