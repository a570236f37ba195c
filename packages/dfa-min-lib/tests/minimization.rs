use dfa_min_lib::{
    automaton::{
        Language,
        dfa::{
            DFA,
            description::DfaDescription,
            minimization::{Minimizable, ReducedTable, builder, partition::{self, Partition}},
            reachability::reachable,
        },
    },
    config::MinimizerConfig,
    error::InternalInvariantViolation,
    logger::{LogLevel, Logger},
    minimizer::{Minimizer, SerializableMinimizationResult},
    validation::{
        equivalence::{distinguishing_word_between, equivalent, is_isomorphic},
        same_language::assert_same_language,
    },
};
use itertools::Itertools;

/// States 1 and 2 both move to 2 on `a` and to 3 on `b`.
fn scenario_a() -> DfaDescription<u32, char> {
    DfaDescription::new(vec!['a', 'b'], 1)
        .with_states([1, 2, 3])
        .with_transitions([
            (1, 'a', 2),
            (1, 'b', 3),
            (2, 'a', 2),
            (2, 'b', 3),
            (3, 'a', 2),
            (3, 'b', 3),
        ])
        .with_accepting([3])
}

/// Textbook example with states A to F numbered 1 to 6. B and E as well as C
/// and F are equivalent, D is unreachable.
fn scenario_b() -> DfaDescription<u32, char> {
    DfaDescription::new(vec!['0', '1'], 1)
        .with_states(1..=6)
        .with_transitions([
            (1, '0', 2),
            (1, '1', 5),
            (2, '0', 3),
            (2, '1', 1),
            (3, '0', 6),
            (3, '1', 5),
            (4, '0', 4),
            (4, '1', 1),
            (5, '0', 6),
            (5, '1', 1),
            (6, '0', 3),
            (6, '1', 2),
        ])
        .with_accepting([3, 6])
}

/// Scenario A extended by state 5, which only has self-loops.
fn scenario_c() -> DfaDescription<u32, char> {
    scenario_a()
        .with_states([5])
        .with_transitions([(5, 'a', 5), (5, 'b', 5)])
        .with_accepting([5])
}

fn all_accepting() -> DfaDescription<u32, char> {
    DfaDescription::new(vec!['a', 'b'], 1)
        .with_states([1, 2, 3])
        .with_transitions([
            (1, 'a', 2),
            (1, 'b', 3),
            (2, 'a', 3),
            (2, 'b', 1),
            (3, 'a', 1),
            (3, 'b', 3),
        ])
        .with_accepting([1, 2, 3])
}

fn sorted_classes(partition: &[Vec<u32>]) -> Vec<Vec<u32>> {
    partition
        .iter()
        .map(|block| block.iter().copied().sorted().collect_vec())
        .sorted()
        .collect_vec()
}

#[test]
fn test_scenario_a() {
    let dfa = scenario_a().build().unwrap();
    let result = Minimizer::default().minimize(&dfa).unwrap();

    assert_eq!(result.partition, vec![vec![3], vec![1, 2]]);
    assert_eq!(result.minimized.state_count(), 2);
    assert_eq!(result.block_of(&1), Some(1));
    assert_eq!(result.block_of(&2), Some(1));
    assert_eq!(result.block_of(&3), Some(0));

    let minimized = &result.minimized;
    let start = minimized.start();
    assert_eq!(*minimized.state_data(start), 1);
    assert!(!minimized.is_accepting(start));
    assert_eq!(minimized.transition(start, &'a'), Some(start));

    let accepting = minimized.transition(start, &'b').unwrap();
    assert!(minimized.is_accepting(accepting));
    assert_eq!(minimized.transition(accepting, &'b'), Some(accepting));
    assert_eq!(minimized.transition(accepting, &'a'), Some(start));

    assert_same_language(&dfa, minimized, 8);
}

#[test]
fn test_scenario_b() {
    let dfa = scenario_b().build().unwrap();
    let result = Minimizer::default().minimize(&dfa).unwrap();

    assert_eq!(result.partition, vec![vec![3, 6], vec![1], vec![2, 5]]);
    assert_eq!(result.minimized.state_count(), 3);
    assert_eq!(result.block_of(&4), None);

    assert_eq!(result.statistics.state_count, 6);
    assert_eq!(result.statistics.reachable_count, 5);
    assert_eq!(result.statistics.removed_unreachable, 1);
    assert_eq!(result.statistics.rounds, 2);
    assert_eq!(result.statistics.block_counts, vec![2, 3]);

    assert_same_language(&dfa, &result.minimized, 8);
    assert!(equivalent(&dfa, &result.minimized));
}

#[test]
fn test_scenario_c() {
    let dfa = scenario_c().build().unwrap();
    let result = Minimizer::default().minimize(&dfa).unwrap();

    assert!(!result.reachable.accepting.contains(&5));
    assert!(!result.reachable.non_accepting.contains(&5));
    assert!(result.partition.iter().all(|block| !block.contains(&5)));
    assert_eq!(result.block_of(&5), None);
    assert_eq!(result.statistics.removed_unreachable, 1);

    // same result as without the unreachable state
    let without = Minimizer::default()
        .minimize(&scenario_a().build().unwrap())
        .unwrap();
    assert_eq!(result.partition, without.partition);
    assert_eq!(
        result.minimized.to_description(),
        without.minimized.to_description()
    );

    let serializable = SerializableMinimizationResult::from(&result);
    assert_eq!(serializable.minimized.states, vec![0, 1]);
    assert!(!serializable.reachable.accepting.contains(&5));
}

#[test]
fn test_scenario_d() {
    let dfa = all_accepting().build().unwrap();
    let result = Minimizer::default().minimize(&dfa).unwrap();

    assert_eq!(result.partition, vec![vec![1, 2, 3]]);
    assert_eq!(result.statistics.rounds, 1);
    assert_eq!(result.statistics.block_counts, vec![1]);

    let minimized = &result.minimized;
    let start = minimized.start();
    assert_eq!(minimized.state_count(), 1);
    assert!(minimized.is_accepting(start));
    assert_eq!(minimized.transition(start, &'a'), Some(start));
    assert_eq!(minimized.transition(start, &'b'), Some(start));
}

#[test]
fn test_all_accepting_with_undefined_transition() {
    // an undefined transition behaves like a rejecting sink, so state 3 can
    // not be merged with the complete states
    let dfa = DfaDescription::new(vec!['a', 'b'], 1)
        .with_states([1, 2, 3])
        .with_transitions([(1, 'a', 2), (1, 'b', 3), (2, 'a', 2), (2, 'b', 2), (3, 'a', 3)])
        .with_accepting([1, 2, 3])
        .build()
        .unwrap();
    let result = Minimizer::default().minimize(&dfa).unwrap();

    assert_eq!(result.minimized.state_count(), 3);
    assert_same_language(&dfa, &result.minimized, 6);
}

#[test]
fn test_dead_state_is_not_merged_with_undefined() {
    // 2 loops on `a` and never accepts, 3 has no transitions at all. Both
    // accept the empty language but differ in which transitions are defined.
    let dfa = DfaDescription::new(vec!['a', 'b'], 1)
        .with_states([1, 2, 3])
        .with_transitions([(1, 'a', 2), (1, 'b', 3), (2, 'a', 2)])
        .build()
        .unwrap();
    let result = Minimizer::default().minimize(&dfa).unwrap();

    assert_eq!(result.partition, vec![vec![1], vec![2], vec![3]]);
    assert_eq!(result.minimized.state_count(), 3);

    let q2 = dfa.node_of(&2).unwrap();
    let q3 = dfa.node_of(&3).unwrap();
    assert!(distinguishing_word_between(&dfa, q2, &dfa, q3).is_none());
    assert!(equivalent(&dfa, &result.minimized));
}

#[test]
fn test_serializable_result_json() {
    let dfa = scenario_b().build().unwrap();
    let result = Minimizer::default().minimize(&dfa).unwrap();
    let serializable = SerializableMinimizationResult::from(&result);

    let json = serde_json::to_string(&serializable).unwrap();
    let parsed: SerializableMinimizationResult<u32, char> = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, serializable);

    let rebuilt = parsed.minimized.build().unwrap();
    assert!(is_isomorphic(&rebuilt, &result.minimized));
}

#[test]
fn test_no_accepting_states() {
    let dfa = DfaDescription::new(vec!['a'], 0)
        .with_states([0, 1, 2])
        .with_transitions([(0, 'a', 1), (1, 'a', 2), (2, 'a', 0)])
        .build()
        .unwrap();
    let minimized = dfa.minimize().unwrap();

    assert_eq!(minimized.state_count(), 1);
    assert_eq!(minimized.accepting_states().count(), 0);
    assert!(!minimized.accepts(&[]));
    assert!(!minimized.accepts(&['a', 'a', 'a']));
}

#[test]
fn test_single_state_without_transitions() {
    let dfa = DfaDescription::new(vec!['a', 'b'], 0)
        .with_states([0])
        .with_accepting([0])
        .build()
        .unwrap();
    let minimized = dfa.minimize().unwrap();

    assert_eq!(minimized.state_count(), 1);
    assert_eq!(minimized.transition_count(), 0);
    assert!(minimized.accepts(&[]));
    assert!(!minimized.accepts(&['a']));
}

#[test]
fn test_minimize_is_idempotent() {
    for description in [scenario_a(), scenario_b(), scenario_c(), all_accepting()] {
        let once = description.build().unwrap().minimize().unwrap();
        let twice = once.minimize().unwrap();

        assert_eq!(once.state_count(), twice.state_count());
        assert!(is_isomorphic(&once, &twice));
    }
}

#[test]
fn test_minimize_independent_of_description_order() {
    let description = scenario_b();
    let mut shuffled = description.clone();
    shuffled.alphabet.reverse();
    shuffled.states.reverse();
    shuffled.transitions.reverse();
    shuffled.accepting.reverse();

    let a = Minimizer::default()
        .minimize(&description.build().unwrap())
        .unwrap();
    let b = Minimizer::default()
        .minimize(&shuffled.build().unwrap())
        .unwrap();

    assert_eq!(sorted_classes(&a.partition), sorted_classes(&b.partition));
    assert!(is_isomorphic(&a.minimized, &b.minimized));
}

#[test]
fn test_minimize_without_invariant_checks() {
    let config = MinimizerConfig::default().with_check_invariants(false);
    let logger = Logger::new(LogLevel::Debug, "Minimizer");
    let minimizer = Minimizer::new(config, None).with_logger(&logger);

    let dfa = scenario_b().build().unwrap();
    let checked = Minimizer::default().minimize(&dfa).unwrap();
    let unchecked = minimizer.minimize(&dfa).unwrap();

    assert_eq!(checked.partition, unchecked.partition);
    assert_eq!(
        checked.minimized.to_description(),
        unchecked.minimized.to_description()
    );
}

#[test]
fn test_minimize_description() {
    let result = Minimizer::default()
        .minimize_description(&scenario_a())
        .unwrap();
    assert_eq!(result.minimized.state_count(), 2);

    let broken = scenario_a().with_transition(1, 'a', 3);
    assert!(Minimizer::default().minimize_description(&broken).is_err());
}

#[test]
fn test_refine_block_counts_increase() {
    let dfa = scenario_b().build().unwrap();
    let table = ReducedTable::new(&dfa, &reachable(&dfa)).unwrap();
    let (partition, trace) = partition::refine(&table, true).unwrap();

    assert_eq!(partition.len(), 3);
    assert!(trace.block_counts.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(*trace.block_counts.last().unwrap(), partition.len());

    // the fixpoint does not split any further
    assert_eq!(partition.refine_once(&table).unwrap(), partition);
}

#[test]
fn test_reduced_table() {
    let dfa = scenario_b().build().unwrap();
    let table = ReducedTable::new(&dfa, &reachable(&dfa)).unwrap();

    // D (4) is dropped, the remaining states are renumbered densely
    assert_eq!(table.len(), 5);
    assert_eq!(table.letter_count(), 2);
    assert_eq!(table.start(), 0);
    assert_eq!(*dfa.state_data(table.node(3)), 5);
    assert_eq!(table.target(0, 0), Some(1));
    assert_eq!(table.target(0, 1), Some(3));
    assert!(table.is_accepting(2));
}

#[test]
fn test_partition_from_blocks() {
    assert_eq!(
        Partition::from_blocks(vec![vec![0], vec![]], 1).unwrap_err(),
        InternalInvariantViolation::EmptyBlock { block: 1 }
    );
    assert_eq!(
        Partition::from_blocks(vec![vec![0, 1], vec![1, 2]], 3).unwrap_err(),
        InternalInvariantViolation::OverlappingBlocks {
            state: 1,
            first: 0,
            second: 1
        }
    );
    assert_eq!(
        Partition::from_blocks(vec![vec![0, 2]], 3).unwrap_err(),
        InternalInvariantViolation::UncoveredState { state: 1 }
    );
    assert_eq!(
        Partition::from_blocks(vec![vec![0, 3]], 3).unwrap_err(),
        InternalInvariantViolation::UncoveredState { state: 3 }
    );

    let partition = Partition::from_blocks(vec![vec![2], vec![0, 1]], 3).unwrap();
    assert_eq!(partition.label(0), 1);
    assert_eq!(partition.label(2), 0);
    assert_eq!(partition.block(1), &[0, 1]);
}

#[test]
fn test_builder_rejects_mixed_blocks() {
    let dfa = scenario_a().build().unwrap();
    let table = ReducedTable::new(&dfa, &reachable(&dfa)).unwrap();
    let partition = Partition::from_blocks(vec![vec![0, 1, 2]], 3).unwrap();

    assert_eq!(
        builder::build(&partition, &table, &dfa, true).unwrap_err(),
        InternalInvariantViolation::MixedAcceptance { block: 0 }
    );
}

#[test]
fn test_builder_rejects_unstable_partition() {
    let dfa = scenario_b().build().unwrap();
    let table = ReducedTable::new(&dfa, &reachable(&dfa)).unwrap();
    let initial = Partition::initial(&table).unwrap();

    assert_eq!(
        builder::build(&initial, &table, &dfa, true).unwrap_err(),
        InternalInvariantViolation::InconsistentBlock {
            block: 1,
            state: 1,
            letter: 0
        }
    );

    // without the check the first state of every block decides
    let built: DFA<usize, char> = builder::build(&initial, &table, &dfa, false).unwrap();
    assert_eq!(built.state_count(), 2);
}
