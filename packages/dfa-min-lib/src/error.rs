use thiserror::Error;

/// The automaton description violates a structural invariant of a DFA.
///
/// States and letters are rendered with their `Debug` representation so the
/// error can be reported without carrying the generic types along.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedAutomatonError {
    #[error("the alphabet is empty")]
    EmptyAlphabet,
    #[error("letter {0} occurs more than once in the alphabet")]
    DuplicateLetter(String),
    #[error("state {0} is declared more than once")]
    DuplicateState(String),
    #[error("start state {0} is not a declared state")]
    UnknownStart(String),
    #[error("accepting state {0} is not a declared state")]
    UnknownAccepting(String),
    #[error("transition {from} --{letter}--> {to} leaves from undeclared state {from}")]
    UnknownTransitionSource {
        from: String,
        letter: String,
        to: String,
    },
    #[error("transition {from} --{letter}--> {to} leads to undeclared state {to}")]
    UnknownTransitionTarget {
        from: String,
        letter: String,
        to: String,
    },
    #[error("transition {from} --{letter}--> {to} uses letter {letter} which is not in the alphabet")]
    UnknownLetter {
        from: String,
        letter: String,
        to: String,
    },
    #[error(
        "state {from} has conflicting transitions on letter {letter}: to {existing} and to {conflicting}"
    )]
    ConflictingTransition {
        from: String,
        letter: String,
        existing: String,
        conflicting: String,
    },
}

/// A defect inside the minimization pipeline. These are never caused by user
/// input once the automaton has been built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InternalInvariantViolation {
    #[error("the start state {0} is missing from the reachable set")]
    StartNotReachable(String),
    #[error("reachable state {from} has a transition to state {to} outside the reachable set")]
    UnreachableTarget { from: String, to: String },
    #[error("block {block} of the partition is empty")]
    EmptyBlock { block: usize },
    #[error("state {state} appears in blocks {first} and {second}")]
    OverlappingBlocks {
        state: usize,
        first: usize,
        second: usize,
    },
    #[error("state {state} is not contained in any block")]
    UncoveredState { state: usize },
    #[error("block count decreased from {before} to {after}")]
    BlockCountDecreased { before: usize, after: usize },
    #[error("block {block} mixes accepting and non-accepting states")]
    MixedAcceptance { block: usize },
    #[error("state {state} in block {block} disagrees with its representative on letter index {letter}")]
    InconsistentBlock {
        block: usize,
        state: usize,
        letter: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MinimizationError {
    #[error("malformed automaton: {0}")]
    Malformed(#[from] MalformedAutomatonError),
    #[error("internal invariant violated: {0}")]
    InternalInvariant(#[from] InternalInvariantViolation),
}
