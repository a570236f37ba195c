//! Checks for comparing automata. These are used by the tests and by the
//! `--verify` flag of the CLI.

pub mod equivalence;
pub mod same_language;
