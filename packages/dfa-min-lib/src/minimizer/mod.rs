use std::time::{Duration, Instant};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    automaton::{
        AutomatonNode, Letter,
        dfa::{
            DFA,
            description::DfaDescription,
            minimization::{ReducedTable, builder, partition},
            reachability::{ReachableSplit, reachable},
        },
    },
    config::MinimizerConfig,
    error::{InternalInvariantViolation, MinimizationError},
    logger::{LogLevel, Logger},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimizationStatistics {
    pub state_count: usize,
    pub reachable_count: usize,
    pub removed_unreachable: usize,
    pub minimized_count: usize,
    pub rounds: usize,
    pub block_counts: Vec<usize>,
    pub time: Duration,
}

/// Everything the minimizer hands back to its caller.
#[derive(Debug, Clone)]
pub struct MinimizationResult<N: AutomatonNode, E: Letter> {
    /// The reachable states of the input, split by acceptance.
    pub reachable: ReachableSplit<N>,
    /// The final partition. Block `i` lists the identifiers of the original
    /// states merged into state `i` of `minimized`.
    pub partition: Vec<Vec<N>>,
    pub minimized: DFA<usize, E>,
    pub statistics: MinimizationStatistics,
}

impl<N: AutomatonNode, E: Letter> MinimizationResult<N, E> {
    /// The block of the final partition that contains the state `state`, if
    /// the state is reachable.
    pub fn block_of(&self, state: &N) -> Option<usize> {
        self.partition.iter().position(|block| block.contains(state))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "N: Serialize, E: Serialize",
    deserialize = "N: Deserialize<'de>, E: Deserialize<'de>"
))]
pub struct SerializableMinimizationResult<N, E> {
    pub reachable: ReachableSplit<N>,
    pub partition: Vec<Vec<N>>,
    pub minimized: DfaDescription<usize, E>,
    pub statistics: MinimizationStatistics,
}

impl<N: AutomatonNode, E: Letter> From<&MinimizationResult<N, E>>
    for SerializableMinimizationResult<N, E>
{
    fn from(result: &MinimizationResult<N, E>) -> Self {
        SerializableMinimizationResult {
            reachable: result.reachable.clone(),
            partition: result.partition.clone(),
            minimized: result.minimized.to_description(),
            statistics: result.statistics.clone(),
        }
    }
}

/// Runs the full minimization pipeline: reachability pruning, partition
/// refinement and construction of the quotient automaton.
///
/// Every call works on its own local data, so a minimizer can be reused for
/// any number of automata.
#[derive(Debug, Default)]
pub struct Minimizer<'a> {
    config: MinimizerConfig,
    logger: Option<&'a Logger>,
}

impl<'a> Minimizer<'a> {
    pub fn new(config: MinimizerConfig, logger: Option<&'a Logger>) -> Self {
        Minimizer { config, logger }
    }

    pub fn with_logger(mut self, logger: &'a Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn config(&self) -> &MinimizerConfig {
        &self.config
    }

    /// Validates `description` and minimizes the resulting DFA.
    pub fn minimize_description<N: AutomatonNode, E: Letter>(
        &self,
        description: &DfaDescription<N, E>,
    ) -> Result<MinimizationResult<N, E>, MinimizationError> {
        let dfa = description.build()?;
        Ok(self.minimize(&dfa)?)
    }

    pub fn minimize<N: AutomatonNode, E: Letter>(
        &self,
        dfa: &DFA<N, E>,
    ) -> Result<MinimizationResult<N, E>, InternalInvariantViolation> {
        let start_time = Instant::now();
        let check_invariants = *self.config.get_check_invariants();

        if let Some(l) = self.logger {
            l.info(&format!(
                "Minimizing DFA with {} states and {} transitions over {} letters",
                dfa.state_count(),
                dfa.transition_count(),
                dfa.alphabet().len()
            ));
        }

        let reachable_states = reachable(dfa);
        let split = reachable_states.split(dfa);
        let removed_unreachable = dfa.state_count() - reachable_states.len();

        if let Some(l) = self.logger {
            l.object("Reachability")
                .add_field("reachable", reachable_states.len().to_string())
                .add_field("removed", removed_unreachable.to_string())
                .add_field("accepting", format!("{:?}", split.accepting))
                .add_field("non-accepting", format!("{:?}", split.non_accepting))
                .log(LogLevel::Debug);
        }

        let table = ReducedTable::new(dfa, &reachable_states)?;
        let (partition, trace) = partition::refine(&table, check_invariants)?;

        if let Some(l) = self.logger {
            l.object("Refinement")
                .add_field("rounds", trace.rounds.to_string())
                .add_field(
                    "block counts",
                    trace.block_counts.iter().map(|c| c.to_string()).join(" -> "),
                )
                .log(LogLevel::Debug);
        }

        let minimized = builder::build(&partition, &table, dfa, check_invariants)?;

        let blocks = partition
            .blocks()
            .iter()
            .map(|block| {
                block
                    .iter()
                    .map(|state| dfa.state_data(table.node(*state)).clone())
                    .collect_vec()
            })
            .collect_vec();

        let statistics = MinimizationStatistics {
            state_count: dfa.state_count(),
            reachable_count: reachable_states.len(),
            removed_unreachable,
            minimized_count: minimized.state_count(),
            rounds: trace.rounds,
            block_counts: trace.block_counts,
            time: start_time.elapsed(),
        };

        if let Some(l) = self.logger {
            l.info(&format!(
                "Minimized {} states to {} in {} rounds ({:?})",
                statistics.state_count,
                statistics.minimized_count,
                statistics.rounds,
                statistics.time
            ));
        }

        Ok(MinimizationResult {
            reachable: split,
            partition: blocks,
            minimized,
            statistics,
        })
    }
}
