use hashbrown::{HashMap, hash_map::Entry};
use itertools::Itertools;

use crate::{automaton::dfa::minimization::ReducedTable, error::InternalInvariantViolation};

/// A partition of the states of a [`ReducedTable`] into disjoint, non-empty
/// blocks. The index of a block is the label of all states in it.
///
/// States inside a block are kept in ascending order, blocks in the order in
/// which they were created, so labels are reproducible for a given table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    blocks: Vec<Vec<usize>>,
    labels: Vec<usize>,
}

impl Partition {
    /// Creates a partition over the states `0..state_count`, checking that
    /// the blocks are non-empty, disjoint and cover every state.
    pub fn from_blocks(
        blocks: Vec<Vec<usize>>,
        state_count: usize,
    ) -> Result<Self, InternalInvariantViolation> {
        let mut labels = vec![usize::MAX; state_count];

        for (label, block) in blocks.iter().enumerate() {
            if block.is_empty() {
                return Err(InternalInvariantViolation::EmptyBlock { block: label });
            }

            for &state in block {
                match labels.get(state).copied() {
                    Some(usize::MAX) => labels[state] = label,
                    Some(first) => {
                        return Err(InternalInvariantViolation::OverlappingBlocks {
                            state,
                            first,
                            second: label,
                        });
                    }
                    None => return Err(InternalInvariantViolation::UncoveredState { state }),
                }
            }
        }

        if let Some(state) = labels.iter().position(|label| *label == usize::MAX) {
            return Err(InternalInvariantViolation::UncoveredState { state });
        }

        Ok(Partition { blocks, labels })
    }

    /// The initial split: accepting states first, then non-accepting ones.
    /// An empty side does not become a block.
    pub fn initial(table: &ReducedTable) -> Result<Self, InternalInvariantViolation> {
        let (accepting, non_accepting): (Vec<_>, Vec<_>) =
            (0..table.len()).partition(|state| table.is_accepting(*state));

        let blocks = [accepting, non_accepting]
            .into_iter()
            .filter(|block| !block.is_empty())
            .collect();

        Partition::from_blocks(blocks, table.len())
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn blocks(&self) -> &[Vec<usize>] {
        &self.blocks
    }

    pub fn block(&self, label: usize) -> &[usize] {
        &self.blocks[label]
    }

    /// The label of the block containing `state`.
    pub fn label(&self, state: usize) -> usize {
        self.labels[state]
    }

    /// The labels of the targets of `state` for every letter, with `None` for
    /// undefined transitions.
    pub fn signature(&self, table: &ReducedTable, state: usize) -> Vec<Option<usize>> {
        (0..table.letter_count())
            .map(|letter| table.target(state, letter).map(|target| self.labels[target]))
            .collect()
    }

    /// Performs one refinement round. Every block is split into the classes
    /// of states with equal signatures; a block whose states all agree is
    /// carried over unchanged.
    pub fn refine_once(&self, table: &ReducedTable) -> Result<Self, InternalInvariantViolation> {
        let mut next: Vec<Vec<usize>> = Vec::with_capacity(self.blocks.len());

        for block in &self.blocks {
            let mut classes: HashMap<Vec<Option<usize>>, usize> = HashMap::new();

            for &state in block {
                match classes.entry(self.signature(table, state)) {
                    Entry::Occupied(entry) => next[*entry.get()].push(state),
                    Entry::Vacant(entry) => {
                        entry.insert(next.len());
                        next.push(vec![state]);
                    }
                }
            }
        }

        Partition::from_blocks(next, table.len())
    }
}

/// Block counts observed while refining.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RefinementTrace {
    /// Number of refinement rounds, including the final round that made no
    /// progress.
    pub rounds: usize,
    /// Block count of the initial partition followed by the block count after
    /// every round that split at least one block.
    pub block_counts: Vec<usize>,
}

/// Refines the initial accepting/non-accepting split until a round does not
/// increase the number of blocks, and returns that fixpoint.
///
/// With `check_invariants` the block count is additionally verified to never
/// decrease between rounds.
pub fn refine(
    table: &ReducedTable,
    check_invariants: bool,
) -> Result<(Partition, RefinementTrace), InternalInvariantViolation> {
    let mut partition = Partition::initial(table)?;
    let mut trace = RefinementTrace {
        rounds: 0,
        block_counts: vec![partition.len()],
    };

    loop {
        let next = partition.refine_once(table)?;
        trace.rounds += 1;

        tracing::debug!(
            "refinement round {}: {} -> {} blocks",
            trace.rounds,
            partition.len(),
            next.len()
        );

        if check_invariants && next.len() < partition.len() {
            return Err(InternalInvariantViolation::BlockCountDecreased {
                before: partition.len(),
                after: next.len(),
            });
        }

        // blocks only ever shrink, so an equal count means an equal partition
        if next.len() == partition.len() {
            tracing::debug!(
                "partition stable after {} rounds: {:?}",
                trace.rounds,
                partition.blocks().iter().map(|b| b.len()).collect_vec()
            );
            return Ok((partition, trace));
        }

        trace.block_counts.push(next.len());
        partition = next;
    }
}
