use petgraph::graph::{DiGraph, NodeIndex};

use crate::{
    automaton::{
        AutomatonNode, Letter,
        dfa::{
            DFA,
            minimization::{ReducedTable, partition::Partition},
            node::DfaNode,
        },
    },
    error::InternalInvariantViolation,
};

/// Builds the quotient DFA of `dfa` under `partition`.
///
/// Block `i` becomes the state with identifier `i` (and node index `i`). The
/// start state is the block of the original start state, a block is accepting
/// if its states are. Transitions are taken from the first state of every
/// block, which is well-defined for a refinement fixpoint; `check_invariants`
/// verifies this for every member.
pub fn build<N: AutomatonNode, E: Letter>(
    partition: &Partition,
    table: &ReducedTable,
    dfa: &DFA<N, E>,
    check_invariants: bool,
) -> Result<DFA<usize, E>, InternalInvariantViolation> {
    let mut graph = DiGraph::<DfaNode<usize>, E>::with_capacity(
        partition.len(),
        partition.len() * dfa.alphabet().len(),
    );

    for (label, block) in partition.blocks().iter().enumerate() {
        let accepting = table.is_accepting(block[0]);
        if block.iter().any(|state| table.is_accepting(*state) != accepting) {
            return Err(InternalInvariantViolation::MixedAcceptance { block: label });
        }

        graph.add_node(DfaNode::new(accepting, label));
    }

    for (label, block) in partition.blocks().iter().enumerate() {
        let representative = block[0];
        let signature = partition.signature(table, representative);

        if check_invariants {
            for &state in &block[1..] {
                let other = partition.signature(table, state);
                if let Some(letter) = (0..signature.len()).find(|l| signature[*l] != other[*l]) {
                    return Err(InternalInvariantViolation::InconsistentBlock {
                        block: label,
                        state,
                        letter,
                    });
                }
            }
        }

        for (letter, target) in dfa.alphabet().iter().zip(signature) {
            if let Some(target) = target {
                graph.add_edge(NodeIndex::new(label), NodeIndex::new(target), letter.clone());
            }
        }
    }

    let start = NodeIndex::new(partition.label(table.start()));

    tracing::debug!(
        "built minimized DFA with {} states and {} transitions",
        graph.node_count(),
        graph.edge_count()
    );

    Ok(DFA::from_graph(graph, dfa.alphabet().to_vec(), start))
}
