// cfg.rs - Control Flow Graph builder
//
// Consumes reconciled boundaries and assembles a directed graph: one node
// per basic block, fan-out edges to its successors. Recursive depth-first
// construction rooted at `main`'s entry; the visited set bounds recursion
// to the number of reachable blocks.

use std::collections::HashMap;

use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use serde::Serialize;

use crate::boundary::ReconciledBoundaries;

/// One basic block's attributes, as carried by a CFG node.
#[derive(Debug, Clone, Serialize)]
pub struct BlockNode {
    pub start: usize,
    pub end: usize,
    pub successor1: Option<usize>,
    pub successor2: Option<usize>,
}

/// Directed graph over basic blocks, rooted at `main`'s entry.
pub struct Cfg {
    pub graph: StableDiGraph<BlockNode, ()>,
    pub root: NodeIndex,
}

/// Build the CFG from reconciled boundaries, rooted at `root_line`.
///
/// `root_line` must appear in `boundaries.starts` (the Reconciler's
/// post-condition guarantees every start has a matching end).
pub fn build(boundaries: &ReconciledBoundaries, root_line: usize) -> Cfg {
    let index_of_start: HashMap<usize, usize> = boundaries
        .starts
        .iter()
        .enumerate()
        .map(|(k, &start)| (start, k))
        .collect();

    let mut graph = StableDiGraph::new();
    let mut added: HashMap<usize, NodeIndex> = HashMap::new();

    let root = build_node(
        root_line,
        None,
        boundaries,
        &index_of_start,
        &mut graph,
        &mut added,
    );

    Cfg { graph, root }
}

fn build_node(
    node_line: usize,
    parent: Option<NodeIndex>,
    boundaries: &ReconciledBoundaries,
    index_of_start: &HashMap<usize, usize>,
    graph: &mut StableDiGraph<BlockNode, ()>,
    added: &mut HashMap<usize, NodeIndex>,
) -> NodeIndex {
    if let Some(&existing) = added.get(&node_line) {
        if let Some(parent) = parent {
            graph.add_edge(parent, existing, ());
        }
        return existing;
    }

    let k = *index_of_start
        .get(&node_line)
        .expect("reconciled boundaries guarantee every node line has a start entry");
    let end_record = &boundaries.ends[k];

    let node = graph.add_node(BlockNode {
        start: node_line,
        end: end_record.end_line,
        successor1: None,
        successor2: None,
    });
    added.insert(node_line, node);

    if let Some(parent) = parent {
        graph.add_edge(parent, node, ());
    }

    let mut successor1 = None;
    let mut successor2 = None;
    for (slot, &succ) in end_record.successors.iter().enumerate() {
        // An unresolved indirect transfer (the trace's NotTaken sentinel)
        // names a successor with no matching start: record the attribute
        // but don't recurse into a nonexistent node.
        if index_of_start.contains_key(&succ) {
            build_node(succ, Some(node), boundaries, index_of_start, graph, added);
        }
        match slot {
            0 => successor1 = Some(succ),
            1 => successor2 = Some(succ),
            _ => unreachable!("a block has at most two successors"),
        }
    }
    graph[node].successor1 = successor1;
    graph[node].successor2 = successor2;

    node
}

impl Cfg {
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn root_block(&self) -> &BlockNode {
        &self.graph[self.root]
    }
}
