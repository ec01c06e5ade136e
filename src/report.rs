// report.rs - structured diagnostic output
//
// A serde-serializable snapshot of the reconciled boundaries and the
// finished CFG, written as `cfg.json` alongside the rendered graph.

use serde::Serialize;

use crate::boundary::ReconciledBoundaries;
use crate::cfg::Cfg;
use crate::trace::NOT_TAKEN;

#[derive(Debug, Serialize)]
pub struct EndRecord {
    pub end_line: usize,
    pub successors: Vec<usize>,
}

#[derive(Debug, Serialize)]
pub struct NodeReport {
    pub start: usize,
    pub end: usize,
    pub successor1: String,
    pub successor2: String,
}

#[derive(Debug, Serialize)]
pub struct CfgReport {
    pub starts: Vec<usize>,
    /// Reconciled ends before fall-through inference filled in the empty
    /// successor lists — kept alongside `ends` so the diagnostic dump shows
    /// both snapshots, per `spec.md` §6.
    pub ends_pre_inference: Vec<EndRecord>,
    pub ends: Vec<EndRecord>,
    pub nodes: Vec<NodeReport>,
    pub root_start: usize,
    pub root_successor1: String,
    pub root_successor2: String,
}

fn render_successor(s: Option<usize>) -> String {
    match s {
        Some(NOT_TAKEN) => "-1".to_string(),
        Some(line) => line.to_string(),
        None => "null".to_string(),
    }
}

impl CfgReport {
    pub fn new(boundaries: &ReconciledBoundaries, cfg: &Cfg) -> Self {
        let to_end_records = |ends: &[crate::boundary::RawEnd]| -> Vec<EndRecord> {
            ends.iter()
                .map(|e| EndRecord {
                    end_line: e.end_line,
                    successors: e.successors.clone(),
                })
                .collect()
        };
        let ends_pre_inference = to_end_records(&boundaries.ends_pre_inference);
        let ends = to_end_records(&boundaries.ends);

        let nodes = cfg
            .graph
            .node_weights()
            .map(|n| NodeReport {
                start: n.start,
                end: n.end,
                successor1: render_successor(n.successor1),
                successor2: render_successor(n.successor2),
            })
            .collect();

        let root = cfg.root_block();
        CfgReport {
            starts: boundaries.starts.clone(),
            ends_pre_inference,
            ends,
            nodes,
            root_start: root.start,
            root_successor1: render_successor(root.successor1),
            root_successor2: render_successor(root.successor2),
        }
    }

    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
