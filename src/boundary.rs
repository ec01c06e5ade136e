// boundary.rs - boundary collection and reconciliation
//
// `Boundaries` accumulates raw scan output (starts, ends-with-duplicates);
// `reconcile` turns it into the sorted, deduplicated, fall-through-complete
// form the CFG builder requires.

use std::collections::BTreeSet;

use crate::error::{AnalysisError, Result};

/// Raw end-of-block record. `successors` may be empty (pending fall-through
/// inference), or hold one or two targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEnd {
    pub end_line: usize,
    pub successors: Vec<usize>,
}

/// Write-only-during-scan boundary collections.
#[derive(Debug, Default)]
pub struct Boundaries {
    pub starts: BTreeSet<usize>,
    pub ends: Vec<RawEnd>,
}

impl Boundaries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_start(&mut self, line: usize) {
        self.starts.insert(line);
    }

    pub fn add_end(&mut self, end_line: usize, successors: Vec<usize>) {
        self.ends.push(RawEnd {
            end_line,
            successors,
        });
    }
}

/// A fully reconciled, one-to-one mapping between block starts and ends.
///
/// `ends_pre_inference` is the sorted, deduplicated report *before*
/// fall-through successors were filled in — kept around purely so the
/// diagnostic dump of `spec.md` §6 ("the reconciled starts and ends, before
/// and after target inference") has both snapshots to show; CFG
/// construction and every other consumer only ever look at `ends`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciledBoundaries {
    pub starts: Vec<usize>,
    pub ends_pre_inference: Vec<RawEnd>,
    pub ends: Vec<RawEnd>,
}

/// Sort, dedup, and infer fall-through successors.
///
/// `end_of_main` identifies the one end record that is allowed to keep zero
/// successors (it is the function's sole terminal block).
pub fn reconcile(boundaries: Boundaries, end_of_main: usize) -> Result<ReconciledBoundaries> {
    let starts: Vec<usize> = boundaries.starts.into_iter().collect();

    let mut ends = boundaries.ends;
    ends.sort_by_key(|e| e.end_line);

    // Remove duplicate ends: when two records share an end_line, keep the
    // longer successor list.
    let mut deduped: Vec<RawEnd> = Vec::with_capacity(ends.len());
    for end in ends {
        match deduped.last_mut() {
            Some(prev) if prev.end_line == end.end_line => {
                if end.successors.len() > prev.successors.len() {
                    *prev = end;
                }
            }
            _ => deduped.push(end),
        }
    }

    let ends_pre_inference = deduped.clone();

    // Infer fall-through successors for any end with none, except the
    // function's actual terminal block.
    for end in deduped.iter_mut() {
        if end.successors.is_empty() && end.end_line != end_of_main {
            end.successors = vec![end.end_line + 1];
        }
    }

    if starts.len() != deduped.len() {
        return Err(AnalysisError::BoundaryMismatch {
            starts: starts.len(),
            ends: deduped.len(),
        });
    }

    Ok(ReconciledBoundaries {
        starts,
        ends_pre_inference,
        ends: deduped,
    })
}
