// analyzer.rs - the Analyzer context object
//
// Bundles the boundary collector, the worklist, and the end-of-main marker
// into one value threaded explicitly through a single analysis run, rather
// than carrying them as separate arguments or shared mutable state.

use tracing::warn;

use crate::assembly::AssemblyIndex;
use crate::boundary::{reconcile, Boundaries, ReconciledBoundaries};
use crate::cfg::{self, Cfg};
use crate::error::Result;
use crate::scanner::{scan_function, Worklist};
use crate::trace::TraceIndex;

/// Owns every collection a single `(assembly, traces)` analysis needs.
/// Constructed fresh per run; never reused or shared across threads.
pub struct Analyzer<'a> {
    assembly: &'a AssemblyIndex,
    trace: &'a TraceIndex,
    boundaries: Boundaries,
    worklist: Worklist,
    end_of_main: Option<usize>,
}

/// Final product of one analysis run.
pub struct AnalysisOutput {
    pub boundaries: ReconciledBoundaries,
    pub cfg: Cfg,
}

impl<'a> Analyzer<'a> {
    pub fn new(assembly: &'a AssemblyIndex, trace: &'a TraceIndex) -> Self {
        Analyzer {
            assembly,
            trace,
            boundaries: Boundaries::new(),
            worklist: Worklist::new(),
            end_of_main: None,
        }
    }

    /// Run the full analysis: discover `main`, drain the worklist scanning
    /// each reachable function, reconcile boundaries, and build the CFG.
    pub fn analyze(mut self) -> Result<AnalysisOutput> {
        let main_entry = self.assembly.main_entry()?;
        self.worklist.push(main_entry);

        while let Some(entry) = self.worklist.pop_unvisited() {
            if let Some(end) = scan_function(
                entry,
                self.assembly,
                self.trace,
                &mut self.boundaries,
                &mut self.worklist,
            )? {
                self.end_of_main = Some(end);
            }
        }

        if self.end_of_main.is_none() {
            warn!(
                "no `ret` observed in main; end_of_main defaults to 0, which \
                 may misclassify an unrelated block as main's terminator"
            );
        }
        let end_of_main = self.end_of_main.unwrap_or(0);

        let boundaries = reconcile(self.boundaries, end_of_main)?;
        let cfg = cfg::build(&boundaries, main_entry);

        Ok(AnalysisOutput { boundaries, cfg })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_line_main_end_to_end() {
        // <main>: at line 0, three straight-line instructions, ret, blank.
        let asm = AssemblyIndex::new(
            "0000000000010428 <main>:\n\
               10428:\t00000413\taddi\tx8,x0,1\n\
               1042c:\t00000493\taddi\tx9,x0,2\n\
               10430:\t00000513\taddi\tx10,x0,3\n\
               10434:\t00008067\tret\n\
             \n",
        );
        let trace = TraceIndex::new(vec![]);
        let out = Analyzer::new(&asm, &trace).analyze().unwrap();
        assert_eq!(out.boundaries.starts, vec![1]);
        assert_eq!(out.cfg.node_count(), 1);
        assert_eq!(out.cfg.root_block().start, 1);
        assert_eq!(out.cfg.root_block().end, 4);
        assert!(out.cfg.root_block().successor1.is_none());
    }

    #[test]
    fn single_forward_branch_end_to_end() {
        // A branch whose target lies past a symbol line for another label,
        // inside the same (blank-line-terminated) function body as the
        // branch itself.
        let asm = AssemblyIndex::new(
            "0000000000010428 <main>:\n\
               10428:\t00000413\taddi\tx8,x0,1\n\
               1042c:\t00940863\tbeq\tx8,x9,10450\n\
               10430:\t00000013\taddi\tx0,x0,0\n\
             0000000000010450 <L>:\n\
               10450:\t00000013\taddi\tx0,x0,0\n\
               10454:\t00008067\tret\n\
             \n",
        );
        let trace = TraceIndex::new(vec![]);
        let out = Analyzer::new(&asm, &trace).analyze().unwrap();
        // lines: 0 sym, 1 addi(entry), 2 beq, 3 addi(fallthrough), 4 sym <L>,
        //        5 addi(target), 6 ret, 7 blank
        assert_eq!(out.boundaries.starts, vec![1, 3, 5]);
        assert_eq!(out.cfg.node_count(), 3);
        assert_eq!(out.cfg.root_block().successor1, Some(3));
        assert_eq!(out.cfg.root_block().successor2, Some(5));
    }

    #[test]
    fn direct_call_end_to_end() {
        // main calls f; f's ret resolves via trace back into main, which
        // itself ends with ret at line 2.
        let dir = tempfile::tempdir().unwrap();
        let trc_path = dir.path().join("a.trc");
        std::fs::write(&trc_path, "TRACE pc=10454\na b c d 0x1042c\n").unwrap();

        let asm = AssemblyIndex::new(
            "0000000000010428 <main>:\n\
               10428:\t000080ef\tjal\tra,10450\n\
               1042c:\t00008067\tret\n\
             \n\
             0000000000010450 <f>:\n\
               10450:\t00000013\taddi\tx0,x0,0\n\
               10454:\t00008067\tret\n\
             \n",
        );
        let trace = TraceIndex::new(vec![trc_path]);
        let out = Analyzer::new(&asm, &trace).analyze().unwrap();
        // lines: 0 sym main, 1 jal(entry), 2 ret(main end), 3 blank,
        //        4 sym f, 5 addi, 6 ret(f's, resolves to line 2), 7 blank
        assert_eq!(out.boundaries.starts, vec![1, 2, 5]);
        assert_eq!(out.cfg.root_block().successor1, Some(5));
        assert_eq!(out.cfg.root_block().successor2, None);
    }
}
