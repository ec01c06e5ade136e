// rv2cfg - trace-guided control-flow graph reconstruction for RISC-V
//
// Reconstructs a program's control-flow graph at basic-block granularity
// from a disassembly listing plus one or more execution traces, starting
// at `main` and following reachable call chains.
//
// # Architecture
//
// 1. **Assembly Index** (`assembly.rs`): in-memory index over the
//    disassembly — lines, address map, symbol map.
// 2. **Trace Index** (`trace.rs`): lazy, cached view over trace files,
//    answering "what ran right after address A?".
// 3. **Function Scanner** (`scanner.rs`): walks one function's instructions,
//    classifying each and feeding the boundary collector; the Worklist it
//    also defines drives which functions get scanned.
// 4. **Boundary Reconciler** (`boundary.rs`): sorts, deduplicates, and
//    infers fall-through successors in the raw boundary report.
// 5. **CFG Builder** (`cfg.rs`): assembles the reconciled boundaries into a
//    directed graph of basic blocks.
//
// `analyzer.rs` bundles all of the above into one `Analyzer` context,
// owned and consumed once per `(assembly, traces)` pair. `report.rs` and
// `render.rs` are the ambient output layer: a serde-serializable snapshot
// and a dot-format / PDF rendering of the finished CFG.
//
// # Non-goals
//
// No recovery of high-level control structures (loops, if-trees), no
// dataflow or alias analysis, no verification that a trace is consistent
// with the assembly, no discovery of unreachable or undisassembled code.

pub mod analyzer;
pub mod assembly;
pub mod boundary;
pub mod cfg;
pub mod classify;
pub mod error;
pub mod render;
pub mod report;
pub mod scanner;
pub mod trace;

pub use analyzer::{AnalysisOutput, Analyzer};
pub use assembly::AssemblyIndex;
pub use boundary::{Boundaries, ReconciledBoundaries};
pub use cfg::{BlockNode, Cfg};
pub use error::AnalysisError;
pub use report::CfgReport;
pub use trace::{TraceIndex, NOT_TAKEN};

/// Reconstruct the CFG of `assembly`'s `main` function, resolving indirect
/// transfers through `trace_paths` in insertion order.
pub fn analyze(
    assembly_text: &str,
    trace_paths: Vec<std::path::PathBuf>,
) -> error::Result<AnalysisOutput> {
    let assembly = AssemblyIndex::new(assembly_text);
    let trace = TraceIndex::new(trace_paths);
    Analyzer::new(&assembly, &trace).analyze()
}
