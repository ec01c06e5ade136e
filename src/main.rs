// rv2cfg - trace-guided control-flow graph reconstruction for RISC-V
//
// Scans the working directory for one `.dump` assembly listing and any
// number of `.trc` trace files, reconstructs the CFG rooted at `main`, and
// emits it as both structured JSON (`cfg.json`) and a rendered graph
// (`cfg.pdf`, via the external `dot` binary).
//
// Usage:
//   rv2cfg
//   rv2cfg ./fixtures -o ./out --no-render

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use rv2cfg::{render, Analyzer, AssemblyIndex, CfgReport, TraceIndex};

#[derive(Parser, Debug)]
#[command(name = "rv2cfg")]
#[command(about = "Trace-guided CFG reconstruction for RISC-V assembly")]
#[command(version)]
struct Args {
    /// Working directory to scan for *.dump / *.trc
    #[arg(default_value = ".")]
    dir: PathBuf,

    /// Output directory for cfg.json / cfg.dot / cfg.pdf
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Skip shelling out to `dot`; still emit cfg.dot and cfg.json
    #[arg(long)]
    no_render: bool,

    /// Raise log verbosity (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "rv2cfg=info",
        1 => "rv2cfg=debug",
        _ => "rv2cfg=trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with_target(false)
        .init();
}

/// Scan `dir` for the disassembly and trace inputs: every `.dump` entry is
/// the assembly file (last one wins), every `.trc` entry is appended to
/// the trace list.
fn scan_inputs(dir: &std::path::Path) -> Result<(PathBuf, Vec<PathBuf>)> {
    let mut assembly_file = None;
    let mut trace_files = Vec::new();

    for entry in std::fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let path = entry?.path();
        match path.extension().and_then(|e| e.to_str()) {
            Some("dump") => assembly_file = Some(path),
            Some("trc") => trace_files.push(path),
            _ => {}
        }
    }

    let assembly_file = assembly_file
        .ok_or_else(|| anyhow::anyhow!("no .dump file found in {}", dir.display()))?;
    Ok((assembly_file, trace_files))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let (assembly_path, trace_paths) = scan_inputs(&args.dir)?;
    info!(assembly = %assembly_path.display(), traces = trace_paths.len(), "scanned inputs");

    let assembly_text =
        std::fs::read_to_string(&assembly_path).context("failed to read assembly file")?;
    let assembly = AssemblyIndex::new(&assembly_text);
    let trace = TraceIndex::new(trace_paths);

    let output = Analyzer::new(&assembly, &trace)
        .analyze()
        .context("CFG analysis failed")?;

    info!(
        starts = output.boundaries.starts.len(),
        ends = output.boundaries.ends.len(),
        nodes = output.cfg.node_count(),
        "reconciled boundaries and built CFG"
    );

    let out_dir = args.output.unwrap_or_else(|| args.dir.clone());
    std::fs::create_dir_all(&out_dir)?;

    let report = CfgReport::new(&output.boundaries, &output.cfg);

    println!("starts: {:?}", report.starts);
    println!("ends (before fall-through inference): {:?}", report.ends_pre_inference);
    println!("ends (after fall-through inference): {:?}", report.ends);
    println!("nodes: {:?}", report.nodes);

    let json = report.to_pretty_json()?;
    std::fs::write(out_dir.join("cfg.json"), &json).context("failed to write cfg.json")?;

    let dot_source = render::to_dot(&output.cfg);
    std::fs::write(out_dir.join("cfg.dot"), &dot_source).context("failed to write cfg.dot")?;
    println!("{dot_source}");

    println!(
        "root successors: {} {}",
        report.root_successor1, report.root_successor2
    );

    if args.no_render {
        info!("--no-render set, skipping dot invocation");
    } else {
        let pdf_path = out_dir.join("cfg.pdf");
        match render::render_pdf(&dot_source, &pdf_path) {
            Ok(true) => info!(path = %pdf_path.display(), "rendered cfg.pdf"),
            Ok(false) => warn!("`dot` not found on PATH; wrote cfg.dot only"),
            Err(e) => warn!(error = %e, "rendering cfg.pdf failed"),
        }
    }

    Ok(())
}
