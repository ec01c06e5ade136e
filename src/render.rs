// render.rs - glue to the external graph-rendering collaborator
//
// What lives here is the textual dot-format dump (pure, unit-testable) and
// a thin shell-out to the `dot` binary for PDF rendering; the rendering
// backend itself belongs to Graphviz, not to this crate.

use std::path::Path;
use std::process::Command;

use petgraph::dot::{Config, Dot};

use crate::cfg::Cfg;

/// Render the CFG in Graphviz's native dot format.
pub fn to_dot(cfg: &Cfg) -> String {
    let labeled = cfg.graph.map(
        |_, node| format!("Start: {}; End: {}", node.start, node.end),
        |_, _| "",
    );
    format!("{:?}", Dot::with_config(&labeled, &[Config::EdgeNoLabel]))
}

/// Shell out to the `dot` binary to render `dot_source` as a PDF at
/// `output_path`. Returns `Ok(false)` (not an error) when `dot` is not on
/// `PATH` — rendering is an external concern and its unavailability is
/// never fatal to the analysis itself.
pub fn render_pdf(dot_source: &str, output_path: &Path) -> anyhow::Result<bool> {
    let mut child = match Command::new("dot")
        .arg("-Tpdf")
        .arg("-o")
        .arg(output_path)
        .stdin(std::process::Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(_) => return Ok(false),
    };

    {
        use std::io::Write;
        let stdin = child
            .stdin
            .as_mut()
            .expect("stdin was requested as piped");
        stdin.write_all(dot_source.as_bytes())?;
    }

    let status = child.wait()?;
    Ok(status.success())
}
