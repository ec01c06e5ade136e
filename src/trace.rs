// trace.rs - lazy view over one or more simulator trace files
//
// Answers "given source address A, what address ran immediately after A?"
// from the first trace file in which A appears. Files are loaded on first
// use and cached for the lifetime of the index.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::assembly::AssemblyIndex;
use crate::error::{AnalysisError, Result};

/// Sentinel line index for a successor that resolution could not determine.
/// Never a valid line index (the assembly index never maps an address to
/// `usize::MAX`).
pub const NOT_TAKEN: usize = usize::MAX;

/// Result of resolving an indirect transfer through the trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Line(usize),
    /// No trace contains the source address. Non-fatal: the caller logs a
    /// diagnostic and continues with the sentinel.
    NotTaken,
}

pub struct TraceIndex {
    paths: Vec<PathBuf>,
    cache: RefCell<HashMap<PathBuf, Vec<String>>>,
}

impl TraceIndex {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        TraceIndex {
            paths,
            cache: RefCell::new(HashMap::new()),
        }
    }

    fn lines_of(&self, path: &Path) -> std::io::Result<()> {
        if !self.cache.borrow().contains_key(path) {
            let contents = std::fs::read_to_string(path)?;
            let lines = contents.lines().map(str::to_string).collect();
            self.cache.borrow_mut().insert(path.to_path_buf(), lines);
        }
        Ok(())
    }

    /// Find the target address reached immediately after `source_addr` was
    /// executed, scanning trace files in insertion order and returning on
    /// the first match.
    pub fn next_after(&self, source_addr: &str, assembly: &AssemblyIndex) -> Result<Lookup> {
        for path in &self.paths {
            if self.lines_of(path).is_err() {
                continue;
            }
            let cache = self.cache.borrow();
            let lines = &cache[path];

            let Some(pos) = lines.iter().position(|l| l.contains(source_addr)) else {
                continue;
            };
            let Some(next_line) = lines.get(pos + 1) else {
                return Err(AnalysisError::MalformedTraceLine(pos));
            };
            let tokens: Vec<&str> = next_line.split_whitespace().collect();
            let Some(raw) = tokens.get(4) else {
                return Err(AnalysisError::MalformedTraceLine(pos));
            };
            let Some(hex) = raw.strip_prefix("0x") else {
                return Err(AnalysisError::MalformedTraceLine(pos));
            };
            return Ok(assembly
                .line_of_address(hex)
                .map(Lookup::Line)
                .unwrap_or(Lookup::NotTaken));
        }
        Ok(Lookup::NotTaken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_trace(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn resolves_target_from_matching_trace_line() {
        let dir = tempfile::tempdir().unwrap();
        // The fifth whitespace token of the line after the match is the
        // dynamically observed successor address, as `0x<hex>`.
        let trc = write_trace(
            &dir,
            "a.trc",
            "step 0 pc 0x80000000 ret\n\
             step 1 pc 0x0 0x10000\n",
        );
        let assembly = AssemblyIndex::new("   10000:\t00000013          \taddi\tx0,x0,0\n");
        let idx = TraceIndex::new(vec![trc]);
        let result = idx.next_after("80000000", &assembly).unwrap();
        assert_eq!(result, Lookup::Line(0));
    }

    #[test]
    fn returns_not_taken_when_no_trace_contains_address() {
        let dir = tempfile::tempdir().unwrap();
        let trc = write_trace(&dir, "a.trc", "step 0 pc 0x1234 nop\n");
        let assembly = AssemblyIndex::new("");
        let idx = TraceIndex::new(vec![trc]);
        let result = idx.next_after("deadbeef", &assembly).unwrap();
        assert_eq!(result, Lookup::NotTaken);
    }
}
