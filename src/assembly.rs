// assembly.rs - in-memory index over a disassembly listing
//
// Loads the full disassembly as an ordered sequence of lines, plus
// address -> line and symbol -> line maps. Read-only once built.

use std::collections::HashMap;

use crate::error::{AnalysisError, Result};

/// A tokenized view of one assembly line.
///
/// Not a bit-decoded instruction — the whole input is text, and this is
/// just `line.split_whitespace()` with the positions the format promises.
#[derive(Debug, Clone)]
pub struct Instruction {
    pub address: String,
    pub encoding: String,
    pub mnemonic: String,
    pub operands: Vec<String>,
}

/// In-memory index over a disassembly listing.
#[derive(Debug)]
pub struct AssemblyIndex {
    lines: Vec<String>,
    address_to_line: HashMap<String, usize>,
    symbol_to_line: HashMap<String, usize>,
}

impl AssemblyIndex {
    pub fn new(contents: &str) -> Self {
        let lines: Vec<String> = contents.lines().map(str::to_string).collect();
        let mut address_to_line = HashMap::new();
        let mut symbol_to_line = HashMap::new();

        for (i, line) in lines.iter().enumerate() {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if let Some(first) = tokens.first() {
                if let Some(addr) = first.strip_suffix(':') {
                    address_to_line.entry(addr.to_string()).or_insert(i);
                }
            }
            // Symbol lines look like "<hexaddr> <name>:" - the second token
            // carries the "<name>:" marker.
            if tokens.len() >= 2 {
                if let Some(name) = tokens[1].strip_prefix('<').and_then(|s| s.strip_suffix(">:")) {
                    symbol_to_line.entry(name.to_string()).or_insert(i);
                }
            }
        }

        AssemblyIndex {
            lines,
            address_to_line,
            symbol_to_line,
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Line text at `i`. Panics if out of range, like indexing a `Vec`
    /// directly would — callers only ever pass line indices derived from
    /// this same index.
    pub fn line(&self, i: usize) -> &str {
        &self.lines[i]
    }

    /// Whether `i` is a line at all (guards end-of-listing probes such as
    /// `t - 1` computations).
    pub fn has_line(&self, i: usize) -> bool {
        i < self.lines.len()
    }

    pub fn tokens(&self, i: usize) -> Vec<&str> {
        self.lines[i].split_whitespace().collect()
    }

    /// A line is a valid instruction iff it yields >= 3 whitespace tokens.
    pub fn is_valid_instruction(&self, i: usize) -> bool {
        self.has_line(i) && self.tokens(i).len() >= 3
    }

    /// Raw `tokens[3]` field, unsplit. Used by `j`, whose target address is
    /// the whole fourth token rather than a comma-separated operand list.
    pub fn raw_operand_field(&self, i: usize) -> Option<String> {
        self.tokens(i).get(3).map(|s| s.to_string())
    }

    pub fn instruction(&self, i: usize) -> Option<Instruction> {
        let tokens = self.tokens(i);
        if tokens.len() < 3 {
            return None;
        }
        let operands = tokens
            .get(3)
            .map(|s| s.split(',').map(str::to_string).collect())
            .unwrap_or_default();
        Some(Instruction {
            address: tokens[0].trim_end_matches(':').to_string(),
            encoding: tokens[1].to_string(),
            mnemonic: tokens[2].to_string(),
            operands,
        })
    }

    /// Line index whose leading token is `addr:`.
    pub fn line_of_address(&self, addr: &str) -> Result<usize> {
        self.address_to_line
            .get(addr)
            .copied()
            .ok_or_else(|| AnalysisError::AddressNotFound(addr.to_string()))
    }

    /// Line index of the `<name>:` symbol marker.
    pub fn line_of_symbol(&self, name: &str) -> Option<usize> {
        self.symbol_to_line.get(name).copied()
    }

    /// A function's entry line is one past its symbol marker.
    pub fn main_entry(&self) -> Result<usize> {
        self.line_of_symbol("main")
            .map(|line| line + 1)
            .ok_or(AnalysisError::MainNotFound)
    }

    /// True if the line right before `entry` is `main`'s symbol marker.
    pub fn is_main_entry(&self, entry: usize) -> bool {
        entry > 0 && self.line(entry - 1).contains("<main>:")
    }
}
