// scanner.rs - walks a single function's instructions, recording boundaries
//
// One linear walk from a function's entry line to the blank line that ends
// it, dispatching on mnemonic class and feeding the shared `Boundaries`
// collector. Newly discovered callees are pushed onto the worklist here,
// not in the caller.

use std::collections::HashSet;

use crate::assembly::AssemblyIndex;
use crate::boundary::Boundaries;
use crate::classify::{classify, MnemonicClass};
use crate::error::Result;
use crate::trace::{Lookup, TraceIndex, NOT_TAKEN};

/// LIFO dedup-on-visit stack of function entry lines pending analysis.
#[derive(Debug, Default)]
pub struct Worklist {
    pending: Vec<usize>,
    visited: HashSet<usize>,
}

impl Worklist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: usize) {
        self.pending.push(entry);
    }

    /// Pop the next entry not yet visited, marking it visited. Skips
    /// entries already seen rather than yielding them twice.
    pub fn pop_unvisited(&mut self) -> Option<usize> {
        while let Some(entry) = self.pending.pop() {
            if self.visited.insert(entry) {
                return Some(entry);
            }
        }
        None
    }
}

/// Scan one function starting at `entry`, recording boundaries and
/// enqueueing newly discovered callees. Returns the line of `ret` if this
/// function is `main` (the scanner's caller tracks this as `end_of_main`).
pub fn scan_function(
    entry: usize,
    assembly: &AssemblyIndex,
    trace: &TraceIndex,
    boundaries: &mut Boundaries,
    worklist: &mut Worklist,
) -> Result<Option<usize>> {
    boundaries.add_start(entry);
    let mut end_of_main = None;

    let mut i = entry;
    loop {
        if !assembly.has_line(i) || assembly.line(i).trim().is_empty() {
            break;
        }

        if !assembly.is_valid_instruction(i) {
            i += 1;
            continue;
        }

        let inst = assembly.instruction(i).unwrap();

        match classify(&inst.mnemonic) {
            MnemonicClass::Ordinary => {}

            MnemonicClass::Return => {
                if assembly.is_main_entry(entry) {
                    boundaries.add_end(i, vec![]);
                    end_of_main = Some(i);
                } else {
                    let target = match trace.next_after(&inst.address, assembly)? {
                        Lookup::Line(t) => t,
                        Lookup::NotTaken => NOT_TAKEN,
                    };
                    boundaries.add_end(i, vec![target]);
                }
            }

            MnemonicClass::ConditionalBranch => {
                let target_addr = inst.operands.last().expect("branch has operands");
                let t = assembly.line_of_address(target_addr.trim())?;
                boundaries.add_start(i + 1);
                boundaries.add_start(t);
                boundaries.add_end(i, vec![i + 1, t]);
                boundaries.add_end(t.saturating_sub(1), vec![]);
            }

            MnemonicClass::Jal => {
                let target_addr = inst
                    .operands
                    .get(1)
                    .expect("jal has rd, target operands");
                let t = assembly.line_of_address(target_addr.trim())?;
                boundaries.add_start(i + 1);
                boundaries.add_start(t);
                boundaries.add_end(i, vec![t]);
                worklist.push(t);
            }

            MnemonicClass::J => {
                let target_addr = assembly
                    .raw_operand_field(i)
                    .expect("j has a target operand");
                let t = assembly.line_of_address(target_addr.trim())?;
                boundaries.add_start(i + 1);
                boundaries.add_start(t);
                boundaries.add_end(i, vec![t]);
                boundaries.add_end(t.saturating_sub(1), vec![]);
            }

            MnemonicClass::Jalr => {
                boundaries.add_start(i + 1);
                let t = match trace.next_after(&inst.address, assembly)? {
                    Lookup::Line(t) => {
                        boundaries.add_start(t);
                        worklist.push(t);
                        t
                    }
                    Lookup::NotTaken => NOT_TAKEN,
                };
                boundaries.add_end(i, vec![t]);
            }

            MnemonicClass::Jr => {
                boundaries.add_start(i + 1);
                let t = match trace.next_after(&inst.address, assembly)? {
                    Lookup::Line(t) => {
                        boundaries.add_start(t);
                        boundaries.add_end(t.saturating_sub(1), vec![]);
                        t
                    }
                    Lookup::NotTaken => NOT_TAKEN,
                };
                boundaries.add_end(i, vec![t]);
            }
        }

        i += 1;
    }

    Ok(end_of_main)
}
