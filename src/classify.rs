// classify.rs - static classification of instruction mnemonics
//
// Pure lookup tables, kept separate from the scanner so the dispatch table
// in scanner.rs reads as "for each class, do X" rather than a wall of
// string comparisons.

/// Coarse classification of an instruction's control-transfer behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MnemonicClass {
    Ordinary,
    Return,
    ConditionalBranch,
    Jal,
    J,
    Jalr,
    Jr,
}

const CONDITIONAL_BRANCHES: &[&str] = &[
    "beq", "bne", "blt", "bltu", "bge", "bgeu", "beqz", "bnez", "bltz", "blez", "bgtz", "bgez",
    "bgt", "bgtu", "ble", "bleu",
];

pub fn classify(mnemonic: &str) -> MnemonicClass {
    match mnemonic {
        "ret" => MnemonicClass::Return,
        "jal" => MnemonicClass::Jal,
        "j" => MnemonicClass::J,
        "jalr" => MnemonicClass::Jalr,
        "jr" => MnemonicClass::Jr,
        m if CONDITIONAL_BRANCHES.contains(&m) => MnemonicClass::ConditionalBranch,
        _ => MnemonicClass::Ordinary,
    }
}
