//! Instruction set definition for the simulated pipeline.
//!
//! Seven opcodes are recognized. Register contents are never computed;
//! only register *names* matter, so registers stay plain strings and the
//! dependency knowledge below works purely on operand positions.

use std::fmt;

/// Mnemonics accepted by the assembler, in opcode order.
pub const MNEMONICS: [&str; 7] = ["add", "sub", "beq", "bne", "lw", "sw", "j"];

/// The recognized opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Opcode {
    Add,
    Sub,
    Beq,
    Bne,
    Lw,
    Sw,
    J,
}

impl Opcode {
    pub fn from_mnemonic(s: &str) -> Option<Self> {
        match s {
            "add" => Some(Self::Add),
            "sub" => Some(Self::Sub),
            "beq" => Some(Self::Beq),
            "bne" => Some(Self::Bne),
            "lw" => Some(Self::Lw),
            "sw" => Some(Self::Sw),
            "j" => Some(Self::J),
            _ => None,
        }
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Beq => "beq",
            Self::Bne => "bne",
            Self::Lw => "lw",
            Self::Sw => "sw",
            Self::J => "j",
        }
    }

    /// Control-flow instructions redirect fetch to their label target.
    pub fn is_jump(self) -> bool {
        matches!(self, Self::Beq | Self::Bne | Self::J)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// `$zero` is an alias; comparisons use the short form.
pub fn normalize_reg(name: &str) -> String {
    if name == "$zero" {
        "$00".to_string()
    } else {
        name.to_string()
    }
}

/// Operand positions of `later` that read the register defined by `earlier`.
///
/// Fixed domain knowledge, not derived from input: only `add`, `sub` and
/// `lw` define a register, and the instruction formats place it in their
/// first operand. That single defining operand is the only one ever
/// consulted on the earlier side, a deliberate simplification of the fixed
/// operand layout. Pairs without an entry can never conflict, so the
/// function is total with an empty default. Note the `lw` row carries no
/// `lw`/`sw` entries.
pub fn hazard_positions(earlier: Opcode, later: Opcode) -> &'static [usize] {
    use Opcode::*;
    match (earlier, later) {
        (Add | Sub, Add | Sub) => &[1, 2],
        (Add | Sub, Lw) => &[1],
        (Add | Sub, Sw) => &[0],
        (Add | Sub, Beq | Bne) => &[0, 1],
        (Lw, Add | Sub) => &[1, 2],
        (Lw, Beq | Bne) => &[0, 1],
        _ => &[],
    }
}
