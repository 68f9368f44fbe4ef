//! Error taxonomy of the simulator.
//!
//! Everything here is detected while loading the program or preparing the
//! simulation; once the clock loop starts it cannot fail.

use thiserror::Error;

/// Top-level error for loading and simulating a program.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("resolution error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("input has no instructions to be processed")]
    EmptyProgram,
}

/// Malformed source text, reported with the offending source line.
#[derive(Error, Debug)]
pub enum ParseError {
    /// rendered grammar error, line and column included
    #[error("{0}")]
    Syntax(String),

    #[error("line {line}: instruction not allowed: `{opcode}` (allowed: {})", crate::isa::MNEMONICS.join(", "))]
    UnknownOpcode { line: usize, opcode: String },

    #[error("line {line}: `{opcode}` expects {want} operand(s), found {got}")]
    OperandCount {
        line: usize,
        opcode: crate::isa::Opcode,
        want: usize,
        got: usize,
    },

    #[error("line {line}: `{opcode}` expects {expected}, found `{found}`")]
    BadOperand {
        line: usize,
        opcode: crate::isa::Opcode,
        expected: &'static str,
        found: String,
    },

    #[error("line {line}: label `{label}` is already declared")]
    DuplicateLabel { line: usize, label: String },
}

/// A jump target that cannot be resolved against the label table.
///
/// Label references are validated when the program is constructed, so
/// hitting one of these during simulation setup means the program tables
/// were built by hand; either way the run refuses to start.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("instruction {line} jumps to undefined label `{label}`")]
    UndefinedLabel { line: usize, label: String },

    #[error("no instruction at line {line}")]
    NoSuchLine { line: usize },
}
