//! This module provides parsing utilities for the pipeline source format.

use std::collections::BTreeMap;

use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

use crate::error::{ParseError, PipelineError, ResolveError};
use crate::isa::{self, Opcode};
use crate::program::{Instruction, Program};

#[derive(Parser)]
#[grammar = "src/grammar.pest"] // relative to crate root
pub struct AsmParser;

pub fn parse(src: &str) -> Result<pest::iterators::Pairs<'_, Rule>, ParseError> {
    Ok(AsmParser::parse(Rule::main, src)
        .map_err(|e| ParseError::Syntax(e.to_string()))?
        .next()
        .unwrap()
        .into_inner())
}

#[derive(Default)]
pub struct AssembleOption {
    verbose: bool,
}

impl AssembleOption {
    pub fn set_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// What an operand position accepts, for diagnostics and normalization.
#[derive(Clone, Copy)]
enum OperandKind {
    Register,
    Memory,
    Label,
}

impl OperandKind {
    fn describe(self) -> &'static str {
        match self {
            Self::Register => "a register",
            Self::Memory => "an offset(register) operand",
            Self::Label => "a label",
        }
    }
}

/// Expected operand layout per opcode.
fn operand_kinds(opcode: Opcode) -> &'static [OperandKind] {
    use OperandKind::*;
    match opcode {
        Opcode::Add | Opcode::Sub => &[Register, Register, Register],
        Opcode::Lw | Opcode::Sw => &[Register, Memory],
        Opcode::Beq | Opcode::Bne => &[Register, Register, Label],
        Opcode::J => &[Label],
    }
}

/// Transform source text to the program tables.
///
/// Labels bind to the line number of the next instruction, so a trailing
/// label resolves one past the end. All control-flow targets are linked
/// against the label table here, and an empty program is rejected, so the
/// simulation loop never has to deal with either.
pub fn assemble(src: &str, option: AssembleOption) -> Result<Program, PipelineError> {
    macro_rules! verbo {
        ($e:expr) => {
            if option.verbose {
                dbg!($e);
            }
        };
    }
    let lines = parse(src)?;
    let mut insts: Vec<Instruction> = Vec::new();
    let mut labels: BTreeMap<String, usize> = BTreeMap::new();
    // (program line, target) of every control-flow instruction, linked below
    let mut jump_refs: Vec<(usize, String)> = Vec::new();

    for line in lines.filter(|l| l.as_rule() == Rule::line) {
        for part in line.into_inner() {
            let src_line = part.as_span().start_pos().line_col().0;
            match part.as_rule() {
                Rule::label_decl => {
                    let name = part.into_inner().next().unwrap().as_str().to_string();
                    if labels.contains_key(&name) {
                        return Err(ParseError::DuplicateLabel {
                            line: src_line,
                            label: name,
                        }
                        .into());
                    }
                    labels.insert(name, insts.len() + 1);
                }
                Rule::inst => {
                    let text = part.as_str().trim_end().to_string();
                    let mut it = part.into_inner();
                    let mnemonic = it.next().unwrap();
                    let opcode = match Opcode::from_mnemonic(mnemonic.as_str()) {
                        Some(op) => op,
                        None => {
                            return Err(ParseError::UnknownOpcode {
                                line: src_line,
                                opcode: mnemonic.as_str().to_string(),
                            }
                            .into())
                        }
                    };
                    let operands = assemble_operands(opcode, src_line, it.collect())?;
                    if let Some(target) = operands.last().filter(|_| opcode.is_jump()) {
                        jump_refs.push((insts.len() + 1, target.clone()));
                    }
                    insts.push(Instruction {
                        label: None,
                        opcode,
                        operands,
                        src: text,
                    });
                }
                _ => unreachable!(),
            }
        }
    }
    if insts.is_empty() {
        return Err(PipelineError::EmptyProgram);
    }
    // annotate instructions with the label bound to their line
    for (name, line) in &labels {
        if let Some(inst) = line.checked_sub(1).and_then(|i| insts.get_mut(i)) {
            if inst.label.is_none() {
                inst.label = Some(name.clone());
            }
        }
    }
    // static linking pass: every control-flow target must exist
    for (line, target) in &jump_refs {
        if !labels.contains_key(target) {
            return Err(ResolveError::UndefinedLabel {
                line: *line,
                label: target.clone(),
            }
            .into());
        }
    }
    verbo!(&insts);
    verbo!(&labels);
    Ok(Program::new(insts, labels))
}

fn assemble_operands(
    opcode: Opcode,
    line: usize,
    pairs: Vec<Pair<'_, Rule>>,
) -> Result<Vec<String>, ParseError> {
    let kinds = operand_kinds(opcode);
    if pairs.len() != kinds.len() {
        return Err(ParseError::OperandCount {
            line,
            opcode,
            want: kinds.len(),
            got: pairs.len(),
        });
    }
    let mut operands = Vec::with_capacity(kinds.len());
    for (&kind, pair) in kinds.iter().zip(pairs) {
        let token = pair.into_inner().next().unwrap();
        let found = token.as_str().to_string();
        match (kind, token.as_rule()) {
            (OperandKind::Register, Rule::reg) => operands.push(isa::normalize_reg(&found)),
            (OperandKind::Memory, Rule::mem) => {
                // only the base register survives; the displacement plays
                // no part in name-based dependency checks
                let reg = token
                    .into_inner()
                    .find(|p| p.as_rule() == Rule::reg)
                    .unwrap();
                operands.push(isa::normalize_reg(reg.as_str()));
            }
            (OperandKind::Label, Rule::ident) => operands.push(found),
            _ => {
                return Err(ParseError::BadOperand {
                    line,
                    opcode,
                    expected: kind.describe(),
                    found,
                })
            }
        }
    }
    Ok(operands)
}
