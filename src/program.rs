//! Parsed program representation: the instruction table and the label table.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::ResolveError;
use crate::isa::Opcode;

/// One parsed instruction, identified by its 1-based position in program
/// order. Immutable once the program is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// label bound to this line, if any
    pub label: Option<String>,
    pub opcode: Opcode,
    /// normalized operands: register names, or a label target for
    /// control-flow instructions
    pub operands: Vec<String>,
    /// source text, kept for trace display
    pub src: String,
}

impl Instruction {
    /// Label target of a control-flow instruction, `None` otherwise.
    pub fn jump_target(&self) -> Option<&str> {
        if self.opcode.is_jump() {
            self.operands.last().map(String::as_str)
        } else {
            None
        }
    }
}

/// Instruction table plus label table. Read-only after assembly; line
/// numbers are contiguous starting at 1.
#[derive(Debug, Default, Clone)]
pub struct Program {
    insts: Vec<Instruction>,
    labels: BTreeMap<String, usize>,
}

impl Program {
    pub(crate) fn new(insts: Vec<Instruction>, labels: BTreeMap<String, usize>) -> Self {
        Self { insts, labels }
    }

    pub fn instruction_at(&self, line: usize) -> Option<&Instruction> {
        line.checked_sub(1).and_then(|i| self.insts.get(i))
    }

    /// A label binds to the line of the instruction following it, so a
    /// trailing label resolves to `count() + 1`.
    pub fn label_line(&self, name: &str) -> Option<usize> {
        self.labels.get(name).copied()
    }

    pub fn count(&self) -> usize {
        self.insts.len()
    }

    /// Iterate `(line, instruction)` in program order.
    pub fn lines(&self) -> impl Iterator<Item = (usize, &Instruction)> {
        self.insts.iter().enumerate().map(|(i, inst)| (i + 1, inst))
    }

    /// Resolve the fetch target that follows `line`.
    ///
    /// Control-flow instructions redirect to their label target, which may
    /// point forward, backward, or one past the last instruction (the
    /// trailing sentinel label idiom). Anything else falls through to
    /// `line + 1`.
    pub fn next_line(&self, line: usize) -> Result<usize, ResolveError> {
        let inst = self
            .instruction_at(line)
            .ok_or(ResolveError::NoSuchLine { line })?;
        match inst.jump_target() {
            None => Ok(line + 1),
            Some(target) => self
                .label_line(target)
                .ok_or_else(|| ResolveError::UndefinedLabel {
                    line,
                    label: target.to_string(),
                }),
        }
    }
}

impl fmt::Display for Program {
    /// program listing with 1-based line numbers
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (line, inst) in self.lines() {
            if let Some(label) = &inst.label {
                writeln!(f, "{label}:")?;
            }
            writeln!(f, "{line:>4} | {}", inst.src)?;
        }
        for (name, line) in &self.labels {
            if *line == self.count() + 1 {
                writeln!(f, "{name}:")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::asm::{assemble, AssembleOption};
    use crate::error::ResolveError;

    fn prog(src: &str) -> crate::program::Program {
        assemble(src, AssembleOption::default()).unwrap()
    }

    #[test]
    fn test_fall_through() {
        let p = prog("add $t0, $t1, $t2\nsub $t3, $t4, $t5");
        assert_eq!(p.next_line(1).unwrap(), 2);
        assert_eq!(p.next_line(2).unwrap(), 3);
    }

    #[test]
    fn test_jump_targets() {
        let p = prog("back: add $t0, $t1, $t2\nbeq $t0, $t1, back\nj end\nend:");
        // branch back, jump to the trailing sentinel one past the end
        assert_eq!(p.next_line(2).unwrap(), 1);
        assert_eq!(p.next_line(3).unwrap(), 4);
        assert_eq!(p.count(), 3);
    }

    #[test]
    fn test_no_such_line() {
        let p = prog("add $t0, $t1, $t2");
        assert!(matches!(
            p.next_line(0),
            Err(ResolveError::NoSuchLine { line: 0 })
        ));
        assert!(matches!(
            p.next_line(5),
            Err(ResolveError::NoSuchLine { line: 5 })
        ));
    }

    #[test]
    fn test_listing() {
        let p = prog("loop: add $t0, $t1, $t2\nj loop");
        let listing = format!("{p}");
        assert!(listing.contains("loop:"));
        assert!(listing.contains("   1 | add $t0, $t1, $t2"));
    }
}
