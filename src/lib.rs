//! Cycle-by-cycle simulator for a five-stage instruction pipeline (IF, ID,
//! EX, MEM, WB) over a small MIPS-like instruction set.
//!
//! The simulator never computes register values. It compares register
//! *names* between in-flight instructions, inserts stall bubbles until a
//! producing instruction reaches writeback (no forwarding), and resolves
//! control-flow instructions to their label targets when picking the next
//! fetch line. A program is parsed into read-only tables, analysed once for
//! dependency edges, then run through [`PipeSim`] until the pipe drains;
//! one [`ClockRecord`] per clock is kept for rendering.

mod asm;
mod error;
mod hazard;
mod isa;
mod pipeline;
mod program;
mod trace;

pub use asm::{assemble, AssembleOption};
pub use error::{ParseError, PipelineError, ResolveError};
pub use hazard::{compute_edges, DepEdges};
pub use isa::{hazard_positions, normalize_reg, Opcode};
pub use pipeline::{ClockRecord, PipeSim, Slot, Stage};
pub use program::{Instruction, Program};
pub use trace::{render_record, render_record_tty};

#[cfg(test)]
mod tests {
    use crate::{assemble, render_record, AssembleOption, PipeSim};

    #[test]
    fn test_demo_run() {
        let prog = assemble(crate::asm::tests::DEMO_ASM, AssembleOption::default()).unwrap();
        let mut sim = PipeSim::init(prog).unwrap();
        while !sim.is_terminate() {
            sim.step();
        }
        for record in sim.trace() {
            eprintln!("{}", render_record(record, sim.program()));
        }
        assert_eq!(sim.cycle_count(), sim.trace().len() as u64);
    }
}
