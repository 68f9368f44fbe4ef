//! Rendering of per-clock pipeline snapshots.
//!
//! Pure formatting: the same record renders to the same text every time.
//! Writing the result to a file or terminal is the caller's concern.

use ansi_term::Colour;

use crate::pipeline::{ClockRecord, Slot, Stage};
use crate::program::Program;

const RULE: &str = "--------------------------------------------";

fn slot_text(slot: Slot, prog: &Program) -> String {
    match slot {
        Slot::Inst(line) => match prog.instruction_at(line) {
            Some(inst) => format!("{}\t(PC={line})", inst.src),
            None => format!("?\t(PC={line})"),
        },
        Slot::Bubble => "nop".to_string(),
        Slot::Drained => "-".to_string(),
    }
}

/// Plain rendering, as written to the trace file.
pub fn render_record(record: &ClockRecord, prog: &Program) -> String {
    let mut out = String::new();
    out.push_str(RULE);
    out.push('\n');
    out.push_str(&format!("Clock #{}:\n", record.clock));
    for stage in Stage::ALL {
        out.push_str(&format!(
            "{}:\t{}\n",
            stage.short_name(),
            slot_text(record.slot(stage), prog)
        ));
    }
    out
}

/// Coloured rendering for the terminal echo.
pub fn render_record_tty(record: &ClockRecord, prog: &Program) -> String {
    let mut out = String::new();
    out.push_str(RULE);
    out.push('\n');
    out.push_str(&format!(
        "{}\n",
        Colour::Green.bold().paint(format!("Clock #{}:", record.clock))
    ));
    for stage in Stage::ALL {
        out.push_str(&format!(
            "{}\t{}\n",
            Colour::Blue.bold().paint(format!("{}:", stage.short_name())),
            slot_text(record.slot(stage), prog)
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asm::{assemble, AssembleOption};
    use crate::pipeline::PipeSim;

    #[test]
    fn test_render_shape() {
        let prog = assemble("add $t0, $t1, $t2\nsub $t3, $t0, $t4", AssembleOption::default())
            .unwrap();
        let mut sim = PipeSim::init(prog).unwrap();
        let first = sim.step();
        let text = render_record(&first, sim.program());
        assert!(text.contains("Clock #1:"));
        assert!(text.contains("IF:\tadd $t0, $t1, $t2\t(PC=1)"));
        assert!(text.contains("WB:\tnop"));
        // a stalled fetch renders as a bubble
        let second = sim.step();
        let text = render_record(&second, sim.program());
        assert!(text.contains("IF:\tnop"));
        assert!(text.contains("ID:\tadd $t0, $t1, $t2\t(PC=1)"));
    }
}
