//! Static data-hazard analysis over instruction pairs.

use std::collections::{BTreeMap, BTreeSet};

use crate::isa::hazard_positions;
use crate::program::Program;

/// Dependent line mapped to the lines that must leave the pipe (reach
/// writeback) before it may issue.
pub type DepEdges = BTreeMap<usize, BTreeSet<usize>>;

/// Run every ordered pair of instructions through the dependency rule table
/// and record which later lines read a register defined by an earlier line.
///
/// The scan is exhaustive: a later instruction collects one edge per
/// conflicting earlier instruction, not just the nearest one. Computed once
/// before simulation; jumps at runtime reorder issue but never invalidate
/// edges derived from static program order.
pub fn compute_edges(prog: &Program) -> DepEdges {
    let mut edges = DepEdges::new();
    for (earlier, parent) in prog.lines() {
        // only the defining operand of the earlier instruction is compared
        let def_reg = match parent.operands.first() {
            Some(reg) => reg,
            None => continue,
        };
        for (later, child) in prog.lines().skip(earlier) {
            let positions = hazard_positions(parent.opcode, child.opcode);
            if positions
                .iter()
                .any(|&pos| child.operands.get(pos) == Some(def_reg))
            {
                edges.entry(later).or_default().insert(earlier);
            }
        }
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asm::{assemble, AssembleOption};

    fn edges(src: &str) -> DepEdges {
        compute_edges(&assemble(src, AssembleOption::default()).unwrap())
    }

    #[test]
    fn test_back_to_back() {
        let e = edges("add $t0, $t1, $t2\nsub $t3, $t0, $t4");
        assert_eq!(e[&2], BTreeSet::from([1]));
    }

    #[test]
    fn test_defining_operand_only() {
        // the child reads a register the parent also reads, which is not
        // a dependency: only the parent's first operand defines
        let e = edges("add $t0, $t1, $t2\nsub $t3, $t1, $t2");
        assert!(e.is_empty());
    }

    #[test]
    fn test_multiple_required_lines() {
        let e = edges(
            "add $t0, $s0, $s1\n\
             add $t1, $s2, $s3\n\
             sub $t2, $t0, $t1",
        );
        assert_eq!(e[&3], BTreeSet::from([1, 2]));
    }

    #[test]
    fn test_all_earlier_writers_contribute() {
        // the scan does not stop at the nearest writer
        let e = edges(
            "add $t0, $s0, $s1\n\
             add $t0, $s2, $s3\n\
             sub $t2, $t0, $s4",
        );
        assert_eq!(e[&3], BTreeSet::from([1, 2]));
    }

    #[test]
    fn test_store_and_branch_define_nothing() {
        let e = edges("sw $t0, 4($t1)\nadd $t2, $t0, $t3");
        assert!(e.is_empty());
        let e = edges("beq $t0, $t1, out\nadd $t2, $t0, $t3\nout:");
        assert!(e.is_empty());
    }

    #[test]
    fn test_load_row_asymmetry() {
        // lw defines a register, but its row has no memory-child entries
        let e = edges("lw $t0, 4($t1)\nsw $t0, 8($t2)");
        assert!(e.is_empty());
        let e = edges("lw $t0, 4($t1)\nlw $t2, 8($t0)");
        assert!(e.is_empty());
        // while arithmetic and branch children do depend on it
        let e = edges("lw $t0, 4($t1)\nadd $t2, $t0, $t3");
        assert_eq!(e[&2], BTreeSet::from([1]));
        let e = edges("lw $t0, 4($t1)\nbne $t0, $t2, out\nout:");
        assert_eq!(e[&2], BTreeSet::from([1]));
    }

    #[test]
    fn test_store_value_and_branch_sources() {
        // sw depends through its stored value, branches through both sources
        let e = edges("add $t0, $t1, $t2\nsw $t0, 4($t3)");
        assert_eq!(e[&2], BTreeSet::from([1]));
        let e = edges("add $t0, $t1, $t2\nbeq $t3, $t0, out\nout:");
        assert_eq!(e[&2], BTreeSet::from([1]));
    }

    #[test]
    fn test_address_register_of_store_is_ignored() {
        // only position 0 of sw is in the rule table
        let e = edges("add $t0, $t1, $t2\nsw $t3, 4($t0)");
        assert!(e.is_empty());
    }
}
