//! Instruction interface consumed by renaming.
//!
//! The rename maps only need two facts about an instruction: how many destination
//! registers it writes per class (for admission), and which side of an outstanding
//! branch it was fetched on (for routing). `DecodedInst` is the concrete instruction
//! the rename stage and the trace driver feed in.

use serde::Deserialize;

use crate::common::reg::{ArchRegId, RegClass};

/// Dynamic instruction as seen by the rename maps.
pub trait DynInst {
    /// Number of destination registers of `class` this instruction writes.
    fn num_dest_regs(&self, class: RegClass) -> usize;

    /// True if the instruction follows the predicted-taken side of the
    /// outstanding branch checkpoint.
    fn is_predication_ready(&self) -> bool;
}

/// Decoded instruction ready for renaming.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DecodedInst {
    /// Program order sequence number.
    pub seq: u64,
    /// Program counter, used only for tracing.
    #[serde(default)]
    pub pc: u64,
    /// Source operands, looked up before destinations are renamed.
    #[serde(default)]
    pub srcs: Vec<ArchRegId>,
    /// Destination operands, renamed in order.
    #[serde(default)]
    pub dests: Vec<ArchRegId>,
    /// Fetched on the predicted-taken side of the outstanding branch.
    #[serde(default)]
    pub taken_path: bool,
}

impl DecodedInst {
    /// Creates an instruction with no operands.
    pub fn new(seq: u64) -> Self {
        Self {
            seq,
            ..Self::default()
        }
    }

    /// Adds a source operand.
    #[must_use]
    pub fn src(mut self, reg: ArchRegId) -> Self {
        self.srcs.push(reg);
        self
    }

    /// Adds a destination operand.
    #[must_use]
    pub fn dest(mut self, reg: ArchRegId) -> Self {
        self.dests.push(reg);
        self
    }

    /// Marks the instruction as fetched on the predicted-taken side.
    #[must_use]
    pub const fn on_taken_path(mut self) -> Self {
        self.taken_path = true;
        self
    }
}

impl DynInst for DecodedInst {
    fn num_dest_regs(&self, class: RegClass) -> usize {
        self.dests.iter().filter(|r| r.is(class)).count()
    }

    fn is_predication_ready(&self) -> bool {
        self.taken_path
    }
}
