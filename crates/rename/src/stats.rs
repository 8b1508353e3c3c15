//! Rename statistics collection and reporting.
//!
//! This module tracks rename stage activity. It provides:
//! 1. **Throughput:** Renamed instructions and destination operands.
//! 2. **Pressure:** Stalls caused by empty free lists and pinned-register reuse.
//! 3. **Recovery:** Mappings committed or undone, and branch checkpoint outcomes.

use serde::Serialize;

/// Rename stage statistics.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RenameStats {
    /// Instructions that passed the rename stage.
    pub renamed_insts: u64,
    /// Destination operands renamed.
    pub renamed_operands: u64,
    /// Source operands looked up.
    pub lookups: u64,
    /// Destination renames that reused a pinned register.
    pub pinned_reuses: u64,
    /// Instructions held back because a free list was short.
    pub full_stalls: u64,
    /// History entries retired by commit.
    pub committed_maps: u64,
    /// History entries rolled back by a squash or a lost branch path.
    pub undone_maps: u64,
    /// Branch checkpoints opened.
    pub checkpoints: u64,
    /// Checkpoints resolved as taken.
    pub taken_resolutions: u64,
    /// Checkpoints resolved as not taken.
    pub not_taken_resolutions: u64,
}

impl RenameStats {
    /// Average destination operands per renamed instruction.
    pub fn operands_per_inst(&self) -> f64 {
        if self.renamed_insts == 0 {
            0.0
        } else {
            self.renamed_operands as f64 / self.renamed_insts as f64
        }
    }

    /// Prints a summary to stdout.
    pub fn print(&self) {
        println!("\n==========================================================");
        println!("RENAME STATISTICS");
        println!("==========================================================");
        println!("renamed.insts             {}", self.renamed_insts);
        println!("renamed.operands          {}", self.renamed_operands);
        println!("renamed.ops_per_inst      {:.2}", self.operands_per_inst());
        println!("renamed.lookups           {}", self.lookups);
        println!("renamed.pinned_reuses     {}", self.pinned_reuses);
        println!("stall.free_list           {}", self.full_stalls);
        println!("history.committed         {}", self.committed_maps);
        println!("history.undone            {}", self.undone_maps);
        println!("brs.checkpoints           {}", self.checkpoints);
        println!("brs.taken                 {}", self.taken_resolutions);
        println!("brs.not_taken             {}", self.not_taken_resolutions);
    }
}
