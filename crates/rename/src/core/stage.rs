//! Rename Stage: admission, operand renaming, and the rename history buffer.
//!
//! This stage takes decoded instructions and rewrites their operands to physical
//! registers. Every destination rename is recorded in a history buffer as the
//! `(arch, new, prev)` triple returned by the rename map, tagged with the branch
//! path it was renamed on. The buffer is what makes recovery possible:
//! 1. **Commit:** retiring an entry frees the register it replaced.
//! 2. **Squash:** undoing an entry restores the previous mapping and frees the new register.
//! 3. **Branch resolution:** entries of the losing path are released with their checkpoint.
//!
//! Source operands are looked up BEFORE destinations are renamed, so an
//! instruction reading its own destination (e.g. `add x5, x5, x6`) sees the
//! previous producer.

use std::collections::VecDeque;

use serde::Serialize;
use tracing::{debug, trace};

use crate::common::error::RenameError;
use crate::common::reg::{ArchRegId, PhysRegIndex, RegClass, RenameInfo};
use crate::config::Config;
use crate::core::inst::{DecodedInst, DynInst};
use crate::core::pool::PhysRegPool;
use crate::core::rename::{MapEntry, SpeculativeRenameMap, UnifiedRenameMap};
use crate::stats::RenameStats;

/// Branch path a rename was performed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenamePath {
    /// No checkpoint was outstanding; the mapping is on every path.
    Shared,
    /// Predicted-taken side of the outstanding branch.
    Taken,
    /// Not-taken side of the outstanding branch.
    NotTaken,
}

impl RenamePath {
    /// Routing flag passed to the speculative map.
    #[inline]
    pub const fn is_taken(self) -> bool {
        matches!(self, Self::Taken)
    }
}

/// One destination rename recorded for commit or rollback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RenameHistory {
    /// Sequence number of the renaming instruction.
    pub seq: u64,
    /// Renamed architectural register.
    pub arch: ArchRegId,
    /// New and previous physical registers.
    pub info: RenameInfo,
    /// Branch path of the rename.
    pub path: RenamePath,
}

/// Instruction with its operands renamed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RenamedInst {
    /// Sequence number.
    pub seq: u64,
    /// Physical source registers, in operand order.
    pub srcs: Vec<PhysRegIndex>,
    /// Destination renames, in operand order.
    pub dests: Vec<RenameInfo>,
    /// Branch path the instruction was renamed on.
    pub path: RenamePath,
}

/// Rename stage: register pool, speculative rename map, and history buffer.
#[derive(Debug, Clone)]
pub struct RenameStage {
    pool: PhysRegPool,
    map: SpeculativeRenameMap,
    history: VecDeque<RenameHistory>,
    brs_seq: Option<u64>,
    stats: RenameStats,
}

impl RenameStage {
    /// Builds the register pool and an initialized rename map.
    ///
    /// # Errors
    ///
    /// Fails if the register file cannot back the initial architectural mapping.
    pub fn new(config: &Config) -> Result<Self, RenameError> {
        let mut pool = PhysRegPool::new(&config.regs);
        let mut map = SpeculativeRenameMap::new(UnifiedRenameMap::new());
        map.init(&config.regs, &mut pool)?;
        Ok(Self {
            pool,
            map,
            history: VecDeque::new(),
            brs_seq: None,
            stats: RenameStats::default(),
        })
    }

    /// The speculative rename map.
    #[inline]
    pub fn map(&self) -> &SpeculativeRenameMap {
        &self.map
    }

    /// The register pool.
    #[inline]
    pub fn pool(&self) -> &PhysRegPool {
        &self.pool
    }

    /// Mutable register pool, for collaborators that write values or return registers.
    #[inline]
    pub fn pool_mut(&mut self) -> &mut PhysRegPool {
        &mut self.pool
    }

    /// Collected statistics.
    #[inline]
    pub fn stats(&self) -> &RenameStats {
        &self.stats
    }

    /// Number of history entries not yet committed or undone.
    #[inline]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// History entries, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &RenameHistory> {
        self.history.iter()
    }

    /// Sequence number of the branch holding the outstanding checkpoint.
    #[inline]
    pub const fn checkpoint_seq(&self) -> Option<u64> {
        self.brs_seq
    }

    /// Path a new instruction on the `taken` stream is renamed on.
    fn current_path(&self, taken: bool) -> RenamePath {
        if self.map.no_brs() {
            RenamePath::Shared
        } else if taken {
            RenamePath::Taken
        } else {
            RenamePath::NotTaken
        }
    }

    /// Renames `inst`.
    ///
    /// Returns `Ok(None)` when a free list is too short for the instruction's
    /// destinations; nothing is changed and the caller should retry later.
    ///
    /// # Errors
    ///
    /// [`RenameError::ArchIndexOutOfRange`] if any operand lies outside its
    /// architectural register file; nothing is changed. Otherwise propagates
    /// rename map contract violations. Destinations of `inst` renamed before
    /// the failing one are rolled back first.
    pub fn rename_inst(&mut self, inst: &DecodedInst) -> Result<Option<RenamedInst>, RenameError> {
        if let Some(&arch) = inst
            .srcs
            .iter()
            .chain(&inst.dests)
            .find(|&&reg| !self.map.primary().contains(reg))
        {
            return Err(RenameError::ArchIndexOutOfRange { arch });
        }

        if !self.map.can_rename(inst, &self.pool) {
            self.stats.full_stalls += 1;
            trace!(seq = inst.seq, pc = inst.pc, "rename stalled on free list");
            return Ok(None);
        }

        let taken = inst.is_predication_ready();
        let path = self.current_path(taken);

        let srcs: Vec<PhysRegIndex> = inst
            .srcs
            .iter()
            .map(|&reg| self.map.lookup(reg, taken))
            .collect();
        self.stats.lookups += srcs.len() as u64;

        let mut dests = Vec::with_capacity(inst.dests.len());
        for &arch in &inst.dests {
            match self.map.rename(arch, taken, &mut self.pool) {
                Ok(info) => {
                    if info.is_reuse() && !arch.is(RegClass::Invalid) {
                        self.stats.pinned_reuses += 1;
                    }
                    self.history.push_back(RenameHistory {
                        seq: inst.seq,
                        arch,
                        info,
                        path,
                    });
                    dests.push(info);
                }
                Err(err) => {
                    for _ in 0..dests.len() {
                        if let Some(entry) = self.history.pop_back() {
                            self.undo(&entry);
                        }
                    }
                    return Err(err);
                }
            }
        }

        self.stats.renamed_insts += 1;
        self.stats.renamed_operands += dests.len() as u64;
        trace!(seq = inst.seq, pc = inst.pc, ?path, "renamed inst");

        Ok(Some(RenamedInst {
            seq: inst.seq,
            srcs,
            dests,
            path,
        }))
    }

    /// Writes a result into `reg` and records one completed write.
    ///
    /// # Errors
    ///
    /// [`RenameError::PhysRegOutOfRange`] if `reg` is not in the register file.
    pub fn write_back(&mut self, reg: PhysRegIndex, value: u64) -> Result<(), RenameError> {
        if !self.pool.regfile.contains(reg) {
            return Err(RenameError::PhysRegOutOfRange { reg });
        }
        self.pool.regfile.write_value(reg, value);
        self.pool.reg_mut(reg).decr_num_pinned_writes_to_complete();
        Ok(())
    }

    /// Opens a branch checkpoint for the branch with sequence number `seq`.
    ///
    /// # Errors
    ///
    /// [`RenameError::CheckpointOutstanding`] if another branch is unresolved.
    pub fn begin_branch(&mut self, seq: u64) -> Result<(), RenameError> {
        self.map.init_brs(&self.pool.regfile)?;
        self.brs_seq = Some(seq);
        self.stats.checkpoints += 1;
        debug!(seq, "branch checkpoint");
        Ok(())
    }

    /// Resolves the outstanding branch. Registers allocated by the losing path
    /// return to the free list and its history entries are dropped.
    ///
    /// Returns the number of history entries released.
    ///
    /// # Errors
    ///
    /// [`RenameError::NoCheckpoint`] if no branch is outstanding.
    pub fn resolve_branch(&mut self, taken: bool) -> Result<usize, RenameError> {
        if self.map.no_brs() {
            return Err(RenameError::NoCheckpoint);
        }
        let losing = if taken {
            RenamePath::NotTaken
        } else {
            RenamePath::Taken
        };

        let mut released = 0;
        let mut kept = VecDeque::with_capacity(self.history.len());
        while let Some(entry) = self.history.pop_back() {
            if entry.path == losing {
                self.release(&entry);
                released += 1;
            } else {
                kept.push_front(RenameHistory {
                    path: RenamePath::Shared,
                    ..entry
                });
            }
        }
        self.history = kept;

        self.map.squash(taken, &self.pool.regfile)?;
        self.brs_seq = None;
        self.stats.undone_maps += released as u64;
        if taken {
            self.stats.taken_resolutions += 1;
        } else {
            self.stats.not_taken_resolutions += 1;
        }
        debug!(taken, released, "branch resolved");
        Ok(released)
    }

    /// Retires history entries of instructions up to and including `seq`.
    ///
    /// Stops at the first entry renamed under an unresolved branch. Each retired
    /// entry frees the register its rename replaced.
    ///
    /// Returns the number of entries retired.
    pub fn commit(&mut self, seq: u64) -> usize {
        let mut committed = 0;
        while let Some(entry) = self.history.front() {
            if entry.seq > seq || entry.path != RenamePath::Shared {
                break;
            }
            let Some(entry) = self.history.pop_front() else {
                break;
            };
            if !entry.info.is_reuse() {
                self.pool.free_reg(entry.info.prev_reg);
            }
            committed += 1;
        }
        self.stats.committed_maps += committed as u64;
        if committed > 0 {
            trace!(seq, committed, "committed renames");
        }
        committed
    }

    /// Rolls back every rename of instructions younger than `seq`, youngest first.
    ///
    /// A squash reaching past the outstanding branch discards its checkpoint
    /// first, as a not-taken resolution.
    ///
    /// Returns the number of entries undone.
    ///
    /// # Errors
    ///
    /// Propagates checkpoint resolution errors.
    pub fn squash_after(&mut self, seq: u64) -> Result<usize, RenameError> {
        let mut undone = 0;
        if self.brs_seq.is_some_and(|brs| seq < brs) {
            undone += self.resolve_branch(false)?;
        }

        let mut rolled_back = 0;
        while let Some(entry) = self.history.back() {
            if entry.seq <= seq {
                break;
            }
            let Some(entry) = self.history.pop_back() else {
                break;
            };
            self.undo(&entry);
            rolled_back += 1;
        }
        self.stats.undone_maps += rolled_back as u64;
        undone += rolled_back;

        debug!(seq, undone, "squashed renames");
        Ok(undone)
    }

    /// Restores the mapping replaced by `entry` and releases its register.
    fn undo(&mut self, entry: &RenameHistory) {
        self.map
            .set_entry(entry.arch, entry.info.prev_reg, entry.path.is_taken());
        if entry.path == RenamePath::Shared && !self.map.no_brs() {
            self.map.set_entry(entry.arch, entry.info.prev_reg, true);
        }
        self.release(entry);
    }

    /// Gives back what `entry`'s rename consumed: the new register, or the
    /// pinned write it used.
    fn release(&mut self, entry: &RenameHistory) {
        if entry.arch.is(RegClass::Invalid) {
            return;
        }
        if entry.info.is_reuse() {
            let reg = self.pool.reg_mut(entry.info.new_reg);
            let pins = reg.num_pinned_writes();
            reg.set_num_pinned_writes(pins + 1);
        } else {
            self.pool.free_reg(entry.info.new_reg);
        }
    }

    /// Mapping dump of `class` from the authoritative map.
    pub fn dump(&self, class: RegClass) -> Vec<MapEntry> {
        self.map.primary().snapshot(class, &self.pool.regfile)
    }

    /// Mapping dump of `class` from the checkpoint map, if a branch is outstanding.
    pub fn dump_brs(&self, class: RegClass) -> Option<Vec<MapEntry>> {
        self.map
            .speculative()
            .map(|brs| brs.snapshot(class, &self.pool.regfile))
    }
}
