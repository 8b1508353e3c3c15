//! Physical register pool shared by all rename maps.
//!
//! Bundles the register file arena with its free lists. The primary and the
//! speculative rename map both allocate from, and adjust counters in, the same pool.

use crate::common::reg::{PhysRegId, PhysRegIndex, RegClass};
use crate::config::RegFileConfig;
use crate::core::free_list::UnifiedFreeList;
use crate::core::regfile::PhysRegFile;

/// Register file plus free lists.
#[derive(Debug, Clone)]
pub struct PhysRegPool {
    /// Physical register arena.
    pub regfile: PhysRegFile,
    /// Free registers per class.
    pub free_list: UnifiedFreeList,
}

impl PhysRegPool {
    /// Creates a pool with every renameable register free.
    pub fn new(config: &RegFileConfig) -> Self {
        let regfile = PhysRegFile::new(config);
        let free_list = UnifiedFreeList::new(&regfile);
        Self { regfile, free_list }
    }

    /// Removes a free register of `class`, resetting its bookkeeping.
    pub fn get_reg(&mut self, class: RegClass) -> Option<PhysRegIndex> {
        let reg = self.free_list.get_reg(class)?;
        self.regfile.get_mut(reg).reset();
        Some(reg)
    }

    /// Returns `reg` to the free list of its class.
    pub fn free_reg(&mut self, reg: PhysRegIndex) {
        let class = self.regfile.get(reg).class();
        self.free_list.add_reg(class, reg);
    }

    /// Number of free registers of `class`.
    #[inline]
    pub fn num_free_entries(&self, class: RegClass) -> usize {
        self.free_list.num_free_entries(class)
    }

    /// Bookkeeping of register `reg`.
    #[inline]
    pub fn reg(&self, reg: PhysRegIndex) -> &PhysRegId {
        self.regfile.get(reg)
    }

    /// Mutable bookkeeping of register `reg`.
    #[inline]
    pub fn reg_mut(&mut self, reg: PhysRegIndex) -> &mut PhysRegId {
        self.regfile.get_mut(reg)
    }
}
