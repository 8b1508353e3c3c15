//! Unified rename map: one per-class map for every register class.
//!
//! Operations on an architectural register are routed to the map of its class.
//! Cloning a `UnifiedRenameMap` copies only the handle tables, which is what a
//! branch checkpoint needs.

use tracing::debug;

use crate::common::error::RenameError;
use crate::common::reg::{ArchRegId, PhysRegIndex, RegClass, RenameInfo};
use crate::config::RegFileConfig;
use crate::core::inst::DynInst;
use crate::core::pool::PhysRegPool;
use crate::core::regfile::PhysRegFile;
use crate::core::rename::simple::{MapEntry, SimpleRenameMap};

/// Rename maps for every register class of one architectural register file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnifiedRenameMap {
    rename_maps: [SimpleRenameMap; RegClass::COUNT],
}

impl UnifiedRenameMap {
    /// Creates a map with every class uninitialized.
    pub fn new() -> Self {
        Self::default()
    }

    /// Initializes every per-class map from `regs`, drawing initial mappings from `pool`.
    ///
    /// # Errors
    ///
    /// Propagates the first per-class init error.
    pub fn init(&mut self, regs: &RegFileConfig, pool: &mut PhysRegPool) -> Result<(), RenameError> {
        for class in RegClass::ALL {
            self.rename_maps[class.index()].init(class, regs.num_arch_regs(class), pool)?;
        }
        Ok(())
    }

    /// Per-class map of `class`.
    #[inline]
    pub fn class_map(&self, class: RegClass) -> &SimpleRenameMap {
        &self.rename_maps[class.index()]
    }

    /// Returns true if `inst`'s destinations fit in the free lists.
    ///
    /// The invalid class never allocates and is not checked.
    pub fn can_rename<I: DynInst + ?Sized>(&self, inst: &I, pool: &PhysRegPool) -> bool {
        RegClass::RENAMEABLE.iter().all(|&class| {
            inst.num_dest_regs(class) <= self.rename_maps[class.index()].num_free_entries(pool)
        })
    }

    /// Renames `arch_reg` in the map of its class.
    ///
    /// # Errors
    ///
    /// See [`SimpleRenameMap::rename`].
    pub fn rename(
        &mut self,
        arch_reg: ArchRegId,
        pool: &mut PhysRegPool,
    ) -> Result<RenameInfo, RenameError> {
        self.rename_maps[arch_reg.class.index()].rename(arch_reg, pool)
    }

    /// Returns true if `arch_reg` names a register of its class's map.
    #[inline]
    pub fn contains(&self, arch_reg: ArchRegId) -> bool {
        self.rename_maps[arch_reg.class.index()].contains(arch_reg)
    }

    /// Physical register currently mapped to `arch_reg`.
    #[inline]
    pub fn lookup(&self, arch_reg: ArchRegId) -> PhysRegIndex {
        self.rename_maps[arch_reg.class.index()].lookup(arch_reg)
    }

    /// Overwrites the mapping of `arch_reg`.
    #[inline]
    pub fn set_entry(&mut self, arch_reg: ArchRegId, phys_reg: PhysRegIndex) {
        self.rename_maps[arch_reg.class.index()].set_entry(arch_reg, phys_reg);
    }

    /// Free registers of `class`.
    #[inline]
    pub fn num_free_entries_in(&self, class: RegClass, pool: &PhysRegPool) -> usize {
        self.rename_maps[class.index()].num_free_entries(pool)
    }

    /// Smallest free count across the renameable classes, so that many
    /// registers are available whichever class is requested.
    pub fn num_free_entries(&self, pool: &PhysRegPool) -> usize {
        RegClass::RENAMEABLE
            .iter()
            .map(|&class| self.num_free_entries_in(class, pool))
            .min()
            .unwrap_or(0)
    }

    /// Mapping dump of `class`.
    pub fn snapshot(&self, class: RegClass, regfile: &PhysRegFile) -> Vec<MapEntry> {
        self.rename_maps[class.index()].snapshot(regfile)
    }

    /// Logs every renameable class's mapping at debug level.
    pub fn print_map(&self, regfile: &PhysRegFile) {
        for class in RegClass::RENAMEABLE {
            debug!("{} Regs:", class);
            self.rename_maps[class.index()].print_map(regfile);
        }
    }
}
