//! Per-class rename map.
//!
//! Maps each architectural register of one class to the physical register holding
//! its latest value. A rename either reuses the current register (invalid class,
//! or a pinned write) or draws a fresh one from the class free list.

use serde::Serialize;
use tracing::{debug, trace};

use crate::common::error::RenameError;
use crate::common::reg::{ArchRegId, PhysRegIndex, RegClass, RenameInfo};
use crate::core::pool::PhysRegPool;
use crate::core::regfile::PhysRegFile;

/// One line of a rename map dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MapEntry {
    /// Architectural register index.
    pub arch: usize,
    /// Mapped physical register.
    pub phys: PhysRegIndex,
    /// Value currently stored in the physical register.
    pub value: u64,
}

/// Rename table for a single register class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimpleRenameMap {
    class: Option<RegClass>,
    map: Vec<PhysRegIndex>,
}

impl SimpleRenameMap {
    /// Creates an uninitialized map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the map to `class` and installs an initial mapping for all
    /// `num_regs` architectural registers.
    ///
    /// Renameable classes take their initial registers from the pool's free list.
    /// Every `Invalid` slot maps to the invalid physical register.
    ///
    /// # Errors
    ///
    /// [`RenameError::AlreadyInitialized`] if the map was initialized before,
    /// [`RenameError::FreeListExhausted`] if the pool cannot back the architectural
    /// file. On error the map is left uninitialized.
    pub fn init(
        &mut self,
        class: RegClass,
        num_regs: usize,
        pool: &mut PhysRegPool,
    ) -> Result<(), RenameError> {
        if let Some(bound) = self.class {
            return Err(RenameError::AlreadyInitialized { class: bound });
        }
        if !self.map.is_empty() {
            return Err(RenameError::AlreadyInitialized { class });
        }

        let map = if class == RegClass::Invalid {
            vec![pool.regfile.invalid_reg(); num_regs]
        } else {
            if pool.num_free_entries(class) < num_regs {
                return Err(RenameError::FreeListExhausted { class });
            }
            let mut map = Vec::with_capacity(num_regs);
            for _ in 0..num_regs {
                let reg = pool
                    .get_reg(class)
                    .ok_or(RenameError::FreeListExhausted { class })?;
                map.push(reg);
            }
            map
        };

        debug!(class = %class, num_regs, "rename map initialized");
        self.class = Some(class);
        self.map = map;
        Ok(())
    }

    /// Class this map was initialized for.
    #[inline]
    pub const fn reg_class(&self) -> Option<RegClass> {
        self.class
    }

    /// Number of architectural registers in this map.
    #[inline]
    pub fn num_arch_regs(&self) -> usize {
        self.map.len()
    }

    /// Renames `arch_reg`, returning the new and previous physical registers.
    ///
    /// # Errors
    ///
    /// * [`RenameError::InvalidClassMismatch`] - an invalid register maps to a real one.
    /// * [`RenameError::DoublePin`] - `arch_reg` requests pinning while its register is pinned.
    /// * [`RenameError::FreeListExhausted`] - allocation with an empty free list;
    ///   gate with `can_rename` first.
    /// * [`RenameError::ArchIndexOutOfRange`] - `arch_reg.index` is outside the map.
    /// * [`RenameError::PinCountOverflow`] - the writes-to-complete count of a
    ///   fresh register would not fit.
    ///
    /// The map and pool are unchanged when an error is returned.
    pub fn rename(
        &mut self,
        arch_reg: ArchRegId,
        pool: &mut PhysRegPool,
    ) -> Result<RenameInfo, RenameError> {
        let prev_reg = *self
            .map
            .get(arch_reg.index)
            .ok_or(RenameError::ArchIndexOutOfRange { arch: arch_reg })?;

        let renamed_reg = if arch_reg.is(RegClass::Invalid) {
            if !pool.reg(prev_reg).is(RegClass::Invalid) {
                return Err(RenameError::InvalidClassMismatch { phys: prev_reg });
            }
            prev_reg
        } else if pool.reg(prev_reg).num_pinned_writes() > 0 {
            // Pinning the same register twice is not allowed.
            if arch_reg.num_pinned_writes != 0 {
                return Err(RenameError::DoublePin { arch: arch_reg });
            }
            trace!(
                arch = %arch_reg,
                pinned_writes = pool.reg(prev_reg).num_pinned_writes(),
                "renaming pinned reg"
            );
            pool.reg_mut(prev_reg).decr_num_pinned_writes();
            prev_reg
        } else {
            let to_complete = arch_reg
                .num_pinned_writes
                .checked_add(1)
                .ok_or(RenameError::PinCountOverflow { arch: arch_reg })?;
            let reg = pool
                .get_reg(arch_reg.class)
                .ok_or(RenameError::FreeListExhausted {
                    class: arch_reg.class,
                })?;
            self.map[arch_reg.index] = reg;
            let phys = pool.reg_mut(reg);
            phys.set_num_pinned_writes(arch_reg.num_pinned_writes);
            phys.set_num_pinned_writes_to_complete(to_complete);
            reg
        };

        trace!(
            arch = %arch_reg,
            new = %renamed_reg,
            prev = %prev_reg,
            "renamed reg"
        );

        Ok(RenameInfo::new(renamed_reg, prev_reg))
    }

    /// Returns true if `arch_reg.index` names a register of this map.
    #[inline]
    pub fn contains(&self, arch_reg: ArchRegId) -> bool {
        arch_reg.index < self.map.len()
    }

    /// Physical register currently mapped to `arch_reg`.
    ///
    /// # Panics
    ///
    /// Panics if `arch_reg.index` is outside the map.
    #[inline]
    pub fn lookup(&self, arch_reg: ArchRegId) -> PhysRegIndex {
        self.map[arch_reg.index]
    }

    /// Overwrites the mapping of `arch_reg`. Used to roll back to a recorded
    /// previous mapping; never touches the free list.
    ///
    /// # Panics
    ///
    /// Panics if `arch_reg.index` is outside the map.
    #[inline]
    pub fn set_entry(&mut self, arch_reg: ArchRegId, phys_reg: PhysRegIndex) {
        self.map[arch_reg.index] = phys_reg;
    }

    /// Free registers available to this map's class.
    pub fn num_free_entries(&self, pool: &PhysRegPool) -> usize {
        self.class.map_or(0, |class| pool.num_free_entries(class))
    }

    /// Mapping of every architectural register with its stored value.
    pub fn snapshot(&self, regfile: &PhysRegFile) -> Vec<MapEntry> {
        self.map
            .iter()
            .enumerate()
            .map(|(arch, &phys)| MapEntry {
                arch,
                phys,
                value: regfile.read_value(phys),
            })
            .collect()
    }

    /// Logs the mapping of every architectural register at debug level.
    pub fn print_map(&self, regfile: &PhysRegFile) {
        for entry in self.snapshot(regfile) {
            debug!(
                "ArchReg[{}] => PhyReg[{}] = {:#x}",
                entry.arch,
                regfile.get(entry.phys).index(),
                entry.value
            );
        }
    }
}
