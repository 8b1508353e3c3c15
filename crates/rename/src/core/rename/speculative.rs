//! Speculative rename map with a single branch checkpoint (BrS).
//!
//! While a branch is unresolved the map holds two unified maps: the primary map,
//! which keeps renaming the not-taken stream, and a checkpoint copy, which renames
//! the predicted-taken stream. Resolving the branch either promotes the copy
//! (taken) or drops it (not taken).
//!
//! ```text
//!              init_brs()
//!   Unchecked ───────────► Checking
//!       ▲                     │
//!       └─────────────────────┘
//!            squash(taken)
//! ```
//!
//! Free-entry counts always come from the primary map, even while checking.
//! Both maps draw from one shared pool, so the count is the pool's count; no
//! per-stream reservation is made, and admission on one stream can consume
//! registers the other stream was counted as having.

use tracing::{debug, trace};

use crate::common::error::RenameError;
use crate::common::reg::{ArchRegId, PhysRegIndex, RegClass, RenameInfo};
use crate::config::RegFileConfig;
use crate::core::inst::DynInst;
use crate::core::pool::PhysRegPool;
use crate::core::regfile::PhysRegFile;
use crate::core::rename::unified::UnifiedRenameMap;

/// Which unified map an operation is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapSelect {
    /// The authoritative map (not-taken stream while checking).
    Primary,
    /// The checkpoint copy (predicted-taken stream).
    Checkpoint,
}

impl MapSelect {
    /// Trace label of the selected map.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Primary => "map",
            Self::Checkpoint => "map_brs",
        }
    }
}

/// Rename map that can fork at one unresolved branch.
#[derive(Debug, Clone)]
pub struct SpeculativeRenameMap {
    map: Box<UnifiedRenameMap>,
    map_brs: Option<Box<UnifiedRenameMap>>,
}

impl SpeculativeRenameMap {
    /// Wraps `map` as the primary map, with no checkpoint outstanding.
    pub fn new(map: UnifiedRenameMap) -> Self {
        Self {
            map: Box::new(map),
            map_brs: None,
        }
    }

    /// Initializes the primary map.
    ///
    /// # Errors
    ///
    /// See [`UnifiedRenameMap::init`].
    pub fn init(&mut self, regs: &RegFileConfig, pool: &mut PhysRegPool) -> Result<(), RenameError> {
        self.map.init(regs, pool)
    }

    /// Returns true if no branch checkpoint is outstanding.
    #[inline]
    pub const fn no_brs(&self) -> bool {
        self.map_brs.is_none()
    }

    /// Routing decision for an operation on the `taken` stream.
    #[inline]
    pub const fn select(&self, taken: bool) -> MapSelect {
        if self.map_brs.is_some() && taken {
            MapSelect::Checkpoint
        } else {
            MapSelect::Primary
        }
    }

    fn routed(&self, taken: bool) -> &UnifiedRenameMap {
        match (self.select(taken), &self.map_brs) {
            (MapSelect::Checkpoint, Some(brs)) => &**brs,
            _ => &*self.map,
        }
    }

    fn routed_mut(&mut self, taken: bool) -> &mut UnifiedRenameMap {
        match (self.select(taken), &mut self.map_brs) {
            (MapSelect::Checkpoint, Some(brs)) => &mut **brs,
            _ => &mut *self.map,
        }
    }

    /// The authoritative map.
    #[inline]
    pub fn primary(&self) -> &UnifiedRenameMap {
        &self.map
    }

    /// The checkpoint copy, if a branch is outstanding.
    #[inline]
    pub fn speculative(&self) -> Option<&UnifiedRenameMap> {
        self.map_brs.as_deref()
    }

    /// Admission check for `inst`, routed by `inst.is_predication_ready()`.
    pub fn can_rename<I: DynInst + ?Sized>(&self, inst: &I, pool: &PhysRegPool) -> bool {
        self.routed(inst.is_predication_ready()).can_rename(inst, pool)
    }

    /// Renames `arch_reg` on the `taken` stream.
    ///
    /// # Errors
    ///
    /// See [`crate::core::rename::SimpleRenameMap::rename`].
    pub fn rename(
        &mut self,
        arch_reg: ArchRegId,
        taken: bool,
        pool: &mut PhysRegPool,
    ) -> Result<RenameInfo, RenameError> {
        let path = self.select(taken);
        if !self.no_brs() {
            trace!(path = path.label(), arch = %arch_reg, "rename");
        }
        self.routed_mut(taken).rename(arch_reg, pool)
    }

    /// Physical register mapped to `arch_reg` on the `taken` stream.
    pub fn lookup(&self, arch_reg: ArchRegId, taken: bool) -> PhysRegIndex {
        if !self.no_brs() {
            trace!(path = self.select(taken).label(), arch = %arch_reg, "lookup");
        }
        self.routed(taken).lookup(arch_reg)
    }

    /// Overwrites the mapping of `arch_reg` on the `taken` stream.
    pub fn set_entry(&mut self, arch_reg: ArchRegId, phys_reg: PhysRegIndex, taken: bool) {
        if !self.no_brs() {
            trace!(
                path = self.select(taken).label(),
                arch = %arch_reg,
                phys = %phys_reg,
                "squashing entry"
            );
        }
        self.routed_mut(taken).set_entry(arch_reg, phys_reg);
    }

    /// Smallest free count across classes, as seen by the primary map.
    pub fn num_free_entries(&self, pool: &PhysRegPool) -> usize {
        self.map.num_free_entries(pool)
    }

    /// Free registers of `class`, as seen by the primary map.
    pub fn num_free_entries_in(&self, class: RegClass, pool: &PhysRegPool) -> usize {
        self.map.num_free_entries_in(class, pool)
    }

    /// Opens a branch checkpoint by copying the primary map.
    ///
    /// # Errors
    ///
    /// [`RenameError::CheckpointOutstanding`] if a checkpoint is already open;
    /// the existing checkpoint is kept.
    pub fn init_brs(&mut self, regfile: &PhysRegFile) -> Result<(), RenameError> {
        if !self.no_brs() {
            return Err(RenameError::CheckpointOutstanding);
        }
        self.map_brs = Some(self.map.clone());
        debug!("branch checkpoint opened");
        self.print_map(regfile);
        self.print_map_brs(regfile)?;
        Ok(())
    }

    /// Resolves the outstanding checkpoint.
    ///
    /// If `taken`, the checkpoint copy replaces the primary map; otherwise the
    /// copy is dropped. Either way the superseded map is released.
    ///
    /// # Errors
    ///
    /// [`RenameError::NoCheckpoint`] if no checkpoint is outstanding.
    pub fn squash(&mut self, taken: bool, regfile: &PhysRegFile) -> Result<(), RenameError> {
        let Some(mut map_brs) = self.map_brs.take() else {
            return Err(RenameError::NoCheckpoint);
        };
        self.print_map(regfile);
        map_brs.print_map(regfile);
        if taken {
            debug!("branch taken, swapping rename maps");
            std::mem::swap(&mut self.map, &mut map_brs);
        } else {
            debug!("branch not taken, dropping checkpoint");
        }
        drop(map_brs);
        self.print_map(regfile);
        Ok(())
    }

    /// Logs the primary map at debug level.
    pub fn print_map(&self, regfile: &PhysRegFile) {
        debug!("Regular Rename Map:");
        self.map.print_map(regfile);
    }

    /// Logs the checkpoint map at debug level.
    ///
    /// # Errors
    ///
    /// [`RenameError::NoCheckpoint`] if no checkpoint is outstanding.
    pub fn print_map_brs(&self, regfile: &PhysRegFile) -> Result<(), RenameError> {
        let brs = self.map_brs.as_ref().ok_or(RenameError::NoCheckpoint)?;
        debug!("BrS Rename Map:");
        brs.print_map(regfile);
        Ok(())
    }
}
