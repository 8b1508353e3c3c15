//! Rename core.
//!
//! This module contains everything between decode and issue that deals with register
//! names. It provides:
//! 1. **Register Pool:** The physical register file arena and its free lists.
//! 2. **Instructions:** The instruction interface renaming consumes.
//! 3. **Rename Maps:** Per-class, unified, and speculative rename maps.
//! 4. **Rename Stage:** The history buffer that commits and rolls back mappings.

/// Free lists of unassigned physical registers.
pub mod free_list;

/// Instruction interface consumed by renaming.
pub mod inst;

/// Register file plus free lists shared by all rename maps.
pub mod pool;

/// Physical register file arena.
pub mod regfile;

/// Rename maps (per-class, unified, speculative).
pub mod rename;

/// Rename stage driver with history buffer.
pub mod stage;

pub use free_list::{SimpleFreeList, UnifiedFreeList};
pub use inst::{DecodedInst, DynInst};
pub use pool::PhysRegPool;
pub use regfile::PhysRegFile;
pub use rename::{MapEntry, SimpleRenameMap, SpeculativeRenameMap, UnifiedRenameMap};
pub use stage::{RenamePath, RenameStage, RenamedInst};
