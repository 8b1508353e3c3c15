//! Rename maps.
//!
//! Three layers, leaf first:
//! 1. **Per-class:** `SimpleRenameMap` maps one register class and talks to its free list.
//! 2. **Unified:** `UnifiedRenameMap` routes each register to the map of its class.
//! 3. **Speculative:** `SpeculativeRenameMap` adds one branch checkpoint on top of a unified map.

/// Per-class rename map.
pub mod simple;

/// Speculative rename map with a branch checkpoint.
pub mod speculative;

/// Unified rename map across register classes.
pub mod unified;

pub use simple::{MapEntry, SimpleRenameMap};
pub use speculative::{MapSelect, SpeculativeRenameMap};
pub use unified::UnifiedRenameMap;
