//! Register renaming for an out-of-order core model.
//!
//! This crate implements the rename maps of a cycle-level out-of-order core with the following:
//! 1. **Registers:** Architectural and physical register ids, register classes, and pinned writes.
//! 2. **Pool:** Physical register arena and per-class free lists shared by every rename map.
//! 3. **Maps:** Per-class, unified, and speculative (branch checkpoint) rename maps.
//! 4. **Stage:** A rename stage driver with a history buffer for commit and rollback.
//! 5. **Simulation:** Configuration and statistics collection.

/// Common types (register classes, register ids, errors).
pub mod common;
/// Rename configuration (defaults, register file sizes, JSON loading).
pub mod config;
/// Rename core (register file, free list, rename maps, rename stage).
pub mod core;
/// Rename statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or load it from JSON.
pub use crate::config::Config;
/// Pipeline-facing rename stage; owns the register pool and the rename maps.
pub use crate::core::RenameStage;
