//! Rename and configuration error definitions.
//!
//! Renaming has no recoverable runtime errors. Every `RenameError` is a broken caller
//! contract (double initialization, double pinning, nested checkpoints, allocating past
//! an empty free list, ...). The operation that reports one leaves its state untouched,
//! and the simulation driver is expected to end the run.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::reg::{ArchRegId, PhysRegIndex, RegClass};

/// Caller contract violation reported by the rename maps.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenameError {
    /// A rename map was initialized twice.
    #[error("rename map for class {class} is already initialized")]
    AlreadyInitialized {
        /// Class of the map.
        class: RegClass,
    },

    /// A write requested pinning while the register was still pinned.
    #[error("{arch} requests pinned writes while its register is already pinned")]
    DoublePin {
        /// Architectural register being renamed.
        arch: ArchRegId,
    },

    /// An `Invalid` class register was mapped to a real physical register.
    #[error("invalid register is mapped to non-invalid physical register {phys}")]
    InvalidClassMismatch {
        /// Physical register found in the invalid map.
        phys: PhysRegIndex,
    },

    /// A branch checkpoint was requested while one is outstanding.
    #[error("a branch checkpoint is already outstanding")]
    CheckpointOutstanding,

    /// A checkpoint operation was requested with no checkpoint outstanding.
    #[error("no branch checkpoint is outstanding")]
    NoCheckpoint,

    /// An architectural register index lies outside its class's map.
    #[error("{arch} is outside the architectural register file")]
    ArchIndexOutOfRange {
        /// Offending architectural register.
        arch: ArchRegId,
    },

    /// A physical register handle lies outside the register file.
    #[error("physical register {reg} is outside the register file")]
    PhysRegOutOfRange {
        /// Offending handle.
        reg: PhysRegIndex,
    },

    /// A pinned-write request is too large to count its completions.
    #[error("{arch} requests more pinned writes than can be tracked")]
    PinCountOverflow {
        /// Architectural register being renamed.
        arch: ArchRegId,
    },

    /// The free list had no register for an allocating rename.
    #[error("free list for class {class} is exhausted")]
    FreeListExhausted {
        /// Class whose free list is empty.
        class: RegClass,
    },
}

/// Configuration loading or validation failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The configuration was not valid JSON for [`crate::config::Config`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A class has fewer physical than architectural registers.
    #[error("class {class} needs at least {arch} physical registers, got {phys}")]
    TooFewPhysRegs {
        /// Register class.
        class: RegClass,
        /// Architectural register count.
        arch: usize,
        /// Configured physical register count.
        phys: usize,
    },

    /// A class has no architectural registers.
    #[error("class {class} must have at least one architectural register")]
    NoArchRegs {
        /// Register class.
        class: RegClass,
    },
}
