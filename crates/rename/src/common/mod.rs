//! Common types shared by every part of the rename core.
//!
//! This module provides the building blocks used by the register pool, the rename maps,
//! and the rename stage. It includes:
//! 1. **Register Classes:** The closed set of register files that are renamed independently.
//! 2. **Register Ids:** Architectural register names and physical register handles.
//! 3. **Error Handling:** Contract violation and configuration error types.

/// Error types for rename contract violations and configuration.
pub mod error;

/// Register class and register id definitions.
pub mod reg;

pub use error::{ConfigError, RenameError};
pub use reg::{ArchRegId, PhysRegId, PhysRegIndex, RegClass, RenameInfo};
