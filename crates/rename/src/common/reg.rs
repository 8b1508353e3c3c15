//! Register classes and register identifiers.
//!
//! This module defines the value types that flow through renaming. It provides:
//! 1. **Register Classes:** `RegClass`, one independently renamed register file per variant.
//! 2. **Architectural Ids:** `ArchRegId`, an ISA-visible register plus its pinned-write request.
//! 3. **Physical Ids:** `PhysRegId`, an arena slot with pinned-write bookkeeping, and
//!    `PhysRegIndex`, the copyable handle rename maps store in place of references.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Register file class.
///
/// Each class is renamed by its own map and draws from its own free list.
/// `Invalid` is used for operands that name no register at all; it never allocates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegClass {
    /// Integer (general purpose) registers.
    #[serde(alias = "int")]
    Integer,
    /// Floating-point registers.
    #[serde(alias = "float")]
    FloatingPoint,
    /// Vector element registers.
    #[serde(alias = "vec_elem")]
    VectorElement,
    /// Condition code registers.
    #[serde(alias = "cc")]
    ConditionCode,
    /// Placeholder class for operands without a register.
    Invalid,
}

impl RegClass {
    /// Number of register classes, including `Invalid`.
    pub const COUNT: usize = 5;

    /// All register classes in dense index order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Integer,
        Self::FloatingPoint,
        Self::VectorElement,
        Self::ConditionCode,
        Self::Invalid,
    ];

    /// Register classes that own physical registers and can allocate.
    pub const RENAMEABLE: [Self; 4] = [
        Self::Integer,
        Self::FloatingPoint,
        Self::VectorElement,
        Self::ConditionCode,
    ];

    /// Dense index of this class, used to select per-class tables.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Self::Integer => 0,
            Self::FloatingPoint => 1,
            Self::VectorElement => 2,
            Self::ConditionCode => 3,
            Self::Invalid => 4,
        }
    }

    /// Short lowercase name used in traces and map dumps.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Integer => "int",
            Self::FloatingPoint => "float",
            Self::VectorElement => "vec_elem",
            Self::ConditionCode => "cc",
            Self::Invalid => "invalid",
        }
    }
}

impl fmt::Display for RegClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Architectural register named by an instruction operand.
///
/// `num_pinned_writes` is the number of writes *after* this one that must land in the
/// same physical register. Instructions decomposed into several micro-writes to one
/// register request pinning on the first write and leave it at zero on the rest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArchRegId {
    /// Register class.
    pub class: RegClass,
    /// Index within the class's architectural register file.
    pub index: usize,
    /// Pinned writes requested by this write.
    #[serde(default)]
    pub num_pinned_writes: u32,
}

impl ArchRegId {
    /// Creates an unpinned architectural register id.
    pub const fn new(class: RegClass, index: usize) -> Self {
        Self {
            class,
            index,
            num_pinned_writes: 0,
        }
    }

    /// Integer register `index`.
    pub const fn int(index: usize) -> Self {
        Self::new(RegClass::Integer, index)
    }

    /// Floating-point register `index`.
    pub const fn float(index: usize) -> Self {
        Self::new(RegClass::FloatingPoint, index)
    }

    /// The single `Invalid` class register.
    pub const fn invalid() -> Self {
        Self::new(RegClass::Invalid, 0)
    }

    /// Returns a copy requesting `n` pinned writes after this one.
    #[must_use]
    pub const fn with_pinned_writes(mut self, n: u32) -> Self {
        self.num_pinned_writes = n;
        self
    }

    /// Returns true if this register belongs to `class`.
    #[inline]
    pub fn is(&self, class: RegClass) -> bool {
        self.class == class
    }
}

impl fmt::Display for ArchRegId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.class, self.index)
    }
}

/// Handle to a physical register: its flat index in the register file arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhysRegIndex(pub u32);

impl PhysRegIndex {
    /// Flat arena index as `usize`.
    #[inline]
    pub const fn flat(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PhysRegIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// Physical register slot with pinned-write bookkeeping.
///
/// Owned by the register file arena. Rename maps refer to it only through
/// [`PhysRegIndex`], so checkpoint copies of a map share these counters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhysRegId {
    class: RegClass,
    index: usize,
    flat_index: PhysRegIndex,
    num_pinned_writes: u32,
    num_pinned_writes_to_complete: u32,
}

impl PhysRegId {
    /// Creates an idle physical register.
    ///
    /// # Arguments
    ///
    /// * `class` - Register class the slot belongs to.
    /// * `index` - Index relative to the first register of the class.
    /// * `flat_index` - Index in the whole register file.
    pub const fn new(class: RegClass, index: usize, flat_index: PhysRegIndex) -> Self {
        Self {
            class,
            index,
            flat_index,
            num_pinned_writes: 0,
            num_pinned_writes_to_complete: 0,
        }
    }

    /// Register class of this slot.
    #[inline]
    pub const fn class(&self) -> RegClass {
        self.class
    }

    /// Returns true if this slot belongs to `class`.
    #[inline]
    pub fn is(&self, class: RegClass) -> bool {
        self.class == class
    }

    /// Index relative to the first register of the class.
    #[inline]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Handle of this slot.
    #[inline]
    pub const fn flat_index(&self) -> PhysRegIndex {
        self.flat_index
    }

    /// Writes that will still reuse this register before a fresh allocation.
    #[inline]
    pub const fn num_pinned_writes(&self) -> u32 {
        self.num_pinned_writes
    }

    /// Sets the pinned writes remaining.
    pub fn set_num_pinned_writes(&mut self, n: u32) {
        self.num_pinned_writes = n;
    }

    /// Consumes one pinned write. Saturates at zero.
    pub fn decr_num_pinned_writes(&mut self) {
        self.num_pinned_writes = self.num_pinned_writes.saturating_sub(1);
    }

    /// Writes still outstanding before the register can complete.
    #[inline]
    pub const fn num_pinned_writes_to_complete(&self) -> u32 {
        self.num_pinned_writes_to_complete
    }

    /// Sets the outstanding write count.
    pub fn set_num_pinned_writes_to_complete(&mut self, n: u32) {
        self.num_pinned_writes_to_complete = n;
    }

    /// Records one completed write. Saturates at zero.
    pub fn decr_num_pinned_writes_to_complete(&mut self) {
        self.num_pinned_writes_to_complete = self.num_pinned_writes_to_complete.saturating_sub(1);
    }

    /// Returns true if later writes are pinned to this register.
    #[inline]
    pub const fn is_pinned(&self) -> bool {
        self.num_pinned_writes > 0
    }

    /// Clears all write bookkeeping, as when the register returns to the free list.
    pub fn reset(&mut self) {
        self.num_pinned_writes = 0;
        self.num_pinned_writes_to_complete = 0;
    }
}

/// Result of renaming one destination register.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct RenameInfo {
    /// Physical register the write now targets.
    pub new_reg: PhysRegIndex,
    /// Physical register previously mapped to the architectural register.
    pub prev_reg: PhysRegIndex,
}

impl RenameInfo {
    /// Creates a rename result.
    pub const fn new(new_reg: PhysRegIndex, prev_reg: PhysRegIndex) -> Self {
        Self { new_reg, prev_reg }
    }

    /// Returns true if the rename reused the previous register (pinned or invalid).
    #[inline]
    pub fn is_reuse(&self) -> bool {
        self.new_reg == self.prev_reg
    }
}
