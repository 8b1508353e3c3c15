//! Physical register file arena.
//!
//! Owns every [`PhysRegId`] and the value stored in it. Classes occupy contiguous
//! flat index ranges in `RegClass::ALL` order; the last slot is the single
//! `Invalid` register. Rename maps hold [`PhysRegIndex`] handles into this arena.

use std::ops::Range;

use crate::common::reg::{PhysRegId, PhysRegIndex, RegClass};
use crate::config::RegFileConfig;

/// Physical register storage and bookkeeping.
#[derive(Debug, Clone)]
pub struct PhysRegFile {
    regs: Vec<PhysRegId>,
    values: Vec<u64>,
    ranges: [Range<usize>; RegClass::COUNT],
}

impl PhysRegFile {
    /// Builds a register file sized by `config`, all values zero.
    pub fn new(config: &RegFileConfig) -> Self {
        let total = config.total_phys_regs();
        let mut regs = Vec::with_capacity(total);
        let mut ranges: [Range<usize>; RegClass::COUNT] = Default::default();

        for class in RegClass::ALL {
            let start = regs.len();
            for index in 0..config.num_phys_regs(class) {
                let flat = PhysRegIndex(regs.len() as u32);
                regs.push(PhysRegId::new(class, index, flat));
            }
            ranges[class.index()] = start..regs.len();
        }

        Self {
            values: vec![0; regs.len()],
            regs,
            ranges,
        }
    }

    /// Total number of physical registers.
    #[inline]
    pub fn len(&self) -> usize {
        self.regs.len()
    }

    /// Returns true if the file holds no registers.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.regs.is_empty()
    }

    /// Flat index range occupied by `class`.
    pub fn class_range(&self, class: RegClass) -> Range<usize> {
        self.ranges[class.index()].clone()
    }

    /// Handles of every register of `class`, in index order.
    pub fn class_regs(&self, class: RegClass) -> impl Iterator<Item = PhysRegIndex> + use<> {
        self.class_range(class).map(|i| PhysRegIndex(i as u32))
    }

    /// Handle of the single `Invalid` class register.
    pub fn invalid_reg(&self) -> PhysRegIndex {
        PhysRegIndex(self.ranges[RegClass::Invalid.index()].start as u32)
    }

    /// Returns true if `idx` is a register of this file.
    #[inline]
    pub fn contains(&self, idx: PhysRegIndex) -> bool {
        idx.flat() < self.regs.len()
    }

    /// Bookkeeping of register `idx`.
    #[inline]
    pub fn get(&self, idx: PhysRegIndex) -> &PhysRegId {
        &self.regs[idx.flat()]
    }

    /// Mutable bookkeeping of register `idx`.
    #[inline]
    pub fn get_mut(&mut self, idx: PhysRegIndex) -> &mut PhysRegId {
        &mut self.regs[idx.flat()]
    }

    /// Reads the value stored in register `idx`.
    #[inline]
    pub fn read_value(&self, idx: PhysRegIndex) -> u64 {
        self.values[idx.flat()]
    }

    /// Writes `val` into register `idx`. Writes to the invalid register are ignored.
    pub fn write_value(&mut self, idx: PhysRegIndex, val: u64) {
        if idx != self.invalid_reg() {
            self.values[idx.flat()] = val;
        }
    }
}
