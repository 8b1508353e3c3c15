//! Free lists of unassigned physical registers.
//!
//! `SimpleFreeList` is a FIFO of handles for one register class; `UnifiedFreeList`
//! holds one per class. Registers are handed out oldest-returned first so a freed
//! register is not immediately reused, which keeps traces easier to follow.

use std::collections::VecDeque;

use crate::common::reg::{PhysRegIndex, RegClass};
use crate::core::regfile::PhysRegFile;

/// Free physical registers of a single class.
#[derive(Debug, Clone, Default)]
pub struct SimpleFreeList {
    free_regs: VecDeque<PhysRegIndex>,
}

impl SimpleFreeList {
    /// Creates an empty free list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a register to the list.
    pub fn add_reg(&mut self, reg: PhysRegIndex) {
        self.free_regs.push_back(reg);
    }

    /// Removes and returns the next free register, or `None` if empty.
    pub fn get_reg(&mut self) -> Option<PhysRegIndex> {
        self.free_regs.pop_front()
    }

    /// Number of free registers.
    #[inline]
    pub fn num_free_entries(&self) -> usize {
        self.free_regs.len()
    }

    /// Returns true if at least one register is free.
    #[inline]
    pub fn has_free_entries(&self) -> bool {
        !self.free_regs.is_empty()
    }

    /// Returns true if `reg` is currently on the list.
    pub fn contains(&self, reg: PhysRegIndex) -> bool {
        self.free_regs.contains(&reg)
    }
}

/// Free lists for every register class.
#[derive(Debug, Clone, Default)]
pub struct UnifiedFreeList {
    free_lists: [SimpleFreeList; RegClass::COUNT],
}

impl UnifiedFreeList {
    /// Builds free lists holding every renameable register of `regfile`.
    ///
    /// The invalid register never enters a free list.
    pub fn new(regfile: &PhysRegFile) -> Self {
        let mut list = Self::default();
        for class in RegClass::RENAMEABLE {
            for reg in regfile.class_regs(class) {
                list.free_lists[class.index()].add_reg(reg);
            }
        }
        list
    }

    /// Free list of `class`.
    #[inline]
    pub fn list(&self, class: RegClass) -> &SimpleFreeList {
        &self.free_lists[class.index()]
    }

    /// Mutable free list of `class`.
    #[inline]
    pub fn list_mut(&mut self, class: RegClass) -> &mut SimpleFreeList {
        &mut self.free_lists[class.index()]
    }

    /// Removes and returns a free register of `class`.
    pub fn get_reg(&mut self, class: RegClass) -> Option<PhysRegIndex> {
        self.list_mut(class).get_reg()
    }

    /// Returns `reg` to the free list of `class`. Invalid registers are dropped.
    pub fn add_reg(&mut self, class: RegClass, reg: PhysRegIndex) {
        if class != RegClass::Invalid {
            self.list_mut(class).add_reg(reg);
        }
    }

    /// Number of free registers of `class`.
    #[inline]
    pub fn num_free_entries(&self, class: RegClass) -> usize {
        self.list(class).num_free_entries()
    }
}
