//! # Speculative Rename Map Tests
//!
//! Checkpoint isolation, branch resolution, and routing of the taken stream.

use o3rename_core::common::{RegClass, RenameError};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::builder::{cc, small_regs, x};
use crate::common::harness::RenameHarness;
use crate::common::mocks::inst::inst_with_dests;

#[test]
fn checkpoint_starts_as_copy_of_primary() {
    let mut h = RenameHarness::new(&small_regs());
    let _ = h.rename(x(0), false).unwrap();
    h.init_brs().unwrap();
    let primary = h.map.primary().snapshot(RegClass::Integer, &h.pool.regfile);
    let brs = h
        .map
        .speculative()
        .unwrap()
        .snapshot(RegClass::Integer, &h.pool.regfile);
    assert_eq!(primary, brs);
}

#[test]
fn streams_are_isolated_while_checking() {
    let mut h = RenameHarness::new(&small_regs());
    let before = h.map.lookup(x(2), false);
    h.init_brs().unwrap();

    let taken = h.rename(x(2), true).unwrap();
    let not_taken = h.rename(x(2), false).unwrap();

    assert_eq!(taken.prev_reg, before);
    assert_eq!(not_taken.prev_reg, before);
    assert_ne!(taken.new_reg, not_taken.new_reg);
    assert_eq!(h.map.lookup(x(2), true), taken.new_reg);
    assert_eq!(h.map.lookup(x(2), false), not_taken.new_reg);
}

#[rstest]
#[case(true)]
#[case(false)]
fn resolution_keeps_the_winning_stream(#[case] taken: bool) {
    let mut h = RenameHarness::new(&small_regs());
    h.init_brs().unwrap();
    let on_taken = h.rename(x(1), true).unwrap();
    let on_not_taken = h.rename(x(1), false).unwrap();

    h.squash(taken).unwrap();

    assert!(h.map.no_brs());
    let winner = if taken { on_taken } else { on_not_taken };
    assert_eq!(h.map.lookup(x(1), false), winner.new_reg);
    assert_eq!(h.map.lookup(x(1), true), winner.new_reg);
}

#[test]
fn set_entry_routes_to_the_taken_stream() {
    let mut h = RenameHarness::new(&small_regs());
    let orig = h.map.lookup(x(3), false);
    h.init_brs().unwrap();
    let info = h.rename(x(3), true).unwrap();
    h.map.set_entry(x(3), info.prev_reg, true);
    assert_eq!(h.map.lookup(x(3), true), orig);
    assert_eq!(h.map.lookup(x(3), false), orig);
}

#[test]
fn second_checkpoint_is_rejected() {
    let mut h = RenameHarness::new(&small_regs());
    h.init_brs().unwrap();
    let info = h.rename(x(0), true).unwrap();
    assert_eq!(h.init_brs(), Err(RenameError::CheckpointOutstanding));
    assert_eq!(h.map.lookup(x(0), true), info.new_reg);
}

#[test]
fn squash_without_checkpoint_is_rejected() {
    let mut h = RenameHarness::new(&small_regs());
    assert_eq!(h.squash(false), Err(RenameError::NoCheckpoint));
    assert_eq!(
        h.map.print_map_brs(&h.pool.regfile),
        Err(RenameError::NoCheckpoint)
    );
}

#[test]
fn checkpoint_can_reopen_after_resolution() {
    let mut h = RenameHarness::new(&small_regs());
    h.init_brs().unwrap();
    h.squash(true).unwrap();
    assert!(h.init_brs().is_ok());
    assert!(!h.map.no_brs());
}

// Free counts come from the primary map only; the pool is shared, so taken
// stream allocations still show up in the count.
#[test]
fn free_entries_are_reported_from_the_primary_map() {
    let mut h = RenameHarness::new(&small_regs());
    h.init_brs().unwrap();
    let _ = h.rename(cc(0), true).unwrap();
    assert_eq!(
        h.map.num_free_entries_in(RegClass::ConditionCode, &h.pool),
        h.map
            .primary()
            .num_free_entries_in(RegClass::ConditionCode, &h.pool)
    );
    assert_eq!(h.map.num_free_entries(&h.pool), 1);
}

#[test]
fn admission_routes_by_predication() {
    let mut h = RenameHarness::new(&small_regs());
    h.init_brs().unwrap();
    let _ = h.rename(cc(0), false).unwrap();
    let _ = h.rename(cc(1), false).unwrap();

    // Both streams share the exhausted cc pool.
    assert!(!h.map.can_rename(&inst_with_dests([0, 0, 0, 1, 0], true), &h.pool));
    assert!(!h.map.can_rename(&inst_with_dests([0, 0, 0, 1, 0], false), &h.pool));
    assert!(h.map.can_rename(&inst_with_dests([1, 0, 0, 0, 0], true), &h.pool));
}

#[test]
fn pinned_counters_are_shared_across_streams() {
    let mut h = RenameHarness::new(&small_regs());
    let first = h.rename(x(1).with_pinned_writes(1), false).unwrap();
    h.init_brs().unwrap();
    let reuse = h.rename(x(1), true).unwrap();
    assert_eq!(reuse.new_reg, first.new_reg);
    assert_eq!(h.pool.reg(first.new_reg).num_pinned_writes(), 0);
    let alloc = h.rename(x(1), false).unwrap();
    assert_ne!(alloc.new_reg, first.new_reg);
}
