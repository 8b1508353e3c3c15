//! # Rename Stage Tests
//!
//! History buffer recovery: commit, squash, and branch resolution.

use o3rename_core::common::{PhysRegIndex, RegClass, RenameError};
use o3rename_core::config::Config;
use o3rename_core::core::{DecodedInst, RenamePath, RenameStage};
use pretty_assertions::assert_eq;

use crate::common::builder::{cc, op, small_regs, x};
use crate::common::harness::init_tracing;

fn stage() -> RenameStage {
    init_tracing();
    let config = Config {
        regs: small_regs(),
        ..Config::default()
    };
    RenameStage::new(&config).unwrap()
}

fn int_free(st: &RenameStage) -> usize {
    st.pool().num_free_entries(RegClass::Integer)
}

#[test]
fn renamed_inst_reports_sources_and_destinations() {
    let mut st = stage();
    let src = st.map().lookup(x(1), false);
    let out = st.rename_inst(&op(1, x(2), &[x(1)])).unwrap().unwrap();
    assert_eq!(out.seq, 1);
    assert_eq!(out.srcs, vec![src]);
    assert_eq!(out.dests.len(), 1);
    assert_eq!(out.path, RenamePath::Shared);
    assert_eq!(st.history_len(), 1);
    assert_eq!(st.stats().renamed_insts, 1);
    assert_eq!(st.stats().lookups, 1);
}

#[test]
fn dependent_instruction_reads_new_register() {
    let mut st = stage();
    let producer = st.rename_inst(&op(1, x(2), &[])).unwrap().unwrap();
    let consumer = st.rename_inst(&op(2, x(3), &[x(2)])).unwrap().unwrap();
    assert_eq!(consumer.srcs, vec![producer.dests[0].new_reg]);
}

#[test]
fn short_free_list_stalls_without_side_effects() {
    let mut st = stage();
    let inst = DecodedInst::new(1).dest(cc(0)).dest(cc(1)).dest(cc(0));
    assert_eq!(st.rename_inst(&inst).unwrap(), None);
    assert_eq!(st.stats().full_stalls, 1);
    assert_eq!(st.stats().renamed_insts, 0);
    assert_eq!(st.history_len(), 0);
    assert_eq!(st.pool().num_free_entries(RegClass::ConditionCode), 2);
}

#[test]
fn commit_is_in_order_and_bounded_by_seq() {
    let mut st = stage();
    let free = int_free(&st);
    for seq in 1..=3 {
        let _ = st.rename_inst(&op(seq, x(0), &[])).unwrap();
    }
    assert_eq!(int_free(&st), free - 3);
    assert_eq!(st.commit(2), 2);
    assert_eq!(int_free(&st), free - 1);
    assert_eq!(st.history_len(), 1);
    assert_eq!(st.commit(2), 0);
    assert_eq!(st.stats().committed_maps, 2);
}

#[test]
fn squash_rolls_back_youngest_first() {
    let mut st = stage();
    let orig = st.map().lookup(x(1), false);
    let free = int_free(&st);
    let first = st.rename_inst(&op(1, x(1), &[])).unwrap().unwrap();
    let _ = st.rename_inst(&op(2, x(1), &[])).unwrap();
    let _ = st.rename_inst(&op(3, x(1), &[])).unwrap();

    assert_eq!(st.squash_after(1).unwrap(), 2);
    assert_eq!(st.map().lookup(x(1), false), first.dests[0].new_reg);
    assert_eq!(int_free(&st), free - 1);

    assert_eq!(st.squash_after(0).unwrap(), 1);
    assert_eq!(st.map().lookup(x(1), false), orig);
    assert_eq!(int_free(&st), free);
    assert_eq!(st.stats().undone_maps, 3);
}

#[test]
fn write_back_completes_pinned_writes() {
    let mut st = stage();
    let out = st
        .rename_inst(&DecodedInst::new(1).dest(x(2).with_pinned_writes(1)))
        .unwrap()
        .unwrap();
    let reg = out.dests[0].new_reg;
    assert_eq!(st.pool().reg(reg).num_pinned_writes_to_complete(), 2);
    st.write_back(reg, 0x42).unwrap();
    assert_eq!(st.pool().reg(reg).num_pinned_writes_to_complete(), 1);
    assert_eq!(st.pool().regfile.read_value(reg), 0x42);
    assert_eq!(st.dump(RegClass::Integer)[2].value, 0x42);
}

#[test]
fn pinned_reuse_is_counted() {
    let mut st = stage();
    let _ = st
        .rename_inst(&DecodedInst::new(1).dest(x(0).with_pinned_writes(2)))
        .unwrap();
    let _ = st.rename_inst(&op(2, x(0), &[])).unwrap();
    let _ = st.rename_inst(&op(3, x(0), &[])).unwrap();
    assert_eq!(st.stats().pinned_reuses, 2);
}

#[test]
fn taken_resolution_releases_not_taken_path() {
    let mut st = stage();
    let free = int_free(&st);
    st.begin_branch(10).unwrap();
    assert_eq!(st.checkpoint_seq(), Some(10));

    let taken = st
        .rename_inst(&op(11, x(1), &[]).on_taken_path())
        .unwrap()
        .unwrap();
    let not_taken = st.rename_inst(&op(12, x(1), &[])).unwrap().unwrap();
    assert_eq!(taken.path, RenamePath::Taken);
    assert_eq!(not_taken.path, RenamePath::NotTaken);
    assert_eq!(int_free(&st), free - 2);

    assert_eq!(st.resolve_branch(true).unwrap(), 1);
    assert_eq!(st.checkpoint_seq(), None);
    assert_eq!(int_free(&st), free - 1);
    assert_eq!(st.map().lookup(x(1), false), taken.dests[0].new_reg);
    assert!(st.history().all(|h| h.path == RenamePath::Shared));
    assert_eq!(st.history_len(), 1);
    assert_eq!(st.stats().taken_resolutions, 1);
}

#[test]
fn not_taken_resolution_releases_taken_path() {
    let mut st = stage();
    let free = int_free(&st);
    st.begin_branch(10).unwrap();
    let _ = st
        .rename_inst(&op(11, x(1), &[]).on_taken_path())
        .unwrap();
    let _ = st
        .rename_inst(&op(12, x(2), &[]).on_taken_path())
        .unwrap();
    let kept = st.rename_inst(&op(13, x(1), &[])).unwrap().unwrap();

    assert_eq!(st.resolve_branch(false).unwrap(), 2);
    assert_eq!(int_free(&st), free - 1);
    assert_eq!(st.map().lookup(x(1), false), kept.dests[0].new_reg);
    assert_eq!(st.stats().not_taken_resolutions, 1);
    assert_eq!(st.stats().undone_maps, 2);
}

#[test]
fn commit_stops_at_speculative_entries() {
    let mut st = stage();
    let _ = st.rename_inst(&op(1, x(0), &[])).unwrap();
    st.begin_branch(2).unwrap();
    let _ = st.rename_inst(&op(3, x(0), &[])).unwrap();
    assert_eq!(st.commit(5), 1);
    assert_eq!(st.history_len(), 1);

    let _ = st.resolve_branch(false).unwrap();
    assert_eq!(st.commit(5), 1);
    assert_eq!(st.history_len(), 0);
}

#[test]
fn squash_past_branch_discards_checkpoint() {
    let mut st = stage();
    let orig = st.map().lookup(x(3), false);
    let free = int_free(&st);
    st.begin_branch(5).unwrap();
    let _ = st
        .rename_inst(&op(6, x(3), &[]).on_taken_path())
        .unwrap();
    let _ = st.rename_inst(&op(7, x(3), &[])).unwrap();

    assert_eq!(st.squash_after(4).unwrap(), 2);
    assert!(st.map().no_brs());
    assert_eq!(st.checkpoint_seq(), None);
    assert_eq!(st.map().lookup(x(3), false), orig);
    assert_eq!(int_free(&st), free);
}

#[test]
fn squash_behind_branch_keeps_checkpoint() {
    let mut st = stage();
    st.begin_branch(5).unwrap();
    let _ = st.rename_inst(&op(6, x(3), &[])).unwrap();
    assert_eq!(st.squash_after(5).unwrap(), 1);
    assert_eq!(st.checkpoint_seq(), Some(5));
    assert!(st.dump_brs(RegClass::Integer).is_some());
}

#[test]
fn branch_errors_leave_stage_usable() {
    let mut st = stage();
    assert_eq!(st.resolve_branch(true), Err(RenameError::NoCheckpoint));
    st.begin_branch(1).unwrap();
    assert_eq!(st.begin_branch(2), Err(RenameError::CheckpointOutstanding));
    assert_eq!(st.checkpoint_seq(), Some(1));
    assert_eq!(st.stats().checkpoints, 1);
    assert_eq!(st.resolve_branch(true), Ok(0));
    assert!(st.dump_brs(RegClass::Integer).is_none());
}

#[test]
fn double_pin_aborts_without_partial_state() {
    let mut st = stage();
    let _ = st
        .rename_inst(&DecodedInst::new(1).dest(x(2).with_pinned_writes(1)))
        .unwrap();
    let free = int_free(&st);
    let bad = DecodedInst::new(2)
        .dest(x(1))
        .dest(x(2).with_pinned_writes(1));
    assert!(matches!(
        st.rename_inst(&bad),
        Err(RenameError::DoublePin { .. })
    ));
    assert_eq!(int_free(&st), free);
    assert_eq!(st.history_len(), 1);
}

#[test]
fn operand_outside_register_file_is_rejected_before_lookup() {
    let mut st = stage();
    let free = int_free(&st);
    let bad_src = op(1, x(0), &[x(4)]);
    assert_eq!(
        st.rename_inst(&bad_src),
        Err(RenameError::ArchIndexOutOfRange { arch: x(4) })
    );
    let bad_dest = op(2, x(9), &[x(1)]);
    assert_eq!(
        st.rename_inst(&bad_dest),
        Err(RenameError::ArchIndexOutOfRange { arch: x(9) })
    );
    assert_eq!(int_free(&st), free);
    assert_eq!(st.history_len(), 0);
    assert_eq!(st.stats().lookups, 0);
    assert_eq!(st.stats().full_stalls, 0);
}

#[test]
fn pin_overflow_rolls_back_earlier_destinations() {
    let mut st = stage();
    let mapped = st.map().lookup(x(1), false);
    let free = int_free(&st);
    let bad = DecodedInst::new(1)
        .dest(x(1))
        .dest(x(2).with_pinned_writes(u32::MAX));
    assert!(matches!(
        st.rename_inst(&bad),
        Err(RenameError::PinCountOverflow { .. })
    ));
    assert_eq!(st.map().lookup(x(1), false), mapped);
    assert_eq!(int_free(&st), free);
    assert_eq!(st.history_len(), 0);
}

#[test]
fn write_back_outside_register_file_is_rejected() {
    let mut st = stage();
    let reg = PhysRegIndex(100_000);
    assert_eq!(
        st.write_back(reg, 1),
        Err(RenameError::PhysRegOutOfRange { reg })
    );
    let last = PhysRegIndex(st.pool().regfile.len() as u32);
    assert!(st.write_back(last, 1).is_err());
}
