//! Rename core unit tests.



/// Rename stage tests (history buffer, commit, squash, branches).
pub mod stage;
