//! Trace events and their replay through a rename stage.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use o3rename_core::RenameStage;
use o3rename_core::common::{ConfigError, PhysRegIndex, RegClass, RenameError};
use o3rename_core::core::{DecodedInst, MapEntry, RenamedInst};

/// One step of a rename trace.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceEvent {
    /// Rename an instruction.
    Rename(DecodedInst),
    /// Open a checkpoint for the branch `seq`.
    Branch { seq: u64 },
    /// Resolve the outstanding branch.
    Resolve { taken: bool },
    /// Retire instructions up to `seq`.
    Commit { seq: u64 },
    /// Roll back instructions younger than `seq`.
    Squash { seq: u64 },
    /// Write a result into a physical register.
    WriteBack { reg: PhysRegIndex, value: u64 },
    /// Dump the mappings of one class.
    Dump { class: RegClass },
}

/// Outcome of one trace event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum EventOutcome {
    Renamed(RenamedInst),
    Stalled {
        seq: u64,
    },
    Checkpoint {
        seq: u64,
    },
    Resolved {
        taken: bool,
        released: usize,
    },
    Committed {
        seq: u64,
        count: usize,
    },
    Squashed {
        seq: u64,
        count: usize,
    },
    WrittenBack {
        reg: PhysRegIndex,
    },
    Dump {
        class: RegClass,
        map: Vec<MapEntry>,
        map_brs: Option<Vec<MapEntry>>,
    },
}

/// Errors that end a replay.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("rename stage setup failed: {0}")]
    Setup(RenameError),

    #[error("failed to read trace {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed trace: {0}")]
    Trace(#[from] serde_json::Error),

    #[error("event {index}: {source}")]
    Event { index: usize, source: RenameError },
}

/// Reads a JSON array of trace events.
pub fn load_trace(path: &Path) -> Result<Vec<TraceEvent>, ReplayError> {
    let text = fs::read_to_string(path).map_err(|source| ReplayError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&text)?)
}

/// Applies `event` to `stage`.
pub fn apply(stage: &mut RenameStage, event: &TraceEvent) -> Result<EventOutcome, RenameError> {
    let outcome = match event {
        TraceEvent::Rename(inst) => match stage.rename_inst(inst)? {
            Some(renamed) => EventOutcome::Renamed(renamed),
            None => EventOutcome::Stalled { seq: inst.seq },
        },
        TraceEvent::Branch { seq } => {
            stage.begin_branch(*seq)?;
            EventOutcome::Checkpoint { seq: *seq }
        }
        TraceEvent::Resolve { taken } => EventOutcome::Resolved {
            taken: *taken,
            released: stage.resolve_branch(*taken)?,
        },
        TraceEvent::Commit { seq } => EventOutcome::Committed {
            seq: *seq,
            count: stage.commit(*seq),
        },
        TraceEvent::Squash { seq } => EventOutcome::Squashed {
            seq: *seq,
            count: stage.squash_after(*seq)?,
        },
        TraceEvent::WriteBack { reg, value } => {
            stage.write_back(*reg, *value)?;
            EventOutcome::WrittenBack { reg: *reg }
        }
        TraceEvent::Dump { class } => EventOutcome::Dump {
            class: *class,
            map: stage.dump(*class),
            map_brs: stage.dump_brs(*class),
        },
    };
    Ok(outcome)
}

/// Replays `events` in order, handing each outcome to `sink`.
///
/// Stops at the first failing event.
pub fn replay<F>(stage: &mut RenameStage, events: &[TraceEvent], mut sink: F) -> Result<(), ReplayError>
where
    F: FnMut(&EventOutcome),
{
    for (index, event) in events.iter().enumerate() {
        debug!(index, ?event, "replaying event");
        let outcome = apply(stage, event).map_err(|source| ReplayError::Event { index, source })?;
        sink(&outcome);
    }
    Ok(())
}
