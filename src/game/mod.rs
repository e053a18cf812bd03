//! The versioned board-state engine

pub mod combat;
pub mod controller;
pub mod history;
pub mod logger;
pub mod moves;

pub use combat::{CombatOutcome, OVERWHELM_THRESHOLD, UPSET_ROLL};
pub use controller::{GameController, Intent, Victory};
pub use history::{
    Ancestors, CommitId, CommitOutcome, HistoryGraph, HistoryNode, MergeOutcome, NodeId,
    RevertOutcome, MAX_GENERATION,
};
pub use logger::{GameLogger, LogEntry, OutputMode, VerbosityLevel};
pub use moves::MoveOutcome;
