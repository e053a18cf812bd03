//! hexgit - turn-based tactics with a git-shaped undo history
//!
//! Every board mutation is recorded as an immutable snapshot in an in-memory
//! history graph. The graph supports committing, branching (bounded depth),
//! merging a branch back into its parent line, and reverting the most recent
//! commit. Rendering, input polling and hex geometry are external
//! collaborators; this crate is the versioned board-state engine.

pub mod core;
pub mod error;
pub mod game;

pub use error::{EngineError, Result};
