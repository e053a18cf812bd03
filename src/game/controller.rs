//! Game controller: turns discrete input intents into engine operations
//!
//! The controller owns the single mutable "current" surface of the game: the
//! history graph, the working copy of the board, the pending two-click
//! selection, the combat RNG and the narration logger. Rendering reads
//! through `board()` / `history()` and never mutates.

use crate::core::{BoardSnapshot, CellPos, UnitRoster};
use crate::game::history::{CommitOutcome, HistoryGraph, MergeOutcome, RevertOutcome};
use crate::game::logger::GameLogger;
use crate::game::moves::{self, MoveOutcome};
use crate::{EngineError, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use smallvec::SmallVec;
use std::cell::RefCell;

/// Discrete, already edge-triggered commands from the input collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Commit,
    Branch,
    Merge,
    Revert,
    /// One click of the two-click move flow.
    Select(CellPos),
    /// A fully-formed move (both clicks resolved by the view layer).
    Move { from: CellPos, to: CellPos },
}

/// Terminal game state, detected on the main line only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Victory {
    PlayerWins,
    BotWins,
}

pub struct GameController {
    history: HistoryGraph,
    /// Clone of the current node's snapshot; moves mutate this, never the
    /// committed payloads.
    working: BoardSnapshot,
    selection: SmallVec<[CellPos; 2]>,
    logger: GameLogger,
    rng: RefCell<ChaCha12Rng>,
    branch_counter: u32,
    victory: Option<Victory>,
}

impl GameController {
    /// Set up a populated board and commit it as the initial state.
    pub fn new_game(width: usize, height: usize, seed: u64) -> Result<Self> {
        let roster = UnitRoster::standard();
        let mut board = BoardSnapshot::new(width, height)?;
        board.populate(&roster)?;

        let mut controller = GameController {
            history: HistoryGraph::with_seed(seed),
            working: board.clone(),
            selection: SmallVec::new(),
            logger: GameLogger::new(),
            rng: RefCell::new(ChaCha12Rng::seed_from_u64(seed)),
            branch_counter: 0,
            victory: None,
        };
        controller.logger.narrate("you$ ", "git init");
        match controller.history.commit(board, false) {
            CommitOutcome::Committed(id) => {
                controller
                    .logger
                    .normal(&format!("[main {id}] initial board"));
            }
            CommitOutcome::BranchLimitReached => unreachable!("initial commit never branches"),
        }
        Ok(controller)
    }

    pub fn board(&self) -> &BoardSnapshot {
        &self.working
    }

    pub fn history(&self) -> &HistoryGraph {
        &self.history
    }

    pub fn logger(&self) -> &GameLogger {
        &self.logger
    }

    pub fn logger_mut(&mut self) -> &mut GameLogger {
        &mut self.logger
    }

    pub fn selection(&self) -> &[CellPos] {
        &self.selection
    }

    pub fn victory(&self) -> Option<Victory> {
        self.victory
    }

    /// Dispatch one intent. Engine-level rejections narrate and succeed;
    /// only malformed input (out-of-bounds cells) surfaces as an error.
    pub fn handle(&mut self, intent: Intent) -> Result<()> {
        if self.victory.is_some() {
            self.logger.verbose("the game is over; intent ignored");
            return Ok(());
        }
        match intent {
            Intent::Commit => {
                let _ = self.commit(false);
                Ok(())
            }
            Intent::Branch => {
                let _ = self.branch();
                Ok(())
            }
            Intent::Merge => {
                let _ = self.merge();
                Ok(())
            }
            Intent::Revert => {
                let _ = self.revert();
                Ok(())
            }
            Intent::Select(pos) => self.select(pos),
            Intent::Move { from, to } => self.apply_move(from, to).map(|_| ()),
        }
    }

    /// Commit the working snapshot at the current generation.
    ///
    /// Silent commits skip narration; they carry view-only synthetic state
    /// (selection highlights) that should not read as a history event.
    pub fn commit(&mut self, silent: bool) -> CommitOutcome {
        let outcome = self.history.commit(self.working.clone(), false);
        if let CommitOutcome::Committed(id) = outcome {
            if !silent {
                self.logger.narrate("you$ ", "git commit -m 'save the board'");
                self.logger
                    .normal(&format!("[gen {} {id}]", self.history.generation()));
            }
            self.check_victory();
        }
        outcome
    }

    /// Open a new branch level seeded with the working snapshot.
    pub fn branch(&mut self) -> CommitOutcome {
        let outcome = self.history.commit(self.working.clone(), true);
        match outcome {
            CommitOutcome::Committed(id) => {
                self.branch_counter += 1;
                self.logger.narrate(
                    "you$ ",
                    &format!("git checkout -b feature{}", self.branch_counter),
                );
                self.logger
                    .normal(&format!("[gen {} {id}]", self.history.generation()));
            }
            CommitOutcome::BranchLimitReached => {
                self.logger.normal("maximum allowed branches reached");
            }
        }
        outcome
    }

    /// Fold the current branch back into its parent line.
    ///
    /// A merge can land a wiped-out faction on the main line, so it decides
    /// the game the same way an applied move does.
    pub fn merge(&mut self) -> MergeOutcome {
        let outcome = self.history.merge();
        match outcome {
            MergeOutcome::Merged { folded } => {
                self.logger.narrate("you$ ", "git merge");
                self.logger
                    .normal(&format!("folded {folded} commits into the parent line"));
                self.check_victory();
            }
            MergeOutcome::NothingToMerge => {
                self.logger.normal("you cannot merge main into main");
            }
        }
        outcome
    }

    /// Discard the most recent commit and step back.
    pub fn revert(&mut self) -> RevertOutcome {
        let outcome = self.history.revert();
        match outcome {
            RevertOutcome::Reverted { discarded } => {
                self.working = self.history.current().snapshot.clone();
                self.selection.clear();
                self.logger.narrate("you$ ", "git reset --hard HEAD~1");
                self.logger.normal(&format!("dropped commit {discarded}"));
                self.check_victory();
            }
            RevertOutcome::NothingToRevert => {
                self.logger.normal("can't revert, not enough history");
            }
        }
        outcome
    }

    /// One click of the two-click selection; the second click fires the move.
    pub fn select(&mut self, pos: CellPos) -> Result<()> {
        if !self.working.in_bounds(pos) {
            return Err(EngineError::OutOfBounds { x: pos.x, y: pos.y });
        }
        // The second click always fires the move, so at most one cell is
        // ever pending
        if let Some(&from) = self.selection.first() {
            self.apply_move(from, pos).map(|_| ())
        } else {
            self.selection.push(pos);
            Ok(())
        }
    }

    /// Apply a move and auto-commit the result when the board changed.
    ///
    /// The selection is cleared regardless of outcome.
    pub fn apply_move(&mut self, from: CellPos, to: CellPos) -> Result<MoveOutcome> {
        let result = moves::apply_move(&self.working, from, to, &mut *self.rng.borrow_mut());
        self.selection.clear();
        let (next, outcome) = result?;

        match outcome {
            MoveOutcome::Cancelled => {}
            MoveOutcome::FriendlyFire => {
                self.logger.normal("friendly fire is frowned upon");
            }
            MoveOutcome::Relocated | MoveOutcome::AttackerWon | MoveOutcome::AttackerLost => {
                if outcome == MoveOutcome::AttackerWon {
                    self.logger.normal(&format!("the defender at {to} falls"));
                } else if outcome == MoveOutcome::AttackerLost {
                    self.logger.normal(&format!("the attack from {from} is repelled"));
                }
                self.working = next;
                let _ = self.history.commit(self.working.clone(), false);
                self.logger.narrate("you$ ", "git commit -m 'move a piece'");
                self.check_victory();
            }
        }
        Ok(outcome)
    }

    /// Win/loss is only decided on the main line; a wiped-out faction on a
    /// feature branch can still be merged away or reverted.
    fn check_victory(&mut self) {
        if self.victory.is_some() || self.history.generation() != 0 {
            return;
        }
        let (player, bot) = self.working.living_units();
        if bot == 0 {
            self.logger.narrate("you$ ", "git push origin main");
            self.logger.minimal("You win!");
            self.victory = Some(Victory::PlayerWins);
        } else if player == 0 {
            self.logger.narrate("you$ ", "sudo rm -rf / --no-preserve-root");
            self.logger.minimal("whoops. it's over");
            self.victory = Some(Victory::BotWins);
        }
    }

    /// JSON view of the working snapshot (CLI debug surface).
    pub fn dump_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.working)
            .map_err(|e| EngineError::SerializationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::history::MAX_GENERATION;

    fn controller() -> GameController {
        let mut c = GameController::new_game(9, 9, 7).unwrap();
        c.logger_mut().enable_capture();
        c.logger_mut().clear_logs();
        c
    }

    #[test]
    fn test_new_game_commits_initial_board() {
        let c = GameController::new_game(9, 9, 1).unwrap();
        assert_eq!(c.history().len(), 1);
        assert_eq!(c.history().generation(), 0);
        assert!(!c.history().current().is_sentinel());
        let (player, bot) = c.board().living_units();
        assert_eq!((player, bot), (3, 2));
    }

    #[test]
    fn test_two_click_selection_fires_move() {
        let mut c = controller();
        c.handle(Intent::Select(CellPos::new(1, 0))).unwrap();
        assert_eq!(c.selection().len(), 1);

        // Second click moves LBJ onto empty ground and auto-commits
        c.handle(Intent::Select(CellPos::new(1, 4))).unwrap();
        assert!(c.selection().is_empty());
        assert_eq!(c.history().len(), 2);
        assert!(c.board().tile(CellPos::new(1, 4)).unwrap().is_occupied());
        assert!(!c.board().tile(CellPos::new(1, 0)).unwrap().is_occupied());
    }

    #[test]
    fn test_selection_cleared_even_on_cancellation() {
        let mut c = controller();
        let pos = CellPos::new(1, 0);
        c.handle(Intent::Select(pos)).unwrap();
        c.handle(Intent::Select(pos)).unwrap();
        assert!(c.selection().is_empty());
        // Cancellation commits nothing
        assert_eq!(c.history().len(), 1);
    }

    #[test]
    fn test_friendly_fire_does_not_commit() {
        let mut c = controller();
        let outcome = c
            .apply_move(CellPos::new(1, 0), CellPos::new(2, 2))
            .unwrap();
        assert_eq!(outcome, MoveOutcome::FriendlyFire);
        assert_eq!(c.history().len(), 1);
        let narrated = c
            .logger()
            .logs()
            .iter()
            .any(|e| e.message.contains("friendly fire"));
        assert!(narrated);
    }

    #[test]
    fn test_branch_cap_narrates_rejection() {
        let mut c = controller();
        for _ in 0..MAX_GENERATION {
            assert!(matches!(c.branch(), CommitOutcome::Committed(_)));
        }
        assert_eq!(c.history().generation(), MAX_GENERATION);

        let outcome = c.branch();
        assert_eq!(outcome, CommitOutcome::BranchLimitReached);
        assert_eq!(c.history().generation(), MAX_GENERATION);
        let narrated = c
            .logger()
            .logs()
            .iter()
            .any(|e| e.message.contains("maximum allowed branches"));
        assert!(narrated);
    }

    #[test]
    fn test_merge_rejection_on_main_line() {
        let mut c = controller();
        assert_eq!(c.merge(), MergeOutcome::NothingToMerge);
        let narrated = c
            .logger()
            .logs()
            .iter()
            .any(|e| e.message.contains("cannot merge"));
        assert!(narrated);
    }

    #[test]
    fn test_revert_restores_working_board() {
        let mut c = controller();
        let before = c.board().clone();
        c.apply_move(CellPos::new(1, 0), CellPos::new(1, 4)).unwrap();
        assert_ne!(*c.board(), before);

        assert!(matches!(c.revert(), RevertOutcome::Reverted { .. }));
        assert_eq!(*c.board(), before);
    }

    #[test]
    fn test_revert_rejected_on_fresh_game() {
        let mut c = controller();
        assert_eq!(c.revert(), RevertOutcome::NothingToRevert);
        let narrated = c
            .logger()
            .logs()
            .iter()
            .any(|e| e.message.contains("can't revert"));
        assert!(narrated);
    }

    #[test]
    fn test_silent_commit_skips_narration() {
        let mut c = controller();
        assert!(matches!(c.commit(true), CommitOutcome::Committed(_)));
        assert!(c.logger().logs().is_empty());
        assert_eq!(c.history().len(), 2);
    }

    fn wipe_bots(c: &mut GameController) {
        let bot_cells: Vec<CellPos> = c
            .working
            .cells()
            .filter(|(_, t)| {
                t.occupant
                    .as_ref()
                    .is_some_and(|u| u.faction == crate::core::Faction::Bot)
            })
            .map(|(pos, _)| pos)
            .collect();
        for pos in bot_cells {
            c.working.tile_mut(pos).unwrap().clear();
        }
    }

    #[test]
    fn test_victory_only_on_main_line() {
        let mut c = controller();
        let _ = c.branch();

        // Bots wiped out on the branch: committing there decides nothing
        wipe_bots(&mut c);
        assert!(matches!(c.commit(false), CommitOutcome::Committed(_)));
        assert_eq!(c.victory(), None);

        // Folding the branch back puts the wiped board on the main line,
        // and the merge itself must declare the win
        assert!(matches!(c.merge(), MergeOutcome::Merged { .. }));
        assert_eq!(c.victory(), Some(Victory::PlayerWins));
        let narrated = c
            .logger()
            .logs()
            .iter()
            .any(|e| e.message.contains("You win!"));
        assert!(narrated);
    }

    #[test]
    fn test_commit_of_wiped_board_declares_victory() {
        let mut c = controller();
        wipe_bots(&mut c);
        assert!(matches!(c.commit(false), CommitOutcome::Committed(_)));
        assert_eq!(c.victory(), Some(Victory::PlayerWins));
    }

    #[test]
    fn test_intents_ignored_after_victory() {
        let mut c = controller();
        c.victory = Some(Victory::BotWins);
        c.handle(Intent::Branch).unwrap();
        assert_eq!(c.history().generation(), 0);
        assert_eq!(c.history().len(), 1);
    }

    #[test]
    fn test_dump_json_roundtrips_board() {
        let c = controller();
        let json = c.dump_json().unwrap();
        let parsed: BoardSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, *c.board());
    }
}
