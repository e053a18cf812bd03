//! Move application
//!
//! A move is either a relocation onto an unoccupied cell or an attack when
//! the target is occupied. The incoming snapshot is never mutated: the
//! resolver clones it and returns the mutated clone, ready for committing.

use crate::core::{BoardSnapshot, CellPos};
use crate::game::combat::{self, CombatOutcome};
use crate::Result;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// What a single move did to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[must_use]
pub enum MoveOutcome {
    /// Source equals target: the move was a cancellation, board unchanged.
    Cancelled,
    /// Source content moved onto an unoccupied target.
    Relocated,
    /// Attack won: the attacker captured the target cell.
    AttackerWon,
    /// Attack lost: the attacker was removed, the defender holds ground.
    AttackerLost,
    /// Same-faction attack refused; board unchanged.
    FriendlyFire,
}

/// Apply one move, returning the resulting snapshot and what happened.
///
/// Coordinates must be in bounds - out-of-range positions are a caller bug
/// surfaced as an error rather than a panic, because the CLI feeds this
/// user input. The caller clears its two-cell selection after every call,
/// whatever the outcome.
pub fn apply_move<R: Rng + ?Sized>(
    snapshot: &BoardSnapshot,
    from: CellPos,
    to: CellPos,
    rng: &mut R,
) -> Result<(BoardSnapshot, MoveOutcome)> {
    // Validate both ends up front so a bad target can't half-apply a move
    snapshot.tile(from)?;
    snapshot.tile(to)?;

    if from == to {
        return Ok((snapshot.clone(), MoveOutcome::Cancelled));
    }

    let mut next = snapshot.clone();

    let attacker = next.tile(from)?.occupant.clone();
    let defender = next.tile(to)?.occupant.clone();

    let outcome = match (attacker, defender) {
        // Both cells occupied: an attack. Combat runs on working copies and
        // the survivor is written back afterwards.
        (Some(mut attacker), Some(mut defender)) => {
            match combat::resolve(&mut attacker, &mut defender, rng) {
                CombatOutcome::Rejected => MoveOutcome::FriendlyFire,
                CombatOutcome::AttackerWins => {
                    next.tile_mut(to)?.occupant = Some(attacker);
                    next.tile_mut(from)?.clear();
                    MoveOutcome::AttackerWon
                }
                CombatOutcome::DefenderWins => {
                    next.tile_mut(to)?.occupant = Some(defender);
                    next.tile_mut(from)?.clear();
                    MoveOutcome::AttackerLost
                }
            }
        }
        // Moving onto empty ground is unconditional; an empty source simply
        // carries its appearance over (the original behaves the same way).
        _ => {
            let source = next.tile(from)?.clone();
            let target = next.tile_mut(to)?;
            target.color = source.color;
            target.occupant = source.occupant;
            next.tile_mut(from)?.clear();
            MoveOutcome::Relocated
        }
    };

    Ok((next, outcome))
}
