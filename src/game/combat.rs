//! Combat resolution
//!
//! A single attack between two units resolves to exactly one loser unless
//! the attack is rejected outright (friendly fire). Overwhelming stat gaps
//! are deterministic; anything inside the threshold band rolls the dice.

use crate::core::Unit;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Offense/defense gap beyond which the outcome is never left to chance.
pub const OVERWHELM_THRESHOLD: i32 = 5;

/// Rolls strictly above this value (out of 0..100) invert the expected
/// outcome. Tunable: yields roughly an 80/20 split inside the threshold band.
pub const UPSET_ROLL: i32 = 80;

/// Result of one combat resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatOutcome {
    AttackerWins,
    DefenderWins,
    /// Same-faction attack, refused before any HP changes.
    Rejected,
}

/// Resolve an attack, setting the loser's HP to 0.
///
/// The winner's HP is untouched. Clearing the loser off the board is the
/// caller's responsibility. Zero imbalance counts as non-negative, so the
/// attacker is the expected winner absent an upset roll.
pub fn resolve<R: Rng + ?Sized>(
    attacker: &mut Unit,
    defender: &mut Unit,
    rng: &mut R,
) -> CombatOutcome {
    if attacker.faction == defender.faction {
        return CombatOutcome::Rejected;
    }

    // Bonuses count on the defense side only; raw offense drives the attack
    let imbalance = attacker.offense - defender.defense_power();

    let attacker_wins = if imbalance > OVERWHELM_THRESHOLD {
        true
    } else if imbalance < -OVERWHELM_THRESHOLD {
        false
    } else {
        let roll = rng.gen_range(0..100);
        let favored = imbalance >= 0;
        if roll > UPSET_ROLL {
            !favored
        } else {
            favored
        }
    };

    if attacker_wins {
        defender.hp = 0;
        CombatOutcome::AttackerWins
    } else {
        attacker.hp = 0;
        CombatOutcome::DefenderWins
    }
}
