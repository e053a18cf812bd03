//! End-to-end branch/merge/revert scenarios driven through the controller

use hexgit::core::CellPos;
use hexgit::game::{
    CommitOutcome, GameController, Intent, MergeOutcome, MoveOutcome, RevertOutcome,
    MAX_GENERATION,
};
use similar_asserts::assert_eq as assert_same;

fn new_game() -> GameController {
    let mut controller = GameController::new_game(9, 9, 42424).expect("9x9 setup");
    controller.logger_mut().enable_capture();
    controller
}

/// The signature flow: commit the initial board, open a branch, move on the
/// branch, fold it back, then revert the branch's last commit.
#[test]
fn test_branch_merge_revert_walkthrough() {
    let mut controller = new_game();

    // Initial board is committed at generation 0
    let history = controller.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history.generation(), 0);
    let initial_id = history.current().id;

    // Branch: generation 1, payload is the same board
    let branch_commit = match controller.branch() {
        CommitOutcome::Committed(id) => id,
        CommitOutcome::BranchLimitReached => panic!("first branch rejected"),
    };
    assert_eq!(controller.history().generation(), 1);
    let branch_node = controller.history().current_id();

    // A move on the branch auto-commits at generation 1
    let outcome = controller
        .apply_move(CellPos::new(1, 0), CellPos::new(1, 4))
        .expect("in-bounds move");
    assert_eq!(outcome, MoveOutcome::Relocated);
    assert_eq!(controller.history().generation(), 1);
    assert_eq!(controller.history().len(), 3);

    // Merge folds both branch commits back onto the main line
    assert_eq!(controller.merge(), MergeOutcome::Merged { folded: 2 });
    assert_eq!(controller.history().generation(), 0);
    for (_, node) in controller.history().ancestors() {
        assert_eq!(node.generation, 0);
    }

    // Revert drops the move commit and lands on the branch-point node
    let discarded = match controller.revert() {
        RevertOutcome::Reverted { discarded } => discarded,
        RevertOutcome::NothingToRevert => panic!("revert rejected"),
    };
    assert_ne!(discarded, branch_commit);
    assert_eq!(controller.history().current_id(), branch_node);
    assert_eq!(controller.history().current().id, branch_commit);

    // The board is back to the pre-move state, which equals the initial board
    let chain: Vec<_> = controller.history().ancestors().collect();
    assert_eq!(chain.len(), 3); // sentinel + initial + branch point
    assert_eq!(chain[1].1.id, initial_id);
    assert_same!(
        controller.board(),
        &controller.history().node(chain[1].0).snapshot
    );
}

#[test]
fn test_branch_depth_never_exceeds_cap() {
    let mut controller = new_game();

    for _ in 0..MAX_GENERATION {
        assert!(matches!(controller.branch(), CommitOutcome::Committed(_)));
    }
    // Hammer the cap: every further branch request is rejected in place
    for _ in 0..3 {
        assert_eq!(controller.branch(), CommitOutcome::BranchLimitReached);
        assert_eq!(controller.history().generation(), MAX_GENERATION);
    }

    // Non-branch commits still work at the cap
    assert!(matches!(controller.commit(false), CommitOutcome::Committed(_)));
    assert_eq!(controller.history().generation(), MAX_GENERATION);
}

#[test]
fn test_merge_then_remerge_peels_one_level_at_a_time() {
    let mut controller = new_game();
    let _ = controller.branch(); // gen 1
    let _ = controller.branch(); // gen 2
    let _ = controller.commit(false); // gen 2

    assert_eq!(controller.merge(), MergeOutcome::Merged { folded: 2 });
    assert_eq!(controller.history().generation(), 1);
    assert_eq!(controller.merge(), MergeOutcome::Merged { folded: 3 });
    assert_eq!(controller.history().generation(), 0);
    assert_eq!(controller.merge(), MergeOutcome::NothingToMerge);
}

#[test]
fn test_revert_then_commit_reuses_nothing_from_discarded_node() {
    let mut controller = new_game();
    let _ = controller.commit(false);
    let discarded = match controller.revert() {
        RevertOutcome::Reverted { discarded } => discarded,
        RevertOutcome::NothingToRevert => panic!("revert rejected"),
    };

    let replacement = match controller.commit(false) {
        CommitOutcome::Committed(id) => id,
        CommitOutcome::BranchLimitReached => panic!("plain commit rejected"),
    };

    let ids: Vec<_> = controller
        .history()
        .ancestors()
        .filter(|(_, n)| !n.is_sentinel())
        .map(|(_, n)| n.id)
        .collect();
    assert_eq!(ids.len(), 2);
    assert!(!ids.contains(&discarded));
    assert!(ids.contains(&replacement));
}

/// Identical seeds replay to identical histories and boards.
#[test]
fn test_seeded_games_are_deterministic() {
    let script = |controller: &mut GameController| {
        controller.handle(Intent::Branch).unwrap();
        controller
            .handle(Intent::Move { from: CellPos::new(2, 2), to: CellPos::new(6, 7) })
            .unwrap();
        controller
            .handle(Intent::Move { from: CellPos::new(6, 7), to: CellPos::new(7, 8) })
            .unwrap();
        controller.handle(Intent::Merge).unwrap();
    };

    let mut a = new_game();
    let mut b = new_game();
    script(&mut a);
    script(&mut b);

    assert_same!(a.board(), b.board());
    assert_eq!(a.history().len(), b.history().len());
    assert_eq!(a.history().generation(), b.history().generation());
    let ids = |c: &GameController| -> Vec<String> {
        c.history()
            .ancestors()
            .map(|(_, n)| n.id.to_string())
            .collect()
    };
    assert_eq!(ids(&a), ids(&b));
}
