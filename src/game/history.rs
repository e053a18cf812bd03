//! The commit/branch/merge/revert history graph
//!
//! Board snapshots are committed into an arena of `HistoryNode`s linked as a
//! single chain (one live branch at a time - branch depth is a generation
//! counter, not a DAG). Nodes are addressed by stable `NodeId` handles and
//! never move or get freed; revert only detaches them from the chain.

use crate::core::BoardSnapshot;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Branch depth cap: a branch request at this generation is rejected.
pub const MAX_GENERATION: u32 = 4;

/// Stable handle into the history arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque random commit label, for display only.
///
/// Not content-derived and not required to be unique for correctness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitId(u32);

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

/// One committed board state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryNode {
    pub snapshot: BoardSnapshot,
    pub id: CommitId,
    /// Branch depth; 0 is the main line.
    pub generation: u32,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

impl HistoryNode {
    pub fn prev(&self) -> Option<NodeId> {
        self.prev
    }

    pub fn next(&self) -> Option<NodeId> {
        self.next
    }

    pub fn is_sentinel(&self) -> bool {
        self.snapshot.is_sentinel()
    }
}

/// Outcome of a commit request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum CommitOutcome {
    Committed(CommitId),
    /// Branch requested at the maximum depth; nothing was created.
    BranchLimitReached,
}

/// Outcome of a merge request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum MergeOutcome {
    /// One branch level folded into its parent line, relabeling `folded` nodes.
    Merged { folded: usize },
    /// Already on the main line; nothing to fold.
    NothingToMerge,
}

/// Outcome of a revert request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum RevertOutcome {
    Reverted { discarded: CommitId },
    /// Fewer than two real commits above the sentinel root.
    NothingToRevert,
}

/// The history graph: an arena of nodes plus the single mutable "current"
/// handle. Commit, merge and revert are the only mutators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryGraph {
    nodes: Vec<HistoryNode>,
    current: NodeId,
    /// Label stream for commit ids; seeded so runs are reproducible.
    label_rng: ChaCha12Rng,
}

impl HistoryGraph {
    pub fn new() -> Self {
        Self::with_seed(0)
    }

    /// Create a graph whose root is the sentinel node at generation 0.
    pub fn with_seed(seed: u64) -> Self {
        let root = HistoryNode {
            snapshot: BoardSnapshot::sentinel(),
            id: CommitId(0),
            generation: 0,
            prev: None,
            next: None,
        };
        HistoryGraph {
            nodes: vec![root],
            current: NodeId(0),
            label_rng: ChaCha12Rng::seed_from_u64(seed),
        }
    }

    pub fn current(&self) -> &HistoryNode {
        &self.nodes[self.current.index()]
    }

    pub fn current_id(&self) -> NodeId {
        self.current
    }

    pub fn generation(&self) -> u32 {
        self.current().generation
    }

    pub fn node(&self, id: NodeId) -> &HistoryNode {
        &self.nodes[id.index()]
    }

    /// Commit a snapshot as the new current node.
    ///
    /// `branch` opens a new branch level (generation + 1) unless the current
    /// generation is already at [`MAX_GENERATION`], in which case nothing is
    /// created and the current node is unchanged.
    pub fn commit(&mut self, snapshot: BoardSnapshot, branch: bool) -> CommitOutcome {
        let generation = if branch {
            if self.generation() >= MAX_GENERATION {
                return CommitOutcome::BranchLimitReached;
            }
            self.generation() + 1
        } else {
            self.generation()
        };

        let id = CommitId(self.label_rng.gen());
        let node_id = NodeId(self.nodes.len() as u32);
        self.nodes.push(HistoryNode {
            snapshot,
            id,
            generation,
            prev: Some(self.current),
            next: None,
        });
        self.nodes[self.current.index()].next = Some(node_id);
        self.current = node_id;
        CommitOutcome::Committed(id)
    }

    /// Fold the current branch level back into its parent line.
    ///
    /// Walks from the current node toward the root, decrementing the
    /// generation of every node that still carries the original current
    /// generation, and stops at the first node that differs. Topology is
    /// untouched; only the depth labeling changes.
    pub fn merge(&mut self) -> MergeOutcome {
        let from = self.generation();
        if from == 0 {
            return MergeOutcome::NothingToMerge;
        }

        let mut folded = 0;
        let mut cursor = Some(self.current);
        while let Some(id) = cursor {
            let node = &mut self.nodes[id.index()];
            if node.generation != from {
                break;
            }
            node.generation -= 1;
            folded += 1;
            cursor = node.prev;
        }
        MergeOutcome::Merged { folded }
    }

    /// Discard the current node and step back to its predecessor.
    ///
    /// Single-step undo: requires at least two real (non-sentinel) commits
    /// on the chain. The discarded node's back-link from its predecessor is
    /// severed, leaving it unreachable in the arena.
    pub fn revert(&mut self) -> RevertOutcome {
        let current = self.current();
        if current.is_sentinel() {
            return RevertOutcome::NothingToRevert;
        }
        let Some(prev_id) = current.prev else {
            return RevertOutcome::NothingToRevert;
        };
        if self.nodes[prev_id.index()].is_sentinel() {
            return RevertOutcome::NothingToRevert;
        }

        let discarded = current.id;
        self.nodes[prev_id.index()].next = None;
        self.current = prev_id;
        RevertOutcome::Reverted { discarded }
    }

    /// Root-to-current walk over the live chain, sentinel included.
    ///
    /// Finite and restartable; rendering skips the sentinel via
    /// [`HistoryNode::is_sentinel`].
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors { graph: self, cursor: Some(NodeId(0)) }
    }

    /// Number of real commits reachable from the root.
    pub fn len(&self) -> usize {
        self.ancestors().filter(|(_, n)| !n.is_sentinel()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for HistoryGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the live chain from the sentinel root to the current node.
pub struct Ancestors<'a> {
    graph: &'a HistoryGraph,
    cursor: Option<NodeId>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = (NodeId, &'a HistoryNode);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        let node = self.graph.node(id);
        // Stop after yielding the current node; detached tails are unreachable
        self.cursor = if id == self.graph.current_id() { None } else { node.next() };
        Some((id, node))
    }
}
