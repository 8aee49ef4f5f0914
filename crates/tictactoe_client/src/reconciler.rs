//! Snapshot reconciliation.

use crate::snapshot::GameSnapshot;
use tracing::{debug, instrument};

/// What changed between two snapshots. Recomputed on every poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconciliationDelta {
    /// Any cell differs.
    pub board_changed: bool,
    /// Either actor name differs.
    pub actors_changed: bool,
    /// The game just reached a win or draw.
    pub became_terminal: bool,
}

impl ReconciliationDelta {
    /// Whether nothing changed at all.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Compares two snapshots structurally.
///
/// With no previous snapshot everything counts as changed. Calling this with
/// equal snapshots yields an empty delta.
#[instrument(skip_all)]
pub fn reconcile(previous: Option<&GameSnapshot>, next: &GameSnapshot) -> ReconciliationDelta {
    let delta = match previous {
        None => ReconciliationDelta {
            board_changed: true,
            actors_changed: true,
            became_terminal: next.is_terminal(),
        },
        Some(previous) => ReconciliationDelta {
            board_changed: previous.board() != next.board(),
            actors_changed: previous.actor_names() != next.actor_names(),
            became_terminal: !previous.is_terminal() && next.is_terminal(),
        },
    };
    debug!(?delta, "Reconciled snapshot");
    delta
}

/// The single "last known" snapshot, replaced whole on every apply.
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    last_known: Option<GameSnapshot>,
}

impl SnapshotStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current last-known snapshot.
    pub fn last_known(&self) -> Option<&GameSnapshot> {
        self.last_known.as_ref()
    }

    /// Computes the delta against `next`, then replaces the stored snapshot.
    pub fn apply(&mut self, next: GameSnapshot) -> ReconciliationDelta {
        let delta = reconcile(self.last_known.as_ref(), &next);
        self.last_known = Some(next);
        delta
    }
}
