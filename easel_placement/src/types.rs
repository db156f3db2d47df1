// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the sync graph: node identifiers, placements, and outcomes.

use kurbo::{Point, Size};

/// Position deltas at or below this threshold are treated as noise.
///
/// Composing and inverting layout transforms reintroduces floating-point
/// rounding on every pass; without a threshold, each pass would observe a
/// microscopically different value and emit another write, forever.
pub const POSITION_EPSILON: f64 = 0.01;

/// Identifier for a node in a [`SyncGraph`](crate::SyncGraph).
///
/// This is a small, copyable handle that stays stable across updates but
/// becomes invalid when the underlying slot is reused. It consists of a slot
/// index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `NodeId` that pointed to
///   that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a
///   new, distinct `NodeId`. Stale ids never alias a different live node.
///
/// Use [`SyncGraph::is_alive`](crate::SyncGraph::is_alive) to check whether
/// a `NodeId` still refers to a live node.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Dual-frame placement of an item: local and global position plus size.
///
/// The invariant maintained by the sync graph is that `global` equals
/// `local` pushed through the resolved layout transforms of every ancestor
/// container up to the canvas root. Exactly one of the two positions is the
/// authoritative side of any given change; the other is derived.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Position relative to the immediate container.
    pub local: Point,
    /// Position relative to the canvas root.
    pub global: Point,
    /// Item size in world units.
    pub size: Size,
}

/// Result of a synchronization operation.
///
/// None of these are errors; they classify what the operation did so tests
/// and debugging tools can observe the graph's behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    /// At least one position was written.
    Applied,
    /// The change was within [`POSITION_EPSILON`]; nothing was written.
    Unchanged,
    /// The re-entrancy guard was engaged; the trigger was dropped. The
    /// in-flight operation observes the final state, so a dropped trigger
    /// is redundant, not lost.
    Dropped,
    /// The item has no path to the canvas root (detached); the operation
    /// was a silent no-op. The item resyncs once reattached.
    Detached,
}

/// Change notification emitted by a synchronization operation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SyncEvent {
    /// A local position was written through the normal write path; the host
    /// should re-position the child and re-run layout, then call
    /// [`SyncGraph::settle_all`](crate::SyncGraph::settle_all).
    LayoutInvalidated(NodeId),
    /// An item's local position changed.
    LocalChanged {
        /// The item whose local position changed.
        id: NodeId,
        /// The new local position.
        local: Point,
    },
    /// An item's global position changed.
    GlobalChanged {
        /// The item whose global position changed.
        id: NodeId,
        /// The new global position.
        global: Point,
    },
}
