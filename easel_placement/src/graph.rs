// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The sync graph: container tree, placements, and the reconciliation passes.

use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use kurbo::{Affine, Point, Size};
use smallvec::SmallVec;

use crate::types::{NodeId, Placement, SyncEvent, SyncOutcome, POSITION_EPSILON};

#[derive(Debug)]
struct Node {
    /// Parent container. `None` on the root, or on a detached node.
    parent: Option<NodeId>,
    /// Resolved post-layout transform into the parent's coordinate space.
    /// Written by the layout collaborator; containers that center or align
    /// children surface that here, which is why local→global composition
    /// must go through these transforms rather than summing offsets.
    resolved: Affine,
    /// Present on items, absent on pure containers.
    placement: Option<Placement>,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

#[derive(Debug)]
struct Inner {
    slots: Vec<Slot>,
    free: Vec<u32>,
    /// Items whose global position must be recomputed once layout settles.
    pending: SmallVec<[NodeId; 8]>,
}

type Events = SmallVec<[SyncEvent; 4]>;

/// Per-canvas synchronization graph over a container tree.
///
/// See the crate documentation for the model. Structural mutation (insert,
/// remove, reparent, resolved-transform updates) takes `&mut self`; the
/// synchronization operations take `&self` and use interior mutability so
/// observers may re-enter — re-entrant triggers are dropped by the guard.
#[derive(Debug)]
pub struct SyncGraph {
    inner: RefCell<Inner>,
    root: NodeId,
    guard: Cell<bool>,
}

impl Default for SyncGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncGraph {
    /// Creates a graph containing only the canvas root.
    #[must_use]
    pub fn new() -> Self {
        let root = Node {
            parent: None,
            resolved: Affine::IDENTITY,
            placement: None,
        };
        let inner = Inner {
            slots: Vec::from([Slot {
                generation: 1,
                node: Some(root),
            }]),
            free: Vec::new(),
            pending: SmallVec::new(),
        };
        Self {
            inner: RefCell::new(inner),
            root: NodeId::new(0, 1),
            guard: Cell::new(false),
        }
    }

    /// Returns the canvas root node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns `true` while a synchronization operation is in flight.
    #[must_use]
    pub fn is_syncing(&self) -> bool {
        self.guard.get()
    }

    /// Returns `true` if `id` refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.inner.borrow().get(id).is_some()
    }

    /// Inserts a container under `parent`. Returns `None` if `parent` is dead.
    pub fn insert_container(&mut self, parent: NodeId) -> Option<NodeId> {
        let inner = self.inner.get_mut();
        inner.get(parent)?;
        Some(inner.alloc(Node {
            parent: Some(parent),
            resolved: Affine::IDENTITY,
            placement: None,
        }))
    }

    /// Inserts an item under `parent` at the given local position.
    ///
    /// The item is marked pending: its global position is provisional until
    /// the first settle pass after layout.
    pub fn insert_item(&mut self, parent: NodeId, local: Point, size: Size) -> Option<NodeId> {
        let inner = self.inner.get_mut();
        inner.get(parent)?;
        let id = inner.alloc(Node {
            parent: Some(parent),
            resolved: Affine::translate(local.to_vec2()),
            placement: Some(Placement {
                local,
                global: local,
                size,
            }),
        });
        inner.pending.push(id);
        Some(id)
    }

    /// Removes a node. The root is structurally un-removable.
    ///
    /// Children of a removed container keep their stale parent link and
    /// behave as detached until reparented.
    pub fn remove(&mut self, id: NodeId) -> bool {
        if id == self.root {
            return false;
        }
        let inner = self.inner.get_mut();
        let Some(slot) = inner.slots.get_mut(id.idx()) else {
            return false;
        };
        if slot.generation != id.1 || slot.node.is_none() {
            return false;
        }
        slot.node = None;
        slot.generation = slot.generation.wrapping_add(1);
        inner.free.push(id.0);
        inner.pending.retain(|p| *p != id);
        true
    }

    /// Reattaches `id` under `parent`. Items are re-marked pending so the
    /// next settle pass resyncs them.
    pub fn set_parent(&mut self, id: NodeId, parent: NodeId) -> bool {
        if id == self.root {
            return false;
        }
        let inner = self.inner.get_mut();
        if inner.get(parent).is_none() {
            return false;
        }
        let Some(node) = inner.get_mut(id) else {
            return false;
        };
        node.parent = Some(parent);
        if node.placement.is_some() && !inner.pending.contains(&id) {
            inner.pending.push(id);
        }
        true
    }

    /// Detaches `id` from its parent. Synchronization operations on a
    /// detached item are silent no-ops until it is reattached.
    pub fn detach(&mut self, id: NodeId) -> bool {
        if id == self.root {
            return false;
        }
        let inner = self.inner.get_mut();
        match inner.get_mut(id) {
            Some(node) => {
                node.parent = None;
                true
            }
            None => false,
        }
    }

    /// Records the resolved post-layout transform of `id` into its parent's
    /// coordinate space. Called by the layout collaborator after layout.
    pub fn set_resolved_transform(&mut self, id: NodeId, transform: Affine) -> bool {
        match self.inner.get_mut().get_mut(id) {
            Some(node) => {
                node.resolved = transform;
                true
            }
            None => false,
        }
    }

    /// Returns the resolved transform of `id`, if it is alive.
    #[must_use]
    pub fn resolved_transform(&self, id: NodeId) -> Option<Affine> {
        Some(self.inner.borrow().get(id)?.resolved)
    }

    /// Returns the placement of an item, if `id` is a live item.
    #[must_use]
    pub fn placement(&self, id: NodeId) -> Option<Placement> {
        self.inner.borrow().get(id)?.placement
    }

    /// Sets an item's size. Size has no dual frame; it is stored verbatim.
    pub fn set_size(&mut self, id: NodeId, size: Size) -> bool {
        match self.inner.get_mut().get_mut(id).and_then(|n| n.placement.as_mut()) {
            Some(pl) => {
                pl.size = size;
                true
            }
            None => false,
        }
    }

    /// User-initiated local write.
    ///
    /// Writes the local position, marks the item pending, and emits
    /// [`SyncEvent::LayoutInvalidated`]; the global recomputation happens in
    /// the settle pass, where it can observe the settled layout.
    pub fn set_local(
        &self,
        id: NodeId,
        local: Point,
        emit: &mut dyn FnMut(SyncEvent),
    ) -> SyncOutcome {
        if self.guard.replace(true) {
            return SyncOutcome::Dropped;
        }
        let mut events = Events::new();
        let outcome = self.inner.borrow_mut().set_local(self.root, id, local, &mut events);
        for ev in events {
            emit(ev);
        }
        self.guard.set(false);
        outcome
    }

    /// Global write from an overlay/adorner layer.
    ///
    /// Resolves the parent chain's transforms, writes the equivalent local
    /// position through the normal write path, and marks the item pending
    /// for verification on the next settle pass.
    pub fn set_global(
        &self,
        id: NodeId,
        global: Point,
        emit: &mut dyn FnMut(SyncEvent),
    ) -> SyncOutcome {
        if self.guard.replace(true) {
            return SyncOutcome::Dropped;
        }
        let mut events = Events::new();
        let outcome = self.inner.borrow_mut().set_global(self.root, id, global, &mut events);
        for ev in events {
            emit(ev);
        }
        self.guard.set(false);
        outcome
    }

    /// Reconciles one item against the settled layout.
    ///
    /// Completes a deferred global recomputation and, in read-only mode,
    /// updates the local position from the actual resolved offset — the
    /// item may have moved without either property changing explicitly,
    /// for example when a sibling's resize shifted it. This path never
    /// invalidates layout or re-marks the item pending.
    pub fn on_layout_settled(&self, id: NodeId, emit: &mut dyn FnMut(SyncEvent)) -> SyncOutcome {
        if self.guard.replace(true) {
            return SyncOutcome::Dropped;
        }
        let mut events = Events::new();
        let outcome = self.inner.borrow_mut().settle(self.root, id, &mut events);
        for ev in events {
            emit(ev);
        }
        self.guard.set(false);
        outcome
    }

    /// Reconciles every tracked item against the settled layout.
    ///
    /// Returns the number of items that had a position written.
    pub fn settle_all(&self, emit: &mut dyn FnMut(SyncEvent)) -> usize {
        if self.guard.replace(true) {
            return 0;
        }
        let mut events = Events::new();
        let mut applied = 0;
        {
            let mut inner = self.inner.borrow_mut();
            let items: Vec<NodeId> = inner.item_ids().collect();
            for id in items {
                if inner.settle(self.root, id, &mut events) == SyncOutcome::Applied {
                    applied += 1;
                }
            }
        }
        for ev in events {
            emit(ev);
        }
        self.guard.set(false);
        applied
    }
}

impl Inner {
    fn alloc(&mut self, node: Node) -> NodeId {
        if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.node = Some(node);
            NodeId::new(idx, slot.generation)
        } else {
            let idx = u32::try_from(self.slots.len()).expect("slot index fits in u32");
            self.slots.push(Slot {
                generation: 1,
                node: Some(node),
            });
            NodeId::new(idx, 1)
        }
    }

    fn get(&self, id: NodeId) -> Option<&Node> {
        let slot = self.slots.get(id.idx())?;
        if slot.generation != id.1 {
            return None;
        }
        slot.node.as_ref()
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let slot = self.slots.get_mut(id.idx())?;
        if slot.generation != id.1 {
            return None;
        }
        slot.node.as_mut()
    }

    fn item_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.slots.iter().enumerate().filter_map(|(idx, slot)| {
            let node = slot.node.as_ref()?;
            node.placement?;
            Some(NodeId::new(
                u32::try_from(idx).expect("slot index fits in u32"),
                slot.generation,
            ))
        })
    }

    /// Composes resolved transforms from `id`'s own space up to root space.
    ///
    /// Returns `None` when the chain does not reach the root (detached or
    /// stale link). The walk is capped at the slot count, so a corrupted
    /// cyclic chain degrades to "detached" rather than spinning.
    fn transform_to_root(&self, root: NodeId, id: NodeId) -> Option<Affine> {
        let mut acc = Affine::IDENTITY;
        let mut cur = id;
        for _ in 0..=self.slots.len() {
            if cur == root {
                return Some(acc);
            }
            let node = self.get(cur)?;
            acc = node.resolved * acc;
            cur = node.parent?;
        }
        None
    }

    fn set_local(
        &mut self,
        root: NodeId,
        id: NodeId,
        local: Point,
        events: &mut Events,
    ) -> SyncOutcome {
        let Some(node) = self.get(id) else {
            return SyncOutcome::Detached;
        };
        let Some(parent) = node.parent else {
            return SyncOutcome::Detached;
        };
        if node.placement.is_none() || self.transform_to_root(root, parent).is_none() {
            return SyncOutcome::Detached;
        }

        let node = self.get_mut(id).expect("node checked above");
        let pl = node.placement.as_mut().expect("placement checked above");
        if (local - pl.local).hypot() <= POSITION_EPSILON {
            return SyncOutcome::Unchanged;
        }
        pl.local = local;
        events.push(SyncEvent::LocalChanged { id, local });
        events.push(SyncEvent::LayoutInvalidated(id));
        if !self.pending.contains(&id) {
            self.pending.push(id);
        }
        SyncOutcome::Applied
    }

    fn set_global(
        &mut self,
        root: NodeId,
        id: NodeId,
        global: Point,
        events: &mut Events,
    ) -> SyncOutcome {
        let Some(node) = self.get(id) else {
            return SyncOutcome::Detached;
        };
        if node.placement.is_none() {
            return SyncOutcome::Detached;
        }
        let Some(parent) = node.parent else {
            return SyncOutcome::Detached;
        };
        let Some(parent_to_root) = self.transform_to_root(root, parent) else {
            return SyncOutcome::Detached;
        };

        let local = parent_to_root.inverse() * global;
        let node = self.get_mut(id).expect("node checked above");
        let pl = node.placement.as_mut().expect("placement checked above");
        if (global - pl.global).hypot() <= POSITION_EPSILON {
            return SyncOutcome::Unchanged;
        }
        pl.global = global;
        events.push(SyncEvent::GlobalChanged { id, global });
        if (local - pl.local).hypot() > POSITION_EPSILON {
            pl.local = local;
            // Keep the item's own resolved offset in step until the layout
            // collaborator rewrites it after the next pass.
            node.resolved = Affine::translate(local.to_vec2());
            events.push(SyncEvent::LocalChanged { id, local });
            events.push(SyncEvent::LayoutInvalidated(id));
            if !self.pending.contains(&id) {
                self.pending.push(id);
            }
        }
        SyncOutcome::Applied
    }

    fn settle(&mut self, root: NodeId, id: NodeId, events: &mut Events) -> SyncOutcome {
        let Some(node) = self.get(id) else {
            return SyncOutcome::Detached;
        };
        if node.placement.is_none() {
            return SyncOutcome::Detached;
        }
        let Some(to_root) = self.transform_to_root(root, id) else {
            // Leave the item pending; it resyncs once reattached.
            return SyncOutcome::Detached;
        };

        let global = to_root * Point::ZERO;
        let actual_local = node.resolved.translation().to_point();
        let node = self.get_mut(id).expect("node checked above");
        let pl = node.placement.as_mut().expect("placement checked above");

        let mut applied = false;
        if (global - pl.global).hypot() > POSITION_EPSILON {
            pl.global = global;
            events.push(SyncEvent::GlobalChanged { id, global });
            applied = true;
        }
        if (actual_local - pl.local).hypot() > POSITION_EPSILON {
            pl.local = actual_local;
            events.push(SyncEvent::LocalChanged {
                id,
                local: actual_local,
            });
            applied = true;
        }
        self.pending.retain(|p| *p != id);
        if applied {
            SyncOutcome::Applied
        } else {
            SyncOutcome::Unchanged
        }
    }
}
