// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=easel_placement --heading-base-level=0

//! Easel Placement: dual-frame placement synchronization over a container tree.
//!
//! Every item on a design surface carries two positions: a **local** one,
//! relative to its immediate container, and a **global** one, relative to
//! the canvas root. The two are linked through the resolved layout geometry
//! of every intermediate container, which may translate, center, or align
//! its children, so neither side can be derived from the other by simple
//! addition. This crate keeps them consistent.
//!
//! The core type is [`SyncGraph`], a per-canvas graph that tracks:
//! - A tree of containers with generational [`NodeId`] handles and a
//!   resolved post-layout transform per node, written by the external
//!   layout collaborator after each layout pass.
//! - A [`Placement`] (local position, global position, size) per item.
//! - A **pending set** of items whose global position must be recomputed
//!   once layout settles, because container layout is not a pure function
//!   evaluable mid-pass.
//! - A graph-wide **re-entrancy guard**: while one synchronization
//!   operation runs, nested triggers from the same logical change are
//!   dropped, not queued. This breaks the cycle where writing a local
//!   position invalidates layout, layout settles, and the settle pass would
//!   otherwise re-trigger the local write.
//!
//! ## Operations
//!
//! - [`SyncGraph::set_local`]: a user-initiated local write. Records the new
//!   local position, marks the item pending, and asks the host to re-run
//!   layout. The global recomputation is deferred to the settle pass.
//! - [`SyncGraph::set_global`]: the inverse write, for overlay/adorner
//!   layers that drag a global-space handle. Resolves the parent chain's
//!   transforms and writes the equivalent local position.
//! - [`SyncGraph::on_layout_settled`] / [`SyncGraph::settle_all`]: invoked
//!   by the host after a layout pass. Completes deferred recomputations and
//!   reconciles local positions from the *actual* resolved geometry in
//!   read-only mode (no layout invalidation, no pending re-enqueue) — an
//!   item may have moved because a sibling's resize shifted it.
//!
//! Writes smaller than [`POSITION_EPSILON`] are suppressed so floating-point
//! rounding can never cause update chatter, and every operation on an item
//! with no path to the canvas root (detached mid-operation) is a silent
//! no-op: the item resyncs once reattached.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Affine, Point, Size, Vec2};
//! use easel_placement::{SyncGraph, SyncEvent};
//!
//! let mut graph = SyncGraph::new();
//! let panel = graph.insert_container(graph.root()).unwrap();
//! let item = graph.insert_item(panel, Point::new(10.0, 10.0), Size::new(40.0, 30.0)).unwrap();
//!
//! // The layout collaborator reports that the panel sits at (100, 50).
//! graph.set_resolved_transform(panel, Affine::translate(Vec2::new(100.0, 50.0)));
//!
//! // A layout pass settles; the item's global position is derived.
//! graph.settle_all(&mut |_ev: SyncEvent| {});
//! assert_eq!(graph.placement(item).unwrap().global, Point::new(110.0, 60.0));
//! ```
//!
//! ## Re-entrancy
//!
//! Synchronization operations take `&self` and deliver events through a
//! caller-supplied sink while the guard is still held. An observer that
//! synchronously calls back into the same graph gets
//! [`SyncOutcome::Dropped`] after at most one level — the in-flight
//! computation already observes the final state, so the nested trigger is
//! redundant by construction. The guard is owned by the graph value; two
//! canvases are two graphs and never share one.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod graph;
mod types;

pub use graph::SyncGraph;
pub use types::{NodeId, Placement, SyncEvent, SyncOutcome, POSITION_EPSILON};
