// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=easel_interaction --heading-base-level=0

//! Easel Interaction: pointer-gesture state machines for a design surface.
//!
//! This crate turns raw pointer events into canvas and item mutations. It
//! provides two stack-based state machines and the vocabulary they share:
//!
//! - [`item::ItemMachine`]: per-item gestures — click selection policy,
//!   threshold-gated dragging, and eight-handle resizing.
//! - [`canvas::CanvasMachine`]: per-canvas gestures — viewport panning,
//!   marquee (rubber-band) selection, wheel zoom routing, and the
//!   group-drag relay that moves a multi-selection in lockstep.
//! - [`stack::StateStack`]: the shared non-empty state stack with an
//!   un-poppable root.
//!
//! The machines know nothing about any UI framework. Pointer positions come
//! in pre-translated (item events in the immediate container's space,
//! canvas events in screen space), item geometry is reached through the
//! small [`Positionable`] and [`Resizable`] capability traits, selection
//! goes through [`easel_selection::Selection`], and the viewport through
//! [`easel_viewport::Viewport`]. Notifications are delivered to a
//! caller-supplied `FnMut` sink instead of a framework event route.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use easel_interaction::{ItemEvent, ItemMachine, Modifiers, PointerButton, Positionable};
//! use easel_selection::Selection;
//!
//! struct Card {
//!     position: Point,
//!     size: Size,
//! }
//!
//! impl Positionable for Card {
//!     fn position(&self) -> Point {
//!         self.position
//!     }
//!     fn set_position(&mut self, position: Point) {
//!         self.position = position;
//!     }
//! }
//!
//! let mut card = Card {
//!     position: Point::new(10.0, 10.0),
//!     size: Size::new(100.0, 60.0),
//! };
//! let mut selection = Selection::<u32>::new();
//! let mut machine = ItemMachine::new(1_u32);
//!
//! // A press selects the item and captures the pointer.
//! machine.on_pointer_press(
//!     Point::new(4.0, 4.0),
//!     PointerButton::Primary,
//!     Modifiers::empty(),
//!     &mut selection,
//! );
//! assert_eq!(selection.active(), Some(&1));
//!
//! // Moving past the threshold starts a drag; the item follows the
//! // pointer's total displacement, rounded to whole units.
//! let mut events = Vec::new();
//! machine.on_pointer_move(Point::new(24.0, 4.0), true, &mut card, &mut |ev| {
//!     events.push(ev);
//! });
//! assert_eq!(card.position, Point::new(30.0, 10.0));
//! assert!(matches!(events[0], ItemEvent::DragStarted { item: 1 }));
//!
//! machine.on_pointer_release(Modifiers::empty(), &mut selection, &mut |ev| {
//!     events.push(ev);
//! });
//! assert!(machine.is_idle());
//! ```
//!
//! ## Design notes
//!
//! - **State stacks**: each machine's states live on a [`stack::StateStack`]
//!   rooted at an idle state that can never be popped. Pushing runs the new
//!   state's enter behavior; popping runs the old state's exit behavior and
//!   then re-enters the newly exposed top, which is how idle resets its
//!   transient press tracking without being replaced.
//! - **Deltas from totals**: drag and resize both derive the committed
//!   geometry from the total displacement since the gesture started, never
//!   from a running sum of per-frame deltas, so intermediate moves cannot
//!   introduce drift.
//! - **Capture loss**: losing pointer capture is the only cancellation
//!   signal. It unwinds the full stack, running each state's exit so a
//!   half-completed gesture still announces its completion; a half-built
//!   marquee is discarded without committing.
//!
//! This crate is `no_std` compatible (with `alloc`).

#![no_std]

extern crate alloc;

pub mod canvas;
pub mod item;
pub mod stack;

mod types;

pub use canvas::CanvasMachine;
pub use item::{ItemMachine, DRAG_THRESHOLD, MIN_ITEM_SIZE};
pub use types::{ItemEvent, Modifiers, PointerButton, Positionable, Resizable, ResizeHandle};
