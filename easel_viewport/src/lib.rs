// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=easel_viewport --heading-base-level=0

//! Easel Viewport: pan/zoom viewport primitives for an infinite design surface.
//!
//! This crate provides a small, headless model of a pannable, zoomable view
//! over a world-space plane. It focuses on:
//! - Viewport state (pan offset in world units + uniform zoom factor).
//! - Coordinate conversion between screen/device space and world space.
//! - Zoom about the pointer, keeping the world point under the cursor fixed.
//! - A composed render transform, including a device-pixel-snapped variant
//!   for crisp grid and overlay graphics.
//!
//! It does **not** own any scene graph, rendering backend, or input loop.
//! Callers are expected to:
//! - Wire wheel and drag input into [`Viewport::apply_zoom_delta`] and
//!   [`Viewport::pan`] at a higher layer.
//! - Hand [`Viewport::render_transform`] to their rendering collaborator.
//! - Use the conversion helpers for hit testing and marquee math.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Point;
//! use easel_viewport::{Viewport, ZoomDirection};
//!
//! let mut view = Viewport::new();
//!
//! // Wheel-zoom in, anchored at the pointer.
//! let pointer = Point::new(400.0, 300.0);
//! let before = view.screen_to_world(pointer);
//! view.apply_zoom_delta(ZoomDirection::In, pointer);
//! let after = view.screen_to_world(pointer);
//!
//! // The world point under the pointer did not move.
//! assert!((after - before).hypot() < 1e-9);
//! ```
//!
//! ## Design notes
//!
//! - The viewport is axis-aligned with a **uniform** zoom factor; the
//!   mapping is `world = screen / zoom + offset`.
//! - The zoom-to-pointer correction is computed with the *old* zoom and
//!   applied atomically with the new one, so there is no visible jump.
//! - A small epsilon suppresses micro-jitter when wheel input arrives at
//!   the zoom limits.
//! - Rotation is intentionally left out; interaction controllers live in
//!   higher-level crates built on top of this one.
//!
//! This crate is `no_std`.

#![no_std]

mod viewport;

pub use viewport::{Viewport, ViewportDebugInfo, ZoomDirection, ZOOM_STEP};
