// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Multiplicative zoom step applied per wheel notch.
pub const ZOOM_STEP: f64 = 1.1;

/// Zoom changes smaller than this are ignored.
///
/// Wheel input arriving while the zoom sits at a limit would otherwise
/// produce tiny offset corrections every notch, causing visible jitter.
const ZOOM_EPSILON: f64 = 1e-6;

const DEFAULT_MIN_ZOOM: f64 = 1e-3;
const DEFAULT_MAX_ZOOM: f64 = 1e3;

/// Direction of a wheel zoom step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomDirection {
    /// Zoom in (wheel up): magnify by [`ZOOM_STEP`].
    In,
    /// Zoom out (wheel down): shrink by [`ZOOM_STEP`].
    Out,
}

impl ZoomDirection {
    /// The multiplicative factor for one step in this direction.
    #[must_use]
    pub fn factor(self) -> f64 {
        match self {
            Self::In => ZOOM_STEP,
            Self::Out => 1.0 / ZOOM_STEP,
        }
    }
}

/// Pan/zoom viewport over a world-space plane.
///
/// `Viewport` tracks a pan offset (in world units) and a uniform zoom
/// factor, mapping screen coordinates into world coordinates as
/// `world = screen / zoom + offset`. It can be used to:
/// - Convert points and rectangles between screen and world space.
/// - Pan by screen-space deltas and zoom about a chosen pointer position.
/// - Derive the composed world-to-screen transform for rendering.
#[derive(Clone, Debug)]
pub struct Viewport {
    offset: Vec2,
    zoom: f64,
    min_zoom: f64,
    max_zoom: f64,
    world_to_screen: Affine,
    screen_to_world: Affine,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewport {
    /// Creates a viewport with zero offset, unit zoom, and default zoom limits.
    ///
    /// Zoom is clamped to the range `[1e-3, 1e3]` by default.
    #[must_use]
    pub fn new() -> Self {
        let mut vp = Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            world_to_screen: Affine::IDENTITY,
            screen_to_world: Affine::IDENTITY,
        };
        vp.rebuild_transforms();
        vp
    }

    /// Returns the current pan offset in world units.
    #[must_use]
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Sets the pan offset in world units.
    ///
    /// Used by interaction controllers that derive an absolute offset from a
    /// press-time snapshot rather than accumulating per-frame deltas.
    pub fn set_offset(&mut self, offset: Vec2) {
        if self.offset == offset {
            return;
        }
        self.offset = offset;
        self.rebuild_transforms();
    }

    /// Returns the current uniform zoom factor.
    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Sets the minimum and maximum zoom factors.
    ///
    /// The provided range is normalized so that `min_zoom <= max_zoom`. The
    /// current zoom is clamped into the new range.
    pub fn set_zoom_limits(&mut self, min_zoom: f64, max_zoom: f64) {
        let (min_zoom, max_zoom) = if min_zoom <= max_zoom {
            (min_zoom, max_zoom)
        } else {
            (max_zoom, min_zoom)
        };
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self.set_zoom(self.zoom);
    }

    /// Sets the zoom factor, clamping it into the configured zoom range.
    ///
    /// This does not adjust the offset; use [`Viewport::apply_zoom_delta`]
    /// to zoom about a pointer position.
    pub fn set_zoom(&mut self, zoom: f64) {
        let clamped = zoom.clamp(self.min_zoom, self.max_zoom);
        if (self.zoom - clamped).abs() <= ZOOM_EPSILON {
            return;
        }
        self.zoom = clamped;
        self.rebuild_transforms();
    }

    /// Applies one wheel zoom step anchored at a screen-space pointer position.
    ///
    /// The world point under the pointer is invariant across the change: the
    /// offset correction is computed with the *old* zoom and committed
    /// atomically with the new zoom, so the content never jumps under the
    /// cursor. Steps that would not change the zoom beyond a small epsilon
    /// (typically because a limit was reached) leave the viewport untouched.
    pub fn apply_zoom_delta(&mut self, direction: ZoomDirection, pointer_screen: Point) {
        self.zoom_about(direction.factor(), pointer_screen);
    }

    /// Zooms by an arbitrary factor about a screen-space anchor.
    ///
    /// Generalization of [`Viewport::apply_zoom_delta`] for pinch gestures
    /// and programmatic zoom; the world point under the anchor stays fixed.
    pub fn zoom_about(&mut self, factor: f64, anchor_screen: Point) {
        if factor <= 0.0 {
            return;
        }
        let new_zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() <= ZOOM_EPSILON {
            return;
        }

        let anchor = anchor_screen.to_vec2();
        self.offset += anchor / self.zoom - anchor / new_zoom;
        self.zoom = new_zoom;
        self.rebuild_transforms();
    }

    /// Pans by a screen-space delta.
    ///
    /// The delta is divided by the zoom factor so pan speed tracks the visual
    /// content regardless of zoom level.
    pub fn pan(&mut self, screen_delta: Vec2) {
        if screen_delta == Vec2::ZERO {
            return;
        }
        self.offset += screen_delta / self.zoom;
        self.rebuild_transforms();
    }

    /// Converts a screen-space point into world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, pt: Point) -> Point {
        self.screen_to_world * pt
    }

    /// Converts a world-space point into screen coordinates.
    #[must_use]
    pub fn world_to_screen(&self, pt: Point) -> Point {
        self.world_to_screen * pt
    }

    /// Converts a screen-space rectangle into world coordinates.
    #[must_use]
    pub fn screen_to_world_rect(&self, rect: Rect) -> Rect {
        // The transform is axis-aligned with uniform scale, so converting the
        // two extreme corners is exact.
        Rect::from_points(
            self.screen_to_world(rect.origin()),
            self.screen_to_world(Point::new(rect.max_x(), rect.max_y())),
        )
    }

    /// Converts a world-space rectangle into screen coordinates.
    #[must_use]
    pub fn world_to_screen_rect(&self, rect: Rect) -> Rect {
        Rect::from_points(
            self.world_to_screen(rect.origin()),
            self.world_to_screen(Point::new(rect.max_x(), rect.max_y())),
        )
    }

    /// Returns the world-space rectangle visible through a view of the given size.
    #[must_use]
    pub fn visible_world_rect(&self, view_size: Size) -> Rect {
        self.screen_to_world_rect(Rect::from_origin_size(Point::ORIGIN, view_size))
    }

    /// Returns the composed world-to-screen transform (scale, then translate).
    ///
    /// Hand this to the rendering collaborator; content drawn in world units
    /// lands at the correct screen position under the current pan and zoom.
    #[must_use]
    pub fn render_transform(&self) -> Affine {
        self.world_to_screen
    }

    /// Returns the render transform with its translation snapped to device pixels.
    ///
    /// `device_scale` is the device-pixel-per-logical-pixel ratio of the
    /// render target. Snapping the translation prevents sub-pixel blur of
    /// grid lines and overlay graphics drawn through this transform. A
    /// non-positive scale returns the unsnapped transform.
    #[must_use]
    pub fn snapped_render_transform(&self, device_scale: f64) -> Affine {
        if device_scale <= 0.0 {
            return self.world_to_screen;
        }
        let translation = (self.world_to_screen.translation() * device_scale).round() / device_scale;
        Affine::scale(self.zoom).then_translate(translation)
    }

    /// Returns the current world-units-per-pixel ratio.
    ///
    /// This is `1.0 / zoom` for the uniform zoom model used here and can be
    /// used to choose grid spacing or hit-test slop in world units.
    #[must_use]
    pub fn world_units_per_pixel(&self) -> f64 {
        1.0 / self.zoom
    }

    /// Snapshot of the current viewport state for debugging and inspection.
    #[must_use]
    pub fn debug_info(&self) -> ViewportDebugInfo {
        ViewportDebugInfo {
            offset: self.offset,
            zoom: self.zoom,
            min_zoom: self.min_zoom,
            max_zoom: self.max_zoom,
        }
    }

    fn rebuild_transforms(&mut self) {
        // World → screen: scale first, then translate by the scaled offset.
        self.world_to_screen = Affine::scale(self.zoom).then_translate(-self.offset * self.zoom);
        self.screen_to_world = self.world_to_screen.inverse();
    }
}

/// Debug snapshot of a [`Viewport`] state.
#[derive(Clone, Copy, Debug)]
pub struct ViewportDebugInfo {
    /// Current pan offset in world units.
    pub offset: Vec2,
    /// Current uniform zoom factor.
    pub zoom: f64,
    /// Minimum zoom factor.
    pub min_zoom: f64,
    /// Maximum zoom factor.
    pub max_zoom: f64,
}
