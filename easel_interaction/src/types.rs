// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared pointer-input vocabulary and the capability traits items implement.

use kurbo::{Point, Size, Vec2};

/// Pointer buttons the interaction machines distinguish.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    /// The primary button (usually left).
    Primary,
    /// The secondary button (usually right).
    Secondary,
    /// The middle button / wheel press.
    Middle,
}

bitflags::bitflags! {
    /// Keyboard modifiers active during a pointer event.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Modifiers: u8 {
        /// Shift key.
        const SHIFT = 1 << 0;
        /// Control key (Command on macOS hosts, mapped by the embedder).
        const CTRL = 1 << 1;
        /// Alt/Option key.
        const ALT = 1 << 2;
    }
}

impl Modifiers {
    /// Whether a multi-select modifier is held.
    ///
    /// Either Shift or Ctrl extends/toggles the selection instead of
    /// replacing it.
    #[must_use]
    pub fn multi_select(self) -> bool {
        self.intersects(Self::SHIFT | Self::CTRL)
    }

    /// Whether the pan modifier is held.
    ///
    /// Alt plus the primary button pans, as an alternative to the middle
    /// button.
    #[must_use]
    pub fn pan(self) -> bool {
        self.contains(Self::ALT)
    }
}

/// One of the eight resize handles on an item's adorner, named by compass
/// direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResizeHandle {
    /// Top edge.
    North,
    /// Top-right corner.
    NorthEast,
    /// Right edge.
    East,
    /// Bottom-right corner.
    SouthEast,
    /// Bottom edge.
    South,
    /// Bottom-left corner.
    SouthWest,
    /// Left edge.
    West,
    /// Top-left corner.
    NorthWest,
}

impl ResizeHandle {
    /// Horizontal sense of this handle: `-1` for the near (left) edge, `1`
    /// for the far (right) edge, `0` when the handle leaves width alone.
    #[must_use]
    pub fn horizontal(self) -> i8 {
        match self {
            Self::West | Self::NorthWest | Self::SouthWest => -1,
            Self::East | Self::NorthEast | Self::SouthEast => 1,
            Self::North | Self::South => 0,
        }
    }

    /// Vertical sense of this handle: `-1` for the near (top) edge, `1` for
    /// the far (bottom) edge, `0` when the handle leaves height alone.
    #[must_use]
    pub fn vertical(self) -> i8 {
        match self {
            Self::North | Self::NorthWest | Self::NorthEast => -1,
            Self::South | Self::SouthWest | Self::SouthEast => 1,
            Self::West | Self::East => 0,
        }
    }
}

/// Notifications raised by an item's interaction machine.
///
/// These bubble to the canvas, which uses [`DragDelta`](Self::DragDelta) to
/// move the rest of the selection in lockstep. Collaborators such as
/// alignment guides can observe the same stream.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ItemEvent<K> {
    /// A drag gesture crossed the movement threshold and began.
    DragStarted {
        /// The dragged item.
        item: K,
    },
    /// The dragged item moved this frame.
    DragDelta {
        /// The dragged item.
        item: K,
        /// This frame's incremental change only, not the running total.
        delta: Vec2,
    },
    /// A drag gesture ended.
    DragCompleted {
        /// The dragged item.
        item: K,
        /// Total displacement from drag start to drag end.
        total_delta: Vec2,
    },
    /// A resize gesture began on one of the eight handles.
    ResizeStarted {
        /// The resized item.
        item: K,
        /// The handle being dragged.
        handle: ResizeHandle,
    },
    /// The resized item changed this frame.
    ResizeDelta {
        /// The resized item.
        item: K,
        /// Committed position after clamping and rounding.
        position: Point,
        /// Committed size after clamping and rounding.
        size: Size,
    },
    /// A resize gesture ended.
    ResizeCompleted {
        /// The resized item.
        item: K,
        /// Final committed position.
        position: Point,
        /// Final committed size.
        size: Size,
    },
}

/// An item whose position the interaction machines may read and write.
///
/// Positions are in the item's immediate container's coordinate space.
pub trait Positionable {
    /// Current position.
    fn position(&self) -> Point;
    /// Moves the item.
    fn set_position(&mut self, position: Point);
}

/// An item whose size the interaction machines may read and write.
pub trait Resizable: Positionable {
    /// The actual rendered size, with any "auto" dimension resolved to the
    /// concrete value layout produced.
    fn resolved_size(&self) -> Size;
    /// Fixes the size explicitly.
    fn set_size(&mut self, size: Size);
}

#[cfg(test)]
mod tests {
    use super::{Modifiers, ResizeHandle};

    #[test]
    fn either_modifier_extends_selection() {
        assert!(Modifiers::SHIFT.multi_select());
        assert!(Modifiers::CTRL.multi_select());
        assert!((Modifiers::SHIFT | Modifiers::ALT).multi_select());
        assert!(!Modifiers::ALT.multi_select());
        assert!(!Modifiers::empty().multi_select());
    }

    #[test]
    fn handle_senses_cover_all_eight_directions() {
        use ResizeHandle::*;
        for (handle, h, v) in [
            (North, 0, -1),
            (NorthEast, 1, -1),
            (East, 1, 0),
            (SouthEast, 1, 1),
            (South, 0, 1),
            (SouthWest, -1, 1),
            (West, -1, 0),
            (NorthWest, -1, -1),
        ] {
            assert_eq!(handle.horizontal(), h, "{handle:?}");
            assert_eq!(handle.vertical(), v, "{handle:?}");
        }
    }
}
