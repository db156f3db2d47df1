// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-canvas interaction machine: idle, panning, and marquee selection.

use core::marker::PhantomData;

use kurbo::{Point, Rect, Vec2};

use easel_selection::Selection;
use easel_viewport::{Viewport, ZoomDirection};

use crate::stack::StateStack;
use crate::types::{ItemEvent, Modifiers, PointerButton};

#[derive(Debug, Clone, Copy, PartialEq)]
enum CanvasState {
    Idle,
    Panning {
        press_screen: Point,
        start_offset: Vec2,
    },
    Marquee {
        anchor_world: Point,
        area: Rect,
    },
}

/// Interaction state machine for the canvas itself.
///
/// Handles the gestures that do not target a specific item: panning the
/// viewport and marquee (rubber-band) selection. It also owns the group-drag
/// relay: when a dragged item's per-frame delta bubbles up, the canvas moves
/// every other selected item by the same amount, so multi-select drag works
/// without any item machine knowing about the selection.
#[derive(Debug, Clone)]
pub struct CanvasMachine<K> {
    stack: StateStack<CanvasState>,
    _key: PhantomData<K>,
}

impl<K> Default for CanvasMachine<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> CanvasMachine<K> {
    /// Creates an idle canvas machine.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stack: StateStack::new(CanvasState::Idle),
            _key: PhantomData,
        }
    }

    /// Whether no canvas gesture is in progress.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self.stack.current(), CanvasState::Idle)
    }

    /// Whether a pan gesture is in progress.
    #[must_use]
    pub fn is_panning(&self) -> bool {
        matches!(self.stack.current(), CanvasState::Panning { .. })
    }

    /// Whether a marquee selection is in progress.
    #[must_use]
    pub fn is_marquee_selecting(&self) -> bool {
        matches!(self.stack.current(), CanvasState::Marquee { .. })
    }

    /// The marquee rectangle in world coordinates, or [`Rect::ZERO`] when no
    /// marquee is in progress.
    #[must_use]
    pub fn selected_area(&self) -> Rect {
        match self.stack.current() {
            CanvasState::Marquee { area, .. } => *area,
            _ => Rect::ZERO,
        }
    }

    /// Wheel input. Always zooms, whatever gesture is in progress.
    pub fn on_wheel(&self, viewport: &mut Viewport, direction: ZoomDirection, pointer_screen: Point) {
        viewport.apply_zoom_delta(direction, pointer_screen);
    }

    /// Pointer press on the canvas.
    ///
    /// The middle button, or the primary button with the pan modifier,
    /// starts a pan. A plain primary press over empty canvas space starts a
    /// marquee; without the multi-select modifier the existing selection
    /// (and with it the active item) is cleared immediately. Returns `true`
    /// when the press was consumed and the caller should capture the
    /// pointer.
    pub fn on_pointer_press(
        &mut self,
        viewport: &Viewport,
        position_screen: Point,
        button: PointerButton,
        modifiers: Modifiers,
        over_item: bool,
        selection: &mut Selection<K>,
    ) -> bool {
        if !self.is_idle() {
            return false;
        }
        let pan = button == PointerButton::Middle
            || (button == PointerButton::Primary && modifiers.pan());
        if pan {
            self.stack.push(CanvasState::Panning {
                press_screen: position_screen,
                start_offset: viewport.offset(),
            });
            return true;
        }
        if button == PointerButton::Primary && !over_item {
            let anchor = viewport.screen_to_world(position_screen);
            if !modifiers.multi_select() {
                selection.clear();
            }
            self.stack.push(CanvasState::Marquee {
                anchor_world: anchor,
                area: Rect::from_points(anchor, anchor),
            });
            return true;
        }
        false
    }

    /// Pointer move while the canvas holds capture.
    pub fn on_pointer_move(&mut self, viewport: &mut Viewport, position_screen: Point) {
        match self.stack.current_mut() {
            CanvasState::Panning {
                press_screen,
                start_offset,
            } => {
                // Dragging moves the viewport opposite to the pointer,
                // scaled so pan speed tracks the content at any zoom.
                let offset = *start_offset + (*press_screen - position_screen) / viewport.zoom();
                viewport.set_offset(offset);
            }
            CanvasState::Marquee { anchor_world, area } => {
                let current = viewport.screen_to_world(position_screen);
                *area = Rect::from_points(*anchor_world, current);
            }
            CanvasState::Idle => {}
        }
    }

    /// Pointer capture was lost. Unwinds to idle; a half-built marquee is
    /// discarded without committing a selection.
    pub fn capture_lost(&mut self) {
        self.stack.unwind();
    }
}

impl<K: PartialEq> CanvasMachine<K> {
    /// Pointer release while the canvas holds capture.
    ///
    /// Ends a pan, or commits a marquee: every item whose world bounds
    /// intersect the marquee becomes selected, under one selection batch so
    /// observers see a single change. Without the multi-select modifier the
    /// commit replaces the selection. `item_bounds` supplies the world-space
    /// bounds of every candidate item; a pan release ignores it.
    pub fn on_pointer_release<I>(
        &mut self,
        modifiers: Modifiers,
        selection: &mut Selection<K>,
        item_bounds: I,
    ) where
        I: IntoIterator<Item = (K, Rect)>,
    {
        match *self.stack.current() {
            CanvasState::Marquee { area, .. } => {
                selection.batch(|sel| {
                    if !modifiers.multi_select() {
                        sel.clear();
                    }
                    for (key, bounds) in item_bounds {
                        if area.overlaps(bounds) {
                            sel.select(key);
                        }
                    }
                });
                self.stack.pop();
            }
            CanvasState::Panning { .. } => {
                self.stack.pop();
            }
            CanvasState::Idle => {}
        }
    }

    /// Relays a dragged item's per-frame delta to the rest of the selection.
    ///
    /// While the canvas itself is idle, every other selected item is moved
    /// by the same frame delta through `move_other`; the caller skips keys
    /// that are not draggable. Other item events pass through untouched.
    pub fn relay_item_event(
        &self,
        event: &ItemEvent<K>,
        selection: &Selection<K>,
        mut move_other: impl FnMut(&K, Vec2),
    ) {
        if !self.is_idle() {
            return;
        }
        if let ItemEvent::DragDelta { item, delta } = event {
            for key in selection.iter() {
                if key != item {
                    move_other(key, *delta);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Rect, Vec2};

    use easel_selection::Selection;
    use easel_viewport::Viewport;

    use super::CanvasMachine;
    use crate::types::{Modifiers, PointerButton};

    #[test]
    fn pan_tracks_pointer_inverse_scaled_by_zoom() {
        let mut canvas = CanvasMachine::<u32>::new();
        let mut viewport = Viewport::new();
        viewport.set_zoom(2.0);
        viewport.set_offset(Vec2::new(100.0, 100.0));
        let mut selection = Selection::new();

        canvas.on_pointer_press(
            &viewport,
            Point::new(40.0, 40.0),
            PointerButton::Middle,
            Modifiers::empty(),
            false,
            &mut selection,
        );
        canvas.on_pointer_move(&mut viewport, Point::new(60.0, 30.0));

        // (press - current) / zoom = (-20, 10) / 2 = (-10, 5).
        assert_eq!(viewport.offset(), Vec2::new(90.0, 105.0));
        assert!(canvas.is_panning());

        canvas.on_pointer_release(Modifiers::empty(), &mut selection, []);
        assert!(canvas.is_idle());
    }

    #[test]
    fn alt_primary_press_also_pans() {
        let mut canvas = CanvasMachine::<u32>::new();
        let viewport = Viewport::new();
        let mut selection = Selection::new();

        let handled = canvas.on_pointer_press(
            &viewport,
            Point::ZERO,
            PointerButton::Primary,
            Modifiers::ALT,
            false,
            &mut selection,
        );

        assert!(handled);
        assert!(canvas.is_panning());
    }

    #[test]
    fn press_over_item_is_not_consumed() {
        let mut canvas = CanvasMachine::<u32>::new();
        let viewport = Viewport::new();
        let mut selection = Selection::new();

        let handled = canvas.on_pointer_press(
            &viewport,
            Point::ZERO,
            PointerButton::Primary,
            Modifiers::empty(),
            true,
            &mut selection,
        );

        assert!(!handled);
        assert!(canvas.is_idle());
    }

    #[test]
    fn marquee_area_is_the_aabb_in_any_drag_direction() {
        let mut canvas = CanvasMachine::<u32>::new();
        let mut viewport = Viewport::new();
        let mut selection = Selection::new();

        canvas.on_pointer_press(
            &viewport,
            Point::new(30.0, 40.0),
            PointerButton::Primary,
            Modifiers::empty(),
            false,
            &mut selection,
        );
        // Drag up and to the left of the anchor.
        canvas.on_pointer_move(&mut viewport, Point::new(10.0, 15.0));

        assert_eq!(canvas.selected_area(), Rect::new(10.0, 15.0, 30.0, 40.0));
    }

    #[test]
    fn selected_area_is_zero_outside_marquee() {
        let canvas = CanvasMachine::<u32>::new();
        assert_eq!(canvas.selected_area(), Rect::ZERO);
    }

    #[test]
    fn unmodified_marquee_press_clears_selection_immediately() {
        let mut canvas = CanvasMachine::<u32>::new();
        let viewport = Viewport::new();
        let mut selection = Selection::new();
        selection.select(7);

        canvas.on_pointer_press(
            &viewport,
            Point::ZERO,
            PointerButton::Primary,
            Modifiers::empty(),
            false,
            &mut selection,
        );

        assert!(selection.is_empty());
    }

    #[test]
    fn modified_marquee_extends_the_selection() {
        let mut canvas = CanvasMachine::<u32>::new();
        let mut viewport = Viewport::new();
        let mut selection = Selection::new();
        selection.select(7);

        canvas.on_pointer_press(
            &viewport,
            Point::ZERO,
            PointerButton::Primary,
            Modifiers::SHIFT,
            false,
            &mut selection,
        );
        canvas.on_pointer_move(&mut viewport, Point::new(20.0, 20.0));
        canvas.on_pointer_release(
            Modifiers::SHIFT,
            &mut selection,
            [(1, Rect::new(5.0, 5.0, 15.0, 15.0))],
        );

        assert_eq!(selection.items(), &[7, 1]);
    }

    #[test]
    fn capture_loss_discards_the_marquee() {
        let mut canvas = CanvasMachine::<u32>::new();
        let mut viewport = Viewport::new();
        let mut selection = Selection::new();

        canvas.on_pointer_press(
            &viewport,
            Point::ZERO,
            PointerButton::Primary,
            Modifiers::empty(),
            false,
            &mut selection,
        );
        canvas.on_pointer_move(&mut viewport, Point::new(50.0, 50.0));
        canvas.capture_lost();

        assert!(canvas.is_idle());
        assert_eq!(canvas.selected_area(), Rect::ZERO);
        assert!(selection.is_empty());
    }
}
