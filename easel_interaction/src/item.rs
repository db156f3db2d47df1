// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-item interaction machine: idle, dragging, and resizing.

use kurbo::{Point, Size, Vec2};

use easel_selection::Selection;

use crate::stack::StateStack;
use crate::types::{ItemEvent, Modifiers, PointerButton, Positionable, Resizable, ResizeHandle};

/// Pointer movement (in container units) a press must exceed before it
/// becomes a drag rather than a click.
pub const DRAG_THRESHOLD: f64 = 3.0;

/// Smallest width/height a resize gesture can produce.
pub const MIN_ITEM_SIZE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
enum ItemState {
    Idle {
        /// A primary press is held and the pointer is captured.
        pressed: bool,
        /// Press position in the immediate container's space.
        press_point: Point,
        /// The press itself changed the selection, so the matching release
        /// must not toggle it again.
        toggled_on_press: bool,
    },
    Dragging {
        press_point: Point,
        start_position: Point,
        /// Last committed (rounded) position; frame deltas are measured
        /// against this, the committed total always against the start.
        last_position: Point,
    },
    Resizing {
        handle: ResizeHandle,
        start_position: Point,
        start_size: Size,
        /// Sum of per-frame handle deltas. Position and size are always
        /// derived from this total, never incremented, so rounding error
        /// cannot accumulate across frames.
        accumulated: Vec2,
        /// Last committed position.
        position: Point,
        /// Last committed size.
        size: Size,
    },
}

const IDLE: ItemState = ItemState::Idle {
    pressed: false,
    press_point: Point::ZERO,
    toggled_on_press: false,
};

/// Interaction state machine for a single item.
///
/// Owns a state stack rooted at an un-poppable idle state. Pointer events
/// arrive in the immediate container's coordinate space; resize deltas
/// arrive from the adorner layer's handles. Mutations go through the
/// [`Positionable`]/[`Resizable`] capability of the target, and
/// notifications go to a caller-supplied sink.
#[derive(Debug, Clone)]
pub struct ItemMachine<K> {
    key: K,
    stack: StateStack<ItemState>,
}

impl<K: Clone + PartialEq> ItemMachine<K> {
    /// Creates an idle machine for the item identified by `key`.
    #[must_use]
    pub fn new(key: K) -> Self {
        Self {
            key,
            stack: StateStack::new(IDLE),
        }
    }

    /// The key of the item this machine drives.
    #[must_use]
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Whether the machine is idle (no gesture in progress).
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self.stack.current(), ItemState::Idle { .. })
    }

    /// Whether a drag gesture is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.stack.current(), ItemState::Dragging { .. })
    }

    /// Whether a resize gesture is in progress.
    #[must_use]
    pub fn is_resizing(&self) -> bool {
        matches!(self.stack.current(), ItemState::Resizing { .. })
    }

    /// Primary-button press on the item.
    ///
    /// Applies the selection-on-press policy: an unselected item is selected
    /// immediately, replacing the selection unless a multi-select modifier
    /// is held. Returns `true` when the press was consumed and the caller
    /// should capture the pointer.
    pub fn on_pointer_press(
        &mut self,
        position: Point,
        button: PointerButton,
        modifiers: Modifiers,
        selection: &mut Selection<K>,
    ) -> bool {
        if button != PointerButton::Primary {
            return false;
        }
        let ItemState::Idle {
            pressed,
            press_point,
            toggled_on_press,
        } = self.stack.current_mut()
        else {
            return false;
        };
        *pressed = true;
        *press_point = position;
        *toggled_on_press = false;
        if !selection.contains(&self.key) {
            if modifiers.multi_select() {
                selection.select(self.key.clone());
            } else {
                selection.select_only(self.key.clone());
            }
            *toggled_on_press = true;
        }
        true
    }

    /// Pointer move while this item holds capture.
    ///
    /// A held press becomes a drag once it travels past [`DRAG_THRESHOLD`],
    /// but only on a free-positioning surface; items inside stack-like
    /// containers cannot be dragged around.
    pub fn on_pointer_move(
        &mut self,
        position: Point,
        free_surface: bool,
        target: &mut impl Positionable,
        emit: &mut impl FnMut(ItemEvent<K>),
    ) {
        match *self.stack.current() {
            ItemState::Idle {
                pressed: true,
                press_point,
                ..
            } => {
                if free_surface && (position - press_point).hypot() > DRAG_THRESHOLD {
                    let start = target.position();
                    self.stack.push(ItemState::Dragging {
                        press_point,
                        start_position: start,
                        last_position: start,
                    });
                    emit(ItemEvent::DragStarted {
                        item: self.key.clone(),
                    });
                    self.drag_move(position, target, emit);
                }
            }
            ItemState::Dragging { .. } => self.drag_move(position, target, emit),
            _ => {}
        }
    }

    fn drag_move(
        &mut self,
        position: Point,
        target: &mut impl Positionable,
        emit: &mut impl FnMut(ItemEvent<K>),
    ) {
        let key = self.key.clone();
        let ItemState::Dragging {
            press_point,
            start_position,
            last_position,
        } = self.stack.current_mut()
        else {
            return;
        };
        // Total displacement from the press, not a per-frame sum: any path
        // through intermediate moves lands on the same final position.
        let total = position - *press_point;
        let new_position = (*start_position + total).round();
        if new_position != *last_position {
            let delta = new_position - *last_position;
            *last_position = new_position;
            target.set_position(new_position);
            emit(ItemEvent::DragDelta { item: key, delta });
        }
    }

    /// Pointer release while this item holds capture.
    ///
    /// A release that never became a gesture applies the selection-on-release
    /// policy: a modified click toggles (unless the press already changed the
    /// selection), and an unmodified click on a multi-selection collapses it
    /// to just this item.
    pub fn on_pointer_release(
        &mut self,
        modifiers: Modifiers,
        selection: &mut Selection<K>,
        emit: &mut impl FnMut(ItemEvent<K>),
    ) {
        match *self.stack.current() {
            ItemState::Idle {
                pressed: true,
                toggled_on_press,
                ..
            } => {
                if modifiers.multi_select() {
                    if !toggled_on_press {
                        selection.toggle(self.key.clone());
                    }
                } else if selection.contains(&self.key) && selection.len() > 1 {
                    selection.select_only(self.key.clone());
                }
                self.re_enter_idle();
            }
            ItemState::Dragging { .. } | ItemState::Resizing { .. } => self.pop_state(emit),
            ItemState::Idle { pressed: false, .. } => {}
        }
    }

    /// Begins a resize gesture from one of the adorner's handles.
    ///
    /// Resolves any "auto" dimension to the actual rendered size and fixes
    /// it explicitly, so the gesture has a concrete numeric baseline.
    pub fn begin_resize(
        &mut self,
        handle: ResizeHandle,
        target: &mut impl Resizable,
        emit: &mut impl FnMut(ItemEvent<K>),
    ) {
        if !self.is_idle() {
            return;
        }
        let size = target.resolved_size();
        target.set_size(size);
        let position = target.position();
        self.stack.push(ItemState::Resizing {
            handle,
            start_position: position,
            start_size: size,
            accumulated: Vec2::ZERO,
            position,
            size,
        });
        emit(ItemEvent::ResizeStarted {
            item: self.key.clone(),
            handle,
        });
    }

    /// Applies one per-frame delta from the active resize handle.
    ///
    /// Width and height are derived from the accumulated total, clamped to
    /// [`MIN_ITEM_SIZE`], and rounded; near-side handles (left/top) then
    /// shift the position by the amount actually removed from the size, so
    /// the opposite edge stays fixed even under clamping.
    pub fn resize_by(
        &mut self,
        delta: Vec2,
        target: &mut impl Resizable,
        emit: &mut impl FnMut(ItemEvent<K>),
    ) {
        let key = self.key.clone();
        let ItemState::Resizing {
            handle,
            start_position,
            start_size,
            accumulated,
            position,
            size,
        } = self.stack.current_mut()
        else {
            return;
        };
        *accumulated += delta;
        let h = f64::from(handle.horizontal());
        let v = f64::from(handle.vertical());

        let width = (start_size.width + h * accumulated.x)
            .max(MIN_ITEM_SIZE)
            .round();
        let height = (start_size.height + v * accumulated.y)
            .max(MIN_ITEM_SIZE)
            .round();
        let x = if handle.horizontal() < 0 {
            start_position.x + (start_size.width - width)
        } else {
            start_position.x
        };
        let y = if handle.vertical() < 0 {
            start_position.y + (start_size.height - height)
        } else {
            start_position.y
        };

        let new_size = Size::new(width, height);
        let new_position = Point::new(x, y).round();
        if new_size == *size && new_position == *position {
            return;
        }
        *size = new_size;
        *position = new_position;
        target.set_size(new_size);
        target.set_position(new_position);
        emit(ItemEvent::ResizeDelta {
            item: key,
            position: new_position,
            size: new_size,
        });
    }

    /// Ends the active resize gesture, if any.
    pub fn end_resize(&mut self, emit: &mut impl FnMut(ItemEvent<K>)) {
        if self.is_resizing() {
            self.pop_state(emit);
        }
    }

    /// Pointer capture was lost (focus change, device reassignment).
    ///
    /// Unwinds the full stack back to idle, running each state's exit so a
    /// half-completed drag or resize still announces its completion.
    pub fn capture_lost(&mut self, emit: &mut impl FnMut(ItemEvent<K>)) {
        for state in self.stack.unwind() {
            self.exit_state(state, emit);
        }
        self.re_enter_idle();
    }

    fn pop_state(&mut self, emit: &mut impl FnMut(ItemEvent<K>)) {
        if let Some(popped) = self.stack.pop() {
            self.exit_state(popped, emit);
        }
        self.re_enter_idle();
    }

    fn exit_state(&self, state: ItemState, emit: &mut impl FnMut(ItemEvent<K>)) {
        match state {
            ItemState::Dragging {
                start_position,
                last_position,
                ..
            } => emit(ItemEvent::DragCompleted {
                item: self.key.clone(),
                total_delta: last_position - start_position,
            }),
            ItemState::Resizing { position, size, .. } => emit(ItemEvent::ResizeCompleted {
                item: self.key.clone(),
                position,
                size,
            }),
            ItemState::Idle { .. } => {}
        }
    }

    /// Re-entering idle resets the transient press tracking without
    /// replacing the root state object.
    fn re_enter_idle(&mut self) {
        if let ItemState::Idle {
            pressed,
            toggled_on_press,
            ..
        } = self.stack.current_mut()
        {
            *pressed = false;
            *toggled_on_press = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use kurbo::{Point, Size, Vec2};

    use easel_selection::Selection;

    use super::{ItemMachine, DRAG_THRESHOLD};
    use crate::types::{ItemEvent, Modifiers, PointerButton, Positionable, Resizable};

    #[derive(Debug, Clone, Copy)]
    struct Card {
        position: Point,
        size: Size,
    }

    impl Positionable for Card {
        fn position(&self) -> Point {
            self.position
        }
        fn set_position(&mut self, position: Point) {
            self.position = position;
        }
    }

    impl Resizable for Card {
        fn resolved_size(&self) -> Size {
            self.size
        }
        fn set_size(&mut self, size: Size) {
            self.size = size;
        }
    }

    fn card() -> Card {
        Card {
            position: Point::new(20.0, 20.0),
            size: Size::new(100.0, 60.0),
        }
    }

    #[test]
    fn press_on_unselected_item_replaces_selection() {
        let mut machine = ItemMachine::new(1_u32);
        let mut selection = Selection::new();
        selection.select(9);

        let captured = machine.on_pointer_press(
            Point::ZERO,
            PointerButton::Primary,
            Modifiers::empty(),
            &mut selection,
        );

        assert!(captured);
        assert_eq!(selection.items(), &[1]);
    }

    #[test]
    fn modified_press_extends_selection() {
        let mut machine = ItemMachine::new(1_u32);
        let mut selection = Selection::new();
        selection.select(9);

        machine.on_pointer_press(
            Point::ZERO,
            PointerButton::Primary,
            Modifiers::CTRL,
            &mut selection,
        );

        assert_eq!(selection.items(), &[9, 1]);
    }

    #[test]
    fn modified_click_release_does_not_retoggle_a_press_selection() {
        let mut machine = ItemMachine::new(1_u32);
        let mut selection = Selection::new();
        let mut events = Vec::new();

        // The press selected the item; the matching release must leave it in.
        machine.on_pointer_press(
            Point::ZERO,
            PointerButton::Primary,
            Modifiers::SHIFT,
            &mut selection,
        );
        machine.on_pointer_release(Modifiers::SHIFT, &mut selection, &mut |ev| events.push(ev));

        assert!(selection.contains(&1));
        assert!(events.is_empty());
    }

    #[test]
    fn modified_click_on_selected_item_deselects_it() {
        let mut machine = ItemMachine::new(1_u32);
        let mut selection = Selection::new();
        selection.select(1);
        selection.select(2);

        machine.on_pointer_press(
            Point::ZERO,
            PointerButton::Primary,
            Modifiers::SHIFT,
            &mut selection,
        );
        machine.on_pointer_release(Modifiers::SHIFT, &mut selection, &mut |_| {});

        assert_eq!(selection.items(), &[2]);
    }

    #[test]
    fn movement_under_threshold_stays_a_click() {
        let mut machine = ItemMachine::new(1_u32);
        let mut selection = Selection::new();
        let mut target = card();

        machine.on_pointer_press(
            Point::new(5.0, 5.0),
            PointerButton::Primary,
            Modifiers::empty(),
            &mut selection,
        );
        machine.on_pointer_move(
            Point::new(5.0 + DRAG_THRESHOLD, 5.0),
            true,
            &mut target,
            &mut |_| {},
        );

        assert!(machine.is_idle());
        assert_eq!(target.position, Point::new(20.0, 20.0));
    }

    #[test]
    fn no_drag_on_a_non_free_surface() {
        let mut machine = ItemMachine::new(1_u32);
        let mut selection = Selection::new();
        let mut target = card();

        machine.on_pointer_press(
            Point::new(5.0, 5.0),
            PointerButton::Primary,
            Modifiers::empty(),
            &mut selection,
        );
        machine.on_pointer_move(Point::new(40.0, 40.0), false, &mut target, &mut |_| {});

        assert!(machine.is_idle());
        assert_eq!(target.position, Point::new(20.0, 20.0));
    }

    #[test]
    fn drag_rounds_to_whole_units_and_reports_frame_deltas() {
        let mut machine = ItemMachine::new(1_u32);
        let mut selection = Selection::new();
        let mut target = card();
        let mut events = Vec::new();

        machine.on_pointer_press(
            Point::new(0.0, 0.0),
            PointerButton::Primary,
            Modifiers::empty(),
            &mut selection,
        );
        machine.on_pointer_move(Point::new(10.3, 4.6), true, &mut target, &mut |ev| {
            events.push(ev);
        });

        assert!(machine.is_dragging());
        assert_eq!(target.position, Point::new(30.0, 25.0));
        assert_eq!(
            events,
            vec![
                ItemEvent::DragStarted { item: 1 },
                ItemEvent::DragDelta {
                    item: 1,
                    delta: Vec2::new(10.0, 5.0)
                },
            ]
        );
    }

    #[test]
    fn drag_completion_reports_total_delta() {
        let mut machine = ItemMachine::new(1_u32);
        let mut selection = Selection::new();
        let mut target = card();
        let mut events = Vec::new();

        machine.on_pointer_press(
            Point::new(0.0, 0.0),
            PointerButton::Primary,
            Modifiers::empty(),
            &mut selection,
        );
        machine.on_pointer_move(Point::new(6.0, 0.0), true, &mut target, &mut |_| {});
        machine.on_pointer_move(Point::new(14.0, -3.0), true, &mut target, &mut |_| {});
        machine.on_pointer_release(Modifiers::empty(), &mut selection, &mut |ev| {
            events.push(ev);
        });

        assert!(machine.is_idle());
        assert_eq!(
            events,
            vec![ItemEvent::DragCompleted {
                item: 1,
                total_delta: Vec2::new(14.0, -3.0)
            }]
        );
    }

    #[test]
    fn repeated_press_after_gesture_starts_clean() {
        let mut machine = ItemMachine::new(1_u32);
        let mut selection = Selection::new();
        let mut target = card();

        machine.on_pointer_press(
            Point::ZERO,
            PointerButton::Primary,
            Modifiers::empty(),
            &mut selection,
        );
        machine.on_pointer_move(Point::new(20.0, 0.0), true, &mut target, &mut |_| {});
        machine.on_pointer_release(Modifiers::empty(), &mut selection, &mut |_| {});

        // The re-entered idle state must not remember the old press.
        machine.on_pointer_move(Point::new(90.0, 90.0), true, &mut target, &mut |_| {});
        assert!(machine.is_idle());
    }
}
