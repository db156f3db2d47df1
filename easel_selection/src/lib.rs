// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=easel_selection --heading-base-level=0

//! Easel Selection: selection bookkeeping for a design surface.
//!
//! This crate tracks the set of selected item keys on a canvas. It does
//! **not** know anything about item geometry or hit testing; interaction
//! controllers decide which keys a gesture affects and call in here.
//!
//! The core type is [`Selection`], a small, generic container that tracks:
//! - The set of selected keys, in insertion order with no duplicates.
//! - The **active** key: the first-selected item, which property panels and
//!   similar collaborators treat as the representative of the selection.
//! - A monotonically increasing **revision** counter that bumps when the
//!   selection actually changes, so observers can cheaply detect change.
//! - A **batch scope** that coalesces any number of mutations into at most
//!   one revision bump, so a marquee commit emits a single notification.
//!
//! ## Minimal example
//!
//! ```rust
//! use easel_selection::Selection;
//!
//! // Using u32 as a stand-in for an application-specific item key.
//! let mut selection = Selection::<u32>::new();
//!
//! // Simple click: replace the selection with a single item.
//! selection.select_only(10);
//! assert_eq!(selection.active(), Some(&10));
//!
//! // Modifier-click: toggle a single item.
//! selection.toggle(10);
//! assert!(selection.is_empty());
//!
//! // Marquee commit: clear and select every intersecting item under one
//! // batch, so observers see a single revision bump.
//! let before = selection.revision();
//! selection.batch(|sel| {
//!     sel.clear();
//!     for key in [1, 2, 3] {
//!         sel.select(key);
//!     }
//! });
//! assert_eq!(selection.len(), 3);
//! assert_eq!(selection.revision(), before + 1);
//! ```
//!
//! ## Concepts
//!
//! - **Membership**: keys live in a small `Vec<T>` with uniqueness enforced
//!   by equality. No hashing or ordering constraints are imposed on `T`,
//!   making it easy to integrate with generational handles from a scene
//!   tree.
//! - **Active item**: the first key in insertion order. Collapsing a
//!   multi-selection or replacing it changes which key is active; observers
//!   derive it with [`Selection::active`] instead of tracking it
//!   separately.
//! - **Batching**: [`Selection::begin_batch`]/[`Selection::end_batch`]
//!   scopes (nestable, or the closure-based [`Selection::batch`]) defer the
//!   revision bump until the outermost scope closes, and emit at most one.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;

/// A selection container tracking a set of keys plus a revision counter.
///
/// `Selection` does not impose hashing or ordering constraints on `T`; it
/// only requires equality for most mutation and query methods. Keys are
/// stored in insertion order, and the first key is the **active** item.
#[derive(Clone, Debug, Default)]
pub struct Selection<T> {
    items: Vec<T>,
    revision: u64,
    batch_depth: u32,
    batch_dirty: bool,
}

impl<T> Selection<T> {
    /// Creates an empty selection.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            revision: 0,
            batch_depth: 0,
            batch_dirty: false,
        }
    }

    /// Returns `true` if the selection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of selected keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns a slice of all selected keys in insertion order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Returns an iterator over the selected keys.
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Returns the active key: the first-selected item, if any.
    ///
    /// Property panels and similar collaborators use this as the
    /// representative of the selection.
    #[must_use]
    pub fn active(&self) -> Option<&T> {
        self.items.first()
    }

    /// Returns the current revision counter.
    ///
    /// The revision is a monotonically increasing counter local to this
    /// `Selection` instance. It is bumped only when a mutation changes the
    /// selected set; no-op calls leave it unchanged, and mutations inside a
    /// batch scope coalesce into at most one bump when the outermost scope
    /// closes.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Opens a batch scope. Scopes nest; see [`Selection::end_batch`].
    pub fn begin_batch(&mut self) {
        self.batch_depth += 1;
    }

    /// Closes a batch scope.
    ///
    /// When the outermost scope closes, the revision is bumped once if any
    /// mutation inside the scope changed the selection. Closing without a
    /// matching [`Selection::begin_batch`] is a no-op.
    pub fn end_batch(&mut self) {
        match self.batch_depth {
            0 => {}
            1 => {
                self.batch_depth = 0;
                if self.batch_dirty {
                    self.batch_dirty = false;
                    self.revision = self.revision.wrapping_add(1);
                }
            }
            _ => self.batch_depth -= 1,
        }
    }

    /// Runs `f` inside a batch scope.
    pub fn batch(&mut self, f: impl FnOnce(&mut Self)) {
        self.begin_batch();
        f(self);
        self.end_batch();
    }

    /// Removes all keys from the selection.
    pub fn clear(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.items.clear();
        self.bump_revision();
    }

    fn bump_revision(&mut self) {
        if self.batch_depth > 0 {
            self.batch_dirty = true;
        } else {
            self.revision = self.revision.wrapping_add(1);
        }
    }
}

impl<T> Selection<T>
where
    T: PartialEq,
{
    /// Returns `true` if the selection currently contains `key`.
    #[must_use]
    pub fn contains(&self, key: &T) -> bool {
        self.position_of(key).is_some()
    }

    /// Returns the position of `key` within the selection, if present.
    #[must_use]
    pub fn position_of(&self, key: &T) -> Option<usize> {
        self.items.iter().position(|k| k == key)
    }

    /// Adds `key` to the selection if it is not already present.
    pub fn select(&mut self, key: T) {
        if !self.contains(&key) {
            self.items.push(key);
            self.bump_revision();
        }
    }

    /// Removes `key` from the selection if present.
    ///
    /// If the removed key was the active item, the next-selected key (if
    /// any) becomes active.
    pub fn deselect(&mut self, key: &T) {
        if let Some(idx) = self.position_of(key) {
            self.items.remove(idx);
            self.bump_revision();
        }
    }

    /// Toggles `key` in the selection.
    pub fn toggle(&mut self, key: T) {
        if let Some(idx) = self.position_of(&key) {
            self.items.remove(idx);
        } else {
            self.items.push(key);
        }
        self.bump_revision();
    }

    /// Replaces the selection with a single key, which becomes the active item.
    ///
    /// This is the typical mapping for a simple click without modifiers.
    pub fn select_only(&mut self, key: T) {
        if self.items.len() == 1 && self.items.first() == Some(&key) {
            return;
        }
        self.items.clear();
        self.items.push(key);
        self.bump_revision();
    }

    /// Replaces the current selection with the provided batch of keys.
    ///
    /// Duplicates in the input are ignored; the first unique key becomes the
    /// active item. De-duplication scans the accumulated output, so this is
    /// quadratic in the number of input keys. If you can guarantee the input
    /// has no duplicates (for example, a marquee commit that visits each
    /// item once), prefer [`Selection::replace_with_unique`] for linear
    /// behavior.
    pub fn replace_with<I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = T>,
    {
        let mut new_items: Vec<T> = Vec::new();
        for key in keys {
            if !new_items.iter().any(|existing| existing == &key) {
                new_items.push(key);
            }
        }
        self.replace_with_items(new_items);
    }

    /// Replaces the current selection with the provided batch of *unique* keys.
    ///
    /// This is a faster variant of [`Selection::replace_with`] for callers
    /// that can guarantee the input has no duplicates. It does **not**
    /// perform any de-duplication.
    ///
    /// # Panics (debug only)
    ///
    /// Panics in debug builds if the input contains duplicates.
    pub fn replace_with_unique<I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = T>,
    {
        let iter = keys.into_iter();
        let (lower, _) = iter.size_hint();
        let mut new_items: Vec<T> = Vec::with_capacity(lower);
        for key in iter {
            new_items.push(key);
        }

        #[cfg(debug_assertions)]
        debug_assert_unique(&new_items);
        self.replace_with_items(new_items);
    }

    /// Extends the selection with the provided batch of keys.
    ///
    /// Existing keys remain selected; new keys are appended and duplicates
    /// in the input are ignored. The active item is unchanged unless the
    /// selection was empty.
    pub fn extend_with<I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = T>,
    {
        let mut added = false;
        for key in keys {
            if !self.contains(&key) {
                self.items.push(key);
                added = true;
            }
        }
        if added {
            self.bump_revision();
        }
    }

    fn replace_with_items(&mut self, new_items: Vec<T>) {
        if new_items == self.items {
            return;
        }
        self.items = new_items;
        self.bump_revision();
    }
}

#[cfg(feature = "hashbrown")]
impl<T> Selection<T>
where
    T: core::hash::Hash + Eq + Clone,
{
    /// Replaces the current selection with the provided batch of keys,
    /// de-duplicating with hashing.
    ///
    /// This is an alternative to [`Selection::replace_with`] for larger
    /// inputs when `T` supports hashing. It preserves first-occurrence order
    /// while filtering duplicates, which keeps the active-item derivation
    /// stable.
    pub fn replace_with_hashed<I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = T>,
    {
        use hashbrown::HashSet;

        let iter = keys.into_iter();
        let (lower, _) = iter.size_hint();
        let mut new_items: Vec<T> = Vec::with_capacity(lower);
        let mut seen: HashSet<T> = HashSet::with_capacity(lower);
        for key in iter {
            if seen.insert(key.clone()) {
                new_items.push(key);
            }
        }
        self.replace_with_items(new_items);
    }
}

#[cfg(debug_assertions)]
fn debug_assert_unique<T>(items: &[T])
where
    T: PartialEq,
{
    for i in 0..items.len() {
        for j in (i + 1)..items.len() {
            debug_assert!(
                items[i] != items[j],
                "duplicate selection key at {i} and {j}"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Selection;

    #[test]
    fn select_is_idempotent() {
        let mut sel = Selection::new();
        sel.select(7_u32);
        let rev = sel.revision();
        sel.select(7);
        assert_eq!(sel.revision(), rev, "re-selecting must not bump the revision");
        assert_eq!(sel.len(), 1);
    }

    #[test]
    fn active_is_first_selected() {
        let mut sel = Selection::new();
        sel.select(3_u32);
        sel.select(1);
        sel.select(2);
        assert_eq!(sel.active(), Some(&3));

        sel.deselect(&3);
        assert_eq!(sel.active(), Some(&1));
    }

    #[test]
    fn batch_coalesces_revision_bumps() {
        let mut sel = Selection::new();
        sel.select(1_u32);
        let before = sel.revision();

        sel.batch(|s| {
            s.clear();
            s.select(2);
            s.select(3);
            s.toggle(4);
        });
        assert_eq!(sel.revision(), before + 1);
        assert_eq!(sel.items(), &[2, 3, 4]);
    }

    #[test]
    fn empty_batch_does_not_bump() {
        let mut sel = Selection::<u32>::new();
        let before = sel.revision();
        sel.batch(|s| {
            // Clearing an empty selection is a no-op.
            s.clear();
        });
        assert_eq!(sel.revision(), before);
    }

    #[test]
    fn nested_batches_bump_once() {
        let mut sel = Selection::new();
        let before = sel.revision();
        sel.begin_batch();
        sel.select(1_u32);
        sel.begin_batch();
        sel.select(2);
        sel.end_batch();
        assert_eq!(sel.revision(), before, "inner scope must not bump");
        sel.end_batch();
        assert_eq!(sel.revision(), before + 1);
    }

    #[test]
    fn select_only_collapses() {
        let mut sel = Selection::new();
        sel.select(1_u32);
        sel.select(2);
        sel.select_only(2);
        assert_eq!(sel.items(), &[2]);
        assert_eq!(sel.active(), Some(&2));

        let rev = sel.revision();
        sel.select_only(2);
        assert_eq!(sel.revision(), rev, "replacing with the same singleton is a no-op");
    }

    #[test]
    fn replace_with_dedups_and_keeps_order() {
        let mut sel = Selection::new();
        sel.replace_with([5_u32, 1, 5, 2, 1]);
        assert_eq!(sel.items(), &[5, 1, 2]);
        assert_eq!(sel.active(), Some(&5));
    }

    #[test]
    fn extend_keeps_existing_and_active() {
        let mut sel = Selection::new();
        sel.select(9_u32);
        sel.extend_with([9, 4, 6]);
        assert_eq!(sel.items(), &[9, 4, 6]);
        assert_eq!(sel.active(), Some(&9));
    }
}
