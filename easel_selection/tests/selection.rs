// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for the `easel_selection` crate.
//!
//! These exercise the core `Selection<T>` API, with a focus on how contents,
//! the active-item derivation, batching, and the revision counter interact.

use easel_selection::Selection;

#[test]
fn empty_selection_basics() {
    let sel = Selection::<u32>::new();
    assert!(sel.is_empty());
    assert_eq!(sel.len(), 0);
    assert_eq!(sel.active(), None);
    assert_eq!(sel.revision(), 0);
}

#[test]
fn select_only_sets_active_and_bumps_revision() {
    let mut sel = Selection::new();
    sel.select_only(1);

    assert_eq!(sel.items(), &[1]);
    assert_eq!(sel.active(), Some(&1));
    assert_eq!(sel.revision(), 1);

    // No-op: selecting the same singleton again should not change revision.
    sel.select_only(1);
    assert_eq!(sel.revision(), 1);
}

#[test]
fn clear_bumps_revision_only_on_change() {
    let mut sel = Selection::new();
    sel.clear();
    assert_eq!(sel.revision(), 0);

    sel.select_only(1);
    assert_eq!(sel.revision(), 1);

    sel.clear();
    assert!(sel.is_empty());
    assert_eq!(sel.active(), None);
    assert_eq!(sel.revision(), 2);
}

#[test]
fn toggle_and_deselect_update_membership() {
    let mut sel = Selection::new();
    sel.toggle(1);
    sel.toggle(2);
    assert_eq!(sel.items(), &[1, 2]);

    sel.toggle(1);
    assert_eq!(sel.items(), &[2]);
    assert_eq!(sel.active(), Some(&2));

    sel.deselect(&2);
    assert!(sel.is_empty());

    // Deselecting an absent key is a no-op.
    let rev = sel.revision();
    sel.deselect(&99);
    assert_eq!(sel.revision(), rev);
}

#[test]
fn position_of_reports_insertion_order() {
    let mut sel = Selection::new();
    sel.select(10);
    sel.select(20);
    sel.select(30);
    assert_eq!(sel.position_of(&20), Some(1));
    assert_eq!(sel.position_of(&40), None);
}

#[test]
fn marquee_style_batch_commit_emits_one_revision() {
    let mut sel = Selection::new();
    sel.select(1);
    sel.select(2);
    let before = sel.revision();

    // A marquee commit without the multi-select modifier: clear, then select
    // every intersecting item. Observers must see one change.
    sel.batch(|s| {
        s.clear();
        for key in [5, 6, 7] {
            s.select(key);
        }
    });

    assert_eq!(sel.items(), &[5, 6, 7]);
    assert_eq!(sel.revision(), before + 1);
}

#[test]
fn extend_style_batch_keeps_existing_selection() {
    let mut sel = Selection::new();
    sel.select(1);

    sel.batch(|s| {
        s.extend_with([2, 3]);
    });

    assert_eq!(sel.items(), &[1, 2, 3]);
    assert_eq!(sel.active(), Some(&1));
}

#[test]
fn replace_with_unique_keeps_first_active() {
    let mut sel = Selection::new();
    sel.replace_with_unique([4, 5, 6]);
    assert_eq!(sel.active(), Some(&4));
    assert_eq!(sel.len(), 3);
}

#[cfg(feature = "hashbrown")]
#[test]
fn replace_with_hashed_dedups_preserving_order() {
    let mut sel = Selection::new();
    sel.replace_with_hashed([3_u32, 1, 3, 2, 1]);
    assert_eq!(sel.items(), &[3, 1, 2]);
    assert_eq!(sel.active(), Some(&3));
}
