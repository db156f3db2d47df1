// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A non-empty state stack with an un-poppable root.
//!
//! Both interaction machines keep their states on one of these. The stack is
//! pure bookkeeping: the machines run their own enter/exit/re-enter behavior
//! around [`push`](StateStack::push), [`pop`](StateStack::pop), and
//! [`unwind`](StateStack::unwind), because those transitions need access to
//! the machine's collaborators (targets, selection, event sinks) that the
//! stack itself never sees.

use smallvec::SmallVec;

/// A stack of interaction states that always holds at least the root.
///
/// The root state is structurally un-poppable: [`pop`](Self::pop) on a
/// one-element stack is a no-op returning `None`, never an error.
#[derive(Debug, Clone)]
pub struct StateStack<S> {
    states: SmallVec<[S; 2]>,
}

impl<S> StateStack<S> {
    /// Creates a stack holding only `root`.
    #[must_use]
    pub fn new(root: S) -> Self {
        let mut states = SmallVec::new();
        states.push(root);
        Self { states }
    }

    /// The current state: the top of the stack.
    #[must_use]
    pub fn current(&self) -> &S {
        self.states.last().expect("stack is never empty")
    }

    /// Mutable access to the current state.
    pub fn current_mut(&mut self) -> &mut S {
        self.states.last_mut().expect("stack is never empty")
    }

    /// Number of states on the stack, at least 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.states.len()
    }

    /// Whether only the root state is on the stack.
    #[must_use]
    pub fn at_root(&self) -> bool {
        self.states.len() == 1
    }

    /// Pushes a new current state.
    pub fn push(&mut self, state: S) {
        self.states.push(state);
    }

    /// Pops the current state, unless it is the root.
    pub fn pop(&mut self) -> Option<S> {
        if self.at_root() {
            None
        } else {
            self.states.pop()
        }
    }

    /// Pops every state above the root, returned top-first.
    ///
    /// This is the capture-loss path: the machine runs exit behavior for
    /// each returned state so half-completed gestures still announce their
    /// completion.
    pub fn unwind(&mut self) -> SmallVec<[S; 2]> {
        let mut popped = SmallVec::new();
        while let Some(state) = self.pop() {
            popped.push(state);
        }
        popped
    }
}
