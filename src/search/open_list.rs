//! The open list of the search: a mutable priority queue of states keyed by
//! their f-value.
//!
//! Every state has at most one live entry. Inserting a state that is already
//! in the list replaces its priority, which is how the planner lowers the key
//! of a state after finding a cheaper path to it. Among equal f-values states
//! come out in the order they were (last) inserted.

use crate::lattice::{Cost, StateId};
use ordered_float::OrderedFloat;
use priority_queue::PriorityQueue;
use std::cmp::Reverse;

/// Identifies one insertion into the open list. A later insertion of the same
/// state invalidates the earlier handle.
pub type OpenHandle = u64;

type Priority = Reverse<(OrderedFloat<Cost>, OpenHandle)>;

#[derive(Debug, Default)]
pub struct OpenList {
    queue: PriorityQueue<StateId, Priority>,
    next_handle: OpenHandle,
}

impl OpenList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `state` with priority `f`, replacing any previous entry for it.
    pub fn insert(&mut self, state: StateId, f: Cost) -> OpenHandle {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.queue.push(state, Reverse((OrderedFloat(f), handle)));
        handle
    }

    /// Remove and return the state with the smallest f-value, together with
    /// that f-value.
    pub fn pop(&mut self) -> Option<(StateId, Cost)> {
        self.queue
            .pop()
            .map(|(state, Reverse((f, _)))| (state, f.into_inner()))
    }

    pub fn top(&self) -> Option<StateId> {
        self.queue.peek().map(|(state, _)| *state)
    }

    pub fn top_f(&self) -> Option<Cost> {
        self.queue.peek().map(|(_, Reverse((f, _)))| f.into_inner())
    }

    /// Handle of the live entry for `state`, if it is in the list.
    pub fn handle_of(&self, state: &StateId) -> Option<OpenHandle> {
        self.queue.get_priority(state).map(|Reverse((_, handle))| *handle)
    }

    pub fn contains(&self, state: &StateId) -> bool {
        self.queue.get(state).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
        self.next_handle = 0;
    }
}
