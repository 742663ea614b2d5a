use crate::{
    lattice::{ActionId, Cost, StateId},
    search::OpenHandle,
};
use segvec::{Linear, SegVec};
use std::{
    collections::HashMap,
    ops::{Index, IndexMut},
};

/// Search bookkeeping for one discovered state.
#[derive(Debug, Clone, PartialEq)]
pub struct TableEntry {
    /// Cost of the best known path from the start.
    pub g: Cost,
    /// Live open list entry of the state, `None` once it has been popped.
    pub open_handle: Option<OpenHandle>,
    /// Previous state on the best known path. The start state points to
    /// itself.
    pub backpointer: StateId,
    /// Action leading from `backpointer` to this state.
    pub backpointer_action: ActionId,
    /// Soft obstacle penalty of that action.
    pub penalty_into_state: Cost,
    /// Search generation in which the state was expanded.
    closed_in: Option<u32>,
}

impl TableEntry {
    pub fn is_closed(&self, generation: u32) -> bool {
        self.closed_in == Some(generation)
    }

    pub fn close(&mut self, generation: u32) {
        debug_assert!(!self.is_closed(generation), "state closed twice");
        self.closed_in = Some(generation);
        self.open_handle = None;
    }

    /// Record a cheaper path into the state.
    pub fn relax(
        &mut self,
        open_handle: OpenHandle,
        backpointer: StateId,
        action: ActionId,
        penalty: Cost,
        g: Cost,
    ) {
        debug_assert!(g < self.g, "relaxation must lower the cost");
        self.open_handle = Some(open_handle);
        self.backpointer = backpointer;
        self.backpointer_action = action;
        self.penalty_into_state = penalty;
        self.g = g;
    }
}

/// Maps states to their [`TableEntry`]. Entries live in an arena and are only
/// ever removed all at once, by [`StateTable::clear`].
#[derive(Debug)]
pub struct StateTable {
    entries: SegVec<TableEntry, Linear>,
    index: HashMap<StateId, usize>,
}

impl Default for StateTable {
    fn default() -> Self {
        Self::new()
    }
}

impl StateTable {
    pub fn new() -> Self {
        Self {
            entries: SegVec::new(),
            index: HashMap::new(),
        }
    }

    pub fn find(&self, state: StateId) -> Option<&TableEntry> {
        self.index
            .get(&state)
            .and_then(|&index| self.entries.get(index))
    }

    pub fn find_mut(&mut self, state: StateId) -> Option<&mut TableEntry> {
        self.index
            .get(&state)
            .and_then(|&index| self.entries.get_mut(index))
    }

    /// Create the entry of a newly discovered state. An existing entry for
    /// the state is overwritten.
    pub fn emplace(
        &mut self,
        state: StateId,
        open_handle: Option<OpenHandle>,
        backpointer: StateId,
        action: ActionId,
        penalty: Cost,
        g: Cost,
    ) -> &mut TableEntry {
        let entry = TableEntry {
            g,
            open_handle,
            backpointer,
            backpointer_action: action,
            penalty_into_state: penalty,
            closed_in: None,
        };
        let index = match self.index.get(&state) {
            Some(&index) => {
                self[state] = entry;
                index
            }
            None => {
                self.entries.push(entry);
                let index = self.entries.len() - 1;
                self.index.insert(state, index);
                index
            }
        };
        self.entries.get_mut(index).expect("Invalid table index")
    }

    pub fn contains(&self, state: StateId) -> bool {
        self.index.contains_key(&state)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries = SegVec::new();
        self.index.clear();
    }
}

impl Index<StateId> for StateTable {
    type Output = TableEntry;

    fn index(&self, state: StateId) -> &TableEntry {
        self.find(state).expect("State is not in the table")
    }
}

impl IndexMut<StateId> for StateTable {
    fn index_mut(&mut self, state: StateId) -> &mut TableEntry {
        self.find_mut(state).expect("State is not in the table")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::GraphState;

    fn id(x: i16) -> StateId {
        GraphState::new(x, 0, 0).id()
    }

    #[test]
    fn emplace_then_find() {
        let mut table = StateTable::new();
        assert!(table.find(id(0)).is_none());
        table.emplace(id(0), Some(0), id(0), 0, 0.0, 0.0);
        table.emplace(id(1), Some(1), id(0), 3, 0.5, 2.0);
        assert_eq!(table.len(), 2);
        let entry = &table[id(1)];
        assert_eq!(entry.backpointer, id(0));
        assert_eq!(entry.backpointer_action, 3);
        assert_eq!(entry.penalty_into_state, 0.5);
        assert_eq!(entry.g, 2.0);
    }

    #[test]
    fn closed_is_per_generation() {
        let mut table = StateTable::new();
        table.emplace(id(0), Some(0), id(0), 0, 0.0, 0.0).close(4);
        assert!(table[id(0)].is_closed(4));
        assert!(!table[id(0)].is_closed(5));
        assert_eq!(table[id(0)].open_handle, None);
    }

    #[test]
    fn relax_updates_everything() {
        let mut table = StateTable::new();
        table.emplace(id(2), Some(0), id(0), 1, 0.0, 10.0);
        table[id(2)].relax(7, id(1), 2, 0.25, 6.0);
        let entry = &table[id(2)];
        assert_eq!(entry.open_handle, Some(7));
        assert_eq!(entry.backpointer, id(1));
        assert_eq!(entry.backpointer_action, 2);
        assert_eq!(entry.penalty_into_state, 0.25);
        assert_eq!(entry.g, 6.0);
    }

    #[test]
    fn clear_forgets_everything() {
        let mut table = StateTable::new();
        table.emplace(id(0), None, id(0), 0, 0.0, 0.0);
        table.clear();
        assert!(table.is_empty());
        assert!(!table.contains(id(0)));
        table.emplace(id(1), None, id(1), 0, 0.0, 1.0);
        assert_eq!(table[id(1)].g, 1.0);
    }
}
