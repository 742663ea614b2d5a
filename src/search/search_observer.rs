use crate::{
    lattice::{Cost, GraphState},
    search::ReplanResult,
};
use std::{cell::RefCell, fmt::Debug, rc::Rc};

/// Optional sink for search progress, used for debugging and plotting the
/// states the planner looked at.
pub trait SearchObserver: Debug {
    /// Called for every state right before it is expanded.
    fn on_expand(&mut self, state: GraphState, g: Cost, f: Cost);

    fn on_search_finished(&mut self, _result: ReplanResult) {}
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpansionRecord {
    pub state: GraphState,
    pub g: Cost,
    pub f: Cost,
}

/// Records every expansion of every search. The records are shared, so the
/// caller keeps a handle while the planner owns the recorder.
#[derive(Debug, Default, Clone)]
pub struct ExpansionRecorder {
    records: Rc<RefCell<Vec<ExpansionRecord>>>,
    results: Rc<RefCell<Vec<ReplanResult>>>,
}

impl ExpansionRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Rc<RefCell<Vec<ExpansionRecord>>> {
        Rc::clone(&self.records)
    }

    pub fn results(&self) -> Rc<RefCell<Vec<ReplanResult>>> {
        Rc::clone(&self.results)
    }
}

impl SearchObserver for ExpansionRecorder {
    fn on_expand(&mut self, state: GraphState, g: Cost, f: Cost) {
        self.records
            .borrow_mut()
            .push(ExpansionRecord { state, g, f });
    }

    fn on_search_finished(&mut self, result: ReplanResult) {
        self.results.borrow_mut().push(result);
    }
}
