//! A plan is a sequence of lattice actions that drives the robot from its
//! start state to the goal. This module provides the [`Plan`] struct, which
//! also records the soft obstacle penalty incurred by every action.

use crate::lattice::{ActionId, Cost, GraphState};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Plan {
    pub start: GraphState,
    actions: Vec<ActionId>,
    penalties: Vec<Cost>,
}

impl Plan {
    pub fn new(start: GraphState) -> Self {
        Self {
            start,
            actions: vec![],
            penalties: vec![],
        }
    }

    pub fn push(&mut self, action: ActionId, penalty: Cost) {
        self.actions.push(action);
        self.penalties.push(penalty);
    }

    pub fn clear(&mut self) {
        self.actions.clear();
        self.penalties.clear();
    }

    /// Reverse the order of the actions, used when a plan has been built by
    /// walking backwards from the goal.
    pub(crate) fn reverse(&mut self) {
        self.actions.reverse();
        self.penalties.reverse();
    }

    pub fn actions(&self) -> &[ActionId] {
        &self.actions
    }

    pub fn penalties(&self) -> &[Cost] {
        &self.penalties
    }

    pub fn steps(&self) -> impl Iterator<Item = (ActionId, Cost)> + '_ {
        self.actions
            .iter()
            .copied()
            .zip(self.penalties.iter().copied())
    }

    pub fn total_penalty(&self) -> Cost {
        self.penalties.iter().sum()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "start {}:", self.start)?;
        for (action, penalty) in self.steps() {
            if penalty > 0.0 {
                write!(f, " {}(+{:.3})", action, penalty)?;
            } else {
                write!(f, " {}", action)?;
            }
        }
        Ok(())
    }
}
