//! The planner core and its bookkeeping: open list, state table, plans and
//! search statistics.

mod open_list;
mod plan;
mod planner;
mod planner_config;
mod replan_result;
mod search_observer;
mod search_statistics;
mod state_table;
mod verbosity;

pub use open_list::{OpenHandle, OpenList};
pub use plan::Plan;
pub use planner::XythetaPlanner;
pub use planner_config::PlannerConfig;
pub use replan_result::ReplanResult;
pub use search_observer::{ExpansionRecord, ExpansionRecorder, SearchObserver};
pub use search_statistics::SearchStatistics;
pub use state_table::{StateTable, TableEntry};
pub use verbosity::Verbosity;
