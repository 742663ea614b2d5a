use crate::lattice::Cost;
use std::time::Instant;
use tracing::info;

#[derive(Debug)]
pub struct SearchStatistics {
    /// Number of states expanded
    expanded_states: u64,
    /// Number of successors looked at during expansion
    considered_successors: u64,
    /// Number of states discovered for the first time
    generated_states: u64,
    /// Number of open states that got a cheaper path
    relaxed_states: u64,
    /// Number of popped entries ignored because the state was already closed
    stale_pops: u64,
    /// Log every this many expansions, 0 disables count based logging
    log_interval_expansions: u64,
    /// Time when the search started
    search_start_time: Instant,
    /// Time when the last log was printed, used for periodic logging
    last_log_time: Instant,
}

impl Default for SearchStatistics {
    fn default() -> Self {
        Self::new(0)
    }
}

impl SearchStatistics {
    pub fn new(log_interval_expansions: u64) -> Self {
        Self {
            expanded_states: 0,
            considered_successors: 0,
            generated_states: 0,
            relaxed_states: 0,
            stale_pops: 0,
            log_interval_expansions,
            search_start_time: Instant::now(),
            last_log_time: Instant::now(),
        }
    }

    pub fn start_search(log_interval_expansions: u64) -> Self {
        info!("starting search");
        Self::new(log_interval_expansions)
    }

    pub fn increment_expanded_states(&mut self) {
        self.expanded_states += 1;
        if self.log_interval_expansions > 0
            && self.expanded_states % self.log_interval_expansions == 0
        {
            self.last_log_time = Instant::now();
            self.log();
        } else {
            self.log_if_needed();
        }
    }

    pub fn increment_considered_successors(&mut self) {
        self.considered_successors += 1;
    }

    pub fn increment_generated_states(&mut self) {
        self.generated_states += 1;
    }

    pub fn increment_relaxed_states(&mut self) {
        self.relaxed_states += 1;
    }

    pub fn increment_stale_pops(&mut self) {
        self.stale_pops += 1;
    }

    pub fn expanded_states(&self) -> u64 {
        self.expanded_states
    }

    pub fn considered_successors(&self) -> u64 {
        self.considered_successors
    }

    pub fn generated_states(&self) -> u64 {
        self.generated_states
    }

    pub fn relaxed_states(&self) -> u64 {
        self.relaxed_states
    }

    pub fn stale_pops(&self) -> u64 {
        self.stale_pops
    }

    fn log_if_needed(&mut self) {
        if self.last_log_time.elapsed().as_secs() > 10 {
            self.last_log_time = Instant::now();
            self.log();
        }
    }

    pub fn log(&self) {
        info!(
            expanded_states = self.expanded_states,
            considered_successors = self.considered_successors,
            generated_states = self.generated_states,
            relaxed_states = self.relaxed_states,
            stale_pops = self.stale_pops,
        );
    }

    pub fn finalise_search(&self, final_cost: Option<Cost>) {
        info!("finalising search");
        self.log();
        info!(
            search_duration = self.search_start_time.elapsed().as_secs_f64(),
            final_cost
        );
    }
}
