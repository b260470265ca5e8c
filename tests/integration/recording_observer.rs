//! Recording observer for integration testing.
//!
//! Captures every notification the engine sends in shared, in-memory
//! logs so tests can assert on them after handing the observer over.

use std::sync::{Arc, Mutex};

use baccarat_tracker::engine::{SessionObserver, SessionStatus};

#[derive(Clone, Default)]
pub struct RecordingObserver {
    refreshes: Arc<Mutex<Vec<SessionStatus>>>,
    locks: Arc<Mutex<Vec<i64>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refresh_count(&self) -> usize {
        self.refreshes.lock().unwrap().len()
    }

    pub fn last_status(&self) -> Option<SessionStatus> {
        self.refreshes.lock().unwrap().last().cloned()
    }

    pub fn locks(&self) -> Vec<i64> {
        self.locks.lock().unwrap().clone()
    }
}

impl SessionObserver for RecordingObserver {
    fn on_refresh(&mut self, status: &SessionStatus) {
        self.refreshes.lock().unwrap().push(status.clone());
    }

    fn on_profit_lock(&mut self, lock: i64) {
        self.locks.lock().unwrap().push(lock);
    }
}
