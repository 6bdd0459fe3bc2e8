use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

/// Jobs that currently have an analysis run in flight.
#[derive(Clone, Default)]
pub struct ActiveRuns {
    jobs: Arc<Mutex<HashSet<Uuid>>>,
}

impl ActiveRuns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `job_id` as running. Returns `None` if a run for it is already in flight.
    /// The mark is cleared when the returned guard drops.
    pub fn try_start(&self, job_id: Uuid) -> Option<RunGuard> {
        let mut jobs = self.jobs.lock().unwrap_or_else(|e| e.into_inner());
        if !jobs.insert(job_id) {
            return None;
        }
        Some(RunGuard {
            runs: self.clone(),
            job_id,
        })
    }

    pub fn is_running(&self, job_id: Uuid) -> bool {
        self.jobs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&job_id)
    }
}

pub struct RunGuard {
    runs: ActiveRuns,
    job_id: Uuid,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.runs
            .jobs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.job_id);
    }
}
