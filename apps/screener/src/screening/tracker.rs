//! Job State Tracker: lifecycle of every job in the current batch.
//!
//! Each batch gets a fresh `BatchId`. Resolutions carry the id they were issued
//! under, so work finishing after a reset or a newer batch can never touch jobs it
//! does not own, even when the new batch reuses the same file names.

use uuid::Uuid;

use crate::screening::models::{Job, JobOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BatchId(Uuid);

impl BatchId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for BatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// What happened to a resolution. Everything except `Applied` is a silent no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    /// The batch was reset or replaced.
    StaleBatch,
    UnknownJob,
    AlreadyTerminal,
}

#[derive(Debug, Default)]
pub struct JobTracker {
    batch: Option<BatchId>,
    /// Submission order.
    jobs: Vec<Job>,
}

impl JobTracker {
    /// Replaces any prior batch with one `loading` job per distinct name.
    pub fn start_batch<I, S>(&mut self, file_names: I) -> BatchId
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut jobs: Vec<Job> = Vec::new();
        for name in file_names {
            let name = name.into();
            if !jobs.iter().any(|j| j.file_name() == name) {
                jobs.push(Job::loading(name));
            }
        }

        let id = BatchId::new();
        self.batch = Some(id);
        self.jobs = jobs;
        id
    }

    /// Moves one job from `loading` to its terminal state.
    pub fn resolve(&mut self, batch: BatchId, file_name: &str, outcome: JobOutcome) -> Resolution {
        if self.batch != Some(batch) {
            return Resolution::StaleBatch;
        }

        let Some(job) = self.jobs.iter_mut().find(|j| j.file_name() == file_name) else {
            return Resolution::UnknownJob;
        };
        if job.is_terminal() {
            return Resolution::AlreadyTerminal;
        }

        let file_name = file_name.to_string();
        *job = match outcome {
            JobOutcome::Success(result) => Job::Success { file_name, result },
            JobOutcome::Error(error) => Job::Error { file_name, error },
        };
        Resolution::Applied
    }

    pub fn snapshot(&self) -> Vec<Job> {
        self.jobs.clone()
    }

    pub fn is_current(&self, batch: BatchId) -> bool {
        self.batch == Some(batch)
    }

    /// True when a batch exists and none of its jobs is still loading.
    pub fn is_complete(&self) -> bool {
        self.batch.is_some() && self.jobs.iter().all(Job::is_terminal)
    }

    pub fn clear(&mut self) {
        self.batch = None;
        self.jobs.clear();
    }
}
