//! Session: the single owner of mode, selection, job description, batch-level error
//! and the job tracker.
//!
//! Phase machine: idle → files-selected → running → done. Selection edits are only
//! allowed before a batch starts; `reset` (or a mode switch) returns to idle from
//! anywhere.

use serde::Serialize;

use crate::errors::AppError;
use crate::screening::models::{AnalysisMode, Job, JobOutcome, SelectedFile, UploadedFile};
use crate::screening::ranker::rank;
use crate::screening::tracker::{BatchId, JobTracker, Resolution};
use crate::screening::validator::{admit, AdmissionError, AdmissionLimits};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BatchPhase {
    #[default]
    Idle,
    FilesSelected,
    Running,
    Done,
}

/// Everything a batch run needs, captured when the batch starts.
#[derive(Debug, Clone)]
pub struct BatchPlan {
    pub batch: BatchId,
    pub mode: AnalysisMode,
    pub job_description: String,
    pub files: Vec<UploadedFile>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Progress {
    pub total: usize,
    pub completed: usize,
}

/// Read model returned to clients. `results` is the ranked view.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub phase: BatchPhase,
    pub mode: AnalysisMode,
    pub job_description: String,
    pub selection: Vec<SelectedFile>,
    pub error: Option<String>,
    pub progress: Progress,
    pub results: Vec<Job>,
}

#[derive(Debug, Default)]
pub struct Session {
    mode: AnalysisMode,
    phase: BatchPhase,
    job_description: String,
    selection: Vec<UploadedFile>,
    error: Option<String>,
    tracker: JobTracker,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn mode(&self) -> AnalysisMode {
        self.mode
    }

    #[cfg(test)]
    pub fn phase(&self) -> BatchPhase {
        self.phase
    }

    #[cfg(test)]
    pub fn selection(&self) -> &[UploadedFile] {
        &self.selection
    }

    #[cfg(test)]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn tracker(&self) -> &JobTracker {
        &self.tracker
    }

    /// Runs admission for `incoming`. A hard rejection leaves the selection untouched;
    /// a truncation is accepted and its warning returned.
    pub fn select_files(
        &mut self,
        incoming: Vec<UploadedFile>,
        limits: &AdmissionLimits,
    ) -> Result<Option<AdmissionError>, AppError> {
        self.ensure_editable()?;
        self.error = None;

        let admission = match admit(&self.selection, incoming, self.mode, limits) {
            Ok(admission) => admission,
            Err(e) => {
                self.error = Some(e.to_string());
                return Err(AppError::Admission(e));
            }
        };

        self.selection = admission.selection;
        self.error = admission.warning.as_ref().map(ToString::to_string);
        self.phase = if self.selection.is_empty() {
            BatchPhase::Idle
        } else {
            BatchPhase::FilesSelected
        };
        Ok(admission.warning)
    }

    pub fn remove_file(&mut self, file_name: &str) -> Result<(), AppError> {
        self.ensure_editable()?;

        let before = self.selection.len();
        self.selection.retain(|f| f.name != file_name);
        if self.selection.len() == before {
            return Err(AppError::NotFound(format!("File {file_name} is not selected")));
        }

        if self.selection.is_empty() {
            self.phase = BatchPhase::Idle;
        }
        Ok(())
    }

    pub fn set_job_description(&mut self, text: String) -> Result<(), AppError> {
        self.ensure_editable()?;
        self.job_description = text;
        Ok(())
    }

    /// Switching to a different mode discards all batch state. Returns whether it did.
    pub fn set_mode(&mut self, mode: AnalysisMode) -> bool {
        if self.mode == mode {
            return false;
        }
        self.mode = mode;
        self.reset();
        true
    }

    /// Back to idle with nothing selected. The mode is kept.
    pub fn reset(&mut self) {
        self.phase = BatchPhase::Idle;
        self.selection.clear();
        self.tracker.clear();
        self.error = None;
        self.job_description.clear();
    }

    /// files-selected → running: creates one loading job per selected file.
    pub fn begin_batch(&mut self) -> Result<BatchPlan, AppError> {
        if self.phase != BatchPhase::FilesSelected || self.selection.is_empty() {
            return Err(AppError::Conflict(
                "Select at least one file before starting an analysis".to_string(),
            ));
        }

        self.error = None;
        let batch = self
            .tracker
            .start_batch(self.selection.iter().map(|f| f.name.clone()));
        self.phase = BatchPhase::Running;

        Ok(BatchPlan {
            batch,
            mode: self.mode,
            job_description: self.job_description.clone(),
            files: self.selection.clone(),
        })
    }

    /// Records one file's outcome; the last resolution moves the batch to done.
    pub fn resolve(&mut self, batch: BatchId, file_name: &str, outcome: JobOutcome) -> Resolution {
        let resolution = self.tracker.resolve(batch, file_name, outcome);
        if resolution == Resolution::Applied && self.tracker.is_complete() {
            self.phase = BatchPhase::Done;
        }
        resolution
    }

    pub fn ranked(&self) -> Vec<Job> {
        rank(&self.tracker.snapshot())
    }

    pub fn view(&self) -> SessionView {
        let jobs = self.tracker.snapshot();
        SessionView {
            phase: self.phase,
            mode: self.mode,
            job_description: self.job_description.clone(),
            selection: self.selection.iter().map(SelectedFile::from).collect(),
            error: self.error.clone(),
            progress: Progress {
                total: jobs.len(),
                completed: jobs.iter().filter(|j| j.is_terminal()).count(),
            },
            results: rank(&jobs),
        }
    }

    fn ensure_editable(&self) -> Result<(), AppError> {
        match self.phase {
            BatchPhase::Idle | BatchPhase::FilesSelected => Ok(()),
            BatchPhase::Running | BatchPhase::Done => Err(AppError::Conflict(
                "An analysis has already started; reset the session first".to_string(),
            )),
        }
    }
}
