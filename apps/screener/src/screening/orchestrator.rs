//! Orchestrator: drives a batch through encode → build → analyze → resolve.
//!
//! Files run strictly one at a time in submission order, so at most one remote call
//! is in flight. A failure is recorded on that file's job and the loop moves on.
//! The session lock is never held across an await on the encoder or the client.
//! Discarding a batch (reset, mode switch, or a new start) aborts its task, so
//! an in-flight call from a discarded batch never overlaps the next one.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::llm_client::AnalysisClient;
use crate::screening::classifier::classify;
use crate::screening::encoder::encode;
use crate::screening::models::{AnalysisMode, Job, JobOutcome, UploadedFile};
use crate::screening::request_builder::build;
use crate::screening::session::{BatchPlan, Session, SessionView};
use crate::screening::tracker::{BatchId, Resolution};
use crate::screening::validator::{AdmissionError, AdmissionLimits};

#[derive(Clone)]
pub struct Orchestrator {
    session: Arc<RwLock<Session>>,
    client: Arc<dyn AnalysisClient>,
    limits: AdmissionLimits,
    /// Task driving the most recently started batch.
    running: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl Orchestrator {
    pub fn new(client: Arc<dyn AnalysisClient>, limits: AdmissionLimits) -> Self {
        Self {
            session: Arc::new(RwLock::new(Session::new())),
            client,
            limits,
            running: Arc::new(Mutex::new(None)),
        }
    }

    pub async fn view(&self) -> SessionView {
        self.session.read().await.view()
    }

    pub async fn ranked(&self) -> Vec<Job> {
        self.session.read().await.ranked()
    }

    pub async fn select_files(
        &self,
        incoming: Vec<UploadedFile>,
    ) -> Result<Option<AdmissionError>, AppError> {
        self.session
            .write()
            .await
            .select_files(incoming, &self.limits)
    }

    pub async fn remove_file(&self, file_name: &str) -> Result<(), AppError> {
        self.session.write().await.remove_file(file_name)
    }

    pub async fn set_job_description(&self, text: String) -> Result<(), AppError> {
        self.session.write().await.set_job_description(text)
    }

    pub async fn set_mode(&self, mode: AnalysisMode) -> bool {
        let changed = self.session.write().await.set_mode(mode);
        if changed {
            self.cancel_running().await;
            info!("Analysis mode switched to {mode:?}; session reset");
        }
        changed
    }

    pub async fn reset(&self) {
        self.session.write().await.reset();
        self.cancel_running().await;
        info!("Session reset");
    }

    /// Starts a batch and processes it on a background task.
    /// The jobs are visible as `loading` as soon as this returns.
    pub async fn start(&self) -> Result<BatchId, AppError> {
        let mut running = self.running.lock().await;
        let plan = self.session.write().await.begin_batch()?;
        let batch = plan.batch;

        // Anything still running belongs to a batch that was discarded.
        if let Some(previous) = running.take() {
            abort_and_wait(previous).await;
        }

        let orchestrator = self.clone();
        *running = Some(tokio::spawn(async move { orchestrator.run(plan).await }));

        Ok(batch)
    }

    async fn cancel_running(&self) {
        if let Some(task) = self.running.lock().await.take() {
            abort_and_wait(task).await;
        }
    }

    /// Processes every file of `plan` sequentially. Stops early if the batch is
    /// superseded by a reset or mode switch.
    pub async fn run(&self, plan: BatchPlan) {
        info!(
            "Starting batch {} ({:?} mode, {} files)",
            plan.batch,
            plan.mode,
            plan.files.len()
        );

        let mut succeeded = 0usize;
        let mut failed = 0usize;

        for file in &plan.files {
            if !self.session.read().await.tracker().is_current(plan.batch) {
                debug!("Batch {} superseded; stopping", plan.batch);
                return;
            }

            let outcome = self.process_file(file, &plan).await;
            let is_success = matches!(outcome, JobOutcome::Success(_));

            let resolution = self
                .session
                .write()
                .await
                .resolve(plan.batch, &file.name, outcome);

            match resolution {
                Resolution::Applied if is_success => succeeded += 1,
                Resolution::Applied => failed += 1,
                other => {
                    debug!(
                        "Discarded resolution for {} in batch {}: {other:?}",
                        file.name, plan.batch
                    );
                }
            }
        }

        info!(
            "Batch {} finished: {succeeded} succeeded, {failed} failed",
            plan.batch
        );
    }

    async fn process_file(&self, file: &UploadedFile, plan: &BatchPlan) -> JobOutcome {
        let payload = match encode(file).await {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Encoding failed for {}: {e}", file.name);
                return JobOutcome::Error(e.to_string());
            }
        };

        let request = build(plan.mode, &plan.job_description);

        match self.client.analyze(&request, &payload).await {
            Ok(result) => {
                debug!("{} scored {}: {}", file.name, result.score(), result.summary());
                JobOutcome::Success(result)
            }
            Err(failure) => {
                warn!("Analysis failed for {}: {failure}", file.name);
                JobOutcome::Error(classify(&failure))
            }
        }
    }
}

/// Cancels the task at its current await point and waits until it is gone.
async fn abort_and_wait(task: JoinHandle<()>) {
    if task.is_finished() {
        return;
    }
    task.abort();
    if let Err(e) = task.await {
        if !e.is_cancelled() {
            warn!("Batch task ended abnormally: {e}");
        }
    }
}
