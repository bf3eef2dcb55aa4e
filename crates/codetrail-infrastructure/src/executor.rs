//! Parallel task executor: dispatches tasks group-by-group, respecting
//! `max_concurrency`, per-task timeouts, pause and single-task cancellation.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use codetrail_domain::config::ExecutorConfig;
use codetrail_domain::entities::{
    Dependency, Task, TaskEvent, TaskEventKind, TaskId, TaskStatus,
};
use codetrail_domain::error::{Error, Result};
use codetrail_domain::now_epoch_secs;
use codetrail_domain::ports::{TaskEventRepository, TaskRepository};
use dashmap::DashSet;
use serde_json::json;
use tokio::sync::{Mutex, Semaphore};
use tracing::{info, warn};

use crate::graph::TaskGraph;

/// Outcome of a single callback invocation, supplied by the caller.
pub type CallbackResult = std::result::Result<serde_json::Value, String>;

/// A task performer: given a [`Task`], produce its outcome.
pub type TaskCallback =
    Arc<dyn Fn(Task) -> Pin<Box<dyn Future<Output = CallbackResult> + Send>> + Send + Sync>;

/// Aggregate metrics for one `execute_all` run.
#[derive(Debug, Clone, Default)]
pub struct ExecutionReport {
    /// Total tasks dispatched.
    pub total_executed: u32,
    /// Tasks that completed successfully.
    pub succeeded: u32,
    /// Tasks whose callback failed or timed out.
    pub failed: u32,
    /// Tasks skipped due to a cancellation request.
    pub cancelled: u32,
    /// `succeeded / total_executed`, or 0.0 if nothing ran.
    pub success_rate: f64,
    /// Mean wall-clock duration of a task invocation, in seconds.
    pub average_duration_secs: f64,
}

/// Drives `parallel_groups()` over a task set, invoking `callback` for each
/// task and persisting status/events as it goes.
pub struct TaskExecutor {
    task_repo: Arc<dyn TaskRepository>,
    event_repo: Arc<dyn TaskEventRepository>,
    config: ExecutorConfig,
    paused: AtomicBool,
    stop_requested: AtomicBool,
    cancelled: DashSet<TaskId>,
    total: AtomicU32,
    succeeded: AtomicU32,
    failed: AtomicU32,
    cancelled_count: AtomicU32,
    durations_secs: Mutex<Vec<f64>>,
}

impl TaskExecutor {
    /// Build an executor bound to the given repositories and configuration.
    #[must_use]
    pub fn new(
        task_repo: Arc<dyn TaskRepository>,
        event_repo: Arc<dyn TaskEventRepository>,
        config: ExecutorConfig,
    ) -> Self {
        Self {
            task_repo,
            event_repo,
            config: config.clamped(),
            paused: AtomicBool::new(false),
            stop_requested: AtomicBool::new(false),
            cancelled: DashSet::new(),
            total: AtomicU32::new(0),
            succeeded: AtomicU32::new(0),
            failed: AtomicU32::new(0),
            cancelled_count: AtomicU32::new(0),
            durations_secs: Mutex::new(Vec::new()),
        }
    }

    /// Stop dispatching new groups; tasks already in flight run to
    /// completion. Terminal groups cannot be resumed into.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    /// Clear a previously requested pause.
    pub async fn resume(&self) -> Result<()> {
        self.paused.store(false, Ordering::SeqCst);
        self.emit(None, TaskEventKind::ExecutionResumed, "execution resumed", json!({}))
            .await
    }

    /// Request best-effort cancellation of a task not yet started.
    pub fn cancel_task(&self, task_id: TaskId) {
        self.cancelled.insert(task_id);
    }

    async fn emit(
        &self,
        task_id: Option<TaskId>,
        kind: TaskEventKind,
        message: impl Into<String>,
        metadata: serde_json::Value,
    ) -> Result<()> {
        let event = TaskEvent::with_metadata(task_id, kind, message, metadata, now_epoch_secs());
        self.event_repo.append(&event).await
    }

    /// Execute every non-terminal task among `tasks`, honoring `dependencies`
    /// for grouping. `callback` performs the actual work for a task.
    pub async fn execute_all(
        &self,
        tasks: &[Task],
        dependencies: &[Dependency],
        callback: TaskCallback,
    ) -> Result<ExecutionReport> {
        let runnable: Vec<Task> = tasks.iter().filter(|t| !t.status.is_terminal()).cloned().collect();
        let task_ids: Vec<TaskId> = runnable.iter().map(|t| t.id).collect();
        let graph = TaskGraph::build(&task_ids, dependencies);

        self.emit(None, TaskEventKind::ExecutionStarted, "execution started", json!({}))
            .await?;

        let groups = match graph.parallel_groups() {
            Ok(groups) => groups,
            Err(err) => {
                self.emit(
                    None,
                    TaskEventKind::ExecutionFailed,
                    format!("cannot build execution plan: {err}"),
                    json!({}),
                )
                .await?;
                return Err(err);
            }
        };

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency as usize));

        for (level, group) in groups.into_iter().enumerate() {
            if self.paused.load(Ordering::SeqCst) {
                self.emit(None, TaskEventKind::ExecutionPaused, "execution paused", json!({ "level": level }))
                    .await?;
                break;
            }
            if self.stop_requested.load(Ordering::SeqCst) {
                break;
            }

            self.emit(None, TaskEventKind::GroupStarted, "group started", json!({ "level": level }))
                .await?;

            let mut handles = Vec::with_capacity(group.len());
            for task_id in group {
                let permit = Arc::clone(&semaphore);
                let callback = Arc::clone(&callback);
                let task_repo = Arc::clone(&self.task_repo);
                let event_repo = Arc::clone(&self.event_repo);
                let timeout_ms = self.config.task_timeout_ms;
                let stop_on_error = self.config.stop_on_error;
                let was_cancelled = self.cancelled.remove(&task_id).is_some();

                handles.push(tokio::spawn(async move {
                    let _permit = permit.acquire_owned().await.expect("semaphore open");
                    run_one_task(
                        &task_repo,
                        &event_repo,
                        task_id,
                        callback,
                        Duration::from_millis(timeout_ms),
                        was_cancelled,
                    )
                    .await
                    .map(|outcome| (stop_on_error, outcome))
                }));
            }

            for handle in handles {
                match handle.await {
                    Ok(Ok((stop_on_error, outcome))) => {
                        self.total.fetch_add(1, Ordering::SeqCst);
                        match outcome {
                            TaskOutcome::Succeeded(secs) => {
                                self.succeeded.fetch_add(1, Ordering::SeqCst);
                                self.durations_secs.lock().await.push(secs);
                            }
                            TaskOutcome::Failed => {
                                self.failed.fetch_add(1, Ordering::SeqCst);
                                if stop_on_error {
                                    self.stop_requested.store(true, Ordering::SeqCst);
                                }
                            }
                            TaskOutcome::Cancelled => {
                                self.cancelled_count.fetch_add(1, Ordering::SeqCst);
                            }
                        }
                    }
                    Ok(Err(err)) => warn!(%err, "task execution reported an error"),
                    Err(err) => warn!(%err, "task execution panicked"),
                }
            }

            self.emit(None, TaskEventKind::GroupCompleted, "group completed", json!({ "level": level }))
                .await?;
        }

        let report = self.report().await;
        if self.stop_requested.load(Ordering::SeqCst) {
            self.emit(
                None,
                TaskEventKind::ExecutionFailed,
                "execution stopped after a task failure",
                json!({ "failed": report.failed }),
            )
            .await?;
        } else {
            self.emit(
                None,
                TaskEventKind::ExecutionCompleted,
                "execution completed",
                json!({ "succeeded": report.succeeded, "failed": report.failed }),
            )
            .await?;
        }
        info!(total = report.total_executed, succeeded = report.succeeded, failed = report.failed, "execution finished");
        Ok(report)
    }

    async fn report(&self) -> ExecutionReport {
        let total = self.total.load(Ordering::SeqCst);
        let succeeded = self.succeeded.load(Ordering::SeqCst);
        let failed = self.failed.load(Ordering::SeqCst);
        let cancelled = self.cancelled_count.load(Ordering::SeqCst);
        let durations = self.durations_secs.lock().await;
        let average_duration_secs = if durations.is_empty() {
            0.0
        } else {
            durations.iter().sum::<f64>() / durations.len() as f64
        };
        ExecutionReport {
            total_executed: total,
            succeeded,
            failed,
            cancelled,
            success_rate: if total == 0 { 0.0 } else { f64::from(succeeded) / f64::from(total) },
            average_duration_secs,
        }
    }
}

enum TaskOutcome {
    Succeeded(f64),
    Failed,
    Cancelled,
}

#[allow(clippy::too_many_arguments)]
async fn run_one_task(
    task_repo: &Arc<dyn TaskRepository>,
    event_repo: &Arc<dyn TaskEventRepository>,
    task_id: TaskId,
    callback: TaskCallback,
    timeout: Duration,
    was_cancelled: bool,
) -> Result<TaskOutcome> {
    let mut task = task_repo.get(task_id).await?;

    if was_cancelled {
        task.status = TaskStatus::Cancelled;
        task_repo.upsert(&task).await?;
        event_repo
            .append(&TaskEvent::new(Some(task_id), TaskEventKind::TaskCancelled, "task cancelled before start", now_epoch_secs()))
            .await?;
        return Ok(TaskOutcome::Cancelled);
    }

    let started_at = now_epoch_secs();
    task.status = TaskStatus::InProgress;
    task.started_at = Some(started_at);
    task_repo.upsert(&task).await?;
    event_repo
        .append(&TaskEvent::new(Some(task_id), TaskEventKind::TaskStarted, "task started", started_at))
        .await?;

    let outcome = tokio::time::timeout(timeout, callback(task.clone())).await;
    let completed_at = now_epoch_secs();

    match outcome {
        Ok(Ok(metadata)) => {
            task.status = TaskStatus::Done;
            task.completed_at = Some(completed_at);
            task.actual_effort_minutes = Some(((completed_at - started_at) / 60).max(0));
            task_repo.upsert(&task).await?;
            event_repo
                .append(&TaskEvent::with_metadata(
                    Some(task_id),
                    TaskEventKind::TaskCompleted,
                    "task completed",
                    metadata,
                    completed_at,
                ))
                .await?;
            Ok(TaskOutcome::Succeeded((completed_at - started_at) as f64))
        }
        Ok(Err(message)) => {
            task.status = TaskStatus::Failed;
            task_repo.upsert(&task).await?;
            event_repo
                .append(&TaskEvent::with_metadata(
                    Some(task_id),
                    TaskEventKind::TaskFailed,
                    "task failed",
                    json!({ "error": message }),
                    completed_at,
                ))
                .await?;
            Ok(TaskOutcome::Failed)
        }
        Err(_) => {
            task.status = TaskStatus::Failed;
            task_repo.upsert(&task).await?;
            event_repo
                .append(&TaskEvent::with_metadata(
                    Some(task_id),
                    TaskEventKind::TaskFailed,
                    "task timed out",
                    json!({ "error": "timeout" }),
                    completed_at,
                ))
                .await?;
            warn!(%task_id, "{}", Error::task_timeout(format!("task {task_id} exceeded its timeout")));
            Ok(TaskOutcome::Failed)
        }
    }
}
