//! Replays an editing session's accumulated diff against a record store.
//!
//! A save is split in two steps. [`SavePlan::build`] turns the diff sets into
//! an ordered task list: every create, then every update, then every delete.
//! [`SaveOrchestrator::execute`] runs that list strictly one call at a time and
//! records an outcome per task. A failing call does not stop the batch and
//! nothing is rolled back; callers resync from the store afterwards.

use crate::application::diff_tracker::DiffTracker;
use crate::domain::entities::trade::TradeInput;
use crate::domain::entities::working_row::WorkingRow;
use crate::domain::error::DomainError;
use crate::domain::ports::record_store::RecordStore;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveTask {
    Create { row_id: String, input: TradeInput },
    Update { id: String, input: TradeInput },
    Delete { id: String },
    /// The diff named a row the session no longer holds.
    Missing { kind: TaskKind, id: String },
}

impl SaveTask {
    pub fn kind(&self) -> TaskKind {
        match self {
            SaveTask::Create { .. } => TaskKind::Create,
            SaveTask::Update { .. } => TaskKind::Update,
            SaveTask::Delete { .. } => TaskKind::Delete,
            SaveTask::Missing { kind, .. } => *kind,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            SaveTask::Create { row_id, .. } => row_id,
            SaveTask::Update { id, .. } | SaveTask::Delete { id } | SaveTask::Missing { id, .. } => {
                id
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TaskOutcome {
    Created { stored_id: String },
    Updated,
    Deleted,
    Skipped { reason: String },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskResult {
    pub kind: TaskKind,
    pub id: String,
    #[serde(flatten)]
    pub outcome: TaskOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SaveReport {
    pub results: Vec<TaskResult>,
}

impl SaveReport {
    fn count(&self, pred: impl Fn(&TaskOutcome) -> bool) -> usize {
        self.results.iter().filter(|r| pred(&r.outcome)).count()
    }

    pub fn created(&self) -> usize {
        self.count(|o| matches!(o, TaskOutcome::Created { .. }))
    }

    pub fn updated(&self) -> usize {
        self.count(|o| matches!(o, TaskOutcome::Updated))
    }

    pub fn deleted(&self) -> usize {
        self.count(|o| matches!(o, TaskOutcome::Deleted))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, TaskOutcome::Failed { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, TaskOutcome::Skipped { .. }))
    }

    pub fn is_clean(&self) -> bool {
        self.failed() == 0 && self.skipped() == 0
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SavePlan {
    tasks: Vec<SaveTask>,
}

impl SavePlan {
    pub fn build(rows: &[WorkingRow], tracker: &DiffTracker) -> Self {
        let find = |id: &str| rows.iter().find(|r| r.id() == id);
        let mut tasks = Vec::new();

        for id in tracker.added().iter() {
            tasks.push(match find(id) {
                Some(row) => SaveTask::Create {
                    row_id: id.to_string(),
                    input: row.to_input(),
                },
                None => SaveTask::Missing {
                    kind: TaskKind::Create,
                    id: id.to_string(),
                },
            });
        }

        // Disjoint by construction; checked again so nothing is sent twice.
        for id in tracker.edited().iter().filter(|id| !tracker.added().contains(id)) {
            tasks.push(match find(id) {
                Some(row) => SaveTask::Update {
                    id: id.to_string(),
                    input: row.to_input(),
                },
                None => SaveTask::Missing {
                    kind: TaskKind::Update,
                    id: id.to_string(),
                },
            });
        }

        for id in tracker.deleted().iter() {
            tasks.push(SaveTask::Delete { id: id.to_string() });
        }

        Self { tasks }
    }

    pub fn tasks(&self) -> &[SaveTask] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

pub struct SaveOrchestrator {
    store: Arc<dyn RecordStore>,
    in_flight: AtomicBool,
}

/// Holds the in-flight flag for the duration of one save.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, DomainError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| DomainError::SaveInProgress)?;
        Ok(Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl SaveOrchestrator {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_saving(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Run every task of `plan` in order. Only a concurrent save is an error;
    /// individual call failures are reported in the returned report.
    pub async fn execute(&self, plan: SavePlan) -> Result<SaveReport, DomainError> {
        let _guard = InFlight::acquire(&self.in_flight)?;
        tracing::debug!(tasks = plan.len(), "executing save plan");

        let mut report = SaveReport::default();
        for task in plan.tasks {
            let kind = task.kind();
            let id = task.id().to_string();
            let outcome = self.run_task(task).await;
            match &outcome {
                TaskOutcome::Failed { error } => {
                    tracing::warn!(?kind, %id, %error, "save task failed");
                }
                TaskOutcome::Skipped { reason } => {
                    tracing::warn!(?kind, %id, %reason, "save task skipped");
                }
                _ => tracing::info!(?kind, %id, "save task done"),
            }
            report.results.push(TaskResult { kind, id, outcome });
        }

        tracing::info!(
            created = report.created(),
            updated = report.updated(),
            deleted = report.deleted(),
            failed = report.failed(),
            skipped = report.skipped(),
            "save finished"
        );
        Ok(report)
    }

    async fn run_task(&self, task: SaveTask) -> TaskOutcome {
        let result = match task {
            SaveTask::Create { input, .. } => self
                .store
                .create(input)
                .await
                .map(|t| TaskOutcome::Created { stored_id: t.id }),
            SaveTask::Update { id, input } => self
                .store
                .update(&id, input)
                .await
                .map(|_| TaskOutcome::Updated),
            SaveTask::Delete { id } => self.store.delete(&id).await.map(|_| TaskOutcome::Deleted),
            SaveTask::Missing { .. } => Ok(TaskOutcome::Skipped {
                reason: "row not present in session".into(),
            }),
        };
        result.unwrap_or_else(|e| TaskOutcome::Failed {
            error: e.to_string(),
        })
    }
}
