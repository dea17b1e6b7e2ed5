//! Import of a change's `tasks.md` into a kanban project.
//!
//! An import is planned entirely in memory (extract, identify, reconcile
//! against the tasks already in the project) and then executed by creating
//! tasks one at a time in document order. Execution stops at the first
//! failed creation; tasks created before it stay created, and a re-run skips
//! them by identity.

use crate::error::{Result, VkflowError};
use crate::identity::TaskIdentity;
use crate::kanban::{validate_project_id, NewTask, TaskBackend};
use crate::paths::validate_change_name;
use crate::reconcile::{existing_task_ids, reconcile, ImportDecision, ReconcileOptions};
use crate::tasks_md;
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct ImportRequest<'a> {
    pub change: &'a str,
    pub project_id: &'a str,
    /// Raw markdown of the change's tasks file.
    pub document: &'a str,
    pub options: ReconcileOptions,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportPlan {
    pub change: String,
    pub project_id: String,
    pub decisions: Vec<ImportDecision>,
}

impl ImportPlan {
    pub fn to_create(&self) -> usize {
        self.decisions.iter().filter(|d| d.is_create()).count()
    }

    pub fn to_skip(&self) -> usize {
        self.decisions.len() - self.to_create()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedTask {
    pub title: String,
    pub task_id: TaskIdentity,
    pub remote_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub created: Vec<CreatedTask>,
    pub skipped: Vec<String>,
}

/// Parse the document and decide what to create, reading the project's
/// existing tasks exactly once.
pub fn plan_import(backend: &dyn TaskBackend, req: &ImportRequest<'_>) -> Result<ImportPlan> {
    validate_change_name(req.change)?;
    validate_project_id(req.project_id)?;

    let candidates = tasks_md::extract(req.document);
    if candidates.is_empty() {
        return Err(VkflowError::NoTasks);
    }

    let remote = backend.list_tasks(req.project_id)?;
    let existing = existing_task_ids(
        req.change,
        remote.iter().filter_map(|t| t.description.as_deref()),
    );
    tracing::debug!(
        change = req.change,
        candidates = candidates.len(),
        existing = existing.len(),
        "reconciling import"
    );

    let decisions = reconcile(req.change, &candidates, &existing, &req.options);
    Ok(ImportPlan {
        change: req.change.to_string(),
        project_id: req.project_id.to_string(),
        decisions,
    })
}

/// Create the planned tasks sequentially, in plan order.
///
/// `on_created` runs after each successful creation.
pub fn execute(
    backend: &dyn TaskBackend,
    plan: &ImportPlan,
    mut on_created: impl FnMut(&CreatedTask),
) -> Result<ImportReport> {
    let mut report = ImportReport::default();
    let total = plan.to_create();

    for decision in &plan.decisions {
        match decision {
            ImportDecision::Skip { title, .. } => report.skipped.push(title.clone()),
            ImportDecision::Create {
                task_id,
                title,
                description,
            } => {
                let new_task = NewTask::todo(&plan.project_id, title.clone(), description.clone());
                let remote = backend.create_task(&new_task).map_err(|e| {
                    let created = report.created.len();
                    tracing::warn!(%title, created, "task creation failed; aborting import");
                    VkflowError::ImportAborted {
                        title: title.clone(),
                        created,
                        remaining: total - created - 1,
                        source: Box::new(e),
                    }
                })?;
                let created = CreatedTask {
                    title: title.clone(),
                    task_id: task_id.clone(),
                    remote_id: remote.id,
                };
                on_created(&created);
                report.created.push(created);
            }
        }
    }

    Ok(report)
}
