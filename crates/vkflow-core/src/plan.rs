use crate::error::Result;
use crate::kanban::{validate_project_id, NewTask, RemoteTask, TaskBackend};
use crate::marker::{self, TaskToken};
use crate::paths::{self, validate_change_name};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PlanOutcome {
    Created { task: RemoteTask },
    AlreadyExists { task: RemoteTask },
}

pub fn default_title(change: &str) -> String {
    format!("Plan: {change}")
}

pub fn default_body(change: &str) -> String {
    let dir = paths::change_ref(change);
    format!(
        "Plan the change `{change}` (see @vkflow_plan).\n\n\
         - Review `{dir}/proposal.md` and the spec deltas in `{dir}/specs/`.\n\
         - Write `{dir}/tasks.md` (see @vkflow_tasks_format).\n\
         - Import with `vkflow import-change --change {change}`."
    )
}

pub fn plan_description(change: &str, body: &str) -> String {
    format!(
        "{}\n{}\n\n{}",
        marker::encode_change(change),
        marker::encode_task(&TaskToken::Plan),
        body
    )
}

/// Create the planning task for `change` unless the project already has one.
///
/// The existence check reads the project once before writing; two
/// concurrent invocations can still both create a plan task.
pub fn plan_change(
    backend: &dyn TaskBackend,
    project_id: &str,
    change: &str,
    title: Option<&str>,
) -> Result<PlanOutcome> {
    validate_change_name(change)?;
    validate_project_id(project_id)?;

    let existing = backend.list_tasks(project_id)?.into_iter().find(|t| {
        t.description
            .as_deref()
            .and_then(marker::decode)
            .is_some_and(|m| m.belongs_to(change) && m.is_plan())
    });
    if let Some(task) = existing {
        tracing::debug!(change, id = %task.id, "plan task already exists");
        return Ok(PlanOutcome::AlreadyExists { task });
    }

    let title = title.map(str::to_string).unwrap_or_else(|| default_title(change));
    let description = plan_description(change, &default_body(change));
    let task = backend.create_task(&NewTask::todo(project_id, title, description))?;
    Ok(PlanOutcome::Created { task })
}
