use crate::identity::TaskIdentity;
use crate::marker::{self, TaskToken};
use crate::paths;
use crate::tasks_md::TaskRecord;
use serde::Serialize;
use std::collections::HashSet;

/// Guidance appended to imported task descriptions unless disabled.
pub const DEFAULT_APPENDIX: &str = "Execution:\n- Follow TDD + small steps (see @superpowers_tdd)";

#[derive(Debug, Clone, Default)]
pub struct ReconcileOptions {
    /// Create every candidate even when its identity was already imported.
    pub allow_duplicates: bool,
    /// Reference block appended after the provenance footer.
    pub appendix: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ImportDecision {
    Create {
        task_id: TaskIdentity,
        title: String,
        description: String,
    },
    Skip {
        task_id: TaskIdentity,
        title: String,
    },
}

impl ImportDecision {
    pub fn title(&self) -> &str {
        match self {
            ImportDecision::Create { title, .. } | ImportDecision::Skip { title, .. } => title,
        }
    }

    pub fn task_id(&self) -> &TaskIdentity {
        match self {
            ImportDecision::Create { task_id, .. } | ImportDecision::Skip { task_id, .. } => task_id,
        }
    }

    pub fn is_create(&self) -> bool {
        matches!(self, ImportDecision::Create { .. })
    }
}

/// Identities already imported for `change`, read from remote descriptions.
pub fn existing_task_ids<'a, I>(change: &str, descriptions: I) -> HashSet<TaskIdentity>
where
    I: IntoIterator<Item = &'a str>,
{
    descriptions
        .into_iter()
        .filter_map(marker::decode)
        .filter(|m| m.belongs_to(change))
        .filter_map(|m| m.task_id())
        .collect()
}

/// Decide, per candidate and in input order, whether to create or skip it.
///
/// The working set starts as `existing` and grows only with created
/// identities, so repeats within one batch collapse to a single creation.
pub fn reconcile(
    change: &str,
    candidates: &[TaskRecord],
    existing: &HashSet<TaskIdentity>,
    opts: &ReconcileOptions,
) -> Vec<ImportDecision> {
    let mut seen = existing.clone();

    candidates
        .iter()
        .map(|task| {
            let task_id = TaskIdentity::of(task);

            if !opts.allow_duplicates && seen.contains(&task_id) {
                tracing::debug!(%task_id, title = %task.title, "skipping already imported task");
                return ImportDecision::Skip {
                    task_id,
                    title: task.title.clone(),
                };
            }

            seen.insert(task_id.clone());
            let description = assemble_description(change, &task_id, &task.description, opts);
            tracing::debug!(%task_id, title = %task.title, "task will be created");
            ImportDecision::Create {
                task_id,
                title: task.title.clone(),
                description,
            }
        })
        .collect()
}

/// Markers, body, provenance footer and optional appendix, newline-joined.
pub fn assemble_description(
    change: &str,
    task_id: &TaskIdentity,
    body: &str,
    opts: &ReconcileOptions,
) -> String {
    let mut lines = vec![
        marker::encode_change(change),
        marker::encode_task(&TaskToken::Id(task_id.clone())),
        String::new(),
    ];
    if !body.is_empty() {
        lines.push(body.to_string());
        lines.push(String::new());
    }
    lines.push("---".to_string());
    lines.push(format!("Spec: {}", paths::change_ref(change)));
    if let Some(appendix) = opts.appendix.as_deref().filter(|a| !a.trim().is_empty()) {
        lines.push(String::new());
        lines.push(appendix.to_string());
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tasks() -> Vec<TaskRecord> {
        vec![
            TaskRecord::new("First", "Hello"),
            TaskRecord::new("Second", "World"),
            TaskRecord::new("Third", ""),
        ]
    }

    fn set(ids: &[&TaskIdentity]) -> HashSet<TaskIdentity> {
        ids.iter().map(|&i| i.clone()).collect()
    }

    #[test]
    fn creates_everything_when_nothing_exists() {
        let decisions = reconcile("c", &tasks(), &HashSet::new(), &ReconcileOptions::default());
        assert_eq!(decisions.len(), 3);
        assert!(decisions.iter().all(ImportDecision::is_create));
        let titles: Vec<_> = decisions.iter().map(ImportDecision::title).collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn skips_already_imported() {
        let existing = set(&[&TaskIdentity::compute("Second", "World")]);
        let decisions = reconcile("c", &tasks(), &existing, &ReconcileOptions::default());
        assert!(decisions[0].is_create());
        assert!(matches!(&decisions[1], ImportDecision::Skip { title, .. } if title == "Second"));
        assert!(decisions[2].is_create());
    }

    #[test]
    fn allow_duplicates_creates_all() {
        let existing = set(&[&TaskIdentity::compute("Second", "World")]);
        let opts = ReconcileOptions {
            allow_duplicates: true,
            appendix: None,
        };
        let decisions = reconcile("c", &tasks(), &existing, &opts);
        assert!(decisions.iter().all(ImportDecision::is_create));
    }

    #[test]
    fn identical_candidates_in_one_batch_create_once() {
        let batch = vec![
            TaskRecord::new("Same", "body"),
            TaskRecord::new("Same", "body"),
            TaskRecord::new("Same", "body"),
        ];
        let decisions = reconcile("c", &batch, &HashSet::new(), &ReconcileOptions::default());
        let creates = decisions.iter().filter(|d| d.is_create()).count();
        assert_eq!(creates, 1);
        assert!(decisions[0].is_create());
        assert_eq!(decisions[0].task_id(), decisions[1].task_id());
    }

    #[test]
    fn description_layout() {
        let id = TaskIdentity::compute("First", "Hello");
        let opts = ReconcileOptions {
            allow_duplicates: false,
            appendix: Some(DEFAULT_APPENDIX.to_string()),
        };
        let desc = assemble_description("add-auth", &id, "Hello", &opts);
        let expected = format!(
            "<!-- vkflow:change=add-auth -->\n<!-- vkflow:task={id} -->\n\nHello\n\n---\nSpec: openspec/changes/add-auth\n\n{DEFAULT_APPENDIX}"
        );
        assert_eq!(desc, expected);
    }

    #[test]
    fn description_without_body_or_appendix() {
        let id = TaskIdentity::compute("T", "");
        let desc = assemble_description("c", &id, "", &ReconcileOptions::default());
        assert_eq!(
            desc,
            format!("<!-- vkflow:change=c -->\n<!-- vkflow:task={id} -->\n\n---\nSpec: openspec/changes/c")
        );
    }

    #[test]
    fn created_description_decodes_back() {
        let decisions = reconcile(
            "feat",
            &[TaskRecord::new("A", "B")],
            &HashSet::new(),
            &ReconcileOptions::default(),
        );
        let ImportDecision::Create { description, task_id, .. } = &decisions[0] else {
            panic!("expected create");
        };
        let markers = marker::decode(description).unwrap();
        assert!(markers.belongs_to("feat"));
        assert_eq!(markers.task.as_deref(), Some(task_id.as_str()));
    }

    #[test]
    fn existing_ids_are_scoped_to_change() {
        let descriptions = [
            "<!-- vkflow:change=a -->\n<!-- vkflow:task=111111111111 -->",
            "<!-- vkflow:change=b -->\n<!-- vkflow:task=222222222222 -->",
            "<!-- vkflow:task=333333333333 -->",
            "<!-- vkflow:change=a -->\n<!-- vkflow:task=plan -->",
            "<!-- vkflow:change=a -->",
            "plain task",
        ];
        let ids = existing_task_ids("a", descriptions.iter().copied());
        let ids: Vec<_> = ids.iter().map(TaskIdentity::as_str).collect();
        assert_eq!(ids, vec!["111111111111"]);
    }

    #[test]
    fn rerun_after_import_skips_everything() {
        let opts = ReconcileOptions::default();
        let first = reconcile("c", &tasks(), &HashSet::new(), &opts);
        let stored: Vec<String> = first
            .iter()
            .filter_map(|d| match d {
                ImportDecision::Create { description, .. } => Some(description.clone()),
                ImportDecision::Skip { .. } => None,
            })
            .collect();
        let existing = existing_task_ids("c", stored.iter().map(String::as_str));
        let second = reconcile("c", &tasks(), &existing, &opts);
        assert!(second.iter().all(|d| !d.is_create()));
    }
}
