//! Hidden markers embedded in kanban task descriptions.
//!
//! A marker is an HTML comment such as `<!-- vkflow:change=add-auth -->`,
//! invisible once the description is rendered as markdown. Every imported
//! task carries a change marker and a task marker; the task marker holds
//! either the task's content identity or the reserved token `plan`.
//!
//! The format is persisted in the backend and must not change.

use crate::identity::TaskIdentity;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Reserved task token for the single planning task of a change.
pub const PLAN_TOKEN: &str = "plan";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskToken {
    Id(TaskIdentity),
    Plan,
}

impl TaskToken {
    pub fn as_str(&self) -> &str {
        match self {
            TaskToken::Id(id) => id.as_str(),
            TaskToken::Plan => PLAN_TOKEN,
        }
    }
}

impl fmt::Display for TaskToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<TaskIdentity> for TaskToken {
    fn from(id: TaskIdentity) -> Self {
        TaskToken::Id(id)
    }
}

pub fn encode_change(change: &str) -> String {
    format!("<!-- vkflow:change={change} -->")
}

pub fn encode_task(token: &TaskToken) -> String {
    format!("<!-- vkflow:task={token} -->")
}

/// Markers found in a description. At least one field is always set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Markers {
    pub change: Option<String>,
    pub task: Option<String>,
}

impl Markers {
    pub fn belongs_to(&self, change: &str) -> bool {
        self.change.as_deref() == Some(change)
    }

    pub fn is_plan(&self) -> bool {
        self.task.as_deref() == Some(PLAN_TOKEN)
    }

    /// The task token as a content identity; `None` for `plan` or a
    /// malformed token.
    pub fn task_id(&self) -> Option<TaskIdentity> {
        TaskIdentity::parse(self.task.as_deref()?).ok()
    }
}

static CHANGE_RE: OnceLock<Regex> = OnceLock::new();
static TASK_RE: OnceLock<Regex> = OnceLock::new();

fn change_re() -> &'static Regex {
    CHANGE_RE.get_or_init(|| Regex::new(r"(?i)<!--\s*vkflow:change=(\S+)\s*-->").unwrap())
}

fn task_re() -> &'static Regex {
    TASK_RE.get_or_init(|| Regex::new(r"(?i)<!--\s*vkflow:task=(\S+)\s*-->").unwrap())
}

/// Find the change and task markers anywhere in `description`.
///
/// The two markers are looked up independently. Returns `None` only when
/// neither is present. The scaffold matches case-insensitively; tokens are
/// returned exactly as written.
pub fn decode(description: &str) -> Option<Markers> {
    let capture = |re: &Regex| {
        re.captures(description)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    };

    let change = capture(change_re());
    let task = capture(task_re());

    if change.is_none() && task.is_none() {
        return None;
    }
    Some(Markers { change, task })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_html_comments() {
        assert_eq!(encode_change("my-change"), "<!-- vkflow:change=my-change -->");
        assert_eq!(encode_task(&TaskToken::Plan), "<!-- vkflow:task=plan -->");
        let id = TaskIdentity::compute("A", "B");
        assert_eq!(
            encode_task(&TaskToken::Id(id)),
            "<!-- vkflow:task=df8d16104912 -->"
        );
    }

    #[test]
    fn finds_change_and_task_markers() {
        let desc = [
            encode_change("my-change"),
            encode_task(&TaskToken::Id(TaskIdentity::parse("abc123abc123").unwrap())),
            String::new(),
            "hello".to_string(),
        ]
        .join("\n");

        assert_eq!(
            decode(&desc),
            Some(Markers {
                change: Some("my-change".into()),
                task: Some("abc123abc123".into()),
            })
        );
    }

    #[test]
    fn returns_none_when_missing() {
        assert_eq!(decode("no markers here"), None);
        assert_eq!(decode(""), None);
    }

    #[test]
    fn partial_result_when_only_one_marker() {
        assert_eq!(
            decode("<!-- vkflow:task=plan -->"),
            Some(Markers {
                change: None,
                task: Some("plan".into()),
            })
        );
        assert_eq!(
            decode("text\n<!-- vkflow:change=x -->"),
            Some(Markers {
                change: Some("x".into()),
                task: None,
            })
        );
    }

    #[test]
    fn markers_found_anywhere_after_human_edits() {
        let desc = "Edited intro by a human.\n\nMore text <!-- vkflow:task=0a1b2c3d4e5f --> inline\n\nfooter <!--vkflow:change=feat-x-->";
        let markers = decode(desc).unwrap();
        assert_eq!(markers.change.as_deref(), Some("feat-x"));
        assert_eq!(markers.task.as_deref(), Some("0a1b2c3d4e5f"));
    }

    #[test]
    fn scaffold_is_case_insensitive_token_is_not() {
        let markers = decode("<!-- VKFLOW:Change=MyChange -->").unwrap();
        assert_eq!(markers.change.as_deref(), Some("MyChange"));
    }

    #[test]
    fn round_trip_with_trailing_text() {
        let id = TaskIdentity::compute("t", "d");
        let desc = format!(
            "{}{}\n\nanything at all, even <!-- other comments -->",
            encode_change("c1"),
            encode_task(&TaskToken::Id(id.clone()))
        );
        let markers = decode(&desc).unwrap();
        assert!(markers.belongs_to("c1"));
        assert_eq!(markers.task.as_deref(), Some(id.as_str()));
        assert!(!markers.is_plan());
    }

    #[test]
    fn plan_marker_is_recognised() {
        let desc = format!("{}\n{}", encode_change("c"), encode_task(&TaskToken::Plan));
        assert!(decode(&desc).unwrap().is_plan());
    }

    #[test]
    fn task_id_only_for_content_identities() {
        let id = TaskIdentity::compute("A", "B");
        let markers = decode(&encode_task(&TaskToken::Id(id.clone()))).unwrap();
        assert_eq!(markers.task_id(), Some(id));

        let plan = decode(&encode_task(&TaskToken::Plan)).unwrap();
        assert_eq!(plan.task_id(), None);
        assert_eq!(decode("<!-- vkflow:task=DF8D16104912 -->").unwrap().task_id(), None);
        assert_eq!(decode("<!-- vkflow:change=c -->").unwrap().task_id(), None);
    }
}
