use crate::error::{Result, VkflowError};
use crate::tasks_md::TaskRecord;
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use std::fmt;

/// Number of hex characters kept from the digest.
pub const TASK_ID_LEN: usize = 12;

/// Content fingerprint of a task: the first 12 hex characters of
/// SHA-1(title + "\n" + description).
///
/// The exact bytes are hashed, so any edit to the title or description
/// (including whitespace and case) produces a new identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskIdentity(String);

impl TaskIdentity {
    pub fn compute(title: &str, description: &str) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(title.as_bytes());
        hasher.update(b"\n");
        hasher.update(description.as_bytes());
        let hex = format!("{:x}", hasher.finalize());
        Self(hex[..TASK_ID_LEN].to_string())
    }

    pub fn of(task: &TaskRecord) -> Self {
        Self::compute(&task.title, &task.description)
    }

    /// Accept a previously computed identity, e.g. one decoded from a marker.
    pub fn parse(s: &str) -> Result<Self> {
        let valid = s.len() == TASK_ID_LEN
            && s.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c));
        if !valid {
            return Err(VkflowError::InvalidTaskId(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TaskIdentity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_short_hex(s: &str) -> bool {
        s.len() == 12 && s.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f'))
    }

    #[test]
    fn stable_for_same_input() {
        let a = TaskIdentity::compute("A", "B");
        let b = TaskIdentity::compute("A", "B");
        assert_eq!(a, b);
        assert!(is_short_hex(a.as_str()), "unexpected id: {a}");
    }

    #[test]
    fn changes_when_content_changes() {
        let a = TaskIdentity::compute("A", "B");
        assert_ne!(a, TaskIdentity::compute("A", "B2"));
        assert_ne!(a, TaskIdentity::compute("A2", "B"));
    }

    #[test]
    fn matches_known_digest() {
        // Ids already stored in task descriptions must keep matching.
        assert_eq!(TaskIdentity::compute("A", "B").as_str(), "df8d16104912");
        assert_eq!(TaskIdentity::compute("A", "B2").as_str(), "4868f9a78355");
    }

    #[test]
    fn separator_distinguishes_field_boundaries() {
        assert_ne!(
            TaskIdentity::compute("ab", "c"),
            TaskIdentity::compute("a", "bc")
        );
    }

    #[test]
    fn no_normalization_is_applied() {
        assert_ne!(
            TaskIdentity::compute("Title", "body"),
            TaskIdentity::compute("title", "body")
        );
        assert_ne!(
            TaskIdentity::compute("Title", "body"),
            TaskIdentity::compute("Title", "body ")
        );
    }

    #[test]
    fn of_uses_record_fields() {
        let task = TaskRecord::new("Write docs", "README and guide");
        assert_eq!(
            TaskIdentity::of(&task),
            TaskIdentity::compute("Write docs", "README and guide")
        );
    }

    #[test]
    fn parse_round_trips_computed_ids() {
        let id = TaskIdentity::compute("x", "y");
        assert_eq!(TaskIdentity::parse(id.as_str()).unwrap(), id);
    }

    #[test]
    fn parse_rejects_malformed_ids() {
        for bad in ["", "plan", "ABCDEF123456", "abc", "0123456789abc", "zzzzzzzzzzzz"] {
            assert!(TaskIdentity::parse(bad).is_err(), "expected invalid: {bad}");
        }
    }
}
