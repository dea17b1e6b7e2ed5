use crate::error::{Result, VkflowError};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const VKFLOW_DIR: &str = ".vkflow";
pub const VKFLOW_README: &str = ".vkflow/README.md";
pub const CONFIG_FILE: &str = ".vkflow/config.yaml";

pub const OPENSPEC_CHANGES_DIR: &str = "openspec/changes";
pub const TASKS_FILE: &str = "tasks.md";

pub const VALIDATE_WORKFLOW: &str = ".github/workflows/openspec-validate.yml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn readme_path(root: &Path) -> PathBuf {
    root.join(VKFLOW_README)
}

pub fn validate_workflow_path(root: &Path) -> PathBuf {
    root.join(VALIDATE_WORKFLOW)
}

pub fn change_dir(root: &Path, change: &str) -> PathBuf {
    root.join(OPENSPEC_CHANGES_DIR).join(change)
}

pub fn tasks_file(root: &Path, change: &str) -> PathBuf {
    change_dir(root, change).join(TASKS_FILE)
}

/// Repository-relative location of a change, as written into task footers.
pub fn change_ref(change: &str) -> String {
    format!("{OPENSPEC_CHANGES_DIR}/{change}")
}

// ---------------------------------------------------------------------------
// Change name validation
// ---------------------------------------------------------------------------

static CHANGE_RE: OnceLock<Regex> = OnceLock::new();

fn change_re() -> &'static Regex {
    CHANGE_RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9\-]*[a-z0-9]$|^[a-z0-9]$").unwrap())
}

/// Change names end up inside markers, so they must never contain whitespace.
pub fn validate_change_name(change: &str) -> Result<()> {
    if change.is_empty() || change.len() > 64 || !change_re().is_match(change) {
        return Err(VkflowError::InvalidChangeName(change.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
