//! Invocation of the OpenSpec CLI through `npx`.
//!
//! OpenSpec owns the layout of `openspec/`; vkflow only shells out to it
//! with inherited stdio so its prompts and output reach the user directly.

use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{Result, VkflowError};

pub const OPENSPEC_PACKAGE: &str = "@fission-ai/openspec@latest";

pub fn init_args(tools: Option<&str>, path: Option<&Path>) -> Vec<String> {
    let mut args = vec!["-y".to_string(), OPENSPEC_PACKAGE.to_string(), "init".to_string()];
    if let Some(t) = tools.filter(|t| !t.is_empty()) {
        args.push("--tools".to_string());
        args.push(t.to_string());
    }
    if let Some(p) = path {
        args.push(p.display().to_string());
    }
    args
}

pub fn new_change_args(name: &str, description: Option<&str>, schema: Option<&str>) -> Vec<String> {
    let mut args = vec![
        "-y".to_string(),
        OPENSPEC_PACKAGE.to_string(),
        "new".to_string(),
        "change".to_string(),
        name.to_string(),
    ];
    if let Some(d) = description {
        args.push("--description".to_string());
        args.push(d.to_string());
    }
    if let Some(s) = schema {
        args.push("--schema".to_string());
        args.push(s.to_string());
    }
    args
}

/// `openspec init`, non-interactive, for the project at `root`.
pub fn run_init(root: &Path, tools: Option<&str>) -> Result<()> {
    run_npx(root, &init_args(tools, Some(root)), "openspec init")
}

/// `openspec new change <name>` inside `root`.
pub fn run_new_change(
    root: &Path,
    name: &str,
    description: Option<&str>,
    schema: Option<&str>,
) -> Result<()> {
    crate::paths::validate_change_name(name)?;
    run_npx(
        root,
        &new_change_args(name, description, schema),
        "openspec new change",
    )
}

fn run_npx(root: &Path, args: &[String], label: &str) -> Result<()> {
    let npx = which::which("npx").map_err(|_| VkflowError::ToolNotFound("npx".to_string()))?;
    tracing::info!(command = label, ?args, "running openspec");

    let status = Command::new(npx)
        .args(args)
        .current_dir(root)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()?;

    if !status.success() {
        return Err(VkflowError::ToolFailed {
            command: label.to_string(),
            code: status.code().unwrap_or(-1),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_args_include_tools_and_path() {
        let args = init_args(Some("codex,claude"), Some(Path::new("/work/proj")));
        assert_eq!(
            args,
            vec![
                "-y",
                OPENSPEC_PACKAGE,
                "init",
                "--tools",
                "codex,claude",
                "/work/proj"
            ]
        );
    }

    #[test]
    fn init_args_skip_empty_tools() {
        assert_eq!(init_args(Some(""), None), vec!["-y", OPENSPEC_PACKAGE, "init"]);
    }

    #[test]
    fn new_change_args_with_options() {
        let args = new_change_args("add-auth", Some("Add login"), Some("spec-driven"));
        assert_eq!(
            args,
            vec![
                "-y",
                OPENSPEC_PACKAGE,
                "new",
                "change",
                "add-auth",
                "--description",
                "Add login",
                "--schema",
                "spec-driven"
            ]
        );
    }

    #[test]
    fn new_change_rejects_bad_name_without_spawning() {
        let err = run_new_change(Path::new("."), "Bad Name", None, None).unwrap_err();
        assert!(matches!(err, VkflowError::InvalidChangeName(_)));
    }
}
