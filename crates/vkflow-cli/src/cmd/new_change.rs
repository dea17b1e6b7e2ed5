use anyhow::Context;
use std::path::Path;
use vkflow_core::{openspec, paths};

pub fn run(
    root: &Path,
    name: &str,
    description: Option<&str>,
    schema: Option<&str>,
) -> anyhow::Result<()> {
    paths::validate_change_name(name)?;
    openspec::run_new_change(root, name, description, schema)
        .with_context(|| format!("failed to scaffold change '{name}'"))?;

    println!("\nChange scaffolded: {}", paths::change_ref(name));
    println!("Next: write tasks.md (see @vkflow_tasks_format), then run:");
    println!("  vkflow import-change --change {name} --project-id <uuid>");
    Ok(())
}
