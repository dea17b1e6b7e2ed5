use crate::output::{print_json, print_table};
use anyhow::Context;
use std::path::Path;

pub fn run(root: &Path, vk_url: Option<&str>, json: bool) -> anyhow::Result<()> {
    let config = super::load_config(root)?;
    let client = super::kanban_client(&config, vk_url)?;
    let projects = client
        .list_projects()
        .with_context(|| format!("failed to list projects from {}", client.base_url()))?;

    if json {
        print_json(&projects)?;
        return Ok(());
    }

    if projects.is_empty() {
        println!("No projects.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = projects
        .into_iter()
        .map(|p| vec![p.id, p.name, p.git_repo_path.unwrap_or_default()])
        .collect();
    print_table(&["ID", "NAME", "REPO"], rows);
    Ok(())
}
