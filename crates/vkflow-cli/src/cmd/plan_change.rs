use crate::output::print_json;
use std::path::Path;
use vkflow_core::plan::{self, PlanOutcome};

pub fn run(
    root: &Path,
    change: &str,
    project_id: Option<String>,
    title: Option<&str>,
    vk_url: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let config = super::load_config(root)?;
    let project_id = super::project_id(project_id, &config)?;
    let client = super::kanban_client(&config, vk_url)?;

    let outcome = plan::plan_change(&client, &project_id, change, title)?;

    if json {
        print_json(&outcome)?;
        return Ok(());
    }

    match outcome {
        PlanOutcome::Created { task } => {
            println!("Created plan task [{}]: {}", task.id, task.title)
        }
        PlanOutcome::AlreadyExists { task } => {
            println!(
                "Plan task already exists for '{change}' [{}]: {}",
                task.id, task.title
            )
        }
    }
    Ok(())
}
