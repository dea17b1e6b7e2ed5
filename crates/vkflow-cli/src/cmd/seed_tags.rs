use crate::output::{action_line, print_json};
use anyhow::Context;
use serde::Serialize;
use std::path::{Path, PathBuf};
use vkflow_core::kanban::{KanbanClient, TagAction};
use vkflow_core::tags::TagCatalogCache;

#[derive(Debug, Default, Serialize)]
pub struct SeedSummary {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
}

pub fn run(
    root: &Path,
    vk_url: Option<&str>,
    overwrite: bool,
    tags_dir: Option<PathBuf>,
    json: bool,
) -> anyhow::Result<()> {
    let config = super::load_config(root)?;
    let client = super::kanban_client(&config, vk_url)?;
    let catalog = super::catalog(tags_dir);
    seed(&client, &catalog, overwrite, json)
}

pub fn seed(
    client: &KanbanClient,
    catalog: &TagCatalogCache,
    overwrite: bool,
    json: bool,
) -> anyhow::Result<()> {
    let catalog = catalog.get().context("failed to load tag catalog")?;
    let mut summary = SeedSummary::default();
    let mut results = Vec::new();

    for tag in &catalog.tags {
        let action = client
            .upsert_tag(&tag.tag_name, &tag.content, overwrite)
            .with_context(|| format!("failed to seed tag @{}", tag.tag_name))?;
        match action {
            TagAction::Created => summary.created += 1,
            TagAction::Updated => summary.updated += 1,
            TagAction::Skipped => summary.skipped += 1,
        }

        if json {
            results.push(serde_json::json!({
                "tag_name": tag.tag_name,
                "source": tag.source,
                "action": action,
            }));
        } else {
            println!(
                "{}",
                action_line(action.as_str(), &format!("@{} ({})", tag.tag_name, tag.source))
            );
        }
    }

    if json {
        print_json(&serde_json::json!({ "tags": results, "summary": summary }))?;
    } else {
        println!(
            "\nDone. created={} updated={} skipped={}",
            summary.created, summary.updated, summary.skipped
        );
    }
    Ok(())
}
