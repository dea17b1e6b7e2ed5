pub mod import_change;
pub mod init;
pub mod new_change;
pub mod plan_change;
pub mod projects;
pub mod seed_tags;

use anyhow::Context;
use std::path::{Path, PathBuf};
use vkflow_core::config::{self, Config, SystemEnv};
use vkflow_core::kanban::KanbanClient;
use vkflow_core::tags::TagCatalogCache;

pub fn load_config(root: &Path) -> anyhow::Result<Config> {
    Config::load(root).context("failed to load .vkflow/config.yaml")
}

/// Build a Vibe Kanban client from the flag, project config and environment.
pub fn kanban_client(config: &Config, vk_url: Option<&str>) -> anyhow::Result<KanbanClient> {
    let base_url = config::resolve_base_url(vk_url, config, &SystemEnv)?;
    tracing::debug!(%base_url, "resolved Vibe Kanban backend");
    Ok(KanbanClient::new(base_url))
}

pub fn project_id(explicit: Option<String>, config: &Config) -> anyhow::Result<String> {
    explicit
        .or_else(|| config.project_id.clone())
        .context("--project-id is required (or set project_id in .vkflow/config.yaml)")
}

pub fn catalog(tags_dir: Option<PathBuf>) -> TagCatalogCache {
    match tags_dir {
        Some(dir) => TagCatalogCache::from_dir(dir),
        None => TagCatalogCache::embedded(),
    }
}
