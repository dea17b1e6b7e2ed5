use crate::output::print_json;
use anyhow::Context;
use std::path::{Path, PathBuf};
use vkflow_core::{
    openspec,
    scaffold::{self, FileStatus},
    tags::EmbeddedAssets,
};

pub struct InitOptions {
    pub tools: Option<String>,
    pub seed_tags: bool,
    pub force: bool,
    pub skip_openspec: bool,
    pub tags_dir: Option<PathBuf>,
}

pub fn run(
    root: &Path,
    opts: InitOptions,
    vk_url: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let config = super::load_config(root)?;

    if !json {
        println!("Initializing vkflow in: {}", root.display());
    }

    // 1. OpenSpec init (non-interactive)
    if !opts.skip_openspec {
        let tools = opts.tools.as_deref().unwrap_or(&config.openspec.tools);
        openspec::run_init(root, Some(tools)).context("openspec init failed")?;
    }

    // 2. Helper files (.vkflow/README.md, CI workflow)
    let files = scaffold::write_project_files(root, &EmbeddedAssets, opts.force)
        .context("failed to write vkflow helper files")?;

    if json {
        print_json(&serde_json::json!({ "root": root, "files": files }))?;
    } else {
        for file in &files {
            let rel = file.path.strip_prefix(root).unwrap_or(&file.path);
            let label = match file.status {
                FileStatus::Written => "created:",
                FileStatus::Exists => "exists: ",
            };
            println!("  {label} {}", rel.display());
        }
        println!("\nInit complete.");
        println!("- Next: start Vibe Kanban and run: vkflow seed-tags");
    }

    // 3. Optional tag seeding
    if opts.seed_tags {
        if !json {
            println!("\nSeeding tags...");
        }
        let client = super::kanban_client(&config, vk_url)?;
        let catalog = super::catalog(opts.tags_dir);
        super::seed_tags::seed(&client, &catalog, true, json)?;
    }

    Ok(())
}
