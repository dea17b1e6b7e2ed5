mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "vkflow",
    about = "OpenSpec + Vibe Kanban workflow kit: seed tags, scaffold changes and import tasks",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .vkflow/, openspec/ or .git/)
    #[arg(long, global = true, env = "VKFLOW_ROOT")]
    root: Option<PathBuf>,

    /// Vibe Kanban backend URL (default: config, VIBE_BACKEND_URL, PORT or port file)
    #[arg(long, global = true, env = "VKFLOW_VK_URL")]
    vk_url: Option<String>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize OpenSpec and the vkflow helper files in the current project
    Init {
        /// Agent tools passed to `openspec init --tools`
        #[arg(long)]
        tools: Option<String>,

        /// Seed tags into Vibe Kanban after initializing
        #[arg(long)]
        seed_tags: bool,

        /// Overwrite existing helper files
        #[arg(long)]
        force: bool,

        /// Do not run `openspec init`
        #[arg(long)]
        skip_openspec: bool,

        /// Read tags and templates from this directory instead of the built-in set
        #[arg(long)]
        tags_dir: Option<PathBuf>,
    },

    /// Create or update the vkflow prompt tags in Vibe Kanban
    SeedTags {
        /// Leave tags that already exist untouched
        #[arg(long)]
        no_overwrite: bool,

        /// Read tags from this directory instead of the built-in set
        #[arg(long)]
        tags_dir: Option<PathBuf>,
    },

    /// List Vibe Kanban projects
    Projects,

    /// Scaffold a new OpenSpec change
    NewChange {
        name: String,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        schema: Option<String>,
    },

    /// Import a change's tasks.md into a Vibe Kanban project (safe to re-run)
    ImportChange {
        /// Change name (directory under openspec/changes/)
        #[arg(long)]
        change: String,

        /// Target project UUID (default: project_id in .vkflow/config.yaml)
        #[arg(long)]
        project_id: Option<String>,

        /// Tasks file (default: openspec/changes/<change>/tasks.md)
        #[arg(long)]
        tasks_file: Option<PathBuf>,

        /// Show what would be created without creating anything
        #[arg(long)]
        dry_run: bool,

        /// Create tasks even when they were already imported
        #[arg(long)]
        allow_duplicates: bool,

        /// Do not append the execution guidance block
        #[arg(long)]
        no_appendix: bool,
    },

    /// Create the planning task for a change (once per change)
    PlanChange {
        #[arg(long)]
        change: String,

        /// Target project UUID (default: project_id in .vkflow/config.yaml)
        #[arg(long)]
        project_id: Option<String>,

        /// Task title (default: "Plan: <change>")
        #[arg(long)]
        title: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(rust_log.as_deref()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    let vk_url = cli.vk_url.as_deref();

    let result = match cli.command {
        Commands::Init {
            tools,
            seed_tags,
            force,
            skip_openspec,
            tags_dir,
        } => cmd::init::run(
            &root,
            cmd::init::InitOptions {
                tools,
                seed_tags,
                force,
                skip_openspec,
                tags_dir,
            },
            vk_url,
            cli.json,
        ),
        Commands::SeedTags {
            no_overwrite,
            tags_dir,
        } => cmd::seed_tags::run(&root, vk_url, !no_overwrite, tags_dir, cli.json),
        Commands::Projects => cmd::projects::run(&root, vk_url, cli.json),
        Commands::NewChange {
            name,
            description,
            schema,
        } => cmd::new_change::run(&root, &name, description.as_deref(), schema.as_deref()),
        Commands::ImportChange {
            change,
            project_id,
            tasks_file,
            dry_run,
            allow_duplicates,
            no_appendix,
        } => cmd::import_change::run(
            &root,
            cmd::import_change::ImportArgs {
                change,
                project_id,
                tasks_file,
                dry_run,
                allow_duplicates,
                no_appendix,
            },
            vk_url,
            cli.json,
        ),
        Commands::PlanChange {
            change,
            project_id,
            title,
        } => cmd::plan_change::run(
            &root,
            &change,
            project_id,
            title.as_deref(),
            vk_url,
            cli.json,
        ),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

/// `RUST_LOG` directives when set, otherwise WARN.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .parse_lossy(directives.unwrap_or_default())
}
