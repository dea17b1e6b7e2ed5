use crate::output::{action_line, print_json};
use anyhow::Context;
use std::path::{Path, PathBuf};
use vkflow_core::{
    import::{self, ImportPlan, ImportRequest},
    io, paths,
    reconcile::{ImportDecision, ReconcileOptions},
    VkflowError,
};

pub struct ImportArgs {
    pub change: String,
    pub project_id: Option<String>,
    pub tasks_file: Option<PathBuf>,
    pub dry_run: bool,
    pub allow_duplicates: bool,
    pub no_appendix: bool,
}

pub fn run(root: &Path, args: ImportArgs, vk_url: Option<&str>, json: bool) -> anyhow::Result<()> {
    let config = super::load_config(root)?;
    let project_id = super::project_id(args.project_id, &config)?;
    paths::validate_change_name(&args.change)?;

    let tasks_file = match args.tasks_file {
        Some(p) if p.is_absolute() => p,
        Some(p) => std::env::current_dir()
            .context("failed to read current directory")?
            .join(p),
        None => paths::tasks_file(root, &args.change),
    };
    if !tasks_file.is_file() {
        return Err(VkflowError::TasksFileNotFound(tasks_file.display().to_string()).into());
    }
    let document = io::read_text(&tasks_file)
        .with_context(|| format!("failed to read {}", tasks_file.display()))?;

    let client = super::kanban_client(&config, vk_url)?;
    let request = ImportRequest {
        change: &args.change,
        project_id: &project_id,
        document: &document,
        options: ReconcileOptions {
            allow_duplicates: args.allow_duplicates,
            appendix: if args.no_appendix {
                None
            } else {
                config.appendix()
            },
        },
    };
    let plan = import::plan_import(&client, &request)?;

    if args.dry_run {
        return print_dry_run(&plan, json);
    }

    let report = import::execute(&client, &plan, |created| {
        if !json {
            println!("{}", action_line("created", &created.title));
        }
    })?;

    if json {
        print_json(&report)?;
    } else {
        for title in &report.skipped {
            println!("{}", action_line("skipped", &format!("{title} (already imported)")));
        }
        println!(
            "\nDone. Imported {} tasks, skipped {}.",
            report.created.len(),
            report.skipped.len()
        );
    }
    Ok(())
}

fn print_dry_run(plan: &ImportPlan, json: bool) -> anyhow::Result<()> {
    if json {
        print_json(plan)?;
        return Ok(());
    }

    println!(
        "Would create {} tasks in project {} (skipping {}):",
        plan.to_create(),
        plan.project_id,
        plan.to_skip()
    );
    for decision in &plan.decisions {
        let label = match decision {
            ImportDecision::Create { .. } => "create",
            ImportDecision::Skip { .. } => "skip",
        };
        println!(
            "{}",
            action_line(label, &format!("{} [{}]", decision.title(), decision.task_id()))
        );
    }
    Ok(())
}
