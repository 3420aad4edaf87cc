//! Command handlers.
//!
//! `Cli` turns parsed arguments into planner calls and renders the results
//! with the core display wrappers.

use std::{fs, io, path::Path};

use anyhow::{bail, Context, Result};
use dayflow_core::{
    display::{HistoryEntries, OperationStatus, Tasks},
    models::HistoryTotals,
    params::{EditPlan, ImportTasks, PlanEdit},
    ClockTime, CreateResult, DeleteResult, Language, Planner, UpdateResult,
};
use log::debug;

use crate::{
    args::{ConfigCommands, HistoryCommands, PlanCommands, SyncCommands, TaskCommands},
    renderer::TerminalRenderer,
};

pub struct Cli {
    planner: Planner,
    renderer: TerminalRenderer,
}

fn read_import_source(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => io::read_to_string(io::stdin()).context("Failed to read standard input"),
    }
}

impl Cli {
    pub fn new(planner: Planner, renderer: TerminalRenderer) -> Self {
        Self { planner, renderer }
    }

    pub async fn list_tasks(&self) -> Result<()> {
        let tasks = self
            .planner
            .list_tasks()
            .await
            .context("Failed to list tasks")?;
        self.renderer.render(&Tasks(tasks));
        Ok(())
    }

    pub async fn handle_task_command(&self, command: TaskCommands) -> Result<()> {
        match command {
            TaskCommands::Add(args) => {
                let task = self
                    .planner
                    .add_task(&args.into())
                    .await
                    .context("Failed to add task")?;
                self.renderer.render(&CreateResult::new(task));
            }
            TaskCommands::List => self.list_tasks().await?,
            TaskCommands::Remove(args) => {
                let task = self
                    .planner
                    .remove_task(&args.into())
                    .await
                    .context("Failed to remove task")?;
                self.renderer.render(&DeleteResult::new(task));
            }
            TaskCommands::Clear(args) => {
                let removed = self
                    .planner
                    .clear_tasks(&args.into())
                    .await
                    .context("Failed to clear tasks")?;
                self.renderer
                    .render(&OperationStatus::success(format!("Removed {removed} task(s)")));
            }
            TaskCommands::Import(args) => {
                let text = read_import_source(args.file.as_deref())?;
                debug!("Importing {} byte(s) of task text", text.len());
                let summary = self
                    .planner
                    .import_tasks(&ImportTasks { text })
                    .await
                    .context("Failed to import tasks")?;
                self.renderer.render(&summary);
            }
            TaskCommands::Export => {
                let text = self
                    .planner
                    .export_tasks()
                    .await
                    .context("Failed to export tasks")?;
                self.renderer.raw(&text);
            }
        }
        Ok(())
    }

    async fn edit(&self, edits: Vec<PlanEdit>) -> Result<()> {
        if edits.is_empty() {
            bail!("Nothing to change: pass at least one of --time, --title, --kind, --duration, --reason");
        }
        let (plan, changes) = self
            .planner
            .edit_plan(&EditPlan { edits })
            .await
            .context("Failed to edit plan")?;
        self.renderer
            .render(&UpdateResult::with_changes(plan, changes));
        Ok(())
    }

    pub async fn handle_plan_command(&self, command: PlanCommands) -> Result<()> {
        match command {
            PlanCommands::Generate(args) => {
                let outcome = self
                    .planner
                    .generate_plan(&args.into())
                    .await
                    .context("Failed to generate plan")?;
                self.renderer.render(&outcome);
            }
            PlanCommands::Show => {
                let plan = self.planner.require_plan().await?;
                self.renderer.render(&plan);
            }
            PlanCommands::Now => {
                let plan = self.planner.require_plan().await?;
                match plan.current_item(ClockTime::now()) {
                    Some(current) => self.renderer.render(&current),
                    None => self
                        .renderer
                        .render(&OperationStatus::success("Nothing is scheduled right now")),
                }
            }
            PlanCommands::Clear(args) => {
                let cleared = self
                    .planner
                    .clear_plan(&args.into())
                    .await
                    .context("Failed to clear plan")?;
                let status = if cleared {
                    OperationStatus::success("Cleared the current plan")
                } else {
                    OperationStatus::warning("There was no plan to clear")
                };
                self.renderer.render(&status);
            }
            PlanCommands::MoveUp(item) => self.edit(vec![item.move_up()]).await?,
            PlanCommands::MoveDown(item) => self.edit(vec![item.move_down()]).await?,
            PlanCommands::Remove(args) => self.edit(vec![args.into()]).await?,
            PlanCommands::Set(args) => self.edit(args.into()).await?,
        }
        Ok(())
    }

    pub async fn handle_history_command(&self, command: HistoryCommands) -> Result<()> {
        match command {
            HistoryCommands::List => {
                let entries = self
                    .planner
                    .list_history()
                    .await
                    .context("Failed to list history")?;
                let totals = HistoryTotals::from_entries(&entries);
                self.renderer.render(&HistoryEntries(entries));
                if totals.entries > 0 {
                    self.renderer.render(&totals);
                }
            }
            HistoryCommands::Show(args) => {
                let entry = self.planner.get_history(&args.into()).await?;
                self.renderer.render(&entry);
            }
            HistoryCommands::Export(args) => {
                let text = self.planner.export_history_tasks(&args.into()).await?;
                self.renderer.raw(&text);
            }
            HistoryCommands::Clear(args) => {
                let removed = self
                    .planner
                    .clear_history(&args.into())
                    .await
                    .context("Failed to clear history")?;
                self.renderer.render(&OperationStatus::success(format!(
                    "Removed {removed} history entr(ies)"
                )));
            }
        }
        Ok(())
    }

    pub async fn handle_config_command(&self, command: ConfigCommands) -> Result<()> {
        match command {
            ConfigCommands::SetKey(args) => {
                self.planner
                    .set_api_key(&args.into())
                    .await
                    .context("Failed to store API key")?;
                self.renderer
                    .render(&OperationStatus::success("API key saved"));
            }
            ConfigCommands::RemoveKey(args) => {
                let removed = self
                    .planner
                    .remove_api_key(&args.into())
                    .await
                    .context("Failed to remove API key")?;
                let status = if removed {
                    OperationStatus::success("API key removed")
                } else {
                    OperationStatus::warning("No API key was stored")
                };
                self.renderer.render(&status);
            }
            ConfigCommands::Show => {
                let overview = self
                    .planner
                    .settings()
                    .await
                    .context("Failed to read settings")?;
                self.renderer.render(&overview);
            }
            ConfigCommands::Language(args) => {
                let language: Language = args.language.into();
                self.planner
                    .set_language(language)
                    .await
                    .context("Failed to store language")?;
                self.renderer.render(&OperationStatus::success(format!(
                    "Plans will be generated in {language}"
                )));
            }
        }
        Ok(())
    }

    pub async fn handle_sync_command(&self, command: SyncCommands) -> Result<()> {
        match command {
            SyncCommands::Enable(args) => {
                let settings = self
                    .planner
                    .enable_sync(&args.into())
                    .await
                    .context("Failed to enable sync")?;
                self.renderer.render(&OperationStatus::success(format!(
                    "Sync enabled for {} at {}",
                    settings.user_id, settings.endpoint
                )));
            }
            SyncCommands::Disable => {
                let dropped = self
                    .planner
                    .disable_sync()
                    .await
                    .context("Failed to disable sync")?;
                let status = if dropped > 0 {
                    OperationStatus::warning(format!(
                        "Sync disabled; dropped {dropped} unsynced change(s)"
                    ))
                } else {
                    OperationStatus::success("Sync disabled")
                };
                self.renderer.render(&status);
            }
            SyncCommands::Status => {
                let status = self
                    .planner
                    .sync_status()
                    .await
                    .context("Failed to read sync status")?;
                self.renderer.render(&status);
            }
            SyncCommands::Run => {
                let report = self.planner.sync_now().await.context("Sync failed")?;
                self.renderer.render(&report);
                if !report.is_complete() {
                    bail!("{} change(s) are still pending", report.pending);
                }
            }
        }
        Ok(())
    }
}
