//! Day plan operations for the Planner.

use jiff::Zoned;
use log::{debug, info};

use super::Planner;
use crate::{
    credential::validate_api_key,
    editor::PlanEditor,
    error::{PlannerError, Result},
    models::{ClockTime, DayPlan, HistoryEntry, HistorySnapshot, TimeBudget},
    params::{Confirm, EditPlan, GeneratePlan, ItemEdit, PlanEdit},
    prompt::build_prompt,
};

/// Result of a successful generation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOutcome {
    /// History entry recorded for this generation; its plan is now the live
    /// plan
    pub entry: HistoryEntry,
    /// Set when the tasks need more time than is left today
    pub budget: Option<TimeBudget>,
}

fn describe(edit: &PlanEdit) -> String {
    match edit {
        PlanEdit::MoveUp { segment, index } => {
            format!("Moved {} item {} up", segment.as_str(), index + 1)
        }
        PlanEdit::MoveDown { segment, index } => {
            format!("Moved {} item {} down", segment.as_str(), index + 1)
        }
        PlanEdit::Remove { segment, index, .. } => {
            format!("Removed {} item {}", segment.as_str(), index + 1)
        }
        PlanEdit::Update {
            segment,
            index,
            edit,
        } => {
            let field = match edit {
                ItemEdit::Time(_) => "time",
                ItemEdit::Title(_) => "title",
                ItemEdit::Kind(_) => "type",
                ItemEdit::Duration(_) => "duration",
                ItemEdit::Reason(_) => "reason",
            };
            format!("Updated {field} of {} item {}", segment.as_str(), index + 1)
        }
    }
}

impl Planner {
    /// Generates a new day plan from the current tasks.
    ///
    /// The stored API key is checked first: no key fails with
    /// `CredentialMissing`, a malformed one with `CredentialInvalid`. On
    /// success the new plan and its history entry are stored together; on
    /// any failure nothing is written.
    pub async fn generate_plan(&self, params: &GeneratePlan) -> Result<GenerationOutcome> {
        let (api_key, stored_language, tasks) = self
            .with_database(|db| Ok((db.api_key()?, db.language()?, db.list_tasks()?)))
            .await?;

        let api_key = api_key.ok_or(PlannerError::CredentialMissing)?;
        let api_key = validate_api_key(&api_key)?;
        let language = params.language.unwrap_or(stored_language);

        let now = Zoned::now().time();
        let prompt = build_prompt(&tasks, language, ClockTime::from_civil(now))?;
        debug!(
            "Generating plan for {} task(s) in {}",
            tasks.len(),
            language.as_str()
        );

        let generated = self.client.generate(api_key, &prompt).await?;
        let snapshot =
            HistorySnapshot::capture(&generated.plan, &tasks, generated.usage, &generated.model);
        let entry = self
            .with_database(move |db| db.store_generation(&snapshot))
            .await?;
        info!("Stored generated plan as history entry {}", entry.id);

        Ok(GenerationOutcome {
            entry,
            budget: TimeBudget::check(&tasks, now),
        })
    }

    /// Returns the live plan, if one was generated.
    pub async fn current_plan(&self) -> Result<Option<DayPlan>> {
        self.with_database(|db| db.get_current_plan()).await
    }

    /// Returns the live plan or `PlanNotFound`.
    pub async fn require_plan(&self) -> Result<DayPlan> {
        self.current_plan().await?.ok_or(PlannerError::PlanNotFound)
    }

    /// Applies a batch of edits to the live plan.
    ///
    /// All edits go to one draft. The draft is saved only when every edit
    /// succeeded; otherwise it is discarded and the stored plan is left as it
    /// was. Returns the resulting plan and a description of each change that
    /// took effect.
    pub async fn edit_plan(&self, params: &EditPlan) -> Result<(DayPlan, Vec<String>)> {
        let plan = self.require_plan().await?;
        let mut editor = PlanEditor::new(plan);
        let mut changes = Vec::new();

        for edit in &params.edits {
            match editor.apply(edit.clone()) {
                Ok(true) => changes.push(describe(edit)),
                Ok(false) => debug!("Edit had no effect: {edit:?}"),
                Err(e) => {
                    editor.cancel();
                    return Err(e);
                }
            }
        }

        if !editor.is_dirty() {
            return Ok((editor.cancel(), changes));
        }

        let plan = editor.save();
        let stored = plan.clone();
        self.with_database(move |db| db.save_current_plan(&stored))
            .await?;
        Ok((plan, changes))
    }

    /// Removes the live plan. History is kept. Requires confirmation.
    pub async fn clear_plan(&self, params: &Confirm) -> Result<bool> {
        if !params.confirmed {
            return Err(PlannerError::invalid_input("confirmed")
                .with_reason("Clearing the plan requires confirmation"));
        }
        self.with_database(|db| db.clear_current_plan()).await
    }
}
