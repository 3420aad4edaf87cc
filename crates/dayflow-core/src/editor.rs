//! Draft/commit editing of a day plan.
//!
//! A [`PlanEditor`] holds the plan as it was loaded and a working draft. Every
//! change goes to the draft; [`PlanEditor::save`] hands the draft back for
//! persisting and [`PlanEditor::cancel`] discards it.

use log::debug;

use crate::{
    error::{PlannerError, Result},
    models::{ClockTime, DayPlan, ScheduleItem, Segment},
    params::{ItemEdit, PlanEdit, MAX_DURATION},
};

#[derive(Debug, Clone)]
pub struct PlanEditor {
    original: DayPlan,
    draft: DayPlan,
}

impl PlanEditor {
    pub fn new(plan: DayPlan) -> Self {
        Self {
            draft: plan.clone(),
            original: plan,
        }
    }

    pub fn draft(&self) -> &DayPlan {
        &self.draft
    }

    /// Whether the draft differs from the plan the editor was opened with.
    pub fn is_dirty(&self) -> bool {
        self.draft != self.original
    }

    /// Changes one field of an item.
    pub fn update_item(&mut self, segment: Segment, index: usize, edit: ItemEdit) -> Result<()> {
        let item = self.item_mut(segment, index)?;
        match edit {
            ItemEdit::Time(time) => {
                let time: ClockTime = time.parse()?;
                item.time = time.to_string();
            }
            ItemEdit::Title(title) => {
                let title = title.trim();
                if title.is_empty() {
                    return Err(PlannerError::invalid_input("title")
                        .with_reason("Item title must not be empty"));
                }
                item.task_title = title.to_string();
            }
            ItemEdit::Kind(kind) => item.kind = kind,
            ItemEdit::Duration(minutes) if minutes == 0 || minutes > MAX_DURATION => {
                return Err(PlannerError::invalid_input("duration").with_reason(format!(
                    "Duration must be between 1 and {MAX_DURATION} minutes"
                )));
            }
            ItemEdit::Duration(minutes) => item.duration = minutes,
            ItemEdit::Reason(reason) => {
                item.reason = reason
                    .map(|r| r.trim().to_string())
                    .filter(|r| !r.is_empty());
            }
        }
        Ok(())
    }

    /// Swaps an item with its predecessor. Returns false at the top of the
    /// segment or for an index past the end.
    pub fn move_up(&mut self, segment: Segment, index: usize) -> bool {
        let items = self.draft.segment_mut(segment);
        if index == 0 || index >= items.len() {
            return false;
        }
        items.swap(index - 1, index);
        true
    }

    /// Swaps an item with its successor. Returns false at the bottom of the
    /// segment or for an index past the end.
    pub fn move_down(&mut self, segment: Segment, index: usize) -> bool {
        let items = self.draft.segment_mut(segment);
        if index + 1 >= items.len() {
            return false;
        }
        items.swap(index, index + 1);
        true
    }

    /// Removes an item. Fails unless the caller confirmed the removal.
    pub fn remove_item(
        &mut self,
        segment: Segment,
        index: usize,
        confirmed: bool,
    ) -> Result<ScheduleItem> {
        if !confirmed {
            return Err(PlannerError::invalid_input("confirmed")
                .with_reason("Removing a schedule item requires confirmation"));
        }
        self.item_mut(segment, index)?;
        Ok(self.draft.segment_mut(segment).remove(index))
    }

    /// Applies one edit. Returns whether the draft changed.
    pub fn apply(&mut self, edit: PlanEdit) -> Result<bool> {
        debug!("Applying plan edit: {edit:?}");
        match edit {
            PlanEdit::MoveUp { segment, index } => Ok(self.move_up(segment, index)),
            PlanEdit::MoveDown { segment, index } => Ok(self.move_down(segment, index)),
            PlanEdit::Remove {
                segment,
                index,
                confirmed,
            } => self.remove_item(segment, index, confirmed).map(|_| true),
            PlanEdit::Update {
                segment,
                index,
                edit,
            } => self.update_item(segment, index, edit).map(|_| true),
        }
    }

    /// Commits the draft.
    pub fn save(self) -> DayPlan {
        self.draft
    }

    /// Discards the draft and returns the plan as it was opened.
    pub fn cancel(self) -> DayPlan {
        self.original
    }

    fn item_mut(&mut self, segment: Segment, index: usize) -> Result<&mut ScheduleItem> {
        let items = self.draft.segment_mut(segment);
        let len = items.len();
        items.get_mut(index).ok_or_else(|| {
            PlannerError::invalid_input("index").with_reason(format!(
                "{} has {len} item(s), no item at position {}",
                segment.label(),
                index + 1
            ))
        })
    }
}
