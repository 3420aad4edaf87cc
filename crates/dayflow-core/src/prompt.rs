//! Prompt construction for schedule generation.
//!
//! The prompt is plain text. Tasks are embedded as pretty-printed JSON, split
//! into a fixed-time block (tasks the model must not move) and a flexible
//! block, followed by a numbered list of scheduling rules in the requested
//! language.

use serde::Serialize;

use crate::{
    error::{PlannerError, Result},
    models::{ClockTime, Language, Task},
};

/// Task as the model sees it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PromptTask<'a> {
    title: &'a str,
    duration: u32,
    priority: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    deadline: Option<ClockTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fixed_time: Option<ClockTime>,
}

impl<'a> From<&'a Task> for PromptTask<'a> {
    fn from(task: &'a Task) -> Self {
        Self {
            title: &task.title,
            duration: task.duration,
            priority: task.priority.label(),
            deadline: task.deadline,
            fixed_time: task.fixed_time,
        }
    }
}

struct Catalog {
    intro: &'static str,
    current_time: &'static str,
    time_note: &'static str,
    fixed_title: &'static str,
    fixed_note: &'static str,
    flexible_title: &'static str,
    rules_title: &'static str,
    rules: [&'static str; 11],
    start_from_now: &'static str,
}

const VI: Catalog = Catalog {
    intro: "Tôi là một trợ lý năng suất cá nhân. Hãy giúp tôi lập kế hoạch làm việc dựa trên danh sách công việc sau đây.",
    current_time: "Thời gian hiện tại là",
    time_note: "Nếu thời gian hiện tại là buổi chiều hoặc tối, hãy lên lịch cho ngày mai hoặc phần còn lại của ngày hôm nay một cách hợp lý.",
    fixed_title: "⚠️ QUAN TRỌNG - CÁC CÔNG VIỆC CÓ THỜI GIAN CỐ ĐỊNH (BẮT BUỘC):",
    fixed_note: "Những công việc này PHẢI được sắp xếp đúng thời gian \"fixedTime\" được chỉ định. Ví dụ: Nếu có \"fixedTime\": \"15:00\" và \"duration\": 60, thì phải sắp xếp từ 15:00-16:00. KHÔNG ĐƯỢC thay đổi thời gian này!",
    flexible_title: "Các công việc linh hoạt (có thể sắp xếp):",
    rules_title: "Yêu cầu:",
    rules: [
        "**BẮT BUỘC**: Các công việc có \"fixedTime\" PHẢI được sắp xếp đúng thời gian đã chỉ định.",
        "Sắp xếp các công việc linh hoạt xung quanh các công việc có thời gian cố định.",
        "Sắp xếp công việc linh hoạt dựa trên Mức độ ưu tiên (Cao làm trước) và Thời hạn (Deadline).",
        "Tự động chèn thời gian nghỉ (break) hợp lý (ví dụ: làm 60-90 phút nghỉ 10-15 phút), nhưng tránh đặt break ngay trước/sau fixed time tasks.",
        "Thêm thời gian đệm (buffer) nếu cần thiết để tránh quá tải và để di chuyển giữa các công việc.",
        "Gom nhóm các công việc tương tự nhau nếu có thể.",
        "Xuất ra các mẹo tối ưu hóa cụ thể cho danh sách này.",
        "Ngôn ngữ phản hồi: Tiếng Việt.",
        "Có thời gian cho các việc hằng ngày như: ăn sáng, ăn trưa, ăn tối, tắm, ngủ, ...",
        "Nên thiết kế theo pomodoro technique. Giữa các lần làm việc nên có break time tầm 5 phút.",
        "Có thể sửa lại tên công việc nếu sai chính tả, hoặc khác ngôn ngữ.",
    ],
    start_from_now: "Bắt đầu làm việc tại thời điểm hiện tại",
};

const EN: Catalog = Catalog {
    intro: "I am a personal productivity assistant. Please help me create a work schedule based on the following task list.",
    current_time: "Current time is",
    time_note: "If current time is afternoon or evening, schedule for tomorrow or the remaining part of today appropriately.",
    fixed_title: "⚠️ IMPORTANT - FIXED TIME TASKS (MANDATORY):",
    fixed_note: "These tasks MUST be scheduled at the exact \"fixedTime\" specified. For example: If \"fixedTime\": \"15:00\" and \"duration\": 60, it must be scheduled from 15:00-16:00. DO NOT change this time!",
    flexible_title: "Flexible tasks (can be rearranged):",
    rules_title: "Requirements:",
    rules: [
        "**MANDATORY**: Tasks with \"fixedTime\" MUST be scheduled at the specified time.",
        "Arrange flexible tasks around fixed-time tasks.",
        "Arrange flexible tasks based on Priority (High first) and Deadline.",
        "Automatically insert reasonable break times (e.g., work 60-90 min, break 10-15 min), but avoid placing breaks right before/after fixed time tasks.",
        "Add buffer time if necessary to avoid overload and for transitions between tasks.",
        "Group similar tasks together when possible.",
        "Provide optimization tips specific to this task list.",
        "Response language: English.",
        "Include time for daily routines: breakfast, lunch, dinner, shower, sleep, etc.",
        "Design based on pomodoro technique. Add ~5 minute breaks between work sessions.",
        "Task titles may be corrected for spelling or translated into the response language.",
    ],
    start_from_now: "Start scheduling from the current time",
};

fn catalog(language: Language) -> &'static Catalog {
    match language {
        Language::Vi => &VI,
        Language::En => &EN,
    }
}

/// Splits tasks into `(fixed, flexible)`, preserving input order.
pub fn partition_tasks(tasks: &[Task]) -> (Vec<&Task>, Vec<&Task>) {
    tasks.iter().partition(|task| task.is_fixed())
}

/// Builds the generation prompt for `tasks` as seen at clock time `now`.
///
/// Fails with `InvalidInput` when `tasks` is empty.
pub fn build_prompt(tasks: &[Task], language: Language, now: ClockTime) -> Result<String> {
    if tasks.is_empty() {
        return Err(PlannerError::invalid_input("tasks")
            .with_reason("At least one task is required to generate a plan"));
    }

    let text = catalog(language);
    let (fixed, flexible) = partition_tasks(tasks);

    let mut sections = vec![
        text.intro.to_string(),
        format!("{}: {now}.\n{}", text.current_time, text.time_note),
    ];

    if !fixed.is_empty() {
        sections.push(format!(
            "{}\n{}\n\n{}",
            text.fixed_title,
            render_tasks(&fixed)?,
            text.fixed_note
        ));
    }

    if !flexible.is_empty() {
        sections.push(format!("{}\n{}", text.flexible_title, render_tasks(&flexible)?));
    }

    let mut rules = vec![text.rules_title.to_string()];
    let numbered = text.rules[..10]
        .iter()
        .map(|rule| rule.to_string())
        .chain([format!("{} {now}.", text.start_from_now), text.rules[10].to_string()]);
    for (n, rule) in numbered.enumerate() {
        rules.push(format!("{}. {rule}", n + 1));
    }
    sections.push(rules.join("\n"));

    Ok(sections.join("\n\n"))
}

fn render_tasks(tasks: &[&Task]) -> Result<String> {
    let view: Vec<PromptTask<'_>> = tasks.iter().map(|task| PromptTask::from(*task)).collect();
    Ok(serde_json::to_string_pretty(&view)?)
}
