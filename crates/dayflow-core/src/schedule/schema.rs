//! JSON schema the model's reply must follow.

use serde_json::{json, Value};

fn item_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "time": { "type": "STRING", "description": "Start time of the block, e.g., '09:00'" },
            "taskTitle": { "type": "STRING", "description": "Name of the task or a break label" },
            "type": { "type": "STRING", "enum": ["work", "break", "buffer"] },
            "duration": { "type": "NUMBER", "description": "Duration in minutes" },
            "reason": { "type": "STRING", "description": "Why this slot was chosen (optional)" }
        },
        "required": ["time", "taskTitle", "type", "duration"]
    })
}

/// Response schema sent as `generationConfig.responseSchema`.
pub fn response_schema() -> Value {
    let segment = |description: &str| {
        json!({
            "type": "ARRAY",
            "items": item_schema(),
            "description": description
        })
    };

    json!({
        "type": "OBJECT",
        "properties": {
            "morning": segment("Tasks scheduled from start of day until 12:00"),
            "afternoon": segment("Tasks scheduled from 12:00 until 18:00"),
            "evening": segment("Tasks scheduled from 18:00 onwards"),
            "tips": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "3-5 productivity tips specific to this schedule (e.g., grouping similar tasks)"
            }
        },
        "required": ["morning", "afternoon", "evening", "tips"]
    })
}
