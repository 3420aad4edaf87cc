#![allow(dead_code)]

use dayflow_core::{Planner, PlannerBuilder};
use serde_json::{json, Value};
use tempfile::TempDir;

pub const TEST_API_KEY: &str = "AIzaSyA1234567890abcdefghijklmnop";

/// Helper function to create a test planner
pub async fn create_test_planner() -> (TempDir, Planner) {
    create_test_planner_with_llm("http://127.0.0.1:9").await
}

/// Creates a planner whose model calls go to `base_url`.
pub async fn create_test_planner_with_llm(base_url: &str) -> (TempDir, Planner) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let planner = PlannerBuilder::new()
        .with_database_path(&db_path)
        .with_llm_base_url(base_url)
        .with_timeout_secs(5)
        .build()
        .await
        .expect("Failed to create planner");
    (temp_dir, planner)
}

/// A `generateContent` reply carrying `plan` as its text part.
pub fn gemini_reply(plan: Value) -> Value {
    json!({
        "candidates": [{ "content": { "role": "model", "parts": [{ "text": plan.to_string() }] } }],
        "usageMetadata": {
            "promptTokenCount": 1200,
            "candidatesTokenCount": 400,
            "totalTokenCount": 1600
        }
    })
}

pub fn sample_plan() -> Value {
    json!({
        "morning": [
            { "time": "09:00", "taskTitle": "Meeting", "type": "work", "duration": 60, "reason": "Fixed time" },
            { "time": "10:00", "taskTitle": "Break", "type": "break", "duration": 15 }
        ],
        "afternoon": [
            { "time": "13:00", "taskTitle": "Write report", "type": "work", "duration": 120 }
        ],
        "evening": [],
        "tips": ["Group similar tasks", "Protect your focus time"]
    })
}
