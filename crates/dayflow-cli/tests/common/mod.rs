#![allow(dead_code)]

use std::path::PathBuf;

use assert_cmd::Command;
use serde_json::{json, Value};
use tempfile::TempDir;

pub const TEST_API_KEY: &str = "AIzaSyA1234567890abcdefghijklmnop";

/// A scratch directory holding one database.
pub struct TestEnv {
    pub dir: TempDir,
    pub db_path: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temporary directory");
        let db_path = dir.path().join("cli_test.db");
        Self { dir, db_path }
    }

    /// `dayflow --no-color --database-file <db>`
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("dayflow").expect("Failed to find dayflow binary");
        cmd.arg("--no-color")
            .arg("--database-file")
            .arg(&self.db_path)
            .env_remove("DAYFLOW_LLM_BASE_URL")
            .env_remove("DAYFLOW_MODEL")
            .env_remove("DAYFLOW_TIMEOUT_SECS");
        cmd
    }
}

pub fn gemini_reply() -> Value {
    let plan = json!({
        "morning": [
            { "time": "09:00", "taskTitle": "Meeting", "type": "work", "duration": 60 },
            { "time": "10:00", "taskTitle": "Stretch", "type": "break", "duration": 15 }
        ],
        "afternoon": [
            { "time": "13:00", "taskTitle": "Write report", "type": "work", "duration": 120,
              "reason": "Deep work after lunch" }
        ],
        "evening": [],
        "tips": ["Batch your email"]
    });
    json!({
        "candidates": [{ "content": { "parts": [{ "text": plan.to_string() }] } }],
        "usageMetadata": {
            "promptTokenCount": 900,
            "candidatesTokenCount": 300,
            "totalTokenCount": 1200
        }
    })
}
