mod common;

use std::fs;

use predicates::prelude::*;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

use common::{gemini_reply, TestEnv, TEST_API_KEY};

#[test]
fn test_cli_add_and_list_tasks() {
    let env = TestEnv::new();

    env.cmd()
        .args(["task", "add", "Standup", "-d", "15", "-p", "high", "--at", "9:30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added task with ID: 1"))
        .stdout(predicate::str::contains("at 09:30"));

    env.cmd()
        .args(["task", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("**#1** Standup"));

    // No subcommand lists tasks too.
    env.cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("Standup"));
}

#[test]
fn test_cli_empty_task_list() {
    let env = TestEnv::new();
    env.cmd()
        .args(["task", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks yet"));
}

#[test]
fn test_cli_import_and_export_round_trip() {
    let env = TestEnv::new();
    let input = env.dir.path().join("tasks.txt");
    fs::write(&input, "Meeting - 60p - 9am !cao\n\nRead | 1.5h\n").unwrap();

    env.cmd()
        .args(["task", "import"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 2 task(s)."));

    env.cmd()
        .args(["task", "export"])
        .assert()
        .success()
        .stdout("Meeting - 1h - 09:00 !cao\nRead - 90p\n");
}

#[test]
fn test_cli_import_from_stdin() {
    let env = TestEnv::new();
    env.cmd()
        .args(["task", "import"])
        .write_stdin("Gym - 45\nCall mom !thap\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 2 task(s)."));

    env.cmd()
        .args(["task", "export"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Call mom - 30p !thấp"));
}

#[test]
fn test_cli_remove_and_clear_tasks() {
    let env = TestEnv::new();
    env.cmd().args(["task", "add", "Temporary"]).assert().success();

    env.cmd()
        .args(["task", "remove", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed task 'Temporary' (ID: 1)"));

    env.cmd()
        .args(["task", "remove", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Task with ID 1 not found"));

    env.cmd().args(["task", "add", "Another"]).assert().success();
    env.cmd().args(["task", "clear"]).assert().failure();
    env.cmd()
        .args(["task", "clear", "--confirm"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 1 task(s)"));
}

#[test]
fn test_cli_generate_without_key_prints_hint() {
    let env = TestEnv::new();
    env.cmd().args(["task", "add", "Anything"]).assert().success();

    env.cmd()
        .args(["plan", "generate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("dayflow config set-key"));
}

#[test]
fn test_cli_rejects_malformed_key() {
    let env = TestEnv::new();
    env.cmd()
        .args(["config", "set-key", "sk-not-gemini"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("dayflow config set-key"));

    env.cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("API key: not set"));
}

#[test]
fn test_cli_config_language_and_masked_key() {
    let env = TestEnv::new();
    env.cmd()
        .args(["config", "set-key", TEST_API_KEY])
        .assert()
        .success();
    env.cmd().args(["config", "language", "en"]).assert().success();

    env.cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("AIza…mnop"))
        .stdout(predicate::str::contains(TEST_API_KEY).not());
}

#[test]
fn test_cli_plan_show_without_plan_fails() {
    let env = TestEnv::new();
    env.cmd().args(["plan", "show"]).assert().failure();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cli_generate_edit_and_history() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply()))
        .expect(1)
        .mount(&server)
        .await;

    let env = TestEnv::new();
    let uri = server.uri();

    env.cmd()
        .args(["config", "set-key", TEST_API_KEY])
        .assert()
        .success();
    env.cmd()
        .args(["task", "import"])
        .write_stdin("Meeting - 60p - 9am !cao\nWrite report - 2h\n")
        .assert()
        .success();

    env.cmd()
        .env("DAYFLOW_LLM_BASE_URL", &uri)
        .args(["plan", "generate", "--language", "en"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Your day plan"))
        .stdout(predicate::str::contains("| 1 | 09:00 | Meeting |"))
        .stdout(predicate::str::contains("Batch your email"))
        .stdout(predicate::str::contains("Saved as history entry 1"));

    env.cmd()
        .args(["plan", "move-down", "morning", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Moved morning item 1 down"))
        .stdout(predicate::str::contains("| 1 | 10:00 | Stretch |"));

    env.cmd()
        .args(["plan", "set", "afternoon", "1", "--duration", "90", "--title", "Draft report"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Draft report"))
        .stdout(predicate::str::contains("1h 30m"));

    env.cmd()
        .args(["plan", "remove", "morning", "1"])
        .assert()
        .failure();

    env.cmd()
        .args(["plan", "set", "evening", "1", "--title", "Nothing there"])
        .assert()
        .failure();

    // History keeps the plan as generated.
    env.cmd()
        .args(["history", "show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Write report"))
        .stdout(predicate::str::contains("1200 tokens"));

    env.cmd()
        .args(["history", "export", "1"])
        .assert()
        .success()
        .stdout("Meeting - 1h - 09:00 !cao\nWrite report - 2h\n");

    env.cmd()
        .args(["history", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("**#1**"))
        .stdout(predicate::str::contains("Total: 1 generation(s)"));
}

#[test]
fn test_cli_sync_status_and_disable() {
    let env = TestEnv::new();
    env.cmd()
        .args(["sync", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sync disabled"));

    env.cmd()
        .args(["sync", "enable", "--user", "user-1", "--endpoint", "http://127.0.0.1:9"])
        .assert()
        .success();
    env.cmd().args(["task", "add", "Queued"]).assert().success();

    env.cmd()
        .args(["sync", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pending changes: 1"));

    env.cmd()
        .args(["sync", "disable"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dropped 1 unsynced change(s)"));
}

#[test]
fn test_cli_help_lists_commands() {
    let env = TestEnv::new();
    env.cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("task"))
        .stdout(predicate::str::contains("serve"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cli_model_and_timeout_overrides() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-pro:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply()))
        .expect(1)
        .mount(&server)
        .await;

    let env = TestEnv::new();
    env.cmd()
        .args(["config", "set-key", TEST_API_KEY])
        .assert()
        .success();
    env.cmd().args(["task", "add", "Meeting"]).assert().success();

    env.cmd()
        .env("DAYFLOW_LLM_BASE_URL", server.uri())
        .env("DAYFLOW_MODEL", "gemini-2.5-pro")
        .env("DAYFLOW_TIMEOUT_SECS", "10")
        .args(["plan", "generate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gemini-2.5-pro"));

    env.cmd()
        .args(["history", "show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- Model: gemini-2.5-pro"));

    env.cmd()
        .env("DAYFLOW_TIMEOUT_SECS", "soon")
        .args(["task", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("DAYFLOW_TIMEOUT_SECS"));
}
