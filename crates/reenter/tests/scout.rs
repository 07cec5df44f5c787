mod support;

use std::fs;

use anthropic_api::{AnthropicApiError, MessageResponse, ResponseContent, Role};
use reenter::scout::{analyze_project, generate_steps, read_key_files, scan_directory};
use reenter::{Mode, ScoutError};
use support::ScriptedModel;
use tempfile::TempDir;

#[test]
fn scan_lists_two_levels_and_skips_noise() {
    let dir = TempDir::new().expect("tempdir");
    let root = dir.path();
    fs::create_dir_all(root.join("src/components/deep/deeper")).expect("dirs");
    fs::create_dir_all(root.join("node_modules/react")).expect("dirs");
    fs::create_dir_all(root.join(".git")).expect("dirs");
    fs::create_dir_all(root.join("dist")).expect("dirs");
    fs::write(root.join("package.json"), "{}").expect("write");
    fs::write(root.join(".env"), "SECRET=1").expect("write");
    fs::write(root.join("src/index.js"), "").expect("write");
    fs::write(root.join("src/components/App.jsx"), "").expect("write");
    fs::write(root.join("src/components/deep/hidden.js"), "").expect("write");

    let items = scan_directory(root, 2);

    assert_eq!(
        items,
        vec![
            "package.json",
            "src/",
            "  components/",
            "    App.jsx",
            "    deep/",
            "  index.js",
        ]
    );
}

#[test]
fn scan_of_empty_or_missing_folder_is_empty() {
    let dir = TempDir::new().expect("tempdir");
    assert!(scan_directory(dir.path(), 2).is_empty());
    assert!(scan_directory(&dir.path().join("missing"), 2).is_empty());
}

#[test]
fn key_files_are_capped_and_headed() {
    let dir = TempDir::new().expect("tempdir");
    let root = dir.path();
    fs::write(root.join("README.md"), "x".repeat(1500)).expect("write");
    fs::write(root.join("package.json"), "{\"name\":\"todo\"}").expect("write");
    fs::write(root.join("notes.txt"), "ignored").expect("write");

    let contents = read_key_files(root);

    let expected = format!(
        "--- package.json ---\n{{\"name\":\"todo\"}}\n\n--- README.md ---\n{}",
        "x".repeat(1000)
    );
    assert_eq!(contents, expected);
}

#[test]
fn no_key_files_reads_as_empty() {
    let dir = TempDir::new().expect("tempdir");
    assert_eq!(read_key_files(dir.path()), "");
}

#[tokio::test]
async fn summary_is_rejoined_with_its_prefill() {
    let model = ScriptedModel::new().reply(" a small todo app you can run in a browser.\"}");

    let analysis = analyze_project(&model, "fast-model", "index.html", "")
        .await
        .expect("analysis");

    assert_eq!(
        analysis.summary,
        "This looks like a small todo app you can run in a browser."
    );
    let requests = model.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].model, "fast-model");
    assert_eq!(requests[0].max_tokens, 256);
    assert_eq!(requests[0].prefill(), Some("{\"summary\": \"This looks like"));
    assert_eq!(requests[0].messages[0].role, Role::User);
    assert!(requests[0].messages[0].content.contains("No key files found."));
    assert!(requests[0].system.as_deref().unwrap_or_default().contains("JSON API"));
}

#[tokio::test]
async fn summary_needs_a_text_block() {
    let model = ScriptedModel::new().reply_with(Ok(MessageResponse {
        content: vec![ResponseContent::Other],
        ..MessageResponse::default()
    }));

    let err = analyze_project(&model, "m", "index.html", "")
        .await
        .expect_err("no text");
    assert!(matches!(err, ScoutError::MissingTextBlock));
}

#[tokio::test]
async fn api_errors_pass_through() {
    let model = ScriptedModel::new().reply_with(Err(AnthropicApiError::MissingApiKey));
    let err = analyze_project(&model, "m", "index.html", "")
        .await
        .expect_err("api error");
    assert!(matches!(err, ScoutError::Api(AnthropicApiError::MissingApiKey)));
}

#[tokio::test]
async fn steps_use_the_mode_intent() {
    let model = ScriptedModel::new()
        .reply("\"steps\": [\"Install what it needs\", \"  \", \"Start the dev server\"]}");

    let steps = generate_steps(&model, "m", Mode::Run, "package.json", "--- package.json ---\n{}")
        .await
        .expect("steps");

    assert_eq!(steps, ["Install what it needs", "Start the dev server"]);
    let request = &model.requests()[0];
    assert_eq!(request.max_tokens, 512);
    assert_eq!(request.prefill(), Some("{"));
    assert!(request.messages[0].content.contains(Mode::Run.intent()));
}

#[tokio::test]
async fn empty_step_lists_are_rejected() {
    let model = ScriptedModel::new().reply("\"steps\": []}");
    let err = generate_steps(&model, "m", Mode::Ship, "a", "")
        .await
        .expect_err("no steps");
    assert!(matches!(err, ScoutError::NoSteps));
}

#[tokio::test]
async fn malformed_reply_is_invalid() {
    let model = ScriptedModel::new().reply("not json at all");
    let err = analyze_project(&model, "m", "a", "")
        .await
        .expect_err("bad json");
    assert!(matches!(err, ScoutError::InvalidReply(_)));
}
