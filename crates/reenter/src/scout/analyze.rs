//! Two focused calls on the fast model: what is this project, and how to get where the user
//! wants to go.

use anthropic_api::MessagesRequest;
use serde::Deserialize;

use crate::error::ScoutError;
use crate::model::{ModelClient, JSON_SYSTEM_PROMPT};
use crate::modes::Mode;

const SUMMARY_PREFILL: &str = "{\"summary\": \"This looks like";
const STEPS_PREFILL: &str = "{";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Analysis {
    pub summary: String,
}

#[derive(Debug, Deserialize)]
struct StepsReply {
    steps: Vec<String>,
}

fn key_files_or_placeholder(key_files: &str) -> &str {
    if key_files.is_empty() {
        "No key files found."
    } else {
        key_files
    }
}

/// One or two plain sentences on what the project does.
///
/// The reply is prefilled so the model can only continue the summary string.
pub async fn analyze_project<M: ModelClient + ?Sized>(
    model: &M,
    model_id: &str,
    structure: &str,
    key_files: &str,
) -> Result<Analysis, ScoutError> {
    let prompt = format!(
        "What is this project? Describe it in 1-2 plain english sentences. No jargon. What does it do, not how it's built.

FILE STRUCTURE:
{structure}

KEY FILE CONTENTS:
{}

Return raw JSON only:
{{ \"summary\": \"This looks like ...\" }}",
        key_files_or_placeholder(key_files)
    );
    let request = MessagesRequest::new(model_id, 256)
        .with_system(JSON_SYSTEM_PROMPT)
        .user(prompt)
        .assistant(SUMMARY_PREFILL);

    let response = model.complete(&request).await?;
    let text = response.first_text().ok_or(ScoutError::MissingTextBlock)?;
    let analysis: Analysis = serde_json::from_str(&format!("{SUMMARY_PREFILL}{text}"))?;
    tracing::debug!(summary = %analysis.summary, "project analyzed");
    Ok(analysis)
}

/// Two to five high level steps toward `mode`, specific to this project.
pub async fn generate_steps<M: ModelClient + ?Sized>(
    model: &M,
    model_id: &str,
    mode: Mode,
    structure: &str,
    key_files: &str,
) -> Result<Vec<String>, ScoutError> {
    let prompt = format!(
        "A self-taught developer wants to {intent}

FILE STRUCTURE:
{structure}

KEY FILE CONTENTS:
{key_files}

What are the 2-5 high level steps to do this for this specific project?

Rules:
- Steps are high level only: no commands, no file names yet
- Plain english, no jargon
- Specific to this actual project, never generic
- 2 to 5 steps, never pad

Return raw JSON only:
{{ \"steps\": [\"Step one\", \"Step two\", \"...\"] }}",
        intent = mode.intent(),
        key_files = key_files_or_placeholder(key_files),
    );
    let request = MessagesRequest::new(model_id, 512)
        .with_system(JSON_SYSTEM_PROMPT)
        .user(prompt)
        .assistant(STEPS_PREFILL);

    let response = model.complete(&request).await?;
    let text = response.first_text().ok_or(ScoutError::MissingTextBlock)?;
    let reply: StepsReply = serde_json::from_str(&format!("{STEPS_PREFILL}{text}"))?;

    let steps: Vec<String> = reply
        .steps
        .into_iter()
        .map(|step| step.trim().to_string())
        .filter(|step| !step.is_empty())
        .collect();
    if steps.is_empty() {
        return Err(ScoutError::NoSteps);
    }
    tracing::debug!(mode = mode.value(), count = steps.len(), "steps generated");
    Ok(steps)
}
