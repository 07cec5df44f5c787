//! Presentation, one question, a one-sentence synthesis, then a go/no-go.

use anthropic_api::MessagesRequest;
use reenter_tui::{select_or_other, select_prompt, with_streaming_overlay, Choice, Terminal};
use serde::{Deserialize, Serialize};

use crate::error::ReenterError;
use crate::json::parse_reply;
use crate::model::{stream_updates, ModelClient, JSON_SYSTEM_PROMPT};
use crate::session::{HistoryKind, Session};
use crate::text::write_text;

const VOICE: &str = "You are talking to a self-taught developer who builds things to learn. They understand what their project does but may not know every technical term for how it works. Before finalizing any sentence, ask yourself: would this person have written these words themselves? If there's a technical term they wouldn't use naturally, find the plain english version. Speak like a senior dev who teaches well: warm, direct, specific.";

const BRIEFING_LABEL: &str = "reading between the lines";
const SYNTHESIS_LABEL: &str = "putting it together";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Select,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BriefingReply {
    pub presentation: String,
    pub question: Question,
}

#[derive(Debug, Deserialize)]
struct SynthesisReply {
    synthesis: String,
}

/// What the files reveal beyond the summary, plus the one question to ask.
pub async fn generate_briefing<T, M>(
    term: &mut T,
    model: &M,
    model_id: &str,
    session: &Session,
) -> Result<BriefingReply, ReenterError>
where
    T: Terminal + ?Sized,
    M: ModelClient + ?Sized,
{
    let mode = session
        .plan
        .chosen_mode
        .ok_or(ReenterError::MissingContext("no mode chosen before the briefing"))?;
    let project = &session.project;
    let key_files = project
        .key_files
        .as_deref()
        .filter(|files| !files.is_empty())
        .unwrap_or("None found.");

    let prompt = format!(
        "{VOICE}

You are helping a self-taught developer re-engage with an old project.

They already saw this summary, do not repeat it:
\"{summary}\"

Their chosen path: \"{title}\": {description}

FILE STRUCTURE:
{structure}

KEY FILES:
{key_files}

Write a short presentation that adds to what they already know: what the files reveal about the project's state and structure that the summary didn't cover. Start with \"Looks like\" or \"It seems like\", warm, not clinical. 1-2 sentences max.

Then write one question: where did this project get before they stopped? Was it working? Partially done? Early stage? Write options that are specific to this actual project.

Return raw JSON only:
{{
  \"presentation\": \"Looks like / It seems like ... (1-2 sentences, adds new info, warm)\",
  \"question\": {{
    \"id\": \"state\",
    \"text\": \"Short question, max 8 words\",
    \"type\": \"select\",
    \"options\": [\"Specific option A\", \"Specific option B\", \"Specific option C\"]
  }}
}}

Rules:
- presentation: starts with \"Looks like\" or \"It seems like\", 1-2 sentences, no jargon, adds something new
- question text: max 8 words, direct
- options: specific to this project, concrete
- Do NOT include \"Other\" in options, it is added automatically",
        summary = project.summary.as_deref().unwrap_or_default(),
        title = mode.title(),
        description = mode.description(),
        structure = project.structure.as_deref().unwrap_or_default(),
    );
    let request = MessagesRequest::new(model_id, 512)
        .with_system(JSON_SYSTEM_PROMPT)
        .user(prompt);

    let source = stream_updates::<ReenterError>(model.stream(&request));
    with_streaming_overlay(term, BRIEFING_LABEL, source, |text| {
        parse_reply::<BriefingReply>(&text).map_err(ReenterError::from)
    })
    .await
}

/// One sentence acknowledging the answer and framing step one.
pub async fn generate_synthesis<T, M>(
    term: &mut T,
    model: &M,
    model_id: &str,
    session: &Session,
) -> Result<String, ReenterError>
where
    T: Terminal + ?Sized,
    M: ModelClient + ?Sized,
{
    let question = session
        .briefing
        .questions
        .first()
        .ok_or(ReenterError::MissingContext("no question asked before the synthesis"))?;
    let answer = session
        .briefing
        .answers
        .get(&question.id)
        .ok_or(ReenterError::MissingContext("no answer recorded before the synthesis"))?;
    let first_step = session
        .plan
        .steps
        .first()
        .ok_or(ReenterError::MissingContext("no steps planned before the synthesis"))?;

    let prompt = format!(
        "{VOICE}

One sentence. Acknowledge what they told you, then frame what step 1 is about. Don't re-summarize the project, they know what it is. Forward-facing, specific, warm.

WHAT THEY SAID: \"{answer}\"
STEP 1: \"{first_step}\"

Return raw JSON only:
{{ \"synthesis\": \"...\" }}"
    );
    let request = MessagesRequest::new(model_id, 128)
        .with_system(JSON_SYSTEM_PROMPT)
        .user(prompt);

    let source = stream_updates::<ReenterError>(model.stream(&request));
    with_streaming_overlay(term, SYNTHESIS_LABEL, source, |text| {
        parse_reply::<SynthesisReply>(&text)
            .map(|reply| reply.synthesis)
            .map_err(ReenterError::from)
    })
    .await
}

/// Ask `question` with a trailing "Other" that falls back to free text.
pub fn ask_question<T: Terminal + ?Sized>(
    term: &mut T,
    question: &Question,
) -> Result<String, ReenterError> {
    write_text(term, "\n")?;
    let choices: Vec<Choice<String>> = question.options.iter().map(Choice::titled).collect();
    Ok(select_or_other(term, &question.text, &choices)?)
}

/// Run the whole interview. Returns whether the user is ready to start.
pub async fn run_interview<T, M>(
    term: &mut T,
    model: &M,
    model_id: &str,
    session: &mut Session,
) -> Result<bool, ReenterError>
where
    T: Terminal + ?Sized,
    M: ModelClient + ?Sized,
{
    let briefing = generate_briefing(term, model, model_id, session).await?;
    session.briefing.presentation = Some(briefing.presentation.clone());
    session.briefing.questions.push(briefing.question.clone());
    write_text(term, &format!("\n{}\n", briefing.presentation))?;

    let answer = ask_question(term, &briefing.question)?;
    session
        .log_history(HistoryKind::User, format!("{} → {answer}", briefing.question.text));
    session
        .briefing
        .answers
        .insert(briefing.question.id.clone(), answer);
    write_text(term, "\n")?;

    let synthesis = generate_synthesis(term, model, model_id, session).await?;
    session.briefing.synthesis = Some(synthesis.clone());
    session.log_history(HistoryKind::Ai, synthesis.as_str());
    write_text(term, &format!("\n{synthesis}\n\n"))?;

    let ready = select_prompt(
        term,
        "Ready to start?",
        &[
            Choice::new("Yes, let's go", true),
            Choice::new("Not right now", false),
        ],
    )?;
    tracing::debug!(ready, "interview finished");
    Ok(ready)
}
