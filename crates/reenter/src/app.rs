//! Orchestration: scout, summarize, pick a mode, save the starting point, brief.

use std::path::Path;

use reenter_tui::style::gray;
use reenter_tui::{select_prompt, with_spinner, Terminal};

use crate::briefing::run_interview;
use crate::config::Models;
use crate::error::ReenterError;
use crate::model::ModelClient;
use crate::modes::{mode_choices, Mode};
use crate::scout::{analyze_project, generate_steps, read_key_files, scan_directory, Analysis, DEFAULT_MAX_DEPTH};
use crate::session::{HistoryKind, Session};
use crate::text::{with_margin, write_block, write_text};
use crate::walkthrough::save_starting_point;

const EMPTY_PROJECT_HINT: &str = "This folder looks empty. Point reenter at a project folder.";
const MENU_MESSAGE: &str = "What do you want to do with it:";

/// How a run ended, short of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to scan.
    EmptyProject,
    /// The chosen mode is not built yet.
    ComingSoon(Mode),
    /// The user stopped at "Ready to start?".
    NotReady,
    /// Ready for the walkthrough.
    Ready,
}

impl Outcome {
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::EmptyProject => 1,
            _ => 0,
        }
    }
}

struct Scouted {
    structure: String,
    key_files: String,
    analysis: Analysis,
}

pub struct App<'m, M: ?Sized> {
    model: &'m M,
    models: Models,
}

impl<'m, M: ModelClient + ?Sized> App<'m, M> {
    pub fn new(model: &'m M, models: Models) -> Self {
        Self { model, models }
    }

    /// Drive one session from scan to the walkthrough hand-off.
    pub async fn run<T: Terminal + ?Sized>(
        &self,
        term: &mut T,
        session: &mut Session,
    ) -> Result<Outcome, ReenterError> {
        let project = session.meta.project_path.clone();

        let scouted = with_spinner(term, "Reentering", "Reentering", self.scout(&project)).await;
        let scouted = match scouted {
            Ok(scouted) => scouted,
            Err(ReenterError::EmptyProject) => {
                let hint = format!("{}\n", with_margin(EMPTY_PROJECT_HINT, term.columns()));
                write_text(term, &hint)?;
                return Ok(Outcome::EmptyProject);
            }
            Err(err) => return Err(err),
        };
        session.project.structure = Some(scouted.structure);
        session.project.key_files = Some(scouted.key_files);
        write_block(term, &scouted.analysis.summary)?;
        session.project.summary = Some(scouted.analysis.summary);

        let mode = select_prompt(term, MENU_MESSAGE, &mode_choices())?;
        session.plan.chosen_mode = Some(mode);
        session.log_history(HistoryKind::User, format!("Chose: {}", mode.title()));

        if !mode.is_available() {
            write_block(term, &format!("{} is coming soon.", mode.title()))?;
            return Ok(Outcome::ComingSoon(mode));
        }
        session.meta.mode = mode;

        let steps = with_spinner(term, "Planning the route", "Route planned", async {
            generate_steps(
                self.model,
                &self.models.fast,
                mode,
                session.project.structure.as_deref().unwrap_or_default(),
                session.project.key_files.as_deref().unwrap_or_default(),
            )
            .await
            .map_err(ReenterError::from)
        })
        .await?;
        session.log_history(HistoryKind::Ai, steps.join("\n"));
        session.plan.steps = steps;

        write_text(term, "\n")?;
        let snapshot = save_starting_point(term, &project).await?;
        session.log_history(HistoryKind::System, snapshot.describe());

        let ready = run_interview(term, self.model, &self.models.briefing, session).await?;
        if !ready {
            return Ok(Outcome::NotReady);
        }

        write_block(term, &gray("Walkthrough coming next."))?;
        Ok(Outcome::Ready)
    }

    async fn scout(&self, project: &Path) -> Result<Scouted, ReenterError> {
        let structure = scan_directory(project, DEFAULT_MAX_DEPTH).join("\n");
        if structure.is_empty() {
            return Err(ReenterError::EmptyProject);
        }
        let key_files = read_key_files(project);
        let analysis = analyze_project(self.model, &self.models.fast, &structure, &key_files).await?;
        Ok(Scouted {
            structure,
            key_files,
            analysis,
        })
    }
}
