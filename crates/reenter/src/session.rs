//! In-memory record of one reenter run.
//!
//! Every phase reads from and writes to the [`Session`]. It is serializable so it can be saved
//! later, but nothing persists it yet.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::briefing::Question;
use crate::modes::Mode;

#[derive(Debug, Clone, Serialize)]
pub struct SessionMeta {
    pub started_at: DateTime<Utc>,
    pub mode: Mode,
    pub project_path: PathBuf,
    pub project_name: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectInfo {
    pub structure: Option<String>,
    pub key_files: Option<String>,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Plan {
    pub chosen_mode: Option<Mode>,
    pub steps: Vec<String>,
    pub current_step: usize,
    pub completed_steps: Vec<usize>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Briefing {
    pub presentation: Option<String>,
    pub questions: Vec<Question>,
    /// Keyed by question id.
    pub answers: BTreeMap<String, String>,
    pub synthesis: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryKind {
    Ai,
    User,
    Check,
    System,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub kind: HistoryKind,
    pub content: String,
    pub at: DateTime<Utc>,
}

/// A command run to inspect the environment, with what was concluded from it.
#[derive(Debug, Clone, Serialize)]
pub struct CheckEntry {
    pub command: String,
    pub output: String,
    pub conclusion: String,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub meta: SessionMeta,
    pub project: ProjectInfo,
    pub plan: Plan,
    pub briefing: Briefing,
    pub history: Vec<HistoryEntry>,
    pub checks: Vec<CheckEntry>,
}

impl Session {
    pub fn new(project_path: impl Into<PathBuf>, mode: Mode) -> Self {
        let project_path = project_path.into();
        let project_name = project_name(&project_path);
        Self {
            meta: SessionMeta {
                started_at: Utc::now(),
                mode,
                project_path,
                project_name,
            },
            project: ProjectInfo::default(),
            plan: Plan::default(),
            briefing: Briefing::default(),
            history: Vec::new(),
            checks: Vec::new(),
        }
    }

    pub fn log_history(&mut self, kind: HistoryKind, content: impl Into<String>) {
        self.history.push(HistoryEntry {
            kind,
            content: content.into(),
            at: Utc::now(),
        });
    }

    pub fn log_check(
        &mut self,
        command: impl Into<String>,
        output: impl Into<String>,
        conclusion: impl Into<String>,
    ) {
        self.checks.push(CheckEntry {
            command: command.into(),
            output: output.into(),
            conclusion: conclusion.into(),
            at: Utc::now(),
        });
    }
}

/// Last path component; the whole path when there is none (`/`).
fn project_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
