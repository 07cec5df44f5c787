//! The restore point taken before reenter touches anything.
//!
//! Three cases, one experience: no repository gets `git init` and a commit of everything, loose
//! ends get committed as they are, and a clean tree gets an empty commit so the restore point
//! still exists.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::OnceLock;

use regex::Regex;
use reenter_tui::{with_spinner, Terminal};

use crate::error::{GitError, ReenterError};

pub const COMMIT_BASE: &str = "saving starting point before reenter";

const DEFAULT_GITIGNORE: &str = "node_modules\ndist\n.env\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitState {
    /// No repository, or the repository root is a parent folder.
    NoGit,
    /// Uncommitted or untracked changes.
    LooseEnds,
    Clean,
}

/// What [`snapshot`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub state: GitState,
    pub message: String,
}

impl Snapshot {
    /// One-line account for the session history.
    pub fn describe(&self) -> String {
        match self.state {
            GitState::NoGit => format!(
                "no git found, initialized repo, committed everything ({})",
                self.message
            ),
            GitState::LooseEnds => format!("git found, committed loose ends ({})", self.message),
            GitState::Clean => format!(
                "git found, already clean, created empty restore point ({})",
                self.message
            ),
        }
    }
}

fn run_git(project: &Path, args: &[&str]) -> Result<String, GitError> {
    let command = args.join(" ");
    let output = Command::new("git")
        .args(args)
        .current_dir(project)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| GitError::Spawn {
            command: command.clone(),
            source,
        })?;

    if !output.status.success() {
        let status = match output.status.code() {
            Some(code) => format!("exit_code={code}"),
            None => "terminated_by_signal".to_string(),
        };
        return Err(GitError::Failed {
            command,
            status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    tracing::debug!(command = %command, "git ok");
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn numbered_commit_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(&format!(r"{} \[\d+\]", regex::escape(COMMIT_BASE))).ok())
        .as_ref()
}

/// `saving starting point before reenter [NN]`, where NN counts earlier restore points on any
/// branch. `[00]` when the log cannot be read.
pub fn next_commit_message(project: &Path) -> String {
    let count = run_git(project, &["log", "--all", "--format=%s"])
        .ok()
        .and_then(|log| numbered_commit_pattern().map(|pattern| pattern.find_iter(&log).count()))
        .unwrap_or(0);
    format!("{COMMIT_BASE} [{count:02}]")
}

/// Classify the project folder. A repository that belongs to a parent folder counts as none.
pub fn check_git_state(project: &Path) -> Result<GitState, GitError> {
    let Ok(toplevel) = run_git(project, &["rev-parse", "--show-toplevel"]) else {
        return Ok(GitState::NoGit);
    };
    let same_root = match (
        fs::canonicalize(toplevel.trim()),
        fs::canonicalize(project),
    ) {
        (Ok(root), Ok(project)) => root == project,
        _ => false,
    };
    if !same_root {
        return Ok(GitState::NoGit);
    }

    let status = run_git(project, &["status", "--porcelain"])?;
    Ok(if status.trim().is_empty() {
        GitState::Clean
    } else {
        GitState::LooseEnds
    })
}

fn ensure_gitignore(project: &Path) -> Result<(), GitError> {
    let path = project.join(".gitignore");
    if !path.exists() {
        fs::write(&path, DEFAULT_GITIGNORE).map_err(GitError::Gitignore)?;
    }
    Ok(())
}

/// Take the restore point. Blocking.
pub fn snapshot(project: &Path) -> Result<Snapshot, GitError> {
    let state = check_git_state(project)?;
    let message = next_commit_message(project);

    match state {
        GitState::NoGit => {
            ensure_gitignore(project)?;
            run_git(project, &["init"])?;
            run_git(project, &["add", "."])?;
            run_git(project, &["commit", "-m", message.as_str()])?;
        }
        GitState::LooseEnds => {
            run_git(project, &["add", "."])?;
            run_git(project, &["commit", "-m", message.as_str()])?;
        }
        GitState::Clean => {
            run_git(project, &["commit", "--allow-empty", "-m", message.as_str()])?;
        }
    }

    let snapshot = Snapshot { state, message };
    tracing::debug!(project = %project.display(), detail = %snapshot.describe(), "starting point saved");
    Ok(snapshot)
}

/// Take the restore point under a spinner. Git runs off the async thread so the spinner keeps
/// ticking.
pub async fn save_starting_point<T: Terminal + ?Sized>(
    term: &mut T,
    project: &Path,
) -> Result<Snapshot, ReenterError> {
    let project: PathBuf = project.to_path_buf();
    let work = async move {
        match tokio::task::spawn_blocking(move || snapshot(&project)).await {
            Ok(result) => result.map_err(ReenterError::from),
            Err(err) => Err(ReenterError::from(GitError::Task(err.to_string()))),
        }
    };
    with_spinner(term, "Saving your starting point", "Starting point saved", work).await
}
