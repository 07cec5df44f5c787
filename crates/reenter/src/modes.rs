//! The four fixed ways to pick a project back up.

use reenter_tui::Choice;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Browse,
    Run,
    Mvp,
    Ship,
}

impl Mode {
    /// Menu order.
    pub const ALL: [Mode; 4] = [Mode::Browse, Mode::Run, Mode::Mvp, Mode::Ship];

    pub fn title(self) -> &'static str {
        match self {
            Mode::Browse => "Browse",
            Mode::Run => "Run",
            Mode::Mvp => "MVP",
            Mode::Ship => "Ship",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Mode::Browse => "understand it like it was built yesterday",
            Mode::Run => "see it running live on your machine",
            Mode::Mvp => "find the fastest path to real users",
            Mode::Ship => "clean it up and take it all the way",
        }
    }

    /// Stable identifier, as serialized.
    pub fn value(self) -> &'static str {
        match self {
            Mode::Browse => "browse",
            Mode::Run => "run",
            Mode::Mvp => "mvp",
            Mode::Ship => "ship",
        }
    }

    pub fn from_value(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.value() == value)
    }

    /// What the user is after, phrased to complete "A self-taught developer wants to ...".
    pub fn intent(self) -> &'static str {
        match self {
            Mode::Run => "run this project locally, the cheapest, fastest path to seeing it alive again. No production concerns, no polish. Just: what does it take to get this running on their machine?",
            Mode::Browse => "understand this codebase: find the single conceptual path from A to Z that gives the clearest picture of how it works.",
            Mode::Mvp => "get this in front of real users: the fastest, cheapest path from local to something others can actually use.",
            Mode::Ship => "modernize, fix issues, and deploy this properly: clean it up and take it all the way.",
        }
    }

    /// Only Run goes past the menu for now.
    pub fn is_available(self) -> bool {
        self == Mode::Run
    }
}

/// Menu choices with inline descriptions.
pub fn mode_choices() -> Vec<Choice<Mode>> {
    Mode::ALL
        .into_iter()
        .map(|mode| Choice::new(mode.title(), mode).with_description(mode.description()))
        .collect()
}
