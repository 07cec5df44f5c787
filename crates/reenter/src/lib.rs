//! reenter: pick an abandoned project back up.
//!
//! The binary scans a project folder, asks a model what it is, lets the user pick a mode, saves a
//! git restore point and runs a short briefing interview before the walkthrough.
//!
//! ## Environment
//!
//! - `ANTHROPIC_API_KEY` is required; `ANTHROPIC_BASE_URL` overrides the API host.
//! - `REENTER_FAST_MODEL` picks the model for the summary and the steps,
//!   `REENTER_MODEL` the one for the briefing.
//! - `REENTER_LOG`, `REENTER_WRITE_LOG`, `REENTER_DEBUG_REDRAW` and `REENTER_TICK_MS` are read by
//!   `reenter_tui`.
//!
//! A `.env` file in the working directory is loaded first.

pub mod app;
pub mod briefing;
pub mod config;
pub mod error;
pub mod json;
pub mod model;
pub mod modes;
pub mod scout;
pub mod session;
pub mod text;
pub mod walkthrough;

pub use app::{App, Outcome};
pub use config::{Models, ReenterConfig};
pub use error::{GitError, ReenterError, ScoutError};
pub use model::ModelClient;
pub use modes::Mode;
pub use session::Session;
