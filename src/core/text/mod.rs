//! Text helpers (ANSI recognition, width calculations).
//!
//! These helpers are pure (string in/number or string out) and live under `core` so prompts can
//! depend on them without importing anything from the render layer.

pub mod ansi;
pub mod width;
