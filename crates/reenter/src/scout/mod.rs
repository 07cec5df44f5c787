//! Reading the project: its shape, its key files, and what a model makes of them.

pub mod analyze;
pub mod directory;
pub mod files;

pub use analyze::{analyze_project, generate_steps, Analysis};
pub use directory::{scan_directory, DEFAULT_MAX_DEPTH};
pub use files::{read_key_files, KEY_FILES};
