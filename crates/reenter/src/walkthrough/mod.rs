//! Getting ready to walk the user through their steps.

pub mod git;

pub use git::{
    check_git_state, next_commit_message, save_starting_point, snapshot, GitState, Snapshot,
    COMMIT_BASE,
};
