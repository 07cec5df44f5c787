//! The short interview that builds a shared picture before step one.

pub mod interview;

pub use interview::{
    ask_question, generate_briefing, generate_synthesis, run_interview, BriefingReply, Question,
    QuestionKind,
};
