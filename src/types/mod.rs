pub mod research;
pub mod run;

pub use research::{DelegatedTask, NoteOutcome, ResearchBrief, ResearchNote, TaskStatus};
pub use run::{ConversationTurn, Phase, RunState, Speaker};
