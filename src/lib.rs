pub mod chat;
pub mod config;
pub mod error;
pub mod library;
pub mod llm;
/// Sectionizer for generated plans: sections, days, subsections.
pub mod outline;
pub mod planner;
pub mod progress;
pub mod search;
pub mod share;
pub mod video;
