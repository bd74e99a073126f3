pub mod complete;
pub mod messages;
pub mod prompt;
pub mod show;
