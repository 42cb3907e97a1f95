pub mod heat;
pub mod ranking;
pub mod submission;
