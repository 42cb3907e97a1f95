pub mod heats;
pub mod rankings;
pub mod scores;
