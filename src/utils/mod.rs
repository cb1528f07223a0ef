pub mod misc;
pub mod time;
