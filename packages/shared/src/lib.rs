//! Utilities shared by the Meetly binaries.

pub mod logger;
pub mod time;
