//! Core data models for the time reader.

mod duration;
mod notation;
mod parsed_time;
mod time_tag;

pub use duration::*;
pub use notation::*;
pub use parsed_time::*;
pub use time_tag::*;
