pub mod day;
pub mod document;
pub mod task;

pub use day::{Day, ParseDayError};
pub use document::{DocumentError, parse_document, tasks_from_value};
pub use task::{Task, parse_timestamp};
