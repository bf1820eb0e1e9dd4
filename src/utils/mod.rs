pub mod formatting;
pub mod path;
pub mod table;
pub mod time;

pub use formatting::human_size;
pub use time::{Clock, SystemClock};
