//! habitd-core: the weekly streak state machine
//!
//! Pure types and transitions for the 7-slot weekly completion record.
//! No I/O lives here; persistence and HTTP are habitd-server's concern.

pub mod streak;

pub use streak::{DayMark, MalformedStreak, Streak, WEEK_LEN};
