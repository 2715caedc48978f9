//! Weekly streak state machine
//!
//! A streak is the week-in-progress: seven day slots, each pending or done.
//! `advance` is the only transition; everything else is construction and
//! validation around it.

use serde::{Deserialize, Serialize};

/// Number of day slots in a week-in-progress.
pub const WEEK_LEN: usize = 7;

/// Completion marker for a single day slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayMark {
    Pending,
    Done,
}

impl std::fmt::Display for DayMark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DayMark::Pending => write!(f, "pending"),
            DayMark::Done => write!(f, "done"),
        }
    }
}

/// A caller-supplied marker sequence that is not exactly seven slots long.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed streak: expected {WEEK_LEN} day markers, got {len}")]
pub struct MalformedStreak {
    pub len: usize,
}

/// The 7-slot weekly completion record.
///
/// Slot 0 is the first day of the week, slot 6 the last. Serializes as a
/// plain 7-element array of lowercase markers, which is also the at-rest
/// encoding in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Streak([DayMark; WEEK_LEN]);

impl Default for Streak {
    fn default() -> Self {
        Self::new()
    }
}

impl Streak {
    /// A fresh week: all slots pending.
    pub fn new() -> Self {
        Streak([DayMark::Pending; WEEK_LEN])
    }

    /// Validate a caller-supplied marker sequence (administrative overwrite).
    pub fn from_slice(days: &[DayMark]) -> Result<Self, MalformedStreak> {
        let days: [DayMark; WEEK_LEN] = days
            .try_into()
            .map_err(|_| MalformedStreak { len: days.len() })?;
        Ok(Streak(days))
    }

    /// Day markers, slot 0 first.
    pub fn days(&self) -> &[DayMark; WEEK_LEN] {
        &self.0
    }

    /// Whether every slot is marked done.
    pub fn is_complete(&self) -> bool {
        self.0.iter().all(|d| *d == DayMark::Done)
    }

    /// Apply a "mark today done" event.
    ///
    /// Sets the last slot to done, leaving the others untouched. There is no
    /// day-of-week alignment, so repeated calls before completion are no-ops
    /// after the first; that flattening of "today" to "end of week" is the
    /// observable contract. When all seven slots end up done the returned
    /// streak is reset to all-pending and the flag is true. The caller owns
    /// incrementing the weeks counter and persisting the result.
    pub fn advance(mut self) -> (Streak, bool) {
        self.0[WEEK_LEN - 1] = DayMark::Done;
        if self.is_complete() {
            (Streak::new(), true)
        } else {
            (self, false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn streak_of(days: &[DayMark]) -> Streak {
        Streak::from_slice(days).unwrap()
    }

    #[test]
    fn advance_marks_last_slot() {
        let (next, completed) = Streak::new().advance();
        assert!(!completed);
        assert_eq!(next.days()[..6], [DayMark::Pending; 6]);
        assert_eq!(next.days()[6], DayMark::Done);
    }

    #[test]
    fn advance_on_full_week_resets_and_signals() {
        let (next, completed) = streak_of(&[DayMark::Done; 7]).advance();
        assert!(completed);
        assert_eq!(next, Streak::new());
    }

    #[test]
    fn advance_is_idempotent_before_completion() {
        let (first, completed) = Streak::new().advance();
        assert!(!completed);

        let (second, completed) = first.advance();
        assert!(!completed);
        assert_eq!(second, first);
    }

    #[test]
    fn advance_completes_when_only_last_slot_was_pending() {
        let mut days = [DayMark::Done; 7];
        days[6] = DayMark::Pending;

        let (next, completed) = streak_of(&days).advance();
        assert!(completed);
        assert!(!next.is_complete());
        assert_eq!(next, Streak::new());
    }

    #[test]
    fn advance_preserves_earlier_slots() {
        let mut days = [DayMark::Pending; 7];
        days[0] = DayMark::Done;
        days[3] = DayMark::Done;

        let (next, completed) = streak_of(&days).advance();
        assert!(!completed);
        assert_eq!(next.days()[0], DayMark::Done);
        assert_eq!(next.days()[3], DayMark::Done);
        assert_eq!(next.days()[1], DayMark::Pending);
        assert_eq!(next.days()[6], DayMark::Done);
    }

    #[test]
    fn output_is_always_seven_slots() {
        // Sweep every prefix of done slots; the type carries the length but
        // the reset path is worth checking too.
        for done in 0..=7 {
            let mut days = [DayMark::Pending; 7];
            for slot in days.iter_mut().take(done) {
                *slot = DayMark::Done;
            }
            let (next, _) = streak_of(&days).advance();
            assert_eq!(next.days().len(), WEEK_LEN);
        }
    }

    #[test]
    fn from_slice_rejects_wrong_lengths() {
        assert_eq!(
            Streak::from_slice(&[DayMark::Pending; 6]),
            Err(MalformedStreak { len: 6 })
        );
        assert_eq!(
            Streak::from_slice(&[DayMark::Done; 8]),
            Err(MalformedStreak { len: 8 })
        );
        assert!(Streak::from_slice(&[DayMark::Pending; 7]).is_ok());
    }

    #[test]
    fn serializes_as_marker_array() {
        let (streak, _) = Streak::new().advance();
        let json = serde_json::to_string(&streak).unwrap();
        assert_eq!(
            json,
            r#"["pending","pending","pending","pending","pending","pending","done"]"#
        );

        let back: Streak = serde_json::from_str(&json).unwrap();
        assert_eq!(back, streak);
    }

    #[test]
    fn wrong_length_array_fails_to_deserialize() {
        let err = serde_json::from_str::<Streak>(r#"["pending","done"]"#);
        assert!(err.is_err());
    }
}
