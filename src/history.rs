use crate::models::{Challenge, DateRangeQuery, UserProfile};
use chrono::{Duration, NaiveDate};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReflectionEntry {
    pub date: NaiveDate,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChallengeNoteEntry {
    pub day: u32,
    pub date: NaiveDate,
    pub note: String,
}

impl DateRangeQuery {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }
}

/// Daily reflections inside the range, newest first.
pub fn reflections(profile: &UserProfile, range: &DateRangeQuery) -> Vec<ReflectionEntry> {
    profile
        .daily_notes
        .iter()
        .rev()
        .filter(|(date, _)| range.contains(**date))
        .map(|(date, note)| ReflectionEntry {
            date: *date,
            note: note.clone(),
        })
        .collect()
}

/// A challenge's notes with the calendar date of each day, newest first.
/// Days whose date falls outside the calendar are skipped.
pub fn challenge_notes(challenge: &Challenge, range: &DateRangeQuery) -> Vec<ChallengeNoteEntry> {
    let first_day = challenge.start_date.date_naive();
    challenge
        .notes
        .iter()
        .rev()
        .filter_map(|(day, note)| {
            let date = first_day.checked_add_signed(Duration::days(i64::from(*day) - 1))?;
            Some(ChallengeNoteEntry {
                day: *day,
                date,
                note: note.clone(),
            })
        })
        .filter(|entry| range.contains(entry.date))
        .collect()
}
