//! Lifecycle operations on a user's challenges and reflections.
//!
//! These mutate a [`UserProfile`] in place and leave persistence to the
//! caller.

use crate::analytics::progress_percentage;
use crate::errors::HubError;
use crate::milestones::{self, MilestoneEvent};
use crate::models::{Challenge, UserProfile};
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

pub const MIN_DURATION: u32 = 10;
pub const MAX_DURATION: u32 = 3650;

fn check_duration(duration: u32) -> Result<(), HubError> {
    if duration < MIN_DURATION {
        return Err(HubError::DurationTooShort { min: MIN_DURATION });
    }
    if duration > MAX_DURATION {
        return Err(HubError::DurationTooLong { max: MAX_DURATION });
    }
    Ok(())
}

pub fn find_mut<'a>(profile: &'a mut UserProfile, id: &str) -> Result<&'a mut Challenge, HubError> {
    profile
        .challenges
        .iter_mut()
        .find(|c| c.id == id)
        .ok_or_else(|| HubError::ChallengeNotFound(id.to_string()))
}

pub fn find<'a>(profile: &'a UserProfile, id: &str) -> Result<&'a Challenge, HubError> {
    profile
        .challenges
        .iter()
        .find(|c| c.id == id)
        .ok_or_else(|| HubError::ChallengeNotFound(id.to_string()))
}

pub fn add_challenge(
    profile: &mut UserProfile,
    name: &str,
    duration: u32,
    now: DateTime<Utc>,
) -> Result<Challenge, HubError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(HubError::EmptyName);
    }
    check_duration(duration)?;

    let challenge = Challenge {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        duration,
        start_date: now,
        completed_days: 0,
        notes: Default::default(),
    };
    profile.challenges.push(challenge.clone());
    Ok(challenge)
}

pub fn delete_challenge(profile: &mut UserProfile, id: &str) -> Result<Challenge, HubError> {
    let index = profile
        .challenges
        .iter()
        .position(|c| c.id == id)
        .ok_or_else(|| HubError::ChallengeNotFound(id.to_string()))?;
    Ok(profile.challenges.remove(index))
}

/// Day of the challenge that `now` falls in, counting whole 24-hour
/// periods since the start instant; the first period is day 1.
pub fn current_day(challenge: &Challenge, now: DateTime<Utc>) -> i64 {
    (now - challenge.start_date).num_days() + 1
}

/// True when the latest logged day is the challenge day `now` falls in.
pub fn marked_today(challenge: &Challenge, now: DateTime<Utc>) -> bool {
    let latest = challenge.notes.keys().next_back().copied().unwrap_or(0);
    i64::from(latest) == current_day(challenge, now)
}

pub fn mark_complete(
    profile: &mut UserProfile,
    id: &str,
    note: &str,
    now: DateTime<Utc>,
) -> Result<(Challenge, Option<MilestoneEvent>), HubError> {
    let challenge = find_mut(profile, id)?;
    if challenge.completed_days >= challenge.duration {
        return Err(HubError::AlreadyFinished(challenge.name.clone()));
    }
    if marked_today(challenge, now) {
        return Err(HubError::AlreadyMarkedToday);
    }

    challenge.completed_days += 1;
    challenge.notes.insert(challenge.completed_days, note.to_string());

    let milestone = milestones::event_for(challenge.completed_days, challenge.duration);
    Ok((challenge.clone(), milestone))
}

/// Overwrites the note of `day`, defaulting to the latest completed day.
pub fn edit_log(
    profile: &mut UserProfile,
    id: &str,
    day: Option<u32>,
    note: &str,
) -> Result<Challenge, HubError> {
    let challenge = find_mut(profile, id)?;
    let day = day.unwrap_or(challenge.completed_days.max(1));
    if day == 0 || day > challenge.duration {
        return Err(HubError::DayOutOfRange {
            day,
            duration: challenge.duration,
        });
    }
    challenge.notes.insert(day, note.to_string());
    Ok(challenge.clone())
}

pub fn delete_latest_log(profile: &mut UserProfile, id: &str) -> Result<Challenge, HubError> {
    let challenge = find_mut(profile, id)?;
    let current = challenge.completed_days.max(1);
    challenge.notes.remove(&current);
    challenge.completed_days = current - 1;
    Ok(challenge.clone())
}

pub fn update_duration(
    profile: &mut UserProfile,
    id: &str,
    duration: u32,
) -> Result<Challenge, HubError> {
    check_duration(duration)?;
    let challenge = find_mut(profile, id)?;
    if duration < challenge.completed_days {
        return Err(HubError::DurationBelowProgress {
            completed: challenge.completed_days,
        });
    }
    challenge.duration = duration;
    Ok(challenge.clone())
}

pub fn set_reflection(profile: &mut UserProfile, date: NaiveDate, note: &str) {
    profile.daily_notes.insert(date, note.to_string());
}

/// Clears challenges and reflections, keeping the display name.
pub fn reset(profile: &mut UserProfile) {
    profile.challenges.clear();
    profile.daily_notes.clear();
}

pub fn progress(challenge: &Challenge) -> u32 {
    progress_percentage(challenge.completed_days, challenge.duration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::milestones::Milestone;
    use chrono::{Duration, TimeZone};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 1, 8, 0, 0).unwrap()
    }

    fn profile_with(duration: u32) -> (UserProfile, String) {
        let mut profile = UserProfile {
            name: "Ada".into(),
            ..Default::default()
        };
        let id = add_challenge(&mut profile, "  Cold showers ", duration, start())
            .unwrap()
            .id;
        (profile, id)
    }

    #[test]
    fn add_validates_input() {
        let mut profile = UserProfile::default();
        assert_eq!(
            add_challenge(&mut profile, "  ", 30, start()),
            Err(HubError::EmptyName)
        );
        assert_eq!(
            add_challenge(&mut profile, "Read", 9, start()),
            Err(HubError::DurationTooShort { min: 10 })
        );
        assert_eq!(
            add_challenge(&mut profile, "Read", 200_000_000, start()),
            Err(HubError::DurationTooLong { max: MAX_DURATION })
        );
        let challenge = add_challenge(&mut profile, " Read ", 10, start()).unwrap();
        assert_eq!(challenge.name, "Read");
        assert_eq!(challenge.completed_days, 0);
        assert_eq!(profile.challenges.len(), 1);
    }

    #[test]
    fn mark_complete_once_per_day() {
        let (mut profile, id) = profile_with(30);
        let (challenge, milestone) = mark_complete(&mut profile, &id, "felt great", start()).unwrap();
        assert_eq!(challenge.completed_days, 1);
        assert_eq!(challenge.notes.get(&1).map(String::as_str), Some("felt great"));
        assert_eq!(milestone.map(|m| m.milestone), Some(Milestone::FirstStep));

        let later = start() + Duration::hours(6);
        assert_eq!(
            mark_complete(&mut profile, &id, "again", later),
            Err(HubError::AlreadyMarkedToday)
        );

        let tomorrow = start() + Duration::days(1);
        let (challenge, milestone) = mark_complete(&mut profile, &id, "", tomorrow).unwrap();
        assert_eq!(challenge.completed_days, 2);
        assert!(milestone.is_none());
    }

    #[test]
    fn day_boundary_follows_elapsed_time() {
        let late = Utc.with_ymd_and_hms(2026, 1, 1, 23, 0, 0).unwrap();
        let mut profile = UserProfile::default();
        let id = add_challenge(&mut profile, "Stretch", 30, late).unwrap().id;
        mark_complete(&mut profile, &id, "late start", late).unwrap();

        let after_midnight = late + Duration::hours(2);
        assert_eq!(current_day(find(&profile, &id).unwrap(), after_midnight), 1);
        assert_eq!(
            mark_complete(&mut profile, &id, "too soon", after_midnight),
            Err(HubError::AlreadyMarkedToday)
        );

        let next_day = late + Duration::hours(24);
        let (challenge, _) = mark_complete(&mut profile, &id, "", next_day).unwrap();
        assert_eq!(challenge.completed_days, 2);
    }

    #[test]
    fn finished_challenge_rejects_marks() {
        let (mut profile, id) = profile_with(10);
        for day in 0..10 {
            mark_complete(&mut profile, &id, "ok", start() + Duration::days(day)).unwrap();
        }
        let challenge = find(&profile, &id).unwrap();
        assert_eq!(progress(challenge), 100);
        assert!(matches!(
            mark_complete(&mut profile, &id, "extra", start() + Duration::days(10)),
            Err(HubError::AlreadyFinished(_))
        ));
    }

    #[test]
    fn edit_and_delete_logs() {
        let (mut profile, id) = profile_with(30);
        mark_complete(&mut profile, &id, "one", start()).unwrap();
        mark_complete(&mut profile, &id, "two", start() + Duration::days(1)).unwrap();

        let edited = edit_log(&mut profile, &id, None, "two, revised").unwrap();
        assert_eq!(edited.notes.get(&2).map(String::as_str), Some("two, revised"));
        assert!(matches!(
            edit_log(&mut profile, &id, Some(31), "x"),
            Err(HubError::DayOutOfRange { day: 31, .. })
        ));

        let trimmed = delete_latest_log(&mut profile, &id).unwrap();
        assert_eq!(trimmed.completed_days, 1);
        assert!(!trimmed.notes.contains_key(&2));

        delete_latest_log(&mut profile, &id).unwrap();
        let empty = delete_latest_log(&mut profile, &id).unwrap();
        assert_eq!(empty.completed_days, 0);
        assert!(empty.notes.is_empty());
    }

    #[test]
    fn duration_rules() {
        let (mut profile, id) = profile_with(10);
        for day in 0..10 {
            mark_complete(&mut profile, &id, "", start() + Duration::days(day)).unwrap();
        }
        assert_eq!(
            update_duration(&mut profile, &id, 5),
            Err(HubError::DurationTooShort { min: 10 })
        );
        assert_eq!(
            update_duration(&mut profile, &id, MAX_DURATION + 1),
            Err(HubError::DurationTooLong { max: MAX_DURATION })
        );
        assert_eq!(update_duration(&mut profile, &id, 40).unwrap().duration, 40);

        let (mut profile, id) = profile_with(30);
        profile.challenges[0].completed_days = 20;
        assert_eq!(
            update_duration(&mut profile, &id, 12),
            Err(HubError::DurationBelowProgress { completed: 20 })
        );
    }

    #[test]
    fn delete_and_reset() {
        let (mut profile, id) = profile_with(30);
        set_reflection(&mut profile, start().date_naive(), "calm day");
        assert!(delete_challenge(&mut profile, "missing").is_err());
        delete_challenge(&mut profile, &id).unwrap();
        assert!(profile.challenges.is_empty());

        reset(&mut profile);
        assert!(profile.daily_notes.is_empty());
        assert_eq!(profile.name, "Ada");
    }
}
