use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::analytics::{AnalyticsReport, StreakGoal, TimeRange};
use crate::export::ExportFormat;
use crate::milestones::MilestoneEvent;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    pub id: String,
    pub name: String,
    pub duration: u32,
    pub start_date: DateTime<Utc>,
    pub completed_days: u32,
    #[serde(default)]
    pub notes: BTreeMap<u32, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    #[serde(default)]
    pub challenges: Vec<Challenge>,
    #[serde(default)]
    pub daily_notes: BTreeMap<NaiveDate, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    pub profile: UserProfile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields of a [`UserDocument`] to replace; `None` leaves a field as is.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    pub name: Option<String>,
    pub challenges: Option<Vec<Challenge>>,
    pub daily_notes: Option<BTreeMap<NaiveDate, String>>,
}

impl UserDocument {
    pub fn new(profile: UserProfile, now: DateTime<Utc>) -> Self {
        Self {
            profile,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, patch: UserPatch, now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.profile.name = name;
        }
        if let Some(challenges) = patch.challenges {
            self.profile.challenges = challenges;
        }
        if let Some(daily_notes) = patch.daily_notes {
            self.profile.daily_notes = daily_notes;
        }
        self.updated_at = now;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default = "StreakGoal::defaults")]
    pub streak_goals: Vec<StreakGoal>,
    #[serde(default)]
    pub has_visited_dashboard: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            streak_goals: StreakGoal::defaults(),
            has_visited_dashboard: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HubData {
    #[serde(default)]
    pub users: BTreeMap<String, UserDocument>,
    #[serde(default)]
    pub preferences: BTreeMap<String, Preferences>,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub uid: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct NewChallengeRequest {
    pub name: String,
    pub duration: u32,
}

#[derive(Debug, Default, Deserialize)]
pub struct MarkCompleteRequest {
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Deserialize)]
pub struct EditLogRequest {
    pub day: Option<u32>,
    pub note: String,
}

#[derive(Debug, Deserialize)]
pub struct DurationRequest {
    pub duration: u32,
}

#[derive(Debug, Deserialize)]
pub struct ReflectionRequest {
    pub date: Option<NaiveDate>,
    pub note: String,
}

#[derive(Debug, Deserialize)]
pub struct StreakGoalRequest {
    pub days: u32,
}

#[derive(Debug, Deserialize)]
pub struct PasswordCheckRequest {
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct DateRangeQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AnalyticsQuery {
    #[serde(default)]
    pub range: TimeRange,
    #[serde(default)]
    pub compare: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    pub format: ExportFormat,
    #[serde(default)]
    pub range: TimeRange,
    #[serde(default)]
    pub compare: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionResponse {
    pub challenge: Challenge,
    pub progress: u32,
    pub milestone: Option<MilestoneEvent>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    #[serde(flatten)]
    pub report: AnalyticsReport,
    pub goals: Vec<StreakGoal>,
    pub newly_achieved: Vec<u32>,
    pub next_goal: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn apply_replaces_only_given_fields() {
        let created = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let day = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let mut doc = UserDocument::new(
            UserProfile {
                name: "Noor".into(),
                challenges: Vec::new(),
                daily_notes: [(day, String::from("steady"))].into_iter().collect(),
            },
            created,
        );

        let later = created + Duration::hours(3);
        doc.apply(
            UserPatch {
                name: Some("Noor A.".into()),
                ..Default::default()
            },
            later,
        );
        assert_eq!(doc.profile.name, "Noor A.");
        assert_eq!(doc.profile.daily_notes.get(&day).map(String::as_str), Some("steady"));
        assert_eq!(doc.created_at, created);
        assert_eq!(doc.updated_at, later);

        doc.apply(
            UserPatch {
                daily_notes: Some(BTreeMap::new()),
                ..Default::default()
            },
            later + Duration::hours(1),
        );
        assert_eq!(doc.profile.name, "Noor A.");
        assert!(doc.profile.daily_notes.is_empty());
        assert_eq!(doc.updated_at, later + Duration::hours(1));
    }
}
