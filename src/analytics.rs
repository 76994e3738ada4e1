//! Streaks, completion rates and the other figures behind the analytics view.
//!
//! Everything here is a pure function over a slice of challenges. Functions
//! that depend on the clock come in pairs: `foo` reads `Utc::now()` and
//! `foo_at` takes the instant explicitly so tests can pin it.

use crate::errors::HubError;
use crate::models::Challenge;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_STREAK_GOALS: [u32; 5] = [7, 14, 30, 60, 90];

const MAX_SERIES_DAYS: u32 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TimeRange {
    #[default]
    #[serde(rename = "7days")]
    Week,
    #[serde(rename = "30days")]
    Month,
    #[serde(rename = "90days")]
    Quarter,
    #[serde(rename = "all")]
    All,
}

impl TimeRange {
    /// Window length in days, or `None` for the unbounded range.
    pub fn days(self) -> Option<i64> {
        match self {
            TimeRange::Week => Some(7),
            TimeRange::Month => Some(30),
            TimeRange::Quarter => Some(90),
            TimeRange::All => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct Streak {
    pub current: u32,
    pub max: u32,
}

/// Walks the completed day numbers in ascending order. A day that follows
/// its predecessor extends the run, anything else starts a new run of one.
pub fn streak_of(days: impl IntoIterator<Item = u32>) -> Streak {
    let mut days: Vec<u32> = days.into_iter().collect();
    days.sort_unstable();
    days.dedup();

    let mut streak = Streak::default();
    let mut previous: Option<u32> = None;
    for day in days {
        streak.current = match previous {
            Some(prev) if day == prev + 1 => streak.current + 1,
            Some(_) => 1,
            None => 1,
        };
        streak.max = streak.max.max(streak.current);
        previous = Some(day);
    }
    streak
}

pub fn challenge_streak(challenge: &Challenge) -> Streak {
    streak_of(challenge.notes.keys().copied())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeStreak {
    pub name: String,
    pub current_streak: u32,
    pub max_streak: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakOverview {
    pub current_streak: u32,
    pub max_streak: u32,
    pub best_challenge: Option<String>,
    pub challenges: Vec<ChallengeStreak>,
}

pub fn streak_overview(challenges: &[Challenge]) -> StreakOverview {
    let per_challenge: Vec<ChallengeStreak> = challenges
        .iter()
        .map(|challenge| {
            let streak = challenge_streak(challenge);
            ChallengeStreak {
                name: challenge.name.clone(),
                current_streak: streak.current,
                max_streak: streak.max,
            }
        })
        .collect();

    let mut best: Option<&ChallengeStreak> = None;
    for entry in &per_challenge {
        let leading = best.map_or(0, |b| b.max_streak);
        if entry.max_streak > leading {
            best = Some(entry);
        }
    }

    StreakOverview {
        current_streak: per_challenge.iter().map(|s| s.current_streak).max().unwrap_or(0),
        max_streak: per_challenge.iter().map(|s| s.max_streak).max().unwrap_or(0),
        best_challenge: best.map(|b| b.name.clone()),
        challenges: per_challenge,
    }
}

/// `floor(completed / duration * 100)`, not clamped.
pub fn progress_percentage(completed_days: u32, duration: u32) -> u32 {
    if duration == 0 {
        return 0;
    }
    (u64::from(completed_days) * 100 / u64::from(duration)) as u32
}

pub fn display_percentage(completed_days: u32, duration: u32) -> u32 {
    progress_percentage(completed_days, duration).min(100)
}

pub fn filter_by_range_at(
    challenges: &[Challenge],
    range: TimeRange,
    now: DateTime<Utc>,
) -> Vec<&Challenge> {
    match range.days() {
        Some(days) => {
            let cutoff = now - Duration::days(days);
            challenges.iter().filter(|c| c.start_date >= cutoff).collect()
        }
        None => challenges.iter().collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRate {
    pub name: String,
    pub percentage: u32,
}

pub fn completion_rates(challenges: &[&Challenge]) -> Vec<CompletionRate> {
    challenges
        .iter()
        .map(|c| CompletionRate {
            name: c.name.clone(),
            percentage: progress_percentage(c.completed_days, c.duration),
        })
        .collect()
}

/// Day number of `date` within a challenge; the start date is day 1.
pub fn day_number(start: DateTime<Utc>, date: NaiveDate) -> i64 {
    (date - start.date_naive()).num_days() + 1
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyCompletion {
    pub date: NaiveDate,
    pub label: String,
    pub completed: usize,
}

pub fn daily_completion_at(
    challenges: &[Challenge],
    range: TimeRange,
    today: NaiveDate,
) -> Vec<DailyCompletion> {
    let days_to_show = match range.days() {
        Some(days) => days,
        None => {
            let longest = challenges.iter().map(|c| c.completed_days).max().unwrap_or(0);
            i64::from(longest.min(MAX_SERIES_DAYS))
        }
    };

    (0..days_to_show)
        .rev()
        .map(|offset| {
            let date = today - Duration::days(offset);
            let completed = challenges
                .iter()
                .filter(|c| {
                    u32::try_from(day_number(c.start_date, date))
                        .map(|day| c.notes.contains_key(&day))
                        .unwrap_or(false)
                })
                .count();
            DailyCompletion {
                date,
                label: date.format("%b %-d").to_string(),
                completed,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressBucket {
    NotStarted,
    JustStarted,
    InProgress,
    AlmostDone,
    Completed,
}

impl ProgressBucket {
    pub const ALL: [ProgressBucket; 5] = [
        ProgressBucket::NotStarted,
        ProgressBucket::JustStarted,
        ProgressBucket::InProgress,
        ProgressBucket::AlmostDone,
        ProgressBucket::Completed,
    ];

    /// Buckets on exact progress, compared without rounding.
    pub fn of(completed_days: u32, duration: u32) -> Self {
        if completed_days == 0 {
            return ProgressBucket::NotStarted;
        }
        let scaled = u64::from(completed_days) * 100;
        let duration = u64::from(duration);
        if scaled <= 25 * duration {
            ProgressBucket::JustStarted
        } else if scaled <= 75 * duration {
            ProgressBucket::InProgress
        } else if scaled < 100 * duration {
            ProgressBucket::AlmostDone
        } else {
            ProgressBucket::Completed
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProgressBucket::NotStarted => "Not Started (0%)",
            ProgressBucket::JustStarted => "Just Started (1-25%)",
            ProgressBucket::InProgress => "In Progress (26-75%)",
            ProgressBucket::AlmostDone => "Almost Done (76-99%)",
            ProgressBucket::Completed => "Completed (100%)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionEntry {
    pub category: &'static str,
    pub count: usize,
}

pub fn progress_distribution(challenges: &[&Challenge]) -> Vec<DistributionEntry> {
    ProgressBucket::ALL
        .iter()
        .map(|bucket| DistributionEntry {
            category: bucket.label(),
            count: challenges
                .iter()
                .filter(|c| ProgressBucket::of(c.completed_days, c.duration) == *bucket)
                .count(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodStats {
    pub challenge_count: usize,
    pub completion_rate: f64,
    pub total_completed: usize,
}

impl PeriodStats {
    fn of(challenges: &[&Challenge]) -> Self {
        let completion_rate = if challenges.is_empty() {
            0.0
        } else {
            let sum: f64 = challenges
                .iter()
                .filter(|c| c.duration > 0)
                .map(|c| f64::from(c.completed_days) / f64::from(c.duration))
                .sum();
            sum / challenges.len() as f64 * 100.0
        };
        Self {
            challenge_count: challenges.len(),
            completion_rate,
            total_completed: challenges
                .iter()
                .filter(|c| c.completed_days >= c.duration)
                .count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodComparison {
    pub current_period: PeriodStats,
    pub previous_period: PeriodStats,
}

/// Compares challenges started in the last window against those started in
/// the window before it. The unbounded range has nothing to compare with.
pub fn compare_periods_at(
    challenges: &[Challenge],
    range: TimeRange,
    now: DateTime<Utc>,
) -> Option<PeriodComparison> {
    let days = range.days()?;
    let current_start = now - Duration::days(days);
    let previous_start = now - Duration::days(days * 2);

    let current: Vec<&Challenge> = challenges
        .iter()
        .filter(|c| c.start_date >= current_start)
        .collect();
    let previous: Vec<&Challenge> = challenges
        .iter()
        .filter(|c| c.start_date >= previous_start && c.start_date < current_start)
        .collect();

    Some(PeriodComparison {
        current_period: PeriodStats::of(&current),
        previous_period: PeriodStats::of(&previous),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakGoal {
    pub days: u32,
    pub achieved: bool,
}

impl StreakGoal {
    pub fn defaults() -> Vec<StreakGoal> {
        DEFAULT_STREAK_GOALS
            .iter()
            .map(|&days| StreakGoal {
                days,
                achieved: false,
            })
            .collect()
    }
}

/// Marks goals reached by `current_streak` and returns the newly achieved
/// ones. Achieved goals stay achieved when the streak later breaks.
pub fn evaluate_goals(goals: &mut [StreakGoal], current_streak: u32) -> Vec<u32> {
    let mut newly_achieved = Vec::new();
    for goal in goals.iter_mut() {
        if !goal.achieved && current_streak >= goal.days {
            goal.achieved = true;
            newly_achieved.push(goal.days);
        }
    }
    newly_achieved
}

pub fn next_goal(goals: &[StreakGoal]) -> Option<u32> {
    goals.iter().filter(|g| !g.achieved).map(|g| g.days).min()
}

pub fn add_goal(goals: &mut Vec<StreakGoal>, days: u32) -> Result<(), HubError> {
    if days == 0 {
        return Err(HubError::InvalidGoal);
    }
    if goals.iter().any(|g| g.days == days) {
        return Err(HubError::DuplicateGoal(days));
    }
    goals.push(StreakGoal {
        days,
        achieved: false,
    });
    goals.sort_by_key(|g| g.days);
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub time_range: TimeRange,
    pub generated_on: NaiveDate,
    pub streaks: StreakOverview,
    pub completion_rates: Vec<CompletionRate>,
    pub daily_completion: Vec<DailyCompletion>,
    pub progress_distribution: Vec<DistributionEntry>,
    pub comparison: Option<PeriodComparison>,
}

pub fn build_report(challenges: &[Challenge], range: TimeRange, compare: bool) -> AnalyticsReport {
    build_report_at(challenges, range, compare, Utc::now())
}

pub fn build_report_at(
    challenges: &[Challenge],
    range: TimeRange,
    compare: bool,
    now: DateTime<Utc>,
) -> AnalyticsReport {
    let filtered = filter_by_range_at(challenges, range, now);
    AnalyticsReport {
        time_range: range,
        generated_on: now.date_naive(),
        streaks: streak_overview(challenges),
        completion_rates: completion_rates(&filtered),
        daily_completion: daily_completion_at(challenges, range, now.date_naive()),
        progress_distribution: progress_distribution(&filtered),
        comparison: if compare {
            compare_periods_at(challenges, range, now)
        } else {
            None
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::BTreeMap;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 9, 30, 0).unwrap()
    }

    fn challenge(name: &str, duration: u32, start: DateTime<Utc>, days: &[u32]) -> Challenge {
        Challenge {
            id: name.to_lowercase(),
            name: name.to_string(),
            duration,
            start_date: start,
            completed_days: days.len() as u32,
            notes: days
                .iter()
                .map(|d| (*d, format!("day {d}")))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn streak_resets_on_gap() {
        let streak = streak_of([1, 2, 3, 5, 6]);
        assert_eq!(streak, Streak { current: 2, max: 3 });
    }

    #[test]
    fn streak_sorts_input() {
        assert_eq!(streak_of([4, 2, 3]), Streak { current: 3, max: 3 });
        assert_eq!(streak_of(Vec::new()), Streak::default());
    }

    #[test]
    fn overview_picks_first_longest_challenge() {
        let start = at(2026, 1, 1);
        let challenges = vec![
            challenge("Read", 30, start, &[1, 2, 3]),
            challenge("Run", 30, start, &[1, 3]),
            challenge("Walk", 30, start, &[1, 2, 3]),
        ];
        let overview = streak_overview(&challenges);
        assert_eq!(overview.current_streak, 3);
        assert_eq!(overview.max_streak, 3);
        assert_eq!(overview.best_challenge.as_deref(), Some("Read"));
    }

    #[test]
    fn overview_without_progress_has_no_best() {
        let challenges = vec![challenge("Idle", 10, at(2026, 1, 1), &[])];
        assert_eq!(streak_overview(&challenges).best_challenge, None);
        assert_eq!(streak_overview(&[]).current_streak, 0);
    }

    #[test]
    fn progress_floors_and_display_clamps() {
        assert_eq!(progress_percentage(1, 3), 33);
        assert_eq!(progress_percentage(10, 10), 100);
        assert_eq!(progress_percentage(12, 10), 120);
        assert_eq!(display_percentage(12, 10), 100);
        assert_eq!(progress_percentage(5, 0), 0);
    }

    #[test]
    fn range_filter_uses_start_date() {
        let now = at(2026, 3, 31);
        let challenges = vec![
            challenge("Recent", 30, at(2026, 3, 28), &[]),
            challenge("Older", 30, at(2026, 3, 10), &[]),
            challenge("Ancient", 30, at(2025, 6, 1), &[]),
        ];
        let names = |range| {
            filter_by_range_at(&challenges, range, now)
                .iter()
                .map(|c| c.name.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(names(TimeRange::Week), vec!["Recent"]);
        assert_eq!(names(TimeRange::Month), vec!["Recent", "Older"]);
        assert_eq!(names(TimeRange::All).len(), 3);
    }

    #[test]
    fn daily_series_counts_notes_per_date() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();
        let challenges = vec![
            challenge("Read", 30, at(2026, 1, 8), &[1, 2, 3]),
            challenge("Run", 30, at(2026, 1, 9), &[2]),
        ];
        let series = daily_completion_at(&challenges, TimeRange::Week, today);
        assert_eq!(series.len(), 7);
        assert_eq!(series.last().unwrap().date, today);
        assert_eq!(series.first().unwrap().date, today - Duration::days(6));

        let counts: Vec<usize> = series.iter().map(|d| d.completed).collect();
        assert_eq!(counts, vec![0, 0, 0, 0, 1, 1, 2]);
        assert_eq!(series.last().unwrap().label, "Jan 10");
    }

    #[test]
    fn daily_series_for_all_follows_longest_challenge() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();
        let challenges = vec![challenge("Read", 30, at(2026, 1, 6), &[1, 2, 3, 4, 5])];
        assert_eq!(daily_completion_at(&challenges, TimeRange::All, today).len(), 5);
        assert!(daily_completion_at(&[], TimeRange::All, today).is_empty());
    }

    #[test]
    fn distribution_uses_exact_progress() {
        let start = at(2026, 1, 1);
        let challenges = vec![
            challenge("A", 10, start, &[]),
            challenge("B", 100, start, &(1..=25).collect::<Vec<_>>()),
            challenge("C", 3, start, &[1]),
            challenge("D", 100, start, &(1..=76).collect::<Vec<_>>()),
            challenge("E", 10, start, &(1..=10).collect::<Vec<_>>()),
        ];
        let refs: Vec<&Challenge> = challenges.iter().collect();
        let counts: Vec<usize> = progress_distribution(&refs).iter().map(|e| e.count).collect();
        assert_eq!(counts, vec![1, 1, 1, 1, 1]);
    }

    #[test]
    fn comparison_splits_windows() {
        let now = at(2026, 3, 31);
        let challenges = vec![
            challenge("Now", 10, at(2026, 3, 29), &(1..=10).collect::<Vec<_>>()),
            challenge("Before", 10, at(2026, 3, 20), &[1, 2, 3, 4, 5]),
            challenge("Gone", 10, at(2026, 1, 1), &[]),
        ];
        let cmp = compare_periods_at(&challenges, TimeRange::Week, now).unwrap();
        assert_eq!(cmp.current_period.challenge_count, 1);
        assert_eq!(cmp.current_period.total_completed, 1);
        assert!((cmp.current_period.completion_rate - 100.0).abs() < f64::EPSILON);
        assert_eq!(cmp.previous_period.challenge_count, 1);
        assert!((cmp.previous_period.completion_rate - 50.0).abs() < f64::EPSILON);

        assert!(compare_periods_at(&challenges, TimeRange::All, now).is_none());
    }

    #[test]
    fn goals_latch_and_report_new_ones() {
        let mut goals = StreakGoal::defaults();
        assert_eq!(evaluate_goals(&mut goals, 15), vec![7, 14]);
        assert_eq!(next_goal(&goals), Some(30));
        assert!(evaluate_goals(&mut goals, 2).is_empty());
        assert!(goals[0].achieved);
    }

    #[test]
    fn added_goals_stay_sorted() {
        let mut goals = StreakGoal::defaults();
        add_goal(&mut goals, 21).unwrap();
        let days: Vec<u32> = goals.iter().map(|g| g.days).collect();
        assert_eq!(days, vec![7, 14, 21, 30, 60, 90]);
        assert_eq!(add_goal(&mut goals, 21), Err(HubError::DuplicateGoal(21)));
        assert_eq!(add_goal(&mut goals, 0), Err(HubError::InvalidGoal));
    }

    #[test]
    fn report_respects_compare_flag() {
        let now = at(2026, 3, 31);
        let challenges = vec![challenge("Read", 10, at(2026, 3, 30), &[1, 2])];
        let report = build_report_at(&challenges, TimeRange::Week, false, now);
        assert!(report.comparison.is_none());
        assert_eq!(report.completion_rates[0].percentage, 20);
        assert_eq!(report.daily_completion.len(), 7);

        let report = build_report_at(&challenges, TimeRange::Week, true, now);
        assert!(report.comparison.is_some());
    }
}
