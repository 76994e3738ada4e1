use crate::analytics::progress_percentage;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Milestone {
    FirstStep,
    WeekChampion,
    GettingStarted,
    HalfwayThere,
    AlmostThere,
    ChallengeComplete,
}

/// Percentage milestones, highest first.
const PERCENT_MILESTONES: [(u32, Milestone); 4] = [
    (100, Milestone::ChallengeComplete),
    (75, Milestone::AlmostThere),
    (50, Milestone::HalfwayThere),
    (25, Milestone::GettingStarted),
];

impl Milestone {
    pub fn title(self) -> &'static str {
        match self {
            Milestone::FirstStep => "First Step",
            Milestone::WeekChampion => "Week Champion",
            Milestone::GettingStarted => "Getting Started",
            Milestone::HalfwayThere => "Halfway There",
            Milestone::AlmostThere => "Almost There",
            Milestone::ChallengeComplete => "Challenge Complete",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Milestone::FirstStep => "You've started your journey! The hardest part is beginning.",
            Milestone::WeekChampion => "A full week of dedication! You're building strong habits.",
            Milestone::GettingStarted => "You're building momentum!",
            Milestone::HalfwayThere => "Keep pushing forward!",
            Milestone::AlmostThere => "The finish line is in sight!",
            Milestone::ChallengeComplete => "You've done it! Incredible work!",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneEvent {
    pub milestone: Milestone,
    pub title: String,
    pub description: String,
    pub percentage: u32,
}

/// Picks the milestone for a challenge's current progress. Days 1 and 7
/// win over any percentage; otherwise the highest percentage threshold
/// reached applies.
pub fn select(completed_days: u32, duration: u32) -> Option<Milestone> {
    match completed_days {
        1 => return Some(Milestone::FirstStep),
        7 => return Some(Milestone::WeekChampion),
        _ => {}
    }
    let percentage = progress_percentage(completed_days, duration);
    PERCENT_MILESTONES
        .iter()
        .find(|(threshold, _)| percentage >= *threshold)
        .map(|(_, milestone)| *milestone)
}

pub fn event_for(completed_days: u32, duration: u32) -> Option<MilestoneEvent> {
    select(completed_days, duration).map(|milestone| MilestoneEvent {
        milestone,
        title: milestone.title().to_string(),
        description: milestone.description().to_string(),
        percentage: progress_percentage(completed_days, duration),
    })
}
