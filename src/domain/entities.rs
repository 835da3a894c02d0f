//! Domain entities: core data structures

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::builder::Hierarchical;

/// Person assigned as champion (owner) of a goal or project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub full_name: String,
}

impl Person {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
        }
    }
}

/// Space (group) a goal or project belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Space {
    pub id: String,
    pub name: String,
    /// The company-wide space sorts ahead of every other space.
    #[serde(default)]
    pub is_company_space: bool,
}

/// Inclusive date range a goal is scheduled for, e.g. a quarter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeframe {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// A goal as delivered by the data layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalRecord {
    pub id: String,
    /// Parent goal, None for top-level goals
    #[serde(default)]
    pub parent_goal_id: Option<String>,
    pub name: String,
    pub champion: Person,
    pub space: Space,
    #[serde(default)]
    pub timeframe: Option<Timeframe>,
    /// Progress in percent
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub closed: bool,
    #[serde(default)]
    pub last_check_in: Option<DateTime<Utc>>,
}

/// A project, optionally contributing to a goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: String,
    /// Goal this project contributes to
    #[serde(default)]
    pub goal_id: Option<String>,
    pub name: String,
    pub champion: Person,
    pub space: Space,
    #[serde(default)]
    pub started_at: Option<NaiveDate>,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub closed: bool,
    #[serde(default)]
    pub last_check_in: Option<DateTime<Utc>>,
    #[serde(default)]
    pub phase: ProjectPhase,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
}

/// Lifecycle phase of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProjectPhase {
    #[default]
    Planning,
    Execution,
    Control,
    Paused,
    Completed,
    Canceled,
}

impl ProjectPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::Execution => "execution",
            Self::Control => "control",
            Self::Paused => "paused",
            Self::Completed => "completed",
            Self::Canceled => "canceled",
        }
    }

    /// Only the active phases get a bar on the project timeline.
    pub fn is_displayed_on_timeline(&self) -> bool {
        !matches!(self, Self::Paused | Self::Completed | Self::Canceled)
    }
}

/// Milestone of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub deadline_at: Option<NaiveDate>,
    #[serde(default)]
    pub completed_at: Option<NaiveDate>,
    #[serde(default)]
    pub status: MilestoneStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneStatus {
    #[default]
    Pending,
    Done,
}

/// Everything a data file contains.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub goals: Vec<GoalRecord>,
    #[serde(default)]
    pub projects: Vec<ProjectRecord>,
}

impl Hierarchical for GoalRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn parent_id(&self) -> Option<&str> {
        self.parent_goal_id.as_deref()
    }
}

impl Hierarchical for ProjectRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn parent_id(&self) -> Option<&str> {
        self.goal_id.as_deref()
    }
}
