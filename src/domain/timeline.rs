//! Project timeline: milestone ordering, deadline status and calendar bounds.

use std::cmp::Ordering;
use std::fmt;

use chrono::{Datelike, Days, Months, NaiveDate};
use itertools::Itertools;

use crate::domain::entities::{Milestone, MilestoneStatus, ProjectPhase, ProjectRecord};

/// Spans longer than this many days switch the calendar to a monthly scale.
const WEEKLY_SCALE_MAX_DAYS: i64 = 6 * 7;

/// Assumed project length when no deadline is set.
const DEFAULT_PROJECT_MONTHS: u32 = 6;

/// Milestones ordered by deadline; milestones without one come last.
///
/// `reverse` flips the order of the dated milestones only.
pub fn sort_by_deadline(milestones: &[Milestone], reverse: bool) -> Vec<Milestone> {
    milestones
        .iter()
        .cloned()
        .sorted_by(|a, b| match (a.deadline_at, b.deadline_at) {
            (Some(x), Some(y)) if reverse => y.cmp(&x),
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .collect()
}

/// The earliest pending milestone that has a deadline.
pub fn next_milestone(milestones: &[Milestone]) -> Option<&Milestone> {
    milestones
        .iter()
        .filter(|m| m.status == MilestoneStatus::Pending)
        .filter_map(|m| m.deadline_at.map(|d| (d, m)))
        .min_by_key(|(deadline, _)| *deadline)
        .map(|(_, m)| m)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlineStatus {
    Done,
    NoDeadline,
    Overdue { days: i64 },
    DueIn { days: i64 },
}

impl DeadlineStatus {
    pub fn is_overdue(&self) -> bool {
        matches!(self, Self::Overdue { .. })
    }
}

impl fmt::Display for DeadlineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Done => write!(f, "done"),
            Self::NoDeadline => write!(f, "no deadline"),
            Self::Overdue { days } => write!(f, "{} days overdue", days),
            Self::DueIn { days } => write!(f, "due in {} days", days),
        }
    }
}

pub fn deadline_status(milestone: &Milestone, today: NaiveDate) -> DeadlineStatus {
    if milestone.status == MilestoneStatus::Done {
        return DeadlineStatus::Done;
    }
    match milestone.deadline_at {
        None => DeadlineStatus::NoDeadline,
        Some(deadline) if deadline < today => DeadlineStatus::Overdue {
            days: days_between(deadline, today),
        },
        Some(deadline) => DeadlineStatus::DueIn {
            days: days_between(today, deadline),
        },
    }
}

fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineScale {
    Weekly,
    Monthly,
}

/// Calendar range a project timeline is drawn over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineBounds {
    /// Earliest of project start and first milestone
    pub start: NaiveDate,
    /// Latest of project end and last milestone
    pub end: NaiveDate,
    pub line_start: NaiveDate,
    pub line_end: NaiveDate,
    pub scale: TimelineScale,
}

impl TimelineBounds {
    pub fn compute(project: &ProjectRecord, today: NaiveDate) -> Self {
        let dated: Vec<NaiveDate> = project
            .milestones
            .iter()
            .filter_map(|m| m.deadline_at)
            .collect();

        let project_start = project.started_at.unwrap_or(today);
        let project_end = project.deadline.unwrap_or_else(|| {
            project_start
                .checked_add_months(Months::new(DEFAULT_PROJECT_MONTHS))
                .unwrap_or(project_start)
        });

        let start = dated
            .iter()
            .copied()
            .min()
            .map_or(project_start, |first| first.min(project_start));
        let end = dated
            .iter()
            .copied()
            .max()
            .map_or(project_end, |last| last.max(project_end));

        if days_between(start, end) > WEEKLY_SCALE_MAX_DAYS {
            Self {
                start,
                end,
                line_start: first_of_month(start),
                line_end: last_of_month(end),
                scale: TimelineScale::Monthly,
            }
        } else {
            Self {
                start,
                end,
                line_start: monday_on_or_before(start),
                line_end: monday_on_or_after(end),
                scale: TimelineScale::Weekly,
            }
        }
    }

    /// Position of `date` along the line, 0 at `line_start` and 100 at `line_end`.
    pub fn offset_percent(&self, date: NaiveDate) -> f64 {
        let span = days_between(self.line_start, self.line_end);
        if span == 0 {
            return 0.0;
        }
        days_between(self.line_start, date) as f64 / span as f64 * 100.0
    }

    /// Grid dates: every Monday (weekly) or every first of month (monthly) on the line.
    pub fn marked_dates(&self) -> Vec<NaiveDate> {
        let mut dates = Vec::new();
        let mut current = match self.scale {
            TimelineScale::Weekly => monday_on_or_after(self.line_start),
            TimelineScale::Monthly => first_of_month(self.line_start),
        };

        while current <= self.line_end {
            dates.push(current);
            let next = match self.scale {
                TimelineScale::Weekly => current.checked_add_days(Days::new(7)),
                TimelineScale::Monthly => current.checked_add_months(Months::new(1)),
            };
            match next {
                Some(next) => current = next,
                None => break,
            }
        }

        dates
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn last_of_month(date: NaiveDate) -> NaiveDate {
    first_of_month(date)
        .checked_add_months(Months::new(1))
        .and_then(|d| d.pred_opt())
        .unwrap_or(date)
}

fn monday_on_or_before(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

fn monday_on_or_after(date: NaiveDate) -> NaiveDate {
    let offset = u64::from((7 - date.weekday().num_days_from_monday()) % 7);
    date.checked_add_days(Days::new(offset)).unwrap_or(date)
}

/// Everything shown for one project timeline.
#[derive(Debug, Clone)]
pub struct ProjectTimeline {
    pub bounds: TimelineBounds,
    pub phase: ProjectPhase,
    /// Milestones by deadline, with their status relative to `today`
    pub milestones: Vec<(Milestone, DeadlineStatus)>,
    pub next: Option<Milestone>,
    pub today: NaiveDate,
}

impl ProjectTimeline {
    pub fn build(project: &ProjectRecord, today: NaiveDate) -> Self {
        let milestones = sort_by_deadline(&project.milestones, false)
            .into_iter()
            .map(|m| {
                let status = deadline_status(&m, today);
                (m, status)
            })
            .collect();

        Self {
            bounds: TimelineBounds::compute(project, today),
            phase: project.phase,
            milestones,
            next: next_milestone(&project.milestones).cloned(),
            today,
        }
    }
}
