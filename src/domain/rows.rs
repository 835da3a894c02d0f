//! Goal and project rows of the goal tree.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use itertools::Itertools;

use crate::domain::builder::Hierarchical;
use crate::domain::entities::{GoalRecord, Person, ProjectRecord, Space};
use crate::domain::sort::SortableNode;

/// Goal row with the counts of what sits below it.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalRow {
    pub goal: GoalRecord,
    pub sub_goal_count: usize,
    pub project_count: usize,
}

impl GoalRow {
    pub fn new(goal: GoalRecord) -> Self {
        Self {
            goal,
            sub_goal_count: 0,
            project_count: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectRow {
    pub project: ProjectRecord,
}

impl ProjectRow {
    pub fn new(project: ProjectRecord) -> Self {
        Self { project }
    }
}

/// Row of the goal tree: either a goal or a project.
#[derive(Debug, Clone, PartialEq)]
pub enum Row {
    Goal(GoalRow),
    Project(ProjectRow),
}

impl Row {
    pub fn kind(&self) -> &'static str {
        match self {
            Row::Goal(_) => "goal",
            Row::Project(_) => "project",
        }
    }

    fn node(&self) -> &dyn SortableNode {
        match self {
            Row::Goal(goal) => goal,
            Row::Project(project) => project,
        }
    }
}

impl From<GoalRecord> for Row {
    fn from(goal: GoalRecord) -> Self {
        Row::Goal(GoalRow::new(goal))
    }
}

impl From<ProjectRecord> for Row {
    fn from(project: ProjectRecord) -> Self {
        Row::Project(ProjectRow::new(project))
    }
}

fn pluralize(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("1 {}", singular)
    } else {
        format!("{} {}", count, plural)
    }
}

/// Later dates sort after earlier ones; a missing date sorts last.
fn compare_optional_dates(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// End date first; equal ends put the longer span (earlier start) first.
///
/// Shared by both row kinds so a goal and a project order consistently
/// whichever side is asked.
fn compare_end_then_start(a: &dyn SortableNode, b: &dyn SortableNode) -> Ordering {
    compare_optional_dates(a.timeframe_end(), b.timeframe_end())
        .then_with(|| compare_optional_dates(a.timeframe_start(), b.timeframe_start()))
}

impl SortableNode for GoalRow {
    fn id(&self) -> &str {
        &self.goal.id
    }

    fn name(&self) -> &str {
        &self.goal.name
    }

    fn champion(&self) -> &Person {
        &self.goal.champion
    }

    fn space(&self) -> &Space {
        &self.goal.space
    }

    fn is_closed(&self) -> bool {
        self.goal.closed
    }

    fn progress(&self) -> f64 {
        self.goal.progress
    }

    fn last_check_in(&self) -> Option<DateTime<Utc>> {
        self.goal.last_check_in
    }

    fn timeframe_start(&self) -> Option<NaiveDate> {
        self.goal.timeframe.map(|t| t.start)
    }

    fn timeframe_end(&self) -> Option<NaiveDate> {
        self.goal.timeframe.map(|t| t.end)
    }

    fn child_summary_label(&self) -> Option<String> {
        let parts: Vec<String> = [
            (self.sub_goal_count > 0)
                .then(|| pluralize(self.sub_goal_count, "sub-goal", "sub-goals")),
            (self.project_count > 0)
                .then(|| pluralize(self.project_count, "project", "projects")),
        ]
        .into_iter()
        .flatten()
        .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.iter().join(", "))
        }
    }

    fn compare_timeframe(&self, other: &dyn SortableNode) -> Ordering {
        compare_end_then_start(self, other)
    }
}

impl SortableNode for ProjectRow {
    fn id(&self) -> &str {
        &self.project.id
    }

    fn name(&self) -> &str {
        &self.project.name
    }

    fn champion(&self) -> &Person {
        &self.project.champion
    }

    fn space(&self) -> &Space {
        &self.project.space
    }

    fn is_closed(&self) -> bool {
        self.project.closed
    }

    fn progress(&self) -> f64 {
        self.project.progress
    }

    fn last_check_in(&self) -> Option<DateTime<Utc>> {
        self.project.last_check_in
    }

    fn timeframe_start(&self) -> Option<NaiveDate> {
        self.project.started_at
    }

    fn timeframe_end(&self) -> Option<NaiveDate> {
        self.project.deadline
    }

    fn child_summary_label(&self) -> Option<String> {
        match self.project.milestones.len() {
            0 => None,
            n => Some(pluralize(n, "milestone", "milestones")),
        }
    }

    /// A project spans `started_at` to its deadline.
    fn compare_timeframe(&self, other: &dyn SortableNode) -> Ordering {
        compare_end_then_start(self, other)
    }
}

impl SortableNode for Row {
    fn id(&self) -> &str {
        self.node().id()
    }

    fn name(&self) -> &str {
        self.node().name()
    }

    fn champion(&self) -> &Person {
        self.node().champion()
    }

    fn space(&self) -> &Space {
        self.node().space()
    }

    fn is_closed(&self) -> bool {
        self.node().is_closed()
    }

    fn progress(&self) -> f64 {
        self.node().progress()
    }

    fn last_check_in(&self) -> Option<DateTime<Utc>> {
        self.node().last_check_in()
    }

    fn timeframe_start(&self) -> Option<NaiveDate> {
        self.node().timeframe_start()
    }

    fn timeframe_end(&self) -> Option<NaiveDate> {
        self.node().timeframe_end()
    }

    fn child_summary_label(&self) -> Option<String> {
        self.node().child_summary_label()
    }

    fn compare_timeframe(&self, other: &dyn SortableNode) -> Ordering {
        self.node().compare_timeframe(other)
    }
}

impl Hierarchical for Row {
    fn id(&self) -> &str {
        match self {
            Row::Goal(row) => &row.goal.id,
            Row::Project(row) => &row.project.id,
        }
    }

    fn parent_id(&self) -> Option<&str> {
        match self {
            Row::Goal(row) => row.goal.parent_goal_id.as_deref(),
            Row::Project(row) => row.project.goal_id.as_deref(),
        }
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.node();
        write!(f, "{} [{:.0}%]", node.name(), node.progress())?;
        if node.is_closed() {
            write!(f, " (closed)")?;
        }
        if let Some(label) = node.child_summary_label() {
            write!(f, " - {}", label)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Milestone, MilestoneStatus, ProjectPhase};

    fn goal(id: &str) -> GoalRecord {
        GoalRecord {
            id: id.into(),
            parent_goal_id: None,
            name: id.into(),
            champion: Person::new("Ada Lovelace"),
            space: Space {
                id: "s".into(),
                name: "Ops".into(),
                is_company_space: false,
            },
            timeframe: None,
            progress: 0.0,
            closed: false,
            last_check_in: None,
        }
    }

    fn project(id: &str, milestones: usize) -> ProjectRecord {
        ProjectRecord {
            id: id.into(),
            goal_id: None,
            name: id.into(),
            champion: Person::new("Grace Hopper"),
            space: Space {
                id: "s".into(),
                name: "Ops".into(),
                is_company_space: false,
            },
            started_at: None,
            deadline: None,
            progress: 0.0,
            closed: false,
            last_check_in: None,
            phase: ProjectPhase::Execution,
            milestones: (0..milestones)
                .map(|i| Milestone {
                    id: format!("m{}", i),
                    title: format!("Milestone {}", i),
                    deadline_at: None,
                    completed_at: None,
                    status: MilestoneStatus::Pending,
                })
                .collect(),
        }
    }

    #[test]
    fn given_goal_without_children_then_no_label() {
        assert_eq!(GoalRow::new(goal("g")).child_summary_label(), None);
    }

    #[test]
    fn given_goal_with_children_then_label_counts_both_kinds() {
        let mut row = GoalRow::new(goal("g"));
        row.sub_goal_count = 1;
        row.project_count = 3;
        assert_eq!(
            row.child_summary_label().as_deref(),
            Some("1 sub-goal, 3 projects")
        );

        row.sub_goal_count = 0;
        row.project_count = 1;
        assert_eq!(row.child_summary_label().as_deref(), Some("1 project"));
    }

    #[test]
    fn given_project_with_milestones_then_label_counts_milestones() {
        assert_eq!(ProjectRow::new(project("p", 0)).child_summary_label(), None);
        assert_eq!(
            ProjectRow::new(project("p", 1)).child_summary_label().as_deref(),
            Some("1 milestone")
        );
        assert_eq!(
            Row::from(project("p", 2)).child_summary_label().as_deref(),
            Some("2 milestones")
        );
    }

    #[test]
    fn given_row_when_displayed_then_shows_progress_and_label() {
        let mut record = project("Launch", 2);
        record.progress = 42.4;
        record.closed = true;
        assert_eq!(
            Row::from(record).to_string(),
            "Launch [42%] (closed) - 2 milestones"
        );
    }
}
