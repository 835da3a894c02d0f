//! Record builders shared by the integration tests.
#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use goaltree::domain::{
    GoalRecord, Milestone, MilestoneStatus, Person, ProjectPhase, ProjectRecord, Space, Timeframe,
};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 9, 0, 0).unwrap()
}

pub fn space(name: &str) -> Space {
    Space {
        id: name.to_lowercase(),
        name: name.to_string(),
        is_company_space: false,
    }
}

pub fn company_space() -> Space {
    Space {
        id: "company".to_string(),
        name: "Company".to_string(),
        is_company_space: true,
    }
}

pub fn goal(id: &str, parent: Option<&str>) -> GoalRecord {
    GoalRecord {
        id: id.to_string(),
        parent_goal_id: parent.map(str::to_string),
        name: id.to_string(),
        champion: Person::new("Ada Lovelace"),
        space: space("Product"),
        timeframe: None,
        progress: 0.0,
        closed: false,
        last_check_in: None,
    }
}

pub fn named_goal(id: &str, name: &str) -> GoalRecord {
    GoalRecord {
        name: name.to_string(),
        ..goal(id, None)
    }
}

pub fn goal_with_timeframe(id: &str, start: NaiveDate, end: NaiveDate) -> GoalRecord {
    GoalRecord {
        timeframe: Some(Timeframe { start, end }),
        ..goal(id, None)
    }
}

pub fn project(id: &str, goal_id: Option<&str>) -> ProjectRecord {
    ProjectRecord {
        id: id.to_string(),
        goal_id: goal_id.map(str::to_string),
        name: id.to_string(),
        champion: Person::new("Grace Hopper"),
        space: space("Product"),
        started_at: None,
        deadline: None,
        progress: 0.0,
        closed: false,
        last_check_in: None,
        phase: ProjectPhase::Execution,
        milestones: Vec::new(),
    }
}

pub fn milestone(id: &str, deadline: Option<NaiveDate>, status: MilestoneStatus) -> Milestone {
    Milestone {
        id: id.to_string(),
        title: format!("Milestone {}", id),
        deadline_at: deadline,
        completed_at: None,
        status,
    }
}
