//! Tests for HierarchyService against data files on disk

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use tempfile::TempDir;

use goaltree::application::ApplicationError;
use goaltree::config::Settings;
use goaltree::domain::{DomainError, SortDirection, SortKey, SortableNode, TreeOptions};
use goaltree::infrastructure::traits::{FixedClock, RealFileSystem};
use goaltree::infrastructure::ServiceContainer;
use goaltree::util::testing;

const DATA: &str = r#"
[[goals]]
id = "g1"
name = "Grow revenue"
progress = 40.0
champion = { full_name = "Ada Lovelace" }
space = { id = "sales", name = "Sales" }
timeframe = { start = "2026-07-01", end = "2026-12-31" }
last_check_in = "2026-10-01T09:00:00Z"

[[goals]]
id = "g2"
parent_goal_id = "g1"
name = "Enter EMEA"
closed = true
champion = { full_name = "Grace Hopper" }
space = { id = "company", name = "Company", is_company_space = true }

[[goals]]
id = "g3"
parent_goal_id = "g1"
name = "Upsell"
champion = { full_name = "Alan Turing" }
space = { id = "sales", name = "Sales" }

[[projects]]
id = "p1"
goal_id = "g1"
name = "CRM migration"
started_at = "2026-10-05"
deadline = "2026-10-30"
phase = "execution"
champion = { full_name = "Barbara Liskov" }
space = { id = "sales", name = "Sales" }

[[projects.milestones]]
id = "m1"
title = "Export data"
deadline_at = "2026-10-12"
status = "done"

[[projects.milestones]]
id = "m2"
title = "Switch over"
deadline_at = "2026-10-26"
"#;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
}

fn container() -> ServiceContainer {
    ServiceContainer::with_deps(
        Settings::default(),
        Arc::new(RealFileSystem),
        Arc::new(FixedClock(today())),
    )
}

fn write_data(content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("goals.toml");
    fs::write(&path, content).unwrap();
    (dir, path)
}

#[test]
fn given_data_file_when_loading_then_goals_and_projects_parsed() {
    testing::init_test_setup();
    // Arrange
    let (_dir, path) = write_data(DATA);

    // Act
    let dataset = container().hierarchy.load(&path).unwrap();

    // Assert
    assert_eq!(dataset.goals.len(), 3);
    assert_eq!(dataset.projects.len(), 1);
    assert!(dataset.goals[1].space.is_company_space);
    assert_eq!(dataset.projects[0].milestones.len(), 2);
    assert!(dataset.goals[0].last_check_in.is_some());
}

#[test]
fn given_data_file_when_building_goal_tree_then_closed_rows_hidden() {
    // Arrange
    let (_dir, path) = write_data(DATA);

    // Act
    let forest = container()
        .hierarchy
        .goal_tree(&path, &TreeOptions::default())
        .unwrap();

    // Assert
    let names: Vec<&str> = forest.iter().map(|(_, n)| n.data.name()).collect();
    assert_eq!(names, vec!["Grow revenue", "CRM migration", "Upsell"]);
    assert_eq!(
        forest.root_data()[0].child_summary_label().as_deref(),
        Some("1 sub-goal, 1 project")
    );
}

#[test]
fn given_space_key_when_building_goal_tree_then_company_space_first() {
    // Arrange
    let (_dir, path) = write_data(DATA);
    let options = TreeOptions {
        sort_key: SortKey::Space,
        sort_direction: SortDirection::Ascending,
        show_completed: true,
    };

    // Act
    let forest = container().hierarchy.goal_tree(&path, &options).unwrap();

    // Assert
    let children: Vec<&str> = forest
        .children_data(forest.roots()[0])
        .into_iter()
        .map(|row| row.name())
        .collect();
    assert_eq!(children[0], "Enter EMEA");
}

#[test]
fn given_last_check_in_key_and_rows_without_check_in_then_domain_error() {
    let (_dir, path) = write_data(DATA);
    let options = TreeOptions {
        sort_key: SortKey::LastCheckIn,
        ..TreeOptions::default()
    };

    let result = container().hierarchy.goal_tree(&path, &options);

    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::MissingRequiredField { .. }))
    ));
}

#[test]
fn given_project_when_building_timeline_then_clock_supplies_today() {
    // Arrange
    let (_dir, path) = write_data(DATA);

    // Act
    let timeline = container().hierarchy.timeline(&path, "p1", None).unwrap();

    // Assert
    assert_eq!(timeline.today, today());
    assert_eq!(timeline.next.as_ref().map(|m| m.id.as_str()), Some("m2"));
    assert_eq!(timeline.milestones.len(), 2);
    assert!(timeline.phase.is_displayed_on_timeline());
    assert_eq!(timeline.milestones[1].1.to_string(), "due in 9 days");
}

#[test]
fn given_explicit_today_when_building_timeline_then_it_wins_over_clock() {
    let (_dir, path) = write_data(DATA);
    let explicit = NaiveDate::from_ymd_opt(2026, 10, 28).unwrap();

    let timeline = container()
        .hierarchy
        .timeline(&path, "p1", Some(explicit))
        .unwrap();

    assert_eq!(timeline.today, explicit);
    assert!(timeline.milestones[1].1.is_overdue());
}

#[test]
fn given_unknown_project_when_building_timeline_then_project_not_found() {
    let (_dir, path) = write_data(DATA);

    let result = container().hierarchy.timeline(&path, "nope", None);

    assert!(matches!(result, Err(ApplicationError::ProjectNotFound(id)) if id == "nope"));
}

#[test]
fn given_missing_file_when_loading_then_data_file_not_found() {
    let dir = TempDir::new().unwrap();
    let absent = dir.path().join("absent.toml");

    let result = container().hierarchy.load(&absent);

    assert!(matches!(result, Err(ApplicationError::DataFileNotFound(p)) if p == absent));
}

#[test]
fn given_directory_when_loading_then_operation_failed() {
    let dir = TempDir::new().unwrap();

    let result = container().hierarchy.load(dir.path());

    let err = result.unwrap_err();
    assert!(err.to_string().contains("not a regular file"));
}

#[test]
fn given_malformed_file_when_loading_then_parse_error_names_file() {
    // Arrange
    let (_dir, path) = write_data("[[goals]]\nid = \"g1\"\n");

    // Act
    let result = container().hierarchy.load(&path);

    // Assert
    match result {
        Err(ApplicationError::Parse { path: p, message }) => {
            assert_eq!(p, path);
            assert!(message.contains("missing field"), "message: {}", message);
        }
        other => panic!("expected parse error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn given_empty_file_when_building_goal_tree_then_empty_forest() {
    let (_dir, path) = write_data("");

    let forest = container()
        .hierarchy
        .goal_tree(&path, &TreeOptions::default())
        .unwrap();

    assert!(forest.is_empty());
}
