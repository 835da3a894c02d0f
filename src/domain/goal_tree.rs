//! Goal tree: goals and their projects as one sorted, optionally pruned forest.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::arena::Forest;
use crate::domain::builder::HierarchyBuilder;
use crate::domain::entities::{GoalRecord, ProjectRecord};
use crate::domain::error::DomainResult;
use crate::domain::rows::Row;
use crate::domain::sort::{compare, SortDirection, SortKey, SortableNode};

/// How the goal tree is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TreeOptions {
    pub sort_key: SortKey,
    pub sort_direction: SortDirection,
    /// Keep closed goals and projects (and everything below them)
    pub show_completed: bool,
}

pub struct GoalTree;

impl GoalTree {
    /// Build the goal tree.
    ///
    /// Projects hang below the goal named by their `goal_id`. Only goals take
    /// children: a parent reference naming a project or nothing at all makes
    /// the row a root. Goal and project ids share one namespace.
    #[instrument(level = "debug", skip(goals, projects))]
    pub fn build(
        goals: Vec<GoalRecord>,
        projects: Vec<ProjectRecord>,
        options: &TreeOptions,
    ) -> DomainResult<Forest<Row>> {
        let goal_ids: HashSet<String> = goals.iter().map(|g| g.id.clone()).collect();
        let rows: Vec<Row> = goals
            .into_iter()
            .map(|mut goal| {
                detach_unless_goal(&mut goal.parent_goal_id, &goal_ids, &goal.id);
                Row::from(goal)
            })
            .chain(projects.into_iter().map(|mut project| {
                detach_unless_goal(&mut project.goal_id, &goal_ids, &project.id);
                Row::from(project)
            }))
            .collect();

        let mut forest = HierarchyBuilder::new().build(rows)?;

        if !options.show_completed {
            forest.retain(|row| !row.is_closed());
        }

        count_children(&mut forest);

        forest.try_sort_siblings_by(|a, b| {
            compare(a, b, options.sort_key, options.sort_direction)
        })?;
        debug!("goal tree: {} rows, depth {}", forest.len(), forest.depth());

        Ok(forest)
    }
}

fn detach_unless_goal(parent: &mut Option<String>, goal_ids: &HashSet<String>, id: &str) {
    if parent.as_ref().is_some_and(|p| !goal_ids.contains(p)) {
        debug!("{}: parent {:?} is not a goal, shown as root", id, parent);
        *parent = None;
    }
}

/// Refresh the sub-goal and project counts of every goal row.
fn count_children(forest: &mut Forest<Row>) {
    let counts: Vec<_> = forest
        .iter()
        .filter(|(_, node)| matches!(node.data, Row::Goal(_)))
        .map(|(idx, node)| {
            let children = node.children.iter().filter_map(|&c| forest.get_node(c));
            let (goals, projects) = children.fold((0, 0), |(g, p), child| match child.data {
                Row::Goal(_) => (g + 1, p),
                Row::Project(_) => (g, p + 1),
            });
            (idx, goals, projects)
        })
        .collect();

    for (idx, sub_goals, projects) in counts {
        if let Some(Row::Goal(row)) = forest.get_node_mut(idx).map(|node| &mut node.data) {
            row.sub_goal_count = sub_goals;
            row.project_count = projects;
        }
    }
}
