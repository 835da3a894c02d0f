//! Goal hierarchy service
//!
//! Loads goal/project data files and builds goal trees and project timelines from them.

use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{Dataset, Forest, GoalTree, ProjectTimeline, Row, TreeOptions};
use crate::infrastructure::traits::{Clock, FileSystem};

/// Service for building goal trees from data files.
pub struct HierarchyService {
    fs: Arc<dyn FileSystem>,
    clock: Arc<dyn Clock>,
}

impl HierarchyService {
    pub fn new(fs: Arc<dyn FileSystem>, clock: Arc<dyn Clock>) -> Self {
        Self { fs, clock }
    }

    /// Read and parse a TOML data file with `[[goals]]` and `[[projects]]` tables.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<Dataset> {
        if !self.fs.exists(path) {
            return Err(ApplicationError::DataFileNotFound(path.to_path_buf()));
        }
        if !self.fs.is_file(path) {
            return Err(ApplicationError::OperationFailed {
                context: format!("data file is not a regular file: {}", path.display()),
                source: Box::new(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "not a file",
                )),
            });
        }

        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read data file", path)?;

        let dataset: Dataset = toml::from_str(&content).map_err(|e| ApplicationError::Parse {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })?;
        debug!(
            "load: {} goals, {} projects",
            dataset.goals.len(),
            dataset.projects.len()
        );

        Ok(dataset)
    }

    /// Build the sorted goal tree of a data file.
    pub fn goal_tree(&self, path: &Path, options: &TreeOptions) -> ApplicationResult<Forest<Row>> {
        let dataset = self.load(path)?;
        let forest = GoalTree::build(dataset.goals, dataset.projects, options)?;
        Ok(forest)
    }

    /// Timeline of one project; `today` defaults to the service clock.
    pub fn timeline(
        &self,
        path: &Path,
        project_id: &str,
        today: Option<NaiveDate>,
    ) -> ApplicationResult<ProjectTimeline> {
        let dataset = self.load(path)?;
        let project = dataset
            .projects
            .iter()
            .find(|p| p.id == project_id)
            .ok_or_else(|| ApplicationError::ProjectNotFound(project_id.to_string()))?;

        let today = today.unwrap_or_else(|| self.clock.today());
        Ok(ProjectTimeline::build(project, today))
    }
}
