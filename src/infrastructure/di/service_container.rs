//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::HierarchyService;
use crate::config::Settings;
use crate::infrastructure::traits::{Clock, FileSystem, RealFileSystem, SystemClock};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Date source for timelines
    pub clock: Arc<dyn Clock>,

    pub hierarchy: HierarchyService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem), Arc::new(SystemClock))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>, clock: Arc<dyn Clock>) -> Self {
        let settings = Arc::new(settings);
        let hierarchy = HierarchyService::new(Arc::clone(&fs), Arc::clone(&clock));

        Self {
            settings,
            fs,
            clock,
            hierarchy,
        }
    }
}
