//! Where the drawer gets project details from.
//!
//! The `ProjectSource` trait returns futures so the caller decides how to
//! drive them, which keeps it swappable for tests.

use futures::future::BoxFuture;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub type ProjectId = u64;

/// Project details shown in the drawer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub organization: String,
    pub owner: String,
}

impl Project {
    pub fn new(
        id: ProjectId,
        name: impl Into<String>,
        organization: impl Into<String>,
        owner: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            organization: organization.into(),
            owner: owner.into(),
        }
    }
}

/// Fetch errors - surfaced in the drawer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// No project with this id.
    #[error("Project {0} not found")]
    NotFound(ProjectId),

    /// The source could not answer right now.
    #[error("Source unavailable: {0}")]
    Unavailable(String),
}

/// Trait for fetching project details.
pub trait ProjectSource: Send + Sync {
    fn project(&self, id: ProjectId) -> BoxFuture<'static, Result<Project, SourceError>>;
}

// =============================================================================
// In-Memory Source
// =============================================================================

/// Source backed by a map, with optional latency and injected failures.
#[derive(Default)]
pub struct InMemorySource {
    projects: Arc<Mutex<HashMap<ProjectId, Project>>>,
    failures_left: Arc<Mutex<usize>>,
    delay: Duration,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a project.
    pub fn with_project(self, project: Project) -> Self {
        self.projects.lock().insert(project.id, project);
        self
    }

    /// Fail the next `count` fetches with `SourceError::Unavailable`.
    pub fn with_failures(self, count: usize) -> Self {
        *self.failures_left.lock() = count;
        self
    }

    /// Wait this long before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl ProjectSource for InMemorySource {
    fn project(&self, id: ProjectId) -> BoxFuture<'static, Result<Project, SourceError>> {
        let projects = self.projects.clone();
        let failures_left = self.failures_left.clone();
        let delay = self.delay;

        Box::pin(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            {
                let mut failures_left = failures_left.lock();
                if *failures_left > 0 {
                    *failures_left -= 1;
                    return Err(SourceError::Unavailable("connection reset".to_string()));
                }
            }

            projects
                .lock()
                .get(&id)
                .cloned()
                .ok_or(SourceError::NotFound(id))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> InMemorySource {
        InMemorySource::new().with_project(Project::new(1, "Board", "Acme", "ada"))
    }

    #[tokio::test]
    async fn test_fetch_known_project() {
        let project = source().project(1).await.unwrap();
        assert_eq!(project.name, "Board");
    }

    #[tokio::test]
    async fn test_fetch_unknown_project() {
        let err = source().project(9).await.unwrap_err();
        assert_eq!(err, SourceError::NotFound(9));
    }

    #[tokio::test]
    async fn test_injected_failures_run_out() {
        let source = source().with_failures(1);

        assert!(matches!(
            source.project(1).await,
            Err(SourceError::Unavailable(_))
        ));
        assert!(source.project(1).await.is_ok());
    }

    #[tokio::test]
    async fn test_with_delay() {
        let source = source().with_delay(Duration::from_millis(10));

        let start = std::time::Instant::now();
        source.project(1).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(10));
    }
}
