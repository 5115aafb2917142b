//! Project details drawer.
//!
//! The drawer is open or closed; while open it shows whatever the tracker
//! holds for the selected project. Closing does not reset the tracker, so
//! reopening the same project shows the last result while it refetches.
//!
//! Runs are not sequenced, so a fetch for a project opened earlier can settle
//! after the current one and overwrite it. The drawer never shows a project
//! other than the open one: such a result renders as Loading, and `retry`
//! refetches the open project.

use std::fmt;
use std::sync::Arc;

use settle_core::{Status, TrackerConfig, TrackerError};
use settle_tracker::{AsyncStateTracker, Deferred, RunConfig, RunFuture};

use crate::source::{Project, ProjectId, ProjectSource, SourceError};

/// What the drawer currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawerView {
    Closed,
    Loading,
    Failed(String),
    Loaded(Project),
}

impl fmt::Display for DrawerView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawerView::Closed => write!(f, "[drawer closed]"),
            DrawerView::Loading => write!(f, "[drawer] Loading project..."),
            DrawerView::Failed(error) => write!(f, "[drawer] Error loading project: {}", error),
            DrawerView::Loaded(project) => write!(
                f,
                "[drawer] #{} {} ({}, owner: {})",
                project.id, project.name, project.organization, project.owner
            ),
        }
    }
}

/// Drawer that loads project details through an `AsyncStateTracker`.
pub struct ProjectDrawer {
    source: Arc<dyn ProjectSource>,
    tracker: AsyncStateTracker<Project, SourceError>,
    open: Option<ProjectId>,
}

impl ProjectDrawer {
    pub fn new(source: Arc<dyn ProjectSource>, config: TrackerConfig) -> Self {
        Self {
            source,
            tracker: AsyncStateTracker::with_config(config),
            open: None,
        }
    }

    /// Open the drawer on `id` and start fetching it.
    ///
    /// `retry` refetches the same project.
    pub fn open(
        &mut self,
        id: ProjectId,
    ) -> Result<RunFuture<Project, SourceError>, TrackerError> {
        self.open = Some(id);
        tracing::info!("Opening project drawer for project {}", id);

        let source = self.source.clone();
        let fetch = move || Deferred::new(source.project(id));
        self.tracker.run(fetch(), Some(RunConfig::retry(fetch)))
    }

    pub fn close(&mut self) {
        if self.open.take().is_some() {
            tracing::info!("Closed project drawer");
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// The project the drawer is open on.
    pub fn project_id(&self) -> Option<ProjectId> {
        self.open
    }

    /// Refetch the open project.
    pub fn retry(&self) {
        self.tracker.retry();
    }

    pub fn tracker(&self) -> &AsyncStateTracker<Project, SourceError> {
        &self.tracker
    }

    pub fn view(&self) -> DrawerView {
        let Some(open) = self.open else {
            return DrawerView::Closed;
        };

        self.tracker.read(|state| match state.status() {
            Status::Idle | Status::Loading => DrawerView::Loading,
            Status::Error => DrawerView::Failed(
                state
                    .error()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
            ),
            Status::Success => match state.data() {
                Some(project) if project.id == open => DrawerView::Loaded(project.clone()),
                _ => DrawerView::Loading,
            },
        })
    }

    /// Render the current view as a single line.
    pub fn render(&self) -> String {
        self.view().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::InMemorySource;
    use settle_tracker::Settled;
    use std::time::Duration;

    fn board() -> Project {
        Project::new(1, "Board", "Acme", "ada")
    }

    fn drawer(source: InMemorySource) -> ProjectDrawer {
        ProjectDrawer::new(
            Arc::new(source.with_project(board())),
            TrackerConfig::default(),
        )
    }

    #[test]
    fn test_starts_closed() {
        let drawer = drawer(InMemorySource::new());
        assert!(!drawer.is_open());
        assert_eq!(drawer.view(), DrawerView::Closed);
        assert!(drawer.tracker().is_idle());
    }

    #[tokio::test]
    async fn test_open_loads_project() {
        let mut drawer = drawer(InMemorySource::new());

        let pending = drawer.open(1).unwrap();
        assert!(drawer.is_open());
        assert_eq!(drawer.view(), DrawerView::Loading);

        let settled = pending.await.unwrap();
        assert_eq!(settled, Settled::Data(board()));
        assert_eq!(drawer.view(), DrawerView::Loaded(board()));
        assert!(drawer.render().contains("Board"));
    }

    #[tokio::test]
    async fn test_failure_shown_then_retried() {
        let mut drawer = drawer(InMemorySource::new().with_failures(1));

        drawer.open(1).unwrap().await.unwrap();
        assert!(matches!(drawer.view(), DrawerView::Failed(_)));
        assert!(drawer.render().contains("Source unavailable"));

        let mut rx = drawer.tracker().subscribe();
        drawer.retry();
        assert_eq!(drawer.view(), DrawerView::Loading);

        tokio::time::timeout(Duration::from_secs(1), rx.wait_for(|s| s.is_success()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(drawer.view(), DrawerView::Loaded(board()));
    }

    #[tokio::test]
    async fn test_throwing_config_surfaces_error() {
        let mut drawer = ProjectDrawer::new(
            Arc::new(InMemorySource::new()),
            TrackerConfig::throwing(),
        );

        let result = drawer.open(42).unwrap().await;

        assert_eq!(result, Err(SourceError::NotFound(42)));
        assert_eq!(
            drawer.view(),
            DrawerView::Failed("Project 42 not found".to_string())
        );
    }

    #[tokio::test]
    async fn test_late_result_for_previous_project_not_shown() {
        let release = Project::new(2, "Release Train", "Platform", "grace");
        let mut drawer = drawer(InMemorySource::new().with_project(release.clone()));

        drawer.open(2).unwrap().await.unwrap();
        assert_eq!(drawer.view(), DrawerView::Loaded(release.clone()));

        // A fetch for project 1 settling after project 2 was opened
        drawer.tracker().set_data(board());
        assert_eq!(drawer.project_id(), Some(2));
        assert_eq!(drawer.view(), DrawerView::Loading);

        let mut rx = drawer.tracker().subscribe();
        drawer.retry();
        tokio::time::timeout(
            Duration::from_secs(1),
            rx.wait_for(|s| s.data().map(|p| p.id) == Some(2)),
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(drawer.view(), DrawerView::Loaded(release));
    }

    #[tokio::test]
    async fn test_close_keeps_last_result() {
        let mut drawer = drawer(InMemorySource::new());
        drawer.open(1).unwrap().await.unwrap();

        drawer.close();
        assert_eq!(drawer.view(), DrawerView::Closed);
        assert_eq!(drawer.project_id(), None);
        assert_eq!(drawer.tracker().data(), Some(board()));
    }
}
