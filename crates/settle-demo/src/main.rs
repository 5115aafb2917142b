//! settle demo - main entry point.
//!
//! Opens a project drawer against a flaky in-memory source, retries the
//! failed fetch and prints each state the drawer goes through.
//!
//! Usage: `settle-demo [config.toml]`

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use settle_core::TrackerConfig;
use settle_demo::{InMemorySource, Project, ProjectDrawer};

/// Load the tracker config from the first argument, if any.
fn load_config() -> Result<TrackerConfig, settle_core::ConfigError> {
    match std::env::args().nth(1) {
        Some(path) => {
            tracing::info!("Loading config from {}", path);
            TrackerConfig::load(path)
        }
        None => Ok(TrackerConfig::default()),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let source = InMemorySource::new()
        .with_project(Project::new(1, "Scrum Board", "Product", "ada"))
        .with_project(Project::new(2, "Release Train", "Platform", "grace"))
        .with_failures(1)
        .with_delay(Duration::from_millis(200));
    let mut drawer = ProjectDrawer::new(Arc::new(source), config);

    let pending = match drawer.open(1) {
        Ok(pending) => pending,
        Err(e) => {
            tracing::error!("Failed to open drawer: {}", e);
            return ExitCode::FAILURE;
        }
    };
    println!("{}", drawer.render());

    if let Err(e) = pending.await {
        tracing::warn!("Fetch failed: {}", e);
    }
    println!("{}", drawer.render());

    if drawer.tracker().is_error() {
        let mut rx = drawer.tracker().subscribe();
        drawer.retry();
        println!("{}", drawer.render());

        if rx.wait_for(|s| !s.is_loading()).await.is_err() {
            tracing::error!("Tracker closed while retrying");
            return ExitCode::FAILURE;
        }
        println!("{}", drawer.render());
    }

    drawer.close();
    println!("{}", drawer.render());

    ExitCode::SUCCESS
}
