use std::{fs, path::Path, sync::Arc};

use askama::Template;
use axum::{
    Router,
    response::{Html, IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use strum::Display;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::cache::{NameCache, SnapshotError};
use crate::ddragon::DataDragon;

mod answers;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Display)]
pub enum Status {
    #[default]
    Empty,
    Loaded,
    Refreshed,
}

/// The names currently served, and where they came from.
#[derive(Debug, Default)]
pub struct Library {
    pub names: NameCache,
    pub status: Status,
    pub updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub ddragon: Arc<DataDragon>,
    pub library: Arc<RwLock<Library>>,
}

impl AppState {
    pub fn new(ddragon: DataDragon) -> AppState {
        AppState {
            ddragon: Arc::new(ddragon),
            library: Arc::default(),
        }
    }

    /// Loads the snapshot when there is one, otherwise refreshes from Data
    /// Dragon and saves a new snapshot.
    ///
    /// A failed refresh is logged and leaves the library empty.
    pub async fn bootstrap(ddragon: DataDragon) -> AppState {
        let state = AppState::new(ddragon);
        let path = state.snapshot_path();
        let mut names = NameCache::new();
        match names.load(path) {
            Ok(()) => {
                info!(path = %path.display(), "loaded the name cache snapshot");
                *state.library.write().await = Library {
                    names,
                    status: Status::Loaded,
                    updated: modified(path),
                };
            }
            Err(err) => {
                info!(path = %path.display(), "no usable snapshot ({err}), refreshing");
                if let Err(err) = state.refresh().await {
                    warn!("failed to build the name cache: {err}");
                }
            }
        }
        state
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.ddragon.config().snapshot_path
    }

    /// Saves freshly fetched names as the new snapshot, then swaps them in.
    ///
    /// If either step fails the library keeps serving the names it had.
    pub async fn refresh(&self) -> Result<(), AppError> {
        let names = self.ddragon.refresh().await.map_err(AppError::Refresh)?;
        let path = self.snapshot_path().to_path_buf();
        let names = tokio::task::spawn_blocking(move || names.save(&path).map(|()| names)).await??;
        info!(path = %self.snapshot_path().display(), "saved the name cache snapshot");

        *self.library.write().await = Library {
            names,
            status: Status::Refreshed,
            updated: Some(Utc::now()),
        };
        Ok(())
    }
}

fn modified(path: &Path) -> Option<DateTime<Utc>> {
    let modified = fs::metadata(path).and_then(|meta| meta.modified()).ok()?;
    Some(modified.into())
}

pub fn router(state: AppState) -> Router {
    answers::router(state)
}

#[derive(Debug, displaydoc::Display, thiserror::Error)]
pub enum AppError {
    /// could not render template
    Render(#[from] askama::Error),
    /// could not refresh the names from Data Dragon
    Refresh(#[source] anyhow::Error),
    /// could not save the names: {0}
    Snapshot(#[from] SnapshotError),
    /// a background task failed: {0}
    Task(#[from] tokio::task::JoinError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        #[derive(Debug, Template)]
        #[template(path = "error.html")]
        struct Tmpl {
            message: String,
        }

        let status = match &self {
            AppError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Refresh(_) => StatusCode::BAD_GATEWAY,
            AppError::Snapshot(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        warn!("request failed: {self}");
        let tmpl = Tmpl {
            message: self.to_string(),
        };
        if let Ok(body) = tmpl.render() {
            (status, Html(body)).into_response()
        } else {
            (status, "Something went wrong").into_response()
        }
    }
}
