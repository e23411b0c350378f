// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Background execution of API calls and image downloads.
//!
//! Each job runs on its own thread so a slow request never holds up
//! another one. Results come back over a channel that the UI drains
//! once per frame.

use crate::controller::{Ticket, UpdateRequest};
use crate::error::ApiError;
use crate::io::client::ProjectApi;
use crate::io::media::{self, LoadedImage};
use crate::models::project::{Project, ProjectId};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

/// Work to run off the UI thread.
#[derive(Debug, Clone)]
pub enum Job {
    FetchProjects,
    FetchProject(ProjectId),
    Update(UpdateRequest),
    LoadImage(String),
}

/// Outcome of a [`Job`].
pub enum JobResult {
    Projects(Result<Vec<Project>, ApiError>),
    Project(ProjectId, Result<Project, ApiError>),
    Updated(Ticket, Result<Project, ApiError>),
    Image(String, Result<LoadedImage, String>),
}

pub struct SyncWorker {
    api: Arc<dyn ProjectApi>,
    sender: Sender<JobResult>,
    receiver: Receiver<JobResult>,
    repaint: Option<egui::Context>,
    in_flight: usize,
}

impl SyncWorker {
    pub fn new(api: Arc<dyn ProjectApi>) -> Self {
        let (sender, receiver) = channel();
        Self {
            api,
            sender,
            receiver,
            repaint: None,
            in_flight: 0,
        }
    }

    /// Wake the UI whenever a result arrives.
    pub fn with_repaint(mut self, ctx: egui::Context) -> Self {
        self.repaint = Some(ctx);
        self
    }

    pub fn dispatch(&mut self, job: Job) {
        log::debug!("Dispatching {:?}", job);
        let api = Arc::clone(&self.api);
        let sender = self.sender.clone();
        let repaint = self.repaint.clone();
        self.in_flight += 1;

        std::thread::spawn(move || {
            let result = run_job(api.as_ref(), job);
            // The receiver only goes away when the app is shutting down.
            let _ = sender.send(result);
            if let Some(ctx) = repaint {
                ctx.request_repaint();
            }
        });
    }

    /// Collect every result that has arrived so far.
    pub fn poll(&mut self) -> Vec<JobResult> {
        let results: Vec<JobResult> = self.receiver.try_iter().collect();
        self.in_flight = self.in_flight.saturating_sub(results.len());
        results
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    #[cfg(test)]
    fn wait(&mut self) -> JobResult {
        let result = self
            .receiver
            .recv_timeout(std::time::Duration::from_secs(5))
            .expect("job result");
        self.in_flight -= 1;
        result
    }
}

fn run_job(api: &dyn ProjectApi, job: Job) -> JobResult {
    match job {
        Job::FetchProjects => JobResult::Projects(api.list_projects()),
        Job::FetchProject(id) => JobResult::Project(id, api.get_project(id)),
        Job::Update(request) => {
            let result = api.update_project(request.project_id, &request.patch);
            JobResult::Updated(request.ticket, result)
        }
        Job::LoadImage(url) => {
            let result = media::load_image(&url).map_err(|e| format!("Failed to load image: {}", e));
            JobResult::Image(url, result)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::project::ProjectPatch;
    use crate::store::{MemoryStore, ProjectStore};

    /// Serves straight from an in-memory store.
    struct StoreApi(MemoryStore);

    impl ProjectApi for StoreApi {
        fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
            Ok(self.0.list())
        }

        fn get_project(&self, id: ProjectId) -> Result<Project, ApiError> {
            self.0.get(id).ok_or_else(ApiError::project_not_found)
        }

        fn update_project(&self, id: ProjectId, patch: &ProjectPatch) -> Result<Project, ApiError> {
            self.0.update(id, patch).ok_or_else(ApiError::project_not_found)
        }
    }

    fn worker() -> SyncWorker {
        SyncWorker::new(Arc::new(StoreApi(MemoryStore::with_seed())))
    }

    #[test]
    fn test_fetch_projects() {
        let mut worker = worker();
        worker.dispatch(Job::FetchProjects);
        assert!(worker.is_busy());
        match worker.wait() {
            JobResult::Projects(Ok(projects)) => assert_eq!(projects.len(), 6),
            _ => panic!("unexpected result"),
        }
        assert!(!worker.is_busy());
    }

    #[test]
    fn test_update_reports_ticket() {
        let mut worker = worker();
        worker.dispatch(Job::Update(UpdateRequest {
            ticket: 7,
            project_id: 2,
            patch: ProjectPatch::year(2030),
        }));
        match worker.wait() {
            JobResult::Updated(ticket, Ok(project)) => {
                assert_eq!(ticket, 7);
                assert_eq!(project.year, 2030);
            }
            _ => panic!("unexpected result"),
        }
    }

    #[test]
    fn test_missing_project_is_not_found() {
        let mut worker = worker();
        worker.dispatch(Job::FetchProject(99));
        match worker.wait() {
            JobResult::Project(99, Err(err)) => assert!(err.is_not_found()),
            _ => panic!("unexpected result"),
        }
    }

    #[test]
    fn test_bad_image_source_reports_error() {
        let mut worker = worker();
        worker.dispatch(Job::LoadImage("/definitely/not/here.png".to_string()));
        match worker.wait() {
            JobResult::Image(url, Err(message)) => {
                assert_eq!(url, "/definitely/not/here.png");
                assert!(message.starts_with("Failed to load image"));
            }
            _ => panic!("unexpected result"),
        }
    }
}
