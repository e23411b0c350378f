// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! In-memory project store backing the REST API.
//!
//! Nothing is persisted; the store lives as long as the server process.

use crate::models::project::{sample_projects, Project, ProjectId, ProjectPatch};
use std::collections::HashMap;
use std::sync::Mutex;

/// Read and update access to the portfolio.
pub trait ProjectStore: Send + Sync {
    /// All projects, newest year first, then ascending `order`.
    fn list(&self) -> Vec<Project>;

    fn get(&self, id: ProjectId) -> Option<Project>;

    /// Apply `patch` and return the stored record, or `None` for an unknown id.
    fn update(&self, id: ProjectId, patch: &ProjectPatch) -> Option<Project>;
}

/// Mutex-guarded map of projects keyed by id.
pub struct MemoryStore {
    projects: Mutex<HashMap<ProjectId, Project>>,
}

impl MemoryStore {
    /// Store preloaded with the built-in sample portfolio.
    pub fn with_seed() -> Self {
        Self::from_projects(sample_projects())
    }

    pub fn from_projects(projects: Vec<Project>) -> Self {
        let projects = projects.into_iter().map(|p| (p.id, p)).collect();
        Self {
            projects: Mutex::new(projects),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<ProjectId, Project>> {
        // A panic while holding the lock cannot leave a record half-written,
        // so a poisoned map is still consistent.
        self.projects.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ProjectStore for MemoryStore {
    fn list(&self) -> Vec<Project> {
        let mut projects: Vec<Project> = self.lock().values().cloned().collect();
        projects.sort_by(|a, b| b.year.cmp(&a.year).then(a.order.cmp(&b.order)).then(a.id.cmp(&b.id)));
        projects
    }

    fn get(&self, id: ProjectId) -> Option<Project> {
        self.lock().get(&id).cloned()
    }

    fn update(&self, id: ProjectId, patch: &ProjectPatch) -> Option<Project> {
        let mut projects = self.lock();
        let project = projects.get_mut(&id)?;

        let normalized = ProjectPatch {
            title: patch.title.as_ref().map(|t| t.trim().to_string()),
            year: patch.year,
        };
        normalized.apply_to(project);
        log::info!("Updated project {} ({:?})", id, normalized);
        Some(project.clone())
    }
}
