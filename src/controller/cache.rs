// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Last fetched copy of the authoritative project list.

use crate::models::project::{Project, ProjectId};

/// Bumped by every invalidation, so a fetch can tell whether the list it
/// brings back was asked for before or after the latest change.
pub type Generation = u64;

/// Cached server list plus a staleness flag that asks for a refetch.
#[derive(Debug, Clone, Default)]
pub struct ProjectCache {
    projects: Option<Vec<Project>>,
    stale: bool,
    generation: Generation,
}

impl ProjectCache {
    pub fn projects(&self) -> Option<&[Project]> {
        self.projects.as_deref()
    }

    /// Store a freshly fetched list.
    pub fn replace(&mut self, projects: Vec<Project>) {
        self.projects = Some(projects);
        self.stale = false;
    }

    pub fn invalidate(&mut self) {
        self.stale = true;
        self.generation += 1;
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// True when a refetch is wanted: never loaded, or invalidated.
    pub fn is_stale(&self) -> bool {
        self.stale || self.projects.is_none()
    }

    pub fn project_mut(&mut self, id: ProjectId) -> Option<&mut Project> {
        self.projects.as_mut()?.iter_mut().find(|p| p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staleness_lifecycle() {
        let mut cache = ProjectCache::default();
        assert!(cache.is_stale());

        cache.replace(vec![Project::new(1, "A", 2022, "Research", "a.png", 1)]);
        assert!(!cache.is_stale());
        assert!(cache.project_mut(1).is_some());
        assert!(cache.project_mut(2).is_none());

        let before = cache.generation();
        cache.invalidate();
        assert!(cache.is_stale());
        assert_eq!(cache.generation(), before + 1);
        assert_eq!(cache.projects().map(|p| p.len()), Some(1));
    }
}
