// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Project list controller.
//!
//! Owns the editable copy of the project list, which project is active
//! (hovered or clicked), the single inline editor, and the optimistic
//! update protocol: snapshot, speculative apply, then reconcile with the
//! server record or roll the edited field back to the snapshot.
//!
//! The controller never talks to the network. [`ProjectListController::commit_edit`]
//! hands back an [`UpdateRequest`] for the caller to send, and the caller
//! reports the outcome through [`ProjectListController::resolve_update`].

pub mod cache;
mod pending;

pub use cache::{Generation, ProjectCache};
pub use pending::{Ticket, UpdateRequest};

use crate::error::ApiError;
use crate::models::project::{EditableField, Project, ProjectId, ProjectPatch};
use crate::util::geometry;
use pending::{PendingUpdates, Snapshot};
use std::cmp::Reverse;
use std::collections::BTreeMap;

/// The inline editor, if one is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditingField {
    pub project_id: ProjectId,
    pub field: EditableField,
    pub pending_value: String,
}

/// Projects sharing a year, in display order.
#[derive(Debug, PartialEq, Eq)]
pub struct YearGroup<'a> {
    pub year: i32,
    pub projects: Vec<&'a Project>,
}

/// State behind the project list and its preview panel.
pub struct ProjectListController {
    /// Editable working copy, written optimistically.
    projects: Vec<Project>,
    cache: ProjectCache,
    pointer_capable: bool,
    hovered: Option<ProjectId>,
    selected: Option<ProjectId>,
    cursor_progress: f32,
    editing: Option<EditingField>,
    pending: PendingUpdates,
}

impl Default for ProjectListController {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ProjectListController {
    pub fn new(pointer_capable: bool) -> Self {
        Self {
            projects: Vec::new(),
            cache: ProjectCache::default(),
            pointer_capable,
            hovered: None,
            selected: None,
            cursor_progress: 0.5,
            editing: None,
            pending: PendingUpdates::default(),
        }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn project(&self, id: ProjectId) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn cache(&self) -> &ProjectCache {
        &self.cache
    }

    /// Replace the working copy and cache with a freshly fetched list.
    ///
    /// No merging: whatever the server sent wins, except that updates
    /// still in flight are laid back over it. Editor and selection state
    /// pointing at projects that disappeared is dropped.
    pub fn refresh(&mut self, projects: Vec<Project>) {
        log::debug!("Refreshing project list ({} projects)", projects.len());
        self.cache.replace(projects.clone());
        self.projects = projects;
        self.reapply_pending();

        if let Some(ref edit) = self.editing {
            if self.project(edit.project_id).is_none() {
                log::info!("Project {} vanished, discarding open editor", edit.project_id);
                self.editing = None;
            }
        }
        if self.hovered.is_some_and(|id| self.project(id).is_none()) {
            self.hovered = None;
        }
        if self.selected.is_some_and(|id| self.project(id).is_none()) {
            self.selected = None;
        }
    }

    /// Note the start of a list fetch. Hand the returned generation back
    /// to [`Self::fetched`] with the list.
    pub fn begin_fetch(&self) -> Generation {
        self.cache.generation()
    }

    /// Apply a list fetched at `generation`.
    ///
    /// A list requested before the latest invalidation may predate a
    /// confirmed update. It is dropped and the cache stays stale so the
    /// caller fetches again; it only fills a cache that was never loaded.
    /// Returns whether the list was applied.
    pub fn fetched(&mut self, generation: Generation, projects: Vec<Project>) -> bool {
        if generation == self.cache.generation() {
            self.refresh(projects);
            return true;
        }
        if self.cache.projects().is_some() {
            log::debug!("Dropping list from fetch {} (now at {})", generation, self.cache.generation());
            return false;
        }
        self.refresh(projects);
        self.cache.invalidate();
        true
    }

    /// Projects partitioned by year, newest year first, ascending `order`
    /// within a year.
    pub fn grouped(&self) -> Vec<YearGroup<'_>> {
        let mut by_year: BTreeMap<Reverse<i32>, Vec<&Project>> = BTreeMap::new();
        for project in &self.projects {
            by_year.entry(Reverse(project.year)).or_default().push(project);
        }
        by_year
            .into_iter()
            .map(|(Reverse(year), mut projects)| {
                projects.sort_by_key(|p| p.order);
                YearGroup { year, projects }
            })
            .collect()
    }

    // ---- selection ----

    pub fn pointer_capable(&self) -> bool {
        self.pointer_capable
    }

    /// Switch between hover-driven and click-only layouts.
    pub fn set_pointer_capable(&mut self, capable: bool) {
        if capable != self.pointer_capable {
            log::debug!("Pointer capability changed: {}", capable);
            self.pointer_capable = capable;
        }
        if !capable {
            self.hovered = None;
        }
    }

    /// Pointer entered a row.
    pub fn activate_pointer(&mut self, id: ProjectId) {
        if !self.pointer_capable || self.project(id).is_none() {
            return;
        }
        self.hovered = Some(id);
    }

    pub fn hovered(&self) -> Option<ProjectId> {
        self.hovered
    }

    /// Pointer left a row.
    pub fn deactivate_pointer(&mut self) {
        if self.pointer_capable {
            self.hovered = None;
        }
    }

    /// Record where the pointer sits across the hovered row, as a fraction
    /// of its width. Returns `None` on touch layouts.
    pub fn track_cursor(&mut self, pointer_x: f32, row_left: f32, row_width: f32) -> Option<f32> {
        if !self.pointer_capable {
            return None;
        }
        let progress = geometry::horizontal_progress(pointer_x, row_left, row_width);
        self.cursor_progress = progress;
        Some(progress)
    }

    pub fn cursor_progress(&self) -> f32 {
        self.cursor_progress
    }

    /// Select a project by click. Ignored while an editor is open.
    pub fn activate_click(&mut self, id: ProjectId) {
        if self.editing.is_some() {
            log::debug!("Ignoring click on project {} while editing", id);
            return;
        }
        if self.project(id).is_some() {
            self.selected = Some(id);
        }
    }

    /// Clear both hover and click selection.
    pub fn deactivate(&mut self) {
        self.hovered = None;
        self.selected = None;
    }

    /// Hover wins over click on pointer layouts; touch layouts only click.
    pub fn active_id(&self) -> Option<ProjectId> {
        if self.pointer_capable {
            self.hovered.or(self.selected)
        } else {
            self.selected
        }
    }

    pub fn active_project(&self) -> Option<&Project> {
        self.active_id().and_then(|id| self.project(id))
    }

    /// The API reported `id` as unknown: drop it from the selection and
    /// ask for a fresh list.
    pub fn project_not_found(&mut self, id: ProjectId) {
        log::warn!("Project {} not found on server", id);
        if self.selected == Some(id) {
            self.selected = None;
        }
        if self.hovered == Some(id) {
            self.hovered = None;
        }
        self.cache.invalidate();
    }

    // ---- inline editing ----

    pub fn editing(&self) -> Option<&EditingField> {
        self.editing.as_ref()
    }

    /// Open the editor on one field, abandoning any other open edit.
    pub fn begin_edit(&mut self, id: ProjectId, field: EditableField) -> bool {
        let Some(project) = self.project(id) else {
            return false;
        };
        let pending_value = field.current_value(project);
        if let Some(prior) = self.editing.replace(EditingField {
            project_id: id,
            field,
            pending_value,
        }) {
            log::debug!("Abandoned edit of {:?} on project {}", prior.field, prior.project_id);
        }
        true
    }

    pub fn update_edit_value(&mut self, text: impl Into<String>) {
        if let Some(ref mut edit) = self.editing {
            edit.pending_value = text.into();
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Close the editor and, if the value is valid and changed, apply it
    /// optimistically.
    ///
    /// Returns the request to send now. `None` means nothing to send: the
    /// commit was a no-op, or an earlier update to the same field is still
    /// in flight and this one was queued behind it.
    pub fn commit_edit(&mut self) -> Option<UpdateRequest> {
        let edit = self.editing.take()?;
        let project = self.project(edit.project_id)?;
        let Some(patch) = edit.field.parse_change(project, &edit.pending_value) else {
            log::debug!("Edit of {:?} on project {} unchanged or invalid", edit.field, edit.project_id);
            return None;
        };

        let snapshot = Snapshot {
            view: self.projects.clone(),
            cache: self.cache.projects().map(|p| p.to_vec()),
        };
        self.apply_patch(edit.project_id, &patch);

        let request = UpdateRequest {
            ticket: self.pending.next_ticket(),
            project_id: edit.project_id,
            patch,
        };
        log::info!("Optimistic update #{} on project {}: {:?}", request.ticket, request.project_id, request.patch);
        self.pending.push(request, edit.field, snapshot)
    }

    /// Settle an update: adopt the server record on success, restore the
    /// edited field from the snapshot on failure. Either way the cache is
    /// marked stale.
    ///
    /// Returns the next queued request for the same field, if any.
    pub fn resolve_update(&mut self, ticket: Ticket, result: Result<Project, ApiError>) -> Option<UpdateRequest> {
        let Some(done) = self.pending.take(ticket) else {
            log::warn!("Result for unknown update #{}", ticket);
            return None;
        };

        match result {
            Ok(server) => {
                log::info!("Update #{} confirmed for project {}", ticket, server.id);
                self.reconcile(server);
            }
            Err(err) => {
                log::warn!("Update #{} on project {} failed, rolling back: {}", ticket, done.request.project_id, err);
                done.snapshot
                    .restore_field(&mut self.projects, &mut self.cache, done.request.project_id, done.field);
                self.pending.inherit_rollback(&done);
            }
        }

        self.reapply_pending();
        self.cache.invalidate();
        self.pending.promote(done.request.project_id, done.field)
    }

    /// Number of committed updates without a server answer yet.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Edits still awaiting an answer keep their optimistic values.
    fn reapply_pending(&mut self) {
        let still_pending: Vec<(ProjectId, ProjectPatch)> = self
            .pending
            .iter()
            .map(|p| (p.request.project_id, p.request.patch.clone()))
            .collect();
        for (id, patch) in still_pending {
            self.apply_patch(id, &patch);
        }
    }

    fn apply_patch(&mut self, id: ProjectId, patch: &ProjectPatch) {
        if let Some(project) = self.projects.iter_mut().find(|p| p.id == id) {
            patch.apply_to(project);
        }
        if let Some(cached) = self.cache.project_mut(id) {
            patch.apply_to(cached);
        }
    }

    fn reconcile(&mut self, server: Project) {
        if let Some(cached) = self.cache.project_mut(server.id) {
            *cached = server.clone();
        }
        if let Some(project) = self.projects.iter_mut().find(|p| p.id == server.id) {
            *project = server;
        }
    }
}
