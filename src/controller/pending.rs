// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Bookkeeping for optimistic updates awaiting a server answer.
//!
//! Every committed edit gets a ticket and a snapshot of the lists taken
//! just before its optimistic write. Updates to the same project field are
//! serialized: only the oldest is in flight, the rest wait their turn.

use super::cache::ProjectCache;
use crate::models::project::{EditableField, Project, ProjectId, ProjectPatch};

pub type Ticket = u64;

/// A PATCH the caller is expected to send, identified by its ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRequest {
    pub ticket: Ticket,
    pub project_id: ProjectId,
    pub patch: ProjectPatch,
}

/// Lists as they were before an optimistic write.
#[derive(Debug, Clone)]
pub(crate) struct Snapshot {
    pub view: Vec<Project>,
    pub cache: Option<Vec<Project>>,
}

impl Snapshot {
    /// Put one field back to its captured value, leaving the rest of both
    /// lists alone.
    pub fn restore_field(&self, view: &mut [Project], cache: &mut ProjectCache, project_id: ProjectId, field: EditableField) {
        copy_field(&self.view, view, project_id, field);
        let captured = self.cache.as_deref().and_then(|c| c.iter().find(|p| p.id == project_id));
        if let (Some(from), Some(to)) = (captured, cache.project_mut(project_id)) {
            field.copy_value(from, to);
        }
    }

    /// Take the value of `field` on `project_id` from `other`.
    fn inherit_field(&mut self, other: &Snapshot, project_id: ProjectId, field: EditableField) {
        copy_field(&other.view, &mut self.view, project_id, field);
        if let (Some(source), Some(target)) = (other.cache.as_ref(), self.cache.as_mut()) {
            copy_field(source, target, project_id, field);
        }
    }
}

fn copy_field(source: &[Project], target: &mut [Project], id: ProjectId, field: EditableField) {
    let Some(from) = source.iter().find(|p| p.id == id) else {
        return;
    };
    if let Some(to) = target.iter_mut().find(|p| p.id == id) {
        field.copy_value(from, to);
    }
}

pub(crate) struct PendingUpdate {
    pub request: UpdateRequest,
    pub field: EditableField,
    pub snapshot: Snapshot,
    in_flight: bool,
}

impl PendingUpdate {
    fn same_key(&self, project_id: ProjectId, field: EditableField) -> bool {
        self.request.project_id == project_id && self.field == field
    }
}

/// Pending updates in commit order.
#[derive(Default)]
pub(crate) struct PendingUpdates {
    entries: Vec<PendingUpdate>,
    next_ticket: Ticket,
}

impl PendingUpdates {
    pub fn next_ticket(&mut self) -> Ticket {
        self.next_ticket += 1;
        self.next_ticket
    }

    /// Record an update. Returns it back if it may be sent right away.
    pub fn push(&mut self, request: UpdateRequest, field: EditableField, snapshot: Snapshot) -> Option<UpdateRequest> {
        let busy = self
            .entries
            .iter()
            .any(|e| e.in_flight && e.same_key(request.project_id, field));
        let ready = (!busy).then(|| request.clone());
        self.entries.push(PendingUpdate {
            request,
            field,
            snapshot,
            in_flight: !busy,
        });
        ready
    }

    /// Remove and return the update for `ticket`.
    pub fn take(&mut self, ticket: Ticket) -> Option<PendingUpdate> {
        let index = self.entries.iter().position(|e| e.request.ticket == ticket)?;
        Some(self.entries.remove(index))
    }

    /// Updates queued behind a rolled-back one must roll back to what was
    /// there before it, not to its rejected optimistic value.
    pub fn inherit_rollback(&mut self, failed: &PendingUpdate) {
        let (id, field) = (failed.request.project_id, failed.field);
        for entry in self.entries.iter_mut().filter(|e| e.same_key(id, field)) {
            entry.snapshot.inherit_field(&failed.snapshot, id, field);
        }
    }

    /// Mark the next queued update for the key as in flight and return it.
    pub fn promote(&mut self, project_id: ProjectId, field: EditableField) -> Option<UpdateRequest> {
        if self.entries.iter().any(|e| e.in_flight && e.same_key(project_id, field)) {
            return None;
        }
        let next = self
            .entries
            .iter_mut()
            .find(|e| !e.in_flight && e.same_key(project_id, field))?;
        next.in_flight = true;
        Some(next.request.clone())
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingUpdate> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(year: i32) -> Snapshot {
        let projects = vec![Project::new(1, "A", year, "Research", "a.png", 1)];
        Snapshot {
            view: projects.clone(),
            cache: Some(projects),
        }
    }

    fn request(pending: &mut PendingUpdates, year: i32) -> UpdateRequest {
        UpdateRequest {
            ticket: pending.next_ticket(),
            project_id: 1,
            patch: ProjectPatch::year(year),
        }
    }

    #[test]
    fn test_same_key_is_serialized() {
        let mut pending = PendingUpdates::default();
        let first = request(&mut pending, 2024);
        let second = request(&mut pending, 2025);

        assert_eq!(pending.push(first.clone(), EditableField::Year, snapshot(2022)), Some(first.clone()));
        assert_eq!(pending.push(second.clone(), EditableField::Year, snapshot(2024)), None);

        // Still blocked while the first is in flight.
        assert_eq!(pending.promote(1, EditableField::Year), None);

        pending.take(first.ticket).unwrap();
        assert_eq!(pending.promote(1, EditableField::Year), Some(second));
        assert_eq!(pending.len(), 1);
    }

    #[test]
    fn test_other_fields_are_independent() {
        let mut pending = PendingUpdates::default();
        let year = request(&mut pending, 2024);
        let title = UpdateRequest {
            ticket: pending.next_ticket(),
            project_id: 1,
            patch: ProjectPatch::title("B"),
        };
        assert!(pending.push(year, EditableField::Year, snapshot(2022)).is_some());
        assert!(pending.push(title, EditableField::Title, snapshot(2022)).is_some());
    }

    #[test]
    fn test_rollback_is_inherited_by_queued_update() {
        let mut pending = PendingUpdates::default();
        let first = request(&mut pending, 2024);
        let second = request(&mut pending, 2025);
        pending.push(first.clone(), EditableField::Year, snapshot(2022));
        pending.push(second, EditableField::Year, snapshot(2024));

        let failed = pending.take(first.ticket).unwrap();
        pending.inherit_rollback(&failed);

        let queued = pending.iter().next().unwrap();
        assert_eq!(queued.snapshot.view[0].year, 2022);
        assert_eq!(queued.snapshot.cache.as_ref().unwrap()[0].year, 2022);
    }
}
