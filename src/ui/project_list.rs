// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Year-grouped project list.
//!
//! Renders rows and translates pointer and keyboard activity into
//! [`ListAction`]s for the controller. Holds no state of its own.

use crate::controller::{EditingField, YearGroup};
use crate::models::project::{EditableField, Project, ProjectId};

/// What happened in the list this frame.
#[derive(Debug, Clone, PartialEq)]
pub enum ListAction {
    HoverEnter(ProjectId),
    HoverLeave,
    PointerMoved { x: f32, row_left: f32, row_width: f32 },
    Click(ProjectId),
    BeginEdit(ProjectId, EditableField),
    EditChanged(String),
    CommitEdit,
    CancelEdit,
}

/// Everything the list needs to draw one frame.
pub struct ListView<'a> {
    pub groups: &'a [YearGroup<'a>],
    pub hovered: Option<ProjectId>,
    pub active: Option<ProjectId>,
    pub editing: Option<&'a EditingField>,
    pub can_edit: bool,
}

/// Display the grouped list and collect interactions.
pub fn show(ui: &mut egui::Ui, view: &ListView<'_>) -> Vec<ListAction> {
    let mut actions = Vec::new();
    let mut hovered_row: Option<(ProjectId, egui::Rect)> = None;

    if view.groups.is_empty() {
        ui.label(egui::RichText::new("No projects yet").weak());
    }

    for group in view.groups {
        ui.add_space(12.0);
        ui.label(
            egui::RichText::new(group.year.to_string())
                .size(12.0)
                .color(egui::Color32::from_gray(140)),
        );
        ui.add_space(4.0);

        for project in &group.projects {
            let row = show_row(ui, project, view, &mut actions);
            if row.hovered() {
                hovered_row = Some((project.id, row.rect));
            }
            if row.clicked() {
                actions.push(ListAction::Click(project.id));
            }
        }
    }

    match hovered_row {
        Some((id, rect)) => {
            if view.hovered != Some(id) {
                actions.push(ListAction::HoverEnter(id));
            }
            if let Some(pos) = ui.input(|i| i.pointer.hover_pos()) {
                actions.push(ListAction::PointerMoved {
                    x: pos.x,
                    row_left: rect.min.x,
                    row_width: rect.width(),
                });
            }
        }
        None if view.hovered.is_some() => actions.push(ListAction::HoverLeave),
        None => {}
    }

    actions
}

fn show_row(ui: &mut egui::Ui, project: &Project, view: &ListView<'_>, actions: &mut Vec<ListAction>) -> egui::Response {
    let is_active = view.active == Some(project.id);
    let editing = view.editing.filter(|e| e.project_id == project.id);

    let inner = ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 6.0;

        match editing {
            Some(edit) if edit.field == EditableField::Title => {
                show_editor(ui, edit, 180.0, actions);
            }
            _ => {
                let mut title = egui::RichText::new(&project.title).size(14.0);
                if is_active {
                    title = title.strong();
                }
                let label = ui.add(egui::Label::new(title).sense(egui::Sense::click()));
                if view.can_edit && label.double_clicked() {
                    actions.push(ListAction::BeginEdit(project.id, EditableField::Title));
                }
            }
        }

        ui.label(egui::RichText::new(&project.project_type).size(12.0).weak());
        ui.label(egui::RichText::new("•").size(12.0).weak());

        match editing {
            Some(edit) if edit.field == EditableField::Year => {
                show_editor(ui, edit, 60.0, actions);
            }
            _ => {
                let year = ui.add(
                    egui::Label::new(egui::RichText::new(project.year.to_string()).size(12.0).weak())
                        .sense(egui::Sense::click()),
                );
                if view.can_edit && year.double_clicked() {
                    actions.push(ListAction::BeginEdit(project.id, EditableField::Year));
                }
            }
        }

        if view.can_edit
            && editing.is_none()
            && ui
                .small_button("✏")
                .on_hover_text("Edit title (double-click the year to edit it)")
                .clicked()
        {
            actions.push(ListAction::BeginEdit(project.id, EditableField::Title));
        }
    });

    inner.response.interact(egui::Sense::click())
}

/// Single-line editor. Enter or clicking away commits, Escape cancels.
fn show_editor(ui: &mut egui::Ui, edit: &EditingField, width: f32, actions: &mut Vec<ListAction>) {
    let id = egui::Id::new(("project_edit", edit.project_id, edit.field == EditableField::Year));
    let mut text = edit.pending_value.clone();
    let response = ui.add(egui::TextEdit::singleline(&mut text).id(id).desired_width(width));

    if response.changed() {
        actions.push(ListAction::EditChanged(text));
    }
    if response.lost_focus() {
        if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
            actions.push(ListAction::CancelEdit);
        } else {
            actions.push(ListAction::CommitEdit);
        }
    } else if !response.has_focus() {
        response.request_focus();
    }
}
