// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Roadmap checklist panel.
//!
//! Draws categories and skills as collapsible sections with one checkbox
//! row per concept. Edits are returned as [`RoadmapAction`]s; the panel
//! itself only keeps the text of the open editor and "add" form.

use crate::roadmap::{Concept, Roadmap};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoadmapAction {
    SetDone(String, bool),
    Save { id: String, title: String, url: String },
    Delete(String),
    Add { skill_id: String, title: String, url: String },
    OpenLink(String),
}

/// Open concept editor.
struct ConceptEditor {
    id: String,
    title: String,
    url: String,
    confirm_delete: bool,
}

/// Open "add item" form.
struct NewConcept {
    skill_id: String,
    title: String,
    url: String,
}

#[derive(Default)]
pub struct RoadmapPanel {
    editor: Option<ConceptEditor>,
    adding: Option<NewConcept>,
}

impl RoadmapPanel {
    pub fn show(&mut self, ui: &mut egui::Ui, roadmap: &Roadmap) -> Vec<RoadmapAction> {
        let mut actions = Vec::new();
        let progress = roadmap.progress();

        ui.horizontal(|ui| {
            ui.heading(roadmap.data.title.as_str());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(egui::RichText::new(format!("{}/{}", progress.done, progress.total)).weak());
            });
        });
        ui.add(egui::ProgressBar::new(progress.percent as f32 / 100.0).show_percentage());
        ui.add_space(8.0);

        egui::ScrollArea::vertical().show(ui, |ui| {
            for category in &roadmap.data.categories {
                egui::CollapsingHeader::new(egui::RichText::new(&category.title).strong())
                    .id_source(("roadmap_category", &category.id))
                    .show(ui, |ui| {
                        if category.skills.is_empty() {
                            ui.label(egui::RichText::new("No skills yet.").weak());
                        }
                        for skill in &category.skills {
                            egui::CollapsingHeader::new(skill.title.as_str())
                                .id_source(("roadmap_skill", &skill.id))
                                .show(ui, |ui| {
                                    for concept in &skill.concepts {
                                        self.concept_row(ui, roadmap, concept, &mut actions);
                                    }
                                    self.add_form(ui, &skill.id, &mut actions);
                                });
                        }
                    });
            }
        });

        actions
    }

    fn concept_row(
        &mut self,
        ui: &mut egui::Ui,
        roadmap: &Roadmap,
        concept: &Concept,
        actions: &mut Vec<RoadmapAction>,
    ) {
        let link = roadmap.link(concept);

        if let Some(editor) = self.editor.as_mut().filter(|e| e.id == concept.id) {
            let mut close = false;
            ui.horizontal_wrapped(|ui| {
                let title = ui.add(egui::TextEdit::singleline(&mut editor.title).hint_text("Concept title"));
                let url = ui.add(egui::TextEdit::singleline(&mut editor.url).hint_text("Resource URL (optional)"));
                let enter = (title.lost_focus() || url.lost_focus()) && ui.input(|i| i.key_pressed(egui::Key::Enter));

                if (ui.button("Save").clicked() || enter) && !editor.title.trim().is_empty() {
                    actions.push(RoadmapAction::Save {
                        id: editor.id.clone(),
                        title: editor.title.clone(),
                        url: editor.url.clone(),
                    });
                    close = true;
                }
                if ui.button("Cancel").clicked() {
                    close = true;
                }
                if editor.confirm_delete {
                    let confirm = egui::RichText::new("Really delete?").color(ui.visuals().error_fg_color);
                    if ui.button(confirm).clicked() {
                        actions.push(RoadmapAction::Delete(editor.id.clone()));
                        close = true;
                    }
                } else if ui.button("🗑 Delete").clicked() {
                    editor.confirm_delete = true;
                }
            });
            if close {
                self.editor = None;
            }
            return;
        }

        ui.horizontal(|ui| {
            let mut done = roadmap.is_done(&concept.id);
            if ui.checkbox(&mut done, "").changed() {
                actions.push(RoadmapAction::SetDone(concept.id.clone(), done));
            }
            match link {
                Some(url) => {
                    if ui.link(concept.title.as_str()).on_hover_text(url).clicked() {
                        actions.push(RoadmapAction::OpenLink(url.to_string()));
                    }
                }
                None => {
                    ui.label(concept.title.as_str());
                }
            }
            if ui.small_button("✏").on_hover_text("Edit").clicked() {
                self.editor = Some(ConceptEditor {
                    id: concept.id.clone(),
                    title: concept.title.clone(),
                    url: link.unwrap_or_default().to_string(),
                    confirm_delete: false,
                });
            }
        });
    }

    fn add_form(&mut self, ui: &mut egui::Ui, skill_id: &str, actions: &mut Vec<RoadmapAction>) {
        let Some(form) = self.adding.as_mut().filter(|f| f.skill_id == skill_id) else {
            if ui.small_button("+ Add item").clicked() {
                self.adding = Some(NewConcept {
                    skill_id: skill_id.to_string(),
                    title: String::new(),
                    url: String::new(),
                });
            }
            return;
        };

        let mut close = false;
        ui.horizontal_wrapped(|ui| {
            ui.add(egui::TextEdit::singleline(&mut form.title).hint_text("New concept"));
            ui.add(egui::TextEdit::singleline(&mut form.url).hint_text("URL (optional)"));
            if ui.button("Add").clicked() && !form.title.trim().is_empty() {
                actions.push(RoadmapAction::Add {
                    skill_id: form.skill_id.clone(),
                    title: form.title.clone(),
                    url: form.url.clone(),
                });
                close = true;
            }
            if ui.button("Cancel").clicked() {
                close = true;
            }
        });
        if close {
            self.adding = None;
        }
    }
}
