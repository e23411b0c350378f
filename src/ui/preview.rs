// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Floating preview of the active project.
//!
//! The panel is positioned from the cursor progress reported by the list
//! and owns nothing but its "is playing" toggle, which resets whenever a
//! different project becomes active.

use crate::config::PreviewMode;
use crate::models::project::{Project, ProjectId};
use crate::util::geometry::preview_offset_percent;

const PANEL_WIDTH: f32 = 330.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewAction {
    None,
    Close,
    MouseLeave,
    TogglePlay,
    OpenVideo(String),
}

pub struct PreviewPanel {
    mode: PreviewMode,
    shown: Option<ProjectId>,
    playing: bool,
    contains_pointer: bool,
}

impl PreviewPanel {
    pub fn new(mode: PreviewMode) -> Self {
        Self {
            mode,
            shown: None,
            playing: false,
            contains_pointer: false,
        }
    }

    /// Follow the controller's active project.
    pub fn sync(&mut self, active: Option<ProjectId>) {
        if active != self.shown {
            self.shown = active;
            self.playing = self.mode == PreviewMode::Autoplay && active.is_some();
        }
        if active.is_none() {
            self.contains_pointer = false;
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn toggle_playing(&mut self) {
        self.playing = !self.playing;
    }

    /// Whether the pointer was over the panel last frame.
    pub fn contains_pointer(&self) -> bool {
        self.contains_pointer
    }

    /// Left edge of the panel for a given screen and cursor progress.
    fn panel_left(screen: egui::Rect, cursor_progress: f32) -> f32 {
        screen.center().x + PANEL_WIDTH * preview_offset_percent(cursor_progress) / 100.0
    }

    pub fn show(
        &mut self,
        ctx: &egui::Context,
        project: &Project,
        texture: Option<&egui::TextureHandle>,
        cursor_progress: f32,
    ) -> PreviewAction {
        let mut action = PreviewAction::None;
        let screen = ctx.screen_rect();
        let pos = egui::pos2(
            Self::panel_left(screen, cursor_progress),
            screen.min.y + screen.height() * 0.1,
        );

        let area = egui::Area::new(egui::Id::new("project_preview"))
            .order(egui::Order::Foreground)
            .fixed_pos(pos)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.set_width(PANEL_WIDTH);

                    let media_size = egui::vec2(PANEL_WIDTH, PANEL_WIDTH * 16.0 / 9.0 * 0.6);
                    match texture {
                        Some(texture) => {
                            ui.add(
                                egui::Image::from_texture(egui::load::SizedTexture::from_handle(texture))
                                    .fit_to_exact_size(media_size),
                            );
                        }
                        None => {
                            let (rect, _) = ui.allocate_exact_size(media_size, egui::Sense::hover());
                            ui.painter().rect_filled(rect, 4.0, egui::Color32::BLACK);
                            ui.painter().text(
                                rect.center(),
                                egui::Align2::CENTER_CENTER,
                                "Loading preview…",
                                egui::FontId::proportional(13.0),
                                egui::Color32::from_gray(160),
                            );
                        }
                    }

                    ui.add_space(8.0);
                    ui.horizontal(|ui| {
                        ui.vertical(|ui| {
                            ui.label(egui::RichText::new(&project.title).size(16.0).strong());
                            ui.label(egui::RichText::new(&project.project_type).weak());
                        });
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::TOP), |ui| {
                            if ui.small_button("✕").on_hover_text("Close preview").clicked() {
                                action = PreviewAction::Close;
                            }
                        });
                    });

                    if let Some(ref video_url) = project.video_url {
                        ui.add_space(4.0);
                        if self.is_playing() {
                            ui.horizontal(|ui| {
                                ui.label(egui::RichText::new("● Playing").color(egui::Color32::LIGHT_RED));
                                if ui.link("Open video").clicked() {
                                    action = PreviewAction::OpenVideo(video_url.clone());
                                }
                                if ui.small_button("⏸").clicked() {
                                    action = PreviewAction::TogglePlay;
                                }
                            });
                        } else if ui.button("▶ Play").clicked() {
                            action = PreviewAction::TogglePlay;
                        }
                    }
                });
            });

        let over_panel = area.response.contains_pointer();
        if self.contains_pointer && !over_panel && action == PreviewAction::None {
            action = PreviewAction::MouseLeave;
        }
        self.contains_pointer = over_panel;
        action
    }
}
