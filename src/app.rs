// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module contains the main application structure that implements
//! the egui::App trait. It feeds user interaction into the project list
//! controller, sends the controller's update requests through the
//! background worker, and hands results back to it.

use crate::admin::AdminGate;
use crate::config::AppConfig;
use crate::controller::{Generation, ProjectListController};
use crate::io::client::ApiClient;
use crate::io::settings::{SettingsStore, DARK_MODE};
use crate::io::worker::{Job, JobResult, SyncWorker};
use crate::roadmap::Roadmap;
use crate::ui::admin::{AdminAction, AdminForm};
use crate::ui::preview::{PreviewAction, PreviewPanel};
use crate::ui::project_list::{self, ListAction, ListView};
use crate::ui::roadmap::{RoadmapAction, RoadmapPanel};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Wait before retrying a failed list fetch.
const REFETCH_BACKOFF: Duration = Duration::from_secs(2);

/// Preview image for one URL.
enum Thumbnail {
    Loading,
    Ready(egui::TextureHandle),
    Failed,
}

/// Main application state.
pub struct FolioApp {
    config: AppConfig,

    /// Projects, selection, inline editor and pending updates
    controller: ProjectListController,

    /// Runs API calls and image downloads off the UI thread
    worker: SyncWorker,

    /// Generation of the list fetch in flight, if any
    list_fetch: Option<Generation>,

    /// When the last list fetch failed, for backoff
    fetch_failed_at: Option<Instant>,

    /// Loaded preview images keyed by URL
    thumbnails: HashMap<String, Thumbnail>,

    preview: PreviewPanel,

    settings: SettingsStore,
    gate: AdminGate,
    admin_form: AdminForm,
    show_admin_form: bool,

    /// Private checklist, only reachable while unlocked
    roadmap: Roadmap,
    roadmap_panel: RoadmapPanel,
    show_roadmap: bool,

    /// A touch has been seen; stay in click-only mode from then on
    touch_seen: bool,

    /// Last error shown in the status bar
    status: Option<String>,
}

impl FolioApp {
    /// Create the viewer talking to `config.api_url`.
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig, open_admin: bool) -> Self {
        let settings = match config.settings_path.clone().or_else(SettingsStore::default_path) {
            Some(path) => SettingsStore::open(&path),
            None => SettingsStore::in_memory(),
        };
        cc.egui_ctx.set_visuals(visuals(settings.flag(DARK_MODE)));

        let api = Arc::new(ApiClient::new(&config.api_url));
        let worker = SyncWorker::new(api).with_repaint(cc.egui_ctx.clone());
        let gate = AdminGate::new(&settings);
        let roadmap = Roadmap::load(&settings);
        log::info!("Viewer using API at {}", config.api_url);

        Self {
            preview: PreviewPanel::new(config.preview_mode),
            config,
            controller: ProjectListController::default(),
            worker,
            list_fetch: None,
            fetch_failed_at: None,
            thumbnails: HashMap::new(),
            settings,
            gate,
            admin_form: AdminForm::default(),
            show_admin_form: open_admin,
            roadmap,
            roadmap_panel: RoadmapPanel::default(),
            show_roadmap: false,
            touch_seen: false,
            status: None,
        }
    }

    /// Apply results that arrived from the worker.
    fn handle_results(&mut self, ctx: &egui::Context) {
        for result in self.worker.poll() {
            match result {
                JobResult::Projects(Ok(projects)) => {
                    let Some(generation) = self.list_fetch.take() else {
                        continue;
                    };
                    self.fetch_failed_at = None;
                    self.status = None;
                    log::info!("Loaded {} projects", projects.len());
                    self.controller.fetched(generation, projects);
                }
                JobResult::Projects(Err(e)) => {
                    self.list_fetch = None;
                    self.fetch_failed_at = Some(Instant::now());
                    log::error!("Failed to load projects: {}", e);
                    self.status = Some(format!("Could not load projects: {}", e));
                }
                JobResult::Project(id, Err(e)) if e.is_not_found() => {
                    self.controller.project_not_found(id);
                }
                JobResult::Project(id, Err(e)) => {
                    log::warn!("Could not check project {}: {}", id, e);
                }
                JobResult::Project(_, Ok(_)) => {}
                JobResult::Updated(ticket, result) => {
                    if let Some(next) = self.controller.resolve_update(ticket, result) {
                        self.worker.dispatch(Job::Update(next));
                    }
                }
                JobResult::Image(url, Ok(loaded)) => {
                    let size = [loaded.width as usize, loaded.height as usize];
                    let color_image = egui::ColorImage::from_rgba_unmultiplied(size, &loaded.pixels);
                    let texture = ctx.load_texture(url.as_str(), color_image, egui::TextureOptions::LINEAR);
                    self.thumbnails.insert(url, Thumbnail::Ready(texture));
                }
                JobResult::Image(url, Err(e)) => {
                    log::warn!("{} ({})", e, url);
                    self.thumbnails.insert(url, Thumbnail::Failed);
                }
            }
        }
    }

    /// Refetch the list whenever the cache has gone stale.
    fn refetch_if_stale(&mut self) {
        if !self.controller.cache().is_stale() {
            return;
        }
        if self.fetch_failed_at.is_some_and(|t| t.elapsed() < REFETCH_BACKOFF) {
            return;
        }
        self.fetch_projects();
    }

    /// Start a list fetch unless one is already running.
    fn fetch_projects(&mut self) {
        if self.list_fetch.is_some() {
            return;
        }
        self.list_fetch = Some(self.controller.begin_fetch());
        self.worker.dispatch(Job::FetchProjects);
    }

    /// Hover previews need a wide window and no touch input.
    fn update_pointer_capability(&mut self, ctx: &egui::Context) {
        if ctx.input(|i| i.any_touches()) {
            self.touch_seen = true;
        }
        let wide = ctx.screen_rect().width() >= self.config.pointer_breakpoint;
        self.controller.set_pointer_capable(wide && !self.touch_seen);
    }

    fn handle_list_actions(&mut self, actions: Vec<ListAction>) {
        for action in actions {
            match action {
                ListAction::HoverEnter(id) => self.controller.activate_pointer(id),
                ListAction::HoverLeave => {
                    // Moving onto the preview keeps it open; leaving the
                    // preview closes it instead.
                    if !self.preview.contains_pointer() {
                        self.controller.deactivate_pointer();
                    }
                }
                ListAction::PointerMoved { x, row_left, row_width } => {
                    self.controller.track_cursor(x, row_left, row_width);
                }
                ListAction::Click(id) => {
                    self.controller.activate_click(id);
                    if self.controller.active_id() == Some(id) {
                        self.worker.dispatch(Job::FetchProject(id));
                    }
                }
                ListAction::BeginEdit(id, field) => {
                    if self.gate.is_unlocked() {
                        self.controller.begin_edit(id, field);
                    }
                }
                ListAction::EditChanged(text) => self.controller.update_edit_value(text),
                ListAction::CommitEdit => {
                    if let Some(request) = self.controller.commit_edit() {
                        self.worker.dispatch(Job::Update(request));
                    }
                }
                ListAction::CancelEdit => self.controller.cancel_edit(),
            }
        }
    }

    fn handle_admin_action(&mut self, action: AdminAction) {
        let result = match action {
            AdminAction::None => return,
            AdminAction::Create { password, confirm } => self.gate.create(&mut self.settings, &password, &confirm),
            AdminAction::Login(password) => self.gate.login(&self.settings, &password),
            AdminAction::Reset => {
                self.gate.reset(&mut self.settings);
                self.admin_form.clear();
                return;
            }
            AdminAction::Dismiss => {
                self.show_admin_form = false;
                self.admin_form.clear();
                return;
            }
        };

        match result {
            Ok(()) if self.gate.is_unlocked() => {
                log::info!("Edit mode unlocked");
                self.show_admin_form = false;
                self.show_roadmap = true;
                self.admin_form.clear();
            }
            Ok(()) => self.admin_form.clear(),
            Err(e) => self.admin_form.error = Some(e.to_string()),
        }
    }

    fn handle_roadmap_actions(&mut self, ctx: &egui::Context, actions: Vec<RoadmapAction>) {
        for action in actions {
            match action {
                RoadmapAction::SetDone(id, done) => self.roadmap.set_done(&id, done),
                RoadmapAction::Save { id, title, url } => {
                    self.roadmap.save_concept(&id, &title, &url);
                }
                RoadmapAction::Delete(id) => {
                    self.roadmap.delete_concept(&id);
                }
                RoadmapAction::Add { skill_id, title, url } => {
                    self.roadmap.add_concept(&skill_id, &title, &url);
                }
                RoadmapAction::OpenLink(url) => {
                    ctx.open_url(egui::OpenUrl::new_tab(url));
                    continue;
                }
            }
            if let Err(e) = self.roadmap.save(&mut self.settings) {
                log::error!("Failed to save roadmap: {}", e);
            }
        }
    }

    /// Texture for `url`, starting a download the first time it is asked for.
    fn thumbnail(&mut self, url: &str) -> Option<&egui::TextureHandle> {
        if !self.thumbnails.contains_key(url) {
            self.thumbnails.insert(url.to_string(), Thumbnail::Loading);
            self.worker.dispatch(Job::LoadImage(url.to_string()));
        }
        match self.thumbnails.get(url) {
            Some(Thumbnail::Ready(texture)) => Some(texture),
            _ => None,
        }
    }

    fn show_preview(&mut self, ctx: &egui::Context) {
        self.preview.sync(self.controller.active_id());
        let Some(project) = self.controller.active_project().cloned() else {
            return;
        };

        let progress = self.controller.cursor_progress();
        let texture = self.thumbnail(&project.image_url).cloned();
        match self.preview.show(ctx, &project, texture.as_ref(), progress) {
            PreviewAction::None => {}
            PreviewAction::Close | PreviewAction::MouseLeave => self.controller.deactivate(),
            PreviewAction::TogglePlay => self.preview.toggle_playing(),
            PreviewAction::OpenVideo(url) => ctx.open_url(egui::OpenUrl::new_tab(url)),
        }
    }
}

fn visuals(dark: bool) -> egui::Visuals {
    if dark {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    }
}

impl eframe::App for FolioApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_results(ctx);
        self.refetch_if_stale();
        self.update_pointer_capability(ctx);

        // Keep polling while a failed fetch waits out its backoff
        if self.fetch_failed_at.is_some() {
            ctx.request_repaint_after(REFETCH_BACKOFF);
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui
                        .add_enabled(self.list_fetch.is_none(), egui::Button::new("Reload projects"))
                        .clicked()
                    {
                        self.fetch_failed_at = None;
                        self.fetch_projects();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("View", |ui| {
                    let mut dark = self.settings.flag(DARK_MODE);
                    if ui.checkbox(&mut dark, "Dark mode").changed() {
                        ctx.set_visuals(visuals(dark));
                        if let Err(e) = self.settings.set_flag(DARK_MODE, dark) {
                            log::error!("Failed to save preference: {}", e);
                        }
                        ui.close_menu();
                    }
                });

                ui.menu_button("Admin", |ui| {
                    if self.gate.is_unlocked() {
                        ui.checkbox(&mut self.show_roadmap, "Roadmap");
                        if ui.button("Lock").clicked() {
                            self.controller.cancel_edit();
                            self.gate.lock(&self.settings);
                            ui.close_menu();
                        }
                    } else if ui.button("Unlock editing...").clicked() {
                        self.show_admin_form = true;
                        ui.close_menu();
                    }
                });
            });
        });

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if self.list_fetch.is_some() {
                    ui.spinner();
                    ui.label("Loading projects...");
                } else if let Some(ref status) = self.status {
                    ui.colored_label(ui.visuals().error_fg_color, status);
                } else {
                    ui.label(format!("{} projects", self.controller.projects().len()));
                }
                if self.list_fetch.is_none() && self.worker.is_busy() {
                    ui.spinner();
                }
                let pending = self.controller.pending_count();
                if pending > 0 {
                    ui.separator();
                    ui.label(format!("Saving {} change(s)...", pending));
                }
                if self.gate.is_unlocked() {
                    ui.separator();
                    ui.label(egui::RichText::new("Editing unlocked").italics().weak());
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let hint = if self.controller.pointer_capable() {
                        "Hover a project to preview it"
                    } else {
                        "Tap a project to preview it"
                    };
                    ui.label(egui::RichText::new(hint).weak());
                });
            });
        });

        // Handle keyboard events
        if self.controller.editing().is_none() && ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.controller.deactivate();
        }

        // Roadmap (right), admin only
        if self.gate.is_unlocked() && self.show_roadmap {
            let actions = egui::SidePanel::right("roadmap")
                .resizable(true)
                .default_width(380.0)
                .show(ctx, |ui| self.roadmap_panel.show(ui, &self.roadmap))
                .inner;
            self.handle_roadmap_actions(ctx, actions);
        }

        // Project list (center)
        let list_actions = egui::CentralPanel::default()
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .show(ui, |ui| {
                        ui.add_space(24.0);
                        ui.heading("Projects");
                        let groups = self.controller.grouped();
                        let view = ListView {
                            groups: &groups,
                            hovered: self.controller.hovered(),
                            active: self.controller.active_id(),
                            editing: self.controller.editing(),
                            can_edit: self.gate.is_unlocked(),
                        };
                        project_list::show(ui, &view)
                    })
                    .inner
            })
            .inner;
        self.handle_list_actions(list_actions);

        self.show_preview(ctx);

        // Admin password window
        if self.show_admin_form && !self.gate.is_unlocked() {
            let mode = self.gate.mode();
            let mut action = AdminAction::None;
            egui::Window::new("Admin Access")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
                .show(ctx, |ui| {
                    action = crate::ui::admin::show(ui, &mut self.admin_form, mode);
                });
            self.handle_admin_action(action);
        }
    }
}
