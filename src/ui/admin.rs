// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Password form for unlocking edit mode.

use crate::admin::GateMode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminAction {
    None,
    Create { password: String, confirm: String },
    Login(String),
    Reset,
    Dismiss,
}

/// Text typed into the form, kept between frames.
#[derive(Default)]
pub struct AdminForm {
    pub password: String,
    pub confirm: String,
    pub error: Option<String>,
}

impl AdminForm {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

pub fn show(ui: &mut egui::Ui, form: &mut AdminForm, mode: GateMode) -> AdminAction {
    let mut action = AdminAction::None;
    let creating = mode == GateMode::Create;

    ui.label(
        egui::RichText::new(if creating {
            "Create a password to secure edit mode. It is stored locally on this machine."
        } else {
            "Enter the admin password to edit projects."
        })
        .weak(),
    );
    ui.add_space(8.0);

    ui.label("Password");
    let password = ui.add(egui::TextEdit::singleline(&mut form.password).password(true));
    let mut submitted = password.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

    if creating {
        ui.label("Confirm password");
        let confirm = ui.add(egui::TextEdit::singleline(&mut form.confirm).password(true));
        submitted |= confirm.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
    }

    if let Some(ref error) = form.error {
        ui.colored_label(ui.visuals().error_fg_color, error);
    }

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        let label = if creating { "Create password" } else { "Unlock" };
        if ui.button(label).clicked() {
            submitted = true;
        }
        if !creating && ui.button("Reset password").clicked() {
            action = AdminAction::Reset;
        }
        if ui.button("Cancel").clicked() {
            action = AdminAction::Dismiss;
        }
    });

    if submitted && action == AdminAction::None {
        action = if creating {
            AdminAction::Create {
                password: form.password.clone(),
                confirm: form.confirm.clone(),
            }
        } else {
            AdminAction::Login(form.password.clone())
        };
    }
    action
}
