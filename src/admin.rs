// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Local admin gate.
//!
//! Unlocking enables inline editing. The password hash lives in the local
//! settings file; this only keeps casual visitors out of edit mode.

use crate::io::settings::{SettingsStore, ADMIN_PASSWORD_HASH};
use sha2::{Digest, Sha256};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateMode {
    /// No password stored yet.
    Create,
    Login,
    Authenticated,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GateError {
    #[error("Password is required")]
    PasswordRequired,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Incorrect password")]
    IncorrectPassword,
    #[error("Something went wrong. Please try again.")]
    Storage,
}

pub struct AdminGate {
    mode: GateMode,
}

fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

impl AdminGate {
    pub fn new(settings: &SettingsStore) -> Self {
        let mode = if settings.get(ADMIN_PASSWORD_HASH).is_some() {
            GateMode::Login
        } else {
            GateMode::Create
        };
        Self { mode }
    }

    pub fn mode(&self) -> GateMode {
        self.mode
    }

    pub fn is_unlocked(&self) -> bool {
        self.mode == GateMode::Authenticated
    }

    /// Set the first password and unlock.
    pub fn create(&mut self, settings: &mut SettingsStore, password: &str, confirm: &str) -> Result<(), GateError> {
        if password.trim().is_empty() {
            return Err(GateError::PasswordRequired);
        }
        if password != confirm {
            return Err(GateError::PasswordMismatch);
        }
        settings.set(ADMIN_PASSWORD_HASH, &hash_password(password)).map_err(|e| {
            log::error!("Failed to store admin password: {}", e);
            GateError::Storage
        })?;
        log::info!("Admin password created");
        self.mode = GateMode::Authenticated;
        Ok(())
    }

    pub fn login(&mut self, settings: &SettingsStore, password: &str) -> Result<(), GateError> {
        let Some(stored) = settings.get(ADMIN_PASSWORD_HASH) else {
            self.mode = GateMode::Create;
            return Ok(());
        };
        if password.trim().is_empty() {
            return Err(GateError::PasswordRequired);
        }
        if hash_password(password) != stored {
            return Err(GateError::IncorrectPassword);
        }
        self.mode = GateMode::Authenticated;
        Ok(())
    }

    pub fn lock(&mut self, settings: &SettingsStore) {
        *self = Self::new(settings);
    }

    /// Forget the stored password.
    pub fn reset(&mut self, settings: &mut SettingsStore) {
        if let Err(e) = settings.remove(ADMIN_PASSWORD_HASH) {
            log::error!("Failed to clear admin password: {}", e);
        }
        self.mode = GateMode::Create;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_then_login() {
        let mut settings = SettingsStore::in_memory();
        let mut gate = AdminGate::new(&settings);
        assert_eq!(gate.mode(), GateMode::Create);

        assert_eq!(gate.create(&mut settings, " ", " "), Err(GateError::PasswordRequired));
        assert_eq!(gate.create(&mut settings, "secret", "secrets"), Err(GateError::PasswordMismatch));
        gate.create(&mut settings, "secret", "secret").unwrap();
        assert!(gate.is_unlocked());

        gate.lock(&settings);
        assert_eq!(gate.mode(), GateMode::Login);
        assert_eq!(gate.login(&settings, "wrong"), Err(GateError::IncorrectPassword));
        assert_eq!(gate.login(&settings, ""), Err(GateError::PasswordRequired));
        gate.login(&settings, "secret").unwrap();
        assert!(gate.is_unlocked());
    }

    #[test]
    fn test_stored_value_is_sha256_hex() {
        let mut settings = SettingsStore::in_memory();
        let mut gate = AdminGate::new(&settings);
        gate.create(&mut settings, "abc", "abc").unwrap();
        assert_eq!(
            settings.get(ADMIN_PASSWORD_HASH),
            Some("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad")
        );
    }

    #[test]
    fn test_reset_returns_to_create() {
        let mut settings = SettingsStore::in_memory();
        let mut gate = AdminGate::new(&settings);
        gate.create(&mut settings, "secret", "secret").unwrap();
        gate.reset(&mut settings);
        assert_eq!(gate.mode(), GateMode::Create);
        assert_eq!(AdminGate::new(&settings).mode(), GateMode::Create);
    }
}
