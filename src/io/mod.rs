// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O: the REST client, background jobs, media, project files and settings.

pub mod client;
pub mod media;
pub mod serialization;
pub mod settings;
pub mod worker;
