// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Project list serialization and deserialization.
//!
//! This module handles reading and writing project lists in YAML and JSON
//! formats, chosen by file extension. The server uses it to seed its store.

use crate::models::project::Project;
use anyhow::{bail, Result};
use std::path::Path;

enum Format {
    Yaml,
    Json,
}

fn format_of(path: &Path) -> Result<Format> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => Ok(Format::Yaml),
        Some("json") => Ok(Format::Json),
        other => bail!("Unsupported file extension: {:?}", other),
    }
}

/// Read a project list from a `.yaml`, `.yml` or `.json` file.
pub fn import_projects(path: &Path) -> Result<Vec<Project>> {
    let text = std::fs::read_to_string(path)?;
    let projects = match format_of(path)? {
        Format::Yaml => serde_yaml::from_str(&text)?,
        Format::Json => serde_json::from_str(&text)?,
    };
    Ok(projects)
}

/// Write a project list, format chosen by extension.
pub fn export_projects(projects: &[Project], path: &Path) -> Result<()> {
    let text = match format_of(path)? {
        Format::Yaml => serde_yaml::to_string(projects)?,
        Format::Json => serde_json::to_string_pretty(projects)?,
    };
    std::fs::write(path, text)?;
    Ok(())
}
