// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Portfolio project records.
//!
//! This module defines the project entry shared by the store, the REST
//! API and the desktop viewer, along with the partial update body and the
//! fields that can be edited in place.

use serde::{Deserialize, Serialize};

/// Stable identity of a project.
pub type ProjectId = u32;

/// A single portfolio entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub year: i32,
    #[serde(rename = "type")]
    pub project_type: String,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    /// Tie-break within a year, ascending.
    pub order: i32,
}

impl Project {
    /// Create a project without a video preview.
    pub fn new(id: ProjectId, title: &str, year: i32, project_type: &str, image_url: &str, order: i32) -> Self {
        Self {
            id,
            title: title.to_string(),
            year,
            project_type: project_type.to_string(),
            image_url: image_url.to_string(),
            video_url: None,
            order,
        }
    }

    /// Attach a video preview URL.
    pub fn with_video(mut self, video_url: &str) -> Self {
        self.video_url = Some(video_url.to_string());
        self
    }
}

/// Body of `PATCH /api/projects/:id`. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

impl ProjectPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            year: None,
        }
    }

    pub fn year(year: i32) -> Self {
        Self {
            title: None,
            year: Some(year),
        }
    }

    /// True when the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.year.is_none()
    }

    /// Write the present fields onto `project`.
    pub fn apply_to(&self, project: &mut Project) {
        if let Some(ref title) = self.title {
            project.title = title.clone();
        }
        if let Some(year) = self.year {
            project.year = year;
        }
    }
}

/// A field that can be edited inline from the project list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditableField {
    Title,
    Year,
}

impl EditableField {
    /// The string an editor for this field is seeded with.
    pub fn current_value(self, project: &Project) -> String {
        match self {
            EditableField::Title => project.title.clone(),
            EditableField::Year => project.year.to_string(),
        }
    }

    /// Validate pending editor text against the project.
    ///
    /// Returns `None` when the text is empty, unparseable or unchanged,
    /// in which case committing is a no-op.
    pub fn parse_change(self, project: &Project, pending: &str) -> Option<ProjectPatch> {
        let trimmed = pending.trim();
        match self {
            EditableField::Title => {
                if trimmed.is_empty() || trimmed == project.title {
                    None
                } else {
                    Some(ProjectPatch::title(trimmed))
                }
            }
            EditableField::Year => match trimmed.parse::<i32>() {
                Ok(year) if year != project.year => Some(ProjectPatch::year(year)),
                _ => None,
            },
        }
    }

    /// Copy this field's value from `source` onto `target`.
    pub fn copy_value(self, source: &Project, target: &mut Project) {
        match self {
            EditableField::Title => target.title = source.title.clone(),
            EditableField::Year => target.year = source.year,
        }
    }
}

/// Built-in sample portfolio used when no seed file is configured.
pub fn sample_projects() -> Vec<Project> {
    vec![
        Project::new(
            1,
            "AI Insight Dashboard",
            2023,
            "UX Research",
            "https://images.unsplash.com/photo-1551288049-bebda4e38f71?w=800&h=800&q=80",
            1,
        )
        .with_video("https://static.videezy.com/system/resources/previews/000/000/168/original/Record.mp4"),
        Project::new(
            2,
            "Data Flow Visualization",
            2023,
            "Analytics",
            "https://images.unsplash.com/photo-1522542550221-31fd19575a2d?w=800&h=800&q=80",
            2,
        )
        .with_video("https://static.videezy.com/system/resources/previews/000/000/128/original/Mobile.mp4"),
        Project::new(
            3,
            "Neural Network Explorer",
            2022,
            "Research",
            "https://images.unsplash.com/photo-1620712943543-bcc4688e7485?w=800&h=800&q=80",
            3,
        )
        .with_video("https://static.videezy.com/system/resources/previews/000/000/160/original/Typing.mp4"),
        Project::new(
            4,
            "Predictive Analytics Platform",
            2022,
            "Big Data",
            "https://images.unsplash.com/photo-1504868584819-f8e8b4b6d7e3?w=800&h=800&q=80",
            4,
        )
        .with_video("https://static.videezy.com/system/resources/previews/000/000/158/original/Analytics.mp4"),
        Project::new(
            5,
            "Machine Learning Interface",
            2022,
            "AI Design",
            "https://images.unsplash.com/photo-1488229297570-58520851e868?w=800&h=800&q=80",
            5,
        )
        .with_video("https://static.videezy.com/system/resources/previews/000/000/166/original/AI.mp4"),
        Project::new(
            6,
            "Data Pattern Recognition",
            2023,
            "Research",
            "https://images.unsplash.com/photo-1504868584819-f8e8b4b6d7e3?w=800&h=800&q=80",
            6,
        )
        .with_video("https://static.videezy.com/system/resources/previews/000/000/164/original/UX.mp4"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project() -> Project {
        Project::new(1, "A", 2022, "Research", "https://example.com/a.png", 1)
    }

    #[test]
    fn test_json_uses_camel_case_keys() {
        let json = serde_json::to_value(project().with_video("https://example.com/a.mp4")).unwrap();
        assert_eq!(json["imageUrl"], "https://example.com/a.png");
        assert_eq!(json["videoUrl"], "https://example.com/a.mp4");
        assert_eq!(json["type"], "Research");
        assert!(json.get("project_type").is_none());

        let without_video = serde_json::to_value(project()).unwrap();
        assert!(without_video.get("videoUrl").is_none());
    }

    #[test]
    fn test_patch_applies_only_present_fields() {
        let mut p = project();
        ProjectPatch::year(2025).apply_to(&mut p);
        assert_eq!(p.year, 2025);
        assert_eq!(p.title, "A");
        assert!(ProjectPatch::default().is_empty());
    }

    #[test]
    fn test_patch_rejects_fractional_year() {
        let parsed: Result<ProjectPatch, _> = serde_json::from_str(r#"{"year": 2025.5}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_title_change_validation() {
        let p = project();
        assert_eq!(EditableField::Title.parse_change(&p, "   "), None);
        assert_eq!(EditableField::Title.parse_change(&p, " A "), None);
        assert_eq!(
            EditableField::Title.parse_change(&p, "  New title "),
            Some(ProjectPatch::title("New title"))
        );
    }

    #[test]
    fn test_year_change_validation() {
        let p = project();
        assert_eq!(EditableField::Year.current_value(&p), "2022");
        assert_eq!(EditableField::Year.parse_change(&p, "twenty"), None);
        assert_eq!(EditableField::Year.parse_change(&p, "2022"), None);
        assert_eq!(EditableField::Year.parse_change(&p, " 2025 "), Some(ProjectPatch::year(2025)));
    }

    #[test]
    fn test_sample_projects_have_unique_ids() {
        let projects = sample_projects();
        let mut ids: Vec<_> = projects.iter().map(|p| p.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), projects.len());
    }
}
