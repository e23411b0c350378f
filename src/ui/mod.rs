// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the folio viewer.

pub mod admin;
pub mod preview;
pub mod project_list;
pub mod roadmap;
