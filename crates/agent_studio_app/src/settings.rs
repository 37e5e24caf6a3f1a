// SPDX-License-Identifier: MIT OR Apache-2.0
//! Studio settings, stored as RON next to the working directory.

use crate::app::{Result, StudioError};
use agent_studio_graph::ui::GRID_SPACING;
use agent_studio_graph::CanvasMetrics;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings file looked up in the working directory
pub const SETTINGS_FILE_NAME: &str = "agent_studio.ron";

/// Main window settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    /// Window title
    pub title: String,
    /// Initial inner size in logical pixels
    pub size: [u32; 2],
    /// Minimum inner size in logical pixels
    pub min_size: [u32; 2],
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Agent Studio".to_string(),
            size: [1600, 900],
            min_size: [800, 600],
        }
    }
}

/// Canvas display settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasSettings {
    /// Draw the background grid
    pub show_grid: bool,
    /// Grid spacing in logical pixels
    pub grid_spacing: f32,
    /// Node card and connector layout
    pub metrics: CanvasMetrics,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            show_grid: true,
            grid_spacing: GRID_SPACING,
            metrics: CanvasMetrics::default(),
        }
    }
}

/// All studio settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioSettings {
    /// Main window
    pub window: WindowSettings,
    /// Canvas
    pub canvas: CanvasSettings,
}

impl StudioSettings {
    /// Parse settings from RON text
    pub fn from_ron(content: &str) -> Result<Self> {
        ron::from_str(content).map_err(|e| StudioError::Settings(e.to_string()))
    }

    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_ron(&content)
    }

    /// Load settings from `path` if it exists.
    ///
    /// A missing file yields defaults silently; an unreadable or malformed
    /// one yields defaults with a warning.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!("No settings file at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::load(path) {
            Ok(settings) => {
                tracing::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                tracing::warn!("Ignoring settings file {}: {e}", path.display());
                Self::default()
            }
        }
    }
}
