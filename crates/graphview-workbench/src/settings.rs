use crate::panels::PanelConfig;
use graphview_events::LayoutName;
use graphview_graph::{ConnectionPolicy, LayoutParams};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Settings format error: {0}")]
    Format(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkbenchSettings {
    pub display: GraphDisplaySettings,
    pub connection: ConnectionPolicy,
    pub layout_name: LayoutName,
    pub layout: LayoutParams,
    pub panels: Vec<PanelConfig>,
    pub window_height: f32,
}

impl Default for WorkbenchSettings {
    fn default() -> Self {
        let window_height = 900.0;
        Self {
            display: GraphDisplaySettings::default(),
            connection: ConnectionPolicy::default(),
            layout_name: LayoutName::default(),
            layout: LayoutParams::default(),
            panels: vec![
                PanelConfig::side("inspector"),
                PanelConfig::tools_flyout("tools"),
                PanelConfig::bottom("results", window_height),
            ],
            window_height,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDisplaySettings {
    pub show_labels: bool,
    /// Bezier edges when set, straight otherwise.
    pub curved_edges: bool,
    pub animated_edges: bool,
    #[serde(default = "default_true")]
    pub show_minimap: bool,
    #[serde(default)]
    pub show_legend: bool,
}

fn default_true() -> bool {
    true
}

impl Default for GraphDisplaySettings {
    fn default() -> Self {
        Self {
            show_labels: true,
            curved_edges: true,
            animated_edges: true,
            show_minimap: true,
            show_legend: false,
        }
    }
}

impl WorkbenchSettings {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("graphview").join("settings.json"))
    }

    /// Load from the user config directory, falling back to defaults.
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            tracing::info!("No config directory, using default settings");
            return Self::default();
        };
        tracing::info!("Loading settings from {:?}", path);
        if !path.exists() {
            tracing::info!("Settings file not found, using defaults");
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(settings) => {
                tracing::info!("Settings loaded successfully");
                settings
            }
            Err(e) => {
                tracing::error!("Failed to load settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self) -> Result<(), SettingsError> {
        match Self::default_path() {
            Some(path) => self.save_to(&path),
            None => {
                tracing::warn!("No config directory, settings not saved");
                Ok(())
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(dir) = path.parent()
            && !dir.exists()
        {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        tracing::info!("Saved settings to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let mut settings = WorkbenchSettings::default();
        settings.display.curved_edges = false;
        settings.connection.allow_self_loops = true;
        settings.layout.tightness = 8;
        settings.layout_name = LayoutName::Hierarchy;

        settings.save_to(&path).unwrap();
        let loaded = WorkbenchSettings::load_from(&path).unwrap();

        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "display": { "show_labels": false, "curved_edges": true, "animated_edges": false } }"#).unwrap();

        let loaded = WorkbenchSettings::load_from(&path).unwrap();

        assert!(!loaded.display.show_labels);
        assert!(loaded.display.show_minimap);
        assert_eq!(loaded.layout, LayoutParams::default());
        assert_eq!(loaded.panels.len(), 3);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            WorkbenchSettings::load_from(&path),
            Err(SettingsError::Format(_))
        ));
    }
}
