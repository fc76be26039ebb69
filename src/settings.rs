use serde::{Deserialize, Serialize};

use crate::scene::DEFAULT_COLOR;

/// All user-configurable settings, persisted to JSON.
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub camera: CameraSettings,
    pub edit: EditSettings,
    pub material: MaterialSettings,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CameraSettings {
    pub fov_degrees: f32,
    pub near_plane: f32,
    pub far_plane: f32,
    pub position: [f32; 3],
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near_plane: 0.1,
            far_plane: 1000.0,
            position: [5.0, 5.0, 5.0],
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct EditSettings {
    /// Vertices closer than this move together when one is dragged.
    pub coincidence_epsilon: f32,
    /// Pick radius of the sphere drawn at each vertex in vertex mode.
    pub vertex_handle_radius: f32,
    /// Lower bound for each scale component set from the properties panel.
    pub min_scale: f32,
}

impl Default for EditSettings {
    fn default() -> Self {
        Self {
            coincidence_epsilon: 1e-4,
            vertex_handle_radius: 0.05,
            min_scale: 0.1,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct MaterialSettings {
    pub default_color: u32,
    pub default_opacity: f32,
}

impl Default for MaterialSettings {
    fn default() -> Self {
        Self {
            default_color: DEFAULT_COLOR,
            default_opacity: 1.0,
        }
    }
}

impl Settings {
    /// Load settings from config file. Falls back to defaults on error.
    pub fn load() -> Self {
        let path = config_path();
        if path.exists()
            && let Ok(data) = std::fs::read_to_string(&path)
        {
            match Self::from_json(&data) {
                Ok(settings) => return settings,
                Err(e) => log::warn!("Ignoring unreadable settings at {}: {e}", path.display()),
            }
        }
        Self::default()
    }

    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }

    /// Save settings to config file.
    pub fn save(&self) {
        let path = config_path();
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        match serde_json::to_string_pretty(self) {
            Ok(data) => {
                if let Err(e) = std::fs::write(&path, data) {
                    log::warn!("Failed to save settings to {}: {e}", path.display());
                }
            }
            Err(e) => log::warn!("Failed to serialize settings: {e}"),
        }
    }
}

fn config_path() -> std::path::PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    std::path::PathBuf::from(home).join(".config/meshedit/settings.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let settings = Settings::from_json(r#"{ "edit": { "coincidence_epsilon": 0.01 } }"#).unwrap();
        assert_eq!(settings.edit.coincidence_epsilon, 0.01);
        assert_eq!(settings.edit.vertex_handle_radius, 0.05);
        assert_eq!(settings.camera, CameraSettings::default());
        assert_eq!(settings.material.default_color, 0x44aa88);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(Settings::from_json("{ not json").is_err());
    }
}
