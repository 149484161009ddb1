use std::fs;
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

// --- Configuration Structs ---

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1600.0,
            height: 900.0,
            title: "Graph Editor".to_string(),
        }
    }
}

/// Sizes that drive both drawing and picking.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct GraphConfig {
    pub vertex_radius: f32,
    pub selected_size_increase: f32,
    pub edge_thickness: f32,
    /// Multiplier on half the edge thickness used for right-click picking.
    pub edge_select_scale: f32,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            vertex_radius: 7.0,
            selected_size_increase: 1.5,
            edge_thickness: 5.0,
            edge_select_scale: 3.0,
        }
    }
}

impl GraphConfig {
    pub fn edge_pick_threshold(&self) -> f32 {
        self.edge_select_scale * (self.edge_thickness / 2.0)
    }

    pub fn selected_radius(&self) -> f32 {
        self.vertex_radius * self.selected_size_increase
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct NavigationConfig {
    /// Zoom change per wheel notch per second.
    pub sensitivity: f32,
    /// Cumulative zoom must stay strictly above this.
    pub min_zoom: f32,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            sensitivity: 3.0,
            min_zoom: 0.1,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct ThemeConfig {
    pub label_size: f32,
    pub background: Rgb,
    pub vertex: Rgb,
    pub edge: Rgb,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            label_size: 20.0,
            background: Rgb::new(255, 255, 255),
            vertex: Rgb::new(0, 0, 0),
            edge: Rgb::new(120, 120, 120),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct FileConfig {
    pub extension: String,
    /// Where Ctrl+S / Ctrl+O save and load.
    pub diagram_path: String,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            extension: ".gph".to_string(),
            diagram_path: "graph.gph".to_string(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default)]
pub struct EditorConfig {
    pub window: WindowConfig,
    pub graph: GraphConfig,
    pub navigation: NavigationConfig,
    pub theme: ThemeConfig,
    pub file: FileConfig,
}

// --- Configuration Loading Function ---

/// Reads `config_path`, falling back to defaults on any problem.
///
/// A missing file is created with the default configuration so it can be
/// edited for the next run.
pub fn load_config(config_path: &Path) -> EditorConfig {
    match fs::read_to_string(config_path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                info!("Loaded configuration from {}", config_path.display());
                config
            }
            Err(e) => {
                warn!(
                    "Failed to parse {}: {}. Using default configuration.",
                    config_path.display(),
                    e
                );
                EditorConfig::default()
            }
        },
        Err(_) => {
            info!(
                "{} not found. Using default configuration and creating a new one.",
                config_path.display()
            );
            let default_config = EditorConfig::default();
            match toml::to_string_pretty(&default_config) {
                Ok(toml_string) => {
                    if let Err(e) = fs::write(config_path, toml_string) {
                        warn!("Could not write default {}: {}", config_path.display(), e);
                    } else {
                        info!("Default {} created.", config_path.display());
                    }
                }
                Err(e) => {
                    warn!("Could not serialize default config: {}", e);
                }
            }
            default_config
        }
    }
}
