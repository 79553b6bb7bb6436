//! Scenario file format definitions

use crate::camera::CameraPath;
use retrofx_core::LegacyRng;
use retrofx_runtime::TextureInfo;
use retrofx_sprite::BackdropConfig;
use serde::Deserialize;

/// Root structure of a scenario TOML file
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioFile {
    pub scenario: ScenarioMeta,
    /// Extra `[[texture]]` registrations on top of the builtin set
    #[serde(default)]
    pub texture: Vec<TextureInfo>,
    /// Raw `[weather]` table, parsed by `WeatherParams::from_toml`
    #[serde(default)]
    pub weather: Option<toml::value::Table>,
    #[serde(default)]
    pub backdrop: Vec<BackdropConfig>,
    #[serde(default)]
    pub spawn: Vec<SpawnEvent>,
    #[serde(default)]
    pub camera: CameraPath,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioMeta {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_seed")]
    pub seed: u32,
    /// Viewport width and height in pixels
    #[serde(default = "default_viewport")]
    pub viewport: [f32; 2],
    /// Register the builtin frameset, weather and shadow textures
    #[serde(default = "default_true")]
    pub builtin_textures: bool,
    /// Draw a blob shadow under every active bullet
    #[serde(default)]
    pub shadows: bool,
    #[serde(default)]
    pub ground_y: f32,
}

fn default_seed() -> u32 {
    LegacyRng::new().state()
}

fn default_viewport() -> [f32; 2] {
    [640.0, 480.0]
}

fn default_true() -> bool {
    true
}

/// A bullet fired at the start of a given host frame
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SpawnEvent {
    pub frame: u64,
    #[serde(rename = "type")]
    pub bullet_type: u8,
    pub position: [f32; 3],
    #[serde(default)]
    pub velocity: [f32; 3],
}
