//! Weather configuration (parsed from TOML)

use retrofx_core::{Result, RetroError, TextureId};
use serde::{Deserialize, Serialize};

/// raindrop.bmp
pub const RAIN_TEXTURE: TextureId = TextureId(0xCB588DD9);
/// ai_snow.bmp
pub const SNOW_TEXTURE: TextureId = TextureId(0x1AF9F784);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherKind {
    Rain,
    Snow,
}

impl WeatherKind {
    pub fn texture(self) -> TextureId {
        match self {
            WeatherKind::Rain => RAIN_TEXTURE,
            WeatherKind::Snow => SNOW_TEXTURE,
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "rain" => Some(WeatherKind::Rain),
            "snow" => Some(WeatherKind::Snow),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherParams {
    pub kind: WeatherKind,
    /// Emission credit added per quantum; 64 credits buy one batch
    pub iterations_per_frame: f32,
    pub particles_per_iteration: u32,
    pub lifetime: u32,
    /// Quanta a particle lives at least (one more at random)
    pub particle_lifetime_min: i32,
    /// Alpha per depth layer, near to far
    pub alphas: [u8; 3],
    /// Base velocity, quarter pixels per quantum
    pub velocity: [f32; 2],
}

impl Default for WeatherParams {
    fn default() -> Self {
        Self {
            kind: WeatherKind::Rain,
            iterations_per_frame: 64.0,
            particles_per_iteration: 1,
            lifetime: 0,
            particle_lifetime_min: 60,
            alphas: [0xC0, 0x90, 0x60],
            velocity: [-8.0, 96.0],
        }
    }
}

impl WeatherParams {
    /// Parse a `[weather]` table. Missing fields keep their defaults,
    /// integers are accepted wherever floats are expected.
    pub fn from_toml(table: &toml::value::Table) -> Result<Self> {
        let mut params = Self::default();

        if let Some(v) = table.get("kind") {
            let name = v
                .as_str()
                .ok_or_else(|| RetroError::InvalidConfig("weather kind must be a string".into()))?;
            params.kind = WeatherKind::parse(name)
                .ok_or_else(|| RetroError::InvalidConfig(format!("unknown weather kind '{name}'")))?;
        }
        if let Some(v) = table.get("iterations_per_frame") {
            params.iterations_per_frame = toml_f32(v, params.iterations_per_frame);
        }
        if let Some(v) = table.get("particles_per_iteration") {
            params.particles_per_iteration = toml_u32(v, params.particles_per_iteration);
        }
        if let Some(v) = table.get("lifetime") {
            params.lifetime = toml_u32(v, params.lifetime);
        }
        if let Some(v) = table.get("particle_lifetime_min") {
            params.particle_lifetime_min = v.as_integer().map(|i| i as i32).unwrap_or(params.particle_lifetime_min);
        }
        if let Some(v) = table.get("alphas") {
            params.alphas = toml_alphas(v, params.alphas);
        }
        if let Some(v) = table.get("velocity") {
            params.velocity = toml_vec2(v, params.velocity);
        }

        Ok(params)
    }
}

fn toml_f32(v: &toml::Value, default: f32) -> f32 {
    v.as_float()
        .map(|f| f as f32)
        .or_else(|| v.as_integer().map(|i| i as f32))
        .unwrap_or(default)
}

fn toml_u32(v: &toml::Value, default: u32) -> u32 {
    v.as_integer()
        .and_then(|i| u32::try_from(i).ok())
        .unwrap_or(default)
}

fn toml_vec2(v: &toml::Value, default: [f32; 2]) -> [f32; 2] {
    if let Some(arr) = v.as_array() {
        if arr.len() >= 2 {
            return [toml_f32(&arr[0], default[0]), toml_f32(&arr[1], default[1])];
        }
    }
    default
}

fn toml_alphas(v: &toml::Value, default: [u8; 3]) -> [u8; 3] {
    if let Some(arr) = v.as_array() {
        if arr.len() >= 3 {
            let mut out = default;
            for (slot, value) in out.iter_mut().zip(arr) {
                if let Some(a) = value.as_integer() {
                    *slot = a.clamp(0, 255) as u8;
                }
            }
            return out;
        }
    }
    default
}
