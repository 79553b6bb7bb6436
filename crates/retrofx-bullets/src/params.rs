//! Bullet type table

use retrofx_core::{Result, RetroError};
use retrofx_sprite::SpriteTable;
use serde::{Deserialize, Serialize};

/// Trail particle type meaning "leaves no trail"
pub const NO_TRAIL: u8 = 24;

/// A bullet type may carry at most this many billboards
pub const MAX_BILLBOARDS: u8 = 2;

const BULLET_TYPES: &str = include_str!("../data/bullet_types.toml");
const BULLET_FLIPBOOKS: &str = include_str!("../data/bullet_flipbooks.toml");

/// Per-type constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletTypeParams {
    /// Speed cap, world units per quantum
    pub mobility: f32,
    pub deceleration: f32,
    /// Lifetime in quanta; 0 leaves the animators in charge
    pub lifetime: u32,
    /// Index into the flipbook table
    pub flipbook1: Option<i64>,
    #[serde(default = "white")]
    pub flipbook1_color: [u8; 3],
    pub flipbook2: Option<i64>,
    #[serde(default = "white")]
    pub flipbook2_color: [u8; 3],
    #[serde(default = "no_trail")]
    pub trail_particle_type: u8,
    pub max_radius: f32,
    #[serde(default)]
    pub actor_flags: u32,
    pub billboards: u8,
    /// Model name for mesh-based bullets
    pub model: Option<String>,
}

fn white() -> [u8; 3] {
    [255, 255, 255]
}

fn no_trail() -> u8 {
    NO_TRAIL
}

impl BulletTypeParams {
    /// Flipbook references with their tint, in slot order
    pub fn flipbooks(&self) -> impl Iterator<Item = (i64, [u8; 3])> + '_ {
        [
            (self.flipbook1, self.flipbook1_color),
            (self.flipbook2, self.flipbook2_color),
        ]
        .into_iter()
        .filter_map(|(idx, color)| idx.map(|i| (i, color)))
    }

    pub fn has_trail(&self) -> bool {
        self.trail_particle_type != NO_TRAIL
    }
}

#[derive(Debug, Deserialize)]
struct BulletTableFile {
    #[serde(default)]
    bullet: Vec<BulletTypeParams>,
}

/// Bullet types indexed by type id
#[derive(Debug, Clone, Default)]
pub struct BulletTable {
    types: Vec<BulletTypeParams>,
}

impl BulletTable {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let file: BulletTableFile = toml::from_str(source)?;
        if file.bullet.len() > u8::MAX as usize + 1 {
            return Err(RetroError::InvalidConfig(format!(
                "{} bullet types, ids only go up to {}",
                file.bullet.len(),
                u8::MAX
            )));
        }
        Ok(Self { types: file.bullet })
    }

    /// The table shipped with the crate
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BULLET_TYPES)
    }

    pub fn get(&self, type_id: u8) -> Result<&BulletTypeParams> {
        self.types
            .get(type_id as usize)
            .ok_or(RetroError::BulletTypeNotFound(type_id))
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &BulletTypeParams)> {
        self.types.iter().enumerate().map(|(i, p)| (i as u8, p))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// The flipbook table bullet types index into
pub fn builtin_flipbooks() -> Result<SpriteTable> {
    SpriteTable::from_toml_str(BULLET_FLIPBOOKS)
}
