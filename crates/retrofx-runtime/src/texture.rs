//! Texture registry
//!
//! Stands in for the host's asset loader: maps texture ids to pixel
//! dimensions so renderers can size their quads.

use retrofx_core::{Result, RetroError, TextureId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Resolved texture dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextureInfo {
    pub id: TextureId,
    pub width: u32,
    pub height: u32,
}

/// `[[texture]]` table as it appears in manifests
#[derive(Debug, Deserialize)]
struct TextureManifest {
    #[serde(default)]
    texture: Vec<TextureInfo>,
}

#[derive(Debug, Default, Clone)]
pub struct TextureRegistry {
    textures: HashMap<TextureId, TextureInfo>,
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a manifest of `[[texture]]` entries
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let manifest: TextureManifest = toml::from_str(source)?;
        let mut registry = Self::new();
        for info in manifest.texture {
            registry.insert(info);
        }
        Ok(registry)
    }

    pub fn register(&mut self, id: TextureId, width: u32, height: u32) {
        self.insert(TextureInfo { id, width, height });
    }

    pub fn insert(&mut self, info: TextureInfo) {
        if self.textures.insert(info.id, info).is_some() {
            log::debug!(target: "textures", "replaced texture {}", info.id);
        }
    }

    /// Look up a texture, failing if the host never registered it
    pub fn resolve(&self, id: TextureId) -> Result<TextureInfo> {
        self.textures
            .get(&id)
            .copied()
            .ok_or(RetroError::TextureNotFound(id.0))
    }

    pub fn contains(&self, id: TextureId) -> bool {
        self.textures.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_registered() {
        let mut reg = TextureRegistry::new();
        reg.register(TextureId(0xCB588DD9), 8, 32);
        let info = reg.resolve(TextureId(0xCB588DD9)).unwrap();
        assert_eq!((info.width, info.height), (8, 32));
    }

    #[test]
    fn unregistered_is_an_error() {
        let reg = TextureRegistry::new();
        let err = reg.resolve(TextureId(0x1234)).unwrap_err();
        assert!(matches!(err, RetroError::TextureNotFound(0x1234)));
    }

    #[test]
    fn parse_manifest() {
        let reg = TextureRegistry::from_toml_str(
            r#"
[[texture]]
id = 0x147b7297
width = 32
height = 32

[[texture]]
id = 0x1AF9F784
width = 16
height = 16
"#,
        )
        .unwrap();
        assert_eq!(reg.len(), 2);
        assert!(reg.contains(TextureId(0x147b7297)));
    }
}
