//! Flipbook metadata and sprite tables
//!
//! A sprite table is a TOML document with a `[framesets]` map from names to
//! ordered texture ids and a list of `[[flipbook]]` entries referencing
//! those framesets by name:
//!
//! ```toml
//! [framesets]
//! smk = [0x3a1c0001, 0x3a1c0002]
//!
//! [[flipbook]]
//! frameset = "smk"
//! frame_delay = 16
//! kind = "oneshot"
//! start_alpha = 200
//! end_alpha = 32
//! start_size = 128
//! end_size = 128
//! flags = 0x10000
//! ```

use retrofx_core::{Result, RetroError, TextureId, TRANSLUCENT_FLAG};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::rc::Rc;

/// Playback policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlipbookKind {
    Oneshot,
    Looping,
    RandomStartLooping,
}

/// Immutable description of an animated sprite
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpriteMetadata {
    /// Frameset name, for diagnostics
    pub name: String,
    pub frameset: Vec<TextureId>,
    /// Sub-frame delay; negative disables animation
    pub frame_delay: i32,
    pub kind: FlipbookKind,
    pub start_alpha: u8,
    pub end_alpha: u8,
    pub start_size: f32,
    pub end_size: f32,
    pub flags: u32,
}

impl SpriteMetadata {
    /// Fading sprites and sprites flagged additive need blending
    pub fn is_translucent(&self) -> bool {
        self.start_alpha != self.end_alpha || self.flags & TRANSLUCENT_FLAG != 0
    }

    pub fn frame_count(&self) -> usize {
        self.frameset.len()
    }

    pub fn loops(&self) -> bool {
        self.kind != FlipbookKind::Oneshot
    }
}

#[derive(Debug, Deserialize)]
struct FlipbookEntry {
    frameset: String,
    #[serde(default)]
    frame_delay: i32,
    kind: FlipbookKind,
    #[serde(default = "opaque")]
    start_alpha: u8,
    #[serde(default = "opaque")]
    end_alpha: u8,
    start_size: f32,
    end_size: f32,
    #[serde(default)]
    flags: u32,
}

fn opaque() -> u8 {
    255
}

#[derive(Debug, Deserialize)]
struct SpriteTableFile {
    framesets: BTreeMap<String, Vec<TextureId>>,
    #[serde(default)]
    flipbook: Vec<FlipbookEntry>,
}

/// Indexed, read-only table of flipbook metadata
#[derive(Debug, Clone, Default)]
pub struct SpriteTable {
    framesets: BTreeMap<String, Vec<TextureId>>,
    entries: Vec<Rc<SpriteMetadata>>,
}

impl SpriteTable {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let file: SpriteTableFile = toml::from_str(source)?;

        let mut entries = Vec::with_capacity(file.flipbook.len());
        for (idx, entry) in file.flipbook.into_iter().enumerate() {
            let frameset = file
                .framesets
                .get(&entry.frameset)
                .ok_or_else(|| RetroError::FramesetNotFound(entry.frameset.clone()))?;
            if frameset.is_empty() {
                return Err(RetroError::InvalidConfig(format!(
                    "flipbook {idx} uses empty frameset '{}'",
                    entry.frameset
                )));
            }
            entries.push(Rc::new(SpriteMetadata {
                name: entry.frameset,
                frameset: frameset.clone(),
                frame_delay: entry.frame_delay,
                kind: entry.kind,
                start_alpha: entry.start_alpha,
                end_alpha: entry.end_alpha,
                start_size: entry.start_size,
                end_size: entry.end_size,
                flags: entry.flags,
            }));
        }

        Ok(Self {
            framesets: file.framesets,
            entries,
        })
    }

    /// Entry by table index. Negative and out-of-range indices are errors.
    pub fn get(&self, index: i64) -> Result<Rc<SpriteMetadata>> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.entries.get(i))
            .cloned()
            .ok_or(RetroError::SpriteNotFound(index))
    }

    pub fn frameset(&self, name: &str) -> Option<&[TextureId]> {
        self.framesets.get(name).map(|f| f.as_slice())
    }

    /// Every texture any entry can draw, deduplicated
    pub fn textures(&self) -> Vec<TextureId> {
        let mut ids: Vec<TextureId> = self.framesets.values().flatten().copied().collect();
        ids.sort();
        ids.dedup();
        ids
    }

    pub fn entries(&self) -> &[Rc<SpriteMetadata>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"
[framesets]
puff = [0x100, 0x101, 0x102]
dot = [0x200]

[[flipbook]]
frameset = "puff"
frame_delay = 16
kind = "oneshot"
start_alpha = 200
end_alpha = 32
start_size = 128
end_size = 128
flags = 0x10000

[[flipbook]]
frameset = "dot"
kind = "looping"
start_size = 64
end_size = 64
"#;

    #[test]
    fn parse_table() {
        let table = SpriteTable::from_toml_str(TABLE).unwrap();
        assert_eq!(table.len(), 2);

        let puff = table.get(0).unwrap();
        assert_eq!(puff.frame_count(), 3);
        assert_eq!(puff.frameset[1], TextureId(0x101));
        assert_eq!(puff.kind, FlipbookKind::Oneshot);
        assert!(!puff.loops());
        assert!(puff.is_translucent());

        let dot = table.get(1).unwrap();
        assert_eq!(dot.start_alpha, 255);
        assert_eq!(dot.frame_delay, 0);
        assert!(!dot.is_translucent());
    }

    #[test]
    fn bad_indices_are_errors() {
        let table = SpriteTable::from_toml_str(TABLE).unwrap();
        assert!(matches!(table.get(-1), Err(RetroError::SpriteNotFound(-1))));
        assert!(matches!(table.get(2), Err(RetroError::SpriteNotFound(2))));
    }

    #[test]
    fn unknown_frameset_is_an_error() {
        let err = SpriteTable::from_toml_str(
            r#"
[framesets]
a = [1]

[[flipbook]]
frameset = "b"
kind = "looping"
start_size = 1
end_size = 1
"#,
        )
        .unwrap_err();
        assert!(matches!(err, RetroError::FramesetNotFound(name) if name == "b"));
    }

    #[test]
    fn fading_sprite_is_translucent_without_flag() {
        let meta = SpriteMetadata {
            name: "x".into(),
            frameset: vec![TextureId(1)],
            frame_delay: 0,
            kind: FlipbookKind::Looping,
            start_alpha: 255,
            end_alpha: 0,
            start_size: 1.0,
            end_size: 1.0,
            flags: 0,
        };
        assert!(meta.is_translucent());
    }

    #[test]
    fn textures_are_deduplicated() {
        let table = SpriteTable::from_toml_str(TABLE).unwrap();
        assert_eq!(table.textures(), vec![TextureId(0x100), TextureId(0x101), TextureId(0x102), TextureId(0x200)]);
        assert_eq!(table.frameset("dot"), Some(&[TextureId(0x200)][..]));
    }
}
