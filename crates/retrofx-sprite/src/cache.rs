//! Reference-counted sprite resource cache
//!
//! Animators that share a frameset share one `SpriteRenderer`. The cache only
//! holds weak references; the resource is freed when the last animator using
//! it drops, and dead entries are pruned on the next lookup.

use crate::metadata::SpriteMetadata;
use retrofx_core::{Result, TextureId};
use retrofx_runtime::{SpriteRenderer, TextureRegistry};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

#[derive(Debug, Default)]
pub struct SpriteCache {
    entries: HashMap<Vec<TextureId>, Weak<SpriteRenderer>>,
    created: usize,
}

impl SpriteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared billboard renderer for `meta`'s frameset, built on first use.
    /// Translucency is fixed by whichever metadata created the entry.
    pub fn acquire(&mut self, textures: &TextureRegistry, meta: &SpriteMetadata) -> Result<Rc<SpriteRenderer>> {
        self.prune();

        if let Some(renderer) = self.entries.get(&meta.frameset).and_then(Weak::upgrade) {
            return Ok(renderer);
        }

        let renderer = Rc::new(SpriteRenderer::billboard(
            textures,
            meta.name.clone(),
            &meta.frameset,
            meta.is_translucent(),
        )?);
        log::debug!(
            target: "sprite",
            "created sprite resource '{}' ({} frames, translucent: {})",
            meta.name,
            meta.frame_count(),
            renderer.translucent
        );
        self.entries.insert(meta.frameset.clone(), Rc::downgrade(&renderer));
        self.created += 1;
        Ok(renderer)
    }

    /// Drop entries whose last owner is gone. Returns how many were removed.
    pub fn prune(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|frameset, weak| {
            let alive = weak.strong_count() > 0;
            if !alive {
                log::debug!(target: "sprite", "released sprite resource {:?}", frameset);
            }
            alive
        });
        before - self.entries.len()
    }

    /// Resources that still have at least one owner
    pub fn live_count(&self) -> usize {
        self.entries.values().filter(|w| w.strong_count() > 0).count()
    }

    /// Total resources built over the cache's lifetime
    pub fn created_count(&self) -> usize {
        self.created
    }

    pub fn contains(&self, frameset: &[TextureId]) -> bool {
        self.entries.get(frameset).is_some_and(|w| w.strong_count() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::FlipbookKind;
    use retrofx_core::RetroError;

    fn meta(frames: &[u32], start_alpha: u8, end_alpha: u8) -> SpriteMetadata {
        SpriteMetadata {
            name: "test".into(),
            frameset: frames.iter().map(|f| TextureId(*f)).collect(),
            frame_delay: 0,
            kind: FlipbookKind::Looping,
            start_alpha,
            end_alpha,
            start_size: 1.0,
            end_size: 1.0,
            flags: 0,
        }
    }

    fn textures() -> TextureRegistry {
        let mut reg = TextureRegistry::new();
        for id in 1..=4 {
            reg.register(TextureId(id), 16, 16);
        }
        reg
    }

    #[test]
    fn same_frameset_shares_resource() {
        let reg = textures();
        let mut cache = SpriteCache::new();
        let a = cache.acquire(&reg, &meta(&[1, 2], 255, 255)).unwrap();
        let b = cache.acquire(&reg, &meta(&[1, 2], 200, 30)).unwrap();
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(cache.live_count(), 1);
        assert_eq!(cache.created_count(), 1);
        // first creator decided blending
        assert!(!b.translucent);
    }

    #[test]
    fn different_framesets_are_distinct() {
        let reg = textures();
        let mut cache = SpriteCache::new();
        let _a = cache.acquire(&reg, &meta(&[1, 2], 255, 255)).unwrap();
        let _b = cache.acquire(&reg, &meta(&[3], 255, 255)).unwrap();
        assert_eq!(cache.live_count(), 2);
    }

    #[test]
    fn last_owner_drop_frees_resource() {
        let reg = textures();
        let mut cache = SpriteCache::new();
        let a = cache.acquire(&reg, &meta(&[1], 255, 255)).unwrap();
        let b = Rc::clone(&a);
        drop(a);
        assert_eq!(cache.live_count(), 1);
        drop(b);
        assert_eq!(cache.live_count(), 0);
        assert!(!cache.contains(&[TextureId(1)]));
        assert_eq!(cache.prune(), 1);

        // rebuilt on the next lookup
        let _c = cache.acquire(&reg, &meta(&[1], 255, 255)).unwrap();
        assert_eq!(cache.created_count(), 2);
    }

    #[test]
    fn unresolved_texture_fails_acquire() {
        let reg = textures();
        let mut cache = SpriteCache::new();
        let err = cache.acquire(&reg, &meta(&[1, 77], 255, 255)).unwrap_err();
        assert!(matches!(err, RetroError::TextureNotFound(77)));
        assert_eq!(cache.live_count(), 0);
    }
}
