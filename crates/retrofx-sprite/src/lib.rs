//! retrofx Sprite - Animated sprites
//!
//! Provides:
//! - `SpriteMetadata` / `SpriteTable` - flipbook descriptions loaded from TOML
//! - `SpriteCache` - weak-keyed cache sharing one renderer per frameset
//! - `FlipbookAnimator` - per-instance frame advance and alpha/size envelope
//! - `BackdropRenderer` / `ShadowRenderer` - camera-scrolled sky layers and blob shadows

pub mod backdrop;
pub mod cache;
pub mod flipbook;
pub mod metadata;
pub mod shadow;

pub use backdrop::{BackdropConfig, BackdropRenderer};
pub use cache::SpriteCache;
pub use flipbook::FlipbookAnimator;
pub use metadata::{FlipbookKind, SpriteMetadata, SpriteTable};
pub use shadow::{ShadowRenderer, DEFAULT_SHADOW_SIZE};
