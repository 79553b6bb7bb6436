//! retrofx Core - Foundational types for the retrofx simulation
//!
//! This crate provides the pieces every simulation crate depends on:
//! - `RetroError` / `Result` - error type shared across the workspace
//! - `LegacyRng` - the legacy engine's bit-register PRNG
//! - Angle and interpolation helpers matching the legacy engine's math
//! - `Tint`, `TextureId` and timing constants

mod error;
pub mod math;
mod rng;
mod types;

pub use error::{Result, RetroError};
pub use rng::LegacyRng;
pub use types::{TextureId, Tint, SRC_FRAME_TO_MS, TRANSLUCENT_FLAG};

/// Re-exported so downstream crates agree on one matrix/vector type
pub use glam::{Mat4, Quat, Vec2, Vec3};
