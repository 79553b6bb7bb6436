//! retrofx Runtime - Host-facing plumbing
//!
//! Provides the pieces every simulated component shares:
//! - `QuantumTimer` - fixed-quantum accumulator, one step per host frame at most
//! - `FrameInput` - elapsed time, camera matrices and viewport from the host
//! - `TextureRegistry` - texture id to pixel dimensions
//! - `SpriteRenderer` / `DrawSink` - renderer variants and draw submission
//! - `SimSystem` - trait for systems ticked by the simulation

mod clock;
mod draw;
mod frame;
mod renderer;
mod system;
mod texture;

pub use clock::{QuantumTimer, Threshold};
pub use draw::{DrawCommand, DrawInstance, DrawSink, NullSink, RecordedDraw, RecordingSink};
pub use frame::FrameInput;
pub use renderer::{
    Projection, RenderLayer, RendererKind, SpriteRect, SpriteRenderer, TexWrap, ORTHO_WIDTH,
    SHADOW_TEXTURE,
};
pub use system::{SimSystem, TickContext};
pub use texture::{TextureInfo, TextureRegistry};
