//! Simulation system trait

use crate::draw::DrawSink;
use crate::frame::FrameInput;
use retrofx_core::{LegacyRng, Result};

/// Borrowed per-tick state handed to every system
pub struct TickContext<'a> {
    pub frame: &'a FrameInput,
    pub rng: &'a mut LegacyRng,
    pub sink: &'a mut dyn DrawSink,
}

impl<'a> TickContext<'a> {
    pub fn new(frame: &'a FrameInput, rng: &'a mut LegacyRng, sink: &'a mut dyn DrawSink) -> Self {
        Self { frame, rng, sink }
    }
}

/// A component ticked once per host frame
///
/// Systems are updated in registration order. Each one accumulates
/// `frame.elapsed_ms` against its own quantum and draws every tick.
pub trait SimSystem {
    /// Advance and draw
    fn update(&mut self, ctx: &mut TickContext<'_>) -> Result<()>;

    /// Human-readable name for this system
    fn name(&self) -> &str;

    /// Number of live simulated objects
    fn live_count(&self) -> usize;
}
