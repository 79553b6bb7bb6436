//! Draw submission interface

use crate::renderer::{RenderLayer, RendererKind, SpriteRenderer};
use bytemuck::{Pod, Zeroable};
use retrofx_core::{Mat4, TextureId, Tint};
use serde::Serialize;

/// One sprite draw for the host pipeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub transform: Mat4,
    pub frame: usize,
    pub tint: Option<Tint>,
    /// Sort depth, perspective renderers only
    pub depth: Option<f32>,
}

/// Per-draw instance data, 96 bytes, matches the host's instance buffer
/// layout.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct DrawInstance {
    pub transform: [[f32; 4]; 4],
    pub tint: [f32; 4],
    /// frame, depth (-1 when none), renderer kind, translucent
    pub params: [f32; 4],
}

impl DrawCommand {
    pub fn to_instance(&self, renderer: &SpriteRenderer) -> DrawInstance {
        let kind = match renderer.kind {
            RendererKind::Billboard => 0.0,
            RendererKind::Backdrop => 1.0,
            RendererKind::UiOverlay => 2.0,
            RendererKind::Shadow => 3.0,
        };
        DrawInstance {
            transform: self.transform.to_cols_array_2d(),
            tint: self.tint.unwrap_or_default().to_array(),
            params: [
                self.frame as f32,
                self.depth.unwrap_or(-1.0),
                kind,
                if renderer.translucent { 1.0 } else { 0.0 },
            ],
        }
    }
}

/// Receives every draw the simulation produces
pub trait DrawSink {
    fn submit(&mut self, renderer: &SpriteRenderer, command: DrawCommand);
}

/// Sink that drops everything
#[derive(Debug, Default)]
pub struct NullSink;

impl DrawSink for NullSink {
    fn submit(&mut self, _renderer: &SpriteRenderer, _command: DrawCommand) {}
}

/// A submitted draw, flattened for inspection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedDraw {
    pub label: String,
    pub kind: RendererKind,
    pub layer: RenderLayer,
    pub texture: TextureId,
    pub frame: usize,
    pub transform: [f32; 16],
    pub tint: Option<[f32; 4]>,
    pub depth: Option<f32>,
}

impl RecordedDraw {
    pub fn translation(&self) -> [f32; 3] {
        [self.transform[12], self.transform[13], self.transform[14]]
    }
}

/// Sink that keeps every draw in submission order
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub draws: Vec<RecordedDraw>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.draws.clear();
    }

    /// Take the recorded draws, leaving the sink empty
    pub fn take(&mut self) -> Vec<RecordedDraw> {
        std::mem::take(&mut self.draws)
    }

    pub fn count_kind(&self, kind: RendererKind) -> usize {
        self.draws.iter().filter(|d| d.kind == kind).count()
    }

    pub fn count_label(&self, label: &str) -> usize {
        self.draws.iter().filter(|d| d.label == label).count()
    }
}

impl DrawSink for RecordingSink {
    fn submit(&mut self, renderer: &SpriteRenderer, command: DrawCommand) {
        self.draws.push(RecordedDraw {
            label: renderer.label.clone(),
            kind: renderer.kind,
            layer: renderer.layer,
            texture: renderer.texture(command.frame),
            frame: command.frame,
            transform: command.transform.to_cols_array(),
            tint: command.tint.map(|t| t.to_array()),
            depth: command.depth,
        });
    }
}
