//! Sprite renderer variants
//!
//! A `SpriteRenderer` is the draw resource behind every animated sprite:
//! the ordered frame textures, the quad rect derived from their size and the
//! pipeline state of its variant. Simulation code never rasterizes; it hands
//! a renderer plus a `DrawCommand` to the host's `DrawSink`.

use crate::draw::{DrawCommand, DrawSink};
use crate::frame::FrameInput;
use crate::texture::{TextureInfo, TextureRegistry};
use retrofx_core::{Mat4, Result, RetroError, TextureId, Tint};
use serde::{Deserialize, Serialize};

/// Fixed texture used for blob shadows
pub const SHADOW_TEXTURE: TextureId = TextureId(0x147b7297);

/// Width of the orthographic overlay space, height follows the aspect
pub const ORTHO_WIDTH: f32 = 640.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RendererKind {
    /// Camera-facing unit quad in world space
    Billboard,
    /// Full-screen scrolling sky/horizon layer
    Backdrop,
    /// Pixel-sized quad in overlay space (weather)
    UiOverlay,
    /// World-space quad that does not face the camera
    Shadow,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Projection {
    Perspective,
    Orthographic { width: f32, height: f32 },
}

/// Sort bucket a draw lands in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderLayer {
    Backdrop(u32),
    OpaqueBillboard,
    TranslucentBillboard,
    Footprints,
    Weather,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TexWrap {
    Clamp,
    Repeat,
}

impl RendererKind {
    pub fn is_billboard(self) -> bool {
        matches!(self, RendererKind::Billboard)
    }

    pub fn is_orthographic(self) -> bool {
        matches!(self, RendererKind::Backdrop | RendererKind::UiOverlay)
    }

    pub fn projection(self, frame: &FrameInput) -> Projection {
        if self.is_orthographic() {
            Projection::Orthographic {
                width: ORTHO_WIDTH,
                height: ORTHO_WIDTH / frame.aspect(),
            }
        } else {
            Projection::Perspective
        }
    }
}

/// Quad placement and texture coordinates. S/T are in 1/32 texel units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SpriteRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub ul_s: f32,
    pub ul_t: f32,
    pub lr_s: f32,
    pub lr_t: f32,
}

impl SpriteRect {
    /// Unit quad centred on the origin
    pub fn unit(tex: &TextureInfo) -> Self {
        Self {
            x: -0.5,
            y: -0.5,
            width: 1.0,
            height: 1.0,
            ul_s: 0.0,
            ul_t: 0.0,
            lr_s: tex.width as f32 * 32.0,
            lr_t: tex.height as f32 * 32.0,
        }
    }

    /// Quad the size of the texture in pixels, centred on the origin
    pub fn pixel(tex: &TextureInfo) -> Self {
        let (w, h) = (tex.width as f32, tex.height as f32);
        Self {
            x: -w / 2.0,
            y: -h / 2.0,
            width: w,
            height: h,
            ul_s: 0.0,
            ul_t: 0.0,
            lr_s: w * 32.0,
            lr_t: h * 32.0,
        }
    }

    /// Double-width backdrop strip. Texture runs right to left so the S
    /// coordinate starts at the far edge.
    pub fn backdrop(tex: &TextureInfo, scale_x: f32, scale_y: f32, flip_y: bool) -> Self {
        let width = tex.width as f32 * 2.0;
        let height = tex.height as f32;
        let mut rect = Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
            ul_s: width * 32.0,
            ul_t: height * 32.0,
            lr_s: 0.0,
            lr_t: 0.0,
        };
        if flip_y {
            std::mem::swap(&mut rect.ul_t, &mut rect.lr_t);
        }
        rect.width *= scale_x / 1024.0;
        rect.height *= scale_y / 1024.0;
        rect
    }

    /// Two triangles as `[x, y, s, t]`, S/T normalised to texels
    pub fn quad_vertices(&self) -> [[f32; 4]; 6] {
        let (x0, y0) = (self.x, self.y);
        let (x1, y1) = (self.x + self.width, self.y + self.height);
        let (s0, t0) = (self.ul_s / 32.0, self.ul_t / 32.0);
        let (s1, t1) = (self.lr_s / 32.0, self.lr_t / 32.0);
        [
            [x0, y0, s0, t1],
            [x1, y0, s1, t1],
            [x0, y1, s0, t0],
            [x0, y1, s0, t0],
            [x1, y0, s1, t1],
            [x1, y1, s1, t0],
        ]
    }
}

/// Shared draw resource for one frameset in one variant
#[derive(Debug, Clone)]
pub struct SpriteRenderer {
    pub kind: RendererKind,
    /// Cache key / diagnostic label
    pub label: String,
    pub frames: Vec<TextureInfo>,
    pub rect: SpriteRect,
    pub layer: RenderLayer,
    pub wrap_s: TexWrap,
    pub translucent: bool,
}

impl SpriteRenderer {
    fn resolve_frames(textures: &TextureRegistry, frames: &[TextureId]) -> Result<Vec<TextureInfo>> {
        if frames.is_empty() {
            return Err(RetroError::InvalidConfig("sprite has no frames".into()));
        }
        frames.iter().map(|id| textures.resolve(*id)).collect()
    }

    /// World-space billboard; translucent sprites sort after opaque ones
    pub fn billboard(
        textures: &TextureRegistry,
        label: impl Into<String>,
        frames: &[TextureId],
        translucent: bool,
    ) -> Result<Self> {
        let frames = Self::resolve_frames(textures, frames)?;
        Ok(Self {
            kind: RendererKind::Billboard,
            label: label.into(),
            rect: SpriteRect::unit(&frames[0]),
            frames,
            layer: if translucent {
                RenderLayer::TranslucentBillboard
            } else {
                RenderLayer::OpaqueBillboard
            },
            wrap_s: TexWrap::Clamp,
            translucent,
        })
    }

    /// Overlay-space sprite used for weather debris
    pub fn ui_overlay(textures: &TextureRegistry, label: impl Into<String>, frames: &[TextureId]) -> Result<Self> {
        let frames = Self::resolve_frames(textures, frames)?;
        Ok(Self {
            kind: RendererKind::UiOverlay,
            label: label.into(),
            rect: SpriteRect::pixel(&frames[0]),
            frames,
            layer: RenderLayer::Weather,
            wrap_s: TexWrap::Clamp,
            translucent: true,
        })
    }

    pub fn shadow(textures: &TextureRegistry) -> Result<Self> {
        let frames = Self::resolve_frames(textures, &[SHADOW_TEXTURE])?;
        Ok(Self {
            kind: RendererKind::Shadow,
            label: "shadow".into(),
            rect: SpriteRect::unit(&frames[0]),
            frames,
            layer: RenderLayer::Footprints,
            wrap_s: TexWrap::Clamp,
            translucent: true,
        })
    }

    pub fn backdrop(
        textures: &TextureRegistry,
        texture: TextureId,
        scale_x: f32,
        scale_y: f32,
        flip_y: bool,
        sort_key: u32,
    ) -> Result<Self> {
        let frames = Self::resolve_frames(textures, &[texture])?;
        Ok(Self {
            kind: RendererKind::Backdrop,
            label: format!("backdrop {texture}"),
            rect: SpriteRect::backdrop(&frames[0], scale_x, scale_y, flip_y),
            frames,
            layer: RenderLayer::Backdrop(sort_key),
            wrap_s: TexWrap::Repeat,
            translucent: false,
        })
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Texture for a frame index, clamped to the last frame
    pub fn texture(&self, frame: usize) -> TextureId {
        let last = self.frames.len().saturating_sub(1);
        self.frames[frame.min(last)].id
    }

    /// Submit one draw. Perspective variants report their distance from
    /// the camera as the sort depth.
    pub fn draw(
        &self,
        sink: &mut dyn DrawSink,
        frame_input: &FrameInput,
        transform: Mat4,
        frame: usize,
        tint: Option<Tint>,
    ) {
        debug_assert!(frame < self.frames.len(), "frame {frame} out of range for {}", self.label);
        let depth = if self.kind.is_orthographic() {
            None
        } else {
            Some(frame_input.eye_position().distance(transform.w_axis.truncate()))
        };
        sink.submit(
            self,
            DrawCommand {
                transform,
                frame,
                tint,
                depth,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::RecordingSink;
    use retrofx_core::Vec3;

    fn registry() -> TextureRegistry {
        let mut reg = TextureRegistry::new();
        reg.register(TextureId(1), 16, 8);
        reg.register(TextureId(2), 16, 8);
        reg.register(SHADOW_TEXTURE, 32, 32);
        reg
    }

    #[test]
    fn billboard_rect_is_unit_quad() {
        let r = SpriteRenderer::billboard(&registry(), "fx", &[TextureId(1), TextureId(2)], false).unwrap();
        assert_eq!(r.rect.x, -0.5);
        assert_eq!(r.rect.width, 1.0);
        assert_eq!(r.rect.lr_s, 16.0 * 32.0);
        assert_eq!(r.rect.lr_t, 8.0 * 32.0);
        assert_eq!(r.layer, RenderLayer::OpaqueBillboard);
        assert!(r.kind.is_billboard());
    }

    #[test]
    fn translucent_billboard_layer() {
        let r = SpriteRenderer::billboard(&registry(), "fx", &[TextureId(1)], true).unwrap();
        assert_eq!(r.layer, RenderLayer::TranslucentBillboard);
    }

    #[test]
    fn unresolved_frame_fails() {
        let err = SpriteRenderer::billboard(&registry(), "fx", &[TextureId(1), TextureId(99)], false).unwrap_err();
        assert!(matches!(err, RetroError::TextureNotFound(99)));
    }

    #[test]
    fn backdrop_rect_scaling_and_flip() {
        let rect = SpriteRect::backdrop(
            &TextureInfo {
                id: TextureId(1),
                width: 64,
                height: 32,
            },
            2048.0,
            512.0,
            false,
        );
        assert_eq!(rect.width, 256.0);
        assert_eq!(rect.height, 16.0);
        assert_eq!(rect.ul_s, 128.0 * 32.0);
        assert_eq!(rect.ul_t, 32.0 * 32.0);
        assert_eq!(rect.lr_t, 0.0);

        let flipped = SpriteRect::backdrop(
            &TextureInfo {
                id: TextureId(1),
                width: 64,
                height: 32,
            },
            1024.0,
            1024.0,
            true,
        );
        assert_eq!(flipped.ul_t, 0.0);
        assert_eq!(flipped.lr_t, 32.0 * 32.0);
    }

    #[test]
    fn perspective_draw_reports_depth() {
        let r = SpriteRenderer::shadow(&registry()).unwrap();
        let frame = FrameInput::new(16.0, 640.0, 480.0).with_camera(Mat4::from_translation(Vec3::new(0.0, 0.0, 10.0)));
        let mut sink = RecordingSink::new();
        r.draw(&mut sink, &frame, Mat4::from_translation(Vec3::new(0.0, 0.0, 4.0)), 0, None);
        let depth = sink.draws[0].depth.unwrap();
        assert!((depth - 6.0).abs() < 1e-5);
    }

    #[test]
    fn ortho_draw_has_no_depth() {
        let r = SpriteRenderer::ui_overlay(&registry(), "rain", &[TextureId(1)]).unwrap();
        let frame = FrameInput::new(16.0, 640.0, 320.0);
        let mut sink = RecordingSink::new();
        r.draw(&mut sink, &frame, Mat4::IDENTITY, 0, Some(Tint::WHITE));
        assert!(sink.draws[0].depth.is_none());
        assert_eq!(
            r.kind.projection(&frame),
            Projection::Orthographic {
                width: 640.0,
                height: 320.0
            }
        );
    }

    #[test]
    fn quad_vertices_span_rect() {
        let rect = SpriteRect::pixel(&TextureInfo {
            id: TextureId(1),
            width: 4,
            height: 2,
        });
        let v = rect.quad_vertices();
        assert_eq!(v[0], [-2.0, -1.0, 0.0, 2.0]);
        assert_eq!(v[5], [2.0, 1.0, 4.0, 0.0]);
    }
}
