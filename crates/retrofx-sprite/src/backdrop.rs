//! Scrolling sky backdrops

use retrofx_core::{Mat4, Result, TextureId, Tint, Vec3};
use retrofx_runtime::{FrameInput, SimSystem, SpriteRenderer, TextureRegistry, TickContext};
use serde::Deserialize;
use std::f32::consts::TAU;

/// One `[[backdrop]]` layer
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BackdropConfig {
    pub texture: TextureId,
    #[serde(default)]
    pub sort_key: u32,
    #[serde(default = "unit_scale")]
    pub scale_x: f32,
    #[serde(default = "unit_scale")]
    pub scale_y: f32,
    #[serde(default)]
    pub flip_y: bool,
    #[serde(default)]
    pub scroll_speed_x: f32,
    #[serde(default)]
    pub offset_y: f32,
    pub prim_color: Option<[u8; 3]>,
}

fn unit_scale() -> f32 {
    1024.0
}

pub struct BackdropRenderer {
    pub config: BackdropConfig,
    renderer: SpriteRenderer,
    pub visible: bool,
    draw_matrix: Mat4,
}

impl BackdropRenderer {
    pub fn new(textures: &TextureRegistry, config: BackdropConfig) -> Result<Self> {
        let renderer = SpriteRenderer::backdrop(
            textures,
            config.texture,
            config.scale_x,
            config.scale_y,
            config.flip_y,
            config.sort_key,
        )?;
        Ok(Self {
            config,
            renderer,
            visible: true,
            draw_matrix: Mat4::IDENTITY,
        })
    }

    /// Screen offset for the current camera orientation. Yaw scrolls the
    /// strip sideways, pitch slides it vertically but never below the top.
    pub fn scroll_offset(&self, frame: &FrameInput) -> Vec3 {
        let yaw = frame.yaw();
        let pitch = frame.pitch();
        let width = self.renderer.rect.width;
        let x = -(yaw + 0.5) * self.config.scroll_speed_x * width / 2.0;
        let y = ((-(pitch * TAU).sin() * 500.0 + self.config.offset_y) / 2.0
            + 136.0 / (self.config.scale_y / 1024.0))
            .min(0.0);
        Vec3::new(x, y, 0.0)
    }

    pub fn draw_matrix(&self) -> Mat4 {
        self.draw_matrix
    }

    pub fn renderer(&self) -> &SpriteRenderer {
        &self.renderer
    }

    fn tint(&self) -> Tint {
        match self.config.prim_color {
            Some([r, g, b]) => Tint::from_rgb8(r, g, b),
            None => Tint::WHITE,
        }
    }
}

impl SimSystem for BackdropRenderer {
    fn update(&mut self, ctx: &mut TickContext<'_>) -> Result<()> {
        if !self.visible {
            return Ok(());
        }
        self.draw_matrix = Mat4::from_translation(self.scroll_offset(ctx.frame));
        self.renderer
            .draw(ctx.sink, ctx.frame, self.draw_matrix, 0, Some(self.tint()));
        Ok(())
    }

    fn name(&self) -> &str {
        "backdrop"
    }

    fn live_count(&self) -> usize {
        usize::from(self.visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use retrofx_core::LegacyRng;
    use retrofx_runtime::{RecordingSink, RendererKind};

    fn config() -> BackdropConfig {
        BackdropConfig {
            texture: TextureId(0xB0),
            sort_key: 2,
            scale_x: 1024.0,
            scale_y: 1024.0,
            flip_y: false,
            scroll_speed_x: 1.0,
            offset_y: 0.0,
            prim_color: None,
        }
    }

    fn textures() -> TextureRegistry {
        let mut reg = TextureRegistry::new();
        reg.register(TextureId(0xB0), 64, 32);
        reg
    }

    #[test]
    fn level_camera_offsets() {
        let backdrop = BackdropRenderer::new(&textures(), config()).unwrap();
        let frame = FrameInput::new(16.0, 640.0, 480.0);
        let offset = backdrop.scroll_offset(&frame);
        // yaw 0: half a strip width (128 / 2) scrolled left by 0.5
        assert!((offset.x - (-32.0)).abs() < 1e-4);
        // 136 above the top edge clamps to 0
        assert_eq!(offset.y, 0.0);
    }

    #[test]
    fn low_offset_moves_strip_down() {
        let mut cfg = config();
        cfg.offset_y = -600.0;
        let backdrop = BackdropRenderer::new(&textures(), cfg).unwrap();
        let offset = backdrop.scroll_offset(&FrameInput::new(16.0, 640.0, 480.0));
        assert!((offset.y - (-300.0 + 136.0)).abs() < 1e-4);
    }

    #[test]
    fn draws_once_without_depth() {
        let mut backdrop = BackdropRenderer::new(&textures(), config()).unwrap();
        let frame = FrameInput::new(16.0, 640.0, 480.0);
        let mut rng = LegacyRng::new();
        let mut sink = RecordingSink::new();
        let mut ctx = TickContext::new(&frame, &mut rng, &mut sink);
        backdrop.update(&mut ctx).unwrap();
        assert_eq!(sink.count_kind(RendererKind::Backdrop), 1);
        assert!(sink.draws[0].depth.is_none());
    }

    #[test]
    fn hidden_backdrop_skips_draw() {
        let mut backdrop = BackdropRenderer::new(&textures(), config()).unwrap();
        backdrop.visible = false;
        let frame = FrameInput::new(16.0, 640.0, 480.0);
        let mut rng = LegacyRng::new();
        let mut sink = RecordingSink::new();
        backdrop
            .update(&mut TickContext::new(&frame, &mut rng, &mut sink))
            .unwrap();
        assert!(sink.draws.is_empty());
    }

    #[test]
    fn missing_texture_fails() {
        let mut cfg = config();
        cfg.texture = TextureId(0xDEAD);
        assert!(BackdropRenderer::new(&textures(), cfg).is_err());
    }
}
