//! Blob shadows

use retrofx_core::{Mat4, Quat, Result, Tint, Vec3};
use retrofx_runtime::{DrawSink, FrameInput, SpriteRenderer, TextureRegistry};
use std::f32::consts::FRAC_PI_2;

/// Default diameter of a caster's shadow
pub const DEFAULT_SHADOW_SIZE: f32 = 8.0;

/// Shadows are drawn black, opacity comes from the texture
const SHADOW_TINT: Tint = Tint::new(0.0, 0.0, 0.0, 1.0);

pub struct ShadowRenderer {
    renderer: SpriteRenderer,
    pub visible: bool,
}

impl ShadowRenderer {
    pub fn new(textures: &TextureRegistry) -> Result<Self> {
        Ok(Self {
            renderer: SpriteRenderer::shadow(textures)?,
            visible: true,
        })
    }

    /// Draw the shadow quad at an arbitrary transform
    pub fn draw(&self, sink: &mut dyn DrawSink, frame: &FrameInput, transform: Mat4) {
        if self.visible {
            self.renderer.draw(sink, frame, transform, 0, Some(SHADOW_TINT));
        }
    }

    /// Draw a flat shadow of diameter `size` on the ground below `position`
    pub fn draw_at(&self, sink: &mut dyn DrawSink, frame: &FrameInput, position: Vec3, ground_y: f32, size: f32) {
        let transform = Mat4::from_scale_rotation_translation(
            Vec3::splat(size),
            Quat::from_rotation_x(-FRAC_PI_2),
            Vec3::new(position.x, ground_y, position.z),
        );
        self.draw(sink, frame, transform);
    }

    pub fn renderer(&self) -> &SpriteRenderer {
        &self.renderer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use retrofx_runtime::{RecordingSink, RenderLayer, RendererKind, SHADOW_TEXTURE};

    fn textures() -> TextureRegistry {
        let mut reg = TextureRegistry::new();
        reg.register(SHADOW_TEXTURE, 32, 32);
        reg
    }

    #[test]
    fn requires_shadow_texture() {
        assert!(ShadowRenderer::new(&TextureRegistry::new()).is_err());
        let shadow = ShadowRenderer::new(&textures()).unwrap();
        assert_eq!(shadow.renderer().kind, RendererKind::Shadow);
        assert_eq!(shadow.renderer().layer, RenderLayer::Footprints);
    }

    #[test]
    fn shadow_lies_on_ground() {
        let shadow = ShadowRenderer::new(&textures()).unwrap();
        let frame = FrameInput::new(16.0, 640.0, 480.0);
        let mut sink = RecordingSink::new();
        shadow.draw_at(&mut sink, &frame, Vec3::new(5.0, 20.0, -3.0), 0.0, DEFAULT_SHADOW_SIZE);

        let draw = &sink.draws[0];
        assert_eq!(draw.translation(), [5.0, 0.0, -3.0]);
        assert_eq!(draw.tint, Some([0.0, 0.0, 0.0, 1.0]));
        assert!(draw.depth.is_some());
        // quad normal (local Z) now points up
        let m = Mat4::from_cols_array(&draw.transform);
        let normal = m.transform_vector3(Vec3::Z).normalize();
        assert!((normal - Vec3::Y).length() < 1e-5);
    }
}
