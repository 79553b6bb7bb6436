//! Per-frame host input

use retrofx_core::math::{view_pitch, view_yaw};
use retrofx_core::{Mat4, Vec3};

/// Everything the host supplies once per visual frame
#[derive(Debug, Clone, Copy)]
pub struct FrameInput {
    /// Wall time since the previous frame, in milliseconds
    pub elapsed_ms: f64,
    /// Camera-to-world transform (its translation is the eye position)
    pub camera_world: Mat4,
    /// World-to-camera transform
    pub camera_view: Mat4,
    pub viewport_width: f32,
    pub viewport_height: f32,
}

impl FrameInput {
    pub fn new(elapsed_ms: f64, viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            elapsed_ms,
            camera_world: Mat4::IDENTITY,
            camera_view: Mat4::IDENTITY,
            viewport_width,
            viewport_height,
        }
    }

    /// Set both camera matrices from a camera-to-world transform
    pub fn with_camera(mut self, camera_world: Mat4) -> Self {
        self.camera_world = camera_world;
        self.camera_view = camera_world.inverse();
        self
    }

    pub fn eye_position(&self) -> Vec3 {
        self.camera_world.w_axis.truncate()
    }

    /// View-matrix translation, the reference point weather parallax tracks
    pub fn view_translation(&self) -> Vec3 {
        self.camera_view.w_axis.truncate()
    }

    /// Camera yaw in turns
    pub fn yaw(&self) -> f32 {
        view_yaw(&self.camera_view)
    }

    /// Camera pitch in turns
    pub fn pitch(&self) -> f32 {
        view_pitch(&self.camera_view)
    }

    pub fn aspect(&self) -> f32 {
        if self.viewport_height > 0.0 {
            self.viewport_width / self.viewport_height
        } else {
            1.0
        }
    }
}
