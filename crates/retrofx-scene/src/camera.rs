//! Scripted camera motion for headless replays

use retrofx_core::{Mat4, Vec3};
use retrofx_runtime::FrameInput;
use serde::Deserialize;
use std::f32::consts::TAU;

/// `[camera]` table: a start pose plus constant linear and yaw velocity
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct CameraPath {
    pub position: [f32; 3],
    /// World units per second
    pub velocity: [f32; 3],
    /// Initial yaw in turns
    pub yaw: f32,
    /// Turns per second about +Y
    pub yaw_rate: f32,
    /// Fixed pitch in turns
    pub pitch: f32,
}

impl CameraPath {
    /// Camera-to-world transform `time_ms` into the replay
    pub fn world_at(&self, time_ms: f64) -> Mat4 {
        let t = (time_ms / 1000.0) as f32;
        let eye = Vec3::from_array(self.position) + Vec3::from_array(self.velocity) * t;
        let yaw = (self.yaw + self.yaw_rate * t) * TAU;
        Mat4::from_translation(eye) * Mat4::from_rotation_y(yaw) * Mat4::from_rotation_x(self.pitch * TAU)
    }

    /// Host input for a frame ending at `time_ms`
    pub fn frame(&self, time_ms: f64, elapsed_ms: f64, viewport: [f32; 2]) -> FrameInput {
        FrameInput::new(elapsed_ms, viewport[0], viewport[1]).with_camera(self.world_at(time_ms))
    }
}
