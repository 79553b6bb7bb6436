//! A single pooled projectile

use crate::params::BulletTypeParams;
use retrofx_core::{LegacyRng, Mat4, Quat, Vec3, SRC_FRAME_TO_MS};
use retrofx_runtime::{DrawSink, FrameInput, QuantumTimer};
use retrofx_sprite::FlipbookAnimator;

/// Called once per quantum step with `(bullet_type, trail_particle_type, position)`
pub type TrailHook = Box<dyn FnMut(u8, u8, Vec3)>;

#[derive(Debug)]
pub struct Bullet {
    pub active: bool,
    pub position: Vec3,
    pub velocity: Vec3,
    pub scale: Vec3,
    lifetime: u32,
    frame_count: u32,
    timer: QuantumTimer,
    animators: Vec<FlipbookAnimator>,
}

impl Bullet {
    pub fn new(animators: Vec<FlipbookAnimator>) -> Self {
        Self {
            active: false,
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            scale: Vec3::ONE,
            lifetime: 0,
            frame_count: 0,
            timer: QuantumTimer::exceeding(SRC_FRAME_TO_MS),
            animators,
        }
    }

    /// Re-initialize for a new shot
    pub fn spawn(&mut self, params: &BulletTypeParams, position: Vec3, rng: &mut LegacyRng) {
        self.position = position;
        self.velocity = Vec3::ZERO;
        self.active = true;
        for animator in &mut self.animators {
            animator.reset(rng);
        }
        self.set_lifetime(params.lifetime);
        self.frame_count = 0;
        self.scale = Vec3::ONE;
    }

    /// Lifetime in quanta. A positive lifetime also puts the animators on
    /// the matching time-driven envelope.
    pub fn set_lifetime(&mut self, frames: u32) {
        if frames > 0 {
            for animator in &mut self.animators {
                animator.set_lifetime(frames as f64 * SRC_FRAME_TO_MS);
            }
        }
        self.lifetime = frames;
    }

    pub fn lifetime(&self) -> u32 {
        self.lifetime
    }

    /// Quantum steps taken since the last spawn
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    pub fn animators(&self) -> &[FlipbookAnimator] {
        &self.animators
    }

    pub fn animators_mut(&mut self) -> &mut [FlipbookAnimator] {
        &mut self.animators
    }

    /// One host frame. Returns true if a quantum step ran.
    pub fn update(
        &mut self,
        params: &BulletTypeParams,
        bullet_type: u8,
        frame: &FrameInput,
        sink: &mut dyn DrawSink,
        trail: Option<&mut TrailHook>,
    ) -> bool {
        if !self.active {
            return false;
        }

        let stepped = self.timer.advance(frame.elapsed_ms);
        if stepped {
            self.lifetime = self.lifetime.saturating_sub(1);
            self.frame_count += 1;

            self.position += self.velocity;

            let speed = self.velocity.length();
            if speed > params.mobility {
                self.velocity *= params.mobility / speed;
            }

            if let Some(hook) = trail {
                hook(bullet_type, params.trail_particle_type, self.position);
            }
        }

        if self.lifetime == 0 && self.animators.iter().all(|a| !a.playing) {
            self.active = false;
        }

        let draw_matrix = Mat4::from_scale_rotation_translation(self.scale, Quat::IDENTITY, self.position);
        for animator in &mut self.animators {
            animator.draw_matrix = draw_matrix;
            animator.update(frame, sink);
        }

        stepped
    }
}
