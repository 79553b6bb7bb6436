//! Screen-space weather particles
//!
//! Forty debris slots live in overlay space at 4x sub-pixel precision. Each
//! quantum the active debris are scrolled against camera motion (nearer
//! layers move more), then new debris are emitted from an accumulated
//! credit. Debris are drawn every host frame.

use crate::params::{WeatherKind, WeatherParams};
use retrofx_core::math::subtract_angles;
use retrofx_core::{LegacyRng, Mat4, Result, Tint, Vec2, Vec3, SRC_FRAME_TO_MS};
use retrofx_runtime::{
    DrawSink, FrameInput, QuantumTimer, SimSystem, SpriteRenderer, TextureRegistry, TickContext,
};
use std::f32::consts::TAU;

pub const DEBRIS_SLOTS: usize = 40;

/// Credit one emission batch costs
const BATCH_COST: f64 = 64.0;

/// Parallax per depth layer, near to far
const LAYER_PARALLAX: [f32; 3] = [1024.0, 768.0, 512.0];
const LAYER_SPEED: [f32; 3] = [1.0, 0.75, 0.5];

/// Parallax of the nearest snow layer
const SNOW_PARALLAX_MAX: f32 = 1200.0;
const SNOW_PARALLAX_MIN: f32 = 100.0;

const FADEOUT_COUNTDOWN: u32 = 15;

/// Debris positions are kept at 4x overlay resolution
const SUBPIXEL: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Debris {
    pub active: bool,
    pub pos: Vec2,
    pub vel: Vec2,
    pub scale: Vec2,
    pub cur_alpha: f32,
    pub target_alpha: f32,
    pub cur_parallax: f32,
    pub target_parallax: f32,
    pub lifetime_counter: i32,
    pub countdown_to_fadeout: u32,
}

impl Default for Debris {
    fn default() -> Self {
        Self {
            active: false,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            scale: Vec2::ONE,
            cur_alpha: 255.0,
            target_alpha: 255.0,
            cur_parallax: 1.0,
            target_parallax: 1.0,
            lifetime_counter: 0,
            countdown_to_fadeout: 0,
        }
    }
}

impl Debris {
    /// Overlay-space transform: quarter position, scale relative to 1024,
    /// Y flipped
    pub fn transform(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(self.pos.x / SUBPIXEL, self.pos.y / SUBPIXEL, 0.0))
            * Mat4::from_scale(Vec3::new(
                self.scale.x * SUBPIXEL / 1024.0,
                -self.scale.y * SUBPIXEL / 1024.0,
                1.0,
            ))
    }
}

pub struct WeatherRenderer {
    params: WeatherParams,
    renderer: SpriteRenderer,
    debris: [Debris; DEBRIS_SLOTS],
    credit: f64,
    cycle: usize,
    timer: QuantumTimer,
    last_yaw: f32,
    last_cam_pos: Vec3,
    emitted: u64,
    exhausted: u64,
    pub visible: bool,
}

impl WeatherRenderer {
    pub fn new(textures: &TextureRegistry, params: WeatherParams) -> Result<Self> {
        let label = match params.kind {
            WeatherKind::Rain => "rain",
            WeatherKind::Snow => "snow",
        };
        let renderer = SpriteRenderer::ui_overlay(textures, label, &[params.kind.texture()])?;
        log::info!(
            target: "weather",
            "{} ready: {} credit/quantum, {} per batch",
            label,
            params.iterations_per_frame,
            params.particles_per_iteration
        );
        Ok(Self {
            params,
            renderer,
            debris: [Debris::default(); DEBRIS_SLOTS],
            credit: 0.0,
            cycle: 0,
            timer: QuantumTimer::reaching(SRC_FRAME_TO_MS),
            last_yaw: 0.0,
            last_cam_pos: Vec3::ZERO,
            emitted: 0,
            exhausted: 0,
            visible: true,
        })
    }

    pub fn params(&self) -> &WeatherParams {
        &self.params
    }

    pub fn debris(&self) -> &[Debris] {
        &self.debris
    }

    pub fn active_count(&self) -> usize {
        self.debris.iter().filter(|d| d.active).count()
    }

    /// Unspent emission credit
    pub fn credit(&self) -> f64 {
        self.credit
    }

    /// Depth layer the next emitted debris lands on
    pub fn cycle(&self) -> usize {
        self.cycle
    }

    /// Debris activated since construction
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Emission passes cut short by a full pool
    pub fn exhausted(&self) -> u64 {
        self.exhausted
    }

    fn activate(&mut self, slot: usize, viewport_width: f32, rng: &mut LegacyRng) {
        let layer = self.cycle;
        let d = &mut self.debris[slot];
        d.active = true;
        d.pos = Vec2::new(rng.random((viewport_width * SUBPIXEL) as u32) as f32, 0.0);
        d.vel = Vec2::from_array(self.params.velocity) * LAYER_SPEED[layer];
        d.countdown_to_fadeout = FADEOUT_COUNTDOWN;
        d.cur_parallax = LAYER_PARALLAX[layer];
        d.scale = Vec2::splat(d.cur_parallax);
        d.target_parallax = d.cur_parallax;
        d.cur_alpha = self.params.alphas[layer] as f32;
        d.target_alpha = d.cur_alpha;
        d.lifetime_counter = self.params.particle_lifetime_min + rng.random(2) as i32;

        self.cycle = (layer + 1) % LAYER_PARALLAX.len();
        self.emitted += 1;
    }

    /// Drop whole batches from the credit, keeping the remainder. Integer
    /// truncation and the 16-bit mask are part of the emission rhythm.
    fn rollback_credit(&mut self) {
        let mut tmp = self.credit;
        if tmp < 0.0 {
            tmp += 63.0;
        }
        let batches = ((tmp as i32) & 0xFFFF) >> 6;
        self.credit -= (batches * 0x40) as f64;
    }

    /// Spend accumulated credit on new debris
    pub fn generate(&mut self, viewport_width: f32, rng: &mut LegacyRng) {
        self.credit += self.params.iterations_per_frame as f64;
        while self.credit > BATCH_COST {
            for _ in 0..self.params.particles_per_iteration {
                match self.debris.iter().position(|d| !d.active) {
                    Some(slot) => self.activate(slot, viewport_width, rng),
                    None => {
                        self.rollback_credit();
                        self.exhausted += 1;
                        log::debug!(
                            target: "weather",
                            "debris pool full, credit rolled back to {}",
                            self.credit
                        );
                        return;
                    }
                }
            }
            self.credit -= BATCH_COST;
        }
    }

    /// Scroll active debris against camera motion and age them by a quantum
    pub fn advance(&mut self, frame: &FrameInput) {
        let yaw = frame.yaw();
        let cam_pos = frame.view_translation();
        let cam_vel = Vec2::new(cam_pos.x - self.last_cam_pos.x, cam_pos.z - self.last_cam_pos.z);
        let axis = Vec2::new((-yaw).cos(), (-yaw).sin());
        let side = Vec2::new(-axis.y, -axis.x);
        // yaw is in turns; wrap the change across the back-facing seam
        let yaw_delta = subtract_angles(self.last_yaw * TAU, yaw * TAU) / TAU;
        let width = frame.viewport_width;
        let height = frame.viewport_height;
        let snow = self.params.kind == WeatherKind::Snow;

        for d in self.debris.iter_mut().filter(|d| d.active) {
            let p2 = d.cur_parallax * d.cur_parallax;
            d.pos.x -= axis.dot(cam_vel) * p2 / 2_000_000.0;
            d.pos.x += yaw_delta * p2 / -3000.0;

            if d.pos.x > width - 40.0 {
                d.pos.x -= width;
            } else if d.pos.x < -40.0 {
                d.pos.x += width;
            }

            if snow {
                d.vel.x = (d.lifetime_counter as f32 / 10.0).sin() * d.cur_parallax / 256.0;

                d.target_parallax += side.dot(cam_vel) * -3.0;
                if d.target_parallax > SNOW_PARALLAX_MAX || d.target_parallax < SNOW_PARALLAX_MIN {
                    d.target_parallax = SNOW_PARALLAX_MAX;
                }
                d.cur_parallax = d.target_parallax;

                let a = (self.params.alphas[2] / 2) as f32;
                d.target_alpha = a + (255.0 - a) * d.cur_parallax / SNOW_PARALLAX_MAX;
                d.cur_alpha = d.target_alpha;

                d.vel.y = self.params.velocity[1] * (0.25 + d.cur_parallax / SNOW_PARALLAX_MAX);
            }

            d.pos.x -= d.vel.x / SUBPIXEL;
            d.pos.y += d.vel.y / SUBPIXEL;
            d.lifetime_counter -= 1;

            if d.lifetime_counter == 0 || d.pos.y > height * SUBPIXEL {
                d.active = false;
            }
        }

        self.last_yaw = yaw;
        self.last_cam_pos = cam_pos;
    }

    pub fn render(&self, frame: &FrameInput, sink: &mut dyn DrawSink) {
        for d in self.debris.iter().filter(|d| d.active) {
            let tint = Tint::WHITE.with_alpha(d.cur_alpha / 255.0);
            self.renderer.draw(sink, frame, d.transform(), 0, Some(tint));
        }
    }

    /// One host frame: at most one advance+emit step, then draw
    pub fn tick(&mut self, frame: &FrameInput, rng: &mut LegacyRng, sink: &mut dyn DrawSink) {
        if !self.visible {
            return;
        }
        if self.timer.advance(frame.elapsed_ms) {
            self.advance(frame);
            self.generate(frame.viewport_width, rng);
        }
        self.render(frame, sink);
    }
}

impl SimSystem for WeatherRenderer {
    fn update(&mut self, ctx: &mut TickContext<'_>) -> Result<()> {
        self.tick(ctx.frame, ctx.rng, ctx.sink);
        Ok(())
    }

    fn name(&self) -> &str {
        "weather"
    }

    fn live_count(&self) -> usize {
        self.active_count()
    }
}
