//! Flipbook animator
//!
//! Per-instance playback state for an animated sprite. Frames advance on a
//! 50 ms sub-step: each step either burns `0x20` off the sub-frame counter or,
//! once it has run out, reloads it with the frame delay and moves to the next
//! frame. Alpha and size follow an envelope driven either by the remaining
//! frames (frame-driven) or by the remaining lifetime (time-driven).

use crate::cache::SpriteCache;
use crate::metadata::{FlipbookKind, SpriteMetadata};
use retrofx_core::{LegacyRng, Mat4, Result, Tint, Vec3};
use retrofx_runtime::{DrawSink, FrameInput, QuantumTimer, SpriteRenderer, TextureRegistry};
use std::rc::Rc;

/// Sub-step length for frame advancement, in milliseconds
pub const FRAME_STEP_MS: f64 = 50.0;

/// Amount the sub-frame counter drops per sub-step
const COUNTER_STEP: i32 = 0x20;

/// Sizes in the tables are in thirds of a world unit
const SIZE_DIVISOR: f32 = 3.0;

pub struct FlipbookAnimator {
    meta: Rc<SpriteMetadata>,
    renderer: Rc<SpriteRenderer>,
    step_timer: QuantumTimer,
    frame_delay: i32,
    frame_counter: i32,
    pub cur_frame: usize,

    pub start_alpha: f32,
    pub end_alpha: f32,
    pub start_size: f32,
    pub end_size: f32,

    /// Negative: frame-driven envelope. Otherwise total lifetime in ms.
    lifetime: f64,
    time_remaining: f64,

    pub looping: bool,
    pub playing: bool,
    pub visible: bool,

    /// World transform the sprite is drawn at, before size scaling
    pub draw_matrix: Mat4,
    prim_color: Tint,

    alpha: f32,
    size: f32,
}

impl FlipbookAnimator {
    pub fn new(
        cache: &mut SpriteCache,
        textures: &TextureRegistry,
        meta: Rc<SpriteMetadata>,
        rng: &mut LegacyRng,
    ) -> Result<Self> {
        let renderer = cache.acquire(textures, &meta)?;
        Ok(Self::with_renderer(meta, renderer, rng))
    }

    /// Build around a renderer the caller already acquired
    pub fn with_renderer(meta: Rc<SpriteMetadata>, renderer: Rc<SpriteRenderer>, rng: &mut LegacyRng) -> Self {
        let mut animator = Self {
            frame_delay: meta.frame_delay,
            frame_counter: meta.frame_delay,
            start_alpha: meta.start_alpha as f32,
            end_alpha: meta.end_alpha as f32,
            start_size: meta.start_size,
            end_size: meta.end_size,
            looping: meta.loops(),
            meta,
            renderer,
            step_timer: QuantumTimer::exceeding(FRAME_STEP_MS),
            cur_frame: 0,
            lifetime: -1.0,
            time_remaining: 0.0,
            playing: true,
            visible: true,
            draw_matrix: Mat4::IDENTITY,
            prim_color: Tint::WHITE,
            alpha: 255.0,
            size: 0.0,
        };
        animator.cur_frame = animator.start_frame(rng);
        animator
    }

    /// Rebind to different metadata. Lifetime mode is left as it was.
    pub fn set_sprite(
        &mut self,
        cache: &mut SpriteCache,
        textures: &TextureRegistry,
        meta: Rc<SpriteMetadata>,
        rng: &mut LegacyRng,
    ) -> Result<()> {
        self.renderer = cache.acquire(textures, &meta)?;
        self.start_alpha = meta.start_alpha as f32;
        self.end_alpha = meta.end_alpha as f32;
        self.start_size = meta.start_size;
        self.end_size = meta.end_size;
        self.frame_delay = meta.frame_delay;
        self.frame_counter = meta.frame_delay;
        self.looping = meta.loops();
        self.meta = meta;
        self.playing = true;
        self.cur_frame = self.start_frame(rng);
        Ok(())
    }

    /// Restart playback for a reused instance
    pub fn reset(&mut self, rng: &mut LegacyRng) {
        self.playing = true;
        self.frame_counter = self.frame_delay;
        self.cur_frame = self.start_frame(rng);
        self.lifetime = -1.0;
        self.time_remaining = 0.0;
    }

    fn start_frame(&self, rng: &mut LegacyRng) -> usize {
        match self.meta.kind {
            FlipbookKind::RandomStartLooping => rng.random(self.meta.frame_count() as u32) as usize,
            _ => 0,
        }
    }

    /// Switch to the time-driven envelope
    pub fn set_lifetime(&mut self, ms: f64) {
        self.lifetime = ms;
        self.time_remaining = ms;
    }

    pub fn lifetime(&self) -> f64 {
        self.lifetime
    }

    pub fn time_remaining(&self) -> f64 {
        self.time_remaining
    }

    /// Tint from 0-255 channels, alpha comes from the envelope
    pub fn set_prim_color(&mut self, r: u8, g: u8, b: u8) {
        self.prim_color = Tint::from_rgb8(r, g, b).with_alpha(self.prim_color.a);
    }

    pub fn prim_color(&self) -> Tint {
        self.prim_color
    }

    pub fn position(&self) -> Vec3 {
        self.draw_matrix.w_axis.truncate()
    }

    pub fn meta(&self) -> &Rc<SpriteMetadata> {
        &self.meta
    }

    pub fn renderer(&self) -> &Rc<SpriteRenderer> {
        &self.renderer
    }

    /// Alpha (0-255) computed on the last update
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Draw size computed on the last update
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Fraction of the animation still ahead, 1 at the start, 0 at the end
    fn remaining(&self) -> f32 {
        if self.lifetime < 0.0 {
            let n = self.meta.frame_count();
            if n <= 1 {
                return 1.0;
            }
            (n - self.cur_frame - 1) as f32 / (n - 1) as f32
        } else if self.lifetime > 0.0 {
            (self.time_remaining / self.lifetime).clamp(0.0, 1.0) as f32
        } else {
            0.0
        }
    }

    fn envelope(&self, start: f32, end: f32) -> f32 {
        end + (start - end) * self.remaining()
    }

    fn advance_frame(&mut self) {
        if self.frame_counter > 0 {
            self.frame_counter -= COUNTER_STEP;
            return;
        }
        self.frame_counter += self.frame_delay;
        self.cur_frame += 1;
        if self.cur_frame >= self.meta.frame_count() {
            if self.looping {
                self.cur_frame = 0;
                self.playing = true;
            } else {
                self.cur_frame = self.meta.frame_count() - 1;
                self.playing = false;
            }
        }
    }

    /// Advance playback, refresh the envelope and draw if visible
    pub fn update(&mut self, frame: &FrameInput, sink: &mut dyn DrawSink) {
        if self.meta.frame_count() > 1 && self.frame_delay >= 0 && self.step_timer.advance(frame.elapsed_ms) {
            self.advance_frame();
        }

        self.alpha = if self.start_alpha == self.end_alpha {
            255.0
        } else {
            self.envelope(self.start_alpha, self.end_alpha)
        };
        let size = if self.start_size == self.end_size {
            self.start_size
        } else {
            self.envelope(self.start_size, self.end_size)
        };
        self.size = size / SIZE_DIVISOR;

        if self.lifetime > 0.0 {
            self.time_remaining -= frame.elapsed_ms;
            if self.time_remaining <= 0.0 {
                self.playing = false;
            }
        }

        if self.visible {
            let transform = self.draw_matrix * Mat4::from_scale(Vec3::splat(self.size));
            let tint = self.prim_color.with_alpha(self.alpha / 255.0);
            self.renderer.draw(sink, frame, transform, self.cur_frame, Some(tint));
        }
    }
}

impl std::fmt::Debug for FlipbookAnimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlipbookAnimator")
            .field("sprite", &self.meta.name)
            .field("cur_frame", &self.cur_frame)
            .field("playing", &self.playing)
            .field("lifetime", &self.lifetime)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use retrofx_core::TextureId;
    use retrofx_runtime::RecordingSink;

    fn meta(frames: u32, delay: i32, kind: FlipbookKind, alpha: (u8, u8), size: (f32, f32)) -> Rc<SpriteMetadata> {
        Rc::new(SpriteMetadata {
            name: "test".into(),
            frameset: (0..frames).map(|f| TextureId(0x100 + f)).collect(),
            frame_delay: delay,
            kind,
            start_alpha: alpha.0,
            end_alpha: alpha.1,
            start_size: size.0,
            end_size: size.1,
            flags: 0,
        })
    }

    fn textures() -> TextureRegistry {
        let mut reg = TextureRegistry::new();
        for f in 0..8 {
            reg.register(TextureId(0x100 + f), 16, 16);
        }
        reg
    }

    fn animator(meta: Rc<SpriteMetadata>) -> FlipbookAnimator {
        let mut cache = SpriteCache::new();
        let mut rng = LegacyRng::new();
        FlipbookAnimator::new(&mut cache, &textures(), meta, &mut rng).unwrap()
    }

    /// One 60 ms host frame, always crosses the 50 ms sub-step
    fn step(anim: &mut FlipbookAnimator, sink: &mut RecordingSink) {
        anim.update(&FrameInput::new(60.0, 640.0, 480.0), sink);
    }

    #[test]
    fn frame_driven_alpha_fades_start_to_end() {
        let mut anim = animator(meta(4, 0, FlipbookKind::Oneshot, (255, 0), (3.0, 3.0)));
        let mut sink = RecordingSink::new();

        anim.update(&FrameInput::new(0.0, 640.0, 480.0), &mut sink);
        assert_eq!(anim.cur_frame, 0);
        assert!((anim.alpha() - 255.0).abs() < 1e-3);

        let mut last = anim.alpha();
        for _ in 0..3 {
            step(&mut anim, &mut sink);
            assert!(anim.alpha() <= last);
            last = anim.alpha();
        }
        assert_eq!(anim.cur_frame, 3);
        assert!(anim.alpha().abs() < 1e-3);
    }

    #[test]
    fn frame_counter_delays_advance() {
        // delay 0x40 burns two sub-steps before each advance
        let mut anim = animator(meta(3, 0x40, FlipbookKind::Looping, (255, 255), (3.0, 3.0)));
        let mut sink = RecordingSink::new();
        step(&mut anim, &mut sink);
        step(&mut anim, &mut sink);
        assert_eq!(anim.cur_frame, 0);
        step(&mut anim, &mut sink);
        assert_eq!(anim.cur_frame, 1);
    }

    #[test]
    fn looping_wraps_to_first_frame() {
        let mut anim = animator(meta(3, 0, FlipbookKind::Looping, (255, 255), (3.0, 3.0)));
        let mut sink = RecordingSink::new();
        for _ in 0..3 {
            step(&mut anim, &mut sink);
        }
        assert_eq!(anim.cur_frame, 0);
        assert!(anim.playing);
    }

    #[test]
    fn oneshot_clamps_and_stops() {
        let mut anim = animator(meta(3, 0, FlipbookKind::Oneshot, (255, 255), (3.0, 3.0)));
        let mut sink = RecordingSink::new();
        for _ in 0..5 {
            step(&mut anim, &mut sink);
        }
        assert_eq!(anim.cur_frame, 2);
        assert!(!anim.playing);
    }

    #[test]
    fn short_frames_accumulate_before_stepping() {
        let mut anim = animator(meta(3, 0, FlipbookKind::Looping, (255, 255), (3.0, 3.0)));
        let mut sink = RecordingSink::new();
        let frame = FrameInput::new(20.0, 640.0, 480.0);
        anim.update(&frame, &mut sink);
        anim.update(&frame, &mut sink);
        assert_eq!(anim.cur_frame, 0);
        anim.update(&frame, &mut sink);
        assert_eq!(anim.cur_frame, 1);
    }

    #[test]
    fn negative_delay_freezes_frame() {
        let mut anim = animator(meta(3, -1, FlipbookKind::Looping, (255, 255), (3.0, 3.0)));
        let mut sink = RecordingSink::new();
        for _ in 0..10 {
            step(&mut anim, &mut sink);
        }
        assert_eq!(anim.cur_frame, 0);
    }

    #[test]
    fn single_frame_unequal_endpoints_hold_start() {
        let mut anim = animator(meta(1, 0, FlipbookKind::Looping, (160, 160), (16.0, 48.0)));
        let mut sink = RecordingSink::new();
        step(&mut anim, &mut sink);
        assert!(anim.size().is_finite());
        assert!((anim.size() - 16.0 / 3.0).abs() < 1e-4);
        assert!((anim.alpha() - 255.0).abs() < 1e-6);
    }

    #[test]
    fn time_driven_envelope_and_expiry() {
        let mut anim = animator(meta(1, 0, FlipbookKind::Looping, (200, 0), (30.0, 90.0)));
        anim.set_lifetime(100.0);
        let mut sink = RecordingSink::new();

        anim.update(&FrameInput::new(50.0, 640.0, 480.0), &mut sink);
        // envelope sampled before the decrement
        assert!((anim.alpha() - 200.0).abs() < 1e-3);
        assert!((anim.size() - 10.0).abs() < 1e-4);
        assert!((anim.time_remaining() - 50.0).abs() < 1e-9);
        assert!(anim.playing);

        anim.update(&FrameInput::new(50.0, 640.0, 480.0), &mut sink);
        assert!((anim.alpha() - 100.0).abs() < 1e-3);
        assert!(!anim.playing);
    }

    #[test]
    fn reset_restores_frame_driven_mode() {
        let mut anim = animator(meta(3, 0, FlipbookKind::Oneshot, (255, 255), (3.0, 3.0)));
        anim.set_lifetime(1000.0);
        let mut sink = RecordingSink::new();
        for _ in 0..4 {
            step(&mut anim, &mut sink);
        }
        let mut rng = LegacyRng::new();
        anim.reset(&mut rng);
        assert_eq!(anim.lifetime(), -1.0);
        assert_eq!(anim.cur_frame, 0);
        assert!(anim.playing);
    }

    #[test]
    fn random_start_draws_from_rng() {
        let m = meta(4, 0, FlipbookKind::RandomStartLooping, (255, 255), (3.0, 3.0));
        let mut cache = SpriteCache::new();
        let mut rng = LegacyRng::new();
        let anim = FlipbookAnimator::new(&mut cache, &textures(), m, &mut rng).unwrap();
        // first register value 0xa3f22 % 4
        assert_eq!(anim.cur_frame, 2);
    }

    #[test]
    fn draw_carries_tint_and_scale() {
        let mut anim = animator(meta(2, 0, FlipbookKind::Looping, (255, 255), (6.0, 6.0)));
        anim.set_prim_color(255, 0, 0);
        anim.draw_matrix = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let mut sink = RecordingSink::new();
        anim.update(&FrameInput::new(0.0, 640.0, 480.0), &mut sink);

        let draw = &sink.draws[0];
        assert_eq!(draw.tint, Some([1.0, 0.0, 0.0, 1.0]));
        assert_eq!(draw.translation(), [1.0, 2.0, 3.0]);
        // uniform scale of 6 / 3
        assert!((draw.transform[0] - 2.0).abs() < 1e-6);
        assert_eq!(anim.position(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn invisible_animator_still_advances() {
        let mut anim = animator(meta(3, 0, FlipbookKind::Looping, (255, 255), (3.0, 3.0)));
        anim.visible = false;
        let mut sink = RecordingSink::new();
        step(&mut anim, &mut sink);
        assert_eq!(anim.cur_frame, 1);
        assert!(sink.draws.is_empty());
    }

    #[test]
    fn set_sprite_rebinds_resource() {
        let reg = textures();
        let mut cache = SpriteCache::new();
        let mut rng = LegacyRng::new();
        let mut anim =
            FlipbookAnimator::new(&mut cache, &reg, meta(2, 0, FlipbookKind::Looping, (255, 255), (3.0, 3.0)), &mut rng)
                .unwrap();
        let other = Rc::new(SpriteMetadata {
            frameset: vec![TextureId(0x105)],
            ..(*meta(1, 0, FlipbookKind::Oneshot, (255, 0), (3.0, 3.0))).clone()
        });
        anim.set_sprite(&mut cache, &reg, other, &mut rng).unwrap();
        assert!(!anim.looping);
        assert_eq!(anim.renderer().frames[0].id, TextureId(0x105));
        // the first resource lost its only owner
        assert_eq!(cache.live_count(), 1);
    }
}
