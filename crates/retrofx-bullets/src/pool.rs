//! Reuse-before-allocate bullet pool

use crate::bullet::{Bullet, TrailHook};
use crate::params::{BulletTable, BulletTypeParams, MAX_BILLBOARDS};
use retrofx_core::{LegacyRng, Result, Vec3};
use retrofx_runtime::{DrawSink, FrameInput, SimSystem, SpriteRenderer, TextureRegistry, TickContext};
use retrofx_sprite::{FlipbookAnimator, SpriteCache, SpriteMetadata, SpriteTable};
use std::rc::Rc;

/// Index of a bullet inside its pool. Stable for the pool's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BulletHandle(pub usize);

/// Resolved flipbook a new bullet's animator is built from
#[derive(Debug, Clone)]
pub struct FlipbookTemplate {
    pub meta: Rc<SpriteMetadata>,
    pub renderer: Rc<SpriteRenderer>,
    pub color: [u8; 3],
}

/// All bullets of one type. Grows on demand, never shrinks.
pub struct BulletPool {
    bullet_type: u8,
    params: BulletTypeParams,
    templates: Vec<FlipbookTemplate>,
    bullets: Vec<Bullet>,
    trail: Option<TrailHook>,
    pub visible: bool,
}

impl BulletPool {
    /// Resolve every flipbook the type draws. Unknown flipbook indices and
    /// unregistered textures fail here, before anything spawns.
    pub fn new(
        bullet_type: u8,
        table: &BulletTable,
        sprites: &SpriteTable,
        cache: &mut SpriteCache,
        textures: &TextureRegistry,
    ) -> Result<Self> {
        let params = table.get(bullet_type)?.clone();
        assert!(
            params.billboards <= MAX_BILLBOARDS,
            "bullet type {bullet_type} asks for {} billboards",
            params.billboards
        );

        let mut templates = Vec::new();
        for (index, color) in params.flipbooks() {
            let meta = sprites.get(index)?;
            let renderer = cache.acquire(textures, &meta)?;
            templates.push(FlipbookTemplate { meta, renderer, color });
        }

        log::info!(
            target: "bullets",
            "bullet pool for type {} ready ({} flipbook(s))",
            bullet_type,
            templates.len()
        );

        Ok(Self {
            bullet_type,
            params,
            templates,
            bullets: Vec::new(),
            trail: None,
            visible: true,
        })
    }

    pub fn bullet_type(&self) -> u8 {
        self.bullet_type
    }

    pub fn params(&self) -> &BulletTypeParams {
        &self.params
    }

    pub fn templates(&self) -> &[FlipbookTemplate] {
        &self.templates
    }

    pub fn set_trail_hook(&mut self, hook: TrailHook) {
        self.trail = Some(hook);
    }

    pub fn clear_trail_hook(&mut self) {
        self.trail = None;
    }

    fn build_bullet(&self, rng: &mut LegacyRng) -> Bullet {
        let animators = self
            .templates
            .iter()
            .map(|t| {
                let mut animator = FlipbookAnimator::with_renderer(Rc::clone(&t.meta), Rc::clone(&t.renderer), rng);
                animator.set_prim_color(t.color[0], t.color[1], t.color[2]);
                animator
            })
            .collect();
        Bullet::new(animators)
    }

    /// Reuse the first inactive bullet, or grow the pool by one
    pub fn spawn(&mut self, position: Vec3, rng: &mut LegacyRng) -> BulletHandle {
        let index = match self.bullets.iter().position(|b| !b.active) {
            Some(index) => index,
            None => {
                let bullet = self.build_bullet(rng);
                self.bullets.push(bullet);
                log::debug!(
                    target: "bullets",
                    "pool {} grew to {} bullet(s)",
                    self.bullet_type,
                    self.bullets.len()
                );
                self.bullets.len() - 1
            }
        };
        self.bullets[index].spawn(&self.params, position, rng);
        BulletHandle(index)
    }

    /// Spawn and launch in one go
    pub fn fire(&mut self, position: Vec3, velocity: Vec3, rng: &mut LegacyRng) -> BulletHandle {
        let handle = self.spawn(position, rng);
        self.bullets[handle.0].velocity = velocity;
        handle
    }

    pub fn get(&self, handle: BulletHandle) -> Option<&Bullet> {
        self.bullets.get(handle.0)
    }

    pub fn get_mut(&mut self, handle: BulletHandle) -> Option<&mut Bullet> {
        self.bullets.get_mut(handle.0)
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    /// Allocated bullets, active or not
    pub fn len(&self) -> usize {
        self.bullets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bullets.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.bullets.iter().filter(|b| b.active).count()
    }

    /// Tick every active bullet
    pub fn tick(&mut self, frame: &FrameInput, sink: &mut dyn DrawSink) {
        if !self.visible {
            return;
        }
        for bullet in self.bullets.iter_mut().filter(|b| b.active) {
            bullet.update(&self.params, self.bullet_type, frame, sink, self.trail.as_mut());
        }
    }
}

impl SimSystem for BulletPool {
    fn update(&mut self, ctx: &mut TickContext<'_>) -> Result<()> {
        self.tick(ctx.frame, ctx.sink);
        Ok(())
    }

    fn name(&self) -> &str {
        "bullets"
    }

    fn live_count(&self) -> usize {
        self.active_count()
    }
}
