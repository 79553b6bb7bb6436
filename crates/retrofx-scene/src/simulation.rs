//! Simulation context
//!
//! Owns everything the ticking systems share: the texture registry, the
//! sprite cache, the legacy RNG and the config tables. Systems are ticked in
//! a fixed order each host frame: backdrops, bullet pools (ascending type),
//! bullet shadows, weather.

use crate::format::ScenarioFile;
use retrofx_bullets::{builtin_flipbooks, BulletHandle, BulletPool, BulletTable, TrailHook};
use retrofx_core::{LegacyRng, Result, RetroError, Vec3};
use retrofx_runtime::{DrawSink, FrameInput, SimSystem, TextureRegistry, TickContext};
use retrofx_sprite::{BackdropConfig, BackdropRenderer, ShadowRenderer, SpriteCache, SpriteTable, DEFAULT_SHADOW_SIZE};
use retrofx_weather::{WeatherParams, WeatherRenderer};
use serde::Serialize;
use std::collections::BTreeMap;

const BUILTIN_TEXTURES: &str = include_str!("../data/textures.toml");

/// Texture dimensions for every builtin frameset plus weather and shadow
pub fn builtin_textures() -> Result<TextureRegistry> {
    TextureRegistry::from_toml_str(BUILTIN_TEXTURES)
}

/// Counters reported after each tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimStats {
    pub frame: u64,
    pub elapsed_ms: f64,
    pub active_bullets: usize,
    pub allocated_bullets: usize,
    pub active_debris: usize,
    pub live_sprites: usize,
}

pub struct Simulation {
    textures: TextureRegistry,
    cache: SpriteCache,
    rng: LegacyRng,
    bullet_table: BulletTable,
    sprites: SpriteTable,
    pools: BTreeMap<u8, BulletPool>,
    weather: Option<WeatherRenderer>,
    backdrops: Vec<BackdropRenderer>,
    shadow: Option<ShadowRenderer>,
    ground_y: f32,
    frame: u64,
    elapsed_ms: f64,
}

impl Simulation {
    /// Empty simulation over the builtin bullet and flipbook tables
    pub fn new(textures: TextureRegistry, seed: u32) -> Result<Self> {
        Ok(Self {
            textures,
            cache: SpriteCache::new(),
            rng: LegacyRng::with_seed(seed),
            bullet_table: BulletTable::builtin()?,
            sprites: builtin_flipbooks()?,
            pools: BTreeMap::new(),
            weather: None,
            backdrops: Vec::new(),
            shadow: None,
            ground_y: 0.0,
            frame: 0,
            elapsed_ms: 0.0,
        })
    }

    /// Build every system a scenario declares. Pools for all spawned types
    /// are created up front so bad flipbooks or textures fail here.
    pub fn from_scenario(scenario: &ScenarioFile) -> Result<Self> {
        let meta = &scenario.scenario;
        let mut textures = if meta.builtin_textures {
            builtin_textures()?
        } else {
            TextureRegistry::new()
        };
        for info in &scenario.texture {
            textures.insert(*info);
        }

        let mut sim = Self::new(textures, meta.seed)?;
        if let Some(table) = &scenario.weather {
            sim.set_weather(WeatherParams::from_toml(table)?)?;
        }
        for config in &scenario.backdrop {
            sim.add_backdrop(config.clone())?;
        }
        if meta.shadows {
            sim.enable_shadows(meta.ground_y)?;
        }
        for event in &scenario.spawn {
            sim.ensure_pool(event.bullet_type)?;
        }

        log::info!(
            target: "scene",
            "simulation for '{}' ready: {} pool(s), {} texture(s), seed 0x{:x}",
            meta.name,
            sim.pools.len(),
            sim.textures.len(),
            meta.seed
        );
        Ok(sim)
    }

    pub fn textures(&self) -> &TextureRegistry {
        &self.textures
    }

    pub fn cache(&self) -> &SpriteCache {
        &self.cache
    }

    pub fn rng(&self) -> &LegacyRng {
        &self.rng
    }

    pub fn bullet_table(&self) -> &BulletTable {
        &self.bullet_table
    }

    pub fn sprites(&self) -> &SpriteTable {
        &self.sprites
    }

    /// Host frames ticked so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    fn ensure_pool(&mut self, bullet_type: u8) -> Result<()> {
        if !self.pools.contains_key(&bullet_type) {
            let pool = BulletPool::new(
                bullet_type,
                &self.bullet_table,
                &self.sprites,
                &mut self.cache,
                &self.textures,
            )?;
            self.pools.insert(bullet_type, pool);
        }
        Ok(())
    }

    /// The pool for a bullet type, created on first use
    pub fn pool_mut(&mut self, bullet_type: u8) -> Result<&mut BulletPool> {
        self.ensure_pool(bullet_type)?;
        self.pools
            .get_mut(&bullet_type)
            .ok_or(RetroError::BulletTypeNotFound(bullet_type))
    }

    pub fn pool(&self, bullet_type: u8) -> Option<&BulletPool> {
        self.pools.get(&bullet_type)
    }

    pub fn pools(&self) -> impl Iterator<Item = &BulletPool> {
        self.pools.values()
    }

    /// Spawn a bullet of `bullet_type` and set it moving
    pub fn fire(&mut self, bullet_type: u8, position: Vec3, velocity: Vec3) -> Result<BulletHandle> {
        self.ensure_pool(bullet_type)?;
        let pool = self
            .pools
            .get_mut(&bullet_type)
            .ok_or(RetroError::BulletTypeNotFound(bullet_type))?;
        Ok(pool.fire(position, velocity, &mut self.rng))
    }

    pub fn set_trail_hook(&mut self, bullet_type: u8, hook: TrailHook) -> Result<()> {
        self.pool_mut(bullet_type)?.set_trail_hook(hook);
        Ok(())
    }

    pub fn set_weather(&mut self, params: WeatherParams) -> Result<()> {
        self.weather = Some(WeatherRenderer::new(&self.textures, params)?);
        Ok(())
    }

    pub fn clear_weather(&mut self) {
        self.weather = None;
    }

    pub fn weather(&self) -> Option<&WeatherRenderer> {
        self.weather.as_ref()
    }

    pub fn weather_mut(&mut self) -> Option<&mut WeatherRenderer> {
        self.weather.as_mut()
    }

    /// Add a sky layer; layers draw in the order they were added
    pub fn add_backdrop(&mut self, config: BackdropConfig) -> Result<()> {
        self.backdrops.push(BackdropRenderer::new(&self.textures, config)?);
        Ok(())
    }

    pub fn backdrops(&self) -> &[BackdropRenderer] {
        &self.backdrops
    }

    /// Draw a blob shadow on the plane `y = ground_y` under every active bullet
    pub fn enable_shadows(&mut self, ground_y: f32) -> Result<()> {
        self.shadow = Some(ShadowRenderer::new(&self.textures)?);
        self.ground_y = ground_y;
        Ok(())
    }

    /// Advance every system by one host frame and submit its draws
    pub fn tick(&mut self, frame: &FrameInput, sink: &mut dyn DrawSink) -> Result<()> {
        let mut ctx = TickContext::new(frame, &mut self.rng, sink);

        for backdrop in &mut self.backdrops {
            backdrop.update(&mut ctx)?;
        }
        for pool in self.pools.values_mut() {
            pool.update(&mut ctx)?;
        }
        if let Some(shadow) = &self.shadow {
            for bullet in self
                .pools
                .values()
                .filter(|p| p.visible)
                .flat_map(|p| p.bullets())
                .filter(|b| b.active)
            {
                shadow.draw_at(ctx.sink, frame, bullet.position, self.ground_y, DEFAULT_SHADOW_SIZE);
            }
        }
        if let Some(weather) = &mut self.weather {
            weather.update(&mut ctx)?;
        }

        self.frame += 1;
        self.elapsed_ms += frame.elapsed_ms;
        Ok(())
    }

    pub fn stats(&self) -> SimStats {
        SimStats {
            frame: self.frame,
            elapsed_ms: self.elapsed_ms,
            active_bullets: self.pools.values().map(|p| p.live_count()).sum(),
            allocated_bullets: self.pools.values().map(|p| p.len()).sum(),
            active_debris: self.weather.as_ref().map_or(0, |w| w.live_count()),
            live_sprites: self.cache.live_count(),
        }
    }
}
