//! Headless scenario playback
//!
//! Drives a `Simulation` with synthetic host frames: fixed elapsed time,
//! camera from the scenario's `[camera]` path, spawn events fired at the
//! start of their frame.

use crate::format::ScenarioFile;
use crate::simulation::{SimStats, Simulation};
use retrofx_core::{Result, Vec3};
use retrofx_runtime::{DrawCommand, DrawSink, SpriteRenderer};
use serde::Serialize;

/// What one replayed frame produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameReport {
    pub frame: u64,
    pub time_ms: f64,
    pub spawned: usize,
    pub draws: usize,
    pub stats: SimStats,
}

/// Forwards to another sink, counting submissions
struct CountingSink<'a> {
    inner: &'a mut dyn DrawSink,
    count: usize,
}

impl DrawSink for CountingSink<'_> {
    fn submit(&mut self, renderer: &SpriteRenderer, command: DrawCommand) {
        self.count += 1;
        self.inner.submit(renderer, command);
    }
}

pub struct Replay {
    scenario: ScenarioFile,
    sim: Simulation,
    next_spawn: usize,
    frame: u64,
    time_ms: f64,
}

impl Replay {
    pub fn new(scenario: ScenarioFile) -> Result<Self> {
        let sim = Simulation::from_scenario(&scenario)?;
        Ok(Self {
            scenario,
            sim,
            next_spawn: 0,
            frame: 0,
            time_ms: 0.0,
        })
    }

    pub fn scenario(&self) -> &ScenarioFile {
        &self.scenario
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn simulation_mut(&mut self) -> &mut Simulation {
        &mut self.sim
    }

    /// Spawn events not yet fired
    pub fn pending_spawns(&self) -> usize {
        self.scenario.spawn.len() - self.next_spawn
    }

    /// Fire this frame's spawns, then tick the simulation once
    pub fn step(&mut self, elapsed_ms: f64, sink: &mut dyn DrawSink) -> Result<FrameReport> {
        let mut spawned = 0;
        while let Some(event) = self.scenario.spawn.get(self.next_spawn) {
            if event.frame > self.frame {
                break;
            }
            self.sim.fire(
                event.bullet_type,
                Vec3::from_array(event.position),
                Vec3::from_array(event.velocity),
            )?;
            self.next_spawn += 1;
            spawned += 1;
        }

        self.time_ms += elapsed_ms;
        let input = self
            .scenario
            .camera
            .frame(self.time_ms, elapsed_ms, self.scenario.scenario.viewport);

        let mut counter = CountingSink { inner: sink, count: 0 };
        self.sim.tick(&input, &mut counter)?;

        let report = FrameReport {
            frame: self.frame,
            time_ms: self.time_ms,
            spawned,
            draws: counter.count,
            stats: self.sim.stats(),
        };
        self.frame += 1;
        Ok(report)
    }

    /// Step `frames` times with a constant frame length
    pub fn run(&mut self, frames: u64, elapsed_ms: f64, sink: &mut dyn DrawSink) -> Result<Vec<FrameReport>> {
        (0..frames).map(|_| self.step(elapsed_ms, sink)).collect()
    }
}
