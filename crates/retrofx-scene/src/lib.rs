//! retrofx Scene - Simulation context and scenario files
//!
//! A scenario is a TOML file declaring the viewport, seed, extra textures,
//! weather, sky layers, a scripted camera and timed bullet spawns.
//! `Simulation` owns the shared state and ticks every system, `Replay`
//! plays a scenario back without a host renderer.

mod camera;
mod format;
mod loader;
mod replay;
mod simulation;

pub use camera::CameraPath;
pub use format::{ScenarioFile, ScenarioMeta, SpawnEvent};
pub use loader::{load_scenario, load_scenario_str};
pub use replay::{FrameReport, Replay};
pub use simulation::{builtin_textures, SimStats, Simulation};
