//! retrofx Weather - Screen-space rain and snow
//!
//! Debris are emitted from a fractional credit that accumulates once per
//! 1/30 s quantum, spread over three depth layers, and scrolled against the
//! camera so nearer layers appear to move faster.

mod params;
mod renderer;

pub use params::{WeatherKind, WeatherParams, RAIN_TEXTURE, SNOW_TEXTURE};
pub use renderer::{Debris, WeatherRenderer, DEBRIS_SLOTS};
