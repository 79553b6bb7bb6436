//! Scenario loading from TOML files

use crate::format::ScenarioFile;
use retrofx_core::{Result, RetroError};
use retrofx_weather::WeatherParams;
use std::fs;
use std::path::Path;

/// Load a scenario from a TOML file
pub fn load_scenario<P: AsRef<Path>>(path: P) -> Result<ScenarioFile> {
    let content = fs::read_to_string(path)?;
    load_scenario_str(&content)
}

/// Load a scenario from a TOML string
pub fn load_scenario_str(content: &str) -> Result<ScenarioFile> {
    let scenario: ScenarioFile = toml::from_str(content)?;
    validate(&scenario)?;

    log::info!(
        target: "scene",
        "loaded scenario '{}': {} spawn(s), {} backdrop(s), weather {}",
        scenario.scenario.name,
        scenario.spawn.len(),
        scenario.backdrop.len(),
        if scenario.weather.is_some() { "on" } else { "off" }
    );
    Ok(scenario)
}

/// Checks that need no texture or table lookups
fn validate(scenario: &ScenarioFile) -> Result<()> {
    let [width, height] = scenario.scenario.viewport;
    if !(width > 0.0 && height > 0.0) {
        return Err(RetroError::ScenarioError(format!(
            "viewport must be positive, got {width}x{height}"
        )));
    }
    if let Some(table) = &scenario.weather {
        WeatherParams::from_toml(table)?;
    }
    if let Some(pair) = scenario.spawn.windows(2).find(|w| w[1].frame < w[0].frame) {
        return Err(RetroError::ScenarioError(format!(
            "spawn at frame {} listed after frame {}",
            pair[1].frame, pair[0].frame
        )));
    }
    Ok(())
}
