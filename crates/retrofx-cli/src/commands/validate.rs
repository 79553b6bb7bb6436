//! Scenario validation command

use anyhow::{Context, Result};
use retrofx_scene::{load_scenario, ScenarioFile, Simulation};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ValidationReport {
    name: String,
    seed: u32,
    viewport: [f32; 2],
    textures: usize,
    backdrops: usize,
    weather: Option<String>,
    shadows: bool,
    spawns: usize,
    last_spawn_frame: Option<u64>,
    bullet_types: Vec<u8>,
    sprite_resources: usize,
}

fn report(scenario: &ScenarioFile, sim: &Simulation) -> ValidationReport {
    ValidationReport {
        name: scenario.scenario.name.clone(),
        seed: scenario.scenario.seed,
        viewport: scenario.scenario.viewport,
        textures: sim.textures().len(),
        backdrops: sim.backdrops().len(),
        weather: sim.weather().map(|w| format!("{:?}", w.params().kind).to_lowercase()),
        shadows: scenario.scenario.shadows,
        spawns: scenario.spawn.len(),
        last_spawn_frame: scenario.spawn.last().map(|s| s.frame),
        bullet_types: sim.pools().map(|p| p.bullet_type()).collect(),
        sprite_resources: sim.cache().live_count(),
    }
}

pub fn run(path: &str, format: &str) -> Result<()> {
    let scenario = load_scenario(path).with_context(|| format!("Failed to load scenario '{}'", path))?;
    let sim = Simulation::from_scenario(&scenario)
        .with_context(|| format!("Scenario '{}' does not resolve", path))?;
    let report = report(&scenario, &sim);

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Scenario '{}' is valid", report.name);
    println!("  Seed:             0x{:x}", report.seed);
    println!("  Viewport:         {}x{}", report.viewport[0], report.viewport[1]);
    println!("  Textures:         {}", report.textures);
    println!("  Backdrops:        {}", report.backdrops);
    println!("  Weather:          {}", report.weather.as_deref().unwrap_or("none"));
    println!("  Shadows:          {}", if report.shadows { "on" } else { "off" });
    match report.last_spawn_frame {
        Some(frame) => println!("  Spawns:           {} (last at frame {})", report.spawns, frame),
        None => println!("  Spawns:           0"),
    }
    println!("  Bullet types:     {:?}", report.bullet_types);
    println!("  Sprite resources: {}", report.sprite_resources);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use retrofx_scene::load_scenario_str;

    #[test]
    fn report_counts_resolved_resources() {
        let scenario = load_scenario_str(
            r#"
[scenario]
name = "Check"

[weather]
kind = "snow"

[[spawn]]
frame = 4
type = 9
position = [0, 0, 0]

[[spawn]]
frame = 8
type = 0
position = [0, 0, 0]
"#,
        )
        .unwrap();
        let sim = Simulation::from_scenario(&scenario).unwrap();
        let report = report(&scenario, &sim);
        assert_eq!(report.weather.as_deref(), Some("snow"));
        assert_eq!(report.bullet_types, vec![0, 9]);
        assert_eq!(report.last_spawn_frame, Some(8));
        // egg, sfair, fardus
        assert_eq!(report.sprite_resources, 3);
    }
}
