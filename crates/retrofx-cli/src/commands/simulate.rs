//! Headless scenario replay

use anyhow::{bail, Context, Result};
use retrofx_runtime::{RecordedDraw, RecordingSink, RendererKind};
use retrofx_scene::{load_scenario, FrameReport, Replay};
use serde::Serialize;
use std::fmt::Write as _;

pub struct SimulateArgs {
    pub scenario: String,
    pub frames: u64,
    pub delta_ms: f64,
    pub format: String,
    pub every: u64,
    pub output: Option<String>,
}

#[derive(Serialize)]
struct JsonReplay<'a> {
    scenario: &'a str,
    delta_ms: f64,
    frames: &'a [FrameReport],
    draws: &'a [RecordedDraw],
}

pub fn run(args: SimulateArgs) -> Result<()> {
    if args.delta_ms.is_nan() || args.delta_ms <= 0.0 {
        bail!("--delta-ms must be positive, got {}", args.delta_ms);
    }

    let scenario =
        load_scenario(&args.scenario).with_context(|| format!("Failed to load scenario '{}'", args.scenario))?;
    let name = scenario.scenario.name.clone();
    let mut replay = Replay::new(scenario).with_context(|| format!("Failed to set up scenario '{}'", name))?;

    let mut sink = RecordingSink::new();
    let reports = replay
        .run(args.frames, args.delta_ms, &mut sink)
        .with_context(|| format!("Replay of '{}' failed", name))?;

    let text = if args.format == "json" {
        let doc = JsonReplay {
            scenario: &name,
            delta_ms: args.delta_ms,
            frames: &reports,
            draws: &sink.draws,
        };
        serde_json::to_string_pretty(&doc)?
    } else {
        summary(&name, &reports, &sink, args.every.max(1))
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, text).with_context(|| format!("Failed to write '{}'", path))?;
            println!("Wrote {} frame(s) to {}", reports.len(), path);
        }
        None => print!("{}", text),
    }
    Ok(())
}

fn summary(name: &str, reports: &[FrameReport], sink: &RecordingSink, every: u64) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Scenario: {}", name);
    let _ = writeln!(
        out,
        "{:>6} {:>10} {:>6} {:>8} {:>8} {:>7}",
        "frame", "time_ms", "draws", "bullets", "debris", "sprites"
    );
    for report in reports {
        let last = report.frame + 1 == reports.len() as u64;
        if report.frame % every == 0 || last {
            let _ = writeln!(
                out,
                "{:>6} {:>10.1} {:>6} {:>8} {:>8} {:>7}",
                report.frame,
                report.time_ms,
                report.draws,
                report.stats.active_bullets,
                report.stats.active_debris,
                report.stats.live_sprites
            );
        }
    }

    let spawned: usize = reports.iter().map(|r| r.spawned).sum();
    let peak_bullets = reports.iter().map(|r| r.stats.allocated_bullets).max().unwrap_or(0);
    let _ = writeln!(out);
    let _ = writeln!(out, "Spawned:         {}", spawned);
    let _ = writeln!(out, "Pool capacity:   {}", peak_bullets);
    let _ = writeln!(out, "Total draws:     {}", sink.draws.len());
    for kind in [
        RendererKind::Backdrop,
        RendererKind::Billboard,
        RendererKind::Shadow,
        RendererKind::UiOverlay,
    ] {
        let _ = writeln!(out, "  {:<14} {}", format!("{:?}", kind), sink.count_kind(kind));
    }
    out
}
