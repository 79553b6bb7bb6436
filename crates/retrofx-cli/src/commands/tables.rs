//! Builtin table listing

use anyhow::{bail, Context, Result};
use retrofx_bullets::{builtin_flipbooks, BulletTable, BulletTypeParams};
use retrofx_sprite::{SpriteMetadata, SpriteTable};
use serde::Serialize;
use std::rc::Rc;

#[derive(Serialize)]
struct BulletRow<'a> {
    id: u8,
    #[serde(flatten)]
    params: &'a BulletTypeParams,
}

pub fn run(table: Option<&str>, format: &str) -> Result<()> {
    let (bullets, flipbooks) = match table {
        None => (true, true),
        Some("bullets") => (true, false),
        Some("flipbooks") => (false, true),
        Some(other) => bail!("unknown table '{}'; valid values: bullets, flipbooks", other),
    };

    if bullets {
        let table = BulletTable::builtin().context("Builtin bullet table is malformed")?;
        if format == "json" {
            let rows: Vec<BulletRow> = table.iter().map(|(id, params)| BulletRow { id, params }).collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        } else {
            print_bullets(&table);
        }
    }
    if flipbooks {
        let sprites = builtin_flipbooks().context("Builtin flipbook table is malformed")?;
        if format == "json" {
            let entries: Vec<&SpriteMetadata> = sprites.entries().iter().map(Rc::as_ref).collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        } else {
            print_flipbooks(&sprites);
        }
    }
    Ok(())
}

fn flipbook_ref(index: Option<i64>) -> String {
    index.map_or_else(|| "-".to_string(), |i| i.to_string())
}

fn print_bullets(table: &BulletTable) {
    println!("Bullet types ({}):", table.len());
    println!(
        "{:>4} {:>8} {:>8} {:>6} {:>6} {:>6} {:>6}  model",
        "id", "mobility", "lifetime", "fb1", "fb2", "trail", "radius"
    );
    for (id, params) in table.iter() {
        let trail = if params.has_trail() {
            params.trail_particle_type.to_string()
        } else {
            "-".to_string()
        };
        println!(
            "{:>4} {:>8.1} {:>8} {:>6} {:>6} {:>6} {:>6.1}  {}",
            id,
            params.mobility,
            params.lifetime,
            flipbook_ref(params.flipbook1),
            flipbook_ref(params.flipbook2),
            trail,
            params.max_radius,
            params.model.as_deref().unwrap_or("-")
        );
    }
}

fn print_flipbooks(sprites: &SpriteTable) {
    println!("Flipbooks ({}):", sprites.len());
    for (index, meta) in sprites.entries().iter().enumerate() {
        println!(
            "  [{}] {} ({} frame(s), {:?}, delay {}) alpha {}->{} size {}->{}{}",
            index,
            meta.name,
            meta.frame_count(),
            meta.kind,
            meta.frame_delay,
            meta.start_alpha,
            meta.end_alpha,
            meta.start_size,
            meta.end_size,
            if meta.is_translucent() { " translucent" } else { "" }
        );
    }
}
