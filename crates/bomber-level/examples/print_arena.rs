//! Generate an arena and print it as ASCII.
//!
//! ```text
//! cargo run -p bomber-level --example print_arena -- [config.json] [width] [height]
//! ```
//!
//! Legend: `#` wall, `x` box, `P` player, `.` empty. Set `RUST_LOG=debug` to
//! see the generation trace.

use anyhow::Context;
use bomber_level::prelude::*;
use glam::Vec3;

fn glyph(kind: ActorType) -> char {
    match kind {
        ActorType::None => '.',
        ActorType::Wall => '#',
        ActorType::Box => 'x',
        ActorType::Player => 'P',
        ActorType::Bomb => 'o',
        ActorType::Item => '+',
    }
}

fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) if path.ends_with(".json") => {
            LevelConfig::load(&path).with_context(|| format!("loading {path}"))?
        }
        _ => LevelConfig::default(),
    };
    let width: f32 = args.next().map(|w| w.parse()).transpose()?.unwrap_or(13.0);
    let height: f32 = args.next().map(|h| h.parse()).transpose()?.unwrap_or(11.0);

    let transform = MapTransform::new(Vec3::ZERO, 0.0, Vec3::new(width, height, 1.0));
    let mut map = LevelMap::new(config, transform).context("building level map")?;
    let mut world = ActorWorld::new(map.catalog().clone());
    let report = map.generate(&mut world).context("generating level")?;

    let dims = map.dimensions().context("lattice was not built")?;
    // Row 0 is the bottom of the map; print top-down.
    for y in (0..dims.height).rev() {
        let row: String = (0..dims.width)
            .map(|x| {
                let kind = map
                    .grid()
                    .cell_at(dims.index(x, y))
                    .and_then(|cell| map.occupant_at(cell))
                    .map(|o| o.kind)
                    .unwrap_or_default();
                glyph(kind)
            })
            .collect();
        println!("{row}");
    }

    println!();
    println!("size     {} x {}", dims.width, dims.height);
    for kind in [ActorType::Wall, ActorType::Box, ActorType::Player] {
        println!("{:<8} {}", kind.to_string(), report.layout.decided(kind));
    }
    println!("spawned  {}", report.spawned_count());
    println!("layout   {}", report.layout.hash);
    Ok(())
}
