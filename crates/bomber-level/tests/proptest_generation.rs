//! Property tests for generation passes.
//!
//! Random map sizes, seeds, box densities and player capacities are generated
//! and the placement rules are checked on the resulting grid.

use std::collections::HashSet;

use bomber_level::generator::outside_corner_zone;
use bomber_level::prelude::*;
use glam::Vec3;
use proptest::prelude::*;

fn pass(
    width: u32,
    height: u32,
    seed: u64,
    box_chance: u8,
    players: u32,
) -> (LevelMap, ActorWorld, GenerationReport) {
    let config = LevelConfig {
        seed: Some(seed),
        box_chance,
        players_number: players,
        ..LevelConfig::default()
    };
    let transform = MapTransform::new(Vec3::ZERO, 0.0, Vec3::new(width as f32, height as f32, 1.0));
    let mut map = LevelMap::new(config, transform).unwrap();
    let mut world = ActorWorld::new(map.catalog().clone());
    let report = map.generate(&mut world).unwrap();
    (map, world, report)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn placement_rules_hold(
        width in 1u32..16,
        height in 1u32..16,
        seed in any::<u64>(),
        box_chance in 0u8..=100,
        players in 0u32..6,
    ) {
        let (mut map, world, report) = pass(width, height, seed, box_chance, players);
        let dims = map.dimensions().unwrap();

        prop_assert_eq!(dims.width % 2, 1);
        prop_assert_eq!(dims.height % 2, 1);
        prop_assert!(dims.width >= width && dims.width <= width + 1);
        prop_assert!(dims.height >= height && dims.height <= height + 1);

        let distinct: HashSet<Cell> = map.cells().collect();
        prop_assert_eq!(distinct.len(), dims.cell_count());

        let corners: HashSet<(u32, u32)> = [
            (0, 0),
            (dims.width - 1, 0),
            (0, dims.height - 1),
            (dims.width - 1, dims.height - 1),
        ]
        .into_iter()
        .collect();

        for entry in &report.layout.entries {
            let odd = entry.x % 2 == 1 && entry.y % 2 == 1;
            prop_assert_eq!(entry.kind == ActorType::Wall, odd);
            if entry.kind == ActorType::Player {
                prop_assert!(corners.contains(&(entry.x, entry.y)));
            }
            if entry.kind == ActorType::Box {
                prop_assert!(outside_corner_zone(entry.x, entry.y, dims));
            }
        }

        let placed = report.layout.decided(ActorType::Player);
        prop_assert_eq!(placed, corners.len().min(players as usize));
        prop_assert_eq!(map.characters(&world).count(), placed);

        prop_assert_eq!(report.declined_count(), 0);
        prop_assert_eq!(map.grid().occupied_count(), report.spawned_count());
        prop_assert_eq!(world.len(), report.spawned_count());
    }

    #[test]
    fn seeded_passes_are_reproducible(
        width in 1u32..12,
        height in 1u32..12,
        seed in any::<u64>(),
        box_chance in 0u8..=100,
    ) {
        let (_, _, first) = pass(width, height, seed, box_chance, 4);
        let (_, _, second) = pass(width, height, seed, box_chance, 4);
        prop_assert_eq!(&first.layout.hash, &second.layout.hash);
        prop_assert!(first.layout.verify().unwrap());
    }
}
