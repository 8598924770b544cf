//! Property tests for cells and the grid registry.
//!
//! Random sequences of insert/remove operations are applied to a registry and
//! the occupant bookkeeping is checked after every step.

use std::collections::HashSet;

use bomber_grid::prelude::*;
use glam::Vec3;
use proptest::prelude::*;

const SIZE: f32 = DEFAULT_CELL_SIZE;

/// Operations applied to the registry.
#[derive(Debug, Clone)]
enum GridOp {
    Insert { x: i32, y: i32, actor: u32, kind: ActorType },
    Remove { actor: u32 },
    Prune { dead: u32 },
}

fn kind_strategy() -> impl Strategy<Value = ActorType> {
    prop_oneof![
        Just(ActorType::Wall),
        Just(ActorType::Box),
        Just(ActorType::Player),
        Just(ActorType::Bomb),
        Just(ActorType::Item),
        Just(ActorType::None),
    ]
}

fn grid_op_strategy() -> impl Strategy<Value = GridOp> {
    prop_oneof![
        4 => (-1..6i32, -1..6i32, 0..12u32, kind_strategy())
            .prop_map(|(x, y, actor, kind)| GridOp::Insert { x, y, actor, kind }),
        2 => (0..12u32).prop_map(|actor| GridOp::Remove { actor }),
        1 => (0..12u32).prop_map(|dead| GridOp::Prune { dead }),
    ]
}

/// Strategy for finite world coordinates.
fn coordinate() -> impl Strategy<Value = f32> {
    (-2_000_000i32..2_000_000i32).prop_map(|v| v as f32 * 0.01)
}

fn lattice_5x5() -> GridRegistry {
    let mut grid = GridRegistry::default();
    let cells = (0..5).flat_map(|y| (0..5).map(move |x| Cell::new(x, y)));
    grid.rebuild_lattice(cells).unwrap();
    grid
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2_000))]

    #[test]
    fn snapping_is_idempotent(x in coordinate(), y in coordinate(), z in coordinate()) {
        let cell = Cell::from_position(Vec3::new(x, y, z), SIZE);
        prop_assert_eq!(Cell::from_position(cell.location(SIZE), SIZE), cell);
    }

    #[test]
    fn snapped_location_is_within_half_a_cell(x in coordinate(), y in coordinate()) {
        let location = Cell::from_position(Vec3::new(x, y, 0.0), SIZE).location(SIZE);
        prop_assert!((location.x - x).abs() <= SIZE / 2.0 + 0.01);
        prop_assert!((location.y - y).abs() <= SIZE / 2.0 + 0.01);
    }

    #[test]
    fn four_quarter_turns_return_home(
        x in -500..500i32,
        y in -500..500i32,
        cx in -50..50i32,
        cy in -50..50i32,
    ) {
        let center = Cell::new(cx, cy).location(SIZE);
        let start = Cell::new(x, y);
        let mut cell = start;
        for _ in 0..4 {
            cell = cell.rotate_around(center, 90.0, SIZE);
        }
        prop_assert_eq!(cell, start);
    }

    #[test]
    fn random_ops_keep_occupants_unique(ops in prop::collection::vec(grid_op_strategy(), 1..60)) {
        let mut grid = lattice_5x5();

        for op in ops {
            match op {
                GridOp::Insert { x, y, actor, kind } => {
                    let cell = Cell::new(x, y);
                    let actor = ActorId::new(actor, 0);
                    let accepted = grid.insert(cell, actor, kind);
                    prop_assert_eq!(accepted, grid.contains_cell(cell) && kind != ActorType::None);
                    if accepted {
                        prop_assert_eq!(grid.actor_at(cell), Some(actor));
                        prop_assert_eq!(grid.cell_of(actor), Some(cell));
                    }
                }
                GridOp::Remove { actor } => {
                    let actor = ActorId::new(actor, 0);
                    let _ = grid.remove(actor);
                    prop_assert_eq!(grid.cell_of(actor), None);
                }
                GridOp::Prune { dead } => {
                    let dead = ActorId::new(dead, 0);
                    let _ = grid.prune_stale_characters(|id| id != dead);
                    prop_assert!(!grid.indexed_characters().contains(&dead));
                }
            }

            // Invariant: no actor appears under two cells.
            let mut seen = HashSet::new();
            for (cell, occupant) in grid.occupants() {
                prop_assert!(seen.insert(occupant.actor), "{:?} listed twice", occupant.actor);
                prop_assert_eq!(grid.cell_of(occupant.actor), Some(cell));
            }
            prop_assert_eq!(seen.len(), grid.occupied_count());

            // Invariant: the character index mirrors the occupant map.
            for &actor in grid.indexed_characters() {
                let cell = grid.cell_of(actor);
                prop_assert!(cell.is_some(), "indexed character {:?} has no cell", actor);
                let kind = cell.and_then(|c| grid.occupant_at(c)).map(|o| o.kind);
                prop_assert_eq!(kind, Some(ActorType::Player));
            }
        }
    }
}
