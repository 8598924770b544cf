//! Discrete grid addresses.
//!
//! A [`Cell`] is stored as integer grid coordinates (multiples of the cell
//! size). Converting a world position into a cell always goes through the same
//! snapping rule, so two cells compare equal exactly when their snapped
//! coordinates do. Raw floats are never compared.
//!
//! ```
//! use bomber_grid::cell::Cell;
//! use glam::Vec3;
//!
//! let cell = Cell::from_position(Vec3::new(390.0, -120.0, 55.0), 200.0);
//! assert_eq!((cell.x(), cell.y()), (2, -1));
//! assert_eq!(cell.location(200.0), Vec3::new(400.0, -200.0, 0.0));
//! ```

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::registry::GridRegistry;

/// Side length of one cell in world units unless configured otherwise.
pub const DEFAULT_CELL_SIZE: f32 = 200.0;

/// Vertical level shared by every cell.
pub const FLOOR_Z: f32 = 0.0;

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

/// One discrete address on the level grid.
///
/// Coordinates are expressed in cells, not world units: the world location of
/// a cell is `(x * cell_size, y * cell_size, FLOOR_Z)`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    x: i32,
    y: i32,
}

impl Cell {
    /// The cell under the world origin.
    pub const ZERO: Cell = Cell { x: 0, y: 0 };

    /// Sentinel for "no cell": returned when there is no lattice to snap to.
    pub const INVALID: Cell = Cell {
        x: i32::MIN,
        y: i32::MIN,
    };

    /// Construct a cell from grid coordinates.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Column in grid coordinates.
    #[inline]
    pub const fn x(self) -> i32 {
        self.x
    }

    /// Row in grid coordinates.
    #[inline]
    pub const fn y(self) -> i32 {
        self.y
    }

    /// `false` only for [`Cell::INVALID`].
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }

    /// Snap a world position to the nearest multiple of `cell_size` on both
    /// horizontal axes. The vertical component is ignored.
    ///
    /// Grid coordinates cover `i32::MIN + 1 ..= i32::MAX`. A position that is
    /// not finite or snaps outside that range yields [`Cell::INVALID`], which
    /// no lattice contains.
    pub fn from_position(position: Vec3, cell_size: f32) -> Self {
        Self::from_snapped(
            snap_axis(f64::from(position.x), cell_size),
            snap_axis(f64::from(position.y), cell_size),
        )
    }

    /// Locate the cell under `position` on the registry's grid.
    ///
    /// Returns [`Cell::INVALID`] when the registry has no lattice yet. The
    /// result is not checked for lattice membership; use
    /// [`GridRegistry::contains_cell`] for that.
    pub fn nearest_to(position: Vec3, registry: &GridRegistry) -> Self {
        if registry.is_empty() {
            return Self::INVALID;
        }
        Self::from_position(position, registry.cell_size())
    }

    /// World location of this cell.
    pub fn location(self, cell_size: f32) -> Vec3 {
        Vec3::new(self.x as f32 * cell_size, self.y as f32 * cell_size, FLOOR_Z)
    }

    /// Rotate this cell's location about `center` by `yaw_degrees` around the
    /// vertical axis, then snap the result back onto the grid.
    ///
    /// Positive angles turn counter-clockwise (x toward y).
    pub fn rotate_around(self, center: Vec3, yaw_degrees: f32, cell_size: f32) -> Self {
        let size = f64::from(cell_size);
        let (sin, cos) = f64::from(yaw_degrees).to_radians().sin_cos();
        let dx = f64::from(self.x) * size - f64::from(center.x);
        let dy = f64::from(self.y) * size - f64::from(center.y);
        Self::from_snapped(
            snap_axis(f64::from(center.x) + dx * cos - dy * sin, cell_size),
            snap_axis(f64::from(center.y) + dx * sin + dy * cos, cell_size),
        )
    }

    fn from_snapped(x: Option<i32>, y: Option<i32>) -> Self {
        match (x, y) {
            (Some(x), Some(y)) => Self { x, y },
            _ => Self::INVALID,
        }
    }

    /// Euclidean distance between two cells, measured in cells.
    pub fn distance(self, other: Cell) -> f32 {
        let dx = i64::from(self.x) - i64::from(other.x);
        let dy = i64::from(self.y) - i64::from(other.y);
        ((dx * dx + dy * dy) as f64).sqrt() as f32
    }

    /// The neighbour `dx` columns and `dy` rows away, or `None` on overflow.
    pub fn offset(self, dx: i32, dy: i32) -> Option<Cell> {
        Some(Self {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
        })
    }

    /// Snapped mean location of a set of cells. `None` when `cells` is empty.
    pub fn average<I>(cells: I) -> Option<Cell>
    where
        I: IntoIterator<Item = Cell>,
    {
        let mut count = 0i64;
        let (mut sum_x, mut sum_y) = (0i64, 0i64);
        for cell in cells {
            sum_x += i64::from(cell.x);
            sum_y += i64::from(cell.y);
            count += 1;
        }
        if count == 0 {
            return None;
        }
        let mean = |sum: i64| ((sum as f64 / count as f64) + 0.5).floor() as i32;
        Some(Self {
            x: mean(sum_x),
            y: mean(sum_y),
        })
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "Cell({}, {})", self.x, self.y)
        } else {
            f.write_str("Cell(invalid)")
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// `floor(value / size + 0.5)`: rounds half-way points toward +inf. `None`
/// when the result is not a representable grid coordinate.
fn snap_axis(value: f64, cell_size: f32) -> Option<i32> {
    let snapped = (value / f64::from(cell_size) + 0.5).floor();
    let in_range = snapped > f64::from(i32::MIN) && snapped <= f64::from(i32::MAX);
    in_range.then_some(snapped as i32)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: f32 = DEFAULT_CELL_SIZE;

    #[test]
    fn snaps_to_nearest_multiple() {
        assert_eq!(Cell::from_position(Vec3::new(99.0, 101.0, 0.0), SIZE), Cell::new(0, 1));
        assert_eq!(Cell::from_position(Vec3::new(-301.0, -299.0, 0.0), SIZE), Cell::new(-2, -1));
    }

    #[test]
    fn half_way_rounds_up() {
        assert_eq!(Cell::from_position(Vec3::new(-500.0, 100.0, 0.0), SIZE), Cell::new(-2, 1));
    }

    #[test]
    fn unrepresentable_positions_are_invalid() {
        let far = Cell::from_position(Vec3::new(-1e12, -1e12, 0.0), SIZE);
        assert_eq!(far, Cell::INVALID);
        let half_far = Cell::from_position(Vec3::new(1e12, 0.0, 0.0), SIZE);
        assert!(!half_far.is_valid());
        assert!(!Cell::from_position(Vec3::new(f32::NAN, 0.0, 0.0), SIZE).is_valid());
        assert!(!Cell::from_position(Vec3::new(0.0, f32::INFINITY, 0.0), SIZE).is_valid());
    }

    #[test]
    fn range_edges_snap_exactly() {
        let top = Cell::from_position(Vec3::new(2.0e9, 0.0, 0.0), 1.0);
        assert_eq!(top, Cell::new(2_000_000_000, 0));
        let near_bottom = Cell::from_position(Vec3::new(-2.0e9, -2.0e9, 0.0), 1.0);
        assert_eq!(near_bottom, Cell::new(-2_000_000_000, -2_000_000_000));
    }

    #[test]
    fn vertical_component_is_ignored() {
        let low = Cell::from_position(Vec3::new(400.0, 0.0, -900.0), SIZE);
        let high = Cell::from_position(Vec3::new(400.0, 0.0, 900.0), SIZE);
        assert_eq!(low, high);
        assert_eq!(low.location(SIZE).z, FLOOR_Z);
    }

    #[test]
    fn snapping_is_idempotent() {
        let cell = Cell::from_position(Vec3::new(1234.5, -987.6, 3.0), SIZE);
        assert_eq!(Cell::from_position(cell.location(SIZE), SIZE), cell);
    }

    #[test]
    fn nearest_to_without_lattice_is_invalid() {
        let registry = GridRegistry::default();
        let cell = Cell::nearest_to(Vec3::new(10.0, 10.0, 0.0), &registry);
        assert!(!cell.is_valid());
        assert_eq!(cell, Cell::default());
    }

    #[test]
    fn rotate_quarter_turn_about_origin() {
        let rotated = Cell::new(2, 1).rotate_around(Vec3::ZERO, 90.0, SIZE);
        assert_eq!(rotated, Cell::new(-1, 2));
    }

    #[test]
    fn rotate_about_offset_center() {
        let center = Cell::new(3, 3).location(SIZE);
        let rotated = Cell::new(4, 3).rotate_around(center, 180.0, SIZE);
        assert_eq!(rotated, Cell::new(2, 3));
    }

    #[test]
    fn full_turn_is_identity() {
        let cell = Cell::new(-7, 11);
        assert_eq!(cell.rotate_around(Vec3::new(200.0, -400.0, 0.0), 360.0, SIZE), cell);
    }

    #[test]
    fn distance_in_cells() {
        assert_eq!(Cell::new(0, 0).distance(Cell::new(3, 4)), 5.0);
        assert_eq!(Cell::new(1, 1).distance(Cell::new(1, 1)), 0.0);
        assert!((Cell::new(0, 0).distance(Cell::new(1, 1)) - 2f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn average_of_cells() {
        let cells = [Cell::new(0, 0), Cell::new(2, 0), Cell::new(2, 2), Cell::new(0, 2)];
        assert_eq!(Cell::average(cells), Some(Cell::new(1, 1)));
        assert_eq!(Cell::average(Vec::new()), None);
    }

    #[test]
    fn offset_overflow_is_none() {
        assert_eq!(Cell::new(1, 1).offset(-1, 2), Some(Cell::new(0, 3)));
        assert_eq!(Cell::new(i32::MAX, 0).offset(1, 0), None);
    }

    #[test]
    fn debug_formats_sentinel() {
        assert_eq!(format!("{:?}", Cell::new(1, -2)), "Cell(1, -2)");
        assert_eq!(format!("{:?}", Cell::INVALID), "Cell(invalid)");
        assert_eq!(Cell::new(1, -2).to_string(), "(1, -2)");
    }
}
