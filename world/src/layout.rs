//! Built-in truth maps seeded when a world is created.

use gridslam_core::{Dimensions, GridCoord, Occupancy, Space};
use serde::{Deserialize, Serialize};

use crate::grid::Grid;

/// Selects the interior painted inside the border when a world is created.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Maze for planar worlds, two-storey house for volumetric worlds.
    #[default]
    Furnished,
    /// Border and ground only.
    Empty,
}

/// Inclusive box painted with a single state.
#[derive(Clone, Copy, Debug)]
struct Stroke {
    min: (u32, u32, u32),
    max: (u32, u32, u32),
    value: Occupancy,
}

const fn wall(min: (u32, u32, u32), max: (u32, u32, u32)) -> Stroke {
    Stroke {
        min,
        max,
        value: Occupancy::Solid,
    }
}

const fn opening(min: (u32, u32, u32), max: (u32, u32, u32)) -> Stroke {
    Stroke {
        min,
        max,
        value: Occupancy::Empty,
    }
}

/// Corridors and rooms of the planar maze, authored for 50 by 50 cells.
const MAZE: &[Stroke] = &[
    wall((5, 10, 0), (24, 10, 0)),
    wall((10, 20, 0), (34, 20, 0)),
    wall((15, 30, 0), (39, 30, 0)),
    wall((15, 5, 0), (15, 19, 0)),
    wall((30, 15, 0), (30, 34, 0)),
    wall((20, 25, 0), (29, 25, 0)),
    wall((20, 25, 0), (20, 34, 0)),
    wall((40, 12, 0), (40, 14, 0)),
    wall((10, 35, 0), (12, 35, 0)),
];

/// Rooms, furniture, stairs, and mezzanine of the volumetric house,
/// authored for 50 by 50 cells and 20 levels. Order matters: openings carve
/// through the walls painted before them.
const HOUSE: &[Stroke] = &[
    // kitchen partition
    wall((5, 15, 1), (22, 15, 3)),
    opening((12, 15, 1), (15, 15, 3)),
    // bedroom partitions
    wall((30, 5, 1), (30, 25, 3)),
    opening((30, 12, 1), (30, 15, 3)),
    wall((30, 25, 1), (45, 25, 3)),
    opening((36, 25, 1), (39, 25, 3)),
    // furniture
    wall((8, 17, 1), (12, 20, 2)),
    wall((10, 7, 1), (14, 10, 2)),
    wall((35, 8, 1), (40, 12, 2)),
    wall((35, 28, 1), (38, 31, 4)),
    // stairs
    wall((15, 35, 1), (20, 35, 1)),
    wall((15, 36, 2), (20, 36, 2)),
    wall((15, 37, 3), (20, 37, 3)),
    wall((15, 38, 4), (20, 38, 4)),
    wall((15, 39, 5), (20, 39, 5)),
    // mezzanine and railing
    wall((10, 40, 5), (24, 47, 5)),
    wall((10, 40, 6), (10, 47, 6)),
    wall((24, 40, 6), (24, 47, 6)),
    wall((10, 40, 6), (24, 40, 6)),
    wall((10, 47, 6), (24, 47, 6)),
    // ceiling over the living room
    wall((5, 5, 8), (24, 19, 8)),
];

/// Builds the truth grid for a layout, clipping strokes to the dimensions.
pub(crate) fn build(layout: Layout, dimensions: Dimensions) -> Grid<Occupancy> {
    let mut grid = Grid::bordered(dimensions);
    let strokes = match (layout, dimensions.space()) {
        (Layout::Empty, _) => return grid,
        (Layout::Furnished, Space::Planar) => MAZE,
        (Layout::Furnished, Space::Volumetric) => HOUSE,
    };

    for stroke in strokes {
        let (min_x, min_y, min_z) = stroke.min;
        let (max_x, max_y, max_z) = stroke.max;
        grid.paint(
            GridCoord::new(min_x, min_y, min_z),
            GridCoord::new(max_x, max_y, max_z),
            stroke.value,
        );
    }

    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maze_keeps_start_corridor_open() {
        let grid = build(Layout::Furnished, Dimensions::DEFAULT_PLANAR);

        for x in 1..49 {
            assert!(!grid.is_solid(GridCoord::planar(x, 1)));
        }
        assert!(grid.is_solid(GridCoord::planar(5, 10)));
        assert!(grid.is_solid(GridCoord::planar(30, 34)));
        assert!(grid.is_solid(GridCoord::planar(49, 1)));
    }

    #[test]
    fn house_stairs_climb_one_level_per_row() {
        let grid = build(Layout::Furnished, Dimensions::DEFAULT_VOLUMETRIC);

        for step in 0..5 {
            assert!(grid.is_solid(GridCoord::new(17, 35 + step, 1 + step)));
            assert!(grid.is_traversable(GridCoord::new(17, 35 + step, 2 + step)));
        }
        assert!(!grid.is_solid(GridCoord::new(13, 15, 2)));
        assert!(grid.is_traversable(GridCoord::new(2, 2, 1)));
    }

    #[test]
    fn strokes_are_clipped_to_small_maps() {
        let grid = build(Layout::Furnished, Dimensions::planar(12, 12));

        assert!(grid.is_solid(GridCoord::planar(10, 10)));
        assert!(grid.is_solid(GridCoord::planar(11, 10)));
        assert!(!grid.is_solid(GridCoord::planar(10, 9)));
    }

    #[test]
    fn empty_layout_has_no_interior_walls() {
        let grid = build(Layout::Empty, Dimensions::DEFAULT_VOLUMETRIC);
        let (_, solid) = grid.counts();
        let border_per_level = 2 * 50 + 2 * 48;

        assert_eq!(solid, 50 * 50 + border_per_level * 19);
    }
}
