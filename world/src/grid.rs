//! Dense storage backing the truth and discovered maps.

use gridslam_core::{Dimensions, GridCoord, GridView, Occupancy, Space, ToggleRejection};

/// Flat cell storage indexed row-major with levels outermost.
#[derive(Clone, Debug)]
pub(crate) struct Grid<T> {
    dimensions: Dimensions,
    cells: Vec<T>,
}

impl<T: Copy> Grid<T> {
    pub(crate) fn filled(dimensions: Dimensions, value: T) -> Self {
        Self {
            dimensions,
            cells: vec![value; dimensions.cell_count()],
        }
    }

    /// Wraps cells whose length already matches the dimensions.
    pub(crate) fn from_cells(dimensions: Dimensions, cells: Vec<T>) -> Self {
        debug_assert_eq!(cells.len(), dimensions.cell_count());
        Self { dimensions, cells }
    }

    pub(crate) fn get(&self, coord: GridCoord) -> Option<T> {
        self.dimensions
            .index(coord)
            .and_then(|index| self.cells.get(index).copied())
    }

    pub(crate) fn set(&mut self, coord: GridCoord, value: T) {
        if let Some(index) = self.dimensions.index(coord) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = value;
            }
        }
    }

    pub(crate) fn fill(&mut self, value: T) {
        self.cells.fill(value);
    }

    pub(crate) const fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub(crate) fn cells(&self) -> &[T] {
        &self.cells
    }

    pub(crate) fn view(&self) -> GridView<'_, T> {
        GridView::new(&self.cells, self.dimensions)
    }
}

impl Grid<Occupancy> {
    /// Empty interior enclosed by a solid border ring and, in volumetric
    /// worlds, a solid ground floor.
    pub(crate) fn bordered(dimensions: Dimensions) -> Self {
        let mut grid = Self::filled(dimensions, Occupancy::Empty);
        for coord in coords(dimensions) {
            if dimensions.is_fixed(coord) {
                grid.set(coord, Occupancy::Solid);
            }
        }
        grid
    }

    pub(crate) fn is_solid(&self, coord: GridCoord) -> bool {
        self.get(coord) == Some(Occupancy::Solid)
    }

    /// Ground support: the cell sits on the floor or on something solid.
    pub(crate) fn has_ground(&self, coord: GridCoord) -> bool {
        coord.z() == 0 || coord.below().is_some_and(|below| self.is_solid(below))
    }

    pub(crate) fn is_traversable(&self, coord: GridCoord) -> bool {
        if self.get(coord) != Some(Occupancy::Empty) {
            return false;
        }

        match self.dimensions.space() {
            Space::Planar => true,
            Space::Volumetric => self.has_ground(coord),
        }
    }

    /// Flips an editable cell, returning its new state.
    pub(crate) fn toggle(&mut self, coord: GridCoord) -> Result<Occupancy, ToggleRejection> {
        let current = self.get(coord).ok_or(ToggleRejection::OutOfBounds)?;
        if self.dimensions.is_border(coord) {
            return Err(ToggleRejection::Border);
        }
        if self.dimensions.is_ground(coord) {
            return Err(ToggleRejection::GroundFloor);
        }

        let next = current.toggled();
        self.set(coord, next);
        Ok(next)
    }

    /// Empties every cell that is neither border nor ground.
    pub(crate) fn clear_interior(&mut self) {
        let dimensions = self.dimensions;
        for coord in coords(dimensions) {
            if !dimensions.is_fixed(coord) {
                self.set(coord, Occupancy::Empty);
            }
        }
    }

    /// Paints an inclusive box, clipped to the grid and skipping fixed cells.
    pub(crate) fn paint(&mut self, min: GridCoord, max: GridCoord, value: Occupancy) {
        let dimensions = self.dimensions;
        let max_x = max.x().min(dimensions.width().saturating_sub(1));
        let max_y = max.y().min(dimensions.depth().saturating_sub(1));
        let max_z = max.z().min(dimensions.levels().saturating_sub(1));

        for z in min.z()..=max_z {
            for y in min.y()..=max_y {
                for x in min.x()..=max_x {
                    let coord = GridCoord::new(x, y, z);
                    if !dimensions.is_fixed(coord) {
                        self.set(coord, value);
                    }
                }
            }
        }
    }

    /// Number of empty and solid cells.
    pub(crate) fn counts(&self) -> (usize, usize) {
        let solid = self.cells.iter().filter(|cell| cell.is_solid()).count();
        (self.cells.len() - solid, solid)
    }
}

/// Every coordinate of the grid in storage order.
pub(crate) fn coords(dimensions: Dimensions) -> impl Iterator<Item = GridCoord> {
    let width = dimensions.width();
    let depth = dimensions.depth();
    (0..dimensions.levels()).flat_map(move |z| {
        (0..depth).flat_map(move |y| (0..width).map(move |x| GridCoord::new(x, y, z)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bordered_grid_seeds_border_and_ground() {
        let grid = Grid::bordered(Dimensions::volumetric(6, 5, 3));

        assert!(grid.is_solid(GridCoord::new(0, 2, 2)));
        assert!(grid.is_solid(GridCoord::new(5, 2, 1)));
        assert!(grid.is_solid(GridCoord::new(2, 4, 2)));
        assert!(grid.is_solid(GridCoord::new(2, 2, 0)));
        assert!(!grid.is_solid(GridCoord::new(2, 2, 1)));
        assert!(grid.is_traversable(GridCoord::new(2, 2, 1)));
        assert!(!grid.is_traversable(GridCoord::new(2, 2, 2)));
    }

    #[test]
    fn toggle_refuses_fixed_cells() {
        let mut grid = Grid::bordered(Dimensions::volumetric(6, 6, 3));

        assert_eq!(
            grid.toggle(GridCoord::new(0, 0, 1)),
            Err(ToggleRejection::Border)
        );
        assert_eq!(
            grid.toggle(GridCoord::new(3, 3, 0)),
            Err(ToggleRejection::GroundFloor)
        );
        assert_eq!(
            grid.toggle(GridCoord::new(3, 3, 3)),
            Err(ToggleRejection::OutOfBounds)
        );
        assert_eq!(grid.toggle(GridCoord::new(3, 3, 1)), Ok(Occupancy::Solid));
        assert_eq!(grid.toggle(GridCoord::new(3, 3, 1)), Ok(Occupancy::Empty));
    }

    #[test]
    fn paint_clips_to_interior() {
        let mut grid = Grid::bordered(Dimensions::planar(6, 6));
        grid.paint(
            GridCoord::planar(0, 2),
            GridCoord::planar(40, 2),
            Occupancy::Solid,
        );

        let (empty, solid) = grid.counts();
        assert_eq!(solid, 20 + 4);
        assert_eq!(empty, 36 - 24);

        grid.clear_interior();
        assert_eq!(grid.counts(), (16, 20));
    }
}
