//! Text rendering of one level of the truth and discovered grids.

use std::fmt::Write as _;

use gridslam_core::{GridCoord, Heading, Knowledge, LevelView, Occupancy, Space};
use gridslam_world::{query, World};

const PATH_GLYPH: char = '*';
const GOAL_GLYPH: char = 'G';

/// Renders the truth grid at the selected level.
pub(crate) fn truth(world: &World) -> String {
    let level = selected_level(world);
    query::truth_level(world, level).map_or_else(String::new, |view| {
        render(world, view, |cell| match cell {
            Occupancy::Empty => '.',
            Occupancy::Solid => '#',
        })
    })
}

/// Renders the discovered grid at the selected level.
pub(crate) fn discovered(world: &World) -> String {
    let level = selected_level(world);
    query::discovered_level(world, level).map_or_else(String::new, |view| {
        render(world, view, |cell| match cell {
            Knowledge::Unknown => '?',
            Knowledge::Free => '.',
            Knowledge::Obstacle => '#',
        })
    })
}

fn selected_level(world: &World) -> u32 {
    match query::dimensions(world).space() {
        Space::Planar => 0,
        Space::Volumetric => query::view_level(world),
    }
}

fn render<T: Copy>(world: &World, view: LevelView<'_, T>, glyph: impl Fn(T) -> char) -> String {
    let level = view.level();
    let pose = query::pose(world);
    let plan = query::plan_view(world);

    let mut rows: Vec<Vec<char>> = view
        .rows()
        .map(|row| row.iter().copied().map(&glyph).collect())
        .collect();

    let mut mark = |cell: GridCoord, symbol: char| {
        if cell.z() != level {
            return;
        }
        let slot = usize::try_from(cell.y())
            .ok()
            .zip(usize::try_from(cell.x()).ok())
            .and_then(|(y, x)| rows.get_mut(y).and_then(|row| row.get_mut(x)));
        if let Some(slot) = slot {
            *slot = symbol;
        }
    };

    for &cell in plan.remaining() {
        mark(cell, PATH_GLYPH);
    }
    if let Some(goal) = plan.goal() {
        mark(goal, GOAL_GLYPH);
    }
    mark(pose.cell(), robot_glyph(pose.heading()));

    let mut out = String::new();
    for row in rows {
        let line: String = row.into_iter().collect();
        let _ = writeln!(out, "{line}");
    }
    out
}

const fn robot_glyph(heading: Heading) -> char {
    match heading {
        Heading::East => '>',
        Heading::North => '^',
        Heading::West => '<',
        Heading::South => 'v',
    }
}
