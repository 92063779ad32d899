#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic A* route planning and path-following for the gridslam robot.
//!
//! The planner never owns grids. Callers hand it a [`PlanningSurface`] built
//! from the world's immutable views, receive a list of waypoints, and later
//! ask [`next_move`] which atomic motion progresses along the stored plan.

use std::{
    cmp::Ordering,
    collections::{BinaryHeap, HashMap, HashSet},
};

use gridslam_core::{
    Dimensions, GoalRejection, GridCoord, GridView, Heading, Knowledge, MotionCommand, Occupancy,
    PlanningGrid, Pose, Space,
};
use tracing::debug;

/// Cost of a move within a level.
pub const HORIZONTAL_COST: f64 = 1.0;
/// Default cost of a climb or descent between levels.
pub const DEFAULT_VERTICAL_COST: f64 = 1.5;

/// Tunable weights used by the search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlannerConfig {
    vertical_cost: f64,
}

impl PlannerConfig {
    /// Creates a configuration with the provided vertical move cost.
    #[must_use]
    pub const fn new(vertical_cost: f64) -> Self {
        Self { vertical_cost }
    }

    /// Cost charged for a move between levels.
    #[must_use]
    pub const fn vertical_cost(&self) -> f64 {
        self.vertical_cost
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_VERTICAL_COST)
    }
}

/// Grid the search expands over.
#[derive(Clone, Copy, Debug)]
pub enum PlanningSurface<'a> {
    /// Ground truth: only empty cells are expanded.
    Truth(GridView<'a, Occupancy>),
    /// Robot knowledge: only free cells are expanded.
    Discovered(GridView<'a, Knowledge>),
}

impl<'a> PlanningSurface<'a> {
    /// Picks the surface matching the requested planning grid.
    #[must_use]
    pub fn select(
        grid: PlanningGrid,
        truth: GridView<'a, Occupancy>,
        discovered: GridView<'a, Knowledge>,
    ) -> Self {
        match grid {
            PlanningGrid::Truth => Self::Truth(truth),
            PlanningGrid::Discovered => Self::Discovered(discovered),
        }
    }

    /// Extents of the underlying grid.
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        match self {
            Self::Truth(view) => view.dimensions(),
            Self::Discovered(view) => view.dimensions(),
        }
    }

    /// Checks whether the goal may be planned toward.
    pub fn check_goal(&self, goal: GridCoord) -> Result<(), GoalRejection> {
        match self {
            Self::Truth(view) => match view.get(goal) {
                None => Err(GoalRejection::OutOfBounds),
                Some(Occupancy::Solid) => Err(GoalRejection::Occupied),
                Some(Occupancy::Empty) => Ok(()),
            },
            Self::Discovered(view) => match view.get(goal) {
                None => Err(GoalRejection::OutOfBounds),
                Some(Knowledge::Unknown) => Err(GoalRejection::Unknown),
                Some(Knowledge::Obstacle) => Err(GoalRejection::Occupied),
                Some(Knowledge::Free) => Ok(()),
            },
        }
    }

    fn is_open(&self, cell: GridCoord) -> bool {
        match self {
            Self::Truth(view) => view.get(cell) == Some(Occupancy::Empty),
            Self::Discovered(view) => view.get(cell) == Some(Knowledge::Free),
        }
    }

    fn is_solid(&self, cell: GridCoord) -> bool {
        match self {
            Self::Truth(view) => view.get(cell) == Some(Occupancy::Solid),
            Self::Discovered(view) => view.get(cell) == Some(Knowledge::Obstacle),
        }
    }

    /// Above level 1 the cell below must be known solid. The ground floor is
    /// solid in every volumetric map, so it supports level 1 even before any
    /// sensor has observed it.
    fn is_supported_or_on_floor(&self, cell: GridCoord) -> bool {
        match cell.below() {
            None => true,
            Some(below) => below.z() == 0 || self.is_solid(below),
        }
    }

    fn expand(&self, cell: GridCoord, config: &PlannerConfig, out: &mut Vec<(GridCoord, f64)>) {
        match self.dimensions().space() {
            Space::Planar => {
                for (dx, dy) in [(0, 1), (1, 0), (0, -1), (-1, 0)] {
                    if let Some(next) = cell.offset(dx, dy, 0) {
                        if self.is_open(next) {
                            out.push((next, HORIZONTAL_COST));
                        }
                    }
                }
            }
            Space::Volumetric => {
                for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
                    if let Some(next) = cell.offset(dx, dy, 0) {
                        if self.is_open(next) && self.is_supported_or_on_floor(next) {
                            out.push((next, HORIZONTAL_COST));
                        }
                    }
                }
                for dz in [1, -1] {
                    if let Some(next) = cell.offset(0, 0, dz) {
                        if self.is_open(next) {
                            out.push((next, config.vertical_cost()));
                        }
                    }
                }
            }
        }
    }
}

/// Plans a route from `start` to `goal`.
///
/// The returned waypoints exclude `start` and end at `goal`. An empty route is
/// returned when the goal is valid but unreachable, or equal to the start.
pub fn plan_route(
    surface: PlanningSurface<'_>,
    start: GridCoord,
    goal: GridCoord,
    config: &PlannerConfig,
) -> Result<Vec<GridCoord>, GoalRejection> {
    if let Err(reason) = surface.check_goal(goal) {
        debug!(%goal, ?reason, "goal rejected before search");
        return Err(reason);
    }

    let route = search(surface, start, goal, config).unwrap_or_default();
    debug!(%start, %goal, waypoints = route.len(), "route planned");
    Ok(route)
}

#[derive(Clone, Copy, Debug)]
struct Frontier {
    estimate: f64,
    cost: f64,
    sequence: u64,
    cell: GridCoord,
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .estimate
            .total_cmp(&self.estimate)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

fn search(
    surface: PlanningSurface<'_>,
    start: GridCoord,
    goal: GridCoord,
    config: &PlannerConfig,
) -> Option<Vec<GridCoord>> {
    let climb = config.vertical_cost().min(HORIZONTAL_COST);
    let heuristic = |cell: GridCoord| {
        f64::from(cell.x().abs_diff(goal.x()) + cell.y().abs_diff(goal.y()))
            + f64::from(cell.z().abs_diff(goal.z())) * climb
    };

    let mut open = BinaryHeap::new();
    let mut g_scores: HashMap<GridCoord, f64> = HashMap::new();
    let mut came_from: HashMap<GridCoord, GridCoord> = HashMap::new();
    let mut closed: HashSet<GridCoord> = HashSet::new();
    let mut neighbors = Vec::with_capacity(6);
    let mut sequence = 0_u64;

    let _ = g_scores.insert(start, 0.0);
    open.push(Frontier {
        estimate: heuristic(start),
        cost: 0.0,
        sequence,
        cell: start,
    });

    while let Some(current) = open.pop() {
        if current.cell == goal {
            return Some(reconstruct(&came_from, start, goal));
        }

        if !closed.insert(current.cell) {
            continue;
        }

        neighbors.clear();
        surface.expand(current.cell, config, &mut neighbors);

        for &(next, step_cost) in &neighbors {
            if closed.contains(&next) {
                continue;
            }

            let tentative = current.cost + step_cost;
            let improves = g_scores
                .get(&next)
                .map_or(true, |&known| tentative < known);
            if !improves {
                continue;
            }

            let _ = g_scores.insert(next, tentative);
            let _ = came_from.insert(next, current.cell);
            sequence += 1;
            open.push(Frontier {
                estimate: tentative + heuristic(next),
                cost: tentative,
                sequence,
                cell: next,
            });
        }
    }

    debug!(
        %start,
        %goal,
        expanded = closed.len(),
        "no route between cells"
    );
    None
}

fn reconstruct(
    came_from: &HashMap<GridCoord, GridCoord>,
    start: GridCoord,
    goal: GridCoord,
) -> Vec<GridCoord> {
    let mut route = Vec::new();
    let mut cursor = goal;
    while cursor != start {
        route.push(cursor);
        match came_from.get(&cursor) {
            Some(&previous) => cursor = previous,
            None => break,
        }
    }
    route.reverse();
    route
}

/// Motion derived from a stored plan together with the advanced cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NextMove {
    /// Motion to execute, `None` once the plan is exhausted.
    pub motion: Option<MotionCommand>,
    /// Cursor to store for the following request.
    pub cursor: usize,
}

/// Derives the atomic motion that progresses along `plan` from `pose`.
///
/// Rotations leave the cursor in place; translations advance it. Waypoints
/// that share the robot's cell are skipped.
#[must_use]
pub fn next_move(pose: &Pose, plan: &[GridCoord], cursor: usize) -> NextMove {
    let here = pose.cell();
    let mut cursor = cursor;

    while let Some(&waypoint) = plan.get(cursor) {
        if waypoint.z() != here.z() {
            let motion = if waypoint.z() > here.z() {
                MotionCommand::MoveUp
            } else {
                MotionCommand::MoveDown
            };
            return NextMove {
                motion: Some(motion),
                cursor: cursor + 1,
            };
        }

        let Some(target) = Heading::toward(here, waypoint) else {
            cursor += 1;
            continue;
        };

        if target != pose.heading() {
            return NextMove {
                motion: Some(rotation_toward(pose.heading(), target)),
                cursor,
            };
        }

        return NextMove {
            motion: Some(MotionCommand::MoveForward),
            cursor: cursor + 1,
        };
    }

    NextMove {
        motion: None,
        cursor,
    }
}

fn rotation_toward(current: Heading, target: Heading) -> MotionCommand {
    let difference = (target.degrees() + 360 - current.degrees()) % 360;
    if difference == 270 {
        MotionCommand::RotateRight
    } else {
        MotionCommand::RotateLeft
    }
}
