#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the gridslam simulator.
//!
//! The world owns the truth grid, the robot's discovered grid, the sensor
//! array, and the robot itself. Every mutation flows through [`apply`], which
//! reports outcomes as [`Event`] values; adapters and systems observe state
//! through the read-only [`query`] module.

mod config;
mod discovery;
mod grid;
mod layout;
mod motion;
mod robot;
mod sensors;

use gridslam_core::{
    Command, DimensionError, Dimensions, Event, GridCoord, Knowledge, MapRecord,
    MapRecordError, MotionCommand, Occupancy, PlanningGrid, Pose, Space, WELCOME_BANNER,
};
use gridslam_system_planner::{self as planner, PlannerConfig, PlanningSurface};
use tracing::{debug, info};

pub use config::{ConfigError, EngineConfig, StartConfig};
pub use layout::Layout;

use grid::Grid;
use motion::Transition;
use robot::RobotState;
use sensors::SensorArray;

/// Name given to maps that were not loaded from a record.
const UNNAMED_MAP: &str = "untitled";

/// Represents the authoritative simulator state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    truth: Grid<Occupancy>,
    discovered: Grid<Knowledge>,
    sensors: SensorArray,
    robot: RobotState,
    planner: PlannerConfig,
    initial_sweep: bool,
    view_level: u32,
    map_name: String,
}

impl World {
    /// Creates the default planar world: the 50 by 50 maze.
    #[must_use]
    pub fn planar() -> Self {
        let config = EngineConfig::planar();
        let truth = layout::build(config.layout, config.dimensions());
        Self::assemble(&config, truth, PlannerConfig::default())
    }

    /// Creates the default volumetric world: the 50 by 50 by 20 house.
    #[must_use]
    pub fn volumetric() -> Self {
        let config = EngineConfig::volumetric();
        let truth = layout::build(config.layout, config.dimensions());
        Self::assemble(&config, truth, PlannerConfig::default())
    }

    /// Creates a world from a validated configuration.
    pub fn with_config(config: &EngineConfig) -> Result<Self, ConfigError> {
        let dimensions = config.dimensions();
        dimensions.validate()?;
        let planner = config.planner()?;

        let truth = layout::build(config.layout, dimensions);
        let start = config.start_pose().cell();
        if !truth.is_traversable(start) {
            return Err(ConfigError::Start(start));
        }

        Ok(Self::assemble(config, truth, planner))
    }

    fn assemble(config: &EngineConfig, truth: Grid<Occupancy>, planner: PlannerConfig) -> Self {
        let dimensions = truth.dimensions();
        let start = config.start_pose();
        let mut world = Self {
            banner: WELCOME_BANNER,
            truth,
            discovered: Grid::filled(dimensions, Knowledge::Unknown),
            sensors: SensorArray::new(
                dimensions.space(),
                config.sensor_range(),
                config.vision_mode,
            ),
            robot: RobotState::new(start),
            planner,
            initial_sweep: config.initial_sweep(),
            view_level: start.cell().z(),
            map_name: UNNAMED_MAP.to_owned(),
        };
        world.begin_exploration();
        info!(
            space = ?dimensions.space(),
            width = dimensions.width(),
            depth = dimensions.depth(),
            levels = dimensions.levels(),
            "world created"
        );
        world
    }

    const fn dimensions(&self) -> Dimensions {
        self.truth.dimensions()
    }

    /// Marks the start cell free and, when configured, sweeps the sensors.
    fn begin_exploration(&mut self) {
        self.discovered
            .set(self.robot.pose().cell(), Knowledge::Free);
        if self.initial_sweep {
            self.refresh_discovery();
        }
    }

    fn refresh_discovery(&mut self) {
        let pose = *self.robot.pose();
        let readings = self.sensors.read_all(&self.truth, &pose);
        discovery::update_post(
            &mut self.discovered,
            &self.truth,
            &self.sensors,
            &pose,
            &readings,
        );
    }

    /// Guards volumetric-only commands. Reaching this on a planar world is a
    /// caller bug; release builds report it as an event instead.
    fn require_volumetric(&self, command: &'static str, out_events: &mut Vec<Event>) -> bool {
        let volumetric = self.dimensions().space() == Space::Volumetric;
        debug_assert!(volumetric, "{command} requires a volumetric world");
        if !volumetric {
            out_events.push(Event::RequiresVolumetric { command });
        }
        volumetric
    }

    fn drive(&mut self, motion: MotionCommand, out_events: &mut Vec<Event>) {
        if motion.is_vertical() && !self.require_volumetric(motion.as_str(), out_events) {
            return;
        }

        let pose = *self.robot.pose();
        match motion::resolve(&self.truth, &pose, motion) {
            Ok(Transition::Translate(to)) => {
                self.robot.record_move(to, motion.is_vertical());
                self.refresh_discovery();
                out_events.push(Event::Moved {
                    motion,
                    from: pose.cell(),
                    to,
                });
            }
            Ok(Transition::Turn(heading)) => {
                self.robot.record_rotation(heading);
                out_events.push(Event::Rotated { motion, heading });
            }
            Err(reason) => {
                debug!(%motion, cell = %pose.cell(), ?reason, "move blocked");
                out_events.push(Event::MoveBlocked { motion, reason });
            }
        }
    }

    fn adjust_attitude(&mut self, pose: Pose, out_events: &mut Vec<Event>) {
        self.robot.set_attitude(pose);
        out_events.push(Event::AttitudeChanged {
            pitch: pose.pitch(),
            roll: pose.roll(),
        });
    }

    fn set_goal(&mut self, goal: GridCoord, grid: PlanningGrid, out_events: &mut Vec<Event>) {
        let surface = PlanningSurface::select(grid, self.truth.view(), self.discovered.view());
        match planner::plan_route(surface, self.robot.pose().cell(), goal, &self.planner) {
            Ok(route) => {
                let path_len = route.len();
                self.robot.assign_plan(goal, route);
                out_events.push(Event::GoalSet { goal, path_len });
            }
            Err(reason) => out_events.push(Event::GoalRejected { goal, reason }),
        }
    }

    fn reset(&mut self, out_events: &mut Vec<Event>) {
        self.robot.reset();
        self.discovered.fill(Knowledge::Unknown);
        self.discovered
            .set(self.robot.pose().cell(), Knowledge::Free);
        self.view_level = self.robot.pose().cell().z();
        info!(cell = %self.robot.pose().cell(), "robot reset");
        out_events.push(Event::ResetCompleted {
            pose: *self.robot.pose(),
        });
    }

    fn configure_map(&mut self, dimensions: Dimensions, out_events: &mut Vec<Event>) {
        if let Err(reason) = self.check_dimensions(dimensions) {
            debug!(?dimensions, %reason, "map configuration rejected");
            out_events.push(Event::MapRejected { dimensions, reason });
            return;
        }

        let initial = *self.robot.initial();
        let start = clamp_into_interior(initial.cell(), dimensions);
        self.replace_map(
            Grid::bordered(dimensions),
            Pose::new(start, initial.heading()),
            UNNAMED_MAP.to_owned(),
        );
        info!(
            width = dimensions.width(),
            depth = dimensions.depth(),
            levels = dimensions.levels(),
            "map reconfigured"
        );
        out_events.push(Event::MapConfigured { dimensions });
    }

    fn load_map(&mut self, record: MapRecord, out_events: &mut Vec<Event>) {
        let checked = self
            .check_dimensions(record.dimensions)
            .map_err(MapRecordError::from)
            .and_then(|()| record.validate());
        if let Err(reason) = checked {
            debug!(name = %record.name, %reason, "map record rejected");
            out_events.push(Event::MapLoadRejected { reason });
            return;
        }

        let MapRecord {
            name,
            dimensions,
            cells,
            start,
        } = record;
        self.replace_map(Grid::from_cells(dimensions, cells), start, name.clone());
        info!(%name, "map loaded");
        out_events.push(Event::MapLoaded { name });
    }

    fn check_dimensions(&self, dimensions: Dimensions) -> Result<(), DimensionError> {
        let expected = self.dimensions().space();
        if dimensions.space() != expected {
            return Err(DimensionError::SpaceMismatch {
                expected,
                found: dimensions.space(),
            });
        }
        dimensions.validate()
    }

    fn replace_map(&mut self, truth: Grid<Occupancy>, start: Pose, name: String) {
        let dimensions = truth.dimensions();
        self.truth = truth;
        self.discovered = Grid::filled(dimensions, Knowledge::Unknown);
        self.robot = RobotState::new(start);
        self.view_level = start.cell().z();
        self.map_name = name;
        self.begin_exploration();
    }
}

/// Keeps a start cell inside the interior of freshly bordered dimensions.
fn clamp_into_interior(cell: GridCoord, dimensions: Dimensions) -> GridCoord {
    let x = cell.x().clamp(1, dimensions.width().saturating_sub(2));
    let y = cell.y().clamp(1, dimensions.depth().saturating_sub(2));
    let z = match dimensions.space() {
        Space::Planar => 0,
        Space::Volumetric => 1,
    };
    GridCoord::new(x, y, z)
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Drive { motion } => world.drive(motion, out_events),
        Command::AdjustPitch { degrees } => {
            if world.require_volumetric("adjust_pitch", out_events) {
                let pose = world.robot.pose().pitched(degrees);
                world.adjust_attitude(pose, out_events);
            }
        }
        Command::AdjustRoll { degrees } => {
            if world.require_volumetric("adjust_roll", out_events) {
                let pose = world.robot.pose().rolled(degrees);
                world.adjust_attitude(pose, out_events);
            }
        }
        Command::ResetOrientation => {
            if world.require_volumetric("reset_orientation", out_events) {
                let pose = world.robot.pose().levelled();
                world.adjust_attitude(pose, out_events);
            }
        }
        Command::ToggleCell { cell } => match world.truth.toggle(cell) {
            Ok(occupancy) => out_events.push(Event::CellToggled { cell, occupancy }),
            Err(reason) => {
                debug!(%cell, ?reason, "cell edit rejected");
                out_events.push(Event::ToggleRejected { cell, reason });
            }
        },
        Command::ClearMap => {
            world.truth.clear_interior();
            out_events.push(Event::MapCleared);
        }
        Command::SetGoal { goal, grid } => world.set_goal(goal, grid, out_events),
        Command::ClearGoal => {
            world.robot.clear_plan();
            out_events.push(Event::GoalCleared);
        }
        Command::RequestNextMove => {
            let next = planner::next_move(
                world.robot.pose(),
                world.robot.plan(),
                world.robot.cursor(),
            );
            world.robot.set_cursor(next.cursor);
            out_events.push(Event::NextMoveDerived {
                motion: next.motion,
            });
        }
        Command::Reset => world.reset(out_events),
        Command::SetSensorRange { range } => {
            world.sensors.set_range(range);
            out_events.push(Event::SensorsConfigured);
        }
        Command::SetSensorRangeFor { sensor, range } => {
            match world.sensors.set_range_for(sensor, range) {
                Ok(()) => out_events.push(Event::SensorsConfigured),
                Err(reason) => out_events.push(Event::SensorRejected { sensor, reason }),
            }
        }
        Command::SetSensorEnabled { sensor, enabled } => {
            match world.sensors.set_enabled(sensor, enabled) {
                Ok(()) => out_events.push(Event::SensorsConfigured),
                Err(reason) => out_events.push(Event::SensorRejected { sensor, reason }),
            }
        }
        Command::SetVisionMode { mode } => {
            world.sensors.set_vision_mode(mode);
            out_events.push(Event::SensorsConfigured);
        }
        Command::ConfigureMap { dimensions } => world.configure_map(dimensions, out_events),
        Command::LoadMap { record } => world.load_map(*record, out_events),
        Command::SetViewLevel { level } => {
            if world.require_volumetric("set_view_level", out_events) {
                let top = world.dimensions().levels().saturating_sub(1);
                world.view_level = level.min(top);
                out_events.push(Event::ViewLevelChanged {
                    level: world.view_level,
                });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use gridslam_core::{
        Dimensions, GridCoord, GridView, Knowledge, LevelView, MapInfo, MapRecord, Occupancy,
        Odometry, PlanView, Pose, SensorId, SensorReadings, SensorSpec, VisionMode,
    };

    use super::World;

    /// Retrieves the welcome banner that adapters may display.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Extents of both grids.
    #[must_use]
    pub fn dimensions(world: &World) -> Dimensions {
        world.dimensions()
    }

    /// Current robot pose.
    #[must_use]
    pub fn pose(world: &World) -> Pose {
        *world.robot.pose()
    }

    /// Pose the robot returns to on reset.
    #[must_use]
    pub fn initial_pose(world: &World) -> Pose {
        *world.robot.initial()
    }

    /// Movement counters accumulated since the last reset.
    #[must_use]
    pub fn odometry(world: &World) -> Odometry {
        *world.robot.odometry()
    }

    /// Cells visited since the last reset, starting with the initial cell.
    #[must_use]
    pub fn path_history(world: &World) -> &[GridCoord] {
        world.robot.path_history()
    }

    /// Exposes a read-only view of the ground truth.
    #[must_use]
    pub fn truth_view(world: &World) -> GridView<'_, Occupancy> {
        world.truth.view()
    }

    /// Exposes a read-only view of the robot's knowledge.
    #[must_use]
    pub fn discovered_view(world: &World) -> GridView<'_, Knowledge> {
        world.discovered.view()
    }

    /// One level of the ground truth, `None` when out of range.
    #[must_use]
    pub fn truth_level(world: &World, level: u32) -> Option<LevelView<'_, Occupancy>> {
        world.truth.view().level(level)
    }

    /// One level of the robot's knowledge, `None` when out of range.
    #[must_use]
    pub fn discovered_level(world: &World, level: u32) -> Option<LevelView<'_, Knowledge>> {
        world.discovered.view().level(level)
    }

    /// Level currently selected for rendering.
    #[must_use]
    pub fn view_level(world: &World) -> u32 {
        world.view_level
    }

    /// Goal, planned waypoints, and the path-following cursor.
    #[must_use]
    pub fn plan_view(world: &World) -> PlanView<'_> {
        PlanView::new(world.robot.goal(), world.robot.plan(), world.robot.cursor())
    }

    /// Configuration of every mounted sensor in declaration order.
    #[must_use]
    pub fn sensor_specs(world: &World) -> Vec<(SensorId, SensorSpec)> {
        world.sensors.specs().collect()
    }

    /// Active field-of-view preset.
    #[must_use]
    pub fn vision_mode(world: &World) -> VisionMode {
        world.sensors.vision_mode()
    }

    /// Readings the sensors report from the current pose, computed on demand.
    #[must_use]
    pub fn sensor_readings(world: &World) -> SensorReadings {
        world.sensors.read_all(&world.truth, world.robot.pose())
    }

    /// Reports whether the robot could stand on the cell.
    #[must_use]
    pub fn is_traversable(world: &World, cell: GridCoord) -> bool {
        world.truth.is_traversable(cell)
    }

    /// Cell counts of the ground truth.
    #[must_use]
    pub fn map_info(world: &World) -> MapInfo {
        let (empty_cells, solid_cells) = world.truth.counts();
        MapInfo {
            dimensions: world.dimensions(),
            empty_cells,
            solid_cells,
        }
    }

    /// Persistable copy of the map and its start pose.
    #[must_use]
    pub fn map_record(world: &World) -> MapRecord {
        MapRecord {
            name: world.map_name.clone(),
            dimensions: world.dimensions(),
            cells: world.truth.cells().to_vec(),
            start: *world.robot.initial(),
        }
    }
}
