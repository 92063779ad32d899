#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the gridslam engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values describing what
//! happened. Rejected operations are ordinary events carrying a reason, never
//! errors. Systems consume event streams, query immutable views, and respond
//! exclusively with new command batches.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the simulator boots.
pub const WELCOME_BANNER: &str = "gridslam: grid-world SLAM simulator.";

/// Smallest accepted horizontal extent of a map.
pub const MIN_EXTENT: u32 = 5;
/// Largest accepted horizontal extent of a map.
pub const MAX_EXTENT: u32 = 200;
/// Smallest accepted number of levels in a volumetric map.
pub const MIN_LEVELS: u32 = 3;
/// Largest accepted number of levels in a volumetric map.
pub const MAX_LEVELS: u32 = 64;
/// Steepest pitch the robot may adopt, in degrees.
pub const MAX_PITCH: f64 = 90.0;

/// Geometry of a simulated world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Space {
    /// Flat two-dimensional grid with a single level.
    Planar,
    /// Stacked voxel levels with a solid ground floor and gravity.
    Volumetric,
}

/// Fixed extents of the truth and discovered grids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    space: Space,
    width: u32,
    depth: u32,
    levels: u32,
}

impl Dimensions {
    /// Default planar map: 50 by 50 cells.
    pub const DEFAULT_PLANAR: Self = Self::planar(50, 50);
    /// Default volumetric map: 50 by 50 cells stacked 20 levels high.
    pub const DEFAULT_VOLUMETRIC: Self = Self::volumetric(50, 50, 20);

    /// Creates planar dimensions with a single level.
    #[must_use]
    pub const fn planar(width: u32, depth: u32) -> Self {
        Self {
            space: Space::Planar,
            width,
            depth,
            levels: 1,
        }
    }

    /// Creates volumetric dimensions.
    #[must_use]
    pub const fn volumetric(width: u32, depth: u32, levels: u32) -> Self {
        Self {
            space: Space::Volumetric,
            width,
            depth,
            levels,
        }
    }

    /// Geometry described by the dimensions.
    #[must_use]
    pub const fn space(&self) -> Space {
        self.space
    }

    /// Number of columns along the x axis.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows along the y axis.
    #[must_use]
    pub const fn depth(&self) -> u32 {
        self.depth
    }

    /// Number of levels along the z axis. Always one for planar maps.
    #[must_use]
    pub const fn levels(&self) -> u32 {
        self.levels
    }

    /// Largest extent along any axis, used as the cap of unlimited sensors.
    #[must_use]
    pub fn max_extent(&self) -> u32 {
        self.width.max(self.depth).max(self.levels)
    }

    /// Total number of cells across every level.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let count = u64::from(self.width) * u64::from(self.depth) * u64::from(self.levels);
        usize::try_from(count).unwrap_or(0)
    }

    /// Checks the extents against the accepted ranges.
    pub fn validate(&self) -> Result<(), DimensionError> {
        for value in [self.width, self.depth] {
            if !(MIN_EXTENT..=MAX_EXTENT).contains(&value) {
                return Err(DimensionError::Extent { value });
            }
        }

        match self.space {
            Space::Planar if self.levels != 1 => Err(DimensionError::PlanarLevels {
                value: self.levels,
            }),
            Space::Volumetric if !(MIN_LEVELS..=MAX_LEVELS).contains(&self.levels) => {
                Err(DimensionError::Levels { value: self.levels })
            }
            _ => Ok(()),
        }
    }

    /// Reports whether the coordinate lies inside the grid.
    #[must_use]
    pub const fn contains(&self, coord: GridCoord) -> bool {
        coord.x < self.width && coord.y < self.depth && coord.z < self.levels
    }

    /// Row-major offset of the coordinate, levels outermost.
    #[must_use]
    pub fn index(&self, coord: GridCoord) -> Option<usize> {
        if !self.contains(coord) {
            return None;
        }

        let width = usize::try_from(self.width).ok()?;
        let depth = usize::try_from(self.depth).ok()?;
        let x = usize::try_from(coord.x).ok()?;
        let y = usize::try_from(coord.y).ok()?;
        let z = usize::try_from(coord.z).ok()?;
        z.checked_mul(depth)?
            .checked_add(y)?
            .checked_mul(width)?
            .checked_add(x)
    }

    /// Reports whether the coordinate sits on the outer border ring.
    #[must_use]
    pub const fn is_border(&self, coord: GridCoord) -> bool {
        coord.x == 0
            || coord.y == 0
            || coord.x + 1 >= self.width
            || coord.y + 1 >= self.depth
    }

    /// Reports whether the coordinate belongs to the volumetric ground floor.
    #[must_use]
    pub const fn is_ground(&self, coord: GridCoord) -> bool {
        matches!(self.space, Space::Volumetric) && coord.z == 0
    }

    /// Cells that are seeded solid and can never be edited.
    #[must_use]
    pub const fn is_fixed(&self, coord: GridCoord) -> bool {
        self.is_border(coord) || self.is_ground(coord)
    }
}

/// Reasons a set of dimensions is refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum DimensionError {
    /// A horizontal extent is outside the accepted range.
    #[error("horizontal extent {value} is outside {}..={}", MIN_EXTENT, MAX_EXTENT)]
    Extent {
        /// Offending extent.
        value: u32,
    },
    /// The level count of a volumetric map is outside the accepted range.
    #[error("level count {value} is outside {}..={}", MIN_LEVELS, MAX_LEVELS)]
    Levels {
        /// Offending level count.
        value: u32,
    },
    /// A planar map declared more than one level.
    #[error("planar maps have exactly one level, got {value}")]
    PlanarLevels {
        /// Offending level count.
        value: u32,
    },
    /// The dimensions describe a different geometry than the running world.
    #[error("expected a {expected:?} map, got a {found:?} map")]
    SpaceMismatch {
        /// Geometry of the running world.
        expected: Space,
        /// Geometry of the rejected dimensions.
        found: Space,
    },
}

/// Location of a single cell. Planar coordinates always use `z == 0`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct GridCoord {
    x: u32,
    y: u32,
    #[serde(default)]
    z: u32,
}

impl GridCoord {
    /// Creates a volumetric cell coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }

    /// Creates a planar cell coordinate.
    #[must_use]
    pub const fn planar(x: u32, y: u32) -> Self {
        Self { x, y, z: 0 }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Zero-based level of the cell.
    #[must_use]
    pub const fn z(&self) -> u32 {
        self.z
    }

    /// Computes the Manhattan distance between two coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: GridCoord) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y) + self.z.abs_diff(other.z)
    }

    /// Shifts the coordinate, returning `None` when an axis would go negative.
    #[must_use]
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Option<GridCoord> {
        Some(Self {
            x: self.x.checked_add_signed(dx)?,
            y: self.y.checked_add_signed(dy)?,
            z: self.z.checked_add_signed(dz)?,
        })
    }

    /// Cell directly beneath, if any.
    #[must_use]
    pub fn below(self) -> Option<GridCoord> {
        self.offset(0, 0, -1)
    }

    /// Same column and row on another level.
    #[must_use]
    pub const fn with_z(self, z: u32) -> Self {
        Self { z, ..self }
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Cardinal headings measured counter-clockwise from east.
///
/// Rows grow downward, so north points toward decreasing `y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
pub enum Heading {
    /// 0 degrees, toward increasing column indices.
    East,
    /// 90 degrees, toward decreasing row indices.
    North,
    /// 180 degrees, toward decreasing column indices.
    West,
    /// 270 degrees, toward increasing row indices.
    South,
}

impl Heading {
    /// Angle of the heading in degrees.
    #[must_use]
    pub const fn degrees(self) -> u16 {
        match self {
            Self::East => 0,
            Self::North => 90,
            Self::West => 180,
            Self::South => 270,
        }
    }

    /// Heading matching an angle, if it is cardinal.
    #[must_use]
    pub const fn from_degrees(degrees: u16) -> Option<Self> {
        match degrees % 360 {
            0 => Some(Self::East),
            90 => Some(Self::North),
            180 => Some(Self::West),
            270 => Some(Self::South),
            _ => None,
        }
    }

    /// Heading after a quarter turn counter-clockwise.
    #[must_use]
    pub const fn rotated_left(self) -> Self {
        match self {
            Self::East => Self::North,
            Self::North => Self::West,
            Self::West => Self::South,
            Self::South => Self::East,
        }
    }

    /// Heading after a quarter turn clockwise.
    #[must_use]
    pub const fn rotated_right(self) -> Self {
        match self {
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
            Self::North => Self::East,
        }
    }

    /// Unit step `(dx, dy)` of a forward move.
    #[must_use]
    pub const fn step(self) -> (i32, i32) {
        match self {
            Self::East => (1, 0),
            Self::North => (0, -1),
            Self::West => (-1, 0),
            Self::South => (0, 1),
        }
    }

    /// Heading pointing from one cell toward another on the same level.
    ///
    /// Columns take precedence over rows; `None` when the cells share both.
    #[must_use]
    pub fn toward(from: GridCoord, to: GridCoord) -> Option<Self> {
        if to.x() > from.x() {
            Some(Self::East)
        } else if to.x() < from.x() {
            Some(Self::West)
        } else if to.y() < from.y() {
            Some(Self::North)
        } else if to.y() > from.y() {
            Some(Self::South)
        } else {
            None
        }
    }
}

impl From<Heading> for u16 {
    fn from(heading: Heading) -> Self {
        heading.degrees()
    }
}

impl TryFrom<u16> for Heading {
    type Error = InvalidHeading;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::from_degrees(value).ok_or(InvalidHeading(value))
    }
}

/// Angle that is not one of the four cardinal headings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("{0} degrees is not a cardinal heading")]
pub struct InvalidHeading(pub u16);

/// Ground-truth state of a cell.
///
/// Planar maps call these states floor and wall.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Occupancy {
    /// Traversable space.
    #[default]
    Empty,
    /// Wall, furniture, or ground.
    Solid,
}

impl Occupancy {
    /// Reports whether the cell blocks motion and sensor rays.
    #[must_use]
    pub const fn is_solid(self) -> bool {
        matches!(self, Self::Solid)
    }

    /// Opposite state, used when editing the map.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Empty => Self::Solid,
            Self::Solid => Self::Empty,
        }
    }
}

impl From<Occupancy> for u8 {
    fn from(occupancy: Occupancy) -> Self {
        match occupancy {
            Occupancy::Empty => 0,
            Occupancy::Solid => 1,
        }
    }
}

impl TryFrom<u8> for Occupancy {
    type Error = InvalidOccupancy;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Empty),
            1 => Ok(Self::Solid),
            other => Err(InvalidOccupancy(other)),
        }
    }
}

/// Encoded cell value that is neither empty (0) nor solid (1).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("cell value {0} is neither 0 (empty) nor 1 (solid)")]
pub struct InvalidOccupancy(pub u8);

/// Robot knowledge about a cell, accumulated from sensor rays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Knowledge {
    /// Never observed.
    #[default]
    Unknown,
    /// Observed to be traversable.
    Free,
    /// Observed to be solid.
    Obstacle,
}

/// Position and attitude of the robot.
///
/// Planar robots keep pitch and roll at zero.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    cell: GridCoord,
    heading: Heading,
    #[serde(default)]
    pitch: f64,
    #[serde(default)]
    roll: f64,
}

impl Pose {
    /// Creates a level pose at the provided cell.
    #[must_use]
    pub const fn new(cell: GridCoord, heading: Heading) -> Self {
        Self {
            cell,
            heading,
            pitch: 0.0,
            roll: 0.0,
        }
    }

    /// Cell occupied by the robot.
    #[must_use]
    pub const fn cell(&self) -> GridCoord {
        self.cell
    }

    /// Direction the robot faces (yaw in volumetric worlds).
    #[must_use]
    pub const fn heading(&self) -> Heading {
        self.heading
    }

    /// Tilt up or down in degrees, within `-90..=90`.
    #[must_use]
    pub const fn pitch(&self) -> f64 {
        self.pitch
    }

    /// Tilt left or right in degrees, within `-180..=180`.
    #[must_use]
    pub const fn roll(&self) -> f64 {
        self.roll
    }

    /// Same attitude at another cell.
    #[must_use]
    pub const fn moved_to(self, cell: GridCoord) -> Self {
        Self { cell, ..self }
    }

    /// Same position facing another heading.
    #[must_use]
    pub const fn turned(self, heading: Heading) -> Self {
        Self { heading, ..self }
    }

    /// Pitch adjusted by `degrees`, clamped to the steepest allowed tilt.
    #[must_use]
    pub fn pitched(self, degrees: f64) -> Self {
        Self {
            pitch: (self.pitch + degrees).clamp(-MAX_PITCH, MAX_PITCH),
            ..self
        }
    }

    /// Roll adjusted by `degrees`, wrapped into `(-180, 180]`.
    #[must_use]
    pub fn rolled(self, degrees: f64) -> Self {
        let wrapped = (self.roll + degrees).rem_euclid(360.0);
        let roll = if wrapped > 180.0 {
            wrapped - 360.0
        } else {
            wrapped
        };
        Self { roll, ..self }
    }

    /// Pose with pitch and roll reset to level.
    #[must_use]
    pub const fn levelled(self) -> Self {
        Self {
            pitch: 0.0,
            roll: 0.0,
            ..self
        }
    }
}

/// Movement bookkeeping. Counters only grow until the robot is reset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Odometry {
    /// Successful translations, vertical ones included.
    pub move_count: u64,
    /// Quarter turns performed.
    pub rotation_count: u64,
    /// Successful climbs and descents.
    pub vertical_move_count: u64,
    /// Cells travelled, one unit per successful translation.
    pub distance_traveled: f64,
    /// Highest level the robot has stood on.
    pub altitude_max_reached: u32,
}

/// Directional range sensors mounted on the robot.
///
/// Declaration order is the stable iteration order of every sensor table.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SensorId {
    /// Along the heading.
    Front,
    /// 45 degrees clockwise of the heading.
    FrontRight,
    /// 90 degrees clockwise of the heading.
    Right,
    /// 135 degrees clockwise of the heading.
    BackRight,
    /// Opposite the heading.
    Back,
    /// 135 degrees counter-clockwise of the heading.
    BackLeft,
    /// 90 degrees counter-clockwise of the heading.
    Left,
    /// 45 degrees counter-clockwise of the heading.
    FrontLeft,
    /// Straight up.
    StraightUp,
    /// Straight down.
    StraightDown,
    /// Along the heading, tilted 45 degrees upward.
    ForwardUp,
}

impl SensorId {
    /// Sensors sweeping the horizontal plane.
    pub const HORIZONTAL: [SensorId; 8] = [
        Self::Front,
        Self::FrontRight,
        Self::Right,
        Self::BackRight,
        Self::Back,
        Self::BackLeft,
        Self::Left,
        Self::FrontLeft,
    ];

    /// Every sensor, horizontal first.
    pub const ALL: [SensorId; 11] = [
        Self::Front,
        Self::FrontRight,
        Self::Right,
        Self::BackRight,
        Self::Back,
        Self::BackLeft,
        Self::Left,
        Self::FrontLeft,
        Self::StraightUp,
        Self::StraightDown,
        Self::ForwardUp,
    ];

    /// Sensors mounted on robots living in the provided space.
    #[must_use]
    pub fn available_in(space: Space) -> &'static [SensorId] {
        match space {
            Space::Planar => &Self::HORIZONTAL,
            Space::Volumetric => &Self::ALL,
        }
    }

    /// Stable snake_case name of the sensor.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::FrontRight => "front_right",
            Self::Right => "right",
            Self::BackRight => "back_right",
            Self::Back => "back",
            Self::BackLeft => "back_left",
            Self::Left => "left",
            Self::FrontLeft => "front_left",
            Self::StraightUp => "straight_up",
            Self::StraightDown => "straight_down",
            Self::ForwardUp => "forward_up",
        }
    }

    /// Horizontal offset from the heading, counter-clockwise positive.
    #[must_use]
    pub const fn azimuth(self) -> f64 {
        match self {
            Self::Front | Self::StraightUp | Self::StraightDown | Self::ForwardUp => 0.0,
            Self::FrontRight => -45.0,
            Self::Right => -90.0,
            Self::BackRight => -135.0,
            Self::Back => 180.0,
            Self::BackLeft => 135.0,
            Self::Left => 90.0,
            Self::FrontLeft => 45.0,
        }
    }

    /// Vertical offset from the robot's pitch, upward positive.
    #[must_use]
    pub const fn elevation(self) -> f64 {
        match self {
            Self::StraightUp => 90.0,
            Self::StraightDown => -90.0,
            Self::ForwardUp => 45.0,
            _ => 0.0,
        }
    }

    /// Reports whether the sensor points out of the horizontal plane.
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(
            self,
            Self::StraightUp | Self::StraightDown | Self::ForwardUp
        )
    }
}

impl fmt::Display for SensorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for SensorId {
    type Err = ParseSensorError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sensor| sensor.name() == value)
            .ok_or_else(|| ParseSensorError(value.to_owned()))
    }
}

/// Sensor name that does not match any mounted sensor.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown sensor '{0}'")]
pub struct ParseSensorError(pub String);

/// Maximum distance a sensor reports.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorRange {
    /// Reaches as far as the largest map extent.
    Unlimited,
    /// Reaches at most the provided positive distance.
    Limited(f64),
}

impl SensorRange {
    /// Interprets a requested range, mapping non-positive values to unlimited.
    #[must_use]
    pub fn from_request(value: f64) -> Self {
        if value > 0.0 && value.is_finite() {
            Self::Limited(value)
        } else {
            Self::Unlimited
        }
    }

    /// Effective distance cap inside a map whose largest extent is provided.
    #[must_use]
    pub fn cap(self, max_extent: f64) -> f64 {
        match self {
            Self::Unlimited => max_extent,
            Self::Limited(range) => range.min(max_extent),
        }
    }
}

/// Configuration of a single sensor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SensorSpec {
    enabled: bool,
    range: SensorRange,
    azimuth: f64,
    elevation: f64,
}

impl SensorSpec {
    /// Creates a specification using the sensor's mounting offsets.
    #[must_use]
    pub const fn new(sensor: SensorId, enabled: bool, range: SensorRange) -> Self {
        Self {
            enabled,
            range,
            azimuth: sensor.azimuth(),
            elevation: sensor.elevation(),
        }
    }

    /// Whether the sensor produces readings.
    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    /// Configured reach.
    #[must_use]
    pub const fn range(&self) -> SensorRange {
        self.range
    }

    /// Horizontal offset from the heading in degrees.
    #[must_use]
    pub const fn azimuth(&self) -> f64 {
        self.azimuth
    }

    /// Vertical offset from the pitch in degrees.
    #[must_use]
    pub const fn elevation(&self) -> f64 {
        self.elevation
    }

    /// Copy with a different enabled flag.
    #[must_use]
    pub const fn with_enabled(self, enabled: bool) -> Self {
        Self { enabled, ..self }
    }

    /// Copy with a different range.
    #[must_use]
    pub const fn with_range(self, range: SensorRange) -> Self {
        Self { range, ..self }
    }
}

/// Field-of-view presets over the horizontal sensors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisionMode {
    /// Every horizontal sensor.
    #[default]
    #[serde(rename = "360")]
    Full,
    /// Everything but the rear sensor.
    #[serde(rename = "270")]
    Wide,
    /// Front half, including both sides.
    #[serde(rename = "180")]
    Half,
    /// Front and the two front diagonals.
    #[serde(rename = "90")]
    Narrow,
}

impl VisionMode {
    /// Field of view in degrees.
    #[must_use]
    pub const fn degrees(self) -> u16 {
        match self {
            Self::Full => 360,
            Self::Wide => 270,
            Self::Half => 180,
            Self::Narrow => 90,
        }
    }

    /// Horizontal sensors enabled by the preset.
    #[must_use]
    pub fn enabled_sensors(self) -> &'static [SensorId] {
        match self {
            Self::Full => &SensorId::HORIZONTAL,
            Self::Wide => &[
                SensorId::Front,
                SensorId::FrontRight,
                SensorId::Right,
                SensorId::BackRight,
                SensorId::BackLeft,
                SensorId::Left,
                SensorId::FrontLeft,
            ],
            Self::Half => &[
                SensorId::Front,
                SensorId::FrontRight,
                SensorId::Right,
                SensorId::Left,
                SensorId::FrontLeft,
            ],
            Self::Narrow => &[SensorId::Front, SensorId::FrontRight, SensorId::FrontLeft],
        }
    }
}

impl FromStr for VisionMode {
    type Err = ParseVisionModeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim_end_matches('°') {
            "360" => Ok(Self::Full),
            "270" => Ok(Self::Wide),
            "180" => Ok(Self::Half),
            "90" => Ok(Self::Narrow),
            other => Err(ParseVisionModeError(other.to_owned())),
        }
    }
}

/// Vision mode that is not one of the 360/270/180/90 presets.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown vision mode '{0}', expected 360, 270, 180 or 90")]
pub struct ParseVisionModeError(pub String);

/// Distance reported by one sensor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SensorReading {
    /// Sensor that produced the reading.
    pub sensor: SensorId,
    /// Distance travelled by the ray, `None` when the sensor is disabled.
    pub distance: Option<f64>,
}

/// One reading per mounted sensor in declaration order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SensorReadings {
    readings: Vec<SensorReading>,
}

impl SensorReadings {
    /// Creates a reading set, sorting it into declaration order.
    #[must_use]
    pub fn from_readings(mut readings: Vec<SensorReading>) -> Self {
        readings.sort_by_key(|reading| reading.sensor);
        Self { readings }
    }

    /// Iterator over the readings in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &SensorReading> {
        self.readings.iter()
    }

    /// Distance reported by a sensor; `None` when disabled or not mounted.
    #[must_use]
    pub fn distance(&self, sensor: SensorId) -> Option<f64> {
        self.readings
            .iter()
            .find(|reading| reading.sensor == sensor)
            .and_then(|reading| reading.distance)
    }
}

/// Atomic robot motions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionCommand {
    /// One cell along the heading.
    MoveForward,
    /// One cell against the heading.
    MoveBackward,
    /// Quarter turn counter-clockwise.
    RotateLeft,
    /// Quarter turn clockwise.
    RotateRight,
    /// One level up (volumetric only).
    MoveUp,
    /// One level down (volumetric only).
    MoveDown,
}

impl MotionCommand {
    /// Wire name of the motion.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MoveForward => "move_forward",
            Self::MoveBackward => "move_backward",
            Self::RotateLeft => "rotate_left",
            Self::RotateRight => "rotate_right",
            Self::MoveUp => "move_up",
            Self::MoveDown => "move_down",
        }
    }

    /// Reports whether the motion changes level.
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::MoveUp | Self::MoveDown)
    }
}

impl fmt::Display for MotionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grid consulted by the path planner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanningGrid {
    /// The robot's accumulated knowledge.
    #[default]
    Discovered,
    /// Ground truth.
    Truth,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Executes an atomic motion.
    Drive {
        /// Motion to attempt.
        motion: MotionCommand,
    },
    /// Tilts the robot up or down (volumetric only).
    AdjustPitch {
        /// Signed change in degrees.
        degrees: f64,
    },
    /// Tilts the robot sideways (volumetric only).
    AdjustRoll {
        /// Signed change in degrees.
        degrees: f64,
    },
    /// Levels the robot (volumetric only).
    ResetOrientation,
    /// Flips a truth cell between empty and solid.
    ToggleCell {
        /// Cell to edit.
        cell: GridCoord,
    },
    /// Empties every editable truth cell.
    ClearMap,
    /// Plans a route to the goal and stores it.
    SetGoal {
        /// Destination cell.
        goal: GridCoord,
        /// Grid the route is planned over.
        grid: PlanningGrid,
    },
    /// Drops the goal and the stored plan.
    ClearGoal,
    /// Derives the next motion along the stored plan, advancing its cursor.
    RequestNextMove,
    /// Restores the initial pose and forgets all discoveries.
    Reset,
    /// Sets the range of every sensor.
    SetSensorRange {
        /// New range.
        range: SensorRange,
    },
    /// Sets the range of a single sensor.
    SetSensorRangeFor {
        /// Sensor to configure.
        sensor: SensorId,
        /// New range.
        range: SensorRange,
    },
    /// Enables or disables a single sensor.
    SetSensorEnabled {
        /// Sensor to configure.
        sensor: SensorId,
        /// Whether the sensor should report readings.
        enabled: bool,
    },
    /// Applies a field-of-view preset to the horizontal sensors.
    SetVisionMode {
        /// Preset to apply.
        mode: VisionMode,
    },
    /// Rebuilds both grids with new dimensions, discarding all state.
    ConfigureMap {
        /// Extents of the new grids.
        dimensions: Dimensions,
    },
    /// Replaces the map and start pose with a persisted record.
    LoadMap {
        /// Record to load.
        record: Box<MapRecord>,
    },
    /// Selects the level exposed to renderers (volumetric only).
    SetViewLevel {
        /// Requested level, clamped into the grid.
        level: u32,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// The robot translated to a neighbouring cell.
    Moved {
        /// Motion that was executed.
        motion: MotionCommand,
        /// Cell occupied before the move.
        from: GridCoord,
        /// Cell occupied after the move.
        to: GridCoord,
    },
    /// A motion could not be applied; nothing changed.
    MoveBlocked {
        /// Motion that was refused.
        motion: MotionCommand,
        /// Why the motion was refused.
        reason: BlockReason,
    },
    /// The robot turned in place.
    Rotated {
        /// Motion that was executed.
        motion: MotionCommand,
        /// Heading after the turn.
        heading: Heading,
    },
    /// Pitch or roll changed.
    AttitudeChanged {
        /// Pitch after the change.
        pitch: f64,
        /// Roll after the change.
        roll: f64,
    },
    /// A truth cell was edited.
    CellToggled {
        /// Edited cell.
        cell: GridCoord,
        /// State after the edit.
        occupancy: Occupancy,
    },
    /// A cell edit was refused; nothing changed.
    ToggleRejected {
        /// Cell targeted by the edit.
        cell: GridCoord,
        /// Why the edit was refused.
        reason: ToggleRejection,
    },
    /// Every editable truth cell was emptied.
    MapCleared,
    /// A goal was accepted. The path may be empty when no route exists.
    GoalSet {
        /// Accepted goal.
        goal: GridCoord,
        /// Number of waypoints in the stored plan.
        path_len: usize,
    },
    /// A goal was refused; the previous goal and plan are kept.
    GoalRejected {
        /// Refused goal.
        goal: GridCoord,
        /// Why the goal was refused.
        reason: GoalRejection,
    },
    /// The goal and plan were dropped.
    GoalCleared,
    /// Next motion along the plan, `None` once the plan is consumed.
    NextMoveDerived {
        /// Motion to execute next.
        motion: Option<MotionCommand>,
    },
    /// The robot returned to its initial pose with a blank discovered map.
    ResetCompleted {
        /// Pose after the reset.
        pose: Pose,
    },
    /// Sensor configuration changed.
    SensorsConfigured,
    /// A sensor configuration request was refused.
    SensorRejected {
        /// Sensor named by the request.
        sensor: SensorId,
        /// Why the request was refused.
        reason: SensorRejection,
    },
    /// Both grids were rebuilt with new dimensions.
    MapConfigured {
        /// Extents of the new grids.
        dimensions: Dimensions,
    },
    /// New dimensions were refused; nothing changed.
    MapRejected {
        /// Refused dimensions.
        dimensions: Dimensions,
        /// Why the dimensions were refused.
        reason: DimensionError,
    },
    /// A persisted map replaced the current one.
    MapLoaded {
        /// Name stored in the record.
        name: String,
    },
    /// A persisted map was refused; nothing changed.
    MapLoadRejected {
        /// Why the record was refused.
        reason: MapRecordError,
    },
    /// The level exposed to renderers changed.
    ViewLevelChanged {
        /// Selected level.
        level: u32,
    },
    /// A volumetric-only command reached a planar world.
    RequiresVolumetric {
        /// Name of the refused command.
        command: &'static str,
    },
}

/// Reasons a motion is refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockReason {
    /// The target lies outside the grid.
    OutOfBounds,
    /// The target cell is solid.
    Occupied,
    /// Nothing solid lies beneath the target cell.
    Unsupported,
    /// Descending would enter the ground floor.
    GroundLevel,
}

/// Reasons a cell edit is refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToggleRejection {
    /// The cell lies outside the grid.
    OutOfBounds,
    /// The cell belongs to the outer border ring.
    Border,
    /// The cell belongs to the volumetric ground floor.
    GroundFloor,
}

/// Reasons a goal is refused before search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GoalRejection {
    /// The goal lies outside the grid.
    OutOfBounds,
    /// The goal cell has not been discovered.
    Unknown,
    /// The goal cell is solid in the planning grid.
    Occupied,
}

/// Reasons a sensor configuration request is refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensorRejection {
    /// The sensor is not mounted on robots of this space.
    NotMounted,
}

/// Persisted map: dimensions, truth cells, and the robot's start pose.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapRecord {
    /// Human readable name of the map.
    pub name: String,
    /// Extents of the grid.
    pub dimensions: Dimensions,
    /// Truth cells in row-major order, levels outermost.
    pub cells: Vec<Occupancy>,
    /// Pose the robot starts from and resets to.
    pub start: Pose,
}

impl MapRecord {
    /// Checks the record against every world invariant.
    pub fn validate(&self) -> Result<(), MapRecordError> {
        let dimensions = self.dimensions;
        dimensions.validate()?;

        let expected = dimensions.cell_count();
        if self.cells.len() != expected {
            return Err(MapRecordError::CellCount {
                expected,
                actual: self.cells.len(),
            });
        }

        let cell = |coord: GridCoord| {
            dimensions
                .index(coord)
                .and_then(|index| self.cells.get(index).copied())
        };

        for z in 0..dimensions.levels() {
            for y in 0..dimensions.depth() {
                for x in 0..dimensions.width() {
                    let coord = GridCoord::new(x, y, z);
                    if dimensions.is_fixed(coord) && cell(coord) != Some(Occupancy::Solid) {
                        return Err(MapRecordError::OpenFixedCell(coord));
                    }
                }
            }
        }

        let start = self.start.cell();
        match cell(start) {
            None => return Err(MapRecordError::StartOutOfBounds(start)),
            Some(Occupancy::Solid) => return Err(MapRecordError::StartBlocked(start)),
            Some(Occupancy::Empty) => {}
        }

        if dimensions.space() == Space::Volumetric {
            let supported = start.below().and_then(cell) == Some(Occupancy::Solid);
            if !supported {
                return Err(MapRecordError::StartUnsupported(start));
            }
        }

        let (pitch, roll) = (self.start.pitch(), self.start.roll());
        let level = match dimensions.space() {
            Space::Planar => pitch == 0.0 && roll == 0.0,
            Space::Volumetric => {
                (-MAX_PITCH..=MAX_PITCH).contains(&pitch) && roll > -180.0 && roll <= 180.0
            }
        };
        if !level {
            return Err(MapRecordError::StartAttitude(start));
        }

        Ok(())
    }
}

/// Reasons a persisted map is refused.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MapRecordError {
    /// The recorded dimensions are invalid.
    #[error("invalid dimensions: {0}")]
    Dimensions(#[from] DimensionError),
    /// The cell list does not match the dimensions.
    #[error("expected {expected} cells, found {actual}")]
    CellCount {
        /// Cell count implied by the dimensions.
        expected: usize,
        /// Cell count stored in the record.
        actual: usize,
    },
    /// A border or ground cell is not solid.
    #[error("border or ground cell {0} must be solid")]
    OpenFixedCell(GridCoord),
    /// The start cell lies outside the grid.
    #[error("start cell {0} lies outside the map")]
    StartOutOfBounds(GridCoord),
    /// The start cell is solid.
    #[error("start cell {0} is solid")]
    StartBlocked(GridCoord),
    /// Nothing solid lies beneath the start cell.
    #[error("start cell {0} has no ground beneath it")]
    StartUnsupported(GridCoord),
    /// The start pitch or roll is outside its range, or non-zero on a planar map.
    #[error("start pose at {0} has an invalid pitch or roll")]
    StartAttitude(GridCoord),
}

/// Summary statistics of the truth grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapInfo {
    /// Extents of the grid.
    pub dimensions: Dimensions,
    /// Traversable cells.
    pub empty_cells: usize,
    /// Solid cells.
    pub solid_cells: usize,
}

/// Read-only view into a dense grid.
#[derive(Clone, Copy, Debug)]
pub struct GridView<'a, T> {
    cells: &'a [T],
    dimensions: Dimensions,
}

impl<'a, T: Copy> GridView<'a, T> {
    /// Captures a new view backed by the provided cell slice.
    #[must_use]
    pub fn new(cells: &'a [T], dimensions: Dimensions) -> Self {
        Self { cells, dimensions }
    }

    /// State of the cell, `None` when out of bounds.
    #[must_use]
    pub fn get(&self, coord: GridCoord) -> Option<T> {
        self.dimensions
            .index(coord)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Extents of the underlying grid.
    #[must_use]
    pub const fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Returns an iterator over all cells, levels outermost.
    pub fn iter(&self) -> impl Iterator<Item = T> + 'a {
        self.cells.iter().copied()
    }

    /// Two-dimensional slice of a single level.
    #[must_use]
    pub fn level(&self, level: u32) -> Option<LevelView<'a, T>> {
        if level >= self.dimensions.levels() {
            return None;
        }

        let width = usize::try_from(self.dimensions.width()).ok()?;
        let depth = usize::try_from(self.dimensions.depth()).ok()?;
        let stride = width.checked_mul(depth)?;
        let start = usize::try_from(level).ok()?.checked_mul(stride)?;
        let cells = self.cells.get(start..start.checked_add(stride)?)?;
        Some(LevelView {
            cells,
            width,
            level,
        })
    }
}

/// Read-only slice of one level of a grid.
#[derive(Clone, Copy, Debug)]
pub struct LevelView<'a, T> {
    cells: &'a [T],
    width: usize,
    level: u32,
}

impl<'a, T: Copy> LevelView<'a, T> {
    /// Level captured by the view.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// State of the cell at column `x` and row `y`.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Option<T> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        if x >= self.width {
            return None;
        }
        self.cells.get(y.checked_mul(self.width)?.checked_add(x)?).copied()
    }

    /// Iterator over the rows of the level, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &'a [T]> {
        self.cells.chunks(self.width.max(1))
    }
}

/// Read-only view of the goal and the stored plan.
#[derive(Clone, Copy, Debug)]
pub struct PlanView<'a> {
    goal: Option<GridCoord>,
    path: &'a [GridCoord],
    cursor: usize,
}

impl<'a> PlanView<'a> {
    /// Captures a new plan view.
    #[must_use]
    pub const fn new(goal: Option<GridCoord>, path: &'a [GridCoord], cursor: usize) -> Self {
        Self { goal, path, cursor }
    }

    /// Current goal, if any.
    #[must_use]
    pub const fn goal(&self) -> Option<GridCoord> {
        self.goal
    }

    /// Planned waypoints, excluding the cell the plan started from.
    #[must_use]
    pub const fn path(&self) -> &'a [GridCoord] {
        self.path
    }

    /// Index of the next waypoint to execute.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Waypoints not yet consumed by the cursor.
    #[must_use]
    pub fn remaining(&self) -> &'a [GridCoord] {
        self.path.get(self.cursor..).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = GridCoord::new(1, 1, 1);
        let destination = GridCoord::new(4, 3, 2);
        assert_eq!(origin.manhattan_distance(destination), 6);
        assert_eq!(destination.manhattan_distance(origin), 6);
    }

    #[test]
    fn headings_rotate_in_quarter_turns() {
        let mut heading = Heading::East;
        for expected in [Heading::North, Heading::West, Heading::South, Heading::East] {
            heading = heading.rotated_left();
            assert_eq!(heading, expected);
        }
        assert_eq!(Heading::East.rotated_right(), Heading::South);
        assert_eq!(Heading::from_degrees(270), Some(Heading::South));
        assert_eq!(Heading::from_degrees(45), None);
    }

    #[test]
    fn north_points_toward_decreasing_rows() {
        assert_eq!(Heading::North.step(), (0, -1));
        assert_eq!(
            Heading::toward(GridCoord::planar(3, 3), GridCoord::planar(3, 2)),
            Some(Heading::North)
        );
        assert_eq!(
            Heading::toward(GridCoord::planar(3, 3), GridCoord::planar(3, 3)),
            None
        );
    }

    #[test]
    fn roll_wraps_and_pitch_clamps() {
        let pose = Pose::new(GridCoord::new(2, 2, 1), Heading::East);
        assert_eq!(pose.pitched(120.0).pitch(), 90.0);
        assert_eq!(pose.pitched(-30.0).pitched(-90.0).pitch(), -90.0);
        assert_eq!(pose.rolled(190.0).roll(), -170.0);
        assert_eq!(pose.rolled(-180.0).roll(), 180.0);
    }

    #[test]
    fn border_and_ground_cells_are_fixed() {
        let planar = Dimensions::planar(10, 8);
        assert!(planar.is_fixed(GridCoord::planar(0, 4)));
        assert!(planar.is_fixed(GridCoord::planar(9, 4)));
        assert!(planar.is_fixed(GridCoord::planar(4, 7)));
        assert!(!planar.is_fixed(GridCoord::planar(4, 4)));

        let volumetric = Dimensions::volumetric(10, 8, 4);
        assert!(volumetric.is_fixed(GridCoord::new(4, 4, 0)));
        assert!(!volumetric.is_fixed(GridCoord::new(4, 4, 1)));
    }

    #[test]
    fn dimensions_validate_extents() {
        assert!(Dimensions::DEFAULT_PLANAR.validate().is_ok());
        assert!(Dimensions::DEFAULT_VOLUMETRIC.validate().is_ok());
        assert_eq!(
            Dimensions::planar(4, 50).validate(),
            Err(DimensionError::Extent { value: 4 })
        );
        assert_eq!(
            Dimensions::volumetric(50, 50, 1).validate(),
            Err(DimensionError::Levels { value: 1 })
        );
    }

    #[test]
    fn sensor_names_parse() {
        for sensor in SensorId::ALL {
            assert_eq!(sensor.name().parse::<SensorId>(), Ok(sensor));
        }
        assert!("periscope".parse::<SensorId>().is_err());
    }

    #[test]
    fn vision_presets_leave_rear_out_below_full_circle() {
        assert!(VisionMode::Full.enabled_sensors().contains(&SensorId::Back));
        assert!(!VisionMode::Wide.enabled_sensors().contains(&SensorId::Back));
        assert!(VisionMode::Wide
            .enabled_sensors()
            .contains(&SensorId::BackLeft));
        assert!(!VisionMode::Half
            .enabled_sensors()
            .contains(&SensorId::BackLeft));
        assert_eq!(VisionMode::Narrow.enabled_sensors().len(), 3);
        assert_eq!("90".parse::<VisionMode>(), Ok(VisionMode::Narrow));
    }

    #[test]
    fn sensor_range_caps_at_map_extent() {
        assert_eq!(SensorRange::Unlimited.cap(50.0), 50.0);
        assert_eq!(SensorRange::Limited(5.0).cap(50.0), 5.0);
        assert_eq!(SensorRange::Limited(80.0).cap(50.0), 50.0);
        assert_eq!(SensorRange::from_request(0.0), SensorRange::Unlimited);
    }

    fn bordered_record(dimensions: Dimensions, start: Pose) -> MapRecord {
        let mut cells = vec![Occupancy::Empty; dimensions.cell_count()];
        for z in 0..dimensions.levels() {
            for y in 0..dimensions.depth() {
                for x in 0..dimensions.width() {
                    let coord = GridCoord::new(x, y, z);
                    if dimensions.is_fixed(coord) {
                        let index = dimensions.index(coord).expect("in bounds");
                        cells[index] = Occupancy::Solid;
                    }
                }
            }
        }
        MapRecord {
            name: "test".to_owned(),
            dimensions,
            cells,
            start,
        }
    }

    #[test]
    fn record_validation_accepts_bordered_maps() {
        let record = bordered_record(
            Dimensions::volumetric(6, 6, 3),
            Pose::new(GridCoord::new(1, 1, 1), Heading::East),
        );
        assert_eq!(record.validate(), Ok(()));
    }

    #[test]
    fn record_validation_rejects_floating_start() {
        let record = bordered_record(
            Dimensions::volumetric(6, 6, 3),
            Pose::new(GridCoord::new(1, 1, 2), Heading::East),
        );
        assert_eq!(
            record.validate(),
            Err(MapRecordError::StartUnsupported(GridCoord::new(1, 1, 2)))
        );
    }

    #[test]
    fn record_validation_rejects_open_border() {
        let dimensions = Dimensions::planar(6, 6);
        let mut record = bordered_record(
            dimensions,
            Pose::new(GridCoord::planar(1, 1), Heading::East),
        );
        let index = dimensions
            .index(GridCoord::planar(0, 3))
            .expect("in bounds");
        record.cells[index] = Occupancy::Empty;
        assert_eq!(
            record.validate(),
            Err(MapRecordError::OpenFixedCell(GridCoord::planar(0, 3)))
        );
    }

    #[test]
    fn record_validation_checks_start_attitude() {
        let start = Pose::new(GridCoord::new(1, 1, 1), Heading::East);
        let volumetric = Dimensions::volumetric(6, 6, 3);

        let tilted = bordered_record(volumetric, Pose { pitch: 500.0, ..start });
        assert_eq!(
            tilted.validate(),
            Err(MapRecordError::StartAttitude(start.cell()))
        );
        let unwrapped = bordered_record(volumetric, Pose { roll: -180.0, ..start });
        assert_eq!(
            unwrapped.validate(),
            Err(MapRecordError::StartAttitude(start.cell()))
        );
        let not_a_number = bordered_record(volumetric, Pose { pitch: f64::NAN, ..start });
        assert!(not_a_number.validate().is_err());

        let extreme = bordered_record(
            volumetric,
            Pose {
                pitch: -MAX_PITCH,
                roll: 180.0,
                ..start
            },
        );
        assert_eq!(extreme.validate(), Ok(()));

        let planar_start = Pose::new(GridCoord::planar(1, 1), Heading::East);
        let planar = bordered_record(
            Dimensions::planar(6, 6),
            Pose {
                roll: 15.0,
                ..planar_start
            },
        );
        assert_eq!(
            planar.validate(),
            Err(MapRecordError::StartAttitude(planar_start.cell()))
        );
    }

    #[test]
    fn records_serialize_cells_as_digits() {
        let record = bordered_record(
            Dimensions::planar(5, 5),
            Pose::new(GridCoord::planar(1, 1), Heading::North),
        );
        let json = serde_json::to_string(&record).expect("serialize");
        assert!(json.contains("\"cells\":[1,1,1,1,1,1,0,0,0,1"));
        assert!(json.contains("\"heading\":90"));
        let restored: MapRecord = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored, record);
    }

    #[test]
    fn level_view_slices_one_level() {
        let dimensions = Dimensions::volumetric(5, 5, 3);
        let mut cells = vec![Occupancy::Empty; dimensions.cell_count()];
        let index = dimensions.index(GridCoord::new(2, 3, 1)).expect("in bounds");
        cells[index] = Occupancy::Solid;

        let view = GridView::new(&cells, dimensions);
        let level = view.level(1).expect("level exists");
        assert_eq!(level.get(2, 3), Some(Occupancy::Solid));
        assert_eq!(level.get(3, 2), Some(Occupancy::Empty));
        assert_eq!(level.rows().count(), 5);
        assert!(view.level(3).is_none());
    }
}
