//! Parameters used to construct a [`World`](crate::World).

use gridslam_core::{
    DimensionError, Dimensions, GridCoord, Heading, Pose, SensorRange, Space, VisionMode,
};
use gridslam_system_planner::{PlannerConfig, DEFAULT_VERTICAL_COST};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::Layout;

/// Engine construction parameters.
///
/// Every field has a default, so partial TOML documents deserialize into a
/// complete configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Planar or volumetric geometry.
    pub space: Space,
    /// Columns along the x axis.
    pub width: u32,
    /// Rows along the y axis.
    pub depth: u32,
    /// Levels along the z axis; ignored by planar worlds.
    pub levels: u32,
    /// Interior painted inside the border.
    pub layout: Layout,
    /// Start pose; defaults to the first interior cell facing east.
    pub start: Option<StartConfig>,
    /// Sensor reach; absent or non-positive means unlimited.
    pub sensor_range: Option<f64>,
    /// Horizontal field-of-view preset.
    pub vision_mode: VisionMode,
    /// Whether sensors sweep once at construction; defaults to on for
    /// volumetric worlds only.
    pub initial_sweep: Option<bool>,
    /// Planner cost of moving between levels.
    pub vertical_cost: f64,
}

/// Start pose expressed with plain numbers for configuration files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StartConfig {
    /// Column of the start cell.
    pub x: u32,
    /// Row of the start cell.
    pub y: u32,
    /// Level of the start cell; defaults to the lowest walkable level.
    #[serde(default)]
    pub z: Option<u32>,
    /// Heading in degrees.
    #[serde(default = "east")]
    pub heading: Heading,
}

fn east() -> Heading {
    Heading::East
}

impl EngineConfig {
    /// Default planar configuration: the 50 by 50 maze.
    #[must_use]
    pub fn planar() -> Self {
        Self {
            space: Space::Planar,
            width: Dimensions::DEFAULT_PLANAR.width(),
            depth: Dimensions::DEFAULT_PLANAR.depth(),
            levels: Dimensions::DEFAULT_VOLUMETRIC.levels(),
            layout: Layout::Furnished,
            start: None,
            sensor_range: None,
            vision_mode: VisionMode::Full,
            initial_sweep: None,
            vertical_cost: DEFAULT_VERTICAL_COST,
        }
    }

    /// Default volumetric configuration: the 50 by 50 by 20 house.
    #[must_use]
    pub fn volumetric() -> Self {
        Self {
            space: Space::Volumetric,
            ..Self::planar()
        }
    }

    /// Grid extents described by the configuration.
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        match self.space {
            Space::Planar => Dimensions::planar(self.width, self.depth),
            Space::Volumetric => Dimensions::volumetric(self.width, self.depth, self.levels),
        }
    }

    /// Pose the robot starts from and resets to.
    #[must_use]
    pub fn start_pose(&self) -> Pose {
        let ground = match self.space {
            Space::Planar => 0,
            Space::Volumetric => 1,
        };
        let (x, y, z, heading) = match self.start {
            Some(start) => (start.x, start.y, start.z.unwrap_or(ground), start.heading),
            None => {
                let inset = match self.space {
                    Space::Planar => 1,
                    Space::Volumetric => 2,
                };
                (inset, inset, ground, Heading::East)
            }
        };
        Pose::new(GridCoord::new(x, y, z), heading)
    }

    /// Range applied to every sensor.
    #[must_use]
    pub fn sensor_range(&self) -> SensorRange {
        self.sensor_range
            .map_or(SensorRange::Unlimited, SensorRange::from_request)
    }

    /// Whether sensors sweep once when the world is built or re-mapped.
    #[must_use]
    pub fn initial_sweep(&self) -> bool {
        self.initial_sweep
            .unwrap_or(self.space == Space::Volumetric)
    }

    /// Planner weights derived from the configuration.
    pub fn planner(&self) -> Result<PlannerConfig, ConfigError> {
        if self.vertical_cost > 0.0 && self.vertical_cost.is_finite() {
            Ok(PlannerConfig::new(self.vertical_cost))
        } else {
            Err(ConfigError::VerticalCost(self.vertical_cost))
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::planar()
    }
}

/// Reasons a configuration cannot produce a world.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The configured extents are out of range.
    #[error("invalid map dimensions: {0}")]
    Dimensions(#[from] DimensionError),
    /// The robot cannot stand on the configured start cell.
    #[error("start cell {0} is not traversable")]
    Start(GridCoord),
    /// The planner's vertical cost is not a positive number.
    #[error("vertical cost must be positive, got {0}")]
    VerticalCost(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_documents_fill_in_defaults() {
        let config: EngineConfig = toml::from_str(
            r#"
                space = "volumetric"
                sensor_range = 8.0
                vision_mode = "180"

                [start]
                x = 4
                y = 6
                heading = 270
            "#,
        )
        .expect("valid config");

        assert_eq!(config.dimensions(), Dimensions::DEFAULT_VOLUMETRIC);
        assert_eq!(config.sensor_range(), SensorRange::Limited(8.0));
        assert_eq!(config.vision_mode, VisionMode::Half);
        assert!(config.initial_sweep());
        assert_eq!(
            config.start_pose(),
            Pose::new(GridCoord::new(4, 6, 1), Heading::South)
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let parsed = toml::from_str::<EngineConfig>("wheels = 4");

        assert!(parsed.is_err());
    }

    #[test]
    fn default_planar_start_is_the_corner_cell() {
        let config = EngineConfig::default();

        assert_eq!(
            config.start_pose(),
            Pose::new(GridCoord::planar(1, 1), Heading::East)
        );
        assert!(!config.initial_sweep());
        assert_eq!(config.sensor_range(), SensorRange::Unlimited);
    }

    #[test]
    fn vertical_cost_must_be_positive() {
        let config = EngineConfig {
            vertical_cost: 0.0,
            ..EngineConfig::volumetric()
        };

        assert_eq!(config.planner(), Err(ConfigError::VerticalCost(0.0)));
    }
}
