//! Ray-marching range sensors evaluated against the truth grid.

use std::collections::BTreeMap;

use gridslam_core::{
    Dimensions, GridCoord, Occupancy, Pose, SensorId, SensorReading, SensorReadings,
    SensorRejection, SensorRange, SensorSpec, Space, VisionMode,
};

use crate::grid::Grid;

/// March increment of planar sensors.
pub(crate) const PLANAR_STEP: f64 = 1.0;
/// March increment of volumetric sensors.
pub(crate) const VOLUMETRIC_STEP: f64 = 0.1;

/// Half-line leaving the centre of the robot's cell.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Ray {
    origin: [f64; 3],
    direction: [f64; 3],
}

impl Ray {
    /// Ray of a sensor mounted on a robot at `pose`.
    ///
    /// Rows grow downward, so the y component is the negated sine of the
    /// azimuth. Planar rays ignore elevation entirely.
    pub(crate) fn from_pose(pose: &Pose, spec: &SensorSpec, space: Space) -> Self {
        let cell = pose.cell();
        let origin = [
            f64::from(cell.x()) + 0.5,
            f64::from(cell.y()) + 0.5,
            f64::from(cell.z()) + 0.5,
        ];

        let azimuth = (f64::from(pose.heading().degrees()) + spec.azimuth()).to_radians();
        let elevation = match space {
            Space::Planar => 0.0,
            Space::Volumetric => (pose.pitch() + spec.elevation()).to_radians(),
        };
        let horizontal = elevation.cos();

        Self {
            origin,
            direction: [
                horizontal * azimuth.cos(),
                -horizontal * azimuth.sin(),
                elevation.sin(),
            ],
        }
    }

    /// Cell containing the point `distance` units along the ray.
    pub(crate) fn cell_at(&self, distance: f64, dimensions: Dimensions) -> Option<GridCoord> {
        let mut axes = [0_u32; 3];
        for (axis, slot) in axes.iter_mut().enumerate() {
            let value = (self.origin[axis] + self.direction[axis] * distance).floor();
            if !(0.0..=f64::from(u32::MAX)).contains(&value) {
                return None;
            }
            *slot = value as u32;
        }

        let coord = GridCoord::new(axes[0], axes[1], axes[2]);
        dimensions.contains(coord).then_some(coord)
    }

    /// Distance travelled before the ray meets a solid cell or leaves the
    /// grid, never exceeding `cap`.
    pub(crate) fn march(&self, truth: &Grid<Occupancy>, step: f64, cap: f64) -> f64 {
        let steps = (cap / step).ceil().max(0.0) as u64;
        for index in 1..=steps {
            let travelled = index as f64 * step;
            match self.cell_at(travelled, truth.dimensions()) {
                Some(cell) if !truth.is_solid(cell) => {}
                _ => return travelled.min(cap),
            }
        }
        cap
    }
}

/// Fixed set of sensors mounted on the robot.
#[derive(Clone, Debug)]
pub(crate) struct SensorArray {
    space: Space,
    specs: BTreeMap<SensorId, SensorSpec>,
    vision_mode: VisionMode,
}

impl SensorArray {
    /// Mounts every sensor of the space; vertical sensors start disabled.
    pub(crate) fn new(space: Space, range: SensorRange, vision_mode: VisionMode) -> Self {
        let specs = SensorId::available_in(space)
            .iter()
            .map(|&sensor| (sensor, SensorSpec::new(sensor, !sensor.is_vertical(), range)))
            .collect();
        let mut array = Self {
            space,
            specs,
            vision_mode,
        };
        array.set_vision_mode(vision_mode);
        array
    }

    /// One reading per mounted sensor; disabled sensors report `None`.
    pub(crate) fn read_all(&self, truth: &Grid<Occupancy>, pose: &Pose) -> SensorReadings {
        let step = match self.space {
            Space::Planar => PLANAR_STEP,
            Space::Volumetric => VOLUMETRIC_STEP,
        };
        let extent = f64::from(truth.dimensions().max_extent());

        let readings = self
            .specs
            .iter()
            .map(|(&sensor, spec)| SensorReading {
                sensor,
                distance: spec.enabled().then(|| {
                    Ray::from_pose(pose, spec, self.space).march(
                        truth,
                        step,
                        spec.range().cap(extent),
                    )
                }),
            })
            .collect();

        SensorReadings::from_readings(readings)
    }

    pub(crate) fn set_range(&mut self, range: SensorRange) {
        for spec in self.specs.values_mut() {
            *spec = spec.with_range(range);
        }
    }

    pub(crate) fn set_range_for(
        &mut self,
        sensor: SensorId,
        range: SensorRange,
    ) -> Result<(), SensorRejection> {
        let spec = self
            .specs
            .get_mut(&sensor)
            .ok_or(SensorRejection::NotMounted)?;
        *spec = spec.with_range(range);
        Ok(())
    }

    pub(crate) fn set_enabled(
        &mut self,
        sensor: SensorId,
        enabled: bool,
    ) -> Result<(), SensorRejection> {
        let spec = self
            .specs
            .get_mut(&sensor)
            .ok_or(SensorRejection::NotMounted)?;
        *spec = spec.with_enabled(enabled);
        Ok(())
    }

    /// Enables the preset's horizontal sensors and disables the rest.
    /// Vertical sensors keep their state.
    pub(crate) fn set_vision_mode(&mut self, mode: VisionMode) {
        self.vision_mode = mode;
        let enabled = mode.enabled_sensors();
        for sensor in SensorId::HORIZONTAL {
            if let Some(spec) = self.specs.get_mut(&sensor) {
                *spec = spec.with_enabled(enabled.contains(&sensor));
            }
        }
    }

    pub(crate) fn spec(&self, sensor: SensorId) -> Option<SensorSpec> {
        self.specs.get(&sensor).copied()
    }

    pub(crate) const fn vision_mode(&self) -> VisionMode {
        self.vision_mode
    }

    pub(crate) fn specs(&self) -> impl Iterator<Item = (SensorId, SensorSpec)> + '_ {
        self.specs.iter().map(|(&sensor, &spec)| (sensor, spec))
    }
}
