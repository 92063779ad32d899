//! Folds sensor readings into the robot's discovered map.

use gridslam_core::{Knowledge, Occupancy, Pose, SensorReadings};

use crate::{
    grid::Grid,
    sensors::{Ray, SensorArray},
};

/// Sampling increment used when re-walking a ray.
const DISCOVERY_STEP: f64 = 0.5;

/// Marks the pose cell and every sampled cell along each reading as free and
/// the reading endpoint as an obstacle when the truth there is solid.
///
/// Known cells never return to unknown, and free cells only become obstacles
/// where the truth grid is solid.
pub(crate) fn update_post(
    discovered: &mut Grid<Knowledge>,
    truth: &Grid<Occupancy>,
    sensors: &SensorArray,
    pose: &Pose,
    readings: &SensorReadings,
) {
    let dimensions = truth.dimensions();
    discovered.set(pose.cell(), Knowledge::Free);

    for reading in readings.iter() {
        let (Some(distance), Some(spec)) = (reading.distance, sensors.spec(reading.sensor)) else {
            continue;
        };
        let ray = Ray::from_pose(pose, &spec, dimensions.space());

        let mut travelled = 0.0;
        let mut index = 0_u64;
        while travelled < distance {
            index += 1;
            travelled = index as f64 * DISCOVERY_STEP;
            if let Some(cell) = ray.cell_at(travelled, dimensions) {
                if discovered.get(cell) == Some(Knowledge::Unknown) {
                    discovered.set(cell, Knowledge::Free);
                }
            }
        }

        if let Some(endpoint) = ray.cell_at(distance, dimensions) {
            if truth.is_solid(endpoint) {
                discovered.set(endpoint, Knowledge::Obstacle);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridslam_core::{Dimensions, GridCoord, Heading, SensorId, SensorRange, Space, VisionMode};

    #[test]
    fn readings_free_the_corridor_and_mark_the_wall() {
        let mut truth = Grid::bordered(Dimensions::planar(10, 5));
        truth.set(GridCoord::planar(6, 2), Occupancy::Solid);
        let mut discovered = Grid::filled(truth.dimensions(), Knowledge::Unknown);
        let mut sensors = SensorArray::new(Space::Planar, SensorRange::Unlimited, VisionMode::Full);
        for sensor in SensorId::HORIZONTAL {
            sensors
                .set_enabled(sensor, sensor == SensorId::Front)
                .expect("mounted");
        }
        let pose = Pose::new(GridCoord::planar(2, 2), Heading::East);

        let readings = sensors.read_all(&truth, &pose);
        update_post(&mut discovered, &truth, &sensors, &pose, &readings);

        for x in 2..6 {
            assert_eq!(
                discovered.get(GridCoord::planar(x, 2)),
                Some(Knowledge::Free)
            );
        }
        assert_eq!(
            discovered.get(GridCoord::planar(6, 2)),
            Some(Knowledge::Obstacle)
        );
        assert_eq!(
            discovered.get(GridCoord::planar(7, 2)),
            Some(Knowledge::Unknown)
        );
        assert_eq!(
            discovered.get(GridCoord::planar(2, 1)),
            Some(Knowledge::Unknown)
        );
    }

    #[test]
    fn range_limited_endpoints_stay_free() {
        let truth = Grid::bordered(Dimensions::planar(20, 5));
        let mut discovered = Grid::filled(truth.dimensions(), Knowledge::Unknown);
        let sensors = SensorArray::new(Space::Planar, SensorRange::Limited(3.0), VisionMode::Narrow);
        let pose = Pose::new(GridCoord::planar(1, 2), Heading::East);

        let readings = sensors.read_all(&truth, &pose);
        update_post(&mut discovered, &truth, &sensors, &pose, &readings);

        assert_eq!(
            discovered.get(GridCoord::planar(4, 2)),
            Some(Knowledge::Free)
        );
        assert_eq!(
            discovered.get(GridCoord::planar(5, 2)),
            Some(Knowledge::Unknown)
        );
    }
}
