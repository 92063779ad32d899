//! Robot pose, odometry, and the stored navigation plan.

use gridslam_core::{GridCoord, Heading, Odometry, Pose};

#[derive(Clone, Debug)]
pub(crate) struct RobotState {
    pose: Pose,
    initial: Pose,
    odometry: Odometry,
    path_history: Vec<GridCoord>,
    goal: Option<GridCoord>,
    plan: Vec<GridCoord>,
    cursor: usize,
}

impl RobotState {
    pub(crate) fn new(initial: Pose) -> Self {
        Self {
            pose: initial,
            initial,
            odometry: Odometry {
                altitude_max_reached: initial.cell().z(),
                ..Odometry::default()
            },
            path_history: vec![initial.cell()],
            goal: None,
            plan: Vec::new(),
            cursor: 0,
        }
    }

    /// Returns to the initial pose with fresh counters and no plan.
    pub(crate) fn reset(&mut self) {
        *self = Self::new(self.initial);
    }

    pub(crate) const fn pose(&self) -> &Pose {
        &self.pose
    }

    pub(crate) const fn initial(&self) -> &Pose {
        &self.initial
    }

    pub(crate) const fn odometry(&self) -> &Odometry {
        &self.odometry
    }

    pub(crate) fn path_history(&self) -> &[GridCoord] {
        &self.path_history
    }

    pub(crate) const fn goal(&self) -> Option<GridCoord> {
        self.goal
    }

    pub(crate) fn plan(&self) -> &[GridCoord] {
        &self.plan
    }

    pub(crate) const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Records a successful translation into `cell`.
    pub(crate) fn record_move(&mut self, cell: GridCoord, vertical: bool) {
        self.pose = self.pose.moved_to(cell);
        self.path_history.push(cell);
        self.odometry.move_count += 1;
        self.odometry.distance_traveled += 1.0;
        if vertical {
            self.odometry.vertical_move_count += 1;
        }
        self.odometry.altitude_max_reached = self.odometry.altitude_max_reached.max(cell.z());
    }

    pub(crate) fn record_rotation(&mut self, heading: Heading) {
        self.pose = self.pose.turned(heading);
        self.odometry.rotation_count += 1;
    }

    pub(crate) fn set_attitude(&mut self, pose: Pose) {
        debug_assert_eq!(pose.cell(), self.pose.cell());
        self.pose = pose;
    }

    pub(crate) fn assign_plan(&mut self, goal: GridCoord, plan: Vec<GridCoord>) {
        self.goal = Some(goal);
        self.plan = plan;
        self.cursor = 0;
    }

    pub(crate) fn clear_plan(&mut self) {
        self.goal = None;
        self.plan.clear();
        self.cursor = 0;
    }

    pub(crate) fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor.min(self.plan.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_restores_initial_altitude_and_history() {
        let start = Pose::new(GridCoord::new(2, 2, 1), Heading::East);
        let mut robot = RobotState::new(start);
        robot.record_move(GridCoord::new(2, 2, 2), true);
        robot.record_rotation(Heading::North);
        robot.assign_plan(GridCoord::new(4, 4, 1), vec![GridCoord::new(3, 2, 2)]);

        assert_eq!(robot.odometry().altitude_max_reached, 2);
        assert_eq!(robot.odometry().vertical_move_count, 1);
        assert_eq!(robot.path_history().len(), 2);

        robot.reset();

        assert_eq!(robot.pose(), &start);
        assert_eq!(robot.odometry(), &Odometry {
            altitude_max_reached: 1,
            ..Odometry::default()
        });
        assert_eq!(robot.path_history(), &[GridCoord::new(2, 2, 1)]);
        assert_eq!(robot.goal(), None);
        assert!(robot.plan().is_empty());
    }
}
