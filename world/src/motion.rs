//! Validation of atomic motions against the truth grid.

use gridslam_core::{BlockReason, GridCoord, Heading, MotionCommand, Occupancy, Pose};

use crate::grid::Grid;

/// Outcome of a motion that passed validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Transition {
    Translate(GridCoord),
    Turn(Heading),
}

/// Checks a motion against the truth grid without mutating anything.
pub(crate) fn resolve(
    truth: &Grid<Occupancy>,
    pose: &Pose,
    motion: MotionCommand,
) -> Result<Transition, BlockReason> {
    let here = pose.cell();
    match motion {
        MotionCommand::RotateLeft => Ok(Transition::Turn(pose.heading().rotated_left())),
        MotionCommand::RotateRight => Ok(Transition::Turn(pose.heading().rotated_right())),
        MotionCommand::MoveForward | MotionCommand::MoveBackward => {
            let (dx, dy) = pose.heading().step();
            let target = if motion == MotionCommand::MoveForward {
                here.offset(dx, dy, 0)
            } else {
                here.offset(-dx, -dy, 0)
            }
            .ok_or(BlockReason::OutOfBounds)?;
            enterable(truth, target)?;
            Ok(Transition::Translate(target))
        }
        MotionCommand::MoveUp => {
            let target = here.with_z(here.z() + 1);
            enterable(truth, target)?;
            Ok(Transition::Translate(target))
        }
        MotionCommand::MoveDown => {
            if here.z() <= 1 {
                return Err(BlockReason::GroundLevel);
            }
            let target = here.with_z(here.z() - 1);
            enterable(truth, target)?;
            Ok(Transition::Translate(target))
        }
    }
}

fn enterable(truth: &Grid<Occupancy>, target: GridCoord) -> Result<(), BlockReason> {
    match truth.get(target) {
        None => Err(BlockReason::OutOfBounds),
        Some(Occupancy::Solid) => Err(BlockReason::Occupied),
        Some(Occupancy::Empty) if !truth.is_traversable(target) => Err(BlockReason::Unsupported),
        Some(Occupancy::Empty) => Ok(()),
    }
}
