#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Autopilot system that drives the robot along its stored plan.
//!
//! While engaged the autopilot asks the world for the next planned motion
//! and turns every derived motion into a drive command. It disengages as soon
//! as the plan is exhausted, a motion is refused, or the plan is discarded.

use gridslam_core::{Command, Event};
use tracing::debug;

/// Pure system that reacts to world events and emits drive commands.
#[derive(Debug, Default)]
pub struct Autopilot {
    engaged: bool,
    issued: u64,
}

impl Autopilot {
    /// Starts following the stored plan on the next [`Autopilot::step`].
    pub fn engage(&mut self) {
        self.engaged = true;
    }

    /// Stops issuing commands.
    pub fn disengage(&mut self) {
        self.engaged = false;
    }

    /// Reports whether the autopilot is following a plan.
    #[must_use]
    pub const fn is_engaged(&self) -> bool {
        self.engaged
    }

    /// Number of drive commands issued since creation.
    #[must_use]
    pub const fn issued(&self) -> u64 {
        self.issued
    }

    /// Requests the next planned motion while engaged.
    pub fn step(&self, out: &mut Vec<Command>) {
        if self.engaged {
            out.push(Command::RequestNextMove);
        }
    }

    /// Consumes world events and emits drive commands for derived motions.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::NextMoveDerived {
                    motion: Some(motion),
                } if self.engaged => {
                    out.push(Command::Drive { motion: *motion });
                    self.issued += 1;
                }
                Event::NextMoveDerived { motion: None } => self.stop("plan exhausted"),
                Event::MoveBlocked { .. } => self.stop("motion refused"),
                Event::GoalCleared
                | Event::ResetCompleted { .. }
                | Event::MapConfigured { .. }
                | Event::MapLoaded { .. } => self.stop("plan discarded"),
                _ => {}
            }
        }
    }

    fn stop(&mut self, reason: &'static str) {
        if self.engaged {
            debug!(reason, issued = self.issued, "autopilot disengaged");
            self.engaged = false;
        }
    }
}
