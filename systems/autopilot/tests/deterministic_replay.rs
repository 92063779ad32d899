use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use gridslam_core::{
    Command, Event, GridCoord, Knowledge, MotionCommand, PlanningGrid, SensorId, SensorRange,
};
use gridslam_system_autopilot::Autopilot;
use gridslam_world::{self as world, query, World};

#[test]
fn deterministic_replay_produces_identical_runs() {
    let first = replay(World::planar(), planar_script());
    let second = replay(World::planar(), planar_script());

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert_eq!(first.final_cell, GridCoord::planar(12, 3));
}

#[test]
fn volumetric_replay_is_deterministic() {
    let first = replay(World::volumetric(), volumetric_script());
    let second = replay(World::volumetric(), volumetric_script());

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());
}

fn replay(mut world: World, script: Vec<Step>) -> ReplayOutcome {
    let mut autopilot = Autopilot::default();
    let mut log = Vec::new();

    for step in script {
        match step {
            Step::Apply(command) => {
                let mut events = Vec::new();
                world::apply(&mut world, command, &mut events);
                record_events(&events, &mut log);
            }
            Step::Autopilot => {
                autopilot.engage();
                drive_until_idle(&mut world, &mut autopilot, &mut log);
            }
        }
    }

    let known_cells = query::discovered_view(&world)
        .iter()
        .filter(|cell| *cell != Knowledge::Unknown)
        .count();
    let odometry = query::odometry(&world);

    ReplayOutcome {
        final_cell: query::pose(&world).cell(),
        move_count: odometry.move_count,
        rotation_count: odometry.rotation_count,
        known_cells,
        events: log,
    }
}

fn drive_until_idle(world: &mut World, autopilot: &mut Autopilot, log: &mut Vec<EventRecord>) {
    loop {
        let mut commands = Vec::new();
        autopilot.step(&mut commands);
        if commands.is_empty() {
            break;
        }

        while !commands.is_empty() {
            let mut events = Vec::new();
            for command in commands.drain(..) {
                world::apply(world, command, &mut events);
            }
            record_events(&events, log);
            autopilot.handle(&events, &mut commands);
        }
    }
}

fn record_events(events: &[Event], log: &mut Vec<EventRecord>) {
    log.extend(events.iter().filter_map(EventRecord::from_event));
}

enum Step {
    Apply(Command),
    Autopilot,
}

fn planar_script() -> Vec<Step> {
    vec![
        Step::Apply(Command::SetSensorRange {
            range: SensorRange::Limited(12.0),
        }),
        Step::Apply(Command::Drive {
            motion: MotionCommand::MoveForward,
        }),
        Step::Apply(Command::SetGoal {
            goal: GridCoord::planar(12, 3),
            grid: PlanningGrid::Truth,
        }),
        Step::Autopilot,
        Step::Apply(Command::Drive {
            motion: MotionCommand::RotateLeft,
        }),
    ]
}

fn volumetric_script() -> Vec<Step> {
    vec![
        Step::Apply(Command::SetSensorEnabled {
            sensor: SensorId::StraightDown,
            enabled: true,
        }),
        Step::Apply(Command::SetGoal {
            goal: GridCoord::new(9, 2, 1),
            grid: PlanningGrid::Discovered,
        }),
        Step::Autopilot,
        Step::Apply(Command::SetGoal {
            goal: GridCoord::new(6, 12, 1),
            grid: PlanningGrid::Truth,
        }),
        Step::Autopilot,
    ]
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ReplayOutcome {
    final_cell: GridCoord,
    move_count: u64,
    rotation_count: u64,
    known_cells: usize,
    events: Vec<EventRecord>,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum EventRecord {
    Moved { from: GridCoord, to: GridCoord },
    Rotated { motion: MotionCommand },
    Blocked { motion: MotionCommand },
    Goal { goal: GridCoord, path_len: usize },
    Derived { motion: Option<MotionCommand> },
}

impl EventRecord {
    fn from_event(event: &Event) -> Option<Self> {
        match event {
            Event::Moved { from, to, .. } => Some(Self::Moved {
                from: *from,
                to: *to,
            }),
            Event::Rotated { motion, .. } => Some(Self::Rotated { motion: *motion }),
            Event::MoveBlocked { motion, .. } => Some(Self::Blocked { motion: *motion }),
            Event::GoalSet { goal, path_len } => Some(Self::Goal {
                goal: *goal,
                path_len: *path_len,
            }),
            Event::NextMoveDerived { motion } => Some(Self::Derived { motion: *motion }),
            _ => None,
        }
    }
}
