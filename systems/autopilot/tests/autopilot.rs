use gridslam_core::{Command, Event, GridCoord, Heading, MotionCommand, PlanningGrid};
use gridslam_system_autopilot::Autopilot;
use gridslam_world::{self as world, query, World};

const ROUND_LIMIT: usize = 200;

fn apply(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}

/// Runs autopilot rounds until it disengages, returning every drive command.
fn run_autopilot(world: &mut World, autopilot: &mut Autopilot) -> Vec<MotionCommand> {
    let mut driven = Vec::new();

    for _ in 0..ROUND_LIMIT {
        let mut commands = Vec::new();
        autopilot.step(&mut commands);
        if commands.is_empty() {
            return driven;
        }

        while !commands.is_empty() {
            let mut events = Vec::new();
            for command in commands.drain(..) {
                if let Command::Drive { motion } = command {
                    driven.push(motion);
                }
                world::apply(world, command, &mut events);
            }
            autopilot.handle(&events, &mut commands);
        }
    }

    panic!("autopilot still engaged after {ROUND_LIMIT} rounds");
}

#[test]
fn autopilot_turns_and_drives_to_the_goal() {
    let mut world = World::planar();
    let mut autopilot = Autopilot::default();
    let _ = apply(
        &mut world,
        Command::SetGoal {
            goal: GridCoord::planar(1, 5),
            grid: PlanningGrid::Truth,
        },
    );

    autopilot.engage();
    let driven = run_autopilot(&mut world, &mut autopilot);

    assert_eq!(
        driven,
        vec![
            MotionCommand::RotateRight,
            MotionCommand::MoveForward,
            MotionCommand::MoveForward,
            MotionCommand::MoveForward,
            MotionCommand::MoveForward,
        ]
    );
    assert!(!autopilot.is_engaged());
    assert_eq!(autopilot.issued(), 5);
    assert_eq!(query::pose(&world).cell(), GridCoord::planar(1, 5));
    assert_eq!(query::pose(&world).heading(), Heading::South);
}

#[test]
fn autopilot_stops_when_a_wall_appears() {
    let mut world = World::planar();
    let mut autopilot = Autopilot::default();
    let _ = apply(
        &mut world,
        Command::SetGoal {
            goal: GridCoord::planar(5, 1),
            grid: PlanningGrid::Truth,
        },
    );
    let _ = apply(
        &mut world,
        Command::ToggleCell {
            cell: GridCoord::planar(3, 1),
        },
    );

    autopilot.engage();
    let driven = run_autopilot(&mut world, &mut autopilot);

    assert_eq!(
        driven,
        vec![MotionCommand::MoveForward, MotionCommand::MoveForward]
    );
    assert!(!autopilot.is_engaged());
    assert_eq!(query::pose(&world).cell(), GridCoord::planar(2, 1));
}

#[test]
fn autopilot_without_a_plan_disengages_immediately() {
    let mut world = World::planar();
    let mut autopilot = Autopilot::default();

    autopilot.engage();
    let driven = run_autopilot(&mut world, &mut autopilot);

    assert!(driven.is_empty());
    assert!(!autopilot.is_engaged());
}

#[test]
fn clearing_the_goal_disengages() {
    let mut world = World::planar();
    let mut autopilot = Autopilot::default();
    let _ = apply(
        &mut world,
        Command::SetGoal {
            goal: GridCoord::planar(5, 1),
            grid: PlanningGrid::Truth,
        },
    );
    autopilot.engage();

    let events = apply(&mut world, Command::ClearGoal);
    let mut commands = Vec::new();
    autopilot.handle(&events, &mut commands);

    assert!(!autopilot.is_engaged());
    assert!(commands.is_empty());
}
