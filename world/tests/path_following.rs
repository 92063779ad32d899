use gridslam_core::{Command, Event, GridCoord, MotionCommand, PlanningGrid};
use gridslam_world::{self as world, query, World};

const STEP_LIMIT: usize = 500;

fn apply(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}

/// Requests and executes planned motions until the plan is exhausted or a
/// motion is refused. Returns the executed motions.
fn follow_plan(world: &mut World) -> Vec<MotionCommand> {
    let mut executed = Vec::new();
    for _ in 0..STEP_LIMIT {
        let derived = apply(world, Command::RequestNextMove);
        let Some(Event::NextMoveDerived {
            motion: Some(motion),
        }) = derived.first().cloned()
        else {
            return executed;
        };

        let outcome = apply(world, Command::Drive { motion });
        if matches!(outcome.first(), Some(Event::MoveBlocked { .. })) {
            return executed;
        }
        executed.push(motion);
    }
    panic!("plan did not terminate within {STEP_LIMIT} steps");
}

#[test]
fn planar_route_around_walls_reaches_the_goal() {
    let mut world = World::planar();
    let goal = GridCoord::planar(12, 12);

    let events = apply(
        &mut world,
        Command::SetGoal {
            goal,
            grid: PlanningGrid::Truth,
        },
    );
    let Some(Event::GoalSet { path_len, .. }) = events.first().cloned() else {
        panic!("goal rejected: {events:?}");
    };

    let executed = follow_plan(&mut world);

    assert_eq!(query::pose(&world).cell(), goal);
    let forwards = executed
        .iter()
        .filter(|motion| **motion == MotionCommand::MoveForward)
        .count();
    assert_eq!(forwards, path_len);
    assert_eq!(query::odometry(&world).move_count, path_len as u64);
    assert_eq!(
        query::plan_view(&world).remaining(),
        &[] as &[GridCoord]
    );
}

#[test]
fn volumetric_route_stays_on_the_ground_floor() {
    let mut world = World::volumetric();
    let goal = GridCoord::new(12, 12, 1);

    let events = apply(
        &mut world,
        Command::SetGoal {
            goal,
            grid: PlanningGrid::Truth,
        },
    );
    assert_eq!(events, vec![Event::GoalSet { goal, path_len: 20 }]);
    assert!(query::plan_view(&world)
        .path()
        .iter()
        .all(|cell| cell.z() == 1));

    let executed = follow_plan(&mut world);

    assert_eq!(query::pose(&world).cell(), goal);
    assert!(executed.iter().all(|motion| !motion.is_vertical()));
}

#[test]
fn discovered_route_follows_explored_cells() {
    let mut world = World::volumetric();
    let goal = GridCoord::new(8, 2, 1);

    let events = apply(
        &mut world,
        Command::SetGoal {
            goal,
            grid: PlanningGrid::Discovered,
        },
    );
    assert_eq!(events, vec![Event::GoalSet { goal, path_len: 6 }]);

    let _ = follow_plan(&mut world);

    assert_eq!(query::pose(&world).cell(), goal);
    assert_eq!(
        apply(&mut world, Command::RequestNextMove),
        vec![Event::NextMoveDerived { motion: None }]
    );
}

#[test]
fn blocked_plan_stops_following() {
    let mut world = World::planar();
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

    let executed = follow_plan(&mut world);

    assert_eq!(executed, vec![MotionCommand::MoveForward]);
    assert_eq!(query::pose(&world).cell(), GridCoord::planar(2, 1));
}
