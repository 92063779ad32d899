#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives the gridslam simulator.
//!
//! The binary builds a world from defaults or a TOML configuration, optionally
//! loads a persisted map, executes a scripted motion sequence, plans toward a
//! goal, lets the autopilot follow the plan, and prints the resulting grids.

mod map_transfer;
mod render;

use std::{fs, path::PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use gridslam_core::{
    Command, Event, GridCoord, MapRecord, MotionCommand, PlanningGrid, Space, VisionMode,
};
use gridslam_system_autopilot::Autopilot;
use gridslam_world::{self as world, query, EngineConfig, World};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "gridslam=info";

/// Grid-world SLAM simulator.
#[derive(Debug, Parser)]
#[command(name = "gridslam", version)]
struct Cli {
    /// Simulate the volumetric house instead of the planar maze.
    #[arg(long)]
    volumetric: bool,

    /// Engine configuration file in TOML format.
    #[arg(long, value_name = "TOML")]
    config: Option<PathBuf>,

    /// Map record to load, in JSON format.
    #[arg(long, value_name = "JSON", conflicts_with = "import")]
    map: Option<PathBuf>,

    /// Map transfer string to load.
    #[arg(long, value_name = "TRANSFER")]
    import: Option<String>,

    /// Motions to execute before planning: f, b, l, r, u, d.
    #[arg(long, value_delimiter = ',', value_parser = parse_motion)]
    script: Vec<MotionCommand>,

    /// Goal cell as x,y or x,y,z.
    #[arg(long, value_parser = parse_goal)]
    goal: Option<GoalArg>,

    /// Grid the route is planned over.
    #[arg(long, value_enum, default_value_t = PlanOn::Discovered)]
    plan_on: PlanOn,

    /// Follow the plan with the autopilot.
    #[arg(long)]
    auto: bool,

    /// Range of every sensor; zero or less means unlimited.
    #[arg(long, allow_negative_numbers = true)]
    sensor_range: Option<f64>,

    /// Horizontal field of view: 360, 270, 180 or 90.
    #[arg(long)]
    vision: Option<VisionMode>,

    /// Level rendered for volumetric worlds.
    #[arg(long)]
    level: Option<u32>,

    /// Writes the final map record to this JSON file.
    #[arg(long, value_name = "JSON")]
    export: Option<PathBuf>,

    /// Prints the final map as a transfer string.
    #[arg(long)]
    transfer: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum PlanOn {
    Truth,
    Discovered,
}

impl From<PlanOn> for PlanningGrid {
    fn from(value: PlanOn) -> Self {
        match value {
            PlanOn::Truth => Self::Truth,
            PlanOn::Discovered => Self::Discovered,
        }
    }
}

/// Goal cell as typed on the command line; the level is optional.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct GoalArg {
    x: u32,
    y: u32,
    z: Option<u32>,
}

impl GoalArg {
    fn resolve(self, space: Space) -> GridCoord {
        let ground = match space {
            Space::Planar => 0,
            Space::Volumetric => 1,
        };
        GridCoord::new(self.x, self.y, self.z.unwrap_or(ground))
    }
}

fn parse_goal(value: &str) -> Result<GoalArg, String> {
    let parts = value
        .split(',')
        .map(|part| part.trim().parse::<u32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|error| format!("invalid goal '{value}': {error}"))?;
    match parts.as_slice() {
        [x, y] => Ok(GoalArg {
            x: *x,
            y: *y,
            z: None,
        }),
        [x, y, z] => Ok(GoalArg {
            x: *x,
            y: *y,
            z: Some(*z),
        }),
        _ => Err(format!("invalid goal '{value}': expected x,y or x,y,z")),
    }
}

fn parse_motion(value: &str) -> Result<MotionCommand, String> {
    match value.trim() {
        "f" => Ok(MotionCommand::MoveForward),
        "b" => Ok(MotionCommand::MoveBackward),
        "l" => Ok(MotionCommand::RotateLeft),
        "r" => Ok(MotionCommand::RotateRight),
        "u" => Ok(MotionCommand::MoveUp),
        "d" => Ok(MotionCommand::MoveDown),
        other => Err(format!("unknown motion '{other}', expected f, b, l, r, u or d")),
    }
}

/// Entry point for the gridslam command-line interface.
fn main() -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = engine_config(&cli)?;
    let mut world = World::with_config(&config).context("invalid engine configuration")?;
    println!("{}", query::welcome_banner(&world));

    if let Some(record) = map_record(&cli)? {
        load_map(&mut world, record)?;
    }
    if let Some(level) = cli.level {
        if query::dimensions(&world).space() == Space::Volumetric {
            let _ = apply(&mut world, Command::SetViewLevel { level });
        } else {
            warn!(level, "planar worlds have a single level, ignoring --level");
        }
    }

    check_script(query::dimensions(&world).space(), &cli.script)?;
    for &motion in &cli.script {
        let _ = apply(&mut world, Command::Drive { motion });
    }

    if let Some(goal) = cli.goal {
        let goal = goal.resolve(query::dimensions(&world).space());
        let _ = apply(
            &mut world,
            Command::SetGoal {
                goal,
                grid: cli.plan_on.into(),
            },
        );
    }

    if cli.auto {
        let issued = run_autopilot(&mut world);
        info!(issued, "autopilot finished");
    }

    print_report(&world);

    if let Some(path) = &cli.export {
        let json = serde_json::to_string_pretty(&query::map_record(&world))
            .context("could not serialise the map record")?;
        fs::write(path, json)
            .with_context(|| format!("could not write map record to {}", path.display()))?;
        info!(path = %path.display(), "map exported");
    }
    if cli.transfer {
        println!("{}", map_transfer::encode(&query::map_record(&world))?);
    }

    Ok(())
}

fn engine_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("could not read configuration {}", path.display()))?;
            toml::from_str::<EngineConfig>(&text)
                .with_context(|| format!("could not parse configuration {}", path.display()))?
        }
        None if cli.volumetric => EngineConfig::volumetric(),
        None => EngineConfig::planar(),
    };

    if cli.volumetric {
        config.space = Space::Volumetric;
    }
    if let Some(range) = cli.sensor_range {
        config.sensor_range = Some(range);
    }
    if let Some(mode) = cli.vision {
        config.vision_mode = mode;
    }
    Ok(config)
}

fn check_script(space: Space, script: &[MotionCommand]) -> Result<()> {
    if space == Space::Planar {
        if let Some(motion) = script.iter().find(|motion| motion.is_vertical()) {
            bail!("'{motion}' needs a volumetric world, pass --volumetric");
        }
    }
    Ok(())
}

fn map_record(cli: &Cli) -> Result<Option<MapRecord>> {
    if let Some(path) = &cli.map {
        let text = fs::read_to_string(path)
            .with_context(|| format!("could not read map {}", path.display()))?;
        let record = serde_json::from_str(&text)
            .with_context(|| format!("could not parse map {}", path.display()))?;
        return Ok(Some(record));
    }

    cli.import
        .as_deref()
        .map(map_transfer::decode)
        .transpose()
        .context("could not decode the transfer string")
}

fn load_map(world: &mut World, record: MapRecord) -> Result<()> {
    let events = apply(
        world,
        Command::LoadMap {
            record: Box::new(record),
        },
    );
    for event in events {
        match event {
            Event::MapLoadRejected { reason } => bail!("map rejected: {reason}"),
            Event::MapLoaded { name } => info!(%name, "map loaded"),
            _ => {}
        }
    }
    Ok(())
}

fn apply(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    log_events(&events);
    events
}

fn run_autopilot(world: &mut World) -> u64 {
    let mut autopilot = Autopilot::default();
    autopilot.engage();

    loop {
        let mut commands = Vec::new();
        autopilot.step(&mut commands);
        if commands.is_empty() {
            return autopilot.issued();
        }

        while !commands.is_empty() {
            let mut events = Vec::new();
            for command in commands.drain(..) {
                events.extend(apply(world, command));
            }
            autopilot.handle(&events, &mut commands);
        }
    }
}

fn log_events(events: &[Event]) {
    for event in events {
        match event {
            Event::MoveBlocked { motion, reason } => warn!(%motion, ?reason, "motion refused"),
            Event::GoalRejected { goal, reason } => warn!(%goal, ?reason, "goal refused"),
            Event::GoalSet { goal, path_len } => info!(%goal, path_len, "goal set"),
            Event::SensorRejected { sensor, reason } => {
                warn!(%sensor, ?reason, "sensor request refused");
            }
            Event::RequiresVolumetric { command } => {
                warn!(command, "command needs a volumetric world");
            }
            other => debug!(event = ?other, "world event"),
        }
    }
}

fn print_report(world: &World) {
    let pose = query::pose(world);
    let odometry = query::odometry(world);
    let info = query::map_info(world);

    println!();
    println!("truth (level {}):", query::view_level(world));
    print!("{}", render::truth(world));
    println!();
    println!("discovered:");
    print!("{}", render::discovered(world));
    println!();
    println!(
        "pose: {} facing {} deg, pitch {:.1}, roll {:.1}",
        pose.cell(),
        pose.heading().degrees(),
        pose.pitch(),
        pose.roll()
    );
    println!(
        "odometry: {} moves ({} vertical), {} rotations, {:.1} cells travelled, max altitude {}",
        odometry.move_count,
        odometry.vertical_move_count,
        odometry.rotation_count,
        odometry.distance_traveled,
        odometry.altitude_max_reached
    );
    println!(
        "map: {} empty, {} solid cells",
        info.empty_cells, info.solid_cells
    );

    let readings = query::sensor_readings(world);
    for reading in readings.iter() {
        match reading.distance {
            Some(distance) => println!("  {:<12} {distance:.1}", reading.sensor),
            None => println!("  {:<12} off", reading.sensor),
        }
    }
}
