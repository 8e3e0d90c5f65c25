use anyhow::Result;
use clap::Parser;
use log::info;

use road_sensor_sim::simulation::{ScenarioConfig, SensorConfig, SimWorld};

#[derive(Parser)]
#[command(name = "road_sensor_sim")]
#[command(about = "Sensor-driven vehicles on an infinite road, with optional UI")]
struct Cli {
    /// Run with the Bevy game engine UI
    #[arg(long)]
    ui: bool,

    /// Number of simulation ticks to run in headless mode
    #[arg(long, default_value = "1000")]
    ticks: u64,

    /// Print a summary every this many ticks in headless mode
    #[arg(long, default_value = "250")]
    summary_every: u64,

    /// Seed for traffic placement (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of lanes on the road
    #[arg(long, default_value = "3")]
    lanes: usize,

    /// Width of each lane; the road is `lanes * lane_width` wide
    #[arg(long, default_value = "60")]
    lane_width: f64,

    /// Number of traffic vehicles placed ahead of the agents
    #[arg(long, default_value = "7")]
    traffic: usize,

    /// Number of policy-driven vehicles
    #[arg(long, default_value = "1")]
    agents: usize,

    /// Add a keyboard-driven vehicle (arrow keys in UI mode)
    #[arg(long)]
    manual: bool,

    /// Number of sensor rays per vehicle
    #[arg(long, default_value = "5")]
    rays: usize,
}

impl Cli {
    fn scenario(&self) -> ScenarioConfig {
        ScenarioConfig {
            lane_count: self.lanes,
            road_width: self.lanes as f64 * self.lane_width,
            traffic_count: self.traffic,
            agent_count: self.agents,
            manual_player: self.manual,
            seed: self.seed,
            sensors: SensorConfig {
                ray_count: self.rays,
                ..SensorConfig::default()
            },
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let result = if cli.ui {
        #[cfg(feature = "ui")]
        {
            run_with_ui(&cli)
        }
        #[cfg(not(feature = "ui"))]
        {
            eprintln!("Error: UI feature is not enabled. Rebuild with --features ui");
            std::process::exit(1);
        }
    } else {
        run_headless(&cli)
    };

    if let Err(err) = result {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

/// Run the simulation in headless mode (no graphics)
fn run_headless(cli: &Cli) -> Result<()> {
    env_logger::init();

    println!("Running road simulation in headless mode...");
    println!("Ticks: {}", cli.ticks);
    println!();

    let mut world = SimWorld::from_scenario(&cli.scenario())?;

    println!("Initial state:");
    world.print_summary();
    world.draw_map();
    println!();

    let summary_every = cli.summary_every.max(1);
    for tick in 1..=cli.ticks {
        world.tick();

        if tick % summary_every == 0 && tick < cli.ticks {
            println!("--- After tick {} ---", tick);
            world.print_summary();
            println!();
        }
    }

    info!(
        "Finished {} ticks with {} damaged vehicles",
        world.tick_count(),
        world.damaged_count()
    );

    println!("=== Final State ===");
    world.print_summary();
    world.draw_map();
    println!("SIMULATION COMPLETE");
    Ok(())
}

#[cfg(feature = "ui")]
fn run_with_ui(cli: &Cli) -> Result<()> {
    use bevy::log::LogPlugin;
    use bevy::prelude::*;
    use road_sensor_sim::ui::{RoadSimUIPlugin, SimWorldResource};

    let world = SimWorld::from_scenario(&cli.scenario())?;

    println!("Starting Road Sim UI...");
    println!();
    println!("Controls:");
    println!("  Arrow keys  - Drive the manual vehicle (with --manual)");
    println!("  S           - Toggle sensor rays");
    println!("  ESC         - Exit");
    println!();

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(LogPlugin {
                    filter: "warn,road_sensor_sim=debug".to_string(),
                    level: bevy::log::Level::DEBUG,
                    ..default()
                })
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Road Sensor Sim".into(),
                        resolution: (1280, 720).into(),
                        ..default()
                    }),
                    ..default()
                }),
        )
        .insert_resource(SimWorldResource(world))
        .add_plugins(RoadSimUIPlugin)
        .run();
    Ok(())
}
