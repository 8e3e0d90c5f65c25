//! Main simulation world that ties everything together
//!
//! This is the entry point for running the road simulation
//! without any Bevy dependencies.

use anyhow::{bail, Context, Result};
use log::{debug, warn};
use ordered_float::OrderedFloat;
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use super::controls::{ControlSignals, ControlSource, InputEvent, InputQueue};
use super::policy::{Policy, ReflexPolicy};
use super::road::Road;
use super::sensor::SensorConfig;
use super::types::{
    Point, Polygon, SimId, VehicleId, CAR_WIDTH, DEFAULT_LANE_COUNT, DEFAULT_ROAD_WIDTH,
    TRAFFIC_MAX_SPEED,
};
use super::vehicle::{Vehicle, VehicleConfig};

/// Lane the controlled vehicles start in
const START_LANE: usize = 1;

/// Starting y of the controlled vehicles; traffic is placed ahead of it
const START_Y: f64 = 100.0;

/// Parameters for building a world with `SimWorld::from_scenario`
#[derive(Debug, Clone)]
pub struct ScenarioConfig {
    pub lane_count: usize,
    pub road_width: f64,
    /// Number of constant-forward traffic vehicles placed ahead
    pub traffic_count: usize,
    /// Number of policy-driven vehicles starting side by side
    pub agent_count: usize,
    /// Whether to add a keyboard-driven vehicle
    pub manual_player: bool,
    /// Seed for traffic placement; `None` uses the thread RNG
    pub seed: Option<u64>,
    pub sensors: SensorConfig,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            lane_count: DEFAULT_LANE_COUNT,
            road_width: DEFAULT_ROAD_WIDTH,
            traffic_count: 7,
            agent_count: 1,
            manual_player: false,
            seed: None,
            sensors: SensorConfig::default(),
        }
    }
}

/// The main simulation world
pub struct SimWorld {
    /// The road every vehicle drives on
    pub road: Road,

    /// All vehicles, in insertion order (the order they are updated in)
    vehicles: Vec<Vehicle>,

    /// Device events waiting for the next tick
    pub input: InputQueue,

    /// Control snapshot shared by every manually driven vehicle
    manual_signals: ControlSignals,

    /// Next ID to assign
    next_id: usize,

    /// Number of completed ticks
    ticks: u64,

    /// Optional seeded RNG for reproducible scenarios
    rng: Option<StdRng>,
}

impl SimWorld {
    fn new_internal(road: Road, rng: Option<StdRng>) -> Self {
        Self {
            road,
            vehicles: Vec::new(),
            input: InputQueue::new(),
            manual_signals: ControlSignals::default(),
            next_id: 0,
            ticks: 0,
            rng,
        }
    }

    pub fn new(road: Road) -> Self {
        Self::new_internal(road, None)
    }

    /// Create a new SimWorld with a seeded RNG for reproducible scenarios
    pub fn new_with_seed(road: Road, seed: u64) -> Self {
        Self::new_internal(road, Some(StdRng::seed_from_u64(seed)))
    }

    /// Get a random value in the given range, using seeded RNG if available
    fn random_range(&mut self, range: std::ops::Range<f64>) -> f64 {
        match &mut self.rng {
            Some(rng) => rng.random_range(range),
            None => rand::rng().random_range(range),
        }
    }

    /// Pick a random lane, using seeded RNG if available
    fn random_lane(&mut self) -> usize {
        let lanes = self.road.lane_count;
        match &mut self.rng {
            Some(rng) => rng.random_range(0..lanes),
            None => rand::rng().random_range(0..lanes),
        }
    }

    fn next_vehicle_id(&mut self) -> VehicleId {
        let id = VehicleId(SimId(self.next_id));
        self.next_id += 1;
        id
    }

    /// Add a vehicle of any kind at `position`
    pub fn spawn(
        &mut self,
        position: Point,
        config: VehicleConfig,
        source: ControlSource,
        sensors: Option<SensorConfig>,
        policy: Option<Box<dyn Policy>>,
    ) -> Result<VehicleId> {
        let id = self.next_vehicle_id();
        let vehicle = Vehicle::new(id, position, config, source, sensors, policy)
            .with_context(|| format!("Failed to create vehicle {:?}", id))?;
        self.vehicles.push(vehicle);
        Ok(id)
    }

    /// Add a traffic vehicle centred in `lane` at height `y`
    pub fn add_traffic(&mut self, lane: usize, y: f64) -> Result<VehicleId> {
        let position = Point::new(self.road.lane_center(lane), y);
        let config = VehicleConfig::default().with_max_speed(TRAFFIC_MAX_SPEED);
        let id = self.next_vehicle_id();
        let vehicle = Vehicle::traffic(id, position, config)
            .with_context(|| format!("Failed to create traffic vehicle {:?}", id))?;
        self.vehicles.push(vehicle);
        Ok(id)
    }

    /// Add a keyboard-driven vehicle with sensors
    pub fn add_manual(&mut self, lane: usize, y: f64, sensors: SensorConfig) -> Result<VehicleId> {
        let position = Point::new(self.road.lane_center(lane), y);
        self.spawn(
            position,
            VehicleConfig::default(),
            ControlSource::Manual,
            Some(sensors),
            None,
        )
    }

    /// Add a policy-driven vehicle
    pub fn add_autonomous(
        &mut self,
        lane: usize,
        y: f64,
        sensors: SensorConfig,
        policy: Box<dyn Policy>,
    ) -> Result<VehicleId> {
        let position = Point::new(self.road.lane_center(lane), y);
        self.spawn(
            position,
            VehicleConfig::default(),
            ControlSource::Autonomous,
            Some(sensors),
            Some(policy),
        )
    }

    /// Build a world from a scenario description
    pub fn from_scenario(scenario: &ScenarioConfig) -> Result<Self> {
        let road = Road::new(0.0, scenario.road_width, scenario.lane_count)?;
        if road.lane_width() <= CAR_WIDTH {
            bail!(
                "Lanes are {:.1} wide, vehicles need more than {:.1}",
                road.lane_width(),
                CAR_WIDTH
            );
        }
        let mut world = match scenario.seed {
            Some(seed) => Self::new_with_seed(road, seed),
            None => Self::new(road),
        };

        if scenario.agent_count == 0 && !scenario.manual_player {
            bail!("Scenario needs at least one agent or a manual player");
        }

        for _ in 0..scenario.agent_count {
            world.add_autonomous(
                START_LANE,
                START_Y,
                scenario.sensors,
                Box::new(ReflexPolicy::default()),
            )?;
        }
        if scenario.manual_player {
            world.add_manual(START_LANE, START_Y, scenario.sensors)?;
        }

        let mut y = START_Y;
        for _ in 0..scenario.traffic_count {
            y -= world.random_range(120.0..260.0);
            let lane = world.random_lane();
            world.add_traffic(lane, y)?;
        }

        debug!(
            "Built scenario with {} vehicles on a {}-lane road",
            world.vehicles.len(),
            world.road.lane_count
        );
        Ok(world)
    }

    /// The default scenario: one autonomous agent among seven traffic cars
    pub fn create_test_world() -> Self {
        Self::build_test_world(ScenarioConfig::default())
    }

    pub fn create_test_world_with_seed(seed: u64) -> Self {
        Self::build_test_world(ScenarioConfig {
            seed: Some(seed),
            ..ScenarioConfig::default()
        })
    }

    fn build_test_world(scenario: ScenarioConfig) -> Self {
        Self::from_scenario(&scenario).expect("default scenario parameters are valid")
    }

    /// Queue a device event for the next tick
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Main simulation tick
    ///
    /// Order: input snapshot, traffic movement, then every controlled
    /// vehicle against the traffic hulls.
    pub fn tick(&mut self) {
        if !self.input.is_empty() {
            self.manual_signals = self.input.drain_into(self.manual_signals);
            let mut any_manual = false;
            for vehicle in &mut self.vehicles {
                if vehicle.control_source() == ControlSource::Manual {
                    vehicle.set_manual_controls(self.manual_signals);
                    any_manual = true;
                }
            }
            if !any_manual {
                warn!("Input received but no manually driven vehicle exists");
            }
        }

        let borders = self.road.borders();

        for vehicle in self.vehicles.iter_mut().filter(|v| is_traffic(v)) {
            vehicle.update(borders, &[]);
        }

        let traffic_hulls: Vec<Polygon> = self
            .vehicles
            .iter()
            .filter(|v| is_traffic(v))
            .map(|v| v.polygon().clone())
            .collect();

        for vehicle in self.vehicles.iter_mut().filter(|v| !is_traffic(v)) {
            vehicle.update(borders, &traffic_hulls);
        }

        self.ticks += 1;
    }

    /// Number of completed ticks
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    pub fn traffic(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.iter().filter(|v| is_traffic(v))
    }

    /// Manually driven and autonomous vehicles
    pub fn controlled(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.iter().filter(|v| !is_traffic(v))
    }

    pub fn damaged_count(&self) -> usize {
        self.vehicles.iter().filter(|v| v.is_damaged()).count()
    }

    /// The controlled vehicle furthest up the road, intact ones first
    pub fn best_agent(&self) -> Option<&Vehicle> {
        self.controlled()
            .min_by_key(|v| (v.is_damaged(), OrderedFloat(v.position().y)))
    }

    /// Print a summary of the world state
    pub fn print_summary(&self) {
        println!("=== Road Simulation Summary ===");
        println!("Ticks: {}", self.ticks);
        println!(
            "Road: {} lanes, x = [{:.1}, {:.1}]",
            self.road.lane_count, self.road.left, self.road.right
        );
        println!(
            "Vehicles: {} controlled, {} traffic",
            self.controlled().count(),
            self.traffic().count()
        );
        println!("Damaged: {}", self.damaged_count());
        println!();

        println!("--- Controlled Vehicles ---");
        for vehicle in self.controlled() {
            let position = vehicle.position();
            let readings: Vec<String> = vehicle
                .readings()
                .iter()
                .map(|r| match r {
                    Some(hit) => format!("{:.2}", hit.offset),
                    None => "-".to_string(),
                })
                .collect();
            println!(
                "  Vehicle {:?} ({:?}): position=({:.1}, {:.1}), speed={:.2}, angle={:.3}, {}, readings=[{}]",
                vehicle.id.0 .0,
                vehicle.control_source(),
                position.x,
                position.y,
                vehicle.speed(),
                vehicle.angle(),
                if vehicle.is_damaged() { "DAMAGED" } else { "ok" },
                readings.join(", ")
            );
        }

        if let Some(best) = self.best_agent() {
            println!("--- Best Agent ---");
            println!(
                "  Vehicle {:?}: distance travelled={:.1}",
                best.id.0 .0,
                START_Y - best.position().y
            );
        }
    }

    /// Draw the stretch of road around the best agent in the terminal
    pub fn draw_map(&self) {
        const ROWS: usize = 24;
        const COLS: usize = 36;
        const ROW_HEIGHT: f64 = 25.0;

        let focus_y = self.best_agent().map_or(START_Y, |v| v.position().y);
        let top = (focus_y - ROW_HEIGHT * (ROWS as f64 * 0.75))
            .clamp(self.road.top(), self.road.bottom() - ROW_HEIGHT * ROWS as f64);
        let col_width = self.road.width / COLS as f64;

        let mut grid = vec![vec![' '; COLS + 2]; ROWS];
        let lane_lines = self.road.lane_line_xs();
        for row in grid.iter_mut() {
            for (i, x) in lane_lines.iter().enumerate() {
                let col = self.column(*x, col_width, COLS);
                row[col] = if i == 0 || i == lane_lines.len() - 1 {
                    '|'
                } else {
                    ':'
                };
            }
        }

        for vehicle in &self.vehicles {
            let position = vehicle.position();
            let row = ((position.y - top) / ROW_HEIGHT).floor();
            if row < 0.0 || row >= ROWS as f64 {
                continue;
            }
            let symbol = match (vehicle.is_damaged(), vehicle.control_source()) {
                (true, _) => 'X',
                (false, ControlSource::ConstantForward) => 'T',
                (false, ControlSource::Manual) => 'P',
                (false, ControlSource::Autonomous) => 'A',
            };
            let col = self.column(position.x, col_width, COLS);
            grid[row as usize][col] = symbol;
        }

        println!("--- Map (y {:.0} .. {:.0}) ---", top, top + ROW_HEIGHT * ROWS as f64);
        for row in grid {
            println!("  {}", row.into_iter().collect::<String>());
        }
        println!("  A=autonomous P=player T=traffic X=damaged");
    }

    fn column(&self, x: f64, col_width: f64, cols: usize) -> usize {
        let col = ((x - self.road.left) / col_width).round() + 1.0;
        col.clamp(0.0, (cols + 1) as f64) as usize
    }
}

fn is_traffic(vehicle: &Vehicle) -> bool {
    vehicle.control_source() == ControlSource::ConstantForward
}
