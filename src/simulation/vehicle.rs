//! Vehicle movement and damage logic for the road simulation
//!
//! Standalone implementation that doesn't depend on Bevy.

use anyhow::{bail, Result};
use log::{debug, info};
use std::f64::consts::PI;

use super::controls::{ControlSignals, ControlSource, Direction};
use super::geometry::polygons_intersect;
use super::policy::Policy;
use super::sensor::{SensorArray, SensorConfig};
use super::types::{
    Intersection, Point, Polygon, Segment, VehicleId, CAR_HEIGHT, CAR_WIDTH,
    DEFAULT_ACCELERATION, DEFAULT_FRICTION, DEFAULT_MAX_SPEED, DEFAULT_TURN_RATE,
};

/// Physical parameters of a vehicle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleConfig {
    pub width: f64,
    pub height: f64,
    /// Speed added (or removed) per tick while a pedal is held
    pub acceleration: f64,
    /// Speed lost per tick when rolling
    pub friction: f64,
    /// Top forward speed; reverse is capped at half of it
    pub max_speed: f64,
    /// Heading change per tick while steering
    pub turn_rate: f64,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            width: CAR_WIDTH,
            height: CAR_HEIGHT,
            acceleration: DEFAULT_ACCELERATION,
            friction: DEFAULT_FRICTION,
            max_speed: DEFAULT_MAX_SPEED,
            turn_rate: DEFAULT_TURN_RATE,
        }
    }
}

impl VehicleConfig {
    pub fn with_max_speed(self, max_speed: f64) -> Self {
        Self { max_speed, ..self }
    }

    pub fn max_reverse_speed(&self) -> f64 {
        self.max_speed / 2.0
    }

    fn validate(&self) -> Result<()> {
        if !self.width.is_finite() || self.width <= 0.0 {
            bail!("Vehicle width must be positive, got {}", self.width);
        }
        if !self.height.is_finite() || self.height <= 0.0 {
            bail!("Vehicle height must be positive, got {}", self.height);
        }
        if !self.max_speed.is_finite() || self.max_speed <= 0.0 {
            bail!("Max speed must be positive, got {}", self.max_speed);
        }
        for (name, value) in [
            ("Acceleration", self.acceleration),
            ("Friction", self.friction),
            ("Turn rate", self.turn_rate),
        ] {
            if !value.is_finite() || value < 0.0 {
                bail!("{} must be finite and not negative, got {}", name, value);
            }
        }
        Ok(())
    }
}

/// A vehicle on the road
#[derive(Debug)]
pub struct Vehicle {
    pub id: VehicleId,
    position: Point,
    angle: f64,
    speed: f64,
    config: VehicleConfig,
    polygon: Polygon,
    damaged: bool,
    source: ControlSource,
    controls: ControlSignals,
    sensors: Option<SensorArray>,
    policy: Option<Box<dyn Policy>>,
}

impl Vehicle {
    /// Create a vehicle at `position` heading "up" the road.
    ///
    /// Fails on invalid dimensions, or when an autonomous vehicle has no
    /// sensors or no policy to drive it.
    pub fn new(
        id: VehicleId,
        position: Point,
        config: VehicleConfig,
        source: ControlSource,
        sensors: Option<SensorConfig>,
        policy: Option<Box<dyn Policy>>,
    ) -> Result<Self> {
        config.validate()?;
        if source == ControlSource::Autonomous {
            if policy.is_none() {
                bail!("Autonomous vehicle {:?} needs a policy", id);
            }
            if sensors.is_none() {
                bail!("Autonomous vehicle {:?} needs sensors to feed its policy", id);
            }
        }
        let sensors = sensors.map(SensorArray::new).transpose()?;

        let mut vehicle = Self {
            id,
            position,
            angle: 0.0,
            speed: 0.0,
            config,
            polygon: Vec::new(),
            damaged: false,
            source,
            controls: source.initial_signals(),
            sensors,
            policy,
        };
        vehicle.polygon = vehicle.create_polygon();

        debug!(
            "Created vehicle {:?} ({:?}) at ({:.1}, {:.1})",
            id, source, position.x, position.y
        );
        Ok(vehicle)
    }

    /// A traffic vehicle: constant forward control, no sensors
    pub fn traffic(id: VehicleId, position: Point, config: VehicleConfig) -> Result<Self> {
        Self::new(id, position, config, ControlSource::ConstantForward, None, None)
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn config(&self) -> &VehicleConfig {
        &self.config
    }

    /// Current hull, corners ordered front-right, front-left, rear-left, rear-right
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    pub fn is_damaged(&self) -> bool {
        self.damaged
    }

    pub fn control_source(&self) -> ControlSource {
        self.source
    }

    /// Control signals that the next kinematics step will read
    pub fn controls(&self) -> ControlSignals {
        self.controls
    }

    pub fn rays(&self) -> &[Segment] {
        self.sensors.as_ref().map(|s| s.rays()).unwrap_or(&[])
    }

    pub fn readings(&self) -> &[Option<Intersection>] {
        self.sensors.as_ref().map(|s| s.readings()).unwrap_or(&[])
    }

    pub fn policy_kind(&self) -> Option<&'static str> {
        self.policy.as_ref().map(|p| p.kind())
    }

    /// Replace the control snapshot of a manually driven vehicle.
    /// Other control sources ignore device input.
    pub fn set_manual_controls(&mut self, signals: ControlSignals) {
        if self.source == ControlSource::Manual {
            self.controls = signals;
        }
    }

    pub fn press(&mut self, direction: Direction) {
        if self.source == ControlSource::Manual {
            self.controls.press(direction);
        }
    }

    pub fn release(&mut self, direction: Direction) {
        if self.source == ControlSource::Manual {
            self.controls.release(direction);
        }
    }

    /// Advance one tick.
    ///
    /// Moves the vehicle and tests for damage while it is intact, then
    /// refreshes the sensors (even when damaged) and lets the policy pick
    /// the controls for the next tick.
    pub fn update(&mut self, borders: &[Segment], traffic: &[Polygon]) {
        if !self.damaged {
            self.move_step();
            self.polygon = self.create_polygon();
            self.damaged = self.assess_damage(borders, traffic);
            if self.damaged {
                info!(
                    "Vehicle {:?} damaged at ({:.1}, {:.1})",
                    self.id, self.position.x, self.position.y
                );
            }
        }

        if let Some(sensors) = &mut self.sensors {
            sensors.update(self.position, self.angle, borders, traffic);

            if self.source == ControlSource::Autonomous {
                if let Some(policy) = &self.policy {
                    let output = policy.decide(&sensors.activations());
                    self.controls = ControlSignals::from_policy_output(output);
                }
            }
        }
    }

    fn move_step(&mut self) {
        let VehicleConfig {
            acceleration,
            friction,
            max_speed,
            turn_rate,
            ..
        } = self.config;

        if self.controls.forward {
            self.speed += acceleration;
        }
        if self.controls.reverse {
            self.speed -= acceleration;
        }
        self.speed = self.speed.min(max_speed).max(-max_speed / 2.0);

        if self.speed > 0.0 {
            self.speed = (self.speed - friction).max(0.0);
        } else if self.speed < 0.0 {
            self.speed = (self.speed + friction).min(0.0);
        }
        if self.speed.abs() < friction {
            self.speed = 0.0;
        }

        if self.speed != 0.0 {
            // Steering is mirrored while reversing
            let flip = self.speed.signum();
            if self.controls.left {
                self.angle += turn_rate * flip;
            }
            if self.controls.right {
                self.angle -= turn_rate * flip;
            }
        }

        self.position = self.position.along_heading(self.angle, self.speed);
    }

    fn create_polygon(&self) -> Polygon {
        let rad = self.config.width.hypot(self.config.height) / 2.0;
        let alpha = self.config.width.atan2(self.config.height);

        [
            self.angle - alpha,
            self.angle + alpha,
            PI + self.angle - alpha,
            PI + self.angle + alpha,
        ]
        .iter()
        .map(|&theta| self.position.along_heading(theta, rad))
        .collect()
    }

    fn assess_damage(&self, borders: &[Segment], traffic: &[Polygon]) -> bool {
        borders
            .iter()
            .any(|border| polygons_intersect(&self.polygon, &border.points()))
            || traffic
                .iter()
                .any(|hull| polygons_intersect(&self.polygon, hull))
    }
}
