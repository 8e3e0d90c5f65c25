//! Core types for the road simulation
//!
//! These are standalone types that don't depend on Bevy.

/// A unique identifier for simulation entities
/// This is a simple wrapper around a usize for type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SimId(pub usize);

/// A wrapper type for vehicle IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VehicleId(pub SimId);

/// A 2D point in screen-style coordinates (y grows "backwards" along the road)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Offset this point by `length` along a heading, using the shared
    /// heading convention (angle 0 points towards negative y).
    pub fn along_heading(&self, angle: f64, length: f64) -> Point {
        Point {
            x: self.x - angle.sin() * length,
            y: self.y - angle.cos() * length,
        }
    }
}

/// A directed segment from `start` to `end`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance(&self.end)
    }

    /// The segment as a two-point polygon, for polygon-vs-segment tests
    pub fn points(&self) -> [Point; 2] {
        [self.start, self.end]
    }
}

/// Where two segments cross
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    pub point: Point,
    /// Parametric position along the first segment, always within `[0, 1]`
    pub offset: f64,
}

/// A closed polygon: consecutive points plus the edge from last back to first
pub type Polygon = Vec<Point>;

/// Determinants smaller than this are treated as parallel lines
pub const PARALLEL_EPSILON: f64 = 1e-10;

/// Half-length of the road borders; stands in for an unbounded track
pub const ROAD_EXTENT: f64 = 1_000_000.0;

/// Default lane count of a road
pub const DEFAULT_LANE_COUNT: usize = 3;

/// Default width of a road in world units
pub const DEFAULT_ROAD_WIDTH: f64 = 180.0;

/// Default vehicle footprint
pub const CAR_WIDTH: f64 = 30.0;
pub const CAR_HEIGHT: f64 = 50.0;

/// Speed added per tick while accelerating
pub const DEFAULT_ACCELERATION: f64 = 0.2;

/// Speed removed per tick by rolling friction
pub const DEFAULT_FRICTION: f64 = 0.05;

/// Heading change per tick while steering (radians)
pub const DEFAULT_TURN_RATE: f64 = 0.03;

/// Top forward speed of a controlled vehicle
pub const DEFAULT_MAX_SPEED: f64 = 3.0;

/// Top forward speed of traffic vehicles
pub const TRAFFIC_MAX_SPEED: f64 = 2.0;

/// Default sensor layout
pub const DEFAULT_RAY_COUNT: usize = 5;
pub const DEFAULT_RAY_LENGTH: f64 = 150.0;
pub const DEFAULT_RAY_SPREAD: f64 = std::f64::consts::FRAC_PI_2;

/// Policy outputs above this value switch the matching control on
pub const POLICY_ACTIVATION_THRESHOLD: f64 = 0.5;
