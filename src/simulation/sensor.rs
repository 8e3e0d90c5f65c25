//! Raycasting range sensors
//!
//! A fan of rays is cast from the vehicle centre every tick. Each ray reports
//! the nearest thing it touches: a road border or an edge of another
//! vehicle's hull.

use anyhow::{bail, Result};
use ordered_float::OrderedFloat;

use super::geometry::{edges, intersect, lerp};
use super::types::{
    Intersection, Point, Polygon, Segment, DEFAULT_RAY_COUNT, DEFAULT_RAY_LENGTH,
    DEFAULT_RAY_SPREAD,
};

/// Layout of a sensor fan
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorConfig {
    /// Number of rays (at least 1)
    pub ray_count: usize,
    /// Range of every ray
    pub ray_length: f64,
    /// Total angular width of the fan in radians
    pub ray_spread: f64,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            ray_count: DEFAULT_RAY_COUNT,
            ray_length: DEFAULT_RAY_LENGTH,
            ray_spread: DEFAULT_RAY_SPREAD,
        }
    }
}

/// The sensors mounted on one vehicle, with the rays and readings of the
/// latest update.
#[derive(Debug, Clone)]
pub struct SensorArray {
    config: SensorConfig,
    rays: Vec<Segment>,
    readings: Vec<Option<Intersection>>,
}

impl SensorArray {
    pub fn new(config: SensorConfig) -> Result<Self> {
        if config.ray_count == 0 {
            bail!("Sensor array needs at least one ray");
        }
        if !config.ray_length.is_finite() || config.ray_length <= 0.0 {
            bail!("Ray length must be positive, got {}", config.ray_length);
        }
        if !config.ray_spread.is_finite() || config.ray_spread < 0.0 {
            bail!("Ray spread must be non-negative, got {}", config.ray_spread);
        }

        Ok(Self {
            config,
            rays: Vec::with_capacity(config.ray_count),
            readings: vec![None; config.ray_count],
        })
    }

    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    /// Rays cast on the latest update (empty before the first one)
    pub fn rays(&self) -> &[Segment] {
        &self.rays
    }

    /// One reading per ray, index aligned with `rays()`
    pub fn readings(&self) -> &[Option<Intersection>] {
        &self.readings
    }

    /// Policy input: `1 - offset` for a hit (closer is stronger), 0 for none
    pub fn activations(&self) -> Vec<f64> {
        self.readings
            .iter()
            .map(|reading| reading.map_or(0.0, |hit| 1.0 - hit.offset))
            .collect()
    }

    /// Recast every ray from `origin` and replace all readings
    pub fn update(&mut self, origin: Point, heading: f64, borders: &[Segment], traffic: &[Polygon]) {
        self.cast_rays(origin, heading);
        self.readings = self
            .rays
            .iter()
            .map(|ray| nearest_hit(ray, borders, traffic))
            .collect();
    }

    fn cast_rays(&mut self, origin: Point, heading: f64) {
        let SensorConfig {
            ray_count,
            ray_length,
            ray_spread,
        } = self.config;

        self.rays.clear();
        for i in 0..ray_count {
            let t = if ray_count == 1 {
                0.5
            } else {
                i as f64 / (ray_count - 1) as f64
            };
            let angle = lerp(ray_spread / 2.0, -ray_spread / 2.0, t) + heading;
            self.rays
                .push(Segment::new(origin, origin.along_heading(angle, ray_length)));
        }
    }
}

/// The closest intersection of `ray` with any border or hull edge
fn nearest_hit(ray: &Segment, borders: &[Segment], traffic: &[Polygon]) -> Option<Intersection> {
    let border_hits = borders.iter().filter_map(|border| intersect(ray, border));
    let hull_hits = traffic
        .iter()
        .flat_map(|hull| edges(hull))
        .filter_map(|edge| intersect(ray, &edge));

    border_hits
        .chain(hull_hits)
        .min_by_key(|hit| OrderedFloat(hit.offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_ray_points_straight_ahead() {
        let mut sensors = SensorArray::new(SensorConfig {
            ray_count: 1,
            ray_length: 100.0,
            ray_spread: 1.0,
        })
        .unwrap();
        sensors.update(Point::new(0.0, 0.0), 0.0, &[], &[]);

        let ray = sensors.rays()[0];
        assert!(ray.end.x.abs() < 1e-9);
        assert!((ray.end.y + 100.0).abs() < 1e-9);
    }

    #[test]
    fn fan_spreads_from_left_to_right() {
        let mut sensors = SensorArray::new(SensorConfig::default()).unwrap();
        sensors.update(Point::new(0.0, 0.0), 0.0, &[], &[]);

        let rays = sensors.rays();
        // First ray at +spread/2 leans towards negative x, last ray towards positive x
        assert!(rays[0].end.x < 0.0);
        assert!(rays[rays.len() - 1].end.x > 0.0);
        assert!(rays[rays.len() / 2].end.x.abs() < 1e-9);
    }

    #[test]
    fn activations_invert_offsets() {
        let mut sensors = SensorArray::new(SensorConfig {
            ray_count: 1,
            ray_length: 100.0,
            ray_spread: 0.0,
        })
        .unwrap();
        let wall = Segment::new(Point::new(-10.0, -25.0), Point::new(10.0, -25.0));
        sensors.update(Point::new(0.0, 0.0), 0.0, &[wall], &[]);
        assert!((sensors.activations()[0] - 0.75).abs() < 1e-9);

        sensors.update(Point::new(0.0, 0.0), 0.0, &[], &[]);
        assert_eq!(sensors.activations(), vec![0.0]);
    }
}
