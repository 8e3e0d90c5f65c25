//! Road layout: lanes and the two static border segments
//!
//! Standalone implementation that doesn't depend on Bevy.

use anyhow::{bail, Result};

use super::geometry::lerp;
use super::types::{Point, Segment, ROAD_EXTENT};

/// A straight, effectively infinite multi-lane road running along the y axis
#[derive(Debug, Clone)]
pub struct Road {
    pub x: f64,
    pub width: f64,
    pub lane_count: usize,
    pub left: f64,
    pub right: f64,
    top: f64,
    bottom: f64,
    borders: [Segment; 2],
}

impl Road {
    /// Create a road centred on `x`.
    /// Fails on a non-positive width or a zero lane count.
    pub fn new(x: f64, width: f64, lane_count: usize) -> Result<Self> {
        if !x.is_finite() {
            bail!("Road centre must be finite, got {}", x);
        }
        if !width.is_finite() || width <= 0.0 {
            bail!("Road width must be positive, got {}", width);
        }
        if lane_count == 0 {
            bail!("Road needs at least one lane");
        }

        let left = x - width / 2.0;
        let right = x + width / 2.0;
        let top = -ROAD_EXTENT;
        let bottom = ROAD_EXTENT;

        let borders = [
            Segment::new(Point::new(left, top), Point::new(left, bottom)),
            Segment::new(Point::new(right, top), Point::new(right, bottom)),
        ];

        Ok(Self {
            x,
            width,
            lane_count,
            left,
            right,
            top,
            bottom,
            borders,
        })
    }

    pub fn lane_width(&self) -> f64 {
        self.width / self.lane_count as f64
    }

    /// X coordinate of the centre of a lane; indices past the last lane
    /// are clamped to it.
    pub fn lane_center(&self, lane_index: usize) -> f64 {
        let lane_width = self.lane_width();
        let lane = lane_index.min(self.lane_count - 1);
        self.left + lane_width / 2.0 + lane_width * lane as f64
    }

    /// X positions of every lane line, edges included (`lane_count + 1` values)
    pub fn lane_line_xs(&self) -> Vec<f64> {
        (0..=self.lane_count)
            .map(|i| lerp(self.left, self.right, i as f64 / self.lane_count as f64))
            .collect()
    }

    /// The static obstacles delimiting the drivable surface
    pub fn borders(&self) -> &[Segment] {
        &self.borders
    }

    /// Smallest y reached by the borders
    pub fn top(&self) -> f64 {
        self.top
    }

    pub fn bottom(&self) -> f64 {
        self.bottom
    }
}
