//! Driving policies: sensor activations in, control outputs out
//!
//! A policy sees one activation per ray (`0` = nothing in range, close to
//! `1` = obstacle right at the vehicle) and answers with four values mapped
//! positionally to `[forward, left, right, reverse]`.

use std::fmt;

/// A swappable decision function driving an autonomous vehicle.
///
/// Implementations must be pure: the same activations always produce the
/// same outputs and evaluating the policy has no side effects.
pub trait Policy: Send + Sync {
    /// Static identifier of the policy implementation.
    fn kind(&self) -> &'static str;

    /// Map ray activations to `[forward, left, right, reverse]`.
    fn decide(&self, activations: &[f64]) -> [f64; 4];
}

impl fmt::Debug for dyn Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Policy").field("kind", &self.kind()).finish()
    }
}

/// Adapts a plain closure into a policy
pub struct FnPolicy<F> {
    decide: F,
}

impl<F> FnPolicy<F>
where
    F: Fn(&[f64]) -> [f64; 4] + Send + Sync,
{
    pub fn new(decide: F) -> Self {
        Self { decide }
    }
}

impl<F> Policy for FnPolicy<F>
where
    F: Fn(&[f64]) -> [f64; 4] + Send + Sync,
{
    fn kind(&self) -> &'static str {
        "closure"
    }

    fn decide(&self, activations: &[f64]) -> [f64; 4] {
        (self.decide)(activations)
    }
}

/// Hand-written rules: keep accelerating, steer away from the side that
/// sees more, brake and back off when something is dead ahead.
#[derive(Debug, Clone, Copy)]
pub struct ReflexPolicy {
    /// Centre activation above which the vehicle stops accelerating
    pub brake_at: f64,
    /// Centre activation above which the vehicle reverses
    pub reverse_at: f64,
    /// How much one side must outweigh the other before steering
    pub steer_margin: f64,
}

impl Default for ReflexPolicy {
    fn default() -> Self {
        Self {
            brake_at: 0.6,
            reverse_at: 0.8,
            steer_margin: 0.05,
        }
    }
}

impl Policy for ReflexPolicy {
    fn kind(&self) -> &'static str {
        "reflex"
    }

    fn decide(&self, activations: &[f64]) -> [f64; 4] {
        if activations.is_empty() {
            return [1.0, 0.0, 0.0, 0.0];
        }

        // Ray 0 leans left, the last ray leans right
        let half = activations.len() / 2;
        let left_side = mean(&activations[..half]);
        let right_side = mean(&activations[activations.len() - half..]);
        let ahead = if activations.len() % 2 == 1 {
            activations[half]
        } else {
            activations[half - 1].max(activations[half])
        };

        let forward = ahead < self.brake_at;
        let reverse = ahead > self.reverse_at;
        let left = right_side > left_side + self.steer_margin;
        let right = left_side > right_side + self.steer_margin;

        [switch(forward), switch(left), switch(right), switch(reverse)]
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn switch(on: bool) -> f64 {
    if on {
        1.0
    } else {
        0.0
    }
}
