//! Control sources and the input event queue
//!
//! The simulation only ever reads a `ControlSignals` snapshot. Device events
//! are buffered in an `InputQueue` and applied at the start of a tick.

use std::collections::VecDeque;

use super::types::POLICY_ACTIVATION_THRESHOLD;

/// One of the four logical driving directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Left,
    Right,
    Reverse,
}

/// The four control signals read by the kinematics step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlSignals {
    pub forward: bool,
    pub left: bool,
    pub right: bool,
    pub reverse: bool,
}

impl ControlSignals {
    /// Forward only, everything else released
    pub fn forward_only() -> Self {
        Self {
            forward: true,
            ..Self::default()
        }
    }

    /// Map policy outputs `[forward, left, right, reverse]` onto switches
    pub fn from_policy_output(output: [f64; 4]) -> Self {
        let active = |value: f64| value > POLICY_ACTIVATION_THRESHOLD;
        Self {
            forward: active(output[0]),
            left: active(output[1]),
            right: active(output[2]),
            reverse: active(output[3]),
        }
    }

    /// Pressing an already-held direction changes nothing
    pub fn press(&mut self, direction: Direction) {
        self.set(direction, true);
    }

    pub fn release(&mut self, direction: Direction) {
        self.set(direction, false);
    }

    fn set(&mut self, direction: Direction, value: bool) {
        match direction {
            Direction::Forward => self.forward = value,
            Direction::Left => self.left = value,
            Direction::Right => self.right = value,
            Direction::Reverse => self.reverse = value,
        }
    }
}

/// Where a vehicle's control signals come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSource {
    /// Driven by press/release events from an input device
    Manual,
    /// Always accelerating, never steering (traffic)
    ConstantForward,
    /// Signals overwritten every tick by the attached policy
    Autonomous,
}

impl ControlSource {
    /// Signals a fresh vehicle starts with
    pub fn initial_signals(self) -> ControlSignals {
        match self {
            ControlSource::ConstantForward => ControlSignals::forward_only(),
            ControlSource::Manual | ControlSource::Autonomous => ControlSignals::default(),
        }
    }
}

/// A press or release of one direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Pressed(Direction),
    Released(Direction),
}

/// Buffer of device events waiting for the next tick
#[derive(Debug, Default)]
pub struct InputQueue {
    events: VecDeque<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Apply every pending event, in arrival order, on top of `current`
    /// and return the resulting snapshot.
    pub fn drain_into(&mut self, current: ControlSignals) -> ControlSignals {
        self.events
            .drain(..)
            .fold(current, |mut signals, event| {
                match event {
                    InputEvent::Pressed(direction) => signals.press(direction),
                    InputEvent::Released(direction) => signals.release(direction),
                }
                signals
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_presses_are_idempotent() {
        let mut signals = ControlSignals::default();
        signals.press(Direction::Left);
        signals.press(Direction::Left);
        assert!(signals.left);
        signals.release(Direction::Left);
        assert!(!signals.left);
    }

    #[test]
    fn queue_applies_events_in_order() {
        let mut queue = InputQueue::new();
        queue.push(InputEvent::Pressed(Direction::Forward));
        queue.push(InputEvent::Pressed(Direction::Right));
        queue.push(InputEvent::Released(Direction::Forward));

        let signals = queue.drain_into(ControlSignals::default());
        assert!(queue.is_empty());
        assert_eq!(
            signals,
            ControlSignals {
                right: true,
                ..ControlSignals::default()
            }
        );
    }

    #[test]
    fn policy_output_uses_threshold() {
        let signals = ControlSignals::from_policy_output([1.0, 0.2, 0.51, 0.5]);
        assert!(signals.forward);
        assert!(!signals.left);
        assert!(signals.right);
        assert!(!signals.reverse);
    }
}
