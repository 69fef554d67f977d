//! Traffic signal heads
//!
//! Signals hold display state only. The intersection controller is the only
//! writer.

use super::types::{Direction, Lane, SignalState};

/// A signal head for one lane of one approach
#[derive(Debug, Clone, PartialEq)]
pub struct TrafficSignal {
    pub direction: Direction,
    pub lane: Lane,
    pub state: SignalState,
    /// Whole seconds left in the current phase, 0 when not counting down
    pub remaining_time: u32,
}

impl TrafficSignal {
    pub fn new(direction: Direction, lane: Lane) -> Self {
        Self {
            direction,
            lane,
            state: SignalState::Red,
            remaining_time: 0,
        }
    }

    pub fn set_state(&mut self, state: SignalState, remaining_time: u32) {
        self.state = state;
        self.remaining_time = remaining_time;
    }
}

/// The eight signal heads of the intersection, one per (direction, lane)
#[derive(Debug, Clone)]
pub struct SignalBank {
    signals: Vec<TrafficSignal>,
}

impl Default for SignalBank {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalBank {
    /// Create all eight signals, initially red
    pub fn new() -> Self {
        let signals = Direction::ALL
            .into_iter()
            .flat_map(|direction| {
                Lane::ALL
                    .into_iter()
                    .map(move |lane| TrafficSignal::new(direction, lane))
            })
            .collect();
        Self { signals }
    }

    fn slot(direction: Direction, lane: Lane) -> usize {
        direction.index() * Lane::ALL.len() + lane.index()
    }

    pub fn get(&self, direction: Direction, lane: Lane) -> Option<&TrafficSignal> {
        self.signals.get(Self::slot(direction, lane))
    }

    pub fn get_mut(&mut self, direction: Direction, lane: Lane) -> Option<&mut TrafficSignal> {
        self.signals.get_mut(Self::slot(direction, lane))
    }

    /// The lane-1 signal of an approach
    pub fn primary(&self, direction: Direction) -> Option<&TrafficSignal> {
        self.get(direction, Lane::One)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrafficSignal> {
        self.signals.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut TrafficSignal> {
        self.signals.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }
}
