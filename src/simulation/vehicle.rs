//! Vehicle kinematics for the intersection simulation
//!
//! Each vehicle drives straight along its approach axis. Per tick it decides
//! whether it must stop (signal, vehicle ahead, occupied junction), adjusts
//! its speed and advances. All decisions read a snapshot of the vehicle set
//! taken at the start of the tick.

use ordered_float::OrderedFloat;
use rand::seq::IndexedRandom;
use rand::Rng;

use super::config::SimConfig;
use super::signal::SignalBank;
use super::types::{Axis, Direction, Lane, Position, Rect, SignalState, VehicleId};

/// Multiple of the vehicle height kept as a gap to the vehicle ahead
pub const SAFE_FOLLOWING_MULTIPLIER: f32 = 1.5;

/// Why a vehicle has to stop this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StopConditions {
    /// Red light, or yellow while still outside the dilemma zone
    pub signal: bool,
    /// Same-lane vehicle ahead is too close
    pub following: bool,
    /// Perpendicular traffic occupies the conflict box
    pub cross_traffic: bool,
}

impl StopConditions {
    pub fn must_stop(&self) -> bool {
        self.signal || self.following || self.cross_traffic
    }
}

/// A vehicle approaching or leaving the intersection
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub id: VehicleId,
    pub direction: Direction,
    pub lane: Lane,
    /// Top-left corner in screen space
    pub position: Position,
    pub speed: f32,
    pub width: f32,
    pub height: f32,
    pub is_emergency: bool,
    has_crossed: bool,
}

impl Vehicle {
    /// Create a vehicle at the spawn edge of `direction` in the given lane
    pub fn new(
        id: VehicleId,
        direction: Direction,
        lane: Lane,
        is_emergency: bool,
        config: &SimConfig,
    ) -> Self {
        let (width, height) = match direction.axis() {
            Axis::Y => (config.vehicle_width, config.vehicle_height),
            Axis::X => (config.vehicle_height, config.vehicle_width),
        };

        let center = config.center();
        let offset = config.lane_width * lane.offset_factor();
        let position = match direction {
            Direction::North => Position::new(center.x + offset, -height),
            Direction::South => Position::new(center.x - offset, config.height),
            Direction::East => Position::new(config.width, center.y - offset),
            Direction::West => Position::new(-width, center.y + offset),
        };

        Self {
            id,
            direction,
            lane,
            position,
            speed: config.base_speed,
            width,
            height,
            is_emergency,
            has_crossed: false,
        }
    }

    /// Create a vehicle at the spawn edge of `direction` in a random lane
    pub fn spawn<R: Rng + ?Sized>(
        id: VehicleId,
        direction: Direction,
        is_emergency: bool,
        config: &SimConfig,
        rng: &mut R,
    ) -> Self {
        let lane = *Lane::ALL.choose(rng).unwrap_or(&Lane::One);
        Self::new(id, direction, lane, is_emergency, config)
    }

    /// Whether the vehicle has cleared the junction. Never reverts.
    pub fn has_crossed(&self) -> bool {
        self.has_crossed
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.width, self.height)
    }

    /// Length of the vehicle along its axis of travel
    fn extent(&self) -> f32 {
        match self.direction.axis() {
            Axis::X => self.width,
            Axis::Y => self.height,
        }
    }

    /// Coordinate of the leading edge along the axis of travel
    fn front(&self) -> f32 {
        let axis = self.direction.axis();
        if self.direction.sign() > 0.0 {
            self.position.along(axis) + self.extent()
        } else {
            self.position.along(axis)
        }
    }

    /// Signed distance from the leading edge to the stop line, negative once past it
    pub fn distance_to_stop_line(&self, config: &SimConfig) -> f32 {
        self.direction.sign() * (config.stop_line(self.direction) - self.front())
    }

    pub fn is_before_stop_line(&self, config: &SimConfig) -> bool {
        self.distance_to_stop_line(config) > 0.0
    }

    /// Within two ticks of cruising travel of the stop line, on either side
    pub fn is_at_stop_line(&self, config: &SimConfig) -> bool {
        self.distance_to_stop_line(config).abs() < config.base_speed * 2.0
    }

    pub fn has_passed_intersection(&self, config: &SimConfig) -> bool {
        let axis = self.direction.axis();
        let past_center =
            self.direction.sign() * (self.position.along(axis) - config.center().along(axis));
        past_center > config.center_buffer
    }

    /// Stopped in front of the stop line
    pub fn is_queued(&self, config: &SimConfig) -> bool {
        self.speed == 0.0 && self.is_before_stop_line(config)
    }

    /// Whether the signal for this lane requires a stop
    pub fn signal_stop(&self, config: &SimConfig, signals: &SignalBank) -> bool {
        let Some(signal) = signals.get(self.direction, self.lane) else {
            return false;
        };

        match signal.state {
            SignalState::Red => self.is_before_stop_line(config),
            SignalState::Yellow => {
                self.distance_to_stop_line(config) > config.dilemma_zone_distance
                    && self.is_before_stop_line(config)
            }
            SignalState::Green => false,
        }
    }

    /// Gap to the closest same-lane vehicle ahead, if any
    pub fn gap_to_leader(&self, peers: &[Vehicle]) -> Option<f32> {
        let axis = self.direction.axis();
        let sign = self.direction.sign();
        let own = self.position.along(axis);

        peers
            .iter()
            .filter(|other| {
                other.id != self.id && other.direction == self.direction && other.lane == self.lane
            })
            .map(|other| sign * (other.position.along(axis) - own))
            .filter(|gap| *gap > 0.0)
            .min_by_key(|gap| OrderedFloat(*gap))
    }

    /// Whether the vehicle ahead is within the safe following distance
    pub fn following_stop(&self, peers: &[Vehicle]) -> bool {
        let safe_distance = self.height * SAFE_FOLLOWING_MULTIPLIER;
        self.gap_to_leader(peers)
            .is_some_and(|gap| gap < safe_distance + self.height)
    }

    /// Whether perpendicular traffic currently occupies the conflict box
    pub fn cross_traffic_stop(&self, config: &SimConfig, peers: &[Vehicle]) -> bool {
        let conflict_box = config.conflict_box();
        peers.iter().any(|other| {
            other.id != self.id
                && other.direction.is_perpendicular_to(self.direction)
                && conflict_box.intersects(&other.rect())
        })
    }

    /// Evaluate the three stop conditions against tick-start state
    pub fn stop_conditions(
        &self,
        config: &SimConfig,
        signals: &SignalBank,
        peers: &[Vehicle],
    ) -> StopConditions {
        let signal = self.signal_stop(config, signals);
        let following = self.following_stop(peers);
        let cross_traffic = !signal
            && !following
            && self.is_at_stop_line(config)
            && self.cross_traffic_stop(config, peers);

        StopConditions {
            signal,
            following,
            cross_traffic,
        }
    }

    /// Speed for this tick given the stop conditions
    fn next_speed(&self, config: &SimConfig, stops: &StopConditions) -> f32 {
        if !stops.must_stop() {
            return (self.speed + config.speed_step).min(config.base_speed);
        }

        let distance = self.distance_to_stop_line(config);
        if distance >= 0.0 && distance < self.speed {
            // Land exactly on the line
            distance
        } else if stops.following || distance <= config.braking_distance {
            (self.speed - config.speed_step).max(0.0)
        } else if !self.is_before_stop_line(config) {
            0.0
        } else {
            config.base_speed
        }
    }

    fn advance(&mut self) {
        let distance = self.direction.sign() * self.speed;
        self.position.translate(self.direction.axis(), distance);
    }

    /// Run one tick: update the crossed flag, pick a speed and move.
    ///
    /// `peers` is the vehicle set as it was at the start of the tick and may
    /// contain this vehicle.
    pub fn step(&mut self, config: &SimConfig, signals: &SignalBank, peers: &[Vehicle]) {
        if !self.has_crossed && self.has_passed_intersection(config) {
            self.has_crossed = true;
        }

        if self.is_emergency || self.has_crossed {
            self.speed = config.base_speed;
            self.advance();
            return;
        }

        let stops = self.stop_conditions(config, signals, peers);
        self.speed = self.next_speed(config, &stops);
        self.advance();
    }
}
