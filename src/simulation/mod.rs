//! Single-intersection traffic simulation
//!
//! This module contains the signal controller, vehicle kinematics and the
//! world that orchestrates them. It has no rendering or input handling and
//! can be driven from the console or from tests.

mod config;
mod intersection;
mod signal;
mod types;
mod vehicle;
mod world;

pub use config::{
    SimConfig, ADAPTIVE_SPAWN_COOLDOWN, BASE_SPEED, BRAKING_DISTANCE, CENTER_BUFFER,
    DESPAWN_MARGIN, DILEMMA_ZONE_DISTANCE, FIXED_GREEN_DURATION, FIXED_SPAWN_COOLDOWN, HEIGHT,
    LANE_WIDTH, MAX_GREEN, MIN_GREEN, SPEED_STEP, STOP_OFFSET, VEHICLE_HEIGHT, VEHICLE_WIDTH,
    WIDTH, YELLOW_DURATION,
};
pub use intersection::IntersectionController;
pub use signal::{SignalBank, TrafficSignal};
pub use types::{
    ApproachGroup, Axis, ControlMode, Direction, Lane, Phase, Position, Rect, SignalState,
    VehicleId,
};
pub use vehicle::{StopConditions, Vehicle, SAFE_FOLLOWING_MULTIPLIER};
pub use world::{ApproachStatus, SimSummary, SimWorld, RUSH_HOUR_DIRECTIONS};
