//! Fixed simulation parameters
//!
//! All distances are in screen pixels, speeds in pixels per tick and
//! durations in seconds.

use anyhow::{bail, Result};

use super::types::{ControlMode, Direction, Position, Rect};

/// World width
pub const WIDTH: f32 = 1000.0;
/// World height
pub const HEIGHT: f32 = 800.0;
pub const LANE_WIDTH: f32 = 40.0;
/// Distance from the intersection center to each stop line
pub const STOP_OFFSET: f32 = 100.0;
/// Cruising speed and speed cap
pub const BASE_SPEED: f32 = 3.0;
/// Short side of a vehicle
pub const VEHICLE_WIDTH: f32 = 20.0;
/// Long side of a vehicle
pub const VEHICLE_HEIGHT: f32 = 40.0;
/// Beyond this distance from the line a vehicle stops for yellow
pub const DILEMMA_ZONE_DISTANCE: f32 = 20.0;
/// Distance from the stop line at which gradual braking starts. A vehicle
/// braking from BASE_SPEED by SPEED_STEP per tick covers 21px.
pub const BRAKING_DISTANCE: f32 = 24.0;
pub const YELLOW_DURATION: u32 = 3;
pub const MIN_GREEN: u32 = 5;
pub const MAX_GREEN: u32 = 15;
pub const FIXED_GREEN_DURATION: u32 = 10;

/// Per-tick acceleration and deceleration
pub const SPEED_STEP: f32 = 0.2;
/// How far past the center a vehicle must be to count as crossed
pub const CENTER_BUFFER: f32 = 10.0;
/// How far outside the world a vehicle travels before removal
pub const DESPAWN_MARGIN: f32 = 200.0;
pub const ADAPTIVE_SPAWN_COOLDOWN: f32 = 0.8;
pub const FIXED_SPAWN_COOLDOWN: f32 = 0.4;

/// Parameters supplied to the simulation at initialization
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub width: f32,
    pub height: f32,
    pub lane_width: f32,
    pub stop_offset: f32,
    pub base_speed: f32,
    pub vehicle_width: f32,
    pub vehicle_height: f32,
    pub dilemma_zone_distance: f32,
    pub braking_distance: f32,
    pub yellow_duration: u32,
    pub min_green: u32,
    pub max_green: u32,
    pub fixed_green_duration: u32,
    pub speed_step: f32,
    pub center_buffer: f32,
    pub despawn_margin: f32,
    pub adaptive_spawn_cooldown: f32,
    pub fixed_spawn_cooldown: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            lane_width: LANE_WIDTH,
            stop_offset: STOP_OFFSET,
            base_speed: BASE_SPEED,
            vehicle_width: VEHICLE_WIDTH,
            vehicle_height: VEHICLE_HEIGHT,
            dilemma_zone_distance: DILEMMA_ZONE_DISTANCE,
            braking_distance: BRAKING_DISTANCE,
            yellow_duration: YELLOW_DURATION,
            min_green: MIN_GREEN,
            max_green: MAX_GREEN,
            fixed_green_duration: FIXED_GREEN_DURATION,
            speed_step: SPEED_STEP,
            center_buffer: CENTER_BUFFER,
            despawn_margin: DESPAWN_MARGIN,
            adaptive_spawn_cooldown: ADAPTIVE_SPAWN_COOLDOWN,
            fixed_spawn_cooldown: FIXED_SPAWN_COOLDOWN,
        }
    }
}

impl SimConfig {
    /// Check that the parameters describe a usable intersection
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("width", self.width),
            ("height", self.height),
            ("lane_width", self.lane_width),
            ("stop_offset", self.stop_offset),
            ("base_speed", self.base_speed),
            ("vehicle_width", self.vehicle_width),
            ("vehicle_height", self.vehicle_height),
            ("speed_step", self.speed_step),
            ("adaptive_spawn_cooldown", self.adaptive_spawn_cooldown),
            ("fixed_spawn_cooldown", self.fixed_spawn_cooldown),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                bail!("{} must be positive, got {}", name, value);
            }
        }

        let non_negative = [
            ("dilemma_zone_distance", self.dilemma_zone_distance),
            ("braking_distance", self.braking_distance),
            ("center_buffer", self.center_buffer),
            ("despawn_margin", self.despawn_margin),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0) {
                bail!("{} must not be negative, got {}", name, value);
            }
        }

        if self.yellow_duration == 0 {
            bail!("yellow_duration must be at least one second");
        }
        if self.min_green == 0 {
            bail!("min_green must be at least one second");
        }
        if self.min_green > self.max_green {
            bail!(
                "min_green ({}) exceeds max_green ({})",
                self.min_green,
                self.max_green
            );
        }
        if 4.0 * self.lane_width > self.width.min(self.height) {
            bail!("the road does not fit inside a {}x{} world", self.width, self.height);
        }
        if self.stop_offset >= self.width.min(self.height) / 2.0 {
            bail!(
                "stop_offset ({}) puts the stop lines outside a {}x{} world",
                self.stop_offset,
                self.width,
                self.height
            );
        }

        Ok(())
    }

    /// Intersection center, rounded down to whole pixels
    pub fn center(&self) -> Position {
        Position::new((self.width / 2.0).floor(), (self.height / 2.0).floor())
    }

    /// Square at the center used to detect cross traffic (4 lane widths wide)
    pub fn conflict_box(&self) -> Rect {
        let center = self.center();
        let half = self.lane_width * 2.0;
        Rect::new(
            center.x - half,
            center.y - half,
            self.lane_width * 4.0,
            self.lane_width * 4.0,
        )
    }

    /// Coordinate of the stop line for `direction` along its axis
    pub fn stop_line(&self, direction: Direction) -> f32 {
        self.center().along(direction.axis()) - direction.sign() * self.stop_offset
    }

    /// Spawn cooldown of the demand generator for the given mode
    pub fn spawn_cooldown(&self, mode: ControlMode) -> f32 {
        match mode {
            ControlMode::Adaptive => self.adaptive_spawn_cooldown,
            ControlMode::Fixed => self.fixed_spawn_cooldown,
        }
    }

    /// Whether a position lies outside the world plus the despawn margin
    pub fn is_out_of_bounds(&self, position: &Position) -> bool {
        let margin = self.despawn_margin;
        position.x < -margin
            || position.x > self.width + margin
            || position.y < -margin
            || position.y > self.height + margin
    }
}
