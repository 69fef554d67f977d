//! Main simulation world that ties everything together
//!
//! Owns the configuration, the controller and the live vehicle set, and
//! drives one tick at a time: demand generation, signal control, vehicle
//! movement, then pruning.

use anyhow::{Context, Result};
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;

use super::config::SimConfig;
use super::intersection::IntersectionController;
use super::types::{ApproachGroup, ControlMode, Direction, Phase, SignalState, VehicleId};
use super::vehicle::Vehicle;

/// Spawn weights for regular traffic: N/S carry three times the E/W demand
pub const RUSH_HOUR_DIRECTIONS: [Direction; 8] = [
    Direction::North,
    Direction::North,
    Direction::North,
    Direction::South,
    Direction::South,
    Direction::South,
    Direction::East,
    Direction::West,
];

/// Lane-1 signal of one approach as shown on the dashboard
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproachStatus {
    pub direction: Direction,
    pub state: SignalState,
    pub remaining_time: u32,
}

/// Snapshot of the dashboard statistics
#[derive(Debug, Clone, PartialEq)]
pub struct SimSummary {
    pub time: f32,
    pub mode: ControlMode,
    pub total_vehicles: usize,
    /// Stopped N/S vehicles, wherever they are
    pub queued_north_south: usize,
    /// Stopped E/W vehicles, wherever they are
    pub queued_east_west: usize,
    pub green_duration: u32,
    pub active_group: ApproachGroup,
    pub phase: Phase,
    pub emergency_active: bool,
    pub vehicles_spawned: usize,
    pub vehicles_exited: usize,
    pub approaches: Vec<ApproachStatus>,
}

/// The main simulation world
pub struct SimWorld {
    pub config: SimConfig,

    pub controller: IntersectionController,

    /// All active vehicles
    pub vehicles: Vec<Vehicle>,

    pub mode: ControlMode,

    /// Simulation time
    pub time: f32,

    /// Seconds since the last regular spawn
    spawn_timer: f32,

    /// Whether the demand generator spawns regular traffic
    pub demand_enabled: bool,

    /// Next ID to assign
    next_id: usize,

    pub vehicles_spawned: usize,
    pub vehicles_exited: usize,

    /// Optional seeded RNG for reproducible simulations
    rng: Option<StdRng>,
}

impl Default for SimWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl SimWorld {
    fn new_internal(config: SimConfig, rng: Option<StdRng>) -> Self {
        Self {
            controller: IntersectionController::new(&config),
            config,
            vehicles: Vec::new(),
            mode: ControlMode::Adaptive,
            time: 0.0,
            spawn_timer: 0.0,
            demand_enabled: true,
            next_id: 0,
            vehicles_spawned: 0,
            vehicles_exited: 0,
            rng,
        }
    }

    /// Create a world with the default parameters in adaptive mode
    pub fn new() -> Self {
        Self::new_internal(SimConfig::default(), None)
    }

    /// Create a new SimWorld with a seeded RNG for reproducible simulations
    pub fn new_with_seed(seed: u64) -> Self {
        Self::new_internal(SimConfig::default(), Some(StdRng::seed_from_u64(seed)))
    }

    /// Create a world from custom parameters
    pub fn with_config(config: SimConfig, seed: Option<u64>) -> Result<Self> {
        config.validate().context("Invalid simulation config")?;
        Ok(Self::new_internal(config, seed.map(StdRng::seed_from_u64)))
    }

    /// Choose a random element from a slice, using seeded RNG if available
    fn choose_random<T: Copy>(&mut self, slice: &[T]) -> Option<T> {
        match &mut self.rng {
            Some(rng) => slice.choose(rng).copied(),
            None => slice.choose(&mut rand::rng()).copied(),
        }
    }

    fn next_vehicle_id(&mut self) -> VehicleId {
        let id = VehicleId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn set_mode(&mut self, mode: ControlMode) {
        if self.mode != mode {
            debug!("Control mode changed to {}", mode);
        }
        self.mode = mode;
    }

    pub fn toggle_mode(&mut self) {
        self.set_mode(self.mode.toggled());
    }

    /// Spawn a vehicle at the edge of `direction` in a random lane
    pub fn spawn_vehicle(&mut self, direction: Direction, is_emergency: bool) -> VehicleId {
        let id = self.next_vehicle_id();
        let vehicle = match &mut self.rng {
            Some(rng) => Vehicle::spawn(id, direction, is_emergency, &self.config, rng),
            None => Vehicle::spawn(id, direction, is_emergency, &self.config, &mut rand::rng()),
        };
        debug!(
            "Spawned {} vehicle {:?} from {} in lane {}",
            if is_emergency { "emergency" } else { "regular" },
            id.0,
            direction,
            vehicle.lane.number()
        );
        self.add_vehicle(vehicle);
        id
    }

    /// Insert a prepared vehicle into the active set
    pub fn add_vehicle(&mut self, vehicle: Vehicle) {
        self.next_id = self.next_id.max(vehicle.id.0 + 1);
        self.vehicles_spawned += 1;
        self.vehicles.push(vehicle);
    }

    pub fn spawn_emergency(&mut self, direction: Direction) -> VehicleId {
        self.spawn_vehicle(direction, true)
    }

    /// Spawn an emergency vehicle from a uniformly random approach
    pub fn spawn_random_emergency(&mut self) -> VehicleId {
        let direction = self
            .choose_random(&Direction::ALL)
            .unwrap_or(Direction::North);
        self.spawn_emergency(direction)
    }

    pub fn get_vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    /// Spawn regular traffic once the cooldown for the current mode elapses
    fn generate_demand(&mut self, delta_secs: f32) {
        if !self.demand_enabled {
            return;
        }

        self.spawn_timer += delta_secs;
        if self.spawn_timer > self.config.spawn_cooldown(self.mode) {
            let direction = self
                .choose_random(&RUSH_HOUR_DIRECTIONS)
                .unwrap_or(Direction::North);
            self.spawn_vehicle(direction, false);
            self.spawn_timer = 0.0;
        }
    }

    /// Move every vehicle against the tick-start snapshot
    fn update_vehicles(&mut self) {
        let snapshot = self.vehicles.clone();
        let signals = self.controller.signals();
        for vehicle in &mut self.vehicles {
            vehicle.step(&self.config, signals, &snapshot);
        }
    }

    /// Drop vehicles that left the world
    fn prune_vehicles(&mut self) {
        let config = &self.config;
        let before = self.vehicles.len();
        self.vehicles.retain(|v| {
            let keep = !config.is_out_of_bounds(&v.position);
            if !keep {
                trace!("Vehicle {:?} left the simulation", v.id.0);
            }
            keep
        });
        self.vehicles_exited += before - self.vehicles.len();
    }

    /// Advance the simulation by `delta_secs`
    pub fn tick(&mut self, delta_secs: f32) {
        self.time += delta_secs;

        self.generate_demand(delta_secs);

        self.controller.update(delta_secs, &self.vehicles, self.mode);

        self.update_vehicles();

        self.prune_vehicles();
    }

    /// Number of stopped vehicles on the given approaches
    fn queued(&self, group: ApproachGroup) -> usize {
        self.vehicles
            .iter()
            .filter(|v| group.contains(v.direction) && v.speed == 0.0)
            .count()
    }

    /// Collect the dashboard statistics
    pub fn summary(&self) -> SimSummary {
        let signals = self.controller.signals();
        let approaches = Direction::ALL
            .iter()
            .filter_map(|&d| signals.primary(d))
            .map(|s| ApproachStatus {
                direction: s.direction,
                state: s.state,
                remaining_time: s.remaining_time,
            })
            .collect();

        SimSummary {
            time: self.time,
            mode: self.mode,
            total_vehicles: self.vehicles.len(),
            queued_north_south: self.queued(ApproachGroup::NorthSouth),
            queued_east_west: self.queued(ApproachGroup::EastWest),
            green_duration: self.controller.green_duration,
            active_group: self.controller.active_group,
            phase: self.controller.phase,
            emergency_active: self.vehicles.iter().any(|v| v.is_emergency),
            vehicles_spawned: self.vehicles_spawned,
            vehicles_exited: self.vehicles_exited,
            approaches,
        }
    }

    /// Print a summary of the world state
    pub fn print_summary(&self) {
        let summary = self.summary();
        println!("=== Intersection Summary ===");
        println!("Time: {:.2}s", summary.time);
        println!("Mode: {}", summary.mode);
        println!(
            "Active group: {} ({:?}), green time: {}s",
            summary.active_group, summary.phase, summary.green_duration
        );
        println!("--- Signals ---");
        for approach in &summary.approaches {
            if approach.remaining_time > 0 {
                println!(
                    "  {}: {} ({}s)",
                    approach.direction, approach.state, approach.remaining_time
                );
            } else {
                println!("  {}: {}", approach.direction, approach.state);
            }
        }
        println!("--- Traffic ---");
        println!("  Total vehicles: {}", summary.total_vehicles);
        println!("  Queued N/S: {}", summary.queued_north_south);
        println!("  Queued E/W: {}", summary.queued_east_west);
        println!(
            "  Spawned: {}, exited: {}",
            summary.vehicles_spawned, summary.vehicles_exited
        );
        if summary.emergency_active {
            println!("  EMERGENCY VEHICLE ON APPROACH");
        }
    }
}
