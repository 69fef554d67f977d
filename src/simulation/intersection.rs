//! Signal control for the intersection
//!
//! Runs the green/yellow phase machine over the two approach groups, sizes
//! the next green from the waiting queue in adaptive mode and gives emergency
//! vehicles immediate right-of-way.

use log::{debug, info};

use super::config::SimConfig;
use super::signal::SignalBank;
use super::types::{ApproachGroup, ControlMode, Phase, SignalState, VehicleId};
use super::vehicle::Vehicle;

/// Owner of the eight signal heads and the phase state machine
#[derive(Debug, Clone)]
pub struct IntersectionController {
    signals: SignalBank,
    pub active_group: ApproachGroup,
    pub phase: Phase,
    /// Seconds since the current phase started
    pub phase_timer: f32,
    pub green_duration: u32,
    pub yellow_duration: u32,
    /// Vehicle currently holding a preemption, if any
    preempted_by: Option<VehicleId>,
    config: SimConfig,
}

impl IntersectionController {
    /// Start in green for North/South with the fixed green duration
    pub fn new(config: &SimConfig) -> Self {
        let mut controller = Self {
            signals: SignalBank::new(),
            active_group: ApproachGroup::NorthSouth,
            phase: Phase::Green,
            phase_timer: 0.0,
            green_duration: config.fixed_green_duration,
            yellow_duration: config.yellow_duration,
            preempted_by: None,
            config: config.clone(),
        };

        let active_group = controller.active_group;
        for signal in controller.signals.iter_mut() {
            let state = if active_group.contains(signal.direction) {
                SignalState::Green
            } else {
                SignalState::Red
            };
            signal.set_state(state, 0);
        }

        controller
    }

    pub fn signals(&self) -> &SignalBank {
        &self.signals
    }

    /// Vehicle currently holding an emergency preemption
    pub fn preempted_by(&self) -> Option<VehicleId> {
        self.preempted_by
    }

    pub fn is_preempted(&self) -> bool {
        self.preempted_by.is_some()
    }

    /// Duration of the phase currently in effect
    pub fn current_phase_duration(&self) -> u32 {
        match self.phase {
            Phase::Green => self.green_duration,
            Phase::Yellow => self.yellow_duration,
        }
    }

    /// Whole seconds left in the current phase
    pub fn remaining_time(&self) -> u32 {
        (self.current_phase_duration() as f32 - self.phase_timer)
            .max(0.0)
            .floor() as u32
    }

    /// Advance the controller by `dt` seconds
    pub fn update(&mut self, dt: f32, vehicles: &[Vehicle], mode: ControlMode) {
        self.phase_timer += dt;

        match mode {
            ControlMode::Adaptive => {
                let emergency = vehicles
                    .iter()
                    .find(|v| v.is_emergency && !v.has_crossed());
                if let Some(vehicle) = emergency {
                    self.preempt(vehicle);
                    return;
                }
                self.release_preemption();

                if self.advance_phase() {
                    self.adapt_green_duration(vehicles);
                    self.log_switch();
                }
            }
            ControlMode::Fixed => {
                self.release_preemption();
                self.green_duration = self.config.fixed_green_duration;
                if self.advance_phase() {
                    self.log_switch();
                }
            }
        }

        self.apply_phase();
    }

    /// Step the phase machine. Returns true when a new green begins.
    fn advance_phase(&mut self) -> bool {
        match self.phase {
            Phase::Green if self.phase_timer >= self.green_duration as f32 => {
                self.phase = Phase::Yellow;
                self.phase_timer = 0.0;
                debug!("{} switching to yellow", self.active_group);
                false
            }
            Phase::Yellow if self.phase_timer >= self.yellow_duration as f32 => {
                self.phase = Phase::Green;
                self.phase_timer = 0.0;
                self.active_group = self.active_group.other();
                true
            }
            _ => false,
        }
    }

    fn log_switch(&self) {
        debug!(
            "{} switching to green for {}s",
            self.active_group, self.green_duration
        );
    }

    /// Number of stopped vehicles still in front of the stop line on `group`
    pub fn count_waiting(&self, vehicles: &[Vehicle], group: ApproachGroup) -> usize {
        vehicles
            .iter()
            .filter(|v| group.contains(v.direction) && v.is_queued(&self.config))
            .count()
    }

    /// Size the green that just started from the queue on the new active group
    fn adapt_green_duration(&mut self, vehicles: &[Vehicle]) {
        let waiting = self.count_waiting(vehicles, self.active_group) as u32;
        self.green_duration = (4 + waiting / 2)
            .max(self.config.min_green)
            .min(self.config.max_green);
    }

    /// Mirror the phase on the active group, red everywhere else
    fn apply_phase(&mut self) {
        let remaining = self.remaining_time();
        let state = self.phase.signal_state();
        let active_group = self.active_group;
        for signal in self.signals.iter_mut() {
            if active_group.contains(signal.direction) {
                signal.set_state(state, remaining);
            } else {
                signal.set_state(SignalState::Red, 0);
            }
        }
    }

    /// Green for the emergency vehicle's approach, red elsewhere
    fn preempt(&mut self, vehicle: &Vehicle) {
        if self.preempted_by != Some(vehicle.id) {
            info!(
                "Emergency preemption: vehicle {:?} approaching from {}",
                vehicle.id.0, vehicle.direction
            );
            self.preempted_by = Some(vehicle.id);
        }

        let direction = vehicle.direction;
        for signal in self.signals.iter_mut() {
            let state = if signal.direction == direction {
                SignalState::Green
            } else {
                SignalState::Red
            };
            signal.set_state(state, 0);
        }
        self.phase_timer = 0.0;
    }

    fn release_preemption(&mut self) {
        if let Some(id) = self.preempted_by.take() {
            info!(
                "Emergency preemption for vehicle {:?} ended, resuming {} {:?}",
                id.0, self.active_group, self.phase
            );
        }
    }
}
