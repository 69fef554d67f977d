//! Core types for the intersection simulation
//!
//! Directions, lanes, signal states and the small geometry helpers shared by
//! the controller and the vehicles.

use std::fmt;

/// A unique identifier for a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VehicleId(pub usize);

/// Axis of travel in screen space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// One of the four approaches feeding the intersection.
///
/// The direction names the edge a vehicle spawns from, so a `North` vehicle
/// travels towards increasing `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Axis the direction travels along
    pub fn axis(self) -> Axis {
        match self {
            Direction::North | Direction::South => Axis::Y,
            Direction::East | Direction::West => Axis::X,
        }
    }

    /// Sign of travel along the axis (+1.0 or -1.0)
    pub fn sign(self) -> f32 {
        match self {
            Direction::North | Direction::West => 1.0,
            Direction::South | Direction::East => -1.0,
        }
    }

    /// The approach group this direction belongs to
    pub fn group(self) -> ApproachGroup {
        match self.axis() {
            Axis::Y => ApproachGroup::NorthSouth,
            Axis::X => ApproachGroup::EastWest,
        }
    }

    pub fn is_perpendicular_to(self, other: Direction) -> bool {
        self.axis() != other.axis()
    }

    /// Index into per-direction tables
    pub fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::South => 1,
            Direction::East => 2,
            Direction::West => 3,
        }
    }

    pub fn short_name(self) -> char {
        match self {
            Direction::North => 'N',
            Direction::South => 'S',
            Direction::East => 'E',
            Direction::West => 'W',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

/// One of the two lanes on each approach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lane {
    One,
    Two,
}

impl Lane {
    pub const ALL: [Lane; 2] = [Lane::One, Lane::Two];

    /// Lateral offset from the road center, in lane widths
    pub fn offset_factor(self) -> f32 {
        match self {
            Lane::One => 0.5,
            Lane::Two => 1.5,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Lane::One => 0,
            Lane::Two => 1,
        }
    }

    pub fn number(self) -> u8 {
        self.index() as u8 + 1
    }
}

/// Pair of opposing approaches that share right-of-way
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApproachGroup {
    NorthSouth,
    EastWest,
}

impl ApproachGroup {
    pub fn contains(self, direction: Direction) -> bool {
        direction.group() == self
    }

    pub fn other(self) -> ApproachGroup {
        match self {
            ApproachGroup::NorthSouth => ApproachGroup::EastWest,
            ApproachGroup::EastWest => ApproachGroup::NorthSouth,
        }
    }
}

impl fmt::Display for ApproachGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApproachGroup::NorthSouth => write!(f, "N/S"),
            ApproachGroup::EastWest => write!(f, "E/W"),
        }
    }
}

/// Display state of a single signal head
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalState {
    Red,
    Yellow,
    Green,
}

impl fmt::Display for SignalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalState::Red => write!(f, "RED"),
            SignalState::Yellow => write!(f, "YELLOW"),
            SignalState::Green => write!(f, "GREEN"),
        }
    }
}

/// Phase of the intersection-wide state machine.
///
/// There is no all-red phase; the active group goes straight from yellow to
/// the other group's green.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Green,
    Yellow,
}

impl Phase {
    pub fn signal_state(self) -> SignalState {
        match self {
            Phase::Green => SignalState::Green,
            Phase::Yellow => SignalState::Yellow,
        }
    }
}

/// Signal control strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ControlMode {
    /// Queue-proportional green time with emergency preemption
    Adaptive,
    /// Constant green time, no preemption
    Fixed,
}

impl ControlMode {
    pub fn toggled(self) -> ControlMode {
        match self {
            ControlMode::Adaptive => ControlMode::Fixed,
            ControlMode::Fixed => ControlMode::Adaptive,
        }
    }
}

impl fmt::Display for ControlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlMode::Adaptive => write!(f, "SMART (ADAPTIVE)"),
            ControlMode::Fixed => write!(f, "STANDARD (FIXED TIMER)"),
        }
    }
}

/// A 2D position in screen space (y grows downwards)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Coordinate along the given axis
    pub fn along(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// Move by `distance` along `axis`
    pub fn translate(&mut self, axis: Axis, distance: f32) {
        match axis {
            Axis::X => self.x += distance,
            Axis::Y => self.y += distance,
        }
    }
}

/// Axis-aligned rectangle anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether the two rectangles overlap with a non-zero area
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}
