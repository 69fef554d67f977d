//! Intersection Simulation Library
//!
//! Simulates vehicle flow through a single signalized four-way intersection
//! under adaptive or fixed-timer control, with emergency preemption.

pub mod simulation;
