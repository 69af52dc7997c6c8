//! Simulation core for a retro Pac-Man clone.
//!
//! This crate owns everything that happens between rendered frames: the tile
//! map, the continuous-position movement model with its tile-grid collision
//! and cornering tolerance, the per-ghost AI state machines, Pac-Man control
//! and consumption, and the tick scheduler that sequences round flow. It
//! deliberately owns no window, texture, sound device, or keyboard — those
//! collaborators feed in a held-direction signal and read back positions,
//! animation indices, HUD values, and audio trigger points.

pub mod audio;
pub mod constants;
pub mod entity;
pub mod error;
pub mod game;
pub mod input;
pub mod map;
pub mod rng;
