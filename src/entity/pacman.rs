//! Pac-Man control and consumption.
//!
//! Each tick the player's held-direction bits resolve to a desired heading,
//! the motion model attempts it (falling back to the current heading, then
//! to resting against the wall), and whatever dot or pill sits under the
//! reached tile center is consumed. Catching and dying are driven from the
//! game scheduler; this module only flips the local state machine.

use glam::Vec2;
use tracing::debug;

use crate::constants::{PACMAN_CORNERING_RANGE, PACMAN_SPAWN, PACMAN_SPEED, PICKUP_RANGE_PAD};
use crate::entity::actor::{in_range, Actor};
use crate::entity::animation::{Animation, PacManAnim};
use crate::entity::direction::Direction;
use crate::game::level::Level;
use crate::input::Buttons;
use crate::map::{CellKind, TileMap};

/// Pac-Man's behavioral state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum PacManState {
    /// Blocked or not yet moving.
    Idle,
    /// Moving normally.
    Moving,
    /// Moving while a power pill is active.
    Speeding,
    /// Touched by a ghost; gameplay is frozen around him.
    Caught,
    /// Playing the death animation. Terminal for the round.
    Dead,
}

/// The player character.
#[derive(Debug, Clone)]
pub struct PacMan {
    pub actor: Actor,
    pub state: PacManState,
    anim: Animation,
    anim_kind: PacManAnim,
    /// Set while a power pill is active; selects the speeding speed row.
    power: bool,
}

impl PacMan {
    pub fn new(level: &Level) -> Self {
        let anim_kind = PacManAnim::Moving(Direction::Left);
        let mut pacman = Self {
            actor: Actor::new(
                PACMAN_SPAWN,
                Direction::Left,
                PACMAN_SPEED,
                PACMAN_CORNERING_RANGE,
            ),
            state: PacManState::Idle,
            anim: anim_kind.animation(),
            anim_kind,
            power: false,
        };
        pacman.apply_speed(level, false);
        pacman
    }

    /// Returns to the spawn point for a new round.
    pub fn reset(&mut self, level: &Level) {
        self.actor.place(PACMAN_SPAWN, Direction::Left);
        self.state = PacManState::Idle;
        self.power = false;
        self.anim_kind = PacManAnim::Moving(Direction::Left);
        self.anim = self.anim_kind.animation();
        self.apply_speed(level, false);
    }

    /// The (animation kind, frame index) pair for the renderer.
    pub fn sprite(&self) -> (PacManAnim, u32) {
        (self.anim_kind, self.anim.frame())
    }

    /// Whether the death animation has played through.
    pub fn death_finished(&self) -> bool {
        self.state == PacManState::Dead && self.anim.finished()
    }

    /// Marks the power pill active or expired. The speed change takes
    /// effect on the next tile entry.
    pub fn set_power(&mut self, power: bool) {
        self.power = power;
        if !power && self.state == PacManState::Speeding {
            self.state = PacManState::Moving;
        }
    }

    /// Ghost contact: freeze in place until the scheduler starts the death
    /// animation.
    pub fn catch(&mut self) {
        debug!(pos = ?self.actor.pos, "pacman caught");
        self.state = PacManState::Caught;
    }

    /// Starts the death animation.
    pub fn die(&mut self) {
        self.state = PacManState::Dead;
        self.anim_kind = PacManAnim::Death;
        self.anim = self.anim_kind.animation();
    }

    /// Advances the death animation while the rest of the world is frozen.
    pub fn tick_death(&mut self) {
        if self.state == PacManState::Dead {
            self.anim.tick();
        }
    }

    /// One gameplay tick: resolve input, move, consume. Returns what was
    /// eaten, if anything, for the game to score and schedule on.
    pub fn update(
        &mut self,
        map: &mut TileMap,
        level: &Level,
        buttons: Buttons,
        dt: f32,
    ) -> Option<CellKind> {
        if matches!(self.state, PacManState::Caught | PacManState::Dead) {
            return None;
        }

        let desired = buttons.resolve(self.actor.dir);
        let prev_tile = self.actor.tile;

        let mut moved = false;
        if desired != self.actor.dir {
            moved = self.actor.try_move(map, desired, dt, false);
        }
        if !moved {
            moved = self.actor.try_move(map, self.actor.dir, dt, false);
        }

        if moved {
            self.state = if self.power {
                PacManState::Speeding
            } else {
                PacManState::Moving
            };
        } else {
            self.actor.rest_against_wall();
            self.state = PacManState::Idle;
        }

        // Historical arcade rule: a tile holding food slows Pac-Man down for
        // the tile's duration, so speed is recomputed on tile entry.
        if self.actor.tile != prev_tile {
            let eating = matches!(
                map.cell_at(self.actor.tile),
                CellKind::Dot | CellKind::Pill
            );
            self.apply_speed(level, eating);
        }

        let eaten = self.consume(map, dt);

        self.refresh_anim();
        self.anim.tick();

        eaten
    }

    /// Eats the dot or pill under the current tile once Pac-Man is within
    /// pickup range of its center. Both dots and pills are range-gated.
    fn consume(&mut self, map: &mut TileMap, dt: f32) -> Option<CellKind> {
        let tile = self.actor.tile;
        match map.cell_at(tile) {
            CellKind::Dot | CellKind::Pill => {
                let center = TileMap::tile_center(tile);
                if in_range(self.actor.pos, center, self.pickup_range(dt)) {
                    return map.eat(tile);
                }
                None
            }
            _ => None,
        }
    }

    /// Pickup distance scales with the per-tick step so food cannot be
    /// skipped over at higher speeds.
    pub fn pickup_range(&self, dt: f32) -> f32 {
        self.actor.speed() * dt + PICKUP_RANGE_PAD
    }

    /// Whether `pos` (a ghost, the bonus item) is touching Pac-Man.
    pub fn touches(&self, pos: Vec2, range: f32) -> bool {
        in_range(self.actor.pos, pos, range)
    }

    fn apply_speed(&mut self, level: &Level, eating: bool) {
        self.actor
            .set_speed(PACMAN_SPEED * level.pacman_multiplier(self.power, eating));
    }

    fn refresh_anim(&mut self) {
        let kind = match self.state {
            PacManState::Idle => PacManAnim::Idle,
            PacManState::Moving | PacManState::Speeding => PacManAnim::Moving(self.actor.dir),
            PacManState::Caught => self.anim_kind,
            PacManState::Dead => PacManAnim::Death,
        };
        if kind != self.anim_kind {
            self.anim_kind = kind;
            self.anim = kind.animation();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_state() {
        let pacman = PacMan::new(&Level::new(1));
        assert_eq!(pacman.state, PacManState::Idle);
        assert_eq!(pacman.actor.pos, PACMAN_SPAWN);
        assert_eq!(pacman.actor.dir, Direction::Left);
    }

    #[test]
    fn test_pickup_range_tracks_speed() {
        let mut pacman = PacMan::new(&Level::new(1));
        let slow = pacman.pickup_range(1.0 / 60.0);
        pacman.actor.set_speed(100.0);
        assert!(pacman.pickup_range(1.0 / 60.0) > slow);
    }

    #[test]
    fn test_death_animation_lifecycle() {
        let mut pacman = PacMan::new(&Level::new(1));
        pacman.catch();
        assert_eq!(pacman.state, PacManState::Caught);
        pacman.die();
        assert!(!pacman.death_finished());
        for _ in 0..88 {
            pacman.tick_death();
        }
        assert!(pacman.death_finished());
    }

    #[test]
    fn test_power_expiry_restores_moving() {
        let mut pacman = PacMan::new(&Level::new(1));
        pacman.set_power(true);
        pacman.state = PacManState::Speeding;
        pacman.set_power(false);
        assert_eq!(pacman.state, PacManState::Moving);
    }
}
