//! The shared actor motion model.
//!
//! Pac-Man and the ghosts move continuously through pixel space while the
//! maze is a discrete tile grid. This module owns the reconciliation: Euler
//! position updates, wall checks against the tile one step ahead, the
//! cornering tolerance that lets a turn begin slightly before the tile
//! center, and the snapping that keeps committed turns grid-aligned.

use glam::{IVec2, Vec2};
use tracing::{debug, trace};

use crate::constants::{ACTOR_HALF_EXTENT, BACK_BUFFER_SIZE, SCREEN_TILE_SIZE};
use crate::entity::direction::Direction;
use crate::map::{CellKind, TileMap};

/// Whether two pixel positions are within `range` of each other.
pub fn in_range(a: Vec2, b: Vec2, range: f32) -> bool {
    a.distance_squared(b) <= range * range
}

/// Continuous position plus the tile-grid bookkeeping shared by every
/// moving character.
#[derive(Debug, Clone)]
pub struct Actor {
    /// Center position in back-buffer pixels.
    pub pos: Vec2,
    /// Per-axis speed, in pixels per second. Only one axis is in play per
    /// heading, so the magnitude is effectively uniform.
    pub vel: Vec2,
    /// Half the drawn extent, for the renderer and collision checks.
    pub half_extent: Vec2,
    /// Current facing.
    pub dir: Direction,
    /// Cached containing tile; refreshed on every committed move.
    pub tile: IVec2,
    /// Max distance from a tile center at which a turn is accepted.
    pub cornering_range: f32,
    /// Cleared when a turn commits, set again on entering a new tile, so a
    /// single tile-center crossing can host at most one direction change.
    pub can_turn: bool,
}

impl Actor {
    pub fn new(pos: Vec2, dir: Direction, speed: f32, cornering_range: f32) -> Self {
        Self {
            pos,
            vel: Vec2::splat(speed),
            half_extent: ACTOR_HALF_EXTENT,
            dir,
            tile: TileMap::tile_of(pos),
            cornering_range,
            can_turn: true,
        }
    }

    /// Teleports the actor, resetting the tile cache and turn latch. Used at
    /// round starts and home-slot placement.
    pub fn place(&mut self, pos: Vec2, dir: Direction) {
        self.pos = pos;
        self.dir = dir;
        self.tile = TileMap::tile_of(pos);
        self.can_turn = true;
    }

    pub fn speed(&self) -> f32 {
        self.vel.x
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.vel = Vec2::splat(speed);
    }

    /// The actor's offset from its current tile's center.
    pub fn offset_from_center(&self) -> Vec2 {
        self.pos - TileMap::tile_center(self.tile)
    }

    /// Plain Euler integration one step along `dir`.
    pub fn next_pos(&self, dir: Direction, dt: f32) -> Vec2 {
        self.pos + self.vel * dir.as_vec2() * dt
    }

    /// Whether the actor may advance to `next_pos` along `dir`.
    ///
    /// Continuing straight is allowed while the tile ahead is free, or while
    /// the actor has not yet pushed past its own tile's center toward the
    /// blocking face. Changing direction additionally requires the cross-axis
    /// offset from the tile center to be inside the cornering range
    /// (inclusive; the ghosts' junction detection is strict, and the two
    /// bounds must stay distinct).
    pub fn can_move(
        &self,
        map: &TileMap,
        next_pos: Vec2,
        dir: Direction,
        is_dir_same: bool,
        through_door: bool,
    ) -> bool {
        let next_tile = self.tile + dir.as_ivec2();
        trace!(tile = ?next_tile, "checking tile ahead");

        // Horizontally out of the grid means the tunnel; the wrap happens in
        // the commit step.
        if next_tile.x < 0 || next_tile.x >= SCREEN_TILE_SIZE.x as i32 {
            return true;
        }

        let occupied = match map.cell_at(next_tile) {
            CellKind::Wall => true,
            CellKind::Door => !through_door,
            _ => false,
        };

        let offset = next_pos - TileMap::tile_center(self.tile);
        let (along, cross) = if dir.is_horizontal() {
            (offset.x * dir.as_vec2().x, offset.y)
        } else {
            (offset.y * dir.as_vec2().y, offset.x)
        };

        if is_dir_same {
            along <= 0.0 || !occupied
        } else {
            !occupied && cross.abs() <= self.cornering_range
        }
    }

    /// Attempts one step along `dir`, committing the move on success.
    ///
    /// A direction change is refused outright while the turn latch is down.
    /// Crossing the horizontal back-buffer edge wraps to the far side
    /// unconditionally, without consulting the grid.
    pub fn try_move(&mut self, map: &TileMap, dir: Direction, dt: f32, through_door: bool) -> bool {
        let is_dir_same = dir == self.dir;
        if !is_dir_same && !self.can_turn {
            return false;
        }

        let mut next = self.next_pos(dir, dt);
        let width = BACK_BUFFER_SIZE.x as f32;
        if next.x < 0.0 {
            next.x = width - 1.0;
        } else if next.x >= width {
            next.x = 0.0;
        } else if !self.can_move(map, next, dir, is_dir_same, through_door) {
            return false;
        }

        self.commit_move(next, dir, is_dir_same);
        true
    }

    /// Commits a step. A direction change snaps the cross axis onto the tile
    /// center line, shedding any drift accumulated before the turn was
    /// accepted.
    fn commit_move(&mut self, mut next: Vec2, dir: Direction, is_dir_same: bool) {
        if !is_dir_same {
            let offset = next - TileMap::tile_center(self.tile);
            if dir.is_horizontal() {
                next.y -= offset.y;
            } else {
                next.x -= offset.x;
            }
            debug!(dir = %dir, "direction changed");
            self.dir = dir;
            self.can_turn = false;
        }

        self.pos = next;
        let tile = TileMap::tile_of(self.pos);
        if tile != self.tile {
            trace!(tile = ?tile, "entered tile");
            self.tile = tile;
            self.can_turn = true;
        }
    }

    /// Snaps onto the current tile center along the blocked axis so the
    /// actor rests flush against the wall instead of jittering.
    pub fn rest_against_wall(&mut self) {
        let center = TileMap::tile_center(self.tile);
        if self.dir.is_horizontal() {
            self.pos.x = center.x;
        } else {
            self.pos.y = center.y;
        }
        trace!(pos = ?self.pos, "wall collision resolved");
    }

    /// Turns in place without a movement check. Used for forced reversals on
    /// ghost state changes.
    pub fn face(&mut self, dir: Direction) {
        self.dir = dir;
    }

    /// Snaps the axis perpendicular to the current heading onto the tile
    /// center line. Used when a ghost's state change re-derives its heading.
    pub fn snap_cross_axis(&mut self) {
        let center = TileMap::tile_center(self.tile);
        if self.dir.is_horizontal() {
            self.pos.y = center.y;
        } else {
            self.pos.x = center.x;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PACMAN_CORNERING_RANGE;

    fn actor_at(pos: Vec2, dir: Direction) -> Actor {
        Actor::new(pos, dir, 60.0, PACMAN_CORNERING_RANGE)
    }

    #[test]
    fn test_next_pos_is_euler_step() {
        let actor = actor_at(Vec2::new(100.0, 100.0), Direction::Right);
        let next = actor.next_pos(Direction::Right, 1.0 / 60.0);
        assert_eq!(next, Vec2::new(101.0, 100.0));
    }

    #[test]
    fn test_in_range_boundary_is_inclusive() {
        let a = Vec2::new(0.0, 0.0);
        assert!(in_range(a, Vec2::new(3.0, 4.0), 5.0));
        assert!(!in_range(a, Vec2::new(3.0, 4.1), 5.0));
    }

    #[test]
    fn test_place_refreshes_tile_cache() {
        let mut actor = actor_at(Vec2::new(4.0, 4.0), Direction::Left);
        actor.can_turn = false;
        actor.place(Vec2::new(100.0, 100.0), Direction::Up);
        assert_eq!(actor.tile, IVec2::new(12, 12));
        assert!(actor.can_turn);
    }

    #[test]
    fn test_snap_cross_axis() {
        let mut actor = actor_at(Vec2::new(101.5, 99.0), Direction::Right);
        actor.snap_cross_axis();
        assert_eq!(actor.pos, Vec2::new(101.5, 100.0));
    }
}
