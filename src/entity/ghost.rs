//! Ghost behavior: the per-ghost state machine and targeting strategies.
//!
//! All four ghosts run the same state machine; only the targeting differs by
//! type. Navigation is greedy: at each tile-center crossing the ghost picks
//! the non-reversing neighbor closest to its current target tile. Chase and
//! scatter alternate on a fixed wall-clock schedule; panic retargets through
//! the shared xorshift generator so runs replay exactly.

use glam::{IVec2, Vec2};
use rand::RngCore;
use tracing::debug;

use crate::constants::{
    DOOR_ENTRY, EYES_DELAY_TICKS, GHOST_CORNERING_RANGE, GHOST_SPEED, INKY_RELEASE_DOTS,
    CLYDE_RELEASE_DOTS, MODE_PHASES, RED_ZONES, SCREEN_TILE_SIZE, TUNNEL_ROW,
};
use crate::entity::actor::{in_range, Actor};
use crate::entity::animation::{Animation, GhostAnim};
use crate::entity::direction::{Direction, DECISION_ORDER};
use crate::game::events::EventTimer;
use crate::game::level::Level;
use crate::map::{CellKind, TileMap};
use crate::rng::Xorshift32;

/// The four classic ghost types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display, strum_macros::EnumIter)]
pub enum GhostType {
    Blinky,
    Pinky,
    Inky,
    Clyde,
}

impl GhostType {
    /// The fixed maze corner this ghost retreats to during scatter.
    pub fn scatter_target(self) -> IVec2 {
        match self {
            GhostType::Blinky => IVec2::new(25, 0),
            GhostType::Pinky => IVec2::new(2, 0),
            GhostType::Inky => IVec2::new(27, 35),
            GhostType::Clyde => IVec2::new(0, 35),
        }
    }

    /// The resting point inside the house this ghost returns to as eyes.
    pub fn home_slot(self) -> Vec2 {
        match self {
            GhostType::Blinky | GhostType::Pinky => Vec2::new(112.0, 140.0),
            GhostType::Inky => Vec2::new(96.0, 140.0),
            GhostType::Clyde => Vec2::new(128.0, 140.0),
        }
    }

    /// Cumulative dots eaten before this ghost may leave the house.
    pub fn release_dots(self) -> u32 {
        match self {
            GhostType::Blinky | GhostType::Pinky => 0,
            GhostType::Inky => INKY_RELEASE_DOTS,
            GhostType::Clyde => CLYDE_RELEASE_DOTS,
        }
    }

    /// Spawn position, heading and state at round start. Blinky and Pinky
    /// start on the corridor outside the door; Inky and Clyde wait inside.
    pub fn spawn(self) -> (Vec2, Direction, GhostState) {
        match self {
            GhostType::Blinky => (DOOR_ENTRY, Direction::Left, GhostState::Scatter),
            GhostType::Pinky => (Vec2::new(96.0, 116.0), Direction::Right, GhostState::Scatter),
            GhostType::Inky => (self.home_slot(), Direction::Up, GhostState::Home),
            GhostType::Clyde => (self.home_slot(), Direction::Up, GhostState::Home),
        }
    }
}

/// A ghost's behavioral state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum GhostState {
    /// Retreating to the type's fixed corner.
    Scatter,
    /// Pursuing Pac-Man with the type's targeting rule.
    Chase,
    /// Frightened after a power pill; wandering randomly.
    Panic,
    /// The flashing tail end of panic.
    Recover,
    /// Just eaten; frozen, displaying the score card.
    Eaten,
    /// Disembodied eyes heading for the door.
    Eyes,
    /// Descending through the door to the home slot.
    EnterHome,
    /// Waiting in the house for the release threshold.
    Home,
    /// Climbing back out to the door-entry point.
    LeaveHome,
}

impl GhostState {
    /// Whether Pac-Man can eat the ghost in this state.
    pub fn is_frightened(self) -> bool {
        matches!(self, GhostState::Panic | GhostState::Recover)
    }

    /// Whether the house door is passable in this state.
    pub fn passes_door(self) -> bool {
        matches!(
            self,
            GhostState::Eyes | GhostState::EnterHome | GhostState::LeaveHome
        )
    }

    /// Whether the ghost is anywhere in the eaten/return/house flow, and so
    /// exempt from panic and from colliding with Pac-Man.
    pub fn in_home_flow(self) -> bool {
        matches!(
            self,
            GhostState::Eaten
                | GhostState::Eyes
                | GhostState::EnterHome
                | GhostState::Home
                | GhostState::LeaveHome
        )
    }
}

/// The scatter/chase mode dictated by the wall clock, measured from round
/// start: scatter/chase phases flip at the [`MODE_PHASES`] boundaries.
pub fn scheduled_mode(elapsed: u64) -> GhostState {
    let phase = MODE_PHASES
        .iter()
        .position(|&boundary| elapsed < boundary)
        .unwrap_or(MODE_PHASES.len());
    if phase % 2 == 0 {
        GhostState::Scatter
    } else {
        GhostState::Chase
    }
}

/// Read-only world state plus the shared generator, borrowed for one ghost
/// update.
pub struct GhostCtx<'a> {
    pub map: &'a TileMap,
    pub level: &'a Level,
    pub rng: &'a mut Xorshift32,
    pub tick: u64,
    /// Ticks since the round started; drives the scatter/chase schedule.
    pub elapsed: u64,
    pub pacman_pos: Vec2,
    pub pacman_dir: Direction,
    /// Blinky's tile, for Inky's mirrored targeting.
    pub blinky_tile: IVec2,
    pub dots_eaten: u32,
    pub dots_remaining: u32,
    pub dt: f32,
}

/// One of the four ghosts.
#[derive(Debug, Clone)]
pub struct Ghost {
    pub actor: Actor,
    pub kind: GhostType,
    pub state: GhostState,
    anim: Animation,
    anim_kind: GhostAnim,
    /// Fires when an eaten ghost turns into eyes.
    pub to_eyes: EventTimer,
    /// Fires when panic starts flashing.
    pub start_recovery: EventTimer,
    /// Fires when panic ends entirely.
    pub recover: EventTimer,
    /// Which score card an eaten ghost displays.
    score_index: u8,
    /// Red-zone membership sampled at the end of the previous tick.
    in_red_zone: bool,
}

impl Ghost {
    pub fn new(kind: GhostType) -> Self {
        let (pos, dir, state) = kind.spawn();
        let anim_kind = GhostAnim::Moving(dir);
        Self {
            actor: Actor::new(pos, dir, GHOST_SPEED, GHOST_CORNERING_RANGE),
            kind,
            state,
            anim: anim_kind.animation(),
            anim_kind,
            to_eyes: EventTimer::disabled(),
            start_recovery: EventTimer::disabled(),
            recover: EventTimer::disabled(),
            score_index: 0,
            in_red_zone: false,
        }
    }

    /// Returns to the spawn arrangement for a new round.
    pub fn reset(&mut self) {
        let (pos, dir, state) = self.kind.spawn();
        self.actor.place(pos, dir);
        self.state = state;
        self.to_eyes.cancel();
        self.start_recovery.cancel();
        self.recover.cancel();
        self.score_index = 0;
        self.in_red_zone = false;
        self.anim_kind = GhostAnim::Moving(dir);
        self.anim = self.anim_kind.animation();
    }

    /// The (animation kind, frame index) pair for the renderer.
    pub fn sprite(&self) -> (GhostAnim, u32) {
        (self.anim_kind, self.anim.frame())
    }

    /// The global pill-chomp: flips the ghost into panic unless it is
    /// somewhere in the home flow, and books the recovery ticks from the
    /// level's panic configuration.
    pub fn enter_panic(&mut self, tick: u64, level: &Level) {
        if self.state.in_home_flow() {
            return;
        }
        let old = self.state;
        if level.panic_ticks == 0 {
            // High levels have no panic time at all; the pill only reverses.
            self.actor.face(self.actor.dir.opposite());
            return;
        }
        self.state = GhostState::Panic;
        self.start_recovery
            .schedule_at(tick + level.recovery_start_ticks());
        self.recover.schedule_at(tick + level.panic_ticks);
        self.apply_state_change(old);
    }

    /// Eaten during panic/recover: freeze, show the score card, and book the
    /// turn into eyes.
    pub fn eaten(&mut self, tick: u64, score_index: u8) {
        debug!(ghost = %self.kind, score_index, "ghost eaten");
        self.state = GhostState::Eaten;
        self.score_index = score_index;
        self.to_eyes.schedule_after(tick, EYES_DELAY_TICKS);
        self.start_recovery.cancel();
        self.recover.cancel();
        self.refresh_anim();
    }

    /// One gameplay tick.
    pub fn update(&mut self, ctx: &mut GhostCtx) {
        let old_state = self.state;

        // Per-ghost timers first.
        if self.to_eyes.due(ctx.tick) {
            self.state = GhostState::Eyes;
        }
        if self.start_recovery.due(ctx.tick) && self.state == GhostState::Panic {
            self.state = GhostState::Recover;
        }
        if self.recover.due(ctx.tick) && self.state.is_frightened() {
            self.state = scheduled_mode(ctx.elapsed);
        }

        // Positional and schedule-driven transitions.
        let range = self.actor.cornering_range;
        self.state = match self.state {
            GhostState::Home if ctx.dots_eaten >= self.kind.release_dots() => GhostState::LeaveHome,
            GhostState::Eyes if in_range(self.actor.pos, DOOR_ENTRY, range) => GhostState::EnterHome,
            GhostState::EnterHome if in_range(self.actor.pos, self.kind.home_slot(), range) => {
                GhostState::Home
            }
            GhostState::LeaveHome if in_range(self.actor.pos, DOOR_ENTRY, range) => {
                scheduled_mode(ctx.elapsed)
            }
            GhostState::Scatter | GhostState::Chase => scheduled_mode(ctx.elapsed),
            other => other,
        };

        if self.state != old_state {
            self.apply_state_change(old_state);
        }

        match self.state {
            GhostState::Eaten | GhostState::Home => {}
            GhostState::EnterHome | GhostState::LeaveHome => self.steer_home(ctx),
            _ => self.seek(ctx),
        }

        // Membership is deliberately sampled after movement, so the
        // restriction lands one tick late.
        self.in_red_zone = RED_ZONES.contains(&self.actor.tile);

        self.refresh_anim();
        self.anim.tick();
    }

    /// Target-seeking movement for every free-roaming state.
    fn seek(&mut self, ctx: &mut GhostCtx) {
        self.actor
            .set_speed(GHOST_SPEED * self.speed_multiplier(ctx));

        // Junction decisions happen strictly inside the cornering range, at
        // most once per tile, and never while passing a red zone vertically.
        let offset = self.actor.offset_from_center();
        let at_center =
            offset.x.abs() < GHOST_CORNERING_RANGE && offset.y.abs() < GHOST_CORNERING_RANGE;
        let red_blocked = self.in_red_zone && !self.actor.dir.is_horizontal();
        if at_center && self.actor.can_turn && !red_blocked {
            let target = self.target_tile(ctx);
            self.choose_direction(ctx.map, target);
            self.actor.can_turn = false;
        }

        let through_door = self.state.passes_door();
        if !self.actor.try_move(ctx.map, self.actor.dir, ctx.dt, through_door) {
            // Legitimate after a forced reversal; the junction decision at
            // the tile center frees the ghost next tick.
            self.actor.rest_against_wall();
        }
    }

    /// The per-(state, type) target tile.
    pub fn target_tile(&self, ctx: &mut GhostCtx) -> IVec2 {
        match self.state {
            GhostState::Scatter => self.kind.scatter_target(),
            GhostState::Panic | GhostState::Recover => IVec2::new(
                (ctx.rng.next_u32() % SCREEN_TILE_SIZE.x) as i32,
                (ctx.rng.next_u32() % SCREEN_TILE_SIZE.y) as i32,
            ),
            GhostState::Eyes => TileMap::tile_of(DOOR_ENTRY),
            _ => {
                let pacman_tile = TileMap::tile_of(ctx.pacman_pos);
                match self.kind {
                    GhostType::Blinky => pacman_tile,
                    GhostType::Pinky => pacman_tile + ctx.pacman_dir.as_ivec2() * 4,
                    GhostType::Inky => {
                        let pivot = pacman_tile + ctx.pacman_dir.as_ivec2() * 2;
                        pivot * 2 - ctx.blinky_tile
                    }
                    GhostType::Clyde => {
                        if (pacman_tile - self.actor.tile).length_squared() > 64 {
                            pacman_tile
                        } else {
                            self.kind.scatter_target()
                        }
                    }
                }
            }
        }
    }

    /// Picks the legal non-reversing neighbor closest to `target`. Ties keep
    /// the earliest candidate in [`DECISION_ORDER`].
    fn choose_direction(&mut self, map: &TileMap, target: IVec2) {
        let opposite = self.actor.dir.opposite();
        let through_door = self.state.passes_door();
        let mut best: Option<(Direction, i32)> = None;

        for dir in DECISION_ORDER {
            if dir == opposite {
                continue;
            }
            let next = self.actor.tile + dir.as_ivec2();
            // Horizontal out-of-grid means the tunnel and stays a candidate.
            if next.x >= 0 && next.x < SCREEN_TILE_SIZE.x as i32 {
                let blocked = match map.cell_at(next) {
                    CellKind::Wall => true,
                    CellKind::Door => !through_door,
                    _ => false,
                };
                if blocked {
                    continue;
                }
            }
            let score = (next - target).length_squared();
            if best.is_none_or(|(_, s)| score < s) {
                best = Some((dir, score));
            }
        }

        match best {
            Some((dir, _)) if dir != self.actor.dir => {
                self.actor.face(dir);
                self.actor.snap_cross_axis();
            }
            Some(_) => {}
            None => {
                // Every junction in the maze has a non-reversing exit.
                debug_assert!(false, "no legal direction at {:?}", self.actor.tile);
            }
        }
    }

    /// Direct steering through the house geometry, ignoring tile collision:
    /// down through the door to the slot, or out of the slot up to the door.
    fn steer_home(&mut self, ctx: &GhostCtx) {
        let multiplier = match self.state {
            GhostState::EnterHome => ctx.level.ghost_eyes_speed,
            _ => ctx.level.ghost_home_speed,
        };
        self.actor.set_speed(GHOST_SPEED * multiplier);
        let step = self.actor.speed() * ctx.dt;
        let slot = self.kind.home_slot();
        let pos = &mut self.actor.pos;

        match self.state {
            GhostState::EnterHome => {
                if (pos.y - slot.y).abs() > step {
                    pos.x = DOOR_ENTRY.x;
                    pos.y += step;
                    self.actor.dir = Direction::Down;
                } else {
                    pos.y = slot.y;
                    let dx = slot.x - pos.x;
                    if dx.abs() > step {
                        pos.x += step * dx.signum();
                        self.actor.dir = if dx < 0.0 { Direction::Left } else { Direction::Right };
                    } else {
                        pos.x = slot.x;
                    }
                }
            }
            _ => {
                let dx = DOOR_ENTRY.x - pos.x;
                if dx.abs() > step {
                    pos.y = slot.y;
                    pos.x += step * dx.signum();
                    self.actor.dir = if dx < 0.0 { Direction::Left } else { Direction::Right };
                } else {
                    pos.x = DOOR_ENTRY.x;
                    if (pos.y - DOOR_ENTRY.y).abs() > step {
                        pos.y -= step;
                        self.actor.dir = Direction::Up;
                    } else {
                        pos.y = DOOR_ENTRY.y;
                    }
                }
            }
        }

        self.actor.tile = TileMap::tile_of(self.actor.pos);
    }

    fn speed_multiplier(&self, ctx: &GhostCtx) -> f32 {
        let level = ctx.level;
        match self.state {
            GhostState::Panic | GhostState::Recover => level.ghost_panic_speed,
            GhostState::Eyes | GhostState::EnterHome => level.ghost_eyes_speed,
            GhostState::Home | GhostState::LeaveHome => level.ghost_home_speed,
            GhostState::Eaten => 0.0,
            GhostState::Scatter | GhostState::Chase => {
                if self.actor.tile.y == TUNNEL_ROW {
                    level.ghost_tunnel_speed
                } else {
                    let mut multiplier = level.ghost_speed;
                    if self.kind == GhostType::Blinky {
                        if ctx.dots_remaining <= level.elroy2_dots {
                            multiplier += 2.0 * level.elroy_bonus;
                        } else if ctx.dots_remaining <= level.elroy_dots {
                            multiplier += level.elroy_bonus;
                        }
                    }
                    multiplier
                }
            }
        }
    }

    /// Side effects of a state change: the forced reversal that unsticks the
    /// ghost (never on entering recover, never coming out of the house flow)
    /// and the cross-axis realignment for the new heading.
    fn apply_state_change(&mut self, old: GhostState) {
        debug!(ghost = %self.kind, from = %old, to = %self.state, "ghost state change");
        match self.state {
            GhostState::Scatter | GhostState::Chase | GhostState::Panic
                if !old.in_home_flow() =>
            {
                self.actor.face(self.actor.dir.opposite());
                self.actor.snap_cross_axis();
            }
            GhostState::EnterHome => {
                self.actor.pos.x = DOOR_ENTRY.x;
                self.actor.face(Direction::Down);
            }
            _ => {}
        }
    }

    fn refresh_anim(&mut self) {
        let kind = match self.state {
            GhostState::Panic => GhostAnim::Panic,
            GhostState::Recover => GhostAnim::Recover,
            GhostState::Eyes | GhostState::EnterHome => GhostAnim::Eyes(self.actor.dir),
            GhostState::Eaten => GhostAnim::Score(self.score_index),
            _ => GhostAnim::Moving(self.actor.dir),
        };
        if kind != self.anim_kind {
            self.anim_kind = kind;
            self.anim = kind.animation();
        }
    }
}
