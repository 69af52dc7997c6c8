//! The game context and tick scheduler.
//!
//! One [`Game`] value owns the entire simulation: map, actors, RNG, timers.
//! [`Game::step`] performs a whole tick — due events first, in a fixed
//! priority order, then Pac-Man, then the ghosts in fixed type order — and
//! everything the renderer or audio player needs is readable between steps.

pub mod events;
pub mod level;

use glam::Vec2;
use smallvec::SmallVec;
use strum::IntoEnumIterator;
use tracing::{debug, info, warn};

use crate::audio::AudioTrigger;
use crate::constants::{
    BONUS_DOT_TRIGGERS, BONUS_LIFETIME_TICKS, BONUS_POSITION, COLLISION_RANGE, DEATH_PAUSE_TICKS,
    DOT_POINTS, GHOST_BASE_POINTS, HIT_STOP_TICKS, INTRO_TICKS, LEVEL_FREEZE_TICKS, OVER_TICKS,
    PILL_POINTS, PRELUDE_TICKS, READY_TICKS, ROUNDS_PER_GAME,
};
use crate::entity::animation::PacManAnim;
use crate::entity::ghost::{Ghost, GhostCtx, GhostType};
use crate::entity::pacman::{PacMan, PacManState};
use crate::error::GameResult;
use crate::input::Buttons;
use crate::map::{CellKind, TileMap};
use crate::rng::Xorshift32;

use events::EventTimer;
use level::{Bonus, Level};

/// The top-level state a session is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum GameState {
    /// Attract screen.
    Intro,
    /// One-tick rebuild of the board and actors.
    Load,
    /// Start jingle playing, actors hidden.
    Prelude,
    /// "READY!" prompt, actors visible and parked.
    Ready,
    /// Normal play.
    InProgress,
    /// Play suspended: hit-stop, death pause, or pellet-exhaustion flash.
    Frozen,
    /// All dots eaten; the board flashes before the next level loads.
    LevelComplete,
    /// A life was lost.
    RoundOver,
    /// No rounds left.
    Over,
    /// Tearing down before looping back to the intro.
    Unload,
}

/// Every deferred one-shot the scheduler owns, one timer per semantic event.
#[derive(Debug, Clone, Copy, Default)]
struct GameEvents {
    /// Over → Unload teardown.
    unload: EventTimer,
    /// Releases the one-tick hit-stop after a ghost is eaten.
    freeze: EventTimer,
    /// The global panic trigger, one tick after a pill is eaten.
    pill_chomp: EventTimer,
    /// Ends the power-pellet period.
    power_end: EventTimer,
    /// Lifts a freeze, or starts the death animation if Pac-Man is caught.
    resume: EventTimer,
    /// Drives the intro/load/prelude/ready chain and round re-entries.
    ready: EventTimer,
    /// Fires when the death sequence has fully played out.
    round_over: EventTimer,
    /// Fires when the pellet-exhaustion freeze has fully played out.
    level_complete: EventTimer,
    /// Expires an uncollected bonus item.
    bonus_timeout: EventTimer,
}

impl GameEvents {
    /// Cancels everything tied to an in-flight round. The ready chain and
    /// the unload timer survive, since they drive the outer flow.
    fn cancel_round(&mut self) {
        self.freeze.cancel();
        self.pill_chomp.cancel();
        self.power_end.cancel();
        self.resume.cancel();
        self.round_over.cancel();
        self.level_complete.cancel();
        self.bonus_timeout.cancel();
    }
}

/// A bonus item currently sitting on the board.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveBonus {
    pub bonus: Bonus,
    pub pos: Vec2,
}

/// The whole simulation.
pub struct Game {
    tick: u64,
    state: GameState,
    score: u32,
    high_score: u32,
    rounds: u32,
    level_number: u32,
    level: Level,
    dots_eaten: u32,
    pub map: TileMap,
    pub pacman: PacMan,
    pub ghosts: SmallVec<[Ghost; 4]>,
    rng: Xorshift32,
    /// Tick at which play last (re)started; anchors the scatter/chase clock.
    round_start: u64,
    /// Ghosts eaten during the current pill activation.
    eaten_ghosts: u8,
    pub bonus: Option<ActiveBonus>,
    events: GameEvents,
    audio: Vec<AudioTrigger>,
    /// Ghost contact is skipped on the exact tick a pill was eaten.
    pill_eaten_this_tick: bool,
}

impl Game {
    /// Builds a session. The seed fixes the shared generator, making ghost
    /// panic trajectories replayable.
    pub fn new(seed: u32) -> GameResult<Self> {
        let level = Level::new(1);
        let map = TileMap::new()?;
        let pacman = PacMan::new(&level);
        let ghosts = GhostType::iter().map(Ghost::new).collect();

        let mut events = GameEvents::default();
        events.ready.schedule_at(INTRO_TICKS);

        Ok(Self {
            tick: 0,
            state: GameState::Intro,
            score: 0,
            high_score: 0,
            rounds: ROUNDS_PER_GAME,
            level_number: 1,
            level,
            dots_eaten: 0,
            map,
            pacman,
            ghosts,
            rng: Xorshift32::new(seed),
            round_start: 0,
            eaten_ghosts: 0,
            bonus: None,
            events,
            audio: Vec::new(),
            pill_eaten_this_tick: false,
        })
    }

    /// Advances one tick: due events in priority order, then Pac-Man, then
    /// the ghosts in fixed type order.
    pub fn step(&mut self, dt: f32, buttons: Buttons) {
        self.tick += 1;
        self.pill_eaten_this_tick = false;

        self.run_scheduler();

        match self.state {
            GameState::InProgress => {
                self.update_pacman(dt, buttons);
                self.update_ghosts(dt);
            }
            GameState::Frozen => {
                // The world holds still; only the death animation advances.
                self.pacman.tick_death();
            }
            _ => {}
        }
    }

    /// Evaluates every due event, in the fixed priority order: unload,
    /// freeze, pill-chomp, play/resume, ready, round-over, level-complete,
    /// pellet exhaustion, bonus, rounds exhausted.
    fn run_scheduler(&mut self) {
        let tick = self.tick;

        if self.state == GameState::Unload {
            self.reset_session();
            self.set_state(GameState::Intro);
            self.events.ready.schedule_after(tick, INTRO_TICKS);
        }
        if self.events.unload.due(tick) {
            self.set_state(GameState::Unload);
        }

        if self.events.freeze.due(tick)
            && self.state == GameState::Frozen
            && self.pacman.state != PacManState::Caught
        {
            self.set_state(GameState::InProgress);
        }

        if self.events.pill_chomp.due(tick) {
            self.apply_pill_chomp();
        }
        if self.events.power_end.due(tick) {
            self.pacman.set_power(false);
            self.audio.push(AudioTrigger::Siren);
        }

        if self.events.resume.due(tick) {
            if self.pacman.state == PacManState::Caught {
                self.pacman.die();
                self.audio.push(AudioTrigger::Death);
            } else if self.state == GameState::Frozen {
                self.set_state(GameState::InProgress);
            }
        }

        if self.events.ready.due(tick) {
            self.advance_ready_chain();
        }

        if self.events.round_over.due(tick) {
            self.set_state(GameState::RoundOver);
            self.rounds = self.rounds.saturating_sub(1);
            if self.rounds == 0 {
                self.set_state(GameState::Over);
                self.events.unload.schedule_after(tick, OVER_TICKS);
            } else {
                self.events.ready.schedule_after(tick, READY_TICKS);
            }
        }

        if self.events.level_complete.due(tick) {
            self.set_state(GameState::LevelComplete);
            self.events.ready.schedule_after(tick, READY_TICKS);
        }

        if self.state == GameState::InProgress && self.map.dots_remaining() == 0 {
            self.set_state(GameState::Frozen);
            self.events
                .level_complete
                .schedule_after(tick, LEVEL_FREEZE_TICKS);
        }

        if self.events.bonus_timeout.due(tick) {
            debug!("bonus expired");
            self.bonus = None;
        }
    }

    /// The shared `ready` timer walks the outer state flow; which edge it
    /// takes depends on the state it fires in.
    fn advance_ready_chain(&mut self) {
        let tick = self.tick;
        match self.state {
            GameState::Intro => {
                self.set_state(GameState::Load);
                self.events.ready.schedule_after(tick, 1);
            }
            GameState::Load => {
                self.load_level();
                self.set_state(GameState::Prelude);
                self.audio.push(AudioTrigger::StartJingle);
                self.events.ready.schedule_after(tick, PRELUDE_TICKS);
            }
            GameState::Prelude => {
                self.set_state(GameState::Ready);
                self.events.ready.schedule_after(tick, READY_TICKS);
            }
            GameState::Ready => {
                self.set_state(GameState::InProgress);
                self.round_start = tick;
                self.audio.push(AudioTrigger::Siren);
            }
            GameState::RoundOver => {
                self.reset_round();
                self.set_state(GameState::Ready);
                self.events.ready.schedule_after(tick, READY_TICKS);
            }
            GameState::LevelComplete => {
                self.level_up();
                self.set_state(GameState::Ready);
                self.events.ready.schedule_after(tick, READY_TICKS);
            }
            other => warn!(state = %other, "ready event fired in unexpected state"),
        }
    }

    /// The global panic trigger, one tick after the pill went down.
    fn apply_pill_chomp(&mut self) {
        let tick = self.tick;
        debug!(tick, "pill chomp");
        self.eaten_ghosts = 0;
        for ghost in self.ghosts.iter_mut() {
            ghost.enter_panic(tick, &self.level);
        }
        if self.level.panic_ticks > 0 {
            self.pacman.set_power(true);
            self.events
                .power_end
                .schedule_after(tick, self.level.panic_ticks);
            self.audio.push(AudioTrigger::PowerPellet);
        }
    }

    fn update_pacman(&mut self, dt: f32, buttons: Buttons) {
        let eaten = self.pacman.update(&mut self.map, &self.level, buttons, dt);
        match eaten {
            Some(CellKind::Dot) => {
                self.dots_eaten += 1;
                self.add_score(DOT_POINTS);
                self.audio.push(AudioTrigger::DotEaten);
            }
            Some(CellKind::Pill) => {
                self.dots_eaten += 1;
                self.add_score(PILL_POINTS);
                self.events.pill_chomp.schedule_after(self.tick, 1);
                self.pill_eaten_this_tick = true;
                self.audio.push(AudioTrigger::PillEaten);
            }
            _ => {}
        }

        if eaten.is_some() && BONUS_DOT_TRIGGERS.contains(&self.dots_eaten) {
            self.bonus = Some(ActiveBonus {
                bonus: self.level.bonus,
                pos: BONUS_POSITION,
            });
            self.events
                .bonus_timeout
                .schedule_after(self.tick, BONUS_LIFETIME_TICKS);
            debug!(kind = ?self.level.bonus.kind, "bonus spawned");
        }

        // Bonus pickup uses the same in-range pattern as dot consumption.
        if let Some(active) = self.bonus {
            if self.pacman.touches(active.pos, self.pacman.pickup_range(dt)) {
                self.add_score(active.bonus.points);
                self.audio.push(AudioTrigger::BonusCollected);
                self.bonus = None;
                self.events.bonus_timeout.cancel();
            }
        }
    }

    fn update_ghosts(&mut self, dt: f32) {
        let blinky_tile = self.ghosts[0].actor.tile;
        let pacman_pos = self.pacman.actor.pos;
        let pacman_dir = self.pacman.actor.dir;
        let elapsed = self.tick.saturating_sub(self.round_start);
        let dots_remaining = self.map.dots_remaining();

        for index in 0..self.ghosts.len() {
            let mut ctx = GhostCtx {
                map: &self.map,
                level: &self.level,
                rng: &mut self.rng,
                tick: self.tick,
                elapsed,
                pacman_pos,
                pacman_dir,
                blinky_tile,
                dots_eaten: self.dots_eaten,
                dots_remaining,
                dt,
            };
            self.ghosts[index].update(&mut ctx);
            self.check_ghost_contact(index);
            // A hit-stop or a catch freezes the rest of the pack mid-tick.
            if self.state != GameState::InProgress {
                break;
            }
        }
    }

    /// Pac-Man versus one ghost: frightened ghosts are eaten, returning and
    /// housed ghosts pass through, everything else catches Pac-Man.
    fn check_ghost_contact(&mut self, index: usize) {
        if self.pill_eaten_this_tick {
            return;
        }
        if matches!(self.pacman.state, PacManState::Caught | PacManState::Dead) {
            return;
        }
        if !self
            .pacman
            .touches(self.ghosts[index].actor.pos, COLLISION_RANGE)
        {
            return;
        }

        let state = self.ghosts[index].state;
        if state.is_frightened() {
            let rank = self.eaten_ghosts.min(3);
            self.add_score(GHOST_BASE_POINTS << rank);
            self.ghosts[index].eaten(self.tick, rank);
            self.eaten_ghosts = self.eaten_ghosts.saturating_add(1);
            self.audio.push(AudioTrigger::GhostEaten);
            self.audio.push(AudioTrigger::EyesReturning);
            self.set_state(GameState::Frozen);
            self.events.freeze.schedule_after(self.tick, HIT_STOP_TICKS);
        } else if !state.in_home_flow() {
            self.pacman.catch();
            self.set_state(GameState::Frozen);
            self.events
                .resume
                .schedule_after(self.tick, DEATH_PAUSE_TICKS);
            let death_ticks = PacManAnim::Death.animation().duration_ticks();
            self.events
                .round_over
                .schedule_after(self.tick, DEATH_PAUSE_TICKS + death_ticks);
        }
    }

    fn add_score(&mut self, points: u32) {
        self.score += points;
        self.high_score = self.high_score.max(self.score);
    }

    fn set_state(&mut self, next: GameState) {
        if self.state != next {
            info!(from = %self.state, to = %next, "game state");
            self.state = next;
        }
    }

    /// Rebuilds the board and actors for the current level.
    fn load_level(&mut self) {
        self.map.reset();
        self.dots_eaten = 0;
        self.reset_round();
    }

    /// Parks every actor back at its spawn. The board is untouched: eaten
    /// dots stay eaten across a lost life.
    fn reset_round(&mut self) {
        self.pacman.reset(&self.level);
        for ghost in self.ghosts.iter_mut() {
            ghost.reset();
        }
        self.bonus = None;
        self.eaten_ghosts = 0;
        self.events.cancel_round();
    }

    fn level_up(&mut self) {
        self.level_number += 1;
        self.level = Level::new(self.level_number);
        info!(level = self.level_number, "level up");
        self.map.reset();
        self.dots_eaten = 0;
        self.reset_round();
    }

    /// Full teardown on the Unload → Intro loop-back. The high score is the
    /// only survivor.
    fn reset_session(&mut self) {
        info!(score = self.score, high_score = self.high_score, "session unloaded");
        self.score = 0;
        self.rounds = ROUNDS_PER_GAME;
        self.level_number = 1;
        self.level = Level::new(1);
        self.map.reset();
        self.dots_eaten = 0;
        self.reset_round();
    }

    // HUD and renderer accessors.

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn rounds_remaining(&self) -> u32 {
        self.rounds
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn dots_remaining(&self) -> u32 {
        self.map.dots_remaining()
    }

    /// Drains the audio trigger points emitted since the last call.
    pub fn take_audio_triggers(&mut self) -> Vec<AudioTrigger> {
        std::mem::take(&mut self.audio)
    }
}
