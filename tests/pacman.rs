use glam::{IVec2, Vec2};
use pretty_assertions::assert_eq;

use pacman_core::audio::AudioTrigger;
use pacman_core::constants::{DEATH_PAUSE_TICKS, DOOR_ENTRY, PACMAN_SPAWN, TICK_DT};
use pacman_core::entity::direction::Direction;
use pacman_core::entity::pacman::{PacMan, PacManState};
use pacman_core::game::level::Level;
use pacman_core::game::GameState;
use pacman_core::input::Buttons;
use pacman_core::map::{CellKind, TileMap};

mod common;

#[test]
fn test_dots_feed_score_and_audio() {
    let mut game = common::game();
    common::start_playing(&mut game);
    game.take_audio_triggers();

    let mut triggers = Vec::new();
    for _ in 0..150 {
        game.step(TICK_DT, Buttons::LEFT);
        triggers.extend(game.take_audio_triggers());
    }

    assert!(game.score() >= 10);
    assert!(game.dots_remaining() < 244);
    assert!(triggers.contains(&AudioTrigger::DotEaten));
}

#[test]
fn test_dot_pickup_is_range_gated() {
    let mut map = TileMap::new().unwrap();
    let level = Level::new(1);
    let mut pacman = PacMan::new(&level);

    // Start 3 px east of a dot's tile center; the dot must survive until
    // Pac-Man is inside pickup range of the center, never before.
    let dot_tile = IVec2::new(12, 26);
    assert_eq!(map.cell_at(dot_tile), CellKind::Dot);
    pacman.actor.place(Vec2::new(103.0, 212.0), Direction::Left);

    let mut eaten = None;
    for _ in 0..10 {
        eaten = pacman.update(&mut map, &level, Buttons::empty(), TICK_DT);
        if eaten.is_some() {
            break;
        }
        assert_eq!(map.cell_at(dot_tile), CellKind::Dot, "ate out of range");
    }

    assert_eq!(eaten, Some(CellKind::Dot));
    let center = TileMap::tile_center(dot_tile);
    assert!(pacman.actor.pos.distance(center) <= pacman.pickup_range(TICK_DT));
}

#[test]
fn test_pill_pickup_is_range_gated() {
    let mut map = TileMap::new().unwrap();
    let level = Level::new(1);
    let mut pacman = PacMan::new(&level);

    // Pills go through the same proximity gate as dots; neither pickup may
    // fire before Pac-Man reaches the tile center.
    let pill_tile = IVec2::new(1, 26);
    assert_eq!(map.cell_at(pill_tile), CellKind::Pill);
    pacman.actor.place(Vec2::new(16.0, 212.0), Direction::Left);

    let mut eaten = None;
    for _ in 0..12 {
        eaten = pacman.update(&mut map, &level, Buttons::empty(), TICK_DT);
        if eaten.is_some() {
            break;
        }
        assert_eq!(map.cell_at(pill_tile), CellKind::Pill, "ate out of range");
    }

    assert_eq!(eaten, Some(CellKind::Pill));
    let center = TileMap::tile_center(pill_tile);
    assert!(pacman.actor.pos.distance(center) <= pacman.pickup_range(TICK_DT));
}

#[test]
fn test_caught_death_and_round_restart() {
    let mut game = common::game();
    common::start_playing(&mut game);

    // Sit still until a chasing ghost connects.
    let mut caught = false;
    for _ in 0..6000 {
        game.step(TICK_DT, Buttons::empty());
        if game.pacman.state == PacManState::Caught {
            caught = true;
            break;
        }
    }
    assert!(caught, "no ghost ever caught an idle Pac-Man");
    assert_eq!(game.state(), GameState::Frozen);

    // One second later the death animation starts; the world stays frozen.
    common::step_n(&mut game, DEATH_PAUSE_TICKS, Buttons::empty());
    assert_eq!(game.pacman.state, PacManState::Dead);
    assert_eq!(game.state(), GameState::Frozen);

    // The death sequence plays out, a round is deducted, and play restarts
    // from the spawn arrangement.
    let mut restarted = false;
    for _ in 0..400 {
        game.step(TICK_DT, Buttons::empty());
        if game.state() == GameState::InProgress {
            restarted = true;
            break;
        }
    }
    assert!(restarted, "round never restarted after a death");
    assert_eq!(game.rounds_remaining(), 2);
    assert_eq!(game.pacman.actor.pos, PACMAN_SPAWN);
    assert_eq!(game.ghosts[0].actor.pos, DOOR_ENTRY);
}
