//! Shared helpers for the integration suites.
#![allow(dead_code)]

use pacman_core::constants::TICK_DT;
use pacman_core::game::{Game, GameState};
use pacman_core::input::Buttons;
use pacman_core::map::TileMap;

/// Fixed seed so ghost panic wander replays identically across runs.
pub const SEED: u32 = 0xC0FF_EE00;

/// Installs a subscriber so `RUST_LOG=pacman_core=debug cargo test` shows the
/// simulation's tracing output. Safe to call from every test.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn game() -> Game {
    init_tracing();
    Game::new(SEED).expect("standard layout parses")
}

pub fn step_n(game: &mut Game, ticks: u64, buttons: Buttons) {
    for _ in 0..ticks {
        game.step(TICK_DT, buttons);
    }
}

/// Steps through the intro/load/prelude/ready chain until play begins.
pub fn start_playing(game: &mut Game) {
    for _ in 0..1000 {
        if game.state() == GameState::InProgress {
            return;
        }
        game.step(TICK_DT, Buttons::empty());
    }
    panic!("game never reached InProgress");
}

/// A board that is solid wall except for one empty corridor across row 10
/// (screen row 13, center y = 108) and the door pair the parser insists on.
pub fn corridor_rows() -> Vec<String> {
    let mut rows: Vec<String> = std::iter::repeat("############################".to_string())
        .take(31)
        .collect();
    rows[10] = "#                          #".to_string();
    rows[20] = "#############==#############".to_string();
    rows
}

pub fn corridor_map() -> TileMap {
    let rows = corridor_rows();
    let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
    TileMap::from_layout(&refs).expect("corridor layout parses")
}

/// The corridor board plus a vertical branch descending into it at column 14
/// (junction tile (14, 13), center x = 116).
pub fn junction_map() -> TileMap {
    let mut rows = corridor_rows();
    for row in 4..10 {
        rows[row].replace_range(14..15, " ");
    }
    let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
    TileMap::from_layout(&refs).expect("junction layout parses")
}
