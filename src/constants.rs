//! This module contains all the constants used in the game.

use glam::{IVec2, UVec2, Vec2};

/// Simulation ticks per second. A tick and a rendered frame are 1:1.
pub const TICKS_PER_SECOND: u32 = 60;
/// The fixed timestep of one tick, in seconds.
pub const TICK_DT: f32 = 1.0 / TICKS_PER_SECOND as f32;

/// The size of each tile, in pixels.
pub const TILE_SIZE: u32 = 8;
/// The size of the whole screen, in tiles: score rows, the maze, level rows.
pub const SCREEN_TILE_SIZE: UVec2 = UVec2::new(28, 36);
/// Rows reserved above the maze for the score display.
pub const SCORE_TILE_ROWS: u32 = 3;
/// Rows reserved below the maze for the level/lives display.
pub const LEVEL_TILE_ROWS: u32 = 2;
/// The size of the maze itself, in tiles.
pub const MAZE_TILE_SIZE: UVec2 = UVec2::new(28, 31);
/// The size of the back buffer, in pixels.
pub const BACK_BUFFER_SIZE: UVec2 = UVec2::new(
    SCREEN_TILE_SIZE.x * TILE_SIZE,
    SCREEN_TILE_SIZE.y * TILE_SIZE,
);

/// Pac-Man's base movement speed, in pixels per second.
pub const PACMAN_SPEED: f32 = 50.0;
/// The ghosts' base movement speed, in pixels per second.
pub const GHOST_SPEED: f32 = 40.0;
/// How far from a tile center Pac-Man may be for a turn to be accepted, in pixels.
pub const PACMAN_CORNERING_RANGE: f32 = 3.5;
/// How far from a tile center a ghost may be for a turn to be accepted, in pixels.
pub const GHOST_CORNERING_RANGE: f32 = 2.5;

/// Half the drawn size of an actor, in pixels (sprites are 16x16 over 8x8 tiles).
pub const ACTOR_HALF_EXTENT: Vec2 = Vec2::new(8.0, 8.0);
/// Center-to-center distance at which Pac-Man and a ghost collide, in pixels.
pub const COLLISION_RANGE: f32 = 4.0;
/// Added to the per-tick step length when range-checking dot/pill/bonus pickup.
pub const PICKUP_RANGE_PAD: f32 = 0.5;

/// Pac-Man's spawn position, straddling the two tiles below the house.
pub const PACMAN_SPAWN: Vec2 = Vec2::new(112.0, 212.0);
/// The point on the corridor directly outside the house door. Eyes aim here,
/// and ghosts leaving the house surface here.
pub const DOOR_ENTRY: Vec2 = Vec2::new(112.0, 116.0);
/// Where an active bonus item sits, on the corridor below the house.
pub const BONUS_POSITION: Vec2 = Vec2::new(112.0, 164.0);

/// The row of the horizontal wrap-around tunnel, in tiles.
pub const TUNNEL_ROW: i32 = 17;
/// Junction tiles on the tunnel row where vertically-moving ghosts may not
/// turn and must pass straight through.
pub const RED_ZONES: [IVec2; 2] = [IVec2::new(6, TUNNEL_ROW), IVec2::new(21, TUNNEL_ROW)];

/// Cumulative dots eaten before Inky leaves the house.
pub const INKY_RELEASE_DOTS: u32 = 30;
/// Cumulative dots eaten before Clyde leaves the house.
pub const CLYDE_RELEASE_DOTS: u32 = 60;

/// Scatter/chase phase boundaries measured from round start, in ticks:
/// scatter until 7s, chase until 27s, scatter until 34s, chase until 54s,
/// scatter until 61s, chase forever after.
pub const MODE_PHASES: [u64; 5] = [
    7 * TICKS_PER_SECOND as u64,
    27 * TICKS_PER_SECOND as u64,
    34 * TICKS_PER_SECOND as u64,
    54 * TICKS_PER_SECOND as u64,
    61 * TICKS_PER_SECOND as u64,
];

/// Lives per game session.
pub const ROUNDS_PER_GAME: u32 = 3;
/// Cumulative-dot counts at which a bonus item appears.
pub const BONUS_DOT_TRIGGERS: [u32; 2] = [70, 170];
/// How long a bonus item stays on the board, in ticks.
pub const BONUS_LIFETIME_TICKS: u64 = 10 * TICKS_PER_SECOND as u64;

/// Attract-screen dwell before a session loads.
pub const INTRO_TICKS: u64 = 2 * TICKS_PER_SECOND as u64;
/// Start-jingle dwell between loading and the ready prompt.
pub const PRELUDE_TICKS: u64 = 2 * TICKS_PER_SECOND as u64;
/// Ready-prompt dwell before play begins (also used between rounds).
pub const READY_TICKS: u64 = TICKS_PER_SECOND as u64;
/// Gameplay freeze between Pac-Man being caught and his death animation.
pub const DEATH_PAUSE_TICKS: u64 = TICKS_PER_SECOND as u64;
/// Delay between a ghost being eaten and it turning into eyes.
pub const EYES_DELAY_TICKS: u64 = TICKS_PER_SECOND as u64;
/// Hit-stop after eating a ghost.
pub const HIT_STOP_TICKS: u64 = 1;
/// Freeze between the last dot and the level-complete flash.
pub const LEVEL_FREEZE_TICKS: u64 = TICKS_PER_SECOND as u64;
/// Game-over linger before the session unloads back to the intro.
pub const OVER_TICKS: u64 = 3 * TICKS_PER_SECOND as u64;

/// Points for a dot.
pub const DOT_POINTS: u32 = 10;
/// Points for a power pill.
pub const PILL_POINTS: u32 = 50;
/// Points for the first ghost of a pill activation; doubles per ghost after.
pub const GHOST_BASE_POINTS: u32 = 200;

/// The raw layout of the maze, as rows of characters. The maze occupies the
/// screen rows between the score and level displays; see [`SCORE_TILE_ROWS`].
///
/// `#` wall, `.` dot, `o` power pill, `=` house door, `T` tunnel mouth,
/// space empty.
pub const RAW_BOARD: [&str; MAZE_TILE_SIZE.y as usize] = [
    "############################",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#o####.#####.##.#####.####o#",
    "#.####.#####.##.#####.####.#",
    "#..........................#",
    "#.####.##.########.##.####.#",
    "#.####.##.########.##.####.#",
    "#......##....##....##......#",
    "######.##### ## #####.######",
    "     #.##### ## #####.#     ",
    "     #.##          ##.#     ",
    "     #.## ###==### ##.#     ",
    "######.## #      # ##.######",
    "T     .   #      #   .     T",
    "######.## #      # ##.######",
    "     #.## ######## ##.#     ",
    "     #.##          ##.#     ",
    "     #.## ######## ##.#     ",
    "######.## ######## ##.######",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#.####.#####.##.#####.####.#",
    "#o..##.......  .......##..o#",
    "###.##.##.########.##.##.###",
    "###.##.##.########.##.##.###",
    "#......##....##....##......#",
    "#.##########.##.##########.#",
    "#.##########.##.##########.#",
    "#..........................#",
    "############################",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_timing() {
        assert_eq!(TICKS_PER_SECOND, 60);
        assert!((TICK_DT - 1.0 / 60.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_screen_geometry() {
        assert_eq!(TILE_SIZE, 8);
        assert_eq!(SCREEN_TILE_SIZE, UVec2::new(28, 36));
        assert_eq!(
            SCREEN_TILE_SIZE.y,
            SCORE_TILE_ROWS + MAZE_TILE_SIZE.y + LEVEL_TILE_ROWS
        );
        assert_eq!(BACK_BUFFER_SIZE, UVec2::new(224, 288));
    }

    #[test]
    fn test_raw_board_dimensions() {
        assert_eq!(RAW_BOARD.len(), MAZE_TILE_SIZE.y as usize);
        for row in RAW_BOARD.iter() {
            assert_eq!(row.len(), MAZE_TILE_SIZE.x as usize);
        }
    }

    #[test]
    fn test_raw_board_boundaries() {
        // First and last maze rows are solid walls
        assert!(RAW_BOARD[0].chars().all(|c| c == '#'));
        assert!(RAW_BOARD[RAW_BOARD.len() - 1].chars().all(|c| c == '#'));
    }

    #[test]
    fn test_raw_board_tunnel_row() {
        let row = RAW_BOARD[(TUNNEL_ROW - SCORE_TILE_ROWS as i32) as usize];
        assert_eq!(row.chars().next().unwrap(), 'T');
        assert_eq!(row.chars().last().unwrap(), 'T');
    }

    #[test]
    fn test_raw_board_power_pills() {
        let pills: usize = RAW_BOARD
            .iter()
            .map(|row| row.chars().filter(|&c| c == 'o').count())
            .sum();
        assert_eq!(pills, 4);
    }

    #[test]
    fn test_raw_board_door() {
        let doors: usize = RAW_BOARD
            .iter()
            .map(|row| row.chars().filter(|&c| c == '=').count())
            .sum();
        assert_eq!(doors, 2);
    }

    #[test]
    fn test_mode_phase_table_is_monotonic() {
        for pair in MODE_PHASES.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_spawn_points_inside_back_buffer() {
        for pos in [PACMAN_SPAWN, DOOR_ENTRY, BONUS_POSITION] {
            assert!(pos.x >= 0.0 && pos.x < BACK_BUFFER_SIZE.x as f32);
            assert!(pos.y >= 0.0 && pos.y < BACK_BUFFER_SIZE.y as f32);
        }
    }
}
