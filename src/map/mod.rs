//! This module defines the tile map and provides functions for interacting with it.

use glam::{IVec2, Vec2};
use tracing::debug;

use crate::constants::{MAZE_TILE_SIZE, RAW_BOARD, SCORE_TILE_ROWS, SCREEN_TILE_SIZE, TILE_SIZE};
use crate::error::{GameResult, ParseError};

const WIDTH: usize = SCREEN_TILE_SIZE.x as usize;
const HEIGHT: usize = SCREEN_TILE_SIZE.y as usize;

/// What a single map cell holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    /// Nothing; actors pass freely.
    Empty,
    /// A wall; no actor may enter.
    Wall,
    /// A dot Pac-Man can eat.
    Dot,
    /// A power pill.
    Pill,
    /// The ghost-house door: passable only for ghosts moving home or out.
    Door,
}

/// The tile grid covering the whole back buffer.
///
/// Cells are indexed `[x][y]`. The grid keeps a copy of the parsed master
/// layout so a round or level reset can restore every eaten dot.
pub struct TileMap {
    current: Box<[[CellKind; HEIGHT]; WIDTH]>,
    master: Box<[[CellKind; HEIGHT]; WIDTH]>,
    dots: u32,
    pills: u32,
}

impl TileMap {
    /// Builds the map from the standard layout.
    pub fn new() -> GameResult<Self> {
        Self::from_layout(&RAW_BOARD)
    }

    /// Builds a map from a raw maze layout, validating geometry as the rows
    /// are consumed. The maze is placed below the score rows; everything
    /// outside it is empty.
    pub fn from_layout(raw: &[&str]) -> GameResult<Self> {
        if raw.len() != MAZE_TILE_SIZE.y as usize {
            return Err(ParseError::InvalidRowCount {
                expected: MAZE_TILE_SIZE.y as usize,
                found: raw.len(),
            }
            .into());
        }

        let mut cells = Box::new([[CellKind::Empty; HEIGHT]; WIDTH]);
        let mut doors = 0usize;

        for (row, line) in raw.iter().enumerate() {
            if line.len() != MAZE_TILE_SIZE.x as usize {
                return Err(ParseError::InvalidRowLength {
                    row,
                    expected: MAZE_TILE_SIZE.x as usize,
                    found: line.len(),
                }
                .into());
            }

            for (x, character) in line.chars().enumerate() {
                let kind = match character {
                    '#' => CellKind::Wall,
                    '.' => CellKind::Dot,
                    'o' => CellKind::Pill,
                    '=' => CellKind::Door,
                    // Tunnel mouths are ordinary empty cells; the wrap itself
                    // happens outside the grid.
                    ' ' | 'T' => CellKind::Empty,
                    other => return Err(ParseError::UnknownCharacter(other).into()),
                };
                if kind == CellKind::Door {
                    doors += 1;
                }
                cells[x][row + SCORE_TILE_ROWS as usize] = kind;
            }
        }

        if doors != 2 {
            return Err(ParseError::InvalidDoorCount(doors).into());
        }

        let mut map = Self {
            current: cells.clone(),
            master: cells,
            dots: 0,
            pills: 0,
        };
        map.recount();
        Ok(map)
    }

    /// Restores the master layout, bringing back every eaten dot and pill.
    pub fn reset(&mut self) {
        self.current = self.master.clone();
        self.recount();
        debug!(dots = self.dots, pills = self.pills, "tile map reset");
    }

    fn recount(&mut self) {
        self.dots = 0;
        self.pills = 0;
        for col in self.current.iter() {
            for cell in col.iter() {
                match cell {
                    CellKind::Dot => self.dots += 1,
                    CellKind::Pill => self.pills += 1,
                    _ => {}
                }
            }
        }
    }

    /// Returns the cell at the given tile. Out-of-bounds tiles read as walls;
    /// the horizontal tunnel exemption is the caller's concern.
    pub fn cell_at(&self, tile: IVec2) -> CellKind {
        if tile.x < 0 || tile.y < 0 || tile.x >= WIDTH as i32 || tile.y >= HEIGHT as i32 {
            return CellKind::Wall;
        }
        self.current[tile.x as usize][tile.y as usize]
    }

    /// Overwrites the cell at the given tile. Out-of-bounds writes are ignored.
    pub fn set_cell(&mut self, tile: IVec2, kind: CellKind) {
        if tile.x < 0 || tile.y < 0 || tile.x >= WIDTH as i32 || tile.y >= HEIGHT as i32 {
            debug_assert!(false, "set_cell out of bounds: {tile}");
            return;
        }
        self.current[tile.x as usize][tile.y as usize] = kind;
    }

    /// Consumes the dot or pill at the given tile, returning what was eaten.
    pub fn eat(&mut self, tile: IVec2) -> Option<CellKind> {
        match self.cell_at(tile) {
            kind @ CellKind::Dot => {
                self.set_cell(tile, CellKind::Empty);
                self.dots -= 1;
                Some(kind)
            }
            kind @ CellKind::Pill => {
                self.set_cell(tile, CellKind::Empty);
                self.pills -= 1;
                Some(kind)
            }
            _ => None,
        }
    }

    /// Dots and pills still on the board.
    pub fn dots_remaining(&self) -> u32 {
        self.dots + self.pills
    }

    /// The tile containing a pixel position.
    pub fn tile_of(pos: Vec2) -> IVec2 {
        IVec2::new(
            (pos.x / TILE_SIZE as f32) as i32,
            (pos.y / TILE_SIZE as f32) as i32,
        )
    }

    /// The pixel position of a tile's center.
    pub fn tile_center(tile: IVec2) -> Vec2 {
        (tile.as_vec2() + 0.5) * TILE_SIZE as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{DOOR_ENTRY, PACMAN_SPAWN};

    #[test]
    fn test_standard_layout_census() {
        let map = TileMap::new().unwrap();
        assert_eq!(map.dots_remaining(), 244);
    }

    #[test]
    fn test_score_rows_are_empty() {
        let map = TileMap::new().unwrap();
        for x in 0..SCREEN_TILE_SIZE.x as i32 {
            for y in 0..SCORE_TILE_ROWS as i32 {
                assert_eq!(map.cell_at(IVec2::new(x, y)), CellKind::Empty);
            }
        }
    }

    #[test]
    fn test_eat_clears_cell_and_counts() {
        let mut map = TileMap::new().unwrap();
        // Top-left corridor cell holds a dot.
        let tile = IVec2::new(1, 4);
        assert_eq!(map.cell_at(tile), CellKind::Dot);
        assert_eq!(map.eat(tile), Some(CellKind::Dot));
        assert_eq!(map.cell_at(tile), CellKind::Empty);
        assert_eq!(map.eat(tile), None);
        assert_eq!(map.dots_remaining(), 243);
    }

    #[test]
    fn test_reset_restores_master_layout() {
        let mut map = TileMap::new().unwrap();
        map.eat(IVec2::new(1, 4));
        map.reset();
        assert_eq!(map.cell_at(IVec2::new(1, 4)), CellKind::Dot);
        assert_eq!(map.dots_remaining(), 244);
    }

    #[test]
    fn test_out_of_bounds_reads_as_wall() {
        let map = TileMap::new().unwrap();
        assert_eq!(map.cell_at(IVec2::new(-1, 17)), CellKind::Wall);
        assert_eq!(map.cell_at(IVec2::new(28, 17)), CellKind::Wall);
        assert_eq!(map.cell_at(IVec2::new(0, 36)), CellKind::Wall);
    }

    #[test]
    fn test_door_cells() {
        let map = TileMap::new().unwrap();
        assert_eq!(map.cell_at(IVec2::new(13, 15)), CellKind::Door);
        assert_eq!(map.cell_at(IVec2::new(14, 15)), CellKind::Door);
    }

    #[test]
    fn test_tile_conversions() {
        assert_eq!(TileMap::tile_of(PACMAN_SPAWN), IVec2::new(14, 26));
        assert_eq!(TileMap::tile_of(DOOR_ENTRY), IVec2::new(14, 14));
        assert_eq!(TileMap::tile_center(IVec2::new(0, 0)), Vec2::new(4.0, 4.0));
        assert_eq!(
            TileMap::tile_center(IVec2::new(14, 26)),
            Vec2::new(116.0, 212.0)
        );
    }

    #[test]
    fn test_rejects_bad_row_count() {
        let result = TileMap::from_layout(&["####"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_unknown_character() {
        let mut rows = RAW_BOARD;
        rows[1] = "#...........?##............#";
        assert!(TileMap::from_layout(&rows).is_err());
    }
}
