use glam::{IVec2, Vec2};
use strum_macros::Display;

/// One of the four cardinal headings an actor can face.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Display)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn as_ivec2(&self) -> IVec2 {
        (*self).into()
    }

    pub fn as_vec2(&self) -> Vec2 {
        self.as_ivec2().as_vec2()
    }

    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}

impl From<Direction> for IVec2 {
    fn from(dir: Direction) -> Self {
        match dir {
            Direction::Up => -IVec2::Y,
            Direction::Down => IVec2::Y,
            Direction::Left => -IVec2::X,
            Direction::Right => IVec2::X,
        }
    }
}

pub const DIRECTIONS: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

/// The order ghosts consider candidate directions at a junction. Ties on
/// target distance keep the earliest entry, so the order is load-bearing.
pub const DECISION_ORDER: [Direction; 4] = [Direction::Up, Direction::Left, Direction::Down, Direction::Right];
