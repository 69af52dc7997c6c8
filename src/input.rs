//! Held-direction input signal.
//!
//! The core is indifferent to keyboards and gamepads; the embedding layer
//! samples whatever devices it owns once per tick and hands the result over
//! as a set of held-direction bits.

use bitflags::bitflags;

use crate::entity::direction::Direction;

bitflags! {
    /// The four logical direction keys, as held-this-tick bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Buttons: u8 {
        const UP = 1 << 0;
        const DOWN = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
    }
}

impl Buttons {
    /// Resolves the held bits to a desired heading, keeping `current` when
    /// nothing is held. Checked in the order left, right, up, down; the last
    /// held key wins.
    pub fn resolve(self, current: Direction) -> Direction {
        let mut next = current;
        if self.contains(Buttons::LEFT) {
            next = Direction::Left;
        }
        if self.contains(Buttons::RIGHT) {
            next = Direction::Right;
        }
        if self.contains(Buttons::UP) {
            next = Direction::Up;
        }
        if self.contains(Buttons::DOWN) {
            next = Direction::Down;
        }
        next
    }
}

impl From<Direction> for Buttons {
    fn from(dir: Direction) -> Self {
        match dir {
            Direction::Up => Buttons::UP,
            Direction::Down => Buttons::DOWN,
            Direction::Left => Buttons::LEFT,
            Direction::Right => Buttons::RIGHT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_keeps_heading_when_idle() {
        assert_eq!(Buttons::empty().resolve(Direction::Left), Direction::Left);
    }

    #[test]
    fn test_resolve_single_key() {
        assert_eq!(Buttons::UP.resolve(Direction::Left), Direction::Up);
        assert_eq!(Buttons::RIGHT.resolve(Direction::Up), Direction::Right);
    }

    #[test]
    fn test_resolve_order_last_checked_wins() {
        let held = Buttons::LEFT | Buttons::DOWN;
        assert_eq!(held.resolve(Direction::Right), Direction::Down);
    }

    #[test]
    fn test_from_direction() {
        assert_eq!(Buttons::from(Direction::Down), Buttons::DOWN);
    }
}
