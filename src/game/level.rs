//! Per-level difficulty configuration.
//!
//! Everything that ramps with progression — speed percentages, panic
//! duration, Elroy thresholds, the bonus item — is derived from the level
//! ordinal here, so a level-up is a single `Level::new` call.

use crate::constants::TICKS_PER_SECOND;
use crate::entity::animation::GhostAnim;

/// The bonus item kinds, in the order the ladder awards them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BonusKind {
    Cherry,
    Strawberry,
    Orange,
    Apple,
    Melon,
    Galaxian,
    Bell,
    Key,
}

/// A bonus descriptor: what appears and what it pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bonus {
    pub kind: BonusKind,
    pub points: u32,
}

/// Speed multipliers and thresholds for one level.
///
/// Multipliers scale the base speeds in [`constants`](crate::constants);
/// the percentages follow the arcade difficulty ramp.
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    pub number: u32,

    /// Pac-Man multiplier on open corridor.
    pub pacman_speed: f32,
    /// Pac-Man multiplier while the current tile holds a dot or pill.
    pub pacman_eating_speed: f32,
    /// Pac-Man multiplier while a power pill is active.
    pub pacman_speeding_speed: f32,
    /// Pac-Man multiplier while speeding over a dot or pill.
    pub pacman_speeding_eating_speed: f32,

    /// Ghost multiplier in scatter/chase.
    pub ghost_speed: f32,
    /// Ghost multiplier during panic/recover.
    pub ghost_panic_speed: f32,
    /// Ghost multiplier while inside the tunnel row.
    pub ghost_tunnel_speed: f32,
    /// Ghost multiplier while idling in or leaving the house.
    pub ghost_home_speed: f32,
    /// Ghost multiplier for eyes heading home.
    pub ghost_eyes_speed: f32,

    /// How long panic lasts, in ticks. Zero disables panic entirely.
    pub panic_ticks: u64,
    /// Recover flashes announcing the end of panic.
    pub flash_count: u32,

    /// Dots remaining that trigger Blinky's first speed-up.
    pub elroy_dots: u32,
    /// Dots remaining that trigger Blinky's second speed-up.
    pub elroy2_dots: u32,
    /// Additive multiplier bonus for each Elroy stage.
    pub elroy_bonus: f32,

    pub bonus: Bonus,
}

impl Level {
    pub fn new(number: u32) -> Self {
        let number = number.max(1);

        let (pacman_speed, pacman_eating_speed) = match number {
            1 => (0.80, 0.71),
            2..=4 => (0.90, 0.79),
            5..=20 => (1.00, 0.87),
            _ => (0.90, 0.79),
        };
        let (pacman_speeding_speed, pacman_speeding_eating_speed) = match number {
            1 => (0.90, 0.79),
            2..=4 => (0.95, 0.83),
            _ => (1.00, 0.87),
        };
        let (ghost_speed, ghost_panic_speed, ghost_tunnel_speed) = match number {
            1 => (0.75, 0.50, 0.40),
            2..=4 => (0.85, 0.55, 0.45),
            _ => (0.95, 0.60, 0.50),
        };

        let panic_seconds: u64 = match number {
            1 => 6,
            2 => 5,
            3 => 4,
            4 => 3,
            5 => 2,
            6 => 5,
            7 | 8 => 2,
            9 => 1,
            10 => 5,
            11 => 2,
            12 | 13 => 1,
            14 => 3,
            15 | 16 => 1,
            17 => 0,
            18 => 1,
            _ => 0,
        };
        let flash_count = if number <= 8 { 5 } else { 3 };

        let elroy_dots = (20 + 10 * (number.saturating_sub(1))).min(120);

        Self {
            number,
            pacman_speed,
            pacman_eating_speed,
            pacman_speeding_speed,
            pacman_speeding_eating_speed,
            ghost_speed,
            ghost_panic_speed,
            ghost_tunnel_speed,
            ghost_home_speed: 0.50,
            ghost_eyes_speed: 1.50,
            panic_ticks: panic_seconds * TICKS_PER_SECOND as u64,
            flash_count,
            elroy_dots,
            elroy2_dots: elroy_dots / 2,
            elroy_bonus: 0.05,
            bonus: Self::bonus_for(number),
        }
    }

    fn bonus_for(number: u32) -> Bonus {
        let (kind, points) = match number {
            1 => (BonusKind::Cherry, 100),
            2 => (BonusKind::Strawberry, 300),
            3 | 4 => (BonusKind::Orange, 500),
            5 | 6 => (BonusKind::Apple, 700),
            7 | 8 => (BonusKind::Melon, 1000),
            9 | 10 => (BonusKind::Galaxian, 2000),
            11 | 12 => (BonusKind::Bell, 3000),
            _ => (BonusKind::Key, 5000),
        };
        Bonus { kind, points }
    }

    /// Pac-Man's multiplier for a {speeding, eating} combination.
    pub fn pacman_multiplier(&self, speeding: bool, eating: bool) -> f32 {
        match (speeding, eating) {
            (false, false) => self.pacman_speed,
            (false, true) => self.pacman_eating_speed,
            (true, false) => self.pacman_speeding_speed,
            (true, true) => self.pacman_speeding_eating_speed,
        }
    }

    /// Ticks of one full recover flash, derived from the flash animation.
    pub fn flash_cycle_ticks(&self) -> u64 {
        GhostAnim::Recover.animation().duration_ticks()
    }

    /// Ticks into a panic at which the recover flash begins: the last
    /// `flash_count` flash cycles of the panic duration.
    pub fn recovery_start_ticks(&self) -> u64 {
        self.panic_ticks
            .saturating_sub(self.flash_count as u64 * self.flash_cycle_ticks())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_one_values() {
        let level = Level::new(1);
        assert_eq!(level.panic_ticks, 360);
        assert_eq!(level.flash_count, 5);
        assert_eq!(level.elroy_dots, 20);
        assert_eq!(level.elroy2_dots, 10);
        assert_eq!(level.bonus.kind, BonusKind::Cherry);
        assert_eq!(level.bonus.points, 100);
    }

    #[test]
    fn test_zero_ordinal_is_clamped() {
        assert_eq!(Level::new(0), Level::new(1));
    }

    #[test]
    fn test_recovery_start_inside_panic() {
        let level = Level::new(1);
        assert!(level.recovery_start_ticks() < level.panic_ticks);
        assert_eq!(
            level.panic_ticks - level.recovery_start_ticks(),
            level.flash_count as u64 * level.flash_cycle_ticks()
        );
    }

    #[test]
    fn test_high_levels_drop_panic() {
        assert_eq!(Level::new(30).panic_ticks, 0);
        assert_eq!(Level::new(30).recovery_start_ticks(), 0);
    }

    #[test]
    fn test_bonus_ladder_tops_out_at_key() {
        assert_eq!(Level::new(13).bonus.kind, BonusKind::Key);
        assert_eq!(Level::new(99).bonus.kind, BonusKind::Key);
        assert_eq!(Level::new(99).bonus.points, 5000);
    }

    #[test]
    fn test_speeds_ramp_with_level() {
        assert!(Level::new(5).ghost_speed > Level::new(1).ghost_speed);
        assert!(Level::new(5).pacman_speed > Level::new(1).pacman_speed);
    }

    #[test]
    fn test_pacman_multiplier_table() {
        let level = Level::new(1);
        assert_eq!(level.pacman_multiplier(false, false), 0.80);
        assert_eq!(level.pacman_multiplier(false, true), 0.71);
        assert_eq!(level.pacman_multiplier(true, false), 0.90);
        assert_eq!(level.pacman_multiplier(true, true), 0.79);
    }
}
