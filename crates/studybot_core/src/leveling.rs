//! XP and leveling rules.
//!
//! Each reward tick grants a participant a random award in
//! [`XP_AWARD_RANGE`]. Crossing the threshold for the current level moves
//! the user up exactly one level and carries the remainder forward, even if
//! the award is large enough to cross a second threshold.

use rand::Rng;
use std::ops::RangeInclusive;

/// Inclusive range of the XP granted per participant per reward tick.
pub const XP_AWARD_RANGE: RangeInclusive<i64> = 15..=25;

/// XP needed to advance from `level` to `level + 1`.
///
/// # Examples
///
/// ```
/// use studybot_core::xp_to_next_level;
///
/// assert_eq!(xp_to_next_level(1), 155);
/// assert_eq!(xp_to_next_level(10), 1100);
/// ```
pub fn xp_to_next_level(level: i64) -> i64 {
    5 * level * level + 50 * level + 100
}

/// Draws one reward-tick award.
pub fn roll_award<R: Rng + ?Sized>(rng: &mut R) -> i64 {
    rng.gen_range(XP_AWARD_RANGE)
}

/// Result of applying an award to a user's progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelProgress {
    /// XP within the (possibly new) level
    pub xp: i64,
    /// Level after the award
    pub level: i64,
    /// Whether the award crossed the level threshold
    pub leveled_up: bool,
}

/// Applies a non-negative `award` to a user currently at `xp` within `level`.
///
/// # Examples
///
/// ```
/// use studybot_core::apply_award;
///
/// let progress = apply_award(150, 1, 20);
/// assert!(progress.leveled_up);
/// assert_eq!(progress.level, 2);
/// assert_eq!(progress.xp, 15);
/// ```
pub fn apply_award(xp: i64, level: i64, award: i64) -> LevelProgress {
    let new_xp = xp + award;
    let threshold = xp_to_next_level(level);

    if new_xp >= threshold {
        LevelProgress {
            xp: new_xp - threshold,
            level: level + 1,
            leveled_up: true,
        }
    } else {
        LevelProgress {
            xp: new_xp,
            level,
            leveled_up: false,
        }
    }
}
