//! Scoring module - line clears, T-spins, combos and back-to-back
//!
//! Rules:
//! - T-spin locks score from the T-spin tables instead of the line-clear table.
//! - A perfect clear adds a flat bonus on top of whatever the lock already scored.
//! - B2B applies a 3/2 multiplier to the clear points (before combo bonus).
//! - Combo bonus is `COMBO_BASE * (combo - 1)` and only paid when rows were cleared.

use serde::Serialize;

use crate::types::{
    TSpinKind, B2B_DENOMINATOR, B2B_NUMERATOR, COMBO_BASE, HARD_DROP_POINTS, LINE_SCORES,
    PERFECT_CLEAR_BONUS, SOFT_DROP_POINTS, TSPIN_MINI_SCORES, TSPIN_SCORES,
};

fn table_lookup(table: &[u32], lines: u32) -> u32 {
    let idx = (lines as usize).min(table.len() - 1);
    table[idx]
}

/// Base points for a lock, by T-spin classification and rows cleared.
pub fn base_points(lines: u32, tspin: TSpinKind) -> u32 {
    match tspin {
        TSpinKind::Full => table_lookup(&TSPIN_SCORES, lines),
        TSpinKind::Mini => table_lookup(&TSPIN_MINI_SCORES, lines),
        TSpinKind::None => table_lookup(&LINE_SCORES, lines),
    }
}

/// Difficult clears keep (and grow) a back-to-back chain.
///
/// Tetris, any T-spin that cleared rows, or any perfect clear.
pub fn is_difficult(lines: u32, tspin: TSpinKind, perfect_clear: bool) -> bool {
    if lines == 0 {
        return false;
    }
    lines >= 4 || tspin.is_tspin() || perfect_clear
}

/// Apply the B2B multiplier (3/2, floored) to a point value.
pub fn apply_b2b_multiplier(points: u32) -> u32 {
    points.saturating_mul(B2B_NUMERATOR) / B2B_DENOMINATOR
}

/// Combo bonus for the given (already incremented) combo count.
pub fn combo_bonus(combo: u32) -> u32 {
    COMBO_BASE.saturating_mul(combo.saturating_sub(1))
}

/// Drop score: soft drop +1 per row, hard drop +2 per row.
pub fn drop_points(rows: u32, is_hard_drop: bool) -> u32 {
    let per_row = if is_hard_drop {
        HARD_DROP_POINTS
    } else {
        SOFT_DROP_POINTS
    };
    rows.saturating_mul(per_row)
}

/// Breakdown of one scoring lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreResult {
    /// Clear points including perfect clear bonus and B2B multiplier.
    pub clear_points: u32,
    pub combo_bonus: u32,
    pub total: u32,
    pub difficult: bool,
    /// Whether the B2B multiplier was applied to this lock.
    pub b2b_applied: bool,
}

/// Running score, combo and back-to-back state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ScoreState {
    pub score: u32,
    /// 0 means no active combo.
    pub combo: u32,
    pub back_to_back: bool,
    pub back_to_back_count: u32,
}

impl ScoreState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one lock and return what it scored.
    pub fn apply_lock(&mut self, lines: u32, tspin: TSpinKind, perfect_clear: bool) -> ScoreResult {
        let perfect_clear = perfect_clear && lines > 0;
        let mut clear_points = base_points(lines, tspin);
        if perfect_clear {
            clear_points = clear_points.saturating_add(PERFECT_CLEAR_BONUS);
        }

        let difficult = is_difficult(lines, tspin, perfect_clear);
        let mut b2b_applied = false;
        if difficult {
            if self.back_to_back {
                self.back_to_back_count += 1;
                clear_points = apply_b2b_multiplier(clear_points);
                b2b_applied = true;
            } else {
                self.back_to_back = true;
                self.back_to_back_count = 1;
            }
        } else if lines > 0 {
            self.back_to_back = false;
            self.back_to_back_count = 0;
        }

        if lines > 0 || tspin.is_tspin() {
            self.combo += 1;
        } else {
            self.combo = 0;
        }

        let bonus = if lines > 0 { combo_bonus(self.combo) } else { 0 };
        let total = clear_points.saturating_add(bonus);
        self.score = self.score.saturating_add(total);

        ScoreResult {
            clear_points,
            combo_bonus: bonus,
            total,
            difficult,
            b2b_applied,
        }
    }

    /// Add drop points (soft or hard) to the running score.
    pub fn add_drop(&mut self, rows: u32, is_hard_drop: bool) -> u32 {
        let points = drop_points(rows, is_hard_drop);
        self.score = self.score.saturating_add(points);
        points
    }
}
