//! Rating engine
//!
//! Pure scoring: a first solve is worth a difficulty-scaled base plus a
//! speed bonus that decays in steps with execution time. The bonus
//! contribution is truncated, not rounded.

use crate::models::Difficulty;

/// Base points per difficulty tier
fn base_points(difficulty: Difficulty) -> i64 {
    match difficulty {
        Difficulty::Cakewalk => 10,
        Difficulty::Easy => 20,
        Difficulty::Medium => 40,
        Difficulty::Hard => 70,
    }
}

/// Maximum speed bonus per difficulty tier
fn max_bonus(difficulty: Difficulty) -> i64 {
    match difficulty {
        Difficulty::Cakewalk => 5,
        Difficulty::Easy => 10,
        Difficulty::Medium => 20,
        Difficulty::Hard => 30,
    }
}

/// Step multiplier applied to the bonus based on execution time
fn speed_multiplier(execution_time_ms: f64) -> f64 {
    if execution_time_ms < 20.0 {
        1.0
    } else if execution_time_ms < 50.0 {
        0.75
    } else if execution_time_ms < 100.0 {
        0.5
    } else {
        0.0
    }
}

/// Rating increase for a first solve.
///
/// A submission with no recorded execution time earns no speed bonus.
pub fn rating_delta(difficulty: Difficulty, execution_time_ms: Option<f64>) -> i64 {
    let bonus = match execution_time_ms {
        Some(ms) => (max_bonus(difficulty) as f64 * speed_multiplier(ms)) as i64,
        None => 0,
    };

    base_points(difficulty) + bonus
}
