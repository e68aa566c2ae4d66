//! Rating formulas
//!
//! influence(rater)   = 0.1 + 1.1 * sqrt(rater / max)          range [0.1, 1.2]
//! difficulty(target) = max(0.12, 1 - (target / max)^3)
//! change             = base * influence * type_mult * direction * difficulty
//! decay              = neutral + (old - neutral) * exp(-ln2 / max(1, half_life) * days)

/// Lowest influence any rater keeps
pub const MIN_INFLUENCE: f64 = 0.1;
/// Floor of the difficulty modifier near the top of the scale
pub const MIN_DIFFICULTY: f64 = 0.12;

/// Weight of a rater's feedback, increasing with the rater's own rating
pub fn influence_weight(rater_rating: f64, max_rating: f64) -> f64 {
    let norm = (rater_rating / max_rating).max(0.0);
    MIN_INFLUENCE + 1.1 * norm.sqrt()
}

/// Damping applied to a target's rating change, shrinking as the target nears the max
pub fn difficulty_modifier(target_rating: f64, max_rating: f64) -> f64 {
    let frac = target_rating / max_rating;
    (1.0 - frac.powi(3)).max(MIN_DIFFICULTY)
}

/// Signed rating delta for one accepted feedback event
pub fn rating_change(
    base_change: f64,
    influence: f64,
    type_multiplier: f64,
    direction: f64,
    target_rating: f64,
    max_rating: f64,
) -> f64 {
    if direction == 0.0 {
        return 0.0;
    }
    base_change * influence * type_multiplier * direction * difficulty_modifier(target_rating, max_rating)
}

/// Exponential relaxation toward `neutral` after `elapsed_days`
pub fn decay_toward(old_rating: f64, neutral: f64, half_life_days: f64, elapsed_days: f64) -> f64 {
    let k = std::f64::consts::LN_2 / half_life_days.max(1.0);
    neutral + (old_rating - neutral) * (-k * elapsed_days).exp()
}

/// Round to 4 decimal places (history storage)
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
