//! Reward shaping for the bandit opponent

use crate::combat::CombatOutcome;

/// Bonus for landing a critical hit.
const CRITICAL_BONUS: f64 = 5.0;

/// Raw score is divided by this before clamping.
const NORMALIZER: f64 = 50.0;

/// Turn an exchange into a reward in `[0, 1]`.
///
/// `outcome` must be expressed from the learner's point of view and
/// `health_after` is the learner's own health once damage is applied.
/// Dealing damage, landing criticals and staying healthy all push the
/// reward up; taking damage pulls it down.
pub fn shape(outcome: &CombatOutcome, health_after: f64) -> f64 {
    let mut raw = 0.5 * outcome.actor_damage_dealt - 0.5 * outcome.actor_damage_taken;

    if outcome.was_critical && outcome.actor_damage_dealt > 0.0 {
        raw += CRITICAL_BONUS;
    }

    raw += 0.1 * health_after;

    (raw / NORMALIZER).clamp(0.0, 1.0)
}
