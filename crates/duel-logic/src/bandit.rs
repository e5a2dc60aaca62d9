//! UCB1 bandit opponent
//!
//! Each [`Action`] is an arm. Every arm is pulled once in index order before
//! scoring kicks in; after that the arm with the highest
//! `value + c * sqrt(ln(N) / n)` wins, ties going to the lowest index.

use serde::{Deserialize, Serialize};

use crate::action::Action;

/// Exploration constant `c` of the UCB score.
pub const EXPLORATION: f64 = std::f64::consts::SQRT_2;

/// Something that picks the responder's action and learns from the reward.
///
/// [`BanditPolicy`] is the production implementation; tests plug in fixed
/// responders to pin the opponent's moves.
pub trait Responder {
    fn select_action(&mut self) -> Action;

    /// `reward` is in `[0, 1]`.
    fn update(&mut self, action: Action, reward: f64);

    /// Forget everything learned so far. Called between rounds when the
    /// match is configured with [`BanditReset::PerRound`](crate::BanditReset).
    fn reset(&mut self) {}
}

/// Per-arm statistics, for display.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArmStats {
    pub action: Action,
    pub pulls: u32,
    pub value: f64,
}

#[derive(Clone, Debug, Default)]
pub struct BanditPolicy {
    pull_count: [u32; Action::COUNT],
    estimated_value: [f64; Action::COUNT],
    total_pulls: u32,
}

impl BanditPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_pulls(&self) -> u32 {
        self.total_pulls
    }

    pub fn pulls(&self, action: Action) -> u32 {
        self.pull_count[action.index()]
    }

    /// Running mean reward for `action`. Zero until the arm has been pulled.
    pub fn value(&self, action: Action) -> f64 {
        self.estimated_value[action.index()]
    }

    pub fn arms(&self) -> [ArmStats; Action::COUNT] {
        Action::ALL.map(|action| ArmStats {
            action,
            pulls: self.pulls(action),
            value: self.value(action),
        })
    }

    /// UCB score of an arm that has been pulled at least once.
    fn score(&self, action: Action) -> f64 {
        let n = self.pull_count[action.index()] as f64;
        let bonus = EXPLORATION * ((self.total_pulls as f64).ln() / n).sqrt();
        self.estimated_value[action.index()] + bonus
    }
}

impl Responder for BanditPolicy {
    fn select_action(&mut self) -> Action {
        self.total_pulls += 1;

        // Forced exploration: every arm once, in index order
        if let Some(untried) = Action::ALL.iter().copied().find(|a| self.pulls(*a) == 0) {
            tracing::trace!(action = %untried, "bandit exploring untried arm");
            return untried;
        }

        let mut best = Action::ALL[0];
        let mut best_score = self.score(best);
        for action in Action::ALL.iter().copied().skip(1) {
            let score = self.score(action);
            // strict > keeps the first maximum
            if score > best_score {
                best = action;
                best_score = score;
            }
        }

        tracing::debug!(action = %best, score = best_score, total_pulls = self.total_pulls, "bandit selected arm");
        best
    }

    fn update(&mut self, action: Action, reward: f64) {
        debug_assert!(
            (0.0..=1.0).contains(&reward),
            "reward {reward} outside [0, 1]"
        );

        let i = action.index();
        self.pull_count[i] += 1;
        let n = self.pull_count[i] as f64;
        self.estimated_value[i] += (reward - self.estimated_value[i]) / n;
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}
