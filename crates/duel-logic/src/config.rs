//! Match configuration

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};

/// Whether the bot keeps what it learned when a new round starts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BanditReset {
    /// Statistics live for the whole match.
    #[default]
    PerMatch,
    /// Statistics are wiped at every round reset.
    PerRound,
}

/// Timings are in ticks of the match clock.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Input lockout after an accepted action
    pub cooldown_ticks: u32,
    /// Submission to bot decision
    pub think_delay_ticks: u64,
    /// Bot decision to resolution
    pub resolve_delay_ticks: u64,
    /// Resolution to status text clearing
    pub clear_status_delay_ticks: u64,
    /// Knockout to next round
    pub round_reset_delay_ticks: u64,
    pub critical_chance_percent: u8,
    pub bandit_reset: BanditReset,
    /// Seed for critical draws
    pub seed: u64,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            cooldown_ticks: 60,
            think_delay_ticks: 300,
            resolve_delay_ticks: 400,
            clear_status_delay_ticks: 2000,
            round_reset_delay_ticks: 3000,
            critical_chance_percent: 25,
            bandit_reset: BanditReset::PerMatch,
            seed: 0,
        }
    }
}

impl ArenaConfig {
    pub fn validate(&self) -> Result<()> {
        if self.critical_chance_percent > 100 {
            return Err(ValidationError::Config {
                field: "critical_chance_percent",
                reason: format!("{} is above 100", self.critical_chance_percent),
            });
        }
        Ok(())
    }
}
