//! Duel Logic for Robot Arena
//!
//! Core engine for a duel between a human-controlled robot and a bot that
//! learns with a UCB1 multi-armed bandit.
//! This crate is compiled to:
//! - Native (for the headless simulator and tests)
//! - WASM (for the browser arena)

mod action;
mod bandit;
mod combat;
mod config;
mod controller;
mod error;
mod random;
mod reward;
mod schedule;

#[cfg(feature = "wasm")]
mod wasm;

pub use action::Action;
pub use bandit::{ArmStats, BanditPolicy, Responder, EXPLORATION};
pub use combat::{resolve, CombatOutcome, Interaction, Role, BASE_DAMAGE, CRITICAL_DAMAGE};
pub use config::{ArenaConfig, BanditReset};
pub use controller::{
    CombatantState, MatchController, Phase, Side, Snapshot, MAX_HEALTH, OUTBOX_CAPACITY,
};
pub use error::{Result, ValidationError};
pub use random::{CriticalDice, CriticalRoll, SeededRng};
pub use reward::shape;
pub use schedule::Scheduler;
