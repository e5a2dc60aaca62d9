//! Match lifecycle
//!
//! One exchange runs as a chain of scheduled tasks on the match clock:
//!
//! ```text
//! submit ──think delay──▶ bot picks ──resolve delay──▶ resolve ─┬─▶ Idle
//!                                                                └─▶ RoundReset ──reset delay──▶ Idle
//! ```
//!
//! A clear-status task is also scheduled at every resolution. Input is only
//! accepted in [`Phase::Idle`], with the cooldown expired and both robots
//! standing; anything else is dropped.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::bandit::{ArmStats, BanditPolicy, Responder};
use crate::combat::{self, CombatOutcome, Interaction, Role};
use crate::config::{ArenaConfig, BanditReset};
use crate::error::Result;
use crate::random::{CriticalDice, CriticalRoll};
use crate::reward;
use crate::schedule::Scheduler;

pub const MAX_HEALTH: f64 = 100.0;

/// Undrained snapshots kept; older ones are dropped first.
pub const OUTBOX_CAPACITY: usize = 64;

/// The human player is always the initiator, the bot the responder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Player,
    Bot,
}

impl Side {
    fn index(self) -> usize {
        match self {
            Side::Player => 0,
            Side::Bot => 1,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Side::Player => "player",
            Side::Bot => "bot",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Idle,
    ActionPending,
    Resolving,
    RoundEndCheck,
    RoundReset,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CombatantState {
    pub health: f64,
    pub wins: u32,
}

impl Default for CombatantState {
    fn default() -> Self {
        Self { health: MAX_HEALTH, wins: 0 }
    }
}

/// Everything the presentation layer needs to draw a frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub round: u32,
    pub player_health: f64,
    pub bot_health: f64,
    pub player_wins: u32,
    pub bot_wins: u32,
    pub last_outcome_message: Option<String>,
    pub last_bot_action: Option<Action>,
    pub phase: Phase,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Task {
    BotThinks,
    Resolve,
    ClearStatus,
    ResetRound,
}

pub struct MatchController<R = BanditPolicy, C = CriticalDice> {
    config: ArenaConfig,
    responder: R,
    critical: C,
    clock: Scheduler<Task>,

    round: u32,
    cooldown_ticks: u32,
    combatants: [CombatantState; 2],
    phase: Phase,

    player_action: Option<Action>,
    bot_action: Option<Action>,
    status: Option<String>,
    last_bot_action: Option<Action>,

    outbox: VecDeque<Snapshot>,
}

impl MatchController {
    /// A match against the UCB bandit with seeded critical draws.
    pub fn new(config: ArenaConfig) -> Result<Self> {
        let critical = CriticalDice::new(config.seed, config.critical_chance_percent);
        Self::with_parts(config, BanditPolicy::new(), critical)
    }

    pub fn arms(&self) -> [ArmStats; Action::COUNT] {
        self.responder.arms()
    }
}

impl<R: Responder, C: CriticalRoll> MatchController<R, C> {
    pub fn with_parts(config: ArenaConfig, responder: R, critical: C) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            responder,
            critical,
            clock: Scheduler::new(),
            round: 1,
            cooldown_ticks: 0,
            combatants: [CombatantState::default(); 2],
            phase: Phase::Idle,
            player_action: None,
            bot_action: None,
            status: None,
            last_bot_action: None,
            outbox: VecDeque::new(),
        })
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    pub fn responder(&self) -> &R {
        &self.responder
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn cooldown_ticks(&self) -> u32 {
        self.cooldown_ticks
    }

    /// Ticks elapsed on the match clock.
    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    pub fn combatant(&self, side: Side) -> &CombatantState {
        &self.combatants[side.index()]
    }

    /// Whether a submission right now would be accepted.
    pub fn gate_open(&self) -> bool {
        self.phase == Phase::Idle
            && self.cooldown_ticks == 0
            && self.combatants.iter().all(|c| c.health > 0.0)
    }

    /// Player input. Returns `false` without touching any state when the
    /// gate is closed.
    pub fn submit_action(&mut self, action: Action) -> bool {
        if !self.gate_open() {
            tracing::trace!(%action, phase = ?self.phase, cooldown = self.cooldown_ticks, "submission dropped");
            return false;
        }

        self.player_action = Some(action);
        self.cooldown_ticks = self.config.cooldown_ticks;
        self.phase = Phase::ActionPending;
        self.clock.schedule(self.config.think_delay_ticks, Task::BotThinks);
        tracing::debug!(%action, round = self.round, "player action accepted");
        self.emit();
        true
    }

    /// [`submit_action`](Self::submit_action) for a raw tag from the input
    /// layer. Unknown tags are an error, not a dropped submission.
    pub fn submit_tag(&mut self, tag: &str) -> Result<bool> {
        let action = tag.parse()?;
        Ok(self.submit_action(action))
    }

    /// Advance the match clock by one tick and run whatever became due.
    pub fn tick(&mut self) {
        self.clock.advance();
        self.cooldown_ticks = self.cooldown_ticks.saturating_sub(1);

        while let Some(task) = self.clock.pop_due() {
            tracing::trace!(?task, now = self.clock.now(), "task fired");
            match task {
                Task::BotThinks => self.bot_thinks(),
                Task::Resolve => self.resolve_exchange(),
                Task::ClearStatus => self.clear_status(),
                Task::ResetRound => self.reset_round(),
            }
        }
    }

    pub fn advance(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let player = self.combatant(Side::Player);
        let bot = self.combatant(Side::Bot);
        Snapshot {
            round: self.round,
            player_health: player.health,
            bot_health: bot.health,
            player_wins: player.wins,
            bot_wins: bot.wins,
            last_outcome_message: self.status.clone(),
            last_bot_action: self.last_bot_action,
            phase: self.phase,
        }
    }

    /// Snapshots emitted since the last drain, oldest first. At most
    /// [`OUTBOX_CAPACITY`] are kept, so callers that only poll
    /// [`snapshot`](Self::snapshot) never need to drain.
    pub fn drain_snapshots(&mut self) -> Vec<Snapshot> {
        self.outbox.drain(..).collect()
    }

    fn emit(&mut self) {
        if self.outbox.len() == OUTBOX_CAPACITY {
            self.outbox.pop_front();
        }
        let snapshot = self.snapshot();
        self.outbox.push_back(snapshot);
    }

    fn bot_thinks(&mut self) {
        let action = self.responder.select_action();
        self.bot_action = Some(action);
        self.last_bot_action = Some(action);
        self.phase = Phase::Resolving;
        self.clock.schedule(self.config.resolve_delay_ticks, Task::Resolve);
        tracing::debug!(%action, "bot committed");
        self.emit();
    }

    fn resolve_exchange(&mut self) {
        let (Some(player_action), Some(bot_action)) =
            (self.player_action.take(), self.bot_action.take())
        else {
            tracing::warn!("resolve fired without both actions; dropping exchange");
            self.phase = Phase::Idle;
            self.emit();
            return;
        };

        let critical = self.critical.roll();
        let outcome = combat::resolve(player_action, bot_action, critical);

        self.apply_damage(Side::Player, outcome.actor_damage_taken);
        self.apply_damage(Side::Bot, outcome.actor_damage_dealt);

        let bot_health = self.combatant(Side::Bot).health;
        let reward = reward::shape(&outcome.mirrored(), bot_health);
        self.responder.update(bot_action, reward);

        tracing::debug!(
            player = %player_action,
            bot = %bot_action,
            critical = outcome.was_critical,
            player_damage = outcome.actor_damage_taken,
            bot_damage = outcome.actor_damage_dealt,
            reward,
            "exchange resolved"
        );

        self.status = Some(outcome_message(&outcome).to_string());
        self.phase = Phase::RoundEndCheck;
        self.round_end_check();
        self.clock.schedule(self.config.clear_status_delay_ticks, Task::ClearStatus);
        self.emit();
    }

    fn apply_damage(&mut self, side: Side, damage: f64) {
        let combatant = &mut self.combatants[side.index()];
        combatant.health = (combatant.health - damage).clamp(0.0, MAX_HEALTH);
    }

    fn round_end_check(&mut self) {
        // Player is checked first, so a double knockout goes to the bot
        let winner = if self.combatant(Side::Player).health <= 0.0 {
            Some(Side::Bot)
        } else if self.combatant(Side::Bot).health <= 0.0 {
            Some(Side::Player)
        } else {
            None
        };

        match winner {
            Some(side) => {
                self.combatants[side.index()].wins += 1;
                self.status = Some(format!("{} WINS!", side.name().to_uppercase()));
                self.phase = Phase::RoundReset;
                self.clock.schedule(self.config.round_reset_delay_ticks, Task::ResetRound);
                tracing::info!(round = self.round, winner = side.name(), "round over");
            }
            None => self.phase = Phase::Idle,
        }
    }

    fn clear_status(&mut self) {
        self.status = None;
        self.last_bot_action = None;
        self.emit();
    }

    fn reset_round(&mut self) {
        self.round += 1;
        self.combatants.iter_mut().for_each(|c| c.health = MAX_HEALTH);
        self.status = None;
        self.last_bot_action = None;
        if self.config.bandit_reset == BanditReset::PerRound {
            self.responder.reset();
        }
        self.phase = Phase::Idle;
        tracing::info!(round = self.round, "round started");
        self.emit();
    }
}

/// Status line for an exchange seen from the player's side.
fn outcome_message(outcome: &CombatOutcome) -> &'static str {
    match outcome.interaction {
        Interaction::Clash => "Both robots clash!",
        Interaction::Guarded(Role::Responder) => "Bot defends!",
        Interaction::Guarded(Role::Initiator) => "Player defends!",
        Interaction::Evaded(Role::Responder) => "Bot dodges!",
        Interaction::Evaded(Role::Initiator) => "Player dodges!",
        Interaction::Countered(Role::Responder) if outcome.was_critical => "CRITICAL HIT!",
        Interaction::Countered(Role::Responder) => "Player hits charging bot!",
        Interaction::Countered(Role::Initiator) => "Bot counters charge!",
        Interaction::Reposition => "Both robots reposition!",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Opponent that always answers with the same action and records
    /// every reward it is fed.
    struct Fixed {
        action: Action,
        rewards: Vec<(Action, f64)>,
        resets: u32,
    }

    impl Fixed {
        fn new(action: Action) -> Self {
            Self { action, rewards: Vec::new(), resets: 0 }
        }
    }

    impl Responder for Fixed {
        fn select_action(&mut self) -> Action {
            self.action
        }

        fn update(&mut self, action: Action, reward: f64) {
            self.rewards.push((action, reward));
        }

        fn reset(&mut self) {
            self.resets += 1;
        }
    }

    fn never() -> bool {
        false
    }

    fn always() -> bool {
        true
    }

    fn exchange_ticks(config: &ArenaConfig) -> u64 {
        config.think_delay_ticks + config.resolve_delay_ticks
    }

    #[test]
    fn test_initial_state() {
        let controller = MatchController::new(ArenaConfig::default()).unwrap();
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.round, 1);
        assert_eq!(snapshot.player_health, 100.0);
        assert_eq!(snapshot.bot_health, 100.0);
        assert_eq!((snapshot.player_wins, snapshot.bot_wins), (0, 0));
        assert_eq!(snapshot.phase, Phase::Idle);
        assert!(controller.gate_open());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ArenaConfig { critical_chance_percent: 150, ..Default::default() };
        assert!(MatchController::new(config).is_err());
    }

    #[test]
    fn test_phases_through_one_exchange() {
        let config = ArenaConfig::default();
        let mut controller =
            MatchController::with_parts(config.clone(), Fixed::new(Action::Defend), never).unwrap();

        assert!(controller.submit_action(Action::Attack));
        assert_eq!(controller.phase(), Phase::ActionPending);
        assert_eq!(controller.cooldown_ticks(), 60);

        controller.advance(config.think_delay_ticks - 1);
        assert_eq!(controller.phase(), Phase::ActionPending);
        controller.tick();
        assert_eq!(controller.phase(), Phase::Resolving);
        assert_eq!(controller.snapshot().last_bot_action, Some(Action::Defend));

        controller.advance(config.resolve_delay_ticks);
        assert_eq!(controller.phase(), Phase::Idle);
        let bot = controller.combatant(Side::Bot);
        assert!((bot.health - 95.5).abs() < 1e-9);
        assert_eq!(controller.snapshot().last_outcome_message.as_deref(), Some("Bot defends!"));
        assert_eq!(controller.responder().rewards.len(), 1);
    }

    #[test]
    fn test_snapshots_follow_transitions() {
        let config = ArenaConfig::default();
        let mut controller =
            MatchController::with_parts(config.clone(), Fixed::new(Action::Dodge), never).unwrap();

        controller.submit_action(Action::Attack);
        controller.advance(exchange_ticks(&config));
        let phases: Vec<Phase> = controller.drain_snapshots().iter().map(|s| s.phase).collect();
        assert_eq!(phases, vec![Phase::ActionPending, Phase::Resolving, Phase::Idle]);
        assert!(controller.drain_snapshots().is_empty());
    }

    #[test]
    fn test_outbox_keeps_newest_when_never_drained() {
        let config = ArenaConfig::default();
        let mut controller =
            MatchController::with_parts(config.clone(), Fixed::new(Action::Dodge), never).unwrap();

        // four snapshots per exchange once the status clears
        for _ in 0..40 {
            assert!(controller.submit_action(Action::Attack));
            controller.advance(config.clear_status_delay_ticks + exchange_ticks(&config));
        }

        let snapshots = controller.drain_snapshots();
        assert_eq!(snapshots.len(), OUTBOX_CAPACITY);
        assert_eq!(snapshots.last(), Some(&controller.snapshot()));
    }

    #[test]
    fn test_gate_rejects_during_cooldown() {
        let config = ArenaConfig {
            think_delay_ticks: 0,
            resolve_delay_ticks: 0,
            ..Default::default()
        };
        let mut controller =
            MatchController::with_parts(config, Fixed::new(Action::Dodge), never).unwrap();

        assert!(controller.submit_action(Action::Attack));
        controller.tick();
        // chain finished but the cooldown is still running
        assert_eq!(controller.phase(), Phase::Idle);
        assert!(controller.cooldown_ticks() > 0);

        let before = controller.snapshot();
        let cooldown = controller.cooldown_ticks();
        controller.drain_snapshots();

        assert!(!controller.submit_action(Action::Charge));
        assert_eq!(controller.snapshot(), before);
        assert_eq!(controller.cooldown_ticks(), cooldown);
        assert!(controller.drain_snapshots().is_empty());
    }

    #[test]
    fn test_gate_rejects_while_pending() {
        let config = ArenaConfig { cooldown_ticks: 1, ..Default::default() };
        let mut controller =
            MatchController::with_parts(config, Fixed::new(Action::Dodge), never).unwrap();

        assert!(controller.submit_action(Action::Attack));
        controller.advance(5);
        assert_eq!(controller.cooldown_ticks(), 0);
        assert!(!controller.submit_action(Action::Attack));
        assert_eq!(controller.phase(), Phase::ActionPending);
    }

    #[test]
    fn test_unknown_tag_is_validation_error() {
        let mut controller = MatchController::new(ArenaConfig::default()).unwrap();
        assert!(controller.submit_tag("punch").is_err());
        assert_eq!(controller.phase(), Phase::Idle);
        assert_eq!(controller.submit_tag("dodge"), Ok(true));
    }

    #[test]
    fn test_bot_is_rewarded_from_its_own_side() {
        let config = ArenaConfig::default();
        let mut controller =
            MatchController::with_parts(config.clone(), Fixed::new(Action::Attack), never).unwrap();

        controller.submit_action(Action::Charge);
        controller.advance(exchange_ticks(&config));

        assert_eq!(controller.combatant(Side::Player).health, 77.5);
        assert_eq!(controller.combatant(Side::Bot).health, 100.0);
        let (action, reward) = controller.responder().rewards[0];
        assert_eq!(action, Action::Attack);
        // (0.5 * 22.5 + 0.1 * 100) / 50
        assert!((reward - 0.425).abs() < 1e-12);
        assert_eq!(
            controller.snapshot().last_outcome_message.as_deref(),
            Some("Bot counters charge!")
        );
    }

    #[test]
    fn test_status_clears_after_delay() {
        let config = ArenaConfig::default();
        let mut controller =
            MatchController::with_parts(config.clone(), Fixed::new(Action::Defend), never).unwrap();

        controller.submit_action(Action::Dodge);
        controller.advance(exchange_ticks(&config));
        assert!(controller.snapshot().last_outcome_message.is_some());

        controller.advance(config.clear_status_delay_ticks);
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.last_outcome_message, None);
        assert_eq!(snapshot.last_bot_action, None);
    }

    #[test]
    fn test_double_knockout_goes_to_bot() {
        let config = ArenaConfig { cooldown_ticks: 1, ..Default::default() };
        let mut controller =
            MatchController::with_parts(config.clone(), Fixed::new(Action::Attack), always).unwrap();

        // 12.5 each per critical clash: eight clashes floor both at 0
        for _ in 0..8 {
            assert!(controller.submit_action(Action::Attack));
            controller.advance(exchange_ticks(&config));
        }

        assert_eq!(controller.phase(), Phase::RoundReset);
        assert_eq!(controller.combatant(Side::Bot).wins, 1);
        assert_eq!(controller.combatant(Side::Player).wins, 0);
        assert_eq!(controller.snapshot().last_outcome_message.as_deref(), Some("BOT WINS!"));
    }

    #[test]
    fn test_per_round_reset_policy() {
        let config = ArenaConfig {
            cooldown_ticks: 1,
            bandit_reset: BanditReset::PerRound,
            ..Default::default()
        };
        let mut controller =
            MatchController::with_parts(config.clone(), Fixed::new(Action::Charge), always).unwrap();

        for _ in 0..3 {
            controller.submit_action(Action::Attack);
            controller.advance(exchange_ticks(&config));
        }
        assert_eq!(controller.responder().resets, 0);
        controller.advance(config.round_reset_delay_ticks);
        assert_eq!(controller.responder().resets, 1);
        assert_eq!(controller.round(), 2);
    }

    #[test]
    fn test_per_match_policy_keeps_statistics() {
        let config = ArenaConfig { cooldown_ticks: 1, ..Default::default() };
        let mut controller =
            MatchController::with_parts(config.clone(), Fixed::new(Action::Charge), always).unwrap();

        for _ in 0..3 {
            controller.submit_action(Action::Attack);
            controller.advance(exchange_ticks(&config));
        }
        controller.advance(config.round_reset_delay_ticks);

        assert_eq!(controller.round(), 2);
        assert_eq!(controller.responder().resets, 0);
        assert_eq!(controller.responder().rewards.len(), 3);
    }

    #[test]
    fn test_bandit_pulls_match_exchanges() {
        let config = ArenaConfig { cooldown_ticks: 1, seed: 3, ..Default::default() };
        let mut controller = MatchController::new(config.clone()).unwrap();

        for _ in 0..6 {
            assert!(controller.submit_action(Action::Defend));
            controller.advance(exchange_ticks(&config));
        }

        let arms = controller.arms();
        let pulls: u32 = arms.iter().map(|a| a.pulls).sum();
        assert_eq!(pulls, 6);
        assert_eq!(controller.responder().total_pulls(), 6);
        // every arm tried once before any repeat
        assert!(arms.iter().all(|a| a.pulls >= 1));
    }

    #[test]
    fn test_outcome_messages() {
        let message = |a, b, critical| outcome_message(&combat::resolve(a, b, critical));
        assert_eq!(message(Action::Attack, Action::Attack, false), "Both robots clash!");
        assert_eq!(message(Action::Attack, Action::Dodge, false), "Bot dodges!");
        assert_eq!(message(Action::Dodge, Action::Attack, false), "Player dodges!");
        assert_eq!(message(Action::Defend, Action::Attack, false), "Player defends!");
        assert_eq!(message(Action::Attack, Action::Charge, false), "Player hits charging bot!");
        assert_eq!(message(Action::Attack, Action::Charge, true), "CRITICAL HIT!");
        assert_eq!(message(Action::Charge, Action::Defend, true), "Both robots reposition!");
    }
}
