//! Combat resolution
//!
//! The outcome of an exchange is a lookup in a fixed 4x4 interaction table,
//! indexed by `[initiator][responder]`. Each cell carries the damage
//! multipliers (applied to the base damage) for both sides and the
//! [`Interaction`] that names what happened. The table is symmetric: cell
//! `[b][a]` is the mirror of `[a][b]`.

use serde::{Deserialize, Serialize};

use crate::action::Action;

use Interaction::*;
use Role::*;

/// Base damage of a normal hit.
pub const BASE_DAMAGE: f64 = 15.0;

/// Base damage when the critical draw fires.
pub const CRITICAL_DAMAGE: f64 = 25.0;

/// Which side of an exchange a combatant is on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Initiator,
    Responder,
}

impl Role {
    pub fn opponent(self) -> Self {
        match self {
            Role::Initiator => Role::Responder,
            Role::Responder => Role::Initiator,
        }
    }
}

/// What physically happened in an exchange. Roles are relative to the
/// perspective the outcome is expressed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interaction {
    /// Both attacked.
    Clash,
    /// The given side blocked an attack and took chip damage.
    Guarded(Role),
    /// The given side dodged an attack.
    Evaded(Role),
    /// The given side charged into an attack.
    Countered(Role),
    /// Nothing connected.
    Reposition,
}

impl Interaction {
    fn mirrored(self) -> Self {
        match self {
            Interaction::Guarded(role) => Interaction::Guarded(role.opponent()),
            Interaction::Evaded(role) => Interaction::Evaded(role.opponent()),
            Interaction::Countered(role) => Interaction::Countered(role.opponent()),
            other => other,
        }
    }
}

/// Result of one exchange from one combatant's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CombatOutcome {
    pub actor_damage_dealt: f64,
    pub actor_damage_taken: f64,
    /// Critical draw fired and someone got hurt.
    pub was_critical: bool,
    pub interaction: Interaction,
}

impl CombatOutcome {
    /// The same exchange seen from the other side.
    pub fn mirrored(self) -> Self {
        Self {
            actor_damage_dealt: self.actor_damage_taken,
            actor_damage_taken: self.actor_damage_dealt,
            was_critical: self.was_critical,
            interaction: self.interaction.mirrored(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Cell {
    to_initiator: f64,
    to_responder: f64,
    interaction: Interaction,
}

const fn cell(to_initiator: f64, to_responder: f64, interaction: Interaction) -> Cell {
    Cell { to_initiator, to_responder, interaction }
}

const NONE: Cell = cell(0.0, 0.0, Interaction::Reposition);

/// `[initiator][responder]`, rows and columns in [`Action::ALL`] order.
const TABLE: [[Cell; Action::COUNT]; Action::COUNT] = [
    // initiator attacks
    [
        cell(0.5, 0.5, Clash),
        cell(0.0, 0.3, Guarded(Responder)),
        cell(0.0, 0.0, Evaded(Responder)),
        cell(0.0, 1.5, Countered(Responder)),
    ],
    // initiator defends
    [cell(0.3, 0.0, Guarded(Initiator)), NONE, NONE, NONE],
    // initiator dodges
    [cell(0.0, 0.0, Evaded(Initiator)), NONE, NONE, NONE],
    // initiator charges
    [cell(1.5, 0.0, Countered(Initiator)), NONE, NONE, NONE],
];

/// Resolve one exchange from the initiator's point of view.
///
/// Pure: health is applied by the caller.
pub fn resolve(initiator: Action, responder: Action, critical: bool) -> CombatOutcome {
    let cell = TABLE[initiator.index()][responder.index()];
    let base = if critical { CRITICAL_DAMAGE } else { BASE_DAMAGE };

    let dealt = base * cell.to_responder;
    let taken = base * cell.to_initiator;

    CombatOutcome {
        actor_damage_dealt: dealt,
        actor_damage_taken: taken,
        was_critical: critical && (dealt > 0.0 || taken > 0.0),
        interaction: cell.interaction,
    }
}
