//! Scripted stand-ins for the human player

use std::str::FromStr;

use duel_logic::{Action, SeededRng};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlayerScript {
    /// Same action every exchange.
    Fixed(Action),
    /// attack, defend, dodge, charge, attack, ...
    Cycle,
    /// Uniform over all actions.
    Random,
}

impl FromStr for PlayerScript {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cycle" => Ok(PlayerScript::Cycle),
            "random" => Ok(PlayerScript::Random),
            tag => tag
                .parse::<Action>()
                .map(PlayerScript::Fixed)
                .map_err(|e| format!("{e}; expected cycle, random or an action tag")),
        }
    }
}

/// Produces the player's next action.
pub struct Player {
    script: PlayerScript,
    rng: SeededRng,
    played: usize,
}

impl Player {
    pub fn new(script: PlayerScript, seed: u64) -> Self {
        Self {
            script,
            // decorrelate from the arena's critical draws
            rng: SeededRng::new(seed.wrapping_add(1)),
            played: 0,
        }
    }

    pub fn next_action(&mut self) -> Action {
        let action = match self.script {
            PlayerScript::Fixed(action) => action,
            PlayerScript::Cycle => Action::ALL[self.played % Action::COUNT],
            PlayerScript::Random => Action::ALL[self.rng.next_u32() as usize % Action::COUNT],
        };
        self.played += 1;
        action
    }
}
