//! Combat actions

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// An action either robot can take in an exchange.
///
/// Discriminants are the bandit arm indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Attack = 0,
    Defend = 1,
    Dodge = 2,
    Charge = 3,
}

impl Action {
    pub const COUNT: usize = 4;

    /// All actions in index order.
    pub const ALL: [Action; Action::COUNT] =
        [Action::Attack, Action::Defend, Action::Dodge, Action::Charge];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Result<Self, ValidationError> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(ValidationError::ActionIndex(index))
    }

    /// Lowercase tag used on the wire and in config files.
    pub fn name(self) -> &'static str {
        match self {
            Action::Attack => "attack",
            Action::Defend => "defend",
            Action::Dodge => "dodge",
            Action::Charge => "charge",
        }
    }

    /// Upper-case form shown in the bot action banner.
    pub fn label(self) -> &'static str {
        match self {
            Action::Attack => "ATTACK",
            Action::Defend => "DEFEND",
            Action::Dodge => "DODGE",
            Action::Charge => "CHARGE",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = ValidationError;

    /// Tags are matched exactly; nothing is coerced.
    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|action| action.name() == tag)
            .ok_or_else(|| ValidationError::UnknownAction(tag.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_order() {
        for (i, action) in Action::ALL.iter().enumerate() {
            assert_eq!(action.index(), i);
            assert_eq!(Action::from_index(i).unwrap(), *action);
        }
    }

    #[test]
    fn test_index_out_of_range() {
        assert_eq!(Action::from_index(4), Err(ValidationError::ActionIndex(4)));
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!("attack".parse::<Action>().unwrap(), Action::Attack);
        assert_eq!("charge".parse::<Action>().unwrap(), Action::Charge);
        assert_eq!(Action::Dodge.to_string(), "dodge");
    }

    #[test]
    fn test_unknown_tag_is_not_coerced() {
        for tag in ["", "ATTACK", "Attack", "kick", " dodge"] {
            assert_eq!(
                tag.parse::<Action>(),
                Err(ValidationError::UnknownAction(tag.to_string()))
            );
        }
    }

    #[test]
    fn test_serde_uses_lowercase_tags() {
        let json = serde_json::to_string(&Action::Defend).unwrap();
        assert_eq!(json, "\"defend\"");
        let back: Action = serde_json::from_str("\"dodge\"").unwrap();
        assert_eq!(back, Action::Dodge);
        assert!(serde_json::from_str::<Action>("\"block\"").is_err());
    }
}
