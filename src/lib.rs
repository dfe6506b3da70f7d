//! Line-to-rule compiler for a children's programming game.
//!
//! A child writes short lines such as `かべ じゃんぷ` ("wall: jump"); the
//! compiler turns each line into a [`Rule`] pairing an optional environmental
//! trigger with the action to perform. One non-nested repetition construct is
//! supported:
//!
//! ```text
//! 3かい くりかえす     <- header: repeat 3 times
//! かべ じゃんぷ        <- body, compiled once and appended 3 times
//! おわり              <- terminator
//! ```
//!
//! Which words mean which tag is not hard-coded: a [`Dictionary`] supplies the
//! trigger phrases for every tag. The compiler itself never fails; lines it
//! cannot use are dropped and the output simply gets shorter.
//!
//! # Example
//! ```
//! use kotogram::{ActionTag, ConditionTag, Dictionary, Rule, compile};
//!
//! let dict = Dictionary::builder()
//!     .condition(ConditionTag::Wall, ["かべ"])
//!     .action(ActionTag::Jump, ["じゃんぷ"])
//!     .build();
//!
//! let rules = compile(&["2かい くりかえす", "かべ じゃんぷ", "おわり"], &dict);
//! assert_eq!(rules, vec![Rule::when(ConditionTag::Wall, ActionTag::Jump); 2]);
//! ```

extern crate self as kotogram;

use serde::{Deserialize, Serialize};
use std::fmt;

#[macro_use]
mod macros;
mod api;
mod dictionary;
mod engine;
mod fail_reason;

pub use api::{
    CompileDetails, CompileResultVerbose, LineOutcome, LineTrace, Options, UnterminatedLoop, compile, compile_verbose,
    compile_verbose_with, compile_with,
};
pub use dictionary::{
    Dictionary, DictionaryBuilder, DictionaryError, DictionaryProvider, DirectoryProvider, FallbackProvider,
    StaticProvider,
};
pub use engine::{ActionSet, ConditionSet, normalize_digits};
pub use fail_reason::FailReason;

// --- Tags -------------------------------------------------------------------

/// Environmental trigger a line can refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionTag {
    Wall,
    Enemy,
    Hole,
    Coin,
}

impl ConditionTag {
    /// Scan order used by the classifier. Earlier tags win when one line
    /// mentions several triggers.
    pub const PRIORITY: [ConditionTag; 4] = [ConditionTag::Hole, ConditionTag::Enemy, ConditionTag::Wall, ConditionTag::Coin];

    /// Name used in dictionary documents and serialized rules.
    pub fn name(self) -> &'static str {
        match self {
            ConditionTag::Wall => "wall",
            ConditionTag::Enemy => "enemy",
            ConditionTag::Hole => "hole",
            ConditionTag::Coin => "coin",
        }
    }

    /// Inverse of [`ConditionTag::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        ConditionTag::PRIORITY.into_iter().find(|tag| tag.name() == name)
    }
}

impl fmt::Display for ConditionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Response the player character performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionTag {
    Jump,
    Crouch,
    Collect,
}

impl ActionTag {
    /// Scan order used by the classifier.
    pub const PRIORITY: [ActionTag; 3] = [ActionTag::Jump, ActionTag::Crouch, ActionTag::Collect];

    pub fn name(self) -> &'static str {
        match self {
            ActionTag::Jump => "jump",
            ActionTag::Crouch => "crouch",
            ActionTag::Collect => "collect",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        ActionTag::PRIORITY.into_iter().find(|tag| tag.name() == name)
    }
}

impl fmt::Display for ActionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// --- Rule -------------------------------------------------------------------

/// One compiled instruction: perform `action`, optionally only when
/// `condition` is in front of the player.
///
/// Serialized as `{"cond":"wall","action":"jump"}`; `cond` is omitted for an
/// unconditioned rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rule {
    #[serde(rename = "cond", default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<ConditionTag>,
    pub action: ActionTag,
}

impl Rule {
    /// Rule that fires whenever `condition` is encountered.
    pub fn when(condition: ConditionTag, action: ActionTag) -> Self {
        Rule { condition: Some(condition), action }
    }

    /// Rule with no trigger: the action is always performed.
    pub fn always(action: ActionTag) -> Self {
        Rule { condition: None, action }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.condition {
            Some(cond) => write!(f, "{} -> {}", cond, self.action),
            None => write!(f, "* -> {}", self.action),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_names_round_trip() {
        for tag in ConditionTag::PRIORITY {
            assert_eq!(ConditionTag::from_name(tag.name()), Some(tag));
        }
        for tag in ActionTag::PRIORITY {
            assert_eq!(ActionTag::from_name(tag.name()), Some(tag));
        }
        assert_eq!(ConditionTag::from_name("lava"), None);
        assert_eq!(ActionTag::from_name("Jump"), None);
    }

    #[test]
    fn rule_serializes_with_short_condition_key() {
        let json = serde_json::to_string(&Rule::when(ConditionTag::Hole, ActionTag::Jump)).unwrap();
        assert_eq!(json, r#"{"cond":"hole","action":"jump"}"#);

        let json = serde_json::to_string(&Rule::always(ActionTag::Crouch)).unwrap();
        assert_eq!(json, r#"{"action":"crouch"}"#);

        let back: Rule = serde_json::from_str(r#"{"action":"collect"}"#).unwrap();
        assert_eq!(back, Rule::always(ActionTag::Collect));
    }

    #[test]
    fn rule_display() {
        assert_eq!(Rule::when(ConditionTag::Wall, ActionTag::Jump).to_string(), "wall -> jump");
        assert_eq!(Rule::always(ActionTag::Collect).to_string(), "* -> collect");
    }
}
