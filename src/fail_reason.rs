//! Why a run ended early, and what to tell the child about it.

use crate::ConditionTag;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reason the player character failed a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailReason {
    Hole,
    Wall,
    Enemy,
    /// Anything else; the game could not tell.
    Void,
}

impl FailReason {
    /// Hazard that ends the run when no rule handles `condition`. Coins are
    /// harmless.
    pub fn for_condition(condition: ConditionTag) -> Option<FailReason> {
        match condition {
            ConditionTag::Hole => Some(FailReason::Hole),
            ConditionTag::Wall => Some(FailReason::Wall),
            ConditionTag::Enemy => Some(FailReason::Enemy),
            ConditionTag::Coin => None,
        }
    }

    /// Short message shown when the run fails.
    pub fn label(self) -> &'static str {
        match self {
            FailReason::Hole => "あなにおちちゃった！",
            FailReason::Wall => "かべにぶつかっちゃった！",
            FailReason::Enemy => "おばけにあたっちゃった！",
            FailReason::Void => "おっと、うまくいかなかったよ。",
        }
    }

    /// Suggested fix, phrased as a line the child can write. Stages may
    /// override these.
    pub fn default_hint(self) -> &'static str {
        match self {
            FailReason::Hole => "「あな じゃんぷ」など、あなを見つけたらジャンプしよう。",
            FailReason::Wall => "「かべ じゃんぷ」と書いて、かべの前でジャンプできるようにしよう。",
            FailReason::Enemy => "「おばけ しゃがむ」と書くと、おばけの下をくぐれるよ。",
            FailReason::Void => "もう一度ためしてみよう。",
        }
    }
}

impl fmt::Display for FailReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ActionTag, Dictionary, Rule, compile};

    #[test]
    fn coin_is_not_a_hazard() {
        assert_eq!(FailReason::for_condition(ConditionTag::Coin), None);
        assert_eq!(FailReason::for_condition(ConditionTag::Hole), Some(FailReason::Hole));
    }

    #[test]
    fn hints_compile_to_the_rule_that_avoids_the_hazard() {
        // Each hint quotes a line; with the built-in phrases that line must
        // produce the rule that handles the hazard.
        let dict = Dictionary::builtin();
        let cases = [
            (FailReason::Hole, "あな じゃんぷ", Rule::when(ConditionTag::Hole, ActionTag::Jump)),
            (FailReason::Wall, "かべ じゃんぷ", Rule::when(ConditionTag::Wall, ActionTag::Jump)),
            (FailReason::Enemy, "おばけ しゃがむ", Rule::when(ConditionTag::Enemy, ActionTag::Crouch)),
        ];

        for (reason, line, expected) in cases {
            assert!(reason.default_hint().contains(line), "hint for {:?} quotes '{}'", reason, line);
            assert_eq!(compile(&[line], &dict), vec![expected]);
        }
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&FailReason::Void).unwrap(), r#""void""#);
    }
}
