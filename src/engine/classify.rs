//! Line classification.
//!
//! A normalized line is scanned against every trigger phrase in the
//! [`Dictionary`]. Matching is plain, case-sensitive substring containment:
//! the child writes `かべに ぶつかったら じゃんぷ` and the phrase `かべ`
//! is found inside it.
//!
//! The scan records *every* tag that matched, as a bitflag set, and then
//! picks the winner by walking the fixed priority arrays
//! ([`ConditionTag::PRIORITY`], [`ActionTag::PRIORITY`]). Keeping the full
//! sets lets the verbose trace show which tags were shadowed.

use crate::dictionary::Dictionary;
use crate::{ActionTag, ConditionTag, Rule};

bitflags::bitflags! {
    /// Condition tags found in one line.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ConditionSet: u8 {
        const WALL  = 1 << 0;
        const ENEMY = 1 << 1;
        const HOLE  = 1 << 2;
        const COIN  = 1 << 3;
    }
}

bitflags::bitflags! {
    /// Action tags found in one line.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ActionSet: u8 {
        const JUMP    = 1 << 0;
        const CROUCH  = 1 << 1;
        const COLLECT = 1 << 2;
    }
}

impl ConditionSet {
    pub fn of(tag: ConditionTag) -> Self {
        match tag {
            ConditionTag::Wall => ConditionSet::WALL,
            ConditionTag::Enemy => ConditionSet::ENEMY,
            ConditionTag::Hole => ConditionSet::HOLE,
            ConditionTag::Coin => ConditionSet::COIN,
        }
    }

    /// Highest-priority tag in the set.
    pub fn first(self) -> Option<ConditionTag> {
        ConditionTag::PRIORITY.into_iter().find(|tag| self.contains(Self::of(*tag)))
    }

    /// Tags in priority order.
    pub fn tags(self) -> Vec<ConditionTag> {
        ConditionTag::PRIORITY.into_iter().filter(|tag| self.contains(Self::of(*tag))).collect()
    }
}

impl ActionSet {
    pub fn of(tag: ActionTag) -> Self {
        match tag {
            ActionTag::Jump => ActionSet::JUMP,
            ActionTag::Crouch => ActionSet::CROUCH,
            ActionTag::Collect => ActionSet::COLLECT,
        }
    }

    pub fn first(self) -> Option<ActionTag> {
        ActionTag::PRIORITY.into_iter().find(|tag| self.contains(Self::of(*tag)))
    }

    pub fn tags(self) -> Vec<ActionTag> {
        ActionTag::PRIORITY.into_iter().filter(|tag| self.contains(Self::of(*tag))).collect()
    }
}

/// Result of classifying one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Classification {
    /// Every condition tag with at least one phrase in the line.
    pub conditions: ConditionSet,
    /// Every action tag with at least one phrase in the line.
    pub actions: ActionSet,
}

impl Classification {
    /// Scan `line` against all phrases in `dict`.
    ///
    /// `line` is expected to be normalized and trimmed already.
    pub fn scan(line: &str, dict: &Dictionary) -> Self {
        let mut conditions = ConditionSet::empty();
        for tag in ConditionTag::PRIORITY {
            if contains_any(line, dict.condition_phrases(tag)) {
                conditions |= ConditionSet::of(tag);
            }
        }

        let mut actions = ActionSet::empty();
        for tag in ActionTag::PRIORITY {
            if contains_any(line, dict.action_phrases(tag)) {
                actions |= ActionSet::of(tag);
            }
        }

        tracing::trace!(line, ?conditions, ?actions, "classified line");

        Classification { conditions, actions }
    }

    pub fn condition(&self) -> Option<ConditionTag> {
        self.conditions.first()
    }

    pub fn action(&self) -> Option<ActionTag> {
        self.actions.first()
    }

    /// The rule this line compiles to. A line without an action yields none,
    /// whatever condition it names.
    pub fn rule(&self) -> Option<Rule> {
        let action = self.action()?;
        Some(Rule { condition: self.condition(), action })
    }

    /// Matched condition tags that lost to a higher-priority one.
    pub fn shadowed_conditions(&self) -> ConditionSet {
        match self.condition() {
            Some(winner) => self.conditions - ConditionSet::of(winner),
            None => ConditionSet::empty(),
        }
    }

    pub fn shadowed_actions(&self) -> ActionSet {
        match self.action() {
            Some(winner) => self.actions - ActionSet::of(winner),
            None => ActionSet::empty(),
        }
    }
}

fn contains_any(line: &str, phrases: &[String]) -> bool {
    phrases.iter().any(|phrase| !phrase.is_empty() && line.contains(phrase.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict() -> Dictionary {
        Dictionary::builder()
            .condition(ConditionTag::Wall, ["かべ"])
            .condition(ConditionTag::Hole, ["あな"])
            .condition(ConditionTag::Enemy, ["おばけ", "ゴースト"])
            .condition(ConditionTag::Coin, ["こいん"])
            .action(ActionTag::Jump, ["じゃんぷ"])
            .action(ActionTag::Crouch, ["しゃがむ"])
            .action(ActionTag::Collect, ["あつめる"])
            .build()
    }

    #[test]
    fn condition_and_action_in_one_line() {
        let c = Classification::scan("かべ じゃんぷ", &dict());
        assert_eq!(c.condition(), Some(ConditionTag::Wall));
        assert_eq!(c.action(), Some(ActionTag::Jump));
        assert_eq!(c.rule(), Some(Rule::when(ConditionTag::Wall, ActionTag::Jump)));
    }

    #[test]
    fn hole_outranks_wall() {
        let c = Classification::scan("かべの まえの あな じゃんぷ", &dict());
        assert_eq!(c.condition(), Some(ConditionTag::Hole));
        assert_eq!(c.conditions, ConditionSet::WALL | ConditionSet::HOLE);
        assert_eq!(c.shadowed_conditions(), ConditionSet::WALL);
    }

    #[test]
    fn priority_is_not_declaration_order() {
        // enemy beats wall and coin, loses only to hole
        let c = Classification::scan("こいん かべ おばけ", &dict());
        assert_eq!(c.condition(), Some(ConditionTag::Enemy));
        assert_eq!(c.conditions.tags(), vec![ConditionTag::Enemy, ConditionTag::Wall, ConditionTag::Coin]);
    }

    #[test]
    fn jump_outranks_crouch() {
        let c = Classification::scan("しゃがむ じゃんぷ", &dict());
        assert_eq!(c.action(), Some(ActionTag::Jump));
        assert_eq!(c.shadowed_actions(), ActionSet::CROUCH);
    }

    #[test]
    fn any_phrase_of_a_tag_counts() {
        let c = Classification::scan("ゴースト しゃがむ", &dict());
        assert_eq!(c.rule(), Some(Rule::when(ConditionTag::Enemy, ActionTag::Crouch)));
    }

    #[test]
    fn condition_without_action_yields_no_rule() {
        let c = Classification::scan("かべ", &dict());
        assert_eq!(c.condition(), Some(ConditionTag::Wall));
        assert_eq!(c.rule(), None);
    }

    #[test]
    fn action_without_condition_is_unconditioned() {
        let c = Classification::scan("ずっと あつめる", &dict());
        assert_eq!(c.rule(), Some(Rule::always(ActionTag::Collect)));
    }

    #[test]
    fn matching_is_case_sensitive() {
        let d = Dictionary::builder().action(ActionTag::Jump, ["jump"]).build();
        assert_eq!(Classification::scan("JUMP", &d).action(), None);
        assert_eq!(Classification::scan("jump!", &d).action(), Some(ActionTag::Jump));
    }

    #[test]
    fn empty_phrase_never_matches() {
        let d = Dictionary::builder().condition(ConditionTag::Hole, [""]).action(ActionTag::Jump, ["じゃんぷ"]).build();
        let c = Classification::scan("じゃんぷ", &d);
        assert_eq!(c.conditions, ConditionSet::empty());
        assert_eq!(c.rule(), Some(Rule::always(ActionTag::Jump)));
    }
}
