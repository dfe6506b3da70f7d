//! Trigger-phrase dictionaries.
//!
//! A [`Dictionary`] maps every condition and action tag to the ordered list
//! of phrases that identify it in a child's text. The compiler only reads it.
//!
//! Dictionaries are published as two JSON documents, one per tag family:
//!
//! ```json
//! // conditions.json
//! { "wall": ["かべ", "カベ"], "hole": ["あな"], "enemy": ["おばけ"], "coin": ["こいん"] }
//! // actions.json
//! { "jump": ["じゃんぷ", "ジャンプ"], "crouch": ["しゃがむ"], "collect": ["あつめる"] }
//! ```
//!
//! Where those documents come from is a [`DictionaryProvider`]'s business.
//! [`FallbackProvider`] wraps any provider and substitutes
//! [`Dictionary::builtin`] when loading fails, so a game can always start.

use crate::{ActionTag, ConditionTag};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

static BUILTIN: Lazy<Dictionary> = Lazy::new(|| {
    Dictionary::builder()
        .condition(ConditionTag::Wall, ["かべ", "カベ", "壁"])
        .condition(ConditionTag::Enemy, ["おばけ", "オバケ", "てき", "敵"])
        .condition(ConditionTag::Hole, ["あな", "アナ", "穴"])
        .condition(ConditionTag::Coin, ["こいん", "コイン"])
        .action(ActionTag::Jump, ["じゃんぷ", "ジャンプ", "とぶ", "とんで"])
        .action(ActionTag::Crouch, ["しゃがむ", "しゃがんで", "かがむ"])
        .action(ActionTag::Collect, ["あつめる", "あつめて", "ひろう", "とる"])
        .build()
});

/// Read-only phrase tables for all condition and action tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
    conditions: HashMap<ConditionTag, Vec<String>>,
    actions: HashMap<ActionTag, Vec<String>>,
}

impl Dictionary {
    /// An empty dictionary. Nothing will match.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> DictionaryBuilder {
        DictionaryBuilder::default()
    }

    /// Phrase set shipped with the crate, used when no published dictionary
    /// can be loaded.
    pub fn builtin() -> Dictionary {
        BUILTIN.clone()
    }

    /// Phrases for `tag`, in match order. Empty when the tag has none.
    pub fn condition_phrases(&self, tag: ConditionTag) -> &[String] {
        self.conditions.get(&tag).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Phrases for `tag`, in match order. Empty when the tag has none.
    pub fn action_phrases(&self, tag: ActionTag) -> &[String] {
        self.actions.get(&tag).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.values().all(Vec::is_empty) && self.actions.values().all(Vec::is_empty)
    }

    /// Decode the two published dictionary documents.
    ///
    /// Each document is an object from tag name to a list of phrases. Keys
    /// that do not name a known tag are skipped.
    pub fn from_json(conditions_json: &str, actions_json: &str) -> Result<Dictionary, DictionaryError> {
        let conditions = decode_document(conditions_json, "conditions")?;
        let actions = decode_document(actions_json, "actions")?;

        let mut builder = Dictionary::builder();
        for (name, phrases) in conditions {
            match ConditionTag::from_name(&name) {
                Some(tag) => builder = builder.condition(tag, phrases),
                None => tracing::debug!(tag = %name, "unknown condition tag ignored"),
            }
        }
        for (name, phrases) in actions {
            match ActionTag::from_name(&name) {
                Some(tag) => builder = builder.action(tag, phrases),
                None => tracing::debug!(tag = %name, "unknown action tag ignored"),
            }
        }
        Ok(builder.build())
    }

    /// Encode back into the `(conditions, actions)` document pair.
    pub fn to_json(&self) -> Result<(String, String), DictionaryError> {
        let conditions: HashMap<&str, &Vec<String>> =
            self.conditions.iter().map(|(tag, phrases)| (tag.name(), phrases)).collect();
        let actions: HashMap<&str, &Vec<String>> =
            self.actions.iter().map(|(tag, phrases)| (tag.name(), phrases)).collect();

        let conditions = serde_json::to_string_pretty(&conditions)
            .map_err(|source| DictionaryError::Json { document: "conditions", source })?;
        let actions = serde_json::to_string_pretty(&actions)
            .map_err(|source| DictionaryError::Json { document: "actions", source })?;
        Ok((conditions, actions))
    }
}

fn decode_document(json: &str, document: &'static str) -> Result<HashMap<String, Vec<String>>, DictionaryError> {
    serde_json::from_str(json).map_err(|source| DictionaryError::Json { document, source })
}

/// Incremental construction of a [`Dictionary`].
///
/// Adding phrases to a tag twice appends; order is preserved.
#[derive(Debug, Clone, Default)]
pub struct DictionaryBuilder {
    dict: Dictionary,
}

impl DictionaryBuilder {
    #[must_use]
    pub fn condition<I, S>(mut self, tag: ConditionTag, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dict.conditions.entry(tag).or_default().extend(phrases.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn action<I, S>(mut self, tag: ActionTag, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dict.actions.entry(tag).or_default().extend(phrases.into_iter().map(Into::into));
        self
    }

    pub fn build(self) -> Dictionary {
        self.dict
    }
}

// --- Errors -------------------------------------------------------------------

/// Failure to obtain a dictionary.
#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed {document} dictionary: {source}")]
    Json {
        document: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

// --- Providers ----------------------------------------------------------------

/// Source of a [`Dictionary`].
pub trait DictionaryProvider {
    fn load(&self) -> Result<Dictionary, DictionaryError>;
}

/// Provider that hands out a fixed dictionary.
#[derive(Debug, Clone)]
pub struct StaticProvider(pub Dictionary);

impl DictionaryProvider for StaticProvider {
    fn load(&self) -> Result<Dictionary, DictionaryError> {
        Ok(self.0.clone())
    }
}

/// Reads `conditions.json` and `actions.json` from a directory.
#[derive(Debug, Clone)]
pub struct DirectoryProvider {
    root: PathBuf,
}

impl DirectoryProvider {
    pub const CONDITIONS_FILE: &'static str = "conditions.json";
    pub const ACTIONS_FILE: &'static str = "actions.json";

    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirectoryProvider { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read(&self, file: &str) -> Result<String, DictionaryError> {
        let path = self.root.join(file);
        std::fs::read_to_string(&path).map_err(|source| DictionaryError::Io { path, source })
    }
}

impl DictionaryProvider for DirectoryProvider {
    fn load(&self) -> Result<Dictionary, DictionaryError> {
        let conditions = self.read(Self::CONDITIONS_FILE)?;
        let actions = self.read(Self::ACTIONS_FILE)?;
        Dictionary::from_json(&conditions, &actions)
    }
}

/// Wraps a provider and falls back to [`Dictionary::builtin`] on failure.
#[derive(Debug, Clone)]
pub struct FallbackProvider<P> {
    inner: P,
}

impl<P: DictionaryProvider> FallbackProvider<P> {
    pub fn new(inner: P) -> Self {
        FallbackProvider { inner }
    }

    /// Load from the wrapped provider, or the built-in dictionary. Never
    /// fails.
    pub fn load_or_builtin(&self) -> Dictionary {
        match self.inner.load() {
            Ok(dict) => dict,
            Err(err) => {
                tracing::warn!(error = %err, "dictionary unavailable, using built-in phrases");
                Dictionary::builtin()
            }
        }
    }
}

impl<P: DictionaryProvider> DictionaryProvider for FallbackProvider<P> {
    fn load(&self) -> Result<Dictionary, DictionaryError> {
        Ok(self.load_or_builtin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const CONDITIONS: &str = r#"{ "wall": ["かべ", "カベ"], "hole": ["あな"], "lava": ["ようがん"] }"#;
    const ACTIONS: &str = r#"{ "jump": ["じゃんぷ"], "crouch": [] }"#;

    #[test]
    fn from_json_keeps_phrase_order() {
        let dict = Dictionary::from_json(CONDITIONS, ACTIONS).unwrap();
        assert_eq!(dict.condition_phrases(ConditionTag::Wall), ["かべ", "カベ"]);
        assert_eq!(dict.condition_phrases(ConditionTag::Hole), ["あな"]);
        assert!(dict.condition_phrases(ConditionTag::Coin).is_empty());
        assert_eq!(dict.action_phrases(ActionTag::Jump), ["じゃんぷ"]);
        assert!(dict.action_phrases(ActionTag::Crouch).is_empty());
    }

    #[test]
    fn from_json_rejects_malformed_document() {
        let err = Dictionary::from_json(CONDITIONS, r#"{ "jump": "じゃんぷ" }"#).unwrap_err();
        assert!(matches!(err, DictionaryError::Json { document: "actions", .. }));
        assert!(err.to_string().starts_with("malformed actions dictionary"));
    }

    #[test]
    fn to_json_decodes_to_same_dictionary() {
        let builtin = Dictionary::builtin();
        let (conditions, actions) = builtin.to_json().unwrap();
        assert_eq!(Dictionary::from_json(&conditions, &actions).unwrap(), builtin);
    }

    #[test]
    fn builder_appends() {
        let dict = Dictionary::builder()
            .action(ActionTag::Jump, ["じゃんぷ"])
            .action(ActionTag::Jump, vec![String::from("ジャンプ")])
            .build();
        assert_eq!(dict.action_phrases(ActionTag::Jump), ["じゃんぷ", "ジャンプ"]);
        assert!(!dict.is_empty());
        assert!(Dictionary::new().is_empty());
    }

    #[test]
    fn builtin_covers_every_tag() {
        let dict = Dictionary::builtin();
        for tag in ConditionTag::PRIORITY {
            assert!(!dict.condition_phrases(tag).is_empty(), "{tag} has no phrases");
        }
        for tag in ActionTag::PRIORITY {
            assert!(!dict.action_phrases(tag).is_empty(), "{tag} has no phrases");
        }
    }

    #[test]
    fn directory_provider_reads_both_documents() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(DirectoryProvider::CONDITIONS_FILE), CONDITIONS).unwrap();
        fs::write(dir.path().join(DirectoryProvider::ACTIONS_FILE), ACTIONS).unwrap();

        let dict = DirectoryProvider::new(dir.path()).load().unwrap();
        assert_eq!(dict.condition_phrases(ConditionTag::Wall), ["かべ", "カベ"]);
    }

    #[test]
    fn directory_provider_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(DirectoryProvider::CONDITIONS_FILE), CONDITIONS).unwrap();

        let err = DirectoryProvider::new(dir.path()).load().unwrap_err();
        match err {
            DictionaryError::Io { path, .. } => assert!(path.ends_with("actions.json")),
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn fallback_provider_uses_builtin_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FallbackProvider::new(DirectoryProvider::new(dir.path().join("missing")));
        assert_eq!(provider.load().unwrap(), Dictionary::builtin());
    }

    #[test]
    fn fallback_provider_passes_through_success() {
        let dict = Dictionary::builder().action(ActionTag::Collect, ["とる"]).build();
        let provider = FallbackProvider::new(StaticProvider(dict.clone()));
        assert_eq!(provider.load_or_builtin(), dict);
    }
}
