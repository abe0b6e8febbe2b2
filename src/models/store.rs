//! Metadata store for model context sizes.
//!
//! The store is built once from a directory of provider files, each named
//! `<provider>_data.json` and holding a list of model records:
//!
//! ```json
//! [
//!   {
//!     "parent_model": "llama3.1",
//!     "variants": {
//!       "latest": { "context": "128K" },
//!       "8b":     { "context": 128 }
//!     }
//!   }
//! ]
//! ```
//!
//! [`MetadataStore::bundled`] holds the same files compiled into the crate.
//!
//! Providers are scanned in alphabetical order, so when the same
//! `parent:tag` pair appears under several providers the alphabetically
//! first provider wins.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LocalGridError, Result};
use crate::models::context::{resolve_context, ContextValue, DEFAULT_CONTEXT};
use crate::models::identifier::ModelId;

/// File name suffix identifying a provider data file
pub const PROVIDER_FILE_SUFFIX: &str = "_data.json";

/// A parent model and its variants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRecord {
    /// Base model name, unique within its provider
    pub parent_model: String,

    /// Tag -> variant metadata
    #[serde(default)]
    pub variants: HashMap<String, VariantRecord>,
}

impl ModelRecord {
    /// Create a record with no variants
    pub fn new(parent_model: impl Into<String>) -> Self {
        Self {
            parent_model: parent_model.into(),
            variants: HashMap::new(),
        }
    }

    /// Add a variant (builder style)
    pub fn with_variant(mut self, tag: impl Into<String>, context: Option<ContextValue>) -> Self {
        self.variants.insert(tag.into(), VariantRecord { context });
        self
    }
}

/// Metadata for one tagged variant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantRecord {
    /// Raw context size as scraped; may be absent
    #[serde(default)]
    pub context: Option<ContextValue>,
}

impl VariantRecord {
    /// Normalized context size for this variant
    pub fn context_tokens(&self) -> u32 {
        resolve_context(self.context.as_ref())
    }
}

/// In-memory index: provider -> parent model -> record
///
/// Immutable after construction.
#[derive(Debug, Clone, Default)]
pub struct MetadataStore {
    providers: BTreeMap<String, HashMap<String, ModelRecord>>,
}

impl MetadataStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `*_data.json` file in `dir`
    ///
    /// Never fails: a missing directory yields an empty store and a
    /// malformed provider file is skipped.
    pub fn load(dir: &Path) -> Self {
        match Self::try_load(dir) {
            Ok(store) => store,
            Err(e) => {
                tracing::debug!("Metadata source {} unavailable: {e}", dir.display());
                Self::new()
            }
        }
    }

    /// Load every `*_data.json` file in `dir`, failing if the directory
    /// itself cannot be read
    pub fn try_load(dir: &Path) -> Result<Self> {
        let mut store = Self::new();

        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            let Some(provider) = path
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(|name| name.strip_suffix(PROVIDER_FILE_SUFFIX))
                .map(str::to_string)
            else {
                continue;
            };

            match load_provider_file(&path) {
                Ok(models) => {
                    tracing::debug!("Loaded {} models for provider {provider}", models.len());
                    store.insert_provider(provider, models);
                }
                Err(e) => tracing::warn!("Skipping provider file {}: {e}", path.display()),
            }
        }

        Ok(store)
    }

    /// Build a store from in-memory provider data
    pub fn from_providers<I, P, M>(providers: I) -> Self
    where
        I: IntoIterator<Item = (P, M)>,
        P: Into<String>,
        M: IntoIterator<Item = ModelRecord>,
    {
        let mut store = Self::new();
        for (name, models) in providers {
            store.insert_provider(name.into(), models);
        }
        store
    }

    pub(crate) fn insert_provider(&mut self, name: String, models: impl IntoIterator<Item = ModelRecord>) {
        let index = models
            .into_iter()
            .map(|model| (model.parent_model.clone(), model))
            .collect();
        self.providers.insert(name, index);
    }

    /// Add every provider of `other`, replacing same-named providers whole
    pub fn extend(&mut self, other: MetadataStore) {
        for (name, models) in other.providers {
            if self.providers.insert(name.clone(), models).is_some() {
                tracing::debug!("Provider {name} overridden from disk");
            }
        }
    }

    /// Find the first provider holding `parent:tag`
    ///
    /// Returns the provider name with the variant.
    pub fn get(&self, parent: &str, tag: &str) -> Option<(&str, &VariantRecord)> {
        self.providers.iter().find_map(|(provider, models)| {
            models
                .get(parent)
                .and_then(|model| model.variants.get(tag))
                .map(|variant| (provider.as_str(), variant))
        })
    }

    /// Context window size for a model identifier
    ///
    /// Returns [`DEFAULT_CONTEXT`] when the identifier has no tag, no
    /// provider knows the variant, or the stored value is unusable.
    ///
    /// Only the first provider holding `parent:tag` is consulted. An
    /// unusable or empty value there yields the default even if a later
    /// provider has a usable one.
    ///
    /// # Example
    /// ```
    /// use localgrid::models::{MetadataStore, ModelRecord, DEFAULT_CONTEXT};
    ///
    /// let store = MetadataStore::from_providers([(
    ///     "ollama",
    ///     vec![ModelRecord::new("llama3.1").with_variant("latest", Some("128K".into()))],
    /// )]);
    ///
    /// assert_eq!(store.resolve_context("llama3.1:latest"), 131072);
    /// assert_eq!(store.resolve_context("llama3.1"), DEFAULT_CONTEXT);
    /// ```
    pub fn resolve_context(&self, model: &str) -> u32 {
        let Some((parent, tag)) = ModelId::parse(model).parts() else {
            return DEFAULT_CONTEXT;
        };

        self.get(parent, tag)
            .map(|(_, variant)| variant.context_tokens())
            .unwrap_or(DEFAULT_CONTEXT)
    }

    /// Provider names in lookup order
    pub fn providers(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(|s| s.as_str())
    }

    /// Number of providers
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Check if no provider was loaded
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Total parent models across providers
    pub fn model_count(&self) -> usize {
        self.providers.values().map(|models| models.len()).sum()
    }
}

fn load_provider_file(path: &Path) -> Result<Vec<ModelRecord>> {
    let content = std::fs::read_to_string(path)?;
    parse_provider(&content)
        .map_err(|e| LocalGridError::DataSource(format!("{}: {e}", path.display())))
}

/// Parse the JSON list of model records of one provider
pub(crate) fn parse_provider(json: &str) -> Result<Vec<ModelRecord>> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mock_store() -> MetadataStore {
        let models: Vec<ModelRecord> = serde_json::from_value(json!([
            {
                "parent_model": "llama3.1",
                "variants": {
                    "latest": {"context": "128K"},
                    "8b": {"context": 128}
                }
            },
            {
                "parent_model": "gemma",
                "variants": {
                    "latest": {"context": 8192},
                    "2b": {"context": "N/A"}
                }
            },
            {
                "parent_model": "phi-3",
                "variants": {
                    "mini": {}
                }
            }
        ]))
        .unwrap();

        MetadataStore::from_providers([("ollama", models)])
    }

    #[test]
    fn test_resolve_context_cases() {
        let store = mock_store();

        let cases = [
            ("llama3.1:latest", 131072),
            ("llama3.1:8b", 131072),
            ("gemma:latest", 8192),
            ("gemma:2b", DEFAULT_CONTEXT),
            ("phi-3:mini", DEFAULT_CONTEXT),
            ("unknown-model:latest", DEFAULT_CONTEXT),
            ("llama3.1:70b", DEFAULT_CONTEXT),
            ("model-no-colon", DEFAULT_CONTEXT),
        ];

        for (model, expected) in cases {
            assert_eq!(store.resolve_context(model), expected, "{model}");
        }
    }

    #[test]
    fn test_empty_store_defaults() {
        let store = MetadataStore::new();
        assert!(store.is_empty());
        assert_eq!(store.resolve_context("llama3.1:latest"), DEFAULT_CONTEXT);
    }

    #[test]
    fn test_missing_dir_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = MetadataStore::load(&dir.path().join("nope"));
        assert!(store.is_empty());
        assert!(MetadataStore::try_load(&dir.path().join("nope")).is_err());
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("ollama_data.json"),
            r#"[{"parent_model": "qwen2.5", "variants": {"7b": {"context": "32K", "size": "4.7GB"}}}]"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.json"), "[]").unwrap();
        std::fs::write(dir.path().join("broken_data.json"), "{ not json").unwrap();

        let store = MetadataStore::load(dir.path());
        assert_eq!(store.providers().collect::<Vec<_>>(), vec!["ollama"]);
        assert_eq!(store.model_count(), 1);
        assert_eq!(store.resolve_context("qwen2.5:7b"), 32768);
    }

    #[test]
    fn test_provider_precedence_is_alphabetical() {
        let store = MetadataStore::from_providers([
            (
                "zeta",
                vec![ModelRecord::new("llama3").with_variant("latest", Some(ContextValue::Integer(4096)))],
            ),
            (
                "alpha",
                vec![ModelRecord::new("llama3").with_variant("latest", Some("8K".into()))],
            ),
        ]);

        assert_eq!(store.providers().collect::<Vec<_>>(), vec!["alpha", "zeta"]);
        assert_eq!(store.get("llama3", "latest").map(|(p, _)| p), Some("alpha"));
        assert_eq!(store.resolve_context("llama3:latest"), 8192);
    }

    #[test]
    fn test_first_match_wins_even_if_unusable() {
        let store = MetadataStore::from_providers([
            (
                "alpha",
                vec![ModelRecord::new("mistral").with_variant("7b", Some("N/A".into()))],
            ),
            (
                "beta",
                vec![ModelRecord::new("mistral").with_variant("7b", Some("32K".into()))],
            ),
        ]);

        assert_eq!(store.resolve_context("mistral:7b"), DEFAULT_CONTEXT);
    }

    #[test]
    fn test_later_provider_fills_missing_tag() {
        let store = MetadataStore::from_providers([
            (
                "alpha",
                vec![ModelRecord::new("mistral").with_variant("latest", Some("32K".into()))],
            ),
            (
                "beta",
                vec![ModelRecord::new("mistral").with_variant("7b", Some("16K".into()))],
            ),
        ]);

        assert_eq!(store.resolve_context("mistral:7b"), 16384);
    }

    #[test]
    fn test_null_context() {
        let models: Vec<ModelRecord> = serde_json::from_str(
            r#"[{"parent_model": "olmo2", "variants": {"latest": {"context": null}}}]"#,
        )
        .unwrap();
        let store = MetadataStore::from_providers([("ollama", models)]);
        assert_eq!(store.resolve_context("olmo2:latest"), DEFAULT_CONTEXT);
    }
}
