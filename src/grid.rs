//! The `LocalGrid` facade: one metadata store plus one tokenizer resolver.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::models::MetadataStore;
use crate::tokenizer::{TokenizerResolver, TokenizerTier};

/// Offline token counting and context-window lookup
///
/// Both lookups are total: every input yields a number, degraded paths are
/// only visible in the logs.
///
/// # Example
/// ```
/// use localgrid::{Config, LocalGrid};
///
/// let grid = LocalGrid::from_config(Config::default());
///
/// assert_eq!(grid.get_model_token_limit("model-no-colon"), 8192);
/// assert!(grid.count_tokens("Hello, world!", "gpt-4:latest") > 0);
/// ```
pub struct LocalGrid {
    store: MetadataStore,
    resolver: TokenizerResolver,
}

impl Default for LocalGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalGrid {
    /// Build from [`Config::load`]
    pub fn new() -> Self {
        Self::from_config(Config::load())
    }

    /// Build from an explicit configuration
    ///
    /// Provider files in `data_dir` are layered over the embedded data.
    pub fn from_config(config: Config) -> Self {
        let store = MetadataStore::bundled_with(&config.data_dir);
        tracing::debug!(
            "LocalGrid ready: {} providers, {} models, tokenizers at {}",
            store.len(),
            store.model_count(),
            config.tokenizers_dir.display()
        );

        Self {
            store,
            resolver: TokenizerResolver::from_config(&config),
        }
    }

    /// Build from already constructed parts
    pub fn from_parts(store: MetadataStore, resolver: TokenizerResolver) -> Self {
        Self { store, resolver }
    }

    /// Token count for `text` under `model`'s tokenizer
    pub fn count_tokens(&self, text: &str, model: &str) -> usize {
        self.resolver.count_tokens(text, model)
    }

    /// Context window size for `model`
    pub fn get_model_token_limit(&self, model: &str) -> u32 {
        self.store.resolve_context(model)
    }

    /// Load `model`'s tokenizer ahead of time and report the tier
    pub fn preload(&self, model: &str) -> TokenizerTier {
        self.resolver.tier_for(model)
    }

    /// Token count and context limit together
    pub fn usage(&self, text: &str, model: &str) -> Usage {
        Usage {
            tokens: self.count_tokens(text, model),
            limit: self.get_model_token_limit(model),
        }
    }

    /// Metadata store
    pub fn store(&self) -> &MetadataStore {
        &self.store
    }

    /// Tokenizer resolver
    pub fn resolver(&self) -> &TokenizerResolver {
        &self.resolver
    }
}

/// Tokens used against a model's context window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Tokens in the text
    pub tokens: usize,
    /// Model context window
    pub limit: u32,
}

impl Usage {
    /// Tokens left in the window (zero once exceeded)
    pub fn remaining(&self) -> usize {
        (self.limit as usize).saturating_sub(self.tokens)
    }

    /// Share of the window used (may exceed 1.0)
    pub fn fraction(&self) -> f64 {
        if self.limit == 0 {
            return 0.0;
        }
        self.tokens as f64 / f64::from(self.limit)
    }

    /// Whether the text does not fit
    pub fn exceeds(&self) -> bool {
        self.tokens > self.limit as usize
    }
}
