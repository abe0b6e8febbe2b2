//! Tokenizer resolution with a per-family cache.
//!
//! Resolution order for a model identifier:
//!
//! 1. No tag, or no known family in the parent name: default engine.
//! 2. Family already cached: cached engine, no filesystem access.
//! 3. Family directory missing: default engine. Nothing is cached, so the
//!    directory is checked again on the next call.
//! 4. Family directory present: instantiate. Success is cached; failure is
//!    logged and falls to the default engine without caching.
//!
//! If the default engine itself could not be built, the heuristic is the
//! last tier.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::Config;
use crate::error::Result;
use crate::tokenizer::counter::count_with_fallback;
use crate::tokenizer::encoder::{default_encoder, HfTokenizerLoader, TokenEncoder, TokenizerLoader};
use crate::tokenizer::family::{Family, FAMILY_PRIORITY};

/// Fallback tier that served a request, most accurate first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenizerTier {
    /// Family-specific bundled tokenizer
    Family(Family),
    /// Generic default engine (tiktoken)
    Default,
    /// `chars / 4` estimate
    Heuristic,
}

impl fmt::Display for TokenizerTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenizerTier::Family(family) => write!(f, "{family}"),
            TokenizerTier::Default => f.write_str("default"),
            TokenizerTier::Heuristic => f.write_str("heuristic"),
        }
    }
}

/// Outcome of resolving a model identifier
#[derive(Clone)]
pub enum ResolvedTokenizer {
    /// Bundled tokenizer for the detected family
    Family(Family, Arc<dyn TokenEncoder>),
    /// Generic default engine
    Default(Arc<dyn TokenEncoder>),
    /// No engine available
    Heuristic,
}

impl ResolvedTokenizer {
    /// Tier of this resolution
    pub fn tier(&self) -> TokenizerTier {
        match self {
            ResolvedTokenizer::Family(family, _) => TokenizerTier::Family(*family),
            ResolvedTokenizer::Default(_) => TokenizerTier::Default,
            ResolvedTokenizer::Heuristic => TokenizerTier::Heuristic,
        }
    }

    /// Engine, if any
    pub fn encoder(&self) -> Option<&Arc<dyn TokenEncoder>> {
        match self {
            ResolvedTokenizer::Family(_, encoder) | ResolvedTokenizer::Default(encoder) => {
                Some(encoder)
            }
            ResolvedTokenizer::Heuristic => None,
        }
    }
}

impl fmt::Debug for ResolvedTokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ResolvedTokenizer").field(&self.tier()).finish()
    }
}

/// Loaded family tokenizers, keyed by family
///
/// Entries are never evicted; the key space is the fixed family list.
#[derive(Default)]
pub struct TokenizerCache {
    entries: HashMap<Family, Arc<dyn TokenEncoder>>,
}

impl TokenizerCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached engine for a family
    pub fn get(&self, family: Family) -> Option<Arc<dyn TokenEncoder>> {
        self.entries.get(&family).cloned()
    }

    /// Store a loaded engine
    pub fn insert(&mut self, family: Family, encoder: Arc<dyn TokenEncoder>) {
        self.entries.insert(family, encoder);
    }

    /// Check if a family is loaded
    pub fn contains(&self, family: Family) -> bool {
        self.entries.contains_key(&family)
    }

    /// Number of loaded families
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is loaded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Maps model identifiers to tokenizer engines
///
/// The cache lock is held across "check, load, insert" so concurrent
/// callers never load the same family twice.
pub struct TokenizerResolver {
    tokenizers_dir: PathBuf,
    loader: Box<dyn TokenizerLoader>,
    default: Option<Arc<dyn TokenEncoder>>,
    cache: Mutex<TokenizerCache>,
}

impl TokenizerResolver {
    /// Create a resolver over `tokenizers_dir`
    ///
    /// `default` is the generic tier; `None` leaves only the heuristic
    /// behind the family tier.
    pub fn new(
        tokenizers_dir: impl Into<PathBuf>,
        loader: Box<dyn TokenizerLoader>,
        default: Option<Arc<dyn TokenEncoder>>,
    ) -> Self {
        Self {
            tokenizers_dir: tokenizers_dir.into(),
            loader,
            default,
            cache: Mutex::new(TokenizerCache::new()),
        }
    }

    /// Resolver with the HuggingFace loader and the configured tiktoken
    /// default
    ///
    /// A default engine that fails to build is logged and left out.
    pub fn from_config(config: &Config) -> Self {
        let default = match default_encoder(config.default_encoding) {
            Ok(encoder) => Some(encoder),
            Err(e) => {
                tracing::warn!("Default tokenizer unavailable, using heuristic: {e}");
                None
            }
        };

        Self::new(
            config.tokenizers_dir.clone(),
            Box::new(HfTokenizerLoader),
            default,
        )
    }

    /// Root of the family tokenizer directories
    pub fn tokenizers_dir(&self) -> &Path {
        &self.tokenizers_dir
    }

    /// Expected bundled directory for a family
    pub fn family_dir(&self, family: Family) -> PathBuf {
        self.tokenizers_dir.join(family.keyword())
    }

    /// Whether the generic default engine is available
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Families loaded so far
    pub fn cached_families(&self) -> Vec<Family> {
        let cache = self.lock_cache();
        FAMILY_PRIORITY
            .iter()
            .copied()
            .filter(|family| cache.contains(*family))
            .collect()
    }

    /// Resolve the best available engine for `model`
    pub fn resolve(&self, model: &str) -> ResolvedTokenizer {
        let Some(family) = Family::detect(model) else {
            tracing::debug!("No tokenizer family for {model}, using default");
            return self.fallback();
        };

        match self.load_family(family) {
            Ok(Some(encoder)) => ResolvedTokenizer::Family(family, encoder),
            Ok(None) => {
                tracing::debug!(
                    "No bundled tokenizer at {}, using default",
                    self.family_dir(family).display()
                );
                self.fallback()
            }
            Err(e) => {
                tracing::warn!("Could not load bundled tokenizer for {family}: {e}");
                self.fallback()
            }
        }
    }

    /// Tier that would serve `model`, loading its family tokenizer if needed
    pub fn tier_for(&self, model: &str) -> TokenizerTier {
        self.resolve(model).tier()
    }

    /// Count tokens in `text` for `model`
    ///
    /// Never fails: an engine that errors hands over to the next tier.
    pub fn count_tokens(&self, text: &str, model: &str) -> usize {
        let resolved = self.resolve(model);

        let mut chain: Vec<(TokenizerTier, &dyn TokenEncoder)> = Vec::with_capacity(2);
        if let ResolvedTokenizer::Family(family, encoder) = &resolved {
            chain.push((TokenizerTier::Family(*family), encoder.as_ref()));
        }
        if let Some(encoder) = &self.default {
            chain.push((TokenizerTier::Default, encoder.as_ref()));
        }

        count_with_fallback(text, chain)
    }

    fn fallback(&self) -> ResolvedTokenizer {
        match &self.default {
            Some(encoder) => ResolvedTokenizer::Default(Arc::clone(encoder)),
            None => ResolvedTokenizer::Heuristic,
        }
    }

    /// `Ok(None)` when the family has no bundled directory
    fn load_family(&self, family: Family) -> Result<Option<Arc<dyn TokenEncoder>>> {
        let mut cache = self.lock_cache();

        if let Some(encoder) = cache.get(family) {
            return Ok(Some(encoder));
        }

        let dir = self.family_dir(family);
        if !dir.exists() {
            return Ok(None);
        }

        let encoder = self.loader.load(&dir)?;
        tracing::debug!("Loaded {family} tokenizer from {}", dir.display());
        cache.insert(family, Arc::clone(&encoder));
        Ok(Some(encoder))
    }

    fn lock_cache(&self) -> MutexGuard<'_, TokenizerCache> {
        // entries are inserted whole, a poisoned cache is still consistent
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
