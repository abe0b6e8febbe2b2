//! Token counting with per-family tokenizers.
//!
//! This module picks a tokenizer for a model identifier and counts with it,
//! falling back through three tiers:
//!
//! - **family**: bundled HuggingFace tokenizer (Llama, Qwen, Mistral, ...)
//! - **default**: tiktoken BPE (cl100k_base unless configured otherwise)
//! - **heuristic**: `chars / 4` estimate
//!
//! # Example
//!
//! ```
//! use localgrid::config::Config;
//! use localgrid::tokenizer::{TokenizerResolver, TokenizerTier};
//!
//! let resolver = TokenizerResolver::from_config(&Config::default());
//!
//! // No family keyword: served by the default engine
//! assert_eq!(resolver.tier_for("gpt-4:latest"), TokenizerTier::Default);
//! assert_eq!(resolver.count_tokens("hello world", "gpt-4:latest"), 2);
//! ```

mod counter;
mod encoder;
mod family;
mod resolver;

pub use counter::{count_with_fallback, heuristic_count, FALLBACK_TOKEN_RATIO};
pub use encoder::{
    default_encoder, HfEncoder, HfTokenizerLoader, TokenEncoder, TokenizerLoader, TOKENIZER_FILE,
};
pub use family::{Family, FAMILY_PRIORITY};
pub use resolver::{ResolvedTokenizer, TokenizerCache, TokenizerResolver, TokenizerTier};
