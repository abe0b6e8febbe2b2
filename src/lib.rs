//! # LocalGrid - metadata and token counts for local LLMs
//!
//! Offline answers to two questions about a locally hosted model such as
//! `llama3.1:latest`:
//!
//! - how many tokens does this text cost under the model's tokenizer?
//! - how large is the model's context window?
//!
//! ## Architecture
//!
//! ```text
//!   "llama3.1:latest"
//!          │
//!          ├── parent + tag ──> MetadataStore ──> context (u32)
//!          │                    provider -> parent -> tag -> context
//!          │
//!          └── family ("llama") ──> TokenizerResolver ──> token count
//!                                   family tokenizer (cached)
//!                                     └─> tiktoken default
//!                                           └─> chars / 4
//! ```
//!
//! Context values in the data files are normalized by one rule: a `K`
//! suffix or a bare number ≤ 1000 means thousands (× 1024), a larger number
//! is literal, and anything else falls back to 8192.
//!
//! ## Quick Start
//!
//! ```
//! use localgrid::{Config, LocalGrid};
//!
//! let grid = LocalGrid::from_config(Config::default());
//!
//! let tokens = grid.count_tokens("Hello, world!", "llama3.1:latest");
//! let limit = grid.get_model_token_limit("llama3.1:latest");
//! assert!(tokens > 0 && limit > 0);
//! ```
//!
//! Or through the shared instance:
//!
//! ```
//! let usage = localgrid::usage("Hello, world!", "qwen2.5:7b");
//! assert!(usage.tokens < usage.limit as usize);
//! ```
//!
//! ## Modules
//!
//! - [`models`]: identifiers, context values, provider metadata store
//! - [`tokenizer`]: family detection, tokenizer cache, counting tiers
//! - [`config`]: configuration management
//! - [`error`]: error types and result aliases

use std::sync::OnceLock;

pub mod config;
pub mod error;
mod grid;
pub mod models;
pub mod tokenizer;

// Re-exports for convenience
pub use config::{Config, DefaultEncoding};
pub use error::{LocalGridError, Result};
pub use grid::{LocalGrid, Usage};
pub use models::{MetadataStore, ModelId, DEFAULT_CONTEXT};
pub use tokenizer::{Family, TokenizerResolver, TokenizerTier};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

static SHARED: OnceLock<LocalGrid> = OnceLock::new();

/// Process-wide instance built from [`Config::load`] on first use
pub fn shared() -> &'static LocalGrid {
    SHARED.get_or_init(LocalGrid::new)
}

/// Count tokens with the shared instance
pub fn count(text: &str, model: &str) -> usize {
    shared().count_tokens(text, model)
}

/// Context window size from the shared instance
pub fn limit(model: &str) -> u32 {
    shared().get_model_token_limit(model)
}

/// Load `model`'s tokenizer into the shared instance
pub fn preload(model: &str) -> TokenizerTier {
    shared().preload(model)
}

/// Token count and limit from the shared instance
pub fn usage(text: &str, model: &str) -> Usage {
    shared().usage(text, model)
}
