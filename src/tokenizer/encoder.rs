//! Tokenizer engines behind a common encoding trait.
//!
//! Two engines are wired in:
//! - HuggingFace `tokenizers` for the bundled per-family `tokenizer.json`
//! - `tiktoken-rs` BPE (cl100k_base / o200k_base) as the generic default
//!
//! Both are asked to encode raw text: no BOS/EOS, no chat template, and
//! special-token strings such as `<|endoftext|>` are tokenized as ordinary
//! text.

use std::path::Path;
use std::sync::Arc;

use tiktoken_rs::{cl100k_base, o200k_base, CoreBPE};
use tokenizers::Tokenizer;

use crate::config::DefaultEncoding;
use crate::error::{LocalGridError, Result};

/// File loaded from each family tokenizer directory
pub const TOKENIZER_FILE: &str = "tokenizer.json";

/// Anything that can turn text into token ids
pub trait TokenEncoder: Send + Sync {
    /// Encode raw text with special-token handling disabled
    fn encode(&self, text: &str) -> Result<Vec<u32>>;

    /// Number of tokens in `text`
    fn count(&self, text: &str) -> Result<usize> {
        Ok(self.encode(text)?.len())
    }
}

/// HuggingFace tokenizer loaded from a `tokenizer.json`
pub struct HfEncoder {
    tokenizer: Tokenizer,
}

impl HfEncoder {
    /// Load from a `tokenizer.json` file
    ///
    /// Truncation and padding saved in the file are cleared so every count
    /// covers the full text.
    pub fn from_file(file: &Path) -> Result<Self> {
        let mut tokenizer = Tokenizer::from_file(file)?;
        tokenizer.with_truncation(None)?;
        tokenizer.with_padding(None);
        Ok(Self { tokenizer })
    }
}

impl TokenEncoder for HfEncoder {
    fn encode(&self, text: &str) -> Result<Vec<u32>> {
        let encoding = self.tokenizer.encode(text, false)?;
        Ok(encoding.get_ids().to_vec())
    }

    fn count(&self, text: &str) -> Result<usize> {
        Ok(self.tokenizer.encode(text, false)?.get_ids().len())
    }
}

impl TokenEncoder for CoreBPE {
    fn encode(&self, text: &str) -> Result<Vec<u32>> {
        Ok(self.encode_ordinary(text))
    }
}

/// Builds a family tokenizer from its bundled directory
pub trait TokenizerLoader: Send + Sync {
    /// Instantiate the tokenizer stored under `dir`
    fn load(&self, dir: &Path) -> Result<Arc<dyn TokenEncoder>>;
}

/// Loads `<dir>/tokenizer.json` with HuggingFace `tokenizers`
#[derive(Debug, Clone, Copy, Default)]
pub struct HfTokenizerLoader;

impl TokenizerLoader for HfTokenizerLoader {
    fn load(&self, dir: &Path) -> Result<Arc<dyn TokenEncoder>> {
        let file = dir.join(TOKENIZER_FILE);
        if !file.is_file() {
            return Err(LocalGridError::TokenizerNotFound(file));
        }

        Ok(Arc::new(HfEncoder::from_file(&file)?))
    }
}

/// Construct the generic default engine
pub fn default_encoder(encoding: DefaultEncoding) -> Result<Arc<dyn TokenEncoder>> {
    let bpe = match encoding {
        DefaultEncoding::Cl100kBase => cl100k_base(),
        DefaultEncoding::O200kBase => o200k_base(),
    }
    .map_err(|e| {
        LocalGridError::Tokenizer(format!("Failed to load {}: {e}", encoding.name()))
    })?;

    Ok(Arc::new(bpe))
}
