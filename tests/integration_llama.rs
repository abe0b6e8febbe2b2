//! Regression tests against the real bundled Llama tokenizer.
//!
//! Requires `tokenizers/llama/tokenizer.json` (not checked in):
//!
//! ```text
//! cargo test --test integration_llama -- --ignored
//! ```

use std::path::Path;

use localgrid::tokenizer::{Family, TokenizerTier};
use localgrid::{Config, LocalGrid};

fn grid() -> LocalGrid {
    let config = Config {
        tokenizers_dir: Path::new(env!("CARGO_MANIFEST_DIR")).join("tokenizers"),
        ..Config::default()
    };
    let file = config.tokenizers_dir.join("llama").join("tokenizer.json");
    assert!(
        file.is_file(),
        "missing {}, copy the Llama 3 tokenizer.json there",
        file.display()
    );
    LocalGrid::from_config(config)
}

#[test]
#[ignore = "requires tokenizers/llama/tokenizer.json"]
fn test_llama_token_count() {
    let grid = grid();
    let text = "Hello im alan and today im going to make local grid!!!!!!";

    assert_eq!(
        grid.preload("llama3.1:latest"),
        TokenizerTier::Family(Family::Llama)
    );
    assert_eq!(grid.count_tokens(text, "llama3.1:latest"), 13);
}

#[test]
#[ignore = "requires tokenizers/llama/tokenizer.json"]
fn test_llama_family_shares_tokenizer() {
    let grid = grid();
    let text = "Hello im alan and today im going to make local grid!!!!!!";

    let a = grid.count_tokens(text, "llama3.1:latest");
    let b = grid.count_tokens(text, "llama3.2:3b");
    assert_eq!(a, b);
    assert_eq!(grid.resolver().cached_families(), vec![Family::Llama]);
}
