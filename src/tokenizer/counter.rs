//! Token counting dispatch.
//!
//! A count walks the resolved engines from most to least accurate and
//! returns the first successful result. When no engine is available, or
//! every engine fails to encode, the character heuristic is used.

use crate::tokenizer::encoder::TokenEncoder;
use crate::tokenizer::resolver::TokenizerTier;

/// Average characters per token assumed by the heuristic tier
pub const FALLBACK_TOKEN_RATIO: usize = 4;

/// Estimated token count: `floor(chars / 4)`
///
/// This is an estimate for English-like text, not a real count.
///
/// # Example
/// ```
/// use localgrid::tokenizer::heuristic_count;
///
/// assert_eq!(heuristic_count("hello world"), 2);
/// assert_eq!(heuristic_count("abc"), 0);
/// ```
pub fn heuristic_count(text: &str) -> usize {
    text.chars().count() / FALLBACK_TOKEN_RATIO
}

/// Count with the first engine in `chain` that encodes successfully
pub fn count_with_fallback<'a, I>(text: &str, chain: I) -> usize
where
    I: IntoIterator<Item = (TokenizerTier, &'a dyn TokenEncoder)>,
{
    for (tier, encoder) in chain {
        match encoder.count(text) {
            Ok(count) => return count,
            Err(e) => tracing::warn!("{tier} tokenizer failed to encode, falling back: {e}"),
        }
    }

    heuristic_count(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{LocalGridError, Result};
    use crate::tokenizer::Family;

    struct Fixed(usize);

    impl TokenEncoder for Fixed {
        fn encode(&self, _text: &str) -> Result<Vec<u32>> {
            Ok(vec![0; self.0])
        }
    }

    struct Broken;

    impl TokenEncoder for Broken {
        fn encode(&self, _text: &str) -> Result<Vec<u32>> {
            Err(LocalGridError::Tokenizer("boom".into()))
        }
    }

    #[test]
    fn test_heuristic_floor() {
        assert_eq!(heuristic_count(""), 0);
        assert_eq!(heuristic_count("abcd"), 1);
        assert_eq!(heuristic_count("hello world"), 2);
        // characters, not bytes
        assert_eq!(heuristic_count("日本語のテキスト"), 2);
    }

    #[test]
    fn test_first_engine_wins() {
        let family = Fixed(5);
        let default = Fixed(9);
        let chain: Vec<(TokenizerTier, &dyn TokenEncoder)> = vec![
            (TokenizerTier::Family(Family::Llama), &family),
            (TokenizerTier::Default, &default),
        ];
        assert_eq!(count_with_fallback("some text", chain), 5);
    }

    #[test]
    fn test_failed_engine_steps_down() {
        let default = Fixed(9);
        let chain: Vec<(TokenizerTier, &dyn TokenEncoder)> = vec![
            (TokenizerTier::Family(Family::Qwen), &Broken),
            (TokenizerTier::Default, &default),
        ];
        assert_eq!(count_with_fallback("some text", chain), 9);

        let chain: Vec<(TokenizerTier, &dyn TokenEncoder)> =
            vec![(TokenizerTier::Default, &Broken)];
        assert_eq!(count_with_fallback("hello world", chain), 2);
    }

    #[test]
    fn test_empty_chain_is_heuristic() {
        assert_eq!(count_with_fallback("hello world", Vec::new()), 2);
    }
}
