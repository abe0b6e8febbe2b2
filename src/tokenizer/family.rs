//! Model family detection.
//!
//! A family is a model lineage sharing one tokenizer (every `llama3.x`
//! release, every `qwen2.x` size). Detection is a case-sensitive substring
//! test on the parent name against [`FAMILY_PRIORITY`], first hit wins.

use std::fmt;

use crate::models::ModelId;

/// Model family with a bundled tokenizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// Cohere Aya
    Aya,
    /// Meta Code Llama
    CodeLlama,
    /// Mistral Codestral
    Codestral,
    /// Cohere Command R / R+
    CommandR,
    /// Databricks DBRX
    Dbrx,
    /// DeepSeek (LLM, Coder, V2/V3, R1)
    DeepSeek,
    /// TII Falcon
    Falcon,
    /// Google Gemma (and CodeGemma)
    Gemma,
    /// IBM Granite
    Granite,
    /// Meta Llama
    Llama,
    /// Mistral AI Mistral
    Mistral,
    /// Mistral AI Mixtral
    Mixtral,
    /// Allen AI OLMo
    Olmo,
    /// Microsoft Phi
    Phi,
    /// Alibaba Qwen
    Qwen,
    /// Upstage Solar
    Solar,
    /// BigCode StarCoder
    StarCoder,
    /// 01.AI Yi
    Yi,
}

/// Detection order: more specific keywords come before the keywords they
/// contain (`codellama` before `llama`), and short keywords that occur
/// inside unrelated names (`phi`, `yi`) come last.
pub const FAMILY_PRIORITY: &[Family] = &[
    Family::CodeLlama,
    Family::Codestral,
    Family::CommandR,
    Family::DeepSeek,
    Family::StarCoder,
    Family::Mixtral,
    Family::Mistral,
    Family::Llama,
    Family::Gemma,
    Family::Granite,
    Family::Qwen,
    Family::Falcon,
    Family::Solar,
    Family::Olmo,
    Family::Dbrx,
    Family::Aya,
    Family::Phi,
    Family::Yi,
];

impl Family {
    /// Substring matched against parent names; also the name of the
    /// family's tokenizer directory
    pub fn keyword(&self) -> &'static str {
        match self {
            Family::Aya => "aya",
            Family::CodeLlama => "codellama",
            Family::Codestral => "codestral",
            Family::CommandR => "command-r",
            Family::Dbrx => "dbrx",
            Family::DeepSeek => "deepseek",
            Family::Falcon => "falcon",
            Family::Gemma => "gemma",
            Family::Granite => "granite",
            Family::Llama => "llama",
            Family::Mistral => "mistral",
            Family::Mixtral => "mixtral",
            Family::Olmo => "olmo",
            Family::Phi => "phi",
            Family::Qwen => "qwen",
            Family::Solar => "solar",
            Family::StarCoder => "starcoder",
            Family::Yi => "yi",
        }
    }

    /// Detect the family from a parent model name
    ///
    /// # Examples
    /// ```
    /// use localgrid::tokenizer::Family;
    ///
    /// assert_eq!(Family::from_parent("llama3.1"), Some(Family::Llama));
    /// assert_eq!(Family::from_parent("codellama"), Some(Family::CodeLlama));
    /// assert_eq!(Family::from_parent("gpt-4"), None);
    /// ```
    pub fn from_parent(parent: &str) -> Option<Self> {
        FAMILY_PRIORITY
            .iter()
            .copied()
            .find(|family| parent.contains(family.keyword()))
    }

    /// Detect the family from a full identifier
    ///
    /// Identifiers without a tag never have a family.
    pub fn detect(model: &str) -> Option<Self> {
        ModelId::parse(model)
            .parts()
            .and_then(|(parent, _)| Self::from_parent(parent))
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_covers_every_family() {
        assert_eq!(FAMILY_PRIORITY.len(), 18);
        for family in FAMILY_PRIORITY {
            assert_eq!(
                FAMILY_PRIORITY.iter().filter(|f| *f == family).count(),
                1,
                "{family} listed twice"
            );
        }
    }

    #[test]
    fn test_each_keyword_detects_itself() {
        for family in FAMILY_PRIORITY {
            let model = format!("{}:latest", family.keyword());
            assert_eq!(Family::detect(&model), Some(*family), "{model}");
        }
    }

    #[test]
    fn test_overlapping_keywords() {
        assert_eq!(Family::detect("codellama:13b"), Some(Family::CodeLlama));
        assert_eq!(Family::detect("llama-3-8b:instruct"), Some(Family::Llama));
        assert_eq!(Family::detect("mixtral:8x7b"), Some(Family::Mixtral));
        assert_eq!(Family::detect("mistral-nemo:12b"), Some(Family::Mistral));
        assert_eq!(Family::detect("codegemma:7b"), Some(Family::Gemma));
        assert_eq!(Family::detect("deepseek-coder:6.7b"), Some(Family::DeepSeek));
        assert_eq!(Family::detect("dolphin-mixtral:latest"), Some(Family::Mixtral));
    }

    #[test]
    fn test_no_family() {
        assert_eq!(Family::detect("llama3.1"), None);
        assert_eq!(Family::detect("gpt-4:latest"), None);
        // case-sensitive
        assert_eq!(Family::detect("Llama3:latest"), None);
        // only the parent name is searched
        assert_eq!(Family::detect("custom:llama"), None);
    }
}
