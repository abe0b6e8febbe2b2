//! Context-window values and their interpretation.
//!
//! Scraped metadata stores the context size in whatever shape the source
//! page used: `131072`, `128`, `"128K"`, `"32k"`, `"8192"`, `"N/A"`, or
//! nothing at all. [`ContextValue`] captures the shape at deserialization
//! time and [`ContextValue::tokens`] applies the one normalization rule:
//!
//! | Value                      | Result              |
//! |----------------------------|---------------------|
//! | contains `K` / `k`         | number × 1024       |
//! | integer ≤ 1000             | value × 1024        |
//! | integer > 1000             | value               |
//! | anything else, or missing  | [`DEFAULT_CONTEXT`] |

use serde::{Deserialize, Serialize};

/// Context size returned whenever no usable value exists
pub const DEFAULT_CONTEXT: u32 = 8192;

/// Multiplier for "thousands" of tokens
const KILO: i64 = 1024;

/// Bare integers up to this value are read as thousands of tokens
const IMPLICIT_KILO_MAX: i64 = 1000;

/// Loosely typed `context` field of a variant record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawContext", into = "RawContext")]
pub enum ContextValue {
    /// JSON number (floats are truncated)
    Integer(i64),
    /// String carrying a `K` suffix, e.g. `"128K"`
    Suffixed(String),
    /// Any other string: numeric (`"8192"`) or opaque (`"N/A"`)
    Text(String),
}

impl ContextValue {
    /// Normalized context size in tokens, or `None` if the value is unusable
    ///
    /// | Value                                | Result         |
    /// |--------------------------------------|----------------|
    /// | contains `K` / `k`                   | number × 1024  |
    /// | integer ≤ 1000                       | value × 1024   |
    /// | integer > 1000                       | value          |
    /// | result ≤ 0 or above `u32::MAX`       | `None`         |
    /// | anything else                        | `None`         |
    ///
    /// Sizes beyond `u32::MAX` (4 294 967 295 tokens) are not representable
    /// and resolve to [`DEFAULT_CONTEXT`] through [`resolve_context`].
    ///
    /// # Examples
    /// ```
    /// use localgrid::models::ContextValue;
    ///
    /// assert_eq!(ContextValue::Suffixed("128K".into()).tokens(), Some(131072));
    /// assert_eq!(ContextValue::Integer(128).tokens(), Some(131072));
    /// assert_eq!(ContextValue::Integer(8192).tokens(), Some(8192));
    /// assert_eq!(ContextValue::Text("N/A".into()).tokens(), None);
    /// ```
    pub fn tokens(&self) -> Option<u32> {
        let value = match self {
            ContextValue::Integer(n) => scale_bare(*n),
            ContextValue::Suffixed(s) => {
                let digits: String = s
                    .chars()
                    .filter(|c| !c.eq_ignore_ascii_case(&'k'))
                    .collect();
                digits.trim().parse::<i64>().ok()?.checked_mul(KILO)
            }
            ContextValue::Text(s) => scale_bare(s.trim().parse().ok()?),
        }?;

        u32::try_from(value).ok().filter(|&v| v > 0)
    }
}

fn scale_bare(n: i64) -> Option<i64> {
    if n <= IMPLICIT_KILO_MAX {
        n.checked_mul(KILO)
    } else {
        Some(n)
    }
}

impl From<String> for ContextValue {
    fn from(s: String) -> Self {
        if s.contains(['K', 'k']) {
            ContextValue::Suffixed(s)
        } else {
            ContextValue::Text(s)
        }
    }
}

impl From<&str> for ContextValue {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<i64> for ContextValue {
    fn from(n: i64) -> Self {
        ContextValue::Integer(n)
    }
}

/// Resolve an optional context value, falling back to [`DEFAULT_CONTEXT`]
pub fn resolve_context(value: Option<&ContextValue>) -> u32 {
    value
        .and_then(ContextValue::tokens)
        .unwrap_or(DEFAULT_CONTEXT)
}

/// Wire shape accepted for `context`
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawContext {
    Int(i64),
    Float(f64),
    Text(String),
    Other(serde_json::Value),
}

impl From<RawContext> for ContextValue {
    fn from(raw: RawContext) -> Self {
        match raw {
            RawContext::Int(n) => ContextValue::Integer(n),
            RawContext::Float(f) if f.is_finite() => ContextValue::Integer(f.trunc() as i64),
            RawContext::Float(f) => ContextValue::Text(f.to_string()),
            RawContext::Text(s) => ContextValue::from(s),
            RawContext::Other(v) => ContextValue::Text(v.to_string()),
        }
    }
}

impl From<ContextValue> for RawContext {
    fn from(value: ContextValue) -> Self {
        match value {
            ContextValue::Integer(n) => RawContext::Int(n),
            ContextValue::Suffixed(s) | ContextValue::Text(s) => RawContext::Text(s),
        }
    }
}
