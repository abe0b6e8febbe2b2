//! Model metadata: identifiers, context values and the provider store.
//!
//! # Example
//!
//! ```
//! use localgrid::models::{ContextValue, MetadataStore, ModelId, ModelRecord};
//!
//! let store = MetadataStore::from_providers([(
//!     "ollama",
//!     vec![
//!         ModelRecord::new("gemma").with_variant("latest", Some(ContextValue::Integer(8192))),
//!         ModelRecord::new("qwen2.5").with_variant("7b", Some("32K".into())),
//!     ],
//! )]);
//!
//! assert_eq!(store.resolve_context("gemma:latest"), 8192);
//! assert_eq!(store.resolve_context("qwen2.5:7b"), 32768);
//! assert_eq!(ModelId::parse("qwen2.5:7b").parent(), "qwen2.5");
//! ```

mod bundled;
mod context;
mod identifier;
mod store;

pub use bundled::BUNDLED_PROVIDERS;
pub use context::{resolve_context, ContextValue, DEFAULT_CONTEXT};
pub use identifier::{ModelId, SEPARATOR};
pub use store::{MetadataStore, ModelRecord, VariantRecord, PROVIDER_FILE_SUFFIX};
