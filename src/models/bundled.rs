//! Provider data compiled into the crate.
//!
//! Each `data/<provider>_data.json` file is embedded at build time, so a
//! binary resolves context sizes wherever it runs. Files found in
//! [`Config::data_dir`](crate::config::Config::data_dir) at runtime are
//! layered on top (see [`MetadataStore::extend`]).

use std::path::Path;

use crate::models::store::{parse_provider, MetadataStore};

/// Embedded provider files: (provider, JSON list of model records)
pub static BUNDLED_PROVIDERS: &[(&str, &str)] =
    &[("ollama", include_str!("../../data/ollama_data.json"))];

impl MetadataStore {
    /// Store holding only the embedded provider data
    ///
    /// A provider whose embedded JSON does not parse is logged and left out.
    pub fn bundled() -> Self {
        let mut store = Self::new();

        for (provider, json) in BUNDLED_PROVIDERS {
            match parse_provider(json) {
                Ok(models) => store.insert_provider(provider.to_string(), models),
                Err(e) => tracing::warn!("Skipping bundled provider {provider}: {e}"),
            }
        }

        store
    }

    /// Embedded data overlaid with the provider files found in `dir`
    pub fn bundled_with(dir: &Path) -> Self {
        let mut store = Self::bundled();
        store.extend(Self::load(dir));
        store
    }
}
