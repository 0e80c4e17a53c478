//! # Feature: Message Catalog
//!
//! Ordered broadcast templates loaded once from `messages.json` (`{"messages": [...]}`).
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

use log::{info, warn};
use rand::seq::IndexedRandom;
use rand::Rng;
use serde::Deserialize;
use std::path::Path;

/// Template used when the catalog file is absent, unreadable or empty
pub const DEFAULT_TEMPLATE: &str = "o mundo está em silêncio.";

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    messages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageCatalog {
    templates: Vec<String>,
}

impl MessageCatalog {
    pub fn load(path: &Path) -> Self {
        let templates = match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<CatalogFile>(&contents) {
                Ok(file) => file.messages,
                Err(e) => {
                    warn!("⚠️ Failed to parse catalog {}: {e}", path.display());
                    Vec::new()
                }
            },
            Err(_) => {
                info!("📄 No catalog at {} - using default template", path.display());
                Vec::new()
            }
        };
        Self::from_templates(templates)
    }

    /// Build a catalog, substituting the default template for an empty list
    pub fn from_templates(templates: Vec<String>) -> Self {
        let templates = if templates.is_empty() {
            vec![DEFAULT_TEMPLATE.to_string()]
        } else {
            templates
        };
        Self { templates }
    }

    pub fn templates(&self) -> &[String] {
        &self.templates
    }

    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        self.templates
            .choose(rng)
            .map(String::as_str)
            .unwrap_or(DEFAULT_TEMPLATE)
    }
}
