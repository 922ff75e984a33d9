//! Fixed label catalogue

use std::collections::HashMap;

use super::LabelLookup;
use crate::types::LanguageId;

/// Label catalogue built up front, keyed by (label key, language)
#[derive(Debug, Clone, Default)]
pub struct StaticLabels {
    labels: HashMap<(String, LanguageId), String>,
}

impl StaticLabels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, language_id: LanguageId, text: impl Into<String>) -> Self {
        self.labels.insert((key.into(), language_id), text.into());
        self
    }
}

impl LabelLookup for StaticLabels {
    fn label(&self, key: &str, language_id: LanguageId) -> Option<String> {
        self.labels.get(&(key.to_string(), language_id)).cloned()
    }
}
