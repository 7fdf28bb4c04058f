//! # Translator Configuration
//!
//! Knobs for the text the translators emit. Every field has a default, so a
//! partial JSON document (or none at all) is a valid configuration.
//!
//! ```rust
//! use printgraph::TranslatorConfig;
//!
//! let config = TranslatorConfig::from_json_str(r#"{ "indent_width": 2 }"#)?;
//! assert_eq!(config.indent_width, 2);
//! assert!(config.emit_header);
//! # Ok::<(), printgraph::ConfigError>(())
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    /// Spaces per indentation level.
    pub indent_width: usize,
    /// Prefix each class with an auto-generated banner comment.
    pub emit_header: bool,
    /// Prefix for temporaries holding node results.
    pub temp_prefix: String,
    /// Prefix for `for` loop index variables.
    pub loop_index_prefix: String,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            indent_width: 4,
            emit_header: true,
            temp_prefix: "temp".to_string(),
            loop_index_prefix: "i".to_string(),
        }
    }
}

impl TranslatorConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub(crate) fn indent_unit(&self) -> String {
        " ".repeat(self.indent_width)
    }
}
