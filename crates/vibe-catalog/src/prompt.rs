#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::category::Category;

/// One catalog entry.
///
/// `code` is the prompt body. It is carried as opaque text and never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRecord {
    pub id: String,
    pub category: Category,
    pub title: String,
    pub description: String,
    pub code: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl PromptRecord {
    /// Number of lines in the body.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.code.lines().count().max(1)
    }
}
