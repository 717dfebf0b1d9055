#![forbid(unsafe_code)]

//! Immutable prompt repository.
//!
//! Built once at startup and shared read-only for the life of the process.
//! Construction normalizes and validates:
//!
//! - `code` is whitespace-trimmed and must be non-empty afterwards;
//! - `id`s are unique;
//! - categories are members of [`Category::ALL`] (enforced by parsing).

use std::collections::HashSet;
use std::path::Path;

use crate::category::Category;
use crate::error::CatalogError;
use crate::prompt::PromptRecord;

const BUILTIN: &str = include_str!("../data/prompts.json");

/// Ordered, validated collection of prompt records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptRepository {
    records: Vec<PromptRecord>,
}

impl PromptRepository {
    /// The catalog shipped with vibehub.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN)
    }

    /// Parse a JSON array of records.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let records: Vec<PromptRecord> = serde_json::from_str(json)?;
        Self::from_records(records)
    }

    /// Read and parse a JSON catalog file.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let repo = Self::from_json(&json)?;
        tracing::info!(path = %path.display(), prompts = repo.len(), "catalog loaded");
        Ok(repo)
    }

    /// Validate records and take ownership of them, keeping their order.
    pub fn from_records(mut records: Vec<PromptRecord>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &mut records {
            let trimmed = record.code.trim();
            if trimmed.is_empty() {
                return Err(CatalogError::EmptyCode(record.id.clone()));
            }
            if trimmed.len() != record.code.len() {
                record.code = trimmed.to_string();
            }
            if !seen.insert(record.id.clone()) {
                return Err(CatalogError::DuplicateId(record.id.clone()));
            }
        }
        Ok(Self { records })
    }

    /// All records, in catalog order.
    #[must_use]
    pub fn get_all(&self) -> &[PromptRecord] {
        &self.records
    }

    /// Every category, in display order, whether or not any record uses it.
    #[must_use]
    pub fn get_categories(&self) -> &'static [Category] {
        &Category::ALL
    }

    /// Look up a record by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&PromptRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, code: &str) -> PromptRecord {
        PromptRecord {
            id: id.to_string(),
            category: Category::DevOps,
            title: "t".to_string(),
            description: "d".to_string(),
            code: code.to_string(),
            tags: Vec::new(),
        }
    }

    #[test]
    fn builtin_catalog_is_valid() {
        let repo = PromptRepository::builtin().expect("builtin catalog");
        assert_eq!(repo.len(), 36);
        for c in Category::ALL {
            let n = repo.get_all().iter().filter(|r| r.category == c).count();
            assert_eq!(n, 3, "{c}");
        }
        assert!(repo.get("wd-01").is_some());
    }

    #[test]
    fn categories_are_the_full_enum() {
        let repo = PromptRepository::default();
        assert_eq!(repo.get_categories(), &Category::ALL[..]);
    }

    #[test]
    fn code_is_trimmed() {
        let repo = PromptRepository::from_records(vec![record("a", "\n  body  \n")])
            .expect("valid");
        assert_eq!(repo.get_all()[0].code, "body");
    }

    #[test]
    fn rejects_empty_code() {
        let err = PromptRepository::from_records(vec![record("a", "   \n\t")])
            .expect_err("empty body");
        assert!(matches!(err, CatalogError::EmptyCode(id) if id == "a"));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = PromptRepository::from_records(vec![record("a", "x"), record("a", "y")])
            .expect_err("duplicate");
        assert!(matches!(err, CatalogError::DuplicateId(id) if id == "a"));
    }

    #[test]
    fn rejects_unknown_category() {
        let json = r#"[{"id":"x","category":"Cooking","title":"t",
                       "description":"d","code":"c","tags":[]}]"#;
        let err = PromptRepository::from_json(json).expect_err("unknown category");
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = PromptRepository::from_path(Path::new("/nonexistent/vibehub/catalog.json"))
            .expect_err("missing");
        assert!(matches!(err, CatalogError::Io { .. }));
    }
}
