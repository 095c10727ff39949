//! Field validation for client-supplied book data.
//!
//! Blank values are rejected first; length bounds are checked in
//! characters (not bytes) on the value as given.

use serde::{Deserialize, Serialize};

use crate::error::{FolioError, Result};
use crate::types::CategoryName;

/// Inclusive character-length bounds for a text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldBounds {
    pub field: &'static str,
    pub label: &'static str,
    pub min: usize,
    pub max: usize,
}

impl FieldBounds {
    pub const TITLE: FieldBounds = FieldBounds {
        field: "title",
        label: "Book title",
        min: 2,
        max: 128,
    };

    pub const AUTHOR: FieldBounds = FieldBounds {
        field: "author",
        label: "Author name",
        min: 2,
        max: 64,
    };

    pub const CATEGORY: FieldBounds = FieldBounds {
        field: "categoryName",
        label: "Category name",
        min: 2,
        max: 32,
    };

    /// Checks a single value against these bounds.
    ///
    /// # Example
    ///
    /// ```
    /// use folio_core::FieldBounds;
    ///
    /// assert!(FieldBounds::TITLE.check("Emma").is_ok());
    /// assert!(FieldBounds::TITLE.check("E").is_err());
    /// assert!(FieldBounds::CATEGORY.check("   ").is_err());
    /// ```
    pub fn check(&self, value: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(FolioError::validation(
                self.field,
                format!("{} must be set", self.label),
            ));
        }

        let len = value.chars().count();
        if len < self.min || len > self.max {
            return Err(FolioError::validation(
                self.field,
                format!(
                    "{} length must be between {} and {} characters",
                    self.label, self.min, self.max
                ),
            ));
        }

        Ok(())
    }
}

/// Validated input for creating or updating a book.
///
/// Holding a `BookDraft` means all three fields passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDraft {
    title: String,
    author: String,
    category: CategoryName,
}

impl BookDraft {
    /// Validates every field and reports all violations at once.
    ///
    /// # Example
    ///
    /// ```
    /// use folio_core::BookDraft;
    ///
    /// let draft = BookDraft::new("Emma", "Jane Austen", "Classics").unwrap();
    /// assert_eq!(draft.title(), "Emma");
    ///
    /// let err = BookDraft::new("", "J", "Classics").unwrap_err();
    /// assert!(err.to_string().contains("; "));
    /// ```
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        category: impl Into<String>,
    ) -> Result<Self> {
        let title = title.into();
        let author = author.into();
        let category = category.into();

        let errors: Vec<FolioError> = [
            FieldBounds::TITLE.check(&title),
            FieldBounds::AUTHOR.check(&author),
            FieldBounds::CATEGORY.check(&category),
        ]
        .into_iter()
        .filter_map(|r| r.err())
        .collect();

        if let Some(error) = FolioError::combine(errors) {
            return Err(error);
        }

        Ok(Self {
            title,
            author,
            category: CategoryName::new(category),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn category(&self) -> &CategoryName {
        &self.category
    }
}

/// Validates a category name used as a lookup key.
pub fn validate_category(name: &str) -> Result<CategoryName> {
    FieldBounds::CATEGORY.check(name)?;
    Ok(CategoryName::new(name))
}

/// Validates a (title, author) lookup pair, reporting both violations.
pub fn validate_title_author(title: &str, author: &str) -> Result<()> {
    let errors: Vec<FolioError> = [
        FieldBounds::TITLE.check(title),
        FieldBounds::AUTHOR.check(author),
    ]
    .into_iter()
    .filter_map(|r| r.err())
    .collect();

    match FolioError::combine(errors) {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_are_inclusive() {
        assert!(FieldBounds::CATEGORY.check("ab").is_ok());
        assert!(FieldBounds::CATEGORY.check(&"c".repeat(32)).is_ok());
        assert!(FieldBounds::CATEGORY.check(&"c".repeat(33)).is_err());
    }

    #[test]
    fn test_length_counts_characters() {
        // 64 cyrillic characters are 128 bytes but still a valid author
        let author = "Ж".repeat(64);
        assert!(FieldBounds::AUTHOR.check(&author).is_ok());
    }

    #[test]
    fn test_blank_message() {
        let err = FieldBounds::AUTHOR.check("  ").unwrap_err();
        assert_eq!(err.to_string(), "Author name must be set");
    }

    #[test]
    fn test_draft_collects_all_violations() {
        let err = BookDraft::new("x", "", "y").unwrap_err();
        match err {
            FolioError::Validation { field, message } => {
                assert_eq!(field, "title,author,categoryName");
                assert_eq!(message.matches("; ").count(), 2);
            },
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_validate_title_author() {
        assert!(validate_title_author("Emma", "Austen").is_ok());
        assert!(validate_title_author("E", "Austen").is_err());
    }

    #[test]
    fn test_validate_category() {
        assert_eq!(validate_category("Poetry").unwrap().as_str(), "Poetry");
        assert!(validate_category("").is_err());
    }
}
