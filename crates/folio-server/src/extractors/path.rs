use folio_core::validation::{validate_category, validate_title_author};
use folio_core::{BookId, CategoryName, FolioError};
use serde::Deserialize;

/// Extractor para rutas /api/v1/book/{key}
///
/// The single segment is a category name on GET and a book id on PUT and
/// DELETE; the router cannot tell them apart by shape alone.
#[derive(Debug, Deserialize)]
pub struct BookKeyPath {
    pub key: String,
}

/// Extractor para rutas /api/v1/book/{title}/{author}
///
/// The router registers it as `{key}/{author}`: sibling routes must share
/// the name of their first parameter.
#[derive(Debug, Deserialize)]
pub struct TitleAuthorPath {
    #[serde(rename = "key")]
    pub title: String,
    pub author: String,
}

impl BookKeyPath {
    /// Interpreta el segmento como nombre de categoria.
    pub fn category(&self) -> Result<CategoryName, FolioError> {
        validate_category(&self.key)
    }

    /// Interpreta el segmento como id de libro.
    pub fn id(&self) -> Result<BookId, FolioError> {
        self.key.trim().parse()
    }
}

impl TitleAuthorPath {
    /// Valida longitud de titulo y autor.
    pub fn validate(&self) -> Result<(), FolioError> {
        validate_title_author(&self.title, &self.author)
    }
}
