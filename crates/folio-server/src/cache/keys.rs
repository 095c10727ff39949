//! Derived cache keys and the regions they live in.

use folio_core::{BookId, CategoryName};
use std::fmt;

/// Una region del cache: una forma de consulta con su propio TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheRegion {
    /// Book lists keyed by category name.
    BooksByCategory,
    /// Single books keyed by their (title, author) pair.
    BookByTitleAndAuthor,
}

impl CacheRegion {
    /// Every region, in a stable order.
    pub const ALL: [CacheRegion; 2] = [Self::BooksByCategory, Self::BookByTitleAndAuthor];

    /// Retorna el nombre usado en configuracion y metricas.
    pub fn name(&self) -> &'static str {
        match self {
            Self::BooksByCategory => "booksByCategory",
            Self::BookByTitleAndAuthor => "bookByTitleAndAuthor",
        }
    }

    /// Parses a configured region name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|region| region.name() == name)
    }
}

impl fmt::Display for CacheRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Key derivada: calculada a partir de atributos del libro, nunca de su id.
///
/// The title+author key keeps both parts separately, so ("ab", "c") and
/// ("a", "bc") never collide. Keys are case-sensitive.
///
/// # Examples
///
/// ```
/// use folio_server::cache::{CacheKey, CacheRegion};
///
/// let key = CacheKey::category("Classics");
/// assert_eq!(key.region(), CacheRegion::BooksByCategory);
/// assert_eq!(key.to_string(), "booksByCategory::Classics");
///
/// let key = CacheKey::title_author("Emma", "Austen");
/// assert_eq!(key.to_string(), "bookByTitleAndAuthor::Emma+Austen");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Category(CategoryName),
    TitleAuthor { title: String, author: String },
}

impl CacheKey {
    /// Crea una key para la region de listas por categoria.
    pub fn category(name: impl Into<CategoryName>) -> Self {
        Self::Category(name.into())
    }

    /// Crea una key para la region de libro por titulo y autor.
    pub fn title_author(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self::TitleAuthor {
            title: title.into(),
            author: author.into(),
        }
    }

    /// Retorna la region a la que pertenece esta key.
    pub fn region(&self) -> CacheRegion {
        match self {
            Self::Category(_) => CacheRegion::BooksByCategory,
            Self::TitleAuthor { .. } => CacheRegion::BookByTitleAndAuthor,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Category(name) => write!(f, "{}::{}", self.region(), name),
            Self::TitleAuthor { title, author } => {
                write!(f, "{}::{}+{}", self.region(), title, author)
            },
        }
    }
}

/// The derived keys of one book state: what must be evicted when that
/// state stops being current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedKeys {
    pub id: BookId,
    pub category: CacheKey,
    pub title_author: CacheKey,
}

impl DerivedKeys {
    /// Computes the derived keys of a book.
    pub fn of(book: &folio_core::Book) -> Self {
        Self {
            id: book.id,
            category: CacheKey::category(book.category.clone()),
            title_author: CacheKey::title_author(book.title.clone(), book.author.clone()),
        }
    }
}
