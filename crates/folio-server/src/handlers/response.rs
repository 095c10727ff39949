use folio_core::Book;
use serde::{Deserialize, Serialize};

/// Representacion JSON de un libro.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookResponse {
    pub id: u64,
    pub title: String,
    pub author: String,
    pub category_name: String,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            id: book.id.get(),
            title: book.title,
            author: book.author,
            category_name: book.category.into_inner(),
        }
    }
}

/// Lista de libros de una categoria.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookListResponse {
    pub books: Vec<BookResponse>,
}

impl From<Vec<Book>> for BookListResponse {
    fn from(books: Vec<Book>) -> Self {
        Self {
            books: books.into_iter().map(BookResponse::from).collect(),
        }
    }
}

/// Body de POST y PUT.
///
/// Missing fields deserialize as empty strings so they are reported by
/// field validation rather than as a malformed body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookUpsertRequest {
    pub title: String,
    pub author: String,
    pub category_name: String,
}
