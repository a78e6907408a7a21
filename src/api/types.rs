use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::book::Book;

/// 書籍登録リクエスト（POST /books）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterBookRequest {
    pub title: String,
    pub copies: u32,
}

/// 書籍登録レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct BookRegisteredResponse {
    pub book_id: Uuid,
}

/// タイトル検索のクエリパラメータ（GET /books?title=...）
#[derive(Debug, Deserialize)]
pub struct BookLookupQuery {
    pub title: String,
}

/// 書籍レスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookResponse {
    pub book_id: Uuid,
    pub title: String,
    pub total_copies: u32,
    pub available_copies: u32,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            book_id: book.book_id.value(),
            title: book.title.to_string(),
            total_copies: book.total_copies.value(),
            available_copies: book.available_copies,
        }
    }
}

/// 貸出履歴レスポンス（GET /books/:id/borrowers）
#[derive(Debug, Serialize, Deserialize)]
pub struct BorrowerHistoryResponse {
    pub book_id: Uuid,
    pub borrowers: Vec<String>,
}

/// 登録済み書籍数レスポンス（GET /count）
#[derive(Debug, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: usize,
}

/// エラーレスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}
