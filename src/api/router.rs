use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, borrow_book, count_books, get_book, get_book_by_title, get_borrower_history,
    list_available, list_events, register_book, return_book,
};

/// Creates the API router with all ledger endpoints
///
/// Command endpoints (Write operations):
/// - POST /books - Register a book (administrator only)
/// - POST /books/:id/borrow - Borrow a copy as the caller
/// - POST /books/:id/return - Return a copy as the caller
///
/// Query endpoints (Read operations):
/// - GET /books?title=... - Look up a book by exact title
/// - GET /books/:id - Get a book by id
/// - GET /books/:id/borrowers - Borrower history
/// - GET /available - Books with copies available
/// - GET /count - Number of registered books
/// - GET /events - Applied ledger events
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        .route("/books", post(register_book).get(get_book_by_title))
        .route("/books/:id", get(get_book))
        .route("/books/:id/borrowers", get(get_borrower_history))
        .route("/books/:id/borrow", post(borrow_book))
        .route("/books/:id/return", post(return_book))
        .route("/available", get(list_available))
        .route("/count", get(count_books))
        .route("/events", get(list_events))
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
