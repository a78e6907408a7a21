use crate::adapters::memory::InMemoryLedgerStore;
use crate::application::ledger::SharedLedger;
use crate::domain::{DomainEvent, value_objects::*};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{HeaderMap, StatusCode},
};
use std::sync::Arc;
use uuid::Uuid;

use super::{
    error::ApiError,
    types::{
        BookLookupQuery, BookRegisteredResponse, BookResponse, BorrowerHistoryResponse,
        CountResponse, RegisterBookRequest,
    },
};

/// 呼び出し元の識別子を運ぶヘッダー
pub const CALLER_IDENTITY_HEADER: &str = "x-caller-identity";

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub ledger: SharedLedger<InMemoryLedgerStore>,
}

/// ヘッダーから呼び出し元の識別子を取り出す
fn caller_identity(headers: &HeaderMap) -> Result<Identity, ApiError> {
    headers
        .get(CALLER_IDENTITY_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Identity::new(value).ok())
        .ok_or(ApiError::MissingIdentity)
}

/// パスの書籍IDを取り出す
fn path_book_id(path: Result<Path<Uuid>, PathRejection>) -> Result<BookId, ApiError> {
    let Path(book_id) = path?;
    Ok(BookId::from_uuid(book_id))
}

// ============================================================================
// Command handlers (POST)
// ============================================================================

/// POST /books - 書籍を登録
///
/// 強制されるビジネスルール:
/// - 呼び出し元が管理者であること
/// - タイトルが空でないこと
/// - 冊数が1以上であること
/// - 同じタイトルが未登録であること
pub async fn register_book(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<RegisterBookRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BookRegisteredResponse>), ApiError> {
    let caller = caller_identity(&headers)?;
    let Json(req) = payload?;

    let book_id = state
        .ledger
        .mutate(|ledger| ledger.register(&req.title, req.copies, &caller))
        .await?;

    let response = BookRegisteredResponse {
        book_id: book_id.value(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /books/:id/borrow - 書籍を借りる
///
/// 呼び出し元が借り手になる。貸出後の書籍の状態を返す。
pub async fn borrow_book(
    State(state): State<Arc<AppState>>,
    path: Result<Path<Uuid>, PathRejection>,
    headers: HeaderMap,
) -> Result<Json<BookResponse>, ApiError> {
    let borrower = caller_identity(&headers)?;
    let book_id = path_book_id(path)?;

    let book = state
        .ledger
        .mutate(|ledger| {
            ledger.borrow(book_id, &borrower)?;
            ledger.get_book_by_id(book_id)
        })
        .await?;

    Ok(Json(BookResponse::from(book)))
}

/// POST /books/:id/return - 書籍を返却
///
/// 呼び出し元が返却者になる。返却後の書籍の状態を返す。
pub async fn return_book(
    State(state): State<Arc<AppState>>,
    path: Result<Path<Uuid>, PathRejection>,
    headers: HeaderMap,
) -> Result<Json<BookResponse>, ApiError> {
    let borrower = caller_identity(&headers)?;
    let book_id = path_book_id(path)?;

    let book = state
        .ledger
        .mutate(|ledger| {
            ledger.return_(book_id, &borrower)?;
            ledger.get_book_by_id(book_id)
        })
        .await?;

    Ok(Json(BookResponse::from(book)))
}

// ============================================================================
// Query handlers (GET)
// ============================================================================

/// GET /books?title=... - タイトル（完全一致）で書籍を取得
pub async fn get_book_by_title(
    State(state): State<Arc<AppState>>,
    query: Result<Query<BookLookupQuery>, QueryRejection>,
) -> Result<Json<BookResponse>, ApiError> {
    let Query(query) = query?;
    let book = state
        .ledger
        .read(|ledger| ledger.get_book(&query.title))
        .await?;

    Ok(Json(BookResponse::from(book)))
}

/// GET /books/:id - IDで書籍を取得
pub async fn get_book(
    State(state): State<Arc<AppState>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<BookResponse>, ApiError> {
    let book_id = path_book_id(path)?;
    let book = state
        .ledger
        .read(|ledger| ledger.get_book_by_id(book_id))
        .await?;

    Ok(Json(BookResponse::from(book)))
}

/// GET /books/:id/borrowers - 貸出履歴を取得
pub async fn get_borrower_history(
    State(state): State<Arc<AppState>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<BorrowerHistoryResponse>, ApiError> {
    let book_id = path_book_id(path)?;
    let borrowers = state
        .ledger
        .read(|ledger| ledger.get_borrower_history(book_id))
        .await?;

    Ok(Json(BorrowerHistoryResponse {
        book_id: book_id.value(),
        borrowers: borrowers.into_iter().map(String::from).collect(),
    }))
}

/// GET /available - 貸出可能な書籍を登録順で取得
pub async fn list_available(State(state): State<Arc<AppState>>) -> Json<Vec<BookResponse>> {
    let books: Vec<BookResponse> = state
        .ledger
        .read(|ledger| ledger.list_available().map(BookResponse::from).collect())
        .await;

    Json(books)
}

/// GET /count - 登録済み書籍数
pub async fn count_books(State(state): State<Arc<AppState>>) -> Json<CountResponse> {
    let count = state.ledger.read(|ledger| ledger.count()).await;
    Json(CountResponse { count })
}

/// GET /events - 適用済みイベントを追記順で取得
pub async fn list_events(State(state): State<Arc<AppState>>) -> Json<Vec<DomainEvent>> {
    let events = state.ledger.read(|ledger| ledger.events().to_vec()).await;
    Json(events)
}
