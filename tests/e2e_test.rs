use axum::body::Body;
use axum::http::{Request, StatusCode};
use library_ledger::adapters::memory::InMemoryLedgerStore;
use library_ledger::api::handlers::{AppState, CALLER_IDENTITY_HEADER};
use library_ledger::api::router::create_router;
use library_ledger::api::types::*;
use library_ledger::application::ledger::{Ledger, SharedLedger};
use library_ledger::domain::value_objects::Identity;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

const ADMIN: &str = "0xowner";
const ALICE: &str = "0xalice";
const BOB: &str = "0xbob";

// ============================================================================
// E2Eテスト用のヘルパー関数
// ============================================================================

/// E2Eテスト用のアプリケーションセットアップ
///
/// 空の台帳と実際のAPIルーターを使用する。
fn setup_e2e_app() -> axum::Router {
    let ledger = Ledger::new(Identity::new(ADMIN).unwrap(), InMemoryLedgerStore::new());
    let app_state = Arc::new(AppState {
        ledger: SharedLedger::new(ledger),
    });

    create_router(app_state)
}

/// リクエストを送信し、ステータスとJSONボディを返す
async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    caller: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(caller) = caller {
        builder = builder.header(CALLER_IDENTITY_HEADER, caller);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, value)
}

fn parse<T: DeserializeOwned>(value: Value) -> T {
    serde_json::from_value(value).unwrap()
}

/// 管理者として書籍を登録し、IDを返す
async fn register(app: &axum::Router, title: &str, copies: u32) -> uuid::Uuid {
    let (status, body) = send(
        app,
        "POST",
        "/books",
        Some(ADMIN),
        Some(json!({ "title": title, "copies": copies })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    parse::<BookRegisteredResponse>(body).book_id
}

// ============================================================================
// E2Eテスト: 正常系フロー
// ============================================================================

#[tokio::test]
async fn test_e2e_full_borrow_flow() {
    let app = setup_e2e_app();

    // Step 1: 書籍登録（POST /books）
    let book_id = register(&app, "Sapiens", 2).await;

    // Step 2: 書籍取得（GET /books/:id）
    let (status, body) = send(&app, "GET", &format!("/books/{}", book_id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    let book: BookResponse = parse(body);
    assert_eq!(book.book_id, book_id);
    assert_eq!(book.title, "Sapiens");
    assert_eq!(book.total_copies, 2);
    assert_eq!(book.available_copies, 2);

    // Step 3: 貸出（POST /books/:id/borrow）
    let (status, body) = send(
        &app,
        "POST",
        &format!("/books/{}/borrow", book_id),
        Some(ALICE),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse::<BookResponse>(body).available_copies, 1);

    // Step 4: 貸出履歴（GET /books/:id/borrowers）
    let (status, body) = send(
        &app,
        "GET",
        &format!("/books/{}/borrowers", book_id),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let history: BorrowerHistoryResponse = parse(body);
    assert_eq!(history.borrowers, vec![ALICE.to_string()]);

    // Step 5: 返却（POST /books/:id/return）
    let (status, body) = send(
        &app,
        "POST",
        &format!("/books/{}/return", book_id),
        Some(ALICE),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse::<BookResponse>(body).available_copies, 2);

    // 履歴は返却後も残る
    let (_, body) = send(
        &app,
        "GET",
        &format!("/books/{}/borrowers", book_id),
        None,
        None,
    )
    .await;
    let history: BorrowerHistoryResponse = parse(body);
    assert_eq!(history.borrowers, vec![ALICE.to_string()]);

    // イベントログ（GET /events）
    let (status, body) = send(&app, "GET", "/events", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let events = body.as_array().unwrap();
    let types: Vec<&str> = events.iter().map(|e| e["type"].as_str().unwrap()).collect();
    assert_eq!(types, vec!["BookRegistered", "BookBorrowed", "BookReturned"]);
}

#[tokio::test]
async fn test_e2e_lookup_by_title_and_count() {
    let app = setup_e2e_app();
    let book_id = register(&app, "12 Rules for Life: An Antidote to Chaos", 2).await;
    register(&app, "Sapiens", 1).await;

    let (status, body) = send(
        &app,
        "GET",
        "/books?title=12%20Rules%20for%20Life%3A%20An%20Antidote%20to%20Chaos",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse::<BookResponse>(body).book_id, book_id);

    let (status, body) = send(&app, "GET", "/count", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse::<CountResponse>(body).count, 2);
}

#[tokio::test]
async fn test_e2e_list_available_excludes_exhausted() {
    let app = setup_e2e_app();
    let x = register(&app, "X", 2).await;
    register(&app, "Y", 1).await;

    for caller in [ALICE, BOB] {
        let (status, _) = send(
            &app,
            "POST",
            &format!("/books/{}/borrow", x),
            Some(caller),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(&app, "GET", "/available", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let books: Vec<BookResponse> = parse(body);
    let titles: Vec<&str> = books.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["Y"]);
}

#[tokio::test]
async fn test_health_check() {
    let app = setup_e2e_app();
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// ============================================================================
// E2Eテスト: エラー系
// ============================================================================

#[tokio::test]
async fn test_e2e_register_by_non_admin_is_forbidden() {
    let app = setup_e2e_app();

    let (status, body) = send(
        &app,
        "POST",
        "/books",
        Some(ALICE),
        Some(json!({ "title": "X", "copies": 1 })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(parse::<ErrorResponse>(body).error, "UNAUTHORIZED");

    let (_, body) = send(&app, "GET", "/count", None, None).await;
    assert_eq!(parse::<CountResponse>(body).count, 0);
}

#[tokio::test]
async fn test_e2e_missing_identity_is_unauthenticated() {
    let app = setup_e2e_app();

    let (status, body) = send(
        &app,
        "POST",
        "/books",
        None,
        Some(json!({ "title": "X", "copies": 1 })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(parse::<ErrorResponse>(body).error, "UNAUTHENTICATED");
}

#[tokio::test]
async fn test_e2e_register_invalid_and_duplicate() {
    let app = setup_e2e_app();
    register(&app, "X", 1).await;

    let (status, body) = send(
        &app,
        "POST",
        "/books",
        Some(ADMIN),
        Some(json!({ "title": "", "copies": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse::<ErrorResponse>(body).error, "INVALID_ARGUMENT");

    let (status, _) = send(
        &app,
        "POST",
        "/books",
        Some(ADMIN),
        Some(json!({ "title": "Y", "copies": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        "POST",
        "/books",
        Some(ADMIN),
        Some(json!({ "title": "X", "copies": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(parse::<ErrorResponse>(body).error, "ALREADY_EXISTS");
}

#[tokio::test]
async fn test_e2e_borrow_errors() {
    let app = setup_e2e_app();
    let x = register(&app, "X", 1).await;
    let borrow_uri = format!("/books/{}/borrow", x);

    let (status, _) = send(&app, "POST", &borrow_uri, Some(ALICE), None).await;
    assert_eq!(status, StatusCode::OK);

    // 同じ利用者の重複貸出
    let (status, body) = send(&app, "POST", &borrow_uri, Some(ALICE), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(parse::<ErrorResponse>(body).error, "ALREADY_BORROWED");

    // 在庫切れ
    let (status, body) = send(&app, "POST", &borrow_uri, Some(BOB), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(parse::<ErrorResponse>(body).error, "EXHAUSTED");

    // 借りていない書籍の返却
    let (status, body) = send(
        &app,
        "POST",
        &format!("/books/{}/return", x),
        Some(BOB),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(parse::<ErrorResponse>(body).error, "NOT_BORROWED");
}

#[tokio::test]
async fn test_e2e_unknown_book_is_not_found() {
    let app = setup_e2e_app();
    let unknown = uuid::Uuid::nil();

    let (status, body) = send(&app, "GET", &format!("/books/{}", unknown), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(parse::<ErrorResponse>(body).error, "NOT_FOUND");

    let (status, _) = send(
        &app,
        "GET",
        &format!("/books/{}/borrowers", unknown),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "POST",
        &format!("/books/{}/borrow", unknown),
        Some(ALICE),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", "/books?title=nope", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_e2e_malformed_register_body_is_invalid_argument() {
    let app = setup_e2e_app();

    let (status, body) = send(
        &app,
        "POST",
        "/books",
        Some(ADMIN),
        Some(json!({ "title": "X", "copies": -1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse::<ErrorResponse>(body).error, "INVALID_ARGUMENT");

    let (status, body) = send(
        &app,
        "POST",
        "/books",
        Some(ADMIN),
        Some(json!({ "title": "X" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse::<ErrorResponse>(body).error, "INVALID_ARGUMENT");

    // 拒否されたリクエストは何も登録しない
    let (_, body) = send(&app, "GET", "/count", None, None).await;
    assert_eq!(parse::<CountResponse>(body).count, 0);
}

#[tokio::test]
async fn test_e2e_malformed_book_id_is_invalid_argument() {
    let app = setup_e2e_app();

    let (status, body) = send(&app, "GET", "/books/not-a-uuid", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse::<ErrorResponse>(body).error, "INVALID_ARGUMENT");

    let (status, body) = send(&app, "GET", "/books/not-a-uuid/borrowers", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse::<ErrorResponse>(body).error, "INVALID_ARGUMENT");

    let (status, body) = send(
        &app,
        "POST",
        "/books/not-a-uuid/borrow",
        Some(ALICE),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse::<ErrorResponse>(body).error, "INVALID_ARGUMENT");
}

#[tokio::test]
async fn test_e2e_lookup_without_title_is_invalid_argument() {
    let app = setup_e2e_app();

    let (status, body) = send(&app, "GET", "/books", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse::<ErrorResponse>(body).error, "INVALID_ARGUMENT");
}
