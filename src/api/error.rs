use crate::domain::LedgerError;
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// 台帳のエラーをラップし、HTTPレスポンスへのマッピングを提供する。
#[derive(Debug)]
pub enum ApiError {
    /// 呼び出し元の識別子ヘッダーがない、または不正
    MissingIdentity,
    /// リクエストのボディ・パス・クエリを解釈できない
    InvalidRequest(String),
    /// 台帳が操作を拒否した
    Ledger(LedgerError),
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        ApiError::Ledger(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = match self {
            ApiError::MissingIdentity => {
                let body = Json(ErrorResponse::new(
                    "UNAUTHENTICATED",
                    "x-caller-identity header is required",
                ));
                return (StatusCode::UNAUTHORIZED, body).into_response();
            }
            ApiError::InvalidRequest(message) => {
                tracing::debug!("malformed request: {}", message);
                let body = Json(ErrorResponse::new("INVALID_ARGUMENT", message));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            ApiError::Ledger(err) => err,
        };

        let status = match err {
            // 403 Forbidden - 管理者以外による登録
            LedgerError::Unauthorized => StatusCode::FORBIDDEN,

            // 400 Bad Request - 構造的に不正な入力
            LedgerError::InvalidArgument(_) => StatusCode::BAD_REQUEST,

            // 404 Not Found - リクエストされた書籍が存在しない
            LedgerError::NotFound(_) => StatusCode::NOT_FOUND,

            // 409 Conflict - 現在の状態と矛盾する操作
            LedgerError::AlreadyExists(_)
            | LedgerError::AlreadyBorrowed { .. }
            | LedgerError::NotBorrowed { .. } => StatusCode::CONFLICT,

            // 422 Unprocessable Entity - 在庫切れ
            LedgerError::Exhausted(_) => StatusCode::UNPROCESSABLE_ENTITY,
        };

        tracing::debug!(kind = err.kind(), "ledger rejected operation: {}", err);

        let body = Json(ErrorResponse::new(err.kind(), err.to_string()));
        (status, body).into_response()
    }
}
