use thiserror::Error;

use super::{BookId, Identity};

/// 台帳操作のエラー
///
/// すべての前提条件チェックは局所的かつ終端的。
/// エラー時は状態を一切変更しない。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// 呼び出し元に必要な権限がない（登録は管理者のみ）
    #[error("Caller is not the administrator")]
    Unauthorized,

    /// 構造的に不正な入力（空タイトル、0冊など）
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// 同じタイトルの書籍が既に存在する
    #[error("Book already exists: {0}")]
    AlreadyExists(String),

    /// 書籍ID・タイトルが存在しない
    #[error("Book does not exist: {0}")]
    NotFound(String),

    /// 貸出可能な冊数がない
    #[error("No copies available for book {0}")]
    Exhausted(BookId),

    /// 利用者は既にこの書籍を借りている
    #[error("{borrower} has already borrowed book {book_id}")]
    AlreadyBorrowed { book_id: BookId, borrower: Identity },

    /// 利用者はこの書籍を借りていない
    #[error("{borrower} has not borrowed book {book_id}")]
    NotBorrowed { book_id: BookId, borrower: Identity },
}

impl LedgerError {
    /// エラー種別の安定したコード
    pub fn kind(&self) -> &'static str {
        match self {
            LedgerError::Unauthorized => "UNAUTHORIZED",
            LedgerError::InvalidArgument(_) => "INVALID_ARGUMENT",
            LedgerError::AlreadyExists(_) => "ALREADY_EXISTS",
            LedgerError::NotFound(_) => "NOT_FOUND",
            LedgerError::Exhausted(_) => "EXHAUSTED",
            LedgerError::AlreadyBorrowed { .. } => "ALREADY_BORROWED",
            LedgerError::NotBorrowed { .. } => "NOT_BORROWED",
        }
    }
}

/// 台帳の Result型
pub type Result<T> = std::result::Result<T, LedgerError>;
