use chrono::{DateTime, Utc};

use super::{BookId, Identity};

/// コマンド：書籍を登録する
///
/// タイトルと冊数は未検証のまま受け取る。
/// 権限チェックを入力検証より先に行うため。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterBook {
    pub title: String,
    pub copies: u32,
    pub caller: Identity,
    pub registered_at: DateTime<Utc>,
}

/// コマンド：書籍を借りる
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorrowBook {
    pub book_id: BookId,
    pub borrower: Identity,
    pub borrowed_at: DateTime<Utc>,
}

/// コマンド：書籍を返却する
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnBook {
    pub book_id: BookId,
    pub borrower: Identity,
    pub returned_at: DateTime<Utc>,
}
