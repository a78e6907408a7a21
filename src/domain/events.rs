use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BookId, Copies, Identity, Title};

/// イベント：書籍が登録された
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRegistered {
    pub book_id: BookId,
    pub title: Title,
    pub copies: Copies,
    pub registered_by: Identity,
    pub registered_at: DateTime<Utc>,
}

/// イベント：書籍が貸し出された
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookBorrowed {
    pub book_id: BookId,
    pub borrower: Identity,
    pub borrowed_at: DateTime<Utc>,
}

/// イベント：書籍が返却された
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookReturned {
    pub book_id: BookId,
    pub borrower: Identity,
    pub returned_at: DateTime<Utc>,
}

/// ドメインイベント統合型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DomainEvent {
    BookRegistered(BookRegistered),
    BookBorrowed(BookBorrowed),
    BookReturned(BookReturned),
}

impl DomainEvent {
    /// イベントの対象書籍
    pub fn book_id(&self) -> BookId {
        match self {
            DomainEvent::BookRegistered(e) => e.book_id,
            DomainEvent::BookBorrowed(e) => e.book_id,
            DomainEvent::BookReturned(e) => e.book_id,
        }
    }

    /// イベントの発生時刻
    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            DomainEvent::BookRegistered(e) => e.registered_at,
            DomainEvent::BookBorrowed(e) => e.borrowed_at,
            DomainEvent::BookReturned(e) => e.returned_at,
        }
    }
}
