use chrono::{DateTime, Utc};

use super::{
    BookBorrowed, BookId, BookRegistered, BookReturned, Copies, Identity, LedgerError, Result,
    Title, commands::RegisterBook,
};

/// Book集約 - 図書館が所蔵する1タイトル
///
/// 不変条件：0 <= available_copies <= total_copies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub book_id: BookId,
    pub title: Title,
    pub total_copies: Copies,
    pub available_copies: u32,
}

impl Book {
    /// 貸出可能な冊数があるか
    pub fn is_available(&self) -> bool {
        self.available_copies > 0
    }

    /// 貸出中の冊数
    pub fn copies_on_loan(&self) -> u32 {
        self.total_copies.value() - self.available_copies
    }
}

/// 純粋関数：管理者権限の確認
pub fn authorize(admin: &Identity, caller: &Identity) -> Result<()> {
    if admin != caller {
        return Err(LedgerError::Unauthorized);
    }
    Ok(())
}

/// 純粋関数：書籍を登録する
///
/// ビジネスルール（この順でチェックする）：
/// - 呼び出し元が管理者であること
/// - タイトルが空でないこと
/// - 冊数が1以上であること
/// - 同じタイトルが未登録であること
///
/// 副作用なし。新しいBookとイベントを返す。
pub fn register_book(
    admin: &Identity,
    cmd: &RegisterBook,
    is_registered: impl FnOnce(&Title) -> bool,
) -> Result<(Book, BookRegistered)> {
    authorize(admin, &cmd.caller)?;

    let title = Title::new(cmd.title.as_str())?;
    let copies = Copies::new(cmd.copies)?;

    if is_registered(&title) {
        return Err(LedgerError::AlreadyExists(title.to_string()));
    }

    let book_id = BookId::for_title(&title);
    let book = Book {
        book_id,
        title: title.clone(),
        total_copies: copies,
        available_copies: copies.value(),
    };

    let event = BookRegistered {
        book_id,
        title,
        copies,
        registered_by: cmd.caller.clone(),
        registered_at: cmd.registered_at,
    };

    Ok((book, event))
}

/// 純粋関数：書籍を借りる
///
/// ビジネスルール（この順でチェックする）：
/// - 同じ利用者が同じ書籍を借りていないこと
/// - 貸出可能な冊数が残っていること
///
/// 副作用なし。貸出可能数を1減らしたBookとイベントを返す。
pub fn borrow_book(
    book: &Book,
    borrower: &Identity,
    has_active_loan: bool,
    borrowed_at: DateTime<Utc>,
) -> Result<(Book, BookBorrowed)> {
    if has_active_loan {
        return Err(LedgerError::AlreadyBorrowed {
            book_id: book.book_id,
            borrower: borrower.clone(),
        });
    }

    if !book.is_available() {
        return Err(LedgerError::Exhausted(book.book_id));
    }

    let new_book = Book {
        available_copies: book.available_copies - 1,
        ..book.clone()
    };

    let event = BookBorrowed {
        book_id: book.book_id,
        borrower: borrower.clone(),
        borrowed_at,
    };

    Ok((new_book, event))
}

/// 純粋関数：書籍を返却する
///
/// ビジネスルール：
/// - 利用者がこの書籍を借りていること
///
/// 貸出が存在する以上、available_copies < total_copies が成り立つ。
pub fn return_book(
    book: &Book,
    borrower: &Identity,
    has_active_loan: bool,
    returned_at: DateTime<Utc>,
) -> Result<(Book, BookReturned)> {
    if !has_active_loan {
        return Err(LedgerError::NotBorrowed {
            book_id: book.book_id,
            borrower: borrower.clone(),
        });
    }

    debug_assert!(book.available_copies < book.total_copies.value());

    let new_book = Book {
        available_copies: (book.available_copies + 1).min(book.total_copies.value()),
        ..book.clone()
    };

    let event = BookReturned {
        book_id: book.book_id,
        borrower: borrower.clone(),
        returned_at,
    };

    Ok((new_book, event))
}
