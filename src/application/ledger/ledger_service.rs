use chrono::Utc;

use crate::domain::{
    self, DomainEvent, LedgerError, Result, book::Book, commands::*, value_objects::*,
};
use crate::ports::LedgerStore;

/// 図書館台帳
///
/// 書籍・貸出・履歴の状態をストア経由で排他的に所有し、
/// 登録・貸出・返却・照会の操作を提供する。
///
/// # 実行モデル
///
/// 単一スレッド・非再入を前提とする。変更操作は`&mut self`、照会は`&self`。
/// 内部にロックや非同期の中断点は持たない。複数の呼び出し元からの
/// 直列化は埋め込み側（[`super::SharedLedger`]）の責務。
///
/// # 原子性
///
/// すべての前提条件はストアへの書き込み前に評価される。
/// 失敗した操作は状態もイベントログも一切変更しない。
pub struct Ledger<S> {
    admin: Identity,
    store: S,
}

impl<S: LedgerStore> Ledger<S> {
    /// 管理者を指定して台帳を作成する
    ///
    /// 管理者は台帳の生存期間中固定。
    pub fn new(admin: Identity, store: S) -> Self {
        Self { admin, store }
    }

    pub fn admin(&self) -> &Identity {
        &self.admin
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ========================================================================
    // 変更操作
    // ========================================================================

    /// 書籍を登録する（現在時刻で記録）
    pub fn register(&mut self, title: &str, copies: u32, caller: &Identity) -> Result<BookId> {
        self.execute_register(RegisterBook {
            title: title.to_string(),
            copies,
            caller: caller.clone(),
            registered_at: Utc::now(),
        })
    }

    /// 書籍を登録する
    ///
    /// # エラー
    /// - Unauthorized: 呼び出し元が管理者ではない
    /// - InvalidArgument: タイトルが空、または冊数が0
    /// - AlreadyExists: 同じタイトルが登録済み
    pub fn execute_register(&mut self, cmd: RegisterBook) -> Result<BookId> {
        let store = &self.store;
        let (book, event) = domain::book::register_book(&self.admin, &cmd, |title| {
            store.find_by_title(title.as_str()).is_some()
        })?;

        let book_id = book.book_id;
        self.store.save_book(book);
        self.store.append_event(DomainEvent::BookRegistered(event));

        tracing::debug!(%book_id, title = %cmd.title, copies = cmd.copies, "book registered");
        Ok(book_id)
    }

    /// 書籍を借りる（現在時刻で記録）
    pub fn borrow(&mut self, book_id: BookId, borrower: &Identity) -> Result<()> {
        self.execute_borrow(BorrowBook {
            book_id,
            borrower: borrower.clone(),
            borrowed_at: Utc::now(),
        })
    }

    /// タイトルを指定して書籍を借りる
    pub fn borrow_by_title(&mut self, title: &str, borrower: &Identity) -> Result<()> {
        let book_id = self.resolve_title(title)?;
        self.borrow(book_id, borrower)
    }

    /// 書籍を借りる
    ///
    /// # エラー
    /// - NotFound: 書籍が存在しない
    /// - AlreadyBorrowed: 同じ利用者が既に借りている
    /// - Exhausted: 貸出可能な冊数がない
    pub fn execute_borrow(&mut self, cmd: BorrowBook) -> Result<()> {
        let book = self.load_book(cmd.book_id)?;
        let has_loan = self.store.has_loan(cmd.book_id, &cmd.borrower);

        let (new_book, event) =
            domain::book::borrow_book(book, &cmd.borrower, has_loan, cmd.borrowed_at)?;

        let available = new_book.available_copies;
        self.store.save_book(new_book);
        self.store.insert_loan(cmd.book_id, cmd.borrower.clone());
        self.store.append_history(cmd.book_id, cmd.borrower.clone());
        self.store.append_event(DomainEvent::BookBorrowed(event));

        tracing::debug!(book_id = %cmd.book_id, borrower = %cmd.borrower, available, "book borrowed");
        Ok(())
    }

    /// 書籍を返却する（現在時刻で記録）
    pub fn return_(&mut self, book_id: BookId, borrower: &Identity) -> Result<()> {
        self.execute_return(ReturnBook {
            book_id,
            borrower: borrower.clone(),
            returned_at: Utc::now(),
        })
    }

    /// タイトルを指定して書籍を返却する
    pub fn return_by_title(&mut self, title: &str, borrower: &Identity) -> Result<()> {
        let book_id = self.resolve_title(title)?;
        self.return_(book_id, borrower)
    }

    /// 書籍を返却する
    ///
    /// 履歴は変更しない（返却は履歴イベントではない）。
    ///
    /// # エラー
    /// - NotFound: 書籍が存在しない
    /// - NotBorrowed: 利用者がこの書籍を借りていない
    pub fn execute_return(&mut self, cmd: ReturnBook) -> Result<()> {
        let book = self.load_book(cmd.book_id)?;
        let has_loan = self.store.has_loan(cmd.book_id, &cmd.borrower);

        let (new_book, event) =
            domain::book::return_book(book, &cmd.borrower, has_loan, cmd.returned_at)?;

        let available = new_book.available_copies;
        self.store.save_book(new_book);
        self.store.remove_loan(cmd.book_id, &cmd.borrower);
        self.store.append_event(DomainEvent::BookReturned(event));

        tracing::debug!(book_id = %cmd.book_id, borrower = %cmd.borrower, available, "book returned");
        Ok(())
    }

    // ========================================================================
    // 照会（状態を変更しない）
    // ========================================================================

    /// タイトル（完全一致）で書籍を取得する
    pub fn get_book(&self, title: &str) -> Result<Book> {
        self.store
            .find_by_title(title)
            .cloned()
            .ok_or_else(|| LedgerError::NotFound(title.to_string()))
    }

    /// IDで書籍を取得する
    pub fn get_book_by_id(&self, book_id: BookId) -> Result<Book> {
        self.load_book(book_id).cloned()
    }

    /// 貸出可能な書籍を登録順で返す
    ///
    /// 呼び出し時点のスナップショット。後続の変更は反映されない。
    pub fn list_available(&self) -> std::vec::IntoIter<Book> {
        self.store
            .books()
            .into_iter()
            .filter(|book| book.is_available())
            .cloned()
            .collect::<Vec<_>>()
            .into_iter()
    }

    /// 書籍の貸出履歴を追記順で返す
    ///
    /// 一度も貸し出されていない場合は空。
    pub fn get_borrower_history(&self, book_id: BookId) -> Result<Vec<Identity>> {
        self.load_book(book_id)?;
        Ok(self.store.history(book_id).to_vec())
    }

    /// タイトルを指定して貸出履歴を取得する
    pub fn get_borrower_history_by_title(&self, title: &str) -> Result<Vec<Identity>> {
        let book_id = self.resolve_title(title)?;
        self.get_borrower_history(book_id)
    }

    /// 登録済み書籍数
    pub fn count(&self) -> usize {
        self.store.count()
    }

    /// 登録順でindex番目の書籍ID
    pub fn book_id_at(&self, index: usize) -> Result<BookId> {
        self.store
            .book_id_at(index)
            .ok_or_else(|| LedgerError::NotFound(format!("book index {}", index)))
    }

    /// 利用者がこの書籍を借りているか
    pub fn has_active_loan(&self, book_id: BookId, borrower: &Identity) -> bool {
        self.store.has_loan(book_id, borrower)
    }

    /// 適用済みイベントを追記順で返す
    pub fn events(&self) -> &[DomainEvent] {
        self.store.events()
    }

    fn load_book(&self, book_id: BookId) -> Result<&Book> {
        self.store
            .find_by_id(book_id)
            .ok_or_else(|| LedgerError::NotFound(book_id.to_string()))
    }

    fn resolve_title(&self, title: &str) -> Result<BookId> {
        self.store
            .find_by_title(title)
            .map(|book| book.book_id)
            .ok_or_else(|| LedgerError::NotFound(title.to_string()))
    }
}
