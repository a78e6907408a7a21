use crate::domain::{
    book::Book,
    events::DomainEvent,
    value_objects::{BookId, Identity},
};
use crate::ports::ledger_store::LedgerStore as LedgerStoreTrait;
use std::collections::{HashMap, HashSet};

/// LedgerStoreのインメモリ実装
///
/// 書籍はIDとタイトルの両方で索引付けする。
/// 一覧の順序を安定させるため、登録順は別に保持する。
#[derive(Debug, Default)]
pub struct LedgerStore {
    books: HashMap<BookId, Book>,
    titles: HashMap<String, BookId>,
    order: Vec<BookId>,
    loans: HashSet<(BookId, Identity)>,
    history: HashMap<BookId, Vec<Identity>>,
    events: Vec<DomainEvent>,
}

impl LedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 全書籍を通じた貸出中の件数
    pub fn active_loan_count(&self) -> usize {
        self.loans.len()
    }
}

impl LedgerStoreTrait for LedgerStore {
    fn find_by_id(&self, book_id: BookId) -> Option<&Book> {
        self.books.get(&book_id)
    }

    fn find_by_title(&self, title: &str) -> Option<&Book> {
        self.titles
            .get(title)
            .and_then(|book_id| self.books.get(book_id))
    }

    fn save_book(&mut self, book: Book) {
        if !self.books.contains_key(&book.book_id) {
            self.order.push(book.book_id);
            self.titles
                .insert(book.title.as_str().to_string(), book.book_id);
        }
        self.books.insert(book.book_id, book);
    }

    fn books(&self) -> Vec<&Book> {
        self.order
            .iter()
            .filter_map(|book_id| self.books.get(book_id))
            .collect()
    }

    fn book_id_at(&self, index: usize) -> Option<BookId> {
        self.order.get(index).copied()
    }

    fn count(&self) -> usize {
        self.order.len()
    }

    fn has_loan(&self, book_id: BookId, borrower: &Identity) -> bool {
        self.loans.contains(&(book_id, borrower.clone()))
    }

    fn insert_loan(&mut self, book_id: BookId, borrower: Identity) {
        self.loans.insert((book_id, borrower));
    }

    fn remove_loan(&mut self, book_id: BookId, borrower: &Identity) {
        self.loans.remove(&(book_id, borrower.clone()));
    }

    fn append_history(&mut self, book_id: BookId, borrower: Identity) {
        self.history.entry(book_id).or_default().push(borrower);
    }

    fn history(&self, book_id: BookId) -> &[Identity] {
        self.history
            .get(&book_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn append_event(&mut self, event: DomainEvent) {
        self.events.push(event);
    }

    fn events(&self) -> &[DomainEvent] {
        &self.events
    }
}
