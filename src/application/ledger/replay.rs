use crate::domain::{DomainEvent, Result, commands::*, value_objects::Identity};
use crate::ports::LedgerStore;

use super::ledger_service::Ledger;

impl<S: LedgerStore + Default> Ledger<S> {
    /// イベント列から台帳を復元する
    ///
    /// 空のストアから始め、各イベントを対応するコマンドとして
    /// 通常の操作と同じ前提条件チェックを通して適用する。
    /// 前提条件に違反するイベント列は対応する`LedgerError`で失敗する。
    ///
    /// # 引数
    /// * `admin` - 復元する台帳の管理者
    /// * `events` - ドメインイベントの列（時系列順）
    pub fn replay(admin: Identity, events: &[DomainEvent]) -> Result<Self> {
        events
            .iter()
            .try_fold(Self::new(admin, S::default()), |mut ledger, event| {
                ledger.apply_event(event)?;
                Ok(ledger)
            })
    }

    fn apply_event(&mut self, event: &DomainEvent) -> Result<()> {
        match event {
            DomainEvent::BookRegistered(e) => self
                .execute_register(RegisterBook {
                    title: e.title.to_string(),
                    copies: e.copies.value(),
                    caller: e.registered_by.clone(),
                    registered_at: e.registered_at,
                })
                .map(|_| ()),
            DomainEvent::BookBorrowed(e) => self.execute_borrow(BorrowBook {
                book_id: e.book_id,
                borrower: e.borrower.clone(),
                borrowed_at: e.borrowed_at,
            }),
            DomainEvent::BookReturned(e) => self.execute_return(ReturnBook {
                book_id: e.book_id,
                borrower: e.borrower.clone(),
                returned_at: e.returned_at,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryLedgerStore;
    use crate::domain::{BookBorrowed, BookId, LedgerError, Title};
    use chrono::Utc;

    fn identity(name: &str) -> Identity {
        Identity::new(name).unwrap()
    }

    #[test]
    fn test_replay_empty_events() {
        let ledger: Ledger<InMemoryLedgerStore> = Ledger::replay(identity("owner"), &[]).unwrap();
        assert_eq!(ledger.count(), 0);
    }

    #[test]
    fn test_replay_reproduces_state() {
        let owner = identity("owner");
        let alice = identity("alice");
        let bob = identity("bob");

        let mut original = Ledger::new(owner.clone(), InMemoryLedgerStore::new());
        let x = original.register("X", 2, &owner).unwrap();
        let y = original.register("Y", 1, &owner).unwrap();
        original.borrow(x, &alice).unwrap();
        original.borrow(x, &bob).unwrap();
        original.return_(x, &alice).unwrap();
        original.borrow(y, &alice).unwrap();

        let replayed: Ledger<InMemoryLedgerStore> =
            Ledger::replay(owner, original.events()).unwrap();

        assert_eq!(replayed.count(), original.count());
        assert_eq!(replayed.events(), original.events());
        for book_id in [x, y] {
            assert_eq!(
                replayed.get_book_by_id(book_id).unwrap(),
                original.get_book_by_id(book_id).unwrap()
            );
            assert_eq!(
                replayed.get_borrower_history(book_id).unwrap(),
                original.get_borrower_history(book_id).unwrap()
            );
        }
        assert!(replayed.has_active_loan(x, &bob));
        assert!(!replayed.has_active_loan(x, &alice));
        assert!(replayed.has_active_loan(y, &alice));
    }

    #[test]
    fn test_replay_with_different_admin_fails() {
        let owner = identity("owner");
        let mut original = Ledger::new(owner.clone(), InMemoryLedgerStore::new());
        original.register("X", 1, &owner).unwrap();

        let result: Result<Ledger<InMemoryLedgerStore>> =
            Ledger::replay(identity("someone-else"), original.events());
        assert!(matches!(result, Err(LedgerError::Unauthorized)));
    }

    // 登録前の貸出イベントは復元できない
    #[test]
    fn test_replay_rejects_borrow_of_unknown_book() {
        let book_id = BookId::for_title(&Title::new("Ghost").unwrap());
        let events = vec![DomainEvent::BookBorrowed(BookBorrowed {
            book_id,
            borrower: identity("alice"),
            borrowed_at: Utc::now(),
        })];

        let result: Result<Ledger<InMemoryLedgerStore>> =
            Ledger::replay(identity("owner"), &events);
        assert!(matches!(result, Err(LedgerError::NotFound(_))));
    }
}
