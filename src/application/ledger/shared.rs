use std::sync::Arc;
use tokio::sync::RwLock;

use crate::ports::LedgerStore;

use super::ledger_service::Ledger;

/// 台帳の共有ハンドル（シーケンサー）
///
/// 任意個の並行呼び出し元からの操作を単一の順序に直列化する。
/// - 変更操作は書き込みロックを取り、1件ずつ完了まで適用される
/// - 照会は読み取りロックを取り、適用済み変更列のいずれかの接頭辞と
///   一致する状態のみを観測する
///
/// 台帳自体は同期的なので、ロック保持中に`.await`は発生しない。
pub struct SharedLedger<S> {
    inner: Arc<RwLock<Ledger<S>>>,
}

impl<S> Clone for SharedLedger<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: LedgerStore> SharedLedger<S> {
    pub fn new(ledger: Ledger<S>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ledger)),
        }
    }

    /// 変更操作を直列に実行する
    pub async fn mutate<T>(&self, op: impl FnOnce(&mut Ledger<S>) -> T) -> T {
        let mut ledger = self.inner.write().await;
        op(&mut *ledger)
    }

    /// 照会を実行する
    pub async fn read<T>(&self, query: impl FnOnce(&Ledger<S>) -> T) -> T {
        let ledger = self.inner.read().await;
        query(&*ledger)
    }
}
