use crate::domain::{
    book::Book,
    events::DomainEvent,
    value_objects::{BookId, Identity},
};

/// 台帳ストアポート
///
/// 台帳の状態（書籍・貸出・履歴・イベントログ）の保存先を抽象化する。
/// 台帳コアが必要とするアクセスパターンは以下のみ：
/// - IDによる一意検索
/// - タイトルによる一意検索
/// - 貸出（書籍ID, 利用者）の存在確認・追加・削除
/// - 書籍ごとの履歴の順序付き追記・読み出し
///
/// 前提条件のチェックはすべて台帳側で書き込み前に行われるため、
/// 書き込み操作は失敗しない。
pub trait LedgerStore: Send + Sync {
    /// IDで書籍を取得する
    fn find_by_id(&self, book_id: BookId) -> Option<&Book>;

    /// タイトル（完全一致）で書籍を取得する
    fn find_by_title(&self, title: &str) -> Option<&Book>;

    /// 書籍を保存する
    ///
    /// 新規の場合は登録順の末尾に追加し、既存の場合は置き換える。
    fn save_book(&mut self, book: Book);

    /// 登録順で全書籍を返す
    fn books(&self) -> Vec<&Book>;

    /// 登録順でindex番目の書籍IDを返す
    fn book_id_at(&self, index: usize) -> Option<BookId>;

    /// 登録済み書籍数
    fn count(&self) -> usize;

    /// 貸出中かどうか
    fn has_loan(&self, book_id: BookId, borrower: &Identity) -> bool;

    /// 貸出を記録する
    fn insert_loan(&mut self, book_id: BookId, borrower: Identity);

    /// 貸出を削除する
    fn remove_loan(&mut self, book_id: BookId, borrower: &Identity);

    /// 履歴に利用者を追記する（追記専用）
    fn append_history(&mut self, book_id: BookId, borrower: Identity);

    /// 書籍の貸出履歴を追記順で返す
    fn history(&self, book_id: BookId) -> &[Identity];

    /// イベントログに追記する
    fn append_event(&mut self, event: DomainEvent);

    /// イベントログを追記順で返す
    fn events(&self) -> &[DomainEvent];
}
