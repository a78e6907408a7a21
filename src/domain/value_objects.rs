use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::LedgerError;

/// 書籍IDを導出するための名前空間（UUID v5）
const BOOK_ID_NAMESPACE: Uuid = Uuid::from_u128(0x6c1b_0f4e_9d2a_4e8b_a3c5_27f1_0b9e_4d61);

/// 書籍ID - タイトルのコンテンツハッシュ
///
/// 同じタイトルは常に同じIDになる。タイトルは一意なので、IDも一意かつ安定。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookId(Uuid);

impl BookId {
    /// タイトルからIDを導出する
    pub fn for_title(title: &Title) -> Self {
        Self(Uuid::new_v5(&BOOK_ID_NAMESPACE, title.as_str().as_bytes()))
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 書籍タイトル
///
/// 不変条件：空文字列ではない。
/// 比較は大文字小文字を区別する完全一致。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Title(String);

impl Title {
    /// # エラー
    /// 空文字列の場合は`LedgerError::InvalidArgument`を返す
    pub fn new(title: impl Into<String>) -> Result<Self, LedgerError> {
        let title = title.into();
        if title.is_empty() {
            return Err(LedgerError::InvalidArgument("empty title".to_string()));
        }
        Ok(Self(title))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Title {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Title> for String {
    fn from(title: Title) -> Self {
        title.0
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 登録冊数
///
/// 不変条件：1以上。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Copies(u32);

impl Copies {
    /// # エラー
    /// 0の場合は`LedgerError::InvalidArgument`を返す
    pub fn new(copies: u32) -> Result<Self, LedgerError> {
        if copies == 0 {
            return Err(LedgerError::InvalidArgument(
                "copies must be positive".to_string(),
            ));
        }
        Ok(Self(copies))
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for Copies {
    type Error = LedgerError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Copies> for u32 {
    fn from(copies: Copies) -> Self {
        copies.0
    }
}

/// 呼び出し元の識別子（管理者・利用者共通）
///
/// 中身は不透明な文字列（アカウントアドレスなど）。空文字列は不可。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

impl Identity {
    /// # エラー
    /// 空文字列の場合は`LedgerError::InvalidArgument`を返す
    pub fn new(identity: impl Into<String>) -> Result<Self, LedgerError> {
        let identity = identity.into();
        if identity.is_empty() {
            return Err(LedgerError::InvalidArgument("empty identity".to_string()));
        }
        Ok(Self(identity))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Identity {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Identity> for String {
    fn from(identity: Identity) -> Self {
        identity.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
