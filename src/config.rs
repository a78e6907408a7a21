use crate::domain::value_objects::Identity;
use thiserror::Error;

/// 設定読み込みのエラー
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 必須の環境変数が設定されていない
    #[error("{0} must be set")]
    Missing(&'static str),

    /// 環境変数の値が不正
    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// サーバー設定
///
/// 環境変数から読み込む：
/// - `LIBRARY_ADMIN`: 管理者の識別子（必須、台帳の生存期間中固定）
/// - `PORT`: 待ち受けポート（デフォルト 3000）
#[derive(Debug, Clone)]
pub struct Config {
    pub admin: Identity,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 任意の参照関数から設定を組み立てる
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let admin = lookup("LIBRARY_ADMIN").ok_or(ConfigError::Missing("LIBRARY_ADMIN"))?;
        let admin = Identity::new(admin).map_err(|e| ConfigError::Invalid {
            name: "LIBRARY_ADMIN",
            reason: e.to_string(),
        })?;

        let port = match lookup("PORT") {
            Some(port) => port.parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::Invalid {
                    name: "PORT",
                    reason: e.to_string(),
                }
            })?,
            None => 3000,
        };

        Ok(Self { admin, port })
    }

    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
