mod ledger_service;
mod replay;
mod shared;

pub use ledger_service::Ledger;
pub use shared::SharedLedger;
