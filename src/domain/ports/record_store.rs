use crate::domain::entities::trade::{Trade, TradeInput};
use crate::domain::error::DomainError;
use crate::domain::values::trade_status::TradeStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 50;
pub const MAX_PAGE_SIZE: usize = 1000;

/// A filtered, paginated list request. Build one with
/// [`crate::application::query_builder::QueryBuilder`].
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    /// Case-insensitive substring over counterparty, SKU and item name.
    pub text: Option<String>,
    pub status: Option<TradeStatus>,
    /// Inclusive lower bound on trade date.
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on trade date.
    pub to: Option<NaiveDate>,
    /// Zero-based.
    pub page: usize,
    pub page_size: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            text: None,
            status: None,
            from: None,
            to: None,
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of a list response. `total` counts every match, not just this page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradePage {
    pub total: usize,
    pub rows: Vec<Trade>,
}

#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    async fn list(&self, query: &ListQuery) -> Result<TradePage, DomainError>;
    async fn get(&self, id: &str) -> Result<Trade, DomainError>;
    /// Persist a new trade. The store decides the final id and recomputes the amount.
    async fn create(&self, input: TradeInput) -> Result<Trade, DomainError>;
    /// Replace the trade stored under `id`. Fails with `NotFound` if absent.
    async fn update(&self, id: &str, input: TradeInput) -> Result<Trade, DomainError>;
    async fn delete(&self, id: &str) -> Result<(), DomainError>;
}
