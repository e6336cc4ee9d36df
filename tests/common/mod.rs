//! Shared test helpers.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use tradedesk::domain::entities::trade::{Trade, TradeInput};
use tradedesk::domain::error::DomainError;
use tradedesk::domain::ports::record_store::{ListQuery, RecordStore, TradePage};
use tradedesk::domain::values::category::Category;
use tradedesk::domain::values::trade_status::TradeStatus;
use tradedesk::infrastructure::memory::store::InMemoryRecordStore;
use tradedesk::TradeDesk;

pub fn setup() -> TradeDesk {
    TradeDesk::with_store(Arc::new(InMemoryRecordStore::seeded()))
}

pub fn date(s: &str) -> chrono::NaiveDate {
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn make_input(day: &str, counterparty: &str, quantity: f64, price: f64) -> TradeInput {
    TradeInput {
        id: None,
        trade_date: date(day),
        counterparty: counterparty.to_string(),
        trade_type: Category::Stationery,
        item_sku: "SKU-0100".to_string(),
        item_name: "pen".to_string(),
        quantity,
        price,
        status: TradeStatus::New,
        notes: None,
        amount: None,
    }
}

/// Seeded in-memory store that records every mutating call, can be told to
/// fail calls for given ids, and can hold creates until released.
pub struct RecordingStore {
    inner: InMemoryRecordStore,
    calls: Mutex<Vec<String>>,
    fail_ids: Vec<String>,
    gate: Option<Arc<Notify>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self {
            inner: InMemoryRecordStore::seeded(),
            calls: Mutex::new(Vec::new()),
            fail_ids: Vec::new(),
            gate: None,
        }
    }

    pub fn failing(ids: &[&str]) -> Self {
        Self {
            fail_ids: ids.iter().map(|s| s.to_string()).collect(),
            ..Self::new()
        }
    }

    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::new()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, id: &str) -> Result<(), DomainError> {
        if self.fail_ids.iter().any(|f| f == id) {
            return Err(DomainError::Transport(format!("injected failure for {id}")));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl RecordStore for RecordingStore {
    async fn list(&self, query: &ListQuery) -> Result<TradePage, DomainError> {
        self.inner.list(query).await
    }

    async fn get(&self, id: &str) -> Result<Trade, DomainError> {
        self.inner.get(id).await
    }

    async fn create(&self, input: TradeInput) -> Result<Trade, DomainError> {
        self.record(format!("create:{}", input.counterparty));
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.check(&input.counterparty)?;
        self.inner.create(input).await
    }

    async fn update(&self, id: &str, input: TradeInput) -> Result<Trade, DomainError> {
        self.record(format!("update:{id}"));
        self.check(id)?;
        self.inner.update(id, input).await
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        self.record(format!("delete:{id}"));
        self.check(id)?;
        self.inner.delete(id).await
    }
}
