use crate::application::query_builder::{FilterState, QueryBuilder};
use crate::domain::entities::trade::{Trade, TradeInput};
use crate::domain::error::DomainError;
use crate::domain::ports::record_store::{RecordStore, TradePage};
use std::sync::Arc;

/// Direct (non-staged) access to the store for one-off commands.
pub struct TradeUseCase {
    store: Arc<dyn RecordStore>,
}

impl TradeUseCase {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, filter: &FilterState) -> Result<TradePage, DomainError> {
        self.store.list(&QueryBuilder::build(filter)).await
    }

    pub async fn get(&self, id: &str) -> Result<Trade, DomainError> {
        self.store.get(id).await
    }

    pub async fn add(&self, input: TradeInput) -> Result<Trade, DomainError> {
        self.store.create(input).await
    }

    pub async fn update(&self, id: &str, input: TradeInput) -> Result<Trade, DomainError> {
        self.store.update(id, input).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), DomainError> {
        self.store.delete(id).await
    }
}
