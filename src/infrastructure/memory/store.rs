use crate::application::query_builder::select_page;
use crate::domain::entities::trade::{Trade, TradeInput};
use crate::domain::error::DomainError;
use crate::domain::ports::record_store::{ListQuery, RecordStore, TradePage};
use crate::domain::values::trade_id::resolve_create_id;
use crate::infrastructure::seed::sample_trades;
use tokio::sync::RwLock;

/// Process-local store. Rows are kept newest-created first.
#[derive(Default)]
pub struct InMemoryRecordStore {
    rows: RwLock<Vec<Trade>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-filled with the sample trades.
    pub fn seeded() -> Self {
        let rows = sample_trades()
            .into_iter()
            .enumerate()
            .map(|(i, input)| Trade::from_input(format!("t{}", i + 1), input))
            .rev()
            .collect();
        Self {
            rows: RwLock::new(rows),
        }
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn list(&self, query: &ListQuery) -> Result<TradePage, DomainError> {
        let rows = self.rows.read().await;
        Ok(select_page(query, rows.iter()))
    }

    async fn get(&self, id: &str) -> Result<Trade, DomainError> {
        self.rows
            .read()
            .await
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| DomainError::NotFound(format!("Trade not found: {id}")))
    }

    async fn create(&self, input: TradeInput) -> Result<Trade, DomainError> {
        input.validate()?;
        let mut rows = self.rows.write().await;
        let id = resolve_create_id(input.id.as_deref());
        if rows.iter().any(|t| t.id == id) {
            return Err(DomainError::Validation(format!("Trade id already exists: {id}")));
        }
        let trade = Trade::from_input(id, input);
        rows.insert(0, trade.clone());
        tracing::info!(id = %trade.id, "trade created");
        Ok(trade)
    }

    async fn update(&self, id: &str, input: TradeInput) -> Result<Trade, DomainError> {
        input.validate()?;
        let mut rows = self.rows.write().await;
        let slot = rows
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| DomainError::NotFound(format!("Trade not found: {id}")))?;
        *slot = Trade::from_input(id.to_string(), input);
        tracing::info!(%id, "trade updated");
        Ok(slot.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let mut rows = self.rows.write().await;
        let idx = rows
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| DomainError::NotFound(format!("Trade not found: {id}")))?;
        rows.remove(idx);
        tracing::info!(%id, "trade deleted");
        Ok(())
    }
}
