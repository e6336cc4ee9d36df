pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logging;

use crate::application::query_builder::FilterState;
use crate::application::save_orchestrator::SaveReport;
use crate::application::staged_script::{run_script, StagedAction};
use crate::application::trade::TradeUseCase;
use crate::application::trade_editor::TradeEditor;
use crate::config::{AppConfig, StoreKind};
use crate::domain::entities::trade::{Trade, TradeInput};
use crate::domain::error::DomainError;
use crate::domain::ports::record_store::{RecordStore, TradePage};
use crate::infrastructure::http::client::HttpTradeStore;
use crate::infrastructure::memory::store::InMemoryRecordStore;
use crate::infrastructure::seed::sample_trades;
use crate::infrastructure::sqlite::trade_repo::SqliteTradeStore;
use chrono::NaiveDate;
use std::sync::Arc;

pub struct TradeDesk {
    store: Arc<dyn RecordStore>,
    trade_uc: TradeUseCase,
    fetch_page_size: usize,
}

impl TradeDesk {
    /// Wire up the store named by `config`.
    pub fn new(config: &AppConfig) -> Result<Self, DomainError> {
        let store: Arc<dyn RecordStore> = match config.store {
            StoreKind::Memory => Arc::new(InMemoryRecordStore::seeded()),
            StoreKind::Sqlite => Arc::new(SqliteTradeStore::open(&config.db_path)?),
            StoreKind::Http => Arc::new(HttpTradeStore::new(
                config.base_url.clone(),
                config.http_timeout,
            )?),
        };
        tracing::debug!(store = %config.store, "record store ready");
        Ok(Self::with_store(store).fetch_page_size(config.fetch_page_size))
    }

    pub fn with_store(store: Arc<dyn RecordStore>) -> Self {
        Self {
            trade_uc: TradeUseCase::new(store.clone()),
            store,
            fetch_page_size: application::trade_editor::DEFAULT_FETCH_PAGE_SIZE,
        }
    }

    pub fn fetch_page_size(mut self, page_size: usize) -> Self {
        self.fetch_page_size = page_size;
        self
    }

    pub fn store(&self) -> Arc<dyn RecordStore> {
        self.store.clone()
    }

    pub async fn list(&self, filter: &FilterState) -> Result<TradePage, DomainError> {
        self.trade_uc.list(filter).await
    }

    pub async fn get(&self, id: &str) -> Result<Trade, DomainError> {
        self.trade_uc.get(id).await
    }

    pub async fn add(&self, input: TradeInput) -> Result<Trade, DomainError> {
        self.trade_uc.add(input).await
    }

    pub async fn update(&self, id: &str, input: TradeInput) -> Result<Trade, DomainError> {
        self.trade_uc.update(id, input).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), DomainError> {
        self.trade_uc.delete(id).await
    }

    /// Insert the sample trades. Returns the stored rows.
    pub async fn seed(&self) -> Result<Vec<Trade>, DomainError> {
        let mut out = Vec::new();
        for input in sample_trades() {
            out.push(self.trade_uc.add(input).await?);
        }
        Ok(out)
    }

    /// A fresh editing session over this desk's store, already fetched.
    pub async fn editor(&self, filter: FilterState) -> Result<TradeEditor, DomainError> {
        let mut editor = TradeEditor::with_page_size(self.store.clone(), self.fetch_page_size);
        let filter = FilterState {
            page_size: filter.page_size.or(Some(self.fetch_page_size)),
            ..filter
        };
        editor.set_filter(filter).await?;
        Ok(editor)
    }

    pub async fn apply(
        &self,
        actions: &[StagedAction],
        today: NaiveDate,
    ) -> Result<SaveReport, DomainError> {
        let mut editor = self.editor(FilterState::default()).await?;
        run_script(&mut editor, actions, today).await
    }
}
