//! An interactive editing session over one page of trades.
//!
//! The editor keeps the last server-confirmed rows (the snapshot), a working
//! copy the user mutates, the diff between the two and a row selection. Edits
//! stay local until [`TradeEditor::save`] replays them against the store and
//! resyncs; [`TradeEditor::cancel`] throws them away.

use crate::application::csv_export::export_csv;
use crate::application::diff_tracker::DiffTracker;
use crate::application::edit_reconciler::EditReconciler;
use crate::application::query_builder::{FilterState, QueryBuilder};
use crate::application::save_orchestrator::{SaveOrchestrator, SavePlan, SaveReport};
use crate::domain::entities::trade::Trade;
use crate::domain::entities::working_row::{RowEdits, WorkingRow};
use crate::domain::error::DomainError;
use crate::domain::ports::record_store::RecordStore;
use chrono::NaiveDate;
use std::sync::Arc;

pub const DEFAULT_FETCH_PAGE_SIZE: usize = 200;

pub struct TradeEditor {
    store: Arc<dyn RecordStore>,
    orchestrator: SaveOrchestrator,
    reconciler: EditReconciler,
    filter: FilterState,
    snapshot: Vec<Trade>,
    total: usize,
    rows: Vec<WorkingRow>,
    tracker: DiffTracker,
    selection: Vec<String>,
}

impl TradeEditor {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self::with_page_size(store, DEFAULT_FETCH_PAGE_SIZE)
    }

    pub fn with_page_size(store: Arc<dyn RecordStore>, page_size: usize) -> Self {
        Self {
            orchestrator: SaveOrchestrator::new(store.clone()),
            store,
            reconciler: EditReconciler::new(),
            filter: FilterState {
                page_size: Some(page_size),
                ..Default::default()
            },
            snapshot: Vec::new(),
            total: 0,
            rows: Vec::new(),
            tracker: DiffTracker::new(),
            selection: Vec::new(),
        }
    }

    /// Replace the filter and refetch. Unsaved changes are discarded.
    pub async fn set_filter(&mut self, filter: FilterState) -> Result<(), DomainError> {
        self.filter = filter;
        self.fetch().await
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Reload from the store. All session state is torn down first, so a
    /// failed fetch leaves an empty session rather than a stale one.
    pub async fn fetch(&mut self) -> Result<(), DomainError> {
        self.snapshot.clear();
        self.rows.clear();
        self.total = 0;
        self.tracker.reset();
        self.selection.clear();

        let query = QueryBuilder::build(&self.filter);
        tracing::debug!(?query, "fetching trades");
        let page = self.store.list(&query).await?;

        self.total = page.total;
        self.rows = page.rows.iter().cloned().map(WorkingRow::synced).collect();
        self.snapshot = page.rows;
        Ok(())
    }

    pub fn rows(&self) -> &[WorkingRow] {
        &self.rows
    }

    pub fn row(&self, id: &str) -> Option<&WorkingRow> {
        self.rows.iter().find(|r| r.id() == id)
    }

    pub fn snapshot(&self) -> &[Trade] {
        &self.snapshot
    }

    /// Matching rows in the store as of the last fetch, across all pages.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn diff(&self) -> &DiffTracker {
        &self.tracker
    }

    pub fn is_dirty(&self) -> bool {
        self.tracker.is_dirty()
    }

    pub fn is_saving(&self) -> bool {
        self.orchestrator.is_saving()
    }

    /// Append a blank row dated `today` and select it. Returns its temporary id.
    pub fn add_row(&mut self, today: NaiveDate) -> String {
        let row = WorkingRow::blank(today);
        let id = row.id().to_string();
        self.rows.push(row);
        self.tracker.mark_added(&id);
        self.select(&id);
        id
    }

    pub fn edit_row(&mut self, id: &str, edits: &RowEdits) -> Result<&WorkingRow, DomainError> {
        let idx = self
            .rows
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| DomainError::InvalidInput(format!("No row with id {id}")))?;
        let old = &self.rows[idx];
        let reconciled = self
            .reconciler
            .apply_edit(old, edits.apply_to(old), &mut self.tracker);
        self.rows[idx] = reconciled;
        Ok(&self.rows[idx])
    }

    pub fn select(&mut self, id: &str) {
        if self.row(id).is_some() && !self.selection.iter().any(|s| s == id) {
            self.selection.push(id.to_string());
        }
    }

    pub fn deselect(&mut self, id: &str) {
        self.selection.retain(|s| s != id);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selection(&self) -> &[String] {
        &self.selection
    }

    /// Delete every selected row and clear the selection. Returns how many
    /// rows were removed.
    pub fn delete_selected(&mut self) -> usize {
        let ids = std::mem::take(&mut self.selection);
        self.delete_rows(&ids)
    }

    pub fn delete_rows(&mut self, ids: &[String]) -> usize {
        let mut removed = 0;
        for id in ids {
            let before = self.rows.len();
            self.rows.retain(|r| r.id() != id);
            if self.rows.len() != before {
                self.tracker.mark_deleted(id);
                self.deselect(id);
                removed += 1;
            }
        }
        removed
    }

    /// Drop every local change and go back to the snapshot.
    pub fn cancel(&mut self) {
        self.rows = self.snapshot.iter().cloned().map(WorkingRow::synced).collect();
        self.tracker.reset();
        self.selection.clear();
    }

    pub fn save_plan(&self) -> SavePlan {
        SavePlan::build(&self.rows, &self.tracker)
    }

    /// Push the diff to the store, then resync whatever the outcome of the
    /// individual calls. Items that failed to persist show up unchanged after
    /// the resync; the report lists them too.
    pub async fn save(&mut self) -> Result<SaveReport, DomainError> {
        let plan = self.save_plan();
        let report = self.orchestrator.execute(plan).await?;
        self.fetch().await?;
        Ok(report)
    }

    /// CSV of the selected rows, or of every visible row when nothing is selected.
    pub fn export_csv(&self) -> Result<String, DomainError> {
        if self.selection.is_empty() {
            export_csv(self.rows.iter().map(|r| &r.trade))
        } else {
            export_csv(
                self.rows
                    .iter()
                    .filter(|r| self.selection.iter().any(|s| s == r.id()))
                    .map(|r| &r.trade),
            )
        }
    }
}
