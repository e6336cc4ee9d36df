use crate::domain::entities::trade::{Trade, TradeInput};
use crate::domain::values::category::Category;
use crate::domain::values::numeric::NumericInput;
use crate::domain::values::trade_id::new_temp_id;
use crate::domain::values::trade_status::TradeStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A row in an editing session: a trade plus whether it has been persisted
/// yet. Never written to a store as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkingRow {
    #[serde(flatten)]
    pub trade: Trade,
    pub is_new: bool,
}

impl WorkingRow {
    pub fn synced(trade: Trade) -> Self {
        Self {
            trade,
            is_new: false,
        }
    }

    /// Blank row with a temporary id, the default category and zero amounts.
    pub fn blank(trade_date: NaiveDate) -> Self {
        Self {
            trade: Trade {
                id: new_temp_id(),
                trade_date,
                counterparty: String::new(),
                trade_type: Category::default(),
                item_sku: String::new(),
                item_name: String::new(),
                quantity: 0.0,
                price: 0.0,
                amount: 0.0,
                status: TradeStatus::New,
                notes: None,
            },
            is_new: true,
        }
    }

    pub fn id(&self) -> &str {
        &self.trade.id
    }

    /// Payload for the store with the session-only flag stripped.
    pub fn to_input(&self) -> TradeInput {
        self.trade.to_input()
    }
}

/// A set of field changes made to one row. Absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RowEdits {
    #[serde(default)]
    pub trade_date: Option<NaiveDate>,
    #[serde(default)]
    pub counterparty: Option<String>,
    #[serde(default, rename = "type")]
    pub trade_type: Option<Category>,
    #[serde(default)]
    pub item_sku: Option<String>,
    #[serde(default)]
    pub item_name: Option<String>,
    #[serde(default)]
    pub quantity: Option<NumericInput>,
    #[serde(default)]
    pub price: Option<NumericInput>,
    #[serde(default)]
    pub status: Option<TradeStatus>,
    /// An empty string clears the notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl RowEdits {
    pub fn is_empty(&self) -> bool {
        *self == RowEdits::default()
    }

    /// The row as the user left it, before derived fields are reconciled.
    pub fn apply_to(&self, row: &WorkingRow) -> WorkingRow {
        let mut next = row.clone();
        let t = &mut next.trade;
        if let Some(date) = self.trade_date {
            t.trade_date = date;
        }
        if let Some(counterparty) = &self.counterparty {
            t.counterparty = counterparty.clone();
        }
        if let Some(cat) = self.trade_type {
            t.trade_type = cat;
        }
        if let Some(sku) = &self.item_sku {
            t.item_sku = sku.clone();
        }
        if let Some(name) = &self.item_name {
            t.item_name = name.clone();
        }
        if let Some(q) = &self.quantity {
            t.quantity = q.value();
        }
        if let Some(p) = &self.price {
            t.price = p.value();
        }
        if let Some(status) = self.status {
            t.status = status;
        }
        if let Some(notes) = &self.notes {
            t.notes = if notes.is_empty() {
                None
            } else {
                Some(notes.clone())
            };
        }
        next
    }
}
