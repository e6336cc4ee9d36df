use crate::domain::entities::trade::TradeInput;
use crate::domain::values::category::Category;
use crate::domain::values::trade_status::TradeStatus;
use chrono::NaiveDate;

#[allow(clippy::too_many_arguments)]
fn sample(
    (y, m, d): (i32, u32, u32),
    counterparty: &str,
    trade_type: Category,
    sku: &str,
    item: &str,
    quantity: f64,
    price: f64,
    status: TradeStatus,
) -> Option<TradeInput> {
    Some(TradeInput {
        id: None,
        trade_date: NaiveDate::from_ymd_opt(y, m, d)?,
        counterparty: counterparty.into(),
        trade_type,
        item_sku: sku.into(),
        item_name: item.into(),
        quantity,
        price,
        status,
        notes: None,
        amount: None,
    })
}

/// Demo trades used to seed empty stores.
pub fn sample_trades() -> Vec<TradeInput> {
    [
        sample(
            (2025, 9, 12),
            "ABC Trading",
            Category::Stationery,
            "SKU-0001",
            "notebook",
            10.0,
            150.0,
            TradeStatus::Confirmed,
        ),
        sample(
            (2025, 9, 15),
            "DEF Goods",
            Category::Food,
            "SKU-0002",
            "bread",
            50.0,
            80.0,
            TradeStatus::New,
        ),
        sample(
            (2025, 9, 18),
            "GHI Imports",
            Category::Appliances,
            "SKU-0003",
            "hair dryer",
            5.0,
            16000.0,
            TradeStatus::Cancelled,
        ),
    ]
    .into_iter()
    .flatten()
    .collect()
}
